//! Schema-less extraction over the provider's embedded JSON documents.
//!
//! Nothing here knows the exact shape of a page. Entity subtrees, tokens and
//! labels are located by key name (`tree`) or by short relative paths
//! (`path`), and absent data is an ordinary `None`/empty result.

pub mod bootstrap;
pub mod dates;
pub mod path;
pub mod tree;

pub use bootstrap::{parse_bootstrap, parse_initial_data, Bootstrap, BootstrapError, Session};
pub use dates::{parse_time_ago, DateError};
pub use path::{extract_path, path_str, text_of};
pub use tree::{find_first, find_keys};
