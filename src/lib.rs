//! ytharvest - channel, video and comment harvester.
//!
//! Pages of the target site embed their data as JSON inside HTML and serve
//! further pages through a continuation-token RPC endpoint. This crate pulls a
//! channel's videos and their comments out of those documents and stores them
//! in an insert-only SQLite database.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod fetcher;
pub mod mappers;
pub mod models;
pub mod pagination;
pub mod progress;
pub mod repository;

pub use config::Settings;
pub use crawler::{CrawlError, CrawlReport, CrawlRequest, Crawler};
pub use fetcher::{FetchError, Fetcher, HttpFetcher};
pub use progress::{NoProgress, ProgressSink};
pub use repository::Store;
