//! Projections from located subtrees to typed records.
//!
//! Every optional field is read independently and falls back to a
//! documented default, so one missing label never discards a record.
//! Required fields produce [`MapError::RequiredFieldMissing`], which callers
//! treat as "skip this record".

mod channel;
mod comment;
mod video;

pub use channel::map_channel;
pub use comment::map_comment;
pub use video::{map_video, map_video_stub, map_video_stubs};

use thiserror::Error;

use crate::extract::DateError;

/// Record-local mapping failures.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("{entity} is missing required field {field}")]
    RequiredFieldMissing {
        entity: &'static str,
        field: &'static str,
    },

    #[error(transparent)]
    UnparseableDate(#[from] DateError),
}
