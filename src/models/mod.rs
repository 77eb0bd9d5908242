//! Data models for harvested channels, videos and comments.

mod channel;
mod comment;
mod media;
mod video;

pub use channel::Channel;
pub use comment::{Comment, User};
pub use media::{MediaFile, OwnerKind, IMAGE_KIND};
pub use video::{Video, VideoStub};
