//! Game data models, types, and traits.

pub mod traits;
pub mod types;

// Re-exports for convenience
pub use traits::{Clock, FixedClock, ImageStore, PostStore, SystemClock, TargetStore};
pub use types::{
    Coordinate, GameError, NewPost, NewTarget, Post, Result, StoredImage, TargetLocation,
};
