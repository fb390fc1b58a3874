//! Collaborator traits consumed by the game core.
//!
//! Implementations can be in-memory, database-backed, or remote. All of them
//! hand back plain value records; relationships are explicit queries.

use chrono::{DateTime, Utc};

use crate::identifiers::*;
use crate::models::types::*;

// ============================================================================
// Stores
// ============================================================================

/// Persistence for target locations.
pub trait TargetStore: Send + Sync {
    /// Targets created on the current calendar day, in any order.
    ///
    /// What counts as "today" is the store's decision (see
    /// [`crate::config::DayBoundary`]); callers treat the result as pre-filtered.
    fn query_created_today(&self) -> Result<Vec<TargetLocation>>;

    /// Persist a new target, assigning its identifier and timestamp.
    fn save(&self, target: NewTarget) -> Result<TargetLocation>;

    fn get_by_id(&self, id: &TargetIdentifier) -> Result<Option<TargetLocation>>;
}

/// Persistence for posts.
pub trait PostStore: Send + Sync {
    /// Persist a new post, assigning its identifier and timestamp.
    fn save(&self, post: NewPost) -> Result<Post>;

    /// All posts for a target in creation order, oldest first.
    fn query_by_target(&self, target_id: &TargetIdentifier) -> Result<Vec<Post>>;
}

/// Handle on the external media host.
pub trait ImageStore: Send + Sync {
    fn upload(&self, payload: Vec<u8>) -> Result<ImageIdentifier>;

    fn get(&self, id: &ImageIdentifier) -> Result<Option<StoredImage>>;
}

// ============================================================================
// Time
// ============================================================================

/// Source of "now" for stores, so date filtering can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that always reports the same instant.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
