//! In-memory store backing targets, posts and images.
//!
//! Stands in for the relational database the game normally runs against.
//! All records live behind one `RwLock`; identifiers count up from 1.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::config::DayBoundary;
use crate::identifiers::*;
use crate::models::{traits::*, types::*};

#[derive(Default)]
struct Tables {
    targets: BTreeMap<TargetIdentifier, TargetLocation>,
    posts: Vec<Post>,
    images: BTreeMap<ImageIdentifier, StoredImage>,
    next_target: u64,
    next_post: u64,
    next_image: u64,
}

/// In-memory implementation of [`TargetStore`], [`PostStore`] and [`ImageStore`].
///
/// This type is cheap to clone since all data is stored in an `Arc`.
#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    clock: Arc<dyn Clock>,
    day_boundary: DayBoundary,
    image_base_url: Option<Arc<str>>,
    available: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store on the system clock with UTC day boundaries
    pub fn new() -> Self {
        Self {
            tables: Arc::default(),
            clock: Arc::new(SystemClock),
            day_boundary: DayBoundary::Utc,
            image_base_url: None,
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_day_boundary(mut self, day_boundary: DayBoundary) -> Self {
        self.day_boundary = day_boundary;
        self
    }

    /// Uploaded images get `{base}/{id}` as their URL
    pub fn with_image_base_url(mut self, base: impl AsRef<str>) -> Self {
        self.image_base_url = Some(base.as_ref().trim_end_matches('/').into());
        self
    }

    /// Simulate the backing database going away (or coming back).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn target_count(&self) -> Result<usize> {
        Ok(self.read()?.targets.len())
    }

    pub fn post_count(&self) -> Result<usize> {
        Ok(self.read()?.posts.len())
    }

    /// Insert a target with an explicit timestamp, e.g. to seed earlier days.
    pub fn insert_target_at(
        &self,
        position: Coordinate,
        created_at: DateTime<Utc>,
    ) -> Result<TargetLocation> {
        let mut tables = self.write()?;
        tables.next_target += 1;

        let target = TargetLocation {
            id: TargetIdentifier::new(tables.next_target),
            created_at,
            position,
        };
        tables.targets.insert(target.id, target.clone());

        Ok(target)
    }

    fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self.day_boundary {
            DayBoundary::Utc => instant.date_naive(),
            DayBoundary::Local => instant.with_timezone(&Local).date_naive(),
        }
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(GameError::StoreUnavailable("memory store is offline".into()))
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.check_available()?;
        self.tables
            .read()
            .map_err(|_| GameError::StoreUnavailable("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.check_available()?;
        self.tables
            .write()
            .map_err(|_| GameError::StoreUnavailable("memory store lock poisoned".into()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetStore for MemoryStore {
    fn query_created_today(&self) -> Result<Vec<TargetLocation>> {
        let today = self.day_of(self.clock.now());

        Ok(self
            .read()?
            .targets
            .values()
            .filter(|t| self.day_of(t.created_at) == today)
            .cloned()
            .collect())
    }

    fn save(&self, target: NewTarget) -> Result<TargetLocation> {
        self.insert_target_at(target.position, self.clock.now())
    }

    fn get_by_id(&self, id: &TargetIdentifier) -> Result<Option<TargetLocation>> {
        Ok(self.read()?.targets.get(id).cloned())
    }
}

impl PostStore for MemoryStore {
    fn save(&self, post: NewPost) -> Result<Post> {
        let created_at = self.clock.now();
        let mut tables = self.write()?;
        tables.next_post += 1;

        let post = Post {
            id: PostIdentifier::new(tables.next_post),
            created_at,
            text: post.text,
            final_distance: post.final_distance,
            target_id: post.target_id,
            image_id: post.image_id,
        };
        tables.posts.push(post.clone());

        Ok(post)
    }

    fn query_by_target(&self, target_id: &TargetIdentifier) -> Result<Vec<Post>> {
        // `posts` is append-only, so it is already in creation order
        Ok(self
            .read()?
            .posts
            .iter()
            .filter(|p| p.target_id == *target_id)
            .cloned()
            .collect())
    }
}

impl ImageStore for MemoryStore {
    fn upload(&self, payload: Vec<u8>) -> Result<ImageIdentifier> {
        if payload.is_empty() {
            return Err(GameError::ImageUpload("empty payload".into()));
        }

        let created_at = self.clock.now();
        let mut tables = self.write()?;
        tables.next_image += 1;

        let id = ImageIdentifier::new(tables.next_image);
        let url = self.image_base_url.as_ref().map(|base| format!("{base}/{id}"));
        tables.images.insert(
            id,
            StoredImage {
                id,
                created_at,
                url,
            },
        );

        tracing::debug!(image_id = %id, bytes = payload.len(), "stored image");
        Ok(id)
    }

    fn get(&self, id: &ImageIdentifier) -> Result<Option<StoredImage>> {
        Ok(self.read()?.images.get(id).cloned())
    }
}
