//! # otbp-core
//!
//! Target resolution and scoring for a location-based photo game.
//!
//! ## Features
//!
//! - **Geodesic math**: WGS84 distance, bearing and destination projection
//! - **Target matching**: reuse today's nearest target inside an acceptance radius
//! - **Target generation**: seedable random bearing/distance projection
//! - **Post scoring**: distance from a submission to its target
//! - **Pagination**: 1-based pages with a last-page flag
//! - **Pluggable stores**: implement [`TargetStore`], [`PostStore`] and [`ImageStore`]
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use otbp_core::prelude::*;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let store = Arc::new(MemoryStore::new());
//! let service = GameService::with_store(
//!     GameConfig::default(),
//!     StdRng::seed_from_u64(1),
//!     store.clone(),
//! )
//! .unwrap();
//!
//! // No targets exist yet, so one is generated 100-200m away
//! let here = Coordinate::new(51.5007, -0.1246).unwrap();
//! let resolution = service.find_target_near(here).unwrap();
//! assert!(resolution.is_generated());
//! assert_eq!(store.target_count().unwrap(), 1);
//!
//! // Standing on the target and posting scores (close to) zero
//! let target = resolution.into_target();
//! let post = service
//!     .create_post(PostSubmission {
//!         target_id: target.id,
//!         text: "found it".into(),
//!         submitted_from: target.position,
//!         image_id: None,
//!     })
//!     .unwrap();
//! assert!(post.final_distance < 1e-6);
//! ```

pub mod config;
pub mod identifiers;
pub mod models;
pub mod pagination;
pub mod provider;
pub mod scoring;
pub mod service;
pub mod spatial;
pub mod target;

// Re-exports for convenience
pub mod prelude {
    pub use crate::config::{DayBoundary, GameConfig};
    pub use crate::identifiers::*;
    pub use crate::models::{traits::*, types::*};
    pub use crate::pagination::{Page, Paginator, paginate};
    pub use crate::provider::memory_provider::MemoryStore;
    pub use crate::scoring::PostScorer;
    pub use crate::service::{GameService, PostSubmission, PostView};
    pub use crate::target::{GenerationRange, Resolution, TargetGenerator, TargetMatcher};
}

pub use prelude::*;
