//! Final distance recorded on a post.

use crate::models::types::{Coordinate, TargetLocation};
use crate::spatial::queries::distance;

#[derive(Clone, Copy, Debug, Default)]
pub struct PostScorer;

impl PostScorer {
    /// Meters between where the player submitted from and the target.
    pub fn score(&self, submitted: Coordinate, target: &TargetLocation) -> f64 {
        distance(submitted, target.position)
    }
}
