//! Random target synthesis around a source coordinate.

use std::sync::{Mutex, PoisonError};

use rand::Rng;
use rand::rngs::StdRng;

use crate::models::traits::TargetStore;
use crate::models::types::*;
use crate::spatial::queries::destination;

/// Inclusive bounds on how far from the source a new target may land.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationRange {
    min: f64,
    max: f64,
}

impl GenerationRange {
    pub fn new(min_meters: f64, max_meters: f64) -> Result<Self> {
        let finite = min_meters.is_finite() && max_meters.is_finite();
        if !finite || min_meters < 0.0 || min_meters > max_meters {
            return Err(GameError::InvalidRange {
                min: min_meters,
                max: max_meters,
            });
        }

        Ok(Self {
            min: min_meters,
            max: max_meters,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

/// A candidate position before it is persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Proposal {
    pub bearing: f64,
    pub distance: f64,
    pub position: Coordinate,
}

/// Draws a uniform bearing in `[0, 360)` and a uniform distance within the
/// configured range, then projects from the source.
///
/// The generator is injected so tests can seed it. It sits behind a mutex so a
/// single `TargetGenerator` can serve concurrent requests.
pub struct TargetGenerator<R = StdRng> {
    range: GenerationRange,
    rng: Mutex<R>,
}

impl<R: Rng + Send> TargetGenerator<R> {
    pub fn new(range: GenerationRange, rng: R) -> Self {
        Self {
            range,
            rng: Mutex::new(rng),
        }
    }

    pub fn propose(&self, source: Coordinate) -> Proposal {
        let (bearing, distance) = {
            // Poisoning cannot corrupt RNG state.
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            (
                rng.random_range(0.0..360.0),
                rng.random_range(self.range.min..=self.range.max),
            )
        };

        Proposal {
            bearing,
            distance,
            position: destination(source, bearing, distance),
        }
    }

    /// Propose a position and persist it as a new target.
    pub fn generate(&self, source: Coordinate, store: &dyn TargetStore) -> Result<TargetLocation> {
        let proposal = self.propose(source);
        let target = store.save(NewTarget {
            position: proposal.position,
        })?;

        tracing::info!(
            target_id = %target.id,
            bearing = proposal.bearing,
            distance_m = proposal.distance,
            lat = target.position.lat(),
            lng = target.position.lng(),
            "generated new target"
        );

        Ok(target)
    }
}
