//! Reuse-or-generate decision for "find a target near me".

use rand::Rng;
use rand::rngs::StdRng;

use crate::models::traits::TargetStore;
use crate::models::types::*;
use crate::spatial::queries::distance;
use crate::target::generator::TargetGenerator;

/// Outcome of [`TargetMatcher::resolve`], with the distance from the source.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    Reused { target: TargetLocation, distance: f64 },
    Generated { target: TargetLocation, distance: f64 },
}

impl Resolution {
    pub fn target(&self) -> &TargetLocation {
        match self {
            Resolution::Reused { target, .. } | Resolution::Generated { target, .. } => target,
        }
    }

    pub fn into_target(self) -> TargetLocation {
        match self {
            Resolution::Reused { target, .. } | Resolution::Generated { target, .. } => target,
        }
    }

    pub fn distance(&self) -> f64 {
        match self {
            Resolution::Reused { distance, .. } | Resolution::Generated { distance, .. } => {
                *distance
            }
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Resolution::Generated { .. })
    }
}

pub struct TargetMatcher<R = StdRng> {
    acceptance_threshold_m: f64,
    generator: TargetGenerator<R>,
}

impl<R: Rng + Send> TargetMatcher<R> {
    pub fn new(acceptance_threshold_m: f64, generator: TargetGenerator<R>) -> Self {
        Self {
            acceptance_threshold_m,
            generator,
        }
    }

    /// The candidate closest to `source`. Exact ties go to the earliest one.
    pub fn nearest<'a>(
        source: Coordinate,
        candidates: &'a [TargetLocation],
    ) -> Option<(&'a TargetLocation, f64)> {
        candidates
            .iter()
            .map(|candidate| (candidate, distance(source, candidate.position)))
            .fold(None, |best, (candidate, d)| match best {
                Some((_, best_d)) if d >= best_d => best,
                _ => Some((candidate, d)),
            })
    }

    /// Reuse the nearest candidate if it is strictly inside the acceptance
    /// threshold, otherwise generate and persist a new target.
    ///
    /// `candidates` is expected to be the store's same-day set already; no
    /// timestamps are looked at here.
    pub fn resolve(
        &self,
        source: Coordinate,
        candidates: &[TargetLocation],
        store: &dyn TargetStore,
    ) -> Result<Resolution> {
        if let Some((nearest, d)) = Self::nearest(source, candidates) {
            if d < self.acceptance_threshold_m {
                tracing::debug!(
                    target_id = %nearest.id,
                    distance_m = d,
                    candidates = candidates.len(),
                    "reusing nearby target"
                );

                return Ok(Resolution::Reused {
                    target: nearest.clone(),
                    distance: d,
                });
            }

            tracing::debug!(
                nearest_m = d,
                threshold_m = self.acceptance_threshold_m,
                "nearest target too far, generating"
            );
        } else {
            tracing::debug!("no targets today, generating");
        }

        let target = self.generator.generate(source, store)?;
        let d = distance(source, target.position);

        Ok(Resolution::Generated {
            target,
            distance: d,
        })
    }
}
