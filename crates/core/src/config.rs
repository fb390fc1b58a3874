//! Game configuration.
//!
//! Passed explicitly into [`crate::service::GameService`] and the components it
//! builds. Every field has a default so partial configs deserialize.

use serde::{Deserialize, Serialize};

use crate::models::types::{GameError, Result};
use crate::target::generator::GenerationRange;

/// Which calendar day boundary decides whether a target was created "today".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayBoundary {
    /// Midnight UTC
    #[default]
    Utc,
    /// Midnight in the server's local time zone
    Local,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Existing targets strictly closer than this are reused
    pub acceptance_threshold_meters: f64,

    pub min_generation_distance_meters: f64,
    pub max_generation_distance_meters: f64,

    pub default_page_size: usize,

    pub day_boundary: DayBoundary,

    /// Longest post text accepted, in characters
    pub max_post_text_chars: usize,
}

impl GameConfig {
    pub fn with_acceptance_threshold(mut self, meters: f64) -> Self {
        self.acceptance_threshold_meters = meters;
        self
    }

    pub fn with_generation_range(mut self, min_meters: f64, max_meters: f64) -> Self {
        self.min_generation_distance_meters = min_meters;
        self.max_generation_distance_meters = max_meters;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.default_page_size = page_size;
        self
    }

    pub fn with_day_boundary(mut self, day_boundary: DayBoundary) -> Self {
        self.day_boundary = day_boundary;
        self
    }

    pub fn generation_range(&self) -> Result<GenerationRange> {
        GenerationRange::new(
            self.min_generation_distance_meters,
            self.max_generation_distance_meters,
        )
    }

    pub fn validate(&self) -> Result<()> {
        if !self.acceptance_threshold_meters.is_finite() || self.acceptance_threshold_meters < 0.0 {
            return Err(GameError::InvalidConfig(format!(
                "acceptance threshold must be a non-negative number of meters, got {}",
                self.acceptance_threshold_meters
            )));
        }

        self.generation_range()?;

        if self.default_page_size == 0 {
            return Err(GameError::InvalidConfig(
                "default page size must be at least 1".into(),
            ));
        }

        if self.max_post_text_chars == 0 {
            return Err(GameError::InvalidConfig(
                "max post text length must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold_meters: 200.0,
            min_generation_distance_meters: 100.0,
            max_generation_distance_meters: 200.0,
            default_page_size: 10,
            day_boundary: DayBoundary::Utc,
            max_post_text_chars: 140,
        }
    }
}
