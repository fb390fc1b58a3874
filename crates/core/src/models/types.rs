//! Core data types for targets, posts and images.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::*;

// ============================================================================
// Coordinates
// ============================================================================

/// A validated WGS84 coordinate in degrees.
///
/// Latitude is in `[-90, 90]` and longitude in `(-180, 180]`. The only way to
/// build one from untrusted numbers is [`Coordinate::new`], which rejects
/// out-of-range or non-finite input instead of clamping it.
///
/// Each place has exactly one representation: longitude `-180` is stored as
/// `180`, and both poles carry longitude `0`. Equal places compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
        let lng_ok = lng.is_finite() && (-180.0..=180.0).contains(&lng);

        if !(lat_ok && lng_ok) {
            return Err(GameError::InvalidCoordinate { lat, lng });
        }

        Ok(Self::canonical(lat, lng))
    }

    fn canonical(lat: f64, lng: f64) -> Self {
        let lng = if lat.abs() == 90.0 {
            0.0
        } else if lng == -180.0 {
            180.0
        } else {
            lng
        };

        Self { lat, lng }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// `geo` points are `(x, y)`, i.e. `(lng, lat)`.
    pub fn to_point(self) -> geo::Point {
        geo::Point::new(self.lng, self.lat)
    }

    /// Build a coordinate from the output of geodesic math.
    ///
    /// Longitude is wrapped into `(-180, 180]` and latitude is pinned to the
    /// poles to absorb rounding noise. Only for points produced internally.
    pub(crate) fn from_projected(point: geo::Point) -> Self {
        let lng = (point.x() + 180.0).rem_euclid(360.0) - 180.0;
        Self::canonical(point.y().clamp(-90.0, 90.0), lng)
    }
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GameError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Self::new(raw.lat, raw.lng)
    }
}

// ============================================================================
// Records
// ============================================================================

/// A point players travel towards. Created once, never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetLocation {
    pub id: TargetIdentifier,
    pub created_at: DateTime<Utc>,
    pub position: Coordinate,
}

/// A target that has not been persisted yet; the store assigns id and timestamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewTarget {
    pub position: Coordinate,
}

/// A player's submission against a target.
#[derive(Clone, Debug, PartialEq)]
pub struct Post {
    pub id: PostIdentifier,
    pub created_at: DateTime<Utc>,
    pub text: String,
    /// Meters between the submitted coordinate and the target
    pub final_distance: f64,
    pub target_id: TargetIdentifier,
    pub image_id: Option<ImageIdentifier>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewPost {
    pub target_id: TargetIdentifier,
    pub text: String,
    pub final_distance: f64,
    pub image_id: Option<ImageIdentifier>,
}

/// An image held by the external media host.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredImage {
    pub id: ImageIdentifier,
    pub created_at: DateTime<Utc>,
    pub url: Option<String>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("Invalid coordinate: lat {lat}, lng {lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("Invalid generation range: min {min}m, max {max}m")]
    InvalidRange { min: f64, max: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid page: number {page_number}, size {page_size}")]
    InvalidPage { page_number: usize, page_size: usize },

    #[error("Invalid post: {0}")]
    InvalidPost(String),

    #[error("Target not found: {0}")]
    TargetNotFound(TargetIdentifier),

    #[error("Image not found: {0}")]
    ImageNotFound(ImageIdentifier),

    #[error("Image upload failed: {0}")]
    ImageUpload(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
