//! Geodesic math shared by target matching, generation and scoring.

pub mod queries;

pub use queries::{bearing, destination, distance};
