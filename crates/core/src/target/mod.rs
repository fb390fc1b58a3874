//! Target resolution: reuse a nearby target or synthesize a new one.

pub mod generator;
pub mod matcher;

pub use generator::{GenerationRange, Proposal, TargetGenerator};
pub use matcher::{Resolution, TargetMatcher};
