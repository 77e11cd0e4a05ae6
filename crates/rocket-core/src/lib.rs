//! Rocket Airframe Construction
//!
//! This crate provides:
//! - Shape generators for hollow, axially-symmetric parts (tubes, transitions, nose cones, fins)
//! - Part builders that place each shape on top of the current stack
//! - The assembly state machine tracking top-of-stack and body tube attachment data
//! - A project manager that orchestrates builders and hands the result to export

pub mod assembly;
pub mod builder;
pub mod config;
pub mod constants;
pub mod project;
pub mod shape;

// Re-exports for convenience
pub use assembly::{Assembly, AssemblyPhase, BodySegment, PartKind, StackState, StackedPart};
pub use builder::{
    BodyTubeBuilder, BuildError, BuildResult, FinSetBuilder, FinSetSpec, NoseConeBuilder,
    PartBuilder, TransitionBuilder, locate_top_face,
};
pub use config::{ConfigError, RocketConfig};
pub use project::{ProjectError, RocketProject};
pub use shape::{ConeParams, FinParams, FinSetParams, NoseProfile, TransitionParams, TubeParams};
