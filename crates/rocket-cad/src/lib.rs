//! CAD Kernel Abstraction
//!
//! This crate provides:
//! - The `CadKernel` trait: the geometry capability set consumed by the airframe builder
//! - Kernel value types (profiles, workplanes, axes, bounding boxes, solid handles)
//! - A pure-Rust implicit CSG backend with STL and RON export

pub mod kernel;

// Re-exports for convenience
pub use kernel::{
    Axis3D, BooleanType, BoundingBox, CadError, CadKernel, CadResult, CsgKernel, CsgNode,
    ExportFormat, ExportOptions, LoftSection, NullKernel, Profile, Solid, Workplane,
    default_kernel,
};
