//! CAD kernel seam and the built-in CSG backend

mod csg;
mod profile;
mod stl;
mod traits;

pub use csg::{CsgKernel, CsgNode};
pub use profile::{Profile, Workplane};
pub use traits::{
    Axis3D, BooleanType, BoundingBox, CadError, CadKernel, CadResult, ExportFormat,
    ExportOptions, LoftSection, NullKernel, Solid, default_kernel,
};
