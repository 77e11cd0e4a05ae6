//! Part builders
//!
//! A builder places one shape family on top of an assembly: it finds the top
//! face, runs the shape generator there and merges the result.

mod body;
mod fins;

use rocket_cad::{CadError, CadKernel, Workplane};
use thiserror::Error;

use crate::assembly::Assembly;

pub use body::{BodyTubeBuilder, NoseConeBuilder, TransitionBuilder};
pub use fins::{FinSetBuilder, FinSetSpec};

/// Error type for part builders
#[derive(Debug, Clone, Error)]
pub enum BuildError {
    #[error("Fin set needs a body tube or an explicit body diameter to attach to")]
    MissingAttachmentContext,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Kernel(#[from] CadError),
}

/// Result type for build operations
pub type BuildResult<T> = Result<T, BuildError>;

/// Adds one part family to an assembly
pub trait PartBuilder {
    type Params;

    /// Return a new assembly with the part merged on top of `assembly`
    ///
    /// On error the input assembly is still the valid current state.
    fn add_part(
        &self,
        kernel: &dyn CadKernel,
        assembly: &Assembly,
        params: &Self::Params,
    ) -> BuildResult<Assembly>;
}

/// Plane a new part stands on: the global XY plane, or the stack top facing +Z
pub fn locate_top_face(assembly: &Assembly) -> Workplane {
    if assembly.is_empty() {
        Workplane::xy()
    } else {
        Workplane::at_height(assembly.top_z())
    }
}

fn check(result: Result<(), String>) -> BuildResult<()> {
    result.map_err(BuildError::InvalidParameter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::PartKind;
    use approx::assert_relative_eq;
    use rocket_cad::{CsgKernel, Profile};

    #[test]
    fn test_top_face_of_empty_assembly_is_origin() {
        let plane = locate_top_face(&Assembly::new());
        assert_eq!(plane, Workplane::xy());
    }

    #[test]
    fn test_top_face_follows_stack_top() {
        let kernel = CsgKernel::new();
        let solid = kernel
            .extrude(&Profile::circle(0.1), &Workplane::xy(), 0.75)
            .unwrap();
        let assembly = Assembly::new()
            .merge(&kernel, PartKind::BodyTube, solid, |s, top| s.after_part(top))
            .unwrap();

        let plane = locate_top_face(&assembly);
        assert_relative_eq!(plane.origin.z, 0.75);
        assert_relative_eq!(plane.normal.z, 1.0);
    }

    #[test]
    fn test_kernel_errors_convert() {
        let err: BuildError = CadError::BooleanFailed("cut".into()).into();
        assert!(matches!(err, BuildError::Kernel(_)));
        assert_eq!(err.to_string(), "Boolean operation failed: cut");
    }
}
