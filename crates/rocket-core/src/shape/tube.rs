//! Hollow body tube

use rocket_cad::{CadKernel, CadResult, Profile, Solid, Workplane};

use super::{TubeParams, cut_void};

/// Generate a tube standing on `plane`, extruded along its normal
///
/// A wall at least as thick as the radius yields a solid rod.
pub fn tube(
    kernel: &dyn CadKernel,
    plane: &Workplane,
    params: &TubeParams,
    tolerance: f64,
) -> CadResult<Solid> {
    let outer = kernel.extrude(&Profile::circle(params.outer_radius), plane, params.length)?;

    if params.thickness <= 0.0 {
        return Ok(outer);
    }

    let inner_radius = params.outer_radius - params.thickness;
    if inner_radius <= tolerance {
        tracing::debug!(
            "Tube wall {} fills radius {}; building a solid rod",
            params.thickness,
            params.outer_radius
        );
        return Ok(outer);
    }

    let inner = kernel.extrude(&Profile::circle(inner_radius), plane, params.length)?;
    cut_void(kernel, outer, inner)
}
