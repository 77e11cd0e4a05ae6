//! Hollow transition (frustum between two body diameters)

use rocket_cad::{CadKernel, CadResult, LoftSection, Profile, Solid, Workplane};

use super::{TransitionParams, cut_void};

fn frustum(
    kernel: &dyn CadKernel,
    plane: &Workplane,
    length: f64,
    bottom_radius: f64,
    top_radius: f64,
) -> CadResult<Solid> {
    kernel.loft(&[
        LoftSection::new(Profile::circle(bottom_radius), *plane),
        LoftSection::new(Profile::circle(top_radius), plane.offset(length)),
    ])
}

/// Generate a transition lofted from `bottom_radius` on `plane` to `top_radius` one length up
///
/// The void shrinks both radii by the thickness (clamped at zero). The wall is
/// therefore thinner than `thickness` along a slanted side.
pub fn transition(
    kernel: &dyn CadKernel,
    plane: &Workplane,
    params: &TransitionParams,
    tolerance: f64,
) -> CadResult<Solid> {
    let outer = frustum(
        kernel,
        plane,
        params.length,
        params.bottom_radius,
        params.top_radius,
    )?;

    if params.thickness <= 0.0 {
        return Ok(outer);
    }

    let inner_bottom = (params.bottom_radius - params.thickness).max(0.0);
    let inner_top = (params.top_radius - params.thickness).max(0.0);
    if inner_bottom <= tolerance && inner_top <= tolerance {
        tracing::debug!(
            "Transition wall {} fills both radii; building a solid frustum",
            params.thickness
        );
        return Ok(outer);
    }

    let inner = frustum(kernel, plane, params.length, inner_bottom, inner_top)?;
    cut_void(kernel, outer, inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::EPSILON;
    use approx::assert_relative_eq;
    use glam::DVec3;
    use rocket_cad::CsgKernel;

    fn params(thickness: f64) -> TransitionParams {
        TransitionParams {
            length: 1.0,
            bottom_radius: 0.5,
            top_radius: 0.3,
            thickness,
        }
    }

    #[test]
    fn test_hollow_transition() {
        let kernel = CsgKernel::new();
        let solid = transition(&kernel, &Workplane::xy(), &params(0.05), EPSILON).unwrap();
        assert_eq!(kernel.solid_count(), 1);

        let bbox = kernel.bounding_box(&solid).unwrap().unwrap();
        assert_relative_eq!(bbox.height(), 1.0);
        assert_relative_eq!(bbox.max.x, 0.5);

        // Halfway up: outer radius 0.4, void radius 0.35
        assert!(kernel.contains(&solid, DVec3::new(0.38, 0.0, 0.5)).unwrap());
        assert!(!kernel.contains(&solid, DVec3::new(0.3, 0.0, 0.5)).unwrap());
        assert!(!kernel.contains(&solid, DVec3::new(0.0, 0.0, 0.5)).unwrap());
    }

    #[test]
    fn test_non_positive_thickness_matches_zero() {
        let kernel = CsgKernel::new();
        let zero = transition(&kernel, &Workplane::xy(), &params(0.0), EPSILON).unwrap();
        let negative = transition(&kernel, &Workplane::xy(), &params(-0.2), EPSILON).unwrap();

        assert_eq!(kernel.node(&zero).unwrap(), kernel.node(&negative).unwrap());
        assert_eq!(
            kernel.bounding_box(&zero).unwrap(),
            kernel.bounding_box(&negative).unwrap()
        );
    }

    #[test]
    fn test_void_clamps_at_the_narrow_end() {
        let kernel = CsgKernel::new();
        // Void tapers from 0.1 at the bottom to a point at the top
        let solid = transition(&kernel, &Workplane::xy(), &params(0.4), EPSILON).unwrap();
        assert!(!kernel.contains(&solid, DVec3::new(0.02, 0.0, 0.05)).unwrap());
        assert!(kernel.contains(&solid, DVec3::new(0.02, 0.0, 0.95)).unwrap());
    }

    #[test]
    fn test_wall_thicker_than_both_radii_is_solid() {
        let kernel = CsgKernel::new();
        let solid = transition(&kernel, &Workplane::xy(), &params(0.6), EPSILON).unwrap();
        assert!(kernel.contains(&solid, DVec3::new(0.0, 0.0, 0.5)).unwrap());
    }
}
