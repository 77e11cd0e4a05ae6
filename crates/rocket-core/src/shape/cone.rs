//! Hollow nose cone
//!
//! The outer surface follows a profile function r(h), where h is the distance
//! from the apex. The void uses the same function, with the base radius reduced
//! by the wall thickness and the apex pulled down by `thickness * length / base_radius`
//! so the wall keeps roughly the same thickness along the slant.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use rocket_cad::{CadKernel, CadResult, Profile, Solid, Workplane};

use super::{ConeParams, cut_void};
use crate::constants::{FULL_TURN_DEGREES, POWER_SERIES_EXPONENT, POWER_SERIES_SAMPLES};

/// Shape of the nose cone outline
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum NoseProfile {
    /// Straight slant from base to apex
    #[default]
    Conical,
    /// r(h) = base_radius * (h / length)^exponent, sampled uniformly along the axis
    PowerSeries { exponent: f64, samples: usize },
}

impl NoseProfile {
    /// Power-series profile with the default exponent and sample count
    pub fn power_series() -> Self {
        NoseProfile::PowerSeries {
            exponent: POWER_SERIES_EXPONENT,
            samples: POWER_SERIES_SAMPLES,
        }
    }

    /// Radius at distance `h` from the apex
    pub fn radius_at(&self, h: f64, length: f64, base_radius: f64) -> f64 {
        if length <= 0.0 {
            return base_radius;
        }
        let fraction = (h / length).clamp(0.0, 1.0);
        match self {
            NoseProfile::Conical => base_radius * fraction,
            NoseProfile::PowerSeries { exponent, .. } => base_radius * fraction.powf(*exponent),
        }
    }

    /// Closed half-section in (radius, height) coordinates, base on height 0
    pub fn outline(&self, length: f64, base_radius: f64) -> Profile {
        match self {
            NoseProfile::Conical => Profile::polyline(vec![
                DVec2::ZERO,
                DVec2::new(base_radius, 0.0),
                DVec2::new(0.0, length),
            ]),
            NoseProfile::PowerSeries { samples, .. } => {
                let samples = (*samples).max(1);
                let mut points = Vec::with_capacity(samples + 2);
                points.push(DVec2::ZERO);
                points.extend((0..samples).map(|i| {
                    let z = length * i as f64 / samples as f64;
                    DVec2::new(self.radius_at(length - z, length, base_radius), z)
                }));
                points.push(DVec2::new(0.0, length));
                Profile::spline(points)
            }
        }
    }
}

/// Base radius and height of the void inside a cone
///
/// Both may come out at or below `tolerance`, in which case the cone has no void.
pub fn inner_cone_dimensions(params: &ConeParams, tolerance: f64) -> (f64, f64) {
    let inner_radius = (params.base_radius - params.thickness).max(0.0);
    if params.base_radius <= tolerance || params.length <= tolerance {
        return (inner_radius, params.length);
    }
    let height_difference = params.thickness * params.length / params.base_radius;
    (inner_radius, (params.length - height_difference).max(tolerance))
}

/// Generate a nose cone with its base on `plane` and its apex one length up the normal
pub fn nose_cone(
    kernel: &dyn CadKernel,
    plane: &Workplane,
    params: &ConeParams,
    profile: &NoseProfile,
    tolerance: f64,
) -> CadResult<Solid> {
    let sketch_plane = plane.profile_plane();
    let outer = kernel.revolve(
        &profile.outline(params.length, params.base_radius),
        &sketch_plane,
        FULL_TURN_DEGREES,
    )?;

    if params.thickness <= 0.0 {
        return Ok(outer);
    }

    let (inner_radius, inner_length) = inner_cone_dimensions(params, tolerance);
    if inner_radius <= tolerance || inner_length <= tolerance {
        tracing::debug!(
            "Nose cone wall {} leaves no void inside radius {}; building a solid cone",
            params.thickness,
            params.base_radius
        );
        return Ok(outer);
    }

    let inner = kernel.revolve(
        &profile.outline(inner_length, inner_radius),
        &sketch_plane,
        FULL_TURN_DEGREES,
    )?;
    cut_void(kernel, outer, inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::EPSILON;
    use approx::assert_relative_eq;
    use glam::DVec3;
    use rocket_cad::CsgKernel;

    fn params(thickness: f64) -> ConeParams {
        ConeParams {
            length: 1.0,
            base_radius: 0.5,
            thickness,
        }
    }

    #[test]
    fn test_inner_apex_is_pulled_down_by_the_slope() {
        let (radius, length) = inner_cone_dimensions(&params(0.05), EPSILON);
        assert_relative_eq!(radius, 0.45);
        // 0.05 * 1.0 / 0.5
        assert_relative_eq!(length, 0.9);
    }

    #[test]
    fn test_degenerate_cone_skips_slope_correction() {
        let flat = ConeParams {
            length: 0.0,
            base_radius: 0.5,
            thickness: 0.1,
        };
        assert_eq!(inner_cone_dimensions(&flat, EPSILON), (0.4, 0.0));

        let needle = ConeParams {
            length: 1.0,
            base_radius: 0.0,
            thickness: 0.1,
        };
        assert_eq!(inner_cone_dimensions(&needle, EPSILON), (0.0, 1.0));
    }

    #[test]
    fn test_power_series_outline_samples() {
        let profile = NoseProfile::power_series();
        let outline = profile.outline(2.0, 0.5);
        let points = outline.points();

        // Axis origin, 20 samples, apex
        assert_eq!(points.len(), 22);
        assert_eq!(points[0], DVec2::ZERO);
        assert_eq!(points[1], DVec2::new(0.5, 0.0));
        assert_eq!(points[21], DVec2::new(0.0, 2.0));

        // Halfway up the axis: (1/2)^2 of the base radius
        assert_relative_eq!(points[11].x, 0.125);
        assert_relative_eq!(points[11].y, 1.0);
        assert!(matches!(outline, Profile::Spline(_)));
    }

    #[test]
    fn test_conical_hollow_cone() {
        let kernel = CsgKernel::new();
        let solid = nose_cone(
            &kernel,
            &Workplane::xy(),
            &params(0.05),
            &NoseProfile::Conical,
            EPSILON,
        )
        .unwrap();
        assert_eq!(kernel.solid_count(), 1);

        let bbox = kernel.bounding_box(&solid).unwrap().unwrap();
        assert_eq!(kernel.solid_count(), 1);
        assert_relative_eq!(bbox.height(), 1.0);
        assert_relative_eq!(bbox.max.x, 0.5);

        // Void along the axis up to the inner apex at 0.9, solid tip above it
        assert!(!kernel.contains(&solid, DVec3::new(0.0, 0.0, 0.5)).unwrap());
        assert!(!kernel.contains(&solid, DVec3::new(0.0, 0.0, 0.85)).unwrap());
        assert!(kernel.contains(&solid, DVec3::new(0.0, 0.0, 0.95)).unwrap());

        // Wall near the base: outer radius 0.45, void radius 0.4 at z = 0.1
        assert!(kernel.contains(&solid, DVec3::new(0.43, 0.0, 0.1)).unwrap());
        assert!(!kernel.contains(&solid, DVec3::new(0.0, 0.39, 0.1)).unwrap());
    }

    #[test]
    fn test_power_series_hollow_cone() {
        let kernel = CsgKernel::new();
        let solid = nose_cone(
            &kernel,
            &Workplane::at_height(2.0),
            &params(0.05),
            &NoseProfile::power_series(),
            EPSILON,
        )
        .unwrap();

        let bbox = kernel.bounding_box(&solid).unwrap().unwrap();
        assert_relative_eq!(bbox.min.z, 2.0);
        assert_relative_eq!(bbox.max.z, 3.0);

        // At height 0.5 the outer radius is 0.5 * 0.25 = 0.125
        assert!(kernel.contains(&solid, DVec3::new(0.12, 0.0, 2.5)).unwrap());
        assert!(!kernel.contains(&solid, DVec3::new(0.13, 0.0, 2.5)).unwrap());
        assert!(!kernel.contains(&solid, DVec3::new(0.0, 0.0, 2.2)).unwrap());
    }

    #[test]
    fn test_non_positive_thickness_matches_zero() {
        let kernel = CsgKernel::new();
        for profile in [NoseProfile::Conical, NoseProfile::power_series()] {
            let zero = nose_cone(&kernel, &Workplane::xy(), &params(0.0), &profile, EPSILON)
                .unwrap();
            let negative =
                nose_cone(&kernel, &Workplane::xy(), &params(-0.3), &profile, EPSILON).unwrap();
            assert_eq!(kernel.node(&zero).unwrap(), kernel.node(&negative).unwrap());
            assert_eq!(
                kernel.bounding_box(&zero).unwrap(),
                kernel.bounding_box(&negative).unwrap()
            );
        }
    }

    #[test]
    fn test_wall_thicker_than_base_is_solid() {
        let kernel = CsgKernel::new();
        let solid = nose_cone(
            &kernel,
            &Workplane::xy(),
            &params(0.5),
            &NoseProfile::Conical,
            EPSILON,
        )
        .unwrap();
        assert!(kernel.contains(&solid, DVec3::new(0.0, 0.0, 0.5)).unwrap());
    }
}
