//! Trapezoidal fins and fin sets

use glam::{DVec2, DVec3};

use rocket_cad::{Axis3D, BooleanType, CadKernel, CadResult, Profile, Solid, Workplane};

use super::{FinParams, FinSetParams};
use crate::constants::FULL_TURN_DEGREES;

/// Generate a single fin with its root on the stacking axis
///
/// The root runs along +Z from the origin, the span points along +X and the
/// thickness is centered on the XZ plane. A positive `root_depth` adds a tab
/// of the full root chord reaching that far behind the root, toward -X.
pub fn fin(kernel: &dyn CadKernel, params: &FinParams, root_depth: f64) -> CadResult<Solid> {
    let trailing_tip = params.root_chord - params.sweep;
    let mut outline = Vec::with_capacity(6);
    if root_depth > 0.0 {
        outline.push(DVec2::new(-root_depth, 0.0));
        outline.push(DVec2::new(-root_depth, params.root_chord));
    }
    outline.extend([
        DVec2::new(0.0, params.root_chord),
        DVec2::new(params.span, trailing_tip),
        DVec2::new(params.span, trailing_tip - params.tip_chord),
        DVec2::new(0.0, 0.0),
    ]);

    let plane = Workplane::xy().offset(-params.thickness / 2.0);
    let flat = kernel.extrude(&Profile::polyline(outline), &plane, params.thickness)?;
    let upright = kernel.rotate(&flat, &Axis3D::x(), 90.0)?;
    kernel.release(&flat)?;
    Ok(upright)
}

/// Generate `count` fins spaced evenly about the stacking axis
///
/// Each root sits `attach_radius` from the axis with its leading edge at
/// `attach_z`, sunk `root_depth` into the body so the flat root meets the
/// curved wall over an area. Zero fins yield an empty solid.
pub fn fin_set(kernel: &dyn CadKernel, params: &FinSetParams) -> CadResult<Solid> {
    let mut result = kernel.create_empty()?;
    if params.count == 0 {
        return Ok(result);
    }

    let single = fin(kernel, &params.fin, params.root_depth)?;
    let placed = kernel.translate(
        &single,
        DVec3::new(params.attach_radius, 0.0, params.attach_z),
    )?;
    kernel.release(&single)?;

    let step = FULL_TURN_DEGREES / params.count as f64;
    for i in 0..params.count {
        let copy = if i == 0 {
            None
        } else {
            Some(kernel.rotate(&placed, &Axis3D::z(), step * i as f64)?)
        };
        let next = kernel.boolean(
            &result,
            copy.as_ref().unwrap_or(&placed),
            BooleanType::Union,
        )?;
        kernel.release(&result)?;
        if let Some(copy) = copy {
            kernel.release(&copy)?;
        }
        result = next;
    }
    kernel.release(&placed)?;

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rocket_cad::CsgKernel;

    fn fin_params() -> FinParams {
        FinParams {
            root_chord: 0.2,
            tip_chord: 0.1,
            span: 0.1,
            sweep: 0.05,
            thickness: 0.01,
        }
    }

    fn set(count: u32) -> FinSetParams {
        FinSetParams {
            count,
            fin: fin_params(),
            attach_radius: 0.18,
            attach_z: 0.3,
            root_depth: 0.0,
        }
    }

    #[test]
    fn test_single_fin_orientation() {
        let kernel = CsgKernel::new();
        let solid = fin(&kernel, &fin_params(), 0.0).unwrap();
        let bbox = kernel.bounding_box(&solid).unwrap().unwrap();

        assert_relative_eq!(bbox.min.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(bbox.max.x, 0.1, epsilon = 1e-12);
        assert_relative_eq!(bbox.min.y, -0.005, epsilon = 1e-12);
        assert_relative_eq!(bbox.max.y, 0.005, epsilon = 1e-12);
        assert_relative_eq!(bbox.min.z, 0.0, epsilon = 1e-12);
        assert_relative_eq!(bbox.max.z, 0.2, epsilon = 1e-12);

        // Tip trailing edge is swept back from the root trailing edge
        assert!(kernel.contains(&solid, DVec3::new(0.095, 0.0, 0.1)).unwrap());
        assert!(!kernel.contains(&solid, DVec3::new(0.095, 0.0, 0.17)).unwrap());
    }

    #[test]
    fn test_zero_fins_is_empty() {
        let kernel = CsgKernel::new();
        let solid = fin_set(&kernel, &set(0)).unwrap();
        assert!(kernel.bounding_box(&solid).unwrap().is_none());
    }

    #[test]
    fn test_four_fins_at_right_angles() {
        let kernel = CsgKernel::new();
        let params = set(4);
        let solid = fin_set(&kernel, &params).unwrap();

        let root_mid_z = params.attach_z + params.fin.root_chord / 2.0;
        // Just outside the root, inside the fin rather than on its face
        let sample_radius = params.attach_radius + 0.01;
        for i in 0..4 {
            let angle = (90.0 * i as f64).to_radians();
            let on_fin = DVec3::new(
                sample_radius * angle.cos(),
                sample_radius * angle.sin(),
                root_mid_z,
            );
            assert!(kernel.contains(&solid, on_fin).unwrap(), "fin {} missing", i);

            let between = (90.0 * i as f64 + 45.0).to_radians();
            let gap = DVec3::new(
                sample_radius * between.cos(),
                sample_radius * between.sin(),
                root_mid_z,
            );
            assert!(!kernel.contains(&solid, gap).unwrap(), "fins overlap near {}", i);
        }

        // Every root starts at the attach radius: nothing of the fin lies inside it
        for i in 0..4 {
            let angle = (90.0 * i as f64).to_radians();
            let direction = DVec3::new(angle.cos(), angle.sin(), 0.0);
            let mid = direction * params.attach_radius + DVec3::Z * root_mid_z;
            let below_root = mid - direction * 0.005;
            assert!(!kernel.contains(&solid, below_root).unwrap());
        }

        let bbox = kernel.bounding_box(&solid).unwrap().unwrap();
        let reach = params.attach_radius + params.fin.span;
        assert_relative_eq!(bbox.max.x, reach, epsilon = 1e-9);
        assert_relative_eq!(bbox.min.x, -reach, epsilon = 1e-9);
        assert_relative_eq!(bbox.max.y, reach, epsilon = 1e-9);
        assert_relative_eq!(bbox.min.y, -reach, epsilon = 1e-9);
        assert_relative_eq!(bbox.min.z, 0.3, epsilon = 1e-9);
        assert_relative_eq!(bbox.max.z, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_root_tab_sinks_into_the_body() {
        let kernel = CsgKernel::new();
        let params = FinSetParams {
            root_depth: 0.004,
            ..set(4)
        };
        let solid = fin_set(&kernel, &params).unwrap();

        let root_mid_z = params.attach_z + params.fin.root_chord / 2.0;
        let inside_wall = params.attach_radius - params.root_depth / 2.0;
        assert!(kernel.contains(&solid, DVec3::new(inside_wall, 0.0, root_mid_z)).unwrap());
        assert!(kernel.contains(&solid, DVec3::new(0.0, -inside_wall, root_mid_z)).unwrap());
        let past_tab = params.attach_radius - params.root_depth - 0.001;
        assert!(!kernel.contains(&solid, DVec3::new(past_tab, 0.0, root_mid_z)).unwrap());

        // The tab spans the whole root chord and leaves the tip reach alone
        let bbox = kernel.bounding_box(&solid).unwrap().unwrap();
        assert_relative_eq!(bbox.max.x, params.attach_radius + params.fin.span, epsilon = 1e-9);
        assert_relative_eq!(bbox.min.z, 0.3, epsilon = 1e-9);
        assert_relative_eq!(bbox.max.z, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_fin_set_keeps_only_the_result() {
        let kernel = CsgKernel::new();
        let solid = fin_set(&kernel, &set(4)).unwrap();
        assert_eq!(kernel.solid_count(), 1);
        assert!(kernel.bounding_box(&solid).unwrap().is_some());
    }

    #[test]
    fn test_three_fins_leave_gaps() {
        let kernel = CsgKernel::new();
        let solid = fin_set(&kernel, &set(3)).unwrap();
        let z = 0.4;
        let r = 0.19;
        for degrees in [0.0_f64, 120.0, 240.0] {
            let a = degrees.to_radians();
            assert!(kernel.contains(&solid, DVec3::new(r * a.cos(), r * a.sin(), z)).unwrap());
        }
        let a = 60.0_f64.to_radians();
        assert!(!kernel.contains(&solid, DVec3::new(r * a.cos(), r * a.sin(), z)).unwrap());
    }
}
