//! Implicit CSG Kernel Backend
//!
//! Pure Rust kernel that keeps every solid as a constructive tree and answers
//! geometric queries by exact point classification against the tree.
//!
//! Note: splines are approximated by their sample polyline. Bounding boxes are
//! exact for primitives and conservative after subtraction or arbitrary rotation.
//! Booleans and transforms share their operand trees instead of copying them.

use std::collections::HashMap;
use std::f64::consts::TAU;
use std::path::Path;
use std::sync::Arc;

use glam::{DAffine3, DVec2, DVec3};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profile::{Profile, Workplane};
use super::{
    Axis3D, BooleanType, BoundingBox, CadError, CadKernel, CadResult, ExportFormat,
    ExportOptions, LoftSection, Solid,
};

/// Default geometric tolerance of the kernel
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// A node of a constructive solid tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CsgNode {
    /// Occupies no space
    Empty,
    /// Profile swept along the plane normal
    Extrusion {
        profile: Profile,
        plane: Workplane,
        distance: f64,
    },
    /// Profile revolved about the plane's local Y axis
    Revolution {
        profile: Profile,
        plane: Workplane,
        /// Sweep angle in radians
        angle: f64,
    },
    /// Loft between two coaxial circles
    Frustum {
        base: DVec3,
        axis: DVec3,
        length: f64,
        bottom_radius: f64,
        top_radius: f64,
    },
    Boolean {
        op: BooleanType,
        lhs: Arc<CsgNode>,
        rhs: Arc<CsgNode>,
    },
    Transformed {
        transform: DAffine3,
        inverse: DAffine3,
        node: Arc<CsgNode>,
    },
}

impl CsgNode {
    pub fn is_empty(&self) -> bool {
        matches!(self, CsgNode::Empty)
    }

    /// Whether the point lies inside or on the boundary of the solid
    pub fn contains(&self, p: DVec3) -> bool {
        match self {
            CsgNode::Empty => false,
            CsgNode::Extrusion {
                profile,
                plane,
                distance,
            } => {
                let local = plane.to_local(p);
                let (lo, hi) = if *distance >= 0.0 {
                    (0.0, *distance)
                } else {
                    (*distance, 0.0)
                };
                local.z >= lo && local.z <= hi && profile.contains(DVec2::new(local.x, local.y))
            }
            CsgNode::Revolution {
                profile,
                plane,
                angle,
            } => {
                let local = plane.to_local(p);
                if *angle < TAU {
                    let theta = (-local.z).atan2(local.x).rem_euclid(TAU);
                    if theta > *angle {
                        return false;
                    }
                }
                let radial = local.x.hypot(local.z);
                profile.contains(DVec2::new(radial, local.y))
            }
            CsgNode::Frustum {
                base,
                axis,
                length,
                bottom_radius,
                top_radius,
            } => {
                let d = p - *base;
                let t = d.dot(*axis);
                if t < 0.0 || t > *length {
                    return false;
                }
                let radius = bottom_radius + (top_radius - bottom_radius) * t / length;
                (d - *axis * t).length() <= radius
            }
            CsgNode::Boolean { op, lhs, rhs } => match op {
                BooleanType::Union => lhs.contains(p) || rhs.contains(p),
                BooleanType::Subtract => lhs.contains(p) && !rhs.contains(p),
                BooleanType::Intersect => lhs.contains(p) && rhs.contains(p),
            },
            CsgNode::Transformed { inverse, node, .. } => {
                node.contains(inverse.transform_point3(p))
            }
        }
    }

    /// Axis-aligned bounds, `None` for solids that occupy no space
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match self {
            CsgNode::Empty => None,
            CsgNode::Extrusion {
                profile,
                plane,
                distance,
            } => {
                let base = planar_bounds(profile, plane)?;
                let shift = plane.normal * *distance;
                Some(base.union(&BoundingBox::new(base.min + shift, base.max + shift)))
            }
            CsgNode::Revolution { profile, plane, .. } => {
                let axis = plane.y_dir();
                let spread = (DVec3::ONE - axis * axis).max(DVec3::ZERO).map(f64::sqrt);
                let rings = profile_samples(profile).into_iter().map(|s| {
                    let center = plane.origin + axis * s.y;
                    let extent = spread * s.x.abs();
                    BoundingBox::new(center - extent, center + extent)
                });
                rings.reduce(|a, b| a.union(&b))
            }
            CsgNode::Frustum {
                base,
                axis,
                length,
                bottom_radius,
                top_radius,
            } => {
                let spread = (DVec3::ONE - *axis * *axis).max(DVec3::ZERO).map(f64::sqrt);
                let top = *base + *axis * *length;
                let bottom_ext = spread * *bottom_radius;
                let top_ext = spread * *top_radius;
                Some(
                    BoundingBox::new(*base - bottom_ext, *base + bottom_ext)
                        .union(&BoundingBox::new(top - top_ext, top + top_ext)),
                )
            }
            CsgNode::Boolean { op, lhs, rhs } => match op {
                BooleanType::Union => match (lhs.bounding_box(), rhs.bounding_box()) {
                    (Some(a), Some(b)) => Some(a.union(&b)),
                    (a, b) => a.or(b),
                },
                BooleanType::Subtract => lhs.bounding_box(),
                BooleanType::Intersect => lhs.bounding_box()?.intersection(&rhs.bounding_box()?),
            },
            CsgNode::Transformed {
                transform, node, ..
            } => node.bounding_box().map(|b| b.transformed(transform)),
        }
    }

    /// Volume estimate by sampling cell centers of a regular grid over the bounds
    pub fn volume(&self, resolution: u32) -> f64 {
        let Some(bbox) = self.bounding_box() else {
            return 0.0;
        };
        let grid = SampleGrid::new(&bbox, resolution);
        let inside = grid.cells().filter(|(_, center)| self.contains(*center)).count();
        inside as f64 * grid.cell_volume()
    }

    /// Smallest extent of any primitive in the tree
    ///
    /// Walls left by subtraction are not measured; only the primitives themselves.
    pub fn min_feature(&self) -> Option<f64> {
        let extent = |profile: &Profile| {
            profile
                .bounds()
                .map(|(min, max)| (max - min).min_element())
        };
        match self {
            CsgNode::Empty => None,
            CsgNode::Extrusion {
                profile, distance, ..
            } => extent(profile).map(|e| e.min(distance.abs())),
            CsgNode::Revolution { profile, .. } => extent(profile),
            CsgNode::Frustum {
                length,
                bottom_radius,
                top_radius,
                ..
            } => Some(length.min(2.0 * bottom_radius.max(*top_radius))),
            CsgNode::Boolean { lhs, rhs, .. } => match (lhs.min_feature(), rhs.min_feature()) {
                (Some(a), Some(b)) => Some(a.min(b)),
                (a, b) => a.or(b),
            },
            // Rigid motions keep sizes
            CsgNode::Transformed { node, .. } => node.min_feature(),
        }
    }

    fn combine(op: BooleanType, lhs: Arc<CsgNode>, rhs: Arc<CsgNode>) -> Arc<CsgNode> {
        match (op, lhs.is_empty(), rhs.is_empty()) {
            (BooleanType::Union, true, _) => rhs,
            (BooleanType::Union, _, true) | (BooleanType::Subtract, _, true) => lhs,
            (BooleanType::Subtract, true, _) | (BooleanType::Intersect, true, _) => {
                Arc::new(CsgNode::Empty)
            }
            (BooleanType::Intersect, _, true) => Arc::new(CsgNode::Empty),
            _ => Arc::new(CsgNode::Boolean { op, lhs, rhs }),
        }
    }

    fn transform(node: &Arc<CsgNode>, t: DAffine3) -> Arc<CsgNode> {
        match &**node {
            CsgNode::Empty => Arc::clone(node),
            CsgNode::Transformed {
                transform,
                inverse,
                node,
            } => Arc::new(CsgNode::Transformed {
                transform: t * *transform,
                inverse: *inverse * t.inverse(),
                node: Arc::clone(node),
            }),
            _ => Arc::new(CsgNode::Transformed {
                transform: t,
                inverse: t.inverse(),
                node: Arc::clone(node),
            }),
        }
    }
}

/// Points that bound a profile: vertices, or the box corners of a circle
fn profile_samples(profile: &Profile) -> Vec<DVec2> {
    match profile {
        Profile::Circle { center, radius } => {
            let r = radius.abs();
            vec![
                *center + DVec2::new(-r, -r),
                *center + DVec2::new(r, -r),
                *center + DVec2::new(r, r),
                *center + DVec2::new(-r, r),
            ]
        }
        Profile::Polyline(points) | Profile::Spline(points) => points.clone(),
    }
}

/// World bounds of a profile lying in its plane
fn planar_bounds(profile: &Profile, plane: &Workplane) -> Option<BoundingBox> {
    match profile {
        Profile::Circle { center, radius } => {
            let (u, v) = (plane.x_dir, plane.y_dir());
            let c = plane.to_world(*center);
            let extent = (u * u + v * v).map(f64::sqrt) * radius.abs();
            Some(BoundingBox::new(c - extent, c + extent))
        }
        Profile::Polyline(points) | Profile::Spline(points) => {
            BoundingBox::from_points(points.iter().map(|p| plane.to_world(*p)))
        }
    }
}

/// Regular grid of cells covering a bounding box
pub(super) struct SampleGrid {
    pub origin: DVec3,
    pub cell: DVec3,
    pub dims: [usize; 3],
}

impl SampleGrid {
    /// `resolution` cells along the longest axis, proportionally fewer on the others
    pub fn new(bbox: &BoundingBox, resolution: u32) -> Self {
        let size = bbox.size();
        let longest = size.max_element();
        let resolution = resolution.max(1) as f64;
        let dims = size.to_array().map(|extent| {
            if longest > 0.0 {
                ((extent / longest) * resolution).ceil().max(1.0) as usize
            } else {
                1
            }
        });
        let cell = size / DVec3::new(dims[0] as f64, dims[1] as f64, dims[2] as f64);
        Self {
            origin: bbox.min,
            cell,
            dims,
        }
    }

    pub fn cell_volume(&self) -> f64 {
        self.cell.x * self.cell.y * self.cell.z
    }

    pub fn len(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        (k * self.dims[1] + j) * self.dims[0] + i
    }

    pub fn corner(&self, i: usize, j: usize, k: usize) -> DVec3 {
        self.origin + self.cell * DVec3::new(i as f64, j as f64, k as f64)
    }

    /// Every cell as ([i, j, k], center point), in index order
    pub fn cells(&self) -> impl Iterator<Item = ([usize; 3], DVec3)> + '_ {
        let [nx, ny, nz] = self.dims;
        (0..nz).flat_map(move |k| {
            (0..ny).flat_map(move |j| {
                (0..nx).map(move |i| ([i, j, k], self.corner(i, j, k) + self.cell * 0.5))
            })
        })
    }
}

/// Implicit CSG kernel
pub struct CsgKernel {
    /// Storage for solid trees (keyed by UUID)
    solids: Mutex<HashMap<Uuid, Arc<CsgNode>>>,
    tolerance: f64,
}

impl CsgKernel {
    /// Create a new CSG kernel
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_TOLERANCE)
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            solids: Mutex::new(HashMap::new()),
            tolerance,
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Store a tree and return a Solid reference
    fn store(&self, node: Arc<CsgNode>) -> Solid {
        let id = Uuid::new_v4();
        self.solids.lock().insert(id, node);
        Solid::new(id)
    }

    /// Shared tree behind a solid handle
    fn shared(&self, solid: &Solid) -> CadResult<Arc<CsgNode>> {
        self.solids
            .lock()
            .get(&solid.id)
            .cloned()
            .ok_or(CadError::SolidNotFound(solid.id))
    }

    /// Root node behind a solid handle; children stay shared
    pub fn node(&self, solid: &Solid) -> CadResult<CsgNode> {
        Ok(CsgNode::clone(&*self.shared(solid)?))
    }

    /// Whether a world point lies inside the solid
    pub fn contains(&self, solid: &Solid, point: DVec3) -> CadResult<bool> {
        Ok(self.shared(solid)?.contains(point))
    }

    /// Sampled volume of the solid (`resolution` cells along its longest axis)
    pub fn volume(&self, solid: &Solid, resolution: u32) -> CadResult<f64> {
        Ok(self.shared(solid)?.volume(resolution))
    }

    /// Number of solids currently held
    pub fn solid_count(&self) -> usize {
        self.solids.lock().len()
    }

    fn validate_profile(&self, profile: &Profile) -> CadResult<()> {
        match profile {
            Profile::Circle { radius, .. } if *radius <= self.tolerance => Err(
                CadError::InvalidProfile(format!("Circle radius {} is not positive", radius)),
            ),
            Profile::Circle { .. } => Ok(()),
            Profile::Polyline(points) | Profile::Spline(points) => {
                if points.len() < 3 {
                    return Err(CadError::InvalidProfile(
                        "Profile must have at least 3 points".into(),
                    ));
                }
                if profile.area() <= self.tolerance {
                    return Err(CadError::InvalidProfile("Profile has zero area".into()));
                }
                Ok(())
            }
        }
    }

    /// Radius and world center of a circular loft section
    fn circle_section(&self, section: &LoftSection) -> CadResult<(DVec3, f64)> {
        match section.profile {
            Profile::Circle { center, radius } if radius >= 0.0 => {
                Ok((section.plane.to_world(center), radius))
            }
            Profile::Circle { radius, .. } => Err(CadError::InvalidProfile(format!(
                "Loft section radius {} is negative",
                radius
            ))),
            _ => Err(CadError::OperationFailed(
                "CSG loft supports circular sections only".into(),
            )),
        }
    }
}

impl Default for CsgKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl CadKernel for CsgKernel {
    fn name(&self) -> &str {
        "csg"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn create_empty(&self) -> CadResult<Solid> {
        Ok(self.store(Arc::new(CsgNode::Empty)))
    }

    fn extrude(&self, profile: &Profile, plane: &Workplane, distance: f64) -> CadResult<Solid> {
        self.validate_profile(profile)?;
        if distance.abs() <= self.tolerance {
            return Err(CadError::InvalidProfile(format!(
                "Extrusion distance {} is zero",
                distance
            )));
        }

        Ok(self.store(Arc::new(CsgNode::Extrusion {
            profile: profile.clone(),
            plane: *plane,
            distance,
        })))
    }

    fn revolve(&self, profile: &Profile, plane: &Workplane, angle: f64) -> CadResult<Solid> {
        self.validate_profile(profile)?;
        if angle.abs() <= self.tolerance {
            return Err(CadError::InvalidProfile("Revolve angle is zero".into()));
        }
        let (min, _) = profile
            .bounds()
            .ok_or_else(|| CadError::InvalidProfile("Profile is empty".into()))?;
        if min.x < -self.tolerance {
            return Err(CadError::InvalidProfile(
                "Profile crosses the revolve axis".into(),
            ));
        }

        // Negative sweeps cover the same region as their positive complement
        let radians = angle.to_radians();
        let angle = if radians.abs() >= TAU {
            TAU
        } else {
            radians.rem_euclid(TAU)
        };
        Ok(self.store(Arc::new(CsgNode::Revolution {
            profile: profile.clone(),
            plane: *plane,
            angle,
        })))
    }

    fn loft(&self, sections: &[LoftSection]) -> CadResult<Solid> {
        let [bottom, top] = sections else {
            return Err(CadError::OperationFailed(format!(
                "CSG loft supports exactly two sections, got {}",
                sections.len()
            )));
        };

        let (base, bottom_radius) = self.circle_section(bottom)?;
        let (apex, top_radius) = self.circle_section(top)?;
        let span = apex - base;
        let length = span.length();
        if length <= self.tolerance {
            return Err(CadError::InvalidProfile("Loft sections coincide".into()));
        }
        if bottom_radius <= self.tolerance && top_radius <= self.tolerance {
            return Err(CadError::InvalidProfile("Loft sections have zero area".into()));
        }

        let axis = span / length;
        let aligned = |plane: &Workplane| axis.dot(plane.normal).abs() >= 1.0 - 1e-9;
        if !aligned(&bottom.plane) || !aligned(&top.plane) {
            return Err(CadError::OperationFailed(
                "Loft sections must be parallel and coaxial".into(),
            ));
        }

        Ok(self.store(Arc::new(CsgNode::Frustum {
            base,
            axis,
            length,
            bottom_radius,
            top_radius,
        })))
    }

    fn boolean(&self, a: &Solid, b: &Solid, op: BooleanType) -> CadResult<Solid> {
        let lhs = self.shared(a)?;
        let rhs = self.shared(b)?;
        Ok(self.store(CsgNode::combine(op, lhs, rhs)))
    }

    fn translate(&self, solid: &Solid, offset: DVec3) -> CadResult<Solid> {
        let node = self.shared(solid)?;
        Ok(self.store(CsgNode::transform(
            &node,
            DAffine3::from_translation(offset),
        )))
    }

    fn rotate(&self, solid: &Solid, axis: &Axis3D, angle: f64) -> CadResult<Solid> {
        if axis.direction.length_squared() <= self.tolerance {
            return Err(CadError::OperationFailed(
                "Rotation axis has no direction".into(),
            ));
        }
        let axis = Axis3D::new(axis.origin, axis.direction);
        let node = self.shared(solid)?;
        Ok(self.store(CsgNode::transform(
            &node,
            axis.rotation(angle.to_radians()),
        )))
    }

    fn bounding_box(&self, solid: &Solid) -> CadResult<Option<BoundingBox>> {
        Ok(self.shared(solid)?.bounding_box())
    }

    fn release(&self, solid: &Solid) -> CadResult<()> {
        self.solids
            .lock()
            .remove(&solid.id)
            .map(|_| ())
            .ok_or(CadError::SolidNotFound(solid.id))
    }

    fn export(
        &self,
        solid: &Solid,
        path: &Path,
        format: ExportFormat,
        options: &ExportOptions,
    ) -> CadResult<()> {
        let node = self.shared(solid)?;
        match format {
            ExportFormat::Stl => {
                let triangles = super::stl::write_voxel_stl(&node, path, options.mesh_resolution)?;
                tracing::info!(
                    "Exported STL with {} triangles to {}",
                    triangles,
                    path.display()
                );
            }
            ExportFormat::Ron => {
                let content = ron::ser::to_string_pretty(&*node, ron::ser::PrettyConfig::default())
                    .map_err(|e| CadError::Export(e.to_string()))?;
                std::fs::write(path, content).map_err(|e| CadError::FileIo(e.to_string()))?;
                tracing::info!("Exported CSG tree to {}", path.display());
            }
            ExportFormat::Step => {
                return Err(CadError::UnsupportedFormat(
                    "STEP export requires a B-Rep kernel; the CSG kernel writes STL and RON"
                        .into(),
                ));
            }
        }
        Ok(())
    }
}
