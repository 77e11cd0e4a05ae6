//! CAD Kernel trait definitions
//!
//! These traits define the interface that all CAD kernels must implement.

use std::path::Path;
use std::str::FromStr;

use glam::{DAffine3, DVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::profile::{Profile, Workplane};

/// Error type for CAD kernel operations
#[derive(Debug, Clone, Error)]
pub enum CadError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Boolean operation failed: {0}")]
    BooleanFailed(String),

    #[error("Kernel not available: {0}")]
    KernelNotAvailable(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("Solid not found: {0}")]
    SolidNotFound(Uuid),

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("File I/O error: {0}")]
    FileIo(String),

    #[error("Export failed: {0}")]
    Export(String),
}

/// Result type for CAD operations
pub type CadResult<T> = Result<T, CadError>;

/// A 3D solid body
///
/// The handle is opaque: geometry lives inside the kernel that created it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Solid {
    /// Unique identifier
    pub id: Uuid,
}

impl Solid {
    /// Create a new solid with the given ID
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

/// Axis definition for rotations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis3D {
    /// Origin point of the axis
    pub origin: DVec3,
    /// Direction of the axis (normalized, zero if degenerate)
    pub direction: DVec3,
}

impl Axis3D {
    /// Create an axis from origin and direction
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// X axis at origin
    pub fn x() -> Self {
        Self::new(DVec3::ZERO, DVec3::X)
    }

    /// Y axis at origin
    pub fn y() -> Self {
        Self::new(DVec3::ZERO, DVec3::Y)
    }

    /// Z axis at origin (the stacking axis)
    pub fn z() -> Self {
        Self::new(DVec3::ZERO, DVec3::Z)
    }

    /// Rigid transform rotating about this axis by `angle` radians
    pub fn rotation(&self, angle: f64) -> DAffine3 {
        DAffine3::from_translation(self.origin)
            * DAffine3::from_axis_angle(self.direction, angle)
            * DAffine3::from_translation(-self.origin)
    }
}

/// Boolean operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BooleanType {
    /// Union (add)
    Union,
    /// Subtraction (cut)
    Subtract,
    /// Intersection (common)
    Intersect,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl BoundingBox {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, `None` for an empty iterator
    pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |bbox, p| {
            Self::new(bbox.min.min(p), bbox.max.max(p))
        }))
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Overlap of both boxes, `None` when they are disjoint
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min.cmple(max).all()).then_some(Self::new(min, max))
    }

    /// The eight corner points
    pub fn corners(&self) -> [DVec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            DVec3::new(a.x, a.y, a.z),
            DVec3::new(b.x, a.y, a.z),
            DVec3::new(a.x, b.y, a.z),
            DVec3::new(b.x, b.y, a.z),
            DVec3::new(a.x, a.y, b.z),
            DVec3::new(b.x, a.y, b.z),
            DVec3::new(a.x, b.y, b.z),
            DVec3::new(b.x, b.y, b.z),
        ]
    }

    /// Box enclosing this box after a rigid transform
    pub fn transformed(&self, transform: &DAffine3) -> BoundingBox {
        let corners = self.corners().map(|c| transform.transform_point3(c));
        // Eight corners are never empty
        Self::from_points(corners).unwrap_or(*self)
    }

    /// Extent along each axis
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }

    /// Extent along the stacking axis
    pub fn height(&self) -> f64 {
        self.max.z - self.min.z
    }

    pub fn center(&self) -> DVec3 {
        (self.min + self.max) * 0.5
    }
}

/// One cross-section of a loft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoftSection {
    pub profile: Profile,
    pub plane: Workplane,
}

impl LoftSection {
    pub fn new(profile: Profile, plane: Workplane) -> Self {
        Self { profile, plane }
    }
}

/// Target format of a solid export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Binary STL triangle mesh
    Stl,
    /// STEP (ISO 10303-21) B-Rep exchange
    Step,
    /// RON document of the kernel's own solid description
    Ron,
}

impl ExportFormat {
    /// Lowercase file extension
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Stl => "stl",
            ExportFormat::Step => "step",
            ExportFormat::Ron => "ron",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ExportFormat::Stl => "STL",
            ExportFormat::Step => "STEP",
            ExportFormat::Ron => "RON",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = CadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stl" => Ok(ExportFormat::Stl),
            "step" | "stp" => Ok(ExportFormat::Step),
            "ron" => Ok(ExportFormat::Ron),
            other => Err(CadError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Options for solid export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Sampling cells along the longest bounding-box axis for mesh output
    pub mesh_resolution: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            mesh_resolution: 160,
        }
    }
}

/// The main CAD kernel trait
///
/// Implementations of this trait provide the actual geometry operations.
/// Every operation returns a new solid; inputs are never modified.
pub trait CadKernel: Send + Sync {
    /// Get the name of this kernel
    fn name(&self) -> &str;

    /// Check if the kernel is available
    fn is_available(&self) -> bool;

    /// Create a solid that occupies no space
    fn create_empty(&self) -> CadResult<Solid>;

    /// Extrude a closed profile along the plane normal
    ///
    /// # Arguments
    /// * `profile` - The 2D profile, in plane coordinates
    /// * `plane` - The sketch plane
    /// * `distance` - The extrusion distance (negative extrudes against the normal)
    fn extrude(&self, profile: &Profile, plane: &Workplane, distance: f64) -> CadResult<Solid>;

    /// Revolve a closed profile about the plane's local Y axis through its origin
    ///
    /// # Arguments
    /// * `profile` - The 2D profile, radius along local X and axial position along local Y
    /// * `plane` - The sketch plane
    /// * `angle` - The rotation angle in degrees
    fn revolve(&self, profile: &Profile, plane: &Workplane, angle: f64) -> CadResult<Solid>;

    /// Loft a solid through the given cross-sections, in order
    fn loft(&self, sections: &[LoftSection]) -> CadResult<Solid>;

    /// Perform a boolean operation on two solids
    ///
    /// # Arguments
    /// * `a` - The first solid
    /// * `b` - The second solid
    /// * `op` - The boolean operation type
    fn boolean(&self, a: &Solid, b: &Solid, op: BooleanType) -> CadResult<Solid>;

    /// Translate a solid by an offset
    fn translate(&self, solid: &Solid, offset: DVec3) -> CadResult<Solid>;

    /// Rotate a solid about an axis
    ///
    /// # Arguments
    /// * `solid` - The solid to rotate
    /// * `axis` - The rotation axis
    /// * `angle` - The rotation angle in degrees
    fn rotate(&self, solid: &Solid, axis: &Axis3D, angle: f64) -> CadResult<Solid>;

    /// Axis-aligned bounds of a solid, `None` if it is empty
    fn bounding_box(&self, solid: &Solid) -> CadResult<Option<BoundingBox>>;

    /// Drop a solid handle the caller no longer needs
    ///
    /// Solids derived from it stay valid.
    fn release(&self, solid: &Solid) -> CadResult<()>;

    /// Export a solid to a file
    ///
    /// # Arguments
    /// * `solid` - The solid to export
    /// * `path` - Output file path
    /// * `format` - Output format
    /// * `options` - Export options
    fn export(
        &self,
        solid: &Solid,
        path: &Path,
        format: ExportFormat,
        options: &ExportOptions,
    ) -> CadResult<()>;
}

/// A null kernel that always returns errors (used when no kernel is available)
#[derive(Debug, Default)]
pub struct NullKernel;

fn unavailable<T>() -> CadResult<T> {
    Err(CadError::KernelNotAvailable("No CAD kernel available".into()))
}

impl CadKernel for NullKernel {
    fn name(&self) -> &str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn create_empty(&self) -> CadResult<Solid> {
        unavailable()
    }

    fn extrude(&self, _profile: &Profile, _plane: &Workplane, _distance: f64) -> CadResult<Solid> {
        unavailable()
    }

    fn revolve(&self, _profile: &Profile, _plane: &Workplane, _angle: f64) -> CadResult<Solid> {
        unavailable()
    }

    fn loft(&self, _sections: &[LoftSection]) -> CadResult<Solid> {
        unavailable()
    }

    fn boolean(&self, _a: &Solid, _b: &Solid, _op: BooleanType) -> CadResult<Solid> {
        unavailable()
    }

    fn translate(&self, _solid: &Solid, _offset: DVec3) -> CadResult<Solid> {
        unavailable()
    }

    fn rotate(&self, _solid: &Solid, _axis: &Axis3D, _angle: f64) -> CadResult<Solid> {
        unavailable()
    }

    fn bounding_box(&self, _solid: &Solid) -> CadResult<Option<BoundingBox>> {
        unavailable()
    }

    fn release(&self, _solid: &Solid) -> CadResult<()> {
        unavailable()
    }

    fn export(
        &self,
        _solid: &Solid,
        _path: &Path,
        _format: ExportFormat,
        _options: &ExportOptions,
    ) -> CadResult<()> {
        Err(CadError::KernelNotAvailable(
            "No CAD kernel available for export".into(),
        ))
    }
}

/// Get the default CAD kernel
pub fn default_kernel() -> Box<dyn CadKernel> {
    Box::new(super::CsgKernel::new())
}
