//! Shape generators for hollow airframe parts
//!
//! Each generator builds an outer solid and, when the wall leaves room for one,
//! an inner void of the same family, then cuts the void out of the outer solid.
//! Walls too thick for a void degenerate to solid parts instead of failing.

mod cone;
mod fin;
mod transition;
mod tube;

use rocket_cad::{BooleanType, CadKernel, CadResult, Solid};
use serde::{Deserialize, Serialize};

pub use cone::{NoseProfile, inner_cone_dimensions, nose_cone};
pub use fin::{fin, fin_set};
pub use transition::transition;
pub use tube::tube;

/// Hollow cylinder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TubeParams {
    pub length: f64,
    pub outer_radius: f64,
    pub thickness: f64,
}

/// Hollow frustum between two radii
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionParams {
    pub length: f64,
    pub bottom_radius: f64,
    pub top_radius: f64,
    pub thickness: f64,
}

/// Hollow nose cone standing on its base
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConeParams {
    pub length: f64,
    pub base_radius: f64,
    pub thickness: f64,
}

/// Trapezoidal fin planform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinParams {
    /// Chord at the body surface
    pub root_chord: f64,
    /// Chord at the outer edge
    pub tip_chord: f64,
    /// Radial extent from root to tip
    pub span: f64,
    /// Axial offset of the tip trailing edge behind the root trailing edge
    pub sweep: f64,
    pub thickness: f64,
}

/// Fins placed evenly around the stacking axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinSetParams {
    pub count: u32,
    pub fin: FinParams,
    /// Radial distance of every fin root from the axis
    pub attach_radius: f64,
    /// Elevation of the root leading edge
    pub attach_z: f64,
    /// How far each root reaches below `attach_radius` into the body wall
    pub root_depth: f64,
}

/// Cut `inner` out of `outer`, releasing both operands
fn cut_void(kernel: &dyn CadKernel, outer: Solid, inner: Solid) -> CadResult<Solid> {
    let hollow = kernel.boolean(&outer, &inner, BooleanType::Subtract)?;
    kernel.release(&outer)?;
    kernel.release(&inner)?;
    Ok(hollow)
}

fn non_negative(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{} must be a finite value >= 0, got {}", name, value))
    }
}

fn finite(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(format!("{} must be finite, got {}", name, value))
    }
}

impl TubeParams {
    /// Check that every dimension is usable (thickness may be any finite value)
    pub fn validate(&self) -> Result<(), String> {
        non_negative("length", self.length)?;
        non_negative("outer radius", self.outer_radius)?;
        finite("thickness", self.thickness)
    }
}

impl TransitionParams {
    pub fn validate(&self) -> Result<(), String> {
        non_negative("length", self.length)?;
        non_negative("bottom radius", self.bottom_radius)?;
        non_negative("top radius", self.top_radius)?;
        finite("thickness", self.thickness)
    }
}

impl ConeParams {
    pub fn validate(&self) -> Result<(), String> {
        non_negative("length", self.length)?;
        non_negative("base radius", self.base_radius)?;
        finite("thickness", self.thickness)
    }
}

impl FinParams {
    pub fn validate(&self) -> Result<(), String> {
        non_negative("root chord", self.root_chord)?;
        non_negative("tip chord", self.tip_chord)?;
        non_negative("span", self.span)?;
        finite("sweep", self.sweep)?;
        non_negative("thickness", self.thickness)
    }
}
