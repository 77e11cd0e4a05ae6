//! Builders for the axially-stacked body parts

use rocket_cad::CadKernel;

use super::{BuildResult, PartBuilder, check, locate_top_face};
use crate::assembly::{Assembly, PartKind};
use crate::constants::EPSILON;
use crate::shape::{self, ConeParams, NoseProfile, TransitionParams, TubeParams};

/// Stacks body tubes and records them as the fin attachment target
#[derive(Debug, Clone, Copy)]
pub struct BodyTubeBuilder {
    pub tolerance: f64,
}

impl BodyTubeBuilder {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl Default for BodyTubeBuilder {
    fn default() -> Self {
        Self::new(EPSILON)
    }
}

impl PartBuilder for BodyTubeBuilder {
    type Params = TubeParams;

    fn add_part(
        &self,
        kernel: &dyn CadKernel,
        assembly: &Assembly,
        params: &TubeParams,
    ) -> BuildResult<Assembly> {
        check(params.validate())?;
        let plane = locate_top_face(assembly);
        let solid = shape::tube(kernel, &plane, params, self.tolerance)?;
        tracing::debug!(
            "Body tube r={} l={} t={} at z={}",
            params.outer_radius,
            params.length,
            params.thickness,
            plane.origin.z
        );
        Ok(assembly.merge(kernel, PartKind::BodyTube, solid, |state, top| {
            state.after_tube(params, top)
        })?)
    }
}

/// Stacks transitions; the last body tube stays the fin attachment target
#[derive(Debug, Clone, Copy)]
pub struct TransitionBuilder {
    pub tolerance: f64,
}

impl TransitionBuilder {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Put the end that matches the stack's top face at the bottom
    ///
    /// The ends are swapped only when the top end fits that face and the bottom
    /// end does not. Any other mismatch is logged and built as requested.
    pub fn oriented(&self, assembly: &Assembly, params: &TransitionParams) -> TransitionParams {
        let Some(diameter) = assembly.state().top_diameter else {
            return *params;
        };
        let face_radius = diameter / 2.0;
        let fits = |radius: f64| (radius - face_radius).abs() <= self.tolerance;
        if fits(params.bottom_radius) {
            return *params;
        }
        if fits(params.top_radius) {
            tracing::warn!(
                "Transition radius {} matches the stack top r={} only at its upper end; flipping it",
                params.top_radius,
                face_radius
            );
            return TransitionParams {
                bottom_radius: params.top_radius,
                top_radius: params.bottom_radius,
                ..*params
            };
        }
        tracing::warn!(
            "Transition radii {}..{} do not meet the stack top r={}",
            params.bottom_radius,
            params.top_radius,
            face_radius
        );
        *params
    }
}

impl Default for TransitionBuilder {
    fn default() -> Self {
        Self::new(EPSILON)
    }
}

impl PartBuilder for TransitionBuilder {
    type Params = TransitionParams;

    fn add_part(
        &self,
        kernel: &dyn CadKernel,
        assembly: &Assembly,
        params: &TransitionParams,
    ) -> BuildResult<Assembly> {
        check(params.validate())?;
        let params = self.oriented(assembly, params);
        let plane = locate_top_face(assembly);
        let solid = shape::transition(kernel, &plane, &params, self.tolerance)?;
        tracing::debug!(
            "Transition r={}..{} l={} at z={}",
            params.bottom_radius,
            params.top_radius,
            params.length,
            plane.origin.z
        );
        Ok(assembly.merge(kernel, PartKind::Transition, solid, |state, top| {
            state.after_transition(&params, top)
        })?)
    }
}

/// Stacks nose cones with a configurable outline
#[derive(Debug, Clone, Copy)]
pub struct NoseConeBuilder {
    pub tolerance: f64,
    pub profile: NoseProfile,
}

impl NoseConeBuilder {
    pub fn new(tolerance: f64, profile: NoseProfile) -> Self {
        Self { tolerance, profile }
    }
}

impl Default for NoseConeBuilder {
    fn default() -> Self {
        Self::new(EPSILON, NoseProfile::default())
    }
}

impl PartBuilder for NoseConeBuilder {
    type Params = ConeParams;

    fn add_part(
        &self,
        kernel: &dyn CadKernel,
        assembly: &Assembly,
        params: &ConeParams,
    ) -> BuildResult<Assembly> {
        check(params.validate())?;
        let plane = locate_top_face(assembly);
        let solid = shape::nose_cone(kernel, &plane, params, &self.profile, self.tolerance)?;
        tracing::debug!(
            "Nose cone {:?} r={} l={} at z={}",
            self.profile,
            params.base_radius,
            params.length,
            plane.origin.z
        );
        Ok(assembly.merge(kernel, PartKind::NoseCone, solid, |state, top| {
            state.after_cone(top)
        })?)
    }
}
