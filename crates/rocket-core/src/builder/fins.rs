//! Fin set builder

use rocket_cad::CadKernel;
use serde::{Deserialize, Serialize};

use super::{BuildError, BuildResult, PartBuilder, check};
use crate::assembly::{Assembly, PartKind};
use crate::shape::{self, FinParams, FinSetParams};

/// Fin set request relative to the body it attaches to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinSetSpec {
    pub count: u32,
    pub fin: FinParams,
    /// Root leading edge offset above the base of the last body tube
    pub axial_position: f64,
    /// Overrides the last body tube's diameter as the attachment diameter
    pub body_diameter: Option<f64>,
}

impl FinSetSpec {
    pub fn new(count: u32, fin: FinParams) -> Self {
        Self {
            count,
            fin,
            axial_position: 0.0,
            body_diameter: None,
        }
    }

    pub fn at(mut self, axial_position: f64) -> Self {
        self.axial_position = axial_position;
        self
    }

    pub fn with_body_diameter(mut self, diameter: f64) -> Self {
        self.body_diameter = Some(diameter);
        self
    }
}

/// Attaches fins to the surface of the last body tube
///
/// Fins never become the attachment target themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinSetBuilder;

impl FinSetBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the attach radius and root elevation, or fail without a body to attach to
    pub fn placement(&self, assembly: &Assembly, spec: &FinSetSpec) -> BuildResult<(f64, f64)> {
        let attach_radius = match (spec.body_diameter, assembly.last_body()) {
            (Some(diameter), _) => diameter / 2.0,
            (None, Some(body)) => body.radius(),
            (None, None) => return Err(BuildError::MissingAttachmentContext),
        };
        // Without a tube the axial position is measured from the origin
        let attach_z = assembly
            .state()
            .fin_attach_z(spec.axial_position)
            .unwrap_or(spec.axial_position);
        Ok((attach_radius, attach_z))
    }

    /// How far fin roots sink below the attach radius
    ///
    /// Half the fin thickness, so the flat root meets the curved wall over an
    /// area. On the last tube's wall the depth stays within half that wall.
    pub fn root_depth(&self, assembly: &Assembly, spec: &FinSetSpec) -> f64 {
        let depth = spec.fin.thickness / 2.0;
        match (spec.body_diameter, assembly.last_body()) {
            (None, Some(body)) => body
                .hollow_wall()
                .map_or(depth, |wall| depth.min(wall / 2.0)),
            _ => depth,
        }
    }
}

impl PartBuilder for FinSetBuilder {
    type Params = FinSetSpec;

    fn add_part(
        &self,
        kernel: &dyn CadKernel,
        assembly: &Assembly,
        spec: &FinSetSpec,
    ) -> BuildResult<Assembly> {
        check(spec.fin.validate())?;
        if !spec.axial_position.is_finite() {
            return Err(BuildError::InvalidParameter(format!(
                "axial position must be finite, got {}",
                spec.axial_position
            )));
        }
        if let Some(diameter) = spec.body_diameter
            && !(diameter.is_finite() && diameter >= 0.0)
        {
            return Err(BuildError::InvalidParameter(format!(
                "body diameter must be a finite value >= 0, got {}",
                diameter
            )));
        }

        let (attach_radius, attach_z) = self.placement(assembly, spec)?;
        let params = FinSetParams {
            count: spec.count,
            fin: spec.fin,
            attach_radius,
            attach_z,
            root_depth: self.root_depth(assembly, spec),
        };
        let solid = shape::fin_set(kernel, &params)?;
        tracing::debug!(
            "Fin set of {} at r={} z={}",
            spec.count,
            attach_radius,
            attach_z
        );
        Ok(assembly.merge(kernel, PartKind::FinSet, solid, |state, top| {
            state.after_part(top)
        })?)
    }
}
