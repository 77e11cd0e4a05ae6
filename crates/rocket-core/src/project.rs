//! Rocket project: builds an airframe part by part and exports it

use std::path::{Path, PathBuf};

use rocket_cad::{BoundingBox, CadError, CadKernel, ExportFormat, default_kernel};

use crate::assembly::{Assembly, PartKind};
use crate::builder::{
    BodyTubeBuilder, BuildError, BuildResult, FinSetBuilder, FinSetSpec, NoseConeBuilder,
    PartBuilder, TransitionBuilder,
};
use crate::config::RocketConfig;
use crate::shape::{ConeParams, TransitionParams, TubeParams};

/// Project-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProjectError {
    #[error("Build error: {0}")]
    Build(#[from] BuildError),
    #[error("Kernel error: {0}")]
    Kernel(#[from] CadError),
    #[error("Export error: {0}")]
    Export(CadError),
}

pub type ProjectResult<T> = Result<T, ProjectError>;

/// A named airframe under construction
///
/// Dimensions passed to the `add_*` operations are diameters; the shape
/// generators work in radii. A failed operation leaves the assembly as it was.
pub struct RocketProject {
    name: String,
    kernel: Box<dyn CadKernel>,
    config: RocketConfig,
    assembly: Assembly,
    tubes: BodyTubeBuilder,
    transitions: TransitionBuilder,
    nose_cones: NoseConeBuilder,
    fins: FinSetBuilder,
}

impl RocketProject {
    pub fn new(name: impl Into<String>, kernel: Box<dyn CadKernel>, config: RocketConfig) -> Self {
        Self {
            name: name.into(),
            tubes: BodyTubeBuilder::new(config.tolerance),
            transitions: TransitionBuilder::new(config.tolerance),
            nose_cones: NoseConeBuilder::new(config.tolerance, config.nose_profile),
            fins: FinSetBuilder::new(),
            kernel,
            config,
            assembly: Assembly::new(),
        }
    }

    /// Project on the built-in kernel with default settings
    pub fn with_default_kernel(name: impl Into<String>) -> Self {
        Self::new(name, default_kernel(), RocketConfig::default())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &RocketConfig {
        &self.config
    }

    pub fn kernel(&self) -> &dyn CadKernel {
        self.kernel.as_ref()
    }

    pub fn assembly(&self) -> &Assembly {
        &self.assembly
    }

    // ============== Parts ==============

    pub fn add_body_tube(
        &mut self,
        length: f64,
        diameter: f64,
        thickness: f64,
    ) -> ProjectResult<&Assembly> {
        let params = TubeParams {
            length,
            outer_radius: diameter / 2.0,
            thickness,
        };
        let next = self
            .tubes
            .add_part(self.kernel.as_ref(), &self.assembly, &params);
        self.commit(PartKind::BodyTube, next)
    }

    /// Stack a transition between two body diameters
    ///
    /// When only `top_diameter` matches the face it stands on, the part is
    /// flipped so the stack stays connected.
    pub fn add_transition(
        &mut self,
        length: f64,
        bottom_diameter: f64,
        top_diameter: f64,
        thickness: f64,
    ) -> ProjectResult<&Assembly> {
        let params = TransitionParams {
            length,
            bottom_radius: bottom_diameter / 2.0,
            top_radius: top_diameter / 2.0,
            thickness,
        };
        let next = self
            .transitions
            .add_part(self.kernel.as_ref(), &self.assembly, &params);
        self.commit(PartKind::Transition, next)
    }

    pub fn add_nose_cone(
        &mut self,
        length: f64,
        diameter: f64,
        thickness: f64,
    ) -> ProjectResult<&Assembly> {
        let params = ConeParams {
            length,
            base_radius: diameter / 2.0,
            thickness,
        };
        let next = self
            .nose_cones
            .add_part(self.kernel.as_ref(), &self.assembly, &params);
        self.commit(PartKind::NoseCone, next)
    }

    pub fn add_fin_set(&mut self, spec: FinSetSpec) -> ProjectResult<&Assembly> {
        let next = self
            .fins
            .add_part(self.kernel.as_ref(), &self.assembly, &spec);
        self.commit(PartKind::FinSet, next)
    }

    fn commit(
        &mut self,
        kind: PartKind,
        next: BuildResult<Assembly>,
    ) -> ProjectResult<&Assembly> {
        match next {
            Ok(assembly) => {
                let stale = self.assembly.superseded_by(&assembly).cloned();
                self.assembly = assembly;
                if let Some(stale) = stale
                    && let Err(e) = self.kernel.release(&stale)
                {
                    tracing::warn!("Could not release superseded solid of {}: {}", self.name, e);
                }
                tracing::debug!(
                    "Added {} to {}; top at z={}",
                    kind.display_name(),
                    self.name,
                    self.assembly.top_z()
                );
                Ok(&self.assembly)
            }
            Err(e) => {
                tracing::warn!(
                    "Could not add {} to {}: {}",
                    kind.display_name(),
                    self.name,
                    e
                );
                Err(e.into())
            }
        }
    }

    // ============== Queries ==============

    /// Bounds of the whole airframe, `None` while nothing occupies space
    pub fn bounding_box(&self) -> ProjectResult<Option<BoundingBox>> {
        match self.assembly.solid() {
            Some(solid) => Ok(self.kernel.bounding_box(solid)?),
            None => Ok(None),
        }
    }

    /// Axial extent of the airframe
    pub fn height(&self) -> ProjectResult<f64> {
        Ok(self.bounding_box()?.map(|b| b.height()).unwrap_or(0.0))
    }

    // ============== Export ==============

    /// Write the airframe to `path`; an empty project writes an empty model
    pub fn export(&self, path: impl AsRef<Path>, format: &str) -> ProjectResult<()> {
        let format: ExportFormat = format.parse().map_err(ProjectError::Export)?;
        let path = path.as_ref();
        let solid = match self.assembly.solid() {
            Some(solid) => solid.clone(),
            None => self.kernel.create_empty().map_err(ProjectError::Export)?,
        };
        self.kernel
            .export(&solid, path, format, &self.config.export)
            .map_err(ProjectError::Export)?;
        tracing::info!(
            "Exported {} as {} to {}",
            self.name,
            format.name(),
            path.display()
        );
        Ok(())
    }

    /// Write the airframe to `<folder>/<name>.<format>` and return that path
    pub fn export_to_folder(
        &self,
        folder: impl AsRef<Path>,
        format: &str,
    ) -> ProjectResult<PathBuf> {
        let path = folder
            .as_ref()
            .join(format!("{}.{}", self.name, format.trim().to_lowercase()));
        self.export(&path, format)?;
        Ok(path)
    }
}
