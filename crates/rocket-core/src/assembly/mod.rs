//! Assembly (ordered stack of parts) for the airframe

mod state;

use rocket_cad::{BooleanType, BoundingBox, CadKernel, CadResult, Solid};
use serde::{Deserialize, Serialize};

pub use state::{BodySegment, StackState};

/// Part family of a stacked part
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartKind {
    BodyTube,
    Transition,
    NoseCone,
    FinSet,
}

impl PartKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            PartKind::BodyTube => "body tube",
            PartKind::Transition => "transition",
            PartKind::NoseCone => "nose cone",
            PartKind::FinSet => "fin set",
        }
    }
}

/// A part merged into the assembly
#[derive(Debug, Clone, PartialEq)]
pub struct StackedPart {
    pub kind: PartKind,
    /// Solid of the part alone, before the union
    pub solid: Solid,
    /// `None` for parts that occupy no space (a zero-fin set)
    pub bounds: Option<BoundingBox>,
}

/// Lifecycle of an assembly; parts are never removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyPhase {
    Empty,
    Populated,
}

/// Airframe stacked along +Z
///
/// Assemblies are values: merging returns a new assembly, so a failed kernel
/// call leaves the previous one intact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembly {
    solid: Option<Solid>,
    parts: Vec<StackedPart>,
    state: StackState,
}

impl Assembly {
    /// Create a new empty assembly
    pub fn new() -> Self {
        Self::default()
    }

    /// Union of every merged part, `None` before the first part
    pub fn solid(&self) -> Option<&Solid> {
        self.solid.as_ref()
    }

    /// Parts in the order they were added
    pub fn parts(&self) -> &[StackedPart] {
        &self.parts
    }

    pub fn state(&self) -> &StackState {
        &self.state
    }

    pub fn top_z(&self) -> f64 {
        self.state.top_z
    }

    pub fn last_body(&self) -> Option<&BodySegment> {
        self.state.last_body.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn phase(&self) -> AssemblyPhase {
        if self.is_empty() {
            AssemblyPhase::Empty
        } else {
            AssemblyPhase::Populated
        }
    }

    /// Union `solid` into the assembly
    ///
    /// `next_state` receives the current state and the new top elevation (the
    /// merged solid's maximum z, or the current top if the merge is empty).
    pub fn merge(
        &self,
        kernel: &dyn CadKernel,
        kind: PartKind,
        solid: Solid,
        next_state: impl FnOnce(&StackState, f64) -> StackState,
    ) -> CadResult<Assembly> {
        let bounds = kernel.bounding_box(&solid)?;
        let merged = match &self.solid {
            Some(existing) => kernel.boolean(existing, &solid, BooleanType::Union)?,
            None => solid.clone(),
        };
        let top_z = kernel
            .bounding_box(&merged)?
            .map(|b| b.max.z)
            .unwrap_or(self.state.top_z);

        let mut parts = self.parts.clone();
        parts.push(StackedPart {
            kind,
            solid,
            bounds,
        });

        Ok(Assembly {
            solid: Some(merged),
            parts,
            state: next_state(&self.state, top_z),
        })
    }

    /// This assembly's merged solid, if `next` no longer refers to it
    pub fn superseded_by(&self, next: &Assembly) -> Option<&Solid> {
        let solid = self.solid.as_ref()?;
        let in_use = next.solid.as_ref() == Some(solid)
            || next.parts.iter().any(|part| &part.solid == solid);
        (!in_use).then_some(solid)
    }
}
