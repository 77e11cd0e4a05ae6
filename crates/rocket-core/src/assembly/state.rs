//! Positional bookkeeping for the part stack

use serde::{Deserialize, Serialize};

use crate::shape::{TransitionParams, TubeParams};

/// The most recently added body tube
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodySegment {
    /// Outer diameter
    pub diameter: f64,
    /// Elevation of the stack top right after the tube was added
    pub top_z: f64,
    /// Tube length
    pub height: f64,
    /// Wall thickness as requested; hollow only when between zero and the radius
    pub wall: f64,
}

impl BodySegment {
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }

    /// Elevation of the tube's base
    pub fn base_z(&self) -> f64 {
        self.top_z - self.height
    }

    /// Wall thickness of a hollow tube, `None` for a solid rod
    pub fn hollow_wall(&self) -> Option<f64> {
        (self.wall > 0.0 && self.wall < self.radius()).then_some(self.wall)
    }
}

/// Top-of-stack elevation and attachment data for later parts
///
/// Transitions are pure: each returns the next state and leaves `self` alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StackState {
    /// Highest z reached by any part merged so far
    pub top_z: f64,
    /// Only body tubes set this
    pub last_body: Option<BodySegment>,
    /// Outer diameter of the face at `top_z`, `None` on an empty stack or a pointed top
    pub top_diameter: Option<f64>,
}

impl StackState {
    /// State after a body tube whose addition raised the stack top to `top_z`
    pub fn after_tube(&self, params: &TubeParams, top_z: f64) -> Self {
        Self {
            top_z,
            last_body: Some(BodySegment {
                diameter: 2.0 * params.outer_radius,
                top_z,
                height: params.length,
                wall: params.thickness,
            }),
            top_diameter: Some(2.0 * params.outer_radius),
        }
    }

    /// State after a transition whose top face is now the stack top
    pub fn after_transition(&self, params: &TransitionParams, top_z: f64) -> Self {
        Self {
            top_z,
            last_body: self.last_body,
            top_diameter: Some(2.0 * params.top_radius),
        }
    }

    /// State after a nose cone; its apex leaves no face to stack on
    pub fn after_cone(&self, top_z: f64) -> Self {
        Self {
            top_z,
            last_body: self.last_body,
            top_diameter: None,
        }
    }

    /// State after a part that leaves the top face alone, such as a fin set
    pub fn after_part(&self, top_z: f64) -> Self {
        Self { top_z, ..*self }
    }

    /// Elevation of a fin root leading edge `axial_position` above the last tube's base
    pub fn fin_attach_z(&self, axial_position: f64) -> Option<f64> {
        self.last_body
            .map(|body| body.top_z - body.height + axial_position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tube(length: f64, outer_radius: f64) -> TubeParams {
        TubeParams {
            length,
            outer_radius,
            thickness: 0.01,
        }
    }

    #[test]
    fn test_after_tube_records_body_segment() {
        let state = StackState::default().after_tube(&tube(1.0, 0.18), 1.0);
        assert_relative_eq!(state.top_z, 1.0);

        let body = state.last_body.unwrap();
        assert_relative_eq!(body.diameter, 0.36);
        assert_relative_eq!(body.radius(), 0.18);
        assert_relative_eq!(body.base_z(), 0.0);
        assert_relative_eq!(body.hollow_wall().unwrap(), 0.01);

        let rod = StackState::default().after_tube(&tube(1.0, 0.005), 1.0);
        assert_eq!(rod.last_body.unwrap().hollow_wall(), None);
    }

    #[test]
    fn test_after_part_keeps_last_body() {
        let state = StackState::default().after_tube(&tube(1.0, 0.18), 1.0);
        let raised = state.after_part(1.1);

        assert_relative_eq!(raised.top_z, 1.1);
        assert_eq!(raised.last_body, state.last_body);
        // Input untouched
        assert_relative_eq!(state.top_z, 1.0);
    }

    #[test]
    fn test_top_diameter_follows_the_top_face() {
        let tube_state = StackState::default().after_tube(&tube(1.0, 0.18), 1.0);
        assert_eq!(StackState::default().top_diameter, None);
        assert_relative_eq!(tube_state.top_diameter.unwrap(), 0.36);

        let narrowed = tube_state.after_transition(
            &TransitionParams {
                length: 0.1,
                bottom_radius: 0.18,
                top_radius: 0.15,
                thickness: 0.02,
            },
            1.1,
        );
        assert_relative_eq!(narrowed.top_diameter.unwrap(), 0.3);
        assert_eq!(narrowed.last_body, tube_state.last_body);

        // Fins keep the face, a nose cone closes it
        assert_eq!(narrowed.after_part(1.1).top_diameter, narrowed.top_diameter);
        let closed = narrowed.after_cone(1.5);
        assert_eq!(closed.top_diameter, None);
        assert_eq!(closed.last_body, tube_state.last_body);
    }

    #[test]
    fn test_fin_attach_z_is_measured_from_tube_base() {
        let state = StackState::default()
            .after_tube(&tube(1.0, 0.18), 1.0)
            .after_part(1.1)
            .after_tube(&tube(0.5, 0.15), 1.6);

        assert_relative_eq!(state.fin_attach_z(0.0).unwrap(), 1.1);
        assert_relative_eq!(state.fin_attach_z(0.2).unwrap(), 1.3);
        assert_eq!(StackState::default().fin_attach_z(0.2), None);
    }

    #[test]
    fn test_attach_z_ignores_parts_above_the_tube() {
        let state = StackState::default()
            .after_tube(&tube(1.0, 0.18), 1.0)
            .after_part(1.4);
        assert_relative_eq!(state.fin_attach_z(0.1).unwrap(), 0.1);
    }
}
