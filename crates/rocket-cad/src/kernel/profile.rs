//! Sketch profiles and workplanes

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// A closed planar profile, in workplane coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Profile {
    /// Circle with the given center and radius
    Circle { center: DVec2, radius: f64 },
    /// Straight segments through the points, closed back to the first point
    Polyline(Vec<DVec2>),
    /// Smooth curve interpolating the sample points, closed back to the first point
    Spline(Vec<DVec2>),
}

impl Profile {
    /// Circle centered on the workplane origin
    pub fn circle(radius: f64) -> Self {
        Profile::Circle {
            center: DVec2::ZERO,
            radius,
        }
    }

    pub fn polyline(points: impl Into<Vec<DVec2>>) -> Self {
        Profile::Polyline(points.into())
    }

    pub fn spline(points: impl Into<Vec<DVec2>>) -> Self {
        Profile::Spline(points.into())
    }

    /// Boundary points (empty for circles)
    pub fn points(&self) -> &[DVec2] {
        match self {
            Profile::Circle { .. } => &[],
            Profile::Polyline(points) | Profile::Spline(points) => points,
        }
    }

    /// Enclosed area (shoelace formula for point profiles)
    pub fn area(&self) -> f64 {
        match self {
            Profile::Circle { radius, .. } => std::f64::consts::PI * radius * radius,
            Profile::Polyline(points) | Profile::Spline(points) => {
                let n = points.len();
                let twice: f64 = (0..n)
                    .map(|i| points[i].perp_dot(points[(i + 1) % n]))
                    .sum();
                twice.abs() / 2.0
            }
        }
    }

    /// Axis-aligned 2D bounds as (min, max)
    pub fn bounds(&self) -> Option<(DVec2, DVec2)> {
        match self {
            Profile::Circle { center, radius } => Some((
                *center - DVec2::splat(radius.abs()),
                *center + DVec2::splat(radius.abs()),
            )),
            Profile::Polyline(points) | Profile::Spline(points) => {
                let first = *points.first()?;
                Some(
                    points
                        .iter()
                        .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
                )
            }
        }
    }

    /// Even-odd point containment
    pub fn contains(&self, p: DVec2) -> bool {
        match self {
            Profile::Circle { center, radius } => p.distance_squared(*center) <= radius * radius,
            Profile::Polyline(points) | Profile::Spline(points) => {
                let n = points.len();
                if n < 3 {
                    return false;
                }
                let mut inside = false;
                let mut j = n - 1;
                for i in 0..n {
                    let (a, b) = (points[i], points[j]);
                    if (a.y > p.y) != (b.y > p.y) {
                        let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                        if p.x < x {
                            inside = !inside;
                        }
                    }
                    j = i;
                }
                inside
            }
        }
    }
}

/// A sketch plane: an origin and an orthonormal frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Workplane {
    /// Origin of the plane in world space
    pub origin: DVec3,
    /// Local X direction
    pub x_dir: DVec3,
    /// Plane normal (local Z)
    pub normal: DVec3,
}

impl Default for Workplane {
    fn default() -> Self {
        Self::xy()
    }
}

impl Workplane {
    pub fn new(origin: DVec3, x_dir: DVec3, normal: DVec3) -> Self {
        Self {
            origin,
            x_dir: x_dir.normalize(),
            normal: normal.normalize(),
        }
    }

    /// Global XY plane, normal along +Z
    pub fn xy() -> Self {
        Self::new(DVec3::ZERO, DVec3::X, DVec3::Z)
    }

    /// XY-oriented plane at elevation `z`
    pub fn at_height(z: f64) -> Self {
        Self::new(DVec3::new(0.0, 0.0, z), DVec3::X, DVec3::Z)
    }

    /// Local Y direction
    pub fn y_dir(&self) -> DVec3 {
        self.normal.cross(self.x_dir)
    }

    /// Same orientation, origin moved along the normal
    pub fn offset(&self, distance: f64) -> Self {
        Self {
            origin: self.origin + self.normal * distance,
            ..*self
        }
    }

    /// Plane rotated 90 degrees about local X, so that local Y follows this plane's normal
    pub fn profile_plane(&self) -> Self {
        Self {
            origin: self.origin,
            x_dir: self.x_dir,
            normal: -self.y_dir(),
        }
    }

    /// Plane coordinates to world space
    pub fn to_world(&self, p: DVec2) -> DVec3 {
        self.origin + self.x_dir * p.x + self.y_dir() * p.y
    }

    /// World point to (local x, local y, height above the plane)
    pub fn to_local(&self, p: DVec3) -> DVec3 {
        let d = p - self.origin;
        DVec3::new(d.dot(self.x_dir), d.dot(self.y_dir()), d.dot(self.normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_polyline_area_and_contains() {
        let triangle = Profile::polyline(vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(0.0, 4.0),
        ]);
        assert_relative_eq!(triangle.area(), 4.0);
        assert!(triangle.contains(DVec2::new(0.5, 0.5)));
        assert!(!triangle.contains(DVec2::new(1.5, 3.0)));
    }

    #[test]
    fn test_degenerate_polyline_contains_nothing() {
        let line = Profile::polyline(vec![DVec2::ZERO, DVec2::X]);
        assert_eq!(line.area(), 0.0);
        assert!(!line.contains(DVec2::new(0.5, 0.0)));
    }

    #[test]
    fn test_profile_plane_points_up_the_stack() {
        let plane = Workplane::at_height(3.0).profile_plane();
        let p = plane.to_world(DVec2::new(1.0, 2.0));
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(p.y, 0.0);
        assert_relative_eq!(p.z, 5.0);
    }

    #[test]
    fn test_local_round_trip() {
        let plane = Workplane::at_height(1.5).offset(0.5);
        let local = plane.to_local(DVec3::new(0.25, -0.75, 3.0));
        assert_relative_eq!(local.x, 0.25);
        assert_relative_eq!(local.y, -0.75);
        assert_relative_eq!(local.z, 1.0);
    }
}
