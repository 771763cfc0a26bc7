//! Right circular cone.
//!
//! The cone is centered on its local origin with its axis along `Y`: the apex
//! sits at `(0, +half_height, 0)` and the base circle of radius `radius` at
//! `y = -half_height`.

use core::f32::consts::PI;

use nalgebra::{Matrix3, Vector3};

// ComplexField provides sqrt()/sin_cos() for f32 in no_std via libm
#[allow(unused_imports)]
use nalgebra::ComplexField;

use super::SupportMap;
use crate::consts::{DEFAULT_OBJECT_MARGIN, MACHINE_EPSILON};
use crate::wireframe::Wireframe;

/// A cone collision shape.
///
/// Immutable once built. `sin_apex_angle` is derived from the radius and
/// height at construction and never stored independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeShape {
    radius: f32,
    half_height: f32,
    /// Sine of the half-angle at the apex: `r / sqrt(r² + h²)`.
    sin_apex_angle: f32,
    margin: f32,
}

impl ConeShape {
    /// Create a cone with base `radius` and total `height`.
    ///
    /// # Panics
    /// In debug builds, panics if `radius` or `height` is not positive.
    pub fn new(radius: f32, height: f32) -> Self {
        debug_assert!(radius > 0.0, "cone radius must be positive");
        debug_assert!(height > 0.0, "cone height must be positive");

        Self {
            radius,
            half_height: height * 0.5,
            sin_apex_angle: radius / (radius * radius + height * height).sqrt(),
            margin: DEFAULT_OBJECT_MARGIN,
        }
    }

    /// Checked constructor for dimensions that come from untrusted input.
    ///
    /// Returns `None` unless both `radius` and `height` are positive and finite.
    pub fn try_new(radius: f32, height: f32) -> Option<Self> {
        let valid = |x: f32| x > 0.0 && x.is_finite();
        if valid(radius) && valid(height) {
            Some(Self::new(radius, height))
        } else {
            log::warn!("rejected cone dimensions r={} h={}", radius, height);
            None
        }
    }

    /// Builder: override the collision margin.
    ///
    /// # Panics
    /// In debug builds, panics if `margin` is not positive.
    pub fn with_margin(mut self, margin: f32) -> Self {
        debug_assert!(margin > 0.0, "collision margin must be positive");
        self.margin = margin;
        self
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn height(&self) -> f32 {
        2.0 * self.half_height
    }

    #[inline]
    pub fn half_height(&self) -> f32 {
        self.half_height
    }

    /// Sine of the half-angle at the apex.
    #[inline]
    pub fn sin_apex_angle(&self) -> f32 {
        self.sin_apex_angle
    }

    /// Local-space bounding box `(min, max)`, margin included.
    pub fn local_bounds(&self) -> (Vector3<f32>, Vector3<f32>) {
        let extent = Vector3::new(
            self.radius + self.margin,
            self.half_height + self.margin,
            self.radius + self.margin,
        );
        (-extent, extent)
    }

    /// Volume of the solid cone: `π r² h / 3`.
    pub fn volume(&self) -> f32 {
        PI * self.radius * self.radius * self.height() / 3.0
    }

    /// Inertia tensor of a solid cone of the given `mass` about its local origin.
    ///
    /// The local origin sits at mid-height, `h/4` above the centre of mass, so
    /// the transverse moments carry the parallel-axis term `m * (h/4)²` on top
    /// of the centroidal `3/80 * m * h²`. With `h = 2 * half_height`:
    /// - `Ixx = Izz = m * (3/20 * r² + 1/10 * h²)`
    /// - `Iyy = 3/10 * m * r²`
    pub fn compute_local_inertia_tensor(&self, mass: f32) -> Matrix3<f32> {
        let r2 = self.radius * self.radius;
        let h = self.height();
        let diag_xz = mass * (0.15 * r2 + 0.1 * h * h);
        let diag_y = 0.3 * mass * r2;
        Matrix3::from_diagonal(&Vector3::new(diag_xz, diag_y, diag_xz))
    }

    /// Describe the un-inflated cone as a wireframe for debug rendering.
    ///
    /// Vertex 0 is the apex; vertices `1..=segments` walk the base rim
    /// counter-clockwise seen from above. Lines connect consecutive rim
    /// vertices and each rim vertex to the apex.
    ///
    /// Returns `None` if `segments < 3` or the wireframe does not fit in `N`
    /// vertices/lines.
    pub fn wireframe<const N: usize>(&self, segments: usize) -> Option<Wireframe<N>> {
        if segments < 3 {
            return None;
        }

        let mut wireframe = Wireframe::new();
        wireframe.vertices.push([0.0, self.half_height, 0.0]).ok()?;

        let step = 2.0 * PI / segments as f32;
        for i in 0..segments {
            let (sin, cos) = (step * i as f32).sin_cos();
            wireframe
                .vertices
                .push([self.radius * cos, -self.half_height, -self.radius * sin])
                .ok()?;
        }

        for i in 0..segments {
            let rim = 1 + i;
            let next = 1 + (i + 1) % segments;
            wireframe.lines.push([rim, next]).ok()?;
            wireframe.lines.push([0, rim]).ok()?;
        }

        Some(wireframe)
    }
}

impl SupportMap for ConeShape {
    #[inline]
    fn margin(&self) -> f32 {
        self.margin
    }

    fn local_support_point_without_margin(&self, direction: &Vector3<f32>) -> Vector3<f32> {
        let v = direction;
        let sin_theta_times_length_v = self.sin_apex_angle * v.norm();

        // Directions inside the apex's normal cone pick the apex.
        if v.y > sin_theta_times_length_v {
            return Vector3::new(0.0, self.half_height, 0.0);
        }

        let projected_length = (v.x * v.x + v.z * v.z).sqrt();
        if projected_length > MACHINE_EPSILON {
            let d = self.radius / projected_length;
            Vector3::new(v.x * d, -self.half_height, v.z * d)
        } else {
            // Purely vertical (or zero) direction: every rim point ties, take the base center.
            Vector3::new(0.0, -self.half_height, 0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn approx_vec_eq(a: &Vector3<f32>, b: &Vector3<f32>) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    #[test]
    fn test_cone_dimensions() {
        let cone = ConeShape::new(2.0, 4.0);
        assert_eq!(cone.radius(), 2.0);
        assert_eq!(cone.half_height(), 2.0);
        assert_eq!(cone.height(), 4.0);
        assert_eq!(cone.margin(), DEFAULT_OBJECT_MARGIN);
    }

    #[test]
    fn test_sin_apex_angle() {
        let cone = ConeShape::new(2.0, 4.0);
        // 2 / sqrt(4 + 16) = 2 / sqrt(20)
        assert!(approx_eq(cone.sin_apex_angle(), 0.4472));
        assert!(cone.sin_apex_angle() >= 0.0);
    }

    #[test]
    fn test_support_apex() {
        let cone = ConeShape::new(1.0, 2.0);
        let s = cone.local_support_point_without_margin(&Vector3::new(0.0, 1.0, 0.0));
        assert!(approx_vec_eq(&s, &Vector3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_support_base_rim() {
        let cone = ConeShape::new(1.0, 2.0);
        let s = cone.local_support_point_without_margin(&Vector3::new(1.0, 0.0, 0.0));
        assert!(approx_vec_eq(&s, &Vector3::new(1.0, -1.0, 0.0)));
    }

    #[test]
    fn test_support_straight_down_is_base_center() {
        let cone = ConeShape::new(1.0, 2.0);
        let s = cone.local_support_point_without_margin(&Vector3::new(0.0, -1.0, 0.0));
        assert!(approx_vec_eq(&s, &Vector3::new(0.0, -1.0, 0.0)));
    }

    #[test]
    fn test_support_zero_direction_is_base_center() {
        let cone = ConeShape::new(1.0, 2.0);
        let s = cone.local_support_point_without_margin(&Vector3::zeros());
        assert!(approx_vec_eq(&s, &Vector3::new(0.0, -1.0, 0.0)));
    }

    #[test]
    fn test_support_rim_scales_horizontal_bearing() {
        let cone = ConeShape::new(2.0, 4.0);
        let s = cone.local_support_point_without_margin(&Vector3::new(0.0, 0.0, -1.0));
        assert!(approx_vec_eq(&s, &Vector3::new(0.0, -2.0, -2.0)));

        // Diagonal bearing lands on the rim at radius distance from the axis.
        let s = cone.local_support_point_without_margin(&Vector3::new(3.0, -1.0, 4.0));
        assert!(approx_vec_eq(&s, &Vector3::new(1.2, -2.0, 1.6)));
    }

    #[test]
    fn test_support_switches_at_apex_half_angle() {
        // r = 1, h = 2: sin θ = 1/sqrt(5). The apex wins once v.y exceeds sin θ * |v|.
        let cone = ConeShape::new(1.0, 2.0);
        let steep = Vector3::new(0.1, 1.0, 0.0);
        let shallow = Vector3::new(1.0, 0.2, 0.0);
        assert!(approx_vec_eq(
            &cone.local_support_point_without_margin(&steep),
            &Vector3::new(0.0, 1.0, 0.0)
        ));
        assert!(approx_vec_eq(
            &cone.local_support_point_without_margin(&shallow),
            &Vector3::new(1.0, -1.0, 0.0)
        ));
    }

    #[test]
    fn test_support_point_is_extremal() {
        // The support point must dominate both the apex and sampled rim points.
        let cone = ConeShape::new(1.5, 3.0);
        let directions = [
            Vector3::new(0.2, 1.0, -0.4),
            Vector3::new(-1.0, 0.5, 0.3),
            Vector3::new(0.0, -1.0, 2.0),
            Vector3::new(0.7, -0.7, -0.1),
        ];
        let rim = cone.wireframe::<64>(32).unwrap();
        for d in directions.iter() {
            let best = cone.local_support_point_without_margin(d).dot(d);
            for v in rim.vertices.iter() {
                let candidate = Vector3::new(v[0], v[1], v[2]);
                assert!(candidate.dot(d) <= best + EPSILON, "direction {:?}", d);
            }
        }
    }

    #[test]
    fn test_support_with_margin_pushes_outward() {
        let cone = ConeShape::new(1.0, 2.0).with_margin(0.1);
        let s = cone.local_support_point_with_margin(&Vector3::new(0.0, 5.0, 0.0));
        assert!(approx_vec_eq(&s, &Vector3::new(0.0, 1.1, 0.0)));

        let s = cone.local_support_point_with_margin(&Vector3::zeros());
        assert!(approx_vec_eq(&s, &Vector3::new(0.0, -1.1, 0.0)));
    }

    #[test]
    fn test_try_new_rejects_bad_dimensions() {
        assert!(ConeShape::try_new(1.0, 2.0).is_some());
        assert!(ConeShape::try_new(0.0, 2.0).is_none());
        assert!(ConeShape::try_new(1.0, -2.0).is_none());
        assert!(ConeShape::try_new(f32::NAN, 2.0).is_none());
        assert!(ConeShape::try_new(1.0, f32::INFINITY).is_none());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_zero_radius_panics() {
        ConeShape::new(0.0, 2.0);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_negative_height_panics() {
        ConeShape::new(1.0, -1.0);
    }

    #[test]
    fn test_local_bounds_contain_support_points() {
        let cone = ConeShape::new(1.0, 2.0);
        let (min, max) = cone.local_bounds();
        assert!(approx_vec_eq(&max, &Vector3::new(1.04, 1.04, 1.04)));
        assert!(approx_vec_eq(&min, &-max));

        let directions = [
            Vector3::x(),
            Vector3::y(),
            -Vector3::y(),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(-0.3, -0.2, 0.9),
        ];
        for d in directions.iter() {
            let s = cone.local_support_point_with_margin(d);
            for axis in 0..3 {
                assert!(s[axis] >= min[axis] - EPSILON && s[axis] <= max[axis] + EPSILON);
            }
        }
    }

    /// Integrate the solid cone as a stack of thin discs, all taken about the
    /// local origin: `(Ixx, Iyy)`.
    fn integrate_disc_stack(cone: &ConeShape, mass: f64, slices: usize) -> (f64, f64) {
        let r = cone.radius() as f64;
        let h = cone.height() as f64;
        let half = h / 2.0;
        let density = mass / (core::f64::consts::PI * r * r * h / 3.0);
        let dy = h / slices as f64;

        let (mut ixx, mut iyy) = (0.0, 0.0);
        for i in 0..slices {
            let y = -half + (i as f64 + 0.5) * dy;
            // Disc radius shrinks linearly from the base rim to the apex.
            let rho = r * (half - y) / h;
            let dm = density * core::f64::consts::PI * rho * rho * dy;
            ixx += dm * (rho * rho / 4.0 + y * y);
            iyy += dm * rho * rho / 2.0;
        }
        (ixx, iyy)
    }

    #[test]
    fn test_inertia_tensor_about_local_origin() {
        let cone = ConeShape::new(1.0, 2.0);
        let tensor = cone.compute_local_inertia_tensor(1.0);
        let (ixx, iyy) = integrate_disc_stack(&cone, 1.0, 20_000);

        assert!(approx_eq(ixx as f32, 0.55), "integrated Ixx = {}", ixx);
        assert!(approx_eq(tensor[(0, 0)], ixx as f32));
        assert!(approx_eq(tensor[(2, 2)], ixx as f32));
        assert!(approx_eq(tensor[(1, 1)], iyy as f32));
        assert!(approx_eq(tensor[(0, 1)], 0.0));
    }

    #[test]
    fn test_inertia_tensor_matches_integration_for_other_proportions() {
        let cone = ConeShape::new(2.0, 0.5);
        let tensor = cone.compute_local_inertia_tensor(3.0);
        let (ixx, iyy) = integrate_disc_stack(&cone, 3.0, 20_000);
        assert!(approx_eq(tensor[(0, 0)], ixx as f32), "{} vs {}", tensor[(0, 0)], ixx);
        assert!(approx_eq(tensor[(1, 1)], iyy as f32), "{} vs {}", tensor[(1, 1)], iyy);
    }

    #[test]
    fn test_volume() {
        let cone = ConeShape::new(1.0, 3.0);
        assert!(approx_eq(cone.volume(), PI));
    }

    #[test]
    fn test_wireframe_layout() {
        let cone = ConeShape::new(2.0, 4.0);
        let wireframe = cone.wireframe::<16>(8).unwrap();
        assert_eq!(wireframe.vertices.len(), 9);
        assert_eq!(wireframe.lines.len(), 16);
        assert_eq!(wireframe.vertices[0], [0.0, 2.0, 0.0]);

        for v in wireframe.vertices.iter().skip(1) {
            assert!(approx_eq(v[1], -2.0));
            assert!(approx_eq((v[0] * v[0] + v[2] * v[2]).sqrt(), 2.0));
        }
        for line in wireframe.lines.iter() {
            assert!(line[0] < 9 && line[1] < 9);
        }
    }

    #[test]
    fn test_wireframe_capacity_and_segment_limits() {
        let cone = ConeShape::new(1.0, 1.0);
        assert!(cone.wireframe::<16>(2).is_none());
        assert!(cone.wireframe::<8>(8).is_none()); // needs 16 lines
    }
}
