//! Convex collision shapes and the support-mapping contract.
//!
//! The narrow phase never inspects a shape's geometry directly. It only asks
//! for support points: the point of the (margin-inflated) surface that lies
//! furthest along a query direction. Anything implementing [`SupportMap`] can
//! therefore be fed to a GJK/EPA style distance or penetration routine.
//!
//! # Example
//! ```
//! use embedded_3dphys::shape::{ConeShape, SupportMap};
//! use nalgebra::Vector3;
//!
//! let cone = ConeShape::new(1.0, 2.0);
//! let apex = cone.local_support_point_without_margin(&Vector3::y());
//! assert_eq!(apex, Vector3::new(0.0, 1.0, 0.0));
//! ```

use nalgebra::{Matrix3, Point3, Vector3};

use crate::consts::{DEGENERATE_DIRECTION, MACHINE_EPSILON};
use crate::Transform;

mod cone;

pub use cone::ConeShape;

/// A convex shape described by its support function.
///
/// Implementations must be pure: the same direction always yields the same
/// point and no query mutates the shape, so a shape may be shared between
/// threads without locking.
pub trait SupportMap {
    /// Inflation radius added around the exact geometry. Constant for the
    /// lifetime of the shape.
    fn margin(&self) -> f32;

    /// Extremal point of the exact (un-inflated) shape along `direction`, in
    /// the shape's local frame.
    ///
    /// Must return a well-formed point for the zero vector.
    fn local_support_point_without_margin(&self, direction: &Vector3<f32>) -> Vector3<f32>;

    /// Extremal point of the margin-inflated shape along `direction`, in the
    /// shape's local frame.
    ///
    /// Equals `local_support_point_without_margin(d) + margin * normalize(d)`.
    /// When `|d|² <= MACHINE_EPSILON²` the normalized direction is replaced by
    /// [`DEGENERATE_DIRECTION`] (straight down).
    fn local_support_point_with_margin(&self, direction: &Vector3<f32>) -> Vector3<f32> {
        let support_point = self.local_support_point_without_margin(direction);
        support_point + margin_direction(direction) * self.margin()
    }

    /// Margin-inflated support point of the shape placed at `transform`, with
    /// both `direction` and the result expressed in world space.
    fn support_point_with_margin(
        &self,
        transform: &Transform,
        direction: &Vector3<f32>,
    ) -> Vector3<f32> {
        let local_direction = transform.inverse_transform_vector(direction);
        let local_point = self.local_support_point_with_margin(&local_direction);
        transform.transform_point(&Point3::from(local_point)).coords
    }
}

/// Unit vector along which the margin is applied for a query `direction`.
#[inline]
pub fn margin_direction(direction: &Vector3<f32>) -> Vector3<f32> {
    if direction.norm_squared() > MACHINE_EPSILON * MACHINE_EPSILON {
        direction.normalize()
    } else {
        Vector3::from(DEGENERATE_DIRECTION)
    }
}

/// Tag identifying the concrete kind of a [`CollisionShape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    Cone,
}

/// The closed set of shapes a body can carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionShape {
    /// Right circular cone, apex on `+Y`.
    Cone(ConeShape),
}

impl CollisionShape {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            CollisionShape::Cone(_) => ShapeType::Cone,
        }
    }

    /// Local-space bounding box `(min, max)`, margin included.
    pub fn local_bounds(&self) -> (Vector3<f32>, Vector3<f32>) {
        match self {
            CollisionShape::Cone(cone) => cone.local_bounds(),
        }
    }

    /// Inertia tensor of the solid shape with the given `mass`, about its local origin.
    pub fn compute_local_inertia_tensor(&self, mass: f32) -> Matrix3<f32> {
        match self {
            CollisionShape::Cone(cone) => cone.compute_local_inertia_tensor(mass),
        }
    }
}

impl SupportMap for CollisionShape {
    fn margin(&self) -> f32 {
        match self {
            CollisionShape::Cone(cone) => cone.margin(),
        }
    }

    fn local_support_point_without_margin(&self, direction: &Vector3<f32>) -> Vector3<f32> {
        match self {
            CollisionShape::Cone(cone) => cone.local_support_point_without_margin(direction),
        }
    }

    fn local_support_point_with_margin(&self, direction: &Vector3<f32>) -> Vector3<f32> {
        match self {
            CollisionShape::Cone(cone) => cone.local_support_point_with_margin(direction),
        }
    }
}

impl From<ConeShape> for CollisionShape {
    fn from(cone: ConeShape) -> Self {
        CollisionShape::Cone(cone)
    }
}

/// Stable identifier of a shape stored in a [`ShapeSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeHandle(usize);

impl ShapeHandle {
    /// Index of the shape inside its [`ShapeSet`].
    pub fn index(self) -> usize {
        self.0
    }
}

/// Fixed-capacity storage for collision shapes.
///
/// Bodies hold a [`ShapeHandle`] into this set instead of owning the shape,
/// so several bodies can share one shape. Shapes are never removed, which
/// keeps every handed-out handle valid.
///
/// # Type Parameters
/// * `N` - Maximum number of shapes (compile-time capacity).
#[derive(Debug, Default)]
pub struct ShapeSet<const N: usize> {
    shapes: heapless::Vec<CollisionShape, N>,
}

impl<const N: usize> ShapeSet<N> {
    pub fn new() -> Self {
        Self {
            shapes: heapless::Vec::new(),
        }
    }

    /// Store a shape. Returns its [`ShapeHandle`], or `None` if at capacity.
    pub fn add(&mut self, shape: impl Into<CollisionShape>) -> Option<ShapeHandle> {
        let handle = ShapeHandle(self.shapes.len());
        if self.shapes.push(shape.into()).is_err() {
            log::warn!("shape set is full ({} shapes)", N);
            return None;
        }
        Some(handle)
    }

    pub fn get(&self, handle: ShapeHandle) -> Option<&CollisionShape> {
        self.shapes.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Iterate over all stored shapes with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (ShapeHandle, &CollisionShape)> {
        self.shapes
            .iter()
            .enumerate()
            .map(|(i, s)| (ShapeHandle(i), s))
    }
}
