//! Rigid-body state consumed by the integrator and the constraint solver.
//!
//! A [`RigidBody`] is passive data: it stores mass properties and kinematic
//! state and derives world-space inertia tensors from the current
//! orientation, but it never advances itself in time. Forces and torques
//! accumulate until the stepping loop consumes and clears them.
//!
//! # Example
//! ```
//! use embedded_3dphys::body::{BodyId, RigidBody};
//! use embedded_3dphys::shape::{ConeShape, ShapeSet};
//! use embedded_3dphys::Transform;
//! use nalgebra::Vector3;
//!
//! let mut shapes = ShapeSet::<4>::new();
//! let cone = ConeShape::new(1.0, 2.0);
//! let handle = shapes.add(cone).unwrap();
//!
//! let inertia = cone.compute_local_inertia_tensor(2.0);
//! let mut body = RigidBody::new(Transform::identity(), 2.0, inertia, handle, BodyId::new(0));
//! body.set_linear_velocity(Vector3::new(0.0, 0.0, 3.0));
//! assert_eq!(body.linear_velocity(), Vector3::new(0.0, 0.0, 3.0));
//! ```

use nalgebra::{Matrix3, Vector3};

use crate::material::Material;
use crate::shape::ShapeHandle;
use crate::Transform;

/// Identifier of a body, assigned by whoever owns the body collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(usize);

impl BodyId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Pose, shape reference and motion flag shared by every kind of body.
#[derive(Debug, Clone)]
pub struct CollisionBody {
    id: BodyId,
    transform: Transform,
    shape: ShapeHandle,
    /// When `false` the body is immovable and ignores velocity writes.
    is_motion_enabled: bool,
}

impl CollisionBody {
    pub fn new(transform: Transform, shape: ShapeHandle, id: BodyId) -> Self {
        Self {
            id,
            transform,
            shape,
            is_motion_enabled: true,
        }
    }

    #[inline]
    pub fn id(&self) -> BodyId {
        self.id
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    /// Handle of the shape this body collides with.
    #[inline]
    pub fn shape(&self) -> ShapeHandle {
        self.shape
    }

    #[inline]
    pub fn is_motion_enabled(&self) -> bool {
        self.is_motion_enabled
    }
}

/// A rigid body with mass, inertia and linear/angular state.
///
/// Mass is stored once, as its inverse: `0.0` means infinite mass. Both
/// [`mass`](Self::mass) and [`mass_inverse`](Self::mass_inverse) read the same
/// value, so they can never disagree.
///
/// Velocity writes are gated by a single rule: a body whose motion is disabled
/// silently ignores both linear and angular velocity writes.
#[derive(Debug, Clone)]
pub struct RigidBody {
    body: CollisionBody,

    // -- Mass properties --
    /// Inverse of the mass. `0.0` for immovable bodies.
    mass_inverse: f32,
    /// Inertia tensor in body-local space.
    inertia_tensor_local: Matrix3<f32>,
    /// Inverse of `inertia_tensor_local`. Zero matrix when the tensor is singular.
    inertia_tensor_local_inverse: Matrix3<f32>,

    // -- Kinematic state (world space) --
    linear_velocity: Vector3<f32>,
    angular_velocity: Vector3<f32>,

    /// Force accumulated this step. Cleared by the stepping loop, not by the body.
    external_force: Vector3<f32>,
    /// Torque accumulated this step. Cleared by the stepping loop, not by the body.
    external_torque: Vector3<f32>,

    // -- Integrator modifiers --
    is_gravity_enabled: bool,
    linear_damping: f32,
    angular_damping: f32,

    material: Material,
}

impl RigidBody {
    /// Create a dynamic body.
    ///
    /// The local inverse inertia tensor is computed from `inertia_tensor_local`.
    /// A singular tensor yields a zero inverse, i.e. the body never rotates in
    /// response to torques.
    ///
    /// # Panics
    /// In debug builds, panics if `mass` is not positive and finite.
    pub fn new(
        transform: Transform,
        mass: f32,
        inertia_tensor_local: Matrix3<f32>,
        shape: ShapeHandle,
        id: BodyId,
    ) -> Self {
        debug_assert!(mass > 0.0 && mass.is_finite(), "mass must be positive and finite");
        Self {
            body: CollisionBody::new(transform, shape, id),
            mass_inverse: 1.0 / mass,
            inertia_tensor_local,
            inertia_tensor_local_inverse: invert_inertia(&inertia_tensor_local, id),
            linear_velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            external_force: Vector3::zeros(),
            external_torque: Vector3::zeros(),
            is_gravity_enabled: true,
            linear_damping: 0.0,
            angular_damping: 0.0,
            material: Material::default(),
        }
    }

    /// Create an immovable body: infinite mass and inertia, motion disabled,
    /// gravity off.
    pub fn new_static(transform: Transform, shape: ShapeHandle, id: BodyId) -> Self {
        let mut body = CollisionBody::new(transform, shape, id);
        body.is_motion_enabled = false;
        Self {
            body,
            mass_inverse: 0.0,
            inertia_tensor_local: Matrix3::zeros(),
            inertia_tensor_local_inverse: Matrix3::zeros(),
            linear_velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
            external_force: Vector3::zeros(),
            external_torque: Vector3::zeros(),
            is_gravity_enabled: false,
            linear_damping: 0.0,
            angular_damping: 0.0,
            material: Material::default(),
        }
    }

    /// Builder: set linear damping (must be non-negative).
    pub fn with_linear_damping(mut self, damping: f32) -> Self {
        self.set_linear_damping(damping);
        self
    }

    /// Builder: set angular damping (must be non-negative).
    pub fn with_angular_damping(mut self, damping: f32) -> Self {
        self.set_angular_damping(damping);
        self
    }

    /// Builder: set the surface material.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Builder: enable or disable gravity for this body.
    pub fn with_gravity(mut self, enabled: bool) -> Self {
        self.is_gravity_enabled = enabled;
        self
    }

    // -- Collision body --

    pub fn collision_body(&self) -> &CollisionBody {
        &self.body
    }

    #[inline]
    pub fn id(&self) -> BodyId {
        self.body.id
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.body.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.body.set_transform(transform);
    }

    #[inline]
    pub fn shape(&self) -> ShapeHandle {
        self.body.shape
    }

    #[inline]
    pub fn is_motion_enabled(&self) -> bool {
        self.body.is_motion_enabled
    }

    /// Enable or disable motion. Disabling also zeroes both velocities so an
    /// immovable body never carries velocity.
    pub fn set_motion_enabled(&mut self, enabled: bool) {
        self.body.is_motion_enabled = enabled;
        if !enabled {
            self.linear_velocity = Vector3::zeros();
            self.angular_velocity = Vector3::zeros();
        }
    }

    // -- Mass --

    /// Mass of the body, `f32::INFINITY` for immovable bodies.
    #[inline]
    pub fn mass(&self) -> f32 {
        if self.mass_inverse == 0.0 {
            f32::INFINITY
        } else {
            1.0 / self.mass_inverse
        }
    }

    /// Set the mass. `f32::INFINITY` makes the body immovable.
    ///
    /// # Panics
    /// In debug builds, panics if `mass` is not positive.
    pub fn set_mass(&mut self, mass: f32) {
        debug_assert!(mass > 0.0, "mass must be positive");
        self.mass_inverse = if mass.is_infinite() { 0.0 } else { 1.0 / mass };
    }

    #[inline]
    pub fn mass_inverse(&self) -> f32 {
        self.mass_inverse
    }

    /// Set the inverse mass directly. `0.0` means infinite mass.
    ///
    /// # Panics
    /// In debug builds, panics if `mass_inverse` is negative.
    pub fn set_mass_inverse(&mut self, mass_inverse: f32) {
        debug_assert!(mass_inverse >= 0.0, "inverse mass must be non-negative");
        self.mass_inverse = mass_inverse;
    }

    // -- Inertia --

    #[inline]
    pub fn inertia_tensor_local(&self) -> &Matrix3<f32> {
        &self.inertia_tensor_local
    }

    /// Replace the local inertia tensor and recompute its inverse.
    pub fn set_inertia_tensor_local(&mut self, inertia_tensor_local: Matrix3<f32>) {
        self.inertia_tensor_local = inertia_tensor_local;
        self.inertia_tensor_local_inverse = invert_inertia(&inertia_tensor_local, self.body.id);
    }

    #[inline]
    pub fn inertia_tensor_local_inverse(&self) -> Matrix3<f32> {
        self.inertia_tensor_local_inverse
    }

    /// World-space inertia tensor: `I_world = R * I_local * Rᵀ`, where `R` is
    /// the rotation matrix of the current orientation.
    ///
    /// Recomputed on every call; cache it per step if it is needed repeatedly.
    pub fn inertia_tensor_world(&self) -> Matrix3<f32> {
        let r = self.body.transform.rotation.to_rotation_matrix();
        r.matrix() * self.inertia_tensor_local * r.matrix().transpose()
    }

    /// World-space inverse inertia tensor: `I⁻¹_world = R * I⁻¹_local * Rᵀ`.
    pub fn inertia_tensor_inverse_world(&self) -> Matrix3<f32> {
        let r = self.body.transform.rotation.to_rotation_matrix();
        r.matrix() * self.inertia_tensor_local_inverse * r.matrix().transpose()
    }

    // -- Velocities --

    #[inline]
    pub fn linear_velocity(&self) -> Vector3<f32> {
        self.linear_velocity
    }

    /// Set the linear velocity. Ignored when motion is disabled.
    pub fn set_linear_velocity(&mut self, linear_velocity: Vector3<f32>) {
        if self.body.is_motion_enabled {
            self.linear_velocity = linear_velocity;
        } else {
            log::trace!("body {} is immovable, linear velocity write ignored", self.body.id.0);
        }
    }

    #[inline]
    pub fn angular_velocity(&self) -> Vector3<f32> {
        self.angular_velocity
    }

    /// Set the angular velocity. Ignored when motion is disabled.
    pub fn set_angular_velocity(&mut self, angular_velocity: Vector3<f32>) {
        if self.body.is_motion_enabled {
            self.angular_velocity = angular_velocity;
        } else {
            log::trace!("body {} is immovable, angular velocity write ignored", self.body.id.0);
        }
    }

    /// Velocity of the material point at world-space `point`: `v + ω × r`.
    pub fn velocity_at_point(&self, point: &Vector3<f32>) -> Vector3<f32> {
        let r = point - self.body.transform.translation.vector;
        self.linear_velocity + self.angular_velocity.cross(&r)
    }

    /// Linear plus rotational kinetic energy: `½ m v² + ½ ωᵀ I_world ω`.
    pub fn kinetic_energy(&self) -> f32 {
        let linear = if self.mass_inverse > 0.0 {
            0.5 * self.linear_velocity.norm_squared() / self.mass_inverse
        } else {
            0.0
        };
        let w = &self.angular_velocity;
        linear + 0.5 * w.dot(&(self.inertia_tensor_world() * w))
    }

    // -- Accumulators --

    #[inline]
    pub fn external_force(&self) -> Vector3<f32> {
        self.external_force
    }

    pub fn set_external_force(&mut self, force: Vector3<f32>) {
        self.external_force = force;
    }

    /// Add a force (in Newtons) at the center of mass.
    #[inline]
    pub fn apply_force(&mut self, force: Vector3<f32>) {
        self.external_force += force;
    }

    #[inline]
    pub fn external_torque(&self) -> Vector3<f32> {
        self.external_torque
    }

    pub fn set_external_torque(&mut self, torque: Vector3<f32>) {
        self.external_torque = torque;
    }

    /// Add a torque (in N·m).
    #[inline]
    pub fn apply_torque(&mut self, torque: Vector3<f32>) {
        self.external_torque += torque;
    }

    /// Add a force applied at world-space `point`; the lever arm produces torque.
    pub fn apply_force_at_point(&mut self, force: Vector3<f32>, point: &Vector3<f32>) {
        let r = point - self.body.transform.translation.vector;
        self.external_force += force;
        self.external_torque += r.cross(&force);
    }

    // -- Modifiers --

    #[inline]
    pub fn is_gravity_enabled(&self) -> bool {
        self.is_gravity_enabled
    }

    pub fn enable_gravity(&mut self, enabled: bool) {
        self.is_gravity_enabled = enabled;
    }

    #[inline]
    pub fn linear_damping(&self) -> f32 {
        self.linear_damping
    }

    /// # Panics
    /// In debug builds, panics if `damping` is negative.
    pub fn set_linear_damping(&mut self, damping: f32) {
        debug_assert!(damping >= 0.0, "linear damping must be non-negative");
        self.linear_damping = damping;
    }

    #[inline]
    pub fn angular_damping(&self) -> f32 {
        self.angular_damping
    }

    /// # Panics
    /// In debug builds, panics if `damping` is negative.
    pub fn set_angular_damping(&mut self, damping: f32) {
        debug_assert!(damping >= 0.0, "angular damping must be non-negative");
        self.angular_damping = damping;
    }

    // -- Material --

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Mutable access for the contact stage that mixes materials of touching bodies.
    pub fn material_mut(&mut self) -> &mut Material {
        &mut self.material
    }

    pub fn set_material(&mut self, material: Material) {
        self.material = material;
    }
}

fn invert_inertia(tensor: &Matrix3<f32>, id: BodyId) -> Matrix3<f32> {
    tensor.try_inverse().unwrap_or_else(|| {
        log::warn!("body {}: singular inertia tensor, rotation locked", id.0);
        Matrix3::zeros()
    })
}
