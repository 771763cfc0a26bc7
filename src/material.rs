//! Surface material of a rigid body.

use crate::consts::{DEFAULT_FRICTION_COEFFICIENT, DEFAULT_RESTITUTION};

/// Friction and restitution coefficients owned by a [`RigidBody`](crate::body::RigidBody).
///
/// This is plain data. Combining the coefficients of two touching bodies is
/// left to the contact solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Coulomb friction coefficient (0.0 = frictionless ice).
    pub friction_coefficient: f32,
    /// Restitution (0.0 = perfectly inelastic, 1.0 = perfectly elastic).
    pub restitution: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}

impl Material {
    pub const fn new() -> Self {
        Self {
            friction_coefficient: DEFAULT_FRICTION_COEFFICIENT,
            restitution: DEFAULT_RESTITUTION,
        }
    }

    /// Builder: set the friction coefficient (clamped to be non-negative).
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction_coefficient = friction.max(0.0);
        self
    }

    /// Builder: set restitution (0.0..=1.0).
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution.clamp(0.0, 1.0);
        self
    }
}
