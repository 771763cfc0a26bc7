//! Engine-wide numeric thresholds and defaults.
//!
//! Every shape and body reads its degenerate-input thresholds from here so the
//! fallback behaviour stays identical across shape types.

/// Smallest representable step above `1.0` for the engine's scalar type.
///
/// Direction vectors whose squared length is at most `MACHINE_EPSILON²` are
/// treated as the zero vector by support queries.
pub const MACHINE_EPSILON: f32 = f32::EPSILON;

/// Inflation radius given to every new collision shape.
pub const DEFAULT_OBJECT_MARGIN: f32 = 0.04;

/// Fallback unit direction used to push a support point outwards when the
/// query direction is degenerate (straight down).
pub const DEGENERATE_DIRECTION: [f32; 3] = [0.0, -1.0, 0.0];

/// Default Coulomb friction coefficient of a new [`Material`](crate::material::Material).
pub const DEFAULT_FRICTION_COEFFICIENT: f32 = 0.3;

/// Default restitution (bounciness) of a new [`Material`](crate::material::Material).
pub const DEFAULT_RESTITUTION: f32 = 0.5;
