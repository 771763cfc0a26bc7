//! Geometric and physical primitives for a small 3D rigid-body engine.
//!
//! - [`shape`] - the support-mapping contract used by GJK/EPA style narrow
//!   phases, and the [`ConeShape`](shape::ConeShape) that implements it
//! - [`body`] - rigid-body mass, inertia and velocity state
//! - [`material`] - friction/restitution coefficients owned by a body
//! - [`wireframe`] - renderer-agnostic outlines for debug drawing
//!
//! Designed for `no_std` environments: every query is fixed-size arithmetic
//! and storage uses `heapless` collections.
//!
//! # Example
//! ```
//! use embedded_3dphys::shape::{ConeShape, SupportMap};
//! use nalgebra::Vector3;
//!
//! let cone = ConeShape::new(2.0, 4.0);
//! let rim = cone.local_support_point_without_margin(&Vector3::new(0.0, 0.0, -1.0));
//! assert_eq!(rim, Vector3::new(0.0, -2.0, -2.0));
//! ```
#![no_std]

use nalgebra::Isometry3;

pub mod body;
pub mod consts;
pub mod material;
pub mod shape;
pub mod wireframe;

/// Pose of a body or shape: translation plus unit-quaternion orientation.
pub type Transform = Isometry3<f32>;
