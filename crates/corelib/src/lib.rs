//! Core types: math re-exports, camera, rays, board and picking.

pub use glam::{Mat3, Mat4, Vec3, Vec4, vec3};

pub mod board;
pub mod camera;
pub mod error;
pub mod pick;
pub mod ray;
pub mod transform;

pub use error::{CoreError, CoreResult};
