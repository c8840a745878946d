//! 3D Mathematics Library
//!
//! This crate provides the small amount of linear algebra the Vignette
//! scenes need: placing low-poly primitives, aiming cameras and casting
//! picking rays.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components
//! - [`Mat4`] - 4x4 column-major matrix for transformations
//! - [`Ray`] - Origin + direction, with slab intersection against [`Aabb`]
//! - [`Aabb`] - Axis-aligned bounding box

mod vec3;
pub mod mat4;
mod ray;
mod aabb;

pub use vec3::Vec3;
pub use mat4::Mat4;
pub use ray::Ray;
pub use aabb::Aabb;
