//! Transform matrices that keep track of their own structure.
//!
//! [`Matrix4`] and [`Matrix4x3`] cache a small set of structural properties
//! (identity, pure translation, orthonormal, affine, perspective) alongside
//! their entries. Operations select specialized kernels from the cached
//! properties and predict the properties of their results, so chains of
//! transforms stay on the cheapest applicable code path without ever
//! re-examining the entries.

#[macro_use]
mod macros;

pub mod dispatch;
pub mod matrix3;
pub mod matrix4;
pub mod matrix4x3;
pub mod num;
pub mod plane;
pub mod properties;
pub mod quaternion;
pub mod vector;

pub use matrix3::Matrix3;
pub use matrix4::{Matrix4, Matrix4d, Matrix4f};
pub use matrix4x3::{Matrix4x3, Matrix4x3d, Matrix4x3f};
pub use plane::Plane;
pub use properties::{Matrix4Properties, Matrix4x3Properties, StructuralProperties, TransformClass};
pub use quaternion::Quaternion;
pub use vector::{Vector3, Vector4};
