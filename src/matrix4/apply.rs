//! Applying matrices to vectors.

use super::Matrix4;
use crate::{
    num::Float,
    properties::StructuralProperties,
    vector::{Vector3, Vector4},
};

impl<F: Float> Matrix4<F> {
    /// Transforms the given homogeneous vector.
    pub fn transform(&self, vector: &Vector4<F>) -> Vector4<F> {
        if self.properties.is_affine() {
            return self.transform_affine(vector);
        }
        let (x, y, z, w) = (vector.x(), vector.y(), vector.z(), vector.w());
        Vector4::new(
            self.m00 * x + self.m10 * y + self.m20 * z + self.m30 * w,
            self.m01 * x + self.m11 * y + self.m21 * z + self.m31 * w,
            self.m02 * x + self.m12 * y + self.m22 * z + self.m32 * w,
            self.m03 * x + self.m13 * y + self.m23 * z + self.m33 * w,
        )
    }

    /// Transforms the given homogeneous vector assuming this matrix is
    /// affine, whatever its properties say. The `w` component is passed
    /// through.
    pub fn transform_affine(&self, vector: &Vector4<F>) -> Vector4<F> {
        let (x, y, z, w) = (vector.x(), vector.y(), vector.z(), vector.w());
        Vector4::new(
            self.m00 * x + self.m10 * y + self.m20 * z + self.m30 * w,
            self.m01 * x + self.m11 * y + self.m21 * z + self.m31 * w,
            self.m02 * x + self.m12 * y + self.m22 * z + self.m32 * w,
            w,
        )
    }

    /// Transforms the given position, ignoring the last row of the matrix.
    /// Use [`Self::transform_project`] for projective matrices.
    pub fn transform_position(&self, position: &Vector3<F>) -> Vector3<F> {
        if self.properties.is_identity() {
            return *position;
        }
        if self.properties.is_translation() {
            return position + self.translation_part();
        }
        let (x, y, z) = (position.x(), position.y(), position.z());
        Vector3::new(
            self.m00 * x + self.m10 * y + self.m20 * z + self.m30,
            self.m01 * x + self.m11 * y + self.m21 * z + self.m31,
            self.m02 * x + self.m12 * y + self.m22 * z + self.m32,
        )
    }

    /// Transforms the given direction, ignoring the translation.
    pub fn transform_direction(&self, direction: &Vector3<F>) -> Vector3<F> {
        if self.properties.is_translation() {
            return *direction;
        }
        let (x, y, z) = (direction.x(), direction.y(), direction.z());
        Vector3::new(
            self.m00 * x + self.m10 * y + self.m20 * z,
            self.m01 * x + self.m11 * y + self.m21 * z,
            self.m02 * x + self.m12 * y + self.m22 * z,
        )
    }

    /// Transforms the given position and divides by the resulting `w`.
    /// Affine matrices skip the division.
    pub fn transform_project(&self, position: &Vector3<F>) -> Vector3<F> {
        if self.properties.is_affine() {
            return self.transform_position(position);
        }
        self.transform(&position.extended(F::ONE))
            .perspective_divided()
    }
}
