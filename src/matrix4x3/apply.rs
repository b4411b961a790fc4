//! Applying matrices to vectors.

use super::Matrix4x3;
use crate::{
    num::Float,
    properties::StructuralProperties,
    vector::{Vector3, Vector4},
};

impl<F: Float> Matrix4x3<F> {
    /// Transforms the given homogeneous vector as the 4x4 matrix with
    /// implicit last row `(0, 0, 0, 1)`. The `w` component is passed through.
    pub fn transform(&self, vector: &Vector4<F>) -> Vector4<F> {
        let w = vector.w();
        let xyz = self.transform_direction(&vector.xyz()) + self.translation_part() * w;
        xyz.extended(w)
    }

    /// Transforms the given position.
    pub fn transform_position(&self, position: &Vector3<F>) -> Vector3<F> {
        if self.properties.is_identity() {
            return *position;
        }
        if self.properties.is_translation() {
            return position + self.translation_part();
        }
        self.transform_direction(position) + self.translation_part()
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
}
