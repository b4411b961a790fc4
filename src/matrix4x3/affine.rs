//! Affine constructors and composition with translations, rotations and
//! scalings.
//!
//! Constructors build the upper three rows of the corresponding 4x4
//! constructors. The composing operations follow the same conventions as
//! for [`Matrix4`]: the factor is applied on the right, and on the left for
//! the `_local` forms.

use super::Matrix4x3;
use crate::{
    dispatch::{FactorKernel, select_factor_kernel},
    matrix3::Matrix3,
    matrix4::Matrix4,
    num::Float,
    properties::{Matrix4x3Properties, StructuralProperties, TransformClass},
    quaternion::Quaternion,
    vector::Vector3,
};

impl<F: Float> Matrix4x3<F> {
    /// Creates a translation matrix.
    pub fn translation(translation: &Vector3<F>) -> Self {
        Self::from_parts(
            &Matrix3::identity(),
            translation,
            Matrix4x3Properties::translation(),
        )
    }

    /// Creates a scaling matrix with the given factors along each axis.
    pub fn scaling(factors: &Vector3<F>) -> Self {
        Self::from_parts(
            &Matrix3::from_diagonal(factors),
            &Vector3::zeros(),
            scaled_properties(Matrix4x3Properties::orthonormal(), factors),
        )
    }

    /// Creates a matrix scaling uniformly by the given factor.
    pub fn uniform_scaling(factor: F) -> Self {
        Self::scaling(&Vector3::same(factor))
    }

    /// Creates a rotation by the given angle around the given unit axis.
    pub fn rotation(angle: F, axis: &Vector3<F>) -> Self {
        Self::from_affine_matrix4(&Matrix4::rotation(angle, axis))
    }

    /// Creates a rotation by the given angle around the x-axis.
    pub fn rotation_x(angle: F) -> Self {
        Self::from_affine_matrix4(&Matrix4::rotation_x(angle))
    }

    /// Creates a rotation by the given angle around the y-axis.
    pub fn rotation_y(angle: F) -> Self {
        Self::from_affine_matrix4(&Matrix4::rotation_y(angle))
    }

    /// Creates a rotation by the given angle around the z-axis.
    pub fn rotation_z(angle: F) -> Self {
        Self::from_affine_matrix4(&Matrix4::rotation_z(angle))
    }

    /// Creates the rotation `Rx(angle_x) * Ry(angle_y) * Rz(angle_z)`.
    pub fn rotation_xyz(angle_x: F, angle_y: F, angle_z: F) -> Self {
        Self::from_affine_matrix4(&Matrix4::rotation_xyz(angle_x, angle_y, angle_z))
    }

    /// Creates the rotation `Rz(angle_z) * Ry(angle_y) * Rx(angle_x)`.
    pub fn rotation_zyx(angle_z: F, angle_y: F, angle_x: F) -> Self {
        Self::from_affine_matrix4(&Matrix4::rotation_zyx(angle_z, angle_y, angle_x))
    }

    /// Creates the rotation `Ry(angle_y) * Rx(angle_x) * Rz(angle_z)`.
    pub fn rotation_yxz(angle_y: F, angle_x: F, angle_z: F) -> Self {
        Self::from_affine_matrix4(&Matrix4::rotation_yxz(angle_y, angle_x, angle_z))
    }

    /// Creates the rotation represented by the given unit quaternion.
    pub fn from_quaternion(rotation: &Quaternion<F>) -> Self {
        Self::from_affine_matrix4(&Matrix4::from_quaternion(rotation))
    }

    /// Creates the matrix `T * R * S`.
    pub fn translation_rotation_scale(
        translation: &Vector3<F>,
        rotation: &Quaternion<F>,
        scaling: &Vector3<F>,
    ) -> Self {
        Self::from_affine_matrix4(&Matrix4::translation_rotation_scale(
            translation,
            rotation,
            scaling,
        ))
    }

    /// Creates a right-handed view matrix for an observer at `eye` looking
    /// at `center`.
    pub fn look_at_rh(eye: &Vector3<F>, center: &Vector3<F>, up: &Vector3<F>) -> Self {
        Self::from_affine_matrix4(&Matrix4::look_at_rh(eye, center, up))
    }

    /// Creates a right-handed view rotation looking along `direction`.
    pub fn look_along(direction: &Vector3<F>, up: &Vector3<F>) -> Self {
        Self::from_affine_matrix4(&Matrix4::look_along(direction, up))
    }

    /// Creates an orthographic projection of the given box.
    pub fn orthographic(
        left: F,
        right: F,
        bottom: F,
        top: F,
        z_near: F,
        z_far: F,
        z_zero_to_one: bool,
    ) -> Self {
        Self::from_affine_matrix4(&Matrix4::orthographic(
            left,
            right,
            bottom,
            top,
            z_near,
            z_far,
            z_zero_to_one,
        ))
    }

    /// Extracts the rotation of the 3x3 block as a unit quaternion, removing
    /// any scaling first.
    pub fn to_quaternion(&self) -> Quaternion<F> {
        let linear = if self.properties.is_orthonormal() {
            self.linear_part()
        } else {
            self.linear_part().with_normalized_columns()
        };
        Quaternion::from_rotation_matrix(&linear)
    }

    /// Appends a translation: `self * T(translation)`.
    #[inline]
    pub fn translate(&mut self, translation: &Vector3<F>) -> &mut Self {
        self.in_place(|this, dst| this.translate_into(translation, dst))
    }

    /// Writes `self * T(translation)` to `dst`.
    pub fn translate_into(&self, translation: &Vector3<F>, dst: &mut Self) {
        if select_factor_kernel(self.properties) == FactorKernel::Constructor {
            *dst = Self::translation(translation);
            return;
        }
        let (x, y, z) = (translation.x(), translation.y(), translation.z());
        *dst = Self {
            m30: self.m00 * x + self.m10 * y + self.m20 * z + self.m30,
            m31: self.m01 * x + self.m11 * y + self.m21 * z + self.m31,
            m32: self.m02 * x + self.m12 * y + self.m22 * z + self.m32,
            properties: self.properties.weaken(TransformClass::Identity),
            ..*self
        };
    }

    /// Prepends a translation: `T(translation) * self`.
    #[inline]
    pub fn translate_local(&mut self, translation: &Vector3<F>) -> &mut Self {
        self.in_place(|this, dst| this.translate_local_into(translation, dst))
    }

    /// Writes `T(translation) * self` to `dst`.
    pub fn translate_local_into(&self, translation: &Vector3<F>, dst: &mut Self) {
        *dst = Self {
            m30: self.m30 + translation.x(),
            m31: self.m31 + translation.y(),
            m32: self.m32 + translation.z(),
            properties: self.properties.weaken(TransformClass::Identity),
            ..*self
        };
    }

    /// Appends a scaling: `self * S(factors)`.
    #[inline]
    pub fn scale(&mut self, factors: &Vector3<F>) -> &mut Self {
        self.in_place(|this, dst| this.scale_into(factors, dst))
    }

    /// Writes `self * S(factors)` to `dst`.
    pub fn scale_into(&self, factors: &Vector3<F>, dst: &mut Self) {
        if select_factor_kernel(self.properties) == FactorKernel::Constructor {
            *dst = Self::scaling(factors);
            return;
        }
        let (x, y, z) = (factors.x(), factors.y(), factors.z());
        *dst = Self {
            m00: self.m00 * x,
            m01: self.m01 * x,
            m02: self.m02 * x,
            m10: self.m10 * y,
            m11: self.m11 * y,
            m12: self.m12 * y,
            m20: self.m20 * z,
            m21: self.m21 * z,
            m22: self.m22 * z,
            properties: scaled_properties(self.properties, factors),
            ..*self
        };
    }

    /// Prepends a scaling: `S(factors) * self`.
    #[inline]
    pub fn scale_local(&mut self, factors: &Vector3<F>) -> &mut Self {
        self.in_place(|this, dst| this.scale_local_into(factors, dst))
    }

    /// Writes `S(factors) * self` to `dst`.
    pub fn scale_local_into(&self, factors: &Vector3<F>, dst: &mut Self) {
        if select_factor_kernel(self.properties) == FactorKernel::Constructor {
            *dst = Self::scaling(factors);
            return;
        }
        let (x, y, z) = (factors.x(), factors.y(), factors.z());
        *dst = Self::with_properties(
            x * self.m00,
            y * self.m01,
            z * self.m02,
            x * self.m10,
            y * self.m11,
            z * self.m12,
            x * self.m20,
            y * self.m21,
            z * self.m22,
            x * self.m30,
            y * self.m31,
            z * self.m32,
            scaled_properties(self.properties, factors),
        );
    }

    /// Appends a rotation by the given angle around the given unit axis.
    #[inline]
    pub fn rotate(&mut self, angle: F, axis: &Vector3<F>) -> &mut Self {
        self.in_place(|this, dst| this.rotate_into(angle, axis, dst))
    }

    /// Writes `self * R(angle, axis)` to `dst`.
    pub fn rotate_into(&self, angle: F, axis: &Vector3<F>, dst: &mut Self) {
        match axis.as_basis_axis() {
            Some((0, sign)) => self.rotate_x_into(sign * angle, dst),
            Some((1, sign)) => self.rotate_y_into(sign * angle, dst),
            Some((_, sign)) => self.rotate_z_into(sign * angle, dst),
            None => self.rotate_by_into(&Matrix3::rotation(angle, axis), dst),
        }
    }

    /// Appends a rotation around the x-axis: `self * Rx(angle)`.
    #[inline]
    pub fn rotate_x(&mut self, angle: F) -> &mut Self {
        self.in_place(|this, dst| this.rotate_x_into(angle, dst))
    }

    /// Writes `self * Rx(angle)` to `dst`.
    pub fn rotate_x_into(&self, angle: F, dst: &mut Self) {
        match select_factor_kernel(self.properties) {
            FactorKernel::Constructor => *dst = Self::rotation_x(angle),
            FactorKernel::Translation => {
                *dst = self.with_rotation_after_translation(&Self::rotation_x(angle));
            }
            _ => {
                let (sin, cos) = angle.sin_cos();
                *dst = Self {
                    m10: self.m10 * cos + self.m20 * sin,
                    m11: self.m11 * cos + self.m21 * sin,
                    m12: self.m12 * cos + self.m22 * sin,
                    m20: self.m20 * cos - self.m10 * sin,
                    m21: self.m21 * cos - self.m11 * sin,
                    m22: self.m22 * cos - self.m12 * sin,
                    properties: self.properties.weaken(TransformClass::Translation),
                    ..*self
                };
            }
        }
    }

    /// Appends a rotation around the y-axis: `self * Ry(angle)`.
    #[inline]
    pub fn rotate_y(&mut self, angle: F) -> &mut Self {
        self.in_place(|this, dst| this.rotate_y_into(angle, dst))
    }

    /// Writes `self * Ry(angle)` to `dst`.
    pub fn rotate_y_into(&self, angle: F, dst: &mut Self) {
        match select_factor_kernel(self.properties) {
            FactorKernel::Constructor => *dst = Self::rotation_y(angle),
            FactorKernel::Translation => {
                *dst = self.with_rotation_after_translation(&Self::rotation_y(angle));
            }
            _ => {
                let (sin, cos) = angle.sin_cos();
                *dst = Self {
                    m00: self.m00 * cos - self.m20 * sin,
                    m01: self.m01 * cos - self.m21 * sin,
                    m02: self.m02 * cos - self.m22 * sin,
                    m20: self.m00 * sin + self.m20 * cos,
                    m21: self.m01 * sin + self.m21 * cos,
                    m22: self.m02 * sin + self.m22 * cos,
                    properties: self.properties.weaken(TransformClass::Translation),
                    ..*self
                };
            }
        }
    }

    /// Appends a rotation around the z-axis: `self * Rz(angle)`.
    #[inline]
    pub fn rotate_z(&mut self, angle: F) -> &mut Self {
        self.in_place(|this, dst| this.rotate_z_into(angle, dst))
    }

    /// Writes `self * Rz(angle)` to `dst`.
    pub fn rotate_z_into(&self, angle: F, dst: &mut Self) {
        match select_factor_kernel(self.properties) {
            FactorKernel::Constructor => *dst = Self::rotation_z(angle),
            FactorKernel::Translation => {
                *dst = self.with_rotation_after_translation(&Self::rotation_z(angle));
            }
            _ => {
                let (sin, cos) = angle.sin_cos();
                *dst = Self {
                    m00: self.m00 * cos + self.m10 * sin,
                    m01: self.m01 * cos + self.m11 * sin,
                    m02: self.m02 * cos + self.m12 * sin,
                    m10: self.m10 * cos - self.m00 * sin,
                    m11: self.m11 * cos - self.m01 * sin,
                    m12: self.m12 * cos - self.m02 * sin,
                    properties: self.properties.weaken(TransformClass::Translation),
                    ..*self
                };
            }
        }
    }

    /// Appends the rotation represented by the given unit quaternion.
    #[inline]
    pub fn rotate_quaternion(&mut self, rotation: &Quaternion<F>) -> &mut Self {
        let linear = Matrix4::from_quaternion(rotation).linear_part();
        self.in_place(|this, dst| this.rotate_by_into(&linear, dst))
    }

    /// Prepends a rotation by the given angle around the given unit axis.
    #[inline]
    pub fn rotate_local(&mut self, angle: F, axis: &Vector3<F>) -> &mut Self {
        let rotation = Self::rotation(angle, axis);
        self.in_place(|this, dst| rotation.multiply_into(this, dst))
    }

    /// Prepends a rotation around the x-axis: `Rx(angle) * self`.
    #[inline]
    pub fn rotate_local_x(&mut self, angle: F) -> &mut Self {
        self.in_place(|this, dst| this.rotate_local_x_into(angle, dst))
    }

    /// Writes `Rx(angle) * self` to `dst`.
    pub fn rotate_local_x_into(&self, angle: F, dst: &mut Self) {
        let (sin, cos) = angle.sin_cos();
        *dst = Self {
            m01: cos * self.m01 - sin * self.m02,
            m02: sin * self.m01 + cos * self.m02,
            m11: cos * self.m11 - sin * self.m12,
            m12: sin * self.m11 + cos * self.m12,
            m21: cos * self.m21 - sin * self.m22,
            m22: sin * self.m21 + cos * self.m22,
            m31: cos * self.m31 - sin * self.m32,
            m32: sin * self.m31 + cos * self.m32,
            properties: self.properties.weaken(TransformClass::Translation),
            ..*self
        };
    }

    /// Prepends a rotation around the y-axis: `Ry(angle) * self`.
    #[inline]
    pub fn rotate_local_y(&mut self, angle: F) -> &mut Self {
        self.in_place(|this, dst| this.rotate_local_y_into(angle, dst))
    }

    /// Writes `Ry(angle) * self` to `dst`.
    pub fn rotate_local_y_into(&self, angle: F, dst: &mut Self) {
        let (sin, cos) = angle.sin_cos();
        *dst = Self {
            m00: cos * self.m00 + sin * self.m02,
            m02: cos * self.m02 - sin * self.m00,
            m10: cos * self.m10 + sin * self.m12,
            m12: cos * self.m12 - sin * self.m10,
            m20: cos * self.m20 + sin * self.m22,
            m22: cos * self.m22 - sin * self.m20,
            m30: cos * self.m30 + sin * self.m32,
            m32: cos * self.m32 - sin * self.m30,
            properties: self.properties.weaken(TransformClass::Translation),
            ..*self
        };
    }

    /// Prepends a rotation around the z-axis: `Rz(angle) * self`.
    #[inline]
    pub fn rotate_local_z(&mut self, angle: F) -> &mut Self {
        self.in_place(|this, dst| this.rotate_local_z_into(angle, dst))
    }

    /// Writes `Rz(angle) * self` to `dst`.
    pub fn rotate_local_z_into(&self, angle: F, dst: &mut Self) {
        let (sin, cos) = angle.sin_cos();
        *dst = Self {
            m00: cos * self.m00 - sin * self.m01,
            m01: sin * self.m00 + cos * self.m01,
            m10: cos * self.m10 - sin * self.m11,
            m11: sin * self.m10 + cos * self.m11,
            m20: cos * self.m20 - sin * self.m21,
            m21: sin * self.m20 + cos * self.m21,
            m30: cos * self.m30 - sin * self.m31,
            m31: sin * self.m30 + cos * self.m31,
            properties: self.properties.weaken(TransformClass::Translation),
            ..*self
        };
    }

    /// Appends a view transform: `self * look_at_rh(eye, center, up)`.
    pub fn look_at(&mut self, eye: &Vector3<F>, center: &Vector3<F>, up: &Vector3<F>) -> &mut Self {
        let view = Self::look_at_rh(eye, center, up);
        self.multiply(&view)
    }

    /// Writes `self * rotation` to `dst` for the given pure rotation block.
    fn rotate_by_into(&self, rotation: &Matrix3<F>, dst: &mut Self) {
        let rotation = Self::from_parts(
            rotation,
            &Vector3::zeros(),
            Matrix4x3Properties::orthonormal(),
        );
        match select_factor_kernel(self.properties) {
            FactorKernel::Constructor => *dst = rotation,
            FactorKernel::Translation => *dst = self.with_rotation_after_translation(&rotation),
            _ => self.mul_affine_into(&rotation, dst),
        }
    }

    fn with_rotation_after_translation(&self, rotation: &Self) -> Self {
        Self {
            m30: self.m30,
            m31: self.m31,
            m32: self.m32,
            properties: Matrix4x3Properties::orthonormal(),
            ..*rotation
        }
    }
}

fn scaled_properties<F: Float>(
    properties: Matrix4x3Properties,
    factors: &Vector3<F>,
) -> Matrix4x3Properties {
    let properties = properties.weaken(TransformClass::Translation);
    if factors.x().abs_equals_one() && factors.y().abs_equals_one() && factors.z().abs_equals_one()
    {
        properties
    } else {
        properties.weaken(TransformClass::Orthonormal)
    }
}
