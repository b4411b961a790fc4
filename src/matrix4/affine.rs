//! Affine constructors and composition with translations, rotations and
//! scalings.
//!
//! The composing operations apply the new factor on the right (`M * F`), so
//! the factor acts first when transforming vectors. Their `_local`
//! counterparts apply it on the left (`F * M`).

use super::Matrix4;
use crate::{
    dispatch::{FactorKernel, select_factor_kernel},
    matrix3::Matrix3,
    num::Float,
    plane::Plane,
    properties::{Matrix4Properties, StructuralProperties, TransformClass},
    quaternion::Quaternion,
    vector::Vector3,
};

impl<F: Float> Matrix4<F> {
    /// Creates a matrix with the given upper-left 3x3 block and translation
    /// and the given properties.
    pub(crate) fn from_linear_and_translation(
        linear: &Matrix3<F>,
        translation: &Vector3<F>,
        properties: Matrix4Properties,
    ) -> Self {
        Self {
            m00: linear.m00(),
            m01: linear.m01(),
            m02: linear.m02(),
            m03: F::ZERO,
            m10: linear.m10(),
            m11: linear.m11(),
            m12: linear.m12(),
            m13: F::ZERO,
            m20: linear.m20(),
            m21: linear.m21(),
            m22: linear.m22(),
            m23: F::ZERO,
            m30: translation.x(),
            m31: translation.y(),
            m32: translation.z(),
            m33: F::ONE,
            properties,
        }
    }

    /// Creates a translation matrix.
    #[inline]
    pub fn translation(translation: &Vector3<F>) -> Self {
        Self::from_linear_and_translation(
            &Matrix3::identity(),
            translation,
            Matrix4Properties::translation(),
        )
    }

    /// Creates a scaling matrix with the given factors along each axis.
    #[inline]
    pub fn scaling(factors: &Vector3<F>) -> Self {
        Self::from_linear_and_translation(
            &Matrix3::from_diagonal(factors),
            &Vector3::zeros(),
            scaled_properties(Matrix4Properties::orthonormal(), factors),
        )
    }

    /// Creates a matrix scaling uniformly by the given factor.
    #[inline]
    pub fn uniform_scaling(factor: F) -> Self {
        Self::scaling(&Vector3::same(factor))
    }

    /// Creates a rotation by the given angle around the given unit axis.
    /// Rotations around a basis axis use the dedicated constructor for that
    /// axis.
    pub fn rotation(angle: F, axis: &Vector3<F>) -> Self {
        match axis.as_basis_axis() {
            Some((0, sign)) => Self::rotation_x(sign * angle),
            Some((1, sign)) => Self::rotation_y(sign * angle),
            Some((_, sign)) => Self::rotation_z(sign * angle),
            None => Self::from_linear_and_translation(
                &Matrix3::rotation(angle, axis),
                &Vector3::zeros(),
                Matrix4Properties::orthonormal(),
            ),
        }
    }

    /// Creates a rotation by the given angle around the x-axis.
    pub fn rotation_x(angle: F) -> Self {
        let (sin, cos) = angle.sin_cos();
        let mut m = Self::identity();
        m.m11 = cos;
        m.m12 = sin;
        m.m21 = -sin;
        m.m22 = cos;
        m.properties = Matrix4Properties::orthonormal();
        m
    }

    /// Creates a rotation by the given angle around the y-axis.
    pub fn rotation_y(angle: F) -> Self {
        let (sin, cos) = angle.sin_cos();
        let mut m = Self::identity();
        m.m00 = cos;
        m.m02 = -sin;
        m.m20 = sin;
        m.m22 = cos;
        m.properties = Matrix4Properties::orthonormal();
        m
    }

    /// Creates a rotation by the given angle around the z-axis.
    pub fn rotation_z(angle: F) -> Self {
        let (sin, cos) = angle.sin_cos();
        let mut m = Self::identity();
        m.m00 = cos;
        m.m01 = sin;
        m.m10 = -sin;
        m.m11 = cos;
        m.properties = Matrix4Properties::orthonormal();
        m
    }

    /// Creates the rotation `Rx(angle_x) * Ry(angle_y) * Rz(angle_z)`.
    pub fn rotation_xyz(angle_x: F, angle_y: F, angle_z: F) -> Self {
        let (sx, cx) = angle_x.sin_cos();
        let (sy, cy) = angle_y.sin_cos();
        let (sz, cz) = angle_z.sin_cos();
        let linear = Matrix3::from_elements(
            cy * cz,
            cx * sz + sx * sy * cz,
            sx * sz - cx * sy * cz,
            -cy * sz,
            cx * cz - sx * sy * sz,
            sx * cz + cx * sy * sz,
            sy,
            -sx * cy,
            cx * cy,
        );
        Self::from_linear_and_translation(
            &linear,
            &Vector3::zeros(),
            Matrix4Properties::orthonormal(),
        )
    }

    /// Creates the rotation `Rz(angle_z) * Ry(angle_y) * Rx(angle_x)`.
    pub fn rotation_zyx(angle_z: F, angle_y: F, angle_x: F) -> Self {
        let (sx, cx) = angle_x.sin_cos();
        let (sy, cy) = angle_y.sin_cos();
        let (sz, cz) = angle_z.sin_cos();
        let linear = Matrix3::from_elements(
            cz * cy,
            sz * cy,
            -sy,
            cz * sy * sx - sz * cx,
            sz * sy * sx + cz * cx,
            cy * sx,
            cz * sy * cx + sz * sx,
            sz * sy * cx - cz * sx,
            cy * cx,
        );
        Self::from_linear_and_translation(
            &linear,
            &Vector3::zeros(),
            Matrix4Properties::orthonormal(),
        )
    }

    /// Creates the rotation `Ry(angle_y) * Rx(angle_x) * Rz(angle_z)`.
    pub fn rotation_yxz(angle_y: F, angle_x: F, angle_z: F) -> Self {
        let (sx, cx) = angle_x.sin_cos();
        let (sy, cy) = angle_y.sin_cos();
        let (sz, cz) = angle_z.sin_cos();
        let linear = Matrix3::from_elements(
            cy * cz + sy * sx * sz,
            cx * sz,
            -sy * cz + cy * sx * sz,
            -cy * sz + sy * sx * cz,
            cx * cz,
            sy * sz + cy * sx * cz,
            sy * cx,
            -sx,
            cy * cx,
        );
        Self::from_linear_and_translation(
            &linear,
            &Vector3::zeros(),
            Matrix4Properties::orthonormal(),
        )
    }

    /// Creates the rotation represented by the given unit quaternion.
    pub fn from_quaternion(rotation: &Quaternion<F>) -> Self {
        Self::translation_rotation_scale(&Vector3::zeros(), rotation, &Vector3::same(F::ONE))
    }

    /// Creates the matrix `T * R * S` that scales by the given factors,
    /// rotates by the given unit quaternion and then translates.
    pub fn translation_rotation_scale(
        translation: &Vector3<F>,
        rotation: &Quaternion<F>,
        scaling: &Vector3<F>,
    ) -> Self {
        let (x, y, z, w) = (rotation.x(), rotation.y(), rotation.z(), rotation.w());
        let (dx, dy, dz) = (x + x, y + y, z + z);
        let q00 = dx * x;
        let q11 = dy * y;
        let q22 = dz * z;
        let q01 = dx * y;
        let q02 = dx * z;
        let q03 = dx * w;
        let q12 = dy * z;
        let q13 = dy * w;
        let q23 = dz * w;
        let (sx, sy, sz) = (scaling.x(), scaling.y(), scaling.z());
        let linear = Matrix3::from_elements(
            sx - (q11 + q22) * sx,
            (q01 + q23) * sx,
            (q02 - q13) * sx,
            (q01 - q23) * sy,
            sy - (q22 + q00) * sy,
            (q12 + q03) * sy,
            (q02 + q13) * sz,
            (q12 - q03) * sz,
            sz - (q11 + q00) * sz,
        );
        Self::from_linear_and_translation(
            &linear,
            translation,
            scaled_properties(Matrix4Properties::orthonormal(), scaling),
        )
    }

    /// Creates the reflection about the given plane.
    pub fn reflection(plane: &Plane<F>) -> Self {
        let plane = plane.normalized();
        let (a, b, c, d) = (plane.a(), plane.b(), plane.c(), plane.d());
        let (da, db, dc, dd) = (a + a, b + b, c + c, d + d);
        let linear = Matrix3::from_elements(
            F::ONE - da * a,
            -da * b,
            -da * c,
            -db * a,
            F::ONE - db * b,
            -db * c,
            -dc * a,
            -dc * b,
            F::ONE - dc * c,
        );
        Self::from_linear_and_translation(
            &linear,
            &Vector3::new(-dd * a, -dd * b, -dd * c),
            Matrix4Properties::orthonormal(),
        )
    }

    /// Appends a translation: `self * T(translation)`.
    #[inline]
    pub fn translate(&mut self, translation: &Vector3<F>) -> &mut Self {
        self.in_place(|this, dst| this.translate_into(translation, dst))
    }

    /// Writes `self * T(translation)` to `dst`.
    pub fn translate_into(&self, translation: &Vector3<F>, dst: &mut Self) {
        let (x, y, z) = (translation.x(), translation.y(), translation.z());
        let properties = self
            .properties
            .weaken(TransformClass::Identity)
            .difference(Matrix4Properties::PERSPECTIVE);
        match select_factor_kernel(self.properties) {
            FactorKernel::Constructor => *dst = Self::translation(translation),
            FactorKernel::Translation | FactorKernel::Affine => {
                *dst = Self {
                    m30: self.m00 * x + self.m10 * y + self.m20 * z + self.m30,
                    m31: self.m01 * x + self.m11 * y + self.m21 * z + self.m31,
                    m32: self.m02 * x + self.m12 * y + self.m22 * z + self.m32,
                    properties,
                    ..*self
                };
            }
            FactorKernel::Perspective | FactorKernel::Generic => {
                *dst = Self {
                    m30: self.m00 * x + self.m10 * y + self.m20 * z + self.m30,
                    m31: self.m01 * x + self.m11 * y + self.m21 * z + self.m31,
                    m32: self.m02 * x + self.m12 * y + self.m22 * z + self.m32,
                    m33: self.m03 * x + self.m13 * y + self.m23 * z + self.m33,
                    properties,
                    ..*self
                };
            }
        }
    }

    /// Prepends a translation: `T(translation) * self`.
    #[inline]
    pub fn translate_local(&mut self, translation: &Vector3<F>) -> &mut Self {
        self.in_place(|this, dst| this.translate_local_into(translation, dst))
    }

    /// Writes `T(translation) * self` to `dst`.
    pub fn translate_local_into(&self, translation: &Vector3<F>, dst: &mut Self) {
        let (x, y, z) = (translation.x(), translation.y(), translation.z());
        let properties = self
            .properties
            .weaken(TransformClass::Identity)
            .difference(Matrix4Properties::PERSPECTIVE);
        match select_factor_kernel(self.properties) {
            FactorKernel::Constructor => *dst = Self::translation(translation),
            FactorKernel::Translation | FactorKernel::Affine => {
                *dst = Self {
                    m30: self.m30 + x,
                    m31: self.m31 + y,
                    m32: self.m32 + z,
                    properties,
                    ..*self
                };
            }
            FactorKernel::Perspective | FactorKernel::Generic => {
                *dst = Self {
                    m00: self.m00 + x * self.m03,
                    m01: self.m01 + y * self.m03,
                    m02: self.m02 + z * self.m03,
                    m10: self.m10 + x * self.m13,
                    m11: self.m11 + y * self.m13,
                    m12: self.m12 + z * self.m13,
                    m20: self.m20 + x * self.m23,
                    m21: self.m21 + y * self.m23,
                    m22: self.m22 + z * self.m23,
                    m30: self.m30 + x * self.m33,
                    m31: self.m31 + y * self.m33,
                    m32: self.m32 + z * self.m33,
                    properties,
                    ..*self
                };
            }
        }
    }

    /// Appends a scaling: `self * S(factors)`.
    #[inline]
    pub fn scale(&mut self, factors: &Vector3<F>) -> &mut Self {
        self.in_place(|this, dst| this.scale_into(factors, dst))
    }

    /// Writes `self * S(factors)` to `dst`.
    pub fn scale_into(&self, factors: &Vector3<F>, dst: &mut Self) {
        let (x, y, z) = (factors.x(), factors.y(), factors.z());
        let properties = scaled_properties(self.properties, factors);
        match select_factor_kernel(self.properties) {
            FactorKernel::Constructor => *dst = Self::scaling(factors),
            FactorKernel::Translation | FactorKernel::Affine => {
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
                    properties,
                    ..*self
                };
            }
            FactorKernel::Perspective | FactorKernel::Generic => {
                *dst = Self {
                    m00: self.m00 * x,
                    m01: self.m01 * x,
                    m02: self.m02 * x,
                    m03: self.m03 * x,
                    m10: self.m10 * y,
                    m11: self.m11 * y,
                    m12: self.m12 * y,
                    m13: self.m13 * y,
                    m20: self.m20 * z,
                    m21: self.m21 * z,
                    m22: self.m22 * z,
                    m23: self.m23 * z,
                    properties,
                    ..*self
                };
            }
        }
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
        *dst = Self {
            m00: x * self.m00,
            m01: y * self.m01,
            m02: z * self.m02,
            m10: x * self.m10,
            m11: y * self.m11,
            m12: z * self.m12,
            m20: x * self.m20,
            m21: y * self.m21,
            m22: z * self.m22,
            m30: x * self.m30,
            m31: y * self.m31,
            m32: z * self.m32,
            properties: scaled_properties(self.properties, factors),
            ..*self
        };
    }

    /// Appends a scaling about the given origin:
    /// `self * T(origin) * S(factors) * T(-origin)`.
    pub fn scale_around(&mut self, factors: &Vector3<F>, origin: &Vector3<F>) -> &mut Self {
        self.translate(origin).scale(factors).translate(&-origin)
    }

    /// Writes `self * T(origin) * S(factors) * T(-origin)` to `dst`.
    pub fn scale_around_into(&self, factors: &Vector3<F>, origin: &Vector3<F>, dst: &mut Self) {
        *dst = *self;
        dst.scale_around(factors, origin);
    }

    /// Appends a rotation by the given angle around the given unit axis:
    /// `self * R(angle, axis)`.
    #[inline]
    pub fn rotate(&mut self, angle: F, axis: &Vector3<F>) -> &mut Self {
        self.in_place(|this, dst| this.rotate_into(angle, axis, dst))
    }

    /// Writes `self * R(angle, axis)` to `dst`. Rotations around a basis axis
    /// use the cheaper kernel for that axis.
    pub fn rotate_into(&self, angle: F, axis: &Vector3<F>, dst: &mut Self) {
        match select_factor_kernel(self.properties) {
            FactorKernel::Constructor => *dst = Self::rotation(angle, axis),
            FactorKernel::Translation => {
                *dst = self.with_rotation_after_translation(&Self::rotation(angle, axis));
            }
            kernel => match axis.as_basis_axis() {
                Some((0, sign)) => self.rotate_x_into(sign * angle, dst),
                Some((1, sign)) => self.rotate_y_into(sign * angle, dst),
                Some((_, sign)) => self.rotate_z_into(sign * angle, dst),
                None => {
                    let rotation = Matrix3::rotation(angle, axis);
                    if kernel == FactorKernel::Affine {
                        self.mul_linear_affine_into(&rotation, dst);
                    } else {
                        self.mul_linear_generic_into(&rotation, dst);
                    }
                }
            },
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
                    m13: self.m13 * cos + self.m23 * sin,
                    m20: self.m20 * cos - self.m10 * sin,
                    m21: self.m21 * cos - self.m11 * sin,
                    m22: self.m22 * cos - self.m12 * sin,
                    m23: self.m23 * cos - self.m13 * sin,
                    properties: rotated_properties(self.properties),
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
                    m03: self.m03 * cos - self.m23 * sin,
                    m20: self.m00 * sin + self.m20 * cos,
                    m21: self.m01 * sin + self.m21 * cos,
                    m22: self.m02 * sin + self.m22 * cos,
                    m23: self.m03 * sin + self.m23 * cos,
                    properties: rotated_properties(self.properties),
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
                    m03: self.m03 * cos + self.m13 * sin,
                    m10: self.m10 * cos - self.m00 * sin,
                    m11: self.m11 * cos - self.m01 * sin,
                    m12: self.m12 * cos - self.m02 * sin,
                    m13: self.m13 * cos - self.m03 * sin,
                    properties: rotated_properties(self.properties),
                    ..*self
                };
            }
        }
    }

    /// Appends the rotation `Rx(angle_x) * Ry(angle_y) * Rz(angle_z)`.
    pub fn rotate_xyz(&mut self, angle_x: F, angle_y: F, angle_z: F) -> &mut Self {
        let rotation = Self::rotation_xyz(angle_x, angle_y, angle_z);
        self.in_place(|this, dst| this.rotate_by_into(&rotation, dst))
    }

    /// Appends the rotation `Rz(angle_z) * Ry(angle_y) * Rx(angle_x)`.
    pub fn rotate_zyx(&mut self, angle_z: F, angle_y: F, angle_x: F) -> &mut Self {
        let rotation = Self::rotation_zyx(angle_z, angle_y, angle_x);
        self.in_place(|this, dst| this.rotate_by_into(&rotation, dst))
    }

    /// Appends the rotation `Ry(angle_y) * Rx(angle_x) * Rz(angle_z)`.
    pub fn rotate_yxz(&mut self, angle_y: F, angle_x: F, angle_z: F) -> &mut Self {
        let rotation = Self::rotation_yxz(angle_y, angle_x, angle_z);
        self.in_place(|this, dst| this.rotate_by_into(&rotation, dst))
    }

    /// Appends the rotation represented by the given unit quaternion.
    #[inline]
    pub fn rotate_quaternion(&mut self, rotation: &Quaternion<F>) -> &mut Self {
        self.in_place(|this, dst| this.rotate_quaternion_into(rotation, dst))
    }

    /// Writes `self * R(rotation)` to `dst`.
    #[inline]
    pub fn rotate_quaternion_into(&self, rotation: &Quaternion<F>, dst: &mut Self) {
        self.rotate_by_into(&Self::from_quaternion(rotation), dst);
    }

    /// Prepends a rotation by the given angle around the given unit axis:
    /// `R(angle, axis) * self`.
    #[inline]
    pub fn rotate_local(&mut self, angle: F, axis: &Vector3<F>) -> &mut Self {
        self.in_place(|this, dst| this.rotate_local_into(angle, axis, dst))
    }

    /// Writes `R(angle, axis) * self` to `dst`.
    pub fn rotate_local_into(&self, angle: F, axis: &Vector3<F>, dst: &mut Self) {
        if select_factor_kernel(self.properties) == FactorKernel::Constructor {
            *dst = Self::rotation(angle, axis);
            return;
        }
        let r = Matrix3::rotation(angle, axis);
        let row_0 = |c0: F, c1: F, c2: F| r.m00() * c0 + r.m10() * c1 + r.m20() * c2;
        let row_1 = |c0: F, c1: F, c2: F| r.m01() * c0 + r.m11() * c1 + r.m21() * c2;
        let row_2 = |c0: F, c1: F, c2: F| r.m02() * c0 + r.m12() * c1 + r.m22() * c2;
        *dst = Self {
            m00: row_0(self.m00, self.m01, self.m02),
            m01: row_1(self.m00, self.m01, self.m02),
            m02: row_2(self.m00, self.m01, self.m02),
            m10: row_0(self.m10, self.m11, self.m12),
            m11: row_1(self.m10, self.m11, self.m12),
            m12: row_2(self.m10, self.m11, self.m12),
            m20: row_0(self.m20, self.m21, self.m22),
            m21: row_1(self.m20, self.m21, self.m22),
            m22: row_2(self.m20, self.m21, self.m22),
            m30: row_0(self.m30, self.m31, self.m32),
            m31: row_1(self.m30, self.m31, self.m32),
            m32: row_2(self.m30, self.m31, self.m32),
            properties: rotated_properties(self.properties),
            ..*self
        };
    }

    /// Prepends a rotation around the x-axis: `Rx(angle) * self`.
    #[inline]
    pub fn rotate_local_x(&mut self, angle: F) -> &mut Self {
        self.in_place(|this, dst| this.rotate_local_x_into(angle, dst))
    }

    /// Writes `Rx(angle) * self` to `dst`.
    pub fn rotate_local_x_into(&self, angle: F, dst: &mut Self) {
        if select_factor_kernel(self.properties) == FactorKernel::Constructor {
            *dst = Self::rotation_x(angle);
            return;
        }
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
            properties: rotated_properties(self.properties),
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
        if select_factor_kernel(self.properties) == FactorKernel::Constructor {
            *dst = Self::rotation_y(angle);
            return;
        }
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
            properties: rotated_properties(self.properties),
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
        if select_factor_kernel(self.properties) == FactorKernel::Constructor {
            *dst = Self::rotation_z(angle);
            return;
        }
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
            properties: rotated_properties(self.properties),
            ..*self
        };
    }

    /// Prepends the rotation represented by the given unit quaternion.
    #[inline]
    pub fn rotate_local_quaternion(&mut self, rotation: &Quaternion<F>) -> &mut Self {
        self.in_place(|this, dst| Self::from_quaternion(rotation).multiply_into(this, dst))
    }

    /// Extracts the rotation of the upper-left 3x3 block as a unit
    /// quaternion, removing any scaling first.
    pub fn to_quaternion(&self) -> Quaternion<F> {
        let linear = if self.properties.is_orthonormal() {
            self.linear_part()
        } else {
            self.linear_part().with_normalized_columns()
        };
        Quaternion::from_rotation_matrix(&linear)
    }

    /// Writes `self * rotation` to `dst`, where `rotation` is a pure rotation
    /// matrix.
    fn rotate_by_into(&self, rotation: &Self, dst: &mut Self) {
        match select_factor_kernel(self.properties) {
            FactorKernel::Constructor => *dst = *rotation,
            FactorKernel::Translation => *dst = self.with_rotation_after_translation(rotation),
            _ => self.multiply_into(rotation, dst),
        }
    }

    /// The product of this pure translation and the given pure rotation.
    fn with_rotation_after_translation(&self, rotation: &Self) -> Self {
        Self {
            m30: self.m30,
            m31: self.m31,
            m32: self.m32,
            properties: Matrix4Properties::orthonormal(),
            ..*rotation
        }
    }

    /// Writes `self * L` to `dst`, where `L` is the 4x4 extension of the
    /// given 3x3 block, assuming `self` is affine.
    fn mul_linear_affine_into(&self, linear: &Matrix3<F>, dst: &mut Self) {
        let l = linear;
        *dst = Self {
            m00: self.m00 * l.m00() + self.m10 * l.m01() + self.m20 * l.m02(),
            m01: self.m01 * l.m00() + self.m11 * l.m01() + self.m21 * l.m02(),
            m02: self.m02 * l.m00() + self.m12 * l.m01() + self.m22 * l.m02(),
            m10: self.m00 * l.m10() + self.m10 * l.m11() + self.m20 * l.m12(),
            m11: self.m01 * l.m10() + self.m11 * l.m11() + self.m21 * l.m12(),
            m12: self.m02 * l.m10() + self.m12 * l.m11() + self.m22 * l.m12(),
            m20: self.m00 * l.m20() + self.m10 * l.m21() + self.m20 * l.m22(),
            m21: self.m01 * l.m20() + self.m11 * l.m21() + self.m21 * l.m22(),
            m22: self.m02 * l.m20() + self.m12 * l.m21() + self.m22 * l.m22(),
            properties: rotated_properties(self.properties),
            ..*self
        };
    }

    /// Writes `self * L` to `dst`, where `L` is the 4x4 extension of the
    /// given 3x3 block.
    fn mul_linear_generic_into(&self, linear: &Matrix3<F>, dst: &mut Self) {
        let l = linear;
        *dst = Self {
            m00: self.m00 * l.m00() + self.m10 * l.m01() + self.m20 * l.m02(),
            m01: self.m01 * l.m00() + self.m11 * l.m01() + self.m21 * l.m02(),
            m02: self.m02 * l.m00() + self.m12 * l.m01() + self.m22 * l.m02(),
            m03: self.m03 * l.m00() + self.m13 * l.m01() + self.m23 * l.m02(),
            m10: self.m00 * l.m10() + self.m10 * l.m11() + self.m20 * l.m12(),
            m11: self.m01 * l.m10() + self.m11 * l.m11() + self.m21 * l.m12(),
            m12: self.m02 * l.m10() + self.m12 * l.m11() + self.m22 * l.m12(),
            m13: self.m03 * l.m10() + self.m13 * l.m11() + self.m23 * l.m12(),
            m20: self.m00 * l.m20() + self.m10 * l.m21() + self.m20 * l.m22(),
            m21: self.m01 * l.m20() + self.m11 * l.m21() + self.m21 * l.m22(),
            m22: self.m02 * l.m20() + self.m12 * l.m21() + self.m22 * l.m22(),
            m23: self.m03 * l.m20() + self.m13 * l.m21() + self.m23 * l.m22(),
            properties: rotated_properties(self.properties),
            ..*self
        };
    }
}

/// Properties after composing with a rotation.
fn rotated_properties(properties: Matrix4Properties) -> Matrix4Properties {
    properties
        .weaken(TransformClass::Translation)
        .difference(Matrix4Properties::PERSPECTIVE)
}

/// Properties after composing with a scaling by the given factors.
fn scaled_properties<F: Float>(
    properties: Matrix4Properties,
    factors: &Vector3<F>,
) -> Matrix4Properties {
    let properties = rotated_properties(properties);
    if factors.x().abs_equals_one() && factors.y().abs_equals_one() && factors.z().abs_equals_one()
    {
        properties
    } else {
        properties.weaken(TransformClass::Orthonormal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    type M = Matrix4<f64>;

    const EPSILON: f64 = 1e-12;

    fn sample_affine() -> M {
        let mut m = M::rotation(0.9, &Vector3::new(2.0, -1.0, 2.0).normalized());
        m.scale(&Vector3::new(1.5, 2.0, 0.5))
            .translate(&Vector3::new(-1.0, 4.0, 2.0));
        m
    }

    fn sample_general() -> M {
        M::from_elements(
            2.0, 0.5, -1.0, 0.25, 1.5, 3.0, 0.0, -0.5, -2.0, 1.0, 4.0, 0.75, 0.3, -0.7, 1.1, 2.0,
        )
    }

    #[test]
    fn rotating_identity_uses_constructor() {
        let mut m = M::identity();
        m.rotate_z(FRAC_PI_2);
        assert_eq!(m, M::rotation_z(FRAC_PI_2));
        assert_eq!(m.properties(), Matrix4Properties::orthonormal());
    }

    #[test]
    fn rotating_translation_keeps_translation_column() {
        let mut m = M::translation(&Vector3::new(1.0, 2.0, 3.0));
        m.rotate_z(FRAC_PI_2);
        assert_abs_diff_eq!(
            m.linear_part(),
            M::rotation_z(FRAC_PI_2).linear_part(),
            epsilon = EPSILON
        );
        assert_eq!(m.translation_part(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(m.properties(), Matrix4Properties::orthonormal());
    }

    #[test]
    fn quarter_turn_rotates_x_axis_onto_y_axis() {
        let m = M::rotation_z(FRAC_PI_2);
        assert_abs_diff_eq!(
            m.transform_direction(&Vector3::unit_x()),
            Vector3::unit_y(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn rotation_around_basis_axis_uses_dedicated_constructor() {
        assert_eq!(M::rotation(0.7, &Vector3::unit_x()), M::rotation_x(0.7));
        assert_eq!(M::rotation(0.7, &-Vector3::unit_y()), M::rotation_y(-0.7));
    }

    #[test]
    fn axis_angle_rotation_around_basis_axis_matches_dedicated_rotation() {
        let axis = Vector3::new(1e-300, 0.0, 1.0);
        let general = M::rotation(0.4, &axis);
        assert_abs_diff_eq!(general, M::rotation_z(0.4), epsilon = EPSILON);
    }

    #[test]
    fn euler_constructors_match_composed_rotations() {
        let (ax, ay, az) = (0.3, -1.1, 2.0);
        assert_abs_diff_eq!(
            M::rotation_xyz(ax, ay, az),
            M::rotation_x(ax) * M::rotation_y(ay) * M::rotation_z(az),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            M::rotation_zyx(az, ay, ax),
            M::rotation_z(az) * M::rotation_y(ay) * M::rotation_x(ax),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            M::rotation_yxz(ay, ax, az),
            M::rotation_y(ay) * M::rotation_x(ax) * M::rotation_z(az),
            epsilon = EPSILON
        );
    }

    #[test]
    fn composing_euler_rotations_matches_constructors() {
        let mut m = sample_affine();
        let expected = m * M::rotation_xyz(0.1, 0.2, 0.3);
        m.rotate_xyz(0.1, 0.2, 0.3);
        assert_abs_diff_eq!(m, expected, epsilon = EPSILON);

        let mut m = M::translation(&Vector3::new(1.0, 2.0, 3.0));
        m.rotate_zyx(0.3, 0.2, 0.1).rotate_yxz(-0.2, 0.4, 0.0);
        assert_eq!(m.translation_part(), Vector3::new(1.0, 2.0, 3.0));
        assert!(m.properties().is_orthonormal());
        assert!(m.properties_hold());
    }

    #[test]
    fn quaternion_rotation_matches_axis_angle_rotation() {
        let axis = Vector3::new(1.0, 2.0, 2.0).normalized();
        let q = Quaternion::from_axis_angle(&axis, 1.2);
        assert_abs_diff_eq!(
            M::from_quaternion(&q),
            M::rotation(1.2, &axis),
            epsilon = EPSILON
        );

        let mut m = sample_affine();
        let expected = m * M::rotation(1.2, &axis);
        m.rotate_quaternion(&q);
        assert_abs_diff_eq!(m, expected, epsilon = EPSILON);

        let mut m = sample_affine();
        let expected = M::rotation(1.2, &axis) * m;
        m.rotate_local_quaternion(&q);
        assert_abs_diff_eq!(m, expected, epsilon = EPSILON);
    }

    #[test]
    fn extracted_quaternion_ignores_scaling_and_translation() {
        let q = Quaternion::from_axis_angle(&Vector3::new(0.0, 0.6, -0.8), 2.1);
        let m = M::translation_rotation_scale(
            &Vector3::new(4.0, 5.0, 6.0),
            &q,
            &Vector3::new(3.0, 0.5, 2.0),
        );
        let extracted = m.to_quaternion();
        assert_abs_diff_eq!(
            M::from_quaternion(&extracted),
            M::from_quaternion(&q),
            epsilon = 1e-9
        );
    }

    #[test]
    fn translation_rotation_scale_composes_in_order() {
        let t = Vector3::new(1.0, -2.0, 0.5);
        let q = Quaternion::from_axis_angle(&Vector3::unit_y(), 0.8);
        let s = Vector3::new(2.0, 3.0, 4.0);
        let expected = M::translation(&t) * M::from_quaternion(&q) * M::scaling(&s);
        let m = M::translation_rotation_scale(&t, &q, &s);
        assert_abs_diff_eq!(m, expected, epsilon = EPSILON);
        assert_eq!(m.properties(), Matrix4Properties::affine());

        let unit = M::translation_rotation_scale(&t, &q, &Vector3::new(1.0, -1.0, 1.0));
        assert_eq!(unit.properties(), Matrix4Properties::orthonormal());
    }

    #[test]
    fn reflection_mirrors_points_across_plane() {
        let plane = Plane::from_point_normal(&Vector3::new(0.0, 0.0, 2.0), &Vector3::unit_z());
        let m = M::reflection(&plane);
        assert_abs_diff_eq!(
            m.transform_position(&Vector3::new(1.0, 1.0, 5.0)),
            Vector3::new(1.0, 1.0, -1.0),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(m.determinant(), -1.0, epsilon = EPSILON);
        assert!(m.properties_hold());
    }

    #[test]
    fn scaling_properties_depend_on_unit_factors() {
        assert_eq!(
            M::scaling(&Vector3::new(2.0, 1.0, 1.0)).properties(),
            Matrix4Properties::affine()
        );
        assert_eq!(
            M::scaling(&Vector3::new(-1.0, 1.0, -1.0)).properties(),
            Matrix4Properties::orthonormal()
        );
        let mut m = M::rotation_x(0.3);
        m.scale(&Vector3::new(1.0, 1.0, -1.0));
        assert_eq!(m.properties(), Matrix4Properties::orthonormal());
        m.scale(&Vector3::same(2.0));
        assert_eq!(m.properties(), Matrix4Properties::affine());
    }

    #[test]
    fn translating_keeps_chain_below_identity() {
        let mut m = M::rotation_y(0.5);
        m.translate(&Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(m.properties(), Matrix4Properties::orthonormal());

        let mut t = M::translation(&Vector3::new(1.0, 0.0, 0.0));
        t.translate(&Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(t, M::translation(&Vector3::new(1.0, 2.0, 0.0)));
        assert_eq!(t.properties(), Matrix4Properties::translation());
    }

    #[test]
    fn composing_with_perspective_drops_perspective() {
        let mut m = M::perspective(1.0, 1.3, 0.1, 100.0, false);
        m.translate(&Vector3::new(0.0, 0.0, -5.0));
        assert_eq!(m.properties(), Matrix4Properties::empty());

        let mut m = M::perspective(1.0, 1.3, 0.1, 100.0, false);
        m.rotate_y(0.2);
        assert_eq!(m.properties(), Matrix4Properties::empty());
    }

    #[test]
    fn scaling_around_origin_keeps_origin_fixed() {
        let origin = Vector3::new(1.0, 2.0, 3.0);
        let mut m = M::identity();
        m.scale_around(&Vector3::same(2.0), &origin);
        assert_abs_diff_eq!(m.transform_position(&origin), origin, epsilon = EPSILON);
        assert_abs_diff_eq!(
            m.transform_position(&Vector3::new(2.0, 2.0, 3.0)),
            Vector3::new(3.0, 2.0, 3.0),
            epsilon = EPSILON
        );
        let mut dst = M::zeros();
        M::identity().scale_around_into(&Vector3::same(2.0), &origin, &mut dst);
        assert_eq!(dst, m);
    }

    #[test]
    fn half_turns_compose_to_identity_up_to_rounding() {
        let mut m = M::identity();
        m.rotate_x(PI).rotate_x(PI);
        assert_abs_diff_eq!(m, M::identity(), epsilon = EPSILON);
    }

    fn applied(m: &M, operation: impl FnOnce(&mut M)) -> M {
        let mut copy = *m;
        operation(&mut copy);
        copy
    }

    fn factor_cases(m: &M) -> Vec<(M, M)> {
        let axis = Vector3::new(0.36, 0.48, 0.8);
        let t = Vector3::new(1.0, -2.0, 3.0);
        let s = Vector3::new(2.0, 0.5, -1.5);
        vec![
            (applied(m, |x| { x.translate(&t); }), m * M::translation(&t)),
            (applied(m, |x| { x.scale(&s); }), m * M::scaling(&s)),
            (applied(m, |x| { x.rotate(0.7, &axis); }), m * M::rotation(0.7, &axis)),
            (applied(m, |x| { x.rotate_x(0.7); }), m * M::rotation_x(0.7)),
            (applied(m, |x| { x.rotate_y(0.7); }), m * M::rotation_y(0.7)),
            (applied(m, |x| { x.rotate_z(0.7); }), m * M::rotation_z(0.7)),
            (applied(m, |x| { x.translate_local(&t); }), M::translation(&t) * m),
            (applied(m, |x| { x.scale_local(&s); }), M::scaling(&s) * m),
            (applied(m, |x| { x.rotate_local(0.7, &axis); }), M::rotation(0.7, &axis) * m),
            (applied(m, |x| { x.rotate_local_x(0.7); }), M::rotation_x(0.7) * m),
            (applied(m, |x| { x.rotate_local_y(0.7); }), M::rotation_y(0.7) * m),
            (applied(m, |x| { x.rotate_local_z(0.7); }), M::rotation_z(0.7) * m),
        ]
    }

    #[test]
    fn every_factor_kernel_agrees_with_explicit_product() {
        let perspective = M::perspective(1.2, 1.5, 0.5, 20.0, true);
        for m in [
            M::identity(),
            M::translation(&Vector3::new(0.5, 1.5, -2.0)),
            M::rotation_x(0.4),
            sample_affine(),
            perspective,
            sample_general(),
        ] {
            for (fast, expected) in factor_cases(&m) {
                assert_abs_diff_eq!(fast, expected, epsilon = 1e-10);
                assert!(fast.properties_hold());
            }
        }
    }

    proptest! {
        #[test]
        fn factor_kernels_write_same_result_in_place_and_separately(
            angle in -PI..PI,
            x in -3.0..3.0,
            y in -3.0..3.0,
            z in -3.0..3.0,
            class in 0_usize..4,
        ) {
            let m = match class {
                0 => M::identity(),
                1 => M::translation(&Vector3::new(z, y, x)),
                2 => sample_affine(),
                _ => sample_general(),
            };
            let v = Vector3::new(x, y, z);
            let axis = Vector3::new(x, y, z + 4.0).normalized();

            let mut separate = M::zeros();
            m.translate_into(&v, &mut separate);
            let mut aliased = m;
            aliased.translate(&v);
            prop_assert_eq!(aliased, separate);
            prop_assert_eq!(aliased.properties(), separate.properties());

            m.rotate_into(angle, &axis, &mut separate);
            let mut aliased = m;
            aliased.rotate(angle, &axis);
            prop_assert_eq!(aliased, separate);
            prop_assert_eq!(aliased.properties(), separate.properties());

            m.scale_local_into(&v, &mut separate);
            let mut aliased = m;
            aliased.scale_local(&v);
            prop_assert_eq!(aliased, separate);
            prop_assert_eq!(aliased.properties(), separate.properties());
        }
    }
}
