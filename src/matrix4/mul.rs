//! Matrix products.

use super::Matrix4;
use crate::{
    dispatch::{MulKernel, select_mul_kernel},
    num::Float,
    properties::{Matrix4Properties, StructuralProperties},
};

impl<F: Float> Matrix4<F> {
    /// Replaces this matrix with `self * right`.
    #[inline]
    pub fn multiply(&mut self, right: &Self) -> &mut Self {
        self.in_place(|this, dst| this.multiply_into(right, dst))
    }

    /// Replaces this matrix with `left * self`.
    #[inline]
    pub fn multiply_local(&mut self, left: &Self) -> &mut Self {
        self.in_place(|this, dst| left.multiply_into(this, dst))
    }

    /// Writes `left * self` to `dst`.
    #[inline]
    pub fn multiply_local_into(&self, left: &Self, dst: &mut Self) {
        left.multiply_into(self, dst);
    }

    /// Writes `self * right` to `dst`, using the kernel selected from the
    /// properties of both operands.
    pub fn multiply_into(&self, right: &Self, dst: &mut Self) {
        let kernel = select_mul_kernel(self.properties, right.properties);
        log::trace!(
            "Multiplying {} matrix by {} matrix with {kernel:?} kernel",
            self.class(),
            right.class()
        );
        match kernel {
            MulKernel::TakeRight => *dst = *right,
            MulKernel::TakeLeft => *dst = *self,
            MulKernel::TranslationAffine => self.mul_translation_affine_into(right, dst),
            MulKernel::AffineAffine => self.mul_affine_into(right, dst),
            MulKernel::PerspectiveAffine => self.mul_perspective_affine_into(right, dst),
            MulKernel::GenericAffine => self.mul_generic_affine_into(right, dst),
            MulKernel::Generic => self.mul_generic_into(right, dst),
        }
    }

    /// Product of a pure translation and an affine matrix. Only the
    /// translation chain carries over from `right`.
    fn mul_translation_affine_into(&self, right: &Self, dst: &mut Self) {
        let properties = if right.properties.is_translation() {
            Matrix4Properties::translation()
        } else {
            Matrix4Properties::affine()
        };
        *dst = Self {
            m00: right.m00,
            m01: right.m01,
            m02: right.m02,
            m03: F::ZERO,
            m10: right.m10,
            m11: right.m11,
            m12: right.m12,
            m13: F::ZERO,
            m20: right.m20,
            m21: right.m21,
            m22: right.m22,
            m23: F::ZERO,
            m30: right.m30 + self.m30,
            m31: right.m31 + self.m31,
            m32: right.m32 + self.m32,
            m33: F::ONE,
            properties,
        };
    }

    /// Product of two affine matrices. The result is orthonormal if both
    /// operands are.
    pub fn mul_affine_into(&self, right: &Self, dst: &mut Self) {
        let properties = Matrix4Properties::AFFINE
            | self
                .properties
                .meet(right.properties)
                .intersection(Matrix4Properties::ORTHONORMAL);
        *dst = Self {
            m00: self.m00 * right.m00 + self.m10 * right.m01 + self.m20 * right.m02,
            m01: self.m01 * right.m00 + self.m11 * right.m01 + self.m21 * right.m02,
            m02: self.m02 * right.m00 + self.m12 * right.m01 + self.m22 * right.m02,
            m03: F::ZERO,
            m10: self.m00 * right.m10 + self.m10 * right.m11 + self.m20 * right.m12,
            m11: self.m01 * right.m10 + self.m11 * right.m11 + self.m21 * right.m12,
            m12: self.m02 * right.m10 + self.m12 * right.m11 + self.m22 * right.m12,
            m13: F::ZERO,
            m20: self.m00 * right.m20 + self.m10 * right.m21 + self.m20 * right.m22,
            m21: self.m01 * right.m20 + self.m11 * right.m21 + self.m21 * right.m22,
            m22: self.m02 * right.m20 + self.m12 * right.m21 + self.m22 * right.m22,
            m23: F::ZERO,
            m30: self.m00 * right.m30 + self.m10 * right.m31 + self.m20 * right.m32 + self.m30,
            m31: self.m01 * right.m30 + self.m11 * right.m31 + self.m21 * right.m32 + self.m31,
            m32: self.m02 * right.m30 + self.m12 * right.m31 + self.m22 * right.m32 + self.m32,
            m33: F::ONE,
            properties,
        };
    }

    /// Product of a centered perspective projection and an affine matrix,
    /// reading only the five structurally nonzero entries of `self`.
    pub fn mul_perspective_affine_into(&self, right: &Self, dst: &mut Self) {
        let (m00, m11, m22, m23, m32) = (self.m00, self.m11, self.m22, self.m23, self.m32);
        *dst = Self {
            m00: m00 * right.m00,
            m01: m11 * right.m01,
            m02: m22 * right.m02,
            m03: m23 * right.m02,
            m10: m00 * right.m10,
            m11: m11 * right.m11,
            m12: m22 * right.m12,
            m13: m23 * right.m12,
            m20: m00 * right.m20,
            m21: m11 * right.m21,
            m22: m22 * right.m22,
            m23: m23 * right.m22,
            m30: m00 * right.m30,
            m31: m11 * right.m31,
            m32: m22 * right.m32 + m32,
            m33: m23 * right.m32,
            properties: Matrix4Properties::empty(),
        };
    }

    /// Product of a general matrix and an affine matrix, skipping the fixed
    /// last row of `right`.
    pub fn mul_generic_affine_into(&self, right: &Self, dst: &mut Self) {
        *dst = Self {
            m00: self.m00 * right.m00 + self.m10 * right.m01 + self.m20 * right.m02,
            m01: self.m01 * right.m00 + self.m11 * right.m01 + self.m21 * right.m02,
            m02: self.m02 * right.m00 + self.m12 * right.m01 + self.m22 * right.m02,
            m03: self.m03 * right.m00 + self.m13 * right.m01 + self.m23 * right.m02,
            m10: self.m00 * right.m10 + self.m10 * right.m11 + self.m20 * right.m12,
            m11: self.m01 * right.m10 + self.m11 * right.m11 + self.m21 * right.m12,
            m12: self.m02 * right.m10 + self.m12 * right.m11 + self.m22 * right.m12,
            m13: self.m03 * right.m10 + self.m13 * right.m11 + self.m23 * right.m12,
            m20: self.m00 * right.m20 + self.m10 * right.m21 + self.m20 * right.m22,
            m21: self.m01 * right.m20 + self.m11 * right.m21 + self.m21 * right.m22,
            m22: self.m02 * right.m20 + self.m12 * right.m21 + self.m22 * right.m22,
            m23: self.m03 * right.m20 + self.m13 * right.m21 + self.m23 * right.m22,
            m30: self.m00 * right.m30 + self.m10 * right.m31 + self.m20 * right.m32 + self.m30,
            m31: self.m01 * right.m30 + self.m11 * right.m31 + self.m21 * right.m32 + self.m31,
            m32: self.m02 * right.m30 + self.m12 * right.m31 + self.m22 * right.m32 + self.m32,
            m33: self.m03 * right.m30 + self.m13 * right.m31 + self.m23 * right.m32 + self.m33,
            properties: Matrix4Properties::empty(),
        };
    }

    /// Full product.
    pub fn mul_generic_into(&self, right: &Self, dst: &mut Self) {
        let (a, b) = (self, right);
        *dst = Self {
            m00: a.m00 * b.m00 + a.m10 * b.m01 + a.m20 * b.m02 + a.m30 * b.m03,
            m01: a.m01 * b.m00 + a.m11 * b.m01 + a.m21 * b.m02 + a.m31 * b.m03,
            m02: a.m02 * b.m00 + a.m12 * b.m01 + a.m22 * b.m02 + a.m32 * b.m03,
            m03: a.m03 * b.m00 + a.m13 * b.m01 + a.m23 * b.m02 + a.m33 * b.m03,
            m10: a.m00 * b.m10 + a.m10 * b.m11 + a.m20 * b.m12 + a.m30 * b.m13,
            m11: a.m01 * b.m10 + a.m11 * b.m11 + a.m21 * b.m12 + a.m31 * b.m13,
            m12: a.m02 * b.m10 + a.m12 * b.m11 + a.m22 * b.m12 + a.m32 * b.m13,
            m13: a.m03 * b.m10 + a.m13 * b.m11 + a.m23 * b.m12 + a.m33 * b.m13,
            m20: a.m00 * b.m20 + a.m10 * b.m21 + a.m20 * b.m22 + a.m30 * b.m23,
            m21: a.m01 * b.m20 + a.m11 * b.m21 + a.m21 * b.m22 + a.m31 * b.m23,
            m22: a.m02 * b.m20 + a.m12 * b.m21 + a.m22 * b.m22 + a.m32 * b.m23,
            m23: a.m03 * b.m20 + a.m13 * b.m21 + a.m23 * b.m22 + a.m33 * b.m23,
            m30: a.m00 * b.m30 + a.m10 * b.m31 + a.m20 * b.m32 + a.m30 * b.m33,
            m31: a.m01 * b.m30 + a.m11 * b.m31 + a.m21 * b.m32 + a.m31 * b.m33,
            m32: a.m02 * b.m30 + a.m12 * b.m31 + a.m22 * b.m32 + a.m32 * b.m33,
            m33: a.m03 * b.m30 + a.m13 * b.m31 + a.m23 * b.m32 + a.m33 * b.m33,
            properties: Matrix4Properties::empty(),
        };
    }
}
