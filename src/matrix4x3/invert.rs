//! Inverses, normal matrices and determinants.

use super::Matrix4x3;
use crate::{
    dispatch::{InvertKernel, NormalKernel, select_invert_kernel, select_normal_kernel},
    matrix3::Matrix3,
    num::Float,
    properties::{Matrix4x3Properties, StructuralProperties},
    vector::Vector3,
};

impl<F: Float> Matrix4x3<F> {
    /// Inverts this matrix in place. A singular matrix gives non-finite
    /// entries.
    #[inline]
    pub fn invert(&mut self) -> &mut Self {
        *self = self.inverted();
        self
    }

    /// Writes the inverse of this matrix to `dst`.
    #[inline]
    pub fn invert_into(&self, dst: &mut Self) {
        *dst = self.inverted();
    }

    /// Computes the inverse of this matrix, using the kernel selected from
    /// its properties. A singular matrix gives non-finite entries.
    pub fn inverted(&self) -> Self {
        let kernel = select_invert_kernel(self.properties);
        log::trace!("Inverting {} 4x3 matrix with {kernel:?} kernel", self.class());
        match kernel {
            InvertKernel::Identity => Self::identity(),
            InvertKernel::Translation => Self::from_parts(
                &Matrix3::identity(),
                &-self.translation_part(),
                Matrix4x3Properties::translation(),
            ),
            InvertKernel::Orthonormal => {
                let linear = self.linear_part().transposed();
                let translation = -linear.transform_vector(&self.translation_part());
                Self::from_parts(&linear, &translation, Matrix4x3Properties::orthonormal())
            }
            InvertKernel::Affine | InvertKernel::Perspective | InvertKernel::Generic => {
                let linear = self.linear_part().inverted();
                let translation = -linear.transform_vector(&self.translation_part());
                Self::from_parts(&linear, &translation, Matrix4x3Properties::empty())
            }
        }
    }

    /// Computes the inverse, or returns [`None`] if the matrix is singular.
    pub fn try_inverse(&self) -> Option<Self> {
        if self.determinant() == F::ZERO {
            None
        } else {
            Some(self.inverted())
        }
    }

    /// Writes the inverse to `dst` assuming this matrix is diagonal apart
    /// from its translation, the shape of an orthographic projection.
    pub fn invert_orthographic_into(&self, dst: &mut Self) {
        let inv = Vector3::new(self.m00.recip(), self.m11.recip(), self.m22.recip());
        *dst = Self::from_parts(
            &Matrix3::from_diagonal(&inv),
            &-self.translation_part().component_mul(&inv),
            self.properties
                .intersection(Matrix4x3Properties::ORTHONORMAL),
        );
    }

    /// Computes the determinant, which is that of the 3x3 block.
    pub fn determinant(&self) -> F {
        if self.properties.is_translation() {
            F::ONE
        } else {
            self.linear_part().determinant()
        }
    }

    /// Transposes the 3x3 block, keeping the translation.
    pub fn transpose_3x3(&mut self) -> &mut Self {
        std::mem::swap(&mut self.m01, &mut self.m10);
        std::mem::swap(&mut self.m02, &mut self.m20);
        std::mem::swap(&mut self.m12, &mut self.m21);
        self
    }

    /// Computes the normal matrix, the inverse transpose of the 3x3 block.
    pub fn normal_matrix(&self) -> Matrix3<F> {
        match select_normal_kernel(self.properties) {
            NormalKernel::Identity => Matrix3::identity(),
            NormalKernel::Orthonormal => self.linear_part(),
            NormalKernel::Cofactor => self.linear_part().normal_matrix(),
        }
    }

    /// Writes the normal matrix to `dst`.
    #[inline]
    pub fn normal_into(&self, dst: &mut Matrix3<F>) {
        *dst = self.normal_matrix();
    }

    /// Replaces the 3x3 block with its normal matrix and clears the
    /// translation.
    pub fn normal(&mut self) -> &mut Self {
        let kernel = select_normal_kernel(self.properties);
        if kernel == NormalKernel::Identity {
            return self;
        }
        let properties = match kernel {
            NormalKernel::Orthonormal if self.properties.is_translation() => {
                Matrix4x3Properties::identity()
            }
            NormalKernel::Orthonormal => Matrix4x3Properties::orthonormal(),
            _ => Matrix4x3Properties::empty(),
        };
        *self = Self::from_parts(&self.normal_matrix(), &Vector3::zeros(), properties);
        self
    }

    /// Scales each column of the 3x3 block to unit length.
    pub fn normalize_3x3(&mut self) -> &mut Self {
        if !self.properties.is_orthonormal() {
            *self = Self::from_parts(
                &self.linear_part().with_normalized_columns(),
                &self.translation_part(),
                self.properties,
            );
        }
        self
    }
}
