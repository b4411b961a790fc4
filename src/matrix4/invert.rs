//! Inverses, transposes, normal matrices and determinants.

use super::Matrix4;
use crate::{
    dispatch::{
        InvertKernel, NormalKernel, TransposeKernel, select_invert_kernel, select_normal_kernel,
        select_transpose_kernel,
    },
    matrix3::Matrix3,
    num::Float,
    properties::{Matrix4Properties, StructuralProperties},
};

impl<F: Float> Matrix4<F> {
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
        log::trace!("Inverting {} matrix with {kernel:?} kernel", self.class());
        match kernel {
            InvertKernel::Identity => Self::identity(),
            InvertKernel::Translation => self.translation_inverse(),
            InvertKernel::Orthonormal => self.orthonormal_inverse(),
            InvertKernel::Affine => self.affine_inverse(),
            InvertKernel::Perspective => self.perspective_inverse(),
            InvertKernel::Generic => self.generic_inverse(),
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

    /// Writes the inverse to `dst` assuming this matrix is affine, whatever
    /// its properties say. If the upper-left 3x3 block is singular, the
    /// result will be non-finite.
    pub fn invert_affine_into(&self, dst: &mut Self) {
        *dst = self.affine_inverse();
    }

    fn translation_inverse(&self) -> Self {
        let mut inverse = Self::identity();
        inverse.m30 = -self.m30;
        inverse.m31 = -self.m31;
        inverse.m32 = -self.m32;
        inverse.properties = Matrix4Properties::translation();
        inverse
    }

    fn orthonormal_inverse(&self) -> Self {
        Self {
            m00: self.m00,
            m01: self.m10,
            m02: self.m20,
            m03: F::ZERO,
            m10: self.m01,
            m11: self.m11,
            m12: self.m21,
            m13: F::ZERO,
            m20: self.m02,
            m21: self.m12,
            m22: self.m22,
            m23: F::ZERO,
            m30: -(self.m00 * self.m30 + self.m01 * self.m31 + self.m02 * self.m32),
            m31: -(self.m10 * self.m30 + self.m11 * self.m31 + self.m12 * self.m32),
            m32: -(self.m20 * self.m30 + self.m21 * self.m31 + self.m22 * self.m32),
            m33: F::ONE,
            properties: Matrix4Properties::orthonormal(),
        }
    }

    fn affine_inverse(&self) -> Self {
        let (m00, m01, m02) = (self.m00, self.m01, self.m02);
        let (m10, m11, m12) = (self.m10, self.m11, self.m12);
        let (m20, m21, m22) = (self.m20, self.m21, self.m22);
        let (m30, m31, m32) = (self.m30, self.m31, self.m32);

        let m11m00 = m00 * m11;
        let m10m01 = m01 * m10;
        let m10m02 = m02 * m10;
        let m12m00 = m00 * m12;
        let m12m01 = m01 * m12;
        let m11m02 = m02 * m11;
        let det = (m11m00 - m10m01) * m22 + (m10m02 - m12m00) * m21 + (m12m01 - m11m02) * m20;
        let s = det.recip();

        let m10m22 = m10 * m22;
        let m10m21 = m10 * m21;
        let m11m22 = m11 * m22;
        let m11m20 = m11 * m20;
        let m12m21 = m12 * m21;
        let m12m20 = m12 * m20;
        let m20m02 = m20 * m02;
        let m20m01 = m20 * m01;
        let m21m02 = m21 * m02;
        let m21m00 = m21 * m00;
        let m22m01 = m22 * m01;
        let m22m00 = m22 * m00;

        Self {
            m00: (m11m22 - m12m21) * s,
            m01: (m21m02 - m22m01) * s,
            m02: (m12m01 - m11m02) * s,
            m03: F::ZERO,
            m10: (m12m20 - m10m22) * s,
            m11: (m22m00 - m20m02) * s,
            m12: (m10m02 - m12m00) * s,
            m13: F::ZERO,
            m20: (m10m21 - m11m20) * s,
            m21: (m20m01 - m21m00) * s,
            m22: (m11m00 - m10m01) * s,
            m23: F::ZERO,
            m30: (m10m22 * m31 - m10m21 * m32 + m11m20 * m32 - m11m22 * m30 + m12m21 * m30
                - m12m20 * m31)
                * s,
            m31: (m20m02 * m31 - m20m01 * m32 + m21m00 * m32 - m21m02 * m30 + m22m01 * m30
                - m22m00 * m31)
                * s,
            m32: (m11m02 * m30 - m12m01 * m30 + m12m00 * m31 - m10m02 * m31 + m10m01 * m32
                - m11m00 * m32)
                * s,
            m33: F::ONE,
            properties: Matrix4Properties::affine(),
        }
    }

    pub(super) fn perspective_inverse(&self) -> Self {
        let a = (self.m00 * self.m11).recip();
        let l = -(self.m23 * self.m32).recip();
        let mut inverse = Self::zeros();
        inverse.m00 = self.m11 * a;
        inverse.m11 = self.m00 * a;
        inverse.m23 = -self.m23 * l;
        inverse.m32 = -self.m32 * l;
        inverse.m33 = self.m22 * l;
        inverse
    }

    fn generic_inverse(&self) -> Self {
        let a = self.m00 * self.m11 - self.m01 * self.m10;
        let b = self.m00 * self.m12 - self.m02 * self.m10;
        let c = self.m00 * self.m13 - self.m03 * self.m10;
        let d = self.m01 * self.m12 - self.m02 * self.m11;
        let e = self.m01 * self.m13 - self.m03 * self.m11;
        let f = self.m02 * self.m13 - self.m03 * self.m12;
        let g = self.m20 * self.m31 - self.m21 * self.m30;
        let h = self.m20 * self.m32 - self.m22 * self.m30;
        let i = self.m20 * self.m33 - self.m23 * self.m30;
        let j = self.m21 * self.m32 - self.m22 * self.m31;
        let k = self.m21 * self.m33 - self.m23 * self.m31;
        let l = self.m22 * self.m33 - self.m23 * self.m32;
        let s = (a * l - b * k + c * j + d * i - e * h + f * g).recip();

        Self {
            m00: (self.m11 * l - self.m12 * k + self.m13 * j) * s,
            m01: (-self.m01 * l + self.m02 * k - self.m03 * j) * s,
            m02: (self.m31 * f - self.m32 * e + self.m33 * d) * s,
            m03: (-self.m21 * f + self.m22 * e - self.m23 * d) * s,
            m10: (-self.m10 * l + self.m12 * i - self.m13 * h) * s,
            m11: (self.m00 * l - self.m02 * i + self.m03 * h) * s,
            m12: (-self.m30 * f + self.m32 * c - self.m33 * b) * s,
            m13: (self.m20 * f - self.m22 * c + self.m23 * b) * s,
            m20: (self.m10 * k - self.m11 * i + self.m13 * g) * s,
            m21: (-self.m00 * k + self.m01 * i - self.m03 * g) * s,
            m22: (self.m30 * e - self.m31 * c + self.m33 * a) * s,
            m23: (-self.m20 * e + self.m21 * c - self.m23 * a) * s,
            m30: (-self.m10 * j + self.m11 * h - self.m12 * g) * s,
            m31: (self.m00 * j - self.m01 * h + self.m02 * g) * s,
            m32: (-self.m30 * d + self.m31 * b - self.m32 * a) * s,
            m33: (self.m20 * d - self.m21 * b + self.m22 * a) * s,
            properties: Matrix4Properties::empty(),
        }
    }

    /// Computes the determinant.
    pub fn determinant(&self) -> F {
        if self.properties.is_translation() {
            return F::ONE;
        }
        if self.properties.is_affine() {
            return self.determinant_3x3();
        }
        let a = self.m00 * self.m11 - self.m01 * self.m10;
        let b = self.m00 * self.m12 - self.m02 * self.m10;
        let c = self.m00 * self.m13 - self.m03 * self.m10;
        let d = self.m01 * self.m12 - self.m02 * self.m11;
        let e = self.m01 * self.m13 - self.m03 * self.m11;
        let f = self.m02 * self.m13 - self.m03 * self.m12;
        let g = self.m20 * self.m31 - self.m21 * self.m30;
        let h = self.m20 * self.m32 - self.m22 * self.m30;
        let i = self.m20 * self.m33 - self.m23 * self.m30;
        let j = self.m21 * self.m32 - self.m22 * self.m31;
        let k = self.m21 * self.m33 - self.m23 * self.m31;
        let l = self.m22 * self.m33 - self.m23 * self.m32;
        a * l - b * k + c * j + d * i - e * h + f * g
    }

    /// Computes the determinant of the upper-left 3x3 block.
    pub fn determinant_3x3(&self) -> F {
        if self.properties.is_translation() {
            F::ONE
        } else {
            self.linear_part().determinant()
        }
    }

    /// Transposes this matrix in place.
    pub fn transpose(&mut self) -> &mut Self {
        if select_transpose_kernel(self.properties) == TransposeKernel::Identity {
            return self;
        }
        std::mem::swap(&mut self.m01, &mut self.m10);
        std::mem::swap(&mut self.m02, &mut self.m20);
        std::mem::swap(&mut self.m03, &mut self.m30);
        std::mem::swap(&mut self.m12, &mut self.m21);
        std::mem::swap(&mut self.m13, &mut self.m31);
        std::mem::swap(&mut self.m23, &mut self.m32);
        self.properties = Matrix4Properties::empty();
        self
    }

    /// Writes the transpose of this matrix to `dst`.
    #[inline]
    pub fn transpose_into(&self, dst: &mut Self) {
        *dst = self.transposed();
    }

    /// Computes the transpose of this matrix.
    pub fn transposed(&self) -> Self {
        match select_transpose_kernel(self.properties) {
            TransposeKernel::Identity => Self::identity(),
            TransposeKernel::Generic => Self::with_properties(
                self.m00,
                self.m10,
                self.m20,
                self.m30,
                self.m01,
                self.m11,
                self.m21,
                self.m31,
                self.m02,
                self.m12,
                self.m22,
                self.m32,
                self.m03,
                self.m13,
                self.m23,
                self.m33,
                Matrix4Properties::empty(),
            ),
        }
    }

    /// Transposes only the upper-left 3x3 block, keeping the rest.
    pub fn transpose_3x3(&mut self) -> &mut Self {
        std::mem::swap(&mut self.m01, &mut self.m10);
        std::mem::swap(&mut self.m02, &mut self.m20);
        std::mem::swap(&mut self.m12, &mut self.m21);
        self.properties.remove(Matrix4Properties::PERSPECTIVE);
        self
    }

    /// Computes the normal matrix, the inverse transpose of the upper-left
    /// 3x3 block, which maps surface normals of geometry transformed by this
    /// matrix.
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

    /// Replaces the upper-left 3x3 block with its normal matrix and clears
    /// the translation.
    pub fn normal(&mut self) -> &mut Self {
        let kernel = select_normal_kernel(self.properties);
        if kernel == NormalKernel::Identity {
            return self;
        }
        let normal = self.normal_matrix();
        self.replace_with_linear(&normal, kernel);
        self
    }

    /// Replaces the upper-left 3x3 block with its cofactor matrix, which is
    /// the normal matrix scaled by the determinant, and clears the
    /// translation.
    pub fn cofactor_3x3(&mut self) -> &mut Self {
        let kernel = select_normal_kernel(self.properties);
        if kernel == NormalKernel::Identity {
            return self;
        }
        let cofactor = match kernel {
            NormalKernel::Orthonormal => {
                let linear = self.linear_part();
                linear * linear.determinant()
            }
            _ => self.linear_part().cofactor(),
        };
        self.replace_with_linear(&cofactor, kernel);
        self
    }

    /// Scales each column of the upper-left 3x3 block to unit length.
    pub fn normalize_3x3(&mut self) -> &mut Self {
        if self.properties.is_orthonormal() {
            return self;
        }
        let normalized = self.linear_part().with_normalized_columns();
        let properties = self.properties;
        self.set_linear_part(&normalized);
        self.properties = properties;
        self
    }

    fn replace_with_linear(&mut self, linear: &Matrix3<F>, kernel: NormalKernel) {
        let translation = self.properties.is_translation();
        *self = Self::identity();
        self.set_linear_part(linear);
        self.properties = match kernel {
            NormalKernel::Orthonormal if translation => Matrix4Properties::identity(),
            NormalKernel::Orthonormal => Matrix4Properties::orthonormal(),
            _ => Matrix4Properties::affine(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector3;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    type M = Matrix4<f64>;

    const EPSILON: f64 = 1e-9;

    fn reference_inverse(m: &M) -> M {
        let n: nalgebra::Matrix4<f64> = m.into();
        M::from(&n.try_inverse().unwrap())
    }

    fn well_conditioned_affine() -> M {
        let mut m = M::rotation(0.8, &Vector3::new(1.0, 1.0, 0.0).normalized());
        m.scale(&Vector3::new(2.0, 0.5, 1.5))
            .translate(&Vector3::new(1.0, -2.0, 3.0));
        m
    }

    #[test]
    fn inverse_of_identity_is_identity() {
        let mut m = M::identity();
        m.invert();
        assert_eq!(m, M::identity());
        assert_eq!(m.properties(), Matrix4Properties::identity());
    }

    #[test]
    fn inverse_of_translation_negates_translation() {
        let m = M::translation(&Vector3::new(1.0, -2.0, 3.5));
        let inverse = m.inverted();
        assert_eq!(inverse, M::translation(&Vector3::new(-1.0, 2.0, -3.5)));
        assert_eq!(inverse.properties(), Matrix4Properties::translation());
    }

    #[test]
    fn inverse_of_pure_rotation_equals_transpose_exactly() {
        let m = M::rotation(1.3, &Vector3::new(0.0, 0.6, 0.8));
        assert_eq!(m.properties(), Matrix4Properties::orthonormal());
        let inverse = m.inverted();
        assert_eq!(inverse, m.transposed());
        assert_eq!(inverse.properties(), Matrix4Properties::orthonormal());
    }

    #[test]
    fn orthonormal_inverse_rotates_translation_back() {
        let mut m = M::rotation_z(0.6);
        m.set_translation(&Vector3::new(3.0, 1.0, -2.0));
        assert_abs_diff_eq!(m.inverted(), reference_inverse(&m), epsilon = EPSILON);
    }

    #[test]
    fn affine_inverse_matches_reference() {
        let m = well_conditioned_affine();
        assert_eq!(m.properties(), Matrix4Properties::affine());
        let inverse = m.inverted();
        assert_abs_diff_eq!(inverse, reference_inverse(&m), epsilon = EPSILON);
        assert_eq!(inverse.properties(), Matrix4Properties::affine());
        assert!(inverse.properties_hold());
    }

    #[test]
    fn perspective_inverse_matches_reference() {
        let m = M::perspective(1.1, 1.7, 0.2, 40.0, false);
        assert_abs_diff_eq!(m.inverted(), reference_inverse(&m), epsilon = EPSILON);
        assert_abs_diff_eq!(m * m.inverted(), M::identity(), epsilon = EPSILON);
    }

    #[test]
    fn generic_inverse_matches_reference_in_place_and_separately() {
        let m = M::from_elements(
            2.0, 0.5, -1.0, 0.25, 1.5, 3.0, 0.0, -0.5, -2.0, 1.0, 4.0, 0.75, 0.3, -0.7, 1.1, 2.0,
        );
        let mut dst = M::zeros();
        m.invert_into(&mut dst);
        assert_abs_diff_eq!(dst, reference_inverse(&m), epsilon = EPSILON);

        let mut in_place = m;
        in_place.invert();
        assert_eq!(in_place, dst);
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        assert!(M::zeros().try_inverse().is_none());
        assert!(
            M::scaling(&Vector3::new(1.0, 0.0, 1.0))
                .try_inverse()
                .is_none()
        );
        assert!(M::rotation_x(0.2).try_inverse().is_some());
    }

    #[test]
    fn determinant_shortcuts_match_full_expansion() {
        let m = well_conditioned_affine();
        let n: nalgebra::Matrix4<f64> = (&m).into();
        assert_abs_diff_eq!(m.determinant(), n.determinant(), epsilon = EPSILON);
        assert_eq!(M::translation(&Vector3::same(4.0)).determinant(), 1.0);

        let p = M::perspective(1.0, 1.0, 1.0, 10.0, false);
        let n: nalgebra::Matrix4<f64> = (&p).into();
        assert_abs_diff_eq!(p.determinant(), n.determinant(), epsilon = EPSILON);
    }

    #[test]
    fn transposing_in_place_matches_transposed_copy() {
        let m = well_conditioned_affine();
        let mut in_place = m;
        in_place.transpose();
        assert_eq!(in_place, m.transposed());
        assert_eq!(in_place.properties(), Matrix4Properties::empty());
        in_place.transpose();
        assert_eq!(in_place, m);
    }

    #[test]
    fn transposing_identity_keeps_properties() {
        let mut m = M::identity();
        m.transpose();
        assert_eq!(m.properties(), Matrix4Properties::identity());
    }

    #[test]
    fn transposing_3x3_block_keeps_translation() {
        let mut m = M::rotation_y(0.4);
        m.set_translation(&Vector3::new(1.0, 2.0, 3.0));
        let mut transposed = m;
        transposed.transpose_3x3();
        assert_eq!(transposed.translation_part(), m.translation_part());
        assert_eq!(transposed.linear_part(), m.linear_part().transposed());
        assert_eq!(transposed.properties(), Matrix4Properties::orthonormal());
    }

    #[test]
    fn normal_matrix_is_inverse_transpose_of_linear_part() {
        let m = well_conditioned_affine();
        let expected = m.linear_part().inverted().transposed();
        assert_abs_diff_eq!(m.normal_matrix(), expected, epsilon = EPSILON);

        let rotation = M::rotation_z(0.3);
        assert_eq!(rotation.normal_matrix(), rotation.linear_part());

        let mut dst = crate::matrix3::Matrix3::zeros();
        M::identity().normal_into(&mut dst);
        assert_eq!(dst, crate::matrix3::Matrix3::identity());
    }

    #[test]
    fn normal_in_place_clears_translation() {
        let mut m = well_conditioned_affine();
        let expected = m.normal_matrix();
        m.normal();
        assert_eq!(m.linear_part(), expected);
        assert_eq!(m.translation_part(), Vector3::zeros());
        assert_eq!(m.properties(), Matrix4Properties::affine());
        assert!(m.properties_hold());

        let mut t = M::translation(&Vector3::new(1.0, 2.0, 3.0));
        t.normal();
        assert_eq!(t, M::identity());
        assert_eq!(t.properties(), Matrix4Properties::identity());
    }

    #[test]
    fn cofactor_is_normal_matrix_scaled_by_determinant() {
        let m = well_conditioned_affine();
        let mut cofactor = m;
        cofactor.cofactor_3x3();
        assert_abs_diff_eq!(
            cofactor.linear_part(),
            m.normal_matrix() * m.linear_part().determinant(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn normalizing_3x3_gives_unit_columns() {
        let mut m = well_conditioned_affine();
        m.normalize_3x3();
        assert_abs_diff_eq!(m.scale_factors(), Vector3::same(1.0), epsilon = EPSILON);
        assert_eq!(m.properties(), Matrix4Properties::affine());
    }

    prop_compose! {
        fn invertible_general_strategy()(entries in prop::array::uniform16(-2.0..2.0)) -> M {
            let mut m = M::from(entries);
            m.fma_4x3(&M::identity(), 10.0);
            m.set_element(3, 3, 10.0);
            m
        }
    }

    proptest! {
        #[test]
        fn matrix_times_inverse_is_identity(m in invertible_general_strategy()) {
            let product = m * m.inverted();
            prop_assert!(approx::abs_diff_eq!(product, M::identity(), epsilon = 1e-9));
        }

        #[test]
        fn aliased_inverse_matches_separate_inverse(m in invertible_general_strategy()) {
            let mut separate = M::zeros();
            m.invert_into(&mut separate);
            let mut aliased = m;
            aliased.invert();
            prop_assert_eq!(aliased, separate);
            prop_assert_eq!(aliased.properties(), separate.properties());
        }
    }
}
