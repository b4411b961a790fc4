//! 3x3 matrices.

use crate::{num::Float, vector::Vector3};
use bytemuck::{Pod, Zeroable};
use nalgebra::{ArrayStorage, Rotation3, Unit};

/// A 3x3 matrix, used for linear blocks and normal matrices. Entries are
/// named `m<column><row>`.
///
/// Unlike the 4x4 and 4x3 matrices, a 3x3 matrix caches no structural
/// properties.
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "[F; 9]", from = "[F; 9]")
)]
#[derive(Clone, Copy, Debug)]
pub struct Matrix3<F> {
    inner: nalgebra::Matrix3<F>,
}

pub type Matrix3f = Matrix3<f32>;
pub type Matrix3d = Matrix3<f64>;

// SAFETY: `#[repr(transparent)]` wrapper around a `Zeroable` nalgebra matrix
unsafe impl<F: Float + Zeroable> Zeroable for Matrix3<F> {}

// SAFETY: `#[repr(transparent)]` wrapper around a `Pod` nalgebra matrix
unsafe impl<F: Float + Pod> Pod for Matrix3<F> {}

impl<F: Float> Matrix3<F> {
    /// Creates the identity matrix.
    #[inline]
    pub const fn identity() -> Self {
        Self::from_diagonal(&Vector3::same(F::ONE))
    }

    /// Creates a matrix with all zeros.
    #[inline]
    pub const fn zeros() -> Self {
        Self::from_diagonal(&Vector3::zeros())
    }

    /// Creates a matrix with the given entries, listed column by column.
    #[inline]
    pub const fn from_elements(
        m00: F,
        m01: F,
        m02: F,
        m10: F,
        m11: F,
        m12: F,
        m20: F,
        m21: F,
        m22: F,
    ) -> Self {
        Self::wrap(nalgebra::Matrix3::from_array_storage(ArrayStorage([
            [m00, m01, m02],
            [m10, m11, m12],
            [m20, m21, m22],
        ])))
    }

    /// Creates a matrix with the given columns.
    #[inline]
    pub const fn from_columns(
        column_0: &Vector3<F>,
        column_1: &Vector3<F>,
        column_2: &Vector3<F>,
    ) -> Self {
        Self::from_elements(
            column_0.x(),
            column_0.y(),
            column_0.z(),
            column_1.x(),
            column_1.y(),
            column_1.z(),
            column_2.x(),
            column_2.y(),
            column_2.z(),
        )
    }

    /// Creates a diagonal matrix with the given diagonal.
    #[inline]
    pub const fn from_diagonal(diagonal: &Vector3<F>) -> Self {
        Self::from_elements(
            diagonal.x(),
            F::ZERO,
            F::ZERO,
            F::ZERO,
            diagonal.y(),
            F::ZERO,
            F::ZERO,
            F::ZERO,
            diagonal.z(),
        )
    }

    /// Creates the rotation by the given angle around the given unit axis.
    pub fn rotation(angle: F, axis: &Vector3<F>) -> Self {
        let axis = Unit::new_unchecked(*axis.inner());
        Self::wrap(Rotation3::from_axis_angle(&axis, angle).into_inner())
    }

    /// The entries in column-major order.
    #[inline]
    pub const fn to_cols_array(&self) -> [F; 9] {
        let [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]] = self.inner.data.0;
        [m00, m01, m02, m10, m11, m12, m20, m21, m22]
    }

    /// Returns the entry at the given row and column.
    ///
    /// # Panics
    /// If the indices are outside the matrix.
    #[inline]
    pub fn element(&self, row: usize, column: usize) -> F {
        assert!(
            row < 3 && column < 3,
            "index ({row}, {column}) is outside the 3x3 matrix"
        );
        self.inner[(row, column)]
    }

    /// Returns the column with the given index.
    ///
    /// # Panics
    /// If the index is outside the matrix.
    #[inline]
    pub fn column(&self, index: usize) -> Vector3<F> {
        assert!(index < 3, "column {index} is outside the 3x3 matrix");
        Vector3::wrap(self.inner.column(index).into_owned())
    }

    /// Computes the transpose.
    #[inline]
    pub fn transposed(&self) -> Self {
        Self::wrap(self.inner.transpose())
    }

    /// Computes the determinant.
    #[inline]
    pub fn determinant(&self) -> F {
        self.inner.determinant()
    }

    /// Computes the cofactor matrix, which is the transposed adjugate. Its
    /// columns are the cross products of pairs of columns of this matrix.
    pub fn cofactor(&self) -> Self {
        let (c0, c1, c2) = (self.column(0), self.column(1), self.column(2));
        Self::from_columns(&c1.cross(&c2), &c2.cross(&c0), &c0.cross(&c1))
    }

    /// Computes the inverse. A singular matrix gives infinite entries.
    #[inline]
    pub fn inverted(&self) -> Self {
        self.try_inverse()
            .unwrap_or_else(|| Self::wrap(nalgebra::Matrix3::repeat(F::INFINITY)))
    }

    /// Computes the inverse, or returns [`None`] if the determinant is zero.
    #[inline]
    pub fn try_inverse(&self) -> Option<Self> {
        self.inner.try_inverse().map(Self::wrap)
    }

    /// Computes the inverse transpose, which maps normals of surfaces
    /// transformed by this matrix. A singular matrix gives non-finite entries.
    #[inline]
    pub fn normal_matrix(&self) -> Self {
        self.cofactor() * self.determinant().recip()
    }

    /// Returns a copy with each column scaled to unit length.
    pub fn with_normalized_columns(&self) -> Self {
        Self::from_columns(
            &self.column(0).normalized(),
            &self.column(1).normalized(),
            &self.column(2).normalized(),
        )
    }

    /// Whether the columns are orthonormal to within the given tolerance.
    pub fn is_orthonormal(&self, tolerance: F) -> bool {
        let deviation = self.inner.tr_mul(&self.inner) - nalgebra::Matrix3::identity();
        deviation.iter().all(|entry| entry.abs() <= tolerance)
    }

    /// Multiplies with the given vector.
    #[inline]
    pub fn transform_vector(&self, v: &Vector3<F>) -> Vector3<F> {
        Vector3::wrap(self.inner * v.inner())
    }

    #[inline]
    const fn wrap(inner: nalgebra::Matrix3<F>) -> Self {
        Self { inner }
    }
}

impl_element_getters!(Matrix3<F>, inner, [
    m00 => (0, 0),
    m01 => (0, 1),
    m02 => (0, 2),
    m10 => (1, 0),
    m11 => (1, 1),
    m12 => (1, 2),
    m20 => (2, 0),
    m21 => (2, 1),
    m22 => (2, 2),
]);

impl<F: Float> PartialEq for Matrix3<F> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<F> From<[F; 9]> for Matrix3<F> {
    fn from([m00, m01, m02, m10, m11, m12, m20, m21, m22]: [F; 9]) -> Self {
        Self {
            inner: nalgebra::Matrix3::from_array_storage(ArrayStorage([
                [m00, m01, m02],
                [m10, m11, m12],
                [m20, m21, m22],
            ])),
        }
    }
}

impl<F> From<Matrix3<F>> for [F; 9] {
    fn from(m: Matrix3<F>) -> Self {
        let [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]] = m.inner.data.0;
        [m00, m01, m02, m10, m11, m12, m20, m21, m22]
    }
}

impl<F: Float> From<&nalgebra::Matrix3<F>> for Matrix3<F> {
    fn from(m: &nalgebra::Matrix3<F>) -> Self {
        Self::wrap(*m)
    }
}

impl<F: Float> From<&Matrix3<F>> for nalgebra::Matrix3<F> {
    fn from(m: &Matrix3<F>) -> Self {
        m.inner
    }
}

#[cfg(feature = "arbitrary")]
impl<'a, F: Float + arbitrary::Arbitrary<'a>> arbitrary::Arbitrary<'a> for Matrix3<F> {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let entries: [F; 9] = u.arbitrary()?;
        Ok(Self::from(entries))
    }
}

impl_binop!(Mul, mul, Matrix3<F>, Matrix3<F>, Matrix3<F>, |a, b| {
    Matrix3::wrap(a.inner * b.inner)
});

impl_binop!(Mul, mul, Matrix3<F>, Vector3<F>, Vector3<F>, |a, b| {
    a.transform_vector(b)
});

impl_binop!(Mul, mul, Matrix3<F>, F, Matrix3<F>, |a, b| {
    Matrix3::wrap(a.inner * *b)
});

impl_abs_diff_eq!(Matrix3<F>, |a, b, epsilon| {
    approx::AbsDiffEq::abs_diff_eq(&a.inner, &b.inner, epsilon)
});

impl_relative_eq!(Matrix3<F>, |a, b, epsilon, max_relative| {
    approx::RelativeEq::relative_eq(&a.inner, &b.inner, epsilon, max_relative)
});

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const EPSILON: f64 = 1e-12;

    fn sheared() -> Matrix3d {
        Matrix3d::from_elements(2.0, 0.5, 0.0, -1.0, 3.0, 0.25, 0.5, 0.0, 1.5)
    }

    #[test]
    fn inverse_times_matrix_is_identity() {
        let m = sheared();
        assert_abs_diff_eq!(m * m.inverted(), Matrix3d::identity(), epsilon = EPSILON);
        assert_abs_diff_eq!(
            m.try_inverse().unwrap() * m,
            Matrix3d::identity(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let m = Matrix3d::from_elements(1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 1.0, 0.0);
        assert_eq!(m.determinant(), 0.0);
        assert!(m.try_inverse().is_none());
        assert!(m.inverted().to_cols_array().iter().all(|e| e.is_infinite()));
    }

    #[test]
    fn normal_matrix_is_inverse_transpose() {
        let m = sheared();
        assert_abs_diff_eq!(
            m.normal_matrix(),
            m.inverted().transposed(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn cofactor_is_determinant_times_inverse_transpose() {
        let m = sheared();
        assert_abs_diff_eq!(
            m.cofactor(),
            m.inverted().transposed() * m.determinant(),
            epsilon = EPSILON
        );
        assert_eq!(m.cofactor().m00(), m.m11() * m.m22() - m.m12() * m.m21());
    }

    #[test]
    fn converting_to_and_from_nalgebra_preserves_entries() {
        let m = sheared();
        let n: nalgebra::Matrix3<f64> = (&m).into();
        assert_eq!(n[(1, 0)], m.m01());
        assert_eq!(n[(0, 1)], m.m10());
        assert_eq!(Matrix3d::from(&n), m);
    }

    #[test]
    fn element_uses_row_then_column() {
        let m = sheared();
        assert_eq!(m.element(1, 0), m.m01());
        assert_eq!(m.element(0, 1), m.m10());
        assert_eq!(m.column(1), Vector3::new(-1.0, 3.0, 0.25));
        assert_eq!(Matrix3d::from(m.to_cols_array()), m);
    }

    #[test]
    fn rotation_around_z_maps_x_to_y() {
        let r = Matrix3d::rotation(std::f64::consts::FRAC_PI_2, &Vector3::unit_z());
        assert_abs_diff_eq!(
            r.transform_vector(&Vector3::unit_x()),
            Vector3::unit_y(),
            epsilon = EPSILON
        );
        assert!(r.is_orthonormal(1e-12));
    }

    #[test]
    fn orthonormality_check_uses_tolerance() {
        let (s, c) = 0.3_f64.sin_cos();
        let rotation = Matrix3d::from_elements(c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0);
        assert!(rotation.is_orthonormal(1e-12));
        assert!(!sheared().is_orthonormal(1e-3));
        assert!(sheared().with_normalized_columns().column(1).norm() - 1.0 < EPSILON);
    }
}
