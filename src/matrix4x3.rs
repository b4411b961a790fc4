//! 4x3 matrices with cached structural properties.

mod affine;
mod apply;
mod inference;
mod invert;
mod mul;

use crate::{
    matrix3::Matrix3,
    matrix4::Matrix4,
    num::Float,
    properties::{Matrix4x3Properties, StructuralProperties, TransformClass},
    vector::Vector3,
};

/// An affine transform stored as the upper three rows of a 4x4 matrix, with
/// an implicit last row of `(0, 0, 0, 1)`.
///
/// Entries are named `m<column><row>` like those of [`Matrix4`], and the
/// same two-form convention applies to every modifying operation: a method on
/// `&mut self` and an `_into` method writing to a separate destination.
///
/// Equality and approximate equality compare entries only.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct Matrix4x3<F> {
    m00: F,
    m01: F,
    m02: F,
    m10: F,
    m11: F,
    m12: F,
    m20: F,
    m21: F,
    m22: F,
    m30: F,
    m31: F,
    m32: F,
    properties: Matrix4x3Properties,
}

pub type Matrix4x3f = Matrix4x3<f32>;
pub type Matrix4x3d = Matrix4x3<f64>;

impl<F: Float> Matrix4x3<F> {
    /// Creates the identity matrix.
    #[inline]
    pub const fn identity() -> Self {
        Self::with_properties(
            F::ONE,
            F::ZERO,
            F::ZERO,
            F::ZERO,
            F::ONE,
            F::ZERO,
            F::ZERO,
            F::ZERO,
            F::ONE,
            F::ZERO,
            F::ZERO,
            F::ZERO,
            Matrix4x3Properties::identity(),
        )
    }

    /// Creates a matrix with all zeros.
    #[inline]
    pub const fn zeros() -> Self {
        Self::with_properties(
            F::ZERO,
            F::ZERO,
            F::ZERO,
            F::ZERO,
            F::ZERO,
            F::ZERO,
            F::ZERO,
            F::ZERO,
            F::ZERO,
            F::ZERO,
            F::ZERO,
            F::ZERO,
            Matrix4x3Properties::empty(),
        )
    }

    /// Creates a matrix with the given entries, listed column by column. The
    /// properties are inferred from the entries.
    #[inline]
    pub fn from_elements(
        m00: F,
        m01: F,
        m02: F,
        m10: F,
        m11: F,
        m12: F,
        m20: F,
        m21: F,
        m22: F,
        m30: F,
        m31: F,
        m32: F,
    ) -> Self {
        let mut m = Self::with_properties(
            m00,
            m01,
            m02,
            m10,
            m11,
            m12,
            m20,
            m21,
            m22,
            m30,
            m31,
            m32,
            Matrix4x3Properties::empty(),
        );
        m.properties = m.inferred_properties();
        m
    }

    /// Creates a matrix with the given columns, the last of which is the
    /// translation. The properties are inferred from the entries.
    #[inline]
    pub fn from_columns(
        column_0: &Vector3<F>,
        column_1: &Vector3<F>,
        column_2: &Vector3<F>,
        translation: &Vector3<F>,
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
            translation.x(),
            translation.y(),
            translation.z(),
        )
    }

    /// Creates a matrix from the first 12 values of the given slice, in
    /// column-major order. The properties are inferred from the entries.
    ///
    /// # Panics
    /// If the slice has fewer than 12 values.
    #[inline]
    pub fn from_column_slice(entries: &[F]) -> Self {
        assert!(
            entries.len() >= 12,
            "need 12 entries to build a 4x3 matrix, got {}",
            entries.len()
        );
        let e = entries;
        Self::from_elements(
            e[0], e[1], e[2], e[3], e[4], e[5], e[6], e[7], e[8], e[9], e[10], e[11],
        )
    }

    /// Creates a matrix from the given 3x3 block, translation and properties
    /// without any checking.
    #[inline]
    pub(crate) fn from_parts(
        linear: &Matrix3<F>,
        translation: &Vector3<F>,
        properties: Matrix4x3Properties,
    ) -> Self {
        Self::with_properties(
            linear.m00(),
            linear.m01(),
            linear.m02(),
            linear.m10(),
            linear.m11(),
            linear.m12(),
            linear.m20(),
            linear.m21(),
            linear.m22(),
            translation.x(),
            translation.y(),
            translation.z(),
            properties,
        )
    }

    /// Creates a matrix from the given entries and properties without any
    /// checking.
    #[inline]
    pub(crate) const fn with_properties(
        m00: F,
        m01: F,
        m02: F,
        m10: F,
        m11: F,
        m12: F,
        m20: F,
        m21: F,
        m22: F,
        m30: F,
        m31: F,
        m32: F,
        properties: Matrix4x3Properties,
    ) -> Self {
        Self {
            m00,
            m01,
            m02,
            m10,
            m11,
            m12,
            m20,
            m21,
            m22,
            m30,
            m31,
            m32,
            properties,
        }
    }

    /// Takes the upper three rows of an affine 4x4 matrix, mapping its
    /// properties directly.
    pub(crate) fn from_affine_matrix4(m: &Matrix4<F>) -> Self {
        Self::from_parts(
            &m.linear_part(),
            &m.translation_part(),
            m.properties().to_matrix4x3_properties(),
        )
    }

    /// The entries in column-major order.
    #[inline]
    pub fn to_cols_array(&self) -> [F; 12] {
        [
            self.m00, self.m01, self.m02, self.m10, self.m11, self.m12, self.m20, self.m21,
            self.m22, self.m30, self.m31, self.m32,
        ]
    }

    /// The cached structural properties of the matrix.
    #[inline]
    pub fn properties(&self) -> Matrix4x3Properties {
        self.properties
    }

    /// The most specific transform class the cached properties place the
    /// matrix in.
    #[inline]
    pub fn class(&self) -> TransformClass {
        self.properties.class()
    }

    /// Overrides the cached properties with the given ones, without checking
    /// them against the entries.
    ///
    /// # Correctness
    /// Every given property must hold for the current entries, since later
    /// operations trust them to skip work.
    #[inline]
    pub fn assume_properties_unchecked(&mut self, properties: Matrix4x3Properties) -> &mut Self {
        log::trace!("Assuming 4x3 matrix properties {properties:?} without checking");
        self.properties = properties;
        self
    }

    /// Recomputes the cached properties by inspecting every entry.
    #[inline]
    pub fn determine_properties(&mut self) -> &mut Self {
        self.properties = self.inferred_properties();
        log::trace!("Inferred 4x3 matrix properties {:?}", self.properties);
        self
    }

    /// Returns the entry at the given row and column.
    ///
    /// # Panics
    /// If the indices are outside the matrix.
    #[inline]
    pub fn element(&self, row: usize, column: usize) -> F {
        assert!(
            row < 3 && column < 4,
            "index ({row}, {column}) is outside the 4x3 matrix"
        );
        self.to_cols_array()[3 * column + row]
    }

    /// Sets the entry at the given row and column, weakening only the
    /// properties that a change at that position can invalidate.
    ///
    /// # Panics
    /// If the indices are outside the matrix.
    pub fn set_element(&mut self, row: usize, column: usize, value: F) -> &mut Self {
        let entry = match (column, row) {
            (0, 0) => &mut self.m00,
            (0, 1) => &mut self.m01,
            (0, 2) => &mut self.m02,
            (1, 0) => &mut self.m10,
            (1, 1) => &mut self.m11,
            (1, 2) => &mut self.m12,
            (2, 0) => &mut self.m20,
            (2, 1) => &mut self.m21,
            (2, 2) => &mut self.m22,
            (3, 0) => &mut self.m30,
            (3, 1) => &mut self.m31,
            (3, 2) => &mut self.m32,
            _ => panic!("index ({row}, {column}) is outside the 4x3 matrix"),
        };
        if *entry == value {
            return self;
        }
        *entry = value;
        self.properties = if column == 3 {
            self.properties.weaken(TransformClass::Identity)
        } else {
            self.properties.weaken(TransformClass::Orthonormal)
        };
        self
    }

    /// Returns the column with the given index, where column 3 is the
    /// translation.
    ///
    /// # Panics
    /// If the index is outside the matrix.
    #[inline]
    pub fn column(&self, index: usize) -> Vector3<F> {
        match index {
            0 => Vector3::new(self.m00, self.m01, self.m02),
            1 => Vector3::new(self.m10, self.m11, self.m12),
            2 => Vector3::new(self.m20, self.m21, self.m22),
            3 => self.translation_part(),
            _ => panic!("column {index} is outside the 4x3 matrix"),
        }
    }

    /// The translation column.
    #[inline]
    pub fn translation_part(&self) -> Vector3<F> {
        Vector3::new(self.m30, self.m31, self.m32)
    }

    /// Replaces the translation column, keeping the rest of the matrix.
    #[inline]
    pub fn set_translation(&mut self, translation: &Vector3<F>) -> &mut Self {
        self.m30 = translation.x();
        self.m31 = translation.y();
        self.m32 = translation.z();
        self.properties = self.properties.weaken(TransformClass::Identity);
        self
    }

    /// The 3x3 block.
    #[inline]
    pub fn linear_part(&self) -> Matrix3<F> {
        Matrix3::from_elements(
            self.m00, self.m01, self.m02, self.m10, self.m11, self.m12, self.m20, self.m21,
            self.m22,
        )
    }

    /// Replaces the 3x3 block, keeping the translation.
    pub fn set_linear_part(&mut self, linear: &Matrix3<F>) -> &mut Self {
        *self = Self::from_parts(
            linear,
            &self.translation_part(),
            self.properties.weaken(TransformClass::Orthonormal),
        );
        self
    }

    /// The lengths of the columns of the 3x3 block.
    #[inline]
    pub fn scale_factors(&self) -> Vector3<F> {
        if self.properties.is_orthonormal() {
            return Vector3::same(F::ONE);
        }
        Vector3::new(
            self.column(0).norm(),
            self.column(1).norm(),
            self.column(2).norm(),
        )
    }

    /// Multiplies the matrices entry by entry.
    pub fn component_mul(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a * b)
    }

    /// Adds `other * factor` to this matrix.
    pub fn fma(&mut self, other: &Self, factor: F) -> &mut Self {
        *self = self.zip_with(other, |a, b| b.mul_add(factor, a));
        self
    }

    /// Applies the given function to each pair of corresponding entries. The
    /// result has no cached properties.
    fn zip_with(&self, other: &Self, f: impl Fn(F, F) -> F) -> Self {
        let a = self.to_cols_array();
        let b = other.to_cols_array();
        Self::with_properties(
            f(a[0], b[0]),
            f(a[1], b[1]),
            f(a[2], b[2]),
            f(a[3], b[3]),
            f(a[4], b[4]),
            f(a[5], b[5]),
            f(a[6], b[6]),
            f(a[7], b[7]),
            f(a[8], b[8]),
            f(a[9], b[9]),
            f(a[10], b[10]),
            f(a[11], b[11]),
            Matrix4x3Properties::empty(),
        )
    }

    /// Runs an `_into` operation with this matrix as both source and
    /// destination.
    #[inline]
    fn in_place(&mut self, operation: impl FnOnce(&Self, &mut Self)) -> &mut Self {
        let source = *self;
        operation(&source, self);
        self
    }
}

impl_element_getters!(
    Matrix4x3<F>,
    [m00, m01, m02, m10, m11, m12, m20, m21, m22, m30, m31, m32]
);

impl<F: Float> Default for Matrix4x3<F> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<F: Float> PartialEq for Matrix4x3<F> {
    fn eq(&self, other: &Self) -> bool {
        self.to_cols_array() == other.to_cols_array()
    }
}

impl<F: Float> From<&Matrix4<F>> for Matrix4x3<F> {
    /// Drops the last row and infers the properties of what remains.
    fn from(m: &Matrix4<F>) -> Self {
        let mut truncated = Self::from_affine_matrix4(m);
        truncated.determine_properties();
        truncated
    }
}

impl<F: Float> From<[F; 12]> for Matrix4x3<F> {
    /// Interprets the array as column-major entries and infers the
    /// properties.
    fn from(entries: [F; 12]) -> Self {
        Self::from_column_slice(&entries)
    }
}

impl<F: Float> From<Matrix4x3<F>> for [F; 12] {
    fn from(m: Matrix4x3<F>) -> Self {
        m.to_cols_array()
    }
}

#[cfg(feature = "serde")]
impl<F: Float + serde::Serialize> serde::Serialize for Matrix4x3<F> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_cols_array().serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, F: Float + serde::Deserialize<'de>> serde::Deserialize<'de> for Matrix4x3<F> {
    /// Reads the column-major entries and infers the properties.
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <[F; 12]>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(feature = "arbitrary")]
impl<'a, F: Float + arbitrary::Arbitrary<'a>> arbitrary::Arbitrary<'a> for Matrix4x3<F> {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let entries: [F; 12] = u.arbitrary()?;
        Ok(Self::from(entries))
    }

    fn size_hint(depth: usize) -> (usize, Option<usize>) {
        <[F; 12]>::size_hint(depth)
    }
}

impl_binop!(Mul, mul, Matrix4x3<F>, Matrix4x3<F>, Matrix4x3<F>, |a, b| {
    let mut product = Matrix4x3::zeros();
    a.multiply_into(b, &mut product);
    product
});

impl_binop_assign!(MulAssign, mul_assign, Matrix4x3<F>, Matrix4x3<F>, |a, b| {
    a.multiply(b);
});

impl_binop!(Add, add, Matrix4x3<F>, Matrix4x3<F>, Matrix4x3<F>, |a, b| {
    a.zip_with(b, |x, y| x + y)
});

impl_binop!(Sub, sub, Matrix4x3<F>, Matrix4x3<F>, Matrix4x3<F>, |a, b| {
    a.zip_with(b, |x, y| x - y)
});

impl_unary_op!(Neg, neg, Matrix4x3<F>, Matrix4x3<F>, |m| {
    m.zip_with(m, |x, _| -x)
});

impl_abs_diff_eq!(Matrix4x3<F>, |a, b, epsilon| {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .all(|(x, y)| x.abs_diff_eq(y, epsilon))
});

impl_relative_eq!(Matrix4x3<F>, |a, b, epsilon, max_relative| {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .all(|(x, y)| x.relative_eq(y, epsilon, max_relative))
});
