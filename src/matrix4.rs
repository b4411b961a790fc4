//! 4x4 matrices with cached structural properties.

mod affine;
mod apply;
mod inference;
mod invert;
mod mul;
mod projection;

use crate::{
    matrix3::Matrix3,
    matrix4x3::Matrix4x3,
    num::Float,
    properties::{Matrix4Properties, StructuralProperties, TransformClass},
    vector::{Vector3, Vector4},
};

/// A 4x4 matrix for composing affine and projective transforms of column
/// vectors.
///
/// The entries are named `m<column><row>`, so `m30`, `m31` and `m32` hold the
/// translation. Alongside the entries, the matrix caches a conservative set of
/// [`Matrix4Properties`] that operations use to pick specialized kernels and
/// to derive the properties of their results without inspecting entries.
///
/// Every operation that modifies a matrix exists in two forms: a method
/// taking `&mut self` that replaces the matrix with the result, and an
/// `_into` method taking `&self` that writes the result to a separate
/// destination. Operations with a matrix operand additionally have a `_local`
/// form where the receiver is the right-hand operand.
///
/// Equality and approximate equality compare entries only.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct Matrix4<F> {
    m00: F,
    m01: F,
    m02: F,
    m03: F,
    m10: F,
    m11: F,
    m12: F,
    m13: F,
    m20: F,
    m21: F,
    m22: F,
    m23: F,
    m30: F,
    m31: F,
    m32: F,
    m33: F,
    properties: Matrix4Properties,
}

pub type Matrix4f = Matrix4<f32>;
pub type Matrix4d = Matrix4<f64>;

impl<F: Float> Matrix4<F> {
    /// Creates the identity matrix.
    #[inline]
    pub const fn identity() -> Self {
        Self {
            m00: F::ONE,
            m01: F::ZERO,
            m02: F::ZERO,
            m03: F::ZERO,
            m10: F::ZERO,
            m11: F::ONE,
            m12: F::ZERO,
            m13: F::ZERO,
            m20: F::ZERO,
            m21: F::ZERO,
            m22: F::ONE,
            m23: F::ZERO,
            m30: F::ZERO,
            m31: F::ZERO,
            m32: F::ZERO,
            m33: F::ONE,
            properties: Matrix4Properties::identity(),
        }
    }

    /// Creates a matrix with all zeros.
    #[inline]
    pub const fn zeros() -> Self {
        Self {
            m00: F::ZERO,
            m01: F::ZERO,
            m02: F::ZERO,
            m03: F::ZERO,
            m10: F::ZERO,
            m11: F::ZERO,
            m12: F::ZERO,
            m13: F::ZERO,
            m20: F::ZERO,
            m21: F::ZERO,
            m22: F::ZERO,
            m23: F::ZERO,
            m30: F::ZERO,
            m31: F::ZERO,
            m32: F::ZERO,
            m33: F::ZERO,
            properties: Matrix4Properties::empty(),
        }
    }

    /// Creates a matrix with the given entries, listed column by column. The
    /// properties are inferred from the entries.
    #[inline]
    pub fn from_elements(
        m00: F,
        m01: F,
        m02: F,
        m03: F,
        m10: F,
        m11: F,
        m12: F,
        m13: F,
        m20: F,
        m21: F,
        m22: F,
        m23: F,
        m30: F,
        m31: F,
        m32: F,
        m33: F,
    ) -> Self {
        let mut m = Self::with_properties(
            m00,
            m01,
            m02,
            m03,
            m10,
            m11,
            m12,
            m13,
            m20,
            m21,
            m22,
            m23,
            m30,
            m31,
            m32,
            m33,
            Matrix4Properties::empty(),
        );
        m.properties = m.inferred_properties();
        m
    }

    /// Creates a matrix with the given columns. The properties are inferred
    /// from the entries.
    #[inline]
    pub fn from_columns(
        column_0: &Vector4<F>,
        column_1: &Vector4<F>,
        column_2: &Vector4<F>,
        column_3: &Vector4<F>,
    ) -> Self {
        Self::from_elements(
            column_0.x(),
            column_0.y(),
            column_0.z(),
            column_0.w(),
            column_1.x(),
            column_1.y(),
            column_1.z(),
            column_1.w(),
            column_2.x(),
            column_2.y(),
            column_2.z(),
            column_2.w(),
            column_3.x(),
            column_3.y(),
            column_3.z(),
            column_3.w(),
        )
    }

    /// Creates a matrix from the first 16 values of the given slice, in
    /// column-major order. The properties are inferred from the entries.
    ///
    /// # Panics
    /// If the slice has fewer than 16 values.
    #[inline]
    pub fn from_column_slice(entries: &[F]) -> Self {
        assert!(
            entries.len() >= 16,
            "need 16 entries to build a 4x4 matrix, got {}",
            entries.len()
        );
        let e = entries;
        Self::from_elements(
            e[0], e[1], e[2], e[3], e[4], e[5], e[6], e[7], e[8], e[9], e[10], e[11], e[12],
            e[13], e[14], e[15],
        )
    }

    /// Creates a matrix from the given entries in row-major order. The
    /// properties are inferred from the entries.
    #[inline]
    pub fn from_rows_array(e: &[F; 16]) -> Self {
        Self::from_elements(
            e[0], e[4], e[8], e[12], e[1], e[5], e[9], e[13], e[2], e[6], e[10], e[14], e[3],
            e[7], e[11], e[15],
        )
    }

    /// Creates a matrix from the given entries and properties without any
    /// checking. Used by kernels that derive the properties algebraically.
    #[inline]
    pub(crate) const fn with_properties(
        m00: F,
        m01: F,
        m02: F,
        m03: F,
        m10: F,
        m11: F,
        m12: F,
        m13: F,
        m20: F,
        m21: F,
        m22: F,
        m23: F,
        m30: F,
        m31: F,
        m32: F,
        m33: F,
        properties: Matrix4Properties,
    ) -> Self {
        Self {
            m00,
            m01,
            m02,
            m03,
            m10,
            m11,
            m12,
            m13,
            m20,
            m21,
            m22,
            m23,
            m30,
            m31,
            m32,
            m33,
            properties,
        }
    }

    /// The entries in column-major order.
    #[inline]
    pub fn to_cols_array(&self) -> [F; 16] {
        [
            self.m00, self.m01, self.m02, self.m03, self.m10, self.m11, self.m12, self.m13,
            self.m20, self.m21, self.m22, self.m23, self.m30, self.m31, self.m32, self.m33,
        ]
    }

    /// The entries in row-major order.
    #[inline]
    pub fn to_rows_array(&self) -> [F; 16] {
        [
            self.m00, self.m10, self.m20, self.m30, self.m01, self.m11, self.m21, self.m31,
            self.m02, self.m12, self.m22, self.m32, self.m03, self.m13, self.m23, self.m33,
        ]
    }

    /// The cached structural properties of the matrix.
    #[inline]
    pub fn properties(&self) -> Matrix4Properties {
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
    /// This is for callers that know more about a matrix than the library can
    /// cheaply derive, such as a matrix assembled from trusted parts.
    ///
    /// # Correctness
    /// Every given property must hold for the current entries. Operations
    /// trust the properties to skip work, so a property that does not hold
    /// silently produces wrong results in every later operation on this
    /// matrix and on anything derived from it. Use
    /// [`properties_hold`](Self::properties_hold) to audit a value in tests.
    #[inline]
    pub fn assume_properties_unchecked(&mut self, properties: Matrix4Properties) -> &mut Self {
        log::trace!("Assuming matrix properties {properties:?} without checking");
        self.properties = properties;
        self
    }

    /// Recomputes the cached properties by inspecting every entry.
    #[inline]
    pub fn determine_properties(&mut self) -> &mut Self {
        self.properties = self.inferred_properties();
        log::trace!("Inferred matrix properties {:?}", self.properties);
        self
    }

    /// Returns the entry at the given row and column.
    ///
    /// # Panics
    /// If the indices are outside the matrix.
    #[inline]
    pub fn element(&self, row: usize, column: usize) -> F {
        match (column, row) {
            (0, 0) => self.m00,
            (0, 1) => self.m01,
            (0, 2) => self.m02,
            (0, 3) => self.m03,
            (1, 0) => self.m10,
            (1, 1) => self.m11,
            (1, 2) => self.m12,
            (1, 3) => self.m13,
            (2, 0) => self.m20,
            (2, 1) => self.m21,
            (2, 2) => self.m22,
            (2, 3) => self.m23,
            (3, 0) => self.m30,
            (3, 1) => self.m31,
            (3, 2) => self.m32,
            (3, 3) => self.m33,
            _ => panic!("index ({row}, {column}) is outside the 4x4 matrix"),
        }
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
            (0, 3) => &mut self.m03,
            (1, 0) => &mut self.m10,
            (1, 1) => &mut self.m11,
            (1, 2) => &mut self.m12,
            (1, 3) => &mut self.m13,
            (2, 0) => &mut self.m20,
            (2, 1) => &mut self.m21,
            (2, 2) => &mut self.m22,
            (2, 3) => &mut self.m23,
            (3, 0) => &mut self.m30,
            (3, 1) => &mut self.m31,
            (3, 2) => &mut self.m32,
            (3, 3) => &mut self.m33,
            _ => panic!("index ({row}, {column}) is outside the 4x4 matrix"),
        };
        if *entry == value {
            return self;
        }
        *entry = value;

        let mut properties = if row == 3 {
            self.properties.weaken(TransformClass::Affine)
        } else if column == 3 {
            self.properties.weaken(TransformClass::Identity)
        } else {
            self.properties.weaken(TransformClass::Orthonormal)
        };
        if !matches!((column, row), (0, 0) | (1, 1) | (2, 2) | (2, 3) | (3, 2)) {
            properties.remove(Matrix4Properties::PERSPECTIVE);
        }
        self.properties = properties;
        self
    }

    /// Returns the column with the given index.
    ///
    /// # Panics
    /// If the index is outside the matrix.
    #[inline]
    pub fn column(&self, index: usize) -> Vector4<F> {
        match index {
            0 => Vector4::new(self.m00, self.m01, self.m02, self.m03),
            1 => Vector4::new(self.m10, self.m11, self.m12, self.m13),
            2 => Vector4::new(self.m20, self.m21, self.m22, self.m23),
            3 => Vector4::new(self.m30, self.m31, self.m32, self.m33),
            _ => panic!("column {index} is outside the 4x4 matrix"),
        }
    }

    /// Returns the row with the given index.
    ///
    /// # Panics
    /// If the index is outside the matrix.
    #[inline]
    pub fn row(&self, index: usize) -> Vector4<F> {
        match index {
            0 => Vector4::new(self.m00, self.m10, self.m20, self.m30),
            1 => Vector4::new(self.m01, self.m11, self.m21, self.m31),
            2 => Vector4::new(self.m02, self.m12, self.m22, self.m32),
            3 => Vector4::new(self.m03, self.m13, self.m23, self.m33),
            _ => panic!("row {index} is outside the 4x4 matrix"),
        }
    }

    /// Replaces the column with the given index. All cached properties are
    /// dropped.
    ///
    /// # Panics
    /// If the index is outside the matrix.
    pub fn set_column(&mut self, index: usize, column: &Vector4<F>) -> &mut Self {
        let (x, y, z, w) = match index {
            0 => (&mut self.m00, &mut self.m01, &mut self.m02, &mut self.m03),
            1 => (&mut self.m10, &mut self.m11, &mut self.m12, &mut self.m13),
            2 => (&mut self.m20, &mut self.m21, &mut self.m22, &mut self.m23),
            3 => (&mut self.m30, &mut self.m31, &mut self.m32, &mut self.m33),
            _ => panic!("column {index} is outside the 4x4 matrix"),
        };
        *x = column.x();
        *y = column.y();
        *z = column.z();
        *w = column.w();
        self.properties = Matrix4Properties::empty();
        self
    }

    /// Replaces the row with the given index. All cached properties are
    /// dropped.
    ///
    /// # Panics
    /// If the index is outside the matrix.
    pub fn set_row(&mut self, index: usize, row: &Vector4<F>) -> &mut Self {
        let (x, y, z, w) = match index {
            0 => (&mut self.m00, &mut self.m10, &mut self.m20, &mut self.m30),
            1 => (&mut self.m01, &mut self.m11, &mut self.m21, &mut self.m31),
            2 => (&mut self.m02, &mut self.m12, &mut self.m22, &mut self.m32),
            3 => (&mut self.m03, &mut self.m13, &mut self.m23, &mut self.m33),
            _ => panic!("row {index} is outside the 4x4 matrix"),
        };
        *x = row.x();
        *y = row.y();
        *z = row.z();
        *w = row.w();
        self.properties = Matrix4Properties::empty();
        self
    }

    /// The translation column (first three entries of the last column).
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
        self.properties = self
            .properties
            .weaken(TransformClass::Identity)
            .difference(Matrix4Properties::PERSPECTIVE);
        self
    }

    /// The upper-left 3x3 block.
    #[inline]
    pub fn linear_part(&self) -> Matrix3<F> {
        Matrix3::from_elements(
            self.m00, self.m01, self.m02, self.m10, self.m11, self.m12, self.m20, self.m21,
            self.m22,
        )
    }

    /// Replaces the upper-left 3x3 block, keeping the rest of the matrix.
    pub fn set_linear_part(&mut self, linear: &Matrix3<F>) -> &mut Self {
        self.m00 = linear.m00();
        self.m01 = linear.m01();
        self.m02 = linear.m02();
        self.m10 = linear.m10();
        self.m11 = linear.m11();
        self.m12 = linear.m12();
        self.m20 = linear.m20();
        self.m21 = linear.m21();
        self.m22 = linear.m22();
        self.properties = self
            .properties
            .weaken(TransformClass::Orthonormal)
            .difference(Matrix4Properties::PERSPECTIVE);
        self
    }

    /// The lengths of the first three columns of the 3x3 block, which are the
    /// scale factors of a matrix composed of a rotation and a scaling.
    #[inline]
    pub fn scale_factors(&self) -> Vector3<F> {
        if self.properties.is_orthonormal() {
            return Vector3::same(F::ONE);
        }
        Vector3::new(
            (self.m00 * self.m00 + self.m01 * self.m01 + self.m02 * self.m02).sqrt(),
            (self.m10 * self.m10 + self.m11 * self.m11 + self.m12 * self.m12).sqrt(),
            (self.m20 * self.m20 + self.m21 * self.m21 + self.m22 * self.m22).sqrt(),
        )
    }

    /// Multiplies the matrices entry by entry.
    pub fn component_mul(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a * b)
    }

    /// Adds `other * factor` to the upper 3x4 block of this matrix, leaving
    /// the last row untouched.
    pub fn fma_4x3(&mut self, other: &Self, factor: F) -> &mut Self {
        self.m00 = other.m00.mul_add(factor, self.m00);
        self.m01 = other.m01.mul_add(factor, self.m01);
        self.m02 = other.m02.mul_add(factor, self.m02);
        self.m10 = other.m10.mul_add(factor, self.m10);
        self.m11 = other.m11.mul_add(factor, self.m11);
        self.m12 = other.m12.mul_add(factor, self.m12);
        self.m20 = other.m20.mul_add(factor, self.m20);
        self.m21 = other.m21.mul_add(factor, self.m21);
        self.m22 = other.m22.mul_add(factor, self.m22);
        self.m30 = other.m30.mul_add(factor, self.m30);
        self.m31 = other.m31.mul_add(factor, self.m31);
        self.m32 = other.m32.mul_add(factor, self.m32);
        self.properties = self
            .properties
            .weaken(TransformClass::Orthonormal)
            .difference(Matrix4Properties::PERSPECTIVE);
        self
    }

    /// Applies the given function to each pair of corresponding entries. The
    /// result has no cached properties.
    fn zip_with(&self, other: &Self, f: impl Fn(F, F) -> F) -> Self {
        let a = self.to_cols_array();
        let b = other.to_cols_array();
        let mut m = Self::zeros();
        m.m00 = f(a[0], b[0]);
        m.m01 = f(a[1], b[1]);
        m.m02 = f(a[2], b[2]);
        m.m03 = f(a[3], b[3]);
        m.m10 = f(a[4], b[4]);
        m.m11 = f(a[5], b[5]);
        m.m12 = f(a[6], b[6]);
        m.m13 = f(a[7], b[7]);
        m.m20 = f(a[8], b[8]);
        m.m21 = f(a[9], b[9]);
        m.m22 = f(a[10], b[10]);
        m.m23 = f(a[11], b[11]);
        m.m30 = f(a[12], b[12]);
        m.m31 = f(a[13], b[13]);
        m.m32 = f(a[14], b[14]);
        m.m33 = f(a[15], b[15]);
        m
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
    Matrix4<F>,
    [m00, m01, m02, m03, m10, m11, m12, m13, m20, m21, m22, m23, m30, m31, m32, m33]
);

impl<F: Float> Default for Matrix4<F> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<F: Float> PartialEq for Matrix4<F> {
    fn eq(&self, other: &Self) -> bool {
        self.to_cols_array() == other.to_cols_array()
    }
}

impl<F: Float> From<&Matrix4x3<F>> for Matrix4<F> {
    /// Appends the implicit `(0, 0, 0, 1)` row. The properties carry over.
    fn from(m: &Matrix4x3<F>) -> Self {
        Self::with_properties(
            m.m00(),
            m.m01(),
            m.m02(),
            F::ZERO,
            m.m10(),
            m.m11(),
            m.m12(),
            F::ZERO,
            m.m20(),
            m.m21(),
            m.m22(),
            F::ZERO,
            m.m30(),
            m.m31(),
            m.m32(),
            F::ONE,
            m.properties().to_matrix4_properties(),
        )
    }
}

impl<F: Float> From<&nalgebra::Matrix4<F>> for Matrix4<F> {
    /// Copies the entries and infers the properties.
    fn from(m: &nalgebra::Matrix4<F>) -> Self {
        Self::from_column_slice(m.as_slice())
    }
}

impl<F: Float> From<&Matrix4<F>> for nalgebra::Matrix4<F> {
    fn from(m: &Matrix4<F>) -> Self {
        nalgebra::Matrix4::from_column_slice(&m.to_cols_array())
    }
}

impl<F: Float> From<[F; 16]> for Matrix4<F> {
    /// Interprets the array as column-major entries and infers the
    /// properties.
    fn from(entries: [F; 16]) -> Self {
        Self::from_column_slice(&entries)
    }
}

impl<F: Float> From<Matrix4<F>> for [F; 16] {
    fn from(m: Matrix4<F>) -> Self {
        m.to_cols_array()
    }
}

#[cfg(feature = "serde")]
impl<F: Float + serde::Serialize> serde::Serialize for Matrix4<F> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_cols_array().serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, F: Float + serde::Deserialize<'de>> serde::Deserialize<'de> for Matrix4<F> {
    /// Reads the column-major entries and infers the properties, so a
    /// serialized matrix can never carry properties that do not hold.
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <[F; 16]>::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(feature = "arbitrary")]
impl<'a, F: Float + arbitrary::Arbitrary<'a>> arbitrary::Arbitrary<'a> for Matrix4<F> {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let entries: [F; 16] = u.arbitrary()?;
        Ok(Self::from(entries))
    }

    fn size_hint(depth: usize) -> (usize, Option<usize>) {
        <[F; 16]>::size_hint(depth)
    }
}

impl_binop!(Mul, mul, Matrix4<F>, Matrix4<F>, Matrix4<F>, |a, b| {
    let mut product = Matrix4::zeros();
    a.multiply_into(b, &mut product);
    product
});

impl_binop!(Mul, mul, Matrix4<F>, Matrix4x3<F>, Matrix4<F>, |a, b| {
    let mut product = Matrix4::zeros();
    a.multiply_into(&Matrix4::from(b), &mut product);
    product
});

impl_binop!(Mul, mul, Matrix4<F>, Vector4<F>, Vector4<F>, |a, b| {
    a.transform(b)
});

impl_binop_assign!(MulAssign, mul_assign, Matrix4<F>, Matrix4<F>, |a, b| {
    a.multiply(b);
});

impl_binop!(Add, add, Matrix4<F>, Matrix4<F>, Matrix4<F>, |a, b| {
    a.zip_with(b, |x, y| x + y)
});

impl_binop!(Sub, sub, Matrix4<F>, Matrix4<F>, Matrix4<F>, |a, b| {
    a.zip_with(b, |x, y| x - y)
});

impl_unary_op!(Neg, neg, Matrix4<F>, Matrix4<F>, |m| {
    m.zip_with(m, |x, _| -x)
});

impl_abs_diff_eq!(Matrix4<F>, |a, b, epsilon| {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .all(|(x, y)| x.abs_diff_eq(y, epsilon))
});

impl_relative_eq!(Matrix4<F>, |a, b, epsilon, max_relative| {
    a.to_cols_array()
        .iter()
        .zip(b.to_cols_array().iter())
        .all(|(x, y)| x.relative_eq(y, epsilon, max_relative))
});
