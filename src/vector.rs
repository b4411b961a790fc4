//! Vectors.

use crate::num::Float;
use bytemuck::{Pod, Zeroable};
use std::fmt;

/// A 3-dimensional vector.
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "[F; 3]", from = "[F; 3]")
)]
#[derive(Clone, Copy)]
pub struct Vector3<F> {
    inner: nalgebra::Vector3<F>,
}

/// A 4-dimensional (homogeneous) vector.
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "[F; 4]", from = "[F; 4]")
)]
#[derive(Clone, Copy)]
pub struct Vector4<F> {
    inner: nalgebra::Vector4<F>,
}

pub type Vector3f = Vector3<f32>;
pub type Vector3d = Vector3<f64>;
pub type Vector4f = Vector4<f32>;
pub type Vector4d = Vector4<f64>;

// SAFETY: `#[repr(transparent)]` wrapper around a `Zeroable` nalgebra vector
unsafe impl<F: Float + Zeroable> Zeroable for Vector3<F> {}

// SAFETY: `#[repr(transparent)]` wrapper around a `Pod` nalgebra vector
unsafe impl<F: Float + Pod> Pod for Vector3<F> {}

// SAFETY: `#[repr(transparent)]` wrapper around a `Zeroable` nalgebra vector
unsafe impl<F: Float + Zeroable> Zeroable for Vector4<F> {}

// SAFETY: `#[repr(transparent)]` wrapper around a `Pod` nalgebra vector
unsafe impl<F: Float + Pod> Pod for Vector4<F> {}

impl<F: Float> Vector3<F> {
    /// Creates a new vector with the given components.
    #[inline]
    pub const fn new(x: F, y: F, z: F) -> Self {
        Self::wrap(nalgebra::Vector3::new(x, y, z))
    }

    /// Creates a vector with all zeros.
    #[inline]
    pub const fn zeros() -> Self {
        Self::same(F::ZERO)
    }

    /// Creates a vector with all components equal to the given value.
    #[inline]
    pub const fn same(value: F) -> Self {
        Self::new(value, value, value)
    }

    /// Creates the unit vector along the x-axis.
    #[inline]
    pub const fn unit_x() -> Self {
        Self::new(F::ONE, F::ZERO, F::ZERO)
    }

    /// Creates the unit vector along the y-axis.
    #[inline]
    pub const fn unit_y() -> Self {
        Self::new(F::ZERO, F::ONE, F::ZERO)
    }

    /// Creates the unit vector along the z-axis.
    #[inline]
    pub const fn unit_z() -> Self {
        Self::new(F::ZERO, F::ZERO, F::ONE)
    }

    /// The x-component of the vector.
    #[inline]
    pub const fn x(&self) -> F {
        self.inner.data.0[0][0]
    }

    /// The y-component of the vector.
    #[inline]
    pub const fn y(&self) -> F {
        self.inner.data.0[0][1]
    }

    /// The z-component of the vector.
    #[inline]
    pub const fn z(&self) -> F {
        self.inner.data.0[0][2]
    }

    /// A mutable reference to the x-component of the vector.
    #[inline]
    pub fn x_mut(&mut self) -> &mut F {
        &mut self.inner.x
    }

    /// A mutable reference to the y-component of the vector.
    #[inline]
    pub fn y_mut(&mut self) -> &mut F {
        &mut self.inner.y
    }

    /// A mutable reference to the z-component of the vector.
    #[inline]
    pub fn z_mut(&mut self) -> &mut F {
        &mut self.inner.z
    }

    /// Appends the given w-component.
    #[inline]
    pub const fn extended(&self, w: F) -> Vector4<F> {
        Vector4::new(self.x(), self.y(), self.z(), w)
    }

    /// Computes the dot product of this vector with another.
    #[inline]
    pub fn dot(&self, other: &Self) -> F {
        self.inner.dot(&other.inner)
    }

    /// Computes the cross product of this vector with another.
    #[inline]
    pub fn cross(&self, other: &Self) -> Self {
        Self::wrap(self.inner.cross(&other.inner))
    }

    /// Computes the squared norm of the vector.
    #[inline]
    pub fn norm_squared(&self) -> F {
        self.inner.norm_squared()
    }

    /// Computes the norm of the vector.
    #[inline]
    pub fn norm(&self) -> F {
        self.inner.norm()
    }

    /// Returns the normalized version of the vector. A zero vector gives
    /// non-finite components.
    #[inline]
    pub fn normalized(&self) -> Self {
        Self::wrap(self.inner.normalize())
    }

    /// Multiplies the vectors component-wise.
    #[inline]
    pub fn component_mul(&self, other: &Self) -> Self {
        Self::wrap(self.inner.component_mul(&other.inner))
    }

    /// Applies the given function to each component.
    #[inline]
    pub fn mapped(&self, f: impl FnMut(F) -> F) -> Self {
        Self::wrap(self.inner.map(f))
    }

    /// If the vector is exactly a positive or negative unit basis vector,
    /// returns the index of its axis and its sign.
    pub fn as_basis_axis(&self) -> Option<(usize, F)> {
        let (x, y, z) = (self.x(), self.y(), self.z());
        if y == F::ZERO && z == F::ZERO && x.abs_equals_one() {
            Some((0, x))
        } else if x == F::ZERO && z == F::ZERO && y.abs_equals_one() {
            Some((1, y))
        } else if x == F::ZERO && y == F::ZERO && z.abs_equals_one() {
            Some((2, z))
        } else {
            None
        }
    }

    #[inline]
    pub(crate) const fn wrap(inner: nalgebra::Vector3<F>) -> Self {
        Self { inner }
    }

    #[inline]
    pub(crate) const fn inner(&self) -> &nalgebra::Vector3<F> {
        &self.inner
    }
}

impl<F: Float> Vector4<F> {
    /// Creates a new vector with the given components.
    #[inline]
    pub const fn new(x: F, y: F, z: F, w: F) -> Self {
        Self::wrap(nalgebra::Vector4::new(x, y, z, w))
    }

    /// Creates a vector with all zeros.
    #[inline]
    pub const fn zeros() -> Self {
        Self::new(F::ZERO, F::ZERO, F::ZERO, F::ZERO)
    }

    /// The x-component of the vector.
    #[inline]
    pub const fn x(&self) -> F {
        self.inner.data.0[0][0]
    }

    /// The y-component of the vector.
    #[inline]
    pub const fn y(&self) -> F {
        self.inner.data.0[0][1]
    }

    /// The z-component of the vector.
    #[inline]
    pub const fn z(&self) -> F {
        self.inner.data.0[0][2]
    }

    /// The w-component of the vector.
    #[inline]
    pub const fn w(&self) -> F {
        self.inner.data.0[0][3]
    }

    /// The first three components of the vector.
    #[inline]
    pub const fn xyz(&self) -> Vector3<F> {
        Vector3::new(self.x(), self.y(), self.z())
    }

    /// Computes the dot product of this vector with another.
    #[inline]
    pub fn dot(&self, other: &Self) -> F {
        self.inner.dot(&other.inner)
    }

    /// Divides the first three components by the fourth.
    #[inline]
    pub fn perspective_divided(&self) -> Vector3<F> {
        Vector3::wrap(self.inner.xyz() * self.w().recip())
    }

    #[inline]
    pub(crate) const fn wrap(inner: nalgebra::Vector4<F>) -> Self {
        Self { inner }
    }
}

impl<F: Float> Default for Vector3<F> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<F: Float> Default for Vector4<F> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<F: Float> PartialEq for Vector3<F> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<F: Float> PartialEq for Vector4<F> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<F: Float> fmt::Debug for Vector3<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector3")
            .field("x", &self.x())
            .field("y", &self.y())
            .field("z", &self.z())
            .finish()
    }
}

impl<F: Float> fmt::Debug for Vector4<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector4")
            .field("x", &self.x())
            .field("y", &self.y())
            .field("z", &self.z())
            .field("w", &self.w())
            .finish()
    }
}

impl<F> From<[F; 3]> for Vector3<F> {
    #[inline]
    fn from([x, y, z]: [F; 3]) -> Self {
        Self {
            inner: nalgebra::Vector3::new(x, y, z),
        }
    }
}

impl<F> From<Vector3<F>> for [F; 3] {
    #[inline]
    fn from(v: Vector3<F>) -> Self {
        let [components] = v.inner.data.0;
        components
    }
}

impl<F> From<[F; 4]> for Vector4<F> {
    #[inline]
    fn from([x, y, z, w]: [F; 4]) -> Self {
        Self {
            inner: nalgebra::Vector4::new(x, y, z, w),
        }
    }
}

impl<F> From<Vector4<F>> for [F; 4] {
    #[inline]
    fn from(v: Vector4<F>) -> Self {
        let [components] = v.inner.data.0;
        components
    }
}

#[cfg(feature = "arbitrary")]
impl<'a, F: Float + arbitrary::Arbitrary<'a>> arbitrary::Arbitrary<'a> for Vector3<F> {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let components: [F; 3] = u.arbitrary()?;
        Ok(Self::from(components))
    }
}

#[cfg(feature = "arbitrary")]
impl<'a, F: Float + arbitrary::Arbitrary<'a>> arbitrary::Arbitrary<'a> for Vector4<F> {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let components: [F; 4] = u.arbitrary()?;
        Ok(Self::from(components))
    }
}

impl_binop!(Add, add, Vector3<F>, Vector3<F>, Vector3<F>, |a, b| {
    Vector3::wrap(a.inner + b.inner)
});

impl_binop!(Sub, sub, Vector3<F>, Vector3<F>, Vector3<F>, |a, b| {
    Vector3::wrap(a.inner - b.inner)
});

impl_binop!(Mul, mul, Vector3<F>, F, Vector3<F>, |a, b| {
    Vector3::wrap(a.inner * *b)
});

impl_binop!(Div, div, Vector3<F>, F, Vector3<F>, |a, b| {
    Vector3::wrap(a.inner / *b)
});

impl_binop_assign!(AddAssign, add_assign, Vector3<F>, Vector3<F>, |a, b| {
    a.inner += b.inner;
});

impl_binop_assign!(SubAssign, sub_assign, Vector3<F>, Vector3<F>, |a, b| {
    a.inner -= b.inner;
});

impl_binop_assign!(MulAssign, mul_assign, Vector3<F>, F, |a, b| {
    a.inner *= *b;
});

impl_unary_op!(Neg, neg, Vector3<F>, Vector3<F>, |v| {
    Vector3::wrap(-v.inner)
});

impl_binop!(Add, add, Vector4<F>, Vector4<F>, Vector4<F>, |a, b| {
    Vector4::wrap(a.inner + b.inner)
});

impl_binop!(Sub, sub, Vector4<F>, Vector4<F>, Vector4<F>, |a, b| {
    Vector4::wrap(a.inner - b.inner)
});

impl_binop!(Mul, mul, Vector4<F>, F, Vector4<F>, |a, b| {
    Vector4::wrap(a.inner * *b)
});

impl_unary_op!(Neg, neg, Vector4<F>, Vector4<F>, |v| {
    Vector4::wrap(-v.inner)
});

impl_abs_diff_eq!(Vector3<F>, |a, b, epsilon| {
    approx::AbsDiffEq::abs_diff_eq(&a.inner, &b.inner, epsilon)
});

impl_relative_eq!(Vector3<F>, |a, b, epsilon, max_relative| {
    approx::RelativeEq::relative_eq(&a.inner, &b.inner, epsilon, max_relative)
});

impl_abs_diff_eq!(Vector4<F>, |a, b, epsilon| {
    approx::AbsDiffEq::abs_diff_eq(&a.inner, &b.inner, epsilon)
});

impl_relative_eq!(Vector4<F>, |a, b, epsilon, max_relative| {
    approx::RelativeEq::relative_eq(&a.inner, &b.inner, epsilon, max_relative)
});

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn cross_product_of_unit_axes_follows_right_hand_rule() {
        assert_eq!(
            Vector3d::unit_x().cross(&Vector3d::unit_y()),
            Vector3d::unit_z()
        );
        assert_eq!(
            Vector3d::unit_z().cross(&Vector3d::unit_x()),
            Vector3d::unit_y()
        );
    }

    #[test]
    fn normalizing_vector_gives_unit_norm() {
        let v = Vector3d::new(3.0, -4.0, 12.0);
        assert_abs_diff_eq!(v.normalized().norm(), 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(v.norm(), 13.0, epsilon = EPSILON);
    }

    #[test]
    fn perspective_division_divides_by_w() {
        let v = Vector4d::new(2.0, 4.0, -6.0, 2.0);
        assert_abs_diff_eq!(
            v.perspective_divided(),
            Vector3d::new(1.0, 2.0, -3.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn vector_arithmetic_operations_work() {
        let a = Vector3f::new(1.0, 2.0, 3.0);
        let b = Vector3f::new(4.0, 5.0, 6.0);

        assert_eq!(&a + &b, Vector3f::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vector3f::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Vector3f::new(2.0, 4.0, 6.0));
        assert_eq!(-a, Vector3f::new(-1.0, -2.0, -3.0));

        let mut c = a;
        c += b;
        c *= 0.5;
        assert_eq!(c, Vector3f::new(2.5, 3.5, 4.5));
    }

    #[test]
    fn components_survive_array_conversion_and_mutation() {
        let mut v = Vector3d::from([1.0, 2.0, 3.0]);
        *v.y_mut() = -2.0;
        assert_eq!(<[f64; 3]>::from(v), [1.0, -2.0, 3.0]);
        assert_eq!(v.extended(4.0).xyz(), v);
        assert_eq!(<[f64; 4]>::from(v.extended(4.0)), [1.0, -2.0, 3.0, 4.0]);
        assert_eq!(Vector3d::default(), Vector3d::zeros());
    }
}
