//! Quaternions for representing rotations.

use crate::{matrix3::Matrix3, num::Float, vector::Vector3};
use bytemuck::{Pod, Zeroable};
use nalgebra::{Rotation3, Unit, UnitQuaternion};
use std::fmt;

/// A quaternion `w + xi + yj + zk`. Unit quaternions represent rotations.
///
/// The rotation operations assume a unit quaternion and do not normalize.
#[repr(transparent)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "[F; 4]", from = "[F; 4]")
)]
#[derive(Clone, Copy)]
pub struct Quaternion<F> {
    inner: nalgebra::Quaternion<F>,
}

pub type Quaternionf = Quaternion<f32>;
pub type Quaterniond = Quaternion<f64>;

// SAFETY: `#[repr(transparent)]` wrapper around a `Zeroable` nalgebra quaternion
unsafe impl<F: Float + Zeroable> Zeroable for Quaternion<F> {}

// SAFETY: `#[repr(transparent)]` wrapper around a `Pod` nalgebra quaternion
unsafe impl<F: Float + Pod> Pod for Quaternion<F> {}

impl<F: Float> Quaternion<F> {
    /// Creates a quaternion with the given imaginary (`x`, `y`, `z`) and real
    /// (`w`) parts.
    #[inline]
    pub const fn new(x: F, y: F, z: F, w: F) -> Self {
        Self::wrap(nalgebra::Quaternion::from_vector(nalgebra::Vector4::new(
            x, y, z, w,
        )))
    }

    /// The identity rotation.
    #[inline]
    pub const fn identity() -> Self {
        Self::new(F::ZERO, F::ZERO, F::ZERO, F::ONE)
    }

    /// Creates the rotation by the given angle around the given unit axis.
    #[inline]
    pub fn from_axis_angle(axis: &Vector3<F>, angle: F) -> Self {
        let axis = Unit::new_unchecked(*axis.inner());
        Self::from_unit(UnitQuaternion::from_axis_angle(&axis, angle))
    }

    /// Creates the rotation by the given angle around the x-axis.
    #[inline]
    pub fn from_rotation_x(angle: F) -> Self {
        Self::from_axis_angle(&Vector3::unit_x(), angle)
    }

    /// Creates the rotation by the given angle around the y-axis.
    #[inline]
    pub fn from_rotation_y(angle: F) -> Self {
        Self::from_axis_angle(&Vector3::unit_y(), angle)
    }

    /// Creates the rotation by the given angle around the z-axis.
    #[inline]
    pub fn from_rotation_z(angle: F) -> Self {
        Self::from_axis_angle(&Vector3::unit_z(), angle)
    }

    /// Creates the rotation `Rx(angle_x) * Ry(angle_y) * Rz(angle_z)`.
    pub fn from_euler_xyz(angle_x: F, angle_y: F, angle_z: F) -> Self {
        Self::from_rotation_x(angle_x) * Self::from_rotation_y(angle_y) * Self::from_rotation_z(angle_z)
    }

    /// Extracts the rotation from the given orthonormal rotation matrix.
    #[inline]
    pub fn from_rotation_matrix(m: &Matrix3<F>) -> Self {
        let rotation = Rotation3::from_matrix_unchecked(nalgebra::Matrix3::from(m));
        Self::from_unit(UnitQuaternion::from_rotation_matrix(&rotation))
    }

    #[inline]
    pub const fn x(&self) -> F {
        self.inner.coords.data.0[0][0]
    }

    #[inline]
    pub const fn y(&self) -> F {
        self.inner.coords.data.0[0][1]
    }

    #[inline]
    pub const fn z(&self) -> F {
        self.inner.coords.data.0[0][2]
    }

    #[inline]
    pub const fn w(&self) -> F {
        self.inner.coords.data.0[0][3]
    }

    /// The imaginary part as a vector.
    #[inline]
    pub const fn imag(&self) -> Vector3<F> {
        Vector3::new(self.x(), self.y(), self.z())
    }

    #[inline]
    pub fn dot(&self, other: &Self) -> F {
        self.inner.dot(&other.inner)
    }

    #[inline]
    pub fn norm_squared(&self) -> F {
        self.inner.norm_squared()
    }

    #[inline]
    pub fn norm(&self) -> F {
        self.inner.norm()
    }

    /// Scales the quaternion to unit norm.
    #[inline]
    pub fn normalized(&self) -> Self {
        Self::wrap(self.inner.normalize())
    }

    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::wrap(self.inner.conjugate())
    }

    /// Computes the multiplicative inverse. For unit quaternions this is
    /// the conjugate. The zero quaternion gives non-finite components.
    #[inline]
    pub fn inverted(&self) -> Self {
        Self::wrap(self.inner.conjugate() / self.inner.norm_squared())
    }

    /// Rotates the given vector, assuming this is a unit quaternion.
    #[inline]
    pub fn rotate_vector(&self, vector: &Vector3<F>) -> Vector3<F> {
        Vector3::wrap(self.as_unit().transform_vector(vector.inner()))
    }

    /// Spherically interpolates between this and the given unit quaternion
    /// along the shorter arc. Falls back to [`Self::nlerp`] when the two are
    /// too close for the arc angle to be resolved.
    pub fn slerp(&self, target: &Self, alpha: F) -> Self {
        match self
            .as_unit()
            .try_slerp(&target.as_unit(), alpha, F::default_epsilon())
        {
            Some(interpolated) => Self::from_unit(interpolated),
            None => self.nlerp(target, alpha),
        }
    }

    /// Linearly interpolates between this and the given unit quaternion
    /// along the shorter arc and normalizes the result.
    pub fn nlerp(&self, target: &Self, alpha: F) -> Self {
        let target = if self.dot(target) < F::ZERO {
            -target
        } else {
            *target
        };
        Self::from_unit(self.as_unit().nlerp(&target.as_unit(), alpha))
    }

    #[inline]
    const fn wrap(inner: nalgebra::Quaternion<F>) -> Self {
        Self { inner }
    }

    #[inline]
    fn from_unit(unit: UnitQuaternion<F>) -> Self {
        Self::wrap(unit.into_inner())
    }

    #[inline]
    fn as_unit(&self) -> UnitQuaternion<F> {
        UnitQuaternion::new_unchecked(self.inner)
    }
}

impl<F: Float> Default for Quaternion<F> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<F: Float> PartialEq for Quaternion<F> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<F: Float> fmt::Debug for Quaternion<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Quaternion")
            .field("x", &self.x())
            .field("y", &self.y())
            .field("z", &self.z())
            .field("w", &self.w())
            .finish()
    }
}

impl<F> From<[F; 4]> for Quaternion<F> {
    fn from([x, y, z, w]: [F; 4]) -> Self {
        Self {
            inner: nalgebra::Quaternion::from_vector(nalgebra::Vector4::new(x, y, z, w)),
        }
    }
}

impl<F> From<Quaternion<F>> for [F; 4] {
    fn from(q: Quaternion<F>) -> Self {
        let [components] = q.inner.coords.data.0;
        components
    }
}

#[cfg(feature = "arbitrary")]
impl<'a, F: Float + arbitrary::Arbitrary<'a>> arbitrary::Arbitrary<'a> for Quaternion<F> {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let components: [F; 4] = u.arbitrary()?;
        Ok(Self::from(components))
    }
}

impl_binop!(Mul, mul, Quaternion<F>, Quaternion<F>, Quaternion<F>, |a, b| {
    Quaternion::wrap(a.inner * b.inner)
});

impl_binop_assign!(MulAssign, mul_assign, Quaternion<F>, Quaternion<F>, |a, b| {
    a.inner = a.inner * b.inner;
});

impl_unary_op!(Neg, neg, Quaternion<F>, Quaternion<F>, |q| {
    Quaternion::wrap(-q.inner)
});

// Compares components, so `q` and `-q` differ even though they represent the
// same rotation.
impl_abs_diff_eq!(Quaternion<F>, |a, b, epsilon| {
    approx::AbsDiffEq::abs_diff_eq(&a.inner.coords, &b.inner.coords, epsilon)
});

impl_relative_eq!(Quaternion<F>, |a, b, epsilon, max_relative| {
    approx::RelativeEq::relative_eq(&a.inner.coords, &b.inner.coords, epsilon, max_relative)
});
