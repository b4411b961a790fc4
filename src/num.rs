//! Numbers and numerics.

use nalgebra as na;
use num_traits as nt;

/// Gathers traits useful for working with generic floating point types.
pub trait Float: Copy + Default + nt::FromPrimitive + na::RealField + na::Scalar {
    const ZERO: Self;
    const ONE: Self;
    const NEG_ONE: Self;
    const TWO: Self;
    const ONE_HALF: Self;
    const INFINITY: Self;

    /// Depth range slack used for projections with an infinite near or far
    /// plane.
    const INFINITE_DEPTH_EPSILON: Self;

    /// Tolerance used when auditing orthonormality of rounded entries.
    const ORTHONORMALITY_TOLERANCE: Self;

    /// Whether the absolute value of the number is exactly one.
    #[inline]
    fn abs_equals_one(self) -> bool {
        self.abs() == Self::ONE
    }
}

macro_rules! impl_float {
    ($f:tt, $orthonormality_tolerance:expr) => {
        impl Float for $f {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const NEG_ONE: Self = -1.0;
            const TWO: Self = 2.0;
            const ONE_HALF: Self = 0.5;
            const INFINITY: Self = $f::INFINITY;
            const INFINITE_DEPTH_EPSILON: Self = 1e-6;
            const ORTHONORMALITY_TOLERANCE: Self = $orthonormality_tolerance;
        }
    };
}

impl_float!(f32, 1e-4);
impl_float!(f64, 1e-9);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abs_equals_one_only_accepts_unit_magnitudes() {
        assert!((-1.0_f64).abs_equals_one());
        assert!(1.0_f32.abs_equals_one());
        assert!(!1.000_001_f64.abs_equals_one());
        assert!(!0.0_f32.abs_equals_one());
    }
}
