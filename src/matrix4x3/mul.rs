//! Matrix products.

use super::Matrix4x3;
use crate::{
    dispatch::{MulKernel, select_mul_kernel},
    num::Float,
    properties::{Matrix4x3Properties, StructuralProperties},
};

impl<F: Float> Matrix4x3<F> {
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
            "Multiplying {} 4x3 matrix by {} 4x3 matrix with {kernel:?} kernel",
            self.class(),
            right.class()
        );
        match kernel {
            MulKernel::TakeRight => *dst = *right,
            MulKernel::TakeLeft => *dst = *self,
            MulKernel::TranslationAffine => {
                let properties = if right.properties.is_translation() {
                    Matrix4x3Properties::translation()
                } else {
                    Matrix4x3Properties::empty()
                };
                *dst = Self {
                    m30: right.m30 + self.m30,
                    m31: right.m31 + self.m31,
                    m32: right.m32 + self.m32,
                    properties,
                    ..*right
                };
            }
            MulKernel::AffineAffine
            | MulKernel::PerspectiveAffine
            | MulKernel::GenericAffine
            | MulKernel::Generic => self.mul_affine_into(right, dst),
        }
    }

    /// Full product of two 4x3 matrices. The result is orthonormal if both
    /// operands are.
    pub fn mul_affine_into(&self, right: &Self, dst: &mut Self) {
        let (a, b) = (self, right);
        *dst = Self {
            m00: a.m00 * b.m00 + a.m10 * b.m01 + a.m20 * b.m02,
            m01: a.m01 * b.m00 + a.m11 * b.m01 + a.m21 * b.m02,
            m02: a.m02 * b.m00 + a.m12 * b.m01 + a.m22 * b.m02,
            m10: a.m00 * b.m10 + a.m10 * b.m11 + a.m20 * b.m12,
            m11: a.m01 * b.m10 + a.m11 * b.m11 + a.m21 * b.m12,
            m12: a.m02 * b.m10 + a.m12 * b.m11 + a.m22 * b.m12,
            m20: a.m00 * b.m20 + a.m10 * b.m21 + a.m20 * b.m22,
            m21: a.m01 * b.m20 + a.m11 * b.m21 + a.m21 * b.m22,
            m22: a.m02 * b.m20 + a.m12 * b.m21 + a.m22 * b.m22,
            m30: a.m00 * b.m30 + a.m10 * b.m31 + a.m20 * b.m32 + a.m30,
            m31: a.m01 * b.m30 + a.m11 * b.m31 + a.m21 * b.m32 + a.m31,
            m32: a.m02 * b.m30 + a.m12 * b.m31 + a.m22 * b.m32 + a.m32,
            properties: a
                .properties
                .meet(b.properties)
                .intersection(Matrix4x3Properties::ORTHONORMAL),
        };
    }

    /// Writes `self * right` to `dst`, assuming this matrix is diagonal apart
    /// from its translation, the shape of an orthographic projection.
    pub fn mul_orthographic_into(&self, right: &Self, dst: &mut Self) {
        let (d0, d1, d2) = (self.m00, self.m11, self.m22);
        *dst = Self {
            m00: d0 * right.m00,
            m01: d1 * right.m01,
            m02: d2 * right.m02,
            m10: d0 * right.m10,
            m11: d1 * right.m11,
            m12: d2 * right.m12,
            m20: d0 * right.m20,
            m21: d1 * right.m21,
            m22: d2 * right.m22,
            m30: d0 * right.m30 + self.m30,
            m31: d1 * right.m31 + self.m31,
            m32: d2 * right.m32 + self.m32,
            properties: Matrix4x3Properties::empty(),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{matrix4::Matrix4, vector::Vector3};
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    type M = Matrix4x3<f64>;

    const EPSILON: f64 = 1e-10;

    #[test]
    fn translation_times_rotation_keeps_rotation_and_translation() {
        let product = M::translation(&Vector3::new(1.0, 2.0, 3.0)) * M::rotation_z(0.5);
        assert_eq!(product.linear_part(), M::rotation_z(0.5).linear_part());
        assert_eq!(product.translation_part(), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(product.properties(), Matrix4x3Properties::empty());
        assert!(product.properties_hold());
    }

    #[test]
    fn product_of_translations_is_translation() {
        let product =
            M::translation(&Vector3::new(1.0, 0.0, 0.0)) * M::translation(&Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(product, M::translation(&Vector3::new(1.0, 2.0, 0.0)));
        assert_eq!(product.properties(), Matrix4x3Properties::translation());
    }

    #[test]
    fn product_of_rotations_is_orthonormal() {
        let mut m = M::rotation_x(0.3);
        m *= M::rotation_y(-1.2);
        assert_eq!(m.properties(), Matrix4x3Properties::orthonormal());
        assert!(m.properties_hold());
    }

    #[test]
    fn local_product_puts_receiver_on_the_right() {
        let a = M::rotation_x(0.3);
        let b = M::translation(&Vector3::new(1.0, 2.0, 3.0));
        let mut m = a;
        m.multiply_local(&b);
        assert_eq!(m, b * a);
        let mut dst = M::zeros();
        a.multiply_local_into(&b, &mut dst);
        assert_eq!(dst, m);
    }

    #[test]
    fn orthographic_kernel_matches_general_product() {
        let ortho = M::orthographic(-2.0, 4.0, -1.0, 3.0, 0.5, 10.0, false);
        let right = M::rotation(0.4, &Vector3::new(0.6, 0.0, 0.8));
        let mut fast = M::zeros();
        ortho.mul_orthographic_into(&right, &mut fast);
        assert_abs_diff_eq!(fast, ortho * right, epsilon = EPSILON);
    }

    prop_compose! {
        fn orthonormal_strategy()(
            axis in prop::array::uniform3(-1.0..1.0_f64)
                .prop_filter("axis must not vanish", |a| a.iter().map(|c| c * c).sum::<f64>() > 1e-2),
            angle in 0.1..3.0_f64,
            translation in prop::array::uniform3(-5.0..5.0_f64),
        ) -> M {
            let mut m = M::rotation(angle, &Vector3::from(axis).normalized());
            m.translate(&Vector3::from(translation));
            m
        }
    }

    prop_compose! {
        fn scaled_strategy()(
            angle in -3.0..3.0_f64,
            t in prop::array::uniform3(-5.0..5.0_f64),
            s in prop::array::uniform3(0.2..3.0_f64),
        ) -> M {
            let mut m = M::rotation_y(angle);
            m.scale(&Vector3::from(s)).translate(&Vector3::from(t));
            m
        }
    }

    fn any_matrix() -> impl Strategy<Value = M> {
        prop_oneof![
            Just(M::identity()),
            prop::array::uniform3(-5.0..5.0_f64).prop_map(|t| M::translation(&Vector3::from(t))),
            orthonormal_strategy(),
            scaled_strategy(),
        ]
    }

    proptest! {
        #[test]
        fn products_match_4x4_products(a in any_matrix(), b in any_matrix()) {
            let product = a * b;
            let expected = Matrix4::from(&a) * Matrix4::from(&b);
            prop_assert!(approx::abs_diff_eq!(Matrix4::from(&product), expected, epsilon = EPSILON));
            prop_assert!(product.properties_hold());
        }

        #[test]
        fn predicted_properties_match_inference_for_exact_operands(
            t in prop::array::uniform3(-5.0..5.0_f64),
            u in prop::array::uniform3(-5.0..5.0_f64),
            identity_left in any::<bool>(),
        ) {
            let left = if identity_left { M::identity() } else { M::translation(&Vector3::from(t)) };
            let right = M::translation(&Vector3::from(u));
            let product = left * right;
            let mut inferred = product;
            inferred.determine_properties();
            prop_assert_eq!(product.properties(), inferred.properties());
        }

        #[test]
        fn predicted_properties_are_valid_and_contain_inferred(a in any_matrix(), b in any_matrix()) {
            let product = a * b;
            prop_assert!(product.properties_hold());
            let mut inferred = product;
            inferred.determine_properties();
            prop_assert!(product.properties().contains(inferred.properties()));
        }

        #[test]
        fn self_product_matches_fresh_destination(m in any_matrix()) {
            let c = m;
            let mut aliased = m;
            aliased.multiply(&c);

            let mut fresh = M::zeros();
            c.multiply_into(&c, &mut fresh);
            prop_assert_eq!(aliased, fresh);
            prop_assert_eq!(aliased.properties(), fresh.properties());
        }

        #[test]
        fn in_place_product_matches_separate_destination(a in any_matrix(), b in any_matrix()) {
            let mut separate = M::zeros();
            a.multiply_into(&b, &mut separate);
            let mut aliased = a;
            aliased.multiply(&b);
            prop_assert_eq!(aliased, separate);
            prop_assert_eq!(aliased.properties(), separate.properties());
        }
    }
}
