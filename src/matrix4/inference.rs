//! Inferring properties from entries and auditing cached properties.

use super::Matrix4;
use crate::{num::Float, properties::Matrix4Properties};

impl<F: Float> Matrix4<F> {
    /// Determines the properties of the current entries by exact comparison.
    ///
    /// Only exact structure is detected. `ORTHONORMAL` is only reported
    /// together with `TRANSLATION`, since orthonormality of a general block
    /// cannot be established by exact comparisons.
    pub(crate) fn inferred_properties(&self) -> Matrix4Properties {
        let mut properties = Matrix4Properties::empty();
        if self.m03 != F::ZERO || self.m13 != F::ZERO {
            return properties;
        }
        if self.m23 == F::ZERO && self.m33 == F::ONE {
            properties |= Matrix4Properties::AFFINE;
            if self.has_identity_3x3() {
                properties |= Matrix4Properties::TRANSLATION | Matrix4Properties::ORTHONORMAL;
                if self.m30 == F::ZERO && self.m31 == F::ZERO && self.m32 == F::ZERO {
                    properties |= Matrix4Properties::IDENTITY;
                }
            }
        } else if self.m01 == F::ZERO
            && self.m02 == F::ZERO
            && self.m10 == F::ZERO
            && self.m12 == F::ZERO
            && self.m20 == F::ZERO
            && self.m21 == F::ZERO
            && self.m30 == F::ZERO
            && self.m31 == F::ZERO
            && self.m33 == F::ZERO
        {
            properties |= Matrix4Properties::PERSPECTIVE;
        }
        properties
    }

    /// Checks every cached property against the entries.
    ///
    /// Exact structure is compared exactly. Orthonormality is checked with a
    /// tolerance suited to the scalar type, since it is only ever derived from
    /// rounded computations.
    pub fn properties_hold(&self) -> bool {
        let properties = self.properties;

        if properties.contains(Matrix4Properties::AFFINE) && !self.has_affine_last_row() {
            return false;
        }
        if properties.contains(Matrix4Properties::ORTHONORMAL)
            && !(self.has_affine_last_row() && self.has_orthonormal_3x3())
        {
            return false;
        }
        if properties.contains(Matrix4Properties::TRANSLATION)
            && !(self.has_affine_last_row() && self.has_identity_3x3())
        {
            return false;
        }
        if properties.contains(Matrix4Properties::IDENTITY) && *self != Self::identity() {
            return false;
        }
        if properties.contains(Matrix4Properties::PERSPECTIVE) && !self.has_perspective_shape() {
            return false;
        }
        true
    }

    fn has_affine_last_row(&self) -> bool {
        self.m03 == F::ZERO && self.m13 == F::ZERO && self.m23 == F::ZERO && self.m33 == F::ONE
    }

    fn has_identity_3x3(&self) -> bool {
        self.m00 == F::ONE
            && self.m01 == F::ZERO
            && self.m02 == F::ZERO
            && self.m10 == F::ZERO
            && self.m11 == F::ONE
            && self.m12 == F::ZERO
            && self.m20 == F::ZERO
            && self.m21 == F::ZERO
            && self.m22 == F::ONE
    }

    fn has_orthonormal_3x3(&self) -> bool {
        self.linear_part().is_orthonormal(F::ORTHONORMALITY_TOLERANCE)
    }

    fn has_perspective_shape(&self) -> bool {
        [
            self.m01, self.m02, self.m03, self.m10, self.m12, self.m13, self.m20, self.m21,
            self.m30, self.m31, self.m33,
        ]
        .iter()
        .all(|&entry| entry == F::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        properties::StructuralProperties,
        vector::{Vector3, Vector4},
    };
    use proptest::prelude::*;

    type M = Matrix4<f64>;

    #[test]
    fn identity_entries_infer_every_chain_property() {
        let m = M::from_column_slice(&M::identity().to_cols_array());
        assert_eq!(m.inferred_properties(), Matrix4Properties::identity());
    }

    #[test]
    fn translation_entries_infer_translation() {
        let m = M::from_elements(
            1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 4.0, -2.0, 0.5, 1.0,
        );
        assert_eq!(m.properties(), Matrix4Properties::translation());
    }

    #[test]
    fn rotation_entries_infer_only_affine() {
        let (s, c) = 0.4_f64.sin_cos();
        let m = M::from_elements(
            c, s, 0.0, 0.0, -s, c, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
        );
        assert_eq!(m.properties(), Matrix4Properties::affine());
    }

    #[test]
    fn perspective_shaped_entries_infer_perspective() {
        let m = M::from_elements(
            1.5, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, -1.2, -1.0, 0.0, 0.0, -0.2, 0.0,
        );
        assert_eq!(m.properties(), Matrix4Properties::perspective());
    }

    #[test]
    fn nonzero_w_coupling_infers_nothing() {
        let mut m = M::identity();
        m.set_column(0, &Vector4::new(1.0, 0.0, 0.0, 0.5));
        m.determine_properties();
        assert_eq!(m.properties(), Matrix4Properties::empty());
    }

    #[test]
    fn off_center_frustum_entries_infer_nothing() {
        let m = M::from_elements(
            1.5, 0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.3, 0.0, -1.2, -1.0, 0.0, 0.0, -0.2, 0.0,
        );
        assert_eq!(m.properties(), Matrix4Properties::empty());
    }

    #[test]
    fn negative_zero_counts_as_zero() {
        let m = M::from_elements(
            1.0, -0.0, 0.0, -0.0, 0.0, 1.0, -0.0, 0.0, 0.0, 0.0, 1.0, 0.0, -0.0, 0.0, 0.0, 1.0,
        );
        assert_eq!(m.properties(), Matrix4Properties::identity());
    }

    #[test]
    fn nan_entries_are_never_classified() {
        let mut m = M::identity();
        m.set_element(0, 0, f64::NAN);
        m.determine_properties();
        assert_eq!(m.properties(), Matrix4Properties::affine());
        m.set_element(3, 3, f64::NAN);
        m.determine_properties();
        assert_eq!(m.properties(), Matrix4Properties::empty());
    }

    #[test]
    fn unchecked_properties_are_detected_by_audit() {
        let mut m = M::translation(&Vector3::new(1.0, 2.0, 3.0));
        assert!(m.properties_hold());

        m.assume_properties_unchecked(Matrix4Properties::identity());
        assert!(!m.properties_hold());

        m.assume_properties_unchecked(Matrix4Properties::perspective());
        assert!(!m.properties_hold());

        let mut scaled = M::scaling(&Vector3::new(2.0, 1.0, 1.0));
        scaled.assume_properties_unchecked(Matrix4Properties::orthonormal());
        assert!(!scaled.properties_hold());
    }

    #[test]
    fn audit_accepts_rounded_rotation_as_orthonormal() {
        let m = M::rotation(1.1, &Vector3::new(1.0, 2.0, -0.5).normalized());
        assert!(m.properties().is_orthonormal());
        assert!(m.properties_hold());
    }

    prop_compose! {
        fn entries_strategy()(
            entries in prop::array::uniform16(prop_oneof![Just(0.0), Just(1.0), -2.0..2.0_f64])
        ) -> [f64; 16] {
            entries
        }
    }

    proptest! {
        #[test]
        fn inferred_properties_always_hold_and_are_closed(entries in entries_strategy()) {
            let m = M::from(entries);
            prop_assert!(m.properties_hold());
            prop_assert_eq!(m.properties().closed(), m.properties());
        }

        #[test]
        fn inference_is_idempotent(entries in entries_strategy()) {
            let m = M::from(entries);
            let mut again = m;
            again.determine_properties();
            prop_assert_eq!(again.properties(), m.properties());
        }
    }
}
