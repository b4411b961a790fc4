//! Inferring properties from entries and auditing cached properties.

use super::Matrix4x3;
use crate::{num::Float, properties::Matrix4x3Properties};

impl<F: Float> Matrix4x3<F> {
    /// Determines the properties of the current entries by exact comparison.
    /// As for 4x4 matrices, `ORTHONORMAL` is only reported together with
    /// `TRANSLATION`.
    pub(crate) fn inferred_properties(&self) -> Matrix4x3Properties {
        if !self.has_identity_3x3() {
            return Matrix4x3Properties::empty();
        }
        if self.m30 == F::ZERO && self.m31 == F::ZERO && self.m32 == F::ZERO {
            Matrix4x3Properties::identity()
        } else {
            Matrix4x3Properties::translation()
        }
    }

    /// Checks every cached property against the entries, with orthonormality
    /// checked to within a tolerance suited to the scalar type.
    pub fn properties_hold(&self) -> bool {
        let properties = self.properties;
        if properties.contains(Matrix4x3Properties::ORTHONORMAL)
            && !self
                .linear_part()
                .is_orthonormal(F::ORTHONORMALITY_TOLERANCE)
        {
            return false;
        }
        if properties.contains(Matrix4x3Properties::TRANSLATION) && !self.has_identity_3x3() {
            return false;
        }
        !(properties.contains(Matrix4x3Properties::IDENTITY) && *self != Self::identity())
    }

    fn has_identity_3x3(&self) -> bool {
        self.linear_part() == crate::matrix3::Matrix3::identity()
    }
}
