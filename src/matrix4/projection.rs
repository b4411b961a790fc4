//! Projections, view matrices and their inverses.
//!
//! All projections map to a right-handed clip space looking down the negative
//! z-axis. With `z_zero_to_one` the depth range of normalized device
//! coordinates is `[0, 1]`, otherwise `[-1, 1]`.

use super::Matrix4;
use crate::{
    dispatch::{FactorKernel, select_factor_kernel},
    num::Float,
    properties::{Matrix4Properties, StructuralProperties},
    vector::{Vector3, Vector4},
};

impl<F: Float> Matrix4<F> {
    /// Creates a symmetric perspective projection with the given vertical
    /// field of view (in radians) and aspect ratio (width over height). An
    /// infinite `z_far` (or `z_near`) places that plane at infinity.
    pub fn perspective(fovy: F, aspect: F, z_near: F, z_far: F, z_zero_to_one: bool) -> Self {
        let half_height = (fovy * F::ONE_HALF).tan();
        let mut m = Self::zeros();
        m.m00 = (half_height * aspect).recip();
        m.m11 = half_height.recip();
        m.set_depth_range(z_near, z_far, z_zero_to_one);
        m.m23 = F::NEG_ONE;
        m.properties = Matrix4Properties::perspective();
        m
    }

    /// Creates a symmetric perspective projection whose near plane has the
    /// given width and height.
    pub fn perspective_rect(
        width: F,
        height: F,
        z_near: F,
        z_far: F,
        z_zero_to_one: bool,
    ) -> Self {
        let mut m = Self::zeros();
        m.m00 = (z_near + z_near) / width;
        m.m11 = (z_near + z_near) / height;
        m.set_depth_range(z_near, z_far, z_zero_to_one);
        m.m23 = F::NEG_ONE;
        m.properties = Matrix4Properties::perspective();
        m
    }

    /// Creates a general, possibly off-center, perspective frustum.
    pub fn frustum(
        left: F,
        right: F,
        bottom: F,
        top: F,
        z_near: F,
        z_far: F,
        z_zero_to_one: bool,
    ) -> Self {
        let mut m = Self::zeros();
        m.m00 = (z_near + z_near) / (right - left);
        m.m11 = (z_near + z_near) / (top - bottom);
        m.m20 = (right + left) / (right - left);
        m.m21 = (top + bottom) / (top - bottom);
        m.set_depth_range(z_near, z_far, z_zero_to_one);
        m.m23 = F::NEG_ONE;
        m.properties = if m.m20 == F::ZERO && m.m21 == F::ZERO {
            Matrix4Properties::perspective()
        } else {
            Matrix4Properties::empty()
        };
        m
    }

    /// Writes the depth entries `m22` and `m32` of a perspective projection.
    fn set_depth_range(&mut self, z_near: F, z_far: F, z_zero_to_one: bool) {
        let e = F::INFINITE_DEPTH_EPSILON;
        let (near_scale, depth_offset) = if z_zero_to_one {
            (F::ONE, F::ZERO)
        } else {
            (F::TWO, F::ONE)
        };
        if z_far == F::INFINITY {
            self.m22 = e - F::ONE;
            self.m32 = (e - near_scale) * z_near;
        } else if z_near == F::INFINITY {
            self.m22 = depth_offset - e;
            self.m32 = (near_scale - e) * z_far;
        } else {
            self.m22 = (if z_zero_to_one { z_far } else { z_far + z_near }) / (z_near - z_far);
            self.m32 = (near_scale * z_far) * z_near / (z_near - z_far);
        }
    }

    /// Creates an orthographic projection of the given box.
    pub fn orthographic(
        left: F,
        right: F,
        bottom: F,
        top: F,
        z_near: F,
        z_far: F,
        z_zero_to_one: bool,
    ) -> Self {
        let mut m = Self::identity();
        m.m00 = F::TWO / (right - left);
        m.m11 = F::TWO / (top - bottom);
        m.m22 = (if z_zero_to_one { F::ONE } else { F::TWO }) / (z_near - z_far);
        m.m30 = (right + left) / (left - right);
        m.m31 = (top + bottom) / (bottom - top);
        m.m32 = (if z_zero_to_one { z_near } else { z_far + z_near }) / (z_near - z_far);
        m.properties = Matrix4Properties::affine();
        m
    }

    /// Creates an orthographic projection of a box centered on the z-axis.
    pub fn orthographic_symmetric(
        width: F,
        height: F,
        z_near: F,
        z_far: F,
        z_zero_to_one: bool,
    ) -> Self {
        let half_width = width * F::ONE_HALF;
        let half_height = height * F::ONE_HALF;
        Self::orthographic(
            -half_width,
            half_width,
            -half_height,
            half_height,
            z_near,
            z_far,
            z_zero_to_one,
        )
    }

    /// Creates a right-handed view matrix for an observer at `eye` looking
    /// at `center`.
    pub fn look_at_rh(eye: &Vector3<F>, center: &Vector3<F>, up: &Vector3<F>) -> Self {
        let mut m = Self::look_along(&(center - eye), up);
        m.m30 = -(m.m00 * eye.x() + m.m10 * eye.y() + m.m20 * eye.z());
        m.m31 = -(m.m01 * eye.x() + m.m11 * eye.y() + m.m21 * eye.z());
        m.m32 = -(m.m02 * eye.x() + m.m12 * eye.y() + m.m22 * eye.z());
        m
    }

    /// Creates a right-handed view rotation for an observer at the origin
    /// looking along `direction`. If `direction` is parallel to `up`, the
    /// result will be non-finite.
    pub fn look_along(direction: &Vector3<F>, up: &Vector3<F>) -> Self {
        let backward = (-direction).normalized();
        let left = up.cross(&backward).normalized();
        let upward = backward.cross(&left);
        let mut m = Self::identity();
        m.m00 = left.x();
        m.m01 = upward.x();
        m.m02 = backward.x();
        m.m10 = left.y();
        m.m11 = upward.y();
        m.m12 = backward.y();
        m.m20 = left.z();
        m.m21 = upward.z();
        m.m22 = backward.z();
        m.properties = Matrix4Properties::orthonormal();
        m
    }

    /// Appends a view transform: `self * look_at_rh(eye, center, up)`.
    #[inline]
    pub fn look_at(&mut self, eye: &Vector3<F>, center: &Vector3<F>, up: &Vector3<F>) -> &mut Self {
        self.in_place(|this, dst| this.look_at_into(eye, center, up, dst))
    }

    /// Writes `self * look_at_rh(eye, center, up)` to `dst`.
    pub fn look_at_into(
        &self,
        eye: &Vector3<F>,
        center: &Vector3<F>,
        up: &Vector3<F>,
        dst: &mut Self,
    ) {
        self.mul_view_into(&Self::look_at_rh(eye, center, up), dst);
    }

    /// Appends a view rotation: `self * look_along(direction, up)`.
    #[inline]
    pub fn look_along_mul(&mut self, direction: &Vector3<F>, up: &Vector3<F>) -> &mut Self {
        let view = Self::look_along(direction, up);
        self.in_place(|this, dst| this.mul_view_into(&view, dst))
    }

    fn mul_view_into(&self, view: &Self, dst: &mut Self) {
        match select_factor_kernel(self.properties) {
            FactorKernel::Constructor => *dst = *view,
            FactorKernel::Perspective => self.mul_perspective_affine_into(view, dst),
            FactorKernel::Translation | FactorKernel::Affine => self.mul_affine_into(view, dst),
            FactorKernel::Generic => self.mul_generic_affine_into(view, dst),
        }
    }

    /// Appends a symmetric perspective projection:
    /// `self * perspective(fovy, aspect, z_near, z_far, z_zero_to_one)`.
    pub fn perspective_mul(
        &mut self,
        fovy: F,
        aspect: F,
        z_near: F,
        z_far: F,
        z_zero_to_one: bool,
    ) -> &mut Self {
        let projection = Self::perspective(fovy, aspect, z_near, z_far, z_zero_to_one);
        self.in_place(|this, dst| this.mul_projection_into(&projection, dst))
    }

    /// Appends a perspective frustum:
    /// `self * frustum(left, right, bottom, top, z_near, z_far, z_zero_to_one)`.
    pub fn frustum_mul(
        &mut self,
        left: F,
        right: F,
        bottom: F,
        top: F,
        z_near: F,
        z_far: F,
        z_zero_to_one: bool,
    ) -> &mut Self {
        let projection = Self::frustum(left, right, bottom, top, z_near, z_far, z_zero_to_one);
        self.in_place(|this, dst| this.mul_projection_into(&projection, dst))
    }

    /// Appends an orthographic projection:
    /// `self * orthographic(left, right, bottom, top, z_near, z_far, z_zero_to_one)`.
    pub fn orthographic_mul(
        &mut self,
        left: F,
        right: F,
        bottom: F,
        top: F,
        z_near: F,
        z_far: F,
        z_zero_to_one: bool,
    ) -> &mut Self {
        let projection =
            Self::orthographic(left, right, bottom, top, z_near, z_far, z_zero_to_one);
        self.in_place(|this, dst| this.mul_orthographic_into(&projection, dst))
    }

    /// Writes `self * projection` to `dst`, where `projection` has the shape
    /// of a frustum: only `m00`, `m11`, `m20`, `m21`, `m22`, `m23` and `m32`
    /// may be nonzero.
    fn mul_projection_into(&self, projection: &Self, dst: &mut Self) {
        if select_factor_kernel(self.properties) == FactorKernel::Constructor {
            *dst = *projection;
            return;
        }
        let p = projection;
        let column_2 = |k0: F, k1: F, k2: F, k3: F| p.m20 * k0 + p.m21 * k1 + p.m22 * k2 - k3;
        *dst = Self {
            m00: self.m00 * p.m00,
            m01: self.m01 * p.m00,
            m02: self.m02 * p.m00,
            m03: self.m03 * p.m00,
            m10: self.m10 * p.m11,
            m11: self.m11 * p.m11,
            m12: self.m12 * p.m11,
            m13: self.m13 * p.m11,
            m20: column_2(self.m00, self.m10, self.m20, self.m30),
            m21: column_2(self.m01, self.m11, self.m21, self.m31),
            m22: column_2(self.m02, self.m12, self.m22, self.m32),
            m23: column_2(self.m03, self.m13, self.m23, self.m33),
            m30: self.m20 * p.m32,
            m31: self.m21 * p.m32,
            m32: self.m22 * p.m32,
            m33: self.m23 * p.m32,
            properties: Matrix4Properties::empty(),
        };
    }

    /// Writes `self * projection` to `dst`, where `projection` is a diagonal
    /// matrix with a translation, the shape of an orthographic projection.
    pub fn mul_orthographic_into(&self, projection: &Self, dst: &mut Self) {
        if select_factor_kernel(self.properties) == FactorKernel::Constructor {
            *dst = *projection;
            return;
        }
        let p = projection;
        let translated = |k0: F, k1: F, k2: F, k3: F| k0 * p.m30 + k1 * p.m31 + k2 * p.m32 + k3;
        *dst = Self {
            m00: self.m00 * p.m00,
            m01: self.m01 * p.m00,
            m02: self.m02 * p.m00,
            m03: self.m03 * p.m00,
            m10: self.m10 * p.m11,
            m11: self.m11 * p.m11,
            m12: self.m12 * p.m11,
            m13: self.m13 * p.m11,
            m20: self.m20 * p.m22,
            m21: self.m21 * p.m22,
            m22: self.m22 * p.m22,
            m23: self.m23 * p.m22,
            m30: translated(self.m00, self.m10, self.m20, self.m30),
            m31: translated(self.m01, self.m11, self.m21, self.m31),
            m32: translated(self.m02, self.m12, self.m22, self.m32),
            m33: translated(self.m03, self.m13, self.m23, self.m33),
            properties: self.properties.intersection(Matrix4Properties::AFFINE),
        };
    }

    /// Writes the inverse to `dst` assuming this matrix is a symmetric
    /// perspective projection, whatever its properties say.
    #[inline]
    pub fn invert_perspective_into(&self, dst: &mut Self) {
        *dst = self.perspective_inverse();
    }

    /// Computes the inverse assuming this matrix is a symmetric perspective
    /// projection.
    #[inline]
    pub fn invert_perspective(&self) -> Self {
        self.perspective_inverse()
    }

    /// Writes the inverse to `dst` assuming this matrix has the shape of a
    /// possibly off-center frustum.
    pub fn invert_frustum_into(&self, dst: &mut Self) {
        let inv_m00 = self.m00.recip();
        let inv_m11 = self.m11.recip();
        let inv_m23 = self.m23.recip();
        let inv_m32 = self.m32.recip();
        let mut inverse = Self::zeros();
        inverse.m00 = inv_m00;
        inverse.m11 = inv_m11;
        inverse.m23 = inv_m32;
        inverse.m30 = -self.m20 * inv_m00 * inv_m23;
        inverse.m31 = -self.m21 * inv_m11 * inv_m23;
        inverse.m32 = inv_m23;
        inverse.m33 = -self.m22 * inv_m23 * inv_m32;
        *dst = inverse;
    }

    /// Writes the inverse to `dst` assuming this matrix is diagonal apart
    /// from its translation, the shape of an orthographic projection.
    pub fn invert_orthographic_into(&self, dst: &mut Self) {
        let inv_m00 = self.m00.recip();
        let inv_m11 = self.m11.recip();
        let inv_m22 = self.m22.recip();
        let mut inverse = Self::identity();
        inverse.m00 = inv_m00;
        inverse.m11 = inv_m11;
        inverse.m22 = inv_m22;
        inverse.m30 = -self.m30 * inv_m00;
        inverse.m31 = -self.m31 * inv_m11;
        inverse.m32 = -self.m32 * inv_m22;
        inverse.properties = Matrix4Properties::AFFINE
            | self
                .properties
                .intersection(Matrix4Properties::ORTHONORMAL);
        *dst = inverse;
    }

    /// Writes the inverse of `self * view` to `dst`, assuming this matrix is
    /// a symmetric perspective projection and `view` is orthonormal.
    pub fn invert_perspective_view_into(&self, view: &Self, dst: &mut Self) {
        let a = (self.m00 * self.m11).recip();
        let l = -(self.m23 * self.m32).recip();
        let pm00 = self.m11 * a;
        let pm11 = self.m00 * a;
        let pm23 = -self.m23 * l;
        let pm32 = -self.m32 * l;
        let pm33 = self.m22 * l;
        let vm30 = -(view.m00 * view.m30 + view.m01 * view.m31 + view.m02 * view.m32);
        let vm31 = -(view.m10 * view.m30 + view.m11 * view.m31 + view.m12 * view.m32);
        let vm32 = -(view.m20 * view.m30 + view.m21 * view.m31 + view.m22 * view.m32);
        *dst = Self {
            m00: view.m00 * pm00,
            m01: view.m10 * pm00,
            m02: view.m20 * pm00,
            m03: F::ZERO,
            m10: view.m01 * pm11,
            m11: view.m11 * pm11,
            m12: view.m21 * pm11,
            m13: F::ZERO,
            m20: vm30 * pm23,
            m21: vm31 * pm23,
            m22: vm32 * pm23,
            m23: pm23,
            m30: view.m02 * pm32 + vm30 * pm33,
            m31: view.m12 * pm32 + vm31 * pm33,
            m32: view.m22 * pm32 + vm32 * pm33,
            m33: pm33,
            properties: Matrix4Properties::empty(),
        };
    }

    /// Projects the given position to window coordinates, where the
    /// viewport is `[x, y, width, height]`. The depth is mapped to `[0, 1]`.
    pub fn project(&self, position: &Vector3<F>, viewport: &[F; 4]) -> Vector3<F> {
        let ndc = self.transform_project(position);
        Vector3::new(
            (ndc.x() * F::ONE_HALF + F::ONE_HALF) * viewport[2] + viewport[0],
            (ndc.y() * F::ONE_HALF + F::ONE_HALF) * viewport[3] + viewport[1],
            (F::ONE + ndc.z()) * F::ONE_HALF,
        )
    }

    /// Maps the given window coordinates back to the position they were
    /// projected from, inverting [`Self::project`].
    pub fn unproject(&self, window: &Vector3<F>, viewport: &[F; 4]) -> Vector3<F> {
        let ndc = Vector4::new(
            (window.x() - viewport[0]) / viewport[2] * F::TWO - F::ONE,
            (window.y() - viewport[1]) / viewport[3] * F::TWO - F::ONE,
            window.z() + window.z() - F::ONE,
            F::ONE,
        );
        self.inverted().transform(&ndc).perspective_divided()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    type M = Matrix4<f64>;

    const EPSILON: f64 = 1e-9;

    fn reference_inverse(m: &M) -> M {
        let n: nalgebra::Matrix4<f64> = m.into();
        M::from(&n.try_inverse().unwrap())
    }

    #[test]
    fn inverse_perspective_recovers_projected_point() {
        let projection = M::perspective(1.0, 16.0 / 9.0, 0.1, 100.0, false);
        let eye_point = Vector3::new(0.7, -1.2, -12.0);
        let clip = projection.transform(&eye_point.extended(1.0));
        let inverse = projection.invert_perspective();
        let recovered = inverse.transform(&clip).perspective_divided();
        assert_abs_diff_eq!(recovered, eye_point, epsilon = EPSILON);
    }

    #[test]
    fn perspective_is_classified_as_perspective() {
        for zto1 in [false, true] {
            let m = M::perspective(1.2, 1.5, 0.5, 50.0, zto1);
            assert_eq!(m.properties(), Matrix4Properties::perspective());
            assert!(m.properties_hold());
            let mut inferred = m;
            inferred.determine_properties();
            assert_eq!(inferred.properties(), Matrix4Properties::perspective());
        }
    }

    #[test]
    fn perspective_maps_near_and_far_planes_to_depth_range() {
        let near = 0.5;
        let far = 20.0;
        let m = M::perspective(1.0, 1.0, near, far, false);
        assert_abs_diff_eq!(
            m.transform_project(&Vector3::new(0.0, 0.0, -near)).z(),
            -1.0,
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            m.transform_project(&Vector3::new(0.0, 0.0, -far)).z(),
            1.0,
            epsilon = EPSILON
        );

        let m = M::perspective(1.0, 1.0, near, far, true);
        assert_abs_diff_eq!(
            m.transform_project(&Vector3::new(0.0, 0.0, -near)).z(),
            0.0,
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            m.transform_project(&Vector3::new(0.0, 0.0, -far)).z(),
            1.0,
            epsilon = EPSILON
        );
    }

    #[test]
    fn infinite_far_plane_gives_finite_entries() {
        let m = M::perspective(1.0, 1.0, 0.1, f64::INFINITY, false);
        assert!(m.to_cols_array().iter().all(|e| e.is_finite()));
        assert_abs_diff_eq!(
            m.transform_project(&Vector3::new(0.0, 0.0, -0.1)).z(),
            -1.0,
            epsilon = 1e-5
        );
    }

    #[test]
    fn perspective_rect_matches_field_of_view_form() {
        let near = 0.25;
        let fovy = 0.9_f64;
        let aspect = 1.6;
        let height = 2.0 * near * (fovy / 2.0).tan();
        let width = height * aspect;
        assert_abs_diff_eq!(
            M::perspective_rect(width, height, near, 30.0, true),
            M::perspective(fovy, aspect, near, 30.0, true),
            epsilon = EPSILON
        );
    }

    #[test]
    fn centered_frustum_is_perspective_and_off_center_is_not() {
        let centered = M::frustum(-1.0, 1.0, -0.5, 0.5, 1.0, 10.0, false);
        assert_eq!(centered.properties(), Matrix4Properties::perspective());
        assert!(centered.properties_hold());

        let off_center = M::frustum(-1.0, 2.0, -0.5, 0.5, 1.0, 10.0, false);
        assert_eq!(off_center.properties(), Matrix4Properties::empty());
    }

    #[test]
    fn frustum_inverse_matches_reference() {
        let m = M::frustum(-1.0, 2.0, -0.5, 1.5, 1.0, 10.0, true);
        let mut inverse = M::zeros();
        m.invert_frustum_into(&mut inverse);
        assert_abs_diff_eq!(inverse, reference_inverse(&m), epsilon = EPSILON);
        assert!(inverse.properties_hold());
    }

    #[test]
    fn orthographic_maps_box_corners_to_unit_cube() {
        let m = M::orthographic(-2.0, 4.0, -1.0, 3.0, 0.5, 10.0, false);
        assert_eq!(m.properties(), Matrix4Properties::affine());
        assert!(m.properties_hold());
        assert_abs_diff_eq!(
            m.transform_position(&Vector3::new(-2.0, -1.0, -0.5)),
            Vector3::new(-1.0, -1.0, -1.0),
            epsilon = EPSILON
        );
        assert_abs_diff_eq!(
            m.transform_position(&Vector3::new(4.0, 3.0, -10.0)),
            Vector3::new(1.0, 1.0, 1.0),
            epsilon = EPSILON
        );
        assert_eq!(
            M::orthographic_symmetric(6.0, 4.0, 0.5, 10.0, false),
            M::orthographic(-3.0, 3.0, -2.0, 2.0, 0.5, 10.0, false)
        );
    }

    #[test]
    fn orthographic_inverse_matches_reference() {
        let m = M::orthographic(-2.0, 4.0, -1.0, 3.0, 0.5, 10.0, true);
        let mut inverse = M::zeros();
        m.invert_orthographic_into(&mut inverse);
        assert_abs_diff_eq!(inverse, reference_inverse(&m), epsilon = EPSILON);
        assert_eq!(inverse.properties(), Matrix4Properties::affine());
    }

    #[test]
    fn look_at_moves_eye_to_origin_and_center_onto_negative_z() {
        let eye = Vector3::new(3.0, 2.0, 5.0);
        let center = Vector3::new(-1.0, 0.5, 0.0);
        let view = M::look_at_rh(&eye, &center, &Vector3::unit_y());
        assert_eq!(view.properties(), Matrix4Properties::orthonormal());
        assert!(view.properties_hold());
        assert_abs_diff_eq!(view.transform_position(&eye), Vector3::zeros(), epsilon = EPSILON);

        let distance = (center - eye).norm();
        assert_abs_diff_eq!(
            view.transform_position(&center),
            Vector3::new(0.0, 0.0, -distance),
            epsilon = EPSILON
        );
    }

    #[test]
    fn look_along_has_no_translation() {
        let view = M::look_along(&Vector3::new(1.0, 0.0, -1.0), &Vector3::unit_y());
        assert_eq!(view.translation_part(), Vector3::zeros());
        assert_abs_diff_eq!(
            view.transform_direction(&Vector3::new(1.0, 0.0, -1.0).normalized()),
            -Vector3::unit_z(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn composed_view_matches_explicit_product_for_every_kernel() {
        let eye = Vector3::new(1.0, 2.0, 3.0);
        let center = Vector3::zeros();
        let up = Vector3::unit_y();
        let view = M::look_at_rh(&eye, &center, &up);
        let general = M::from_elements(
            2.0, 0.5, -1.0, 0.25, 1.5, 3.0, 0.0, -0.5, -2.0, 1.0, 4.0, 0.75, 0.3, -0.7, 1.1, 2.0,
        );
        for m in [
            M::identity(),
            M::translation(&Vector3::new(0.0, 1.0, 0.0)),
            M::rotation_y(0.3),
            M::perspective(1.0, 1.5, 0.1, 10.0, false),
            general,
        ] {
            let mut composed = m;
            composed.look_at(&eye, &center, &up);
            assert_abs_diff_eq!(composed, m * view, epsilon = EPSILON);
            assert!(composed.properties_hold());

            let mut along = m;
            along.look_along_mul(&(center - eye), &up);
            assert_abs_diff_eq!(
                along,
                m * M::look_along(&(center - eye), &up),
                epsilon = EPSILON
            );
        }
    }

    #[test]
    fn composed_projections_match_explicit_products() {
        let view = M::look_at_rh(
            &Vector3::new(1.0, 2.0, 3.0),
            &Vector3::zeros(),
            &Vector3::unit_y(),
        );
        for m in [M::identity(), view] {
            let mut composed = m;
            composed.perspective_mul(1.0, 1.5, 0.1, 10.0, true);
            assert_abs_diff_eq!(
                composed,
                m * M::perspective(1.0, 1.5, 0.1, 10.0, true),
                epsilon = EPSILON
            );
            assert!(composed.properties_hold());

            let mut composed = m;
            composed.frustum_mul(-1.0, 2.0, -0.5, 1.5, 1.0, 10.0, false);
            assert_abs_diff_eq!(
                composed,
                m * M::frustum(-1.0, 2.0, -0.5, 1.5, 1.0, 10.0, false),
                epsilon = EPSILON
            );

            let mut composed = m;
            composed.orthographic_mul(-2.0, 4.0, -1.0, 3.0, 0.5, 10.0, false);
            assert_abs_diff_eq!(
                composed,
                m * M::orthographic(-2.0, 4.0, -1.0, 3.0, 0.5, 10.0, false),
                epsilon = EPSILON
            );
            assert!(composed.properties().is_affine());
            assert!(composed.properties_hold());
        }
    }

    #[test]
    fn inverse_of_projection_view_matches_reference() {
        let projection = M::perspective(0.8, 1.3, 0.2, 50.0, false);
        let view = M::look_at_rh(
            &Vector3::new(-2.0, 1.0, 4.0),
            &Vector3::new(0.5, 0.0, -1.0),
            &Vector3::unit_y(),
        );
        let mut inverse = M::zeros();
        projection.invert_perspective_view_into(&view, &mut inverse);
        assert_abs_diff_eq!(
            inverse,
            reference_inverse(&(projection * view)),
            epsilon = 1e-7
        );
    }

    #[test]
    fn unproject_inverts_project() {
        let viewport = [10.0, 20.0, 800.0, 600.0];
        let m = M::perspective(1.0, 800.0 / 600.0, 0.1, 100.0, false)
            * M::look_at_rh(
                &Vector3::new(0.0, 1.0, 5.0),
                &Vector3::zeros(),
                &Vector3::unit_y(),
            );
        let position = Vector3::new(0.3, -0.4, 1.0);
        let window = m.project(&position, &viewport);
        assert!(window.x() > 10.0 && window.x() < 810.0);
        assert!(window.z() > 0.0 && window.z() < 1.0);
        assert_abs_diff_eq!(m.unproject(&window, &viewport), position, epsilon = 1e-6);
    }

    prop_compose! {
        fn perspective_strategy()(
            fovy in 0.2..2.5_f64,
            aspect in 0.5..3.0_f64,
            near in 0.01..1.0_f64,
            depth in 1.5..1000.0_f64,
            z_zero_to_one in any::<bool>(),
        ) -> M {
            M::perspective(fovy, aspect, near, near * depth, z_zero_to_one)
        }
    }

    proptest! {
        #[test]
        fn perspective_times_inverse_is_identity(m in perspective_strategy()) {
            let mut inverse = M::zeros();
            m.invert_perspective_into(&mut inverse);
            prop_assert!(approx::abs_diff_eq!(m * inverse, M::identity(), epsilon = 1e-6));
        }
    }
}
