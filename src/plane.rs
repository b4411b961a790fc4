//! Representation of planes.

use crate::{matrix4::Matrix4, num::Float, vector::Vector3};

/// A plane in 3D given by the coefficients of its equation
/// `a*x + b*y + c*z + d = 0`.
///
/// The normal `(a, b, c)` need not have unit length. When it does, `d` is
/// the displacement `-n.dot(p)` for any point `p` in the plane, and
/// [`Self::signed_distance`] gives true distances.
///
/// The positive halfspace is the one the normal points into.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "[F; 4]", from = "[F; 4]")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane<F> {
    a: F,
    b: F,
    c: F,
    d: F,
}

impl<F: Float> Plane<F> {
    /// Creates the plane with the given equation coefficients.
    #[inline]
    pub const fn new(a: F, b: F, c: F, d: F) -> Self {
        Self { a, b, c, d }
    }

    /// Creates the plane through the given point with the given normal.
    pub fn from_point_normal(point_in_plane: &Vector3<F>, normal: &Vector3<F>) -> Self {
        Self::new(
            normal.x(),
            normal.y(),
            normal.z(),
            -normal.dot(point_in_plane),
        )
    }

    /// Creates the plane through the three given points, with the normal
    /// facing the side from which they appear counter-clockwise.
    pub fn from_points(p0: &Vector3<F>, p1: &Vector3<F>, p2: &Vector3<F>) -> Self {
        let normal = (p1 - p0).cross(&(p2 - p0)).normalized();
        Self::from_point_normal(p0, &normal)
    }

    #[inline]
    pub const fn a(&self) -> F {
        self.a
    }

    #[inline]
    pub const fn b(&self) -> F {
        self.b
    }

    #[inline]
    pub const fn c(&self) -> F {
        self.c
    }

    #[inline]
    pub const fn d(&self) -> F {
        self.d
    }

    /// The (not necessarily unit) normal `(a, b, c)`.
    #[inline]
    pub const fn normal(&self) -> Vector3<F> {
        Vector3::new(self.a, self.b, self.c)
    }

    /// Scales the coefficients so that the normal has unit length.
    pub fn normalized(&self) -> Self {
        let inv_norm = self.normal().norm().recip();
        Self::new(
            self.a * inv_norm,
            self.b * inv_norm,
            self.c * inv_norm,
            self.d * inv_norm,
        )
    }

    /// Evaluates the plane equation at the given point. This is the signed
    /// distance if the normal has unit length.
    pub fn signed_distance(&self, point: &Vector3<F>) -> F {
        self.normal().dot(point) + self.d
    }

    /// Whether the given point is strictly in the positive halfspace.
    pub fn point_lies_in_positive_halfspace(&self, point: &Vector3<F>) -> bool {
        self.signed_distance(point) > F::ZERO
    }

    /// Whether the given point is strictly in the negative halfspace.
    pub fn point_lies_in_negative_halfspace(&self, point: &Vector3<F>) -> bool {
        self.signed_distance(point) < F::ZERO
    }

    /// Computes the image of this plane under the given invertible
    /// transform, by applying the inverse transpose to the coefficients.
    pub fn transformed(&self, transform: &Matrix4<F>) -> Self {
        let inv = transform.inverted();
        let (a, b, c, d) = (self.a, self.b, self.c, self.d);
        Self::new(
            inv.m00() * a + inv.m01() * b + inv.m02() * c + inv.m03() * d,
            inv.m10() * a + inv.m11() * b + inv.m12() * c + inv.m13() * d,
            inv.m20() * a + inv.m21() * b + inv.m22() * c + inv.m23() * d,
            inv.m30() * a + inv.m31() * b + inv.m32() * c + inv.m33() * d,
        )
    }
}

impl<F> From<[F; 4]> for Plane<F> {
    fn from([a, b, c, d]: [F; 4]) -> Self {
        Self { a, b, c, d }
    }
}

impl<F> From<Plane<F>> for [F; 4] {
    fn from(plane: Plane<F>) -> Self {
        [plane.a, plane.b, plane.c, plane.d]
    }
}

impl_abs_diff_eq!(Plane<F>, |p, q, epsilon| {
    p.a.abs_diff_eq(&q.a, epsilon)
        && p.b.abs_diff_eq(&q.b, epsilon)
        && p.c.abs_diff_eq(&q.c, epsilon)
        && p.d.abs_diff_eq(&q.d, epsilon)
});

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    type P = Plane<f64>;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn creating_plane_through_origin_gives_zero_displacement() {
        let plane = P::from_point_normal(&Vector3::zeros(), &Vector3::new(1.2, -0.1, 2.7));
        assert_eq!(plane.d(), 0.0);
    }

    #[test]
    fn signed_distance_is_correct() {
        let plane = P::from_point_normal(&Vector3::new(1.0, 2.0, 0.0), &Vector3::unit_y());
        assert_abs_diff_eq!(
            plane.signed_distance(&Vector3::new(-1.2, 0.0, 42.4)),
            -2.0,
            epsilon = EPSILON
        );
        assert!(plane.point_lies_in_negative_halfspace(&Vector3::zeros()));
        assert!(plane.point_lies_in_positive_halfspace(&Vector3::new(0.0, 10.0, 0.0)));

        let plane = P::new(1.0, 0.0, 1.0, 0.0).normalized();
        assert_abs_diff_eq!(
            plane.signed_distance(&Vector3::new(8.0, 0.0, 8.0)),
            std::f64::consts::SQRT_2 * 8.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn plane_through_points_contains_them() {
        let points = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ];
        let plane = P::from_points(&points[0], &points[1], &points[2]);
        for p in &points {
            assert_abs_diff_eq!(plane.signed_distance(p), 0.0, epsilon = EPSILON);
        }
        assert!(plane.point_lies_in_positive_halfspace(&Vector3::same(1.0)));
    }

    #[test]
    fn transformed_plane_contains_transformed_points() {
        let plane = P::from_point_normal(&Vector3::new(0.0, 0.0, 2.0), &Vector3::unit_z());
        let mut m = Matrix4::rotation_x(0.6);
        m.scale(&Vector3::new(2.0, 1.0, 0.5))
            .translate(&Vector3::new(1.0, -1.0, 3.0));
        let image = plane.transformed(&m);
        for p in [
            Vector3::new(0.0, 0.0, 2.0),
            Vector3::new(5.0, -3.0, 2.0),
            Vector3::new(-1.0, 4.0, 2.0),
        ] {
            assert_abs_diff_eq!(
                image.signed_distance(&m.transform_position(&p)),
                0.0,
                epsilon = 1e-10
            );
        }
    }
}
