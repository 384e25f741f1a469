//! Numeric helpers shared by every color space in this crate.
//!
//! All functions here are total: they never panic and never return errors.
//! [`Matrix3::inverse`] is the one exception in spirit, returning `None` for a
//! singular matrix instead of producing infinities.

/// Converts an angle in degrees to radians.
#[inline]
pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Converts an angle in radians to degrees.
#[inline]
pub fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

#[inline]
pub fn square(x: f64) -> f64 {
    x * x
}

/// Wraps a hue angle in degrees into `[0, 360)`.
///
/// `-0.0` and values that round up to `360.0` both map to `0.0`.
#[inline]
pub fn normalize_hue(degrees: f64) -> f64 {
    let h = degrees.rem_euclid(360.0);
    if h >= 360.0 || h == 0.0 {
        0.0
    } else {
        h
    }
}

/// Smallest absolute difference between two hue angles, in degrees (`0..=180`).
pub fn hue_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}

/// Multiplies each component of a 3-vector by `factor`.
#[inline]
pub fn scale3(v: [f64; 3], factor: f64) -> [f64; 3] {
    [v[0] * factor, v[1] * factor, v[2] * factor]
}

/// Divides each component of a 3-vector by `divisor`.
#[inline]
pub fn div3(v: [f64; 3], divisor: f64) -> [f64; 3] {
    [v[0] / divisor, v[1] / divisor, v[2] / divisor]
}

/// A row-major 3×3 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3(pub [[f64; 3]; 3]);

impl Matrix3 {
    pub const IDENTITY: Matrix3 = Matrix3([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);

    /// Builds a diagonal matrix.
    pub fn diagonal(d: [f64; 3]) -> Self {
        Matrix3([[d[0], 0.0, 0.0], [0.0, d[1], 0.0], [0.0, 0.0, d[2]]])
    }

    /// Computes `self · v`.
    #[inline]
    pub fn mul_vec(&self, v: [f64; 3]) -> [f64; 3] {
        let m = &self.0;
        [
            m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
            m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
            m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
        ]
    }

    /// Computes `self · other`.
    pub fn mul(&self, other: &Matrix3) -> Matrix3 {
        let a = &self.0;
        let b = &other.0;
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
            }
        }
        Matrix3(out)
    }

    pub fn determinant(&self) -> f64 {
        let m = &self.0;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Returns the inverse matrix, or `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Matrix3> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(self.inverse_unchecked())
    }

    /// Inverse by adjugate, for constant matrices known to be invertible.
    pub fn inverse_unchecked(&self) -> Matrix3 {
        let m = &self.0;
        let inv_det = 1.0 / self.determinant();
        Matrix3([
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
            ],
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degrees_radians_roundtrip() {
        for deg in [0.0, 45.0, 90.0, 180.0, 270.0, 359.5] {
            assert!((to_degrees(to_radians(deg)) - deg).abs() < 1e-12);
        }
        assert!((to_radians(180.0) - std::f64::consts::PI).abs() < 1e-15);
    }

    #[test]
    fn normalize_hue_wraps_into_range() {
        assert_eq!(normalize_hue(0.0), 0.0);
        assert_eq!(normalize_hue(-0.0), 0.0);
        assert_eq!(normalize_hue(360.0), 0.0);
        assert!((normalize_hue(-90.0) - 270.0).abs() < 1e-12);
        assert!((normalize_hue(725.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn hue_distance_takes_short_way_round() {
        assert!((hue_distance(350.0, 10.0) - 20.0).abs() < 1e-12);
        assert!((hue_distance(10.0, 350.0) - 20.0).abs() < 1e-12);
        assert!((hue_distance(90.0, 270.0) - 180.0).abs() < 1e-12);
        assert_eq!(hue_distance(42.0, 42.0), 0.0);
    }

    #[test]
    fn scale_and_divide_are_inverse() {
        let v = [0.25, 1.0, 4.0];
        assert_eq!(div3(scale3(v, 8.0), 8.0), v);
    }

    #[test]
    fn inverse_of_identity_is_identity() {
        assert_eq!(Matrix3::IDENTITY.inverse(), Some(Matrix3::IDENTITY));
    }

    #[test]
    fn inverse_times_matrix_is_identity() {
        let m = Matrix3([[0.7328, 0.4296, -0.1624], [-0.7036, 1.6975, 0.0061], [0.0030, 0.0136, 0.9834]]);
        let product = m.mul(&m.inverse().unwrap());
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((product.0[i][j] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        let m = Matrix3([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 0.0, 1.0]]);
        assert_eq!(m.inverse(), None);
    }
}
