use nalgebra::{Matrix3, SVD};
use serde::{Deserialize, Serialize};

use crate::angle::Angle;
use crate::coord::Coord;
use crate::error::GeometryError;

/// Default tolerance (`τ₁`) used when checking that a matrix is orthogonal
/// with determinant +1.
pub const DEFAULT_TOLERANCE_FOR_ROTATION_CLOSENESS_CHECKS: f64 = 1e-5;

/// A proper orthogonal (rotation) matrix: `RᵀR = I`, `det(R) = +1`, within a
/// tolerance checked at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    /// Row-major 3x3 matrix.
    rows: [[f64; 3]; 3],
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Construct from 9 doubles in row-major order, validating orthogonality
    /// and `det = +1` within [`DEFAULT_TOLERANCE_FOR_ROTATION_CLOSENESS_CHECKS`].
    #[allow(clippy::too_many_arguments)]
    pub fn try_new(
        r00: f64, r01: f64, r02: f64,
        r10: f64, r11: f64, r12: f64,
        r20: f64, r21: f64, r22: f64,
    ) -> Result<Self, GeometryError> {
        Self::try_new_with_tolerance(
            r00, r01, r02, r10, r11, r12, r20, r21, r22,
            DEFAULT_TOLERANCE_FOR_ROTATION_CLOSENESS_CHECKS,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn try_new_with_tolerance(
        r00: f64, r01: f64, r02: f64,
        r10: f64, r11: f64, r12: f64,
        r20: f64, r21: f64, r22: f64,
        tolerance: f64,
    ) -> Result<Self, GeometryError> {
        let m = Matrix3::new(r00, r01, r02, r10, r11, r12, r20, r21, r22);
        check_proper_orthogonal(&m, tolerance)?;
        Ok(Self { rows: matrix_to_rows(&m) })
    }

    fn from_matrix_unchecked(m: Matrix3<f64>) -> Self {
        Self { rows: matrix_to_rows(&m) }
    }

    pub fn rows(&self) -> [[f64; 3]; 3] {
        self.rows
    }

    fn to_matrix(self) -> Matrix3<f64> {
        Matrix3::from_row_slice(&[
            self.rows[0][0], self.rows[0][1], self.rows[0][2],
            self.rows[1][0], self.rows[1][1], self.rows[1][2],
            self.rows[2][0], self.rows[2][1], self.rows[2][2],
        ])
    }

    /// Apply this rotation to `coord`.
    pub fn rotate(&self, coord: &Coord) -> Coord {
        let v = self.to_matrix() * nalgebra::Vector3::new(coord.x(), coord.y(), coord.z());
        // A valid Rotation applied to a finite Coord cannot produce a NaN.
        Coord::try_new(v.x, v.y, v.z).expect("rotating a finite coord by a valid rotation cannot yield NaN")
    }

    /// The transpose (== inverse, since `R` is orthogonal).
    pub fn transpose(&self) -> Rotation {
        Rotation::from_matrix_unchecked(self.to_matrix().transpose())
    }

    pub fn compose(&self, other: &Rotation) -> Rotation {
        Rotation::from_matrix_unchecked(self.to_matrix() * other.to_matrix())
    }

    /// Find the nearest proper orthogonal matrix to a (possibly slightly
    /// off) 3x3 matrix via SVD, failing if the nearest is farther than
    /// `tolerance` (Frobenius norm of the difference).
    #[allow(clippy::too_many_arguments)]
    pub fn tidy(
        r00: f64, r01: f64, r02: f64,
        r10: f64, r11: f64, r12: f64,
        r20: f64, r21: f64, r22: f64,
        tolerance: f64,
    ) -> Result<Self, GeometryError> {
        let m = Matrix3::new(r00, r01, r02, r10, r11, r12, r20, r21, r22);
        let tidied = nearest_proper_orthogonal(&m)?;
        let diff_norm = (tidied - m).norm();
        if diff_norm > tolerance {
            return Err(GeometryError::InvalidArgument(format!(
                "nearest proper orthogonal matrix is {diff_norm} away, farther than tolerance {tolerance}"
            )));
        }
        Ok(Self::from_matrix_unchecked(tidied))
    }

    /// Return an equivalent rotation snapped exactly onto its nearest
    /// proper-orthogonal representative (a no-op for already-tidy input,
    /// up to floating point round-trip).
    pub fn tidy_copy(&self) -> Rotation {
        let tidied = nearest_proper_orthogonal(&self.to_matrix())
            .expect("a valid Rotation is already within tidying distance of a proper orthogonal matrix");
        Rotation::from_matrix_unchecked(tidied)
    }

    /// The rotation angle, in `[0, 0.5]` revolutions (the angle of the
    /// equivalent axis-angle representation).
    pub fn angle_of_rotation(&self) -> Angle {
        let trace = self.rows[0][0] + self.rows[1][1] + self.rows[2][2];
        let cos_theta = ((trace - 1.0) / 2.0).clamp(-1.0, 1.0);
        Angle::from_radians(cos_theta.acos())
    }

    pub fn angle_between(&self, other: &Rotation) -> Angle {
        let relative = self.transpose().compose(other);
        relative.angle_of_rotation()
    }
}

fn matrix_to_rows(m: &Matrix3<f64>) -> [[f64; 3]; 3] {
    [
        [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
        [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
        [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
    ]
}

fn check_proper_orthogonal(m: &Matrix3<f64>, tolerance: f64) -> Result<(), GeometryError> {
    let should_be_identity = m.transpose() * m;
    let identity_err = (should_be_identity - Matrix3::identity()).norm();
    if identity_err > tolerance {
        return Err(GeometryError::InvalidArgument(format!(
            "matrix is not orthogonal within tolerance {tolerance} (|RᵀR - I| = {identity_err})"
        )));
    }
    let det = m.determinant();
    if (det - 1.0).abs() > tolerance {
        return Err(GeometryError::InvalidArgument(format!(
            "matrix determinant {det} is not +1 within tolerance {tolerance}"
        )));
    }
    Ok(())
}

/// Nearest proper orthogonal matrix to `m`, via SVD: `m = U S Vᵀ`, nearest
/// orthogonal is `U Vᵀ`; if that has `det = -1`, negate the column of `U`
/// corresponding to the smallest singular value to flip it back to +1.
fn nearest_proper_orthogonal(m: &Matrix3<f64>) -> Result<Matrix3<f64>, GeometryError> {
    let svd = SVD::new(*m, true, true);
    let u = svd.u.ok_or_else(|| GeometryError::Numerical("SVD failed to produce U".to_string()))?;
    let v_t = svd.v_t.ok_or_else(|| GeometryError::Numerical("SVD failed to produce Vᵀ".to_string()))?;

    let mut candidate = u * v_t;
    if candidate.determinant() < 0.0 {
        let smallest_idx = smallest_singular_value_index(&svd.singular_values);
        let mut u_fixed = u;
        for row in 0..3 {
            u_fixed[(row, smallest_idx)] = -u_fixed[(row, smallest_idx)];
        }
        candidate = u_fixed * v_t;
    }
    Ok(candidate)
}

fn smallest_singular_value_index(singular_values: &nalgebra::Vector3<f64>) -> usize {
    let mut idx = 0;
    let mut smallest = singular_values[0];
    for i in 1..3 {
        if singular_values[i] < smallest {
            smallest = singular_values[i];
            idx = i;
        }
    }
    idx
}

/// Kabsch algorithm: the rotation that best superposes `a` onto `b`.
///
/// Preconditions: `a.len() == b.len()`; both point sets are already
/// centred on the origin by the caller (this function does not re-centre).
pub fn fit_first_onto_second(a: &[Coord], b: &[Coord]) -> Result<Rotation, GeometryError> {
    if a.len() != b.len() {
        return Err(GeometryError::InvalidArgument(format!(
            "point sets have different lengths: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    if a.len() < 3 {
        return Err(GeometryError::InvalidArgument(
            "Kabsch fitting requires at least 3 points".to_string(),
        ));
    }

    // Cross-covariance H = sum a_i b_i^T
    let mut h = Matrix3::<f64>::zeros();
    for (pa, pb) in a.iter().zip(b.iter()) {
        let va = nalgebra::Vector3::new(pa.x(), pa.y(), pa.z());
        let vb = nalgebra::Vector3::new(pb.x(), pb.y(), pb.z());
        h += va * vb.transpose();
    }

    let svd = SVD::new(h, true, true);
    let u = svd.u.ok_or_else(|| GeometryError::Numerical("Kabsch SVD failed to produce U".to_string()))?;
    let v_t = svd.v_t.ok_or_else(|| GeometryError::Numerical("Kabsch SVD failed to produce Vᵀ".to_string()))?;
    let v = v_t.transpose();

    let d = (v * u.transpose()).determinant().signum();
    let d = if d == 0.0 { 1.0 } else { d };

    let correction = Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, d);
    let r = v * correction * u.transpose();

    Rotation::try_new_with_tolerance(
        r[(0, 0)], r[(0, 1)], r[(0, 2)],
        r[(1, 0)], r[(1, 1)], r[(1, 2)],
        r[(2, 0)], r[(2, 1)], r[(2, 2)],
        1e-3,
    )
    .map_err(|e| GeometryError::Numerical(format!("Kabsch result failed orthogonality check: {e}")))
}

/// Deterministic basis change: the returned rotation sends `a` parallel to
/// `+X`, and sends `b` into the X-Y plane (with `z >= 0` for the rotated `b`
/// unless `a` and `b` are collinear, in which case a deterministic
/// tiebreaker axis is used in place of `b`).
pub fn rotation_to_x_axis_and_xy_plane(a: &Coord, b: &Coord) -> Result<Rotation, GeometryError> {
    let x_axis = a.normalise().map_err(|_| {
        GeometryError::InvalidArgument("rotation_to_x_axis_and_xy_plane: `a` must be non-zero".to_string())
    })?;

    let raw_cross = x_axis.cross(b);
    let z_axis = match raw_cross.normalise() {
        Ok(z) => z,
        Err(_) => {
            // a, b collinear (or b is zero): pick a deterministic axis
            // orthogonal to x_axis as a tiebreaker.
            let tiebreaker = deterministic_orthogonal_tiebreaker(&x_axis);
            x_axis
                .cross(&tiebreaker)
                .normalise()
                .map_err(|_| GeometryError::Numerical("failed to find tiebreaker axis".to_string()))?
        }
    };
    let y_axis = z_axis.cross(&x_axis);

    Rotation::try_new(
        x_axis.x(), x_axis.y(), x_axis.z(),
        y_axis.x(), y_axis.y(), y_axis.z(),
        z_axis.x(), z_axis.y(), z_axis.z(),
    )
}

/// A unit vector orthogonal to `axis`, chosen deterministically: project out
/// `axis` from the canonical basis vector least parallel to it.
fn deterministic_orthogonal_tiebreaker(axis: &Coord) -> Coord {
    let candidates = [
        Coord::try_new(1.0, 0.0, 0.0).unwrap(),
        Coord::try_new(0.0, 1.0, 0.0).unwrap(),
        Coord::try_new(0.0, 0.0, 1.0).unwrap(),
    ];
    let least_parallel = candidates
        .iter()
        .min_by(|p, q| axis.dot(p).abs().partial_cmp(&axis.dot(q).abs()).unwrap())
        .unwrap();
    let projected = *least_parallel - axis.scale(axis.dot(least_parallel));
    projected.normalise().unwrap_or(*least_parallel)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn c(x: f64, y: f64, z: f64) -> Coord {
        Coord::try_new(x, y, z).unwrap()
    }

    #[test]
    fn identity_is_valid_rotation() {
        assert_eq!(Rotation::IDENTITY.rotate(&c(1.0, 2.0, 3.0)), c(1.0, 2.0, 3.0));
    }

    #[test]
    fn rejects_non_orthogonal() {
        assert!(Rotation::try_new(2.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn rejects_reflection() {
        // det = -1 reflection, orthogonal but improper.
        assert!(Rotation::try_new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0).is_err());
    }

    /// Scenario 1: three collinear points, Kabsch identity.
    #[test]
    fn kabsch_collinear_points_gives_identity() {
        let a = vec![c(0.0, 0.0, 0.0), c(1.0, 0.0, 0.0), c(2.0, 0.0, 0.0)];
        let b = a.clone();
        let r = fit_first_onto_second(&a, &b).unwrap();
        for row in 0..3 {
            for col in 0..3 {
                let expected = if row == col { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(r.rows()[row][col], expected, epsilon = 1e-5);
            }
        }
    }

    /// Scenario 2: Kabsch 90 degree X->Y rotation.
    #[test]
    fn kabsch_recovers_known_rotation() {
        let a = vec![c(0.0, 0.0, 0.0), c(1.0, 0.0, 0.0), c(0.0, 1.0, 0.0)];
        let b = vec![c(0.0, 0.0, 0.0), c(0.0, 1.0, 0.0), c(-1.0, 0.0, 0.0)];
        let r = fit_first_onto_second(&a, &b).unwrap();
        let rotated_x = r.rotate(&c(1.0, 0.0, 0.0));
        let rotated_y = r.rotate(&c(0.0, 1.0, 0.0));
        assert_abs_diff_eq!(rotated_x.distance(&c(0.0, 1.0, 0.0)), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(rotated_y.distance(&c(-1.0, 0.0, 0.0)), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn kabsch_rejects_mismatched_lengths() {
        let a = vec![c(0.0, 0.0, 0.0), c(1.0, 0.0, 0.0), c(0.0, 1.0, 0.0)];
        let b = vec![c(0.0, 0.0, 0.0), c(1.0, 0.0, 0.0)];
        assert!(fit_first_onto_second(&a, &b).is_err());
    }

    #[test]
    fn kabsch_optimality_on_random_rotation() {
        // A small fixed "random" rotation (30deg about an arbitrary axis),
        // built via two basis changes so it's guaranteed to be a valid rotation.
        let r_known = rotation_to_x_axis_and_xy_plane(&c(1.0, 1.0, 0.0), &c(0.0, 1.0, 1.0)).unwrap();
        let pts = vec![
            c(0.3, 1.2, -0.4),
            c(-0.8, 0.1, 0.9),
            c(1.5, -0.3, 0.2),
            c(0.0, 0.7, -1.1),
        ];
        let rotated: Vec<Coord> = pts.iter().map(|p| r_known.rotate(p)).collect();
        let recovered = fit_first_onto_second(&pts, &rotated).unwrap();
        for row in 0..3 {
            for col in 0..3 {
                assert_abs_diff_eq!(recovered.rows()[row][col], r_known.rows()[row][col], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn rotation_to_x_axis_and_xy_plane_places_a_on_x_and_b_in_plane() {
        let a = c(3.0, 7.0, 9.0);
        let b = c(8.0, 5.0, 1.0);
        let r = rotation_to_x_axis_and_xy_plane(&a, &b).unwrap();
        let rotated_a = r.rotate(&a);
        let rotated_b = r.rotate(&b);

        assert_abs_diff_eq!(a.length(), rotated_a.length(), epsilon = 1e-9);
        assert_abs_diff_eq!(a.length(), rotated_a.x(), epsilon = 1e-6);
        assert_abs_diff_eq!(rotated_a.y(), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(rotated_a.z(), 0.0, epsilon = 1e-6);

        assert_abs_diff_eq!(b.length(), rotated_b.length(), epsilon = 1e-9);
        assert_abs_diff_eq!(rotated_b.z(), 0.0, epsilon = DEFAULT_TOLERANCE_FOR_ROTATION_CLOSENESS_CHECKS);
    }

    #[test]
    fn rotation_to_x_axis_handles_collinear_inputs() {
        let a = c(1.0, 0.0, 0.0);
        let b = c(2.0, 0.0, 0.0);
        let r = rotation_to_x_axis_and_xy_plane(&a, &b).unwrap();
        let rotated_a = r.rotate(&a);
        assert_abs_diff_eq!(rotated_a.y(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(rotated_a.z(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn tidy_rotation_succeeds_when_within_tolerance() {
        let r = Rotation::tidy(
            0.0631, -0.9000, -0.4312,
            0.9437, 0.1944, -0.2676,
            0.3247, -0.3901, 0.8616,
            0.0001,
        );
        assert!(r.is_ok());
    }

    #[test]
    fn tidy_rotation_fails_when_tolerance_too_strict() {
        let r = Rotation::tidy(
            0.0631, -0.9000, -0.4312,
            0.9437, 0.1944, -0.2676,
            0.3247, -0.3901, 0.8616,
            0.000001,
        );
        assert!(r.is_err());
    }

    #[test]
    fn angle_of_identity_is_zero() {
        assert_eq!(Rotation::IDENTITY.angle_of_rotation(), Angle::ZERO);
    }

    #[test]
    fn angle_between_identical_rotations_is_zero() {
        let r = rotation_to_x_axis_and_xy_plane(&c(1.0, 2.0, 3.0), &c(-1.0, 0.5, 2.0)).unwrap();
        assert_abs_diff_eq!(r.angle_between(&r).revolutions(), 0.0, epsilon = 1e-9);
    }
}
