use std::f64::consts::PI;
use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// An angle stored as a fraction of a full revolution (`0.0 <= revolutions < 1.0`
/// is the canonical range used for phi/psi storage, but arithmetic is not
/// clamped so that differences can be taken before normalising).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Angle {
    revolutions: f64,
}

impl Angle {
    pub const ZERO: Angle = Angle { revolutions: 0.0 };
    pub const ONE_REVOLUTION: Angle = Angle { revolutions: 1.0 };

    pub fn from_revolutions(revolutions: f64) -> Self {
        Self { revolutions }
    }

    pub fn from_radians(radians: f64) -> Self {
        Self { revolutions: radians / (2.0 * PI) }
    }

    pub fn from_degrees(degrees: f64) -> Self {
        Self { revolutions: degrees / 360.0 }
    }

    pub fn revolutions(&self) -> f64 { self.revolutions }
    pub fn radians(&self) -> f64 { self.revolutions * 2.0 * PI }
    pub fn degrees(&self) -> f64 { self.revolutions * 360.0 }

    /// Normalise into `[0, 1)` revolutions, the canonical phi/psi storage range.
    pub fn normalised(&self) -> Angle {
        let mut r = self.revolutions.rem_euclid(1.0);
        if r < 0.0 {
            r += 1.0;
        }
        Angle { revolutions: r }
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle { revolutions: self.revolutions + rhs.revolutions }
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle { revolutions: self.revolutions - rhs.revolutions }
    }
}

impl Display for Angle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}rev", self.revolutions)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn conversions_round_trip() {
        let a = Angle::from_degrees(90.0);
        assert_abs_diff_eq!(a.revolutions(), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(a.radians(), PI / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn normalised_wraps_negative_and_over_one() {
        assert_abs_diff_eq!(Angle::from_revolutions(-0.25).normalised().revolutions(), 0.75, epsilon = 1e-12);
        assert_abs_diff_eq!(Angle::from_revolutions(1.25).normalised().revolutions(), 0.25, epsilon = 1e-12);
    }
}
