use std::fmt::{self, Display, Formatter};
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// An immutable 3-vector of finite doubles.
///
/// Every public construction path rejects NaNs; arithmetic operators are
/// implemented directly on the (already-validated) value since they cannot
/// themselves introduce a NaN from finite inputs, except via overflow to
/// infinity, which downstream consumers are expected to guard against with
/// [`Coord::is_finite`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    x: f64,
    y: f64,
    z: f64,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0.0, y: 0.0, z: 0.0 };

    /// Build a coord, rejecting NaN components.
    pub fn try_new(x: f64, y: f64, z: f64) -> Result<Self, GeometryError> {
        if x.is_nan() || y.is_nan() || z.is_nan() {
            return Err(GeometryError::InvalidArgument(
                "Coord components must not be NaN".to_string(),
            ));
        }
        Ok(Self { x, y, z })
    }

    pub fn x(&self) -> f64 { self.x }
    pub fn y(&self) -> f64 { self.y }
    pub fn z(&self) -> f64 { self.z }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn dot(&self, other: &Coord) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Coord) -> Coord {
        Coord {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn scale(&self, factor: f64) -> Coord {
        Coord { x: self.x * factor, y: self.y * factor, z: self.z * factor }
    }

    pub fn distance(&self, other: &Coord) -> f64 {
        (*self - *other).length()
    }

    /// Normalise to unit length; fails if the coord is (numerically) the zero vector.
    pub fn normalise(&self) -> Result<Coord, GeometryError> {
        let len = self.length();
        if len <= f64::EPSILON {
            return Err(GeometryError::Numerical(
                "cannot normalise a coord of (near-)zero length".to_string(),
            ));
        }
        Ok(self.scale(1.0 / len))
    }

    /// Centroid of a non-empty slice of coords.
    pub fn centroid(coords: &[Coord]) -> Result<Coord, GeometryError> {
        if coords.is_empty() {
            return Err(GeometryError::InvalidArgument(
                "cannot take the centroid of an empty coord list".to_string(),
            ));
        }
        let sum = coords.iter().fold(Coord::ORIGIN, |acc, c| acc + *c);
        Ok(sum.scale(1.0 / coords.len() as f64))
    }

    /// Translate every coord in `coords` so their centroid sits at the origin.
    pub fn recentre(coords: &[Coord]) -> Result<Vec<Coord>, GeometryError> {
        let centroid = Coord::centroid(coords)?;
        Ok(coords.iter().map(|c| *c - centroid).collect())
    }
}

impl Add for Coord {
    type Output = Coord;
    fn add(self, rhs: Coord) -> Coord {
        Coord { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
    }
}

impl Sub for Coord {
    type Output = Coord;
    fn sub(self, rhs: Coord) -> Coord {
        Coord { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
    }
}

impl Mul<f64> for Coord {
    type Output = Coord;
    fn mul(self, rhs: f64) -> Coord {
        self.scale(rhs)
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}
