use serde::{Deserialize, Serialize};

use crate::coord::Coord;
use crate::rotation::Rotation;

/// A rigid transform: rotate, then translate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    rotation: Rotation,
    translation: Coord,
}

impl RigidTransform {
    pub const IDENTITY: RigidTransform = RigidTransform {
        rotation: Rotation::IDENTITY,
        translation: Coord::ORIGIN,
    };

    pub fn new(rotation: Rotation, translation: Coord) -> Self {
        Self { rotation, translation }
    }

    pub fn rotation(&self) -> &Rotation { &self.rotation }
    pub fn translation(&self) -> &Coord { &self.translation }

    /// Apply this transform to a point: `R·x + t`.
    pub fn apply(&self, point: &Coord) -> Coord {
        self.rotation.rotate(point) + self.translation
    }

    /// Compose `self` after `other`: applying the result to `x` is the same
    /// as applying `other` and then `self`.
    ///
    /// `R_self * (R_other * x + t_other) + t_self`
    /// `= (R_self * R_other) * x + (R_self * t_other + t_self)`
    pub fn compose(&self, other: &RigidTransform) -> RigidTransform {
        RigidTransform {
            rotation: self.rotation.compose(&other.rotation),
            translation: self.rotation.rotate(&other.translation) + self.translation,
        }
    }
}
