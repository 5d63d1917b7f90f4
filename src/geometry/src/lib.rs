//! Geometry kernel: 3-vectors, proper-orthogonal rotations and rigid
//! transforms, and the Kabsch point-cloud fitting algorithm.

mod angle;
mod coord;
mod error;
mod rotation;
mod transform;

pub use angle::Angle;
pub use coord::Coord;
pub use error::GeometryError;
pub use rotation::{
    fit_first_onto_second, rotation_to_x_axis_and_xy_plane, Rotation,
    DEFAULT_TOLERANCE_FOR_ROTATION_CLOSENESS_CHECKS,
};
pub use transform::RigidTransform;
