//! Pairwise superposition ordering and multi-structure superposition
//! composition: the max-spanning-tree orderer over pairwise scores and the
//! BFS transform-composition builder it feeds.

mod builder;
mod error;
mod orderer;

pub use builder::{build_superposition, PairCoordsProvider};
pub use error::SuperposeError;
pub use orderer::SuperposeOrderer;
