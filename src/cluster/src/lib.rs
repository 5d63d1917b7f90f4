//! Hierarchical agglomerative clustering: sparse pairwise edges plus a
//! decreasing sequence of layer thresholds go in, a
//! CATHSOLID-style [`Hierarchy`] with depth-first counter traversal comes
//! out.

mod agglomerate;
mod error;
mod hierarchy;

pub use agglomerate::{build_hierarchy, ClusterEdge};
pub use error::ClusterError;
pub use hierarchy::{Hierarchy, HierarchyGroup, HierarchyRef, HierarchyValue};
