//! Small generic graph utilities shared by the alignment-split enumerator
//! and the superpose orderer: union-find and maximum-weight spanning trees.

mod spanning_tree;
mod union_find;

pub use spanning_tree::{max_spanning_tree, GraphError, WeightedEdge};
pub use union_find::UnionFind;
