use thiserror::Error;

use crate::union_find::UnionFind;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("graph with {num_nodes} nodes is disconnected: spanning tree has {found} of {expected} required edges")]
    Disconnected { num_nodes: usize, found: usize, expected: usize },
}

/// A weighted, undirected edge between node indices `lo < hi`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedEdge {
    pub lo: usize,
    pub hi: usize,
    pub weight: f64,
}

impl WeightedEdge {
    pub fn new(a: usize, b: usize, weight: f64) -> Self {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        Self { lo, hi, weight }
    }
}

/// Find a maximum-weight spanning tree of `num_nodes` nodes over `edges` via
/// Kruskal's algorithm on negated weights (so a *minimum* spanning tree on
/// `-weight` is a *maximum* spanning tree on `weight`).
///
/// Ties are broken deterministically by `(lo, hi)` so the result does not
/// depend on input order. Returns edges as `(min, max)` pairs sorted
/// ascending. Fails with [`GraphError::Disconnected`] if the edges do not
/// connect all `num_nodes` nodes.
pub fn max_spanning_tree(
    num_nodes: usize,
    edges: impl IntoIterator<Item = WeightedEdge>,
) -> Result<Vec<(usize, usize)>, GraphError> {
    let mut sorted: Vec<WeightedEdge> = edges.into_iter().collect();
    // Descending weight; ties broken by ascending (lo, hi) for determinism.
    sorted.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.lo.cmp(&b.lo))
            .then_with(|| a.hi.cmp(&b.hi))
    });

    let mut uf = UnionFind::new(num_nodes);
    let mut tree = Vec::with_capacity(num_nodes.saturating_sub(1));
    for edge in sorted {
        if uf.union(edge.lo, edge.hi) {
            tree.push((edge.lo, edge.hi));
        }
    }

    let expected = num_nodes.saturating_sub(1);
    if num_nodes > 0 && tree.len() != expected {
        return Err(GraphError::Disconnected { num_nodes, found: tree.len(), expected });
    }

    tree.sort();
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scenario 5: spanning tree of 4 points.
    #[test]
    fn four_point_spanning_tree_matches_expected() {
        let edges = vec![
            WeightedEdge::new(0, 1, 0.9),
            WeightedEdge::new(0, 2, 0.3),
            WeightedEdge::new(0, 3, 0.2),
            WeightedEdge::new(1, 2, 0.8),
            WeightedEdge::new(1, 3, 0.7),
            WeightedEdge::new(2, 3, 0.1),
        ];
        let tree = max_spanning_tree(4, edges).unwrap();
        assert_eq!(tree, vec![(0, 1), (1, 2), (1, 3)]);
        let weights = [(0usize, 1usize, 0.9), (0, 2, 0.3), (0, 3, 0.2), (1, 2, 0.8), (1, 3, 0.7), (2, 3, 0.1)];
        let sum: f64 = tree
            .iter()
            .map(|(a, b)| weights.iter().find(|(x, y, _)| x == a && y == b).unwrap().2)
            .sum();
        assert!((sum - 2.4).abs() < 1e-9);
    }

    #[test]
    fn disconnected_graph_errs() {
        let edges = vec![WeightedEdge::new(0, 1, 1.0)];
        let err = max_spanning_tree(4, edges).unwrap_err();
        match err {
            GraphError::Disconnected { found, expected, .. } => {
                assert_eq!(found, 1);
                assert_eq!(expected, 3);
            }
        }
    }

    #[test]
    fn tie_breaking_is_deterministic() {
        let edges = vec![
            WeightedEdge::new(0, 1, 1.0),
            WeightedEdge::new(0, 2, 1.0),
            WeightedEdge::new(1, 2, 1.0),
        ];
        let tree = max_spanning_tree(3, edges).unwrap();
        // (0,1) sorts before (0,2) at equal weight, so it's picked first;
        // (0,2)/(1,2) would form a cycle with it, so (0,2) is next accepted.
        assert_eq!(tree, vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn single_node_has_empty_tree() {
        let tree = max_spanning_tree(1, []).unwrap();
        assert!(tree.is_empty());
    }
}
