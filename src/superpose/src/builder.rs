use std::collections::VecDeque;

use geometry::{fit_first_onto_second, Coord, RigidTransform};

use crate::error::SuperposeError;

/// Supplies the common-column Cα coordinates shared by two entries, in
/// each entry's own raw frame, derived from their shared alignment
/// positions. The two returned lists are the same length and index-aligned:
/// `coords_of(a, b).0[k]` and `coords_of(a, b).1[k]` are the same alignment
/// column's Cα in `a`'s and `b`'s frames respectively.
pub trait PairCoordsProvider {
    fn common_coords(&self, a: usize, b: usize) -> (Vec<Coord>, Vec<Coord>);
}

/// Builds a consistent multi-structure superposition from a spanning tree
/// of pairwise edges (typically
/// [`SuperposeOrderer::spanning_tree`](crate::SuperposeOrderer::spanning_tree)):
///
/// 1. choose the root: the lower-indexed endpoint of the highest-scoring
///    edge.
/// 2. the root's transform is the identity.
/// 3. BFS over the tree; for each newly-discovered node `v` from parent
///    `u`, fit `v` onto `u` over their common alignment columns (Kabsch,
///    both recentred at their own pairwise centroid) and compose `v`'s
///    transform from `u`'s.
///
/// Fails with [`SuperposeError::InsufficientCommonAtoms`] if an edge's
/// common-column count is below 3.
pub fn build_superposition(
    num_structures: usize,
    tree_edges: &[(usize, usize)],
    edge_score: impl Fn(usize, usize) -> f64,
    coords: &impl PairCoordsProvider,
) -> Result<Vec<RigidTransform>, SuperposeError> {
    if num_structures == 0 {
        return Err(SuperposeError::InvalidArgument("cannot superpose zero structures".to_string()));
    }
    if num_structures == 1 {
        return Ok(vec![RigidTransform::IDENTITY]);
    }
    if tree_edges.len() != num_structures - 1 {
        return Err(SuperposeError::InvalidArgument(format!(
            "spanning tree must have {} edges for {num_structures} structures, got {}",
            num_structures - 1,
            tree_edges.len()
        )));
    }

    let root = tree_edges
        .iter()
        .max_by(|&&(a0, a1), &&(b0, b1)| {
            edge_score(a0, a1).partial_cmp(&edge_score(b0, b1)).unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|&(a, b)| a.min(b))
        .expect("tree_edges is non-empty: checked above");

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); num_structures];
    for &(a, b) in tree_edges {
        adjacency[a].push(b);
        adjacency[b].push(a);
    }

    let mut transforms: Vec<Option<RigidTransform>> = vec![None; num_structures];
    transforms[root] = Some(RigidTransform::IDENTITY);
    let mut visited = vec![false; num_structures];
    visited[root] = true;
    let mut queue = VecDeque::from([root]);

    while let Some(u) = queue.pop_front() {
        let transform_u = transforms[u].expect("u was enqueued only after its transform was set");
        for &v in &adjacency[u] {
            if visited[v] {
                continue;
            }
            visited[v] = true;

            let (coords_u, coords_v) = coords.common_coords(u, v);
            if coords_u.len() < 3 {
                return Err(SuperposeError::InsufficientCommonAtoms { a: u, b: v, found: coords_u.len() });
            }

            let centroid_u = Coord::centroid(&coords_u)?;
            let centroid_v = Coord::centroid(&coords_v)?;
            let recentred_u: Vec<Coord> = coords_u.iter().map(|c| *c - centroid_u).collect();
            let recentred_v: Vec<Coord> = coords_v.iter().map(|c| *c - centroid_v).collect();

            // Rotation superposing v onto u, both already recentred.
            let rotation_v_onto_u = fit_first_onto_second(&recentred_v, &recentred_u)?;
            let local_v_in_u_frame =
                RigidTransform::new(rotation_v_onto_u, centroid_u - rotation_v_onto_u.rotate(&centroid_v));

            let transform_v = transform_u.compose(&local_v_in_u_frame);
            transforms[v] = Some(transform_v);
            queue.push_back(v);
        }
    }

    transforms
        .into_iter()
        .enumerate()
        .map(|(i, t)| t.ok_or_else(|| SuperposeError::InvalidArgument(format!("structure {i} unreachable from root"))))
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    struct FixedCoords {
        // (a, b) -> (coords_a, coords_b)
        pairs: std::collections::HashMap<(usize, usize), (Vec<Coord>, Vec<Coord>)>,
    }

    impl PairCoordsProvider for FixedCoords {
        fn common_coords(&self, a: usize, b: usize) -> (Vec<Coord>, Vec<Coord>) {
            if let Some(pair) = self.pairs.get(&(a, b)) {
                pair.clone()
            } else if let Some((cb, ca)) = self.pairs.get(&(b, a)) {
                (ca.clone(), cb.clone())
            } else {
                (Vec::new(), Vec::new())
            }
        }
    }

    fn c(x: f64, y: f64, z: f64) -> Coord {
        Coord::try_new(x, y, z).unwrap()
    }

    #[test]
    fn identical_structures_get_identity_chain() {
        let shared = vec![c(0.0, 0.0, 0.0), c(1.0, 0.0, 0.0), c(0.0, 1.0, 0.0), c(0.0, 0.0, 1.0)];
        let mut pairs = std::collections::HashMap::new();
        pairs.insert((1, 0), (shared.clone(), shared.clone()));
        let coords = FixedCoords { pairs };

        let transforms = build_superposition(2, &[(0, 1)], |_, _| 1.0, &coords).unwrap();
        assert_eq!(transforms[0], RigidTransform::IDENTITY);
        for p in &shared {
            assert_abs_diff_eq!(transforms[1].apply(p).distance(p), 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn root_is_lower_index_of_highest_scoring_edge() {
        let shared = vec![c(0.0, 0.0, 0.0), c(1.0, 0.0, 0.0), c(0.0, 1.0, 0.0), c(0.0, 0.0, 1.0)];
        let mut pairs = std::collections::HashMap::new();
        pairs.insert((1, 0), (shared.clone(), shared.clone()));
        pairs.insert((1, 2), (shared.clone(), shared.clone()));
        let coords = FixedCoords { pairs };

        let scores = |a: usize, b: usize| if (a, b) == (1, 2) || (a, b) == (2, 1) { 0.9 } else { 0.1 };
        let transforms = build_superposition(3, &[(0, 1), (1, 2)], scores, &coords).unwrap();
        // highest-score edge is (1,2); lower index is 1, so structure 1 is root.
        assert_eq!(transforms[1], RigidTransform::IDENTITY);
    }

    #[test]
    fn insufficient_common_atoms_errors() {
        let shared = vec![c(0.0, 0.0, 0.0), c(1.0, 0.0, 0.0)];
        let mut pairs = std::collections::HashMap::new();
        pairs.insert((1, 0), (shared.clone(), shared.clone()));
        let coords = FixedCoords { pairs };

        let err = build_superposition(2, &[(0, 1)], |_, _| 1.0, &coords).unwrap_err();
        assert!(matches!(err, SuperposeError::InsufficientCommonAtoms { .. }));
    }

    #[test]
    fn single_structure_gets_identity() {
        let coords = FixedCoords { pairs: std::collections::HashMap::new() };
        let transforms = build_superposition(1, &[], |_, _| 1.0, &coords).unwrap();
        assert_eq!(transforms, vec![RigidTransform::IDENTITY]);
    }

    #[test]
    fn wrong_edge_count_errors() {
        let coords = FixedCoords { pairs: std::collections::HashMap::new() };
        let err = build_superposition(3, &[(0, 1)], |_, _| 1.0, &coords).unwrap_err();
        assert!(matches!(err, SuperposeError::InvalidArgument(_)));
    }
}
