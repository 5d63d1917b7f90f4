use std::collections::BTreeSet;

use crate::error::AlignmentError;

/// A 2-partition of `0..num_entries` into two non-empty, disjoint sets.
/// Canonical form: the half containing entry `0` is always `first_half`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlignmentSplit {
    first_half: Vec<usize>,
    second_half: Vec<usize>,
}

impl AlignmentSplit {
    /// Builds a canonical split from two disjoint, non-empty sets covering
    /// `0..num_entries`, reordering them so entry `0` ends up in
    /// `first_half`.
    pub fn new(a: BTreeSet<usize>, b: BTreeSet<usize>, num_entries: usize) -> Result<Self, AlignmentError> {
        if a.is_empty() || b.is_empty() {
            return Err(AlignmentError::InvalidArgument("split halves must both be non-empty".into()));
        }
        if !a.is_disjoint(&b) {
            return Err(AlignmentError::InvalidArgument("split halves must be disjoint".into()));
        }
        let union_len = a.len() + b.len();
        if union_len != num_entries || a.iter().chain(b.iter()).any(|&i| i >= num_entries) {
            return Err(AlignmentError::InvalidArgument("split halves must partition 0..num_entries".into()));
        }

        let (first, second) = if a.contains(&0) { (a, b) } else { (b, a) };
        Ok(Self { first_half: first.into_iter().collect(), second_half: second.into_iter().collect() })
    }

    pub fn first_half(&self) -> &[usize] { &self.first_half }
    pub fn second_half(&self) -> &[usize] { &self.second_half }

    pub fn half_containing(&self, entry: usize) -> &[usize] {
        if self.first_half.contains(&entry) {
            &self.first_half
        } else {
            &self.second_half
        }
    }
}

/// Exhaustively enumerates every canonical non-trivial split of
/// `0..num_entries`, for `num_entries` in `2..=8`. There are exactly
/// `2^(n-1) - 1` of them: fixing entry `0` in `first_half`, each subset of
/// the remaining `n-1` entries other than "all of them" (which would leave
/// `second_half` empty) gives one split.
pub fn enumerate_splits(num_entries: usize) -> Result<Vec<AlignmentSplit>, AlignmentError> {
    if !(2..=8).contains(&num_entries) {
        return Err(AlignmentError::InvalidArgument(format!(
            "enumerate_splits requires 2 <= num_entries <= 8, got {num_entries}"
        )));
    }

    let rest_len = num_entries - 1;
    let full_mask: u32 = (1 << rest_len) - 1;
    let mut splits = Vec::with_capacity((1usize << rest_len) - 1);

    for mask in 0..(1u32 << rest_len) {
        if mask == full_mask {
            continue;
        }
        let mut first_half = BTreeSet::from([0]);
        let mut second_half = BTreeSet::new();
        for i in 0..rest_len {
            let entry = i + 1;
            if mask & (1 << i) != 0 {
                first_half.insert(entry);
            } else {
                second_half.insert(entry);
            }
        }
        splits.push(AlignmentSplit { first_half: first_half.into_iter().collect(), second_half: second_half.into_iter().collect() });
    }

    splits.sort_by_key(|s| (s.first_half.len(), s.first_half.clone()));
    Ok(splits)
}

/// Fallback generator for `num_entries` too large to enumerate exhaustively:
/// every "singleton vs rest" split.
pub fn singleton_splits(num_entries: usize) -> Vec<AlignmentSplit> {
    (0..num_entries)
        .map(|k| {
            if k == 0 {
                AlignmentSplit { first_half: vec![0], second_half: (1..num_entries).collect() }
            } else {
                let first_half: Vec<usize> = (0..num_entries).filter(|&e| e != k).collect();
                AlignmentSplit { first_half, second_half: vec![k] }
            }
        })
        .collect()
}

/// Fallback generator for `num_entries` too large to enumerate exhaustively:
/// one split per spanning-tree edge, obtained by removing that edge and
/// taking the two resulting components as the halves.
pub fn spanning_tree_splits(num_entries: usize, tree_edges: &[(usize, usize)]) -> Vec<AlignmentSplit> {
    let mut splits = Vec::with_capacity(tree_edges.len());
    for (skip_idx, _) in tree_edges.iter().enumerate() {
        let component = component_containing_zero(num_entries, tree_edges, skip_idx);
        let first_half: BTreeSet<usize> = component.into_iter().collect();
        let second_half: BTreeSet<usize> = (0..num_entries).filter(|e| !first_half.contains(e)).collect();
        if first_half.is_empty() || second_half.is_empty() {
            continue;
        }
        splits.push(AlignmentSplit { first_half: first_half.into_iter().collect(), second_half: second_half.into_iter().collect() });
    }
    splits
}

fn component_containing_zero(num_entries: usize, tree_edges: &[(usize, usize)], skip_idx: usize) -> Vec<usize> {
    let mut adjacency = vec![Vec::new(); num_entries];
    for (idx, &(a, b)) in tree_edges.iter().enumerate() {
        if idx == skip_idx {
            continue;
        }
        adjacency[a].push(b);
        adjacency[b].push(a);
    }

    let mut visited = vec![false; num_entries];
    let mut stack = vec![0usize];
    visited[0] = true;
    let mut component = Vec::new();
    while let Some(node) = stack.pop() {
        component.push(node);
        for &next in &adjacency[node] {
            if !visited[next] {
                visited[next] = true;
                stack.push(next);
            }
        }
    }
    component
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerate_splits_count_matches_formula() {
        for n in 2..=8usize {
            let splits = enumerate_splits(n).unwrap();
            assert_eq!(splits.len(), (1usize << (n - 1)) - 1);
        }
    }

    #[test]
    fn every_enumerated_split_is_canonical_and_covers_all_entries() {
        for n in 2..=6usize {
            for split in enumerate_splits(n).unwrap() {
                assert!(split.first_half().contains(&0));
                let mut all: Vec<usize> = split.first_half().iter().chain(split.second_half()).copied().collect();
                all.sort();
                assert_eq!(all, (0..n).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn rejects_out_of_range_n() {
        assert!(enumerate_splits(1).is_err());
        assert!(enumerate_splits(9).is_err());
    }

    #[test]
    fn singleton_splits_produce_n_splits() {
        let splits = singleton_splits(4);
        assert_eq!(splits.len(), 4);
        assert!(splits.iter().any(|s| s.second_half() == [1]));
        assert!(splits.iter().any(|s| s.first_half() == [0]));
    }

    #[test]
    fn spanning_tree_splits_one_per_edge() {
        let edges = vec![(0, 1), (1, 2), (1, 3)];
        let splits = spanning_tree_splits(4, &edges);
        assert_eq!(splits.len(), 3);
        for split in &splits {
            assert!(split.first_half().contains(&0));
        }
    }
}
