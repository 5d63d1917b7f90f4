use std::collections::HashMap;

use priority_queue::PriorityQueue;

use crate::error::ClusterError;
use crate::hierarchy::{Hierarchy, HierarchyGroup, HierarchyValue};

/// An input edge to [`build_hierarchy`]: an unordered pair of entry indices
/// and a similarity score (higher = more similar).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterEdge {
    pub lo: usize,
    pub hi: usize,
    pub score: f64,
}

impl ClusterEdge {
    pub fn new(a: usize, b: usize, score: f64) -> Self {
        Self { lo: a.min(b), hi: a.max(b), score }
    }
}

/// Order-preserving monotone map from `f64` to `u64`, used only to give
/// edge priorities the total order `PriorityQueue` requires (NaN scores are
/// rejected before this is ever called).
fn monotone_bits(f: f64) -> u64 {
    let bits = f.to_bits();
    if f.is_sign_negative() { !bits } else { bits | 0x8000_0000_0000_0000 }
}

/// Priority key for the per-layer edge queue: highest score first, then
/// smallest `(lo, hi)` first among equal scores, encoded so that `Ord`'s
/// natural maximum is the one `pop`ped first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct EdgePriority {
    score_key: u64,
    rev_lo: std::cmp::Reverse<usize>,
    rev_hi: std::cmp::Reverse<usize>,
}

fn edge_priority(edge: &ClusterEdge) -> EdgePriority {
    EdgePriority {
        score_key: monotone_bits(edge.score),
        rev_lo: std::cmp::Reverse(edge.lo),
        rev_hi: std::cmp::Reverse(edge.hi),
    }
}

/// A minimal disjoint-set-union local to agglomeration: unlike
/// `graph::UnionFind`'s union-by-size, callers here decide which root
/// survives a merge (the "seeded-earlier" one), so the tree shape is
/// driven entirely from outside.
struct Dsu {
    parent: Vec<usize>,
}

impl Dsu {
    fn new(n: usize) -> Self {
        Self { parent: (0..n).collect() }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    /// Re-parents `loser` under `winner`. Caller has already resolved which
    /// of the two current roots should remain addressable.
    fn union_into(&mut self, winner: usize, loser: usize) {
        self.parent[loser] = winner;
    }
}

#[derive(Debug, Clone, Copy)]
enum ActiveRef {
    Entry(usize),
    Cluster { depth: usize, group_idx: usize },
}

impl From<ActiveRef> for HierarchyValue {
    fn from(value: ActiveRef) -> Self {
        match value {
            ActiveRef::Entry(i) => HierarchyValue::entry(i),
            ActiveRef::Cluster { group_idx, .. } => HierarchyValue::cluster(group_idx),
        }
    }
}

/// Builds a CATHSOLID-style [`Hierarchy`] from a sparse set of pairwise
/// edges and a monotone-decreasing sequence of layer thresholds.
///
/// `seed_order` optionally gives, for each entry `0..num_entries`, a rank
/// used (a) to decide which of two merging clusters keeps its identity
/// (the one with the smaller minimum seed rank) and (b) to break ties when
/// both minimum ranks match (falls back to the smaller raw entry index).
/// `None` uses the identity permutation (seed rank == entry index).
///
/// Layer `k` (1-indexed, strictest first) merges clusters whose link score
/// (max inter-cluster edge weight, i.e. single-linkage) is `>= thresholds[k-1]`.
/// The resulting hierarchy has `thresholds.len() + 1` depths: depth 0 is
/// always a single root group; depth `d` for `d >= 1` holds the merge
/// events of layer `thresholds.len() + 1 - d`.
pub fn build_hierarchy(
    num_entries: usize,
    edges: &[ClusterEdge],
    thresholds: &[f64],
    seed_order: Option<&[usize]>,
) -> Result<Hierarchy, ClusterError> {
    if num_entries == 0 {
        return Err(ClusterError::InvalidArgument("cannot cluster zero entries".to_string()));
    }
    for edge in edges {
        if edge.lo == edge.hi || edge.lo >= num_entries || edge.hi >= num_entries {
            return Err(ClusterError::InvalidArgument(format!(
                "edge ({}, {}) is out of range for {num_entries} entries",
                edge.lo, edge.hi
            )));
        }
        if !edge.score.is_finite() {
            return Err(ClusterError::InvalidArgument("edge scores must be finite".to_string()));
        }
    }
    if let Some(order) = seed_order {
        if order.len() != num_entries {
            return Err(ClusterError::InvalidArgument(
                "seed_order must have exactly one rank per entry".to_string(),
            ));
        }
    }
    for window in thresholds.windows(2) {
        if !(window[0] > window[1]) {
            return Err(ClusterError::InvalidArgument(
                "thresholds must be strictly decreasing".to_string(),
            ));
        }
    }

    let seed_rank = |entry: usize| -> usize { seed_order.map_or(entry, |order| order[entry]) };

    let mut dsu = Dsu::new(num_entries);
    let mut active: HashMap<usize, ActiveRef> =
        (0..num_entries).map(|i| (i, ActiveRef::Entry(i))).collect();
    let mut min_member: HashMap<usize, usize> = (0..num_entries).map(|i| (i, i)).collect();
    let mut min_seed: HashMap<usize, usize> = (0..num_entries).map(|i| (i, seed_rank(i))).collect();

    let num_layers = thresholds.len();
    let mut layers_by_k: Vec<Vec<HierarchyGroup>> = vec![Vec::new(); num_layers];

    for (k_minus_1, &threshold) in thresholds.iter().enumerate() {
        let mut queue: PriorityQueue<usize, EdgePriority> = PriorityQueue::new();
        for (edge_idx, edge) in edges.iter().enumerate() {
            if edge.score >= threshold {
                queue.push(edge_idx, edge_priority(edge));
            }
        }

        while let Some((edge_idx, _)) = queue.pop() {
            let edge = edges[edge_idx];
            let ra = dsu.find(edge.lo);
            let rb = dsu.find(edge.hi);
            if ra == rb {
                continue;
            }

            let (seed_a, seed_b) = (min_seed[&ra], min_seed[&rb]);
            let (member_a, member_b) = (min_member[&ra], min_member[&rb]);
            let a_first = (seed_a, member_a) <= (seed_b, member_b);
            let (winner, loser) = if a_first { (ra, rb) } else { (rb, ra) };
            let (first_ref, second_ref) = if a_first { (active[&ra], active[&rb]) } else { (active[&rb], active[&ra]) };

            let group_idx = layers_by_k[k_minus_1].len();
            layers_by_k[k_minus_1]
                .push(HierarchyGroup::new(vec![first_ref.into(), second_ref.into()]));

            dsu.union_into(winner, loser);
            active.insert(winner, ActiveRef::Cluster { depth: k_minus_1 + 1, group_idx });
            min_member.insert(winner, member_a.min(member_b));
            min_seed.insert(winner, seed_a.min(seed_b));
            active.remove(&loser);
            min_member.remove(&loser);
            min_seed.remove(&loser);
        }
    }

    // Root wrapper: one group listing every surviving top-level cluster
    // (or lone singleton), ordered by ascending (seed, min member).
    let mut top_roots: Vec<usize> = (0..num_entries).map(|i| dsu.find(i)).collect();
    top_roots.sort_unstable();
    top_roots.dedup();
    top_roots.sort_by(|&a, &b| {
        (min_seed[&a], min_member[&a]).cmp(&(min_seed[&b], min_member[&b]))
    });

    let root_group = HierarchyGroup::new(top_roots.iter().map(|r| active[r].into()).collect());

    let mut layers = Vec::with_capacity(num_layers + 1);
    layers.push(vec![root_group]);
    // layers_by_k[0] is layer 1 (deepest) ... layers_by_k[L-1] is layer L (shallowest, depth 1).
    // Hierarchy depth d (1-indexed) holds layer (num_layers + 1 - d) == layers_by_k[num_layers - d].
    for d in 1..=num_layers {
        layers.push(std::mem::take(&mut layers_by_k[num_layers - d]));
    }

    Ok(Hierarchy::new(layers))
}
