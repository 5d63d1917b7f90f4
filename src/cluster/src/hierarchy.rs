use serde::{Deserialize, Serialize};

/// Whether a [`HierarchyValue`] refers to a leaf entry or a group one layer
/// deeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HierarchyRef {
    Entry,
    Cluster,
}

/// One child of a [`HierarchyGroup`]: either a leaf entry index or the index
/// of a group at the next-deeper layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyValue {
    kind: HierarchyRef,
    index: usize,
}

impl HierarchyValue {
    pub fn entry(index: usize) -> Self {
        Self { kind: HierarchyRef::Entry, index }
    }

    pub fn cluster(index: usize) -> Self {
        Self { kind: HierarchyRef::Cluster, index }
    }

    pub fn kind(&self) -> HierarchyRef {
        self.kind
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// A group of [`HierarchyValue`]s within one layer of a [`Hierarchy`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyGroup {
    values: Vec<HierarchyValue>,
}

impl HierarchyGroup {
    pub fn new(values: Vec<HierarchyValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HierarchyValue> {
        self.values.iter()
    }
}

impl std::ops::Index<usize> for HierarchyGroup {
    type Output = HierarchyValue;

    fn index(&self, index: usize) -> &HierarchyValue {
        &self.values[index]
    }
}

/// A CATHSOLID-style hierarchy: `layers[0]` is the single-group root, and
/// `layers[depth]` holds the groups formed one layer further from the root.
/// Every [`HierarchyValue`] of kind `Cluster` in `layers[depth]` indexes into
/// `layers[depth + 1]`, walked by a depth-first traverser below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    layers: Vec<Vec<HierarchyGroup>>,
}

impl Hierarchy {
    pub fn new(layers: Vec<Vec<HierarchyGroup>>) -> Self {
        Self { layers }
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn group(&self, depth: usize, group_idx: usize) -> &HierarchyGroup {
        &self.layers[depth][group_idx]
    }

    pub fn groups_at(&self, depth: usize) -> &[HierarchyGroup] {
        &self.layers[depth]
    }

    /// Depth-first traversal producing, for each leaf, a 1-indexed counter
    /// tuple (one entry per depth, CATHSOLID-style) plus the leaf's entry
    /// index. Mirrors `depth_first_hierachy_traverser::traverse_recurse`
    /// exactly: `ctrs` grows by one slot per recursion level, is padded out
    /// to full depth with `1`s when a leaf is reached (so sibling leaves
    /// reached at a shallower depth than others still report a full-length
    /// tuple), then truncated back on return, and the last slot is bumped
    /// after each child is processed.
    pub fn dfs(&self) -> Vec<(Vec<usize>, usize)> {
        let mut out = Vec::new();
        if self.layers.is_empty() {
            return out;
        }
        let mut ctrs = Vec::with_capacity(self.layers.len());
        self.traverse_recurse(0, 0, &mut ctrs, &mut out);
        out
    }

    fn traverse_recurse(
        &self,
        depth: usize,
        group_idx: usize,
        ctrs: &mut Vec<usize>,
        out: &mut Vec<(Vec<usize>, usize)>,
    ) {
        const CTR_INIT: usize = 1;
        let group = &self.layers[depth][group_idx];
        ctrs.push(CTR_INIT);

        for value in group.iter() {
            match value.kind() {
                HierarchyRef::Entry => {
                    ctrs.resize(self.layers.len(), CTR_INIT);
                    out.push((ctrs.clone(), value.index()));
                    ctrs.truncate(depth + 1);
                }
                HierarchyRef::Cluster => {
                    self.traverse_recurse(depth + 1, value.index(), ctrs, out);
                }
            }
            *ctrs.last_mut().expect("just pushed a counter for this depth") += 1;
        }

        ctrs.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A two-layer hierarchy, hand-built here to pin down the DFS counter
    /// contract independently of the agglomeration
    /// algorithm that builds it in practice (see `agglomerate`'s own copy of
    /// this scenario).
    #[test]
    fn dfs_counters_match_literal_scenario() {
        let hierarchy = Hierarchy::new(vec![
            vec![HierarchyGroup::new(vec![HierarchyValue::cluster(0)])],
            vec![HierarchyGroup::new(vec![HierarchyValue::cluster(0), HierarchyValue::cluster(1)])],
            vec![
                HierarchyGroup::new(vec![HierarchyValue::entry(0), HierarchyValue::entry(1)]),
                HierarchyGroup::new(vec![HierarchyValue::entry(2), HierarchyValue::entry(3)]),
            ],
        ]);

        let dfs = hierarchy.dfs();
        assert_eq!(
            dfs,
            vec![
                (vec![1, 1, 1], 0),
                (vec![1, 1, 2], 1),
                (vec![1, 2, 1], 2),
                (vec![1, 2, 2], 3),
            ]
        );
    }
}
