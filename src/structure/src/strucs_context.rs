use std::hash::{BuildHasher, Hash, Hasher};

use ahash::{AHasher, RandomState};

use crate::residue::{Residue, ResidueStreamRecord};
use crate::residue_id::ResidueId;

/// Fixed seeds so the stable hash below is reproducible across runs and
/// processes, which matters since it is used to name scratch directories.
const STABLE_HASH_SEEDS: (u64, u64, u64, u64) =
    (0x5ca1_ab1e_f00d_cafe, 0x1234_5678_9abc_def0, 0x0fed_cba9_8765_4321, 0xdead_beef_1337_c0de);

/// An inclusion filter over a structure's residues, used to restrict
/// superposition/clustering to a sub-domain of a larger chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionMask {
    /// Every residue of the structure is included.
    All,
    /// Only residues whose id is in this set are included.
    Only(Vec<ResidueId>),
}

impl RegionMask {
    pub fn includes(&self, id: &ResidueId) -> bool {
        match self {
            RegionMask::All => true,
            RegionMask::Only(ids) => ids.contains(id),
        }
    }
}

/// One structure's residue stream plus the region mask restricting which
/// residues participate in downstream alignment/superposition.
#[derive(Debug, Clone)]
pub struct StructureRecord {
    name: String,
    residues: Vec<ResidueStreamRecord>,
    region: RegionMask,
}

impl StructureRecord {
    pub fn new(name: impl Into<String>, residues: Vec<ResidueStreamRecord>, region: RegionMask) -> Self {
        Self { name: name.into(), residues, region }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn full_residues(&self) -> &[ResidueStreamRecord] { &self.residues }
    pub fn region(&self) -> &RegionMask { &self.region }

    /// The backbone-complete sublist: every non-null residue, in order.
    pub fn backbone_complete_residues(&self) -> Vec<&Residue> {
        self.residues.iter().filter_map(|r| r.as_ref()).collect()
    }

    /// Maps each index of [`full_residues`](Self::full_residues) to the
    /// corresponding index in [`backbone_complete_residues`](Self::backbone_complete_residues),
    /// or `None` where the full-list slot is a null.
    pub fn bb_of_full(&self) -> Vec<Option<usize>> {
        let mut next_bb = 0usize;
        self.residues
            .iter()
            .map(|r| {
                if r.is_some() {
                    let idx = next_bb;
                    next_bb += 1;
                    Some(idx)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Residues passing the region mask, in stream order.
    pub fn residues_in_region(&self) -> Vec<&Residue> {
        self.backbone_complete_residues().into_iter().filter(|r| self.region.includes(r.id())).collect()
    }
}

/// The set of structures participating in one run: their residue streams
/// and region masks.
#[derive(Debug, Clone)]
pub struct StrucsContext {
    structures: Vec<StructureRecord>,
}

impl StrucsContext {
    pub fn new(structures: Vec<StructureRecord>) -> Self {
        Self { structures }
    }

    pub fn num_structures(&self) -> usize { self.structures.len() }

    pub fn structure(&self, i: usize) -> &StructureRecord { &self.structures[i] }

    /// Residues of structure `i` passing its region mask.
    pub fn residues_of(&self, i: usize) -> Vec<&Residue> { self.structures[i].residues_in_region() }

    /// The region-filtered `ResidueId`s of structure `i`.
    pub fn domain_residue_ids(&self, i: usize) -> Vec<ResidueId> {
        self.residues_of(i).into_iter().map(|r| r.id().clone()).collect()
    }

    /// A stable hash over every structure's name and region mask, suitable
    /// for naming a scratch directory that is reused across re-runs with
    /// the same inputs.
    pub fn stable_hash(&self) -> u64 {
        let builder = RandomState::with_seeds(
            STABLE_HASH_SEEDS.0,
            STABLE_HASH_SEEDS.1,
            STABLE_HASH_SEEDS.2,
            STABLE_HASH_SEEDS.3,
        );
        let mut hasher: AHasher = builder.build_hasher();
        for structure in &self.structures {
            structure.name.hash(&mut hasher);
            match &structure.region {
                RegionMask::All => 0u8.hash(&mut hasher),
                RegionMask::Only(ids) => {
                    1u8.hash(&mut hasher);
                    for id in ids {
                        id.hash(&mut hasher);
                    }
                }
            }
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geometry::Coord;
    use crate::residue::SecondaryStructure;

    fn residue(chain: &str, num: i32) -> Residue {
        Residue::new(
            ResidueId::new(chain, num, None),
            'A',
            Coord::try_new(0.0, 0.0, 0.0).unwrap(),
            None,
            None,
            SecondaryStructure::Coil,
            0,
            None,
            None,
        )
    }

    fn context_with(residues: Vec<ResidueStreamRecord>, region: RegionMask) -> StrucsContext {
        StrucsContext::new(vec![StructureRecord::new("s1", residues, region)])
    }

    #[test]
    fn bb_of_full_skips_nulls() {
        let ctx = context_with(vec![Some(residue("A", 1)), None, Some(residue("A", 3))], RegionMask::All);
        assert_eq!(ctx.structure(0).bb_of_full(), vec![Some(0), None, Some(1)]);
    }

    #[test]
    fn region_mask_filters_residues() {
        let region = RegionMask::Only(vec![ResidueId::new("A", 1, None)]);
        let ctx = context_with(vec![Some(residue("A", 1)), Some(residue("A", 2))], region);
        let ids = ctx.domain_residue_ids(0);
        assert_eq!(ids, vec![ResidueId::new("A", 1, None)]);
    }

    #[test]
    fn stable_hash_is_deterministic_and_sensitive_to_names() {
        let ctx_a = context_with(vec![Some(residue("A", 1))], RegionMask::All);
        let ctx_b = context_with(vec![Some(residue("A", 1))], RegionMask::All);
        assert_eq!(ctx_a.stable_hash(), ctx_b.stable_hash());

        let mut other = ctx_b.clone();
        other.structures[0].name = "different".to_string();
        assert_ne!(ctx_a.stable_hash(), other.stable_hash());
    }

    #[test]
    fn num_structures_and_residues_of() {
        let ctx = context_with(vec![Some(residue("A", 1))], RegionMask::All);
        assert_eq!(ctx.num_structures(), 1);
        assert_eq!(ctx.residues_of(0).len(), 1);
    }
}
