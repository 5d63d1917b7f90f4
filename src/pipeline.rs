//! Wires the three cores together end to end: superposition (H/I) feeds
//! structural coordinates to the alignment refiner (D-G), and a caller's
//! sparse pairwise scores feed hierarchical clustering (J). Each stage logs
//! its outcome the way `pedigree_sims`/`pwd_from_stdin` log theirs.

use alignment::{
    refine, Alignment, AlignmentSplitMapping, NeedlemanWunschRealigner, RefinerReport,
};
use cluster::{ClusterEdge, Hierarchy};
use geometry::{Coord, RigidTransform};
use rayon::prelude::*;
use structure::StrucsContext;
use superpose::{build_superposition, PairCoordsProvider, SuperposeOrderer};

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineStep, WithPipelineStep};

/// Supplies the Cα coordinates two structures share at every alignment row
/// where both are present, in each structure's own raw frame.
pub struct AlignmentCoordsProvider<'a> {
    ctx: &'a StrucsContext,
    alignment: &'a Alignment,
}

impl<'a> AlignmentCoordsProvider<'a> {
    pub fn new(ctx: &'a StrucsContext, alignment: &'a Alignment) -> Self {
        Self { ctx, alignment }
    }
}

impl PairCoordsProvider for AlignmentCoordsProvider<'_> {
    fn common_coords(&self, a: usize, b: usize) -> (Vec<Coord>, Vec<Coord>) {
        let residues_a = self.ctx.structure(a).backbone_complete_residues();
        let residues_b = self.ctx.structure(b).backbone_complete_residues();

        let mut coords_a = Vec::new();
        let mut coords_b = Vec::new();
        for row in 0..self.alignment.length() {
            let (Some(pos_a), Some(pos_b)) =
                (self.alignment.position_of(a, row), self.alignment.position_of(b, row))
            else {
                continue;
            };
            let (Some(residue_a), Some(residue_b)) =
                (residues_a.get(pos_a as usize), residues_b.get(pos_b as usize))
            else {
                continue;
            };
            coords_a.push(residue_a.ca());
            coords_b.push(residue_b.ca());
        }
        (coords_a, coords_b)
    }
}

/// The number of alignment rows where both `a` and `b` have a present
/// position: a cheap proxy for pairwise similarity, used both as the
/// orderer's edge weight and as the root-selection tiebreak in
/// [`build_superposition`].
fn pairwise_overlap_score(alignment: &Alignment, a: usize, b: usize) -> f64 {
    (0..alignment.length())
        .filter(|&row| alignment.position_of(a, row).is_some() && alignment.position_of(b, row).is_some())
        .count() as f64
}

/// Builds a maximum-spanning-tree superposition over every structure in
/// `ctx`, using `alignment`'s shared columns both to score
/// candidate pairs and to supply the Cα coordinates each edge's Kabsch fit
/// needs.
pub fn run_superposition(
    ctx: &StrucsContext,
    alignment: &Alignment,
) -> Result<Vec<RigidTransform>, PipelineError> {
    let num_structures = ctx.num_structures();
    let mut orderer = SuperposeOrderer::new(num_structures).step(PipelineStep::Superpose)?;

    // Every (a, b) pair is an independent job; farm them to rayon's pool and
    // fold the results back in (min, max) order so the orderer is filled
    // identically regardless of completion order.
    let pairs: Vec<(usize, usize)> = (0..num_structures).flat_map(|a| (0..a).map(move |b| (a, b))).collect();
    let scores: Vec<((usize, usize), f64)> =
        pairs.into_par_iter().map(|(a, b)| ((a, b), pairwise_overlap_score(alignment, a, b))).collect();
    for ((a, b), score) in scores {
        if score > 0.0 {
            orderer.set_score(a, b, score).step(PipelineStep::Superpose)?;
        }
    }

    let tree_edges = orderer.spanning_tree().step(PipelineStep::Superpose)?;
    log::debug!("superpose: spanning tree covers {} structures", num_structures);

    let coords = AlignmentCoordsProvider::new(ctx, alignment);
    let transforms = build_superposition(
        num_structures,
        &tree_edges,
        |a, b| pairwise_overlap_score(alignment, a, b),
        &coords,
    )
    .step(PipelineStep::Superpose)?;

    Ok(transforms)
}

/// A pairwise residue-scoring function for [`NeedlemanWunschRealigner`] built
/// from already-superposed coordinates: the score of matching local row `i`
/// of one split half against local row `j` of the other is the negative mean
/// Cα distance, averaged over every entry pair present at those rows.
fn structural_pair_score<'a>(
    ctx: &'a StrucsContext,
    transforms: &'a [RigidTransform],
) -> impl Fn(&AlignmentSplitMapping, usize, &AlignmentSplitMapping, usize) -> f32 + 'a {
    move |half_a, i, half_b, j| {
        let mut total = 0.0f32;
        let mut count = 0usize;

        for &entry_a in half_a.entries() {
            let Some(pos_a) = half_a.position_in_structure(entry_a, i) else { continue };
            let Some(residue_a) = ctx.structure(entry_a).backbone_complete_residues().get(pos_a as usize).copied()
            else {
                continue;
            };
            let coord_a = transforms[entry_a].apply(&residue_a.ca());

            for &entry_b in half_b.entries() {
                let Some(pos_b) = half_b.position_in_structure(entry_b, j) else { continue };
                let Some(residue_b) =
                    ctx.structure(entry_b).backbone_complete_residues().get(pos_b as usize).copied()
                else {
                    continue;
                };
                let coord_b = transforms[entry_b].apply(&residue_b.ca());
                total += -(coord_a.distance(&coord_b) as f32);
                count += 1;
            }
        }

        if count == 0 {
            -1.0
        } else {
            total / count as f32
        }
    }
}

/// Runs the refiner's accept/reject loop over `initial` using a
/// [`NeedlemanWunschRealigner`] scored from `transforms`-superposed
/// coordinates.
pub fn run_refinement(
    initial: Alignment,
    ctx: &StrucsContext,
    transforms: &[RigidTransform],
    config: &PipelineConfig,
) -> Result<RefinerReport, PipelineError> {
    let backbone_lengths: Vec<u32> = (0..ctx.num_structures())
        .map(|i| ctx.structure(i).backbone_complete_residues().len() as u32)
        .collect();

    let realigner = NeedlemanWunschRealigner::new(config.realign_gap_penalty, structural_pair_score(ctx, transforms));
    let report = refine(initial, &backbone_lengths, &realigner, None, &config.refiner_config())
        .step(PipelineStep::Refine)?;

    match report.outcome {
        alignment::RefinerOutcome::Converged => {
            log::debug!("refiner converged after {} round(s)", report.rounds_run)
        }
        alignment::RefinerOutcome::RoundLimitReached => {
            log::warn!("refiner hit the round limit ({} rounds) before converging", report.rounds_run)
        }
    }

    Ok(report)
}

/// Builds a CATHSOLID-style [`Hierarchy`] from a caller-supplied sparse
/// set of pairwise similarity edges.
pub fn run_clustering(
    num_entries: usize,
    edges: &[ClusterEdge],
    config: &PipelineConfig,
) -> Result<Hierarchy, PipelineError> {
    let hierarchy = cluster::build_hierarchy(num_entries, edges, &config.cluster_thresholds, None)
        .step(PipelineStep::Cluster)?;
    log::debug!("clustering produced a {}-layer hierarchy", hierarchy.num_layers());
    Ok(hierarchy)
}
