use thiserror::Error;

use crate::alignment::Alignment;
use crate::error::AlignmentError;
use crate::scoring::{score_columns, ScoringVariant};
use crate::split::{enumerate_splits, singleton_splits, spanning_tree_splits, AlignmentSplit};
use crate::split_mapping::{build_split_mapping, AlignmentSplitMapping};

/// A failure from a [`Realigner`]'s pairwise DP. This is the only failure
/// kind a realign strategy may report; it is always
/// treated as a reject-and-continue by [`refine`], never as fatal.
#[derive(Error, Debug)]
pub enum RealignError {
    #[error("numerical failure while realigning: {0}")]
    Numerical(String),
}

/// The pairwise alignment DP injected into the refiner. Concrete
/// implementations (e.g. a Needleman-Wunsch-style global aligner over
/// per-residue-pair scores) live outside this crate; the refiner only
/// needs the contract.
pub trait Realigner {
    fn align_halves(
        &self,
        half_a: &AlignmentSplitMapping,
        half_b: &AlignmentSplitMapping,
    ) -> Result<Alignment, RealignError>;
}

/// Tunables for [`refine`]: round budget, scoring-window radius, and which
/// of the three column-score variants drives accept/reject decisions.
#[derive(Debug, Clone, Copy)]
pub struct RefinerConfig {
    pub max_rounds: usize,
    pub window_radius: usize,
    pub scoring_variant: ScoringVariant,
}

impl Default for RefinerConfig {
    fn default() -> Self {
        Self { max_rounds: 200, window_radius: 4, scoring_variant: ScoringVariant::PerParticipant }
    }
}

/// A single accepted round: which split was tried and the total-score
/// improvement it produced.
#[derive(Debug, Clone)]
pub struct AcceptedRound {
    pub round: usize,
    pub split: AlignmentSplit,
    pub score_before: f32,
    pub score_after: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefinerOutcome {
    /// Stopped because `max_rounds` was reached; further improvement may
    /// still have been possible.
    RoundLimitReached,
    /// A full pass over the split enumerator produced no improving split.
    Converged,
}

#[derive(Debug, Clone)]
pub struct RefinerReport {
    pub alignment: Alignment,
    pub accepted: Vec<AcceptedRound>,
    pub rounds_run: usize,
    pub outcome: RefinerOutcome,
}

fn total_score(alignment: &Alignment, config: &RefinerConfig) -> f32 {
    score_columns(alignment, config.window_radius).iter().map(|v| v.select(config.scoring_variant)).sum()
}

/// The split enumerator for `num_entries` entries: exhaustive for `n <= 8`;
/// for larger `n`, the composed fallback of every singleton
/// split plus, when a spanning tree over the entries' pairwise scores is
/// available, one split per tree edge.
fn candidate_splits(
    num_entries: usize,
    tree_edges: Option<&[(usize, usize)]>,
) -> Result<Vec<AlignmentSplit>, AlignmentError> {
    if num_entries < 2 {
        return Err(AlignmentError::InvalidArgument("refiner requires at least 2 entries".into()));
    }
    if num_entries <= 8 {
        return enumerate_splits(num_entries);
    }
    let mut splits = singleton_splits(num_entries);
    if let Some(edges) = tree_edges {
        splits.extend(spanning_tree_splits(num_entries, edges));
    }
    Ok(splits)
}

/// Runs the refiner's `Propose -> Restrict -> Realign -> Score ->
/// Accept/Reject -> NextSplit` loop to local convergence or
/// `config.max_rounds`, whichever comes first.
///
/// Each round performs one full pass over the candidate splits, accepting
/// the first one that improves the total column score and restarting the
/// pass against the new alignment; a pass that finds no improving split
/// ends refinement with [`RefinerOutcome::Converged`].
///
/// A [`RealignError::Numerical`] from `realigner` is logged and rejected
/// (the pass continues with the next split); a structural precondition
/// violation building a split mapping propagates as a fatal
/// [`AlignmentError`].
pub fn refine(
    initial: Alignment,
    backbone_lengths: &[u32],
    realigner: &impl Realigner,
    tree_edges: Option<&[(usize, usize)]>,
    config: &RefinerConfig,
) -> Result<RefinerReport, AlignmentError> {
    let num_entries = initial.num_entries();
    let splits = candidate_splits(num_entries, tree_edges)?;
    if splits.is_empty() {
        return Err(AlignmentError::InvalidArgument("no candidate splits available to refine with".into()));
    }

    let mut current = initial;
    let mut current_score = total_score(&current, config);
    let mut accepted = Vec::new();
    let mut rounds_run = 0usize;
    let mut outcome = RefinerOutcome::Converged;

    for round in 0..config.max_rounds {
        rounds_run = round + 1;
        let mut improved = false;

        for split in &splits {
            let half_a = build_split_mapping(&current, split.first_half(), backbone_lengths)?;
            let half_b = build_split_mapping(&current, split.second_half(), backbone_lengths)?;

            let candidate = match realigner.align_halves(&half_a, &half_b) {
                Ok(aln) => aln,
                Err(RealignError::Numerical(msg)) => {
                    log::warn!("refiner: rejecting split at round {round} after numerical realign failure: {msg}");
                    continue;
                }
            };

            let candidate_score = total_score(&candidate, config);
            if candidate_score > current_score {
                log::debug!(
                    "refiner: accepted split at round {round}, score {current_score} -> {candidate_score}"
                );
                accepted.push(AcceptedRound {
                    round,
                    split: split.clone(),
                    score_before: current_score,
                    score_after: candidate_score,
                });
                current = candidate;
                current_score = candidate_score;
                improved = true;
                break;
            }
        }

        if !improved {
            outcome = RefinerOutcome::Converged;
            break;
        }
        outcome = RefinerOutcome::RoundLimitReached;
    }

    Ok(RefinerReport { alignment: current, accepted, rounds_run, outcome })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AlwaysFailingRealigner;

    impl Realigner for AlwaysFailingRealigner {
        fn align_halves(
            &self,
            _half_a: &AlignmentSplitMapping,
            _half_b: &AlignmentSplitMapping,
        ) -> Result<Alignment, RealignError> {
            Err(RealignError::Numerical("synthetic failure".into()))
        }
    }

    fn three_entry_alignment() -> Alignment {
        Alignment::try_new(vec![vec![Some(0), Some(0), Some(0)], vec![Some(1), Some(1), Some(1)]]).unwrap()
    }

    #[test]
    fn converges_when_no_split_improves() {
        let aln = three_entry_alignment();
        let report =
            refine(aln, &[2, 2, 2], &AlwaysFailingRealigner, None, &RefinerConfig::default()).unwrap();
        assert_eq!(report.outcome, RefinerOutcome::Converged);
        assert!(report.accepted.is_empty());
    }

    #[test]
    fn rejects_numerical_failures_without_aborting() {
        let aln = three_entry_alignment();
        // every candidate split fails numerically; refiner must still return Ok.
        let report =
            refine(aln, &[2, 2, 2], &AlwaysFailingRealigner, None, &RefinerConfig::default()).unwrap();
        assert!(report.accepted.is_empty());
    }

    #[test]
    fn large_entry_count_uses_fallback_splits() {
        let rows: Vec<Vec<Option<u32>>> = vec![(0..9).map(Some).collect()];
        let aln = Alignment::try_new(rows).unwrap();
        let backbone_lengths = vec![1u32; 9];
        let report = refine(aln, &backbone_lengths, &AlwaysFailingRealigner, None, &RefinerConfig::default());
        assert!(report.is_ok());
    }

    #[test]
    fn rejects_refinement_with_fewer_than_two_entries() {
        let aln = Alignment::try_new(vec![vec![Some(0)]]).unwrap();
        let err = refine(aln, &[1], &AlwaysFailingRealigner, None, &RefinerConfig::default()).unwrap_err();
        assert!(matches!(err, AlignmentError::InvalidArgument(_)));
    }
}
