use crate::alignment::Alignment;
use crate::refiner::{RealignError, Realigner};
use crate::split_mapping::AlignmentSplitMapping;

/// A straightforward global (Needleman-Wunsch) pairwise aligner over two
/// split halves, used as the refiner's default [`Realigner`] strategy.
///
/// `pair_score` scores a candidate match between local row `i` of `half_a`
/// and local row `j` of `half_b`; it is free to consult whatever residue
/// features it likes (pairwise structural alignment scores, for instance,
/// are supplied by an external collaborator). `gap_penalty` is subtracted for
/// every unmatched row of either half.
pub struct NeedlemanWunschRealigner<F> {
    gap_penalty: f32,
    pair_score: F,
}

impl<F> NeedlemanWunschRealigner<F>
where
    F: Fn(&AlignmentSplitMapping, usize, &AlignmentSplitMapping, usize) -> f32,
{
    pub fn new(gap_penalty: f32, pair_score: F) -> Self {
        Self { gap_penalty, pair_score }
    }
}

impl<F> Realigner for NeedlemanWunschRealigner<F>
where
    F: Fn(&AlignmentSplitMapping, usize, &AlignmentSplitMapping, usize) -> f32,
{
    fn align_halves(
        &self,
        half_a: &AlignmentSplitMapping,
        half_b: &AlignmentSplitMapping,
    ) -> Result<Alignment, RealignError> {
        let (len_a, len_b) = (half_a.length(), half_b.length());

        // dp[i][j] = best score aligning the first i rows of half_a against
        // the first j rows of half_b. trace[i][j] records the move taken to
        // reach it, for traceback.
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Move {
            Diag,
            Up,
            Left,
        }

        let mut dp = vec![vec![0.0f32; len_b + 1]; len_a + 1];
        let mut trace = vec![vec![Move::Diag; len_b + 1]; len_a + 1];

        for i in 1..=len_a {
            dp[i][0] = dp[i - 1][0] - self.gap_penalty;
            trace[i][0] = Move::Up;
        }
        for j in 1..=len_b {
            dp[0][j] = dp[0][j - 1] - self.gap_penalty;
            trace[0][j] = Move::Left;
        }

        for i in 1..=len_a {
            for j in 1..=len_b {
                let match_score = dp[i - 1][j - 1] + (self.pair_score)(half_a, i - 1, half_b, j - 1);
                let up_score = dp[i - 1][j] - self.gap_penalty;
                let left_score = dp[i][j - 1] - self.gap_penalty;

                if match_score >= up_score && match_score >= left_score {
                    dp[i][j] = match_score;
                    trace[i][j] = Move::Diag;
                } else if up_score >= left_score {
                    dp[i][j] = up_score;
                    trace[i][j] = Move::Up;
                } else {
                    dp[i][j] = left_score;
                    trace[i][j] = Move::Left;
                }
            }
        }

        if !dp[len_a][len_b].is_finite() {
            return Err(RealignError::Numerical("realign DP produced a non-finite total score".to_string()));
        }

        let num_entries =
            half_a.entries().iter().chain(half_b.entries()).copied().max().map_or(0, |m| m + 1);

        let mut rows: Vec<Vec<Option<u32>>> = Vec::with_capacity(len_a + len_b);
        let (mut i, mut j) = (len_a, len_b);
        // At the boundary (i == 0 or j == 0) `trace` only ever holds `Up`
        // (moving up half_a's rows) or `Left` (moving along half_b's rows);
        // `Diag` is only ever recorded for interior cells with i > 0 && j > 0.
        while i > 0 || j > 0 {
            let mut row = vec![None; num_entries];
            let step = if i > 0 && j > 0 { trace[i][j] } else if i > 0 { Move::Up } else { Move::Left };
            match step {
                Move::Diag => {
                    for &entry in half_a.entries() {
                        row[entry] = half_a.position_in_structure(entry, i - 1);
                    }
                    for &entry in half_b.entries() {
                        row[entry] = half_b.position_in_structure(entry, j - 1);
                    }
                    i -= 1;
                    j -= 1;
                }
                Move::Up => {
                    for &entry in half_a.entries() {
                        row[entry] = half_a.position_in_structure(entry, i - 1);
                    }
                    i -= 1;
                }
                Move::Left => {
                    for &entry in half_b.entries() {
                        row[entry] = half_b.position_in_structure(entry, j - 1);
                    }
                    j -= 1;
                }
            }
            rows.push(row);
        }
        rows.reverse();

        Alignment::try_new(rows).map_err(|e| RealignError::Numerical(e.to_string()))
    }
}
