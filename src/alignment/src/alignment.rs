use crate::error::AlignmentError;

/// One cell of an [`Alignment`]: the position this entry occupies at this
/// row in its backbone-complete residue list (`None` = gap), and an
/// optional per-cell score. A present score implies a present position.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    position: Option<u32>,
    score: Option<f32>,
}

impl Cell {
    const GAP: Cell = Cell { position: None, score: None };
}

/// A logical `length x num_entries` table of aligned residue positions.
///
/// Rows run along the alignment's length; entries are the structures (or
/// half-alignments, during refinement) being aligned. Each column (fixed
/// entry, varying row) must have strictly increasing positions, skipping
/// gaps.
#[derive(Debug, Clone)]
pub struct Alignment {
    length: usize,
    num_entries: usize,
    cells: Vec<Vec<Cell>>,
}

impl Alignment {
    /// Builds an alignment from a `length x num_entries` grid of positions,
    /// validating the per-entry monotonicity and NaN-free invariants.
    pub fn try_new(positions: Vec<Vec<Option<u32>>>) -> Result<Self, AlignmentError> {
        let length = positions.len();
        let num_entries = positions.first().map_or(0, Vec::len);
        if positions.iter().any(|row| row.len() != num_entries) {
            return Err(AlignmentError::InvalidArgument("all rows must have the same number of entries".into()));
        }

        for entry in 0..num_entries {
            let mut last: Option<u32> = None;
            for row in &positions {
                if let Some(pos) = row[entry] {
                    if let Some(prev) = last {
                        if pos <= prev {
                            return Err(AlignmentError::InvalidArgument(format!(
                                "entry {entry} position {pos} does not strictly increase after {prev}"
                            )));
                        }
                    }
                    last = Some(pos);
                }
            }
        }

        let cells = positions
            .into_iter()
            .map(|row| row.into_iter().map(|position| Cell { position, score: None }).collect())
            .collect();

        Ok(Self { length, num_entries, cells })
    }

    pub fn length(&self) -> usize { self.length }
    pub fn num_entries(&self) -> usize { self.num_entries }

    pub fn position_of(&self, entry: usize, row: usize) -> Option<u32> {
        self.cells[row][entry].position
    }

    pub fn score_of(&self, entry: usize, row: usize) -> Option<f32> {
        self.cells[row][entry].score
    }

    /// Sets the per-cell score at `(entry, row)`. Fails if no position is
    /// present there, since a present score implies a present position.
    pub fn set_score(&mut self, entry: usize, row: usize, score: f32) -> Result<(), AlignmentError> {
        if score.is_nan() {
            return Err(AlignmentError::InvalidArgument("score must not be NaN".into()));
        }
        let cell = &mut self.cells[row][entry];
        if cell.position.is_none() {
            return Err(AlignmentError::InvalidArgument(format!(
                "cannot set score at (entry {entry}, row {row}): no position present"
            )));
        }
        cell.score = Some(score);
        Ok(())
    }

    pub fn num_present_positions(&self, row: usize) -> usize {
        self.cells[row].iter().filter(|c| c.position.is_some()).count()
    }

    pub fn iter_entries_present_at(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        self.cells[row].iter().enumerate().filter(|(_, c)| c.position.is_some()).map(|(entry, _)| entry)
    }
}

impl Default for Cell {
    fn default() -> Self { Cell::GAP }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Alignment {
        // Two entries, three rows: entry 0 present throughout, entry 1 has a
        // gap at row 1.
        Alignment::try_new(vec![vec![Some(0), Some(0)], vec![Some(1), None], vec![Some(2), Some(1)]]).unwrap()
    }

    #[test]
    fn position_of_and_num_present_positions() {
        let aln = sample();
        assert_eq!(aln.position_of(0, 1), Some(1));
        assert_eq!(aln.position_of(1, 1), None);
        assert_eq!(aln.num_present_positions(1), 1);
        assert_eq!(aln.num_present_positions(0), 2);
    }

    #[test]
    fn iter_entries_present_at_skips_gaps() {
        let aln = sample();
        let present: Vec<usize> = aln.iter_entries_present_at(1).collect();
        assert_eq!(present, vec![0]);
    }

    #[test]
    fn rejects_non_increasing_positions() {
        let err = Alignment::try_new(vec![vec![Some(2)], vec![Some(1)]]).unwrap_err();
        assert!(matches!(err, AlignmentError::InvalidArgument(_)));
    }

    #[test]
    fn score_requires_position_present() {
        let mut aln = sample();
        assert!(aln.set_score(1, 1, 0.5).is_err());
        assert!(aln.set_score(1, 0, 0.5).is_ok());
        assert_eq!(aln.score_of(1, 0), Some(0.5));
    }
}
