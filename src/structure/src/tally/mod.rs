use ahash::AHashSet;

use crate::error::TallyError;
use crate::residue_id::ResidueId;

/// A sparse set of "always skippable" indices into the PDB residue list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitSet {
    indices: AHashSet<usize>,
}

impl BitSet {
    pub fn new() -> Self { Self::default() }

    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self { indices: indices.into_iter().collect() }
    }

    pub fn contains(&self, index: usize) -> bool { self.indices.contains(&index) }

    pub fn insert(&mut self, index: usize) { self.indices.insert(index); }
}

/// Options controlling how liberally [`tally`] may skip over PDB residues
/// that the coordinate stream does not mention.
#[derive(Debug, Clone, Default)]
pub struct TallyOptions {
    /// When `true`, the coord stream may omit PDB residues anywhere in the
    /// middle of the list without a corresponding `null` entry.
    pub permit_breaks_without_null_residues: bool,
    /// When `true`, unmatched PDB residues at the very start or the very
    /// end of the list are tolerated.
    pub permit_head_tail_break_without_null_residue: bool,
    /// PDB residues that may always be skipped, regardless of position.
    pub skippable_pdb_indices: BitSet,
}

fn validate_pdb_names(pdb_names: &[ResidueId]) -> Result<(), TallyError> {
    let mut seen = AHashSet::with_capacity(pdb_names.len());
    for id in pdb_names {
        if !seen.insert(id) {
            return Err(TallyError::InvalidArgument);
        }
    }
    Ok(())
}

fn validate_coord_names(coord_names: &[Option<ResidueId>]) -> Result<(), TallyError> {
    for i in 1..coord_names.len() {
        if coord_names[i - 1] == coord_names[i] {
            return Err(TallyError::ConsecutiveDuplicate(i));
        }
    }
    Ok(())
}

/// Aligns a PDB-derived residue list against a parallel coordinate-derived
/// residue list that may contain `null` gaps and/or legitimately omitted
/// residues, returning the monotonically increasing list of matched
/// `(pdb_index, coord_index)` pairs.
pub fn tally(
    pdb_names: &[ResidueId],
    coord_names: &[Option<ResidueId>],
    opts: &TallyOptions,
) -> Result<Vec<(usize, usize)>, TallyError> {
    validate_pdb_names(pdb_names)?;
    validate_coord_names(coord_names)?;

    let mut pairs = Vec::new();
    let mut pdb_idx = 0usize;

    for (coord_idx, coord_entry) in coord_names.iter().enumerate() {
        let Some(coord_id) = coord_entry else {
            continue;
        };

        loop {
            if pdb_idx >= pdb_names.len() {
                return Err(TallyError::Unmatched { coord_index: coord_idx, residue_id: coord_id.to_string() });
            }
            if &pdb_names[pdb_idx] == coord_id {
                pairs.push((pdb_idx, coord_idx));
                pdb_idx += 1;
                break;
            }

            let at_head = pairs.is_empty();
            let skip_permitted = opts.skippable_pdb_indices.contains(pdb_idx)
                || opts.permit_breaks_without_null_residues
                || (at_head && opts.permit_head_tail_break_without_null_residue);

            if !skip_permitted {
                return Err(TallyError::Unmatched { coord_index: coord_idx, residue_id: coord_id.to_string() });
            }
            pdb_idx += 1;
        }
    }

    let leftover = pdb_names.len() - pdb_idx;
    if leftover > 0 && !opts.permit_head_tail_break_without_null_residue {
        return Err(TallyError::UnmatchedTail(leftover));
    }

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: i32) -> ResidueId { ResidueId::new("A", n, None) }

    #[test]
    fn exact_match_with_no_gaps() {
        let pdb = vec![id(1), id(2), id(3)];
        let coord = vec![Some(id(1)), Some(id(2)), Some(id(3))];
        let result = tally(&pdb, &coord, &TallyOptions::default()).unwrap();
        assert_eq!(result, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn null_in_coord_stream_advances_only_coord_cursor() {
        let pdb = vec![id(1), id(2)];
        let coord = vec![Some(id(1)), None, Some(id(2))];
        let result = tally(&pdb, &coord, &TallyOptions::default()).unwrap();
        assert_eq!(result, vec![(0, 0), (1, 2)]);
    }

    #[test]
    fn duplicate_pdb_residue_is_invalid_argument() {
        let pdb = vec![id(1), id(1)];
        let coord = vec![Some(id(1))];
        assert_eq!(tally(&pdb, &coord, &TallyOptions::default()).unwrap_err(), TallyError::InvalidArgument);
    }

    #[test]
    fn consecutive_duplicate_coord_entries_reject() {
        let pdb = vec![id(1), id(2)];
        let coord = vec![Some(id(1)), Some(id(1))];
        assert_eq!(tally(&pdb, &coord, &TallyOptions::default()).unwrap_err(), TallyError::ConsecutiveDuplicate(1));
    }

    #[test]
    fn consecutive_null_entries_reject() {
        let pdb = vec![id(1)];
        let coord = vec![None, None];
        assert_eq!(tally(&pdb, &coord, &TallyOptions::default()).unwrap_err(), TallyError::ConsecutiveDuplicate(1));
    }

    #[test]
    fn mid_list_skip_requires_permit_or_skippable_index() {
        let pdb = vec![id(1), id(2), id(3)];
        let coord = vec![Some(id(1)), Some(id(3))];

        let strict = tally(&pdb, &coord, &TallyOptions::default()).unwrap_err();
        assert!(matches!(strict, TallyError::Unmatched { coord_index: 1, .. }));

        let mut opts = TallyOptions::default();
        opts.permit_breaks_without_null_residues = true;
        let result = tally(&pdb, &coord, &opts).unwrap();
        assert_eq!(result, vec![(0, 0), (2, 1)]);

        let mut opts2 = TallyOptions::default();
        opts2.skippable_pdb_indices = BitSet::from_indices([1]);
        let result2 = tally(&pdb, &coord, &opts2).unwrap();
        assert_eq!(result2, vec![(0, 0), (2, 1)]);
    }

    #[test]
    fn leading_unmatched_pdb_residue_needs_head_tail_permit() {
        let pdb = vec![id(0), id(1)];
        let coord = vec![Some(id(1))];

        assert!(tally(&pdb, &coord, &TallyOptions::default()).is_err());

        let mut opts = TallyOptions::default();
        opts.permit_head_tail_break_without_null_residue = true;
        let result = tally(&pdb, &coord, &opts).unwrap();
        assert_eq!(result, vec![(1, 0)]);
    }

    #[test]
    fn trailing_unmatched_pdb_residues_need_head_tail_permit() {
        let pdb = vec![id(1), id(2), id(3)];
        let coord = vec![Some(id(1))];

        let err = tally(&pdb, &coord, &TallyOptions::default()).unwrap_err();
        assert_eq!(err, TallyError::UnmatchedTail(2));

        let mut opts = TallyOptions::default();
        opts.permit_head_tail_break_without_null_residue = true;
        let result = tally(&pdb, &coord, &opts).unwrap();
        assert_eq!(result, vec![(0, 0)]);
    }
}
