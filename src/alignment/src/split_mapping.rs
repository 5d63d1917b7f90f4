use ahash::AHashMap;

use crate::alignment::Alignment;
use crate::error::AlignmentError;

/// The restriction of a full [`Alignment`](crate::Alignment) to one split
/// half, with extra rows inserted so every residue of every entry in the
/// half is represented in exactly one local row — including residues the
/// full alignment left unaligned. Inserted rows for one entry's run of
/// unaligned residues are contiguous and sit immediately before the next
/// aligned anchor for that entry (or after the last one, for a trailing
/// run).
#[derive(Debug, Clone)]
pub struct AlignmentSplitMapping {
    entries: Vec<usize>,
    grid: Vec<Vec<Option<u32>>>,
    original_row_of_local: Vec<Option<usize>>,
    position_to_local_row: Vec<AHashMap<u32, usize>>,
}

impl AlignmentSplitMapping {
    pub fn length(&self) -> usize { self.grid.len() }
    pub fn num_entries(&self) -> usize { self.entries.len() }
    pub fn entries(&self) -> &[usize] { &self.entries }

    fn local_entry_index(&self, entry: usize) -> Option<usize> {
        self.entries.iter().position(|&e| e == entry)
    }

    /// The original alignment row that local row `local_row` came from, or
    /// `None` if it was inserted to cover an otherwise-unaligned residue.
    pub fn index_of_original_index(&self, local_row: usize) -> Option<usize> {
        self.original_row_of_local[local_row]
    }

    pub fn position_in_structure(&self, entry: usize, local_row: usize) -> Option<u32> {
        let local_entry = self.local_entry_index(entry)?;
        self.grid[local_row][local_entry]
    }

    pub fn local_row_of_structure_index(&self, entry: usize, structure_idx: u32) -> Option<usize> {
        let local_entry = self.local_entry_index(entry)?;
        self.position_to_local_row[local_entry].get(&structure_idx).copied()
    }
}

/// Builds an [`AlignmentSplitMapping`] restricting `alignment` to
/// `entries_in_half`. `backbone_lengths[e]` is the total backbone-complete
/// residue count of entry `e` in the full (unrestricted) structure set.
///
/// Complexity: `O(alignment.length() * entries_in_half.len())`.
pub fn build_split_mapping(
    alignment: &Alignment,
    entries_in_half: &[usize],
    backbone_lengths: &[u32],
) -> Result<AlignmentSplitMapping, AlignmentError> {
    if entries_in_half.is_empty() {
        return Err(AlignmentError::InvalidArgument("split half must be non-empty".into()));
    }
    if backbone_lengths.len() != alignment.num_entries() {
        return Err(AlignmentError::InvalidArgument(
            "backbone_lengths must cover every entry of the full alignment".into(),
        ));
    }
    for &e in entries_in_half {
        if e >= alignment.num_entries() {
            return Err(AlignmentError::InvalidArgument(format!("entry {e} out of range")));
        }
    }

    let mut entries: Vec<usize> = entries_in_half.to_vec();
    entries.sort_unstable();
    entries.dedup();

    // Drop columns where every entry of the half is a gap.
    let mut core_rows: Vec<(usize, Vec<Option<u32>>)> = Vec::new();
    for row in 0..alignment.length() {
        let values: Vec<Option<u32>> = entries.iter().map(|&e| alignment.position_of(e, row)).collect();
        if values.iter().any(Option::is_some) {
            core_rows.push((row, values));
        }
    }

    let mut grid: Vec<Vec<Option<u32>>> = Vec::new();
    let mut original_row_of_local: Vec<Option<usize>> = Vec::new();
    let mut next_residue = vec![0u32; entries.len()];

    let gap_row = || vec![None; entries.len()];

    for (original_row, values) in &core_rows {
        for (local_entry, &pos) in values.iter().enumerate() {
            if let Some(p) = pos {
                for missing in next_residue[local_entry]..p {
                    let mut row = gap_row();
                    row[local_entry] = Some(missing);
                    grid.push(row);
                    original_row_of_local.push(None);
                }
                next_residue[local_entry] = p + 1;
            }
        }
        grid.push(values.clone());
        original_row_of_local.push(Some(*original_row));
    }

    for (local_entry, &entry) in entries.iter().enumerate() {
        let total = backbone_lengths[entry];
        for missing in next_residue[local_entry]..total {
            let mut row = gap_row();
            row[local_entry] = Some(missing);
            grid.push(row);
            original_row_of_local.push(None);
        }
    }

    let mut position_to_local_row = vec![AHashMap::default(); entries.len()];
    for (local_row, row) in grid.iter().enumerate() {
        for (local_entry, pos) in row.iter().enumerate() {
            if let Some(p) = pos {
                position_to_local_row[local_entry].insert(*p, local_row);
            }
        }
    }

    Ok(AlignmentSplitMapping { entries, grid, original_row_of_local, position_to_local_row })
}
