use structure::ResidueStreamRecord;

use crate::error::IoError;

/// The input contract the structure model and tally algorithm are built
/// against: a named source of residue records (one slot per position,
/// `None` marking a chain break or an unresolvable record), plus the
/// caller-side constraints a conforming PDB reader is expected to honour.
///
/// A conforming implementation recognises both gzip and compress magic
/// numbers on the underlying bytes, consumes at most one `MODEL` (the
/// configured index, default 1), and resolves partial occupancy by
/// `occupancy_rank` (`0` meaning "keep all" ranks, otherwise the 0-based
/// rank by descending occupancy). None of that is implemented here — PDB
/// parsing itself is a separate concern — but the contract is fixed so an
/// external reader can be plugged in unambiguously.
pub trait ResidueStream {
    /// A stable name for this stream (used in diagnostics and output headers).
    fn name(&self) -> &str;

    /// The full residue stream, in file order, one slot per position.
    fn residues(&self) -> Result<Vec<ResidueStreamRecord>, IoError>;

    /// The (0-indexed) model number this stream is restricted to, if the
    /// underlying source has `MODEL`/`ENDMDL` records.
    fn model_index(&self) -> usize {
        0
    }

    /// `0` means "keep every partial-occupancy rank"; otherwise the 0-based
    /// rank (by descending occupancy) to keep when multiple atoms share
    /// `(chain, residue number, insert code, atom name)`.
    fn occupancy_rank(&self) -> usize {
        0
    }
}

/// A fixed, already-parsed [`ResidueStream`], used by tests and by callers
/// that have already materialised residues through some other path.
#[derive(Debug, Clone)]
pub struct InMemoryResidueStream {
    name: String,
    residues: Vec<ResidueStreamRecord>,
}

impl InMemoryResidueStream {
    pub fn new(name: impl Into<String>, residues: Vec<ResidueStreamRecord>) -> Self {
        Self { name: name.into(), residues }
    }
}

impl ResidueStream for InMemoryResidueStream {
    fn name(&self) -> &str {
        &self.name
    }

    fn residues(&self) -> Result<Vec<ResidueStreamRecord>, IoError> {
        Ok(self.residues.clone())
    }
}

#[cfg(test)]
mod tests {
    use geometry::Coord;
    use structure::{Residue, ResidueId, SecondaryStructure};

    use super::*;

    #[test]
    fn in_memory_stream_round_trips_its_residues() {
        let residue = Residue::new(
            ResidueId::new("A", 1, None),
            'A',
            Coord::try_new(0.0, 0.0, 0.0).unwrap(),
            None,
            None,
            SecondaryStructure::Coil,
            0,
            None,
            None,
        );
        let stream = InMemoryResidueStream::new("1abcA", vec![Some(residue.clone()), None]);
        assert_eq!(stream.name(), "1abcA");
        assert_eq!(stream.residues().unwrap(), vec![Some(residue), None]);
        assert_eq!(stream.model_index(), 0);
        assert_eq!(stream.occupancy_rank(), 0);
    }
}
