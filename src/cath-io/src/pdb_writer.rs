use std::fmt::Write as _;

use geometry::RigidTransform;
use structure::StructureRecord;

use crate::error::IoError;

/// Writes superposed structures as a PDB-format record stream: residue
/// ordering preserved, one `TER` between chains, coordinates replaced by
/// `T_i . x`.
///
/// Only the handful of ATOM columns this workspace actually carries (serial,
/// atom name, residue name placeholder, chain, residue number + insert code,
/// x/y/z) are emitted; columns this workspace never reads (occupancy,
/// B-factor, element) are filled with PDB-standard defaults.
pub struct SuperposedPdbWriter;

impl SuperposedPdbWriter {
    /// Renders `structure` with every Cα (and, when present, Cβ/N) atom
    /// transformed by `transform`, one `ATOM` line per resolved atom, `TER`
    /// terminating the chain list by emitting a `TER` whenever the chain
    /// label changes and once more at the end of the stream.
    pub fn write(structure: &StructureRecord, transform: &RigidTransform) -> Result<String, IoError> {
        let mut out = String::new();
        let mut serial: u32 = 1;
        let mut last_chain: Option<String> = None;

        for residue in structure.backbone_complete_residues() {
            let chain = residue.id().chain_label().to_string();
            if let Some(prev) = &last_chain {
                if prev != &chain {
                    writeln!(out, "TER").map_err(|e| IoError::InvalidArgument(e.to_string()))?;
                }
            }
            last_chain = Some(chain.clone());

            write_atom_line(&mut out, serial, "CA", &chain, residue.id().residue_number(), residue.id().insert_code(), transform.apply(&residue.ca()))?;
            serial += 1;
            if let Some(cb) = residue.cb() {
                write_atom_line(&mut out, serial, "CB", &chain, residue.id().residue_number(), residue.id().insert_code(), transform.apply(&cb))?;
                serial += 1;
            }
            if let Some(n) = residue.n() {
                write_atom_line(&mut out, serial, "N", &chain, residue.id().residue_number(), residue.id().insert_code(), transform.apply(&n))?;
                serial += 1;
            }
        }
        if last_chain.is_some() {
            writeln!(out, "TER").map_err(|e| IoError::InvalidArgument(e.to_string()))?;
        }
        Ok(out)
    }
}

#[allow(clippy::too_many_arguments)]
fn write_atom_line(
    out: &mut String,
    serial: u32,
    atom_name: &str,
    chain: &str,
    residue_number: i32,
    insert_code: Option<char>,
    coord: geometry::Coord,
) -> Result<(), IoError> {
    writeln!(
        out,
        "ATOM  {serial:>5} {atom_name:<4}{:<4}{chain:>1}{residue_number:>4}{:<1}   {:>8.3}{:>8.3}{:>8.3}  1.00  0.00",
        "UNK", insert_code.map_or(String::new(), |c| c.to_string()), coord.x(), coord.y(), coord.z(),
    )
    .map_err(|e| IoError::InvalidArgument(e.to_string()))
}

#[cfg(test)]
mod tests {
    use geometry::Coord;
    use structure::{RegionMask, Residue, ResidueId, SecondaryStructure};

    use super::*;

    fn sample_structure() -> StructureRecord {
        let r1 = Residue::new(
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
        let r2 = Residue::new(
            ResidueId::new("B", 1, None),
            'G',
            Coord::try_new(1.0, 0.0, 0.0).unwrap(),
            None,
            None,
            SecondaryStructure::Coil,
            0,
            None,
            None,
        );
        StructureRecord::new("test", vec![Some(r1), Some(r2)], RegionMask::All)
    }

    #[test]
    fn emits_ter_between_chains_and_at_the_end() {
        let structure = sample_structure();
        let text = SuperposedPdbWriter::write(&structure, &RigidTransform::IDENTITY).unwrap();
        let ter_count = text.lines().filter(|l| *l == "TER").count();
        assert_eq!(ter_count, 2);
        assert!(text.contains("ATOM"));
    }

    #[test]
    fn applies_the_transform_to_coordinates() {
        let structure = sample_structure();
        let translate = RigidTransform::new(geometry::Rotation::IDENTITY, Coord::try_new(10.0, 0.0, 0.0).unwrap());
        let text = SuperposedPdbWriter::write(&structure, &translate).unwrap();
        assert!(text.lines().any(|l| l.contains("10.000")));
    }
}
