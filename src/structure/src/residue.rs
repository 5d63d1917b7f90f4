use geometry::{Angle, Coord};
use serde::{Deserialize, Serialize};

use crate::residue_id::ResidueId;

/// Coarse secondary-structure assignment carried alongside each residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecondaryStructure {
    Alpha,
    Beta,
    Coil,
}

/// A single residue's coordinate record: identity, backbone atoms and the
/// derived quantities the alignment and superposition stages consume.
///
/// `cb` and `n` are optional because not every residue type or crystal
/// structure resolves them; `ca` is mandatory — a residue with no resolved
/// Cα is represented as a `null` slot in the enclosing stream, not as a
/// `Residue` with a missing coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Residue {
    id: ResidueId,
    amino_acid: char,
    ca: Coord,
    cb: Option<Coord>,
    n: Option<Coord>,
    secondary_structure: SecondaryStructure,
    accessible_surface_area: u16,
    phi: Option<Angle>,
    psi: Option<Angle>,
}

impl Residue {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ResidueId,
        amino_acid: char,
        ca: Coord,
        cb: Option<Coord>,
        n: Option<Coord>,
        secondary_structure: SecondaryStructure,
        accessible_surface_area: u16,
        phi: Option<Angle>,
        psi: Option<Angle>,
    ) -> Self {
        Self { id, amino_acid, ca, cb, n, secondary_structure, accessible_surface_area, phi, psi }
    }

    pub fn id(&self) -> &ResidueId { &self.id }
    pub fn amino_acid(&self) -> char { self.amino_acid }
    pub fn ca(&self) -> Coord { self.ca }
    pub fn cb(&self) -> Option<Coord> { self.cb }
    pub fn n(&self) -> Option<Coord> { self.n }
    pub fn secondary_structure(&self) -> SecondaryStructure { self.secondary_structure }
    pub fn accessible_surface_area(&self) -> u16 { self.accessible_surface_area }
    pub fn phi(&self) -> Option<Angle> { self.phi }
    pub fn psi(&self) -> Option<Angle> { self.psi }

    /// `true` when both backbone neighbours (N and Cβ) are resolved, i.e.
    /// this residue can contribute to a full-backbone superposition.
    pub fn has_complete_backbone(&self) -> bool {
        self.n.is_some() && self.cb.is_some()
    }
}

/// One slot of a `ResidueStream`: either a resolved residue or a `null`
/// marking a chain break / unresolvable entry at that position.
pub type ResidueStreamRecord = Option<Residue>;

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id_num: i32) -> Residue {
        Residue::new(
            ResidueId::new("A", id_num, None),
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

    #[test]
    fn incomplete_backbone_without_n_or_cb() {
        assert!(!sample(1).has_complete_backbone());
    }

    #[test]
    fn complete_backbone_requires_both_n_and_cb() {
        let mut r = sample(1);
        r.cb = Some(Coord::try_new(1.0, 0.0, 0.0).unwrap());
        assert!(!r.has_complete_backbone());
        r.n = Some(Coord::try_new(0.0, 1.0, 0.0).unwrap());
        assert!(r.has_complete_backbone());
    }
}
