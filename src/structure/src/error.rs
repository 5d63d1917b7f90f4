use thiserror::Error;

#[derive(Error, Debug)]
pub enum StructureError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TallyError {
    #[error("pdb residue list contains a null or duplicate residue id")]
    InvalidArgument,

    #[error("coord residue list has consecutive duplicate entries at index {0}")]
    ConsecutiveDuplicate(usize),

    #[error("coord residue {coord_index} ({residue_id}) could not be matched against the pdb residue list")]
    Unmatched { coord_index: usize, residue_id: String },

    #[error("{0} pdb residues at the end of the list were never matched")]
    UnmatchedTail(usize),
}
