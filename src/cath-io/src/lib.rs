//! Output-side collaborators for the superposition/alignment/clustering
//! pipeline: the residue-stream input contract, a PDB-text writer for
//! superposed structures, the viewer-script backends, the cluster-mapping
//! input parser, and string-encoded JSON (de)serialisation.

mod cluster_mapping;
mod error;
mod json;
mod pdb_writer;
mod residue_stream;
mod viewer;

pub use cluster_mapping::{ClusterDomains, ClusterMappingParser, Segment};
pub use error::IoError;
pub use json::{
    alignment_from_json, alignment_to_json, coord_from_json, coord_to_json, hierarchy_from_json,
    hierarchy_to_json, rotation_from_json, rotation_to_json, superposition_from_json,
    superposition_to_json,
};
pub use pdb_writer::SuperposedPdbWriter;
pub use residue_stream::{InMemoryResidueStream, ResidueStream};
pub use viewer::{ChimeraViewer, JmolViewer, PymolViewer, RasmolViewer, Viewer, ViewerBackend};
