use structure::ResidueId;

/// The capability set every supported molecular-graphics viewer exposes: a
/// fixed enum of implementations chosen by config, no runtime registration.
/// Each backend's header/load/colour-base/colour-pdb/colour-residues/
/// alignment-extras/footer emission maps onto the methods below.
pub trait ViewerBackend {
    /// Preamble emitted before anything else (e.g. disabling console
    /// feedback while structures load).
    fn emit_header(&self) -> String;

    /// Loads one named structure into the viewer.
    fn emit_load(&self, name: &str, pdb_text: &str) -> String;

    /// Colours every currently-loaded structure with a single named colour.
    fn emit_colour_base(&self, colour_name: &str) -> String;

    /// Colours one whole named structure.
    fn emit_colour_pdb(&self, colour_name: &str, pdb_name: &str) -> String;

    /// Colours a subset of one structure's residues. Batches long residue
    /// lists (most viewer command languages choke on or silently truncate
    /// an over-long selection string).
    fn emit_colour_residues(&self, colour_name: &str, pdb_name: &str, residues: &[ResidueId]) -> String;

    /// Inter-structure alignment annotations (distance lines between
    /// aligned Cα pairs, core/non-core selections, etc).
    fn emit_alignment_extras(&self, pair_names: &[(String, String)]) -> String;

    /// Closing commands (reset camera, restore feedback, display name).
    fn emit_footer(&self, display_name: &str) -> String;

    /// The file extension conventionally used for this viewer's script.
    fn file_extension(&self) -> &'static str;
}

const RESIDUE_BATCH_SIZE: usize = 150;

fn batched_residue_selection(pdb_name: &str, residues: &[ResidueId], quote: char) -> String {
    residues
        .chunks(RESIDUE_BATCH_SIZE)
        .map(|batch| {
            let ids = batch.iter().map(|id| format!("{}{}", id.residue_number(), id.insert_code().unwrap_or(' ').to_string().trim())).collect::<Vec<_>>().join("+");
            format!("{quote}{pdb_name}{quote} and resi {ids}")
        })
        .collect::<Vec<_>>()
        .join(" or ")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PymolViewer;

impl ViewerBackend for PymolViewer {
    fn emit_header(&self) -> String {
        "feedback disable,all,output\n".to_string()
    }

    fn emit_load(&self, name: &str, pdb_text: &str) -> String {
        format!("cmd.read_pdbstr(\"\"\"{}\"\"\",\"{name}\")\n", pdb_text.replace('\n', "\\\n"))
    }

    fn emit_colour_base(&self, colour_name: &str) -> String {
        format!("colour {colour_name}\n")
    }

    fn emit_colour_pdb(&self, colour_name: &str, pdb_name: &str) -> String {
        format!("colour {colour_name}, {pdb_name}\n")
    }

    fn emit_colour_residues(&self, colour_name: &str, pdb_name: &str, residues: &[ResidueId]) -> String {
        format!("colour {colour_name}, {}\n", batched_residue_selection(pdb_name, residues, '\''))
    }

    fn emit_alignment_extras(&self, pair_names: &[(String, String)]) -> String {
        let mut out = String::new();
        for (a, b) in pair_names {
            out.push_str(&format!("distance {a}_{b}_alignment, /{a}///CA/, /{b}///CA/\n"));
        }
        out.push_str("hide labels\nset dash_gap, 0.0\nset dash_color, black\nset dash_radius, 0.05\n");
        out
    }

    fn emit_footer(&self, display_name: &str) -> String {
        let mut out = "show cartoon\nzoom protein\nfeedback enable,all,output\n".to_string();
        if !display_name.is_empty() {
            out.push_str(&format!("print \"{display_name}\"\n"));
        }
        out
    }

    fn file_extension(&self) -> &'static str {
        ".pml"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChimeraViewer;

impl ViewerBackend for ChimeraViewer {
    fn emit_header(&self) -> String {
        PymolViewer.emit_header()
    }

    fn emit_load(&self, name: &str, pdb_text: &str) -> String {
        PymolViewer.emit_load(name, pdb_text)
    }

    fn emit_colour_base(&self, colour_name: &str) -> String {
        format!("colour {colour_name}\n")
    }

    fn emit_colour_pdb(&self, colour_name: &str, pdb_name: &str) -> String {
        format!("colour {colour_name}, {pdb_name}\n")
    }

    fn emit_colour_residues(&self, colour_name: &str, pdb_name: &str, residues: &[ResidueId]) -> String {
        format!("colour {colour_name}, {}\n", batched_residue_selection(pdb_name, residues, '\''))
    }

    fn emit_alignment_extras(&self, pair_names: &[(String, String)]) -> String {
        PymolViewer.emit_alignment_extras(pair_names)
    }

    fn emit_footer(&self, display_name: &str) -> String {
        let mut out = "show cartoon\nset cartoon_smooth_loops,1\nzoom protein\nfeedback enable,all,output\n".to_string();
        if !display_name.is_empty() {
            out.push_str(&format!("print \"{display_name}\"\n"));
        }
        out
    }

    fn file_extension(&self) -> &'static str {
        ".pml"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JmolViewer;

impl ViewerBackend for JmolViewer {
    fn emit_header(&self) -> String {
        String::new()
    }

    fn emit_load(&self, name: &str, pdb_text: &str) -> String {
        format!("load inline /* {name} */ \"{}\"\n", pdb_text.replace('\n', "|"))
    }

    fn emit_colour_base(&self, colour_name: &str) -> String {
        format!("color {colour_name}\n")
    }

    fn emit_colour_pdb(&self, colour_name: &str, pdb_name: &str) -> String {
        format!("select {pdb_name}\ncolor {colour_name}\n")
    }

    fn emit_colour_residues(&self, colour_name: &str, pdb_name: &str, residues: &[ResidueId]) -> String {
        format!("select {}\ncolor {colour_name}\n", batched_residue_selection(pdb_name, residues, '"'))
    }

    fn emit_alignment_extras(&self, pair_names: &[(String, String)]) -> String {
        let mut out = String::new();
        for (a, b) in pair_names {
            out.push_str(&format!("connect ({a}.CA) ({b}.CA)\n"));
        }
        out
    }

    fn emit_footer(&self, display_name: &str) -> String {
        if display_name.is_empty() {
            String::new()
        } else {
            format!("echo \"{display_name}\"\n")
        }
    }

    fn file_extension(&self) -> &'static str {
        ".jmol"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RasmolViewer;

impl ViewerBackend for RasmolViewer {
    fn emit_header(&self) -> String {
        String::new()
    }

    fn emit_load(&self, name: &str, pdb_text: &str) -> String {
        format!("# load {name}\nload inline\n{pdb_text}\n")
    }

    fn emit_colour_base(&self, colour_name: &str) -> String {
        format!("colour {colour_name}\n")
    }

    fn emit_colour_pdb(&self, colour_name: &str, pdb_name: &str) -> String {
        format!("select *{pdb_name}*\ncolour {colour_name}\n")
    }

    fn emit_colour_residues(&self, colour_name: &str, pdb_name: &str, residues: &[ResidueId]) -> String {
        format!("select {}\ncolour {colour_name}\n", batched_residue_selection(pdb_name, residues, '"'))
    }

    fn emit_alignment_extras(&self, _pair_names: &[(String, String)]) -> String {
        // RasMol has no distance/monitor scripting primitive the other
        // viewers share; alignment extras are a no-op here.
        String::new()
    }

    fn emit_footer(&self, display_name: &str) -> String {
        if display_name.is_empty() {
            String::new()
        } else {
            format!("# {display_name}\n")
        }
    }

    fn file_extension(&self) -> &'static str {
        ".ras"
    }
}

/// The fixed set of supported viewer back ends, selected by config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    Pymol,
    Chimera,
    Jmol,
    Rasmol,
}

impl Viewer {
    pub fn backend(self) -> Box<dyn ViewerBackend> {
        match self {
            Viewer::Pymol => Box::new(PymolViewer),
            Viewer::Chimera => Box::new(ChimeraViewer),
            Viewer::Jmol => Box::new(JmolViewer),
            Viewer::Rasmol => Box::new(RasmolViewer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_viewer_backend_produces_a_non_empty_load_command() {
        for viewer in [Viewer::Pymol, Viewer::Chimera, Viewer::Jmol, Viewer::Rasmol] {
            let backend = viewer.backend();
            assert!(!backend.emit_load("1abcA", "ATOM...").is_empty());
        }
    }

    #[test]
    fn residue_batching_splits_long_lists() {
        let residues: Vec<ResidueId> = (1..400).map(|n| ResidueId::new("A", n, None)).collect();
        let selection = batched_residue_selection("1abcA", &residues, '\'');
        assert_eq!(selection.matches(" or ").count(), 2);
    }

    #[test]
    fn file_extensions_are_distinct_per_viewer() {
        let exts: Vec<&str> =
            [Viewer::Pymol, Viewer::Chimera, Viewer::Jmol, Viewer::Rasmol].iter().map(|v| v.backend().file_extension()).collect();
        assert_eq!(exts, vec![".pml", ".pml", ".jmol", ".ras"]);
    }
}
