use std::path::PathBuf;
use std::process;

use clap::Parser;
use located_error::LocatedError;
use log::{error, info};

use cath_superpose::PipelineConfig;

/// Thin executable boundary: verbosity flags feed the shared logger and a
/// YAML config file is loaded into a [`PipelineConfig`]. Residue-stream
/// ingestion, viewer dispatch and cluster-mapping file discovery are
/// external collaborators driven by whoever embeds this crate; this binary
/// only proves out the config-loading and error-boundary contract.
#[derive(Parser, Debug)]
#[clap(name = "cath-superpose", version)]
struct Cli {
    /// Set the verbosity level (-v -vv -vvv -vvvv).
    #[clap(short = 'v', long, parse(from_occurrences), global = true)]
    verbose: u8,
    /// Disable warnings; only errors are displayed.
    #[clap(short = 'q', long, global = true)]
    quiet: bool,
    /// Path to a YAML-serialised [`PipelineConfig`]. Defaults are used when
    /// omitted.
    #[clap(long)]
    config: Option<PathBuf>,
}

fn load_config(path: &Option<PathBuf>) -> Result<PipelineConfig, anyhow::Error> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let file = std::fs::File::open(path).with_loc(|| format!("IO: could not open config {path:?}"))?;
    serde_yaml::from_reader(file).with_loc(|| format!("Parse: could not deserialise config {path:?}"))
}

fn main() {
    let cli = Cli::parse();
    logger::Logger::init(cli.verbose + (!cli.quiet as u8));

    match load_config(&cli.config) {
        Ok(config) => {
            info!("loaded pipeline config: {config:?}");
        }
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    }
}
