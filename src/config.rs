use serde::{Deserialize, Serialize};

use alignment::{RefinerConfig, ScoringVariant};

/// Environment variable carrying a fallback CATH structure-data directory,
/// consulted only when `data_dirs_spec` is unset.
pub const CATH_TOOLS_DATA_DIR: &str = "CATH_TOOLS_DATA_DIR";

/// Plain, YAML-deserialisable configuration for the whole pipeline, kept
/// separate from any CLI option-parsing surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Upper bound on refiner rounds before giving up.
    pub refine_max_rounds: usize,
    /// Triangular scoring-window half-width.
    pub scoring_window_radius: usize,
    /// Which column-score variant the refiner's accept/reject decision uses.
    pub scoring_variant: ScoringVariant,
    /// Gap penalty handed to the default Needleman-Wunsch realigner.
    pub realign_gap_penalty: f32,
    /// Strictly-decreasing layer thresholds for hierarchical clustering
    /// for hierarchical clustering.
    pub cluster_thresholds: Vec<f64>,
    /// Explicit structure-data directory; falls back to
    /// [`CATH_TOOLS_DATA_DIR`] when unset.
    pub data_dirs_spec: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let refiner = RefinerConfig::default();
        Self {
            refine_max_rounds: refiner.max_rounds,
            scoring_window_radius: refiner.window_radius,
            scoring_variant: refiner.scoring_variant,
            realign_gap_penalty: 1.0,
            cluster_thresholds: vec![0.8, 0.6, 0.4],
            data_dirs_spec: None,
        }
    }
}

impl PipelineConfig {
    pub fn refiner_config(&self) -> RefinerConfig {
        RefinerConfig {
            max_rounds: self.refine_max_rounds,
            window_radius: self.scoring_window_radius,
            scoring_variant: self.scoring_variant,
        }
    }

    /// Resolves the structure-data directory: `data_dirs_spec` if set,
    /// otherwise the [`CATH_TOOLS_DATA_DIR`] environment variable.
    pub fn resolve_data_dir(&self) -> Option<String> {
        self.data_dirs_spec.clone().or_else(|| std::env::var(CATH_TOOLS_DATA_DIR).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_refiner_default() {
        let config = PipelineConfig::default();
        let refiner = config.refiner_config();
        assert_eq!(refiner.max_rounds, RefinerConfig::default().max_rounds);
        assert_eq!(refiner.window_radius, RefinerConfig::default().window_radius);
    }

    #[test]
    fn data_dir_falls_back_to_env() {
        let mut config = PipelineConfig::default();
        config.data_dirs_spec = None;
        std::env::set_var(CATH_TOOLS_DATA_DIR, "/tmp/cath-data");
        assert_eq!(config.resolve_data_dir(), Some("/tmp/cath-data".to_string()));
        std::env::remove_var(CATH_TOOLS_DATA_DIR);
    }

    #[test]
    fn explicit_data_dir_wins_over_env() {
        let mut config = PipelineConfig::default();
        config.data_dirs_spec = Some("/explicit".to_string());
        assert_eq!(config.resolve_data_dir(), Some("/explicit".to_string()));
    }

    #[test]
    fn round_trips_through_yaml() {
        let config = PipelineConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: PipelineConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.cluster_thresholds, config.cluster_thresholds);
    }
}
