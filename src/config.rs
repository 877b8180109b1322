use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::accuracy::{Function, KernelKind};
use crate::error::FixedError;

pub const DEFAULT_CONFIG_PATH: &str = "assets/sweep_config.ron";

/// Settings for the accuracy sweep binary.
///
/// Read once at startup. Nothing in the numeric core depends on it; the
/// seed only fixes which inputs the sweep draws.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SweepConfig {
    pub seed: u64,
    /// Inputs drawn per function and tier.
    pub samples: usize,
    pub kernels: Vec<KernelKind>,
    pub functions: Vec<Function>,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Where to write the compressed result snapshot, if anywhere.
    pub snapshot_path: Option<String>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            samples: 10_000,
            kernels: KernelKind::ALL.to_vec(),
            functions: Function::ALL.to_vec(),
            log_filter: "fixmath=info".to_string(),
            snapshot_path: None,
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<(), FixedError> {
        if self.samples == 0 {
            return Err(FixedError::InvalidConfig { reason: "samples must be > 0".into() });
        }
        if self.kernels.is_empty() {
            return Err(FixedError::InvalidConfig { reason: "no kernels selected".into() });
        }
        if self.functions.is_empty() {
            return Err(FixedError::InvalidConfig { reason: "no functions selected".into() });
        }
        Ok(())
    }

    pub fn from_ron(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: SweepConfig = ron::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }
}

/// Read and validate the sweep configuration without logging.
pub fn read_sweep_config(path: &str) -> Result<SweepConfig, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    SweepConfig::from_ron(&contents)
}

/// Log the outcome of [`read_sweep_config`], substituting the defaults on
/// failure.
pub fn config_or_default(path: &str, loaded: Result<SweepConfig, Box<dyn std::error::Error>>) -> SweepConfig {
    match loaded {
        Ok(config) => {
            info!("Loaded sweep config from {}", path);
            config
        }
        Err(e) => {
            error!("Failed to load sweep config {}: {}", path, e);
            error!("Using default SweepConfig");
            SweepConfig::default()
        }
    }
}

/// Load the sweep configuration, falling back to the defaults when the
/// file is missing, malformed or fails validation.
pub fn load_sweep_config(path: &str) -> SweepConfig {
    config_or_default(path, read_sweep_config(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SweepConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.kernels.len(), 2);
        assert_eq!(config.functions.len(), 16);
    }

    #[test]
    fn test_validate_rejects_empty_sweeps() {
        let mut config = SweepConfig::default();
        config.samples = 0;
        assert_eq!(
            config.validate(),
            Err(FixedError::InvalidConfig { reason: "samples must be > 0".into() })
        );

        let mut config = SweepConfig::default();
        config.kernels.clear();
        assert!(config.validate().is_err());

        let mut config = SweepConfig::default();
        config.functions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = SweepConfig::from_ron("(seed: 7, kernels: [Fix64])").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.kernels, vec![KernelKind::Fix64]);
        assert_eq!(config.samples, SweepConfig::default().samples);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = load_sweep_config("does/not/exist.ron");
        assert_eq!(config, SweepConfig::default());
    }
}
