//! Settings for an evolution run.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_population_size() -> usize {
    50
}

/// Parameters of an [crate::Afpo] population.
///
/// Every field is optional in the JSON file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AfpoConfig {
    /// Target number of candidates which survive each generation.
    #[serde(default = "default_population_size")]
    pub population_size: usize,

    /// Number of evaluation workers. Zero or missing uses every available CPU.
    #[serde(default)]
    pub threads: Option<usize>,

    /// Seed for the random number generator. Missing seeds from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for AfpoConfig {
    fn default() -> Self {
        Self {
            population_size: default_population_size(),
            threads: None,
            seed: None,
        }
    }
}

impl AfpoConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config: AfpoConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.population_size == 0 {
            return Err(Error::Config("population_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config: AfpoConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AfpoConfig::default());
        assert_eq!(config.population_size, 50);
        config.validate().unwrap();
    }

    #[test]
    fn load_file() {
        let path = std::env::temp_dir().join(format!("afpo_config_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"population_size": 21, "threads": 2, "seed": 7}"#).unwrap();
        let config = AfpoConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(
            config,
            AfpoConfig {
                population_size: 21,
                threads: Some(2),
                seed: Some(7),
            }
        );
    }

    #[test]
    fn rejects_bad_config() {
        assert!(matches!(
            AfpoConfig {
                population_size: 0,
                ..Default::default()
            }
            .validate(),
            Err(Error::Config(_))
        ));
        assert!(serde_json::from_str::<AfpoConfig>(r#"{"pop_size": 3}"#).is_err());
        assert!(matches!(
            AfpoConfig::load("/nonexistent/afpo.json"),
            Err(Error::Io(_))
        ));
    }
}
