//! Настройки генерации набора данных.

use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::mutation::{BugSampler, Mutator};

/// Параметры генератора. Все поля необязательны в JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Доля пар, для которых пишется мутант, в процентах
    pub buggy_per_hundred: u32,
    /// Писать мутант для каждой пары
    pub balanced: bool,
    /// Зерно генератора; без него берётся энтропия ОС
    pub seed: Option<u64>,
    /// Не строить пары для методов без рёбер
    pub skip_empty_records: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            buggy_per_hundred: 10,
            balanced: false,
            seed: None,
            skip_empty_records: true,
        }
    }
}

impl GeneratorConfig {
    pub fn from_json_str(text: &str) -> GraphResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> GraphResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> GraphResult<()> {
        if self.buggy_per_hundred > 100 {
            return Err(GraphError::Config(format!(
                "buggy_per_hundred must be at most 100, got {}",
                self.buggy_per_hundred
            )));
        }
        Ok(())
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    pub fn sampler(&self) -> BugSampler {
        BugSampler::new(self.buggy_per_hundred, self.balanced)
    }

    pub fn mutator(&self) -> Mutator {
        Mutator::new().with_skip_empty_records(self.skip_empty_records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_object() {
        let config = GeneratorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.buggy_per_hundred, 10);
        assert!(config.skip_empty_records);
    }

    #[test]
    fn test_partial_config() {
        let config = GeneratorConfig::from_json_str(r#"{"balanced": true, "seed": 9}"#).unwrap();
        assert!(config.balanced);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.buggy_per_hundred, 10);
    }

    #[test]
    fn test_rate_above_hundred_is_rejected() {
        let err = GeneratorConfig::from_json_str(r#"{"buggy_per_hundred": 101}"#).unwrap_err();
        assert!(matches!(err, GraphError::Config(_)));
    }

    #[test]
    fn test_invalid_json() {
        let err = GeneratorConfig::from_json_str("{balanced").unwrap_err();
        assert!(matches!(err, GraphError::Json(_)));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = GeneratorConfig {
            seed: Some(1234),
            ..GeneratorConfig::default()
        };
        let a: u64 = config.rng().random();
        let b: u64 = config.rng().random();
        assert_eq!(a, b);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"buggy_per_hundred": 50}}"#).unwrap();
        let config = GeneratorConfig::from_path(file.path()).unwrap();
        assert_eq!(config.buggy_per_hundred, 50);

        let missing = GeneratorConfig::from_path("/nonexistent/prograph.json");
        assert!(matches!(missing, Err(GraphError::Io(_))));
    }
}
