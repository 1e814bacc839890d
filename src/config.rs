//! Miner configuration.
//!
//! ```toml
//! max_len = 3
//! counting = "tidset"
//!
//! [support]
//! absolute = 2
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{AprioriError, Result},
    itemsets::count::CountingStrategy,
    support::SupportThreshold,
    types::ItemsetLength,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MinerConfig {
    #[serde(default)]
    pub support: SupportConfig,

    /// Largest itemset size to search for.
    #[serde(default)]
    pub max_len: Option<ItemsetLength>,

    #[serde(default)]
    pub counting: CountingStrategy,
}

/// Exactly one of the two fields must be set; that rule is checked by
/// [`SupportConfig::resolve`], not while parsing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupportConfig {
    pub absolute: Option<usize>,
    pub relative: Option<f64>,
}

impl SupportConfig {
    pub fn resolve(&self) -> Result<SupportThreshold> {
        SupportThreshold::from_options(self.absolute, self.relative)
    }
}

impl MinerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: MinerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading miner configuration");
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.support.resolve()?;
        if self.max_len == Some(0) {
            return Err(AprioriError::InvalidConfiguration(
                "`max_len` must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
