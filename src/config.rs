//! Tunables for order-term construction, loadable from TOML.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calculus::DEFAULT_LIMIT_DEPTH;
use crate::error::{CasError, Result};
use crate::order::{BoundedCache, ConstructionCache, NoCache, UnboundedCache};
use crate::simplify::DEFAULT_EXPAND_POWER_LIMIT;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    /// `None` keeps every construction, `Some(0)` disables memoization.
    pub cache_capacity: Option<usize>,
    /// Recursion limit for the asymptotic engine behind every limit.
    pub limit_depth: usize,
    /// Largest integer power of a sum that expansion multiplies out.
    pub expand_power_limit: u32,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            cache_capacity: None,
            limit_depth: DEFAULT_LIMIT_DEPTH,
            expand_power_limit: DEFAULT_EXPAND_POWER_LIMIT,
        }
    }
}

impl OrderConfig {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input).map_err(|e| CasError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| CasError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| CasError::Config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if self.limit_depth == 0 {
            return Err(CasError::Config("limit_depth must be positive".into()));
        }
        Ok(())
    }

    pub fn build_cache(&self) -> Box<dyn ConstructionCache> {
        match self.cache_capacity {
            None => Box::new(UnboundedCache::new()),
            Some(0) => Box::new(NoCache),
            Some(capacity) => Box::new(BoundedCache::new(capacity)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config = OrderConfig::from_toml_str("limit_depth = 10").unwrap();
        assert_eq!(config.limit_depth, 10);
        assert_eq!(config.cache_capacity, None);
        assert_eq!(config.expand_power_limit, DEFAULT_EXPAND_POWER_LIMIT);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            OrderConfig::from_toml_str("limit_depth = \"deep\""),
            Err(CasError::Config(_))
        ));
        assert!(matches!(
            OrderConfig::from_toml_str("limit_depth = 0"),
            Err(CasError::Config(_))
        ));
    }

    #[test]
    fn capacity_selects_the_cache() {
        let config = OrderConfig {
            cache_capacity: Some(0),
            ..OrderConfig::default()
        };
        let cache = config.build_cache();
        assert!(cache.is_empty());
    }

    #[test]
    fn serializes_back_to_toml() {
        let config = OrderConfig {
            cache_capacity: Some(128),
            ..OrderConfig::default()
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(OrderConfig::from_toml_str(&text).unwrap(), config);
    }
}
