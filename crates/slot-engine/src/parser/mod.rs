//! Config Parser — parse store slot configurations from JSON
//!
//! Store owners edit symbol tables in a browser form, so every document is
//! untrusted. The parser enforces size limits before a config is stored or
//! played.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let parser = ConfigParser::new();
//! let config = parser.parse_json(json_string)?;
//! ```

use serde_json::error::Category;

use crate::config::SlotConfig;
use crate::distribution::ProbabilityQuery;
use crate::error::{SlotError, SlotResult};
use crate::prize::PrizeTable;

/// Config parser
#[derive(Debug, Clone, Default)]
pub struct ConfigParser {
    /// Validation limits
    pub limits: ConfigLimits,
}

/// Parsing limits for security
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    pub max_symbols: usize,
    pub max_id_length: usize,
    pub max_label_length: usize,
    pub max_payout: f64,
    /// Largest spin count accepted by probability queries
    pub max_query_spins: u32,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_symbols: 50,
            max_id_length: 64,
            max_label_length: 256,
            max_payout: 1_000_000.0,
            max_query_spins: 50,
        }
    }
}

impl ConfigParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Create parser with custom limits
    pub fn with_limits(limits: ConfigLimits) -> Self {
        Self { limits }
    }

    /// Parse and validate a slot config.
    ///
    /// The stored `expected_total_5` is recomputed, so a stale value in the
    /// document never survives parsing.
    pub fn parse_json(&self, json: &str) -> SlotResult<SlotConfig> {
        let mut config: SlotConfig = from_json(json)?;
        config.validate_with(&self.limits)?;
        config.refresh_expected();
        Ok(config)
    }

    /// Parse a prize table, ordered by `min_score` from highest to lowest
    pub fn parse_prizes(&self, json: &str) -> SlotResult<PrizeTable> {
        let mut table: PrizeTable = from_json(json)?;
        if table.tiers.len() > self.limits.max_symbols {
            return Err(SlotError::Configuration(format!(
                "Too many prize tiers: {} > {}",
                table.tiers.len(),
                self.limits.max_symbols
            )));
        }
        table.validate()?;
        table.sort_descending();
        Ok(table)
    }

    /// Parse a probability query.
    ///
    /// Spin bounds and threshold checks happen when the query runs.
    pub fn parse_query(&self, json: &str) -> SlotResult<ProbabilityQuery> {
        from_json(json)
    }

    /// Serialize a config for storage
    pub fn to_json(&self, config: &SlotConfig) -> SlotResult<String> {
        Ok(serde_json::to_string_pretty(config)?)
    }
}

/// Decode JSON, reporting schema problems as configuration errors
fn from_json<T: serde::de::DeserializeOwned>(json: &str) -> SlotResult<T> {
    serde_json::from_str(json).map_err(|e| match e.classify() {
        Category::Data => SlotError::Configuration(e.to_string()),
        _ => SlotError::Json(e.to_string()),
    })
}
