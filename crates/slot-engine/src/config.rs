//! Slot configuration

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::parser::ConfigLimits;
use crate::probability;
use crate::symbols::{Symbol, SymbolPool};

/// Spins executed per play
pub const SPINS_PER_PLAY: u32 = 5;

/// Reels rendered per spin
pub const REEL_COUNT: usize = 3;

fn default_reels() -> u8 {
    REEL_COUNT as u8
}

fn default_base_bet() -> u32 {
    1
}

fn default_expected_total_5() -> f64 {
    100.0
}

/// Configuration for one slot instance (global default or per-store override)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Symbol set, in display order
    pub symbols: Vec<Symbol>,
    /// Reel count (spins always render three reels)
    #[serde(default = "default_reels")]
    pub reels: u8,
    /// Bet multiplier (stored for the web layer)
    #[serde(default = "default_base_bet")]
    pub base_bet: u32,
    /// Expected total payout over five spins, derived from symbol probabilities
    #[serde(default = "default_expected_total_5")]
    pub expected_total_5: f64,
    /// Percentage chance that a spin is an unconditional miss
    #[serde(default)]
    pub miss_probability: f64,
}

impl SlotConfig {
    /// Create a config with derived fields computed
    pub fn new(symbols: Vec<Symbol>, miss_probability: f64) -> Self {
        let expected_total_5 = probability::expected_total(&symbols, SPINS_PER_PLAY);
        Self {
            symbols,
            reels: default_reels(),
            base_bet: default_base_bet(),
            expected_total_5,
            miss_probability,
        }
    }

    /// Recompute `expected_total_5` from the current symbol weights
    pub fn refresh_expected(&mut self) {
        self.expected_total_5 = probability::expected_total(&self.symbols, SPINS_PER_PLAY);
    }

    /// Miss probability as a fraction in [0, 1]
    pub fn miss_fraction(&self) -> f64 {
        (self.miss_probability / 100.0).clamp(0.0, 1.0)
    }

    pub fn pool(&self) -> SymbolPool<'_> {
        SymbolPool::new(&self.symbols)
    }

    pub fn symbol(&self, id: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.id == id)
    }

    /// Validate with default limits
    pub fn validate(&self) -> SlotResult<()> {
        self.validate_with(&ConfigLimits::default())
    }

    /// Reject configurations that cannot be played.
    ///
    /// Runs at save time so spins never discover an unplayable symbol set.
    pub fn validate_with(&self, limits: &ConfigLimits) -> SlotResult<()> {
        if self.symbols.is_empty() {
            return Err(SlotError::Configuration(
                "at least one symbol is required".into(),
            ));
        }

        if self.symbols.len() > limits.max_symbols {
            return Err(SlotError::Configuration(format!(
                "Too many symbols: {} > {}",
                self.symbols.len(),
                limits.max_symbols
            )));
        }

        let mut seen = HashSet::new();
        for symbol in &self.symbols {
            if symbol.id.is_empty() {
                return Err(SlotError::Configuration("symbol id must not be empty".into()));
            }
            if symbol.id.len() > limits.max_id_length || symbol.label.len() > limits.max_label_length
            {
                return Err(SlotError::Configuration(format!(
                    "symbol '{}': id or label too long",
                    symbol.id
                )));
            }
            if !seen.insert(symbol.id.as_str()) {
                return Err(SlotError::Configuration(format!(
                    "duplicate symbol id '{}'",
                    symbol.id
                )));
            }
            if !symbol.payout_3.is_finite() || symbol.payout_3 < 0.0 {
                return Err(SlotError::Configuration(format!(
                    "symbol '{}': payout_3 must be a non-negative number, got {}",
                    symbol.id, symbol.payout_3
                )));
            }
            if symbol.payout_3 > limits.max_payout {
                return Err(SlotError::Configuration(format!(
                    "symbol '{}': payout_3 {} exceeds limit {}",
                    symbol.id, symbol.payout_3, limits.max_payout
                )));
            }
            if !symbol.prob.is_finite() || symbol.prob < 0.0 {
                return Err(SlotError::Configuration(format!(
                    "symbol '{}': prob must be a non-negative number, got {}",
                    symbol.id, symbol.prob
                )));
            }
        }

        let pool = self.pool();
        if !pool.has_normal() {
            return Err(SlotError::Configuration(
                "at least one non-reach symbol is required to fill the reels".into(),
            ));
        }

        for reach in pool.reach() {
            if pool.find_normal(reach.reach_target()).is_none() {
                log::warn!(
                    "reach symbol '{}' targets unknown symbol '{}', it will display itself",
                    reach.id,
                    reach.reach_target()
                );
            }
        }

        if !self.miss_probability.is_finite() || !(0.0..=100.0).contains(&self.miss_probability) {
            return Err(SlotError::Configuration(format!(
                "miss_probability must be within [0, 100], got {}",
                self.miss_probability
            )));
        }

        if self.reels as usize != REEL_COUNT {
            log::warn!(
                "reels = {} is stored as-is; spins always render {} reels",
                self.reels,
                REEL_COUNT
            );
        }

        Ok(())
    }
}

impl Default for SlotConfig {
    /// Sample configuration used when no store override exists
    fn default() -> Self {
        let symbols = vec![
            Symbol::normal("seven", "7", 100.0, 5.0).with_color("#e53935"),
            Symbol::normal("bell", "Bell", 50.0, 10.0).with_color("#fdd835"),
            Symbol::normal("melon", "Melon", 30.0, 15.0).with_color("#43a047"),
            Symbol::normal("cherry", "Cherry", 20.0, 25.0).with_color("#d81b60"),
            Symbol::normal("grape", "Grape", 10.0, 30.0).with_color("#8e24aa"),
            Symbol::reach("reach_seven", "7", "seven", 15.0).with_color("#e53935"),
        ];
        Self::new(symbols, 20.0)
    }
}
