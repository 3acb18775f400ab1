//! Prize tiers — score ranges mapped to store prizes

use serde::{Deserialize, Serialize};

use crate::config::{SPINS_PER_PLAY, SlotConfig};
use crate::distribution::PayoutDistribution;
use crate::error::{SlotError, SlotResult};

/// Prize table, checked in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrizeTable {
    pub tiers: Vec<PrizeTier>,
}

impl PrizeTable {
    pub fn new(tiers: Vec<PrizeTier>) -> Self {
        Self { tiers }
    }

    /// Store defaults used when a store has not configured prizes
    pub fn standard() -> Self {
        Self {
            tiers: vec![
                PrizeTier::open("Grand prize", "Full course with all-you-can-drink", 500.0),
                PrizeTier::new("1st prize", "Three popular dishes", 300.0, 499.0),
                PrizeTier::new("2nd prize", "Two popular dishes", 200.0, 299.0),
                PrizeTier::new("3rd prize", "One meat dish and one drink", 100.0, 199.0),
                PrizeTier::new("4th prize", "One meat dish", 50.0, 99.0),
                PrizeTier::new("5th prize", "A drink or ice cream", 0.0, 49.0),
            ],
        }
    }

    /// First tier containing `score`.
    ///
    /// Scores are truncated to whole points before matching, so a total of
    /// 49.5 counts as 49.
    pub fn prize_for(&self, score: f64) -> Option<&PrizeTier> {
        self.tier_index(score).map(|index| &self.tiers[index])
    }

    fn tier_index(&self, score: f64) -> Option<usize> {
        let score = score.trunc();
        self.tiers.iter().position(|t| t.contains(score))
    }

    /// Order tiers by `min_score`, highest first
    pub fn sort_descending(&mut self) {
        self.tiers.sort_by(|a, b| b.min_score.total_cmp(&a.min_score));
    }

    /// Reject tiers with inverted or non-finite bounds
    pub fn validate(&self) -> SlotResult<()> {
        for tier in &self.tiers {
            let bad_max = tier
                .max_score
                .is_some_and(|max| !max.is_finite() || max < tier.min_score);
            if !tier.min_score.is_finite() || bad_max {
                return Err(SlotError::Configuration(format!(
                    "prize '{}': invalid score range",
                    tier.rank
                )));
            }
        }
        Ok(())
    }

    /// Exact chance of each tier over one play of `config`.
    ///
    /// A total that matches an earlier tier is not counted again for later
    /// overlapping tiers, mirroring [`PrizeTable::prize_for`].
    pub fn odds(&self, config: &SlotConfig) -> SlotResult<Vec<PrizeOdds>> {
        self.validate()?;
        let distribution = PayoutDistribution::for_config(config, SPINS_PER_PLAY)?;

        let mut odds: Vec<PrizeOdds> = self
            .tiers
            .iter()
            .map(|tier| PrizeOdds {
                rank: tier.rank.clone(),
                name: tier.name.clone(),
                probability: 0.0,
            })
            .collect();

        for (total, mass) in distribution.iter() {
            if let Some(index) = self.tier_index(total) {
                odds[index].probability += mass;
            }
        }
        Ok(odds)
    }
}

impl Default for PrizeTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// A single prize tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeTier {
    /// Minimum score (inclusive)
    pub min_score: f64,
    /// Maximum score (inclusive); unbounded when absent
    #[serde(default)]
    pub max_score: Option<f64>,
    /// Rank shown to the customer (e.g. "1st prize")
    pub rank: String,
    /// Prize description
    pub name: String,
}

impl PrizeTier {
    pub fn new(rank: impl Into<String>, name: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            min_score: min,
            max_score: Some(max),
            rank: rank.into(),
            name: name.into(),
        }
    }

    /// Tier with no upper bound
    pub fn open(rank: impl Into<String>, name: impl Into<String>, min: f64) -> Self {
        Self {
            min_score: min,
            max_score: None,
            rank: rank.into(),
            name: name.into(),
        }
    }

    pub fn contains(&self, score: f64) -> bool {
        match self.max_score {
            Some(max) => self.min_score <= score && score <= max,
            None => score >= self.min_score,
        }
    }

    pub fn prize(&self) -> Prize {
        Prize {
            rank: self.rank.clone(),
            name: self.name.clone(),
        }
    }
}

/// Prize awarded to a play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prize {
    pub rank: String,
    pub name: String,
}

/// Probability of landing in a prize tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeOdds {
    pub rank: String,
    pub name: String,
    pub probability: f64,
}
