//! Aggregate payout distribution over N independent spins
//!
//! The single-spin distribution maps payout → probability mass over every
//! outcome category (paying symbols, reach symbols, miss). The N-spin
//! distribution is built spin by spin: each step convolves the running
//! cumulative-payout map with the single-spin map, merging paths that reach
//! the same total. Payouts are keyed in fixed-point micro-units so equal
//! totals always merge exactly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{SPINS_PER_PLAY, SlotConfig};
use crate::error::{SlotError, SlotResult};
use crate::parser::ConfigLimits;
use crate::probability::OutcomeTable;
use crate::symbols::Symbol;

/// Fixed-point units per payout point
pub const PAYOUT_SCALE: f64 = 1_000_000.0;

/// Allowed deviation of total mass from 1.0
pub const MASS_TOLERANCE: f64 = 1e-6;

/// Slack in units when snapping a threshold to the grid, absorbing float noise
const UNIT_SNAP: f64 = 1e-6;

/// Payout in fixed-point units; rejects payouts the unit grid cannot hold
fn to_units(payout: f64) -> SlotResult<i64> {
    let units = (payout * PAYOUT_SCALE).round();
    if !units.is_finite() || units.abs() >= i64::MAX as f64 {
        return Err(SlotError::Configuration(format!(
            "payout {payout} is outside the supported range"
        )));
    }
    Ok(units as i64)
}

/// Nearest value (in units) to `value`; saturates for thresholds off the grid
fn nearest_units(value: f64) -> i64 {
    (value * PAYOUT_SCALE).round() as i64
}

/// Smallest unit total that is ≥ `threshold`
fn lower_bound_units(threshold: f64) -> i64 {
    (threshold * PAYOUT_SCALE - UNIT_SNAP).ceil() as i64
}

/// Largest unit total that is ≤ `threshold`
fn upper_bound_units(threshold: f64) -> i64 {
    (threshold * PAYOUT_SCALE + UNIT_SNAP).floor() as i64
}

fn from_units(units: i64) -> f64 {
    units as f64 / PAYOUT_SCALE
}

/// Exact distribution of the total payout over a number of spins
#[derive(Debug, Clone, PartialEq)]
pub struct PayoutDistribution {
    spins: u32,
    masses: BTreeMap<i64, f64>,
}

impl PayoutDistribution {
    /// Distribution for `spins` spins of a config (miss category included).
    ///
    /// The config is validated first, so payouts are within
    /// [`ConfigLimits::max_payout`].
    pub fn for_config(config: &SlotConfig, spins: u32) -> SlotResult<Self> {
        config.validate()?;
        Self::for_table(&OutcomeTable::from_config(config), spins)
    }

    pub fn for_table(table: &OutcomeTable<'_>, spins: u32) -> SlotResult<Self> {
        Self::from_categories(&table.categories(), spins)
    }

    /// Build from `(payout, mass)` categories whose masses sum to 1.
    ///
    /// `spins` is coerced to at least one. Fails with
    /// [`SlotError::Configuration`] if a payout or running total leaves the
    /// fixed-point range, and with [`SlotError::NumericDrift`] if the result
    /// does not conserve mass.
    pub fn from_categories(categories: &[(f64, f64)], spins: u32) -> SlotResult<Self> {
        let spins = spins.max(1);

        let mut single: BTreeMap<i64, f64> = BTreeMap::new();
        for &(payout, mass) in categories {
            if mass > 0.0 {
                *single.entry(to_units(payout)?).or_insert(0.0) += mass;
            }
        }

        let mut masses = BTreeMap::from([(0_i64, 1.0)]);
        for _ in 0..spins {
            masses = convolve(&masses, &single)?;
        }

        let distribution = Self { spins, masses };
        distribution.check_mass()?;
        Ok(distribution)
    }

    pub fn spins(&self) -> u32 {
        self.spins
    }

    /// Number of distinct totals
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }

    /// `(total payout, probability)` pairs in ascending payout order
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.masses.iter().map(|(&k, &m)| (from_units(k), m))
    }

    pub fn total_mass(&self) -> f64 {
        self.masses.values().sum()
    }

    /// Mean total payout
    pub fn mean(&self) -> f64 {
        self.iter().map(|(v, m)| v * m).sum()
    }

    pub fn min_total(&self) -> f64 {
        self.masses.keys().next().map_or(0.0, |&k| from_units(k))
    }

    pub fn max_total(&self) -> f64 {
        self.masses.keys().next_back().map_or(0.0, |&k| from_units(k))
    }

    /// P(total ≥ threshold)
    pub fn prob_ge(&self, threshold: f64) -> f64 {
        let units = lower_bound_units(threshold);
        match (self.masses.keys().next(), self.masses.keys().next_back()) {
            (Some(&min), _) if units <= min => 1.0,
            (_, Some(&max)) if units > max => 0.0,
            _ => self.masses.range(units..).map(|(_, m)| m).sum::<f64>().min(1.0),
        }
    }

    /// P(total ≤ threshold)
    pub fn prob_le(&self, threshold: f64) -> f64 {
        let units = upper_bound_units(threshold);
        match (self.masses.keys().next(), self.masses.keys().next_back()) {
            (_, Some(&max)) if units >= max => 1.0,
            (Some(&min), _) if units < min => 0.0,
            _ => self.masses.range(..=units).map(|(_, m)| m).sum::<f64>().min(1.0),
        }
    }

    /// P(total == value)
    pub fn prob_eq(&self, value: f64) -> f64 {
        self.masses.get(&nearest_units(value)).copied().unwrap_or(0.0)
    }

    /// P(low ≤ total ≤ high), summed directly
    pub fn prob_between(&self, low: f64, high: f64) -> f64 {
        let (low, high) = (lower_bound_units(low), upper_bound_units(high));
        if low > high {
            return 0.0;
        }
        self.masses.range(low..=high).map(|(_, m)| m).sum::<f64>().min(1.0)
    }

    fn check_mass(&self) -> SlotResult<()> {
        let total = self.total_mass();
        if (total - 1.0).abs() > MASS_TOLERANCE {
            return Err(SlotError::NumericDrift {
                total,
                tolerance: MASS_TOLERANCE,
            });
        }
        Ok(())
    }
}

/// One convolution step: every running total shifted by every single-spin payout
fn convolve(
    running: &BTreeMap<i64, f64>,
    single: &BTreeMap<i64, f64>,
) -> SlotResult<BTreeMap<i64, f64>> {
    let mut next = BTreeMap::new();
    for (&total, &p) in running {
        for (&payout, &q) in single {
            let sum = total.checked_add(payout).ok_or_else(|| {
                SlotError::Configuration(
                    "total payout overflows the supported range; lower payout_3 or spins".into(),
                )
            })?;
            *next.entry(sum).or_insert(0.0) += p * q;
        }
    }
    Ok(next)
}

fn default_query_spins() -> i64 {
    SPINS_PER_PLAY as i64
}

/// Probability query parameters, as posted by the admin preview screen
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbabilityQuery {
    /// Override symbol set; the config's symbols are used when absent or empty
    #[serde(default)]
    pub symbols: Option<Vec<Symbol>>,
    /// Miss percentage for the override symbol set (defaults to 0)
    #[serde(default)]
    pub miss_probability: Option<f64>,
    /// Spin count, coerced to at least one
    #[serde(default = "default_query_spins")]
    pub spins: i64,
    #[serde(default)]
    pub threshold_min: f64,
    /// Upper bound; `None` means unbounded
    #[serde(default)]
    pub threshold_max: Option<f64>,
}

impl ProbabilityQuery {
    /// P(total ≥ min) over five spins
    pub fn at_least(threshold_min: f64) -> Self {
        Self {
            spins: default_query_spins(),
            threshold_min,
            ..Default::default()
        }
    }

    pub fn between(threshold_min: f64, threshold_max: f64) -> Self {
        Self {
            threshold_max: Some(threshold_max),
            ..Self::at_least(threshold_min)
        }
    }

    pub fn with_spins(mut self, spins: i64) -> Self {
        self.spins = spins;
        self
    }

    pub fn with_symbols(mut self, symbols: Vec<Symbol>, miss_probability: f64) -> Self {
        self.symbols = Some(symbols);
        self.miss_probability = Some(miss_probability);
        self
    }
}

/// Result of a probability query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityReport {
    /// P(total ≥ threshold_min)
    pub prob_ge: f64,
    /// P(total ≤ threshold_max), 1.0 when unbounded
    pub prob_le: f64,
    /// P(threshold_min ≤ total ≤ threshold_max)
    pub prob_range: f64,
    pub threshold_min: f64,
    pub threshold_max: Option<f64>,
    pub spins: u32,
}

/// Answer a probability query against a config (or the query's own symbols)
pub fn probability_query(
    config: &SlotConfig,
    query: &ProbabilityQuery,
) -> SlotResult<ProbabilityReport> {
    let limits = ConfigLimits::default();
    let spins = query.spins.max(1);
    if spins > limits.max_query_spins as i64 {
        return Err(SlotError::Validation(format!(
            "spins must be at most {}, got {}",
            limits.max_query_spins, spins
        )));
    }
    let spins = spins as u32;

    let tmin = query.threshold_min;
    if !tmin.is_finite() {
        return Err(SlotError::Validation(format!(
            "threshold_min must be a finite number, got {tmin}"
        )));
    }
    if let Some(tmax) = query.threshold_max {
        if !tmax.is_finite() {
            return Err(SlotError::Validation(format!(
                "threshold_max must be a finite number, got {tmax}"
            )));
        }
        if tmax < tmin {
            return Err(SlotError::Validation(format!(
                "threshold_max ({tmax}) is below threshold_min ({tmin})"
            )));
        }
    }

    let source = match &query.symbols {
        Some(symbols) if !symbols.is_empty() => {
            let miss = query.miss_probability.unwrap_or(0.0);
            SlotConfig::new(symbols.clone(), miss)
        }
        _ => config.clone(),
    };
    source.validate_with(&limits)?;

    let distribution = PayoutDistribution::for_table(&OutcomeTable::from_config(&source), spins)?;
    let prob_ge = distribution.prob_ge(tmin);
    let prob_le = query
        .threshold_max
        .map_or(1.0, |tmax| distribution.prob_le(tmax));
    let prob_range = (prob_le - (1.0 - prob_ge)).clamp(0.0, 1.0);

    log::debug!(
        "probability query: spins={spins} tmin={tmin} tmax={:?} support={} → ge={prob_ge:.6} le={prob_le:.6}",
        query.threshold_max,
        distribution.len()
    );

    Ok(ProbabilityReport {
        prob_ge,
        prob_le,
        prob_range,
        threshold_min: tmin,
        threshold_max: query.threshold_max,
        spins,
    })
}

/// P(total ≥ threshold) over `spins` spins of a config
pub fn prob_total_ge(config: &SlotConfig, spins: u32, threshold: f64) -> SlotResult<f64> {
    Ok(PayoutDistribution::for_config(config, spins)?.prob_ge(threshold))
}

/// P(total ≤ threshold) over `spins` spins of a config
pub fn prob_total_le(config: &SlotConfig, spins: u32, threshold: f64) -> SlotResult<f64> {
    Ok(PayoutDistribution::for_config(config, spins)?.prob_le(threshold))
}
