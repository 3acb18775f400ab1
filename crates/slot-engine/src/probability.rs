//! Probability normalization, expected payout, and the inverse solver
//!
//! Every consumer of symbol weights goes through [`normalized_probs`] and
//! [`OutcomeTable`], so the spin executor's miss gate and the convolution's
//! miss category always agree on proportions.

use crate::config::{SPINS_PER_PLAY, SlotConfig};
use crate::error::{SlotError, SlotResult};
use crate::symbols::Symbol;

/// Percentage scale used by `Symbol::prob` and `miss_probability`
pub const PERCENT: f64 = 100.0;

/// Bisection steps for the inverse solver
const SOLVER_MAX_ITERATIONS: usize = 200;

/// Doublings allowed while bracketing the tilt parameter
const SOLVER_MAX_BRACKET_STEPS: usize = 64;

/// Normalize symbol weights to percentages summing to 100.
///
/// A zero (or empty) weight sum falls back to a uniform distribution instead
/// of dividing by zero. Weights are scaled by the largest one before summing,
/// so huge weights keep their proportions.
pub fn normalized_probs(symbols: &[Symbol]) -> Vec<f64> {
    if symbols.is_empty() {
        return Vec::new();
    }

    let weights: Vec<f64> = symbols
        .iter()
        .map(|s| if s.prob.is_finite() && s.prob > 0.0 { s.prob } else { 0.0 })
        .collect();
    let largest = weights.iter().copied().fold(0.0, f64::max);
    if largest <= 0.0 {
        let uniform = PERCENT / symbols.len() as f64;
        return vec![uniform; symbols.len()];
    }

    let scaled: Vec<f64> = weights.iter().map(|w| w / largest).collect();
    let total: f64 = scaled.iter().sum();
    scaled.iter().map(|w| w / total * PERCENT).collect()
}

/// Expected total payout over `spins` spins:
/// `spins * Σ(prob_i / 100 * payout_i)` with normalized probabilities.
///
/// The miss gate is not part of this figure; it describes the payout of a
/// play whose spins all pass the gate. See [`OutcomeTable::mean_payout`] for
/// the miss-weighted mean.
pub fn expected_total(symbols: &[Symbol], spins: u32) -> f64 {
    let per_spin: f64 = normalized_probs(symbols)
        .iter()
        .zip(symbols)
        .map(|(p, s)| p / PERCENT * s.effective_payout())
        .sum();
    spins as f64 * per_spin
}

/// One weighted symbol in an [`OutcomeTable`]
#[derive(Debug, Clone, Copy)]
pub struct WeightedSymbol<'a> {
    pub symbol: &'a Symbol,
    /// Normalized percentage among symbols
    pub weight: f64,
    /// Fraction of all spins (after the miss gate) that land on this symbol
    pub mass: f64,
}

/// Single-spin outcome categories: every symbol plus the miss category
#[derive(Debug, Clone)]
pub struct OutcomeTable<'a> {
    miss: f64,
    symbols: Vec<WeightedSymbol<'a>>,
}

impl<'a> OutcomeTable<'a> {
    pub fn from_config(config: &'a SlotConfig) -> Self {
        Self::new(&config.symbols, config.miss_probability)
    }

    /// Build from symbols and a miss percentage.
    ///
    /// Symbol masses fill the `100 - miss` share, scaled by normalized weight.
    pub fn new(symbols: &'a [Symbol], miss_probability: f64) -> Self {
        let miss = if miss_probability.is_finite() {
            (miss_probability / PERCENT).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let hit = 1.0 - miss;

        let symbols = normalized_probs(symbols)
            .into_iter()
            .zip(symbols)
            .map(|(weight, symbol)| WeightedSymbol {
                symbol,
                weight,
                mass: hit * weight / PERCENT,
            })
            .collect();

        Self { miss, symbols }
    }

    /// Probability that a spin is an unconditional miss
    pub fn miss_fraction(&self) -> f64 {
        self.miss
    }

    pub fn symbols(&self) -> &[WeightedSymbol<'a>] {
        &self.symbols
    }

    /// `(weight, symbol)` pairs for weighted choice after the miss gate
    pub fn choices(&self) -> Vec<(f64, &'a Symbol)> {
        self.symbols.iter().map(|w| (w.weight, w.symbol)).collect()
    }

    /// `(payout, mass)` per category, miss included, zero masses dropped
    pub fn categories(&self) -> Vec<(f64, f64)> {
        let mut categories: Vec<(f64, f64)> = self
            .symbols
            .iter()
            .filter(|w| w.mass > 0.0)
            .map(|w| (w.symbol.effective_payout(), w.mass))
            .collect();
        if self.miss > 0.0 {
            categories.push((0.0, self.miss));
        }
        categories
    }

    /// Mean payout of one spin, miss gate included
    pub fn mean_payout(&self) -> f64 {
        self.symbols
            .iter()
            .map(|w| w.mass * w.symbol.effective_payout())
            .sum()
    }
}

/// Validate the config, normalize its weights to percentages and refresh
/// `expected_total_5`.
pub fn normalize(config: &SlotConfig) -> SlotResult<SlotConfig> {
    config.validate()?;

    let mut normalized = config.clone();
    let probs = normalized_probs(&config.symbols);
    for (symbol, prob) in normalized.symbols.iter_mut().zip(probs) {
        symbol.prob = prob;
    }
    normalized.refresh_expected();
    Ok(normalized)
}

/// Solve symbol probabilities so the five-spin expected payout hits `target`.
///
/// Weights are exponentially tilted toward higher or lower payouts:
/// `p_i ∝ base_i * exp(θ * payout_i / max_payout)`, with θ found by
/// bisection. This keeps every probability non-negative, keeps zero-weight
/// symbols at zero, preserves relative weights among equal payouts, and makes
/// the probabilities sum to 100. Targets outside the attainable range are
/// clamped to the nearest attainable value. `expected_total_5` is always
/// recomputed from the resulting probabilities.
pub fn solve_inverse(config: &SlotConfig, target: f64) -> SlotResult<SlotConfig> {
    if config.symbols.is_empty() {
        return Err(SlotError::Configuration(
            "cannot solve probabilities for an empty symbol list".into(),
        ));
    }
    if !target.is_finite() || target < 0.0 {
        return Err(SlotError::Validation(format!(
            "target expected payout must be a non-negative number, got {target}"
        )));
    }

    let mut solved = normalize(config)?;
    let base: Vec<f64> = solved.symbols.iter().map(|s| s.prob).collect();
    let pays: Vec<f64> = solved.symbols.iter().map(Symbol::effective_payout).collect();

    let support = || base.iter().zip(&pays).filter(|(b, _)| **b > 0.0).map(|(_, p)| *p);
    let low = support().fold(f64::INFINITY, f64::min);
    let high = support().fold(f64::NEG_INFINITY, f64::max);

    let spins = SPINS_PER_PLAY as f64;
    let per_spin_target = target / spins;

    if high - low <= f64::EPSILON * high.max(1.0) {
        if (per_spin_target - low).abs() > 1e-9 {
            log::warn!(
                "all weighted symbols pay {low}; target {target} is unreachable, keeping weights"
            );
        }
        return Ok(solved);
    }

    let clamped = per_spin_target.clamp(low, high);
    if clamped != per_spin_target {
        log::warn!(
            "target {target} outside attainable range [{}, {}], clamping",
            low * spins,
            high * spins
        );
    }

    let scaled: Vec<f64> = pays.iter().map(|p| p / high).collect();
    let tilt = Tilt {
        base: &base,
        scaled: &scaled,
        pays: &pays,
    };

    let theta = tilt.solve(clamped);
    for (symbol, prob) in solved.symbols.iter_mut().zip(tilt.probs(theta)) {
        symbol.prob = prob;
    }
    solved.refresh_expected();

    log::debug!(
        "solved θ={theta:.6} for target {target}: expected_total_5={}",
        solved.expected_total_5
    );
    Ok(solved)
}

/// Exponential tilt of a base distribution
struct Tilt<'a> {
    base: &'a [f64],
    scaled: &'a [f64],
    pays: &'a [f64],
}

impl Tilt<'_> {
    /// Tilted percentages, computed in log space to stay finite for large θ
    fn probs(&self, theta: f64) -> Vec<f64> {
        let logs: Vec<Option<f64>> = self
            .base
            .iter()
            .zip(self.scaled)
            .map(|(b, x)| (*b > 0.0).then(|| b.ln() + theta * x))
            .collect();
        let max = logs
            .iter()
            .flatten()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        let raw: Vec<f64> = logs
            .iter()
            .map(|l| l.map_or(0.0, |l| (l - max).exp()))
            .collect();
        let total: f64 = raw.iter().sum();
        raw.iter().map(|w| w / total * PERCENT).collect()
    }

    fn mean(&self, theta: f64) -> f64 {
        self.probs(theta)
            .iter()
            .zip(self.pays)
            .map(|(p, pay)| p / PERCENT * pay)
            .sum()
    }

    /// Find θ with `mean(θ) == target`; `mean` is non-decreasing in θ
    fn solve(&self, target: f64) -> f64 {
        let mut lo = -1.0;
        let mut hi = 1.0;
        for _ in 0..SOLVER_MAX_BRACKET_STEPS {
            if self.mean(lo) <= target {
                break;
            }
            lo *= 2.0;
        }
        for _ in 0..SOLVER_MAX_BRACKET_STEPS {
            if self.mean(hi) >= target {
                break;
            }
            hi *= 2.0;
        }

        let tolerance = 1e-12 * target.abs().max(1.0);
        let mut mid = 0.0;
        for _ in 0..SOLVER_MAX_ITERATIONS {
            mid = 0.5 * (lo + hi);
            let mean = self.mean(mid);
            if (mean - target).abs() <= tolerance {
                break;
            }
            if mean < target {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        mid
    }
}
