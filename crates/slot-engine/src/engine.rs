//! Slot engine — spin execution

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::choice::{choice_by_prob, choose_uniform};
use crate::config::{SPINS_PER_PLAY, SlotConfig};
use crate::error::{SlotError, SlotResult};
use crate::probability::{self, OutcomeTable};
use crate::spin::{PlayResult, SpinKind, SpinRecord};
use crate::symbols::SymbolPool;

/// Slot engine
///
/// Holds only the random number generator. Configs are passed in per play,
/// so one engine can serve any number of stores.
pub struct SlotEngine<R: Rng = StdRng> {
    rng: R,
}

impl SlotEngine<StdRng> {
    /// Engine seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Seeded engine for reproducible results
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Reseed the RNG
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

impl Default for SlotEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SlotEngine<R> {
    /// Engine driven by a caller-supplied RNG
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Execute one play: five spins with reel displays and total payout
    pub fn play(&mut self, config: &SlotConfig) -> SlotResult<PlayResult> {
        config.validate()?;

        let table = OutcomeTable::from_config(config);
        let pool = config.pool();

        let mut spins = Vec::with_capacity(SPINS_PER_PLAY as usize);
        for _ in 0..SPINS_PER_PLAY {
            spins.push(self.spin_once(&table, &pool)?);
        }

        let expected = probability::expected_total(&config.symbols, SPINS_PER_PLAY);
        let result = PlayResult::new(spins, expected);

        log::debug!(
            "play: total={} wins={} reaches={} misses={}",
            result.total_payout,
            result.count(SpinKind::Win),
            result.count(SpinKind::Reach),
            result.count(SpinKind::Miss)
        );
        Ok(result)
    }

    /// Execute a single spin.
    ///
    /// The miss gate fires first; otherwise a symbol is drawn by weight and
    /// either wins (normal symbol) or produces a reach display.
    pub fn spin_once(
        &mut self,
        table: &OutcomeTable<'_>,
        pool: &SymbolPool<'_>,
    ) -> SlotResult<SpinRecord> {
        if self.rng.random::<f64>() < table.miss_fraction() {
            return self.miss(pool);
        }

        let choices = table.choices();
        let drawn = *choice_by_prob(&mut self.rng, &choices).ok_or_else(|| {
            SlotError::Configuration("no symbol has a positive probability".into())
        })?;

        if !drawn.is_reach {
            return Ok(SpinRecord::win(drawn));
        }

        if !pool.has_normal() {
            return Err(no_normal_symbols());
        }
        let shown = pool.impersonated(drawn);
        let others = pool.normal_except(&shown.id);
        let third = choose_uniform(&mut self.rng, &others)
            .copied()
            .unwrap_or(shown);
        Ok(SpinRecord::reach(shown, third))
    }

    /// Miss display: reels 1 and 2 differ when the pool allows, reel 3 is free
    fn miss(&mut self, pool: &SymbolPool<'_>) -> SlotResult<SpinRecord> {
        let normal = pool.normal();
        let reel1 = *choose_uniform(&mut self.rng, normal).ok_or_else(no_normal_symbols)?;
        let others = pool.normal_except(&reel1.id);
        let reel2 = choose_uniform(&mut self.rng, &others)
            .copied()
            .unwrap_or(reel1);
        let reel3 = *choose_uniform(&mut self.rng, normal).ok_or_else(no_normal_symbols)?;
        Ok(SpinRecord::miss(reel1, reel2, reel3))
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // BATCH SIMULATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Run `plays` plays and collect session statistics
    pub fn simulate(&mut self, config: &SlotConfig, plays: u64) -> SlotResult<SessionStats> {
        let mut stats = SessionStats::default();
        for _ in 0..plays {
            let result = self.play(config)?;
            stats.record(&result);
        }
        log::debug!(
            "simulated {} plays: mean payout {:.3}, hit rate {:.2}%",
            stats.plays,
            stats.mean_play_payout(),
            stats.hit_rate()
        );
        Ok(stats)
    }
}

fn no_normal_symbols() -> SlotError {
    SlotError::Configuration("no normal symbols available to fill the reels".into())
}

/// Execute one play with the thread-local RNG
pub fn spin(config: &SlotConfig) -> SlotResult<PlayResult> {
    SlotEngine::with_rng(rand::rng()).play(config)
}

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub plays: u64,
    pub spins: u64,
    pub wins: u64,
    pub reaches: u64,
    pub misses: u64,
    pub total_payout: f64,
    pub max_play_payout: f64,
}

impl SessionStats {
    pub fn record(&mut self, result: &PlayResult) {
        self.plays += 1;
        for spin in &result.spins {
            self.spins += 1;
            match spin.kind() {
                SpinKind::Win => self.wins += 1,
                SpinKind::Reach => self.reaches += 1,
                SpinKind::Miss => self.misses += 1,
            }
        }
        self.total_payout += result.total_payout;
        self.max_play_payout = self.max_play_payout.max(result.total_payout);
    }

    /// Percentage of spins that won
    pub fn hit_rate(&self) -> f64 {
        if self.spins > 0 {
            (self.wins as f64 / self.spins as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Average total payout per play
    pub fn mean_play_payout(&self) -> f64 {
        if self.plays > 0 {
            self.total_payout / self.plays as f64
        } else {
            0.0
        }
    }
}
