//! Distribution Oracle Test Suite
//!
//! Checks the convolution-based calculator against brute-force path
//! enumeration on small symbol sets, plus the structural properties every
//! distribution must satisfy:
//! - Mass conservation
//! - Monotonicity of tail probabilities
//! - Boundary agreement
//! - Range queries against enumeration

use approx::assert_abs_diff_eq;
use slot_engine::{
    OutcomeTable, PayoutDistribution, ProbabilityQuery, SlotConfig, Symbol, normalize,
    prob_total_ge, prob_total_le, probability_query,
};

// ═══════════════════════════════════════════════════════════════════════════════
// TEST FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

fn three_symbol_config(miss: f64) -> SlotConfig {
    SlotConfig::new(
        vec![
            Symbol::normal("seven", "7", 100.0, 20.0),
            Symbol::normal("bell", "Bell", 30.0, 30.0),
            Symbol::normal("grape", "Grape", 5.0, 50.0),
        ],
        miss,
    )
}

fn config_with_reach() -> SlotConfig {
    SlotConfig::new(
        vec![
            Symbol::normal("seven", "7", 50.0, 10.0),
            Symbol::normal("cherry", "Cherry", 10.0, 60.0),
            Symbol::reach("reach_seven", "7", "seven", 30.0),
        ],
        25.0,
    )
}

/// Enumerate every sequence of `spins` categories and collect
/// `(total, probability)` per path.
fn enumerate_paths(categories: &[(f64, f64)], spins: u32) -> Vec<(f64, f64)> {
    let mut paths = vec![(0.0, 1.0)];
    for _ in 0..spins {
        let mut next = Vec::with_capacity(paths.len() * categories.len());
        for &(total, p) in &paths {
            for &(payout, q) in categories {
                next.push((total + payout, p * q));
            }
        }
        paths = next;
    }
    paths
}

fn oracle_between(config: &SlotConfig, spins: u32, low: f64, high: f64) -> f64 {
    let table = OutcomeTable::from_config(config);
    enumerate_paths(&table.categories(), spins)
        .into_iter()
        .filter(|(total, _)| *total >= low - 1e-9 && *total <= high + 1e-9)
        .map(|(_, p)| p)
        .sum()
}

// ═══════════════════════════════════════════════════════════════════════════════
// ORACLE AGREEMENT
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_range_matches_enumeration() {
    let configs = [three_symbol_config(0.0), three_symbol_config(40.0), config_with_reach()];
    let ranges = [(0.0, 0.0), (5.0, 35.0), (30.0, 130.0), (100.0, 300.0), (15.0, 15.0)];

    for config in &configs {
        for spins in 1..=3 {
            for &(low, high) in &ranges {
                let query = ProbabilityQuery::between(low, high).with_spins(spins as i64);
                let report = probability_query(config, &query).unwrap();
                let expected = oracle_between(config, spins, low, high);
                assert_abs_diff_eq!(report.prob_range, expected, epsilon = 1e-9);
            }
        }
    }
}

#[test]
fn test_tails_match_enumeration() {
    let config = config_with_reach();
    for spins in 1..=3 {
        for threshold in [0.0, 10.0, 20.0, 50.0, 60.0, 100.0, 150.0] {
            let ge = prob_total_ge(&config, spins, threshold).unwrap();
            let le = prob_total_le(&config, spins, threshold).unwrap();
            assert_abs_diff_eq!(
                ge,
                oracle_between(&config, spins, threshold, f64::MAX),
                epsilon = 1e-9
            );
            assert_abs_diff_eq!(
                le,
                oracle_between(&config, spins, f64::MIN, threshold),
                epsilon = 1e-9
            );
        }
    }
}

#[test]
fn test_range_identity() {
    let config = three_symbol_config(10.0);
    let distribution = PayoutDistribution::for_config(&config, 3).unwrap();

    for (tmin, tmax) in [(0.0, 100.0), (10.0, 200.0), (35.0, 35.0), (60.0, 205.0)] {
        let report = probability_query(
            &config,
            &ProbabilityQuery::between(tmin, tmax).with_spins(3),
        )
        .unwrap();
        let identity = distribution.prob_le(tmax) - distribution.prob_le(tmin)
            + distribution.prob_eq(tmin);
        assert_abs_diff_eq!(report.prob_range, identity, epsilon = 1e-9);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// STRUCTURAL PROPERTIES
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_mass_conservation() {
    for config in [SlotConfig::default(), three_symbol_config(33.0), config_with_reach()] {
        for spins in 1..=10 {
            let distribution = PayoutDistribution::for_config(&config, spins).unwrap();
            assert_abs_diff_eq!(distribution.total_mass(), 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_monotonic_tails() {
    let config = SlotConfig::default();
    let distribution = PayoutDistribution::for_config(&config, 5).unwrap();

    let mut last_ge = f64::INFINITY;
    let mut last_le = f64::NEG_INFINITY;
    for step in 0..=110 {
        let t = step as f64 * 5.0;
        let ge = distribution.prob_ge(t);
        let le = distribution.prob_le(t);
        assert!(ge <= last_ge + 1e-12, "prob_ge rose at {t}");
        assert!(le >= last_le - 1e-12, "prob_le fell at {t}");
        last_ge = ge;
        last_le = le;
    }
}

#[test]
fn test_boundary_agreement() {
    for config in [SlotConfig::default(), three_symbol_config(100.0), config_with_reach()] {
        for spins in [1, 5, 8] {
            assert_eq!(prob_total_ge(&config, spins, 0.0).unwrap(), 1.0);
        }
    }
}

#[test]
fn test_mean_matches_outcome_table() {
    let config = config_with_reach();
    let table = OutcomeTable::from_config(&config);
    let distribution = PayoutDistribution::for_config(&config, 5).unwrap();
    assert_abs_diff_eq!(distribution.mean(), 5.0 * table.mean_payout(), epsilon = 1e-6);
}

#[test]
fn test_normalization_idempotent() {
    let once = normalize(&config_with_reach()).unwrap();
    let twice = normalize(&once).unwrap();
    for (a, b) in once.symbols.iter().zip(&twice.symbols) {
        assert_abs_diff_eq!(a.prob, b.prob, epsilon = 1e-12);
    }
    assert_abs_diff_eq!(once.expected_total_5, twice.expected_total_5, epsilon = 1e-9);
}

// ═══════════════════════════════════════════════════════════════════════════════
// END-TO-END SCENARIO
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_coin_flip_scenario() {
    let config = SlotConfig::new(
        vec![
            Symbol::normal("a", "A", 100.0, 50.0),
            Symbol::normal("b", "B", 0.0, 50.0),
        ],
        0.0,
    );
    let config = normalize(&config).unwrap();
    assert_abs_diff_eq!(config.expected_total_5, 250.0, epsilon = 1e-9);

    let report = probability_query(&config, &ProbabilityQuery::at_least(500.0)).unwrap();
    assert_abs_diff_eq!(report.prob_ge, 0.03125, epsilon = 1e-12);
    assert_eq!(report.prob_le, 1.0);
    assert_abs_diff_eq!(report.prob_range, 0.03125, epsilon = 1e-12);
}

// ═══════════════════════════════════════════════════════════════════════════════
// RANGE LIMITS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_huge_payout_is_a_structured_error() {
    let config = SlotConfig::new(vec![Symbol::normal("a", "A", 1e13, 100.0)], 0.0);

    assert!(prob_total_ge(&config, 5, 0.0).unwrap_err().is_configuration());
    assert!(prob_total_le(&config, 5, 0.0).unwrap_err().is_configuration());
    let err = probability_query(&config, &ProbabilityQuery::at_least(0.0)).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_overflowing_totals_are_rejected() {
    // fits the fixed-point grid for two spins, overflows on the third
    let table = [(4e12, 0.5), (0.0, 0.5)];
    assert!(PayoutDistribution::from_categories(&table, 2).is_ok());
    let err = PayoutDistribution::from_categories(&table, 3).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_largest_allowed_payout_over_max_spins() {
    let config = SlotConfig::new(
        vec![
            Symbol::normal("top", "Top", 1_000_000.0, 50.0),
            Symbol::normal("low", "Low", 0.0, 50.0),
        ],
        0.0,
    );
    let distribution = PayoutDistribution::for_config(&config, 50).unwrap();
    assert_eq!(distribution.max_total(), 50_000_000.0);
    assert_abs_diff_eq!(distribution.total_mass(), 1.0, epsilon = 1e-9);
}
