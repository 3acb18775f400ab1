//! JSON Contract Tests
//!
//! The web layer stores configs and posts queries as JSON. These tests pin the
//! field names and defaults it relies on.

use serde_json::{Value, json};
use slot_engine::{
    ConfigParser, PrizeTable, SlotConfig, SlotEngine, SlotError, probability_query, solve_inverse,
};

// ═══════════════════════════════════════════════════════════════════════════════
// TEST FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

fn stored_config() -> Value {
    json!({
        "symbols": [
            {"id": "seven", "label": "7", "payout_3": 100, "color": "#ff0000", "prob": 10},
            {"id": "cherry", "label": "Cherry", "payout_3": 20, "prob": 60},
            {"id": "reach_seven", "label": "7", "payout_3": 0, "prob": 30,
             "is_reach": true, "reach_symbol": "seven"}
        ],
        "reels": 3,
        "base_bet": 1,
        "expected_total_5": 100.0,
        "miss_probability": 20,
        "updated_by": "admin"
    })
}

fn parse(value: &Value) -> SlotConfig {
    ConfigParser::new().parse_json(&value.to_string()).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_stored_config_loads() {
    let config = parse(&stored_config());
    assert_eq!(config.symbols.len(), 3);
    assert!(config.symbols[2].is_reach);
    assert_eq!(config.symbols[2].reach_symbol.as_deref(), Some("seven"));
    assert_eq!(config.symbols[1].color, "#000000");
    // 5 * (0.1 * 100 + 0.6 * 20)
    assert!((config.expected_total_5 - 110.0).abs() < 1e-9);
}

#[test]
fn test_saved_config_shape() {
    let value = serde_json::to_value(parse(&stored_config())).unwrap();
    let symbol = &value["symbols"][0];
    for key in ["id", "label", "payout_3", "color", "prob", "is_reach"] {
        assert!(symbol.get(key).is_some(), "missing {key}");
    }
    assert!(symbol.get("reach_symbol").is_none());
    assert_eq!(value["reels"], 3);
    assert!(value.get("miss_probability").is_some());
}

#[test]
fn test_negative_payout_rejected() {
    let mut value = stored_config();
    value["symbols"][0]["payout_3"] = json!(-5);
    let err = ConfigParser::new().parse_json(&value.to_string()).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_string_prob_rejected() {
    let mut value = stored_config();
    value["symbols"][0]["prob"] = json!("ten");
    let err = ConfigParser::new().parse_json(&value.to_string()).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_all_reach_rejected() {
    let value = json!({
        "symbols": [{"id": "r", "label": "R", "payout_3": 0, "prob": 100, "is_reach": true}]
    });
    let err = ConfigParser::new().parse_json(&value.to_string()).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_empty_symbols_rejected() {
    let err = ConfigParser::new().parse_json(r#"{"symbols": []}"#).unwrap_err();
    assert!(err.is_configuration());
}

// ═══════════════════════════════════════════════════════════════════════════════
// QUERIES AND RESULTS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_query_with_null_max() {
    let parser = ConfigParser::new();
    let config = parse(&stored_config());
    let query = parser
        .parse_query(r#"{"threshold_min": 100, "threshold_max": null}"#)
        .unwrap();
    let report = probability_query(&config, &query).unwrap();

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["prob_le"], 1.0);
    assert_eq!(value["spins"], 5);
    assert!(value["threshold_max"].is_null());
    assert!((report.prob_range - report.prob_ge).abs() < 1e-12);
}

#[test]
fn test_query_inverted_range_rejected() {
    let parser = ConfigParser::new();
    let query = parser
        .parse_query(r#"{"threshold_min": 300, "threshold_max": 100}"#)
        .unwrap();
    let err = probability_query(&SlotConfig::default(), &query).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_query_nonpositive_spins_coerced() {
    let parser = ConfigParser::new();
    let query = parser.parse_query(r#"{"spins": -3, "threshold_min": 0}"#).unwrap();
    let report = probability_query(&SlotConfig::default(), &query).unwrap();
    assert_eq!(report.spins, 1);
    assert_eq!(report.prob_ge, 1.0);
}

#[test]
fn test_query_override_symbols() {
    let parser = ConfigParser::new();
    let query = parser
        .parse_query(
            r#"{"symbols": [{"id": "a", "label": "A", "payout_3": 10, "prob": 1}],
                "threshold_min": 50}"#,
        )
        .unwrap();
    let report = probability_query(&SlotConfig::default(), &query).unwrap();
    assert_eq!(report.prob_ge, 1.0);
}

#[test]
fn test_play_result_shape() {
    let play = SlotEngine::seeded(5)
        .play(&parse(&stored_config()))
        .unwrap()
        .award(&PrizeTable::standard());
    let value = serde_json::to_value(&play).unwrap();

    assert_eq!(value["spins"].as_array().unwrap().len(), 5);
    assert!(value["total_payout"].is_number());
    assert!((value["expected_total_5"].as_f64().unwrap() - 110.0).abs() < 1e-9);
    assert!(value["prize"]["rank"].is_string());
    for spin in value["spins"].as_array().unwrap() {
        assert_eq!(spin["reels"].as_array().unwrap().len(), 3);
        assert!(spin["matched"].is_boolean());
        assert!(spin["is_reach"].is_boolean());
    }
}

#[test]
fn test_solved_config_round_trips() {
    let parser = ConfigParser::new();
    let solved = solve_inverse(&parse(&stored_config()), 150.0).unwrap();
    assert!((solved.expected_total_5 - 150.0).abs() < 1e-6);

    let json = parser.to_json(&solved).unwrap();
    let reloaded = parser.parse_json(&json).unwrap();
    assert!((reloaded.expected_total_5 - solved.expected_total_5).abs() < 1e-9);
}

#[test]
fn test_error_messages_are_structured() {
    let err = ConfigParser::new().parse_json("[").unwrap_err();
    assert!(matches!(err, SlotError::Json(_)));
    assert!(err.to_string().starts_with("JSON error"));
}
