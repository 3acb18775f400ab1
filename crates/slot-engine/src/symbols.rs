//! Symbol definitions and the normal/reach symbol pools

use serde::{Deserialize, Serialize};

fn default_color() -> String {
    "#000000".to_string()
}

/// A symbol definition
///
/// `prob` is a relative weight as entered by an admin. After normalization it
/// is the percentage chance that a non-miss spin draws this symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    /// Unique symbol ID within a config
    pub id: String,
    /// Display label
    pub label: String,
    /// Payout for three of a kind
    pub payout_3: f64,
    /// Display color
    #[serde(default = "default_color")]
    pub color: String,
    /// Relative weight (percentage once normalized)
    #[serde(default)]
    pub prob: f64,
    /// Near-miss symbol: shows two matching reels and never pays
    #[serde(default)]
    pub is_reach: bool,
    /// ID of the normal symbol a reach symbol impersonates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reach_symbol: Option<String>,
}

impl Symbol {
    /// Create a normal (paying) symbol
    pub fn normal(
        id: impl Into<String>,
        label: impl Into<String>,
        payout_3: f64,
        prob: f64,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            payout_3,
            color: default_color(),
            prob,
            is_reach: false,
            reach_symbol: None,
        }
    }

    /// Create a reach symbol impersonating `target`
    pub fn reach(id: impl Into<String>, label: impl Into<String>, target: &str, prob: f64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            payout_3: 0.0,
            color: default_color(),
            prob,
            is_reach: true,
            reach_symbol: Some(target.to_string()),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Payout this symbol actually awards when drawn. Reach symbols never pay.
    pub fn effective_payout(&self) -> f64 {
        if self.is_reach { 0.0 } else { self.payout_3 }
    }

    /// ID of the impersonated symbol, falling back to the symbol's own ID
    pub fn reach_target(&self) -> &str {
        self.reach_symbol.as_deref().unwrap_or(&self.id)
    }

    /// Display face for a reel
    pub fn face(&self) -> ReelFace {
        ReelFace {
            id: self.id.clone(),
            label: self.label.clone(),
            color: self.color.clone(),
        }
    }
}

/// What a single reel shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReelFace {
    pub id: String,
    pub label: String,
    pub color: String,
}

/// Borrowed view of a symbol set split into normal and reach symbols
#[derive(Debug, Clone)]
pub struct SymbolPool<'a> {
    all: &'a [Symbol],
    normal: Vec<&'a Symbol>,
}

impl<'a> SymbolPool<'a> {
    pub fn new(symbols: &'a [Symbol]) -> Self {
        Self {
            all: symbols,
            normal: symbols.iter().filter(|s| !s.is_reach).collect(),
        }
    }

    /// Every symbol, in config order
    pub fn all(&self) -> &'a [Symbol] {
        self.all
    }

    /// Symbols that can fill reels
    pub fn normal(&self) -> &[&'a Symbol] {
        &self.normal
    }

    pub fn reach(&self) -> impl Iterator<Item = &'a Symbol> + '_ {
        self.all.iter().filter(|s| s.is_reach)
    }

    pub fn has_normal(&self) -> bool {
        !self.normal.is_empty()
    }

    pub fn find_normal(&self, id: &str) -> Option<&'a Symbol> {
        self.normal.iter().copied().find(|s| s.id == id)
    }

    /// Normal symbols other than `id`
    pub fn normal_except(&self, id: &str) -> Vec<&'a Symbol> {
        self.normal.iter().copied().filter(|s| s.id != id).collect()
    }

    /// Symbol shown on the first two reels when `reach` is drawn.
    /// Falls back to the reach symbol itself when the target is unknown.
    pub fn impersonated(&self, reach: &'a Symbol) -> &'a Symbol {
        self.find_normal(reach.reach_target()).unwrap_or(reach)
    }
}
