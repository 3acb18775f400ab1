//! Spin records and play results

use serde::{Deserialize, Serialize};

use crate::prize::{Prize, PrizeTable};
use crate::symbols::{ReelFace, Symbol};

/// Outcome category of a single spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinKind {
    /// Unconditional miss from the miss gate
    Miss,
    /// Near miss: two reels match, the third differs
    Reach,
    /// Three of a kind
    Win,
}

/// One spin as shown to the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinRecord {
    /// Reel faces, left to right
    pub reels: Vec<ReelFace>,
    pub matched: bool,
    pub is_reach: bool,
    pub payout: f64,
    /// Matched symbol on a win
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<ReelFace>,
    /// Impersonated symbol on a reach
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reach_symbol: Option<ReelFace>,
}

impl SpinRecord {
    pub fn miss(reel1: &Symbol, reel2: &Symbol, reel3: &Symbol) -> Self {
        Self {
            reels: vec![reel1.face(), reel2.face(), reel3.face()],
            matched: false,
            is_reach: false,
            payout: 0.0,
            symbol: None,
            reach_symbol: None,
        }
    }

    /// `shown` fills the first two reels, `third` the last
    pub fn reach(shown: &Symbol, third: &Symbol) -> Self {
        Self {
            reels: vec![shown.face(), shown.face(), third.face()],
            matched: false,
            is_reach: true,
            payout: 0.0,
            symbol: None,
            reach_symbol: Some(shown.face()),
        }
    }

    pub fn win(symbol: &Symbol) -> Self {
        let face = symbol.face();
        Self {
            reels: vec![face.clone(), face.clone(), face.clone()],
            matched: true,
            is_reach: false,
            payout: symbol.payout_3,
            symbol: Some(face),
            reach_symbol: None,
        }
    }

    pub fn kind(&self) -> SpinKind {
        match (self.matched, self.is_reach) {
            (true, _) => SpinKind::Win,
            (false, true) => SpinKind::Reach,
            (false, false) => SpinKind::Miss,
        }
    }
}

/// Result of one play (five spins)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayResult {
    pub spins: Vec<SpinRecord>,
    pub total_payout: f64,
    /// Config's expected five-spin payout, echoed for the client
    pub expected_total_5: f64,
    /// Prize awarded for `total_payout`, if a prize table was applied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prize: Option<Prize>,
}

impl PlayResult {
    pub fn new(spins: Vec<SpinRecord>, expected_total_5: f64) -> Self {
        let total_payout = spins.iter().map(|s| s.payout).sum();
        Self {
            spins,
            total_payout,
            expected_total_5,
            prize: None,
        }
    }

    /// Attach the prize matching `total_payout`
    pub fn award(mut self, prizes: &PrizeTable) -> Self {
        self.prize = prizes.prize_for(self.total_payout).map(|tier| tier.prize());
        self
    }

    pub fn count(&self, kind: SpinKind) -> usize {
        self.spins.iter().filter(|s| s.kind() == kind).count()
    }
}
