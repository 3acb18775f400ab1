//! # slot-engine — Slot probability engine for restaurant promotions
//!
//! Customers play five spins of a three-reel slot; the summed payout maps to a
//! store prize. This crate owns the numbers behind that game.
//!
//! ## Features
//!
//! - **Normalization**: Raw symbol weights → percentages and expected payout
//! - **Inverse Solver**: Reweight symbols to hit a target expected payout
//! - **Exact Distribution**: Convolution of per-spin outcomes over N spins
//! - **Spin Execution**: Miss gate, reach (near miss) and win displays
//! - **Prize Tiers**: Score ranges → store prizes, with exact odds
//!
//! ## Architecture
//!
//! ```text
//! SlotConfig (symbols + miss %)
//!     │
//!     ├── OutcomeTable (shared miss + symbol masses)
//!     │       │
//!     │       ├── SlotEngine::play → PlayResult (5 × SpinRecord)
//!     │       └── PayoutDistribution → ProbabilityReport
//!     │
//!     └── PrizeTable → Prize / PrizeOdds
//! ```

pub mod choice;
pub mod config;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod parser;
pub mod prize;
pub mod probability;
pub mod spin;
pub mod symbols;

pub use choice::*;
pub use config::*;
pub use distribution::*;
pub use engine::*;
pub use error::*;
pub use parser::*;
pub use prize::*;
pub use probability::*;
pub use spin::*;
pub use symbols::*;
