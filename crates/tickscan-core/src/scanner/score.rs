//! Composite scoring, pattern labels, and ranking.
//!
//! The score is a ranking device, not a financial model: three capped
//! linear components (volume up to 50 points, move magnitude up to 30,
//! signed momentum up to 20) summing to at most 100. It is deterministic
//! for a given quote and monotonic in volume and |change%|.

use serde::{Deserialize, Serialize};

use crate::Quote;

pub const VOLUME_COMPONENT_CAP: f64 = 50.0;
pub const PRICE_COMPONENT_CAP: f64 = 30.0;
pub const MOMENTUM_COMPONENT_CAP: f64 = 20.0;
pub const MAX_SCORE: f64 = VOLUME_COMPONENT_CAP + PRICE_COMPONENT_CAP + MOMENTUM_COMPONENT_CAP;

/// Proxy momentum oscillator in [0, 100].
///
/// NOT a genuine RSI — a real one needs a historical price series, which is
/// not part of this system's inputs. This is a documented stand-in derived
/// from the day's change% alone: 50 + 2 * change%, clamped.
pub fn rsi_proxy(change_percent: f64) -> f64 {
    (50.0 + 2.0 * change_percent).clamp(0.0, 100.0)
}

/// Per-component score contributions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub volume: f64,
    pub price: f64,
    pub momentum: f64,
}

impl ScoreBreakdown {
    pub fn for_quote(quote: &Quote) -> Self {
        let volume = (quote.volume as f64 / 1_000_000.0 * 10.0).min(VOLUME_COMPONENT_CAP);
        let price = (quote.change_percent.abs() * 3.0).min(PRICE_COMPONENT_CAP);
        let momentum = ((quote.change_percent + 10.0) * 2.0).clamp(0.0, MOMENTUM_COMPONENT_CAP);
        Self {
            volume,
            price,
            momentum,
        }
    }

    pub fn total(&self) -> f64 {
        self.volume + self.price + self.momentum
    }
}

/// Qualitative change% bucket shown next to each result.
pub fn pattern_label(change_percent: f64) -> &'static str {
    if change_percent >= 5.0 {
        "Strong Breakout"
    } else if change_percent >= 2.0 {
        "Breakout"
    } else if change_percent > -2.0 {
        "Consolidation"
    } else if change_percent > -5.0 {
        "Breakdown"
    } else {
        "Strong Breakdown"
    }
}

/// A quote that survived filtering, annotated for ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredQuote {
    #[serde(flatten)]
    pub quote: Quote,
    pub score: f64,
    pub score_breakdown: ScoreBreakdown,
    pub pattern: String,
    pub rsi: f64,
}

impl ScoredQuote {
    pub fn from_quote(quote: Quote) -> Self {
        let breakdown = ScoreBreakdown::for_quote(&quote);
        let score = breakdown.total();
        let pattern = String::from(pattern_label(quote.change_percent));
        let rsi = rsi_proxy(quote.change_percent);
        Self {
            quote,
            score,
            score_breakdown: breakdown,
            pattern,
            rsi,
        }
    }
}

/// Sort by score descending and truncate. Stable sort, so equal scores keep
/// their arrival order.
pub fn rank(mut scored: Vec<ScoredQuote>, limit: usize) -> Vec<ScoredQuote> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(limit);
    scored
}
