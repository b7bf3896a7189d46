//! Scan-type catalog and bound filters.
//!
//! Each scan type is one named predicate in a single table, not a branching
//! chain repeated per call site. Thresholds are named constants tuned for
//! the reference behavior; they are knobs, not physical constants.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::scanner::score::rsi_proxy;
use crate::{Quote, ValidationError};

/// Minimum change% for a quote to count as a gainer.
pub const GAINER_MIN_CHANGE_PERCENT: f64 = 0.5;
/// Mirror threshold for losers.
pub const LOSER_MAX_CHANGE_PERCENT: f64 = -0.5;
/// `high_volume` requires this multiple of the request's volume floor.
pub const HIGH_VOLUME_FACTOR: f64 = 2.0;
/// Breakout change% threshold.
pub const BREAKOUT_MIN_CHANGE_PERCENT: f64 = 3.0;
/// Momentum needs a moderate move plus an elevated volume floor.
pub const MOMENTUM_MIN_CHANGE_PERCENT: f64 = 2.0;
pub const MOMENTUM_VOLUME_FACTOR: f64 = 1.5;
/// Penny-stock price band: [0.10, 5.0).
pub const PENNY_MIN_PRICE: f64 = 0.10;
pub const PENNY_MAX_PRICE: f64 = 5.0;
/// `under_10` price ceiling.
pub const UNDER_10_MAX_PRICE: f64 = 10.0;
/// Proxy-RSI bands for oversold/overbought scans.
pub const OVERSOLD_MAX_RSI: f64 = 30.0;
pub const OVERBOUGHT_MIN_RSI: f64 = 70.0;

/// Named scan predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanType {
    All,
    TopGainers,
    TopLosers,
    HighVolume,
    Breakouts,
    Momentum,
    PennyStocks,
    Under10,
    Oversold,
    Overbought,
}

impl ScanType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::TopGainers => "top_gainers",
            Self::TopLosers => "top_losers",
            Self::HighVolume => "high_volume",
            Self::Breakouts => "breakouts",
            Self::Momentum => "momentum",
            Self::PennyStocks => "penny_stocks",
            Self::Under10 => "under_10",
            Self::Oversold => "oversold",
            Self::Overbought => "overbought",
        }
    }

    /// The full catalog, in presentation order.
    pub const fn catalog() -> [ScanType; 10] {
        [
            Self::All,
            Self::TopGainers,
            Self::TopLosers,
            Self::HighVolume,
            Self::Breakouts,
            Self::Momentum,
            Self::PennyStocks,
            Self::Under10,
            Self::Oversold,
            Self::Overbought,
        ]
    }

    /// Scan-type predicate. Bound filters (price range, volume floor,
    /// sector) are applied separately before this runs.
    pub fn matches(self, quote: &Quote, min_volume: u64) -> bool {
        match self {
            Self::All => true,
            Self::TopGainers => quote.change_percent >= GAINER_MIN_CHANGE_PERCENT,
            Self::TopLosers => quote.change_percent <= LOSER_MAX_CHANGE_PERCENT,
            Self::HighVolume => quote.volume as f64 >= min_volume as f64 * HIGH_VOLUME_FACTOR,
            Self::Breakouts => quote.change_percent >= BREAKOUT_MIN_CHANGE_PERCENT,
            Self::Momentum => {
                quote.change_percent >= MOMENTUM_MIN_CHANGE_PERCENT
                    && quote.volume as f64 >= min_volume as f64 * MOMENTUM_VOLUME_FACTOR
            }
            Self::PennyStocks => quote.price >= PENNY_MIN_PRICE && quote.price < PENNY_MAX_PRICE,
            Self::Under10 => quote.price < UNDER_10_MAX_PRICE,
            Self::Oversold => rsi_proxy(quote.change_percent) <= OVERSOLD_MAX_RSI,
            Self::Overbought => rsi_proxy(quote.change_percent) >= OVERBOUGHT_MIN_RSI,
        }
    }
}

impl Display for ScanType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanType {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim().to_ascii_lowercase();
        Self::catalog()
            .into_iter()
            .find(|scan_type| scan_type.as_str() == normalized)
            .ok_or(ValidationError::UnknownScanType {
                value: input.to_owned(),
            })
    }
}

/// Sector sentinel meaning "no sector filter".
pub const SECTOR_ALL: &str = "ALL";

/// Basic bound filters, applied in fixed order with short-circuiting:
/// price range, then volume floor, then sector.
pub fn passes_bounds(
    quote: &Quote,
    min_price: f64,
    max_price: f64,
    min_volume: u64,
    sector: &str,
) -> bool {
    if quote.price < min_price || quote.price > max_price {
        return false;
    }
    if quote.volume < min_volume {
        return false;
    }
    if !sector.eq_ignore_ascii_case(SECTOR_ALL) {
        return quote
            .sector
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(sector));
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;
    use crate::{Symbol, UtcDateTime};

    fn quote(price: f64, change_percent: f64, volume: u64) -> Quote {
        let previous_close = price / (1.0 + change_percent / 100.0);
        Quote::new(
            Symbol::parse("TEST").expect("valid"),
            price,
            previous_close,
            price - previous_close,
            change_percent,
            volume,
            ProviderId::Demo,
            UtcDateTime::now(),
        )
        .expect("valid quote")
    }

    #[test]
    fn parses_every_catalog_name() {
        for scan_type in ScanType::catalog() {
            let reparsed: ScanType = scan_type.as_str().parse().expect("round trip");
            assert_eq!(reparsed, scan_type);
        }
        assert!("no_such_scan".parse::<ScanType>().is_err());
    }

    #[test]
    fn gainers_and_losers_mirror_each_other() {
        assert!(ScanType::TopGainers.matches(&quote(50.0, 0.5, 1_000_000), 0));
        assert!(!ScanType::TopGainers.matches(&quote(50.0, 0.4, 1_000_000), 0));
        assert!(ScanType::TopLosers.matches(&quote(50.0, -0.5, 1_000_000), 0));
        assert!(!ScanType::TopLosers.matches(&quote(50.0, -0.4, 1_000_000), 0));
    }

    #[test]
    fn momentum_needs_both_move_and_volume() {
        let min_volume = 1_000_000;
        assert!(ScanType::Momentum.matches(&quote(50.0, 2.5, 1_600_000), min_volume));
        assert!(!ScanType::Momentum.matches(&quote(50.0, 2.5, 1_400_000), min_volume));
        assert!(!ScanType::Momentum.matches(&quote(50.0, 1.5, 1_600_000), min_volume));
    }

    #[test]
    fn penny_band_is_half_open() {
        assert!(ScanType::PennyStocks.matches(&quote(0.10, 0.0, 0), 0));
        assert!(ScanType::PennyStocks.matches(&quote(4.99, 0.0, 0), 0));
        assert!(!ScanType::PennyStocks.matches(&quote(5.0, 0.0, 0), 0));
        assert!(!ScanType::PennyStocks.matches(&quote(0.05, 0.0, 0), 0));
    }

    #[test]
    fn rsi_band_scans_use_the_proxy() {
        // Proxy rsi = 50 + 2 * change_percent.
        assert!(ScanType::Oversold.matches(&quote(50.0, -10.0, 0), 0));
        assert!(!ScanType::Oversold.matches(&quote(50.0, -9.0, 0), 0));
        assert!(ScanType::Overbought.matches(&quote(50.0, 10.0, 0), 0));
        assert!(!ScanType::Overbought.matches(&quote(50.0, 9.0, 0), 0));
    }

    #[test]
    fn bounds_apply_price_volume_then_sector() {
        let mut q = quote(50.0, 1.0, 2_000_000);
        assert!(passes_bounds(&q, 10.0, 100.0, 1_000_000, SECTOR_ALL));
        assert!(!passes_bounds(&q, 60.0, 100.0, 1_000_000, SECTOR_ALL));
        assert!(!passes_bounds(&q, 10.0, 100.0, 3_000_000, SECTOR_ALL));

        assert!(
            !passes_bounds(&q, 10.0, 100.0, 1_000_000, "Technology"),
            "sector filter excludes quotes without sector metadata"
        );
        q.sector = Some(String::from("Technology"));
        assert!(passes_bounds(&q, 10.0, 100.0, 1_000_000, "technology"));
    }
}
