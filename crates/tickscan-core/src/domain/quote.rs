use serde::{Deserialize, Serialize};

use crate::provider::ProviderId;
use crate::{Symbol, UtcDateTime, ValidationError};

/// Canonical market snapshot for a single symbol.
///
/// Constructed once per fetch and never mutated afterwards. A usable quote
/// always carries a strictly positive price; responses without one are
/// normalized into a fetch failure before this type is ever built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: Symbol,
    pub price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    pub source: ProviderId,
    pub as_of: UtcDateTime,
}

impl Quote {
    pub fn new(
        symbol: Symbol,
        price: f64,
        previous_close: f64,
        change: f64,
        change_percent: f64,
        volume: u64,
        source: ProviderId,
        as_of: UtcDateTime,
    ) -> Result<Self, ValidationError> {
        validate_finite("price", price)?;
        if price <= 0.0 {
            return Err(ValidationError::NonPositivePrice { price });
        }
        validate_non_negative("previous_close", previous_close)?;
        validate_finite("change", change)?;
        validate_finite("change_percent", change_percent)?;

        Ok(Self {
            symbol,
            price,
            previous_close,
            change,
            change_percent,
            volume,
            day_high: None,
            day_low: None,
            market_cap: None,
            pe_ratio: None,
            exchange: None,
            company_name: None,
            sector: None,
            source,
            as_of,
        })
    }

    /// Build a quote from a (current, previous close) price pair, deriving
    /// change and change_percent so the pair stays internally consistent.
    pub fn from_close_pair(
        symbol: Symbol,
        price: f64,
        previous_close: f64,
        volume: u64,
        source: ProviderId,
        as_of: UtcDateTime,
    ) -> Result<Self, ValidationError> {
        let change = price - previous_close;
        let change_percent = if previous_close > 0.0 {
            change / previous_close * 100.0
        } else {
            0.0
        };
        Self::new(
            symbol,
            price,
            previous_close,
            change,
            change_percent,
            volume,
            source,
            as_of,
        )
    }

    pub fn with_day_range(mut self, day_high: Option<f64>, day_low: Option<f64>) -> Self {
        self.day_high = day_high.filter(|v| v.is_finite() && *v > 0.0);
        self.day_low = day_low.filter(|v| v.is_finite() && *v > 0.0);
        self
    }

    pub fn with_market_cap(mut self, market_cap: Option<f64>) -> Self {
        self.market_cap = market_cap.filter(|v| v.is_finite() && *v > 0.0);
        self
    }

    pub fn with_pe_ratio(mut self, pe_ratio: Option<f64>) -> Self {
        self.pe_ratio = pe_ratio.filter(|v| v.is_finite());
        self
    }

    pub fn with_exchange(mut self, exchange: Option<String>) -> Self {
        self.exchange = exchange;
        self
    }

    pub fn with_company_name(mut self, company_name: Option<String>) -> Self {
        self.company_name = company_name;
        self
    }

    pub fn with_sector(mut self, sector: Option<String>) -> Self {
        self.sector = sector;
        self
    }

    pub fn is_demo(&self) -> bool {
        self.source == ProviderId::Demo
    }
}

fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    validate_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
