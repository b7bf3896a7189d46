use thiserror::Error;

/// Validation and contract errors exposed by `tickscan-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("unknown scan type '{value}'")]
    UnknownScanType { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
    #[error("quote price must be positive, got {price}")]
    NonPositivePrice { price: f64 },

    #[error("scan limit must be greater than zero")]
    ZeroLimit,
    #[error("universe size must be greater than zero")]
    ZeroUniverseSize,
    #[error("min_price {min_price} exceeds max_price {max_price}")]
    InvertedPriceRange { min_price: f64, max_price: f64 },
    #[error("min_score {value} must be within [0, 100]")]
    ScoreOutOfRange { value: f64 },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("universe load error: {0}")]
    UniverseLoad(String),
}
