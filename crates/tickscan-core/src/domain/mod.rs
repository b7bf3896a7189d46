//! Canonical domain types for tickscan market data.
//!
//! All models validate their invariants at construction time and are
//! immutable afterwards:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Quote`] | One fetched market snapshot (price, change, volume) |
//! | [`Symbol`] | Validated, uppercase ticker |
//! | [`UtcDateTime`] | RFC3339 UTC timestamp |

mod quote;
mod symbol;
mod timestamp;

pub use quote::Quote;
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
