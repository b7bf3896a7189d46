//! Quote provider contract and discriminated fetch results.
//!
//! Providers never raise to their callers: every fetch resolves to a
//! [`FetchOutcome`] that is either a usable [`Quote`] or a
//! [`FetchFailure`] tagged with the symbol and a stable reason code. Failure
//! handling downstream is structural, not exception-driven.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{Quote, Symbol};

/// Identifies which upstream produced a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    Polygon,
    Fmp,
    Demo,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Polygon => "polygon",
            Self::Fmp => "fmp",
            Self::Demo => "demo",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single-symbol fetch produced no usable quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The per-fetch deadline elapsed.
    Timeout,
    /// Upstream answered with a non-2xx status.
    Http(u16),
    /// Upstream answered 2xx but the payload had no usable price.
    NoData,
    /// The request never reached the upstream (DNS, connect, TLS).
    Transport,
    /// The local rate gate refused to spend budget on this fetch.
    RateLimited,
}

impl FailureReason {
    /// Stable reason code carried in responses and logs.
    pub fn code(self) -> String {
        match self {
            Self::Timeout => String::from("timeout"),
            Self::Http(status) => format!("http_{status}"),
            Self::NoData => String::from("no_data"),
            Self::Transport => String::from("transport"),
            Self::RateLimited => String::from("rate_limited"),
        }
    }

    /// Auth failures indicate an operator-side configuration problem and are
    /// surfaced distinctly from ordinary fetch noise.
    pub const fn is_auth(self) -> bool {
        matches!(self, Self::Http(401) | Self::Http(403))
    }
}

impl Display for FailureReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code())
    }
}

/// A fetch that yielded no quote, tagged with the symbol it was for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub symbol: Symbol,
    pub reason: FailureReason,
    pub provider: ProviderId,
}

impl FetchFailure {
    pub fn new(symbol: Symbol, reason: FailureReason, provider: ProviderId) -> Self {
        Self {
            symbol,
            reason,
            provider,
        }
    }

    pub fn is_auth(&self) -> bool {
        self.reason.is_auth()
    }
}

/// Discriminated result of a single-symbol fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Quote(Quote),
    Failed(FetchFailure),
}

impl FetchOutcome {
    /// The symbol this outcome belongs to. Callers correlate merged batch
    /// output by symbol identity, never by position.
    pub fn symbol(&self) -> &Symbol {
        match self {
            Self::Quote(quote) => &quote.symbol,
            Self::Failed(failure) => &failure.symbol,
        }
    }

    pub fn quote(&self) -> Option<&Quote> {
        match self {
            Self::Quote(quote) => Some(quote),
            Self::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            Self::Quote(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }

    pub fn is_quote(&self) -> bool {
        matches!(self, Self::Quote(_))
    }
}

/// Single-symbol quote source.
///
/// One attempt per call, no retries; rate limiting and timeouts belong to
/// the batch fetcher. Implementations must be `Send + Sync` because the
/// batch fetcher shares one provider handle across spawned fetch tasks.
pub trait QuoteProvider: Send + Sync {
    /// Returns the unique provider identifier.
    fn id(&self) -> ProviderId;

    /// Fetches the current snapshot for one symbol.
    ///
    /// Always resolves; upstream trouble is folded into
    /// [`FetchOutcome::Failed`].
    fn fetch_quote<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_codes_are_stable() {
        assert_eq!(FailureReason::Timeout.code(), "timeout");
        assert_eq!(FailureReason::Http(502).code(), "http_502");
        assert_eq!(FailureReason::NoData.code(), "no_data");
    }

    #[test]
    fn auth_statuses_are_distinguished() {
        assert!(FailureReason::Http(401).is_auth());
        assert!(FailureReason::Http(403).is_auth());
        assert!(!FailureReason::Http(429).is_auth());
        assert!(!FailureReason::Timeout.is_auth());
    }
}
