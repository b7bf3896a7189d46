use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::http_client::{HttpAuth, HttpClient, HttpRequest, ReqwestHttpClient};
use crate::provider::{FailureReason, FetchFailure, FetchOutcome, ProviderId, QuoteProvider};
use crate::throttling::RateGate;
use crate::{Quote, Symbol, UtcDateTime};

const PREV_CLOSE_URL: &str = "https://api.polygon.io/v2/aggs/ticker";

/// Polygon.io adapter built on the previous-close aggregate endpoint, the
/// most reliable free-tier source of a (close, open, volume) triple.
///
/// The session's open serves as the reference close, so change figures
/// describe the last session's intraday move.
#[derive(Clone)]
pub struct PolygonProvider {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    gate: RateGate,
    timeout_ms: u64,
}

impl PolygonProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), api_key)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            auth: HttpAuth::api_key_param(api_key),
            gate: RateGate::per_minute(300),
            timeout_ms: 4_000,
        }
    }

    pub fn with_rate_gate(mut self, gate: RateGate) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn fetch_one(&self, symbol: &Symbol) -> FetchOutcome {
        let fail = |reason| {
            FetchOutcome::Failed(FetchFailure::new(symbol.clone(), reason, ProviderId::Polygon))
        };

        if self.gate.acquire().is_err() {
            return fail(FailureReason::RateLimited);
        }

        let url = format!("{PREV_CLOSE_URL}/{}/prev?adjusted=true", symbol.as_str());
        let request = HttpRequest::get(url)
            .with_auth(&self.auth)
            .with_timeout_ms(self.timeout_ms);

        let response = match self.http_client.execute(request).await {
            Ok(response) => response,
            Err(error) if error.timed_out() => return fail(FailureReason::Timeout),
            Err(_) => return fail(FailureReason::Transport),
        };

        if !response.is_success() {
            return fail(FailureReason::Http(response.status));
        }

        let parsed: PrevCloseResponse = match serde_json::from_str(&response.body) {
            Ok(parsed) => parsed,
            Err(_) => return fail(FailureReason::NoData),
        };

        let Some(bar) = parsed.results.into_iter().next() else {
            return fail(FailureReason::NoData);
        };

        let (Some(close), Some(open)) = (bar.close, bar.open) else {
            return fail(FailureReason::NoData);
        };

        match Quote::from_close_pair(
            symbol.clone(),
            close,
            open,
            bar.volume.map(|v| v as u64).unwrap_or(0),
            ProviderId::Polygon,
            UtcDateTime::now(),
        ) {
            Ok(quote) => FetchOutcome::Quote(quote.with_day_range(bar.high, bar.low)),
            Err(_) => fail(FailureReason::NoData),
        }
    }
}

impl QuoteProvider for PolygonProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Polygon
    }

    fn fetch_quote<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + 'a>> {
        Box::pin(self.fetch_one(symbol))
    }
}

#[derive(Debug, Deserialize)]
struct PrevCloseResponse {
    #[serde(default)]
    results: Vec<PrevCloseBar>,
}

#[derive(Debug, Deserialize)]
struct PrevCloseBar {
    #[serde(rename = "c")]
    close: Option<f64>,
    #[serde(rename = "o")]
    open: Option<f64>,
    #[serde(rename = "h")]
    high: Option<f64>,
    #[serde(rename = "l")]
    low: Option<f64>,
    #[serde(rename = "v")]
    volume: Option<f64>,
}
