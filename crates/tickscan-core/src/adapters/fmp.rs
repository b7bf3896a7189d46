use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::http_client::{HttpAuth, HttpClient, HttpRequest, ReqwestHttpClient};
use crate::provider::{FailureReason, FetchFailure, FetchOutcome, ProviderId, QuoteProvider};
use crate::throttling::RateGate;
use crate::{Quote, Symbol, UtcDateTime};

const QUOTE_URL: &str = "https://financialmodelingprep.com/api/v3/quote";

/// Financial Modeling Prep adapter. The `/api/v3/quote` endpoint returns a
/// single-element array with price, change, and day-range figures in one
/// call, which makes it the richest source for scanner passes.
#[derive(Clone)]
pub struct FmpProvider {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    gate: RateGate,
    timeout_ms: u64,
}

impl FmpProvider {
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
            FetchOutcome::Failed(FetchFailure::new(symbol.clone(), reason, ProviderId::Fmp))
        };

        if self.gate.acquire().is_err() {
            return fail(FailureReason::RateLimited);
        }

        let url = format!("{QUOTE_URL}/{}", urlencoding::encode(symbol.as_str()));
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

        let parsed: Vec<FmpQuotePayload> = match serde_json::from_str(&response.body) {
            Ok(parsed) => parsed,
            Err(_) => return fail(FailureReason::NoData),
        };

        let Some(payload) = parsed.into_iter().next() else {
            return fail(FailureReason::NoData);
        };

        let (Some(price), Some(previous_close)) = (payload.price, payload.previous_close) else {
            return fail(FailureReason::NoData);
        };

        let quote = Quote::new(
            symbol.clone(),
            price,
            previous_close,
            payload.change.unwrap_or(price - previous_close),
            payload
                .changes_percentage
                .unwrap_or_else(|| percent_change(price, previous_close)),
            payload.volume.map(|v| v as u64).unwrap_or(0),
            ProviderId::Fmp,
            UtcDateTime::now(),
        );

        match quote {
            Ok(quote) => FetchOutcome::Quote(
                quote
                    .with_day_range(payload.day_high, payload.day_low)
                    .with_market_cap(payload.market_cap)
                    .with_pe_ratio(payload.pe)
                    .with_exchange(payload.exchange)
                    .with_company_name(payload.name),
            ),
            Err(_) => fail(FailureReason::NoData),
        }
    }
}

fn percent_change(price: f64, previous_close: f64) -> f64 {
    if previous_close > 0.0 {
        (price - previous_close) / previous_close * 100.0
    } else {
        0.0
    }
}

impl QuoteProvider for FmpProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Fmp
    }

    fn fetch_quote<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = FetchOutcome> + Send + 'a>> {
        Box::pin(self.fetch_one(symbol))
    }
}

#[derive(Debug, Deserialize)]
struct FmpQuotePayload {
    name: Option<String>,
    price: Option<f64>,
    change: Option<f64>,
    #[serde(rename = "changesPercentage")]
    changes_percentage: Option<f64>,
    volume: Option<f64>,
    #[serde(rename = "dayHigh")]
    day_high: Option<f64>,
    #[serde(rename = "dayLow")]
    day_low: Option<f64>,
    #[serde(rename = "previousClose")]
    previous_close: Option<f64>,
    #[serde(rename = "marketCap")]
    market_cap: Option<f64>,
    pe: Option<f64>,
    exchange: Option<String>,
}
