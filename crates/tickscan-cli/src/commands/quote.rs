use serde::Serialize;

use tickscan_core::provider::FetchOutcome;
use tickscan_core::scanner::Scanner;
use tickscan_core::{Quote, Symbol};

use crate::cli::QuoteArgs;
use crate::error::CliError;

use super::{CommandResult, Table};

#[derive(Debug, Serialize)]
struct QuoteResponseData {
    quotes: Vec<Quote>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    failed: Vec<FailedSymbol>,
}

#[derive(Debug, Serialize)]
struct FailedSymbol {
    symbol: Symbol,
    reason: String,
}

pub async fn run(args: &QuoteArgs, scanner: &Scanner) -> Result<CommandResult, CliError> {
    let symbols = args
        .symbols
        .iter()
        .map(|raw| Symbol::parse(raw))
        .collect::<Result<Vec<_>, _>>()?;

    let outcomes = scanner.quotes(&symbols).await;

    let mut quotes = Vec::new();
    let mut failed = Vec::new();
    for outcome in outcomes {
        match outcome {
            FetchOutcome::Quote(quote) => quotes.push(quote),
            FetchOutcome::Failed(failure) => failed.push(FailedSymbol {
                symbol: failure.symbol.clone(),
                reason: failure.reason.code(),
            }),
        }
    }

    let mut table = Table::new(&["symbol", "price", "change", "change%", "volume", "source"]);
    for quote in &quotes {
        table.push(vec![
            quote.symbol.to_string(),
            format!("{:.2}", quote.price),
            format!("{:+.2}", quote.change),
            format!("{:+.2}", quote.change_percent),
            quote.volume.to_string(),
            String::from(quote.source.as_str()),
        ]);
    }

    let warnings = failed
        .iter()
        .map(|f| format!("{}: fetch failed ({})", f.symbol, f.reason))
        .collect();
    let data = serde_json::to_value(QuoteResponseData { quotes, failed })?;

    Ok(CommandResult::new(data, table).with_warnings(warnings))
}
