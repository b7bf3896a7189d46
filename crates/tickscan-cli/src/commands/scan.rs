use tickscan_core::scanner::{ScanRequest, ScanType, Scanner};

use crate::cli::ScanArgs;
use crate::error::CliError;

use super::{CommandResult, Table};

pub async fn run(args: &ScanArgs, scanner: &Scanner) -> Result<CommandResult, CliError> {
    let scan_type: ScanType = args.scan_type.parse()?;

    let mut request = ScanRequest::new(scan_type)
        .with_price_range(args.min_price, args.max_price)
        .with_min_volume(args.min_volume)
        .with_sector(args.sector.clone())
        .with_limit(args.limit)
        .with_universe_size(args.universe_size);
    if let Some(min_score) = args.min_score {
        request = request.with_min_score(min_score);
    }

    // Parameter problems exit with the validation code instead of coming
    // back inside the result envelope.
    request.validate()?;

    let outcome = scanner.scan(&request).await;

    let mut table = Table::new(&[
        "symbol", "price", "change%", "volume", "score", "pattern", "sector",
    ]);
    for stock in &outcome.stocks {
        table.push(vec![
            stock.quote.symbol.to_string(),
            format!("{:.2}", stock.quote.price),
            format!("{:+.2}", stock.quote.change_percent),
            stock.quote.volume.to_string(),
            format!("{:.1}", stock.score),
            stock.pattern.clone(),
            stock.quote.sector.clone().unwrap_or_default(),
        ]);
    }

    let warnings = outcome.warnings.clone();
    let data = serde_json::to_value(&outcome)?;

    Ok(CommandResult::new(data, table).with_warnings(warnings))
}
