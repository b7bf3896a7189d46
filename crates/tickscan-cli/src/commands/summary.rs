use tickscan_core::scanner::Scanner;

use crate::error::CliError;

use super::{CommandResult, Table};

pub async fn run(scanner: &Scanner) -> Result<CommandResult, CliError> {
    let summary = scanner.summary().await;

    let mut table = Table::new(&["bucket", "symbol", "price", "change%", "volume"]);
    for (bucket, entries) in [
        ("gainers", &summary.gainers),
        ("losers", &summary.losers),
        ("most_active", &summary.most_active),
    ] {
        for entry in entries {
            table.push(vec![
                String::from(bucket),
                entry.symbol.to_string(),
                format!("{:.2}", entry.price),
                format!("{:+.2}", entry.change_percent),
                entry.volume.to_string(),
            ]);
        }
    }

    let data = serde_json::to_value(&summary)?;
    Ok(CommandResult::new(data, table))
}
