use serde::Serialize;

use tickscan_core::scanner::Scanner;
use tickscan_core::universe::UniverseEntry;

use crate::cli::UniverseArgs;
use crate::error::CliError;

use super::{CommandResult, Table};

#[derive(Debug, Serialize)]
struct UniverseResponseData<'a> {
    count: usize,
    symbols: Vec<&'a UniverseEntry>,
}

pub fn run(args: &UniverseArgs, scanner: &Scanner) -> Result<CommandResult, CliError> {
    let symbols: Vec<&UniverseEntry> = scanner
        .universe()
        .entries()
        .iter()
        .filter(|entry| !args.popular_only || entry.popular)
        .collect();

    let mut table = Table::new(&["symbol", "sector", "popular"]);
    for entry in &symbols {
        table.push(vec![
            entry.symbol.to_string(),
            entry.sector.clone().unwrap_or_default(),
            entry.popular.to_string(),
        ]);
    }

    let data = serde_json::to_value(UniverseResponseData {
        count: symbols.len(),
        symbols,
    })?;

    Ok(CommandResult::new(data, table))
}
