mod quote;
mod scan;
mod summary;
mod universe;

use serde_json::Value;

use tickscan_core::config::ScannerConfig;
use tickscan_core::scanner::Scanner;

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Table rows a command prepares for `--format table`.
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: &[&str]) -> Self {
        Self {
            header: header.iter().map(|h| String::from(*h)).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

pub struct CommandResult {
    pub data: Value,
    pub table: Table,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn new(data: Value, table: Table) -> Self {
        Self {
            data,
            table,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    let config = ScannerConfig::from_env();
    let scanner = Scanner::from_config(&config);

    match &cli.command {
        Command::Scan(args) => scan::run(args, &scanner).await,
        Command::Quote(args) => quote::run(args, &scanner).await,
        Command::Summary => summary::run(&scanner).await,
        Command::Universe(args) => universe::run(args, &scanner),
    }
}
