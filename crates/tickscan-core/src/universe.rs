//! Symbol universe reference data.
//!
//! The universe is loaded once at startup and only sampled afterwards. A
//! missing or malformed universe file degrades to the built-in list with a
//! warning; it is never a hard failure.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, Symbol};

/// One tradable symbol with optional reference metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniverseEntry {
    pub symbol: Symbol,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default)]
    pub popular: bool,
}

/// Read-only set of candidate symbols for scans.
#[derive(Debug, Clone)]
pub struct SymbolUniverse {
    entries: Vec<UniverseEntry>,
    sectors: HashMap<Symbol, String>,
}

impl SymbolUniverse {
    pub fn new(entries: Vec<UniverseEntry>) -> Self {
        let sectors = entries
            .iter()
            .filter_map(|entry| {
                entry
                    .sector
                    .as_ref()
                    .map(|sector| (entry.symbol.clone(), sector.clone()))
            })
            .collect();
        Self { entries, sectors }
    }

    /// Built-in fallback universe of widely traded names.
    pub fn builtin() -> Self {
        let entries = BUILTIN_SYMBOLS
            .iter()
            .map(|(raw, sector)| UniverseEntry {
                symbol: Symbol::parse(raw).expect("built-in symbols are valid"),
                sector: Some(String::from(*sector)),
                popular: true,
            })
            .collect();
        Self::new(entries)
    }

    /// Load a universe from a JSON file (array of entries).
    pub fn load_from_file(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CoreError::UniverseLoad(format!("{}: {e}", path.display())))?;
        let entries: Vec<UniverseEntry> = serde_json::from_str(&raw)
            .map_err(|e| CoreError::UniverseLoad(format!("{}: {e}", path.display())))?;
        if entries.is_empty() {
            return Err(CoreError::UniverseLoad(format!(
                "{}: universe file contains no symbols",
                path.display()
            )));
        }
        Ok(Self::new(entries))
    }

    /// Load from `path` when set, degrading to the built-in list on any
    /// load error. Returns the warning to surface when degradation happened.
    pub fn load_or_builtin(path: Option<&Path>) -> (Self, Option<String>) {
        match path {
            Some(path) => match Self::load_from_file(path) {
                Ok(universe) => (universe, None),
                Err(error) => (
                    Self::builtin(),
                    Some(format!("universe load failed, using built-in list: {error}")),
                ),
            },
            None => (Self::builtin(), None),
        }
    }

    /// First `count` candidate symbols, popular names first. Deterministic
    /// for a given universe, so repeated scans hit the same cache keys.
    pub fn sample(&self, count: usize) -> Vec<Symbol> {
        let popular = self
            .entries
            .iter()
            .filter(|entry| entry.popular)
            .map(|entry| entry.symbol.clone());
        let rest = self
            .entries
            .iter()
            .filter(|entry| !entry.popular)
            .map(|entry| entry.symbol.clone());
        popular.chain(rest).take(count).collect()
    }

    pub fn sector_of(&self, symbol: &Symbol) -> Option<&str> {
        self.sectors.get(symbol).map(String::as_str)
    }

    pub fn entries(&self) -> &[UniverseEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const BUILTIN_SYMBOLS: &[(&str, &str)] = &[
    ("AAPL", "Technology"),
    ("MSFT", "Technology"),
    ("GOOGL", "Communication Services"),
    ("AMZN", "Consumer Cyclical"),
    ("TSLA", "Consumer Cyclical"),
    ("NVDA", "Technology"),
    ("META", "Communication Services"),
    ("NFLX", "Communication Services"),
    ("AMD", "Technology"),
    ("INTC", "Technology"),
    ("CRM", "Technology"),
    ("ORCL", "Technology"),
    ("ADBE", "Technology"),
    ("NOW", "Technology"),
    ("PYPL", "Financial Services"),
    ("UBER", "Technology"),
    ("SHOP", "Technology"),
    ("SQ", "Financial Services"),
    ("ROKU", "Communication Services"),
    ("ZM", "Technology"),
    ("SNOW", "Technology"),
    ("PLTR", "Technology"),
    ("COIN", "Financial Services"),
    ("RBLX", "Communication Services"),
];
