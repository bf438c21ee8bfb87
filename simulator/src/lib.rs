//! Local spin simulator for goldspin.
//!
//! Hosts the SQLite ledger and a concurrent simulation that estimates return to player for a
//! given symbol table and slot configuration.

use anyhow::Context as _;
use goldspin_types::SymbolTable;
use std::path::Path;

mod config;
pub use config::{SimulatorConfig, DEFAULT_BET, DEFAULT_SPINS_PER_USER, DEFAULT_USERS};
mod ledger;
pub use ledger::SqliteLedger;
mod simulation;
pub use simulation::{player_ids, run_simulation, PlayerSummary, Report, SimulationError};
mod stats;
pub use stats::Stats;

/// Load a symbol table from a JSON file, or the built-in table when no path is given.
pub fn load_symbol_table(path: Option<&Path>) -> anyhow::Result<SymbolTable> {
    let Some(path) = path else {
        return Ok(SymbolTable::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read symbol table {}", path.display()))?;
    SymbolTable::from_json(&text).with_context(|| format!("parse symbol table {}", path.display()))
}
