use goldspin_execution::{EngineConfig, OverdraftPolicy, SlotConfig};
use std::path::PathBuf;

pub const DEFAULT_USERS: u64 = 4;
pub const DEFAULT_SPINS_PER_USER: u64 = 1_000;
pub const DEFAULT_BET: u64 = 100;

#[derive(Clone, Debug)]
pub struct SimulatorConfig {
    /// Number of simulated players; each spins on its own task.
    pub users: u64,
    pub spins_per_user: u64,
    pub bet: u64,
    pub extra_bet: bool,
    /// Seed for [goldspin_execution::GameRng]. `None` draws one from OS entropy at startup.
    pub seed: Option<u64>,
    /// SQLite ledger path; the in-memory ledger is used when unset.
    pub ledger_path: Option<PathBuf>,
    /// JSON symbol table; the built-in table is used when unset.
    pub symbols_path: Option<PathBuf>,
    pub overdraft: OverdraftPolicy,
    pub engine: EngineConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            users: DEFAULT_USERS,
            spins_per_user: DEFAULT_SPINS_PER_USER,
            bet: DEFAULT_BET,
            extra_bet: false,
            seed: None,
            ledger_path: None,
            symbols_path: None,
            overdraft: OverdraftPolicy::default(),
            engine: EngineConfig {
                slot: SlotConfig::default(),
                audit_bets: false,
            },
        }
    }
}
