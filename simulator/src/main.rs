use anyhow::{Context, Result};
use clap::Parser;
use goldspin_execution::{
    BalanceLedger, EngineConfig, MemoryLedger, OverdraftPolicy, SlotConfig, SpinEngine,
};
use goldspin_simulator::{
    load_symbol_table, run_simulation, Report, SimulatorConfig, SqliteLedger,
};
use goldspin_types::SymbolTable;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

fn init_tracing(level: tracing::Level) {
    tracing_subscriber::fmt().with_max_level(level).init();
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of simulated players (must be > 0).
    #[arg(long)]
    users: Option<u64>,

    /// Spins per player (must be > 0).
    #[arg(long)]
    spins: Option<u64>,

    /// Stake per spin (must be > 0).
    #[arg(long)]
    bet: Option<u64>,

    /// Play every spin with the extra bet multiplier range.
    #[arg(long, default_value_t = false)]
    extra_bet: bool,

    /// Seed for deterministic spins (random when omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// Path to a SQLite ledger database (in-memory ledger when omitted).
    #[arg(long)]
    ledger_path: Option<PathBuf>,

    /// Path to a JSON symbol table (built-in table when omitted).
    #[arg(long)]
    symbols: Option<PathBuf>,

    /// Overdraft policy at settlement: allow, reject, or clamp.
    #[arg(long)]
    overdraft: Option<String>,

    /// Write an audit row for every settled bet.
    #[arg(long, default_value_t = false)]
    audit: bool,

    /// Chance that an inner-column cell is golden, in [0, 1].
    #[arg(long)]
    golden_chance: Option<f64>,

    /// Chance that a grid receives a forced winning column, in [0, 1].
    #[arg(long)]
    guaranteed_win_chance: Option<f64>,

    /// Print the report as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn build_config(args: &Args) -> Result<SimulatorConfig> {
    let defaults = SimulatorConfig::default();
    let overdraft = match args.overdraft.as_deref() {
        Some(value) => value
            .parse::<OverdraftPolicy>()
            .map_err(|err| anyhow::anyhow!("invalid overdraft policy: {err}"))?,
        None => defaults.overdraft,
    };
    for (field, value) in [
        ("users", args.users),
        ("spins", args.spins),
        ("bet", args.bet),
    ] {
        if let Some(0) = value {
            anyhow::bail!("{field} must be > 0");
        }
    }

    let engine = EngineConfig {
        slot: SlotConfig {
            golden_chance: args
                .golden_chance
                .unwrap_or(defaults.engine.slot.golden_chance),
            guaranteed_win_chance: args
                .guaranteed_win_chance
                .unwrap_or(defaults.engine.slot.guaranteed_win_chance),
        },
        audit_bets: args.audit,
    };
    engine.validate()?;

    Ok(SimulatorConfig {
        users: args.users.unwrap_or(defaults.users),
        spins_per_user: args.spins.unwrap_or(defaults.spins_per_user),
        bet: args.bet.unwrap_or(defaults.bet),
        extra_bet: args.extra_bet,
        seed: args.seed.or(defaults.seed),
        ledger_path: args.ledger_path.clone(),
        symbols_path: args.symbols.clone(),
        overdraft,
        engine,
    })
}

fn parse_log_level(value: &str) -> Result<tracing::Level> {
    tracing::Level::from_str(value).map_err(|_| anyhow::anyhow!("invalid log level: {value}"))
}

async fn simulate<L: BalanceLedger + 'static>(
    ledger: L,
    table: SymbolTable,
    config: &SimulatorConfig,
    seed: u64,
) -> Result<Report> {
    let engine = Arc::new(SpinEngine::new(
        Arc::new(table),
        ledger,
        config.engine.clone(),
    ));
    run_simulation(engine, config, seed)
        .await
        .context("simulation failed")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(parse_log_level(&args.log_level)?);
    let config = build_config(&args)?;

    let table = load_symbol_table(config.symbols_path.as_deref())?;
    let seed = config.seed.unwrap_or_else(rand::random);
    info!(
        symbols = table.symbols().len(),
        total_weight = table.total_weight(),
        overdraft = %config.overdraft,
        audit = config.engine.audit_bets,
        ledger = ?config.ledger_path,
        seed,
        "starting simulator"
    );

    let report = match &config.ledger_path {
        Some(path) => {
            let ledger = SqliteLedger::open(path, config.overdraft)?;
            simulate(ledger, table, &config, seed).await?
        }
        None => simulate(MemoryLedger::new(config.overdraft), table, &config, seed).await?,
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("serialize report")?
        );
    } else {
        println!("{report}");
    }
    Ok(())
}
