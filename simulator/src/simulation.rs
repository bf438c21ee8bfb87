//! Concurrent spin simulation.
//!
//! Every simulated player runs its spins sequentially on its own tokio task; players run in
//! parallel against one shared engine and ledger. Spin `n` of player `u` always draws from
//! `GameRng::new(seed, u, n)`, so a run is reproducible from its seed.

use crate::config::SimulatorConfig;
use crate::stats::Stats;
use futures::future::join_all;
use goldspin_execution::{BalanceLedger, GameRng, LedgerError, SpinEngine, SpinError};
use goldspin_types::{BetRequest, UserId};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum SimulationError {
    #[error(transparent)]
    Spin(#[from] SpinError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("simulation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub user_id: UserId,
    pub spins: u64,
    /// Stopped early because the overdraft policy refused a settlement.
    pub busted: bool,
    pub balance: Option<i64>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub seed: u64,
    pub bet: u64,
    pub extra_bet: bool,
    pub stats: Stats,
    pub rtp: f64,
    pub rtp_stderr: f64,
    pub hit_rate: f64,
    pub mean_multiplier: f64,
    pub players: Vec<PlayerSummary>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "seed {} | bet {} | extra bet {} | players {}",
            self.seed,
            self.bet,
            self.extra_bet,
            self.players.len()
        )?;
        writeln!(f, "{}", self.stats)?;
        for player in &self.players {
            let balance = player
                .balance
                .map_or_else(|| "-".to_string(), |balance| balance.to_string());
            write!(
                f,
                "\nplayer {:>4}: {:>6} spins, balance {balance}",
                player.user_id, player.spins
            )?;
            if player.busted {
                write!(f, " (busted)")?;
            }
        }
        Ok(())
    }
}

/// Simulated player ids, starting at 1 like the users table.
pub fn player_ids(users: u64) -> impl Iterator<Item = UserId> {
    1..=users
}

/// Run `config.users × config.spins_per_user` bets and aggregate the results.
pub async fn run_simulation<L>(
    engine: Arc<SpinEngine<L>>,
    config: &SimulatorConfig,
    seed: u64,
) -> Result<Report, SimulationError>
where
    L: BalanceLedger + 'static,
{
    for user in player_ids(config.users) {
        let balance = engine.ledger().ensure_user(user).await?;
        tracing::debug!(user_id = user, balance, "player ready");
    }
    tracing::info!(
        users = config.users,
        spins_per_user = config.spins_per_user,
        bet = config.bet,
        extra_bet = config.extra_bet,
        seed,
        "simulation started"
    );

    let seed_bytes = seed.to_be_bytes();
    let handles = player_ids(config.users).map(|user| {
        let engine = engine.clone();
        let request = BetRequest::new(user, config.bet, config.extra_bet);
        let spins = config.spins_per_user;
        tokio::spawn(async move { play(engine, request, spins, seed_bytes).await })
    });

    let mut stats = Stats::default();
    let mut players = Vec::new();
    for joined in join_all(handles).await {
        let (user_id, player_stats, busted) = joined??;
        stats.merge(&player_stats);
        players.push(PlayerSummary {
            user_id,
            spins: player_stats.trials,
            busted,
            balance: engine.ledger().balance(user_id).await?,
        });
    }

    tracing::info!(
        spins = stats.trials,
        rtp = stats.rtp(),
        hit_rate = stats.hit_rate(),
        "simulation finished"
    );
    Ok(Report {
        seed,
        bet: config.bet,
        extra_bet: config.extra_bet,
        rtp: stats.rtp(),
        rtp_stderr: stats.stderr(),
        hit_rate: stats.hit_rate(),
        mean_multiplier: stats.mean_multiplier(),
        stats,
        players,
    })
}

async fn play<L: BalanceLedger>(
    engine: Arc<SpinEngine<L>>,
    request: BetRequest,
    spins: u64,
    seed: [u8; 8],
) -> Result<(UserId, Stats, bool), SpinError> {
    let mut stats = Stats::default();
    for spin in 0..spins {
        let mut rng = GameRng::new(&seed, request.user_id, spin);
        match engine.place_bet(&request, &mut rng).await {
            Ok(result) => stats.add(request.bet_amount, &result),
            Err(SpinError::Persistence(LedgerError::InsufficientFunds { balance, .. })) => {
                tracing::info!(
                    user_id = request.user_id,
                    spin,
                    balance,
                    "player out of funds"
                );
                return Ok((request.user_id, stats, true));
            }
            Err(err) => return Err(err),
        }
    }
    tracing::debug!(
        user_id = request.user_id,
        spins,
        returned = stats.returned,
        "player finished"
    );
    Ok((request.user_id, stats, false))
}
