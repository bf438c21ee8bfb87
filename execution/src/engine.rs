//! Bet orchestration: validate, resolve the spin, settle, report.

use crate::ledger::{BalanceLedger, LedgerError};
use crate::rng::RandomSource;
use crate::slot::{resolve_spin, SlotConfig, SlotConfigError, SpinOutcome};
use goldspin_types::{BetRecord, BetRequest, BetResult, SymbolTable, SymbolTableError};
use std::sync::Arc;
use thiserror::Error as ThisError;

/// Message shown to callers for every failure, whatever the cause.
pub const PUBLIC_ERROR_MESSAGE: &str = "Failed to process bet";

#[derive(Debug, ThisError)]
pub enum SpinError {
    #[error("configuration error: {0}")]
    Configuration(#[from] SymbolTableError),
    #[error("invalid request: bet amount must be > 0 (got {bet_amount})")]
    InvalidRequest { bet_amount: u64 },
    #[error("persistence error: {0}")]
    Persistence(#[from] LedgerError),
    #[error("settlement delta out of range (bet {bet_amount}, win {win_amount})")]
    Overflow { bet_amount: u64, win_amount: u64 },
}

impl SpinError {
    /// Generic message safe to return to a client.
    pub fn public_message(&self) -> &'static str {
        PUBLIC_ERROR_MESSAGE
    }

    /// True when the request itself was at fault (4xx), false for server-side failures (5xx).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest { .. })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EngineConfig {
    pub slot: SlotConfig,
    /// Settle through [BalanceLedger::settle_with_audit] so each bet leaves a record.
    pub audit_bets: bool,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), SlotConfigError> {
        self.slot.validate()
    }
}

/// Places bets against a shared symbol table and ledger.
///
/// The engine holds no per-spin state; callers pass a fresh random source for each bet, so one
/// engine can serve many users concurrently.
pub struct SpinEngine<L: BalanceLedger> {
    table: Arc<SymbolTable>,
    ledger: L,
    config: EngineConfig,
}

impl<L: BalanceLedger> SpinEngine<L> {
    pub fn new(table: Arc<SymbolTable>, ledger: L, config: EngineConfig) -> Self {
        Self {
            table,
            ledger,
            config,
        }
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve and settle one bet.
    ///
    /// A zero stake is rejected before any draw is taken or the ledger is touched. If settlement
    /// fails the spin is discarded and the error returned.
    pub async fn place_bet<R: RandomSource + ?Sized>(
        &self,
        request: &BetRequest,
        rng: &mut R,
    ) -> Result<BetResult, SpinError> {
        if request.bet_amount == 0 {
            tracing::warn!(
                user_id = request.user_id,
                bet = request.bet_amount,
                "bet rejected"
            );
            return Err(SpinError::InvalidRequest {
                bet_amount: request.bet_amount,
            });
        }

        let outcome = resolve_spin(&self.table, &self.config.slot, request.extra_bet, rng)
            .inspect_err(|err| {
                tracing::warn!(user_id = request.user_id, ?err, "spin resolution failed");
            })?;
        tracing::debug!(
            user_id = request.user_id,
            initial_lines = outcome.initial.winning_lines.len(),
            conversions = outcome.conversions(),
            lines = outcome.winning_lines().len(),
            multiplier = outcome.multiplier,
            "spin resolved"
        );

        self.settle_outcome(request, outcome).await
    }

    /// Settle an already resolved spin and build the result.
    pub async fn settle_outcome(
        &self,
        request: &BetRequest,
        outcome: SpinOutcome,
    ) -> Result<BetResult, SpinError> {
        let record = BetRecord {
            user_id: request.user_id,
            amount: request.bet_amount,
            win_amount: outcome.total_win,
        };
        let delta = record.delta().ok_or(SpinError::Overflow {
            bet_amount: record.amount,
            win_amount: record.win_amount,
        })?;

        let settled = if self.config.audit_bets {
            self.ledger
                .settle_with_audit(request.user_id, delta, &record)
                .await
        } else {
            self.ledger.settle(request.user_id, delta).await
        };
        let new_balance = settled.inspect_err(|err| {
            tracing::warn!(user_id = request.user_id, delta, ?err, "settlement failed");
        })?;

        tracing::info!(
            user_id = request.user_id,
            bet = request.bet_amount,
            extra_bet = request.extra_bet,
            win = outcome.total_win,
            multiplier = outcome.multiplier,
            new_balance,
            "bet settled"
        );

        let SpinOutcome {
            grid,
            evaluation,
            multiplier,
            total_win,
            ..
        } = outcome;
        Ok(BetResult {
            grid,
            win_amount: total_win,
            line_win: evaluation.win_amount,
            multiplier,
            winning_lines: evaluation.winning_lines,
            new_balance,
        })
    }
}
