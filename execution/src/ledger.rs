//! Balance persistence.
//!
//! The engine only ever talks to a [BalanceLedger]. Every implementation must apply a settlement
//! as one read-modify-write so that concurrent settlements for the same user never lose updates.

use goldspin_types::slot::STARTING_BALANCE;
use goldspin_types::{BetRecord, UserId};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum LedgerError {
    #[error("unknown user: {0}")]
    UnknownUser(UserId),
    #[error("insufficient funds for user {user}: balance {balance}, delta {delta}")]
    InsufficientFunds {
        user: UserId,
        balance: i64,
        delta: i64,
    },
    #[error("balance overflow for user {user}: balance {balance}, delta {delta}")]
    Overflow {
        user: UserId,
        balance: i64,
        delta: i64,
    },
    #[error("ledger backend error: {0:#}")]
    Backend(#[from] anyhow::Error),
}

/// What a settlement does when the resulting balance would go below zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverdraftPolicy {
    /// Negative balances are stored as-is.
    #[default]
    Allow,
    /// The settlement fails with [LedgerError::InsufficientFunds] and nothing is written.
    Reject,
    /// The resulting balance is floored at zero.
    Clamp,
}

impl OverdraftPolicy {
    /// Compute the balance after applying `delta` to `balance`.
    pub fn apply(self, user: UserId, balance: i64, delta: i64) -> Result<i64, LedgerError> {
        let next = balance.checked_add(delta).ok_or(LedgerError::Overflow {
            user,
            balance,
            delta,
        })?;
        if next >= 0 {
            return Ok(next);
        }
        match self {
            Self::Allow => Ok(next),
            Self::Reject => Err(LedgerError::InsufficientFunds {
                user,
                balance,
                delta,
            }),
            Self::Clamp => Ok(0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Reject => "reject",
            Self::Clamp => "clamp",
        }
    }
}

impl fmt::Display for OverdraftPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverdraftPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "reject" => Ok(Self::Reject),
            "clamp" => Ok(Self::Clamp),
            other => Err(format!(
                "invalid overdraft policy '{other}' (expected allow, reject, or clamp)"
            )),
        }
    }
}

pub trait BalanceLedger: Send + Sync {
    /// Atomically add `delta` to the user's balance and return the new balance.
    fn settle(
        &self,
        user: UserId,
        delta: i64,
    ) -> impl Future<Output = Result<i64, LedgerError>> + Send;

    /// Settle and record the bet in the same atomic step.
    ///
    /// Ledgers without an audit trail ignore `record`.
    fn settle_with_audit(
        &self,
        user: UserId,
        delta: i64,
        record: &BetRecord,
    ) -> impl Future<Output = Result<i64, LedgerError>> + Send {
        let _ = record;
        self.settle(user, delta)
    }

    fn balance(&self, user: UserId) -> impl Future<Output = Result<Option<i64>, LedgerError>> + Send;

    /// Create the user with [STARTING_BALANCE] if missing; returns the current balance.
    fn ensure_user(&self, user: UserId) -> impl Future<Output = Result<i64, LedgerError>> + Send;
}

#[derive(Default)]
struct Accounts {
    balances: HashMap<UserId, i64>,
    records: Vec<BetRecord>,
}

/// In-process ledger; one mutex guards balances and audit records together.
#[derive(Default)]
pub struct MemoryLedger {
    policy: OverdraftPolicy,
    accounts: Mutex<Accounts>,
}

impl MemoryLedger {
    pub fn new(policy: OverdraftPolicy) -> Self {
        Self {
            policy,
            accounts: Mutex::default(),
        }
    }

    /// Seed a user with an explicit balance, replacing any existing one.
    pub fn with_user(mut self, user: UserId, balance: i64) -> Self {
        // Seeding also recovers a ledger whose lock was poisoned.
        self.accounts.clear_poison();
        self.accounts
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .balances
            .insert(user, balance);
        self
    }

    pub fn policy(&self) -> OverdraftPolicy {
        self.policy
    }

    /// Audit records in settlement order.
    pub fn records(&self) -> Result<Vec<BetRecord>, LedgerError> {
        Ok(self.lock()?.records.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Accounts>, LedgerError> {
        self.accounts
            .lock()
            .map_err(|_| LedgerError::Backend(anyhow::anyhow!("memory ledger lock poisoned")))
    }

    fn apply(
        &self,
        user: UserId,
        delta: i64,
        record: Option<&BetRecord>,
    ) -> Result<i64, LedgerError> {
        let mut accounts = self.lock()?;
        let balance = accounts
            .balances
            .get_mut(&user)
            .ok_or(LedgerError::UnknownUser(user))?;
        let next = self.policy.apply(user, *balance, delta)?;
        *balance = next;
        if let Some(record) = record {
            accounts.records.push(record.clone());
        }
        Ok(next)
    }
}

impl BalanceLedger for MemoryLedger {
    async fn settle(&self, user: UserId, delta: i64) -> Result<i64, LedgerError> {
        self.apply(user, delta, None)
    }

    async fn settle_with_audit(
        &self,
        user: UserId,
        delta: i64,
        record: &BetRecord,
    ) -> Result<i64, LedgerError> {
        self.apply(user, delta, Some(record))
    }

    async fn balance(&self, user: UserId) -> Result<Option<i64>, LedgerError> {
        Ok(self.lock()?.balances.get(&user).copied())
    }

    async fn ensure_user(&self, user: UserId) -> Result<i64, LedgerError> {
        Ok(*self
            .lock()?
            .balances
            .entry(user)
            .or_insert(STARTING_BALANCE))
    }
}
