//! SQLite-backed balance ledger with a bet audit table.
//!
//! All statements run on tokio's blocking pool against a single connection. Each settlement is an
//! immediate transaction, so the overdraft check, the balance update, and the audit row commit or
//! roll back together.

use anyhow::Context as _;
use goldspin_execution::{BalanceLedger, LedgerError, OverdraftPolicy};
use goldspin_types::slot::STARTING_BALANCE;
use goldspin_types::{BetRecord, UserId};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct SqliteLedger {
    conn: Arc<Mutex<Connection>>,
    policy: OverdraftPolicy,
}

impl SqliteLedger {
    pub fn open(path: &Path, policy: OverdraftPolicy) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("open ledger db at {}", path.display()))?;
        init_schema(&conn, true)?;
        Ok(Self::from_connection(conn, policy))
    }

    pub fn open_in_memory(policy: OverdraftPolicy) -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory ledger db")?;
        init_schema(&conn, false)?;
        Ok(Self::from_connection(conn, policy))
    }

    fn from_connection(conn: Connection, policy: OverdraftPolicy) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            policy,
        }
    }

    pub fn policy(&self) -> OverdraftPolicy {
        self.policy
    }

    /// Audit rows for `user`, oldest first.
    pub async fn records(&self, user: UserId) -> Result<Vec<BetRecord>, LedgerError> {
        self.with_conn(move |conn| load_records(conn, user)).await
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, LedgerError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, LedgerError> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|_| anyhow::anyhow!("ledger connection lock poisoned"))?;
            f(&mut conn)
        })
        .await
        .context("ledger task panicked")?
    }
}

impl BalanceLedger for SqliteLedger {
    async fn settle(&self, user: UserId, delta: i64) -> Result<i64, LedgerError> {
        let policy = self.policy;
        self.with_conn(move |conn| settle(conn, policy, user, delta, None))
            .await
    }

    async fn settle_with_audit(
        &self,
        user: UserId,
        delta: i64,
        record: &BetRecord,
    ) -> Result<i64, LedgerError> {
        let policy = self.policy;
        let record = record.clone();
        self.with_conn(move |conn| settle(conn, policy, user, delta, Some(&record)))
            .await
    }

    async fn balance(&self, user: UserId) -> Result<Option<i64>, LedgerError> {
        self.with_conn(move |conn| {
            let Some(id) = user_key(user) else {
                return Ok(None);
            };
            let balance = conn
                .query_row(
                    "SELECT balance FROM users WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .optional()
                .context("query balance")?;
            Ok(balance)
        })
        .await
    }

    async fn ensure_user(&self, user: UserId) -> Result<i64, LedgerError> {
        self.with_conn(move |conn| {
            let id = user_key(user).ok_or(LedgerError::UnknownUser(user))?;
            conn.execute(
                "INSERT OR IGNORE INTO users (id, username, balance) VALUES (?1, ?2, ?3)",
                params![id, format!("player-{user}"), STARTING_BALANCE],
            )
            .context("insert user")?;
            let balance = conn
                .query_row(
                    "SELECT balance FROM users WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )
                .context("query balance")?;
            Ok(balance)
        })
        .await
    }
}

fn init_schema(conn: &Connection, on_disk: bool) -> anyhow::Result<()> {
    if on_disk {
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;",
        )
        .context("configure ledger db")?;
    }
    conn.execute_batch(
        "PRAGMA foreign_keys=ON;
         CREATE TABLE IF NOT EXISTS users (
             id INTEGER PRIMARY KEY,
             username TEXT UNIQUE NOT NULL,
             balance INTEGER NOT NULL DEFAULT 10000
         );
         CREATE TABLE IF NOT EXISTS bets (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             user_id INTEGER NOT NULL,
             amount INTEGER NOT NULL,
             win_amount INTEGER NOT NULL,
             timestamp DATETIME DEFAULT CURRENT_TIMESTAMP,
             FOREIGN KEY(user_id) REFERENCES users(id)
         );
         CREATE INDEX IF NOT EXISTS bets_user_id ON bets(user_id);",
    )
    .context("init ledger schema")?;
    Ok(())
}

/// SQLite rowids are signed; user ids above `i64::MAX` cannot exist in the table.
fn user_key(user: UserId) -> Option<i64> {
    i64::try_from(user).ok()
}

fn to_i64(value: u64, label: &str) -> anyhow::Result<i64> {
    i64::try_from(value).with_context(|| format!("convert {label} to i64"))
}

fn settle(
    conn: &mut Connection,
    policy: OverdraftPolicy,
    user: UserId,
    delta: i64,
    record: Option<&BetRecord>,
) -> Result<i64, LedgerError> {
    let id = user_key(user).ok_or(LedgerError::UnknownUser(user))?;
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .context("begin settlement")?;

    let balance: i64 = tx
        .query_row(
            "SELECT balance FROM users WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .context("query balance")?
        .ok_or(LedgerError::UnknownUser(user))?;
    let next = policy.apply(user, balance, delta)?;

    let new_balance: i64 = tx
        .query_row(
            "UPDATE users SET balance = ?1 WHERE id = ?2 RETURNING balance",
            params![next, id],
            |row| row.get(0),
        )
        .context("update balance")?;

    if let Some(record) = record {
        tx.execute(
            "INSERT INTO bets (user_id, amount, win_amount) VALUES (?1, ?2, ?3)",
            params![
                id,
                to_i64(record.amount, "bet amount")?,
                to_i64(record.win_amount, "win amount")?
            ],
        )
        .context("insert bet record")?;
    }

    // Dropping `tx` on an early return rolls back.
    tx.commit().context("commit settlement")?;
    Ok(new_balance)
}

fn load_records(conn: &mut Connection, user: UserId) -> Result<Vec<BetRecord>, LedgerError> {
    let Some(id) = user_key(user) else {
        return Ok(Vec::new());
    };
    let mut stmt = conn
        .prepare("SELECT amount, win_amount FROM bets WHERE user_id = ?1 ORDER BY id")
        .context("prepare bet query")?;
    let rows = stmt
        .query_map(params![id], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })
        .context("query bets")?;

    let mut records = Vec::new();
    for row in rows {
        let (amount, win_amount) = row.context("read bet row")?;
        records.push(BetRecord {
            user_id: user,
            amount: u64::try_from(amount).context("negative bet amount")?,
            win_amount: u64::try_from(win_amount).context("negative win amount")?,
        });
    }
    Ok(records)
}
