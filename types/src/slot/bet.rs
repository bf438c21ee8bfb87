use serde::{Deserialize, Serialize};

use super::{Grid, WinLine};

/// Identifier of the player whose balance a bet settles against.
pub type UserId = u64;

/// A request to spin once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetRequest {
    pub user_id: UserId,
    pub bet_amount: u64,
    #[serde(default)]
    pub extra_bet: bool,
}

impl BetRequest {
    pub fn new(user_id: UserId, bet_amount: u64, extra_bet: bool) -> Self {
        Self {
            user_id,
            bet_amount,
            extra_bet,
        }
    }
}

/// Outcome of a settled spin, shaped like the `POST /bet` response body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BetResult {
    /// Final grid (after golden conversion).
    pub grid: Grid,
    /// Amount credited to the player: `line_win * multiplier`.
    pub win_amount: u64,
    /// Raw line payout total from the final evaluation.
    pub line_win: u64,
    pub multiplier: u32,
    pub winning_lines: Vec<WinLine>,
    pub new_balance: i64,
}

/// Audit entry written alongside a settlement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetRecord {
    pub user_id: UserId,
    /// Stake taken from the balance.
    pub amount: u64,
    /// Amount credited back.
    pub win_amount: u64,
}

impl BetRecord {
    /// Signed balance change this bet applies (`win_amount - amount`), or `None` on overflow.
    pub fn delta(&self) -> Option<i64> {
        let win = i64::try_from(self.win_amount).ok()?;
        let stake = i64::try_from(self.amount).ok()?;
        win.checked_sub(stake)
    }
}
