//! Slot spin resolution.
//!
//! A spin runs a fixed pipeline:
//! 1. [generate::GridGenerator] draws a 6×6 grid (weighted symbols, golden cells, forced column).
//! 2. [evaluate::evaluate] scores every column and row (pass 1).
//! 3. [golden::convert_golden] turns golden cells on pass-1 winning lines into small jokers.
//! 4. [evaluate::evaluate] scores the converted grid (pass 2), which supersedes pass 1.
//! 5. [multiplier::multiplier] scales the pass-2 line total.
//!
//! Everything here is pure and synchronous: given the same table, config, and random draws it
//! produces the same [SpinOutcome]. Settlement lives in [crate::engine].

pub mod evaluate;
pub mod generate;
pub mod golden;
#[cfg(test)]
mod integration_tests;
pub mod multiplier;

use goldspin_types::slot::{GOLDEN_CHANCE, GUARANTEED_WIN_CHANCE};
use goldspin_types::{Grid, SymbolTable, SymbolTableError, WinLine};
use thiserror::Error as ThisError;

use crate::rng::RandomSource;
pub use evaluate::{evaluate, Evaluation};
pub use generate::GridGenerator;
pub use golden::convert_golden;
pub use multiplier::multiplier;

/// Tunable probabilities for grid generation.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotConfig {
    /// Chance that a cell in columns 1..=4 is golden.
    pub golden_chance: f64,
    /// Chance that a grid receives a forced winning column.
    pub guaranteed_win_chance: f64,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            golden_chance: GOLDEN_CHANCE,
            guaranteed_win_chance: GUARANTEED_WIN_CHANCE,
        }
    }
}

#[derive(Debug, ThisError, PartialEq)]
pub enum SlotConfigError {
    #[error("{field} must be within [0, 1] (got {value})")]
    ChanceOutOfRange { field: &'static str, value: f64 },
}

impl SlotConfig {
    pub fn validate(&self) -> Result<(), SlotConfigError> {
        for (field, value) in [
            ("golden_chance", self.golden_chance),
            ("guaranteed_win_chance", self.guaranteed_win_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SlotConfigError::ChanceOutOfRange { field, value });
            }
        }
        Ok(())
    }
}

/// Everything a spin computed before settlement.
///
/// Both passes are kept so the conversion step can be inspected; only the final evaluation
/// drives the payout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpinOutcome {
    /// Grid as generated.
    pub initial_grid: Grid,
    /// Pass-1 evaluation of `initial_grid`.
    pub initial: Evaluation,
    /// Grid after golden conversion.
    pub grid: Grid,
    /// Pass-2 evaluation of `grid`.
    pub evaluation: Evaluation,
    pub multiplier: u32,
    /// `evaluation.win_amount * multiplier`.
    pub total_win: u64,
}

impl SpinOutcome {
    pub fn winning_lines(&self) -> &[WinLine] {
        &self.evaluation.winning_lines
    }

    /// Number of golden cells that became jokers.
    pub fn conversions(&self) -> usize {
        self.grid
            .joker_count()
            .saturating_sub(self.initial_grid.joker_count())
    }
}

/// Generate a grid and resolve it.
pub fn resolve_spin<R: RandomSource + ?Sized>(
    table: &SymbolTable,
    config: &SlotConfig,
    extra_bet: bool,
    rng: &mut R,
) -> Result<SpinOutcome, SymbolTableError> {
    let grid = GridGenerator::new(table, config).generate(rng);
    resolve_grid(table, grid, extra_bet)
}

/// Resolve an already generated grid: evaluate, convert, re-evaluate, multiply.
pub fn resolve_grid(
    table: &SymbolTable,
    initial_grid: Grid,
    extra_bet: bool,
) -> Result<SpinOutcome, SymbolTableError> {
    let initial = evaluate(table, &initial_grid)?;
    let grid = convert_golden(&initial_grid, &initial.winning_lines);
    let evaluation = evaluate(table, &grid)?;
    let multiplier = multiplier(evaluation.winning_lines.len(), extra_bet);
    let total_win = evaluation.win_amount.saturating_mul(multiplier as u64);
    Ok(SpinOutcome {
        initial_grid,
        initial,
        grid,
        evaluation,
        multiplier,
        total_win,
    })
}
