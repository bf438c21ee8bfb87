//! Test helpers shared by unit and integration tests (and by downstream crates through the
//! `mocks` feature).

use crate::rng::RandomSource;
use goldspin_types::slot::{BIG_JOKER, SMALL_JOKER};
use goldspin_types::{Symbol, SymbolCategory, SymbolTable};
use std::collections::VecDeque;

/// Replays a fixed sequence of draws.
///
/// Panics when the script runs out, so a test that miscounts draws fails loudly.
#[derive(Clone, Debug)]
pub struct ScriptedRng {
    draws: VecDeque<f64>,
    consumed: usize,
}

impl ScriptedRng {
    pub fn new(draws: Vec<f64>) -> Self {
        Self {
            draws: draws.into(),
            consumed: 0,
        }
    }

    /// Number of draws taken so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedRng {
    fn next_unit(&mut self) -> f64 {
        let Some(value) = self.draws.pop_front() else {
            panic!("scripted rng exhausted after {} draws", self.consumed);
        };
        self.consumed += 1;
        value
    }
}

/// Small table for hand-built grids: three regular symbols with easy payouts.
///
/// Regular weights are A=1, B=1, C=2 (total 4), so a draw in `[0, 0.25)` picks A,
/// `[0.25, 0.5)` picks B and `[0.5, 1)` picks C.
pub fn test_table() -> SymbolTable {
    let symbols = vec![
        Symbol::new("A", 10, SymbolCategory::Regular, 1),
        Symbol::new("B", 20, SymbolCategory::Regular, 1),
        Symbol::new("C", 30, SymbolCategory::Regular, 2),
        Symbol::new("WILD", 0, SymbolCategory::Wild, 1),
        Symbol::new(SMALL_JOKER, 0, SymbolCategory::Wild, 1),
        Symbol::new(BIG_JOKER, 0, SymbolCategory::Wild, 1),
        Symbol::new("SCATTER", 0, SymbolCategory::Scatter, 1),
    ];
    match SymbolTable::new(symbols) {
        Ok(table) => table,
        Err(err) => panic!("test table is valid: {err}"),
    }
}

/// Draws that generate a grid with no golden cells, no forced column, and every cell set to the
/// symbol selected by `symbol_draw`.
pub fn uniform_grid_draws(symbol_draw: f64) -> Vec<f64> {
    let cells = goldspin_types::slot::GRID_SIZE * goldspin_types::slot::GRID_SIZE;
    let mut draws = Vec::with_capacity(cells * 2 + 1);
    for _ in 0..cells {
        draws.extend([symbol_draw, 0.99]);
    }
    draws.push(0.99);
    draws
}
