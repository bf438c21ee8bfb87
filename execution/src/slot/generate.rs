//! Grid generation.
//!
//! Draw order is fixed so that scripted random sources line up with cells:
//! - for each cell in row-major order: one draw for the symbol, one draw for the golden flag
//! - one draw deciding whether a winning column is forced
//! - if forced: one draw for the symbol, one for the column, then one golden draw per row

use goldspin_types::slot::{GOLDEN_MAX_COLUMN, GOLDEN_MIN_COLUMN, GRID_SIZE};
use goldspin_types::{Cell, Grid, Symbol, SymbolTable};

use super::SlotConfig;
use crate::rng::RandomSource;

pub struct GridGenerator<'a> {
    table: &'a SymbolTable,
    config: &'a SlotConfig,
}

impl<'a> GridGenerator<'a> {
    pub fn new(table: &'a SymbolTable, config: &'a SlotConfig) -> Self {
        Self { table, config }
    }

    pub fn generate<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Grid {
        let mut grid = Grid::from_fn(|_, col| {
            let symbol = self.table.weighted_pick(rng.next_unit());
            Cell::new(symbol.id.clone(), self.draw_golden(col, rng))
        });

        if let Some((symbol, col)) = self.draw_forced_column(rng) {
            for row in 0..GRID_SIZE {
                let cell = Cell::new(symbol.id.clone(), self.draw_golden(col, rng));
                grid = grid.with_cell(row, col, cell);
            }
        }

        grid
    }

    /// Golden cells only appear in the inner columns; the draw is consumed either way.
    fn draw_golden<R: RandomSource + ?Sized>(&self, col: usize, rng: &mut R) -> bool {
        let roll = rng.next_unit();
        (GOLDEN_MIN_COLUMN..=GOLDEN_MAX_COLUMN).contains(&col) && roll < self.config.golden_chance
    }

    /// Pick the symbol (uniform over drawable regular symbols) and column of a forced win.
    fn draw_forced_column<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Option<(&'a Symbol, usize)> {
        if rng.next_unit() >= self.config.guaranteed_win_chance {
            return None;
        }
        let symbols: Vec<&'a Symbol> = self.table.selectable_symbols().collect();
        let symbol = symbols[rng.next_index(symbols.len())];
        let col = rng.next_index(GRID_SIZE);
        Some((symbol, col))
    }
}
