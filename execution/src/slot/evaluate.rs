//! Line scoring.
//!
//! A line wins when every cell is either the line's base symbol or a wild. The base is the first
//! regular cell in line order; an all-wild line falls back to its first cell and pays that
//! symbol's payout (usually 0) while still counting as a winning line.

use goldspin_types::slot::GRID_SIZE;
use goldspin_types::{Cell, Grid, Line, Symbol, SymbolCategory, SymbolTable, SymbolTableError, WinLine};

/// Result of scoring one grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Sum of the base-symbol payouts of every winning line.
    pub win_amount: u64,
    /// Winning lines in scan order (columns, then rows).
    pub winning_lines: Vec<WinLine>,
}

/// Score every column and row of `grid`.
///
/// A cell whose symbol is not in `table` is a configuration error.
pub fn evaluate(table: &SymbolTable, grid: &Grid) -> Result<Evaluation, SymbolTableError> {
    let mut evaluation = Evaluation::default();
    for line in Line::scan_order() {
        if let Some(base) = score_line(table, &grid.line(line))? {
            evaluation.win_amount = evaluation.win_amount.saturating_add(base.payout);
            evaluation
                .winning_lines
                .push(WinLine::new(line, base.id.clone()));
        }
    }
    Ok(evaluation)
}

/// Returns the symbol a line pays on, or `None` if the line does not win.
fn score_line<'t>(
    table: &'t SymbolTable,
    cells: &[&Cell; GRID_SIZE],
) -> Result<Option<&'t Symbol>, SymbolTableError> {
    let mut base: Option<&'t Symbol> = None;
    let mut matched = 0;
    let mut wild = 0;
    for cell in cells {
        let symbol = table.lookup(cell.symbol_id())?;
        match symbol.category {
            SymbolCategory::Regular => {
                let base = *base.get_or_insert(symbol);
                if base.id == symbol.id {
                    matched += 1;
                }
            }
            SymbolCategory::Wild => wild += 1,
            SymbolCategory::Scatter => {}
        }
    }

    if matched + wild != GRID_SIZE {
        return Ok(None);
    }
    match base {
        Some(base) => Ok(Some(base)),
        None => table.lookup(cells[0].symbol_id()).map(Some),
    }
}
