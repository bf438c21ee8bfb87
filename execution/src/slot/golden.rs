//! Golden-cell conversion between the two evaluation passes.

use goldspin_types::{Cell, Grid, Line, WinLine};

/// Replace every golden cell lying on a winning line with a small joker.
///
/// The input grid is left untouched. Cells off the winning lines, and non-golden cells on them,
/// are copied as-is. A cell on two winning lines converts once.
pub fn convert_golden(grid: &Grid, winning_lines: &[WinLine]) -> Grid {
    let lines: Vec<Line> = winning_lines.iter().filter_map(WinLine::line).collect();
    if lines.is_empty() {
        return grid.clone();
    }
    grid.map(|row, col, cell| {
        if cell.is_golden() && lines.iter().any(|line| line.contains(row, col)) {
            Cell::small_joker()
        } else {
            cell.clone()
        }
    })
}
