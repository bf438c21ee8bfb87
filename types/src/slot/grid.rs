use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{SymbolId, COLUMN_LINE_OFFSET, GRID_SIZE, SMALL_JOKER, SMALL_JOKER_SIZE};

/// Joker marking carried by a cell. Serializes as `null`, `"small"` or `"big"`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum JokerKind {
    #[default]
    None,
    Small,
    Big,
}

impl JokerKind {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Small => Some("small"),
            Self::Big => Some("big"),
        }
    }
}

impl Serialize for JokerKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for JokerKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)?.as_deref() {
            None => Ok(Self::None),
            Some("small") => Ok(Self::Small),
            Some("big") => Ok(Self::Big),
            Some(other) => Err(D::Error::unknown_variant(other, &["small", "big"])),
        }
    }
}

/// One position on the grid.
///
/// Invariant: a joker cell is never golden. Fields are private so every cell is built through
/// a constructor that upholds it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    symbol_id: SymbolId,
    is_golden: bool,
    joker_kind: JokerKind,
    joker_size: u8,
}

impl Cell {
    /// A drawn (non-joker) cell.
    pub fn new(symbol_id: SymbolId, is_golden: bool) -> Self {
        Self {
            symbol_id,
            is_golden,
            joker_kind: JokerKind::None,
            joker_size: 0,
        }
    }

    /// The wild cell a golden winning cell turns into.
    pub fn small_joker() -> Self {
        Self {
            symbol_id: SymbolId::from(SMALL_JOKER),
            is_golden: false,
            joker_kind: JokerKind::Small,
            joker_size: SMALL_JOKER_SIZE,
        }
    }

    pub fn symbol_id(&self) -> &SymbolId {
        &self.symbol_id
    }

    pub fn is_golden(&self) -> bool {
        self.is_golden
    }

    pub fn joker_kind(&self) -> JokerKind {
        self.joker_kind
    }

    pub fn joker_size(&self) -> u8 {
        self.joker_size
    }

    pub fn is_joker(&self) -> bool {
        self.joker_kind != JokerKind::None
    }
}

/// A scored line: one of the six rows or six columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Line {
    Row(usize),
    Column(usize),
}

impl Line {
    /// Lines in scoring order: every column, then every row.
    pub fn scan_order() -> impl Iterator<Item = Line> {
        (0..GRID_SIZE)
            .map(Line::Column)
            .chain((0..GRID_SIZE).map(Line::Row))
    }

    /// Wire id: rows are `0..=5`, columns are `6..=11`.
    pub fn id(&self) -> u8 {
        match *self {
            Line::Row(row) => row as u8,
            Line::Column(col) => col as u8 + COLUMN_LINE_OFFSET,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        let size = GRID_SIZE as u8;
        match id {
            id if id < size => Some(Line::Row(id as usize)),
            id if id < COLUMN_LINE_OFFSET + size => {
                Some(Line::Column((id - COLUMN_LINE_OFFSET) as usize))
            }
            _ => None,
        }
    }

    /// Whether the cell at `(row, col)` lies on this line.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        match *self {
            Line::Row(r) => r == row,
            Line::Column(c) => c == col,
        }
    }

    /// Grid coordinates of the line's cells, in line order.
    pub fn positions(&self) -> [(usize, usize); GRID_SIZE] {
        let line = *self;
        std::array::from_fn(|i| match line {
            Line::Row(row) => (row, i),
            Line::Column(col) => (i, col),
        })
    }
}

/// A line that scored, reported with the symbol it paid on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinLine {
    pub line_id: u8,
    pub symbol_id: SymbolId,
}

impl WinLine {
    pub fn new(line: Line, symbol_id: SymbolId) -> Self {
        Self {
            line_id: line.id(),
            symbol_id,
        }
    }

    pub fn line(&self) -> Option<Line> {
        Line::from_id(self.line_id)
    }
}

/// The fixed 6×6 reel window, indexed `[row][col]`.
///
/// Grids are values: transformations produce a new grid and leave the original intact.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Grid {
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl Grid {
    /// Build a grid by calling `f(row, col)` for every position in row-major order.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> Cell) -> Self {
        Self {
            cells: std::array::from_fn(|row| std::array::from_fn(|col| f(row, col))),
        }
    }

    /// Build a grid of plain, non-golden cells from symbol ids.
    pub fn from_symbols(rows: [[&str; GRID_SIZE]; GRID_SIZE]) -> Self {
        Self::from_fn(|row, col| Cell::new(SymbolId::from(rows[row][col]), false))
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[row][col]
    }

    pub fn rows(&self) -> &[[Cell; GRID_SIZE]; GRID_SIZE] {
        &self.cells
    }

    /// The cells of `line`, in line order.
    pub fn line(&self, line: Line) -> [&Cell; GRID_SIZE] {
        line.positions().map(|(row, col)| &self.cells[row][col])
    }

    /// Iterate over `(row, col, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| (row, col, cell))
        })
    }

    /// Return a copy of this grid with one cell replaced.
    pub fn with_cell(mut self, row: usize, col: usize, cell: Cell) -> Self {
        self.cells[row][col] = cell;
        self
    }

    /// Return a new grid with every cell passed through `f(row, col, cell)`.
    pub fn map(&self, mut f: impl FnMut(usize, usize, &Cell) -> Cell) -> Self {
        Self::from_fn(|row, col| f(row, col, &self.cells[row][col]))
    }

    pub fn golden_count(&self) -> usize {
        self.iter().filter(|(_, _, cell)| cell.is_golden()).count()
    }

    pub fn joker_count(&self) -> usize {
        self.iter().filter(|(_, _, cell)| cell.is_joker()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_ids() {
        assert_eq!(Line::Row(0).id(), 0);
        assert_eq!(Line::Row(5).id(), 5);
        assert_eq!(Line::Column(0).id(), 6);
        assert_eq!(Line::Column(5).id(), 11);

        for id in 0..12u8 {
            let line = Line::from_id(id).expect("valid id");
            assert_eq!(line.id(), id);
        }
        assert_eq!(Line::from_id(12), None);
        assert_eq!(Line::from_id(u8::MAX), None);
    }

    #[test]
    fn test_scan_order_columns_then_rows() {
        let ids: Vec<u8> = Line::scan_order().map(|line| line.id()).collect();
        assert_eq!(ids, vec![6, 7, 8, 9, 10, 11, 0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_line_contains() {
        assert!(Line::Row(2).contains(2, 0));
        assert!(Line::Row(2).contains(2, 5));
        assert!(!Line::Row(2).contains(3, 2));
        assert!(Line::Column(4).contains(0, 4));
        assert!(!Line::Column(4).contains(4, 3));
    }

    #[test]
    fn test_small_joker_is_never_golden() {
        let cell = Cell::small_joker();
        assert!(!cell.is_golden());
        assert!(cell.is_joker());
        assert_eq!(cell.joker_kind(), JokerKind::Small);
        assert_eq!(cell.joker_size(), 1);
        assert_eq!(cell.symbol_id().as_str(), SMALL_JOKER);
    }

    #[test]
    fn test_grid_line_cells() {
        let grid = Grid::from_fn(|row, col| Cell::new(SymbolId::new(format!("{row}{col}")), false));
        let column: Vec<&str> = grid
            .line(Line::Column(3))
            .into_iter()
            .map(|cell| cell.symbol_id().as_str())
            .collect();
        assert_eq!(column, vec!["03", "13", "23", "33", "43", "53"]);

        let row: Vec<&str> = grid
            .line(Line::Row(1))
            .into_iter()
            .map(|cell| cell.symbol_id().as_str())
            .collect();
        assert_eq!(row, vec!["10", "11", "12", "13", "14", "15"]);
    }

    #[test]
    fn test_with_cell_leaves_original_untouched() {
        let original = Grid::from_symbols([["7"; GRID_SIZE]; GRID_SIZE]);
        let changed = original.clone().with_cell(0, 0, Cell::small_joker());
        assert_eq!(original.cell(0, 0).symbol_id().as_str(), "7");
        assert_eq!(changed.cell(0, 0).symbol_id().as_str(), SMALL_JOKER);
        assert_eq!(changed.joker_count(), 1);
        assert_eq!(original.joker_count(), 0);
    }

    #[test]
    fn test_joker_kind_json() {
        for (kind, json) in [
            (JokerKind::None, "null"),
            (JokerKind::Small, "\"small\""),
            (JokerKind::Big, "\"big\""),
        ] {
            assert_eq!(serde_json::to_string(&kind).expect("json"), json);
            assert_eq!(serde_json::from_str::<JokerKind>(json).expect("parse"), kind);
        }
        assert!(serde_json::from_str::<JokerKind>("\"none\"").is_err());
    }

    #[test]
    fn test_cell_serializes_camel_case() {
        let value = serde_json::to_value(Cell::new(SymbolId::from("GOLD"), true)).expect("json");
        assert_eq!(
            value,
            serde_json::json!({
                "symbolId": "GOLD",
                "isGolden": true,
                "jokerKind": null,
                "jokerSize": 0
            })
        );
        assert_eq!(
            serde_json::to_value(Cell::small_joker()).expect("json")["jokerKind"],
            "small"
        );

        let value = serde_json::to_value(WinLine::new(Line::Column(0), SymbolId::from("7")))
            .expect("json");
        assert_eq!(value, serde_json::json!({ "lineId": 6, "symbolId": "7" }));
    }
}
