/// Rows and columns on the reel grid.
pub const GRID_SIZE: usize = 6;

/// Column line ids start after the row ids (rows 0..=5, columns 6..=11).
pub const COLUMN_LINE_OFFSET: u8 = GRID_SIZE as u8;

/// Total number of scored lines (6 columns + 6 rows).
pub const LINE_COUNT: usize = GRID_SIZE * 2;

/// First and last column that may carry a golden cell.
pub const GOLDEN_MIN_COLUMN: usize = 1;
pub const GOLDEN_MAX_COLUMN: usize = 4;

/// Chance that an eligible cell is golden.
pub const GOLDEN_CHANCE: f64 = 0.15;

/// Chance that a grid receives a forced winning column.
pub const GUARANTEED_WIN_CHANCE: f64 = 0.8;

/// Multiplier floor and cap for a standard bet.
pub const BASE_MULTIPLIER: u32 = 1;
pub const MAX_MULTIPLIER: u32 = 5;

/// Multiplier floor and cap when the extra bet is active.
pub const EXTRA_BET_BASE_MULTIPLIER: u32 = 2;
pub const EXTRA_BET_MAX_MULTIPLIER: u32 = 10;

/// Balance granted when a user record is first created.
pub const STARTING_BALANCE: i64 = 10_000;

/// Symbol written over golden cells on a winning line.
pub const SMALL_JOKER: &str = "SMALL_JOKER";

/// Large joker symbol (matches as wild, never produced by conversion).
pub const BIG_JOKER: &str = "BIG_JOKER";

/// Size attribute stamped on converted jokers.
pub const SMALL_JOKER_SIZE: u8 = 1;
