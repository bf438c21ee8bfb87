//! Slot domain types.
//!
//! Defines the symbol table, grid, line, and bet types shared by the execution layer and the
//! simulator.

mod bet;
mod constants;
mod grid;
mod symbol;

pub use bet::*;
pub use constants::*;
pub use grid::*;
pub use symbol::*;
