//! Common types used throughout goldspin.

pub mod slot;

pub use slot::{
    BetRecord, BetRequest, BetResult, Cell, Grid, JokerKind, Line, Symbol, SymbolCategory,
    SymbolId, SymbolTable, SymbolTableError, UserId, WinLine,
};
