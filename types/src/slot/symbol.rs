use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};
use thiserror::Error as ThisError;

use super::{BIG_JOKER, SMALL_JOKER};

/// Identifier of a symbol in the [SymbolTable] (e.g. `"7"`, `"GOLD"`, `"SMALL_JOKER"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(String);

impl SymbolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SymbolId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a symbol behaves when lines are scored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolCategory {
    /// Drawn onto the grid and paid when a line matches.
    Regular,
    /// Matches any regular symbol.
    Wild,
    /// Never matches; reserved for features outside line scoring.
    Scatter,
}

/// A single entry of the paytable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: SymbolId,
    pub payout: u64,
    pub category: SymbolCategory,
    pub weight: u32,
}

impl Symbol {
    pub fn new(id: &str, payout: u64, category: SymbolCategory, weight: u32) -> Self {
        Self {
            id: SymbolId::from(id),
            payout,
            category,
            weight,
        }
    }

    pub fn is_regular(&self) -> bool {
        self.category == SymbolCategory::Regular
    }

    pub fn is_wild(&self) -> bool {
        self.category == SymbolCategory::Wild
    }
}

#[derive(Debug, ThisError)]
pub enum SymbolTableError {
    #[error("duplicate symbol id: {0}")]
    DuplicateSymbol(SymbolId),
    #[error("no regular symbol has a positive weight")]
    NothingSelectable,
    #[error("symbol {0} must be present with category wild")]
    MissingJoker(SymbolId),
    #[error("unknown symbol: {0}")]
    UnknownSymbol(SymbolId),
    #[error("invalid symbol table json: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Immutable symbol configuration: payouts, categories, and draw weights.
///
/// Table order is significant: weighted draws walk the regular symbols in the order they were
/// supplied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    /// Index of the last regular symbol with a positive weight.
    last_selectable: usize,
}

impl SymbolTable {
    /// Build a table, rejecting configurations the engine cannot run with.
    pub fn new(symbols: Vec<Symbol>) -> Result<Self, SymbolTableError> {
        let mut seen = HashSet::with_capacity(symbols.len());
        for symbol in &symbols {
            if !seen.insert(&symbol.id) {
                return Err(SymbolTableError::DuplicateSymbol(symbol.id.clone()));
            }
        }

        let small_joker = SymbolId::from(SMALL_JOKER);
        if !symbols.iter().any(|s| s.id == small_joker && s.is_wild()) {
            return Err(SymbolTableError::MissingJoker(small_joker));
        }

        let last_selectable =
            last_selectable_index(&symbols).ok_or(SymbolTableError::NothingSelectable)?;
        Ok(Self {
            symbols,
            last_selectable,
        })
    }

    /// Parse a JSON array of symbols, e.g.
    /// `[{"id":"7","payout":20,"category":"regular","weight":1}, ...]`.
    pub fn from_json(text: &str) -> Result<Self, SymbolTableError> {
        let symbols: Vec<Symbol> = serde_json::from_str(text)?;
        Self::new(symbols)
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn get(&self, id: &SymbolId) -> Option<&Symbol> {
        self.symbols.iter().find(|s| &s.id == id)
    }

    /// Like [Self::get], but a miss is a configuration error.
    pub fn lookup(&self, id: &SymbolId) -> Result<&Symbol, SymbolTableError> {
        self.get(id)
            .ok_or_else(|| SymbolTableError::UnknownSymbol(id.clone()))
    }

    /// Regular symbols in table order.
    pub fn regular_symbols(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.symbols.iter().filter(|s| s.is_regular())
    }

    /// Regular symbols that can actually be drawn (positive weight).
    pub fn selectable_symbols(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.regular_symbols().filter(|s| s.weight > 0)
    }

    /// Sum of the regular symbols' weights.
    pub fn total_weight(&self) -> u64 {
        self.regular_symbols().map(|s| s.weight as u64).sum()
    }

    /// Pick a regular symbol with `fraction` in `[0, 1)` as a cumulative-weight cursor.
    ///
    /// The cursor starts at `fraction * total_weight` and each symbol's weight is subtracted in
    /// table order; the first symbol that brings the cursor to zero or below is selected.
    /// Zero-weight symbols are skipped so they can never be selected.
    pub fn weighted_pick(&self, fraction: f64) -> &Symbol {
        let mut cursor = fraction * self.total_weight() as f64;
        for symbol in self.selectable_symbols() {
            cursor -= symbol.weight as f64;
            if cursor <= 0.0 {
                return symbol;
            }
        }
        // Rounding can leave a sliver of cursor for fractions just below 1.0.
        &self.symbols[self.last_selectable]
    }
}

fn last_selectable_index(symbols: &[Symbol]) -> Option<usize> {
    symbols.iter().rposition(|s| s.is_regular() && s.weight > 0)
}

impl Default for SymbolTable {
    /// The stock paytable.
    fn default() -> Self {
        use SymbolCategory::{Regular, Scatter, Wild};
        let symbols = vec![
            Symbol::new("7", 20, Regular, 1),
            Symbol::new("8", 20, Regular, 1),
            Symbol::new("9", 20, Regular, 1),
            Symbol::new("J", 30, Regular, 1),
            Symbol::new("Q", 30, Regular, 1),
            Symbol::new("K", 40, Regular, 1),
            Symbol::new("A", 50, Regular, 1),
            Symbol::new("GOLD", 100, Regular, 1),
            Symbol::new("DIAMOND", 80, Regular, 2),
            Symbol::new("CLUB", 60, Regular, 3),
            Symbol::new("HEART", 50, Regular, 4),
            Symbol::new("SPADE", 40, Regular, 5),
            Symbol::new("WILD", 0, Wild, 1),
            Symbol::new(SMALL_JOKER, 0, Wild, 2),
            Symbol::new(BIG_JOKER, 0, Wild, 1),
            Symbol::new("SCATTER", 0, Scatter, 1),
        ];
        let last_selectable = last_selectable_index(&symbols).unwrap_or_default();
        Self {
            symbols,
            last_selectable,
        }
    }
}
