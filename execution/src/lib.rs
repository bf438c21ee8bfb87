//! Goldspin execution layer.
//!
//! This crate resolves slot spins and settles them against a balance ledger. Spin resolution
//! ([slot]) is pure: the grid, both evaluation passes, and the multiplier are a function of the
//! symbol table, the slot config, and the draws taken from the injected [RandomSource].
//! Settlement goes through the [BalanceLedger] trait, so persistence is swappable.
//!
//! ## Determinism requirements
//! - Do not use wall-clock time inside spin resolution.
//! - Do not draw from an ambient generator; only draw from the provided [RandomSource].
//! - Keep the draw order documented in [slot::generate] stable; scripted tests depend on it.
//!
//! The primary entrypoint is [`SpinEngine`].
//!
//! ## Placing a bet (example)
//! ```rust,ignore
//! use goldspin_execution::{EngineConfig, GameRng, MemoryLedger, SpinEngine};
//! use goldspin_types::{BetRequest, SymbolTable};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), goldspin_execution::SpinError> {
//! let engine = SpinEngine::new(
//!     Arc::new(SymbolTable::default()),
//!     MemoryLedger::default(),
//!     EngineConfig::default(),
//! );
//! engine.ledger().ensure_user(1).await?;
//! let mut rng = GameRng::new(b"seed", 1, 0);
//! let result = engine.place_bet(&BetRequest::new(1, 100, false), &mut rng).await?;
//! println!("won {} at x{}", result.win_amount, result.multiplier);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod ledger;
pub mod rng;
pub mod slot;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use engine::{EngineConfig, SpinEngine, SpinError, PUBLIC_ERROR_MESSAGE};
pub use ledger::{BalanceLedger, LedgerError, MemoryLedger, OverdraftPolicy};
pub use rng::{EntropySource, GameRng, RandomSource};
pub use slot::{
    convert_golden, evaluate, multiplier, resolve_grid, resolve_spin, Evaluation, GridGenerator,
    SlotConfig, SlotConfigError, SpinOutcome,
};
