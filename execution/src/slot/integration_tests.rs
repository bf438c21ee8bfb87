//! End-to-end tests for spin resolution and settlement.
//!
//! These tests drive hand-built or scripted grids through both evaluation passes, the multiplier,
//! and the ledger.

use super::*;
use crate::engine::{EngineConfig, SpinEngine, SpinError};
use crate::ledger::{BalanceLedger, LedgerError, MemoryLedger, OverdraftPolicy};
use crate::mocks::{test_table, uniform_grid_draws, ScriptedRng};
use crate::rng::GameRng;
use futures::future::join_all;
use goldspin_types::slot::{GRID_SIZE, STARTING_BALANCE};
use goldspin_types::{BetRecord, BetRequest, Cell, Line, SymbolId};
use std::sync::Arc;

/// Filler that never completes a line and never uses 7, K, or Q.
fn filler(row: usize, col: usize) -> Cell {
    const FILL: [&str; 5] = ["8", "9", "J", "A", "GOLD"];
    Cell::new(SymbolId::from(FILL[(row + col) % FILL.len()]), false)
}

fn engine(ledger: MemoryLedger, config: EngineConfig) -> SpinEngine<MemoryLedger> {
    SpinEngine::new(Arc::new(SymbolTable::default()), ledger, config)
}

#[tokio::test]
async fn test_single_column_of_sevens() {
    let table = SymbolTable::default();
    let grid = Grid::from_fn(|row, col| {
        if col == 0 {
            Cell::new(SymbolId::from("7"), false)
        } else {
            filler(row, col)
        }
    });

    let outcome = resolve_grid(&table, grid.clone(), false).unwrap();
    assert_eq!(outcome.initial.win_amount, 20);
    assert_eq!(
        outcome.initial.winning_lines,
        vec![WinLine::new(Line::Column(0), SymbolId::from("7"))]
    );
    assert_eq!(outcome.initial.winning_lines[0].line_id, 6);
    // Nothing golden, so the second pass sees the same grid.
    assert_eq!(outcome.grid, grid);
    assert_eq!(outcome.evaluation, outcome.initial);
    assert_eq!(outcome.multiplier, 2);
    assert_eq!(outcome.total_win, 40);

    let engine = engine(
        MemoryLedger::default().with_user(1, STARTING_BALANCE),
        EngineConfig::default(),
    );
    let result = engine
        .settle_outcome(&BetRequest::new(1, 100, false), outcome)
        .await
        .unwrap();
    assert_eq!(result.win_amount, 40);
    assert_eq!(result.line_win, 20);
    assert_eq!(result.multiplier, 2);
    assert_eq!(result.new_balance, STARTING_BALANCE - 100 + 40);
}

#[tokio::test]
async fn test_no_winning_lines_loses_stake() {
    let table = SymbolTable::default();
    let grid = Grid::from_fn(|row, col| {
        let id = if (row + col) % 2 == 0 { "8" } else { "9" };
        Cell::new(SymbolId::from(id), false)
    });

    for (extra_bet, expected_multiplier) in [(false, 1), (true, 2)] {
        let outcome = resolve_grid(&table, grid.clone(), extra_bet).unwrap();
        assert_eq!(outcome.evaluation.win_amount, 0);
        assert!(outcome.winning_lines().is_empty());
        assert_eq!(outcome.multiplier, expected_multiplier);
        assert_eq!(outcome.total_win, 0);

        let engine = engine(
            MemoryLedger::default().with_user(5, 1_000),
            EngineConfig::default(),
        );
        let result = engine
            .settle_outcome(&BetRequest::new(5, 250, extra_bet), outcome)
            .await
            .unwrap();
        assert_eq!(result.win_amount, 0);
        assert_eq!(result.new_balance, 750);
    }
}

#[test]
fn test_golden_conversion_completes_crossing_row() {
    let table = SymbolTable::default();
    // Column 2 is all K; row 3 is all Q except the golden K where it crosses column 2.
    let grid = Grid::from_fn(|row, col| match (row, col) {
        (3, 2) => Cell::new(SymbolId::from("K"), true),
        (_, 2) => Cell::new(SymbolId::from("K"), false),
        (3, _) => Cell::new(SymbolId::from("Q"), false),
        _ => filler(row, col),
    });

    let outcome = resolve_grid(&table, grid, false).unwrap();
    assert_eq!(
        outcome.initial.winning_lines,
        vec![WinLine::new(Line::Column(2), SymbolId::from("K"))]
    );
    assert_eq!(outcome.initial.win_amount, 40);

    assert_eq!(outcome.conversions(), 1);
    assert!(outcome.grid.cell(3, 2).is_joker());
    assert!(outcome.initial_grid.cell(3, 2).is_golden());

    assert_eq!(
        outcome.evaluation.winning_lines,
        vec![
            WinLine::new(Line::Column(2), SymbolId::from("K")),
            WinLine::new(Line::Row(3), SymbolId::from("Q")),
        ]
    );
    assert_eq!(outcome.evaluation.win_amount, 40 + 30);
    assert_eq!(outcome.multiplier, 3);
    assert_eq!(outcome.total_win, 210);
}

#[test]
fn test_golden_cells_off_winning_lines_stay_golden() {
    let table = SymbolTable::default();
    let grid = Grid::from_fn(|row, col| match (row, col) {
        (_, 0) => Cell::new(SymbolId::from("A"), false),
        (1, 3) | (4, 4) => Cell::new(SymbolId::from("K"), true),
        _ => filler(row, col),
    });
    let outcome = resolve_grid(&table, grid, true).unwrap();
    assert_eq!(outcome.conversions(), 0);
    assert_eq!(outcome.grid.golden_count(), 2);
    assert_eq!(outcome.multiplier, 3);
    assert_eq!(outcome.total_win, 50 * 3);
}

#[tokio::test]
async fn test_scripted_bet_with_audit() {
    let ledger = MemoryLedger::default().with_user(2, STARTING_BALANCE);
    let config = EngineConfig {
        audit_bets: true,
        ..EngineConfig::default()
    };
    let engine = SpinEngine::new(Arc::new(test_table()), ledger, config);

    // Every cell draws A: all twelve lines pay 10, multiplier capped at 5.
    let mut rng = ScriptedRng::new(uniform_grid_draws(0.0));
    let result = engine
        .place_bet(&BetRequest::new(2, 100, false), &mut rng)
        .await
        .unwrap();
    assert_eq!(rng.remaining(), 0);
    assert_eq!(result.winning_lines.len(), 12);
    assert_eq!(result.line_win, 120);
    assert_eq!(result.multiplier, 5);
    assert_eq!(result.win_amount, 600);
    assert_eq!(result.new_balance, STARTING_BALANCE + 500);

    // Extra bet lifts the cap to 10.
    let mut rng = ScriptedRng::new(uniform_grid_draws(0.0));
    let result = engine
        .place_bet(&BetRequest::new(2, 100, true), &mut rng)
        .await
        .unwrap();
    assert_eq!(result.multiplier, 10);
    assert_eq!(result.win_amount, 1_200);
    assert_eq!(result.new_balance, STARTING_BALANCE + 500 + 1_100);

    assert_eq!(
        engine.ledger().records().unwrap(),
        vec![
            BetRecord {
                user_id: 2,
                amount: 100,
                win_amount: 600
            },
            BetRecord {
                user_id: 2,
                amount: 100,
                win_amount: 1_200
            },
        ]
    );
}

#[tokio::test]
async fn test_failed_settlement_discards_spin() {
    let ledger = MemoryLedger::new(OverdraftPolicy::Reject).with_user(3, 50);
    let config = EngineConfig {
        audit_bets: true,
        ..EngineConfig::default()
    };
    let engine = SpinEngine::new(Arc::new(test_table()), ledger, config);

    // Alternate A and B so that no line completes.
    let mut draws = Vec::new();
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let symbol = if (row + col) % 2 == 0 { 0.0 } else { 0.3 };
            draws.extend([symbol, 0.99]);
        }
    }
    draws.push(0.99);
    let mut rng = ScriptedRng::new(draws);

    let err = engine
        .place_bet(&BetRequest::new(3, 100, false), &mut rng)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SpinError::Persistence(LedgerError::InsufficientFunds { user: 3, .. })
    ));
    assert!(!err.is_client_error());
    assert_eq!(engine.ledger().balance(3).await.unwrap(), Some(50));
    assert!(engine.ledger().records().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_user_is_persistence_error() {
    let engine = engine(MemoryLedger::default(), EngineConfig::default());
    let mut rng = GameRng::new(b"unknown", 9, 0);
    let err = engine
        .place_bet(&BetRequest::new(9, 10, false), &mut rng)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SpinError::Persistence(LedgerError::UnknownUser(9))
    ));
}

#[tokio::test]
async fn test_replay_is_deterministic() {
    let first = engine(
        MemoryLedger::default().with_user(4, STARTING_BALANCE),
        EngineConfig::default(),
    );
    let second = engine(
        MemoryLedger::default().with_user(4, STARTING_BALANCE),
        EngineConfig::default(),
    );
    let request = BetRequest::new(4, 20, true);
    for spin in 0..20 {
        let a = first
            .place_bet(&request, &mut GameRng::new(b"replay", 4, spin))
            .await
            .unwrap();
        let b = second
            .place_bet(&request, &mut GameRng::new(b"replay", 4, spin))
            .await
            .unwrap();
        assert_eq!(a, b);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_users_settle_exactly() {
    const USERS: u64 = 8;
    const SPINS: u64 = 25;
    const BET: u64 = 10;

    let ledger = MemoryLedger::default();
    for user in 0..USERS {
        ledger.ensure_user(user).await.unwrap();
    }
    let engine = Arc::new(engine(ledger, EngineConfig::default()));

    let handles = (0..USERS).map(|user| {
        let engine = engine.clone();
        tokio::spawn(async move {
            let mut net = 0i64;
            for spin in 0..SPINS {
                let mut rng = GameRng::new(b"concurrent", user, spin);
                let result = engine
                    .place_bet(&BetRequest::new(user, BET, false), &mut rng)
                    .await?;
                net += result.win_amount as i64 - BET as i64;
            }
            Ok::<_, SpinError>((user, net))
        })
    });

    for joined in join_all(handles).await {
        let (user, net) = joined.unwrap().unwrap();
        assert_eq!(
            engine.ledger().balance(user).await.unwrap(),
            Some(STARTING_BALANCE + net)
        );
    }
}

#[tokio::test]
async fn test_out_of_range_delta_settles_nothing() {
    let engine = engine(
        MemoryLedger::default().with_user(1, 500),
        EngineConfig {
            audit_bets: true,
            ..EngineConfig::default()
        },
    );
    let mut rng = GameRng::new(b"overflow", 1, 0);
    let err = engine
        .place_bet(&BetRequest::new(1, u64::MAX, false), &mut rng)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SpinError::Overflow {
            bet_amount: u64::MAX,
            ..
        }
    ));
    assert!(!err.is_client_error());
    assert_eq!(err.public_message(), "Failed to process bet");
    assert_eq!(engine.ledger().balance(1).await.unwrap(), Some(500));
    assert!(engine.ledger().records().unwrap().is_empty());
}

#[tokio::test]
async fn test_bet_result_response_shape() {
    let engine = engine(
        MemoryLedger::default().with_user(6, STARTING_BALANCE),
        EngineConfig::default(),
    );
    let result = engine
        .place_bet(
            &BetRequest::new(6, 100, true),
            &mut GameRng::new(b"shape", 6, 0),
        )
        .await
        .unwrap();

    let value = serde_json::to_value(&result).unwrap();
    let mut keys: Vec<&str> = value
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "grid",
            "lineWin",
            "multiplier",
            "newBalance",
            "winAmount",
            "winningLines"
        ]
    );
    assert_eq!(value["winAmount"], result.win_amount);
    assert_eq!(value["newBalance"], result.new_balance);
    let grid = value["grid"].as_array().unwrap();
    assert_eq!(grid.len(), GRID_SIZE);
    // Generated grids carry no jokers until a golden cell converts.
    for cell in grid.iter().flat_map(|row| row.as_array().unwrap()) {
        let converted = cell["symbolId"] == "SMALL_JOKER";
        assert_eq!(cell["jokerKind"].is_null(), !converted);
    }
}
