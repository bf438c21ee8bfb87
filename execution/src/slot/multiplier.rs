use goldspin_types::slot::{
    BASE_MULTIPLIER, EXTRA_BET_BASE_MULTIPLIER, EXTRA_BET_MAX_MULTIPLIER, MAX_MULTIPLIER,
};

/// Payout multiplier for a spin with `winning_lines` lines after conversion.
///
/// Each winning line adds one to the base, up to the cap. Extra bet raises both.
pub fn multiplier(winning_lines: usize, extra_bet: bool) -> u32 {
    let (base, max) = if extra_bet {
        (EXTRA_BET_BASE_MULTIPLIER, EXTRA_BET_MAX_MULTIPLIER)
    } else {
        (BASE_MULTIPLIER, MAX_MULTIPLIER)
    };
    let lines = u32::try_from(winning_lines).unwrap_or(u32::MAX);
    base.saturating_add(lines).min(max)
}
