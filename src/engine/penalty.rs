//! Performance penalty calculation.

use crate::rules::{PenaltyMode, RuleConfig, PENALTY_TIER_OPEN_END};

/// Monetary penalty for the month's billable late minutes.
///
/// Configured tiers are matched first-wins against `[min, max)`; without
/// a match the fixed default ladder applies. Capped mode clamps the result
/// to the configured maximum.
pub fn penalty(config: &RuleConfig, billable_minutes: i64) -> f64 {
    if billable_minutes <= 0 {
        return 0.0;
    }

    let amount = config
        .penalty_rules
        .iter()
        .find(|tier| {
            billable_minutes >= tier.min_minutes
                && (tier.max_minutes == PENALTY_TIER_OPEN_END
                    || billable_minutes < tier.max_minutes)
        })
        .map(|tier| tier.penalty)
        .unwrap_or_else(|| default_ladder(config, billable_minutes));

    match config.penalty_mode {
        PenaltyMode::Capped => amount.min(config.max_performance_penalty),
        PenaltyMode::Unlimited => amount,
    }
}

/// Fixed fallback ladder used when no tier matches.
fn default_ladder(config: &RuleConfig, billable_minutes: i64) -> f64 {
    match billable_minutes {
        ..=5 => 50.0,
        6..=15 => 100.0,
        16..=30 => 150.0,
        31..=45 => 200.0,
        _ => config.max_performance_penalty,
    }
}
