//! Monthly lateness exemption accumulation.
//!
//! A company may forgive a limited number of minor late arrivals per month.
//! The budget state is threaded through the monthly fold in ascending day
//! order; it is the only stateful piece of per-day evaluation.

use crate::rules::RuleConfig;

/// Exemption budget state carried across a month's fold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExemptionState {
    /// Exemption slots consumed so far this month.
    pub used: u32,
}

/// Result of applying the exemption policy to one late day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExemptionOutcome {
    /// Late minutes that remain billable after forgiveness.
    pub billable_minutes: i64,
    /// Budget state to carry into the next day.
    pub state: ExemptionState,
}

/// Apply the monthly exemption policy to one day's raw late minutes.
pub fn apply(
    config: &RuleConfig,
    late_minutes: i64,
    state: ExemptionState,
    is_workday: bool,
) -> ExemptionOutcome {
    if late_minutes <= 0 {
        return ExemptionOutcome {
            billable_minutes: 0,
            state,
        };
    }

    if !config.late_exemption_enabled || state.used >= config.late_exemption_count {
        return ExemptionOutcome {
            billable_minutes: late_minutes,
            state,
        };
    }

    if is_workday && late_minutes <= config.late_exemption_minutes {
        // Minor lateness, fully forgiven at the cost of one slot.
        return ExemptionOutcome {
            billable_minutes: 0,
            state: ExemptionState {
                used: state.used + 1,
            },
        };
    }

    if late_minutes > config.late_exemption_minutes {
        // Oversized lateness: one slot forgives only the threshold part.
        return ExemptionOutcome {
            billable_minutes: late_minutes - config.late_exemption_minutes,
            state: ExemptionState {
                used: state.used + 1,
            },
        };
    }

    ExemptionOutcome {
        billable_minutes: late_minutes,
        state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RuleConfig {
        RuleConfig {
            late_exemption_enabled: true,
            late_exemption_count: 3,
            late_exemption_minutes: 15,
            ..RuleConfig::default()
        }
    }

    #[test]
    fn test_three_day_scenario() {
        let config = config();
        let mut state = ExemptionState::default();

        // Day 1: 10 minutes, fully forgiven.
        let out = apply(&config, 10, state, true);
        assert_eq!(out.billable_minutes, 0);
        assert_eq!(out.state.used, 1);
        state = out.state;

        // Day 2: 20 minutes, only the excess over 15 stays billable.
        let out = apply(&config, 20, state, true);
        assert_eq!(out.billable_minutes, 5);
        assert_eq!(out.state.used, 2);
        state = out.state;

        // Day 3: 5 minutes, fully forgiven, budget exhausted.
        let out = apply(&config, 5, state, true);
        assert_eq!(out.billable_minutes, 0);
        assert_eq!(out.state.used, 3);
        state = out.state;

        // Day 4: budget gone, fully billable whatever the size.
        let out = apply(&config, 3, state, true);
        assert_eq!(out.billable_minutes, 3);
        assert_eq!(out.state.used, 3);
    }

    #[test]
    fn test_budget_never_exceeds_count() {
        let config = config();
        let mut state = ExemptionState::default();
        for _ in 0..10 {
            state = apply(&config, 10, state, true).state;
        }
        assert!(state.used <= config.late_exemption_count);
    }

    #[test]
    fn test_disabled_exemption_bills_everything() {
        let mut config = config();
        config.late_exemption_enabled = false;
        let out = apply(&config, 10, ExemptionState::default(), true);
        assert_eq!(out.billable_minutes, 10);
        assert_eq!(out.state.used, 0);
    }

    #[test]
    fn test_non_workday_minor_lateness_not_forgiven() {
        let config = config();
        let out = apply(&config, 10, ExemptionState::default(), false);
        assert_eq!(out.billable_minutes, 10);
        assert_eq!(out.state.used, 0);
    }

    #[test]
    fn test_zero_minutes_untouched() {
        let config = config();
        let state = ExemptionState { used: 2 };
        let out = apply(&config, 0, state, true);
        assert_eq!(out.billable_minutes, 0);
        assert_eq!(out.state, state);
    }
}
