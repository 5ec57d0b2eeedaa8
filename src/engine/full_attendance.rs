//! Full-attendance eligibility.
//!
//! Evaluated once, after the whole month has been folded: the rule-driven
//! (or fallback) eligibility decision plus the two fixed override
//! conditions on the month's last workday.

use crate::models::{leave::leave_category, EmployeeMonthlyStats, HolidayCalendar, LeaveApproval};
use crate::rules::{rule_category, FullAttendanceRule, RuleConfig, ThresholdUnit};

/// Decide full-attendance eligibility for a folded month.
pub fn evaluate(
    config: &RuleConfig,
    stats: &EmployeeMonthlyStats,
    calendar: &HolidayCalendar,
    month_leaves: &[LeaveApproval],
) -> bool {
    let eligible = if config.full_attendance_rules.is_empty() {
        fallback_eligibility(config, stats)
    } else {
        rule_eligibility(config, stats)
    };

    if !eligible {
        return false;
    }

    // A valid checkout on the month's last workday is always required.
    if !stats.last_workday_off_duty {
        return false;
    }

    // Punches stopping before the last workday with no leave bridging the
    // gap read as a mid-month separation.
    if let Some(last_workday) = calendar.last_workday_of_month(stats.month) {
        match stats.last_punch_date {
            Some(last_punch) if last_punch < last_workday => {
                let bridged = month_leaves.iter().any(|leave| {
                    leave.start.date() <= last_workday && leave.end.date() > last_punch
                });
                if !bridged {
                    return false;
                }
            }
            None => return false,
            _ => {}
        }
    }

    true
}

/// Configured-rules mode: any enabled rule exceeded voids eligibility.
fn rule_eligibility(config: &RuleConfig, stats: &EmployeeMonthlyStats) -> bool {
    config
        .full_attendance_rules
        .iter()
        .filter(|rule| rule.enabled)
        .all(|rule| actual_value(config, stats, rule) <= rule.threshold)
}

/// Fallback mode: any finding or any leave voids eligibility, except an
/// all-comp-time month when the config permits it.
fn fallback_eligibility(config: &RuleConfig, stats: &EmployeeMonthlyStats) -> bool {
    if stats.late_count > 0 || stats.missing_punch_count > 0 || stats.absenteeism_count > 0 {
        return false;
    }
    if stats.total_leave_hours() > 0.0 {
        return config.comp_time_only_keeps_full_attendance
            && stats.leave_only_from(leave_category::COMP_TIME);
    }
    true
}

/// The statistic a rule measures, in the rule's unit.
fn actual_value(config: &RuleConfig, stats: &EmployeeMonthlyStats, rule: &FullAttendanceRule) -> f64 {
    match rule.category.as_str() {
        rule_category::LATE => match rule.unit {
            ThresholdUnit::Count => f64::from(stats.late_count),
            ThresholdUnit::Hours => stats.raw_late_minutes as f64 / 60.0,
        },
        rule_category::MISSING => f64::from(stats.missing_punch_count),
        rule_category::ABSENTEEISM => match rule.unit {
            ThresholdUnit::Count => f64::from(stats.absenteeism_count),
            ThresholdUnit::Hours => f64::from(stats.absenteeism_count) * config.daily_hour_constant,
        },
        leave_type => match rule.unit {
            ThresholdUnit::Count => f64::from(stats.leave_count_for(leave_type)),
            ThresholdUnit::Hours => stats.leave_hours_for(leave_type),
        },
    }
}
