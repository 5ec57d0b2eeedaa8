//! Leave coverage resolution.
//!
//! Decides whether an instant (or a missing punch) is justified by an
//! approved leave, and prorates an approval's hours onto a single day when
//! it spans several.

use crate::models::{DurationUnit, LeaveApproval};
use crate::rules::RuleConfig;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Find the approval, if any, covering the given instant.
///
/// Day-unit approvals cover by calendar date (inclusive bounds); hour-unit
/// approvals cover their `[start, end]` interval literally. Zero-duration
/// approvals never cover anything.
pub fn covering_leave<'a>(
    instant: NaiveDateTime,
    day_leaves: &'a [LeaveApproval],
) -> Option<&'a LeaveApproval> {
    day_leaves.iter().find(|leave| match leave.duration_unit {
        DurationUnit::Day => leave.duration > 0.0 && leave.touches_date(instant.date()),
        DurationUnit::Hour => {
            leave.start < leave.end && instant >= leave.start && instant <= leave.end
        }
    })
}

/// Hours one approval contributes to one calendar date.
///
/// Interior days of a multi-day span contribute the full daily constant;
/// boundary days are clipped against the working window. The result is
/// clamped to `[0, daily_hour_constant]` and degrades to zero for
/// malformed approvals.
pub fn hours_on_date(approval: &LeaveApproval, date: NaiveDate, config: &RuleConfig) -> f64 {
    if !approval.touches_date(date) {
        return 0.0;
    }

    let constant = config.daily_hour_constant;
    let start_date = approval.start.date();
    let end_date = approval.end.date();

    // Interior day of a multi-day span.
    if date > start_date && date < end_date {
        return constant;
    }

    let hours = match approval.duration_unit {
        DurationUnit::Day => {
            if approval.duration <= 0.0 {
                return 0.0;
            }
            let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
            let day_granular =
                approval.start.time() == midnight && approval.end.time() == midnight;
            if day_granular {
                // Spread the stated duration over the span front-to-back, so
                // a fractional tail (1.5 days over two dates) lands on the
                // last day and whole spans stay one full constant per day.
                let days_before = (date - start_date).num_days().max(0) as f64;
                approval.duration_hours(constant) - constant * days_before
            } else {
                clipped_working_hours(approval, date, config)
            }
        }
        DurationUnit::Hour => {
            if approval.start >= approval.end {
                return 0.0;
            }
            if start_date == end_date {
                // Same-day approval: the stated duration is authoritative.
                approval.duration.max(0.0)
            } else {
                clipped_working_hours(approval, date, config)
            }
        }
    };

    hours.clamp(0.0, constant)
}

/// Sum of leave hours all approvals contribute to one date.
pub fn day_leave_hours(day_leaves: &[LeaveApproval], date: NaiveDate, config: &RuleConfig) -> f64 {
    day_leaves
        .iter()
        .map(|leave| hours_on_date(leave, date, config))
        .sum()
}

/// Whether the summed leave hours make the date a full-day leave day.
pub fn is_full_day_leave(day_leaves: &[LeaveApproval], date: NaiveDate, config: &RuleConfig) -> bool {
    day_leave_hours(day_leaves, date, config) >= config.daily_hour_constant
}

/// Intersect the approval interval with the working window on `date`,
/// subtracting lunch only when the intersected span crosses it.
fn clipped_working_hours(approval: &LeaveApproval, date: NaiveDate, config: &RuleConfig) -> f64 {
    let work_start = date.and_time(config.work_start);
    let work_end = date.and_time(config.work_end);

    let span_start = approval.start.max(work_start);
    let span_end = approval.end.min(work_end);
    if span_start >= span_end {
        return 0.0;
    }

    let mut minutes = (span_end - span_start).num_minutes();

    let lunch_start = date.and_time(config.lunch_start);
    let lunch_end = date.and_time(config.lunch_end);
    if span_start < lunch_start && span_end > lunch_end {
        minutes -= (lunch_end - lunch_start).num_minutes();
    }

    (minutes.max(0) as f64) / 60.0
}
