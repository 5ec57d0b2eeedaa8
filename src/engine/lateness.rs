//! Lateness resolution.
//!
//! Computes the effective on-duty threshold for a day and the raw late
//! minutes against it. The threshold moves with the previous day's checkout
//! time, the first-workday grace, and morning leave approvals.

use crate::models::{CheckType, HolidayCalendar, LeaveApproval, PunchRecord, PunchSource, TimeResult};
use crate::rules::RuleConfig;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Checkout at or after this time relaxes the next morning's threshold.
fn night_checkout() -> NaiveTime {
    NaiveTime::from_hms_opt(20, 30, 0).unwrap()
}

/// Relaxed on-duty threshold granted by a late checkout or the
/// first-workday grace.
fn grace_threshold() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 30, 0).unwrap()
}

/// Afternoon session start; morning leave can push the threshold no further.
fn afternoon_start() -> NaiveTime {
    NaiveTime::from_hms_opt(13, 30, 0).unwrap()
}

/// Per-day inputs the resolver needs besides the punch itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatenessContext {
    /// Previous day's effective off-duty time, if signed.
    pub prev_day_off_duty: Option<NaiveDateTime>,
    /// Previous day had an approval-sourced off-duty punch at/after 20:30.
    pub prev_day_approval_after_night: bool,
    /// The employee's first calendar day of employment.
    pub hire_date: Option<NaiveDate>,
}

impl LatenessContext {
    /// Derive the previous-day facts from that day's effective off-duty record.
    pub fn from_previous_day(prev_off_duty: Option<&PunchRecord>, hire_date: Option<NaiveDate>) -> Self {
        let prev_time = prev_off_duty.and_then(|r| r.user_check_time);
        let approval_after_night = prev_off_duty.is_some_and(|r| {
            r.source == PunchSource::Approval
                && r.user_check_time
                    .is_some_and(|t| t.time() >= night_checkout())
        });
        Self {
            prev_day_off_duty: prev_time,
            prev_day_approval_after_night: approval_after_night,
            hire_date,
        }
    }
}

/// Raw late minutes for one OnDuty record, always `>= 0`.
pub fn late_minutes(
    record: &PunchRecord,
    day_leaves: &[LeaveApproval],
    config: &RuleConfig,
    calendar: &HolidayCalendar,
    ctx: &LatenessContext,
) -> i64 {
    // Only a signed OnDuty punch the upstream marked late can carry lateness.
    if record.check_type != CheckType::OnDuty || record.time_result != TimeResult::Late {
        return 0;
    }
    let Some(check_in) = record.user_check_time else {
        return 0;
    };

    // Hire-day grace.
    if ctx.hire_date == Some(record.work_date) {
        return 0;
    }

    let threshold = effective_threshold(record.work_date, day_leaves, config, calendar, ctx);
    let threshold_at = record.work_date.and_time(threshold);

    ((check_in - threshold_at).num_minutes()).max(0)
}

/// Effective on-duty threshold for the given day.
pub fn effective_threshold(
    work_date: NaiveDate,
    day_leaves: &[LeaveApproval],
    config: &RuleConfig,
    calendar: &HolidayCalendar,
    ctx: &LatenessContext,
) -> NaiveTime {
    let mut threshold = if ctx
        .prev_day_off_duty
        .is_some_and(|t| t.time() >= night_checkout())
    {
        grace_threshold()
    } else if calendar.first_workday_of_month(work_date) == Some(work_date) {
        grace_threshold()
    } else {
        threshold_from_late_rules(config, ctx.prev_day_off_duty)
    };

    // Morning leave ending between the threshold and the afternoon session
    // pushes the threshold out, capped at the afternoon start.
    if let Some(leave_end) = latest_morning_leave_end(work_date, day_leaves, threshold) {
        threshold = leave_end.min(afternoon_start());
    }

    if ctx.prev_day_approval_after_night {
        threshold = grace_threshold();
    }

    threshold
}

/// First satisfied configured late rule wins; otherwise the default start.
fn threshold_from_late_rules(config: &RuleConfig, prev_off_duty: Option<NaiveDateTime>) -> NaiveTime {
    if let Some(prev) = prev_off_duty {
        for rule in &config.late_rules {
            if prev.time() >= rule.previous_day_checkout {
                return rule.late_threshold;
            }
        }
    }
    config.work_start
}

/// Latest leave end on `work_date` strictly inside `(threshold, 13:30)`.
fn latest_morning_leave_end(
    work_date: NaiveDate,
    day_leaves: &[LeaveApproval],
    threshold: NaiveTime,
) -> Option<NaiveTime> {
    day_leaves
        .iter()
        .filter(|leave| leave.end.date() == work_date)
        .map(|leave| leave.end.time())
        .filter(|end| *end > threshold && *end < afternoon_start())
        .max()
}
