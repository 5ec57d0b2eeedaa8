//! Monthly per-employee aggregation.
//!
//! Folds one employee's month in ascending date order exactly once. The
//! exemption budget and the previous-day checkout lookups make the order a
//! hard requirement; everything else is per-day local.

use crate::engine::{exemption, full_attendance, lateness, leave, overtime, penalty};
use crate::engine::exemption::ExemptionState;
use crate::engine::lateness::LatenessContext;
use crate::error::{EngineError, Result};
use crate::models::{
    DailyAttendanceStatus, DayPunches, DayStatus, EmployeeMonthlyStats, HolidayCalendar,
    LeaveApproval, PunchRecord,
};
use crate::rules::{AttendanceDaysRule, RuleConfig};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, HashMap};

/// Shared, immutable inputs for one evaluation run.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub config: &'a RuleConfig,
    pub calendar: &'a HolidayCalendar,
}

/// One employee's raw month of data.
#[derive(Debug, Clone)]
pub struct MonthInput {
    pub employee_id: String,
    /// First day of the month to evaluate.
    pub month: NaiveDate,
    pub punches: Vec<PunchRecord>,
    /// Leave approvals keyed by workflow instance id.
    pub leaves: HashMap<String, LeaveApproval>,
    pub hire_date: Option<NaiveDate>,
}

/// Evaluate one employee's month into final statistics.
pub fn evaluate_month(ctx: &EvaluationContext<'_>, input: &MonthInput) -> Result<EmployeeMonthlyStats> {
    if input.month.day() != 1 {
        return Err(EngineError::validation(format!(
            "Month must be given as its first day, got {}",
            input.month
        )));
    }
    ctx.config.validate()?;

    let mut stats = EmployeeMonthlyStats::new(input.employee_id.clone(), input.month);

    let month_leaves: Vec<LeaveApproval> = input.leaves.values().cloned().collect();
    let punches_by_date = group_punches(input, &mut stats);

    let last_workday = ctx.calendar.last_workday_of_month(input.month);
    let last_day = month_end(input.month);

    let mut exemption_state = ExemptionState::default();
    let mut prev_punches = DayPunches::default();
    let mut billable_total: i64 = 0;
    let mut leave_counted = vec![false; month_leaves.len()];

    let mut date = input.month;
    while date <= last_day {
        let day_punches = match punches_by_date.get(&date) {
            Some(records) => DayPunches::from_records(records.iter().copied()),
            None => DayPunches::default(),
        };
        let day_leaves: Vec<LeaveApproval> = month_leaves
            .iter()
            .filter(|l| l.touches_date(date))
            .cloned()
            .collect();
        let is_workday = ctx.calendar.is_workday(date);

        // Leave hours accrue on workdays only; rest days cost no attendance.
        let mut full_day_leave = false;
        if is_workday {
            for (idx, approval) in month_leaves.iter().enumerate() {
                if !approval.touches_date(date) {
                    continue;
                }
                let hours = leave::hours_on_date(approval, date, ctx.config);
                stats.add_leave_hours(&approval.leave_type, hours);
                if hours > 0.0 && !leave_counted[idx] {
                    leave_counted[idx] = true;
                    stats.count_leave(&approval.leave_type);
                }
            }
            full_day_leave = leave::is_full_day_leave(&day_leaves, date, ctx.config);
        }

        // Lateness is resolved wherever a late OnDuty record exists; the
        // exemption policy itself distinguishes workdays.
        let mut raw_late = 0;
        if let Some(on_duty) = &day_punches.on_duty {
            if !full_day_leave {
                let late_ctx =
                    LatenessContext::from_previous_day(prev_punches.off_duty.as_ref(), input.hire_date);
                raw_late = lateness::late_minutes(
                    on_duty,
                    &day_leaves,
                    ctx.config,
                    ctx.calendar,
                    &late_ctx,
                );
                if raw_late > 0 {
                    stats.late_count += 1;
                    stats.raw_late_minutes += raw_late;
                    let outcome =
                        exemption::apply(ctx.config, raw_late, exemption_state, is_workday);
                    billable_total += outcome.billable_minutes;
                    exemption_state = outcome.state;
                }
            }
        }

        // Missing punches and absenteeism only exist on uncovered workdays.
        let mut missing_on = false;
        let mut missing_off = false;
        if is_workday && !full_day_leave {
            missing_on = punch_is_missing(
                day_punches.on_duty.as_ref(),
                date.and_time(ctx.config.work_start),
                &day_leaves,
            );
            missing_off = punch_is_missing(
                day_punches.off_duty.as_ref(),
                date.and_time(ctx.config.work_end),
                &day_leaves,
            );
            if missing_on && missing_off {
                stats.absenteeism_count += 1;
            } else {
                if missing_on {
                    stats.missing_punch_count += 1;
                }
                if missing_off {
                    stats.missing_punch_count += 1;
                }
            }
        }

        // Overtime past the configured checkpoints, from the final checkout.
        if let Some(off_time) = signed_off_duty(&day_punches) {
            let result = overtime::overtime(off_time, date, &ctx.config.overtime_checkpoints);
            for (label, minutes) in result.per_checkpoint {
                *stats
                    .overtime_per_checkpoint
                    .entry(label)
                    .or_insert(0.0) += minutes;
            }
            stats.overtime_total_minutes += result.total_minutes;
        }

        if day_punches.on_duty_time().is_some() || signed_off_duty(&day_punches).is_some() {
            stats.last_punch_date = Some(date);
        }
        if Some(date) == last_workday && signed_off_duty(&day_punches).is_some() {
            stats.last_workday_off_duty = true;
        }

        let status = day_status(
            is_workday,
            full_day_leave,
            raw_late,
            missing_on,
            missing_off,
        );
        stats.days.push(DailyAttendanceStatus {
            date,
            status,
            on_duty: day_punches.on_duty_time(),
            off_duty: day_punches.off_duty_time(),
            has_abnormality: matches!(
                status,
                DayStatus::Late | DayStatus::MissingPunch | DayStatus::Absenteeism
            ),
        });

        prev_punches = day_punches;
        date = date.succ_opt().ok_or_else(|| {
            EngineError::validation(format!("Date overflow after {date}"))
        })?;
    }

    finalize(ctx, input, &mut stats, exemption_state, billable_total, &month_leaves);
    Ok(stats)
}

/// Final tallies that need the complete month.
fn finalize(
    ctx: &EvaluationContext<'_>,
    input: &MonthInput,
    stats: &mut EmployeeMonthlyStats,
    exemption_state: ExemptionState,
    billable_total: i64,
    month_leaves: &[LeaveApproval],
) {
    stats.exemption_used = exemption_state.used;
    stats.billable_late_minutes = billable_total;
    stats.performance_penalty = penalty::penalty(ctx.config, billable_total);

    let workdays = ctx.calendar.workdays_in_month(input.month) as f64;
    stats.should_attendance_days = match ctx.config.attendance_days_rule {
        AttendanceDaysRule::WorkdaysOnly => workdays,
        AttendanceDaysRule::Fixed { days } => days,
        AttendanceDaysRule::WorkdaysAndHolidays => {
            workdays + ctx.calendar.holidays_in_month(input.month) as f64
        }
    };

    // Each leave category rounds up to whole days independently, then the
    // day equivalents sum; this is deliberately not a rounding of the total.
    let leave_day_equivalents: f64 = stats
        .leave_hours
        .values()
        .map(|hours| (hours / ctx.config.daily_hour_constant).ceil())
        .sum();
    stats.actual_attendance_days = (workdays - leave_day_equivalents).max(0.0);

    stats.is_full_attendance =
        full_attendance::evaluate(ctx.config, stats, ctx.calendar, month_leaves);
}

/// Group punches by work date, discarding ones outside the month.
fn group_punches<'a>(
    input: &'a MonthInput,
    stats: &mut EmployeeMonthlyStats,
) -> BTreeMap<NaiveDate, Vec<&'a PunchRecord>> {
    let end = month_end(input.month);
    let mut by_date: BTreeMap<NaiveDate, Vec<&PunchRecord>> = BTreeMap::new();
    for record in &input.punches {
        if record.work_date < input.month || record.work_date > end {
            stats.warnings.push(format!(
                "Punch on {} outside evaluated month, ignored",
                record.work_date
            ));
            continue;
        }
        by_date.entry(record.work_date).or_default().push(record);
    }
    by_date
}

fn month_end(month: NaiveDate) -> NaiveDate {
    let next = if month.month() == 12 {
        NaiveDate::from_ymd_opt(month.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(month.year(), month.month() + 1, 1)
    };
    // Month start is validated before this is reached.
    next.and_then(|d| d.pred_opt()).unwrap_or(month)
}

/// A punch slot is missing when nothing was signed and no leave covers the
/// scheduled instant.
fn punch_is_missing(
    record: Option<&PunchRecord>,
    scheduled_at: NaiveDateTime,
    day_leaves: &[LeaveApproval],
) -> bool {
    let signed = record.is_some_and(|r| r.is_signed());
    if signed {
        return false;
    }
    let instant = record.map(|r| r.base_check_time).unwrap_or(scheduled_at);
    leave::covering_leave(instant, day_leaves).is_none()
}

fn signed_off_duty(day: &DayPunches) -> Option<NaiveDateTime> {
    day.off_duty
        .as_ref()
        .filter(|r| r.is_signed())
        .and_then(|r| r.user_check_time)
}

fn day_status(
    is_workday: bool,
    full_day_leave: bool,
    raw_late: i64,
    missing_on: bool,
    missing_off: bool,
) -> DayStatus {
    if !is_workday {
        return DayStatus::Rest;
    }
    if full_day_leave {
        return DayStatus::FullDayLeave;
    }
    if missing_on && missing_off {
        return DayStatus::Absenteeism;
    }
    if missing_on || missing_off {
        return DayStatus::MissingPunch;
    }
    if raw_late > 0 {
        return DayStatus::Late;
    }
    DayStatus::Normal
}
