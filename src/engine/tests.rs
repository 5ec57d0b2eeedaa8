//! End-to-end scenario tests for the monthly evaluation fold.
//!
//! March 2025: Mar 1 is a Saturday, 21 workdays, last workday Mon Mar 31.

use super::{evaluate_month, EvaluationContext, MonthInput};
use crate::models::{
    CheckType, DayStatus, DurationUnit, HolidayCalendar, LeaveApproval, PunchRecord, PunchSource,
    TimeResult,
};
use crate::rules::RuleConfig;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
}

fn dt(date: NaiveDate, time: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(
        &format!("{} {time}", date.format("%Y-%m-%d")),
        "%Y-%m-%d %H:%M:%S",
    )
    .unwrap()
}

fn on_duty(date: NaiveDate, time: &str, result: TimeResult) -> PunchRecord {
    PunchRecord {
        check_type: CheckType::OnDuty,
        work_date: date,
        user_check_time: Some(dt(date, time)),
        base_check_time: dt(date, "09:00:00"),
        time_result: result,
        source: PunchSource::Machine,
        proc_inst_id: None,
    }
}

fn off_duty(date: NaiveDate, time: &str) -> PunchRecord {
    PunchRecord {
        check_type: CheckType::OffDuty,
        work_date: date,
        user_check_time: Some(dt(date, time)),
        base_check_time: dt(date, "18:00:00"),
        time_result: TimeResult::Normal,
        source: PunchSource::Machine,
        proc_inst_id: None,
    }
}

/// Uneventful punches for every workday of March 2025.
fn normal_month(calendar: &HolidayCalendar) -> Vec<PunchRecord> {
    let mut punches = Vec::new();
    for date in calendar.workdays_between(d(1), d(31)) {
        punches.push(on_duty(date, "08:55:00", TimeResult::Normal));
        punches.push(off_duty(date, "18:05:00"));
    }
    punches
}

/// Replace the day's record of the given direction.
fn set_punch(punches: &mut [PunchRecord], replacement: PunchRecord) {
    for record in punches.iter_mut() {
        if record.work_date == replacement.work_date && record.check_type == replacement.check_type
        {
            *record = replacement;
            return;
        }
    }
    panic!("No punch to replace on {}", replacement.work_date);
}

fn input(punches: Vec<PunchRecord>, leaves: Vec<LeaveApproval>) -> MonthInput {
    MonthInput {
        employee_id: "1001".to_string(),
        month: d(1),
        punches,
        leaves: leaves
            .into_iter()
            .enumerate()
            .map(|(i, l)| (format!("proc-{i}"), l))
            .collect(),
        hire_date: None,
    }
}

fn day_leave(start: NaiveDate, end: NaiveDate, days: f64, leave_type: &str) -> LeaveApproval {
    LeaveApproval {
        leave_type: leave_type.to_string(),
        start: dt(start, "00:00:00"),
        end: dt(end, "00:00:00"),
        duration: days,
        duration_unit: DurationUnit::Day,
    }
}

fn hour_leave(start: NaiveDateTime, end: NaiveDateTime, hours: f64, leave_type: &str) -> LeaveApproval {
    LeaveApproval {
        leave_type: leave_type.to_string(),
        start,
        end,
        duration: hours,
        duration_unit: DurationUnit::Hour,
    }
}

#[test]
fn test_clean_month_full_attendance() {
    let config = RuleConfig::default();
    let calendar = HolidayCalendar::default();
    let ctx = EvaluationContext {
        config: &config,
        calendar: &calendar,
    };
    let stats = evaluate_month(&ctx, &input(normal_month(&calendar), vec![])).unwrap();

    assert_eq!(stats.late_count, 0);
    assert_eq!(stats.missing_punch_count, 0);
    assert_eq!(stats.absenteeism_count, 0);
    assert_eq!(stats.should_attendance_days, 21.0);
    assert_eq!(stats.actual_attendance_days, 21.0);
    assert!(stats.last_workday_off_duty);
    assert!(stats.is_full_attendance);
    assert_eq!(stats.performance_penalty, 0.0);
}

#[test]
fn test_exemption_month_scenario() {
    let config = RuleConfig::default();
    let calendar = HolidayCalendar::default();
    let ctx = EvaluationContext {
        config: &config,
        calendar: &calendar,
    };

    let mut punches = normal_month(&calendar);
    // Four late days; the first workday (Mar 3) is left clean so the
    // first-workday grace stays out of the picture.
    set_punch(&mut punches, on_duty(d(4), "09:10:00", TimeResult::Late));
    set_punch(&mut punches, on_duty(d(5), "09:20:00", TimeResult::Late));
    set_punch(&mut punches, on_duty(d(6), "09:05:00", TimeResult::Late));
    set_punch(&mut punches, on_duty(d(7), "09:12:00", TimeResult::Late));

    let stats = evaluate_month(&ctx, &input(punches, vec![])).unwrap();

    assert_eq!(stats.late_count, 4);
    assert_eq!(stats.raw_late_minutes, 10 + 20 + 5 + 12);
    // Day 1 forgiven, day 2 partially (5 billable), day 3 forgiven,
    // day 4 fully billable after the budget ran out.
    assert_eq!(stats.exemption_used, 3);
    assert_eq!(stats.billable_late_minutes, 5 + 12);
    // 17 billable minutes land in the 16..=30 ladder step.
    assert_eq!(stats.performance_penalty, 150.0);
    assert!(!stats.is_full_attendance);
}

#[test]
fn test_night_checkout_grace_next_morning() {
    let config = RuleConfig::default();
    let calendar = HolidayCalendar::default();
    let ctx = EvaluationContext {
        config: &config,
        calendar: &calendar,
    };

    let mut punches = normal_month(&calendar);
    set_punch(&mut punches, off_duty(d(10), "21:00:00"));
    set_punch(&mut punches, on_duty(d(11), "09:25:00", TimeResult::Late));

    let stats = evaluate_month(&ctx, &input(punches, vec![])).unwrap();

    // Threshold moved to 09:30, so the marked-late punch resolves clean.
    assert_eq!(stats.late_count, 0);
    assert_eq!(stats.raw_late_minutes, 0);
}

#[test]
fn test_overtime_checkpoints_in_monthly_stats() {
    let config = RuleConfig::default();
    let calendar = HolidayCalendar::default();
    let ctx = EvaluationContext {
        config: &config,
        calendar: &calendar,
    };

    let mut punches = normal_month(&calendar);
    set_punch(&mut punches, off_duty(d(12), "23:10:00"));

    let stats = evaluate_month(&ctx, &input(punches, vec![])).unwrap();

    assert_eq!(stats.overtime_per_checkpoint.get("19:30"), Some(&220.0));
    assert_eq!(stats.overtime_per_checkpoint.get("20:30"), Some(&160.0));
    assert_eq!(stats.overtime_per_checkpoint.get("22:00"), Some(&70.0));
    assert_eq!(stats.overtime_per_checkpoint.get("24:00"), None);
    assert_eq!(stats.overtime_total_minutes, 450.0);
}

#[test]
fn test_full_day_leave_supersedes_absence() {
    let config = RuleConfig::default();
    let calendar = HolidayCalendar::default();
    let ctx = EvaluationContext {
        config: &config,
        calendar: &calendar,
    };

    let mut punches = normal_month(&calendar);
    // Remove both punches on Mar 13 and cover the day with leave.
    punches.retain(|p| p.work_date != d(13));
    let leaves = vec![day_leave(d(13), d(13), 1.0, "annual")];

    let stats = evaluate_month(&ctx, &input(punches, leaves)).unwrap();

    assert_eq!(stats.absenteeism_count, 0);
    assert_eq!(stats.missing_punch_count, 0);
    assert_eq!(stats.leave_hours.get("annual"), Some(&8.0));
    assert_eq!(stats.leave_counts.get("annual"), Some(&1));
    let day = stats.days.iter().find(|day| day.date == d(13)).unwrap();
    assert_eq!(day.status, DayStatus::FullDayLeave);
    assert!(!day.has_abnormality);
    // One full leave day costs one attendance day.
    assert_eq!(stats.actual_attendance_days, 20.0);
}

#[test]
fn test_uncovered_empty_workday_is_absenteeism() {
    let config = RuleConfig::default();
    let calendar = HolidayCalendar::default();
    let ctx = EvaluationContext {
        config: &config,
        calendar: &calendar,
    };

    let mut punches = normal_month(&calendar);
    punches.retain(|p| p.work_date != d(13));

    let stats = evaluate_month(&ctx, &input(punches, vec![])).unwrap();

    assert_eq!(stats.absenteeism_count, 1);
    assert_eq!(stats.missing_punch_count, 0);
    let day = stats.days.iter().find(|day| day.date == d(13)).unwrap();
    assert_eq!(day.status, DayStatus::Absenteeism);
    assert!(day.has_abnormality);
}

#[test]
fn test_single_missing_punch_covered_by_leave() {
    let config = RuleConfig::default();
    let calendar = HolidayCalendar::default();
    let ctx = EvaluationContext {
        config: &config,
        calendar: &calendar,
    };

    let mut punches = normal_month(&calendar);
    // No morning punch on Mar 18; an approved morning leave covers it.
    punches.retain(|p| !(p.work_date == d(18) && p.check_type == CheckType::OnDuty));
    let leaves = vec![hour_leave(
        dt(d(18), "09:00:00"),
        dt(d(18), "12:00:00"),
        3.0,
        "personal",
    )];

    let stats = evaluate_month(&ctx, &input(punches, leaves)).unwrap();

    assert_eq!(stats.missing_punch_count, 0);
    assert_eq!(stats.leave_hours.get("personal"), Some(&3.0));
}

#[test]
fn test_single_missing_punch_uncovered() {
    let config = RuleConfig::default();
    let calendar = HolidayCalendar::default();
    let ctx = EvaluationContext {
        config: &config,
        calendar: &calendar,
    };

    let mut punches = normal_month(&calendar);
    punches.retain(|p| !(p.work_date == d(18) && p.check_type == CheckType::OnDuty));

    let stats = evaluate_month(&ctx, &input(punches, vec![])).unwrap();

    assert_eq!(stats.missing_punch_count, 1);
    assert_eq!(stats.absenteeism_count, 0);
    let day = stats.days.iter().find(|day| day.date == d(18)).unwrap();
    assert_eq!(day.status, DayStatus::MissingPunch);
}

#[test]
fn test_per_category_day_rounding() {
    let config = RuleConfig::default();
    let calendar = HolidayCalendar::default();
    let ctx = EvaluationContext {
        config: &config,
        calendar: &calendar,
    };

    let leaves = vec![
        hour_leave(dt(d(18), "09:00:00"), dt(d(18), "13:00:00"), 4.0, "annual"),
        hour_leave(dt(d(19), "14:00:00"), dt(d(19), "18:00:00"), 4.0, "sick"),
    ];
    let stats = evaluate_month(&ctx, &input(normal_month(&calendar), leaves)).unwrap();

    // 4h annual and 4h sick each round up to a full day independently:
    // 21 - 2, not 21 - ceil(8/8) = 20.
    assert_eq!(stats.actual_attendance_days, 19.0);
    assert_eq!(stats.leave_counts.get("annual"), Some(&1));
    assert_eq!(stats.leave_counts.get("sick"), Some(&1));
}

#[test]
fn test_mid_month_separation_voids_full_attendance() {
    let config = RuleConfig::default();
    let calendar = HolidayCalendar::default();
    let ctx = EvaluationContext {
        config: &config,
        calendar: &calendar,
    };

    let mut punches = normal_month(&calendar);
    punches.retain(|p| p.work_date <= d(20));

    let stats = evaluate_month(&ctx, &input(punches, vec![])).unwrap();

    assert_eq!(stats.last_punch_date, Some(d(20)));
    assert!(!stats.last_workday_off_duty);
    assert!(!stats.is_full_attendance);
    // Mar 21, 24-28 and 31 are empty workdays.
    assert_eq!(stats.absenteeism_count, 7);
}

#[test]
fn test_punch_outside_month_warns_and_is_ignored() {
    let config = RuleConfig::default();
    let calendar = HolidayCalendar::default();
    let ctx = EvaluationContext {
        config: &config,
        calendar: &calendar,
    };

    let mut punches = normal_month(&calendar);
    punches.push(on_duty(
        NaiveDate::from_ymd_opt(2025, 4, 2).unwrap(),
        "08:55:00",
        TimeResult::Normal,
    ));

    let stats = evaluate_month(&ctx, &input(punches, vec![])).unwrap();

    assert_eq!(stats.warnings.len(), 1);
    assert!(stats.warnings[0].contains("2025-04-02"));
}

#[test]
fn test_month_must_start_on_day_one() {
    let config = RuleConfig::default();
    let calendar = HolidayCalendar::default();
    let ctx = EvaluationContext {
        config: &config,
        calendar: &calendar,
    };
    let mut bad = input(vec![], vec![]);
    bad.month = d(15);
    assert!(evaluate_month(&ctx, &bad).is_err());
}

#[test]
fn test_same_inputs_same_outputs() {
    let config = RuleConfig::default();
    let calendar = HolidayCalendar::default();
    let ctx = EvaluationContext {
        config: &config,
        calendar: &calendar,
    };

    let mut punches = normal_month(&calendar);
    set_punch(&mut punches, on_duty(d(4), "09:10:00", TimeResult::Late));
    let leaves = vec![day_leave(d(13), d(13), 1.0, "annual")];

    let a = evaluate_month(&ctx, &input(punches.clone(), leaves.clone())).unwrap();
    let b = evaluate_month(&ctx, &input(punches, leaves)).unwrap();

    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn test_missing_input_maps_placeholder() {
    // HashMap import is exercised by input(); keep a direct sanity check
    // that approval ids do not affect evaluation.
    let config = RuleConfig::default();
    let calendar = HolidayCalendar::default();
    let ctx = EvaluationContext {
        config: &config,
        calendar: &calendar,
    };
    let mut by_id = HashMap::new();
    by_id.insert(
        "any-id".to_string(),
        day_leave(d(13), d(13), 1.0, "annual"),
    );
    let input = MonthInput {
        employee_id: "1001".to_string(),
        month: d(1),
        punches: normal_month(&calendar),
        leaves: by_id,
        hire_date: None,
    };
    let stats = evaluate_month(&ctx, &input).unwrap();
    assert_eq!(stats.leave_hours.get("annual"), Some(&8.0));
}
