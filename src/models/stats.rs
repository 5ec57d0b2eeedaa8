//! Derived attendance statuses and monthly statistics.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of one employee-day after rule evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// Worked, no findings.
    Normal,
    /// Signed in after the effective threshold.
    Late,
    /// One punch of the pair is missing and not covered by leave.
    MissingPunch,
    /// Workday with no presence and no leave coverage.
    Absenteeism,
    /// Leave hours reached the full daily constant.
    FullDayLeave,
    /// Non-working day.
    Rest,
}

/// Evaluated state of one employee-day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyAttendanceStatus {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub on_duty: Option<NaiveDateTime>,
    pub off_duty: Option<NaiveDateTime>,
    /// True when the day carries any finding (late, missing, absenteeism).
    pub has_abnormality: bool,
}

/// Monthly per-employee output of the evaluation engine.
///
/// Created empty, folded once per day in ascending date order, then
/// finalized (penalty and full-attendance need the complete month).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeMonthlyStats {
    pub employee_id: String,
    /// First day of the evaluated month.
    pub month: NaiveDate,

    pub late_count: u32,
    pub raw_late_minutes: i64,
    /// Late minutes remaining after the monthly exemption budget.
    pub billable_late_minutes: i64,
    pub exemption_used: u32,

    pub missing_punch_count: u32,
    pub absenteeism_count: u32,

    /// Hours per leave category.
    pub leave_hours: BTreeMap<String, f64>,
    /// Approval occurrences per leave category.
    pub leave_counts: BTreeMap<String, u32>,

    pub performance_penalty: f64,

    pub overtime_total_minutes: f64,
    /// Minutes past each configured checkpoint, keyed by normalized "HH:MM".
    pub overtime_per_checkpoint: BTreeMap<String, f64>,

    pub should_attendance_days: f64,
    pub actual_attendance_days: f64,
    pub is_full_attendance: bool,

    pub days: Vec<DailyAttendanceStatus>,
    /// Non-fatal findings recorded while folding this employee.
    pub warnings: Vec<String>,

    /// Latest date with any signed punch, for separation detection.
    pub last_punch_date: Option<NaiveDate>,
    /// Whether the month's last workday has a signed off-duty punch.
    pub last_workday_off_duty: bool,
}

impl EmployeeMonthlyStats {
    /// Empty stats for one employee-month.
    pub fn new(employee_id: impl Into<String>, month: NaiveDate) -> Self {
        Self {
            employee_id: employee_id.into(),
            month,
            late_count: 0,
            raw_late_minutes: 0,
            billable_late_minutes: 0,
            exemption_used: 0,
            missing_punch_count: 0,
            absenteeism_count: 0,
            leave_hours: BTreeMap::new(),
            leave_counts: BTreeMap::new(),
            performance_penalty: 0.0,
            overtime_total_minutes: 0.0,
            overtime_per_checkpoint: BTreeMap::new(),
            should_attendance_days: 0.0,
            actual_attendance_days: 0.0,
            is_full_attendance: false,
            days: Vec::new(),
            warnings: Vec::new(),
            last_punch_date: None,
            last_workday_off_duty: false,
        }
    }

    /// Add leave hours under a category, counting the occurrence.
    pub fn add_leave(&mut self, category: &str, hours: f64) {
        if hours <= 0.0 {
            return;
        }
        self.add_leave_hours(category, hours);
        self.count_leave(category);
    }

    /// Add leave hours under a category without counting an occurrence.
    pub fn add_leave_hours(&mut self, category: &str, hours: f64) {
        if hours <= 0.0 {
            return;
        }
        *self.leave_hours.entry(category.to_string()).or_insert(0.0) += hours;
    }

    /// Count one approval occurrence under a category.
    pub fn count_leave(&mut self, category: &str) {
        *self.leave_counts.entry(category.to_string()).or_insert(0) += 1;
    }

    /// Hours accumulated under one leave category.
    pub fn leave_hours_for(&self, category: &str) -> f64 {
        self.leave_hours.get(category).copied().unwrap_or(0.0)
    }

    /// Approval count accumulated under one leave category.
    pub fn leave_count_for(&self, category: &str) -> u32 {
        self.leave_counts.get(category).copied().unwrap_or(0)
    }

    /// Total leave hours across all categories.
    pub fn total_leave_hours(&self) -> f64 {
        self.leave_hours.values().sum()
    }

    /// Whether the employee took leave only from the given category.
    pub fn leave_only_from(&self, category: &str) -> bool {
        self.leave_hours
            .iter()
            .all(|(cat, hours)| *hours <= 0.0 || cat == category)
    }
}
