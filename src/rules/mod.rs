//! Per-company rule configuration.
//!
//! One `RuleConfig` is an immutable, versioned snapshot resolved before an
//! evaluation run starts. The engine never mutates it and never reaches for
//! configuration anywhere else.

use crate::error::{EngineError, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Sentinel for an unbounded penalty tier upper edge.
pub const PENALTY_TIER_OPEN_END: i64 = 999;

/// Cross-day lateness rule: a late checkout yesterday relaxes today's
/// on-duty threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LateRule {
    /// Trigger: previous day's off-duty at or after this time.
    pub previous_day_checkout: NaiveTime,
    /// Effect: today's on-duty threshold.
    pub late_threshold: NaiveTime,
}

/// One tier of the performance penalty ladder, matching
/// `[min_minutes, max_minutes)` of billable late minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenaltyRule {
    pub min_minutes: i64,
    pub max_minutes: i64,
    pub penalty: f64,
}

/// Whether the monthly penalty is capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyMode {
    Unlimited,
    Capped,
}

/// Unit a full-attendance threshold is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdUnit {
    Count,
    Hours,
}

/// One configurable full-attendance disqualification rule.
///
/// `category` is `"late"`, `"missing"`, `"absenteeism"`, or a leave
/// category key; exceeding `threshold` in the given unit voids eligibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullAttendanceRule {
    pub category: String,
    pub enabled: bool,
    pub threshold: f64,
    pub unit: ThresholdUnit,
}

/// How should-attendance days are computed for the month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum AttendanceDaysRule {
    /// Working days per the holiday calendar.
    WorkdaysOnly,
    /// A fixed configured value.
    Fixed { days: f64 },
    /// Working days plus statutory holidays.
    WorkdaysAndHolidays,
}

/// Output labelling for one leave category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveDisplayRule {
    pub leave_type: String,
    pub label: String,
    pub enabled: bool,
}

/// Well-known full-attendance rule categories.
pub mod rule_category {
    pub const LATE: &str = "late";
    pub const MISSING: &str = "missing";
    pub const ABSENTEEISM: &str = "absenteeism";
}

/// Resolved rule configuration for one company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub company_id: String,
    pub version: i32,

    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub lunch_start: NaiveTime,
    pub lunch_end: NaiveTime,

    /// Ordered; the first satisfied rule wins.
    #[serde(default)]
    pub late_rules: Vec<LateRule>,

    pub late_exemption_enabled: bool,
    pub late_exemption_count: u32,
    pub late_exemption_minutes: i64,

    pub penalty_mode: PenaltyMode,
    /// Ordered; the first matching tier wins.
    #[serde(default)]
    pub penalty_rules: Vec<PenaltyRule>,
    pub max_performance_penalty: f64,

    /// Raw clock-time strings; parsed and normalized by the overtime
    /// calculator ("24:00" means next-day midnight).
    #[serde(default)]
    pub overtime_checkpoints: Vec<String>,

    #[serde(default)]
    pub full_attendance_rules: Vec<FullAttendanceRule>,
    /// An all-comp-time month keeps full attendance in fallback mode.
    #[serde(default)]
    pub comp_time_only_keeps_full_attendance: bool,

    pub attendance_days_rule: AttendanceDaysRule,

    /// Company standard working hours per day (8 or 8.5).
    pub daily_hour_constant: f64,

    #[serde(default)]
    pub leave_display_rules: Vec<LeaveDisplayRule>,
}

impl RuleConfig {
    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.company_id.trim().is_empty() {
            return Err(EngineError::validation("Company id cannot be empty"));
        }
        if self.work_start >= self.work_end {
            return Err(EngineError::validation("Work start must precede work end"));
        }
        if self.lunch_start >= self.lunch_end {
            return Err(EngineError::validation("Lunch start must precede lunch end"));
        }
        if self.lunch_start < self.work_start || self.lunch_end > self.work_end {
            return Err(EngineError::validation(
                "Lunch window must fall within working hours",
            ));
        }
        if !(1.0..=24.0).contains(&self.daily_hour_constant) {
            return Err(EngineError::validation(
                "Daily hour constant must be between 1 and 24",
            ));
        }
        if self.late_exemption_minutes < 0 {
            return Err(EngineError::validation(
                "Exemption minutes cannot be negative",
            ));
        }
        if self.max_performance_penalty < 0.0 {
            return Err(EngineError::validation(
                "Max performance penalty cannot be negative",
            ));
        }
        for rule in &self.penalty_rules {
            if rule.min_minutes < 0 || rule.penalty < 0.0 {
                return Err(EngineError::validation(
                    "Penalty tiers cannot carry negative values",
                ));
            }
            if rule.max_minutes != PENALTY_TIER_OPEN_END && rule.max_minutes <= rule.min_minutes {
                return Err(EngineError::validation(
                    "Penalty tier upper edge must exceed its lower edge",
                ));
            }
        }
        for rule in &self.full_attendance_rules {
            if rule.threshold < 0.0 {
                return Err(EngineError::validation(
                    "Full-attendance thresholds cannot be negative",
                ));
            }
        }
        if let AttendanceDaysRule::Fixed { days } = self.attendance_days_rule {
            if days <= 0.0 {
                return Err(EngineError::validation(
                    "Fixed attendance days must be positive",
                ));
            }
        }
        Ok(())
    }

    /// Display label for a leave category, falling back to the raw key.
    pub fn leave_label<'a>(&'a self, leave_type: &'a str) -> &'a str {
        self.leave_display_rules
            .iter()
            .find(|r| r.enabled && r.leave_type == leave_type)
            .map(|r| r.label.as_str())
            .unwrap_or(leave_type)
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        let time = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        Self {
            company_id: "default".to_string(),
            version: 1,
            work_start: time(9, 0),
            work_end: time(18, 0),
            lunch_start: time(12, 0),
            lunch_end: time(13, 30),
            late_rules: Vec::new(),
            late_exemption_enabled: true,
            late_exemption_count: 3,
            late_exemption_minutes: 15,
            penalty_mode: PenaltyMode::Capped,
            penalty_rules: Vec::new(),
            max_performance_penalty: 200.0,
            overtime_checkpoints: vec![
                "19:30".to_string(),
                "20:30".to_string(),
                "22:00".to_string(),
                "24:00".to_string(),
            ],
            full_attendance_rules: Vec::new(),
            comp_time_only_keeps_full_attendance: false,
            attendance_days_rule: AttendanceDaysRule::WorkdaysOnly,
            daily_hour_constant: 8.0,
            leave_display_rules: Vec::new(),
        }
    }
}
