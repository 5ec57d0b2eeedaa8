//! Leave approval models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Unit a leave approval's duration is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Hour,
    Day,
}

/// Canonical leave approval, normalized at the ingestion boundary.
///
/// Day-unit approvals carry day-granular start/end (midnight instants);
/// hour-unit approvals carry literal instants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveApproval {
    pub leave_type: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub duration: f64,
    pub duration_unit: DurationUnit,
}

impl LeaveApproval {
    /// Whether this approval touches the given calendar date at all.
    pub fn touches_date(&self, date: NaiveDate) -> bool {
        date >= self.start.date() && date <= self.end.date()
    }

    /// Duration in hours using the company's daily work-hour constant.
    pub fn duration_hours(&self, daily_hour_constant: f64) -> f64 {
        match self.duration_unit {
            DurationUnit::Hour => self.duration.max(0.0),
            DurationUnit::Day => self.duration.max(0.0) * daily_hour_constant,
        }
    }
}

/// Well-known leave category keys used by rule matching.
pub mod leave_category {
    /// Compensatory time off (调休).
    pub const COMP_TIME: &str = "comp_time";
    /// Annual leave.
    pub const ANNUAL: &str = "annual";
    /// Personal (unpaid) leave.
    pub const PERSONAL: &str = "personal";
    /// Sick leave.
    pub const SICK: &str = "sick";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approval(start: &str, end: &str, duration: f64, unit: DurationUnit) -> LeaveApproval {
        LeaveApproval {
            leave_type: "annual".to_string(),
            start: NaiveDateTime::parse_from_str(start, "%Y-%m-%d %H:%M:%S").unwrap(),
            end: NaiveDateTime::parse_from_str(end, "%Y-%m-%d %H:%M:%S").unwrap(),
            duration,
            duration_unit: unit,
        }
    }

    #[test]
    fn test_touches_date_inclusive_bounds() {
        let leave = approval(
            "2025-03-10 00:00:00",
            "2025-03-12 00:00:00",
            3.0,
            DurationUnit::Day,
        );
        assert!(leave.touches_date(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()));
        assert!(leave.touches_date(NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()));
        assert!(!leave.touches_date(NaiveDate::from_ymd_opt(2025, 3, 13).unwrap()));
    }

    #[test]
    fn test_duration_hours_day_unit() {
        let leave = approval(
            "2025-03-10 00:00:00",
            "2025-03-11 00:00:00",
            2.0,
            DurationUnit::Day,
        );
        assert_eq!(leave.duration_hours(8.0), 16.0);
        assert_eq!(leave.duration_hours(8.5), 17.0);
    }

    #[test]
    fn test_negative_duration_clamps_to_zero() {
        let leave = approval(
            "2025-03-10 09:00:00",
            "2025-03-10 12:00:00",
            -3.0,
            DurationUnit::Hour,
        );
        assert_eq!(leave.duration_hours(8.0), 0.0);
    }
}
