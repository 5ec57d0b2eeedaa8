//! Punch record models.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Direction of a punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum CheckType {
    /// Morning clock-in.
    OnDuty,
    /// Evening clock-out.
    OffDuty,
}

/// Outcome assigned to a punch by the upstream workforce system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TimeResult {
    Normal,
    Late,
    Early,
    NotSigned,
}

/// Where a punch came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchSource {
    /// Physical clock device.
    Machine,
    /// Generated from an approved workflow (leave, trip, makeup card).
    Approval,
    /// Entered by an administrator.
    Manual,
}

/// A single clock-in/clock-out event for one employee-day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchRecord {
    pub check_type: CheckType,
    pub work_date: NaiveDate,
    /// Actual punch time; absent means the employee did not sign.
    pub user_check_time: Option<NaiveDateTime>,
    /// Scheduled time the punch was measured against.
    pub base_check_time: NaiveDateTime,
    pub time_result: TimeResult,
    pub source: PunchSource,
    /// Workflow instance id when the punch was produced by an approval.
    pub proc_inst_id: Option<String>,
}

impl PunchRecord {
    /// Whether this record carries a real signed time.
    pub fn is_signed(&self) -> bool {
        self.user_check_time.is_some() && self.time_result != TimeResult::NotSigned
    }
}

/// Effective punches for one employee-day.
///
/// Duplicate records are resolved to the earliest OnDuty and the latest
/// OffDuty; everything else on the day is noise from re-punching.
#[derive(Debug, Clone, Default)]
pub struct DayPunches {
    pub on_duty: Option<PunchRecord>,
    pub off_duty: Option<PunchRecord>,
}

impl DayPunches {
    /// Collapse all of a day's raw records into the effective pair.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a PunchRecord>,
    {
        let mut day = Self::default();

        for record in records {
            match record.check_type {
                CheckType::OnDuty => {
                    let replace = match (&day.on_duty, record.user_check_time) {
                        (None, _) => true,
                        (Some(current), Some(time)) => match current.user_check_time {
                            Some(existing) => time < existing,
                            // A signed punch beats an unsigned placeholder.
                            None => true,
                        },
                        (Some(_), None) => false,
                    };
                    if replace {
                        day.on_duty = Some(record.clone());
                    }
                }
                CheckType::OffDuty => {
                    let replace = match (&day.off_duty, record.user_check_time) {
                        (None, _) => true,
                        (Some(current), Some(time)) => match current.user_check_time {
                            Some(existing) => time > existing,
                            None => true,
                        },
                        (Some(_), None) => false,
                    };
                    if replace {
                        day.off_duty = Some(record.clone());
                    }
                }
            }
        }

        day
    }

    /// Signed off-duty time, if any.
    pub fn off_duty_time(&self) -> Option<NaiveDateTime> {
        self.off_duty.as_ref().and_then(|r| r.user_check_time)
    }

    /// Signed on-duty time, if any.
    pub fn on_duty_time(&self) -> Option<NaiveDateTime> {
        self.on_duty.as_ref().and_then(|r| r.user_check_time)
    }
}
