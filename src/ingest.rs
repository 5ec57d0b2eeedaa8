//! Ingestion boundary for upstream workforce API payloads.
//!
//! Upstream JSON is loosely shaped: the same value arrives under several
//! field names (`start` / `startTime` / `start_time`), times come as
//! date-only or datetime strings, and durations as numbers or strings.
//! Everything is normalized here, exactly once; the engine only ever sees
//! the canonical model shapes. Malformed rows are skipped with a warning.

use crate::engine::MonthInput;
use crate::error::{EngineError, Result};
use crate::models::{
    CheckType, DurationUnit, HolidayCalendar, LeaveApproval, PunchRecord, PunchSource, TimeResult,
};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// A parsed batch-evaluation input document.
#[derive(Debug, Clone)]
pub struct BatchInput {
    pub company_id: String,
    /// First day of the month to evaluate.
    pub month: NaiveDate,
    pub calendar: HolidayCalendar,
    pub employees: Vec<MonthInput>,
}

/// Parse a batch input document from JSON text.
///
/// Expected top-level shape: `month` ("YYYY-MM"), `company_id`, optional
/// `holidays` (MM-DD keyed), and an `employees` array.
pub fn parse_batch_input(text: &str) -> Result<BatchInput> {
    let root: Value = serde_json::from_str(text)?;

    let month_str = string_field(&root, &["month"])
        .ok_or_else(|| EngineError::parse("Input document missing 'month'"))?;
    let month = parse_month(&month_str)?;

    let company_id = string_field(&root, &["company_id", "companyId", "corpId"])
        .ok_or_else(|| EngineError::parse("Input document missing 'company_id'"))?;

    let calendar = root
        .get("holidays")
        .map(|holidays| parse_holiday_calendar(holidays, month.year()))
        .unwrap_or_default();

    let mut employees = Vec::new();
    for entry in root
        .get("employees")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
    {
        match parse_employee_month(entry, month) {
            Some(input) => employees.push(input),
            None => warn!("Skipping employee entry without an id"),
        }
    }

    Ok(BatchInput {
        company_id,
        month,
        calendar,
        employees,
    })
}

/// Parse one employee's month entry.
fn parse_employee_month(entry: &Value, month: NaiveDate) -> Option<MonthInput> {
    let employee_id = string_field(entry, &["employee_id", "employeeId", "userId", "userid"])?;
    let punches = entry
        .get("punches")
        .map(parse_punch_records)
        .unwrap_or_default();
    let leaves = entry
        .get("leaves")
        .map(parse_leave_approvals)
        .unwrap_or_default();
    let hire_date = string_field(entry, &["hire_date", "hiredDate", "hireDate"])
        .and_then(|s| parse_date(&s));

    Some(MonthInput {
        employee_id,
        month,
        punches,
        leaves,
        hire_date,
    })
}

/// Parse an array of punch records, skipping malformed rows.
pub fn parse_punch_records(value: &Value) -> Vec<PunchRecord> {
    let mut records = Vec::new();

    for row in value.as_array().into_iter().flatten() {
        match parse_punch_record(row) {
            Some(record) => records.push(record),
            None => warn!("Skipping malformed punch record: {row}"),
        }
    }

    records
}

fn parse_punch_record(row: &Value) -> Option<PunchRecord> {
    let check_type = match string_field(row, &["check_type", "checkType"])?.as_str() {
        "OnDuty" => CheckType::OnDuty,
        "OffDuty" => CheckType::OffDuty,
        _ => return None,
    };

    let work_date = parse_date(&string_field(row, &["work_date", "workDate"])?)?;

    let base_check_time =
        parse_datetime(&string_field(row, &["base_check_time", "baseCheckTime"])?)?;

    let user_check_time = string_field(row, &["user_check_time", "userCheckTime"])
        .and_then(|s| parse_datetime(&s));

    let time_result = match string_field(row, &["time_result", "timeResult"])
        .unwrap_or_else(|| "NotSigned".to_string())
        .as_str()
    {
        "Normal" => TimeResult::Normal,
        "Late" | "SeriousLate" => TimeResult::Late,
        "Early" => TimeResult::Early,
        _ => TimeResult::NotSigned,
    };

    let source = match string_field(row, &["source", "source_type", "sourceType"])
        .unwrap_or_default()
        .to_ascii_lowercase()
        .as_str()
    {
        "approval" | "approve" => PunchSource::Approval,
        "manual" | "admin" => PunchSource::Manual,
        _ => PunchSource::Machine,
    };

    let proc_inst_id = string_field(row, &["proc_inst_id", "procInstId"]);

    Some(PunchRecord {
        check_type,
        work_date,
        user_check_time,
        base_check_time,
        time_result,
        source,
        proc_inst_id,
    })
}

/// Parse approvals keyed by workflow instance id.
///
/// Accepts either an object map (id -> approval) or an array of approval
/// objects carrying their own `procInstId`.
pub fn parse_leave_approvals(value: &Value) -> HashMap<String, LeaveApproval> {
    let mut approvals = HashMap::new();

    match value {
        Value::Object(map) => {
            for (id, row) in map {
                match parse_leave_approval(row) {
                    Some(approval) => {
                        approvals.insert(id.clone(), approval);
                    }
                    None => warn!("Skipping malformed leave approval {id}"),
                }
            }
        }
        Value::Array(rows) => {
            for row in rows {
                let id = string_field(row, &["proc_inst_id", "procInstId", "id"]);
                match (id, parse_leave_approval(row)) {
                    (Some(id), Some(approval)) => {
                        approvals.insert(id, approval);
                    }
                    _ => warn!("Skipping malformed leave approval: {row}"),
                }
            }
        }
        _ => warn!("Leave approvals must be an object or array"),
    }

    approvals
}

fn parse_leave_approval(row: &Value) -> Option<LeaveApproval> {
    let leave_type = string_field(row, &["leave_type", "leaveType", "type", "tag"])?;

    let start_raw = string_field(row, &["start", "startTime", "start_time"])?;
    let end_raw = string_field(row, &["end", "endTime", "end_time"])?;

    // Day-granular values arrive date-only; that also decides the default
    // duration unit when none is given.
    let start_is_date_only = parse_datetime(&start_raw).is_none();
    let start = parse_datetime_or_date(&start_raw)?;
    let end = parse_datetime_or_date(&end_raw)?;

    let duration = number_field(row, &["duration", "durationValue"]).unwrap_or(0.0);

    let duration_unit = match string_field(row, &["duration_unit", "durationUnit", "unit"])
        .unwrap_or_default()
        .to_ascii_lowercase()
        .as_str()
    {
        "hour" | "halfhour" => DurationUnit::Hour,
        "day" | "halfday" => DurationUnit::Day,
        _ if start_is_date_only => DurationUnit::Day,
        _ => DurationUnit::Hour,
    };

    Some(LeaveApproval {
        leave_type,
        start,
        end,
        duration,
        duration_unit,
    })
}

/// Parse an `MM-DD`-keyed holiday map into a date-keyed calendar.
pub fn parse_holiday_calendar(value: &Value, year: i32) -> HolidayCalendar {
    let mut entries = HashMap::new();

    for (key, row) in value.as_object().into_iter().flatten() {
        let Some(date) = parse_month_day(key, year) else {
            warn!("Skipping unparsable holiday key: {key}");
            continue;
        };
        let holiday = row
            .get("holiday")
            .and_then(Value::as_bool)
            .or_else(|| row.as_bool());
        match holiday {
            Some(flag) => {
                entries.insert(date, flag);
            }
            None => warn!("Skipping holiday entry without a flag: {key}"),
        }
    }

    HolidayCalendar::new(entries)
}

/// Pick the first present string field among the candidate names.
fn string_field(row: &Value, names: &[&str]) -> Option<String> {
    names
        .iter()
        .find_map(|name| row.get(name))
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Pick the first present numeric field, accepting stringified numbers.
fn number_field(row: &Value, names: &[&str]) -> Option<f64> {
    let value = names.iter().find_map(|name| row.get(name))?;
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn parse_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .map_err(|e| EngineError::parse(format!("Invalid month '{s}': {e}")))
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .ok()
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// Datetime, falling back to a date-only value at midnight.
fn parse_datetime_or_date(s: &str) -> Option<NaiveDateTime> {
    parse_datetime(s).or_else(|| parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

fn parse_month_day(key: &str, year: i32) -> Option<NaiveDate> {
    let (month, day) = key.split_once('-')?;
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}
