//! Overtime checkpoint calculation.
//!
//! Each configured checkpoint is an independent tally: an off-duty punch at
//! 23:00 credits the 19:30, 20:30 and 22:00 checkpoints simultaneously,
//! each with its own elapsed minutes.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Minutes worked past each checkpoint for one day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OvertimeResult {
    pub total_minutes: f64,
    /// Keyed by the normalized checkpoint label ("19:30", "24:00").
    pub per_checkpoint: BTreeMap<String, f64>,
}

/// Compute overtime past each configured checkpoint.
///
/// Unparsable checkpoint strings are skipped with a warning.
pub fn overtime(off_duty: NaiveDateTime, work_date: NaiveDate, checkpoints: &[String]) -> OvertimeResult {
    let mut result = OvertimeResult::default();

    for raw in checkpoints {
        let Some((time, next_day)) = normalize_checkpoint(raw) else {
            warn!("Skipping unparsable overtime checkpoint: {raw}");
            continue;
        };

        let checkpoint_at = if next_day {
            match work_date.checked_add_days(Days::new(1)) {
                Some(next) => next.and_time(time),
                None => continue,
            }
        } else {
            work_date.and_time(time)
        };

        if off_duty >= checkpoint_at {
            let minutes = round2((off_duty - checkpoint_at).num_seconds() as f64 / 60.0);
            let label = if next_day {
                "24:00".to_string()
            } else {
                time.format("%H:%M").to_string()
            };
            result.per_checkpoint.insert(label, minutes);
            result.total_minutes = round2(result.total_minutes + minutes);
        }
    }

    result
}

/// Normalize a checkpoint string to a clock time plus a next-day flag.
///
/// Accepts 24-hour "HH:MM" / "HH:MM:SS", the midnight forms "24:00" and
/// "00:00" (both meaning next-day midnight), and the 12-hour forms
/// "上午HH:MM" / "下午HH:MM".
pub(crate) fn normalize_checkpoint(raw: &str) -> Option<(NaiveTime, bool)> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(rest) = trimmed.strip_prefix("上午") {
        let time = parse_hm(rest.trim())?;
        let hour = if time.hour() == 12 { 0 } else { time.hour() };
        return NaiveTime::from_hms_opt(hour, time.minute(), 0).map(|t| (t, false));
    }

    if let Some(rest) = trimmed.strip_prefix("下午") {
        let time = parse_hm(rest.trim())?;
        let hour = if time.hour() < 12 {
            time.hour() + 12
        } else {
            time.hour()
        };
        return NaiveTime::from_hms_opt(hour, time.minute(), 0).map(|t| (t, false));
    }

    // Midnight names the start of the next calendar day.
    if trimmed == "24:00" || trimmed == "00:00" || trimmed == "24:00:00" || trimmed == "00:00:00" {
        return Some((NaiveTime::from_hms_opt(0, 0, 0).unwrap(), true));
    }

    parse_hm(trimmed).map(|t| (t, false))
}

fn parse_hm(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
