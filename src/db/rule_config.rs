//! Rule configuration repository.
//!
//! Assembles one `RuleConfig` snapshot per company from the parent row and
//! its ordered child-rule tables, and records audit entries on edit.

use crate::entities::{prelude::*, *};
use crate::error::{EngineError, Result};
use crate::rules::{
    AttendanceDaysRule, FullAttendanceRule, LateRule, LeaveDisplayRule, PenaltyMode, PenaltyRule,
    RuleConfig, ThresholdUnit,
};
use sea_orm::*;
use tracing::warn;

/// Load the resolved rule configuration for one company.
///
/// A company without a configuration row is a fatal evaluation error; the
/// engine never guesses a policy.
pub async fn load_for_company(db: &DatabaseConnection, company_id: &str) -> Result<RuleConfig> {
    let parent = RuleConfigs::find()
        .filter(rule_configs::Column::CompanyId.eq(company_id))
        .one(db)
        .await?
        .ok_or_else(|| EngineError::RulesNotLoaded(company_id.to_string()))?;

    let late_rules = LateRules::find()
        .filter(late_rules::Column::RuleConfigId.eq(parent.id))
        .order_by_asc(late_rules::Column::SortOrder)
        .all(db)
        .await?;

    let penalty_rules = PenaltyRules::find()
        .filter(penalty_rules::Column::RuleConfigId.eq(parent.id))
        .order_by_asc(penalty_rules::Column::SortOrder)
        .all(db)
        .await?;

    let full_attendance_rules = FullAttendanceRules::find()
        .filter(full_attendance_rules::Column::RuleConfigId.eq(parent.id))
        .all(db)
        .await?;

    let leave_display_rules = LeaveDisplayRules::find()
        .filter(leave_display_rules::Column::RuleConfigId.eq(parent.id))
        .all(db)
        .await?;

    let checkpoints = OvertimeCheckpoints::find()
        .filter(overtime_checkpoints::Column::RuleConfigId.eq(parent.id))
        .order_by_asc(overtime_checkpoints::Column::SortOrder)
        .all(db)
        .await?;

    let config = assemble(
        parent,
        late_rules,
        penalty_rules,
        full_attendance_rules,
        leave_display_rules,
        checkpoints,
    );
    config.validate()?;
    Ok(config)
}

/// Record one edit in the change log.
pub async fn record_change(
    db: &DatabaseConnection,
    rule_config_id: i32,
    edited_by: &str,
    diff: &str,
) -> Result<()> {
    let entry = rule_config_changelog::ActiveModel {
        rule_config_id: Set(rule_config_id),
        edited_by: Set(edited_by.to_string()),
        edited_at: Set(chrono::Utc::now().naive_utc()),
        diff: Set(diff.to_string()),
        ..Default::default()
    };
    RuleConfigChangelog::insert(entry).exec(db).await?;
    Ok(())
}

/// Change-log entries for a configuration, newest first.
pub async fn list_changes(
    db: &DatabaseConnection,
    rule_config_id: i32,
) -> Result<Vec<rule_config_changelog::Model>> {
    Ok(RuleConfigChangelog::find()
        .filter(rule_config_changelog::Column::RuleConfigId.eq(rule_config_id))
        .order_by_desc(rule_config_changelog::Column::EditedAt)
        .all(db)
        .await?)
}

fn assemble(
    parent: rule_configs::Model,
    late_rules: Vec<late_rules::Model>,
    penalty_rules: Vec<penalty_rules::Model>,
    full_attendance_rules: Vec<full_attendance_rules::Model>,
    leave_display_rules: Vec<leave_display_rules::Model>,
    checkpoints: Vec<overtime_checkpoints::Model>,
) -> RuleConfig {
    let penalty_mode = match parent.penalty_mode.as_str() {
        "unlimited" => PenaltyMode::Unlimited,
        "capped" => PenaltyMode::Capped,
        other => {
            warn!("Unknown penalty mode '{other}', defaulting to capped");
            PenaltyMode::Capped
        }
    };

    let attendance_days_rule = match (parent.attendance_days_method.as_str(), parent.fixed_attendance_days) {
        ("fixed", Some(days)) => AttendanceDaysRule::Fixed { days },
        ("workdays_and_holidays", _) => AttendanceDaysRule::WorkdaysAndHolidays,
        ("workdays_only", _) => AttendanceDaysRule::WorkdaysOnly,
        (other, _) => {
            warn!("Unknown attendance days method '{other}', defaulting to workdays only");
            AttendanceDaysRule::WorkdaysOnly
        }
    };

    RuleConfig {
        company_id: parent.company_id,
        version: parent.version,
        work_start: parent.work_start,
        work_end: parent.work_end,
        lunch_start: parent.lunch_start,
        lunch_end: parent.lunch_end,
        late_rules: late_rules
            .into_iter()
            .map(|row| LateRule {
                previous_day_checkout: row.previous_day_checkout,
                late_threshold: row.late_threshold,
            })
            .collect(),
        late_exemption_enabled: parent.late_exemption_enabled,
        late_exemption_count: parent.late_exemption_count.max(0) as u32,
        late_exemption_minutes: parent.late_exemption_minutes,
        penalty_mode,
        penalty_rules: penalty_rules
            .into_iter()
            .map(|row| PenaltyRule {
                min_minutes: row.min_minutes,
                max_minutes: row.max_minutes,
                penalty: row.penalty,
            })
            .collect(),
        max_performance_penalty: parent.max_performance_penalty,
        overtime_checkpoints: checkpoints.into_iter().map(|row| row.checkpoint).collect(),
        full_attendance_rules: full_attendance_rules
            .into_iter()
            .map(|row| FullAttendanceRule {
                category: row.category,
                enabled: row.enabled,
                threshold: row.threshold,
                unit: match row.unit.as_str() {
                    "hours" => ThresholdUnit::Hours,
                    _ => ThresholdUnit::Count,
                },
            })
            .collect(),
        comp_time_only_keeps_full_attendance: parent.comp_time_only_keeps_full_attendance,
        attendance_days_rule,
        daily_hour_constant: parent.daily_hour_constant,
        leave_display_rules: leave_display_rules
            .into_iter()
            .map(|row| LeaveDisplayRule {
                leave_type: row.leave_type,
                label: row.label,
                enabled: row.enabled,
            })
            .collect(),
    }
}
