//! Parent rule configuration row, one per company.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rule_configs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub company_id: String,
    pub version: i32,
    pub work_start: ChronoTime,
    pub work_end: ChronoTime,
    pub lunch_start: ChronoTime,
    pub lunch_end: ChronoTime,
    pub late_exemption_enabled: bool,
    pub late_exemption_count: i32,
    pub late_exemption_minutes: i64,
    /// "capped" or "unlimited".
    pub penalty_mode: String,
    pub max_performance_penalty: f64,
    /// "workdays_only", "fixed" or "workdays_and_holidays".
    pub attendance_days_method: String,
    pub fixed_attendance_days: Option<f64>,
    pub daily_hour_constant: f64,
    pub comp_time_only_keeps_full_attendance: bool,
    pub updated_at: ChronoDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::late_rules::Entity")]
    LateRules,
    #[sea_orm(has_many = "super::penalty_rules::Entity")]
    PenaltyRules,
    #[sea_orm(has_many = "super::full_attendance_rules::Entity")]
    FullAttendanceRules,
    #[sea_orm(has_many = "super::leave_display_rules::Entity")]
    LeaveDisplayRules,
    #[sea_orm(has_many = "super::overtime_checkpoints::Entity")]
    OvertimeCheckpoints,
    #[sea_orm(has_many = "super::rule_config_changelog::Entity")]
    RuleConfigChangelog,
}

impl Related<super::late_rules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LateRules.def()
    }
}

impl Related<super::penalty_rules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PenaltyRules.def()
    }
}

impl Related<super::full_attendance_rules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FullAttendanceRules.def()
    }
}

impl Related<super::leave_display_rules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveDisplayRules.def()
    }
}

impl Related<super::overtime_checkpoints::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OvertimeCheckpoints.def()
    }
}

impl Related<super::rule_config_changelog::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RuleConfigChangelog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
