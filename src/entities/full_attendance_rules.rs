//! Full-attendance disqualification rule rows.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "full_attendance_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub rule_config_id: i32,
    /// "late", "missing", "absenteeism", or a leave category key.
    pub category: String,
    pub enabled: bool,
    pub threshold: f64,
    /// "count" or "hours".
    pub unit: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rule_configs::Entity",
        from = "Column::RuleConfigId",
        to = "super::rule_configs::Column::Id"
    )]
    RuleConfigs,
}

impl Related<super::rule_configs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RuleConfigs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
