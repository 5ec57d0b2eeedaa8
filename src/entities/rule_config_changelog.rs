//! Audit log of rule configuration edits.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "rule_config_changelog")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub rule_config_id: i32,
    pub edited_by: String,
    pub edited_at: ChronoDateTime,
    /// Unified-diff style description of the edit.
    #[sea_orm(column_type = "Text")]
    pub diff: String,
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
