//! Ordered cross-day lateness rule rows.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "late_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub rule_config_id: i32,
    pub sort_order: i32,
    pub previous_day_checkout: ChronoTime,
    pub late_threshold: ChronoTime,
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
