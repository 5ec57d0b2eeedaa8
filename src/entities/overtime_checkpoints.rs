//! Ordered overtime checkpoint rows (the cross-midnight rule rows).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "overtime_checkpoints")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub rule_config_id: i32,
    pub sort_order: i32,
    /// Raw checkpoint string as configured ("22:00", "下午07:30").
    pub checkpoint: String,
    /// Midnight checkpoints belong to the next calendar day.
    pub next_day: bool,
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
