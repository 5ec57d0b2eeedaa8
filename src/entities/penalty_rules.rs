//! Ordered penalty tier rows.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "penalty_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub rule_config_id: i32,
    pub sort_order: i32,
    pub min_minutes: i64,
    /// 999 marks an open-ended tier.
    pub max_minutes: i64,
    pub penalty: f64,
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
