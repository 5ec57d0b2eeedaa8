//! Leave category display rule rows.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "leave_display_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub rule_config_id: i32,
    pub leave_type: String,
    pub label: String,
    pub enabled: bool,
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
