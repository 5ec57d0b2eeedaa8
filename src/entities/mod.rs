//! SeaORM entities for the rule configuration schema.
//!
//! One `rule_configs` row per company plus ordered child-rule tables, and a
//! change-log table holding unified-diff audit entries per edit.

pub mod full_attendance_rules;
pub mod late_rules;
pub mod leave_display_rules;
pub mod overtime_checkpoints;
pub mod penalty_rules;
pub mod prelude;
pub mod rule_config_changelog;
pub mod rule_configs;
