//! Re-exports of all entity types.

pub use super::full_attendance_rules::Entity as FullAttendanceRules;
pub use super::late_rules::Entity as LateRules;
pub use super::leave_display_rules::Entity as LeaveDisplayRules;
pub use super::overtime_checkpoints::Entity as OvertimeCheckpoints;
pub use super::penalty_rules::Entity as PenaltyRules;
pub use super::rule_config_changelog::Entity as RuleConfigChangelog;
pub use super::rule_configs::Entity as RuleConfigs;
