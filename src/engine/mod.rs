//! Attendance rule evaluation engine.
//!
//! Pure, side-effect-free computation: a resolved `RuleConfig` plus one
//! employee's raw month of punches and approvals in, one
//! `EmployeeMonthlyStats` out. Days fold strictly in ascending date order;
//! that is the engine's only ordering constraint.
//!
//! # Example
//!
//! ```ignore
//! use attendance_engine::engine::{evaluate_month, EvaluationContext, MonthInput};
//!
//! let ctx = EvaluationContext { config: &config, calendar: &calendar };
//! let stats = evaluate_month(&ctx, &input)?;
//! ```

pub mod exemption;
pub mod full_attendance;
pub mod lateness;
pub mod leave;
pub mod monthly;
pub mod overtime;
pub mod penalty;

#[cfg(test)]
mod tests;

pub use exemption::{ExemptionOutcome, ExemptionState};
pub use lateness::LatenessContext;
pub use monthly::{evaluate_month, EvaluationContext, MonthInput};
pub use overtime::OvertimeResult;
