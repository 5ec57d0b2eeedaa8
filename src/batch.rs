//! Batch evaluation orchestration.
//!
//! Employees are independent, so each month evaluation runs as its own
//! task. One failing employee never aborts the batch; failures are
//! collected and reported alongside the partial results.

use crate::engine::{evaluate_month, EvaluationContext, MonthInput};
use crate::error::Result;
use crate::models::{EmployeeMonthlyStats, HolidayCalendar};
use crate::rules::RuleConfig;
use std::sync::Arc;
use tracing::{info, warn};

/// Result of one batch evaluation run.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub stats: Vec<EmployeeMonthlyStats>,
    /// Employees that could not be evaluated, with the error message.
    pub failed: Vec<(String, String)>,
    pub duration_secs: f64,
}

impl BatchResult {
    /// Get summary message.
    pub fn summary(&self) -> String {
        let base = format!(
            "Evaluated: {}, Failed: {} (took {:.1}s)",
            self.stats.len(),
            self.failed.len(),
            self.duration_secs
        );
        if self.failed.is_empty() {
            base
        } else {
            let ids: Vec<&str> = self.failed.iter().map(|(id, _)| id.as_str()).collect();
            format!("{base} - failed employees: {}", ids.join(", "))
        }
    }
}

/// Batch evaluator holding the shared per-run inputs.
pub struct BatchEvaluator {
    config: Arc<RuleConfig>,
    calendar: Arc<HolidayCalendar>,
}

impl BatchEvaluator {
    /// Create an evaluator for one company's resolved configuration.
    ///
    /// The configuration is validated once here rather than per employee.
    pub fn new(config: RuleConfig, calendar: HolidayCalendar) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            calendar: Arc::new(calendar),
        })
    }

    /// Evaluate all employees concurrently.
    pub async fn evaluate(&self, employees: Vec<MonthInput>) -> BatchResult {
        let start = std::time::Instant::now();
        let total = employees.len();
        info!(
            "Evaluating {total} employees for company {}",
            self.config.company_id
        );

        let mut handles = Vec::with_capacity(total);
        for input in employees {
            let config = Arc::clone(&self.config);
            let calendar = Arc::clone(&self.calendar);
            handles.push(tokio::spawn(async move {
                let ctx = EvaluationContext {
                    config: &config,
                    calendar: &calendar,
                };
                let employee_id = input.employee_id.clone();
                (employee_id, evaluate_month(&ctx, &input))
            }));
        }

        let mut stats = Vec::new();
        let mut failed = Vec::new();
        for handle in handles {
            match handle.await {
                Ok((_, Ok(result))) => stats.push(result),
                Ok((employee_id, Err(e))) => {
                    warn!("Evaluation failed for employee {employee_id}: {e}");
                    failed.push((employee_id, e.to_string()));
                }
                Err(e) => {
                    warn!("Evaluation task panicked: {e}");
                    failed.push(("unknown".to_string(), e.to_string()));
                }
            }
        }

        // Task completion order is arbitrary; keep the output stable.
        stats.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
        failed.sort();

        let duration_secs = start.elapsed().as_secs_f64();
        info!(
            "Batch complete: {} evaluated, {} failed",
            stats.len(),
            failed.len()
        );

        BatchResult {
            stats,
            failed,
            duration_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn employee(id: &str, month: NaiveDate) -> MonthInput {
        MonthInput {
            employee_id: id.to_string(),
            month,
            punches: Vec::new(),
            leaves: HashMap::new(),
            hire_date: None,
        }
    }

    #[tokio::test]
    async fn test_batch_is_order_stable() {
        let evaluator =
            BatchEvaluator::new(RuleConfig::default(), HolidayCalendar::default()).unwrap();
        let month = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let employees = vec![
            employee("1003", month),
            employee("1001", month),
            employee("1002", month),
        ];
        let result = evaluator.evaluate(employees).await;
        let ids: Vec<&str> = result.stats.iter().map(|s| s.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["1001", "1002", "1003"]);
        assert!(result.failed.is_empty());
    }

    #[tokio::test]
    async fn test_bad_employee_does_not_abort_batch() {
        let evaluator =
            BatchEvaluator::new(RuleConfig::default(), HolidayCalendar::default()).unwrap();
        let month = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let mut bad = employee("1002", month);
        // Not the first of a month: rejected by the aggregator.
        bad.month = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let result = evaluator.evaluate(vec![employee("1001", month), bad]).await;
        assert_eq!(result.stats.len(), 1);
        assert_eq!(result.failed.len(), 1);
        assert_eq!(result.failed[0].0, "1002");
        assert!(result.summary().contains("failed employees: 1002"));
    }

    #[test]
    fn test_invalid_config_rejected_up_front() {
        let mut config = RuleConfig::default();
        config.daily_hour_constant = 0.0;
        assert!(BatchEvaluator::new(config, HolidayCalendar::default()).is_err());
    }
}
