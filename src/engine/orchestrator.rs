// ==========================================
// 绩效激励核算系统 - 核算编排引擎
// ==========================================
// 职责: 串联 聚合 → 规则求值 → 月度汇总, 覆盖整个员工目录
// 输入: EmployeeDirectory 快照（只读）
// 输出: 每名员工的核算结果 + 被隔离的配置错误
// 红线: 逐 KPI 独立求值, 单个 KPI 配置错误不拖垮其他 KPI 或其他员工
// ==========================================

use crate::domain::employee::{Employee, EmployeeDirectory};
use crate::domain::summary::{MonthlyEmployeeSummary, MonthlyMetricOutcome};
use crate::engine::aggregator::ResultAggregator;
use crate::engine::error::EngineError;
use crate::engine::evaluator::RuleEvaluator;
use crate::engine::rollup::MonthlyRollupEngine;
use tracing::{instrument, warn};

// ==========================================
// MetricCalcError - 被隔离的单 KPI 错误
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct MetricCalcError {
    pub kpi_name: String,
    pub error: EngineError,
}

// ==========================================
// EmployeeComputation - 单员工核算结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeComputation {
    pub employee_id: String,
    pub outcomes: Vec<MonthlyMetricOutcome>,     // (KPI, 月份) 核算明细
    pub summaries: Vec<MonthlyEmployeeSummary>,  // 逐月汇总（月份升序）
    pub errors: Vec<MetricCalcError>,            // 配置错误, 调用方必须可见
}

// ==========================================
// IncentiveOrchestrator - 核算编排引擎
// ==========================================
pub struct IncentiveOrchestrator {
    aggregator: ResultAggregator,
    evaluator: RuleEvaluator,
    rollup: MonthlyRollupEngine,
}

impl IncentiveOrchestrator {
    /// 创建新的核算编排引擎
    pub fn new() -> Self {
        Self {
            aggregator: ResultAggregator::new(),
            evaluator: RuleEvaluator::new(),
            rollup: MonthlyRollupEngine::new(),
        }
    }

    /// 核算一名员工
    ///
    /// KPI 按名称序遍历, 月份按时间序, 输出顺序确定;
    /// 规则配置错误收进 errors 并 warn 记录, 其余 KPI 照常核算
    #[instrument(skip(self, employee), fields(employee_id = %employee.employee_id))]
    pub fn compute_employee(&self, employee: &Employee) -> EmployeeComputation {
        let mut outcomes = Vec::new();
        let mut errors = Vec::new();

        for (kpi_name, kpi) in &employee.kpis {
            let monthly = self.aggregator.aggregate(&kpi.history);

            for (month, aggregated_value) in monthly {
                match self
                    .evaluator
                    .evaluate(kpi, aggregated_value, employee.monthly_salary)
                {
                    Ok(outcome) => outcomes.push(MonthlyMetricOutcome {
                        employee_id: employee.employee_id.clone(),
                        kpi_name: kpi_name.clone(),
                        month,
                        aggregated_value,
                        amount: outcome.amount,
                        qualified: outcome.qualified,
                        trace: outcome.trace,
                    }),
                    Err(error) => {
                        warn!(kpi = %kpi_name, %error, "KPI 规则配置错误, 跳过该 KPI");
                        errors.push(MetricCalcError {
                            kpi_name: kpi_name.clone(),
                            error,
                        });
                        // 该 KPI 所有月份共用同一份配置, 无需逐月重复报错
                        break;
                    }
                }
            }
        }

        let summaries = self.rollup.rollup(employee, &outcomes);

        EmployeeComputation {
            employee_id: employee.employee_id.clone(),
            outcomes,
            summaries,
            errors,
        }
    }

    /// 核算整个员工目录
    ///
    /// 员工之间互不影响; 无历史记录的员工产出空结果, 不算错误
    #[instrument(skip(self, directory), fields(employees = directory.len()))]
    pub fn compute_directory(&self, directory: &EmployeeDirectory) -> Vec<EmployeeComputation> {
        directory
            .values()
            .map(|employee| self.compute_employee(employee))
            .collect()
    }
}

impl Default for IncentiveOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee::{Kpi, ResultEntry, Tier};
    use crate::domain::types::{IncentiveKind, MonthKey};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_employee() -> Employee {
        let mut emp = Employee::new("E1", "张三");
        emp.monthly_salary = 2000.0;
        emp.ppf = 2100.0;

        let mut sales = Kpi::flat(IncentiveKind::FixedPerResultUnit, 0.0, 5.0);
        sales.history.push(ResultEntry::new(date(2024, 1, 5), 10.0));
        sales.history.push(ResultEntry::new(date(2024, 1, 20), 10.0));
        emp.kpis.insert("销量".to_string(), sales);

        emp
    }

    #[test]
    fn test_compute_employee_end_to_end() {
        let orchestrator = IncentiveOrchestrator::new();
        let result = orchestrator.compute_employee(&sample_employee());

        assert!(result.errors.is_empty());
        assert_eq!(result.outcomes.len(), 1);
        let outcome = &result.outcomes[0];
        assert_eq!(outcome.month, MonthKey::new(2024, 1));
        assert_eq!(outcome.aggregated_value, 20.0);
        assert_eq!(outcome.amount, 100.0);

        assert_eq!(result.summaries.len(), 1);
        assert_eq!(result.summaries[0].total_compensation, 2100.0);
    }

    #[test]
    fn test_bad_metric_isolated() {
        // 非法 KPI 进 errors, 合法 KPI 照常核算
        let mut emp = sample_employee();
        let mut broken = Kpi::tiered(
            IncentiveKind::FixedPerResultUnit,
            0.0,
            vec![Tier::new(1.0, 1.0, 0.0)],
        );
        broken.history.push(ResultEntry::new(date(2024, 1, 8), 3.0));
        emp.kpis.insert("坏配置".to_string(), broken);

        let result = IncentiveOrchestrator::new().compute_employee(&emp);

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kpi_name, "坏配置");
        assert_eq!(result.outcomes.len(), 1);
        assert_eq!(result.outcomes[0].kpi_name, "销量");
    }

    #[test]
    fn test_empty_directory() {
        let orchestrator = IncentiveOrchestrator::new();
        assert!(orchestrator
            .compute_directory(&EmployeeDirectory::new())
            .is_empty());
    }

    #[test]
    fn test_employee_without_history() {
        // 无历史 → 空结果, 不是错误
        let mut emp = Employee::new("E2", "李四");
        emp.kpis
            .insert("销量".to_string(), Kpi::flat(IncentiveKind::FixedAmount, 0.0, 10.0));

        let result = IncentiveOrchestrator::new().compute_employee(&emp);
        assert!(result.outcomes.is_empty());
        assert!(result.summaries.is_empty());
        assert!(result.errors.is_empty());
    }
}
