// ==========================================
// 绩效激励核算系统 - 员工月度汇总引擎
// ==========================================
// 职责: 把一名员工全部 KPI 的月度核算结果折算为逐月汇总
// 输入: Employee（取薪资/PPF）+ MonthlyMetricOutcome 集合
// 输出: MonthlyEmployeeSummary 列表（月份升序）
// 红线: 无状态引擎, 纯函数; 月份取所有 KPI 的并集
// ==========================================

use crate::domain::employee::Employee;
use crate::domain::summary::{MonthlyEmployeeSummary, MonthlyMetricOutcome};
use crate::domain::types::MonthKey;
use std::collections::BTreeMap;

// ==========================================
// MonthlyRollupEngine - 月度汇总引擎
// ==========================================
pub struct MonthlyRollupEngine;

impl MonthlyRollupEngine {
    /// 创建新的月度汇总引擎
    pub fn new() -> Self {
        Self
    }

    /// 汇总一名员工的逐月薪酬与产出
    ///
    /// 每个出现过结果的月份产出一条汇总:
    /// - total_incentive: 当月全部 KPI 激励之和（未达标的金额本就是 0）
    /// - total_compensation: 薪资 + 激励
    /// - target_ratio_pct: 总薪酬/PPF × 100, PPF=0 时为 0
    /// - total_profit: 达标且金额 > 0 的 KPI 的聚合值之和
    /// - profit_ratio_pct: 产出/激励 × 100, 激励=0 时为 0（0/0 报 0, 不报未定义）
    pub fn rollup(
        &self,
        employee: &Employee,
        outcomes: &[MonthlyMetricOutcome],
    ) -> Vec<MonthlyEmployeeSummary> {
        // 按月归并: (激励合计, 产出合计)
        let mut months: BTreeMap<MonthKey, (f64, f64)> = BTreeMap::new();

        for outcome in outcomes {
            let slot = months.entry(outcome.month).or_insert((0.0, 0.0));
            slot.0 += outcome.amount;
            if outcome.qualified && outcome.amount > 0.0 {
                slot.1 += outcome.aggregated_value;
            }
        }

        months
            .into_iter()
            .map(|(month, (total_incentive, total_profit))| {
                let total_compensation = employee.monthly_salary + total_incentive;

                let target_ratio_pct = if employee.ppf > 0.0 {
                    total_compensation / employee.ppf * 100.0
                } else {
                    0.0
                };

                let profit_ratio_pct = if total_incentive > 0.0 {
                    total_profit / total_incentive * 100.0
                } else {
                    0.0
                };

                MonthlyEmployeeSummary {
                    employee_id: employee.employee_id.clone(),
                    employee_name: employee.name.clone(),
                    month,
                    salary: employee.monthly_salary,
                    total_incentive,
                    total_compensation,
                    ppf: employee.ppf,
                    target_ratio_pct,
                    total_profit,
                    profit_ratio_pct,
                }
            })
            .collect()
    }
}

impl Default for MonthlyRollupEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================
    // 测试辅助函数
    // ==========================================

    fn outcome(kpi: &str, month: MonthKey, value: f64, amount: f64, qualified: bool) -> MonthlyMetricOutcome {
        MonthlyMetricOutcome {
            employee_id: "E1".to_string(),
            kpi_name: kpi.to_string(),
            month,
            aggregated_value: value,
            amount,
            qualified,
            trace: Vec::new(),
        }
    }

    fn employee(salary: f64, ppf: f64) -> Employee {
        let mut emp = Employee::new("E1", "测试员工");
        emp.monthly_salary = salary;
        emp.ppf = ppf;
        emp
    }

    #[test]
    fn test_two_metrics_same_month() {
        // 两个达标 KPI 各出 50/30, 薪资 2000, PPF 2100
        let engine = MonthlyRollupEngine::new();
        let jan = MonthKey::new(2024, 1);
        let summaries = engine.rollup(
            &employee(2000.0, 2100.0),
            &[
                outcome("销量", jan, 100.0, 50.0, true),
                outcome("回款", jan, 60.0, 30.0, true),
            ],
        );

        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.total_incentive, 80.0);
        assert_eq!(s.total_compensation, 2080.0);
        assert!((s.target_ratio_pct - 99.047619).abs() < 1e-4);
        assert_eq!(s.total_profit, 160.0);
        assert_eq!(s.profit_ratio_pct, 200.0);
    }

    #[test]
    fn test_month_union_across_metrics() {
        // 不同 KPI 覆盖不同月份, 汇总取并集且月份升序
        let engine = MonthlyRollupEngine::new();
        let summaries = engine.rollup(
            &employee(1000.0, 0.0),
            &[
                outcome("A", MonthKey::new(2024, 2), 10.0, 5.0, true),
                outcome("B", MonthKey::new(2024, 1), 20.0, 8.0, true),
            ],
        );

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].month, MonthKey::new(2024, 1));
        assert_eq!(summaries[1].month, MonthKey::new(2024, 2));
    }

    #[test]
    fn test_unqualified_metric_excluded_from_profit() {
        // 未达标 KPI: 金额 0 且不计入产出, 但月份仍出现在汇总中
        let engine = MonthlyRollupEngine::new();
        let jan = MonthKey::new(2024, 1);
        let summaries = engine.rollup(
            &employee(1000.0, 0.0),
            &[outcome("A", jan, 40.0, 0.0, false)],
        );

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_incentive, 0.0);
        assert_eq!(summaries[0].total_profit, 0.0);
        assert_eq!(summaries[0].profit_ratio_pct, 0.0);
    }

    #[test]
    fn test_qualified_zero_amount_excluded_from_profit() {
        // 达标但金额 0（如未到最低档）不计产出
        let engine = MonthlyRollupEngine::new();
        let jan = MonthKey::new(2024, 1);
        let summaries = engine.rollup(
            &employee(1000.0, 0.0),
            &[
                outcome("A", jan, 5.0, 0.0, true),
                outcome("B", jan, 30.0, 10.0, true),
            ],
        );

        assert_eq!(summaries[0].total_profit, 30.0);
        assert_eq!(summaries[0].profit_ratio_pct, 300.0);
    }

    #[test]
    fn test_ppf_zero_ratio_zero() {
        let engine = MonthlyRollupEngine::new();
        let jan = MonthKey::new(2024, 1);
        let summaries = engine.rollup(&employee(1000.0, 0.0), &[outcome("A", jan, 10.0, 5.0, true)]);
        assert_eq!(summaries[0].target_ratio_pct, 0.0);
    }

    #[test]
    fn test_no_outcomes_no_summaries() {
        let engine = MonthlyRollupEngine::new();
        assert!(engine.rollup(&employee(1000.0, 500.0), &[]).is_empty());
    }
}
