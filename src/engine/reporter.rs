// ==========================================
// 绩效激励核算系统 - 跨员工报表引擎
// ==========================================
// 职责: 把多名员工的月度汇总合并为统一报表（薪酬表 + 产出表）
// 排序: 月份升序, 再按员工姓名升序
// 红线: 只合并与排序, 不做新的计算; 月份取并集;
//       没有任何可计月份的员工不产生行, 不算错误
// ==========================================

use crate::domain::summary::{
    CompensationRow, CrossEmployeeReport, MonthlyEmployeeSummary, ProfitRow,
};

/// 展示口径: 四舍五入到 2 位小数
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ==========================================
// CrossEmployeeReporter - 跨员工报表引擎
// ==========================================
pub struct CrossEmployeeReporter;

impl CrossEmployeeReporter {
    /// 创建新的跨员工报表引擎
    pub fn new() -> Self {
        Self
    }

    /// 合并多名员工的月度汇总
    ///
    /// 输入不要求有序; 输出两张表共用 (月份, 姓名) 升序
    pub fn merge(&self, summaries: &[MonthlyEmployeeSummary]) -> CrossEmployeeReport {
        let mut ordered: Vec<&MonthlyEmployeeSummary> = summaries.iter().collect();
        ordered.sort_by(|a, b| {
            a.month
                .cmp(&b.month)
                .then_with(|| a.employee_name.cmp(&b.employee_name))
        });

        let compensation = ordered
            .iter()
            .map(|s| CompensationRow {
                employee_name: s.employee_name.clone(),
                month: s.month,
                salary: round2(s.salary),
                total_incentive: round2(s.total_incentive),
                total_compensation: round2(s.total_compensation),
                ppf: round2(s.ppf),
                target_ratio_pct: round2(s.target_ratio_pct),
            })
            .collect();

        let profit = ordered
            .iter()
            .map(|s| ProfitRow {
                employee_name: s.employee_name.clone(),
                month: s.month,
                profit: round2(s.total_profit),
                incentive: round2(s.total_incentive),
                profit_ratio_pct: round2(s.profit_ratio_pct),
            })
            .collect();

        CrossEmployeeReport {
            compensation,
            profit,
        }
    }
}

impl Default for CrossEmployeeReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::MonthKey;

    fn summary(name: &str, month: MonthKey, incentive: f64) -> MonthlyEmployeeSummary {
        MonthlyEmployeeSummary {
            employee_id: name.to_string(),
            employee_name: name.to_string(),
            month,
            salary: 1000.0,
            total_incentive: incentive,
            total_compensation: 1000.0 + incentive,
            ppf: 0.0,
            target_ratio_pct: 0.0,
            total_profit: 0.0,
            profit_ratio_pct: 0.0,
        }
    }

    #[test]
    fn test_sorted_by_month_then_name() {
        let reporter = CrossEmployeeReporter::new();
        let report = reporter.merge(&[
            summary("王五", MonthKey::new(2024, 2), 10.0),
            summary("李四", MonthKey::new(2024, 1), 20.0),
            summary("张三", MonthKey::new(2024, 2), 30.0),
        ]);

        let order: Vec<(String, MonthKey)> = report
            .compensation
            .iter()
            .map(|r| (r.employee_name.clone(), r.month))
            .collect();
        assert_eq!(
            order,
            vec![
                ("李四".to_string(), MonthKey::new(2024, 1)),
                ("张三".to_string(), MonthKey::new(2024, 2)),
                ("王五".to_string(), MonthKey::new(2024, 2)),
            ]
        );
        // 两张表同序
        assert_eq!(report.profit[0].employee_name, "李四");
    }

    #[test]
    fn test_month_union_disjoint_employees() {
        // 两名员工月份不相交 → 并集, 各自成行
        let reporter = CrossEmployeeReporter::new();
        let report = reporter.merge(&[
            summary("甲", MonthKey::new(2024, 1), 1.0),
            summary("乙", MonthKey::new(2024, 3), 2.0),
        ]);
        assert_eq!(report.compensation.len(), 2);
        assert_eq!(report.profit.len(), 2);
    }

    #[test]
    fn test_empty_input_empty_report() {
        // 零可计月份的员工不贡献输入, 也就不产生行
        let reporter = CrossEmployeeReporter::new();
        let report = reporter.merge(&[]);
        assert!(report.compensation.is_empty());
        assert!(report.profit.is_empty());
    }

    #[test]
    fn test_rounding_two_decimals() {
        let mut s = summary("甲", MonthKey::new(2024, 1), 33.333);
        s.target_ratio_pct = 99.047619;
        let report = CrossEmployeeReporter::new().merge(&[s]);
        assert_eq!(report.compensation[0].total_incentive, 33.33);
        assert_eq!(report.compensation[0].target_ratio_pct, 99.05);
    }
}
