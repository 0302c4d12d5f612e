// ==========================================
// 绩效激励核算系统 - 结果聚合引擎
// ==========================================
// 职责: 把单个 KPI 的日粒度结果记录折算为月度累计
// 输入: ResultEntry 序列（不要求有序）
// 输出: MonthKey -> 当月累计值
// 红线: 无状态引擎, 纯函数; 同月多条一律累加, 绝不覆盖
// ==========================================

use crate::domain::employee::ResultEntry;
use crate::domain::types::MonthKey;
use std::collections::BTreeMap;

// ==========================================
// ResultAggregator - 结果聚合引擎
// ==========================================
pub struct ResultAggregator;

impl ResultAggregator {
    /// 创建新的结果聚合引擎
    pub fn new() -> Self {
        Self
    }

    /// 按自然月聚合结果记录
    ///
    /// 规则:
    /// - 记录日期截断到年-月, 同月求和
    /// - 不依赖输入顺序, 只按月份键归并
    /// - 同日多条（录入异常）不去重, 照常累加
    /// - 空历史返回空映射
    pub fn aggregate(&self, entries: &[ResultEntry]) -> BTreeMap<MonthKey, f64> {
        let mut monthly: BTreeMap<MonthKey, f64> = BTreeMap::new();

        for entry in entries {
            let key = MonthKey::from_date(entry.date);
            *monthly.entry(key).or_insert(0.0) += entry.achieved;
        }

        monthly
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(y: i32, m: u32, d: u32, v: f64) -> ResultEntry {
        ResultEntry::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), v)
    }

    #[test]
    fn test_empty_history() {
        let aggregator = ResultAggregator::new();
        assert!(aggregator.aggregate(&[]).is_empty());
    }

    #[test]
    fn test_same_month_additive() {
        // 同月两条记录累加, 不覆盖
        let aggregator = ResultAggregator::new();
        let monthly = aggregator.aggregate(&[entry(2024, 1, 5, 10.0), entry(2024, 1, 20, 15.0)]);

        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly[&MonthKey::new(2024, 1)], 25.0);
    }

    #[test]
    fn test_months_split() {
        let aggregator = ResultAggregator::new();
        let monthly = aggregator.aggregate(&[
            entry(2024, 1, 31, 10.0),
            entry(2024, 2, 1, 20.0),
            entry(2023, 12, 15, 5.0),
        ]);

        assert_eq!(monthly.len(), 3);
        assert_eq!(monthly[&MonthKey::new(2023, 12)], 5.0);
        assert_eq!(monthly[&MonthKey::new(2024, 1)], 10.0);
        assert_eq!(monthly[&MonthKey::new(2024, 2)], 20.0);
    }

    #[test]
    fn test_order_independent() {
        // 输入顺序不影响结果
        let aggregator = ResultAggregator::new();
        let forward = aggregator.aggregate(&[entry(2024, 3, 1, 1.0), entry(2024, 1, 1, 2.0)]);
        let backward = aggregator.aggregate(&[entry(2024, 1, 1, 2.0), entry(2024, 3, 1, 1.0)]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_same_date_duplicates_summed() {
        // 同日多条属录入异常, 引擎不去重
        let aggregator = ResultAggregator::new();
        let monthly = aggregator.aggregate(&[entry(2024, 5, 10, 7.0), entry(2024, 5, 10, 3.0)]);
        assert_eq!(monthly[&MonthKey::new(2024, 5)], 10.0);
    }
}
