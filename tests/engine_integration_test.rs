// ==========================================
// 激励计算引擎集成测试
// ==========================================
// 测试目标: 聚合 → 规则求值 → 月度汇总的端到端语义
// 覆盖范围: 最低门槛 / 阶梯取档 / 平面四型 / 月度并集 / 幂等性
// ==========================================


use incentive_engine::domain::employee::{Employee, Kpi, ResultEntry, Tier};
use incentive_engine::domain::types::{IncentiveKind, MonthKey};
use incentive_engine::engine::{
    IncentiveOrchestrator, MonthlyRollupEngine, ResultAggregator, RuleEvaluator,
};
use test_helpers::{date, sample_employee};

// ==========================================
// 测试用例 1: 月内累加聚合
// ==========================================

#[test]
fn test_aggregation_additive_within_month() {
    let aggregator = ResultAggregator::new();
    let monthly = aggregator.aggregate(&[
        ResultEntry::new(date(2024, 1, 5), 10.0),
        ResultEntry::new(date(2024, 1, 20), 15.0),
    ]);
    assert_eq!(monthly[&MonthKey::new(2024, 1)], 25.0);
}

// ==========================================
// 测试用例 2: 未达门槛一律不发放
// ==========================================

#[test]
fn test_below_minimum_zero_for_all_rule_shapes() {
    let evaluator = RuleEvaluator::new();
    let kpis = [
        Kpi::flat(IncentiveKind::FixedAmount, 50.0, 100.0),
        Kpi::flat(IncentiveKind::PercentOfResult, 50.0, 10.0),
        Kpi::flat(IncentiveKind::PercentOfSalary, 50.0, 5.0),
        Kpi::flat(IncentiveKind::FixedPerResultUnit, 50.0, 5.0),
        Kpi::tiered(
            IncentiveKind::FixedAmount,
            50.0,
            vec![Tier::new(10.0, 50.0, 0.0)],
        ),
    ];

    for kpi in &kpis {
        let outcome = evaluator.evaluate(kpi, 40.0, 2000.0).unwrap();
        assert_eq!(outcome.amount, 0.0);
        assert!(!outcome.qualified);
    }
}

// ==========================================
// 测试用例 3: 阶梯取最高命中档, 不累计
// ==========================================

#[test]
fn test_tier_resolution_highest_not_cumulative() {
    let evaluator = RuleEvaluator::new();
    let kpi = Kpi::tiered(
        IncentiveKind::FixedAmount,
        0.0,
        vec![Tier::new(10.0, 50.0, 0.0), Tier::new(20.0, 100.0, 0.0)],
    );

    // 值 15: 只命中 10 档 → 50（不是 150）
    assert_eq!(evaluator.evaluate(&kpi, 15.0, 0.0).unwrap().amount, 50.0);
    // 值 20: 命中两档, 最高档生效 → 100
    assert_eq!(evaluator.evaluate(&kpi, 20.0, 0.0).unwrap().amount, 100.0);
}

// ==========================================
// 测试用例 4: 平面四型算式
// ==========================================

#[test]
fn test_flat_rule_arithmetic() {
    let evaluator = RuleEvaluator::new();

    let per_unit = Kpi::flat(IncentiveKind::FixedPerResultUnit, 0.0, 5.0);
    assert_eq!(evaluator.evaluate(&per_unit, 20.0, 0.0).unwrap().amount, 100.0);

    let pct_result = Kpi::flat(IncentiveKind::PercentOfResult, 0.0, 10.0);
    assert_eq!(
        evaluator.evaluate(&pct_result, 200.0, 0.0).unwrap().amount,
        20.0
    );

    let pct_salary = Kpi::flat(IncentiveKind::PercentOfSalary, 0.0, 5.0);
    assert_eq!(
        evaluator.evaluate(&pct_salary, 1.0, 2000.0).unwrap().amount,
        100.0
    );
    assert_eq!(
        evaluator.evaluate(&pct_salary, 5000.0, 2000.0).unwrap().amount,
        100.0
    );

    let fixed = Kpi::flat(IncentiveKind::FixedAmount, 0.0, 77.0);
    assert_eq!(evaluator.evaluate(&fixed, 3.0, 0.0).unwrap().amount, 77.0);
}

// ==========================================
// 测试用例 5: 月度汇总算式
// ==========================================

#[test]
fn test_rollup_compensation_and_target_ratio() {
    let mut emp = Employee::new("E1", "张三");
    emp.monthly_salary = 2000.0;
    emp.ppf = 2100.0;

    // 两个达标 KPI, 当月各出 50 / 30
    let mut a = Kpi::flat(IncentiveKind::FixedAmount, 0.0, 50.0);
    a.history.push(ResultEntry::new(date(2024, 1, 10), 10.0));
    emp.kpis.insert("A".to_string(), a);

    let mut b = Kpi::flat(IncentiveKind::FixedAmount, 0.0, 30.0);
    b.history.push(ResultEntry::new(date(2024, 1, 12), 5.0));
    emp.kpis.insert("B".to_string(), b);

    let computation = IncentiveOrchestrator::new().compute_employee(&emp);
    assert_eq!(computation.summaries.len(), 1);

    let summary = &computation.summaries[0];
    assert_eq!(summary.total_incentive, 80.0);
    assert_eq!(summary.total_compensation, 2080.0);
    assert!((summary.target_ratio_pct - 99.047619).abs() < 1e-4);
}

// ==========================================
// 测试用例 6: 月份并集与产出口径
// ==========================================

#[test]
fn test_sample_employee_rollup() {
    let emp = sample_employee("E1", "张三");
    let computation = IncentiveOrchestrator::new().compute_employee(&emp);

    // 1月: 销量 100 + 服务质量 100 + 回款 50
    // 2月: 销量 20, 服务质量未达标
    assert_eq!(computation.summaries.len(), 2);

    let jan = &computation.summaries[0];
    assert_eq!(jan.month, MonthKey::new(2024, 1));
    assert_eq!(jan.total_incentive, 250.0);
    assert_eq!(jan.total_profit, 20.0 + 90.0 + 1500.0);
    assert!((jan.profit_ratio_pct - 644.0).abs() < 1e-9);

    let feb = &computation.summaries[1];
    assert_eq!(feb.month, MonthKey::new(2024, 2));
    assert_eq!(feb.total_incentive, 20.0);
    // 未达标 KPI 不计产出
    assert_eq!(feb.total_profit, 4.0);
    assert!((feb.profit_ratio_pct - 20.0).abs() < 1e-9);
}

// ==========================================
// 测试用例 7: 空汇总与 0/0 比率
// ==========================================

#[test]
fn test_zero_incentive_ratio_reported_as_zero() {
    let mut emp = Employee::new("E1", "张三");
    emp.monthly_salary = 1000.0;

    // 只有未达标记录: 汇总存在, 比率报 0 而非未定义
    let mut kpi = Kpi::flat(IncentiveKind::FixedAmount, 100.0, 50.0);
    kpi.history.push(ResultEntry::new(date(2024, 3, 1), 10.0));
    emp.kpis.insert("A".to_string(), kpi);

    let summaries = MonthlyRollupEngine::new().rollup(
        &emp,
        &IncentiveOrchestrator::new().compute_employee(&emp).outcomes,
    );
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].total_incentive, 0.0);
    assert_eq!(summaries[0].profit_ratio_pct, 0.0);
    assert_eq!(summaries[0].target_ratio_pct, 0.0);
}

// ==========================================
// 测试用例 8: 重复调用幂等
// ==========================================

#[test]
fn test_recompute_idempotent() {
    let emp = sample_employee("E1", "张三");
    let orchestrator = IncentiveOrchestrator::new();

    let first = orchestrator.compute_employee(&emp);
    let second = orchestrator.compute_employee(&emp);
    assert_eq!(first, second);

    // 轨迹逐字节一致
    for (a, b) in first.outcomes.iter().zip(second.outcomes.iter()) {
        assert_eq!(a.trace, b.trace);
    }
}
