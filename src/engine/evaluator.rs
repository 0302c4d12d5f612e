// ==========================================
// 绩效激励核算系统 - 激励规则求值引擎
// ==========================================
// 职责: 对"单 KPI × 单月聚合值"应用激励规则, 产出金额与计算轨迹
// 输入: Kpi 配置 + 月度聚合值 + 员工月薪
// 输出: RuleOutcome (金额 >= 0, 达标标志, 逐行算式)
// 红线: 纯函数, 相同输入必产出逐字节相同的轨迹;
//       两级门槛（最低结果门槛 → 阶梯门槛）不可合并
// ==========================================

use crate::domain::employee::Kpi;
use crate::engine::error::EngineResult;
use crate::engine::rule::{IncentiveRule, TierBasis};

// ==========================================
// RuleOutcome - 单次求值结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub amount: f64,        // 激励金额（>= 0）
    pub qualified: bool,    // 是否达到最低激活结果
    pub trace: Vec<String>, // 计算轨迹（审计/展示用）
}

// ==========================================
// RuleEvaluator - 激励规则求值引擎
// ==========================================
// 红线: 无状态引擎, 所有方法都是纯函数
pub struct RuleEvaluator;

impl RuleEvaluator {
    /// 创建新的规则求值引擎
    pub fn new() -> Self {
        Self
    }

    /// 对单个月度聚合值求激励金额
    ///
    /// 算法:
    /// 1. 聚合值 < 最低激活结果 → 金额 0, 未达标, 单行轨迹, 结束
    /// 2. 达标后两条互斥路径:
    ///    - 阶梯路径: 升序走档, threshold <= 聚合值的每一档覆盖候选金额,
    ///      最终生效的是"不超过聚合值的最高档"（档位不累计）
    ///    - 平面路径: 按激励类型穷举分派, 恰好一行轨迹
    ///
    /// 错误: 仅规则解析可失败（非法的类型/阶梯组合）
    pub fn evaluate(
        &self,
        kpi: &Kpi,
        aggregated_value: f64,
        monthly_salary: f64,
    ) -> EngineResult<RuleOutcome> {
        let rule = IncentiveRule::resolve(kpi)?;

        // 第一级门槛: 最低激活结果
        // min_result = 0 时任何非负聚合值都达标
        if aggregated_value < kpi.min_result {
            return Ok(RuleOutcome {
                amount: 0.0,
                qualified: false,
                trace: vec![format!(
                    "MIN_GATE: value={} < min={}, incentive=0",
                    aggregated_value, kpi.min_result
                )],
            });
        }

        let mut trace = Vec::new();
        let amount = match rule {
            IncentiveRule::FixedAmount { premium } => {
                trace.push(format!(
                    "FLAT_FIXED: premium={} {}",
                    premium,
                    crate::CURRENCY
                ));
                premium
            }
            IncentiveRule::PercentOfResult { percent } => {
                let amount = aggregated_value * percent / 100.0;
                trace.push(format!(
                    "FLAT_PERCENT_RESULT: {} x {}% = {} {}",
                    aggregated_value,
                    percent,
                    amount,
                    crate::CURRENCY
                ));
                amount
            }
            IncentiveRule::PercentOfSalary { percent } => {
                let amount = monthly_salary * percent / 100.0;
                trace.push(format!(
                    "FLAT_PERCENT_SALARY: salary {} x {}% = {} {}",
                    monthly_salary,
                    percent,
                    amount,
                    crate::CURRENCY
                ));
                amount
            }
            IncentiveRule::FixedPerResultUnit { unit_premium } => {
                let amount = aggregated_value * unit_premium;
                trace.push(format!(
                    "FLAT_PER_UNIT: {} x {} = {} {}",
                    aggregated_value,
                    unit_premium,
                    amount,
                    crate::CURRENCY
                ));
                amount
            }
            IncentiveRule::Tiered { basis, tiers } => {
                self.walk_tiers(basis, &tiers, aggregated_value, monthly_salary, &mut trace)
            }
        };

        Ok(RuleOutcome {
            amount,
            qualified: true,
            trace,
        })
    }

    // ==========================================
    // 阶梯路径
    // ==========================================

    /// 升序走档, 命中档覆盖候选金额
    ///
    /// 第二级门槛: 最低档 threshold 高于聚合值时金额为 0
    /// （此时第一级门槛已判达标, qualified 仍为 true）
    fn walk_tiers(
        &self,
        basis: TierBasis,
        tiers: &[crate::domain::employee::Tier],
        aggregated_value: f64,
        monthly_salary: f64,
        trace: &mut Vec<String>,
    ) -> f64 {
        let mut amount = 0.0;
        let mut hit = false;

        for tier in tiers {
            if aggregated_value < tier.threshold {
                break;
            }
            hit = true;

            amount = match basis {
                TierBasis::FixedAmount => {
                    trace.push(format!(
                        "TIER_HIT: threshold={}, fixed premium={} {}",
                        tier.threshold,
                        tier.premium,
                        crate::CURRENCY
                    ));
                    tier.premium
                }
                TierBasis::PercentOfResult => {
                    let candidate = aggregated_value * tier.percent / 100.0;
                    trace.push(format!(
                        "TIER_HIT: threshold={}, {} x {}% = {} {}",
                        tier.threshold,
                        aggregated_value,
                        tier.percent,
                        candidate,
                        crate::CURRENCY
                    ));
                    candidate
                }
                TierBasis::PercentOfSalary => {
                    let candidate = monthly_salary * tier.percent / 100.0;
                    trace.push(format!(
                        "TIER_HIT: threshold={}, salary {} x {}% = {} {}",
                        tier.threshold,
                        monthly_salary,
                        tier.percent,
                        candidate,
                        crate::CURRENCY
                    ));
                    candidate
                }
            };
        }

        if !hit {
            // tiers 已升序, 首档即最低门槛
            let lowest = tiers.first().map(|t| t.threshold).unwrap_or(0.0);
            trace.push(format!(
                "TIER_NONE: value={} below lowest threshold={}, incentive=0",
                aggregated_value, lowest
            ));
        }

        amount
    }
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
