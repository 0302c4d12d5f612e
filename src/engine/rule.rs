// ==========================================
// 绩效激励核算系统 - 激励规则表示
// ==========================================
// 职责: 把 Kpi 的松散配置（类型 + 基础值 + 可选阶梯）
//       解析为封闭的规则变体, 供求值引擎穷举分派
// 红线: 未识别/不合法的组合必须显式报错, 不静默取 0
// ==========================================

use crate::domain::employee::{Kpi, Tier};
use crate::domain::types::IncentiveKind;
use crate::engine::error::{EngineError, EngineResult};

// ==========================================
// IncentiveRule - 封闭规则变体
// ==========================================
// 平面四型 + 阶梯型; 阶梯型沿用激励类型决定档位取值字段
#[derive(Debug, Clone, PartialEq)]
pub enum IncentiveRule {
    /// 固定金额: amount = premium
    FixedAmount { premium: f64 },
    /// 按结果百分比: amount = value × percent / 100
    PercentOfResult { percent: f64 },
    /// 按月薪百分比: amount = salary × percent / 100
    PercentOfSalary { percent: f64 },
    /// 按结果单位计酬: amount = value × unit_premium
    FixedPerResultUnit { unit_premium: f64 },
    /// 阶梯规则: 取"不超过聚合值的最高档", 不累计
    Tiered { basis: TierBasis, tiers: Vec<Tier> },
}

// ==========================================
// TierBasis - 阶梯档位取值基准
// ==========================================
// 按件计酬没有阶梯语义, 不在此列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierBasis {
    FixedAmount,     // 取档位 premium
    PercentOfResult, // 取档位 percent, 基数 = 聚合值
    PercentOfSalary, // 取档位 percent, 基数 = 月薪
}

impl IncentiveRule {
    /// 从 KPI 配置解析规则
    ///
    /// - tiers 非空 → 阶梯规则, 档位按 threshold 升序防御性排序
    ///   （不信任存储顺序）
    /// - tiers 为空 → 平面规则, 按激励类型穷举分派
    /// - 阶梯 + 按件计酬是不合法组合 → InvalidRuleConfiguration
    pub fn resolve(kpi: &Kpi) -> EngineResult<IncentiveRule> {
        if kpi.tiers.is_empty() {
            return Ok(match kpi.kind {
                IncentiveKind::FixedAmount => IncentiveRule::FixedAmount {
                    premium: kpi.premium,
                },
                IncentiveKind::PercentOfResult => IncentiveRule::PercentOfResult {
                    percent: kpi.premium,
                },
                IncentiveKind::PercentOfSalary => IncentiveRule::PercentOfSalary {
                    percent: kpi.premium,
                },
                IncentiveKind::FixedPerResultUnit => IncentiveRule::FixedPerResultUnit {
                    unit_premium: kpi.premium,
                },
            });
        }

        let basis = match kpi.kind {
            IncentiveKind::FixedAmount => TierBasis::FixedAmount,
            IncentiveKind::PercentOfResult => TierBasis::PercentOfResult,
            IncentiveKind::PercentOfSalary => TierBasis::PercentOfSalary,
            IncentiveKind::FixedPerResultUnit => {
                return Err(EngineError::InvalidRuleConfiguration(format!(
                    "激励类型 {} 不支持阶梯配置",
                    kpi.kind
                )));
            }
        };

        let mut tiers = kpi.tiers.clone();
        tiers.sort_by(|a, b| a.threshold.total_cmp(&b.threshold));

        Ok(IncentiveRule::Tiered { basis, tiers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_resolution() {
        let kpi = Kpi::flat(IncentiveKind::PercentOfResult, 0.0, 10.0);
        assert_eq!(
            IncentiveRule::resolve(&kpi).unwrap(),
            IncentiveRule::PercentOfResult { percent: 10.0 }
        );
    }

    #[test]
    fn test_tiers_sorted_defensively() {
        // 存储顺序乱序, 解析后必须按 threshold 升序
        let kpi = Kpi::tiered(
            IncentiveKind::FixedAmount,
            0.0,
            vec![Tier::new(20.0, 100.0, 0.0), Tier::new(10.0, 50.0, 0.0)],
        );
        match IncentiveRule::resolve(&kpi).unwrap() {
            IncentiveRule::Tiered { tiers, .. } => {
                assert_eq!(tiers[0].threshold, 10.0);
                assert_eq!(tiers[1].threshold, 20.0);
            }
            other => panic!("期望阶梯规则, 实际 {:?}", other),
        }
    }

    #[test]
    fn test_tiered_per_unit_rejected() {
        let kpi = Kpi::tiered(
            IncentiveKind::FixedPerResultUnit,
            0.0,
            vec![Tier::new(10.0, 5.0, 0.0)],
        );
        assert!(matches!(
            IncentiveRule::resolve(&kpi),
            Err(EngineError::InvalidRuleConfiguration(_))
        ));
    }
}
