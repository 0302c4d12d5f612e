// ==========================================
// 绩效激励核算系统 - 员工领域模型
// ==========================================
// 用途: 存储层写入, 引擎层只读
// 红线: 引擎绝不回写输入实体, 派生结果一律另建结构
// ==========================================

use crate::domain::types::IncentiveKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 员工目录: employee_id -> Employee
///
/// 由存储协作方整体装配后交给引擎, BTreeMap 保证遍历顺序确定
pub type EmployeeDirectory = BTreeMap<String, Employee>;

// ==========================================
// Employee - 员工主数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    // ===== 主键 =====
    pub employee_id: String, // 员工唯一标识（UUID）

    // ===== 基础信息 =====
    pub name: String,       // 姓名
    pub monthly_salary: f64, // 月基本薪资（非负）
    pub role: String,       // 岗位（自由文本, 不参与计算）

    // ===== 激励目标 =====
    pub ppf: f64, // 个人月度薪酬目标（0 = 未设置）

    // ===== KPI 配置 =====
    pub kpis: BTreeMap<String, Kpi>, // KPI 名称 -> 配置（名称在员工内唯一）
}

impl Employee {
    /// 创建空 KPI 配置的员工
    pub fn new(employee_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            name: name.into(),
            monthly_salary: 0.0,
            role: String::new(),
            ppf: 0.0,
            kpis: BTreeMap::new(),
        }
    }
}

// ==========================================
// Kpi - 绩效指标与激励规则配置
// ==========================================
// 约定: tiers 非空时覆盖 premium 的平面计算,
//       但仍沿用 kind 决定阶梯取 premium 还是 percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub kind: IncentiveKind, // 激励类型
    pub min_result: f64,     // 最低激活结果（月度累计须达到才发放）
    pub premium: f64,        // 基础激励值（金额或百分比, 视 kind 而定）

    // 阶梯配置（空 = 平面规则）
    #[serde(default)]
    pub tiers: Vec<Tier>,

    // 结果录入历史（按时间追加, 引擎不要求有序）
    #[serde(default)]
    pub history: Vec<ResultEntry>,
}

impl Kpi {
    /// 创建平面规则 KPI
    pub fn flat(kind: IncentiveKind, min_result: f64, premium: f64) -> Self {
        Self {
            kind,
            min_result,
            premium,
            tiers: Vec::new(),
            history: Vec::new(),
        }
    }

    /// 创建阶梯规则 KPI
    pub fn tiered(kind: IncentiveKind, min_result: f64, tiers: Vec<Tier>) -> Self {
        Self {
            kind,
            min_result,
            premium: 0.0,
            tiers,
            history: Vec::new(),
        }
    }
}

// ==========================================
// Tier - 阶梯配置
// ==========================================
// (threshold, premium, percent) 三元组
// percent 缺省读作 0（宽松默认, 不报错）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub threshold: f64, // 激活该档的结果下限
    pub premium: f64,   // 固定金额档位值（kind=FIXED_AMOUNT 时取用）
    #[serde(default)]
    pub percent: f64, // 百分比档位值（kind=PERCENT_* 时取用）
}

impl Tier {
    pub fn new(threshold: f64, premium: f64, percent: f64) -> Self {
        Self {
            threshold,
            premium,
            percent,
        }
    }
}

// ==========================================
// ResultEntry - 结果录入记录
// ==========================================
// 日粒度; 同日多条属录入异常而非设计场景, 引擎不去重, 一律累加
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub date: NaiveDate, // 达成日期
    pub achieved: f64,   // 达成值（非负, 上游校验）
}

impl ResultEntry {
    pub fn new(date: NaiveDate, achieved: f64) -> Self {
        Self { date, achieved }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_percent_default() {
        // 旧数据可能缺 percent 字段, 反序列化按 0 处理
        let tier: Tier = serde_json::from_str(r#"{"threshold": 10.0, "premium": 50.0}"#).unwrap();
        assert_eq!(tier.percent, 0.0);
    }

    #[test]
    fn test_kpi_defaults() {
        let kpi: Kpi = serde_json::from_str(
            r#"{"kind": "FIXED_AMOUNT", "min_result": 0.0, "premium": 100.0}"#,
        )
        .unwrap();
        assert!(kpi.tiers.is_empty());
        assert!(kpi.history.is_empty());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        // 未识别的激励类型必须在反序列化边界报错, 不允许静默默认
        let result: Result<Kpi, _> =
            serde_json::from_str(r#"{"kind": "BONUS", "min_result": 0.0, "premium": 1.0}"#);
        assert!(result.is_err());
    }
}
