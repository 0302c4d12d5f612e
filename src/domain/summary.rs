// ==========================================
// 绩效激励核算系统 - 派生输出模型
// ==========================================
// 用途: 引擎输出, 展示协作方消费
// 红线: 派生实体按需重算, 引擎自身不落库
// ==========================================

use crate::domain::types::MonthKey;
use serde::{Deserialize, Serialize};

// ==========================================
// MonthlyMetricOutcome - 单 KPI 月度核算结果
// ==========================================
// 每条 = (员工, KPI, 月份) 的聚合值 + 激励金额 + 计算轨迹
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMetricOutcome {
    pub employee_id: String,
    pub kpi_name: String,
    pub month: MonthKey,

    // ===== 核算数据 =====
    pub aggregated_value: f64, // 当月结果累计
    pub amount: f64,           // 激励金额（>= 0）
    pub qualified: bool,       // 是否达到最低激活结果

    // ===== 可解释性 =====
    pub trace: Vec<String>, // 计算轨迹（逐行算式, 审计/展示用）
}

// ==========================================
// MonthlyEmployeeSummary - 员工月度汇总
// ==========================================
// 覆盖该员工所有 KPI 出现过的月份（并集）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyEmployeeSummary {
    pub employee_id: String,
    pub employee_name: String,
    pub month: MonthKey,

    // ===== 薪酬 =====
    pub salary: f64,             // 月基本薪资
    pub total_incentive: f64,    // 当月激励合计
    pub total_compensation: f64, // 总薪酬 = 薪资 + 激励

    // ===== 目标达成 =====
    pub ppf: f64,              // 个人月度薪酬目标
    pub target_ratio_pct: f64, // 总薪酬/PPF × 100（PPF=0 时为 0）

    // ===== 产出效率 =====
    pub total_profit: f64,     // 达标且产生激励的 KPI 的结果累计之和
    pub profit_ratio_pct: f64, // 产出/激励 × 100（激励=0 时为 0）
}

// ==========================================
// CompensationRow - 跨员工薪酬报表行
// ==========================================
// 排序: 月份升序, 再按员工姓名升序; 数值四舍五入到 2 位（展示口径）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationRow {
    pub employee_name: String,
    pub month: MonthKey,
    pub salary: f64,
    pub total_incentive: f64,
    pub total_compensation: f64,
    pub ppf: f64,
    pub target_ratio_pct: f64,
}

// ==========================================
// ProfitRow - 跨员工产出报表行
// ==========================================
// 与薪酬报表同排序, 承载产出/激励/比率
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitRow {
    pub employee_name: String,
    pub month: MonthKey,
    pub profit: f64,
    pub incentive: f64,
    pub profit_ratio_pct: f64,
}

// ==========================================
// CrossEmployeeReport - 跨员工合并报表
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CrossEmployeeReport {
    pub compensation: Vec<CompensationRow>,
    pub profit: Vec<ProfitRow>,
}
