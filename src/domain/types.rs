// ==========================================
// 绩效激励核算系统 - 领域类型定义
// ==========================================
// 红线: 激励类型是封闭枚举, 新类型必须走编译期分支检查
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 激励类型 (Incentive Kind)
// ==========================================
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncentiveKind {
    FixedAmount,        // 固定金额
    PercentOfResult,    // 按结果百分比
    PercentOfSalary,    // 按月薪百分比
    FixedPerResultUnit, // 按结果单位计酬
}

impl IncentiveKind {
    /// 从存储字符串解析激励类型
    ///
    /// 未识别的类型返回 None, 由调用方（仓储/API 层）转换为显式错误,
    /// 绝不静默回退到某个默认类型
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "FIXED_AMOUNT" => Some(IncentiveKind::FixedAmount),
            "PERCENT_OF_RESULT" => Some(IncentiveKind::PercentOfResult),
            "PERCENT_OF_SALARY" => Some(IncentiveKind::PercentOfSalary),
            "FIXED_PER_RESULT_UNIT" => Some(IncentiveKind::FixedPerResultUnit),
            _ => None,
        }
    }
}

impl fmt::Display for IncentiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncentiveKind::FixedAmount => write!(f, "FIXED_AMOUNT"),
            IncentiveKind::PercentOfResult => write!(f, "PERCENT_OF_RESULT"),
            IncentiveKind::PercentOfSalary => write!(f, "PERCENT_OF_SALARY"),
            IncentiveKind::FixedPerResultUnit => write!(f, "FIXED_PER_RESULT_UNIT"),
        }
    }
}

// ==========================================
// 月份键 (Month Key)
// ==========================================
// 结果聚合/汇总的时间粒度: 自然月
// 展示与序列化格式: "YYYY-MM", 排序即时间序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    /// 创建月份键
    ///
    /// month 取值 1-12, 越界由 TryFrom 入口拒绝, 引擎内部不重复校验
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// 从日期截断到自然月
    pub fn from_date(date: chrono::NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for MonthKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let (year_part, month_part) = value
            .split_once('-')
            .ok_or_else(|| format!("无效的月份键: {}", value))?;

        let year: i32 = year_part
            .parse()
            .map_err(|_| format!("无效的年份: {}", value))?;
        let month: u32 = month_part
            .parse()
            .map_err(|_| format!("无效的月份: {}", value))?;

        if !(1..=12).contains(&month) {
            return Err(format!("月份越界: {}", value));
        }

        Ok(MonthKey { year, month })
    }
}
