// ==========================================
// 绩效激励核算系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含数据访问逻辑, 不含引擎逻辑
// ==========================================

pub mod employee;
pub mod summary;
pub mod types;

// 重导出核心类型
pub use employee::{Employee, EmployeeDirectory, Kpi, ResultEntry, Tier};
pub use summary::{
    CompensationRow, CrossEmployeeReport, MonthlyEmployeeSummary, MonthlyMetricOutcome, ProfitRow,
};
pub use types::{IncentiveKind, MonthKey};
