// ==========================================
// 绩效激励核算系统 - API 层
// ==========================================
// 职责: 面向调用方的业务接口, 组合仓储与引擎
// 红线: 校验在前, 计算在后; 错误必须带显式原因
// ==========================================

pub mod employee_api;
pub mod error;
pub mod report_api;

// 重导出核心 API
pub use employee_api::{EmployeeApi, EmployeeDraft, KpiDraft};
pub use error::{ApiError, ApiResult};
pub use report_api::{
    CrossReportResult, EmployeeReport, MonthBlock, MonthlyStatement, ReportApi, SkippedMetric,
    StatementKpiLine,
};
