// ==========================================
// 绩效激励核算系统 - 导入层
// ==========================================
// 职责: 外部数据进入存储的唯一入口, 逐行校验并出具报告
// 红线: 导入层只写存储, 不做激励计算
// ==========================================

pub mod results_csv;

// 重导出
pub use results_csv::{ImportReport, ResultsCsvImporter, RowFailure};
