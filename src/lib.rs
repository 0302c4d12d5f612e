// ==========================================
// 绩效激励核算系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 激励计算引擎 (计算纯函数化, 存储与展示为外部协作方)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 激励计算规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// API 层 - 业务接口
pub mod api;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{IncentiveKind, MonthKey};

// 领域实体
pub use domain::{Employee, EmployeeDirectory, Kpi, ResultEntry, Tier};

// 派生输出
pub use domain::{
    CompensationRow, CrossEmployeeReport, MonthlyEmployeeSummary, MonthlyMetricOutcome, ProfitRow,
};

// 引擎
pub use engine::{
    CrossEmployeeReporter, EmployeeComputation, EngineError, EngineResult, IncentiveOrchestrator,
    MetricCalcError, MonthlyRollupEngine, ResultAggregator, RuleEvaluator, RuleOutcome,
};

// 仓储
pub use repository::{
    EmployeeStore, JsonFileStore, RepositoryError, RepositoryResult, SqliteEmployeeRepository,
};

// 导入
pub use importer::{ImportReport, ResultsCsvImporter, RowFailure};

// API
pub use api::{ApiError, ApiResult, EmployeeApi, ReportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "绩效激励核算系统";

// 金额展示货币单位（单币种系统）
pub const CURRENCY: &str = "EUR";

// ==========================================
// 预编译检查
// ==========================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
