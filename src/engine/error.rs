// ==========================================
// 绩效激励核算系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 配置错误必须显式上报, 绝不静默折算为 0
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    // ===== 规则配置错误 =====
    #[error("无效的激励规则配置: {0}")]
    InvalidRuleConfiguration(String),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
