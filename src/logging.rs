// ==========================================
// 绩效激励核算系统 - 日志系统初始化
// ==========================================
// 工具: tracing + tracing-subscriber (env-filter)
// 约定: 核算链路只打结构化字段, 金额明细走 trace 不进 info
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 默认日志级别
const DEFAULT_FILTER: &str = "info";

/// 初始化日志系统（环境变量优先）
///
/// RUST_LOG 可覆盖级别, 例如:
/// RUST_LOG=debug 或 RUST_LOG=incentive_engine::engine=trace
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// 以给定缺省过滤器初始化日志系统
///
/// RUST_LOG 存在时仍以环境变量为准
pub fn init_with_filter(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// 初始化测试环境的日志系统（可重复调用）
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
