// ==========================================
// 绩效激励核算系统 - 应用配置
// ==========================================
// 职责: 解析数据文件路径（环境变量优先, 其次用户数据目录）
// 约束: 引擎层不读取任何配置, 配置只作用于存储与入口
// ==========================================

use std::path::PathBuf;

/// 数据库路径环境变量（便于调试/测试/CI）
pub const DB_PATH_ENV: &str = "INCENTIVE_ENGINE_DB_PATH";

/// 应用配置
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite 数据库文件路径
    pub db_path: String,
}

impl AppConfig {
    /// 从环境解析配置
    pub fn from_env() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// 获取默认数据库路径
///
/// 优先级:
/// 1. 环境变量 INCENTIVE_ENGINE_DB_PATH（非空时生效）
/// 2. 用户数据目录下的 incentive-engine/incentives.db
/// 3. 当前目录回退值 ./incentives.db
pub fn default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    // 先给一个默认回退值，后续如果能拿到 data_dir 再覆盖
    let mut path = PathBuf::from("./incentives.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("incentive-engine");
        // 目录创建失败时保留回退值，不在这里报错
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("incentives.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_db_path_not_empty() {
        let path = default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_env_override() {
        std::env::set_var(DB_PATH_ENV, "/tmp/custom-incentives.db");
        let path = default_db_path();
        std::env::remove_var(DB_PATH_ENV);
        assert_eq!(path, "/tmp/custom-incentives.db");
    }
}
