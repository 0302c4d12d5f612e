// ==========================================
// 绩效激励核算系统 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口, 屏蔽存储细节
// 红线: Repository 不含业务逻辑; 所有查询使用参数化, 防止 SQL 注入
// ==========================================

pub mod employee_repo;
pub mod error;
pub mod json_store;

// 重导出核心仓储
pub use employee_repo::SqliteEmployeeRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use json_store::JsonFileStore;

use crate::domain::employee::EmployeeDirectory;

// ==========================================
// EmployeeStore - 员工目录存储门面
// ==========================================
// 整存整取: 引擎消费 load_all 的不可变快照,
// 任何写回由存储协作方负责, 引擎绝不回写
pub trait EmployeeStore {
    /// 整体装载员工目录
    fn load_all(&self) -> RepositoryResult<EmployeeDirectory>;

    /// 整体覆盖员工目录
    fn save_all(&self, directory: &EmployeeDirectory) -> RepositoryResult<()>;
}
