// ==========================================
// 绩效激励核算系统 - JSON 快照存储
// ==========================================
// 职责: 员工目录的单文件 JSON 整存整取
// 用途: 轻量部署/备份迁移; 与 SQLite 仓储同门面 (EmployeeStore)
// 约定: 文件不存在视为空目录, 不算错误
// ==========================================

use crate::domain::employee::EmployeeDirectory;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::EmployeeStore;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ==========================================
// StoreDocument - 快照文件结构
// ==========================================
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    employees: EmployeeDirectory,
}

// ==========================================
// JsonFileStore - JSON 快照存储
// ==========================================
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// 创建指向给定快照文件的存储
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// 快照文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EmployeeStore for JsonFileStore {
    fn load_all(&self) -> RepositoryResult<EmployeeDirectory> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            // 首次运行尚无数据文件
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(EmployeeDirectory::new());
            }
            Err(e) => return Err(RepositoryError::FileIo(e.to_string())),
        };

        let document: StoreDocument =
            serde_json::from_str(&raw).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        Ok(document.employees)
    }

    fn save_all(&self, directory: &EmployeeDirectory) -> RepositoryResult<()> {
        let document = StoreDocument {
            employees: directory.clone(),
        };
        let raw = serde_json::to_string_pretty(&document)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| RepositoryError::FileIo(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::employee::{Employee, Kpi, ResultEntry, Tier};
    use crate::domain::types::IncentiveKind;
    use chrono::NaiveDate;

    #[test]
    fn test_missing_file_is_empty_directory() {
        let store = JsonFileStore::new("/nonexistent/dir/incentives.json");
        let directory = store.load_all().unwrap();
        assert!(directory.is_empty());
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let store = JsonFileStore::new(file.path());

        let mut emp = Employee::new("E1", "张三");
        emp.monthly_salary = 2000.0;
        emp.ppf = 2100.0;
        let mut kpi = Kpi::tiered(
            IncentiveKind::FixedAmount,
            10.0,
            vec![Tier::new(10.0, 50.0, 0.0)],
        );
        kpi.history.push(ResultEntry::new(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            12.0,
        ));
        emp.kpis.insert("销量".to_string(), kpi);

        let mut directory = EmployeeDirectory::new();
        directory.insert(emp.employee_id.clone(), emp);

        store.save_all(&directory).unwrap();
        let reloaded = store.load_all().unwrap();
        assert_eq!(reloaded, directory);
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "not json").unwrap();
        let store = JsonFileStore::new(file.path());
        assert!(matches!(
            store.load_all(),
            Err(RepositoryError::Serialization(_))
        ));
    }
}
