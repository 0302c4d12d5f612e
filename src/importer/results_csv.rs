// ==========================================
// 绩效激励核算系统 - 结果批量导入 (CSV)
// ==========================================
// 职责: 从 CSV 文件批量导入 KPI 结果记录
// 文件格式: 表头 employee_id,kpi_name,date,achieved; 日期 YYYY-MM-DD
// 红线: 逐行校验, 单行失败不中断批次, 失败行带原因回报
// ==========================================

use crate::repository::employee_repo::SqliteEmployeeRepository;
use crate::repository::error::RepositoryResult;
use crate::domain::employee::ResultEntry;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, instrument, warn};

// ==========================================
// RawResultRow - CSV 行（未校验）
// ==========================================
#[derive(Debug, Deserialize)]
struct RawResultRow {
    employee_id: String,
    kpi_name: String,
    date: String,
    achieved: String,
}

// ==========================================
// RowFailure - 失败行记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowFailure {
    pub row_number: usize, // 数据行号（表头后从 1 起）
    pub reason: String,
}

// ==========================================
// ImportReport - 批次导入报告
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReport {
    pub total_rows: usize,
    pub success_rows: usize,
    pub failed_rows: usize,
    pub failures: Vec<RowFailure>,
}

// ==========================================
// ResultsCsvImporter - 结果批量导入器
// ==========================================
pub struct ResultsCsvImporter<'a> {
    repo: &'a SqliteEmployeeRepository,
}

impl<'a> ResultsCsvImporter<'a> {
    /// 创建新的导入器
    pub fn new(repo: &'a SqliteEmployeeRepository) -> Self {
        Self { repo }
    }

    /// 导入一个 CSV 文件
    ///
    /// 只有文件级错误（打不开/读不了）整体失败;
    /// 行级错误（未知 KPI、坏日期、负值）收进报告, 批次继续
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn import_file(&self, path: impl AsRef<Path>) -> RepositoryResult<ImportReport> {
        let mut reader = csv::Reader::from_path(path.as_ref())
            .map_err(|e| crate::repository::RepositoryError::FileIo(e.to_string()))?;

        let mut report = ImportReport {
            total_rows: 0,
            success_rows: 0,
            failed_rows: 0,
            failures: Vec::new(),
        };
        // KPI 存在性校验缓存, 避免逐行查库
        let mut kpi_cache: HashMap<(String, String), bool> = HashMap::new();

        for (index, record) in reader.deserialize::<RawResultRow>().enumerate() {
            let row_number = index + 1;
            report.total_rows += 1;

            let row = match record {
                Ok(row) => row,
                Err(e) => {
                    report.fail(row_number, format!("行解析失败: {}", e));
                    continue;
                }
            };

            match self.validate_row(&row, &mut kpi_cache) {
                Ok(entry) => {
                    match self
                        .repo
                        .insert_result(&row.employee_id, &row.kpi_name, entry)
                    {
                        Ok(_) => report.success_rows += 1,
                        Err(e) => report.fail(row_number, format!("写入失败: {}", e)),
                    }
                }
                Err(reason) => report.fail(row_number, reason),
            }
        }

        info!(
            total = report.total_rows,
            success = report.success_rows,
            failed = report.failed_rows,
            "结果批量导入完成"
        );
        Ok(report)
    }

    /// 行级校验: KPI 存在、日期可解析、达成值非负
    fn validate_row(
        &self,
        row: &RawResultRow,
        kpi_cache: &mut HashMap<(String, String), bool>,
    ) -> Result<ResultEntry, String> {
        let cache_key = (row.employee_id.clone(), row.kpi_name.clone());
        let exists = match kpi_cache.get(&cache_key) {
            Some(exists) => *exists,
            None => {
                let exists = self
                    .repo
                    .kpi_exists(&row.employee_id, &row.kpi_name)
                    .map_err(|e| format!("校验失败: {}", e))?;
                kpi_cache.insert(cache_key, exists);
                exists
            }
        };
        if !exists {
            return Err(format!(
                "未知的 KPI: employee_id={}, kpi={}",
                row.employee_id, row.kpi_name
            ));
        }

        let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d")
            .map_err(|_| format!("无效的日期: {}", row.date))?;

        let achieved: f64 = row
            .achieved
            .trim()
            .parse()
            .map_err(|_| format!("无效的达成值: {}", row.achieved))?;
        if achieved < 0.0 {
            return Err(format!("达成值不可为负: {}", achieved));
        }

        Ok(ResultEntry::new(date, achieved))
    }
}

impl ImportReport {
    fn fail(&mut self, row_number: usize, reason: String) {
        warn!(row = row_number, %reason, "导入行被拒绝");
        self.failed_rows += 1;
        self.failures.push(RowFailure { row_number, reason });
    }
}
