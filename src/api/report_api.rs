// ==========================================
// 绩效激励核算系统 - 报表 API
// ==========================================
// 职责: 面向展示协作方的报表装配（表格/时间序列/对账单数据）
// 红线: 所有数值来自引擎输出, 本层只装配与排序;
//       被跳过的 KPI 配置错误必须随报表一并回报, 不得吞掉
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::summary::{CrossEmployeeReport, MonthlyEmployeeSummary, MonthlyMetricOutcome};
use crate::domain::types::MonthKey;
use crate::engine::orchestrator::IncentiveOrchestrator;
use crate::engine::reporter::CrossEmployeeReporter;
use crate::repository::employee_repo::SqliteEmployeeRepository;
use crate::repository::EmployeeStore;

// ==========================================
// MonthBlock - 单月核算明细（月份倒序展示用）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthBlock {
    pub month: MonthKey,
    pub total_incentive: f64,
    pub outcomes: Vec<MonthlyMetricOutcome>,
}

// ==========================================
// EmployeeReport - 单员工报表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeReport {
    pub employee_id: String,
    pub employee_name: String,
    pub months: Vec<MonthBlock>, // 月份倒序（最近的在前）
    pub summaries: Vec<MonthlyEmployeeSummary>, // 月份升序
    pub skipped: Vec<SkippedMetric>,
}

// ==========================================
// SkippedMetric - 被隔离的 KPI 配置错误
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedMetric {
    pub employee_id: String,
    pub employee_name: String,
    pub kpi_name: String,
    pub reason: String,
}

// ==========================================
// CrossReportResult - 跨员工报表 + 被跳过项
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossReportResult {
    pub report: CrossEmployeeReport,
    pub skipped: Vec<SkippedMetric>,
}

// ==========================================
// MonthlyStatement - 员工月度对账单数据
// ==========================================
// 可打印对账单所需的全部数据: 基本信息 + 月度合计 + 逐 KPI 明细与算式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStatement {
    pub employee_id: String,
    pub employee_name: String,
    pub month: MonthKey,
    pub salary: f64,
    pub ppf: f64,
    pub total_incentive: f64,
    pub total_compensation: f64,
    pub target_ratio_pct: f64,
    pub kpi_lines: Vec<StatementKpiLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementKpiLine {
    pub kpi_name: String,
    pub aggregated_value: f64,
    pub amount: f64,
    pub qualified: bool,
    pub trace: Vec<String>,
}

// ==========================================
// ReportApi - 报表 API
// ==========================================
pub struct ReportApi {
    repo: Arc<SqliteEmployeeRepository>,
    orchestrator: IncentiveOrchestrator,
    reporter: CrossEmployeeReporter,
}

impl ReportApi {
    /// 创建新的报表 API 实例
    pub fn new(repo: Arc<SqliteEmployeeRepository>) -> Self {
        Self {
            repo,
            orchestrator: IncentiveOrchestrator::new(),
            reporter: CrossEmployeeReporter::new(),
        }
    }

    // ==========================================
    // 单员工报表
    // ==========================================

    /// 员工逐月核算报表（月份倒序, 每月带逐 KPI 明细与算式）
    #[instrument(skip(self))]
    pub fn employee_report(&self, employee_id: &str) -> ApiResult<EmployeeReport> {
        let employee = self
            .repo
            .find_employee(employee_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Employee (id={})", employee_id)))?;

        let computation = self.orchestrator.compute_employee(&employee);

        // 按月归并, 倒序展示
        let mut months: Vec<MonthKey> = computation.outcomes.iter().map(|o| o.month).collect();
        months.sort();
        months.dedup();
        months.reverse();

        let blocks = months
            .into_iter()
            .map(|month| {
                let outcomes: Vec<MonthlyMetricOutcome> = computation
                    .outcomes
                    .iter()
                    .filter(|o| o.month == month)
                    .cloned()
                    .collect();
                MonthBlock {
                    month,
                    total_incentive: outcomes.iter().map(|o| o.amount).sum(),
                    outcomes,
                }
            })
            .collect();

        let skipped = Self::skipped_of(&employee.name, &computation);
        Ok(EmployeeReport {
            employee_id: employee.employee_id.clone(),
            employee_name: employee.name.clone(),
            months: blocks,
            summaries: computation.summaries,
            skipped,
        })
    }

    // ==========================================
    // 跨员工报表
    // ==========================================

    /// 跨员工合并报表
    ///
    /// name_filter: 姓名子串过滤（不区分大小写）, None = 全员;
    /// 零可计月份的员工不产生行
    #[instrument(skip(self))]
    pub fn cross_report(&self, name_filter: Option<&str>) -> ApiResult<CrossReportResult> {
        let directory = self.repo.load_all()?;

        let filter = name_filter.map(|f| f.trim().to_lowercase());
        let mut summaries: Vec<MonthlyEmployeeSummary> = Vec::new();
        let mut skipped = Vec::new();

        for employee in directory.values() {
            if let Some(ref filter) = filter {
                if !employee.name.to_lowercase().contains(filter.as_str()) {
                    continue;
                }
            }
            let computation = self.orchestrator.compute_employee(employee);
            summaries.extend(computation.summaries.iter().cloned());
            skipped.extend(Self::skipped_of(&employee.name, &computation));
        }

        Ok(CrossReportResult {
            report: self.reporter.merge(&summaries),
            skipped,
        })
    }

    // ==========================================
    // 月度对账单
    // ==========================================

    /// 员工月度对账单数据（打印/推送协作方消费）
    #[instrument(skip(self))]
    pub fn monthly_statement(
        &self,
        employee_id: &str,
        month: MonthKey,
    ) -> ApiResult<MonthlyStatement> {
        let report = self.employee_report(employee_id)?;

        let summary = report
            .summaries
            .iter()
            .find(|s| s.month == month)
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "该员工在 {} 没有核算数据 (id={})",
                    month, employee_id
                ))
            })?;

        let kpi_lines = report
            .months
            .iter()
            .find(|b| b.month == month)
            .map(|block| {
                block
                    .outcomes
                    .iter()
                    .map(|o| StatementKpiLine {
                        kpi_name: o.kpi_name.clone(),
                        aggregated_value: o.aggregated_value,
                        amount: o.amount,
                        qualified: o.qualified,
                        trace: o.trace.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(MonthlyStatement {
            employee_id: report.employee_id,
            employee_name: report.employee_name,
            month,
            salary: summary.salary,
            ppf: summary.ppf,
            total_incentive: summary.total_incentive,
            total_compensation: summary.total_compensation,
            target_ratio_pct: summary.target_ratio_pct,
            kpi_lines,
        })
    }

    fn skipped_of(
        employee_name: &str,
        computation: &crate::engine::orchestrator::EmployeeComputation,
    ) -> Vec<SkippedMetric> {
        computation
            .errors
            .iter()
            .map(|e| SkippedMetric {
                employee_id: computation.employee_id.clone(),
                employee_name: employee_name.to_string(),
                kpi_name: e.kpi_name.clone(),
                reason: e.error.to_string(),
            })
            .collect()
    }
}
