// ==========================================
// 绩效激励核算系统 - 员工管理 API
// ==========================================
// 职责: 员工/KPI/结果录入的 CRUD 与上游校验
// 红线: 引擎假定输入非负且类型合法, 该假定由本层兑现;
//       规则配置不合法必须在保存时拒绝, 不留到核算期
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::employee::{Employee, Kpi, ResultEntry, Tier};
use crate::domain::types::IncentiveKind;
use crate::engine::rule::IncentiveRule;
use crate::repository::employee_repo::SqliteEmployeeRepository;
use chrono::NaiveDate;

// ==========================================
// EmployeeDraft - 员工主数据写入载荷
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeDraft {
    pub name: String,
    pub monthly_salary: f64,
    pub role: String,
    pub ppf: f64, // 0 = 未设置
}

// ==========================================
// KpiDraft - KPI 配置写入载荷
// ==========================================
// 不携带历史: 历史只通过结果录入接口演进
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiDraft {
    pub kind: IncentiveKind,
    pub min_result: f64,
    pub premium: f64,
    #[serde(default)]
    pub tiers: Vec<Tier>,
}

// ==========================================
// EmployeeApi - 员工管理 API
// ==========================================
pub struct EmployeeApi {
    repo: Arc<SqliteEmployeeRepository>,
}

impl EmployeeApi {
    /// 创建新的员工管理 API 实例
    pub fn new(repo: Arc<SqliteEmployeeRepository>) -> Self {
        Self { repo }
    }

    // ==========================================
    // 员工主数据
    // ==========================================

    /// 新建员工, 返回生成的 employee_id（UUID）
    pub fn create_employee(&self, draft: EmployeeDraft) -> ApiResult<String> {
        Self::validate_employee(&draft)?;

        let employee_id = Uuid::new_v4().to_string();
        let employee = Employee {
            employee_id: employee_id.clone(),
            name: draft.name,
            monthly_salary: draft.monthly_salary,
            role: draft.role,
            ppf: draft.ppf,
            kpis: Default::default(),
        };
        self.repo.upsert_employee(&employee)?;

        info!(%employee_id, "新建员工");
        Ok(employee_id)
    }

    /// 更新员工主数据（KPI 配置与历史不受影响）
    pub fn update_employee(&self, employee_id: &str, draft: EmployeeDraft) -> ApiResult<()> {
        Self::validate_employee(&draft)?;

        let mut employee = self.get_employee(employee_id)?;
        employee.name = draft.name;
        employee.monthly_salary = draft.monthly_salary;
        employee.role = draft.role;
        employee.ppf = draft.ppf;
        self.repo.upsert_employee(&employee)?;
        Ok(())
    }

    /// 删除员工及其全部 KPI 配置与历史
    pub fn delete_employee(&self, employee_id: &str) -> ApiResult<()> {
        self.repo.delete_employee(employee_id)?;
        info!(%employee_id, "删除员工");
        Ok(())
    }

    /// 员工清单（id, 姓名）
    pub fn list_employees(&self) -> ApiResult<Vec<(String, String)>> {
        Ok(self.repo.list_employees()?)
    }

    /// 查询单个员工的完整聚合
    pub fn get_employee(&self, employee_id: &str) -> ApiResult<Employee> {
        self.repo
            .find_employee(employee_id)?
            .ok_or_else(|| ApiError::NotFound(format!("Employee (id={})", employee_id)))
    }

    // ==========================================
    // KPI 配置
    // ==========================================

    /// 新建/更新 KPI 配置
    ///
    /// 保存前先做规则解析预检: 非法组合（如阶梯 + 按件计酬）当场拒绝
    pub fn upsert_kpi(&self, employee_id: &str, kpi_name: &str, draft: KpiDraft) -> ApiResult<()> {
        if kpi_name.trim().is_empty() {
            return Err(ApiError::InvalidInput("KPI 名称不可为空".to_string()));
        }
        if draft.min_result < 0.0 || draft.premium < 0.0 {
            return Err(ApiError::InvalidInput(
                "最低结果与激励值不可为负".to_string(),
            ));
        }
        if draft
            .tiers
            .iter()
            .any(|t| t.threshold < 0.0 || t.premium < 0.0 || t.percent < 0.0)
        {
            return Err(ApiError::InvalidInput("阶梯配置不可含负值".to_string()));
        }

        // 员工必须存在
        self.get_employee(employee_id)?;

        let kpi = Kpi {
            kind: draft.kind,
            min_result: draft.min_result,
            premium: draft.premium,
            tiers: draft.tiers,
            history: Vec::new(), // 仓储的 upsert 不触碰历史
        };
        IncentiveRule::resolve(&kpi)?;

        self.repo.upsert_kpi(employee_id, kpi_name, &kpi)?;
        debug!(%employee_id, kpi = %kpi_name, "KPI 配置已保存");
        Ok(())
    }

    /// 删除 KPI 及其历史
    pub fn delete_kpi(&self, employee_id: &str, kpi_name: &str) -> ApiResult<()> {
        Ok(self.repo.delete_kpi(employee_id, kpi_name)?)
    }

    // ==========================================
    // 结果录入
    // ==========================================

    /// 录入一条结果记录, 返回 entry_id
    ///
    /// 同 KPI 同日期已有记录时拒绝新增（应走修改入口）;
    /// 引擎侧对重复日期不去重, 守卫只在录入边界
    pub fn record_result(
        &self,
        employee_id: &str,
        kpi_name: &str,
        date: NaiveDate,
        achieved: f64,
    ) -> ApiResult<String> {
        if achieved < 0.0 {
            return Err(ApiError::InvalidInput("达成值不可为负".to_string()));
        }
        if !self.repo.kpi_exists(employee_id, kpi_name)? {
            return Err(ApiError::NotFound(format!(
                "Kpi (id={}/{})",
                employee_id, kpi_name
            )));
        }
        if self
            .repo
            .find_result_by_date(employee_id, kpi_name, date)?
            .is_some()
        {
            return Err(ApiError::InvalidInput(format!(
                "{} 已有该日期的记录, 请修改既有记录",
                date
            )));
        }

        let entry_id =
            self.repo
                .insert_result(employee_id, kpi_name, ResultEntry::new(date, achieved))?;
        debug!(%employee_id, kpi = %kpi_name, %date, achieved, "结果已录入");
        Ok(entry_id)
    }

    /// 修改一条结果记录
    pub fn update_result(&self, entry_id: &str, date: NaiveDate, achieved: f64) -> ApiResult<()> {
        if achieved < 0.0 {
            return Err(ApiError::InvalidInput("达成值不可为负".to_string()));
        }
        Ok(self
            .repo
            .update_result(entry_id, ResultEntry::new(date, achieved))?)
    }

    /// 删除一条结果记录
    pub fn delete_result(&self, entry_id: &str) -> ApiResult<()> {
        Ok(self.repo.delete_result(entry_id)?)
    }

    // ==========================================
    // 校验
    // ==========================================

    fn validate_employee(draft: &EmployeeDraft) -> ApiResult<()> {
        if draft.name.trim().is_empty() {
            return Err(ApiError::InvalidInput("员工姓名不可为空".to_string()));
        }
        if draft.monthly_salary < 0.0 {
            return Err(ApiError::InvalidInput("月薪不可为负".to_string()));
        }
        if draft.ppf < 0.0 {
            return Err(ApiError::InvalidInput("PPF 不可为负".to_string()));
        }
        Ok(())
    }
}
