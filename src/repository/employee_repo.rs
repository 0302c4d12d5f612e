// ==========================================
// 绩效激励核算系统 - 员工数据仓储 (SQLite)
// ==========================================
// 职责: employee/kpi/kpi_tier/kpi_result 四表的 CRUD 与聚合装配
// 红线: Repository 不含业务逻辑; 所有查询参数化
// ==========================================

use crate::domain::employee::{Employee, EmployeeDirectory, Kpi, ResultEntry, Tier};
use crate::domain::types::IncentiveKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::EmployeeStore;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ==========================================
// SqliteEmployeeRepository - 员工仓储
// ==========================================
pub struct SqliteEmployeeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteEmployeeRepository {
    /// 创建新的员工仓储实例（打开连接并确保 schema 就绪）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_and_init(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    ///
    /// 会对传入连接再次应用统一 PRAGMA 与建表（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
            crate::db::init_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 员工 CRUD
    // ==========================================

    /// 写入/更新员工主数据（不触碰 KPI 配置与历史）
    pub fn upsert_employee(&self, employee: &Employee) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO employee (employee_id, name, monthly_salary, role, ppf)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(employee_id) DO UPDATE SET
                name = excluded.name,
                monthly_salary = excluded.monthly_salary,
                role = excluded.role,
                ppf = excluded.ppf,
                updated_at = datetime('now')
            "#,
            params![
                employee.employee_id,
                employee.name,
                employee.monthly_salary,
                employee.role,
                employee.ppf
            ],
        )?;
        Ok(())
    }

    /// 按 ID 查询员工（装配完整聚合: KPI + 阶梯 + 历史）
    pub fn find_employee(&self, employee_id: &str) -> RepositoryResult<Option<Employee>> {
        let conn = self.get_conn()?;

        let employee = conn
            .query_row(
                "SELECT employee_id, name, monthly_salary, role, ppf FROM employee WHERE employee_id = ?1",
                params![employee_id],
                |row| {
                    Ok(Employee {
                        employee_id: row.get(0)?,
                        name: row.get(1)?,
                        monthly_salary: row.get(2)?,
                        role: row.get(3)?,
                        ppf: row.get(4)?,
                        kpis: BTreeMap::new(),
                    })
                },
            )
            .optional()?;

        let mut employee = match employee {
            Some(e) => e,
            None => return Ok(None),
        };
        employee.kpis = Self::load_kpis(&conn, employee_id)?;
        Ok(Some(employee))
    }

    /// 员工清单（employee_id, name）, 按姓名排序
    pub fn list_employees(&self) -> RepositoryResult<Vec<(String, String)>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT employee_id, name FROM employee ORDER BY name, employee_id")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// 删除员工（KPI/阶梯/历史随外键级联删除）
    pub fn delete_employee(&self, employee_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM employee WHERE employee_id = ?1",
            params![employee_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Employee".to_string(),
                id: employee_id.to_string(),
            });
        }
        Ok(())
    }

    // ==========================================
    // KPI 配置 CRUD
    // ==========================================

    /// 写入/更新 KPI 配置（阶梯整体替换, 历史不触碰）
    pub fn upsert_kpi(&self, employee_id: &str, kpi_name: &str, kpi: &Kpi) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT INTO kpi (employee_id, kpi_name, incentive_kind, min_result, premium)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(employee_id, kpi_name) DO UPDATE SET
                incentive_kind = excluded.incentive_kind,
                min_result = excluded.min_result,
                premium = excluded.premium
            "#,
            params![
                employee_id,
                kpi_name,
                kpi.kind.to_string(),
                kpi.min_result,
                kpi.premium
            ],
        )?;

        tx.execute(
            "DELETE FROM kpi_tier WHERE employee_id = ?1 AND kpi_name = ?2",
            params![employee_id, kpi_name],
        )?;
        for (tier_no, tier) in kpi.tiers.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO kpi_tier (employee_id, kpi_name, tier_no, threshold, premium, percent)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    employee_id,
                    kpi_name,
                    tier_no as i64,
                    tier.threshold,
                    tier.premium,
                    tier.percent
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// 删除 KPI（阶梯/历史级联删除）
    pub fn delete_kpi(&self, employee_id: &str, kpi_name: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM kpi WHERE employee_id = ?1 AND kpi_name = ?2",
            params![employee_id, kpi_name],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Kpi".to_string(),
                id: format!("{}/{}", employee_id, kpi_name),
            });
        }
        Ok(())
    }

    // ==========================================
    // 结果录入 CRUD
    // ==========================================

    /// 追加一条结果记录, 返回 entry_id
    pub fn insert_result(
        &self,
        employee_id: &str,
        kpi_name: &str,
        entry: ResultEntry,
    ) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let entry_id = Uuid::new_v4().to_string();
        conn.execute(
            r#"
            INSERT INTO kpi_result (entry_id, employee_id, kpi_name, result_date, achieved)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![entry_id, employee_id, kpi_name, entry.date, entry.achieved],
        )?;
        Ok(entry_id)
    }

    /// 修改一条结果记录（日期与达成值）
    pub fn update_result(&self, entry_id: &str, entry: ResultEntry) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE kpi_result SET result_date = ?1, achieved = ?2 WHERE entry_id = ?3",
            params![entry.date, entry.achieved, entry_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ResultEntry".to_string(),
                id: entry_id.to_string(),
            });
        }
        Ok(())
    }

    /// 删除一条结果记录
    pub fn delete_result(&self, entry_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM kpi_result WHERE entry_id = ?1",
            params![entry_id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ResultEntry".to_string(),
                id: entry_id.to_string(),
            });
        }
        Ok(())
    }

    /// KPI 配置是否存在（导入层逐行校验用）
    pub fn kpi_exists(&self, employee_id: &str, kpi_name: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM kpi WHERE employee_id = ?1 AND kpi_name = ?2",
                params![employee_id, kpi_name],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// 查询某 KPI 在指定日期已有的记录（录入界面的重复日期守卫）
    pub fn find_result_by_date(
        &self,
        employee_id: &str,
        kpi_name: &str,
        date: NaiveDate,
    ) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let entry_id = conn
            .query_row(
                r#"
                SELECT entry_id FROM kpi_result
                WHERE employee_id = ?1 AND kpi_name = ?2 AND result_date = ?3
                LIMIT 1
                "#,
                params![employee_id, kpi_name, date],
                |row| row.get(0),
            )
            .optional()?;
        Ok(entry_id)
    }

    // ==========================================
    // 聚合装配
    // ==========================================

    /// 装配一名员工的全部 KPI（含阶梯与历史）
    fn load_kpis(conn: &Connection, employee_id: &str) -> RepositoryResult<BTreeMap<String, Kpi>> {
        let mut kpis = BTreeMap::new();

        let mut stmt = conn.prepare(
            r#"
            SELECT kpi_name, incentive_kind, min_result, premium
            FROM kpi WHERE employee_id = ?1
            "#,
        )?;
        let rows = stmt
            .query_map(params![employee_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, f64>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        for (kpi_name, kind_str, min_result, premium) in rows {
            // 未识别的激励类型显式报错, 不静默默认
            let kind = IncentiveKind::parse(&kind_str).ok_or_else(|| {
                RepositoryError::FieldValueError {
                    field: "incentive_kind".to_string(),
                    message: format!("未识别的激励类型: {} (kpi={})", kind_str, kpi_name),
                }
            })?;

            let kpi = Kpi {
                kind,
                min_result,
                premium,
                tiers: Self::load_tiers(conn, employee_id, &kpi_name)?,
                history: Self::load_history(conn, employee_id, &kpi_name)?,
            };
            kpis.insert(kpi_name, kpi);
        }

        Ok(kpis)
    }

    fn load_tiers(
        conn: &Connection,
        employee_id: &str,
        kpi_name: &str,
    ) -> RepositoryResult<Vec<Tier>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT threshold, premium, percent FROM kpi_tier
            WHERE employee_id = ?1 AND kpi_name = ?2
            ORDER BY tier_no
            "#,
        )?;
        let tiers = stmt
            .query_map(params![employee_id, kpi_name], |row| {
                Ok(Tier {
                    threshold: row.get(0)?,
                    premium: row.get(1)?,
                    percent: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tiers)
    }

    fn load_history(
        conn: &Connection,
        employee_id: &str,
        kpi_name: &str,
    ) -> RepositoryResult<Vec<ResultEntry>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT result_date, achieved FROM kpi_result
            WHERE employee_id = ?1 AND kpi_name = ?2
            ORDER BY result_date, entry_id
            "#,
        )?;
        let history = stmt
            .query_map(params![employee_id, kpi_name], |row| {
                Ok(ResultEntry {
                    date: row.get(0)?,
                    achieved: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(history)
    }
}

// ==========================================
// EmployeeStore 实现
// ==========================================

impl EmployeeStore for SqliteEmployeeRepository {
    /// 整体装载员工目录（引擎输入快照）
    fn load_all(&self) -> RepositoryResult<EmployeeDirectory> {
        let ids: Vec<String> = {
            let conn = self.get_conn()?;
            let mut stmt = conn.prepare("SELECT employee_id FROM employee ORDER BY employee_id")?;
            let ids = stmt
                .query_map([], |row| row.get(0))?
                .collect::<Result<Vec<_>, _>>()?;
            ids
        };

        let mut directory = EmployeeDirectory::new();
        for id in ids {
            if let Some(employee) = self.find_employee(&id)? {
                directory.insert(id, employee);
            }
        }
        Ok(directory)
    }

    /// 整体覆盖员工目录（事务内清空重建）
    fn save_all(&self, directory: &EmployeeDirectory) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM employee", [])?;

        for employee in directory.values() {
            tx.execute(
                r#"
                INSERT INTO employee (employee_id, name, monthly_salary, role, ppf)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
                params![
                    employee.employee_id,
                    employee.name,
                    employee.monthly_salary,
                    employee.role,
                    employee.ppf
                ],
            )?;

            for (kpi_name, kpi) in &employee.kpis {
                tx.execute(
                    r#"
                    INSERT INTO kpi (employee_id, kpi_name, incentive_kind, min_result, premium)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                    params![
                        employee.employee_id,
                        kpi_name,
                        kpi.kind.to_string(),
                        kpi.min_result,
                        kpi.premium
                    ],
                )?;
                for (tier_no, tier) in kpi.tiers.iter().enumerate() {
                    tx.execute(
                        r#"
                        INSERT INTO kpi_tier
                            (employee_id, kpi_name, tier_no, threshold, premium, percent)
                        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                        "#,
                        params![
                            employee.employee_id,
                            kpi_name,
                            tier_no as i64,
                            tier.threshold,
                            tier.premium,
                            tier.percent
                        ],
                    )?;
                }
                for entry in &kpi.history {
                    tx.execute(
                        r#"
                        INSERT INTO kpi_result
                            (entry_id, employee_id, kpi_name, result_date, achieved)
                        VALUES (?1, ?2, ?3, ?4, ?5)
                        "#,
                        params![
                            Uuid::new_v4().to_string(),
                            employee.employee_id,
                            kpi_name,
                            entry.date,
                            entry.achieved
                        ],
                    )?;
                }
            }
        }

        tx.commit()?;
        Ok(())
    }
}
