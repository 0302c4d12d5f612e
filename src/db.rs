// ==========================================
// 绩效激励核算系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免"部分模块外键开启/部分不开启"
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 提供建表入口，仓储与测试共用同一份 schema
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema（幂等）
///
/// 表结构:
/// - employee:   员工主数据（薪资/PPF 为引擎只读输入）
/// - kpi:        员工 KPI 激励规则配置
/// - kpi_tier:   KPI 阶梯配置（threshold 升序为约定顺序，引擎仍防御性排序）
/// - kpi_result: KPI 结果录入历史（日粒度，同日多条按累加处理）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS employee (
            employee_id    TEXT PRIMARY KEY,
            name           TEXT NOT NULL,
            monthly_salary REAL NOT NULL DEFAULT 0,
            role           TEXT NOT NULL DEFAULT '',
            ppf            REAL NOT NULL DEFAULT 0,
            created_at     TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at     TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS kpi (
            employee_id    TEXT NOT NULL,
            kpi_name       TEXT NOT NULL,
            incentive_kind TEXT NOT NULL,
            min_result     REAL NOT NULL DEFAULT 0,
            premium        REAL NOT NULL DEFAULT 0,
            PRIMARY KEY (employee_id, kpi_name),
            FOREIGN KEY (employee_id) REFERENCES employee(employee_id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS kpi_tier (
            employee_id TEXT NOT NULL,
            kpi_name    TEXT NOT NULL,
            tier_no     INTEGER NOT NULL,
            threshold   REAL NOT NULL DEFAULT 0,
            premium     REAL NOT NULL DEFAULT 0,
            percent     REAL NOT NULL DEFAULT 0,
            PRIMARY KEY (employee_id, kpi_name, tier_no),
            FOREIGN KEY (employee_id, kpi_name)
                REFERENCES kpi(employee_id, kpi_name) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS kpi_result (
            entry_id    TEXT PRIMARY KEY,
            employee_id TEXT NOT NULL,
            kpi_name    TEXT NOT NULL,
            result_date TEXT NOT NULL,
            achieved    REAL NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (employee_id, kpi_name)
                REFERENCES kpi(employee_id, kpi_name) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_kpi_result_lookup
            ON kpi_result(employee_id, kpi_name, result_date);
        "#,
    )?;
    Ok(())
}

/// 打开连接并确保 schema 就绪（仓储默认入口）
pub fn open_and_init(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = open_sqlite_connection(db_path)?;
    init_schema(&conn)?;
    Ok(conn)
}
