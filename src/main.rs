// ==========================================
// 绩效激励核算系统 - 命令行主入口
// ==========================================
// 技术栈: Rust + SQLite
// 定位: 存储与引擎的最小调用方; 表格输出交给终端
// ==========================================

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use incentive_engine::api::{EmployeeApi, ReportApi};
use incentive_engine::config::AppConfig;
use incentive_engine::domain::types::MonthKey;
use incentive_engine::importer::ResultsCsvImporter;
use incentive_engine::repository::{EmployeeStore, JsonFileStore, SqliteEmployeeRepository};
use incentive_engine::logging;

fn main() -> Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", incentive_engine::APP_NAME);
    tracing::info!("系统版本: {}", incentive_engine::VERSION);
    tracing::info!("==================================================");

    let config = AppConfig::from_env();
    tracing::info!("使用数据库: {}", config.db_path);

    let repo = Arc::new(
        SqliteEmployeeRepository::new(&config.db_path).context("无法初始化员工仓储")?,
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None | Some("report") => cmd_report(repo, args.get(1).map(String::as_str)),
        Some("statement") => cmd_statement(repo, &args[1..]),
        Some("import") => cmd_import(repo, &args[1..]),
        Some("employees") => cmd_employees(repo),
        Some("backup") => cmd_snapshot(repo, &args[1..], SnapshotDirection::Backup),
        Some("restore") => cmd_snapshot(repo, &args[1..], SnapshotDirection::Restore),
        Some(other) => {
            bail!(
                "未知命令: {}\n用法: incentive-engine [report [姓名过滤] | statement <员工ID> <YYYY-MM> | import <结果CSV> | employees | backup <JSON> | restore <JSON>]",
                other
            );
        }
    }
}

// ==========================================
// report - 跨员工合并报表
// ==========================================
fn cmd_report(repo: Arc<SqliteEmployeeRepository>, name_filter: Option<&str>) -> Result<()> {
    let api = ReportApi::new(repo);
    let result = api.cross_report(name_filter)?;

    if result.report.compensation.is_empty() {
        println!("没有可报告的核算月份。");
    } else {
        println!("== 薪酬报表 ==");
        println!(
            "{:<12} {:<8} {:>10} {:>10} {:>10} {:>10} {:>8}",
            "员工", "月份", "薪资", "激励", "总薪酬", "PPF", "达成%"
        );
        for row in &result.report.compensation {
            println!(
                "{:<12} {:<8} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>8.2}",
                row.employee_name,
                row.month.to_string(),
                row.salary,
                row.total_incentive,
                row.total_compensation,
                row.ppf,
                row.target_ratio_pct
            );
        }

        println!();
        println!("== 产出报表 ==");
        println!(
            "{:<12} {:<8} {:>10} {:>10} {:>10}",
            "员工", "月份", "产出", "激励", "产出/激励%"
        );
        for row in &result.report.profit {
            println!(
                "{:<12} {:<8} {:>10.2} {:>10.2} {:>10.2}",
                row.employee_name,
                row.month.to_string(),
                row.profit,
                row.incentive,
                row.profit_ratio_pct
            );
        }
    }

    for skipped in &result.skipped {
        tracing::warn!(
            employee = %skipped.employee_name,
            kpi = %skipped.kpi_name,
            "KPI 被跳过: {}",
            skipped.reason
        );
    }
    Ok(())
}

// ==========================================
// statement - 员工月度对账单
// ==========================================
fn cmd_statement(repo: Arc<SqliteEmployeeRepository>, args: &[String]) -> Result<()> {
    let (employee_id, month_raw) = match args {
        [id, month] => (id, month),
        _ => bail!("用法: incentive-engine statement <员工ID> <YYYY-MM>"),
    };
    let month = MonthKey::try_from(month_raw.clone())
        .map_err(|e| anyhow::anyhow!("月份格式错误: {}", e))?;

    let api = ReportApi::new(repo);
    let statement = api.monthly_statement(employee_id, month)?;

    println!("== 月度对账单: {} ({}) ==", statement.employee_name, statement.month);
    println!("月基本薪资:   {:.2}", statement.salary);
    println!("激励合计:     {:.2}", statement.total_incentive);
    println!("总薪酬:       {:.2}", statement.total_compensation);
    if statement.ppf > 0.0 {
        println!("PPF:          {:.2}", statement.ppf);
        println!("PPF 达成率:   {:.2}%", statement.target_ratio_pct);
    }
    for line in &statement.kpi_lines {
        println!();
        println!(
            "KPI: {}  达成 {}  激励 {:.2}",
            line.kpi_name, line.aggregated_value, line.amount
        );
        for step in &line.trace {
            println!("  {}", step);
        }
    }
    Ok(())
}

// ==========================================
// import - 结果批量导入
// ==========================================
fn cmd_import(repo: Arc<SqliteEmployeeRepository>, args: &[String]) -> Result<()> {
    let path = match args {
        [path] => path,
        _ => bail!("用法: incentive-engine import <结果CSV>"),
    };

    let importer = ResultsCsvImporter::new(&repo);
    let report = importer.import_file(path)?;

    println!(
        "导入完成: 共 {} 行, 成功 {}, 失败 {}",
        report.total_rows, report.success_rows, report.failed_rows
    );
    for failure in &report.failures {
        println!("  行 {}: {}", failure.row_number, failure.reason);
    }
    Ok(())
}

// ==========================================
// backup / restore - JSON 快照
// ==========================================
enum SnapshotDirection {
    Backup,  // SQLite → JSON
    Restore, // JSON → SQLite（整体覆盖）
}

fn cmd_snapshot(
    repo: Arc<SqliteEmployeeRepository>,
    args: &[String],
    direction: SnapshotDirection,
) -> Result<()> {
    let path = match args {
        [path] => path,
        _ => bail!("用法: incentive-engine backup|restore <JSON路径>"),
    };
    let store = JsonFileStore::new(path);

    match direction {
        SnapshotDirection::Backup => {
            let directory = repo.load_all()?;
            store.save_all(&directory)?;
            println!("已备份 {} 名员工到 {}", directory.len(), path);
        }
        SnapshotDirection::Restore => {
            let directory = store.load_all()?;
            repo.save_all(&directory)?;
            println!("已从 {} 恢复 {} 名员工", path, directory.len());
        }
    }
    Ok(())
}

// ==========================================
// employees - 员工清单
// ==========================================
fn cmd_employees(repo: Arc<SqliteEmployeeRepository>) -> Result<()> {
    let api = EmployeeApi::new(repo);
    let employees = api.list_employees()?;
    if employees.is_empty() {
        println!("尚无员工。");
    }
    for (id, name) in employees {
        println!("{:<38} {}", id, name);
    }
    Ok(())
}
