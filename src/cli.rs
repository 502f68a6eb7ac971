//! 命令列參數與執行流程
//!
//! `main` 只負責初始化日誌與轉換結束碼，其餘流程都在此處，方便直接測試。

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{render, PlanError, PlanReconstructor, PlanningConfig, ProductionPlan, ProductionPlanner};

/// 無可行解時的結束碼
pub const EXIT_NO_SOLUTION: u8 = 2;

/// 命令列參數
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    pub config_path: String,
    pub print_tables: bool,
    pub parallel: bool,
    pub json: bool,
    pub verbose: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            config_path: "config.json".to_string(),
            print_tables: false,
            parallel: false,
            json: false,
            verbose: false,
        }
    }
}

impl CliArgs {
    /// 解析參數（不含程式名稱）
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = Self::default();

        let mut it = args.into_iter();
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "--config" => {
                    parsed.config_path = it.next().context("--config 需要檔案路徑")?;
                }
                "--tables" => parsed.print_tables = true,
                "--parallel" => parsed.parallel = true,
                "--json" => parsed.json = true,
                "--verbose" | "-v" => parsed.verbose = true,
                other => anyhow::bail!("未知參數: {}", other),
            }
        }

        Ok(parsed)
    }
}

/// 一次執行的結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// 已輸出最優計劃
    Planned,
    /// 配置無可行計劃
    NoSolution,
}

impl RunOutcome {
    /// 程序結束碼數值
    pub fn code(self) -> u8 {
        match self {
            RunOutcome::Planned => 0,
            RunOutcome::NoSolution => EXIT_NO_SOLUTION,
        }
    }

    pub fn exit_code(self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

/// 載入配置檔並執行
pub fn run<W: Write>(args: &CliArgs, out: &mut W) -> Result<RunOutcome> {
    let config = PlanningConfig::load(&args.config_path)
        .with_context(|| format!("載入配置檔 {} 失敗", args.config_path))?;

    execute(config, args, out)
}

/// 以已載入的配置執行：建表、可選輸出各階段、重建並輸出計劃
pub fn execute<W: Write>(config: PlanningConfig, args: &CliArgs, out: &mut W) -> Result<RunOutcome> {
    info!(?args, "啟動排產計算");

    let planner = ProductionPlanner::new(config).with_parallel(args.parallel);
    let table = planner.build_table()?;

    if args.print_tables {
        for stage in table.stages() {
            write!(out, "{}", render::render_stage(&stage))?;
        }
    }

    let plan = match PlanReconstructor::reconstruct(&table, planner.config()) {
        Ok(plan) => plan,
        Err(err @ PlanError::NoSolution { .. }) => {
            warn!("{}", err);
            writeln!(out, "無可行解: {}", err)?;
            return Ok(RunOutcome::NoSolution);
        }
        Err(err) => return Err(err.into()),
    };

    ensure_feasible(&plan, planner.config())?;

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&plan)?)?;
    } else {
        write!(out, "{}", render::render_plan(&plan))?;
    }

    Ok(RunOutcome::Planned)
}

/// 重放計劃，任何約束違反都視為錯誤
pub fn ensure_feasible(plan: &ProductionPlan, config: &PlanningConfig) -> Result<()> {
    let violations = plan.violations(config);
    if !violations.is_empty() {
        anyhow::bail!("重建的計劃違反約束: {:?}", violations);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn args(list: &[&str]) -> Result<CliArgs> {
        CliArgs::parse(list.iter().map(|s| s.to_string()))
    }

    fn example_config() -> PlanningConfig {
        PlanningConfig::new(5, 3, vec![3, 4, 2])
            .with_setup_cost(10)
            .with_store_cost_per_unit(1)
            .with_unit_cost(2)
    }

    #[test]
    fn test_parse_defaults() {
        assert_eq!(args(&[]).unwrap(), CliArgs::default());
    }

    #[test]
    fn test_parse_all_flags() {
        let parsed = args(&["--config", "plan.json", "--tables", "--parallel", "--json", "-v"]).unwrap();

        assert_eq!(parsed.config_path, "plan.json");
        assert!(parsed.print_tables);
        assert!(parsed.parallel);
        assert!(parsed.json);
        assert!(parsed.verbose);
    }

    #[rstest]
    #[case::unknown_flag(&["--fast"])]
    #[case::missing_config_path(&["--config"])]
    fn test_parse_rejects(#[case] list: &[&str]) {
        assert!(args(list).is_err());
    }

    #[test]
    fn test_execute_prints_plan() {
        let mut out = Vec::new();
        let outcome = execute(example_config(), &CliArgs::default(), &mut out).unwrap();

        assert_eq!(outcome, RunOutcome::Planned);
        assert_eq!(outcome.code(), 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "x_1: 4\nx_2: 5\nx_3: 0\ntotal cost: 41\n"
        );
    }

    #[test]
    fn test_execute_prints_tables_before_plan() {
        let cli = CliArgs {
            print_tables: true,
            ..CliArgs::default()
        };
        let mut out = Vec::new();
        execute(example_config(), &cli, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("||"));
        assert!(text.ends_with("total cost: 41\n"));
    }

    #[test]
    fn test_execute_json_output() {
        let cli = CliArgs {
            json: true,
            ..CliArgs::default()
        };
        let mut out = Vec::new();
        execute(example_config(), &cli, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["quantities"], serde_json::json!([4, 5, 0]));
        assert_eq!(value["total_cost"], 41);
    }

    #[test]
    fn test_execute_no_solution_exit_code() {
        let mut out = Vec::new();
        let outcome = execute(PlanningConfig::new(1, 0, vec![5]), &CliArgs::default(), &mut out).unwrap();

        assert_eq!(outcome, RunOutcome::NoSolution);
        assert_eq!(outcome.code(), EXIT_NO_SOLUTION);
        assert!(String::from_utf8(out).unwrap().starts_with("無可行解"));
    }

    #[test]
    fn test_execute_invalid_configuration_is_error() {
        let mut out = Vec::new();
        let result = execute(PlanningConfig::new(1, 0, vec![]), &CliArgs::default(), &mut out);

        assert!(result.is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_ensure_feasible_rejects_violating_plan() {
        let config = example_config();
        // 第一期產量超過產能
        let plan = ProductionPlan::new(vec![9, 0, 0], 0, 0);

        assert!(ensure_feasible(&plan, &config).is_err());
    }

    #[test]
    fn test_ensure_feasible_accepts_optimal_plan() {
        let plan = ProductionPlan::new(vec![4, 5, 0], 23, 18);
        assert!(ensure_feasible(&plan, &example_config()).is_ok());
    }

    #[test]
    fn test_run_missing_config_file() {
        let cli = CliArgs {
            config_path: "/nonexistent/lotdp/config.json".to_string(),
            ..CliArgs::default()
        };
        let mut out = Vec::new();

        let err = run(&cli, &mut out).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/lotdp/config.json"));
    }

    #[test]
    fn test_run_reads_config_file() {
        let dir = std::env::temp_dir().join(format!("lotdp_cli_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(
            &path,
            r#"{
                "production": { "capacity": 1, "constant_cost": 0, "unit_cost": 0 },
                "store": { "capacity": 0, "cost": 0 },
                "request": [5]
            }"#,
        )
        .unwrap();

        let cli = CliArgs {
            config_path: path.to_string_lossy().into_owned(),
            ..CliArgs::default()
        };
        let mut out = Vec::new();
        let outcome = run(&cli, &mut out);
        let _ = std::fs::remove_dir_all(&dir);

        assert_eq!(outcome.unwrap(), RunOutcome::NoSolution);
    }
}
