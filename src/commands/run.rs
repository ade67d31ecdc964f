//! # run 命令实现
//!
//! 读取已生成的输入文件，调用求解器，逐条评估断言并输出表格。
//! 原子数不同的计算块（超胞）额外报告每原子能量。
//!
//! ## 依赖关系
//! - 使用 `cli/run.rs` 定义的参数
//! - 使用 `solver/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::run::RunArgs;
use crate::error::{QdeckError, Result};
use crate::models::value::format_float;
use crate::solver::{
    atom_counts, energy_per_atom, evaluate, parse_assertions, AssertionCheck, CheckSummary,
    Outcome, SolverRunner,
};
use crate::utils::{output, progress};

use std::fs;
use std::path::Path;
use tabled::{Table, Tabled};

/// 断言结果行
#[derive(Debug, Clone, Tabled)]
struct CheckRow {
    #[tabled(rename = "Named result")]
    named_result: String,
    #[tabled(rename = "Variable")]
    variable: String,
    #[tabled(rename = "Expected")]
    expected: String,
    #[tabled(rename = "Margin")]
    margin: String,
    #[tabled(rename = "Actual")]
    actual: String,
    #[tabled(rename = "Result")]
    outcome: String,
}

impl From<&AssertionCheck> for CheckRow {
    fn from(check: &AssertionCheck) -> Self {
        let assertion = &check.bound.assertion;
        CheckRow {
            named_result: check.bound.named_result.clone(),
            variable: assertion.variable.clone(),
            expected: assertion.value.to_string(),
            margin: assertion.margin.map(|m| m.to_string()).unwrap_or_default(),
            actual: check.actual.map(format_float).unwrap_or_else(|| "-".to_string()),
            outcome: output::outcome_label(match check.outcome {
                Outcome::Pass => Some(true),
                Outcome::Fail => Some(false),
                Outcome::NoData => None,
            }),
        }
    }
}

/// 每原子能量行
#[derive(Debug, Clone, Tabled)]
struct EnergyRow {
    #[tabled(rename = "Named result")]
    named_result: String,
    #[tabled(rename = "Atoms")]
    n_atoms: usize,
    #[tabled(rename = "Energy")]
    energy: String,
    #[tabled(rename = "Energy / atom")]
    per_atom: String,
}

/// 执行 run 命令
pub fn execute(args: RunArgs) -> Result<()> {
    output::print_header("Running solver");

    let deck = fs::read_to_string(&args.deck).map_err(|e| QdeckError::FileReadError {
        path: args.deck.display().to_string(),
        source: e,
    })?;

    let assertions = parse_assertions(&deck)?;
    let counts = atom_counts(&deck)?;
    if counts.is_empty() {
        return Err(QdeckError::ParseError {
            format: "deck".to_string(),
            path: args.deck.display().to_string(),
            reason: "no ':= xtb(' blocks found".to_string(),
        });
    }

    output::print_info(&format!(
        "{} blocks, {} assertions in {}",
        counts.len(),
        assertions.len(),
        args.deck.display()
    ));

    let runner = SolverRunner::new(&args.solver).with_args(args.solver_args.clone());
    let spinner = progress::create_spinner(&format!("Waiting for {}", args.solver.display()));
    let results = runner.run(&deck);
    spinner.finish_and_clear();

    for (named_result, _) in &counts {
        if !results.has_data(named_result) {
            output::print_warning(&format!("No results for '{}'", named_result));
        }
    }

    let checks = evaluate(&assertions, &results);
    if !checks.is_empty() {
        let rows: Vec<CheckRow> = checks.iter().map(CheckRow::from).collect();
        println!("{}", Table::new(&rows));
    }

    let per_atom = energy_per_atom(&counts, &results, &args.energy_variable);
    if !per_atom.is_empty() {
        let rows: Vec<EnergyRow> = per_atom
            .iter()
            .map(|e| EnergyRow {
                named_result: e.named_result.clone(),
                n_atoms: e.n_atoms,
                energy: e.energy.map(format_float).unwrap_or_else(|| "-".to_string()),
                per_atom: e
                    .per_atom()
                    .map(|x| format!("{:.10}", x))
                    .unwrap_or_else(|| "-".to_string()),
            })
            .collect();
        println!("\n{}", Table::new(&rows));
    }

    if let Some(path) = &args.csv {
        save_checks_csv(&checks, path)?;
        output::print_success(&format!("Assertion results saved to '{}'", path.display()));
    }

    let summary = CheckSummary::from_checks(&checks);
    let message = format!(
        "{} passed, {} failed, {} without data",
        summary.passed, summary.failed, summary.no_data
    );
    if summary.all_passed() {
        output::print_done(&message);
    } else {
        output::print_warning(&message);
    }

    Ok(())
}

/// 保存断言结果到 CSV
fn save_checks_csv(checks: &[AssertionCheck], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record(["named_result", "variable", "expected", "margin", "actual", "outcome"])?;

    for check in checks {
        let assertion = &check.bound.assertion;
        wtr.write_record([
            check.bound.named_result.clone(),
            assertion.variable.clone(),
            assertion.value.to_string(),
            assertion.margin.map(|m| m.to_string()).unwrap_or_default(),
            check.actual.map(format_float).unwrap_or_default(),
            check.outcome.as_str().to_string(),
        ])?;
    }

    wtr.flush().map_err(|e| QdeckError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assertion::Assertion;
    use crate::solver::deck::BoundAssertion;
    use crate::solver::runner::SolverResults;

    #[test]
    fn test_save_checks_csv() {
        let results = SolverResults::from_json(r#"{"cu": {"energy": -1.5}}"#).unwrap();
        let assertions = vec![
            BoundAssertion {
                named_result: "cu".to_string(),
                assertion: Assertion::within("energy", -1.5, 1e-6),
            },
            BoundAssertion {
                named_result: "cu_2".to_string(),
                assertion: Assertion::exact("n_iter", 12i64),
            },
        ];
        let checks = evaluate(&assertions, &results);

        let path = std::env::temp_dir().join(format!("qdeck-run-{}.csv", std::process::id()));
        save_checks_csv(&checks, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "named_result,variable,expected,margin,actual,outcome");
        assert_eq!(lines[1], "cu,energy,-1.5,1e-06,-1.5,pass");
        assert_eq!(lines[2], "cu_2,n_iter,12,,,no data");
        fs::remove_file(&path).unwrap();
    }
}
