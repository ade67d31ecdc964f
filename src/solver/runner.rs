//! # 求解器调用
//!
//! 以 `<solver> --format json -s <input>` 运行外部求解器，输入中的换行替换为空格，
//! 从标准输出解析 JSON 结果。
//!
//! 调用失败不会向上传播：每个命名结果得到一个空的结果表，并记录一条警告。
//! 空结果表示"没有数据"，与数值为 0 的合法结果不同。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 使用
//! - 使用 `solver/deck.rs`

use crate::error::{QdeckError, Result};
use crate::solver::deck::extract_named_results;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// 求解器输出：命名结果 -> 变量名 -> 数值
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverResults {
    results: BTreeMap<String, BTreeMap<String, f64>>,
}

impl SolverResults {
    /// 每个命名结果都没有数据
    pub fn empty_for<S: AsRef<str>>(named_results: &[S]) -> Self {
        SolverResults {
            results: named_results
                .iter()
                .map(|nr| (nr.as_ref().to_string(), BTreeMap::new()))
                .collect(),
        }
    }

    /// 解析求解器的 JSON 输出，只保留数值（布尔值按 0/1 处理）
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let object = value.as_object().ok_or_else(|| {
            QdeckError::UnsupportedFormat("solver output is not a JSON object".to_string())
        })?;

        let mut results = BTreeMap::new();
        for (named_result, fields) in object {
            let mut variables = BTreeMap::new();
            if let Some(fields) = fields.as_object() {
                for (name, field) in fields {
                    let number = match field {
                        serde_json::Value::Number(n) => n.as_f64(),
                        serde_json::Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
                        _ => None,
                    };
                    if let Some(number) = number {
                        variables.insert(name.clone(), number);
                    }
                }
            }
            results.insert(named_result.clone(), variables);
        }
        Ok(SolverResults { results })
    }

    pub fn get(&self, named_result: &str, variable: &str) -> Option<f64> {
        self.results.get(named_result)?.get(variable).copied()
    }

    /// 该命名结果是否有任何数据
    pub fn has_data(&self, named_result: &str) -> bool {
        self.results
            .get(named_result)
            .map_or(false, |vars| !vars.is_empty())
    }
}

/// 外部求解器
#[derive(Debug, Clone)]
pub struct SolverRunner {
    executable: PathBuf,
    extra_args: Vec<String>,
}

impl SolverRunner {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        SolverRunner {
            executable: executable.into(),
            extra_args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    /// 传给求解器的参数
    pub fn arguments(&self, input: &str) -> Vec<String> {
        let mut args = self.extra_args.clone();
        args.extend([
            "--format".to_string(),
            "json".to_string(),
            "-s".to_string(),
            input.replace('\n', " "),
        ]);
        args
    }

    /// 运行求解器；失败时返回空结果
    pub fn run(&self, input: &str) -> SolverResults {
        match self.try_run(input) {
            Ok(results) => results,
            Err(e) => {
                log::warn!("Solver run failed, treating results as missing: {}", e);
                SolverResults::empty_for(&extract_named_results(input))
            }
        }
    }

    fn try_run(&self, input: &str) -> Result<SolverResults> {
        let command = self.executable.display().to_string();
        log::debug!("Running {} on {} bytes of input", command, input.len());

        // stderr 不能混入 stdout，否则 JSON 无法解析
        let output = Command::new(&self.executable)
            .args(self.arguments(input))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|_| QdeckError::CommandNotFound {
                command: command.clone(),
            })?;

        if !output.status.success() {
            return Err(QdeckError::CommandFailed {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        SolverResults::from_json(&String::from_utf8_lossy(&output.stdout))
    }
}
