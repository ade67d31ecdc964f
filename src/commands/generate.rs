//! # generate 命令实现
//!
//! 读取测试集定义文件，渲染输入文本并写入输出目录。
//!
//! ## 功能
//! - 单文件或目录输入，glob 过滤
//! - 并行生成，单个测试集失败只计数并报告
//! - 已存在的输出默认跳过
//! - 递归收集时输出保留输入目录下的子目录结构，同名测试集不会互相覆盖
//!
//! ## 依赖关系
//! - 使用 `cli/generate.rs` 定义的参数
//! - 使用 `invariance/suite.rs`, `batch/`
//! - 使用 `utils/output.rs`

use crate::batch::{BatchRunner, FileCollector, ProcessResult};
use crate::cli::generate::GenerateArgs;
use crate::error::{QdeckError, Result};
use crate::invariance::suite::Suite;
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};

/// 执行 generate 命令
pub fn execute(args: GenerateArgs) -> Result<()> {
    output::print_header("Generating input decks");

    let files = FileCollector::new(&args.input)
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect()?;

    if files.is_empty() {
        return Err(QdeckError::NoFilesFound {
            pattern: format!("{}/{}", args.input.display(), args.pattern),
        });
    }

    fs::create_dir_all(&args.output).map_err(|e| QdeckError::FileWriteError {
        path: args.output.display().to_string(),
        source: e,
    })?;

    output::print_info(&format!("Found {} suite files", files.len()));

    let result = BatchRunner::new(args.jobs).run(&files, |file| {
        let target = output_path(file, &args.input, &args.output, &args.extension);
        if target.exists() && !args.overwrite {
            return ProcessResult::Skipped(target.display().to_string());
        }
        match generate_one(file, &target) {
            Ok(()) => ProcessResult::Success(target.display().to_string()),
            Err(e) => ProcessResult::Failed(file.display().to_string(), e.to_string()),
        }
    })?;

    if result.skipped > 0 {
        output::print_skip(&format!(
            "{} decks already exist (use --overwrite to replace)",
            result.skipped
        ));
    }
    for (path, err) in &result.failures {
        output::print_warning(&format!("{}: {}", path, err));
    }

    output::print_done(&format!(
        "{} generated, {} skipped, {} failed ({} total) -> {}",
        result.success,
        result.skipped,
        result.failed,
        result.total(),
        args.output.display()
    ));

    Ok(())
}

/// 输出路径：测试集相对输入目录的子目录 + 去掉扩展名的文件名 + 新扩展名
fn output_path(input: &Path, input_root: &Path, output_dir: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("suite");
    let subdir = input
        .strip_prefix(input_root)
        .ok()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));
    output_dir
        .join(subdir)
        .join(format!("{}.{}", stem, extension.trim_start_matches('.')))
}

fn generate_one(input: &Path, target: &Path) -> Result<()> {
    let suite = Suite::load(input)?;
    let deck = suite.render()?;
    log::debug!(
        "Rendered suite '{}' ({}) from {}",
        suite.name,
        suite.test.as_str(),
        input.display()
    );

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| QdeckError::FileWriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }
    fs::write(target, deck).map_err(|e| QdeckError::FileWriteError {
        path: target.display().to_string(),
        source: e,
    })
}
