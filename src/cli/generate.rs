//! # generate 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/generate.rs`

use clap::Args;
use std::path::PathBuf;

/// generate 子命令参数
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Suite definition file, or a directory of them
    pub input: PathBuf,

    /// Output directory for generated decks
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Glob pattern for suite files (comma separated)
    #[arg(short, long, default_value = "*.json")]
    pub pattern: String,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// Extension of generated deck files
    #[arg(long, default_value = "in")]
    pub extension: String,
}
