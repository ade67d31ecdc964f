//! # run 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/run.rs`

use clap::Args;
use std::path::PathBuf;

/// run 子命令参数
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Generated deck file
    pub deck: PathBuf,

    /// Solver executable
    #[arg(short, long, env = "QDECK_SOLVER")]
    pub solver: PathBuf,

    /// Extra argument passed to the solver before the deck (repeatable)
    #[arg(long = "solver-arg", allow_hyphen_values = true)]
    pub solver_args: Vec<String>,

    /// Write assertion results to a CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Variable used for the energy-per-atom comparison
    #[arg(long, default_value = "energy")]
    pub energy_variable: String,
}
