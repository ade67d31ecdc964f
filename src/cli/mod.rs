//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `generate`: 由测试集定义文件生成输入文件
//! - `run`: 调用求解器并评估断言
//! - `import`: 结构文件 (.cell / POSCAR) 转换为晶体记录
//! - `bravais`: 查询空间群对应的 Bravais 格子
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: generate, run, import, bravais

pub mod bravais;
pub mod generate;
pub mod import;
pub mod run;

use clap::{Parser, Subcommand};

/// qdeck - 周期性 xTB 求解器的不变性测试输入生成器
#[derive(Parser)]
#[command(name = "qdeck")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Invariance-test input deck generator for periodic xTB solvers", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Generate solver input decks from suite definition files
    Generate(generate::GenerateArgs),

    /// Run the solver on a deck and evaluate its assertions
    Run(run::RunArgs),

    /// Import a .cell or POSCAR structure as a crystal record
    Import(import::ImportArgs),

    /// Show the bravais lattice for space group numbers
    Bravais(bravais::BravaisArgs),
}
