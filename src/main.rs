//! # qdeck - 周期性 xTB 求解器的不变性测试输入生成器
//!
//! 由晶体记录生成求解器输入文本，并组装检验物理不变性
//! （平移、旋转、对称性约化、尺寸广延性）的测试集。
//!
//! ## 子命令
//! - `generate` - 由测试集定义文件生成输入文件
//! - `run`      - 调用求解器并评估断言
//! - `import`   - 结构文件转换为晶体记录
//! - `bravais`  - 查询空间群对应的 Bravais 格子
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── invariance/ (测试集编排)
//!   │     ├── emit/       (输入文本生成)
//!   │     ├── transform/  (平移、旋转、超胞)
//!   │     ├── lattice/    (Bravais 格子与单位换算)
//!   │     ├── solver/     (求解器调用与断言评估)
//!   │     ├── parsers/    (结构文件解析)
//!   │     └── models/     (数据模型)
//!   ├── batch/      (批量并行处理)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod emit;
mod error;
mod invariance;
mod lattice;
mod models;
mod parsers;
mod solver;
mod transform;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
