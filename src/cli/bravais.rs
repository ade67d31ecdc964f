//! # bravais 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/bravais.rs`

use clap::Args;

/// bravais 子命令参数
#[derive(Args, Debug)]
pub struct BravaisArgs {
    /// Space group numbers (1-230)
    #[arg(required = true)]
    pub space_groups: Vec<u32>,
}
