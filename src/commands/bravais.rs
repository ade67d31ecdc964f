//! # bravais 命令实现
//!
//! 列出空间群编号对应的晶系、格子类型、Bravais 格子及所需晶格参数。
//!
//! ## 依赖关系
//! - 使用 `cli/bravais.rs` 定义的参数
//! - 使用 `lattice/bravais.rs`

use crate::cli::bravais::BravaisArgs;
use crate::error::Result;
use crate::lattice::{resolve_bravais, Centring, CrystalSystem};

use tabled::{Table, Tabled};

#[derive(Debug, Clone, Tabled)]
struct BravaisRow {
    #[tabled(rename = "Space group")]
    number: u32,
    #[tabled(rename = "Crystal system")]
    system: String,
    #[tabled(rename = "Centring")]
    centring: char,
    #[tabled(rename = "Bravais")]
    bravais: String,
    #[tabled(rename = "Parameters")]
    parameters: String,
}

fn describe(number: u32) -> Result<BravaisRow> {
    let bravais = resolve_bravais(number)?;
    Ok(BravaisRow {
        number,
        system: CrystalSystem::from_space_group(number)?.to_string(),
        centring: Centring::from_space_group(number)?.letter(),
        bravais: bravais.to_string(),
        parameters: bravais
            .required_parameters()
            .iter()
            .map(|key| key.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// 执行 bravais 命令
pub fn execute(args: BravaisArgs) -> Result<()> {
    let rows = args
        .space_groups
        .iter()
        .map(|&number| describe(number))
        .collect::<Result<Vec<_>>>()?;

    println!("{}", Table::new(&rows));
    Ok(())
}
