//! # 结构块输出
//!
//! 将晶体记录渲染为 `structure(...)` 命令：原子块 + 晶格块 + 可选的结构选项。
//!
//! ```text
//! structure(
//!  fractional= [['Si', 0.0, 0.0, 0.0],
//!               ['Si', 0.25, 0.25, 0.25]]
//!  lattice(
//!   a = 10.25932 bohr
//!   bravais = fcc
//!  )
//! )
//! ```
//!
//! ## 依赖关系
//! - 被 `emit/deck.rs` 使用
//! - 使用 `models/`, `lattice/`, `emit/options.rs`

use crate::emit::indent_lines;
use crate::emit::options::emit_options;
use crate::error::Result;
use crate::lattice::{check_lattice_parameters, Bravais};
use crate::models::crystal::{Crystal, LatticeParameters, LatticeVectors};
use crate::models::options::Options;
use crate::models::value::format_rounded;

/// 坐标与晶格参数的小数位数
pub const STRUCTURE_PRECISION: u32 = 5;

fn format_triple(v: &[f64; 3]) -> String {
    v.iter()
        .map(|x| format_rounded(*x, STRUCTURE_PRECISION))
        .collect::<Vec<_>>()
        .join(", ")
}

/// 原子块，续行对齐到第一个 `[` 之后
pub fn emit_atoms(crystal: &Crystal) -> String {
    let head = format!("{}= [", crystal.positions().key());
    let pad = " ".repeat(head.len());
    let n_atoms = crystal.n_atoms();

    let mut out = String::new();
    for (i, (species, p)) in crystal
        .species()
        .iter()
        .zip(crystal.positions().coords())
        .enumerate()
    {
        out.push_str(if i == 0 { &head } else { &pad });
        out.push_str(&format!("['{}', {}]", species, format_triple(p)));
        out.push_str(if i + 1 == n_atoms { "]\n" } else { ",\n" });
    }
    out
}

/// 以晶格参数描述的晶格块；参数集合必须恰好是该 Bravais 格子所需的集合
pub fn emit_lattice_parameters(params: &LatticeParameters, bravais: Bravais) -> Result<String> {
    check_lattice_parameters(params, bravais)?;

    let mut body = String::new();
    for (key, quantity) in params {
        body.push_str(&format!(
            "{} = {} {}\n",
            key,
            format_rounded(quantity.value, STRUCTURE_PRECISION),
            quantity.unit
        ));
    }
    body.push_str(&format!("bravais = {}\n", bravais));

    Ok(format!("lattice(\n{})\n", indent_lines(&body, 1)))
}

/// 以显式晶格向量描述的晶格块
pub fn emit_lattice_vectors(lattice_vectors: &LatticeVectors) -> String {
    let rows = lattice_vectors
        .vectors
        .iter()
        .map(|row| format!("[{}]", format_triple(row)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "lattice(\n vectors = [{}] {}\n)\n",
        rows, lattice_vectors.unit
    )
}

/// 晶格块：有显式晶格向量时输出向量，否则输出参数与 Bravais 名称
pub fn emit_lattice(crystal: &Crystal) -> Result<String> {
    match crystal.lattice_vectors() {
        Some(vectors) => Ok(emit_lattice_vectors(vectors)),
        None => emit_lattice_parameters(crystal.lattice_parameters(), crystal.resolved_bravais()?),
    }
}

/// 完整的 structure 命令
pub fn emit_structure(crystal: &Crystal, extra_options: Option<&Options>) -> Result<String> {
    let mut body = emit_atoms(crystal);
    body.push_str(&emit_lattice(crystal)?);
    if let Some(options) = extra_options {
        body.push_str(&emit_options(options, 0));
    }
    Ok(format!("structure(\n{})\n", indent_lines(&body, 1)))
}
