//! # import 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/import.rs`

use clap::Args;
use std::path::PathBuf;

/// import 子命令参数
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Structure file (.cell, POSCAR, CONTCAR, *.vasp)
    pub structure: PathBuf,

    /// Bravais lattice name, e.g. fcc or body_centred_tetragonal
    #[arg(short, long, conflicts_with = "space_group")]
    pub bravais: Option<String>,

    /// Space group number used to resolve the bravais lattice
    #[arg(short, long)]
    pub space_group: Option<u32>,

    /// The file holds a conventional cell (requires --bravais)
    #[arg(long, default_value_t = false)]
    pub conventional: bool,

    /// Write Cartesian positions in angstrom instead of fractional ones
    #[arg(long, default_value_t = false)]
    pub cartesian: bool,

    /// Keep all six lattice parameters
    #[arg(long, default_value_t = false)]
    pub keep_all_parameters: bool,

    /// Also store the lattice vectors
    #[arg(long, default_value_t = false)]
    pub lattice_vectors: bool,

    /// Output JSON file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
