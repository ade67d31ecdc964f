//! # import 命令实现
//!
//! 读取 .cell / POSCAR 结构文件，输出晶体记录的 JSON，可直接放入测试集定义的 `crystal` 字段。
//!
//! ## 依赖关系
//! - 使用 `cli/import.rs` 定义的参数
//! - 使用 `parsers/`
//! - 使用 `utils/output.rs`

use crate::cli::import::ImportArgs;
use crate::error::{QdeckError, Result};
use crate::lattice::Bravais;
use crate::parsers::{self, structure_to_crystal, ImportOptions};
use crate::utils::output;

use std::fs;

/// 执行 import 命令
pub fn execute(args: ImportArgs) -> Result<()> {
    let structure = parsers::parse_structure_file(&args.structure)?;

    let options = ImportOptions {
        bravais: args
            .bravais
            .as_deref()
            .map(str::parse::<Bravais>)
            .transpose()?,
        space_group: args.space_group,
        conventional: args.conventional,
        cartesian: args.cartesian,
        keep_all_parameters: args.keep_all_parameters,
        lattice_vectors: args.lattice_vectors,
    };

    let crystal = structure_to_crystal(&structure, &options)?;
    let json = serde_json::to_string_pretty(&crystal)?;

    match &args.output {
        Some(path) => {
            fs::write(path, format!("{}\n", json)).map_err(|e| QdeckError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            })?;
            output::print_generated(
                &args.structure.display().to_string(),
                &path.display().to_string(),
            );
            output::print_info(&format!(
                "{}: {} atoms, bravais {}",
                structure.formula(),
                crystal.n_atoms(),
                crystal
                    .bravais()
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| "(lattice vectors)".to_string())
            ));
        }
        None => println!("{}", json),
    }

    Ok(())
}
