//! # 解析器模块
//!
//! 读取结构文件并转换为晶体记录。
//!
//! ## 依赖关系
//! - 被 `commands/import.rs` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: cell, poscar, import

pub mod cell;
pub mod import;
pub mod poscar;

pub use import::{structure_to_crystal, ImportOptions};

use crate::error::{QdeckError, Result};
use crate::models::structure::Structure;
use std::path::Path;

/// 从文件路径推断格式并解析
pub fn parse_structure_file(path: &Path) -> Result<Structure> {
    if !path.exists() {
        return Err(QdeckError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "cell" => cell::parse_cell_file(path),
        "vasp" | "poscar" => poscar::parse_poscar_file(path),
        _ => {
            // 可能是 POSCAR/CONTCAR (无扩展名)
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with("POSCAR") || name.starts_with("CONTCAR") {
                    return poscar::parse_poscar_file(path);
                }
            }
            Err(QdeckError::UnsupportedFormat(format!(
                "Cannot determine format for: {}",
                path.display()
            )))
        }
    }
}
