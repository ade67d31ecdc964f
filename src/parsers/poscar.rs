//! # VASP POSCAR 格式解析器
//!
//! 解析 VASP POSCAR/CONTCAR 文件格式。
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)
//! n1 n2 ...              # number of atoms per element
//! Selective dynamics     # optional
//! Direct/Cartesian       # coordinate type
//! x1 y1 z1               # atom positions
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{QdeckError, Result};
use crate::models::structure::{Atom, Lattice, Structure};
use std::fs;
use std::path::Path;

/// 解析 POSCAR/CONTCAR 文件
pub fn parse_poscar_file(path: &Path) -> Result<Structure> {
    let content = fs::read_to_string(path).map_err(|e| QdeckError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_poscar_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

/// 从字符串内容解析 POSCAR 格式
pub fn parse_poscar_content(content: &str, default_name: &str) -> Result<Structure> {
    let lines: Vec<&str> = content.lines().collect();
    let parse_error = |reason: String| QdeckError::ParseError {
        format: "poscar".to_string(),
        path: default_name.to_string(),
        reason,
    };

    if lines.len() < 8 {
        return Err(parse_error("File too short".to_string()));
    }

    // Line 0: Comment/name
    let name = match lines[0].trim() {
        "" => default_name.to_string(),
        comment => comment.to_string(),
    };

    // Line 1: Scaling factor; 负值表示目标体积
    let scale: f64 = lines[1]
        .split_whitespace()
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| parse_error("Invalid scaling factor at line 2".to_string()))?;

    // Lines 2-4: Lattice vectors
    let mut matrix = [[0.0; 3]; 3];
    for (i, row) in matrix.iter_mut().enumerate() {
        let parts: Vec<f64> = lines[2 + i]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        if parts.len() < 3 {
            return Err(parse_error(format!(
                "Invalid lattice vector at line {}",
                3 + i
            )));
        }
        *row = [parts[0], parts[1], parts[2]];
    }
    let raw = Lattice::from_vectors(matrix);
    let factor = if scale < 0.0 {
        (-scale / raw.volume().abs()).cbrt()
    } else {
        scale
    };
    let lattice = Lattice::from_vectors(matrix.map(|row| row.map(|x| x * factor)));

    // Line 5: Element symbols (VASP 5+) or atom counts (VASP 4)
    let line5_parts: Vec<&str> = lines[5].split_whitespace().collect();
    let is_vasp4 = line5_parts
        .first()
        .map_or(false, |s| s.parse::<usize>().is_ok());
    let (elements, counts, atom_line_start) = if is_vasp4 {
        let counts: Vec<usize> = line5_parts.iter().filter_map(|s| s.parse().ok()).collect();
        let elements: Vec<String> = (0..counts.len()).map(|i| format!("X{}", i + 1)).collect();
        (elements, counts, 6)
    } else {
        let elements: Vec<String> = line5_parts.iter().map(|s| s.to_string()).collect();
        let counts: Vec<usize> = lines[6]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        (elements, counts, 7)
    };

    if elements.len() != counts.len() {
        return Err(parse_error(format!(
            "{} element symbols for {} atom counts",
            elements.len(),
            counts.len()
        )));
    }

    // Check for "Selective dynamics" line
    let mut coord_line = atom_line_start;
    if lines
        .get(coord_line)
        .map_or(false, |l| l.trim().to_lowercase().starts_with('s'))
    {
        coord_line += 1;
    }

    let coord_type = lines
        .get(coord_line)
        .map(|l| l.trim().to_lowercase())
        .ok_or_else(|| parse_error("Missing coordinate type line".to_string()))?;
    let is_cartesian = coord_type.starts_with('c') || coord_type.starts_with('k');

    // Parse atom positions
    let species = elements
        .iter()
        .zip(&counts)
        .flat_map(|(elem, &count)| std::iter::repeat(elem).take(count));
    let mut atoms: Vec<Atom> = Vec::new();

    for (offset, elem) in species.enumerate() {
        let line_no = coord_line + 1 + offset;
        let parts: Vec<f64> = lines
            .get(line_no)
            .map(|l| {
                l.split_whitespace()
                    .take(3)
                    .filter_map(|s| s.parse().ok())
                    .collect()
            })
            .unwrap_or_default();

        if parts.len() < 3 {
            return Err(parse_error(format!(
                "Invalid atom position at line {}",
                line_no + 1
            )));
        }

        let position = if is_cartesian {
            let cart = [parts[0] * factor, parts[1] * factor, parts[2] * factor];
            lattice.to_fractional(cart).ok_or_else(|| {
                parse_error("Singular lattice, cannot convert Cartesian positions".to_string())
            })?
        } else {
            [parts[0], parts[1], parts[2]]
        };
        atoms.push(Atom::new(elem.clone(), position));
    }

    let mut structure = Structure::new(name, lattice, atoms);
    structure.source_format = Some("poscar".to_string());

    Ok(structure)
}
