//! # CASTEP .cell 格式解析器
//!
//! 解析 CASTEP 输入文件 .cell 格式，长度统一换算为 Å。
//!
//! ## .cell 格式说明
//! ```text
//! %BLOCK LATTICE_CART
//! ang
//! a1 a2 a3
//! b1 b2 b3
//! c1 c2 c3
//! %ENDBLOCK LATTICE_CART
//!
//! %BLOCK POSITIONS_FRAC
//! Element x y z
//! ...
//! %ENDBLOCK POSITIONS_FRAC
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 使用
//! - 使用 `models/structure.rs`, `lattice/units.rs`

use crate::error::{QdeckError, Result};
use crate::lattice::units::ANGSTROM_TO_BOHR;
use crate::models::structure::{Atom, Lattice, Structure};
use std::fs;
use std::path::Path;

/// 解析 .cell 文件
pub fn parse_cell_file(path: &Path) -> Result<Structure> {
    let content = fs::read_to_string(path).map_err(|e| QdeckError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_cell_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

/// 从字符串内容解析 .cell 格式
pub fn parse_cell_content(content: &str, name: &str) -> Result<Structure> {
    let lines: Vec<&str> = content.lines().collect();
    let parse_error = |reason: &str| QdeckError::ParseError {
        format: "cell".to_string(),
        path: name.to_string(),
        reason: reason.to_string(),
    };

    let lattice = if let Some(block) = find_block(&lines, "LATTICE_CART") {
        parse_lattice_cart(&block).ok_or_else(|| parse_error("Incomplete LATTICE_CART block"))?
    } else if let Some(block) = find_block(&lines, "LATTICE_ABC") {
        parse_lattice_abc(&block).ok_or_else(|| {
            parse_error("Incomplete LATTICE_ABC block (need a b c alpha beta gamma)")
        })?
    } else {
        return Err(parse_error("Missing LATTICE_CART or LATTICE_ABC block"));
    };

    let atoms = if let Some(block) = find_block(&lines, "POSITIONS_FRAC") {
        parse_positions(&block).0
    } else if let Some(block) = find_block(&lines, "POSITIONS_ABS") {
        let (atoms, scale) = parse_positions(&block);
        atoms
            .into_iter()
            .map(|atom| {
                let cart = atom.position.map(|x| x * scale);
                lattice
                    .to_fractional(cart)
                    .map(|frac| Atom::new(atom.element, frac))
                    .ok_or_else(|| parse_error("Singular lattice, cannot convert POSITIONS_ABS"))
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        return Err(parse_error("Missing POSITIONS_FRAC or POSITIONS_ABS block"));
    };

    let mut structure = Structure::new(name, lattice, atoms);
    structure.source_format = Some("cell".to_string());
    Ok(structure)
}

/// `%BLOCK NAME` 与 `%ENDBLOCK NAME` 之间的有效行（去掉空行和注释）
fn find_block<'a>(lines: &[&'a str], block_name: &str) -> Option<Vec<&'a str>> {
    let start = lines.iter().position(|line| {
        let upper = line.trim().to_uppercase();
        upper.starts_with("%BLOCK") && upper.split_whitespace().nth(1) == Some(block_name)
    })?;

    Some(
        lines
            .iter()
            .skip(start + 1)
            .map(|line| line.trim())
            .take_while(|line| !line.to_uppercase().starts_with("%ENDBLOCK"))
            .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
            .collect(),
    )
}

/// 块首的单位行；返回换算到 Å 的系数
fn unit_scale(line: &str) -> Option<f64> {
    match line.to_lowercase().as_str() {
        "ang" | "angstrom" => Some(1.0),
        "bohr" | "a0" => Some(1.0 / ANGSTROM_TO_BOHR),
        "nm" => Some(10.0),
        _ => None,
    }
}

/// 拆出块首的单位行
fn split_unit<'a, 'b>(block: &'b [&'a str]) -> (f64, &'b [&'a str]) {
    match block.first().and_then(|line| unit_scale(line)) {
        Some(scale) => (scale, &block[1..]),
        None => (1.0, block),
    }
}

fn parse_numbers(line: &str) -> Vec<f64> {
    line.split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect()
}

fn parse_lattice_cart(block: &[&str]) -> Option<Lattice> {
    let (scale, rows) = split_unit(block);
    let rows: Vec<Vec<f64>> = rows
        .iter()
        .map(|line| parse_numbers(line))
        .filter(|parts| parts.len() >= 3)
        .take(3)
        .collect();

    if rows.len() < 3 {
        return None;
    }

    let mut matrix = [[0.0; 3]; 3];
    for (row, parts) in matrix.iter_mut().zip(&rows) {
        *row = [parts[0] * scale, parts[1] * scale, parts[2] * scale];
    }
    Some(Lattice::from_vectors(matrix))
}

fn parse_lattice_abc(block: &[&str]) -> Option<Lattice> {
    let (scale, rows) = split_unit(block);
    let params: Vec<f64> = rows.iter().flat_map(|line| parse_numbers(line)).collect();

    if params.len() < 6 {
        return None;
    }

    Some(Lattice::from_parameters(
        params[0] * scale,
        params[1] * scale,
        params[2] * scale,
        params[3],
        params[4],
        params[5],
    ))
}

/// 解析原子位置块，同时返回块首单位的换算系数
fn parse_positions(block: &[&str]) -> (Vec<Atom>, f64) {
    let (scale, rows) = split_unit(block);

    let atoms = rows
        .iter()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                return None;
            }
            // 元素名可能带标签，如 "Fe:1"
            let element = parts[0].split(':').next().unwrap_or(parts[0]);
            match (
                parts[1].parse::<f64>(),
                parts[2].parse::<f64>(),
                parts[3].parse::<f64>(),
            ) {
                (Ok(x), Ok(y), Ok(z)) => Some(Atom::new(element, [x, y, z])),
                _ => None,
            }
        })
        .collect();

    (atoms, scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_lattice_cart() {
        let content = r#"
%BLOCK LATTICE_CART
ang
5.0 0.0 0.0
0.0 5.0 0.0
0.0 0.0 5.0
%ENDBLOCK LATTICE_CART

%BLOCK POSITIONS_FRAC
Na 0.0 0.0 0.0
Cl 0.5 0.5 0.5
%ENDBLOCK POSITIONS_FRAC
"#;
        let structure = parse_cell_content(content, "NaCl").unwrap();
        assert_eq!(structure.atoms.len(), 2);
        assert_eq!(structure.source_format.as_deref(), Some("cell"));

        let (a, b, c, _, _, _) = structure.lattice.parameters();
        assert!((a - 5.0).abs() < 1e-9);
        assert!((b - 5.0).abs() < 1e-9);
        assert!((c - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_cell_lattice_abc() {
        let content = r#"
%BLOCK LATTICE_ABC
ang
3.0 3.0 5.0
90.0 90.0 120.0
%ENDBLOCK LATTICE_ABC

%BLOCK POSITIONS_FRAC
Mg 0.333333 0.666667 0.25
%ENDBLOCK POSITIONS_FRAC
"#;
        let structure = parse_cell_content(content, "Mg").unwrap();
        let (a, _, c, alpha, _, gamma) = structure.lattice.parameters();

        assert!((a - 3.0).abs() < 1e-9);
        assert!((c - 5.0).abs() < 1e-9);
        assert!((alpha - 90.0).abs() < 1e-9);
        assert!((gamma - 120.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_cell_bohr_and_absolute_positions() {
        let content = r#"
%block lattice_cart
bohr
10.0 0.0 0.0
0.0 10.0 0.0
0.0 0.0 10.0
%endblock lattice_cart

%block positions_abs
bohr
Si:1 5.0 0.0 2.5
%endblock positions_abs
"#;
        let structure = parse_cell_content(content, "Si").unwrap();
        let (a, _, _, _, _, _) = structure.lattice.parameters();
        assert!((a - 5.29177210903).abs() < 1e-9);

        let atom = &structure.atoms[0];
        assert_eq!(atom.element, "Si");
        assert!((atom.position[0] - 0.5).abs() < 1e-12);
        assert!((atom.position[2] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_parse_cell_with_comments() {
        let content = r#"
# This is a comment
! Another comment
%BLOCK LATTICE_CART
ang
3.0 0.0 0.0
0.0 3.0 0.0
0.0 0.0 3.0
%ENDBLOCK LATTICE_CART

%BLOCK POSITIONS_FRAC
# Fe at origin
Fe 0.0 0.0 0.0
%ENDBLOCK POSITIONS_FRAC
"#;
        let structure = parse_cell_content(content, "Fe").unwrap();
        assert_eq!(structure.atoms.len(), 1);
        assert_eq!(structure.atoms[0].element, "Fe");
    }

    #[test]
    fn test_missing_lattice_block() {
        let content = "%BLOCK POSITIONS_FRAC\nFe 0 0 0\n%ENDBLOCK POSITIONS_FRAC\n";
        let err = parse_cell_content(content, "Fe").unwrap_err();
        assert!(err.to_string().contains("LATTICE_CART"));
    }
}
