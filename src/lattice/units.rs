//! # 长度单位换算
//!
//! 晶格参数、晶格向量与笛卡尔坐标在输出前统一换算为 bohr，数值保留 6 位小数。
//! 换算后单位标记变为 `bohr`，因此重复调用不会二次换算。
//!
//! ## 依赖关系
//! - 被 `invariance/`, `emit/deck.rs` 使用
//! - 使用 `models/`

use crate::error::Result;
use crate::models::crystal::{Crystal, LatticeParameters, LatticeVectors, Positions};
use crate::models::value::{round_to, Quantity, Unit};

/// 1 Å 对应的 bohr 数 (CODATA 2018: a0 = 0.529177210903 Å)
pub const ANGSTROM_TO_BOHR: f64 = 1.0 / 0.529_177_210_903;

/// 单位换算结果的小数位数
pub const CONVERSION_PRECISION: u32 = 6;

/// 将以 Å 表示的长度参数换算为 bohr，角度与已为 bohr 的参数原样保留
pub fn angstrom_to_bohr(params: &LatticeParameters) -> LatticeParameters {
    params
        .iter()
        .map(|(key, quantity)| (*key, quantity_to_bohr(quantity)))
        .collect()
}

fn length_to_bohr(angstrom: f64) -> f64 {
    round_to(angstrom * ANGSTROM_TO_BOHR, CONVERSION_PRECISION)
}

fn quantity_to_bohr(quantity: &Quantity) -> Quantity {
    match quantity.unit {
        Unit::Angstrom => Quantity::bohr(length_to_bohr(quantity.value)),
        _ => quantity.clone(),
    }
}

/// 晶格向量换算为 bohr
pub fn vectors_to_bohr(lattice_vectors: &LatticeVectors) -> LatticeVectors {
    if lattice_vectors.unit != Unit::Angstrom {
        return lattice_vectors.clone();
    }
    let vectors = lattice_vectors
        .vectors
        .map(|row| row.map(length_to_bohr));
    LatticeVectors {
        vectors,
        unit: Unit::Bohr,
    }
}

/// 返回长度量全部以 bohr 表示的晶体副本
pub fn normalize_to_bohr(crystal: &Crystal) -> Result<Crystal> {
    let params = angstrom_to_bohr(crystal.lattice_parameters());
    let mut normalized = crystal.clone().with_lattice_parameters(params)?;
    if let Some(vectors) = crystal.lattice_vectors() {
        normalized = normalized.with_lattice_vectors(vectors_to_bohr(vectors));
    }
    if let Positions::Cartesian(_) = crystal.positions() {
        if *crystal.xyz_unit() == Unit::Angstrom {
            let positions = crystal.positions().map(|p| p.map(length_to_bohr));
            normalized = normalized
                .with_positions(positions)?
                .with_xyz_unit(Unit::Bohr)?;
        }
    }
    Ok(normalized)
}
