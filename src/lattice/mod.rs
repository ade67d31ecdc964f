//! # 晶格模块
//!
//! 空间群到 Bravais 格子的解析、晶格参数裁剪与长度单位换算。
//!
//! ## 依赖关系
//! - 被 `models/crystal.rs`, `transform/`, `emit/`, `invariance/`, `parsers/import.rs` 使用
//! - 子模块: bravais, units

pub mod bravais;
pub mod units;

pub use bravais::{resolve_bravais, Bravais, Centring, CrystalSystem};
pub use units::normalize_to_bohr;

use crate::error::{QdeckError, Result};
use crate::models::crystal::LatticeParameters;

/// 只保留 Bravais 格子需要的参数，缺少必需参数时报错
pub fn prune_lattice_parameters(
    params: &LatticeParameters,
    bravais: Bravais,
) -> Result<LatticeParameters> {
    bravais
        .required_parameters()
        .iter()
        .map(|key| {
            params
                .get(key)
                .map(|quantity| (*key, quantity.clone()))
                .ok_or_else(|| QdeckError::MissingLatticeParameter {
                    bravais: bravais.to_string(),
                    key: key.to_string(),
                })
        })
        .collect()
}

/// 检查参数集合恰好等于 Bravais 格子所需的集合
pub fn check_lattice_parameters(params: &LatticeParameters, bravais: Bravais) -> Result<()> {
    let required = bravais.required_parameters();

    if let Some(key) = required.iter().find(|key| !params.contains_key(*key)) {
        return Err(QdeckError::MissingLatticeParameter {
            bravais: bravais.to_string(),
            key: key.to_string(),
        });
    }
    if let Some(key) = params.keys().find(|key| !required.contains(*key)) {
        return Err(QdeckError::SuperfluousLatticeParameter {
            bravais: bravais.to_string(),
            key: key.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::crystal::LatticeKey;
    use crate::models::value::Quantity;

    fn all_six() -> LatticeParameters {
        LatticeParameters::from([
            (LatticeKey::A, Quantity::angstrom(4.0)),
            (LatticeKey::B, Quantity::angstrom(5.0)),
            (LatticeKey::C, Quantity::angstrom(6.0)),
            (LatticeKey::Alpha, Quantity::degree(80.0)),
            (LatticeKey::Beta, Quantity::degree(90.0)),
            (LatticeKey::Gamma, Quantity::degree(100.0)),
        ])
    }

    #[test]
    fn test_prune_keeps_required_keys_only() {
        for bravais in Bravais::ALL {
            let pruned = prune_lattice_parameters(&all_six(), bravais).unwrap();
            let keys: Vec<LatticeKey> = pruned.keys().copied().collect();
            assert_eq!(keys, bravais.required_parameters(), "{}", bravais);
            assert!(check_lattice_parameters(&pruned, bravais).is_ok());
        }
    }

    #[test]
    fn test_prune_missing_key() {
        let params = LatticeParameters::from([(LatticeKey::A, Quantity::angstrom(4.0))]);
        let err = prune_lattice_parameters(&params, Bravais::Tetragonal).unwrap_err();
        assert!(matches!(err, QdeckError::MissingLatticeParameter { ref key, .. } if key == "c"));
    }

    #[test]
    fn test_check_superfluous_key() {
        let err = check_lattice_parameters(&all_six(), Bravais::Fcc).unwrap_err();
        assert!(matches!(err, QdeckError::SuperfluousLatticeParameter { ref key, .. } if key == "b"));
    }
}
