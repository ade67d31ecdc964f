//! # 结构导入
//!
//! 将解析得到的 `Structure`（晶格矩阵 + 分数坐标，单位 Å）转换为 `Crystal` 记录。
//!
//! - 晶格参数由晶格矩阵计算，长度单位 Å，角度单位度
//! - Bravais 格子：显式指定优先，否则由空间群编号推出
//! - 惯用晶胞必须显式指定 Bravais 格子，因为空间群推出的格子对应原胞
//!
//! ## 依赖关系
//! - 被 `commands/import.rs` 使用
//! - 使用 `models/`, `lattice/`

use crate::error::{QdeckError, Result};
use crate::lattice::{prune_lattice_parameters, resolve_bravais, Bravais};
use crate::models::crystal::{
    Crystal, LatticeKey, LatticeParameters, LatticeVectors, Positions, SpaceGroup,
};
use crate::models::structure::Structure;
use crate::models::value::{Quantity, Unit};

/// 导入选项
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub bravais: Option<Bravais>,
    pub space_group: Option<u32>,
    /// 输入文件是惯用晶胞
    pub conventional: bool,
    /// 输出笛卡尔坐标 (Å) 而不是分数坐标
    pub cartesian: bool,
    /// 保留全部六个晶格参数
    pub keep_all_parameters: bool,
    /// 同时写入显式晶格向量
    pub lattice_vectors: bool,
}

/// 晶格矩阵对应的六个晶格参数
pub fn lattice_parameters_of(structure: &Structure) -> LatticeParameters {
    let (a, b, c, alpha, beta, gamma) = structure.lattice.parameters();
    LatticeParameters::from([
        (LatticeKey::A, Quantity::angstrom(a)),
        (LatticeKey::B, Quantity::angstrom(b)),
        (LatticeKey::C, Quantity::angstrom(c)),
        (LatticeKey::Alpha, Quantity::degree(alpha)),
        (LatticeKey::Beta, Quantity::degree(beta)),
        (LatticeKey::Gamma, Quantity::degree(gamma)),
    ])
}

/// 结构 -> 晶体记录
pub fn structure_to_crystal(structure: &Structure, options: &ImportOptions) -> Result<Crystal> {
    if options.conventional && options.bravais.is_none() {
        return Err(QdeckError::InvalidArgument(
            "a conventional cell requires an explicit bravais lattice, \
             the one implied by the space group describes the primitive cell"
                .to_string(),
        ));
    }

    let bravais = match (options.bravais, options.space_group) {
        (Some(bravais), _) => Some(bravais),
        (None, Some(number)) => Some(resolve_bravais(number)?),
        (None, None) if options.lattice_vectors => None,
        (None, None) => return Err(QdeckError::MissingLatticeDescription),
    };

    let species: Vec<String> = structure.atoms.iter().map(|a| a.element.clone()).collect();
    let positions = if options.cartesian {
        Positions::Cartesian(
            structure
                .atoms
                .iter()
                .map(|a| structure.lattice.to_cartesian(a.position))
                .collect(),
        )
    } else {
        Positions::Fractional(structure.atoms.iter().map(|a| a.position).collect())
    };

    let all_parameters = lattice_parameters_of(structure);
    let parameters = match bravais {
        Some(bravais) if !options.keep_all_parameters => {
            prune_lattice_parameters(&all_parameters, bravais)?
        }
        _ => all_parameters,
    };

    let mut crystal = Crystal::new(species, positions, parameters)?.with_name(&structure.name);
    if let Some(bravais) = bravais {
        crystal = crystal.with_bravais(bravais);
    }
    if let Some(number) = options.space_group {
        crystal = crystal.with_space_group(SpaceGroup::new("", number)?)?;
    }
    if options.lattice_vectors {
        crystal = crystal.with_lattice_vectors(LatticeVectors {
            vectors: structure.lattice.matrix,
            unit: Unit::Angstrom,
        });
    }

    log::debug!(
        "Imported {} ({} atoms, bravais {:?})",
        structure.name,
        crystal.n_atoms(),
        bravais.map(|b| b.as_str())
    );
    Ok(crystal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::structure::{Atom, Lattice};

    fn silicon_primitive() -> Structure {
        let a = 5.429 / 2.0;
        Structure::new(
            "Si",
            Lattice::from_vectors([[0.0, a, a], [a, 0.0, a], [a, a, 0.0]]),
            vec![
                Atom::new("Si", [0.0, 0.0, 0.0]),
                Atom::new("Si", [0.25, 0.25, 0.25]),
            ],
        )
    }

    #[test]
    fn test_space_group_resolution_prunes_parameters() {
        let options = ImportOptions {
            space_group: Some(227),
            ..Default::default()
        };
        let crystal = structure_to_crystal(&silicon_primitive(), &options).unwrap();

        assert_eq!(crystal.bravais(), Some(Bravais::Fcc));
        assert_eq!(crystal.space_group().map(|sg| sg.number), Some(227));
        let keys: Vec<LatticeKey> = crystal.lattice_parameters().keys().copied().collect();
        assert_eq!(keys, [LatticeKey::A]);
        // 原胞向量长度为 a/√2
        let a = crystal.lattice_parameters()[&LatticeKey::A].value;
        assert!((a - 5.429 / 2f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_keep_all_parameters_and_vectors() {
        let options = ImportOptions {
            bravais: Some(Bravais::Fcc),
            keep_all_parameters: true,
            lattice_vectors: true,
            ..Default::default()
        };
        let crystal = structure_to_crystal(&silicon_primitive(), &options).unwrap();
        assert_eq!(crystal.lattice_parameters().len(), 6);
        let gamma = crystal.lattice_parameters()[&LatticeKey::Gamma].value;
        assert!((gamma - 60.0).abs() < 1e-9);
        assert!(crystal.lattice_vectors().is_some());
    }

    #[test]
    fn test_cartesian_positions() {
        let options = ImportOptions {
            bravais: Some(Bravais::Fcc),
            cartesian: true,
            ..Default::default()
        };
        let crystal = structure_to_crystal(&silicon_primitive(), &options).unwrap();
        let p = crystal.positions().coords()[1];
        for x in p {
            assert!((x - 5.429 / 4.0).abs() < 1e-12);
        }
        assert!(!crystal.positions().is_fractional());
    }

    #[test]
    fn test_conventional_requires_bravais() {
        let options = ImportOptions {
            conventional: true,
            space_group: Some(227),
            ..Default::default()
        };
        assert!(matches!(
            structure_to_crystal(&silicon_primitive(), &options),
            Err(QdeckError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_missing_description() {
        assert!(matches!(
            structure_to_crystal(&silicon_primitive(), &ImportOptions::default()),
            Err(QdeckError::MissingLatticeDescription)
        ));
    }
}
