//! # 超胞扩展
//!
//! 沿三个晶格方向分别复制 nx、ny、nz 次。分数坐标按新晶格重新归一，
//! 长度参数与晶格向量相应放大，Bravais 格子按扩展方式重新确定。
//!
//! 原子顺序：先原胞原子，再平移 (i, j, k)，即每个原子的全部镜像相邻。
//!
//! ## 依赖关系
//! - 被 `transform/mod.rs`, `invariance/` 使用
//! - 使用 `models/crystal.rs`, `lattice/`

use crate::error::{QdeckError, Result};
use crate::lattice::{prune_lattice_parameters, Bravais};
use crate::models::crystal::{Crystal, LatticeKey, LatticeParameters, LatticeVectors, Positions};
use crate::models::value::Quantity;

/// 扩展后晶胞的 Bravais 格子
///
/// 各向同性扩展保持原格子。各向异性扩展只支持简单格子：
/// 立方变为四方（nx == ny）或正交，四方在 nx != ny 时变为正交，
/// 六方要求 nx == ny，正交、单斜、三斜保持不变。
pub fn supercell_bravais(parent: Bravais, n: [u32; 3]) -> Result<Bravais> {
    let [nx, ny, nz] = n;
    if nx == ny && ny == nz {
        return Ok(parent);
    }

    match parent {
        Bravais::Cubic | Bravais::Tetragonal if nx == ny => Ok(Bravais::Tetragonal),
        Bravais::Cubic | Bravais::Tetragonal => Ok(Bravais::Orthorhombic),
        Bravais::Hexagonal if nx == ny => Ok(Bravais::Hexagonal),
        Bravais::Orthorhombic | Bravais::Monoclinic | Bravais::Triclinic => Ok(parent),
        _ => Err(QdeckError::UnsupportedSupercell(format!(
            "{} expanded by [{}, {}, {}]",
            parent, nx, ny, nz
        ))),
    }
}

/// 构造超胞
pub fn expand(crystal: &Crystal, n: [u32; 3]) -> Result<Crystal> {
    if n.contains(&0) {
        return Err(QdeckError::UnsupportedSupercell(format!(
            "expansion [{}, {}, {}] has a zero component",
            n[0], n[1], n[2]
        )));
    }

    let translations = translations(n);
    let mut species = Vec::with_capacity(crystal.n_atoms() * translations.len());
    let mut coords = Vec::with_capacity(species.capacity());

    let positions = match crystal.positions() {
        Positions::Fractional(frac) => {
            let scale = n.map(f64::from);
            for (element, p) in crystal.species().iter().zip(frac) {
                for t in &translations {
                    species.push(element.clone());
                    coords.push([
                        (p[0] + t[0]) / scale[0],
                        (p[1] + t[1]) / scale[1],
                        (p[2] + t[2]) / scale[2],
                    ]);
                }
            }
            Positions::Fractional(coords)
        }
        Positions::Cartesian(xyz) => {
            let lattice_vectors = crystal
                .lattice_vectors()
                .ok_or(QdeckError::MissingLatticeVectors)?;
            if lattice_vectors.unit != *crystal.xyz_unit() {
                return Err(QdeckError::InconsistentUnits(format!(
                    "xyz positions in {} with lattice vectors in {}",
                    crystal.xyz_unit(),
                    lattice_vectors.unit
                )));
            }
            let vectors = lattice_vectors.vectors;
            for (element, p) in crystal.species().iter().zip(xyz) {
                for t in &translations {
                    species.push(element.clone());
                    coords.push([
                        p[0] + t[0] * vectors[0][0] + t[1] * vectors[1][0] + t[2] * vectors[2][0],
                        p[1] + t[0] * vectors[0][1] + t[1] * vectors[1][1] + t[2] * vectors[2][1],
                        p[2] + t[0] * vectors[0][2] + t[1] * vectors[1][2] + t[2] * vectors[2][2],
                    ]);
                }
            }
            Positions::Cartesian(coords)
        }
    };

    let mut expanded = crystal.clone().with_atoms(species, positions)?;

    if let Some(lattice_vectors) = crystal.lattice_vectors() {
        let mut vectors = lattice_vectors.vectors;
        for (row, &factor) in vectors.iter_mut().zip(n.iter()) {
            *row = row.map(|x| x * f64::from(factor));
        }
        expanded = expanded.with_lattice_vectors(LatticeVectors {
            vectors,
            unit: lattice_vectors.unit.clone(),
        });
    }

    // 仅有晶格向量、没有参数化描述的晶体无需重新确定 Bravais 格子
    if crystal.bravais().is_none() && crystal.space_group().is_none() {
        return Ok(expanded);
    }

    let parent = crystal.resolved_bravais()?;
    let bravais = supercell_bravais(parent, n)?;
    let params = scale_parameters(crystal.lattice_parameters(), n);
    let params = prune_lattice_parameters(&params, bravais)?;

    Ok(expanded
        .with_lattice_parameters(params)?
        .with_bravais(bravais))
}

fn translations(n: [u32; 3]) -> Vec<[f64; 3]> {
    let mut out = Vec::with_capacity((n[0] * n[1] * n[2]) as usize);
    for i in 0..n[0] {
        for j in 0..n[1] {
            for k in 0..n[2] {
                out.push([f64::from(i), f64::from(j), f64::from(k)]);
            }
        }
    }
    out
}

/// 放大长度参数；缺省的 b、c 取自 a（高对称格子只存 a 或 a、c）
fn scale_parameters(params: &LatticeParameters, n: [u32; 3]) -> LatticeParameters {
    let mut scaled = params.clone();
    let a = params.get(&LatticeKey::A).cloned();

    for (key, factor) in [(LatticeKey::A, n[0]), (LatticeKey::B, n[1]), (LatticeKey::C, n[2])] {
        let base = params.get(&key).cloned().or_else(|| a.clone());
        if let Some(Quantity { value, unit }) = base {
            scaled.insert(key, Quantity::new(value * f64::from(factor), unit));
        }
    }
    scaled
}
