//! # 晶体记录
//!
//! 求解器输入的核心数据结构：原子种类、坐标（分数或笛卡尔，二选一）、
//! 晶格参数、空间群或 Bravais 格子，以及可选的显式晶格向量。
//! 笛卡尔坐标带有长度单位（默认 Å），与晶格一同换算为 bohr。
//!
//! 所有构造路径（`Crystal::new`、`with_*`、JSON 反序列化）都会校验不变量，
//! 因此任何存在的 `Crystal` 值都满足：
//! - `species` 与坐标数目相同且不为零
//! - 空间群编号在 1-230 之间
//! - 长度参数使用长度单位，角度参数使用角度单位
//!
//! ## 依赖关系
//! - 被 `transform/`, `emit/`, `invariance/`, `parsers/import.rs` 使用
//! - 使用 `models/value.rs`, `lattice/bravais.rs`

use crate::error::{QdeckError, Result};
use crate::lattice::bravais::{resolve_bravais, Bravais};
use crate::models::value::{Quantity, Unit};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────
// 晶格参数
// ─────────────────────────────────────────────────────────────

/// 晶格参数名称，排序即输出顺序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatticeKey {
    A,
    B,
    C,
    Alpha,
    Beta,
    Gamma,
}

impl LatticeKey {
    pub const ALL: [LatticeKey; 6] = [
        LatticeKey::A,
        LatticeKey::B,
        LatticeKey::C,
        LatticeKey::Alpha,
        LatticeKey::Beta,
        LatticeKey::Gamma,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LatticeKey::A => "a",
            LatticeKey::B => "b",
            LatticeKey::C => "c",
            LatticeKey::Alpha => "alpha",
            LatticeKey::Beta => "beta",
            LatticeKey::Gamma => "gamma",
        }
    }

    pub fn is_length(&self) -> bool {
        matches!(self, LatticeKey::A | LatticeKey::B | LatticeKey::C)
    }
}

impl fmt::Display for LatticeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LatticeKey {
    type Err = QdeckError;

    fn from_str(s: &str) -> Result<Self> {
        LatticeKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| QdeckError::SchemaViolation(format!("unknown lattice parameter '{}'", s)))
    }
}

/// 晶格参数表
pub type LatticeParameters = BTreeMap<LatticeKey, Quantity>;

/// 检查每个参数的单位与其物理量纲一致
pub fn check_parameter_units(params: &LatticeParameters) -> Result<()> {
    for (key, quantity) in params {
        let ok = if key.is_length() {
            quantity.unit.is_length()
        } else {
            quantity.unit.is_angle()
        };
        if !ok {
            return Err(QdeckError::InconsistentUnits(format!(
                "lattice parameter '{}' has unit '{}'",
                key, quantity.unit
            )));
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────
// 坐标与晶格描述
// ─────────────────────────────────────────────────────────────

/// 原子坐标：分数坐标或笛卡尔坐标
#[derive(Debug, Clone, PartialEq)]
pub enum Positions {
    Fractional(Vec<[f64; 3]>),
    Cartesian(Vec<[f64; 3]>),
}

impl Positions {
    pub fn coords(&self) -> &[[f64; 3]] {
        match self {
            Positions::Fractional(p) | Positions::Cartesian(p) => p,
        }
    }

    pub fn is_fractional(&self) -> bool {
        matches!(self, Positions::Fractional(_))
    }

    /// 输入文件中的坐标关键字
    pub fn key(&self) -> &'static str {
        match self {
            Positions::Fractional(_) => "fractional",
            Positions::Cartesian(_) => "xyz",
        }
    }

    /// 对每个坐标应用同一函数，保持表示方式不变
    pub fn map(&self, f: impl Fn([f64; 3]) -> [f64; 3]) -> Positions {
        let mapped = self.coords().iter().map(|p| f(*p)).collect();
        match self {
            Positions::Fractional(_) => Positions::Fractional(mapped),
            Positions::Cartesian(_) => Positions::Cartesian(mapped),
        }
    }
}

/// 空间群：国际符号（可为空）+ 编号
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceGroup {
    #[serde(default)]
    pub symbol: String,
    pub number: u32,
}

impl SpaceGroup {
    pub fn new(symbol: impl Into<String>, number: u32) -> Result<Self> {
        if !(1..=230).contains(&number) {
            return Err(QdeckError::InvalidSpaceGroup(number));
        }
        Ok(SpaceGroup {
            symbol: symbol.into(),
            number,
        })
    }
}

/// 显式晶格向量（行向量）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeVectors {
    pub vectors: [[f64; 3]; 3],
    #[serde(default = "default_vector_unit")]
    pub unit: Unit,
}

fn default_vector_unit() -> Unit {
    Unit::Angstrom
}

// ─────────────────────────────────────────────────────────────
// Crystal
// ─────────────────────────────────────────────────────────────

/// 晶体记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CrystalDef", into = "CrystalDef")]
pub struct Crystal {
    name: Option<String>,
    species: Vec<String>,
    positions: Positions,
    lattice_parameters: LatticeParameters,
    space_group: Option<SpaceGroup>,
    bravais: Option<Bravais>,
    lattice_vectors: Option<LatticeVectors>,
    /// 笛卡尔坐标的长度单位
    xyz_unit: Unit,
}

impl Crystal {
    pub fn new(
        species: Vec<String>,
        positions: Positions,
        lattice_parameters: LatticeParameters,
    ) -> Result<Self> {
        check_atoms(&species, &positions)?;
        check_parameter_units(&lattice_parameters)?;

        Ok(Crystal {
            name: None,
            species,
            positions,
            lattice_parameters,
            space_group: None,
            bravais: None,
            lattice_vectors: None,
            xyz_unit: Unit::Angstrom,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 设置笛卡尔坐标的单位，必须是长度单位
    pub fn with_xyz_unit(mut self, unit: Unit) -> Result<Self> {
        if !unit.is_length() {
            return Err(QdeckError::InconsistentUnits(format!(
                "xyz positions have unit '{}'",
                unit
            )));
        }
        self.xyz_unit = unit;
        Ok(self)
    }

    pub fn with_bravais(mut self, bravais: Bravais) -> Self {
        self.bravais = Some(bravais);
        self
    }

    pub fn with_space_group(mut self, space_group: SpaceGroup) -> Result<Self> {
        if !(1..=230).contains(&space_group.number) {
            return Err(QdeckError::InvalidSpaceGroup(space_group.number));
        }
        self.space_group = Some(space_group);
        Ok(self)
    }

    pub fn with_lattice_vectors(mut self, lattice_vectors: LatticeVectors) -> Self {
        self.lattice_vectors = Some(lattice_vectors);
        self
    }

    /// 替换坐标（原子数不变）
    pub fn with_positions(mut self, positions: Positions) -> Result<Self> {
        check_atoms(&self.species, &positions)?;
        self.positions = positions;
        Ok(self)
    }

    /// 同时替换原子种类与坐标（超胞扩展时原子数改变）
    pub fn with_atoms(mut self, species: Vec<String>, positions: Positions) -> Result<Self> {
        check_atoms(&species, &positions)?;
        self.species = species;
        self.positions = positions;
        Ok(self)
    }

    pub fn with_lattice_parameters(mut self, lattice_parameters: LatticeParameters) -> Result<Self> {
        check_parameter_units(&lattice_parameters)?;
        self.lattice_parameters = lattice_parameters;
        Ok(self)
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn positions(&self) -> &Positions {
        &self.positions
    }

    pub fn lattice_parameters(&self) -> &LatticeParameters {
        &self.lattice_parameters
    }

    pub fn space_group(&self) -> Option<&SpaceGroup> {
        self.space_group.as_ref()
    }

    pub fn bravais(&self) -> Option<Bravais> {
        self.bravais
    }

    pub fn lattice_vectors(&self) -> Option<&LatticeVectors> {
        self.lattice_vectors.as_ref()
    }

    pub fn xyz_unit(&self) -> &Unit {
        &self.xyz_unit
    }

    pub fn n_atoms(&self) -> usize {
        self.species.len()
    }

    /// 确定 Bravais 格子：显式指定优先，否则由空间群推出
    pub fn resolved_bravais(&self) -> Result<Bravais> {
        match (self.bravais, &self.space_group) {
            (Some(bravais), _) => Ok(bravais),
            (None, Some(sg)) => resolve_bravais(sg.number),
            (None, None) => Err(QdeckError::MissingLatticeDescription),
        }
    }
}

fn check_atoms(species: &[String], positions: &Positions) -> Result<()> {
    let n_positions = positions.coords().len();
    if species.len() != n_positions {
        return Err(QdeckError::SchemaViolation(format!(
            "{} species for {} positions",
            species.len(),
            n_positions
        )));
    }
    if species.is_empty() {
        return Err(QdeckError::SchemaViolation(
            "a crystal needs at least one atom".to_string(),
        ));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────
// JSON 表示
// ─────────────────────────────────────────────────────────────

/// 晶体的 JSON 形式：`fractional` 与 `xyz` 恰好出现一个
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CrystalDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    species: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fractional: Option<Vec<[f64; 3]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    xyz: Option<Vec<[f64; 3]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    xyz_unit: Option<Unit>,
    #[serde(default)]
    lattice_parameters: LatticeParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bravais: Option<Bravais>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    space_group: Option<SpaceGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lattice_vectors: Option<LatticeVectors>,
}

impl TryFrom<CrystalDef> for Crystal {
    type Error = QdeckError;

    fn try_from(def: CrystalDef) -> Result<Self> {
        let positions = match (def.fractional, def.xyz) {
            (Some(_), Some(_)) => return Err(QdeckError::AmbiguousPositions),
            (None, None) => return Err(QdeckError::MissingPositions),
            (Some(frac), None) => Positions::Fractional(frac),
            (None, Some(xyz)) => Positions::Cartesian(xyz),
        };

        if def.bravais.is_none() && def.space_group.is_none() && def.lattice_vectors.is_none() {
            return Err(QdeckError::MissingLatticeDescription);
        }

        let fractional = positions.is_fractional();
        let mut crystal = Crystal::new(def.species, positions, def.lattice_parameters)?;
        match def.xyz_unit {
            Some(_) if fractional => {
                return Err(QdeckError::SchemaViolation(
                    "xyz_unit given for fractional positions".to_string(),
                ))
            }
            Some(unit) => crystal = crystal.with_xyz_unit(unit)?,
            None => {}
        }
        crystal.name = def.name;
        crystal.bravais = def.bravais;
        crystal.lattice_vectors = def.lattice_vectors;
        if let Some(sg) = def.space_group {
            crystal = crystal.with_space_group(sg)?;
        }
        Ok(crystal)
    }
}

impl From<Crystal> for CrystalDef {
    fn from(crystal: Crystal) -> Self {
        let (fractional, xyz, xyz_unit) = match crystal.positions {
            Positions::Fractional(p) => (Some(p), None, None),
            Positions::Cartesian(p) => (None, Some(p), Some(crystal.xyz_unit)),
        };
        CrystalDef {
            name: crystal.name,
            species: crystal.species,
            fractional,
            xyz,
            xyz_unit,
            lattice_parameters: crystal.lattice_parameters,
            bravais: crystal.bravais,
            space_group: crystal.space_group,
            lattice_vectors: crystal.lattice_vectors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn si_params() -> LatticeParameters {
        LatticeParameters::from([(LatticeKey::A, Quantity::angstrom(5.429))])
    }

    #[test]
    fn test_mismatched_species_rejected() {
        let positions = Positions::Fractional(vec![[0.0, 0.0, 0.0], [0.25, 0.25, 0.25]]);
        let result = Crystal::new(vec!["Si".to_string()], positions, si_params());
        assert!(matches!(result, Err(QdeckError::SchemaViolation(_))));
    }

    #[test]
    fn test_mismatched_species_rejected_for_each_family() {
        for bravais in Bravais::ALL {
            let positions = Positions::Cartesian(vec![[0.0; 3]; 3]);
            let species = vec!["O".to_string(); 2];
            let result = Crystal::new(species, positions, LatticeParameters::new())
                .map(|c| c.with_bravais(bravais));
            assert!(matches!(result, Err(QdeckError::SchemaViolation(_))), "{}", bravais);
        }
    }

    #[test]
    fn test_empty_crystal_rejected() {
        let result = Crystal::new(vec![], Positions::Fractional(vec![]), si_params());
        assert!(matches!(result, Err(QdeckError::SchemaViolation(_))));
    }

    #[test]
    fn test_wrong_unit_rejected() {
        let params = LatticeParameters::from([(LatticeKey::Alpha, Quantity::bohr(60.0))]);
        let result = Crystal::new(
            vec!["Si".to_string()],
            Positions::Fractional(vec![[0.0; 3]]),
            params,
        );
        assert!(matches!(result, Err(QdeckError::InconsistentUnits(_))));
    }

    #[test]
    fn test_resolved_bravais() {
        let crystal = Crystal::new(
            vec!["Si".to_string()],
            Positions::Fractional(vec![[0.0; 3]]),
            si_params(),
        )
        .unwrap();
        assert!(matches!(
            crystal.resolved_bravais(),
            Err(QdeckError::MissingLatticeDescription)
        ));

        let crystal = crystal
            .with_space_group(SpaceGroup::new("Fd-3m", 227).unwrap())
            .unwrap();
        assert_eq!(crystal.resolved_bravais().unwrap(), Bravais::Fcc);

        let crystal = crystal.with_bravais(Bravais::Cubic);
        assert_eq!(crystal.resolved_bravais().unwrap(), Bravais::Cubic);
    }

    #[test]
    fn test_space_group_range() {
        assert!(matches!(
            SpaceGroup::new("", 231),
            Err(QdeckError::InvalidSpaceGroup(231))
        ));
    }

    #[test]
    fn test_crystal_json() {
        let json = r#"{
            "species": ["Si", "Si"],
            "fractional": [[0.0, 0.0, 0.0], [0.25, 0.25, 0.25]],
            "lattice_parameters": {"a": {"value": 5.429, "unit": "angstrom"}},
            "bravais": "fcc"
        }"#;
        let crystal: Crystal = serde_json::from_str(json).unwrap();
        assert_eq!(crystal.n_atoms(), 2);
        assert!(crystal.positions().is_fractional());
        assert_eq!(crystal.bravais(), Some(Bravais::Fcc));
        assert_eq!(
            crystal.lattice_parameters()[&LatticeKey::A],
            Quantity::angstrom(5.429)
        );

        let text = serde_json::to_string(&crystal).unwrap();
        let back: Crystal = serde_json::from_str(&text).unwrap();
        assert_eq!(back, crystal);
    }

    #[test]
    fn test_crystal_json_position_keys() {
        let both = r#"{
            "species": ["Si"], "fractional": [[0, 0, 0]], "xyz": [[0, 0, 0]],
            "bravais": "cubic"
        }"#;
        let err = serde_json::from_str::<Crystal>(both).unwrap_err();
        assert!(err.to_string().contains("Ambiguous"));

        let neither = r#"{"species": ["Si"], "bravais": "cubic"}"#;
        let err = serde_json::from_str::<Crystal>(neither).unwrap_err();
        assert!(err.to_string().contains("Missing position"));
    }

    #[test]
    fn test_crystal_json_xyz_unit() {
        let json = r#"{
            "species": ["Fe"], "xyz": [[0.5, 0.5, 0.5]], "xyz_unit": "bohr",
            "lattice_vectors": {"vectors": [[2, 0, 0], [0, 2, 0], [0, 0, 2]], "unit": "bohr"}
        }"#;
        let crystal: Crystal = serde_json::from_str(json).unwrap();
        assert_eq!(crystal.xyz_unit(), &Unit::Bohr);
        let back: Crystal = serde_json::from_str(&serde_json::to_string(&crystal).unwrap()).unwrap();
        assert_eq!(back, crystal);

        let json = r#"{"species": ["Fe"], "xyz": [[0, 0, 0]], "bravais": "cubic"}"#;
        let crystal: Crystal = serde_json::from_str(json).unwrap();
        assert_eq!(crystal.xyz_unit(), &Unit::Angstrom);

        let json = r#"{"species": ["Fe"], "fractional": [[0, 0, 0]], "xyz_unit": "bohr", "bravais": "cubic"}"#;
        assert!(serde_json::from_str::<Crystal>(json).is_err());

        let json = r#"{"species": ["Fe"], "xyz": [[0, 0, 0]], "xyz_unit": "degree", "bravais": "cubic"}"#;
        assert!(serde_json::from_str::<Crystal>(json).is_err());
    }

    #[test]
    fn test_crystal_json_needs_lattice_description() {
        let json = r#"{"species": ["Si"], "fractional": [[0, 0, 0]]}"#;
        let err = serde_json::from_str::<Crystal>(json).unwrap_err();
        assert!(err.to_string().contains("bravais or space group"));
    }
}
