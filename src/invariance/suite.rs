//! # 测试集定义文件
//!
//! 每个 JSON 文件描述一个测试集：晶体、选项、断言与测试类型。
//!
//! ```json
//! {
//!   "name": "silicon",
//!   "crystal": { "species": ["Si", "Si"], "fractional": [[0,0,0], [0.25,0.25,0.25]],
//!                "lattice_parameters": {"a": {"value": 5.429, "unit": "angstrom"}},
//!                "bravais": "fcc" },
//!   "options": [{"name": "h0_cutoff", "value": 40, "unit": "bohr"}],
//!   "assertions": [{"variable": "energy", "value": -7.5, "margin": 1e-6}],
//!   "test": {"kind": "translation", "shifts": [0.43]}
//! }
//! ```
//!
//! 选项扫描：`{"kind": "sweep", "option": "ewald_alpha", "values": [0.1, 0.5], "unit": ""}`，
//! 省略 `unit` 时沿用该选项已有的单位。
//!
//! ## 依赖关系
//! - 被 `commands/generate.rs` 使用
//! - 使用 `invariance/mod.rs`, `emit/deck.rs`, `models/`

use crate::emit::deck::{join_blocks, xtb_input_string};
use crate::error::{QdeckError, Result};
use crate::invariance::{
    generate_invariance_inputs, generate_sweep_inputs, generate_symmetry_inputs, Sweep, Transform,
};
use crate::models::assertion::Assertion;
use crate::models::crystal::Crystal;
use crate::models::options::{OptionValue, Options, PotentialType, Setting, SubCommand};
use crate::models::value::Unit;
use crate::transform::parse_triple;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 测试类型及其参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TestKind {
    Translation { shifts: Vec<f64> },
    /// 每组角度为 [z, x, y]，单位：弧度
    Rotation { angles: Vec<Vec<f64>> },
    Supercell { expansions: Vec<Vec<u32>> },
    Symmetry,
    /// 晶体不变，单个选项依次取 `values` 中的值
    Sweep {
        option: String,
        values: Vec<OptionValue>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<Unit>,
    },
    Single,
}

impl TestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestKind::Translation { .. } => "translation",
            TestKind::Rotation { .. } => "rotation",
            TestKind::Supercell { .. } => "supercell",
            TestKind::Symmetry => "symmetry",
            TestKind::Sweep { .. } => "sweep",
            TestKind::Single => "single",
        }
    }

    /// 转换为变换参数列表，检查每组参数的分量数
    pub fn transforms(&self) -> Result<Vec<Transform>> {
        match self {
            TestKind::Translation { shifts } => {
                Ok(shifts.iter().copied().map(Transform::Shift).collect())
            }
            TestKind::Rotation { angles } => angles
                .iter()
                .map(|a| parse_triple(a).map(Transform::Rotation))
                .collect(),
            TestKind::Supercell { expansions } => expansions
                .iter()
                .map(|n| parse_triple(n).map(Transform::Supercell))
                .collect(),
            TestKind::Symmetry | TestKind::Sweep { .. } | TestKind::Single => Ok(Vec::new()),
        }
    }
}

/// 一个测试集
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suite {
    /// 命名结果前缀
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    pub crystal: Crystal,
    #[serde(default)]
    pub options: Options,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_commands: Vec<SubCommand>,
    #[serde(default)]
    pub assertions: Vec<Assertion>,
    /// 每个计算块一条注释
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<String>>,
    /// 设置后写入 `potential_type` 选项
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub potential_type: Option<PotentialType>,
    pub test: TestKind,
}

impl Suite {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| QdeckError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| QdeckError::ParseError {
            format: "suite".to_string(),
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn effective_options(&self) -> Options {
        match self.potential_type {
            Some(potential) => self
                .options
                .clone()
                .with("potential_type", potential.to_setting()),
            None => self.options.clone(),
        }
    }

    /// 扫描取值的单位：显式给出优先，否则沿用已有选项的单位
    fn sweep(options: &Options, option: &str, values: &[OptionValue], unit: Option<&Unit>) -> Sweep {
        let unit = unit
            .or_else(|| options.get(option).map(|setting| &setting.unit))
            .cloned()
            .unwrap_or_default();
        Sweep {
            option: option.to_string(),
            values: values
                .iter()
                .map(|value| Setting::new(value.clone(), unit.clone()))
                .collect(),
        }
    }

    /// 渲染整个测试集的输入文本
    pub fn render(&self) -> Result<String> {
        let options = self.effective_options();
        let comments = self.comments.as_deref();
        let (crystal, name) = (&self.crystal, self.name.as_str());
        let (sub_commands, assertions) = (self.sub_commands.as_slice(), self.assertions.as_slice());

        let body = match &self.test {
            TestKind::Symmetry => {
                generate_symmetry_inputs(crystal, &options, sub_commands, assertions, name, comments)?
            }
            TestKind::Sweep {
                option,
                values,
                unit,
            } => {
                let sweep = Suite::sweep(&options, option, values, unit.as_ref());
                generate_sweep_inputs(
                    crystal,
                    &options,
                    sub_commands,
                    assertions,
                    &sweep,
                    name,
                    comments,
                )?
            }
            TestKind::Single => {
                let comment = match comments {
                    Some([single]) => Some(single.as_str()),
                    Some(c) if c.len() != 1 => {
                        return Err(QdeckError::CommentCountMismatch {
                            expected: 1,
                            got: c.len(),
                        })
                    }
                    _ => None,
                };
                xtb_input_string(
                    crystal,
                    &options,
                    sub_commands,
                    assertions,
                    Some(name),
                    comment,
                )?
            }
            kind => generate_invariance_inputs(
                crystal,
                &options,
                sub_commands,
                assertions,
                &kind.transforms()?,
                name,
                comments,
            )?,
        };

        Ok(join_blocks(self.header.as_deref(), &[body]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SILICON: &str = r#"{
        "name": "silicon",
        "header": "Translational invariance",
        "crystal": {
            "species": ["Si", "Si"],
            "fractional": [[0.0, 0.0, 0.0], [0.25, 0.25, 0.25]],
            "lattice_parameters": {"a": {"value": 5.429, "unit": "angstrom"}},
            "bravais": "fcc"
        },
        "options": [
            {"name": "h0_cutoff", "value": 40, "unit": "bohr"},
            {"name": "monkhorst_pack", "value": [2, 2, 2]}
        ],
        "potential_type": "truncated",
        "assertions": [{"variable": "energy", "value": -7.5, "margin": 1e-6}],
        "test": {"kind": "translation", "shifts": [0.43]}
    }"#;

    fn suite(json: &str) -> Suite {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_render_translation_suite() {
        let suite = suite(SILICON);
        let text = suite.render().unwrap();

        assert!(text.starts_with("! Translational invariance\n\nsilicon_no_shift := xtb(\n"));
        assert!(text.contains("silicon_shift := xtb(\n"));
        assert!(text.contains(" monkhorst_pack = [2, 2, 2]\n potential_type = truncated\n)\n"));
    }

    #[test]
    fn test_single_suite() {
        let json = SILICON.replace(
            r#"{"kind": "translation", "shifts": [0.43]}"#,
            r#"{"kind": "single"}"#,
        );
        let text = suite(&json).render().unwrap();
        assert_eq!(text.matches(":= xtb(").count(), 1);
        assert!(text.contains("silicon := xtb(\n"));
        assert!(text.contains("a = 10.25932 bohr"));
    }

    #[test]
    fn test_rotation_arity_checked() {
        let kind = TestKind::Rotation {
            angles: vec![vec![0.0, 0.0, 0.0], vec![1.0, 2.0]],
        };
        assert!(matches!(
            kind.transforms(),
            Err(QdeckError::TransformArity { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn test_supercell_kind_json() {
        let kind: TestKind =
            serde_json::from_str(r#"{"kind": "supercell", "expansions": [[1, 1, 1], [2, 2, 2]]}"#)
                .unwrap();
        assert_eq!(
            kind.transforms().unwrap(),
            [Transform::Supercell([1, 1, 1]), Transform::Supercell([2, 2, 2])]
        );
    }

    #[test]
    fn test_bad_suite_reports_schema_error() {
        let json = SILICON.replace(r#""bravais": "fcc""#, r#""bravais": "fcc", "xyz": [[0, 0, 0]]"#);
        let err = serde_json::from_str::<Suite>(&json).unwrap_err();
        assert!(err.to_string().contains("Ambiguous"));
    }

    #[test]
    fn test_sweep_suite() {
        let json = SILICON.replace(
            r#"{"kind": "translation", "shifts": [0.43]}"#,
            r#"{"kind": "sweep", "option": "h0_cutoff", "values": [20, 30, 40]}"#,
        );
        let text = suite(&json).render().unwrap();

        assert!(text.starts_with("! Translational invariance\n\nsilicon_h0_cutoff_1 := xtb(\n"));
        assert_eq!(text.matches(":= xtb(").count(), 3);
        for cutoff in [20, 30, 40] {
            assert!(text.contains(&format!(" h0_cutoff = {} bohr\n", cutoff)));
        }
        assert!(text.contains("load = silicon_h0_cutoff_3 variable = energy"));
    }

    #[test]
    fn test_sweep_unit_resolution() {
        let options = Options::new().with("h0_cutoff", Setting::new(40, Unit::Bohr));
        let values = [OptionValue::Int(10)];

        let sweep = Suite::sweep(&options, "h0_cutoff", &values, None);
        assert_eq!(sweep.values[0].unit, Unit::Bohr);
        let sweep = Suite::sweep(&options, "h0_cutoff", &values, Some(&Unit::Angstrom));
        assert_eq!(sweep.values[0].unit, Unit::Angstrom);
        let sweep = Suite::sweep(&options, "ewald_alpha", &values, None);
        assert_eq!(sweep.values[0].unit, Unit::Dimensionless);
        assert_eq!(sweep.option, "ewald_alpha");
    }

    #[test]
    fn test_suite_with_sub_commands() {
        let json = SILICON.replace(
            r#""potential_type": "truncated","#,
            r#""sub_commands": [{"name": "xtb_potential", "options": [{"name": "smoothing_range", "value": 1, "unit": "bohr"}]}],"#,
        );
        let text = suite(&json).render().unwrap();
        assert_eq!(text.matches(" xtb_potential(\n").count(), 2);
        assert!(!text.contains("potential_type"));
    }
}
