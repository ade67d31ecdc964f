//! # 不变性测试生成
//!
//! 给定基准晶体与一组变换参数，生成 N+1 个计算块：一个未变换的基准块，
//! 以及每个变换参数对应的一个块。所有块共享相同的选项与断言，
//! 只有命名结果和所施加的几何变换不同。
//!
//! 选项扫描是另一种测试：晶体不变，某一个选项依次取一组值，每个值一个块。
//!
//! 晶格数值在生成开始时换算为 bohr，且只换算一次。
//!
//! ## 依赖关系
//! - 被 `commands/generate.rs` 使用
//! - 使用 `transform/`, `emit/`, `lattice/units.rs`
//! - 子模块: suite

pub mod suite;

use crate::emit::deck::{join_blocks, InputBlock};
use crate::error::{QdeckError, Result};
use crate::lattice::normalize_to_bohr;
use crate::models::assertion::Assertion;
use crate::models::crystal::Crystal;
use crate::models::options::{Options, Setting, SubCommand};
use crate::transform::{expand, rotate, shift_positions, validate_positions};

use std::fmt;

/// 变换类型，决定命名结果的后缀
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    Shift,
    Rotation,
    Supercell,
    Symmetry,
}

impl TransformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformKind::Shift => "shift",
            TransformKind::Rotation => "rotation",
            TransformKind::Supercell => "supercell",
            TransformKind::Symmetry => "symmetry",
        }
    }

    /// 基准块后缀：旋转为 `_rotation0`，其余如 `_no_shift`
    pub fn baseline_suffix(&self) -> String {
        match self {
            TransformKind::Rotation => "_rotation0".to_string(),
            _ => format!("_no_{}", self.as_str()),
        }
    }

    /// 变换块后缀：只有一个变换时为 `_shift`，否则为 `_shift1`、`_shift2` ...
    /// 旋转总是编号，与基准块的 `_rotation0` 对应
    pub fn variant_suffix(&self, index: usize, count: usize) -> String {
        if count == 1 && *self != TransformKind::Rotation {
            format!("_{}", self.as_str())
        } else {
            format!("_{}{}", self.as_str(), index + 1)
        }
    }
}

/// 单个几何变换参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// 分数坐标刚性平移
    Shift(f64),
    /// 绕 z、x、y 轴依次旋转（弧度）
    Rotation([f64; 3]),
    /// 超胞扩展系数
    Supercell([u32; 3]),
}

impl Transform {
    pub fn kind(&self) -> TransformKind {
        match self {
            Transform::Shift(_) => TransformKind::Shift,
            Transform::Rotation(_) => TransformKind::Rotation,
            Transform::Supercell(_) => TransformKind::Supercell,
        }
    }

    pub fn apply(&self, crystal: &Crystal) -> Result<Crystal> {
        match *self {
            Transform::Shift(delta) => shift_positions(crystal, delta),
            Transform::Rotation([z, x, y]) => rotate(crystal, z, x, y),
            Transform::Supercell(n) => expand(crystal, n),
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Shift(delta) => write!(f, "shift of {}", delta),
            Transform::Rotation([z, x, y]) => write!(f, "rotation of [{}, {}, {}]", z, x, y),
            Transform::Supercell([nx, ny, nz]) => write!(f, "supercell [{}, {}, {}]", nx, ny, nz),
        }
    }
}

/// 选项扫描：同一晶体上某个选项依次取一组值
#[derive(Debug, Clone, PartialEq)]
pub struct Sweep {
    pub option: String,
    pub values: Vec<Setting>,
}

/// 一次不变性测试的公共输入
#[derive(Debug, Clone, Copy)]
pub struct InvarianceInputs<'a> {
    pub crystal: &'a Crystal,
    pub options: &'a Options,
    pub sub_commands: &'a [SubCommand],
    pub assertions: &'a [Assertion],
    pub named_result: &'a str,
}

impl<'a> InvarianceInputs<'a> {
    pub fn new(
        crystal: &'a Crystal,
        options: &'a Options,
        assertions: &'a [Assertion],
        named_result: &'a str,
    ) -> Self {
        InvarianceInputs {
            crystal,
            options,
            sub_commands: &[],
            assertions,
            named_result,
        }
    }

    pub fn with_sub_commands(mut self, sub_commands: &'a [SubCommand]) -> Self {
        self.sub_commands = sub_commands;
        self
    }

    fn block<'b>(&'b self, named_result: String, crystal: &'b Crystal) -> InputBlock<'b> {
        InputBlock::new(named_result, crystal)
            .options(self.options)
            .sub_commands(self.sub_commands)
            .assertions(self.assertions)
    }

    /// 基准块 + 每个变换一个块
    pub fn transforms(
        &self,
        transforms: &[Transform],
        comments: Option<&[String]>,
    ) -> Result<Vec<String>> {
        let kind = match transforms.first() {
            Some(t) => t.kind(),
            None => return Err(QdeckError::EmptyTransformList(self.named_result.to_string())),
        };
        if let Some(other) = transforms.iter().find(|t| t.kind() != kind) {
            return Err(QdeckError::InvalidArgument(format!(
                "cannot mix {} with {} transforms in one test",
                other.kind().as_str(),
                kind.as_str()
            )));
        }
        let comments = check_comments(comments, transforms.len() + 1)?;

        let baseline = normalize_to_bohr(self.crystal)?;
        let mut blocks = Vec::with_capacity(transforms.len() + 1);

        let name = format!("{}{}", self.named_result, kind.baseline_suffix());
        blocks.push(self.render(name, &baseline, comments.first())?);

        for (i, transform) in transforms.iter().enumerate() {
            let transformed = transform.apply(&baseline)?;
            let name = format!(
                "{}{}",
                self.named_result,
                kind.variant_suffix(i, transforms.len())
            );
            blocks.push(self.render(name, &transformed, comments.get(i + 1))?);
        }

        Ok(blocks)
    }

    /// 关闭与开启 `symmetry_reduction` 的两个块
    pub fn symmetry(&self, comments: Option<&[String]>) -> Result<Vec<String>> {
        let comments = check_comments(comments, 2)?;
        let crystal = normalize_to_bohr(self.crystal)?;
        let kind = TransformKind::Symmetry;

        let mut blocks = Vec::with_capacity(2);
        for (i, enabled) in [false, true].into_iter().enumerate() {
            let options = self
                .options
                .clone()
                .with("symmetry_reduction", Setting::plain(enabled));
            let suffix = if enabled {
                kind.variant_suffix(0, 1)
            } else {
                kind.baseline_suffix()
            };
            let inputs = InvarianceInputs {
                options: &options,
                ..*self
            };
            blocks.push(inputs.render(
                format!("{}{}", self.named_result, suffix),
                &crystal,
                comments.get(i),
            )?);
        }
        Ok(blocks)
    }

    /// 扫描选项的每个取值一个块，命名为 `<named_result>_<option>_<n>`
    pub fn sweep(&self, sweep: &Sweep, comments: Option<&[String]>) -> Result<Vec<String>> {
        if sweep.values.is_empty() {
            return Err(QdeckError::EmptyTransformList(self.named_result.to_string()));
        }
        let comments = check_comments(comments, sweep.values.len())?;
        let crystal = normalize_to_bohr(self.crystal)?;

        let mut blocks = Vec::with_capacity(sweep.values.len());
        for (i, setting) in sweep.values.iter().enumerate() {
            let options = self
                .options
                .clone()
                .with(sweep.option.as_str(), setting.clone());
            let inputs = InvarianceInputs {
                options: &options,
                ..*self
            };
            blocks.push(inputs.render(
                format!("{}_{}_{}", self.named_result, sweep.option, i + 1),
                &crystal,
                comments.get(i),
            )?);
        }
        Ok(blocks)
    }

    fn render(&self, named_result: String, crystal: &Crystal, comment: Option<&String>) -> Result<String> {
        let mut block = self.block(named_result, crystal);
        if !validate_positions(block.named_result(), crystal.positions()) {
            block = block.structure_options(wrap_atoms());
        }
        if let Some(comment) = comment {
            block = block.comment(comment.as_str());
        }
        block.render()
    }
}

fn wrap_atoms() -> Options {
    Options::new().with("wrap_atoms", Setting::plain(true))
}

fn check_comments(comments: Option<&[String]>, expected: usize) -> Result<&[String]> {
    match comments {
        Some(c) if c.len() != expected => Err(QdeckError::CommentCountMismatch {
            expected,
            got: c.len(),
        }),
        Some(c) => Ok(c),
        None => Ok(&[]),
    }
}

/// 生成不变性测试输入：基准块与每个变换参数对应的块，块之间空一行
pub fn generate_invariance_inputs(
    crystal: &Crystal,
    options: &Options,
    sub_commands: &[SubCommand],
    assertions: &[Assertion],
    transforms: &[Transform],
    named_result: &str,
    comments: Option<&[String]>,
) -> Result<String> {
    let blocks = InvarianceInputs::new(crystal, options, assertions, named_result)
        .with_sub_commands(sub_commands)
        .transforms(transforms, comments)?;
    Ok(join_blocks(None, &blocks))
}

/// 生成对称性约化测试输入
pub fn generate_symmetry_inputs(
    crystal: &Crystal,
    options: &Options,
    sub_commands: &[SubCommand],
    assertions: &[Assertion],
    named_result: &str,
    comments: Option<&[String]>,
) -> Result<String> {
    let blocks = InvarianceInputs::new(crystal, options, assertions, named_result)
        .with_sub_commands(sub_commands)
        .symmetry(comments)?;
    Ok(join_blocks(None, &blocks))
}

/// 生成选项扫描输入
pub fn generate_sweep_inputs(
    crystal: &Crystal,
    options: &Options,
    sub_commands: &[SubCommand],
    assertions: &[Assertion],
    sweep: &Sweep,
    named_result: &str,
    comments: Option<&[String]>,
) -> Result<String> {
    let blocks = InvarianceInputs::new(crystal, options, assertions, named_result)
        .with_sub_commands(sub_commands)
        .sweep(sweep, comments)?;
    Ok(join_blocks(None, &blocks))
}
