//! # 计算块输出
//!
//! 一个计算块由注释、命名结果、结构、选项、子命令与断言组成：
//!
//! ```text
//! ! comment
//!
//! silicon := xtb(
//!  structure(
//!   ...
//!  )
//!
//!  h0_cutoff = 40 bohr
//! )
//! assert(load = silicon variable = energy value = -1.0 margin = 1e-06)
//! ```
//!
//! ## 依赖关系
//! - 被 `invariance/`, `commands/generate.rs` 使用
//! - 使用 `emit/structure.rs`, `emit/options.rs`, `emit/assertions.rs`, `lattice/units.rs`

use crate::emit::assertions::emit_assertions;
use crate::emit::indent_lines;
use crate::emit::options::{emit_nested_commands, emit_options};
use crate::emit::structure::emit_structure;
use crate::error::Result;
use crate::lattice::normalize_to_bohr;
use crate::models::assertion::Assertion;
use crate::models::crystal::Crystal;
use crate::models::options::{Options, SubCommand};

/// 未指定命名结果时使用的名称
pub const DEFAULT_NAMED_RESULT: &str = "xtb_calc";

/// 单个 `xtb(...)` 计算块
#[derive(Debug, Clone)]
pub struct InputBlock<'a> {
    named_result: String,
    crystal: &'a Crystal,
    options: Option<&'a Options>,
    sub_commands: &'a [SubCommand],
    assertions: &'a [Assertion],
    structure_options: Option<Options>,
    comment: Option<String>,
}

impl<'a> InputBlock<'a> {
    pub fn new(named_result: impl Into<String>, crystal: &'a Crystal) -> Self {
        InputBlock {
            named_result: named_result.into(),
            crystal,
            options: None,
            sub_commands: &[],
            assertions: &[],
            structure_options: None,
            comment: None,
        }
    }

    pub fn options(mut self, options: &'a Options) -> Self {
        self.options = Some(options);
        self
    }

    pub fn sub_commands(mut self, sub_commands: &'a [SubCommand]) -> Self {
        self.sub_commands = sub_commands;
        self
    }

    pub fn assertions(mut self, assertions: &'a [Assertion]) -> Self {
        self.assertions = assertions;
        self
    }

    /// 写入 structure 命令内部的额外选项（如 `wrap_atoms`）
    pub fn structure_options(mut self, options: Options) -> Self {
        self.structure_options = Some(options);
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn named_result(&self) -> &str {
        &self.named_result
    }

    /// 渲染计算块；晶格数值按原样输出，不做单位换算
    pub fn render(&self) -> Result<String> {
        let structure = emit_structure(self.crystal, self.structure_options.as_ref())?;

        let mut settings = String::new();
        if let Some(options) = self.options {
            settings.push_str(&emit_options(options, 1));
        }
        settings.push_str(&emit_nested_commands(self.sub_commands, 1));

        let mut out = String::new();
        if let Some(comment) = self.comment.as_deref().filter(|c| !c.trim().is_empty()) {
            out.push_str(&comment_lines(comment));
            out.push('\n');
        }
        out.push_str(&format!("{} := xtb(\n", self.named_result));
        out.push_str(&indent_lines(&structure, 1));
        if !settings.is_empty() {
            out.push('\n');
            out.push_str(&settings);
        }
        out.push_str(")\n");
        out.push_str(&emit_assertions(&self.named_result, self.assertions));
        Ok(out)
    }
}

/// 注释文本，每行以 `!` 开头
pub fn comment_lines(text: &str) -> String {
    text.lines()
        .map(|line| {
            if line.trim_start().starts_with('!') {
                format!("{}\n", line)
            } else {
                format!("! {}\n", line)
            }
        })
        .collect()
}

/// 拼接多个计算块，块之间空一行
pub fn join_blocks(header: Option<&str>, blocks: &[String]) -> String {
    let mut out = String::new();
    if let Some(header) = header.filter(|h| !h.trim().is_empty()) {
        out.push_str(&comment_lines(header));
        out.push('\n');
    }
    out.push_str(&blocks.join("\n"));
    out
}

/// 单个计算块的完整输入：先将晶格换算为 bohr，再渲染
pub fn xtb_input_string(
    crystal: &Crystal,
    options: &Options,
    sub_commands: &[SubCommand],
    assertions: &[Assertion],
    named_result: Option<&str>,
    comment: Option<&str>,
) -> Result<String> {
    let crystal = normalize_to_bohr(crystal)?;
    let mut block = InputBlock::new(named_result.unwrap_or(DEFAULT_NAMED_RESULT), &crystal)
        .options(options)
        .sub_commands(sub_commands)
        .assertions(assertions);
    if let Some(comment) = comment {
        block = block.comment(comment);
    }
    block.render()
}
