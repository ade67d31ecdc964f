//! # 选项与子命令输出
//!
//! 选项输出为 `name = value unit`，无量纲时省略单位。
//! 子命令输出为 `name(` ... `)`，选项对齐到括号之后。
//!
//! ## 依赖关系
//! - 被 `emit/structure.rs`, `emit/deck.rs` 使用
//! - 使用 `models/options.rs`

use crate::models::options::{Options, Setting, SubCommand};

/// 单个选项行（不含缩进与换行）
pub fn option_line(name: &str, setting: &Setting) -> String {
    let value = setting.value.render();
    if setting.unit.is_dimensionless() {
        format!("{} = {}", name, value)
    } else {
        format!("{} = {} {}", name, value, setting.unit)
    }
}

/// 按插入顺序输出全部选项，每行前加 `indent` 个空格
pub fn emit_options(options: &Options, indent: usize) -> String {
    let pad = " ".repeat(indent);
    options
        .iter()
        .map(|(name, setting)| format!("{}{}\n", pad, option_line(name, setting)))
        .collect()
}

/// 输出一组并列的子命令
///
/// ```text
///  scf(
///      max_iter = 100
///  )
/// ```
pub fn emit_nested_commands(commands: &[SubCommand], indent: usize) -> String {
    let pad = " ".repeat(indent);
    let mut out = String::new();

    for command in commands {
        out.push_str(&format!("{}{}(\n", pad, command.name));
        out.push_str(&emit_options(&command.options, indent + command.name.len() + 1));
        out.push_str(&format!("{})\n", pad));
    }
    out
}
