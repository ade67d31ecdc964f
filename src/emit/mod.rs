//! # 输入文本生成模块
//!
//! 将晶体、选项与断言渲染为求解器的输入语法。输出只依赖输入数据，
//! 同样的输入总是得到逐字节相同的文本。
//!
//! ## 依赖关系
//! - 被 `invariance/`, `commands/` 使用
//! - 使用 `models/`, `lattice/`
//! - 子模块: structure, options, assertions, deck

pub mod assertions;
pub mod deck;
pub mod options;
pub mod structure;

/// 给每个非空行加上 `indent` 个空格
pub(crate) fn indent_lines(text: &str, indent: usize) -> String {
    let pad = " ".repeat(indent);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                "\n".to_string()
            } else {
                format!("{}{}\n", pad, line)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_lines() {
        assert_eq!(indent_lines("a\n\nb(\n c\n)\n", 2), "  a\n\n  b(\n   c\n  )\n");
        assert_eq!(indent_lines("", 1), "");
    }
}
