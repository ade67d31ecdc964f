//! # 断言输出
//!
//! 每条断言一行，绑定到一个命名结果：
//! `assert(load = <named_result> variable = <name> value = <value> [margin = <margin>])`
//!
//! ## 依赖关系
//! - 被 `emit/deck.rs`, `invariance/` 使用
//! - 使用 `models/assertion.rs`

use crate::models::assertion::Assertion;

pub fn assertion_line(named_result: &str, assertion: &Assertion) -> String {
    let mut line = format!(
        "assert(load = {} variable = {} value = {}",
        named_result, assertion.variable, assertion.value
    );
    if let Some(margin) = assertion.margin {
        line.push_str(&format!(" margin = {}", margin));
    }
    line.push(')');
    line
}

pub fn emit_assertions(named_result: &str, assertions: &[Assertion]) -> String {
    assertions
        .iter()
        .map(|a| format!("{}\n", assertion_line(named_result, a)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assertions() -> Vec<Assertion> {
        vec![
            Assertion::exact("n_iter", 17i64),
            Assertion::within("energy", -69.056517465, 1e-5),
        ]
    }

    #[test]
    fn test_emit_assertions() {
        let text = emit_assertions("SiO2_rotation1", &assertions());
        assert_eq!(
            text,
            "assert(load = SiO2_rotation1 variable = n_iter value = 17)\n\
             assert(load = SiO2_rotation1 variable = energy value = -69.056517465 margin = 1e-05)\n"
        );
    }

    #[test]
    fn test_only_named_result_differs() {
        let first = emit_assertions("si_no_shift", &assertions());
        let second = emit_assertions("si_shift", &assertions());

        for (a, b) in first.lines().zip(second.lines()) {
            let diff: Vec<(&str, &str)> = a
                .split_whitespace()
                .zip(b.split_whitespace())
                .filter(|(x, y)| x != y)
                .collect();
            assert_eq!(diff, [("si_no_shift", "si_shift")]);
        }
        assert_eq!(first.lines().count(), second.lines().count());
    }
}
