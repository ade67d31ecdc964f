//! # 输入文件回读
//!
//! 从已生成的输入文本中提取命名结果、断言与每个计算块的原子数。
//!
//! ## 依赖关系
//! - 被 `solver/runner.rs`, `solver/report.rs`, `commands/run.rs` 使用
//! - 使用 `models/assertion.rs`

use crate::error::{QdeckError, Result};
use crate::models::assertion::{Assertion, Number};

use regex::Regex;

const NAMED_RESULT_PATTERN: &str = r"(?m)^\s*([A-Za-z_][A-Za-z0-9_]*)\s*:=\s*xtb\(";
const ASSERTION_PATTERN: &str = r"assert\(\s*load\s*=\s*(\S+)\s+variable\s*=\s*(\S+)\s+value\s*=\s*([^\s)]+)(?:\s+margin\s*=\s*([^\s)]+))?\s*\)";
const ATOM_PATTERN: &str = r"\['[A-Za-z][A-Za-z0-9_]*'\s*,";

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| QdeckError::InvalidArgument(e.to_string()))
}

/// 所有 `<name> := xtb(` 的命名结果，按出现顺序
pub fn extract_named_results(deck: &str) -> Vec<String> {
    match compile(NAMED_RESULT_PATTERN) {
        Ok(re) => re
            .captures_iter(deck)
            .map(|cap| cap[1].to_string())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// 断言及其绑定的命名结果
#[derive(Debug, Clone, PartialEq)]
pub struct BoundAssertion {
    pub named_result: String,
    pub assertion: Assertion,
}

/// 解析输入文本中的全部断言
pub fn parse_assertions(deck: &str) -> Result<Vec<BoundAssertion>> {
    let re = compile(ASSERTION_PATTERN)?;

    re.captures_iter(deck)
        .map(|cap| {
            let number = |text: &str| {
                Number::parse(text).ok_or_else(|| QdeckError::ParseError {
                    format: "deck".to_string(),
                    path: cap[1].to_string(),
                    reason: format!("invalid number '{}' in assertion", text),
                })
            };
            let value = number(&cap[3])?;
            let margin = cap.get(4).map(|m| number(m.as_str())).transpose()?;

            Ok(BoundAssertion {
                named_result: cap[1].to_string(),
                assertion: Assertion {
                    variable: cap[2].to_string(),
                    value,
                    margin,
                },
            })
        })
        .collect()
}

/// 每个计算块的原子数（按命名结果顺序）
pub fn atom_counts(deck: &str) -> Result<Vec<(String, usize)>> {
    let heads = compile(NAMED_RESULT_PATTERN)?;
    let atoms = compile(ATOM_PATTERN)?;

    let starts: Vec<(usize, String)> = heads
        .captures_iter(deck)
        .filter_map(|cap| Some((cap.get(0)?.start(), cap[1].to_string())))
        .collect();

    Ok(starts
        .iter()
        .enumerate()
        .map(|(i, (start, name))| {
            let end = starts.get(i + 1).map_or(deck.len(), |(next, _)| *next);
            (name.clone(), atoms.find_iter(&deck[*start..end]).count())
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECK: &str = "! Translational invariance

si_no_shift := xtb(
 structure(
  fractional= [['Si', 0.0, 0.0, 0.0],
               ['Si', 0.25, 0.25, 0.25]]
  lattice(
   a = 10.25932 bohr
   bravais = fcc
  )
 )

 h0_cutoff = 40 bohr
)
assert(load = si_no_shift variable = n_iter value = 12)
assert(load = si_no_shift variable = energy value = -7.5 margin = 1e-06)

si_supercell := xtb(
 structure(
  fractional= [['Si', 0.0, 0.0, 0.0],
               ['Si', 0.5, 0.0, 0.0],
               ['Si', 0.125, 0.125, 0.125],
               ['Si', 0.625, 0.125, 0.125]]
  lattice(
   a = 20.51865 bohr
   bravais = fcc
  )
 )
)
";

    #[test]
    fn test_extract_named_results() {
        assert_eq!(extract_named_results(DECK), ["si_no_shift", "si_supercell"]);
        assert!(extract_named_results("! nothing here").is_empty());
    }

    #[test]
    fn test_parse_assertions() {
        let parsed = parse_assertions(DECK).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].named_result, "si_no_shift");
        assert_eq!(parsed[0].assertion, Assertion::exact("n_iter", 12i64));
        assert_eq!(parsed[1].assertion, Assertion::within("energy", -7.5, 1e-6));
    }

    #[test]
    fn test_atom_counts() {
        let counts = atom_counts(DECK).unwrap();
        assert_eq!(
            counts,
            [("si_no_shift".to_string(), 2), ("si_supercell".to_string(), 4)]
        );
    }
}
