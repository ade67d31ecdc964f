//! # 断言评估
//!
//! 将输入文本中的断言与求解器结果逐条比对，得到 `Pass` / `Fail` / `NoData`。
//! `NoData` 表示求解器没有给出该变量，和结果为 0 是两回事。
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 使用
//! - 使用 `solver/deck.rs`, `solver/runner.rs`

use crate::solver::deck::BoundAssertion;
use crate::solver::runner::SolverResults;

use std::fmt;

/// 单条断言的评估结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
    NoData,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Pass => "pass",
            Outcome::Fail => "fail",
            Outcome::NoData => "no data",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssertionCheck {
    pub bound: BoundAssertion,
    pub actual: Option<f64>,
    pub outcome: Outcome,
}

/// 逐条评估断言
pub fn evaluate(assertions: &[BoundAssertion], results: &SolverResults) -> Vec<AssertionCheck> {
    assertions
        .iter()
        .map(|bound| {
            let actual = results.get(&bound.named_result, &bound.assertion.variable);
            let outcome = match actual {
                None => Outcome::NoData,
                Some(value) if bound.assertion.is_satisfied_by(value) => Outcome::Pass,
                Some(_) => Outcome::Fail,
            };
            AssertionCheck {
                bound: bound.clone(),
                actual,
                outcome,
            }
        })
        .collect()
}

/// 评估汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub passed: usize,
    pub failed: usize,
    pub no_data: usize,
}

impl CheckSummary {
    pub fn from_checks(checks: &[AssertionCheck]) -> Self {
        let mut summary = CheckSummary::default();
        for check in checks {
            match check.outcome {
                Outcome::Pass => summary.passed += 1,
                Outcome::Fail => summary.failed += 1,
                Outcome::NoData => summary.no_data += 1,
            }
        }
        summary
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.no_data == 0
    }
}

/// 每个计算块的每原子能量
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyPerAtom {
    pub named_result: String,
    pub n_atoms: usize,
    pub energy: Option<f64>,
}

impl EnergyPerAtom {
    pub fn per_atom(&self) -> Option<f64> {
        if self.n_atoms == 0 {
            return None;
        }
        self.energy.map(|e| e / self.n_atoms as f64)
    }
}

/// 原子数不全相同时（超胞测试）才有比较意义，否则返回空
pub fn energy_per_atom(
    atom_counts: &[(String, usize)],
    results: &SolverResults,
    variable: &str,
) -> Vec<EnergyPerAtom> {
    let first = atom_counts.first().map(|(_, n)| *n);
    if atom_counts.iter().all(|(_, n)| Some(*n) == first) {
        return Vec::new();
    }

    atom_counts
        .iter()
        .map(|(name, n_atoms)| EnergyPerAtom {
            named_result: name.clone(),
            n_atoms: *n_atoms,
            energy: results.get(name, variable),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assertion::Assertion;

    fn bound(nr: &str, assertion: Assertion) -> BoundAssertion {
        BoundAssertion {
            named_result: nr.to_string(),
            assertion,
        }
    }

    fn results() -> SolverResults {
        SolverResults::from_json(
            r#"{"si": {"energy": -7.5, "n_iter": 0}, "si_2": {"energy": -60.0}, "si_x": {}}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_evaluate() {
        let assertions = vec![
            bound("si", Assertion::within("energy", -7.5000001, 1e-6)),
            bound("si", Assertion::exact("n_iter", 1i64)),
            bound("si_x", Assertion::exact("energy", 0i64)),
        ];
        let checks = evaluate(&assertions, &results());
        let outcomes: Vec<Outcome> = checks.iter().map(|c| c.outcome).collect();
        assert_eq!(outcomes, [Outcome::Pass, Outcome::Fail, Outcome::NoData]);
        assert_eq!(checks[1].actual, Some(0.0));

        let summary = CheckSummary::from_checks(&checks);
        assert_eq!(summary, CheckSummary { passed: 1, failed: 1, no_data: 1 });
        assert!(!summary.all_passed());
    }

    #[test]
    fn test_zero_is_not_missing() {
        let checks = evaluate(&[bound("si", Assertion::exact("n_iter", 0i64))], &results());
        assert_eq!(checks[0].outcome, Outcome::Pass);
    }

    #[test]
    fn test_energy_per_atom() {
        let counts = vec![("si".to_string(), 2), ("si_2".to_string(), 16)];
        let rows = energy_per_atom(&counts, &results(), "energy");
        assert_eq!(rows.len(), 2);
        assert!((rows[0].per_atom().unwrap() + 3.75).abs() < 1e-12);
        assert!((rows[1].per_atom().unwrap() + 3.75).abs() < 1e-12);

        let same = vec![("si".to_string(), 2), ("si_x".to_string(), 2)];
        assert!(energy_per_atom(&same, &results(), "energy").is_empty());
    }
}
