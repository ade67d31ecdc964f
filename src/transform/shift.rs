//! # 刚性平移
//!
//! 对所有分数坐标分量加上同一标量。平移后的分量可能超出 [0, 1]，
//! 记录中的坐标保持原值不做截断，由输出端通过 `wrap_atoms` 通知求解器。
//!
//! ## 依赖关系
//! - 被 `transform/mod.rs`, `invariance/` 使用
//! - 使用 `models/crystal.rs`

use crate::error::{QdeckError, Result};
use crate::models::crystal::{Crystal, Positions};

/// 对分数坐标做刚性平移
pub fn shift_positions(crystal: &Crystal, delta: f64) -> Result<Crystal> {
    if !crystal.positions().is_fractional() {
        return Err(QdeckError::PositionsNotFractional);
    }
    if delta.abs() > 1.0 {
        log::warn!(
            "Magnitude of position shift {} exceeds 1 while using fractional coordinates",
            delta
        );
    }

    let shifted = crystal
        .positions()
        .map(|p| [p[0] + delta, p[1] + delta, p[2] + delta]);
    crystal.clone().with_positions(shifted)
}

/// 检查所有分数坐标分量都在 [0, 1] 内
///
/// 每个越界原子记录一条警告。笛卡尔坐标没有范围约束，总是返回 `true`。
pub fn validate_positions(named_result: &str, positions: &Positions) -> bool {
    let Positions::Fractional(coords) = positions else {
        return true;
    };

    let mut all_in_cell = true;
    for (i, p) in coords.iter().enumerate() {
        if p.iter().any(|&x| x < 0.0) {
            log::warn!(
                "Component(s) of atom position {} of {} below 0: {:?}",
                i,
                named_result,
                p
            );
            all_in_cell = false;
        } else if p.iter().any(|&x| x > 1.0) {
            log::warn!(
                "Component(s) of atom position {} of {} exceed 1: {:?}",
                i,
                named_result,
                p
            );
            all_in_cell = false;
        }
    }
    all_in_cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::crystal::{LatticeKey, LatticeParameters};
    use crate::models::value::Quantity;

    fn crystal(positions: Positions) -> Crystal {
        let species = vec!["Si".to_string(); positions.coords().len()];
        let params = LatticeParameters::from([(LatticeKey::A, Quantity::angstrom(5.429))]);
        Crystal::new(species, positions, params).unwrap()
    }

    #[test]
    fn test_shift_and_back() {
        let base = crystal(Positions::Fractional(vec![
            [0.0, 0.0, 0.0],
            [0.25, 0.25, 0.25],
        ]));
        for s in [0.0, 0.05, 0.24, 0.43, 0.99] {
            let there = shift_positions(&base, s).unwrap();
            let back = shift_positions(&there, -s).unwrap();
            for (p, q) in back.positions().coords().iter().zip(base.positions().coords()) {
                for i in 0..3 {
                    assert!((p[i] - q[i]).abs() < 1e-12, "shift {}", s);
                }
            }
        }
    }

    #[test]
    fn test_shift_does_not_touch_input() {
        let base = crystal(Positions::Fractional(vec![[0.1, 0.2, 0.3]]));
        let _ = shift_positions(&base, 0.5).unwrap();
        assert_eq!(base.positions().coords()[0], [0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_shift_rejects_cartesian() {
        let base = crystal(Positions::Cartesian(vec![[0.0, 0.0, 0.0]]));
        assert!(matches!(
            shift_positions(&base, 0.1),
            Err(QdeckError::PositionsNotFractional)
        ));
    }

    #[test]
    fn test_wrap_detection() {
        let out = crystal(Positions::Fractional(vec![[0.9, 0.95, 0.99]]));
        let shifted = shift_positions(&out, 0.2).unwrap();
        assert!(!validate_positions("out", shifted.positions()));

        let inside = crystal(Positions::Fractional(vec![[0.1, 0.2, 0.3]]));
        let shifted = shift_positions(&inside, 0.05).unwrap();
        assert!(validate_positions("inside", shifted.positions()));

        let below = crystal(Positions::Fractional(vec![[0.0, 0.5, 0.5]]));
        let shifted = shift_positions(&below, -0.1).unwrap();
        assert!(!validate_positions("below", shifted.positions()));
    }

    #[test]
    fn test_cartesian_positions_always_valid() {
        let positions = Positions::Cartesian(vec![[-3.0, 12.0, 0.0]]);
        assert!(validate_positions("xyz", &positions));
    }
}
