//! # 几何变换模块
//!
//! 对晶体记录做刚性平移、晶格旋转与超胞扩展。所有变换都是纯函数：
//! 接收 `&Crystal`，返回新的 `Crystal`，从不修改调用方持有的记录。
//!
//! ## 依赖关系
//! - 被 `invariance/` 使用
//! - 使用 `models/`, `lattice/`
//! - 子模块: shift, rotate, supercell

pub mod rotate;
pub mod shift;
pub mod supercell;

pub use rotate::rotate;
pub use shift::{shift_positions, validate_positions};
pub use supercell::expand;

use crate::error::{QdeckError, Result};

/// 将变换参数解析为三元组，分量数不为 3 时报错
pub fn parse_triple<T: Copy>(values: &[T]) -> Result<[T; 3]> {
    match values {
        [x, y, z] => Ok([*x, *y, *z]),
        _ => Err(QdeckError::TransformArity {
            expected: 3,
            got: values.len(),
        }),
    }
}
