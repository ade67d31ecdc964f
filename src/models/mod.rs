//! # 数据模型模块
//!
//! 定义晶体记录、带单位的物理量、求解器选项与断言。
//!
//! ## 依赖关系
//! - 被 `lattice/`, `transform/`, `emit/`, `invariance/`, `parsers/`, `commands/` 使用
//! - 子模块: value, crystal, structure, options, assertion

pub mod assertion;
pub mod crystal;
pub mod options;
pub mod structure;
pub mod value;
