//! # 求解器接口
//!
//! - `runner` - 调用外部求解器并解析 JSON 结果
//! - `deck` - 从输入文本中回读命名结果与断言
//! - `report` - 断言评估与每原子能量
//!
//! ## 依赖关系
//! - 被 `commands/run.rs` 使用

pub mod deck;
pub mod report;
pub mod runner;

pub use deck::{atom_counts, parse_assertions};
pub use report::{energy_per_atom, evaluate, AssertionCheck, CheckSummary, Outcome};
pub use runner::SolverRunner;
