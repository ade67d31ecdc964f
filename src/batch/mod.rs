//! # 批量处理模块
//!
//! 批量生成测试集输入文件。
//!
//! ## 功能
//! - 自动检测输入类型（文件/目录）
//! - 收集匹配文件列表
//! - 并行处理，单个文件失败不影响其余文件
//! - 进度反馈与统计
//!
//! ## 依赖关系
//! - 被 `commands/generate.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;

pub use collector::FileCollector;
pub use runner::{BatchRunner, ProcessResult};
