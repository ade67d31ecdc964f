//! # 统一错误处理模块
//!
//! 定义 qdeck 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// qdeck 统一错误类型
#[derive(Error, Debug)]
pub enum QdeckError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // 晶体数据结构错误
    // ─────────────────────────────────────────────────────────────
    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("Ambiguous position representation: both 'fractional' and 'xyz' are set")]
    AmbiguousPositions,

    #[error("Missing position representation: expected 'fractional' or 'xyz'")]
    MissingPositions,

    #[error("Need either bravais or space group to describe the lattice")]
    MissingLatticeDescription,

    #[error("Lattice parameter '{key}' is required by bravais lattice '{bravais}'")]
    MissingLatticeParameter { bravais: String, key: String },

    #[error("Lattice parameter '{key}' is superfluous for bravais lattice '{bravais}'")]
    SuperfluousLatticeParameter { bravais: String, key: String },

    #[error("Inconsistent units: {0}")]
    InconsistentUnits(String),

    #[error("Space group number {0} is outside 1-230")]
    InvalidSpaceGroup(u32),

    #[error("Choice of bravais lattice is not valid: {0}")]
    UnknownBravais(String),

    #[error("Unsupported type in option value: {0}")]
    UnsupportedType(String),

    // ─────────────────────────────────────────────────────────────
    // 几何变换错误
    // ─────────────────────────────────────────────────────────────
    #[error("A fractional shift requires fractional positions")]
    PositionsNotFractional,

    #[error("Transform requires explicit lattice vectors on the crystal")]
    MissingLatticeVectors,

    #[error("Transform parameter has {got} components, expected {expected}")]
    TransformArity { expected: usize, got: usize },

    #[error("Unsupported supercell expansion: {0}")]
    UnsupportedSupercell(String),

    // ─────────────────────────────────────────────────────────────
    // 测试生成错误
    // ─────────────────────────────────────────────────────────────
    #[error("Got {got} comments for {expected} input blocks")]
    CommentCountMismatch { expected: usize, got: usize },

    #[error("Test '{0}' needs at least one transform or option value")]
    EmptyTransformList(String),

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found")]
    CommandNotFound { command: String },

    #[error("External command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("No matching files found with pattern: {pattern}")]
    NoFilesFound { pattern: String },
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, QdeckError>;
