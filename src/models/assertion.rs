//! # 断言数据模型
//!
//! 断言绑定到一个命名结果，检查某个计算量是否等于期望值（可带容差）。
//!
//! ## 依赖关系
//! - 被 `emit/assertions.rs`, `invariance/`, `solver/` 使用
//! - 使用 `models/value.rs`

use crate::models::value::format_float;

use serde::{Deserialize, Serialize};
use std::fmt;

/// 断言中的数值：整数原样输出，浮点数使用统一的格式
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Number::Int(i) => i as f64,
            Number::Float(x) => x,
        }
    }

    /// 解析断言文本中的数值字面量
    pub fn parse(text: &str) -> Option<Number> {
        if let Ok(i) = text.parse::<i64>() {
            return Some(Number::Int(i));
        }
        text.parse::<f64>().ok().map(Number::Float)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(x) => f.write_str(&format_float(*x)),
        }
    }
}

impl From<i64> for Number {
    fn from(i: i64) -> Self {
        Number::Int(i)
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Number::Float(x)
    }
}

/// 单条断言
///
/// `margin` 为 `None` 时要求精确相等（常用于平凡为零的检查）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    pub variable: String,
    pub value: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<Number>,
}

impl Assertion {
    /// 判断计算值是否满足断言
    pub fn is_satisfied_by(&self, actual: f64) -> bool {
        let expected = self.value.as_f64();
        match self.margin {
            Some(margin) => (actual - expected).abs() <= margin.as_f64(),
            None => actual == expected,
        }
    }
}

#[cfg(test)]
impl Assertion {
    pub fn exact(variable: impl Into<String>, value: impl Into<Number>) -> Self {
        Assertion {
            variable: variable.into(),
            value: value.into(),
            margin: None,
        }
    }

    pub fn within(
        variable: impl Into<String>,
        value: impl Into<Number>,
        margin: impl Into<Number>,
    ) -> Self {
        Assertion {
            variable: variable.into(),
            value: value.into(),
            margin: Some(margin.into()),
        }
    }
}
