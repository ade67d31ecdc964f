//! # 带单位的物理量
//!
//! 所有物理量（晶格常数、角度、截断半径、温度）统一以 (数值, 单位) 的形式保存，
//! 避免单位混用。同时提供输入文件中数值字面量的格式化规则。
//!
//! ## 依赖关系
//! - 被 `models/crystal.rs`, `models/options.rs`, `emit/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};
use std::fmt;

/// 物理单位
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Unit {
    /// 无量纲（输出为空字符串）
    #[default]
    Dimensionless,
    Angstrom,
    Bohr,
    Degree,
    Radian,
    Kelvin,
    /// 其他求解器可识别的单位，原样输出
    Other(String),
}

impl Unit {
    pub fn as_str(&self) -> &str {
        match self {
            Unit::Dimensionless => "",
            Unit::Angstrom => "angstrom",
            Unit::Bohr => "bohr",
            Unit::Degree => "degree",
            Unit::Radian => "radian",
            Unit::Kelvin => "kelvin",
            Unit::Other(s) => s,
        }
    }

    pub fn is_length(&self) -> bool {
        matches!(self, Unit::Angstrom | Unit::Bohr)
    }

    pub fn is_angle(&self) -> bool {
        matches!(self, Unit::Degree | Unit::Radian)
    }

    pub fn is_dimensionless(&self) -> bool {
        matches!(self, Unit::Dimensionless)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Unit {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "" => Unit::Dimensionless,
            "angstrom" | "ang" => Unit::Angstrom,
            "bohr" => Unit::Bohr,
            "degree" | "degrees" | "deg" => Unit::Degree,
            "radian" | "radians" | "rad" => Unit::Radian,
            "kelvin" => Unit::Kelvin,
            _ => Unit::Other(s.trim().to_string()),
        }
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.as_str().to_string()
    }
}

/// 带单位的数值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    #[serde(default)]
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Quantity { value, unit }
    }

    pub fn angstrom(value: f64) -> Self {
        Quantity::new(value, Unit::Angstrom)
    }

    pub fn bohr(value: f64) -> Self {
        Quantity::new(value, Unit::Bohr)
    }

    pub fn degree(value: f64) -> Self {
        Quantity::new(value, Unit::Degree)
    }
}

/// 四舍五入到指定小数位
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    let rounded = (value * factor).round() / factor;
    // 避免输出 "-0.0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// 浮点数的文本形式
///
/// 取最短可往返的十进制表示；整数值保留 `.0` 后缀，
/// 绝对值小于 1e-4 或不小于 1e16 时使用两位指数（如 `1e-06`）。
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return if value.is_nan() {
            "nan".to_string()
        } else if value > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", value);
        let (mantissa, exponent) = formatted
            .split_once('e')
            .unwrap_or((formatted.as_str(), "0"));
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };
        return format!("{}e{}{:0>2}", mantissa, sign, digits);
    }

    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// 先四舍五入再格式化
pub fn format_rounded(value: f64, precision: u32) -> String {
    format_float(round_to(value, precision))
}
