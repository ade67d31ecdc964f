//! # 求解器选项数据模型
//!
//! 选项是有序的 `名称 -> (值, 单位)` 映射。插入顺序决定输出顺序，
//! 生成的输入文件因此可以逐字节复现。
//!
//! ## 依赖关系
//! - 被 `emit/options.rs`, `invariance/` 使用
//! - 使用 `models/value.rs`

use crate::error::{QdeckError, Result};
use crate::models::value::{format_float, Unit};

use serde::{Deserialize, Serialize};
use std::fmt;

/// 选项值（封闭的类型集合）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<OptionValue>),
}

impl OptionValue {
    /// 输出为求解器语法中的文本
    ///
    /// 布尔值为小写 `true`/`false`，列表保留方括号与逗号。
    pub fn render(&self) -> String {
        match self {
            OptionValue::Bool(b) => b.to_string(),
            OptionValue::Int(i) => i.to_string(),
            OptionValue::Float(x) => format_float(*x),
            OptionValue::Str(s) => s.clone(),
            OptionValue::List(items) => {
                let inner = items
                    .iter()
                    .map(|item| match item {
                        OptionValue::Str(s) => format!("'{}'", s),
                        other => other.render(),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("[{}]", inner)
            }
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl TryFrom<serde_json::Value> for OptionValue {
    type Error = QdeckError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        use serde_json::Value;

        // bool 必须先于数字判断
        match value {
            Value::Bool(b) => Ok(OptionValue::Bool(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(OptionValue::Int(i))
                } else if let Some(x) = n.as_f64() {
                    Ok(OptionValue::Float(x))
                } else {
                    Err(QdeckError::UnsupportedType(format!("number {}", n)))
                }
            }
            Value::String(s) => Ok(OptionValue::Str(s)),
            Value::Array(items) => items
                .into_iter()
                .map(OptionValue::try_from)
                .collect::<Result<Vec<_>>>()
                .map(OptionValue::List),
            Value::Null => Err(QdeckError::UnsupportedType("null".to_string())),
            Value::Object(_) => Err(QdeckError::UnsupportedType("object".to_string())),
        }
    }
}

impl From<OptionValue> for serde_json::Value {
    fn from(value: OptionValue) -> Self {
        use serde_json::Value;

        match value {
            OptionValue::Bool(b) => Value::Bool(b),
            OptionValue::Int(i) => Value::from(i),
            OptionValue::Float(x) => Value::from(x),
            OptionValue::Str(s) => Value::String(s),
            OptionValue::List(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<i32> for OptionValue {
    fn from(i: i32) -> Self {
        OptionValue::Int(i as i64)
    }
}

impl From<i64> for OptionValue {
    fn from(i: i64) -> Self {
        OptionValue::Int(i)
    }
}

impl From<f64> for OptionValue {
    fn from(x: f64) -> Self {
        OptionValue::Float(x)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Str(s.to_string())
    }
}

impl From<Vec<i64>> for OptionValue {
    fn from(items: Vec<i64>) -> Self {
        OptionValue::List(items.into_iter().map(OptionValue::Int).collect())
    }
}

/// 单个选项：值 + 单位
#[derive(Debug, Clone, PartialEq)]
pub struct Setting {
    pub value: OptionValue,
    pub unit: Unit,
}

impl Setting {
    pub fn new(value: impl Into<OptionValue>, unit: Unit) -> Self {
        Setting {
            value: value.into(),
            unit,
        }
    }

    pub fn plain(value: impl Into<OptionValue>) -> Self {
        Setting::new(value, Unit::Dimensionless)
    }
}

/// 序列化时的单项表示 `{name, value, unit}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingEntry {
    pub name: String,
    pub value: OptionValue,
    #[serde(default, skip_serializing_if = "Unit::is_dimensionless")]
    pub unit: Unit,
}

/// 有序选项集合
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<SettingEntry>", into = "Vec<SettingEntry>")]
pub struct Options {
    entries: Vec<(String, Setting)>,
}

impl Options {
    pub fn new() -> Self {
        Options::default()
    }

    /// 插入或替换；替换时保留原位置
    pub fn insert(&mut self, name: impl Into<String>, setting: Setting) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = setting,
            None => self.entries.push((name, setting)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, setting: Setting) -> Self {
        self.insert(name, setting);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Setting> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Setting)> {
        self.entries.iter().map(|(n, s)| (n.as_str(), s))
    }
}

impl From<Vec<SettingEntry>> for Options {
    fn from(entries: Vec<SettingEntry>) -> Self {
        let mut options = Options::new();
        for entry in entries {
            options.insert(entry.name, Setting::new(entry.value, entry.unit));
        }
        options
    }
}

impl From<Options> for Vec<SettingEntry> {
    fn from(options: Options) -> Self {
        options
            .entries
            .into_iter()
            .map(|(name, setting)| SettingEntry {
                name,
                value: setting.value,
                unit: setting.unit,
            })
            .collect()
    }
}

/// 子命令：命令名 -> 选项集合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCommand {
    pub name: String,
    #[serde(default)]
    pub options: Options,
}

/// xTB 二阶势的实空间求和方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PotentialType {
    Truncated,
    Full,
}

impl PotentialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PotentialType::Truncated => "truncated",
            PotentialType::Full => "full",
        }
    }

    /// 对应的 `potential_type` 选项
    pub fn to_setting(self) -> Setting {
        Setting::plain(self.as_str())
    }
}

impl fmt::Display for PotentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
