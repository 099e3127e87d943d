//! Attribute values produced by projectors

use serde::{Deserialize, Serialize};
use serde_json::Value;
use trellis_core::Color;

/// Mark shapes understood by the symbol drawer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolKind {
    #[default]
    Circle,
    Square,
    Cross,
    Diamond,
    TriangleUp,
    TriangleDown,
}

impl SymbolKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "circle" => SymbolKind::Circle,
            "square" => SymbolKind::Square,
            "cross" => SymbolKind::Cross,
            "diamond" => SymbolKind::Diamond,
            "triangle-up" => SymbolKind::TriangleUp,
            "triangle-down" => SymbolKind::TriangleDown,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            SymbolKind::Circle => "circle",
            SymbolKind::Square => "square",
            SymbolKind::Cross => "cross",
            SymbolKind::Diamond => "diamond",
            SymbolKind::TriangleUp => "triangle-up",
            SymbolKind::TriangleDown => "triangle-down",
        }
    }
}

/// Value of one visual attribute for one datum
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Number(f64),
    Text(String),
    Color(Color),
    Symbol(SymbolKind),
}

impl AttrValue {
    /// Convert a raw record value; numbers stay numbers, anything else becomes text
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => AttrValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::Bool(b) => AttrValue::Number(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => AttrValue::Text(s.clone()),
            Value::Null => AttrValue::Number(f64::NAN),
            other => AttrValue::Text(other.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            AttrValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            AttrValue::Color(c) => Some(*c),
            AttrValue::Text(s) => Color::parse_hex(s).ok(),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<SymbolKind> {
        match self {
            AttrValue::Symbol(s) => Some(*s),
            AttrValue::Text(s) => SymbolKind::from_name(s),
            _ => None,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Number(v)
    }
}

impl From<Color> for AttrValue {
    fn from(c: Color) -> Self {
        AttrValue::Color(c)
    }
}

impl From<SymbolKind> for AttrValue {
    fn from(s: SymbolKind) -> Self {
        AttrValue::Symbol(s)
    }
}

/// Numeric reading of a raw record value (`"3"` -> 3, `true` -> 1)
pub fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => f64::NAN,
    }
}

/// Category label for a raw record value
pub fn coerce_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
