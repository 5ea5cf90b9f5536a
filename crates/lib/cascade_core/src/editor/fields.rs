//! Field metadata: what kind of value each editable field takes, and how raw
//! widget input is coerced into it.

use std::collections::HashMap;

use super::EditorError;

/// Value kind of an editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Boolean,
    /// Non-negative whole number.
    Integer,
    Text,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Boolean => "boolean",
            FieldKind::Integer => "integer",
            FieldKind::Text => "text",
        }
    }

    /// Coerce raw input into a value of this kind.
    pub fn coerce(self, field: &str, input: FieldInput) -> Result<FieldValue, EditorError> {
        let invalid = |reason: String| EditorError::InvalidValue {
            field: field.to_string(),
            reason,
        };
        match (self, input) {
            (FieldKind::Boolean, FieldInput::Toggle(b) | FieldInput::Checkbox(b)) => {
                Ok(FieldValue::Boolean(b))
            }
            (FieldKind::Boolean, FieldInput::Text(s)) => parse_flag(&s)
                .map(FieldValue::Boolean)
                .ok_or_else(|| invalid(format!("expected true or false, got '{s}'"))),
            (FieldKind::Integer, FieldInput::Number(n)) => u32::try_from(n)
                .map(FieldValue::Integer)
                .map_err(|_| invalid(format!("expected a non-negative whole number, got {n}"))),
            (FieldKind::Integer, FieldInput::Text(s)) => s
                .trim()
                .parse::<u32>()
                .map(FieldValue::Integer)
                .map_err(|_| invalid(format!("expected a non-negative whole number, got '{s}'"))),
            (FieldKind::Text, FieldInput::Text(s)) => Ok(FieldValue::Text(s)),
            (FieldKind::Text, FieldInput::Number(n)) => Ok(FieldValue::Text(n.to_string())),
            (kind, input) => Err(invalid(format!(
                "{} input does not fit a {} field",
                input.as_str(),
                kind.as_str()
            ))),
        }
    }
}

/// Raw input as delivered by an editing control.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    /// Binary toggle switch.
    Toggle(bool),
    Checkbox(bool),
    Number(i64),
    Text(String),
}

impl FieldInput {
    fn as_str(&self) -> &'static str {
        match self {
            FieldInput::Toggle(_) => "toggle",
            FieldInput::Checkbox(_) => "checkbox",
            FieldInput::Number(_) => "number",
            FieldInput::Text(_) => "text",
        }
    }
}

impl From<&str> for FieldInput {
    fn from(s: &str) -> Self {
        FieldInput::Text(s.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(s: String) -> Self {
        FieldInput::Text(s)
    }
}

/// Coerced field value, ready to be stored on a record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Boolean(bool),
    Integer(u32),
    Text(String),
}

/// Source of described data types, keyed by field API name.
pub trait DataTypeLookup {
    fn data_type_for(&self, api_name: &str) -> Option<&str>;
}

impl DataTypeLookup for HashMap<String, String> {
    fn data_type_for(&self, api_name: &str) -> Option<&str> {
        self.get(api_name).map(String::as_str)
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
