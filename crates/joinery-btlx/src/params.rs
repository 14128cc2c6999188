//! Process parameters: raw input bundles and typed, formatted output fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::format::{format_fixed, format_flag};
use crate::settings::BtlxSettings;
use crate::{BtlxError, Result};

/// One value in a parameter bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A length, position or angle.
    Number(f64),
    /// A yes/no switch.
    Flag(bool),
    /// A categorical value.
    Text(String),
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Flag(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

/// Named input values for building a process, keyed by schema field name.
///
/// Accessors report an absent field as [`BtlxError::MissingParameter`]; no
/// field is ever defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterBundle {
    values: BTreeMap<String, ParamValue>,
}

impl ParameterBundle {
    /// Empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, name: &str, value: impl Into<ParamValue>) -> &mut Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    /// Set a field when `value` is present.
    pub fn insert_opt<V: Into<ParamValue>>(&mut self, name: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.insert(name, value);
        }
        self
    }

    /// Whether a field is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    fn get(&self, process: &'static str, name: &'static str) -> Result<&ParamValue> {
        self.values.get(name).ok_or(BtlxError::MissingParameter {
            process,
            parameter: name,
        })
    }

    /// A numeric field.
    pub fn number(&self, process: &'static str, name: &'static str) -> Result<f64> {
        match self.get(process, name)? {
            ParamValue::Number(v) if v.is_finite() => Ok(*v),
            other => Err(wrong_kind(process, name, "a finite number", other)),
        }
    }

    /// A yes/no field.
    pub fn flag(&self, process: &'static str, name: &'static str) -> Result<bool> {
        match self.get(process, name)? {
            ParamValue::Flag(v) => Ok(*v),
            other => Err(wrong_kind(process, name, "a flag", other)),
        }
    }

    /// A categorical field.
    pub fn text(&self, process: &'static str, name: &'static str) -> Result<String> {
        match self.get(process, name)? {
            ParamValue::Text(v) => Ok(v.clone()),
            other => Err(wrong_kind(process, name, "text", other)),
        }
    }
}

fn wrong_kind(process: &str, name: &str, expected: &str, got: &ParamValue) -> BtlxError {
    BtlxError::InvalidParameter(format!("{process} parameter {name} must be {expected}, got {got:?}"))
}

/// A typed output field of a process schema.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Printed with the point precision.
    Length(f64),
    /// Printed with the angle precision.
    Angle(f64),
    /// Printed as `yes` / `no`.
    Flag(bool),
    /// Printed verbatim.
    Text(String),
}

impl FieldValue {
    /// Render with the precisions from `settings`.
    pub fn render(&self, settings: &BtlxSettings) -> String {
        match self {
            FieldValue::Length(v) => format_fixed(*v, settings.point_precision),
            FieldValue::Angle(v) => format_fixed(*v, settings.angle_precision),
            FieldValue::Flag(v) => format_flag(*v).to_string(),
            FieldValue::Text(v) => v.clone(),
        }
    }
}

/// A process schema field: name plus typed value, in declared order.
pub type Field = (&'static str, FieldValue);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_is_reported() {
        let mut bundle = ParameterBundle::new();
        bundle.insert("StartX", 0.5).insert_opt::<f64>("Length", None);
        assert_eq!(bundle.number("Lap", "StartX").unwrap(), 0.5);
        let err = bundle.number("Lap", "Length").unwrap_err();
        assert!(matches!(
            err,
            BtlxError::MissingParameter {
                process: "Lap",
                parameter: "Length"
            }
        ));
        assert!(err.to_string().contains("Length"));
    }

    #[test]
    fn test_wrong_kind_is_invalid() {
        let mut bundle = ParameterBundle::new();
        bundle.insert("Shape", true);
        assert!(matches!(
            bundle.text("DovetailTenon", "Shape"),
            Err(BtlxError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_bundle_from_json() {
        let bundle: ParameterBundle =
            serde_json::from_str(r#"{"values":{"Angle":45.0,"UseFlankAngle":false,"Shape":"square"}}"#).unwrap();
        assert_eq!(bundle.number("X", "Angle").unwrap(), 45.0);
        assert!(!bundle.flag("X", "UseFlankAngle").unwrap());
        assert_eq!(bundle.text("X", "Shape").unwrap(), "square");
    }

    #[test]
    fn test_render_uses_settings_precision() {
        let settings = BtlxSettings {
            angle_precision: 1,
            ..BtlxSettings::default()
        };
        assert_eq!(FieldValue::Length(0.02).render(&settings), "0.020");
        assert_eq!(FieldValue::Angle(89.96).render(&settings), "90.0");
        assert_eq!(FieldValue::Flag(true).render(&settings), "yes");
    }
}
