//! Argument Schemas
//!
//! Typed argument declarations for catalogue operations. A schema validates
//! the loosely-typed argument map an LLM produced, coerces it into canonical
//! [`Arguments`], and projects itself into the closed JSON Schema object that
//! framework adapters hand to the host framework.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value, json};

use crate::error::{Result, ToolkitError};

/// Primitive type of a single argument
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
}

impl FieldType {
    /// JSON Schema type keyword
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

/// Declaration of one named argument
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    /// Argument name
    pub name: &'static str,

    /// Primitive type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Human-readable description (shown to the LLM)
    pub description: &'static str,

    /// Whether the argument must be present
    pub required: bool,

    /// Inclusive lower bound for integers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,

    /// Inclusive upper bound for integers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<i64>,
}

impl FieldSchema {
    pub const fn required(name: &'static str, field_type: FieldType, description: &'static str) -> Self {
        Self {
            name,
            field_type,
            description,
            required: true,
            minimum: None,
            maximum: None,
        }
    }

    pub const fn optional(name: &'static str, field_type: FieldType, description: &'static str) -> Self {
        Self {
            name,
            field_type,
            description,
            required: false,
            minimum: None,
            maximum: None,
        }
    }

    /// Restrict an integer field to `minimum..=maximum`
    #[must_use]
    pub const fn range(mut self, minimum: i64, maximum: i64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    /// Coerce a raw value into this field's canonical shape
    fn coerce(&self, value: &Value) -> std::result::Result<Value, String> {
        let coerced = match (self.field_type, value) {
            (FieldType::String, Value::String(_))
            | (FieldType::Number, Value::Number(_))
            | (FieldType::Boolean, Value::Bool(_)) => Some(value.clone()),
            (FieldType::Integer, Value::Number(n)) => integer_from_number(n).map(Value::from),
            (FieldType::Integer, Value::String(s)) => s.trim().parse::<i64>().ok().map(Value::from),
            (FieldType::Number, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),
            (FieldType::Boolean, Value::String(s)) => match s.trim() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            _ => None,
        };

        let coerced = coerced.ok_or_else(|| {
            format!(
                "field '{}' must be {} (got {})",
                self.name,
                self.field_type.as_str(),
                describe(value)
            )
        })?;

        if self.required && coerced.as_str().is_some_and(|s| s.trim().is_empty()) {
            return Err(format!("field '{}' must not be empty", self.name));
        }

        if let Some(n) = coerced.as_i64() {
            let below = self.minimum.is_some_and(|min| n < min);
            let above = self.maximum.is_some_and(|max| n > max);
            if below || above {
                return Err(format!(
                    "field '{}' must be between {} and {} (got {n})",
                    self.name,
                    self.minimum.unwrap_or(i64::MIN),
                    self.maximum.unwrap_or(i64::MAX),
                ));
            }
        }

        Ok(coerced)
    }

    fn to_json_schema(&self) -> Value {
        let mut property = Map::new();
        property.insert("type".into(), json!(self.field_type.as_str()));
        property.insert("description".into(), json!(self.description));
        if let Some(min) = self.minimum {
            property.insert("minimum".into(), json!(min));
        }
        if let Some(max) = self.maximum {
            property.insert("maximum".into(), json!(max));
        }
        Value::Object(property)
    }
}

/// Accept integral floats (`100.0`) as integers, reject anything fractional
fn integer_from_number(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 {
        #[allow(clippy::cast_possible_truncation)]
        let i = f as i64;
        Some(i)
    } else {
        None
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Ordered set of argument declarations for one operation
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ArgumentSchema {
    /// Field declarations, in declaration order
    pub fields: Vec<FieldSchema>,

    /// Whether undeclared fields are rejected
    pub closed: bool,
}

impl ArgumentSchema {
    /// Schema that rejects undeclared fields
    pub const fn closed(fields: Vec<FieldSchema>) -> Self {
        Self { fields, closed: true }
    }

    /// Closed schema with no fields
    pub const fn empty() -> Self {
        Self::closed(Vec::new())
    }

    /// Look up a field declaration by name
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate raw arguments and coerce them into canonical form.
    ///
    /// Every problem is collected so the caller sees all offending fields at
    /// once. `null` on an optional field counts as absent.
    pub fn validate(&self, raw: &Map<String, Value>) -> Result<Arguments> {
        let mut problems = Vec::new();
        let mut canonical = Map::new();

        if self.closed {
            for key in raw.keys() {
                if self.field(key).is_none() {
                    problems.push(format!("unknown field '{key}'"));
                }
            }
        }

        for field in &self.fields {
            match raw.get(field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        problems.push(format!("missing required field '{}'", field.name));
                    }
                }
                Some(value) => match field.coerce(value) {
                    Ok(value) => {
                        canonical.insert(field.name.to_string(), value);
                    }
                    Err(problem) => problems.push(problem),
                },
            }
        }

        if problems.is_empty() {
            Ok(Arguments(canonical))
        } else {
            Err(ToolkitError::Validation(problems.join("; ")))
        }
    }

    /// Render as a JSON Schema object.
    ///
    /// Output is deterministic: properties are keyed in sorted order and
    /// `required` follows declaration order.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.to_string(), f.to_json_schema()))
            .collect();

        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": !self.closed,
        })
    }
}

/// Validated, canonical arguments for one operation call
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Arguments(Map<String, Value>);

impl Arguments {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.0.get(name).and_then(Value::as_i64)
    }

    /// Required string argument; validation already guarantees presence
    pub fn required_str(&self, name: &str) -> Result<&str> {
        self.str(name)
            .ok_or_else(|| ToolkitError::Validation(format!("missing required field '{name}'")))
    }

    pub fn required_int(&self, name: &str) -> Result<i64> {
        self.int(name)
            .ok_or_else(|| ToolkitError::Validation(format!("missing required field '{name}'")))
    }

    pub const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price_schema() -> ArgumentSchema {
        ArgumentSchema::closed(vec![
            FieldSchema::required("product", FieldType::String, "Product ID"),
            FieldSchema::required("unit_amount", FieldType::Integer, "Amount in cents"),
            FieldSchema::optional("limit", FieldType::Integer, "Page size").range(1, 100),
            FieldSchema::optional("active", FieldType::Boolean, "Active flag"),
        ])
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_valid_arguments_pass_through() {
        let validated = price_schema()
            .validate(&args(json!({"product": "prod_1", "unit_amount": 500})))
            .unwrap();
        assert_eq!(validated.str("product"), Some("prod_1"));
        assert_eq!(validated.int("unit_amount"), Some(500));
        assert_eq!(validated.len(), 2);
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let validated = price_schema()
            .validate(&args(json!({
                "product": "prod_1",
                "unit_amount": "1500",
                "limit": 10.0,
                "active": "true"
            })))
            .unwrap();
        assert_eq!(validated.get("unit_amount"), Some(&json!(1500)));
        assert_eq!(validated.get("limit"), Some(&json!(10)));
        assert_eq!(validated.get("active"), Some(&json!(true)));
    }

    #[test]
    fn test_all_problems_are_reported() {
        let err = price_schema()
            .validate(&args(json!({"unit_amount": "abc", "color": "red"})))
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("unknown field 'color'"));
        assert!(msg.contains("missing required field 'product'"));
        assert!(msg.contains("field 'unit_amount' must be integer (got string)"));
        assert_eq!(err.kind(), "validation_failed");
    }

    #[test]
    fn test_null_optional_is_absent_but_null_required_is_missing() {
        let validated = price_schema()
            .validate(&args(json!({"product": "p", "unit_amount": 1, "limit": null})))
            .unwrap();
        assert!(validated.get("limit").is_none());

        let err = price_schema()
            .validate(&args(json!({"product": null, "unit_amount": 1})))
            .unwrap_err();
        assert!(err.to_string().contains("missing required field 'product'"));
    }

    #[test]
    fn test_blank_required_string_rejected() {
        for blank in ["", "   "] {
            let err = price_schema()
                .validate(&args(json!({"product": blank, "unit_amount": 1})))
                .unwrap_err();
            assert!(err.to_string().contains("field 'product' must not be empty"));
        }

        let optional = ArgumentSchema::closed(vec![FieldSchema::optional("email", FieldType::String, "Email")]);
        let validated = optional.validate(&args(json!({"email": ""}))).unwrap();
        assert_eq!(validated.str("email"), Some(""));
    }

    #[test]
    fn test_fractional_integer_and_range_rejected() {
        let err = price_schema()
            .validate(&args(json!({"product": "p", "unit_amount": 1.5})))
            .unwrap_err();
        assert!(err.to_string().contains("unit_amount"));

        let err = price_schema()
            .validate(&args(json!({"product": "p", "unit_amount": 1, "limit": 500})))
            .unwrap_err();
        assert!(err.to_string().contains("between 1 and 100"));
    }

    #[test]
    fn test_open_schema_keeps_only_declared_fields() {
        let schema = ArgumentSchema {
            fields: vec![FieldSchema::optional("email", FieldType::String, "Email")],
            closed: false,
        };
        let validated = schema
            .validate(&args(json!({"email": "a@b.c", "extra": 1})))
            .unwrap();
        assert_eq!(validated.len(), 1);
    }

    #[test]
    fn test_json_schema_projection() {
        let schema = price_schema().to_json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(schema["required"], json!(["product", "unit_amount"]));
        assert_eq!(schema["properties"]["limit"]["maximum"], 100);
        assert_eq!(schema["properties"]["unit_amount"]["type"], "integer");
    }

    #[test]
    fn test_projection_is_byte_identical() {
        let first = serde_json::to_string(&price_schema().to_json_schema()).unwrap();
        let second = serde_json::to_string(&price_schema().to_json_schema()).unwrap();
        assert_eq!(first, second);
    }
}
