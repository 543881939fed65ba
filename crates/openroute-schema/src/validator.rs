//! Compiled schema validation and cleaning.
//!
//! A [`Validator`] is compiled once per schema at route build time and is
//! shared read-only across every request to that route.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::{SchemaError, ValidationError};
use crate::file::UploadedFile;
use crate::schema::{Format, Schema, SchemaType};

#[derive(Debug)]
struct Compiled {
    schema: Schema,
    patterns: HashMap<String, Regex>,
}

/// A compiled schema offering `check` and `clean`.
///
/// Cloning is cheap; clones share the compiled form.
///
/// # Example
///
/// ```rust
/// use openroute_schema::{Schema, Validator};
/// use serde_json::json;
///
/// let validator = Validator::compile(
///     Schema::object().property("title", Schema::string().min_length(3)),
/// )
/// .unwrap();
///
/// assert!(validator.check(&json!({ "title": "Rust" })).is_ok());
/// assert!(validator.check(&json!({ "title": "Go" })).is_err());
/// assert_eq!(
///     validator.clean(&json!({ "title": "Rust", "extra": 1 })),
///     json!({ "title": "Rust" })
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Validator {
    inner: Option<Arc<Compiled>>,
}

/// Compiles `schema` into a [`Validator`].
pub fn compile(schema: Schema) -> Result<Validator, SchemaError> {
    Validator::compile(schema)
}

impl Validator {
    /// Compiles a schema, rejecting structurally invalid definitions.
    pub fn compile(schema: Schema) -> Result<Self, SchemaError> {
        let mut patterns = HashMap::new();
        prepare(&schema, "", &mut patterns)?;
        Ok(Self {
            inner: Some(Arc::new(Compiled { schema, patterns })),
        })
    }

    /// The no-op validator: every value passes and is returned unchanged.
    #[must_use]
    pub fn identity() -> Self {
        Self { inner: None }
    }

    /// Returns true for the no-op validator.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.inner.is_none()
    }

    /// The schema this validator was compiled from.
    #[must_use]
    pub fn schema(&self) -> Option<&Schema> {
        self.inner.as_ref().map(|c| &c.schema)
    }

    /// Checks `value`, reporting the first violated constraint.
    ///
    /// Constraints are visited in a fixed order (type, then the node's own
    /// constraints, then properties in declaration order), so the reported
    /// error is deterministic.
    pub fn check(&self, value: &Value) -> Result<(), ValidationError> {
        match &self.inner {
            Some(compiled) => compiled.check_at(&compiled.schema, value, ""),
            None => Ok(()),
        }
    }

    /// Returns a copy of `value` holding only the fields the schema declares.
    ///
    /// Only meaningful for values that passed [`check`](Self::check). Invalid
    /// values are not repaired. Cleaning is idempotent.
    #[must_use]
    pub fn clean(&self, value: &Value) -> Value {
        match &self.inner {
            Some(compiled) => clean_at(&compiled.schema, value),
            None => value.clone(),
        }
    }
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

fn prepare(
    schema: &Schema,
    path: &str,
    patterns: &mut HashMap<String, Regex>,
) -> Result<(), SchemaError> {
    if let Some(pattern) = &schema.pattern {
        if !patterns.contains_key(pattern) {
            let regex = Regex::new(pattern).map_err(|source| SchemaError::InvalidPattern {
                path: crate::error::display_path(path),
                source,
            })?;
            patterns.insert(pattern.clone(), regex);
        }
    }

    check_bounds(path, "length", schema.min_length, schema.max_length)?;
    check_bounds(path, "items", schema.min_items, schema.max_items)?;
    check_bounds(path, "size", schema.min_size, schema.max_size)?;
    if let (Some(min), Some(max)) = (schema.minimum, schema.maximum) {
        if min > max {
            return Err(SchemaError::bounds(path, "range", min, max));
        }
    }

    if let Some(key) = schema
        .required
        .iter()
        .find(|key| !schema.properties.contains_key(*key))
    {
        return Err(SchemaError::UndeclaredRequired {
            path: crate::error::display_path(path),
            key: key.clone(),
        });
    }

    for (key, property) in &schema.properties {
        prepare(property, &child_path(path, key), patterns)?;
    }

    match (&schema.schema_type, &schema.items) {
        (_, Some(items)) => prepare(items, &format!("{path}[*]"), patterns),
        (Some(SchemaType::Array), None) => Err(SchemaError::MissingItems {
            path: crate::error::display_path(path),
        }),
        _ => Ok(()),
    }
}

fn check_bounds(
    path: &str,
    constraint: &'static str,
    min: Option<u64>,
    max: Option<u64>,
) -> Result<(), SchemaError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(SchemaError::bounds(
            path,
            constraint,
            min as f64,
            max as f64,
        )),
        _ => Ok(()),
    }
}

impl Compiled {
    fn check_at(&self, schema: &Schema, value: &Value, path: &str) -> Result<(), ValidationError> {
        let fail = |detail: String| match &schema.error {
            Some(message) => ValidationError::custom(path, message),
            None => ValidationError::at(path, detail),
        };

        if value.is_null() {
            return if schema.nullable || (schema.schema_type.is_none() && !schema.is_file()) {
                Ok(())
            } else {
                Err(fail(format!("expected {}, got null", expected_name(schema))))
            };
        }

        if schema.is_file() {
            return check_file(schema, value).map_err(fail);
        }

        match schema.schema_type {
            Some(SchemaType::String) => {
                let s = value
                    .as_str()
                    .ok_or_else(|| fail(format!("expected string, got {}", value_type_name(value))))?;
                self.check_string(schema, s).map_err(fail)?;
            }
            Some(SchemaType::Integer) => {
                let n = as_integer(value)
                    .ok_or_else(|| fail(format!("expected integer, got {}", value_type_name(value))))?;
                check_range(schema, n).map_err(fail)?;
            }
            Some(SchemaType::Number) => {
                let n = value
                    .as_f64()
                    .ok_or_else(|| fail(format!("expected number, got {}", value_type_name(value))))?;
                check_range(schema, n).map_err(fail)?;
            }
            Some(SchemaType::Boolean) => {
                if !value.is_boolean() {
                    return Err(fail(format!("expected boolean, got {}", value_type_name(value))));
                }
            }
            Some(SchemaType::Array) => {
                let arr = value
                    .as_array()
                    .ok_or_else(|| fail(format!("expected array, got {}", value_type_name(value))))?;
                check_count(arr.len(), schema.min_items, schema.max_items, "array length")
                    .map_err(fail)?;
            }
            Some(SchemaType::Object) => {
                if !value.is_object() {
                    return Err(fail(format!("expected object, got {}", value_type_name(value))));
                }
            }
            None => {}
        }

        if !schema.enum_values.is_empty() && !schema.enum_values.contains(value) {
            let allowed = serde_json::to_string(&schema.enum_values).unwrap_or_default();
            return Err(fail(format!("value must be one of {allowed}")));
        }

        if let Some(obj) = value.as_object() {
            for (key, property) in &schema.properties {
                let key_path = child_path(path, key);
                match obj.get(key) {
                    Some(prop_value) => self.check_at(property, prop_value, &key_path)?,
                    None if schema.required.contains(key) => {
                        return Err(match &property.error {
                            Some(message) => ValidationError::custom(&key_path, message),
                            None => ValidationError::at(&key_path, "required property is missing"),
                        });
                    }
                    None => {}
                }
            }
        }

        if let (Some(items), Some(arr)) = (&schema.items, value.as_array()) {
            for (idx, item) in arr.iter().enumerate() {
                self.check_at(items, item, &format!("{path}[{idx}]"))?;
            }
        }

        Ok(())
    }

    fn check_string(&self, schema: &Schema, s: &str) -> Result<(), String> {
        check_count(
            s.chars().count(),
            schema.min_length,
            schema.max_length,
            "string length",
        )?;

        if let Some(pattern) = &schema.pattern {
            let matched = self
                .patterns
                .get(pattern)
                .map_or(true, |regex| regex.is_match(s));
            if !matched {
                return Err(format!("string does not match pattern {pattern}"));
            }
        }

        match schema.format {
            Some(format) if !matches_format(format, s) => {
                Err(format!("string is not a valid {}", format.as_str()))
            }
            _ => Ok(()),
        }
    }
}

fn check_count(len: usize, min: Option<u64>, max: Option<u64>, what: &str) -> Result<(), String> {
    let len = len as u64;
    if let Some(min) = min {
        if len < min {
            return Err(format!("{what} {len} is less than minimum {min}"));
        }
    }
    if let Some(max) = max {
        if len > max {
            return Err(format!("{what} {len} is greater than maximum {max}"));
        }
    }
    Ok(())
}

fn check_range(schema: &Schema, n: f64) -> Result<(), String> {
    if let Some(min) = schema.minimum {
        if n < min {
            return Err(format!("value {n} is less than minimum {min}"));
        }
    }
    if let Some(max) = schema.maximum {
        if n > max {
            return Err(format!("value {n} is greater than maximum {max}"));
        }
    }
    Ok(())
}

fn check_file(schema: &Schema, value: &Value) -> Result<(), String> {
    let file: UploadedFile = serde_json::from_value(value.clone())
        .map_err(|_| format!("expected uploaded file, got {}", value_type_name(value)))?;

    let extension = file.extension.to_ascii_lowercase();
    if !schema.extensions.is_empty() && !schema.extensions.contains(&extension) {
        return Err(format!(
            "file extension '{}' is not one of: {}",
            extension,
            schema.extensions.join(", ")
        ));
    }

    if let Some(min) = schema.min_size {
        if file.size < min {
            return Err(format!("file size {} is less than minimum {min} bytes", file.size));
        }
    }
    if let Some(max) = schema.max_size {
        if file.size > max {
            return Err(format!("file size {} is greater than maximum {max} bytes", file.size));
        }
    }
    Ok(())
}

fn as_integer(value: &Value) -> Option<f64> {
    if let Some(n) = value.as_i64() {
        return Some(n as f64);
    }
    if let Some(n) = value.as_u64() {
        return Some(n as f64);
    }
    value
        .as_f64()
        .filter(|n| n.is_finite() && n.fract() == 0.0)
}

fn matches_format(format: Format, s: &str) -> bool {
    match format {
        Format::Uuid => uuid::Uuid::parse_str(s).is_ok(),
        Format::Email => is_email(s),
        Format::Alphanumeric => s.chars().all(|c| c.is_ascii_alphanumeric()),
        Format::DateTime => chrono::DateTime::parse_from_rfc3339(s).is_ok(),
        Format::Uri => url::Url::parse(s).is_ok(),
        Format::Binary => true,
    }
}

fn is_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !s.chars().any(char::is_whitespace)
}

fn clean_at(schema: &Schema, value: &Value) -> Value {
    match value {
        Value::Object(obj) if !schema.properties.is_empty() => {
            let mut cleaned = Map::with_capacity(schema.properties.len());
            for (key, property) in &schema.properties {
                if let Some(v) = obj.get(key) {
                    cleaned.insert(key.clone(), clean_at(property, v));
                }
            }
            Value::Object(cleaned)
        }
        Value::Array(arr) => match &schema.items {
            Some(items) => Value::Array(arr.iter().map(|v| clean_at(items, v)).collect()),
            None => value.clone(),
        },
        _ => value.clone(),
    }
}

fn expected_name(schema: &Schema) -> &'static str {
    if schema.is_file() {
        return "uploaded file";
    }
    match schema.schema_type {
        Some(SchemaType::String) => "string",
        Some(SchemaType::Integer) => "integer",
        Some(SchemaType::Number) => "number",
        Some(SchemaType::Boolean) => "boolean",
        Some(SchemaType::Array) => "array",
        Some(SchemaType::Object) => "object",
        None => "value",
    }
}

/// Returns a human-readable name for a JSON value type.
fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
