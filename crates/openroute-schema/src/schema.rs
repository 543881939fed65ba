//! Structural schema model.
//!
//! [`Schema`] is shaped like an OpenAPI 3.0 schema object so a route's
//! schemas serialize straight into generated documentation. Validation
//! lives in [`Validator`](crate::Validator).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// JSON Schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// String type.
    String,
    /// Number type.
    Number,
    /// Integer type.
    Integer,
    /// Boolean type.
    Boolean,
    /// Array type.
    Array,
    /// Object type.
    Object,
}

/// Value formats understood by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Format {
    /// RFC 4122 UUID in hyphenated form.
    #[serde(rename = "uuid")]
    Uuid,
    /// Email address.
    #[serde(rename = "email")]
    Email,
    /// ASCII letters and digits only.
    #[serde(rename = "alphanum")]
    Alphanumeric,
    /// RFC 3339 timestamp.
    #[serde(rename = "date-time")]
    DateTime,
    /// Absolute URI with a scheme.
    #[serde(rename = "uri")]
    Uri,
    /// Uploaded file.
    #[serde(rename = "binary")]
    Binary,
}

impl Format {
    /// The name used on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::Email => "email",
            Self::Alphanumeric => "alphanum",
            Self::DateTime => "date-time",
            Self::Uri => "uri",
            Self::Binary => "binary",
        }
    }
}

/// A structural type description with constraints.
///
/// # Example
///
/// ```rust
/// use openroute_schema::{Format, Schema};
///
/// let article = Schema::object()
///     .property("id", Schema::string().format(Format::Uuid))
///     .property("title", Schema::string().min_length(10))
///     .optional_property("tags", Schema::array(Schema::string()));
///
/// assert_eq!(article.required, vec!["id", "title"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Schema type. `None` accepts any value.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    /// Value format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Object properties, in declaration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, Schema>,
    /// Required properties.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Array item schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    /// Allowed values.
    #[serde(default, rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,
    /// Minimum value (for numbers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Maximum value (for numbers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Minimum length in characters (for strings).
    #[serde(default, rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum length in characters (for strings).
    #[serde(default, rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Pattern regex (for strings).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Minimum number of items (for arrays).
    #[serde(default, rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    /// Maximum number of items (for arrays).
    #[serde(default, rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    /// Whether `null` is accepted.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
    /// Allowed file extensions, lowercase without the dot (for files).
    #[serde(default, rename = "x-extensions", skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
    /// Minimum file size in bytes (for files).
    #[serde(default, rename = "x-min-size", skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u64>,
    /// Maximum file size in bytes (for files).
    #[serde(default, rename = "x-max-size", skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
    /// Message reported instead of the generated one when this node fails.
    #[serde(skip)]
    pub error: Option<String>,
}

impl Schema {
    fn typed(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Default::default()
        }
    }

    /// Create a schema accepting any value.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Create a string schema.
    #[must_use]
    pub fn string() -> Self {
        Self::typed(SchemaType::String)
    }

    /// Create an integer schema.
    #[must_use]
    pub fn integer() -> Self {
        Self::typed(SchemaType::Integer)
    }

    /// Create a number schema.
    #[must_use]
    pub fn number() -> Self {
        Self::typed(SchemaType::Number)
    }

    /// Create a boolean schema.
    #[must_use]
    pub fn boolean() -> Self {
        Self::typed(SchemaType::Boolean)
    }

    /// Create an array schema with the given item schema.
    #[must_use]
    pub fn array(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::typed(SchemaType::Array)
        }
    }

    /// Create an empty object schema.
    ///
    /// An object schema with no declared properties accepts any keys and
    /// cleaning leaves it untouched.
    #[must_use]
    pub fn object() -> Self {
        Self::typed(SchemaType::Object)
    }

    /// Create an uploaded-file schema (`string` / `binary`).
    #[must_use]
    pub fn file() -> Self {
        Self {
            format: Some(Format::Binary),
            ..Self::typed(SchemaType::String)
        }
    }

    /// Add a required property.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(name, schema);
        self
    }

    /// Add an optional property.
    #[must_use]
    pub fn optional_property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        self.required.retain(|r| *r != name);
        self.properties.insert(name, schema);
        self
    }

    /// Set the value format.
    #[must_use]
    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    /// Add a description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Set the minimum string length.
    #[must_use]
    pub fn min_length(mut self, min: u64) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Set the maximum string length.
    #[must_use]
    pub fn max_length(mut self, max: u64) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Require an exact string length.
    #[must_use]
    pub fn length(self, len: u64) -> Self {
        self.min_length(len).max_length(len)
    }

    /// Set a regex the whole string must match.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the numeric minimum (inclusive).
    #[must_use]
    pub fn minimum(mut self, min: f64) -> Self {
        self.minimum = Some(min);
        self
    }

    /// Set the numeric maximum (inclusive).
    #[must_use]
    pub fn maximum(mut self, max: f64) -> Self {
        self.maximum = Some(max);
        self
    }

    /// Set the minimum array length.
    #[must_use]
    pub fn min_items(mut self, min: u64) -> Self {
        self.min_items = Some(min);
        self
    }

    /// Set the maximum array length.
    #[must_use]
    pub fn max_items(mut self, max: u64) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Restrict the value to a fixed set.
    #[must_use]
    pub fn one_of_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<serde_json::Value>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Accept `null` in addition to the schema's type.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Restrict uploaded files to the given extensions.
    #[must_use]
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// Set the minimum uploaded file size in bytes.
    #[must_use]
    pub fn min_size(mut self, bytes: u64) -> Self {
        self.min_size = Some(bytes);
        self
    }

    /// Set the maximum uploaded file size in bytes.
    #[must_use]
    pub fn max_size(mut self, bytes: u64) -> Self {
        self.max_size = Some(bytes);
        self
    }

    /// Replace the generated message when this node fails.
    #[must_use]
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    /// Returns true if this schema describes an uploaded file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.format == Some(Format::Binary)
    }

    /// Returns true if `name` is a declared, required property.
    #[must_use]
    pub fn requires(&self, name: &str) -> bool {
        self.properties.contains_key(name) && self.required.iter().any(|r| r == name)
    }
}
