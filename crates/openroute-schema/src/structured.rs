//! Schemas recovered from structured type definitions.
//!
//! A [`StructDef`] lists a type's fields and which request or response
//! surfaces each field belongs to. [`schema_table`] turns it into one object
//! schema per surface. Nothing is registered globally; callers build the
//! table when they need it.

use std::collections::BTreeSet;

use crate::schema::Schema;

/// The parts of a route a structured type can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Surface {
    /// Path parameters.
    Params,
    /// Request headers.
    Headers,
    /// Request body merged with the query string.
    RequestData,
    /// Handler result.
    ResponseData,
}

impl Surface {
    /// Every surface, in route order.
    pub const ALL: [Surface; 4] = [
        Surface::Params,
        Surface::Headers,
        Surface::RequestData,
        Surface::ResponseData,
    ];
}

/// One field of a structured type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    /// Field name as it appears on the wire.
    pub name: String,
    /// Field schema.
    pub schema: Schema,
    /// Whether the field may be absent.
    pub optional: bool,
    /// Surfaces the field appears on. Empty means all of them.
    pub surfaces: BTreeSet<Surface>,
}

impl FieldDef {
    /// Creates a required field that appears on every surface.
    #[must_use]
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            optional: false,
            surfaces: BTreeSet::new(),
        }
    }

    /// Marks the field optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Adds the field to the params surface.
    #[must_use]
    pub fn as_params(self) -> Self {
        self.on(Surface::Params)
    }

    /// Adds the field to the headers surface.
    #[must_use]
    pub fn as_headers(self) -> Self {
        self.on(Surface::Headers)
    }

    /// Adds the field to the request data surface.
    #[must_use]
    pub fn as_request_data(self) -> Self {
        self.on(Surface::RequestData)
    }

    /// Adds the field to the response data surface.
    #[must_use]
    pub fn as_response_data(self) -> Self {
        self.on(Surface::ResponseData)
    }

    /// Adds the field to `surface`.
    #[must_use]
    pub fn on(mut self, surface: Surface) -> Self {
        self.surfaces.insert(surface);
        self
    }

    /// Returns true if the field appears on `surface`.
    #[must_use]
    pub fn appears_on(&self, surface: Surface) -> bool {
        self.surfaces.is_empty() || self.surfaces.contains(&surface)
    }
}

/// Definition of a structured type.
#[derive(Debug, Clone, PartialEq)]
pub struct StructDef {
    /// Type name, used in descriptions.
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
}

impl StructDef {
    /// Creates an empty definition.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// The object schema for `surface`.
    #[must_use]
    pub fn schema_for(&self, surface: Surface) -> Schema {
        self.fields
            .iter()
            .filter(|f| f.appears_on(surface))
            .fold(Schema::object(), |schema, f| {
                if f.optional {
                    schema.optional_property(f.name.clone(), f.schema.clone())
                } else {
                    schema.property(f.name.clone(), f.schema.clone())
                }
            })
    }
}

/// Types that can describe their own shape.
///
/// # Example
///
/// ```rust
/// use openroute_schema::{FieldDef, Schema, Schematic, StructDef, Surface};
///
/// struct Article;
///
/// impl Schematic for Article {
///     fn struct_def() -> StructDef {
///         StructDef::new("Article")
///             .field(FieldDef::new("id", Schema::integer()).as_response_data())
///             .field(FieldDef::new("title", Schema::string()))
///     }
/// }
///
/// let table = openroute_schema::schema_table(&Article::struct_def());
/// assert_eq!(table.get(Surface::ResponseData).properties.len(), 2);
/// assert_eq!(table.get(Surface::RequestData).properties.len(), 1);
/// ```
pub trait Schematic {
    /// The type's structured definition.
    fn struct_def() -> StructDef;
}

/// One object schema per [`Surface`], derived from a [`StructDef`].
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaTable {
    params: Schema,
    headers: Schema,
    request_data: Schema,
    response_data: Schema,
}

impl SchemaTable {
    /// The schema for `surface`.
    #[must_use]
    pub fn get(&self, surface: Surface) -> &Schema {
        match surface {
            Surface::Params => &self.params,
            Surface::Headers => &self.headers,
            Surface::RequestData => &self.request_data,
            Surface::ResponseData => &self.response_data,
        }
    }

    /// Consumes the table, keeping only the schema for `surface`.
    #[must_use]
    pub fn into_schema(self, surface: Surface) -> Schema {
        match surface {
            Surface::Params => self.params,
            Surface::Headers => self.headers,
            Surface::RequestData => self.request_data,
            Surface::ResponseData => self.response_data,
        }
    }
}

/// Builds the per-surface schema table for `def`.
#[must_use]
pub fn schema_table(def: &StructDef) -> SchemaTable {
    let describe = |schema: Schema| schema.with_description(def.name.clone());
    SchemaTable {
        params: describe(def.schema_for(Surface::Params)),
        headers: describe(def.schema_for(Surface::Headers)),
        request_data: describe(def.schema_for(Surface::RequestData)),
        response_data: describe(def.schema_for(Surface::ResponseData)),
    }
}

/// Either a raw schema or a structured type definition.
///
/// Every schema setter on a route builder accepts this, so callers can pass
/// whichever they have.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaSource {
    /// A plain schema, used as-is on any surface.
    Raw(Schema),
    /// A structured type, projected onto the surface being set.
    Structured(StructDef),
}

impl SchemaSource {
    /// The source for a [`Schematic`] type.
    #[must_use]
    pub fn of<T: Schematic>() -> Self {
        Self::Structured(T::struct_def())
    }

    /// Resolves the schema to use on `surface`.
    #[must_use]
    pub fn resolve(self, surface: Surface) -> Schema {
        match self {
            Self::Raw(schema) => schema,
            Self::Structured(def) => schema_table(&def).into_schema(surface),
        }
    }
}

impl From<Schema> for SchemaSource {
    fn from(schema: Schema) -> Self {
        Self::Raw(schema)
    }
}

impl From<StructDef> for SchemaSource {
    fn from(def: StructDef) -> Self {
        Self::Structured(def)
    }
}
