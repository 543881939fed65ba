//! Schema model and validation for OpenRoute.
//!
//! This crate provides:
//!
//! - [`Schema`]: an OpenAPI-shaped structural type with constraints
//! - [`Validator`]: the compiled form offering first-match `check` and
//!   idempotent `clean`
//! - [`StructDef`] / [`Schematic`]: structured type definitions projected
//!   into per-surface schemas through [`schema_table`]
//! - [`SchemaSource`]: "a raw schema or a structured type", accepted by
//!   every route builder setter
//!
//! # Example
//!
//! ```rust
//! use openroute_schema::{compile, Schema};
//! use serde_json::json;
//!
//! let validator = compile(
//!     Schema::object()
//!         .property("title", Schema::string().min_length(10))
//!         .property("description", Schema::string().min_length(10)),
//! )
//! .unwrap();
//!
//! let err = validator.check(&json!({ "title": "short" })).unwrap_err();
//! assert!(err.message.starts_with("title"));
//! ```

mod error;
mod file;
mod schema;
mod structured;
mod validator;

pub use error::{SchemaError, ValidationError};
pub use file::UploadedFile;
pub use schema::{Format, Schema, SchemaType};
pub use structured::{schema_table, FieldDef, SchemaSource, SchemaTable, Schematic, StructDef, Surface};
pub use validator::{compile, Validator};
