//! Data model for the morph mapping generator.
//!
//! This crate defines what collaborators hand to `morph-codegen`:
//! - [`TypeRef`] - structural type signatures with nullability and variance
//! - [`TypeCatalog`] - class and enum declarations (the source/target schemas)
//! - [`MappingRequest`] / [`MappingDirective`] - what to map and how
//!
//! # Type notation
//!
//! Type signatures use Kotlin notation and serialize as strings:
//!
//! ```
//! use morph_schema::TypeRef;
//!
//! let ty = TypeRef::parse("List<out String?>?").unwrap();
//! assert_eq!(ty.name, "kotlin.collections.List");
//! assert!(ty.nullable);
//! assert_eq!(ty.to_string(), "kotlin.collections.List<out kotlin.String?>?");
//! ```

mod catalog;
mod directive;
mod error;
pub mod names;
mod ty;

pub use catalog::{ClassDecl, Constructor, DeclKind, EnumDecl, Parameter, Property, TypeCatalog, TypeDecl};
pub use directive::{ConverterId, FixedValue, MappingDirective, MappingRequest};
pub use error::SchemaError;
pub use ty::{TypeArg, TypeRef, Variance};
