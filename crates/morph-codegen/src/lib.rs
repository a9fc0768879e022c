//! Type-directed synthesis of object-to-object mapping code.
//!
//! `morph-codegen` takes a [`TypeCatalog`](morph_schema::TypeCatalog) and a
//! [`MappingRequest`](morph_schema::MappingRequest) and produces the body of a
//! mapping function, resolved ahead of time against static declarations.
//!
//! # Architecture
//!
//! ```text
//! Request ──> intents ──> constructor ──> generator ──> Fragment ──> Kotlin text
//!             (mapping)   (mapping)       (mapping)     (ir.rs)      (output/)
//!                                             │
//!                                             v
//!                         registry ──> converters (recursive, per type pair)
//! ```
//!
//! Converters are ranked by [`Priority`]; the first enabled converter that
//! matches a (source, target) pair wins. Every converter follows the same
//! nullability rule (see [`nullable`]): a nullable value only reaches a
//! non-null target through a `!!` assertion, and only when
//! [`MapperOptions::enforce_not_null`] is on.
//!
//! # Example
//!
//! ```
//! use morph_codegen::{MapperOptions, MappingEngine};
//! use morph_schema::{MappingRequest, TypeCatalog, TypeRef};
//!
//! let catalog = TypeCatalog::from_json(r#"{
//!     "types": [
//!         { "name": "com.example.PersonDto", "kind": "class",
//!           "properties": [{ "name": "tags", "type": "List<String>" }] },
//!         { "name": "com.example.Person", "kind": "class",
//!           "properties": [{ "name": "tags", "type": "Set<Int>" }],
//!           "constructors": [{ "primary": true, "params": [{ "name": "tags", "type": "Set<Int>" }] }] }
//!     ]
//! }"#).unwrap();
//!
//! let engine = MappingEngine::new(MapperOptions::default());
//! let request = MappingRequest::new(
//!     TypeRef::new("com.example.PersonDto"),
//!     TypeRef::new("com.example.Person"),
//! )
//! .with_source_param("dto");
//!
//! let code = engine.generate(&catalog, &request).unwrap().render();
//! assert_eq!(code.body, "return Person(tags = dto.tags.map { it.toInt() }.toSet())\n");
//! assert_eq!(code.imports, vec!["com.example.Person"]);
//! ```

pub mod assign;
pub mod config;
pub mod context;
pub mod converters;
pub mod engine;
pub mod error;
pub mod ir;
pub mod kinds;
pub mod mapping;
pub mod nullable;
pub mod output;
pub mod priority;
pub mod registry;
pub mod traits;

pub use config::{ConfigError, MapperOptions, NonConstructorProperties};
pub use context::{ConversionContext, EnabledScope};
pub use converters::{CallStyle, MappingFunction};
pub use engine::MappingEngine;
pub use error::{MappingError, MappingWarning};
pub use ir::{Expr, Fragment, Stmt};
pub use mapping::{MappingOutput, generate};
pub use output::RenderedCode;
pub use priority::Priority;
pub use registry::{ConverterRegistry, RegistryBuilder, builtin_registry};
pub use traits::{TypeConverter, Writer};
