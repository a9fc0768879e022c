//! Fatal errors and non-fatal warnings of mapping generation.

use morph_schema::TypeRef;
use serde::Serialize;
use std::fmt;

/// A mapping could not be generated.
///
/// Every resolution step returns on the first error; no partial code is produced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MappingError {
    #[error("no converter found for {from} -> {to}")]
    NoConverterFound { from: TypeRef, to: TypeRef },

    #[error("converting {from} -> {to} needs a not-null assertion, but enforce_not_null is off")]
    NotNullAssertionNotEnabled { from: TypeRef, to: TypeRef },

    #[error("enum {from} has values missing in {to}: {}", .missing.join(", "))]
    MissingEnumValues {
        from: TypeRef,
        to: TypeRef,
        missing: Vec<String>,
    },

    #[error("ambiguous constructor for {target}: {}", .candidates.join(" | "))]
    AmbiguousConstructor {
        target: String,
        candidates: Vec<String>,
    },

    #[error("no matching constructor for {target}")]
    NoMatchingConstructor {
        target: String,
        forced: Option<Vec<TypeRef>>,
    },

    #[error("no mapping for {target}.{property}")]
    PropertyMappingNotExisting { target: String, property: String },

    #[error("type {0} is not declared in the catalog")]
    UnknownType(String),

    #[error("while mapping `{field}`: {error}")]
    Field {
        field: String,
        error: Box<MappingError>,
    },
}

impl MappingError {
    pub fn no_converter(from: &TypeRef, to: &TypeRef) -> Self {
        MappingError::NoConverterFound {
            from: from.clone(),
            to: to.clone(),
        }
    }

    /// Attach the name of the target property being mapped.
    pub fn in_field(self, field: &str) -> Self {
        MappingError::Field {
            field: field.to_string(),
            error: Box::new(self),
        }
    }

    /// The error without field context.
    pub fn root(&self) -> &MappingError {
        let mut current = self;
        while let MappingError::Field { error, .. } = current {
            current = error;
        }
        current
    }

    /// Target property names from the outermost to the innermost context.
    pub fn field_path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = self;
        while let MappingError::Field { field, error } = current {
            path.push(field.as_str());
            current = error;
        }
        path
    }
}

/// A recoverable problem; the offending input was ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MappingWarning {
    /// More than one directive targets the same property; only the first is used.
    DuplicateDirective { target: String },
    /// A directive names a source property that does not exist.
    UnknownSourceProperty { target: String, source: String },
}

impl fmt::Display for MappingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingWarning::DuplicateDirective { target } => {
                write!(f, "duplicate directive for `{}` ignored", target)
            }
            MappingWarning::UnknownSourceProperty { target, source } => write!(
                f,
                "directive for `{}` references unknown source property `{}`",
                target, source
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_context_roundtrip() {
        let err = MappingError::UnknownType("com.example.X".into()).in_field("x");
        assert_eq!(err.field_path(), vec!["x"]);
        assert_eq!(err.root(), &MappingError::UnknownType("com.example.X".into()));
        assert_eq!(
            err.to_string(),
            "while mapping `x`: type com.example.X is not declared in the catalog"
        );
    }

    #[test]
    fn test_missing_enum_values_message() {
        let err = MappingError::MissingEnumValues {
            from: TypeRef::new("a.E"),
            to: TypeRef::new("b.E"),
            missing: vec!["C".into(), "D".into()],
        };
        assert_eq!(err.to_string(), "enum a.E has values missing in b.E: C, D");
    }
}
