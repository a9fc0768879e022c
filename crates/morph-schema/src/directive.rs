//! Mapping requests and per-property directives.

use crate::ty::TypeRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a converter (e.g. `StringToIntConverter`).
///
/// Directives and configuration refer to converters by this name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConverterId(String);

impl ConverterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConverterId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ConverterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A user-written override for one target property.
///
/// Exactly one of `source`, `constant`, `expression` or `ignore` is expected to
/// be meaningful; validating that is the directive parser's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingDirective {
    pub target: String,
    #[serde(default)]
    pub source: Option<String>,
    /// Literal code used as the value.
    #[serde(default)]
    pub constant: Option<String>,
    /// Code evaluated with the source value bound to `it`.
    #[serde(default)]
    pub expression: Option<String>,
    #[serde(default)]
    pub ignore: bool,
    /// Converters to enable while resolving this property.
    #[serde(default)]
    pub enable: Vec<ConverterId>,
}

impl MappingDirective {
    pub fn rename(target: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            source: Some(source.into()),
            ..Default::default()
        }
    }

    pub fn constant(target: impl Into<String>, literal: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            constant: Some(literal.into()),
            ..Default::default()
        }
    }

    pub fn expression(target: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            expression: Some(code.into()),
            ..Default::default()
        }
    }

    pub fn ignore(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ignore: true,
            ..Default::default()
        }
    }

    /// Same-name directive that only enables converters.
    pub fn enabling(target: impl Into<String>, ids: impl IntoIterator<Item = ConverterId>) -> Self {
        let target = target.into();
        Self {
            source: Some(target.clone()),
            target,
            enable: ids.into_iter().collect(),
            ..Default::default()
        }
    }
}

/// A value supplied by the caller for a target property (for example an extra
/// parameter of the generated function).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedValue {
    pub target: String,
    /// Code producing the value, emitted verbatim.
    pub value: String,
}

/// One mapping function to generate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRequest {
    pub source: TypeRef,
    pub target: TypeRef,
    /// Name of the parameter holding the source value; `None` when the source is
    /// the receiver of an extension function.
    #[serde(default)]
    pub source_param: Option<String>,
    #[serde(default)]
    pub directives: Vec<MappingDirective>,
    #[serde(default)]
    pub fixed: Vec<FixedValue>,
    /// Parameter types selecting a specific target constructor.
    #[serde(default)]
    pub constructor: Option<Vec<TypeRef>>,
    /// Converters enabled for the whole mapping.
    #[serde(default)]
    pub enable: Vec<ConverterId>,
}

impl MappingRequest {
    pub fn new(source: TypeRef, target: TypeRef) -> Self {
        Self {
            source,
            target,
            source_param: None,
            directives: Vec::new(),
            fixed: Vec::new(),
            constructor: None,
            enable: Vec::new(),
        }
    }

    pub fn with_source_param(mut self, name: impl Into<String>) -> Self {
        self.source_param = Some(name.into());
        self
    }

    pub fn with_directive(mut self, directive: MappingDirective) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn with_fixed(mut self, target: impl Into<String>, value: impl Into<String>) -> Self {
        self.fixed.push(FixedValue {
            target: target.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_constructor(mut self, params: Vec<TypeRef>) -> Self {
        self.constructor = Some(params);
        self
    }

    pub fn enabling(mut self, id: impl Into<ConverterId>) -> Self {
        self.enable.push(id.into());
        self
    }
}
