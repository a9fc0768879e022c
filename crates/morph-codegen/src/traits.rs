//! Traits for converters and code writers.

use crate::context::ConversionContext;
use crate::error::MappingError;
use crate::ir::{Expr, Fragment};
use crate::output::RenderedCode;
use crate::priority::Priority;
use morph_schema::TypeRef;

/// A unit answering "can a value of type A become type B" and, if so, building
/// the expression that does it.
///
/// Converters are constructed once per registry and hold no state. Everything
/// a converter needs at resolution time (the catalog, options, the registry
/// itself for recursion) comes in through the [`ConversionContext`].
pub trait TypeConverter: Send + Sync {
    /// Stable identifier used by directives and configuration to enable it.
    fn id(&self) -> &str;

    /// Whether the converter is active without being enabled explicitly.
    fn enabled_by_default(&self) -> bool {
        true
    }

    fn priority(&self) -> Priority {
        Priority::DEFAULT
    }

    /// Whether this converter handles `source -> target`, including the
    /// nullability rule for the pair.
    fn matches(&self, cx: &ConversionContext<'_>, source: &TypeRef, target: &TypeRef) -> bool;

    /// Build the conversion of `value`. Only called after `matches` returned true.
    fn convert(
        &self,
        cx: &ConversionContext<'_>,
        value: Expr,
        source: &TypeRef,
        target: &TypeRef,
    ) -> Result<Expr, MappingError>;
}

/// A writer emits a mapping fragment as source code in a target language.
pub trait Writer: Send + Sync {
    /// Language identifier (e.g., "kotlin").
    fn language(&self) -> &'static str;

    /// File extension for output (e.g., "kt").
    fn extension(&self) -> &'static str;

    /// Emit the fragment, collecting the imports it needs.
    fn write(&self, fragment: &Fragment) -> RenderedCode;
}
