//! Iterable kind to iterable kind.
//!
//! Conversion is decided in two independent steps, always in this order:
//!
//! 1. element step: leave elements alone, assert them non-null with
//!    `map { it!! }`, accept them as a wider type, or `map` them through the
//!    converter the registry resolves for the element pair;
//! 2. kind step: if the collection at hand (a `List` when step 1 mapped,
//!    the source kind otherwise) is not already an instance of the target kind,
//!    copy it with the target kind's rebuild call.
//!
//! A widened element type under an invariant target that is not rebuilt needs
//! a cast. The outer `!!`, if any, comes last.

use crate::assign::is_assignable;
use crate::context::ConversionContext;
use crate::error::MappingError;
use crate::ir::{Expr, Lambda};
use crate::kinds::IterableKind;
use crate::nullable::{assert_not_null_if_needed, handle_nullable};
use crate::traits::TypeConverter;
use morph_schema::TypeRef;

/// What happens to each element (or map key/value).
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ElementStep {
    Unchanged,
    /// Only a nullable-to-non-null assertion.
    AssertNotNull,
    /// Assignable to the target type without conversion.
    Widened {
        /// The two types differ only in nullability.
        nullability_only: bool,
    },
    /// Converted; the expression reads the element through the given name.
    Convert(Expr),
}

impl ElementStep {
    /// Resolve the step for one type argument, reading the element as `var`.
    pub(crate) fn resolve(
        cx: &ConversionContext<'_>,
        var: &str,
        source: &TypeRef,
        target: &TypeRef,
    ) -> Result<ElementStep, MappingError> {
        if source == target {
            return Ok(ElementStep::Unchanged);
        }
        if source.nullable && !target.nullable && source.as_non_null() == *target {
            return Ok(ElementStep::AssertNotNull);
        }
        if is_assignable(cx.catalog(), source, target) {
            return Ok(ElementStep::Widened {
                nullability_only: source.as_non_null() == target.as_non_null(),
            });
        }
        let converted = cx.convert(Expr::ident(var), source, target)?;
        Ok(ElementStep::Convert(converted))
    }

    /// Whether the step produces a new collection.
    pub(crate) fn transforms(&self) -> bool {
        matches!(self, ElementStep::AssertNotNull | ElementStep::Convert(_))
    }

    /// The converted element, reading it through `var`.
    pub(crate) fn element(&self, var: &str) -> Expr {
        match self {
            ElementStep::AssertNotNull => Expr::ident(var).not_null(),
            ElementStep::Convert(expr) => expr.clone(),
            ElementStep::Unchanged | ElementStep::Widened { .. } => Expr::ident(var),
        }
    }
}

pub struct IterableToIterableConverter;

impl TypeConverter for IterableToIterableConverter {
    fn id(&self) -> &str {
        "IterableToIterableConverter"
    }

    fn matches(&self, cx: &ConversionContext<'_>, source: &TypeRef, target: &TypeRef) -> bool {
        handle_nullable(cx, source, target, |s, t| {
            if IterableKind::of(s).is_none() || IterableKind::of(t).is_none() {
                return false;
            }
            match (s.type_arg(0), t.type_arg(0)) {
                (Some(from), Some(to)) => cx.find_converter(from, to).is_some(),
                _ => false,
            }
        })
    }

    fn convert(
        &self,
        cx: &ConversionContext<'_>,
        value: Expr,
        source: &TypeRef,
        target: &TypeRef,
    ) -> Result<Expr, MappingError> {
        let (Some(source_kind), Some(target_kind)) = (IterableKind::of(source), IterableKind::of(target)) else {
            return Err(MappingError::no_converter(source, target));
        };
        let (Some(from), Some(to)) = (source.type_arg(0), target.type_arg(0)) else {
            return Err(MappingError::no_converter(source, target));
        };
        let safe = source.nullable;

        let step = ElementStep::resolve(cx, "it", from, to)?;
        let mut expr = value;
        if step.transforms() {
            expr = expr.call_with_lambda("map", safe, Lambda::it(step.element("it")));
        }

        let current = if step.transforms() {
            IterableKind::List
        } else {
            source_kind
        };
        let mut rebuild = !current.is_a(target_kind);
        let mut cast = false;
        if let ElementStep::Widened { nullability_only } = step {
            if !rebuild && !target_kind.covariant() {
                if nullability_only {
                    cast = true;
                } else {
                    rebuild = true;
                }
            }
        }

        if rebuild {
            expr = target_kind.rebuild(expr, safe);
        } else if cast {
            expr = expr.cast(target.with_nullability(source.nullable));
        }
        Ok(assert_not_null_if_needed(expr, source, target))
    }
}
