//! Map kind to map kind.
//!
//! Keys and values each get an element step (see the iterable converter),
//! which selects one of four code shapes:
//!
//! | key       | value     | shape                                             |
//! |-----------|-----------|---------------------------------------------------|
//! | unchanged | unchanged | none                                              |
//! | changed   | unchanged | `mapKeys { (key, _) -> .. }`                      |
//! | unchanged | changed   | `mapValues { (_, value) -> .. }`                  |
//! | changed   | changed   | `map { (key, value) -> k to v }.toMap()`          |
//!
//! The kind step follows, with `Map` as the kind every shape produces.

use super::iterable::ElementStep;
use crate::context::ConversionContext;
use crate::error::MappingError;
use crate::ir::{Expr, Lambda};
use crate::kinds::MapKind;
use crate::nullable::{assert_not_null_if_needed, handle_nullable};
use crate::traits::TypeConverter;
use morph_schema::TypeRef;

pub struct MapToMapConverter;

impl TypeConverter for MapToMapConverter {
    fn id(&self) -> &str {
        "MapToMapConverter"
    }

    fn matches(&self, cx: &ConversionContext<'_>, source: &TypeRef, target: &TypeRef) -> bool {
        handle_nullable(cx, source, target, |s, t| {
            if MapKind::of(s).is_none() || MapKind::of(t).is_none() {
                return false;
            }
            let keys = match (s.type_arg(0), t.type_arg(0)) {
                (Some(from), Some(to)) => cx.find_converter(from, to).is_some(),
                _ => false,
            };
            keys && match (s.type_arg(1), t.type_arg(1)) {
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
        let (Some(source_kind), Some(target_kind)) = (MapKind::of(source), MapKind::of(target)) else {
            return Err(MappingError::no_converter(source, target));
        };
        let (Some(from_key), Some(to_key), Some(from_value), Some(to_value)) = (
            source.type_arg(0),
            target.type_arg(0),
            source.type_arg(1),
            target.type_arg(1),
        ) else {
            return Err(MappingError::no_converter(source, target));
        };
        let safe = source.nullable;

        let key = ElementStep::resolve(cx, "key", from_key, to_key)?;
        let val = ElementStep::resolve(cx, "value", from_value, to_value)?;

        let mut expr = value;
        match (key.transforms(), val.transforms()) {
            (false, false) => {}
            (true, false) => {
                let lambda = Lambda::with_params(&["(key, _)"], key.element("key"));
                expr = expr.call_with_lambda("mapKeys", safe, lambda);
            }
            (false, true) => {
                let lambda = Lambda::with_params(&["(_, value)"], val.element("value"));
                expr = expr.call_with_lambda("mapValues", safe, lambda);
            }
            (true, true) => {
                let pair = key.element("key").binary("to", val.element("value"));
                let lambda = Lambda::with_params(&["(key, value)"], pair);
                expr = expr
                    .call_with_lambda("map", safe, lambda)
                    .call("toMap", Vec::new(), safe);
            }
        }

        let current = if key.transforms() || val.transforms() {
            MapKind::Map
        } else {
            source_kind
        };
        let mut rebuild = !current.is_a(target_kind);
        let mut cast = false;
        // Keys are invariant everywhere; values only in mutable kinds.
        let widened = [
            (&key, true),
            (&val, !target_kind.covariant_values()),
        ];
        for (step, invariant) in widened {
            if let ElementStep::Widened { nullability_only } = step {
                if invariant && !rebuild {
                    if *nullability_only {
                        cast = true;
                    } else {
                        rebuild = true;
                    }
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
