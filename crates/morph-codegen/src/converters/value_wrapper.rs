//! Single-field wrapper types (`value class Id(val value: String)`).

use crate::context::ConversionContext;
use crate::error::MappingError;
use crate::ir::{Arg, Expr};
use crate::nullable::{assert_not_null_if_needed, handle_nullable, let_if_nullable};
use crate::traits::TypeConverter;
use morph_schema::{ClassDecl, Constructor, Parameter, TypeRef};

fn wrapper<'a>(cx: &ConversionContext<'a>, ty: &TypeRef) -> Option<&'a ClassDecl> {
    cx.catalog()
        .class(&ty.name)
        .filter(|class| class.value_wrapper && ty.args.is_empty())
}

/// The wrapped field: the only parameter of the primary (or sole) constructor.
fn wrapped_field(class: &ClassDecl) -> Option<&Parameter> {
    let constructor = class
        .primary_constructor()
        .or_else(|| match class.constructors.as_slice() {
            [only] => Some(only),
            _ => None,
        })?;
    match constructor.params.as_slice() {
        [param] => Some(param),
        _ => None,
    }
}

/// Unwraps `wrapper.value` and converts the wrapped value to the target.
pub struct ValueWrapperToXConverter;

impl TypeConverter for ValueWrapperToXConverter {
    fn id(&self) -> &str {
        "ValueWrapperToXConverter"
    }

    fn matches(&self, cx: &ConversionContext<'_>, source: &TypeRef, target: &TypeRef) -> bool {
        handle_nullable(cx, source, target, |s, t| {
            let Some(field) = wrapper(cx, s).and_then(wrapped_field) else {
                return false;
            };
            s != t && cx.find_converter(&field.ty, t).is_some()
        })
    }

    fn convert(
        &self,
        cx: &ConversionContext<'_>,
        value: Expr,
        source: &TypeRef,
        target: &TypeRef,
    ) -> Result<Expr, MappingError> {
        let field = wrapper(cx, source)
            .and_then(wrapped_field)
            .ok_or_else(|| MappingError::UnknownType(source.name.clone()))?;
        let inner = field.ty.with_nullability(field.ty.nullable || source.nullable);
        let unwrapped = value.member(&field.name, source.nullable);
        cx.convert(unwrapped, &inner, target)
    }
}

/// Wraps a value into a wrapper type through its best single-parameter
/// constructor.
pub struct XToValueWrapperConverter;

impl XToValueWrapperConverter {
    /// The single-parameter constructor whose parameter is reachable from
    /// `source` through the best-ranked converter; ties go to the earlier one.
    fn select<'a>(
        cx: &ConversionContext<'a>,
        class: &'a ClassDecl,
        source: &TypeRef,
    ) -> Option<&'a Parameter> {
        class
            .constructors
            .iter()
            .filter_map(|c: &'a Constructor| match c.params.as_slice() {
                [param] => Some(param),
                _ => None,
            })
            .filter_map(|param| {
                cx.find_converter(source, &param.ty)
                    .map(|converter| (converter.priority(), param))
            })
            .min_by_key(|(priority, _)| *priority)
            .map(|(_, param)| param)
    }
}

impl TypeConverter for XToValueWrapperConverter {
    fn id(&self) -> &str {
        "XToValueWrapperConverter"
    }

    fn matches(&self, cx: &ConversionContext<'_>, source: &TypeRef, target: &TypeRef) -> bool {
        handle_nullable(cx, source, target, |s, t| match wrapper(cx, t) {
            Some(class) => s != t && Self::select(cx, class, s).is_some(),
            None => false,
        })
    }

    fn convert(
        &self,
        cx: &ConversionContext<'_>,
        value: Expr,
        source: &TypeRef,
        target: &TypeRef,
    ) -> Result<Expr, MappingError> {
        let plain = source.as_non_null();
        let param = wrapper(cx, target)
            .and_then(|class| Self::select(cx, class, &plain))
            .ok_or_else(|| MappingError::no_converter(source, target))?;

        let element = if source.nullable {
            Expr::it()
        } else {
            value.clone()
        };
        let inner = cx.convert(element, &plain, &param.ty)?;
        let wrapped = Expr::function(&target.name, vec![Arg::positional(inner)]);
        let expr = if source.nullable {
            let_if_nullable(value, true, |_| wrapped)
        } else {
            wrapped
        };
        Ok(assert_not_null_if_needed(expr, source, target))
    }
}
