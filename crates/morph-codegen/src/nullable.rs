//! Nullability rule shared by all converters.
//!
//! Converting a nullable source into a non-null target needs a `!!` assertion.
//! Converters match on the non-null forms of both sides and then re-apply the
//! rule through [`handle_nullable`]; each level of a composite conversion
//! (container, then every type argument) does this for its own pair only, so
//! an assertion is never counted twice.

use crate::context::ConversionContext;
use crate::ir::{Expr, Lambda};
use morph_schema::TypeRef;

pub fn needs_not_null_assertion(source: &TypeRef, target: &TypeRef) -> bool {
    source.nullable && !target.nullable
}

/// Test `check` against the non-null forms of both types, then apply the
/// nullability rule: a pairing that needs an assertion only matches when
/// `enforce_not_null` is on.
pub fn handle_nullable<F>(cx: &ConversionContext<'_>, source: &TypeRef, target: &TypeRef, check: F) -> bool
where
    F: FnOnce(&TypeRef, &TypeRef) -> bool,
{
    if needs_not_null_assertion(source, target) && !cx.options().enforce_not_null {
        return false;
    }
    check(&source.as_non_null(), &target.as_non_null())
}

/// Append `!!` when the pair needs it.
pub fn assert_not_null_if_needed(expr: Expr, source: &TypeRef, target: &TypeRef) -> Expr {
    if needs_not_null_assertion(source, target) {
        expr.not_null()
    } else {
        expr
    }
}

/// Apply `f` to a value that may be null: `value?.let { f(it) }` when
/// nullable, `f(value)` otherwise.
pub fn let_if_nullable<F>(value: Expr, nullable: bool, f: F) -> Expr
where
    F: FnOnce(Expr) -> Expr,
{
    if nullable {
        value.call_with_lambda("let", true, Lambda::it(f(Expr::it())))
    } else {
        f(value)
    }
}
