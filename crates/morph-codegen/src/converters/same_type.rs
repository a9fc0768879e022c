use crate::assign::is_assignable;
use crate::context::ConversionContext;
use crate::error::MappingError;
use crate::ir::Expr;
use crate::nullable::{assert_not_null_if_needed, handle_nullable};
use crate::priority::Priority;
use crate::traits::TypeConverter;
use morph_schema::TypeRef;

/// Passes values through when the source is assignable to the target.
pub struct SameTypeConverter;

impl TypeConverter for SameTypeConverter {
    fn id(&self) -> &str {
        "SameTypeConverter"
    }

    fn priority(&self) -> Priority {
        Priority::SAME_TYPE
    }

    fn matches(&self, cx: &ConversionContext<'_>, source: &TypeRef, target: &TypeRef) -> bool {
        handle_nullable(cx, source, target, |s, t| is_assignable(cx.catalog(), s, t))
    }

    fn convert(
        &self,
        _cx: &ConversionContext<'_>,
        value: Expr,
        source: &TypeRef,
        target: &TypeRef,
    ) -> Result<Expr, MappingError> {
        Ok(assert_not_null_if_needed(value, source, target))
    }
}
