//! Table-driven leaf converters.
//!
//! A [`Coercion`] converts exactly one pair of non-generic declarations by
//! applying a fixed sequence of [`Step`]s. Primitive and temporal conversions
//! are both expressed as tables of coercions.

use crate::context::ConversionContext;
use crate::error::MappingError;
use crate::ir::{Arg, Expr, Lambda};
use crate::nullable::{assert_not_null_if_needed, handle_nullable, let_if_nullable};
use crate::priority::Priority;
use crate::traits::TypeConverter;
use morph_schema::TypeRef;

/// One operation applied to the value being converted.
#[derive(Debug, Clone)]
pub enum Step {
    /// `value.name()`
    Method(&'static str),
    /// `value.name`
    Property(&'static str),
    /// `value.let { body }`, `body` refers to the value as `it`.
    Let(Expr),
    /// `Owner.method(value)`
    Static {
        owner: &'static str,
        method: &'static str,
    },
    /// `Type(value)`
    Construct(&'static str),
}

impl Step {
    /// Apply to `value`; `nullable` values are only touched through `?.`.
    fn apply(&self, value: Expr, nullable: bool) -> Expr {
        match self {
            Step::Method(name) => value.call(*name, Vec::new(), nullable),
            Step::Property(name) => value.member(*name, nullable),
            Step::Let(body) => value.call_with_lambda("let", nullable, Lambda::it(body.clone())),
            Step::Static { owner, method } => let_if_nullable(value, nullable, |v| {
                Expr::type_name(*owner).call(*method, vec![Arg::positional(v)], false)
            }),
            Step::Construct(ty) => let_if_nullable(value, nullable, |v| {
                Expr::function(*ty, vec![Arg::positional(v)])
            }),
        }
    }
}

/// Converter for a single `from -> to` pair.
#[derive(Debug, Clone)]
pub struct Coercion {
    id: String,
    from: &'static str,
    to: &'static str,
    steps: Vec<Step>,
    enabled: bool,
    priority: Priority,
}

impl Coercion {
    pub fn new(id: impl Into<String>, from: &'static str, to: &'static str, steps: Vec<Step>) -> Self {
        Self {
            id: id.into(),
            from,
            to,
            steps,
            enabled: true,
            priority: Priority::DEFAULT,
        }
    }

    /// Require explicit enabling.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[cfg(test)]
    pub(crate) fn source_name(&self) -> &'static str {
        self.from
    }

    #[cfg(test)]
    pub(crate) fn target_name(&self) -> &'static str {
        self.to
    }
}

impl TypeConverter for Coercion {
    fn id(&self) -> &str {
        &self.id
    }

    fn enabled_by_default(&self) -> bool {
        self.enabled
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn matches(&self, cx: &ConversionContext<'_>, source: &TypeRef, target: &TypeRef) -> bool {
        handle_nullable(cx, source, target, |s, t| {
            s.is(self.from) && t.is(self.to) && s.args.is_empty() && t.args.is_empty()
        })
    }

    fn convert(
        &self,
        _cx: &ConversionContext<'_>,
        value: Expr,
        source: &TypeRef,
        target: &TypeRef,
    ) -> Result<Expr, MappingError> {
        let expr = self
            .steps
            .iter()
            .fold(value, |expr, step| step.apply(expr, source.nullable));
        Ok(assert_not_null_if_needed(expr, source, target))
    }
}
