//! Mapping function bodies.
//!
//! The generator performs no conversion of its own: it decides which value
//! feeds each constructor parameter and settable property, asks the context
//! to convert it, and sequences the results into a [`Fragment`].

use super::MappingOutput;
use super::constructor::select_constructor;
use super::intent::{IntentSet, IntentValue, PropertyIntent, resolve_intents};
use crate::config::NonConstructorProperties;
use crate::context::ConversionContext;
use crate::error::MappingError;
use crate::ir::{Arg, Expr, Fragment, Lambda, Stmt};
use morph_schema::{ClassDecl, MappingRequest, Parameter, TypeRef};
use std::collections::HashSet;
use tracing::debug;

/// Everything the value of one intent is computed from.
struct Inputs<'r> {
    request: &'r MappingRequest,
    source: &'r ClassDecl,
    target: &'r str,
}

impl Inputs<'_> {
    /// The source object: the named parameter, or the extension receiver.
    fn receiver(&self) -> Expr {
        Expr::ident(self.request.source_param.as_deref().unwrap_or("this"))
    }

    fn read(&self, property: &str) -> Expr {
        match &self.request.source_param {
            Some(param) => Expr::ident(param).member(property, false),
            None => Expr::ident(property),
        }
    }

    fn not_existing(&self, property: &str) -> MappingError {
        MappingError::PropertyMappingNotExisting {
            target: self.target.to_string(),
            property: property.to_string(),
        }
    }

    /// The value for `ty` described by `intent`, `None` when ignored.
    fn value(
        &self,
        cx: &ConversionContext<'_>,
        intent: &PropertyIntent,
        ty: &TypeRef,
    ) -> Result<Option<Expr>, MappingError> {
        let expr = match intent.value() {
            IntentValue::Ignore => return Ok(None),
            IntentValue::Constant(code) => Expr::raw(code),
            IntentValue::Expression(code) => {
                self.receiver()
                    .call_with_lambda("let", false, Lambda::it(Expr::raw(code)))
            }
            IntentValue::Source(name) => {
                let property = self
                    .source
                    .property(name)
                    .ok_or_else(|| self.not_existing(&intent.target))?;
                let _scope = cx.enable(intent.enable.iter().cloned());
                cx.convert(self.read(name), &property.ty, ty)
                    .map_err(|e| e.in_field(&intent.target))?
            }
        };
        debug!(field = %intent.target, origin = ?intent.origin, "resolved property");
        Ok(Some(expr))
    }
}

/// Constructor arguments; `None` marks an omitted defaulted parameter.
fn constructor_args(
    cx: &ConversionContext<'_>,
    inputs: &Inputs<'_>,
    intents: &IntentSet,
    params: &[Parameter],
    named: bool,
) -> Result<Vec<Arg>, MappingError> {
    let mut values = Vec::with_capacity(params.len());
    for param in params {
        let value = match intents.for_target(&param.name) {
            Some(intent) => inputs.value(cx, intent, &param.ty)?,
            None => None,
        };
        let value = match value {
            Some(expr) => Some(expr),
            None if param.has_default => None,
            None if param.ty.nullable => Some(Expr::Null),
            None => return Err(inputs.not_existing(&param.name)),
        };
        values.push(value);
    }

    if named {
        return Ok(params
            .iter()
            .zip(values)
            .filter_map(|(param, value)| value.map(|v| Arg::named(&param.name, v)))
            .collect());
    }

    // Positional arguments can only leave out a trailing run of parameters.
    let supplied = values.iter().rposition(Option::is_some).map_or(0, |i| i + 1);
    if let Some(gap) = values[..supplied].iter().position(Option::is_none) {
        return Err(inputs.not_existing(&params[gap].name));
    }
    Ok(values.into_iter().flatten().map(Arg::positional).collect())
}

/// Whether a settable property outside the constructor gets assigned.
fn assigns(policy: NonConstructorProperties, intent: &PropertyIntent) -> bool {
    if intent.is_ignored() {
        return false;
    }
    match policy {
        NonConstructorProperties::Ignore => intent.is_directive(),
        NonConstructorProperties::Auto | NonConstructorProperties::Strict => true,
    }
}

/// Name of the local holding the constructed object. It must not shadow the
/// source parameter, nor a receiver property read by its bare name.
fn local_name(request: &MappingRequest, source: &ClassDecl) -> String {
    let taken = |name: &str| match &request.source_param {
        Some(param) => param == name,
        None => source.property(name).is_some(),
    };
    ["target", "result"]
        .into_iter()
        .map(str::to_string)
        .chain((1..).map(|n| format!("target{}", n)))
        .find(|name| !taken(name))
        .unwrap_or_default()
}

/// Generate the body of the mapping function for `request`.
pub fn generate(cx: &ConversionContext<'_>, request: &MappingRequest) -> Result<MappingOutput, MappingError> {
    let catalog = cx.catalog();
    let source = catalog
        .class(&request.source.name)
        .ok_or_else(|| MappingError::UnknownType(request.source.name.clone()))?;
    let target = catalog
        .class(&request.target.name)
        .ok_or_else(|| MappingError::UnknownType(request.target.name.clone()))?;

    let _scope = cx.enable(request.enable.iter().cloned());
    let intents = resolve_intents(&request.directives, &request.fixed, source);
    let choice = select_constructor(
        &request.target.name,
        target,
        &intents,
        request.constructor.as_deref(),
    )?;

    let inputs = Inputs {
        request,
        source,
        target: &request.target.name,
    };
    let params = &choice.constructor.params;
    let args = constructor_args(cx, &inputs, &intents, params, target.named_arguments)?;
    let construct = Expr::function(&request.target.name, args);

    let bound: HashSet<&str> = params.iter().map(|p| p.name.as_str()).collect();
    let policy = cx.options().non_constructor_properties;
    let mut assignments = Vec::new();
    for property in target.properties.iter().filter(|p| p.mutable && !bound.contains(p.name.as_str())) {
        match intents.for_target(&property.name) {
            Some(intent) if assigns(policy, intent) => {
                if let Some(value) = inputs.value(cx, intent, &property.ty)? {
                    assignments.push((property.name.as_str(), value));
                }
            }
            Some(_) => {}
            None => {
                if policy == NonConstructorProperties::Strict
                    && !cx.options().ignore_unmapped_target_properties
                {
                    return Err(inputs.not_existing(&property.name));
                }
            }
        }
    }

    let body = if assignments.is_empty() {
        vec![Stmt::Return { value: construct }]
    } else {
        let local = local_name(request, source);
        let mut body = vec![Stmt::Val {
            name: local.clone(),
            init: construct,
        }];
        body.extend(assignments.into_iter().map(|(name, value)| Stmt::Assign {
            target: Expr::ident(&local).member(name, false),
            value,
        }));
        body.push(Stmt::Return {
            value: Expr::ident(local),
        });
        body
    };

    Ok(MappingOutput {
        fragment: Fragment { body },
        warnings: intents.warnings,
    })
}
