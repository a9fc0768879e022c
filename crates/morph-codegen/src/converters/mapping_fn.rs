//! Other generated mapping functions, used as converters.
//!
//! Nested classes are mapped by calling the function generated for them, so a
//! `Person -> PersonDto` mapping can convert an `Address` property through a
//! previously declared `Address.toDto()`.

use crate::assign::is_assignable;
use crate::context::ConversionContext;
use crate::error::MappingError;
use crate::ir::{Arg, Expr};
use crate::nullable::{assert_not_null_if_needed, handle_nullable, let_if_nullable};
use crate::priority::Priority;
use crate::traits::TypeConverter;
use morph_schema::TypeRef;
use serde::{Deserialize, Serialize};

/// How a mapping function is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum CallStyle {
    /// `value.name()`; a qualified name is imported.
    Extension { name: String },
    /// `Owner.name(value)`
    Function { owner: String, name: String },
}

/// A mapping function declared outside the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingFunction {
    pub source: TypeRef,
    pub target: TypeRef,
    #[serde(flatten)]
    pub call: CallStyle,
}

impl MappingFunction {
    pub fn extension(source: TypeRef, target: TypeRef, name: impl Into<String>) -> Self {
        Self {
            source,
            target,
            call: CallStyle::Extension { name: name.into() },
        }
    }

    pub fn function(
        source: TypeRef,
        target: TypeRef,
        owner: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            source,
            target,
            call: CallStyle::Function {
                owner: owner.into(),
                name: name.into(),
            },
        }
    }
}

pub struct MappingFunctionConverter {
    id: String,
    function: MappingFunction,
}

impl MappingFunctionConverter {
    pub fn new(function: MappingFunction) -> Self {
        let name = match &function.call {
            CallStyle::Extension { name } => name.clone(),
            CallStyle::Function { owner, name } => format!("{owner}.{name}"),
        };
        Self {
            id: format!("{name}:{}->{}", function.source, function.target),
            function,
        }
    }

    pub fn function(&self) -> &MappingFunction {
        &self.function
    }
}

impl TypeConverter for MappingFunctionConverter {
    fn id(&self) -> &str {
        &self.id
    }

    fn priority(&self) -> Priority {
        Priority::MAPPING_FUNCTION
    }

    fn matches(&self, cx: &ConversionContext<'_>, source: &TypeRef, target: &TypeRef) -> bool {
        handle_nullable(cx, source, target, |s, t| {
            *s == self.function.source.as_non_null()
                && is_assignable(cx.catalog(), &self.function.target.as_non_null(), t)
        })
    }

    fn convert(
        &self,
        _cx: &ConversionContext<'_>,
        value: Expr,
        source: &TypeRef,
        target: &TypeRef,
    ) -> Result<Expr, MappingError> {
        let mapped = match &self.function.call {
            CallStyle::Extension { name } => value.call(name, Vec::new(), source.nullable),
            CallStyle::Function { owner, name } => let_if_nullable(value, source.nullable, |v| {
                Expr::type_name(owner).call(name, vec![Arg::positional(v)], false)
            }),
        };
        Ok(assert_not_null_if_needed(mapped, source, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapperOptions;
    use crate::output::KotlinWriter;
    use crate::registry::ConverterRegistry;
    use morph_schema::TypeCatalog;

    fn ty(s: &str) -> TypeRef {
        TypeRef::parse(s).unwrap()
    }

    fn registry() -> ConverterRegistry {
        ConverterRegistry::builder()
            .with_builtins()
            .mapping_function(MappingFunction::extension(
                ty("com.example.Address"),
                ty("com.example.AddressDto"),
                "com.example.mapping.toDto",
            ))
            .mapping_function(MappingFunction::function(
                ty("com.example.Tag"),
                ty("String"),
                "com.example.TagMapper",
                "label",
            ))
            .build()
    }

    #[test]
    fn test_extension_call() {
        let registry = registry();
        let catalog = TypeCatalog::new();
        let options = MapperOptions::default();
        let cx = ConversionContext::new(&registry, &catalog, &options);

        let expr = cx
            .convert(Expr::ident("address"), &ty("com.example.Address?"), &ty("com.example.AddressDto?"))
            .unwrap();
        assert_eq!(KotlinWriter::expr_to_string(&expr), "address?.toDto()");
    }

    #[test]
    fn test_object_function_call() {
        let registry = registry();
        let catalog = TypeCatalog::new();
        let options = MapperOptions::default().with_enforce_not_null(true);
        let cx = ConversionContext::new(&registry, &catalog, &options);

        let render = |s: &str, t: &str| {
            cx.convert(Expr::ident("tag"), &ty(s), &ty(t))
                .map(|e| KotlinWriter::expr_to_string(&e))
                .unwrap()
        };
        assert_eq!(render("com.example.Tag", "String"), "TagMapper.label(tag)");
        assert_eq!(render("com.example.Tag?", "String"), "tag?.let { TagMapper.label(it) }!!");
    }

    #[test]
    fn test_mapping_functions_rank_after_builtins() {
        let registry = registry();
        let last = registry.converters().last().unwrap();
        assert_eq!(last.priority(), Priority::MAPPING_FUNCTION);
        assert!(last.id().starts_with("com.example.TagMapper.label:"));
    }

    #[test]
    fn test_deserialize_call_style() {
        let function: MappingFunction = serde_json::from_str(
            r#"{ "source": "com.example.Tag", "target": "String", "style": "function", "owner": "com.example.TagMapper", "name": "label" }"#,
        )
        .unwrap();
        assert_eq!(
            function.call,
            CallStyle::Function {
                owner: "com.example.TagMapper".into(),
                name: "label".into()
            }
        );
    }
}
