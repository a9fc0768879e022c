//! Enum conversions.
//!
//! Enum to enum maps constants by name and fails when the target lacks any of
//! the source constants. The scalar family converts enums to and from their
//! name or ordinal; the ordinal variants are lossy and disabled by default.

use crate::context::ConversionContext;
use crate::error::MappingError;
use crate::ir::{Arg, Expr, WhenArm};
use crate::nullable::{assert_not_null_if_needed, handle_nullable, let_if_nullable};
use crate::priority::Priority;
use crate::traits::TypeConverter;
use morph_schema::{EnumDecl, TypeRef, names};
use std::sync::Arc;

/// Numeric kinds an ordinal can be read as or looked up from.
const ORDINAL_KINDS: &[&str] = &[
    names::INT,
    names::BYTE,
    names::SHORT,
    names::LONG,
    names::UBYTE,
    names::USHORT,
    names::UINT,
    names::ULONG,
    names::FLOAT,
    names::DOUBLE,
];

fn enumeration<'a>(cx: &ConversionContext<'a>, ty: &TypeRef) -> Result<&'a EnumDecl, MappingError> {
    cx.catalog()
        .enumeration(&ty.name)
        .ok_or_else(|| MappingError::UnknownType(ty.name.clone()))
}

fn is_enum(cx: &ConversionContext<'_>, ty: &TypeRef) -> bool {
    ty.args.is_empty() && cx.catalog().is_enum(&ty.name)
}

/// Exhaustive `when` from one enum to another by constant name.
pub struct EnumToEnumConverter;

impl TypeConverter for EnumToEnumConverter {
    fn id(&self) -> &str {
        "EnumToEnumConverter"
    }

    fn matches(&self, cx: &ConversionContext<'_>, source: &TypeRef, target: &TypeRef) -> bool {
        handle_nullable(cx, source, target, |s, t| is_enum(cx, s) && is_enum(cx, t))
    }

    fn convert(
        &self,
        cx: &ConversionContext<'_>,
        value: Expr,
        source: &TypeRef,
        target: &TypeRef,
    ) -> Result<Expr, MappingError> {
        let from = enumeration(cx, source)?;
        let to = enumeration(cx, target)?;

        let missing: Vec<String> = from
            .constants
            .iter()
            .filter(|c| !to.constants.contains(c))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(MappingError::MissingEnumValues {
                from: source.as_non_null(),
                to: target.as_non_null(),
                missing,
            });
        }

        let mut arms: Vec<WhenArm> = from
            .constants
            .iter()
            .map(|constant| WhenArm {
                pattern: Expr::type_name(&source.name).member(constant, false),
                value: Expr::type_name(&target.name).member(constant, false),
            })
            .collect();
        if source.nullable {
            arms.push(WhenArm {
                pattern: Expr::Null,
                value: Expr::Null,
            });
        }
        let dispatch = Expr::When {
            subject: Box::new(value),
            arms,
        };
        Ok(assert_not_null_if_needed(dispatch, source, target))
    }
}

/// `value.name`
pub struct EnumToStringConverter;

impl TypeConverter for EnumToStringConverter {
    fn id(&self) -> &str {
        "EnumToStringConverter"
    }

    fn matches(&self, cx: &ConversionContext<'_>, source: &TypeRef, target: &TypeRef) -> bool {
        handle_nullable(cx, source, target, |s, t| is_enum(cx, s) && t.is(names::STRING))
    }

    fn convert(
        &self,
        _cx: &ConversionContext<'_>,
        value: Expr,
        source: &TypeRef,
        target: &TypeRef,
    ) -> Result<Expr, MappingError> {
        let name = value.member("name", source.nullable);
        Ok(assert_not_null_if_needed(name, source, target))
    }
}

/// `Enum.valueOf(value)`
pub struct StringToEnumConverter;

impl TypeConverter for StringToEnumConverter {
    fn id(&self) -> &str {
        "StringToEnumConverter"
    }

    fn matches(&self, cx: &ConversionContext<'_>, source: &TypeRef, target: &TypeRef) -> bool {
        handle_nullable(cx, source, target, |s, t| s.is(names::STRING) && is_enum(cx, t))
    }

    fn convert(
        &self,
        _cx: &ConversionContext<'_>,
        value: Expr,
        source: &TypeRef,
        target: &TypeRef,
    ) -> Result<Expr, MappingError> {
        let parsed = let_if_nullable(value, source.nullable, |v| {
            Expr::type_name(&target.name).call("valueOf", vec![Arg::positional(v)], false)
        });
        Ok(assert_not_null_if_needed(parsed, source, target))
    }
}

/// `value.ordinal`, converted to a numeric kind.
pub struct EnumToOrdinalConverter {
    id: String,
    number: &'static str,
}

impl EnumToOrdinalConverter {
    pub fn new(number: &'static str) -> Self {
        Self {
            id: format!("EnumTo{}Converter", names::simple_name(number)),
            number,
        }
    }
}

impl TypeConverter for EnumToOrdinalConverter {
    fn id(&self) -> &str {
        &self.id
    }

    fn enabled_by_default(&self) -> bool {
        false
    }

    fn matches(&self, cx: &ConversionContext<'_>, source: &TypeRef, target: &TypeRef) -> bool {
        handle_nullable(cx, source, target, |s, t| is_enum(cx, s) && t.is(self.number))
    }

    fn convert(
        &self,
        _cx: &ConversionContext<'_>,
        value: Expr,
        source: &TypeRef,
        target: &TypeRef,
    ) -> Result<Expr, MappingError> {
        let mut ordinal = value.member("ordinal", source.nullable);
        if self.number != names::INT {
            let method = format!("to{}", names::simple_name(self.number));
            ordinal = ordinal.call(method, Vec::new(), source.nullable);
        }
        Ok(assert_not_null_if_needed(ordinal, source, target))
    }
}

/// `Enum.entries[value]`
pub struct OrdinalToEnumConverter {
    id: String,
    number: &'static str,
}

impl OrdinalToEnumConverter {
    pub fn new(number: &'static str) -> Self {
        Self {
            id: format!("{}ToEnumConverter", names::simple_name(number)),
            number,
        }
    }
}

impl TypeConverter for OrdinalToEnumConverter {
    fn id(&self) -> &str {
        &self.id
    }

    fn enabled_by_default(&self) -> bool {
        false
    }

    fn priority(&self) -> Priority {
        if self.number == names::INT {
            Priority::DEFAULT.minus(1)
        } else {
            Priority::DEFAULT
        }
    }

    fn matches(&self, cx: &ConversionContext<'_>, source: &TypeRef, target: &TypeRef) -> bool {
        handle_nullable(cx, source, target, |s, t| s.is(self.number) && is_enum(cx, t))
    }

    fn convert(
        &self,
        _cx: &ConversionContext<'_>,
        value: Expr,
        source: &TypeRef,
        target: &TypeRef,
    ) -> Result<Expr, MappingError> {
        let lookup = let_if_nullable(value, source.nullable, |v| {
            let index = if self.number == names::INT {
                v
            } else {
                v.call("toInt", Vec::new(), false)
            };
            Expr::type_name(&target.name).member("entries", false).index(index)
        });
        Ok(assert_not_null_if_needed(lookup, source, target))
    }
}

/// The enum/scalar family, in registration order.
pub fn scalar_converters() -> Vec<Arc<dyn TypeConverter>> {
    let mut out: Vec<Arc<dyn TypeConverter>> =
        vec![Arc::new(EnumToStringConverter), Arc::new(StringToEnumConverter)];
    for &number in ORDINAL_KINDS {
        out.push(Arc::new(EnumToOrdinalConverter::new(number)));
        out.push(Arc::new(OrdinalToEnumConverter::new(number)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapperOptions;
    use crate::output::KotlinWriter;
    use crate::registry::ConverterRegistry;
    use morph_schema::{TypeCatalog, TypeDecl};

    fn catalog() -> TypeCatalog {
        let mut catalog = TypeCatalog::new();
        catalog.add(TypeDecl::enumeration("a.Color", ["RED", "GREEN"]));
        catalog.add(TypeDecl::enumeration("b.Color", ["GREEN", "RED", "BLUE"]));
        catalog.add(TypeDecl::enumeration("b.Shade", ["RED"]));
        catalog
    }

    fn ty(s: &str) -> TypeRef {
        TypeRef::parse(s).unwrap()
    }

    #[test]
    fn test_enum_dispatch_is_exhaustive() {
        let registry = ConverterRegistry::builder().build();
        let catalog = catalog();
        let options = MapperOptions::default();
        let cx = ConversionContext::new(&registry, &catalog, &options);

        let expr = EnumToEnumConverter
            .convert(&cx, Expr::ident("color"), &ty("a.Color?"), &ty("b.Color?"))
            .unwrap();
        let Expr::When { arms, .. } = &expr else {
            panic!("expected when, got {expr:?}");
        };
        assert_eq!(arms.len(), 3);
        insta::assert_snapshot!(KotlinWriter::expr_to_string(&expr), @r"
        when (color) {
            Color.RED -> b.Color.RED
            Color.GREEN -> b.Color.GREEN
            null -> null
        }
        ");
    }

    #[test]
    fn test_missing_constant_fails() {
        let registry = ConverterRegistry::builder().build();
        let catalog = catalog();
        let options = MapperOptions::default();
        let cx = ConversionContext::new(&registry, &catalog, &options);

        let err = EnumToEnumConverter
            .convert(&cx, Expr::ident("color"), &ty("b.Color"), &ty("b.Shade"))
            .unwrap_err();
        assert_eq!(
            err,
            MappingError::MissingEnumValues {
                from: ty("b.Color"),
                to: ty("b.Shade"),
                missing: vec!["GREEN".into(), "BLUE".into()],
            }
        );
    }

    #[test]
    fn test_scalar_family() {
        let registry = scalar_converters()
            .into_iter()
            .fold(ConverterRegistry::builder(), |b, c| b.register_arc(c))
            .build();
        let catalog = catalog();
        let options = MapperOptions::default();
        let cx = ConversionContext::new(&registry, &catalog, &options);
        let render = |s: &str, t: &str| {
            cx.convert(Expr::ident("c"), &ty(s), &ty(t))
                .map(|e| KotlinWriter::expr_to_string(&e))
        };

        assert_eq!(render("a.Color", "String").unwrap(), "c.name");
        assert_eq!(render("String?", "a.Color?").unwrap(), "c?.let { Color.valueOf(it) }");
        assert!(render("a.Color", "Int").is_err());

        let _scope = cx.enable(["EnumToLongConverter", "IntToEnumConverter", "LongToEnumConverter"]);
        assert_eq!(render("a.Color?", "Long?").unwrap(), "c?.ordinal?.toLong()");
        assert_eq!(render("Int", "a.Color").unwrap(), "Color.entries[c]");
        assert_eq!(render("Long", "a.Color").unwrap(), "Color.entries[c.toInt()]");
    }
}
