//! Conversions between primitive kinds.
//!
//! Every ordered pair of [`Primitive`] kinds that has a sensible coercion gets
//! one [`Coercion`] entry, named `<From>To<To>Converter`. Pairs that are plain
//! assignments (`Int -> Number`) are left to the same-type converter.

use super::coercion::{Coercion, Step};
use crate::ir::Expr;
use morph_schema::names;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Boolean,
    Char,
    Byte,
    UByte,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    Number,
}

impl Primitive {
    pub const ALL: [Primitive; 14] = [
        Primitive::String,
        Primitive::Boolean,
        Primitive::Char,
        Primitive::Byte,
        Primitive::UByte,
        Primitive::Short,
        Primitive::UShort,
        Primitive::Int,
        Primitive::UInt,
        Primitive::Long,
        Primitive::ULong,
        Primitive::Float,
        Primitive::Double,
        Primitive::Number,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Primitive::String => names::STRING,
            Primitive::Boolean => names::BOOLEAN,
            Primitive::Char => names::CHAR,
            Primitive::Byte => names::BYTE,
            Primitive::UByte => names::UBYTE,
            Primitive::Short => names::SHORT,
            Primitive::UShort => names::USHORT,
            Primitive::Int => names::INT,
            Primitive::UInt => names::UINT,
            Primitive::Long => names::LONG,
            Primitive::ULong => names::ULONG,
            Primitive::Float => names::FLOAT,
            Primitive::Double => names::DOUBLE,
            Primitive::Number => names::NUMBER,
        }
    }

    pub fn simple_name(self) -> &'static str {
        names::simple_name(self.name())
    }

    fn is_unsigned(self) -> bool {
        matches!(
            self,
            Primitive::UByte | Primitive::UShort | Primitive::UInt | Primitive::ULong
        )
    }

    fn is_floating(self) -> bool {
        matches!(self, Primitive::Float | Primitive::Double)
    }

    /// Concrete numeric kinds, excluding the abstract `Number`.
    fn is_numeric(self) -> bool {
        !matches!(
            self,
            Primitive::String | Primitive::Boolean | Primitive::Char | Primitive::Number
        )
    }

    /// Kinds whose values are instances of `kotlin.Number`.
    fn is_number_subtype(self) -> bool {
        self.is_numeric() && !self.is_unsigned()
    }

    /// The `toX` conversion function targeting this kind.
    fn to_method(self) -> &'static str {
        match self {
            Primitive::String => "toString",
            Primitive::Boolean => "toBoolean",
            Primitive::Char => "toChar",
            Primitive::Byte => "toByte",
            Primitive::UByte => "toUByte",
            Primitive::Short => "toShort",
            Primitive::UShort => "toUShort",
            Primitive::Int => "toInt",
            Primitive::UInt => "toUInt",
            Primitive::Long => "toLong",
            Primitive::ULong => "toULong",
            Primitive::Float => "toFloat",
            Primitive::Double => "toDouble",
            Primitive::Number => "toDouble",
        }
    }

    /// Literal zero and one of a numeric kind.
    fn zero_and_one(self) -> (&'static str, &'static str) {
        match self {
            Primitive::Byte => ("0.toByte()", "1.toByte()"),
            Primitive::UByte => ("0.toUByte()", "1.toUByte()"),
            Primitive::Short => ("0.toShort()", "1.toShort()"),
            Primitive::UShort => ("0.toUShort()", "1.toUShort()"),
            Primitive::UInt => ("0u", "1u"),
            Primitive::Long => ("0L", "1L"),
            Primitive::ULong => ("0uL", "1uL"),
            Primitive::Float => ("0f", "1f"),
            Primitive::Double => ("0.0", "1.0"),
            _ => ("0", "1"),
        }
    }
}

/// Coercion steps for `from -> to`, with whether the entry is enabled by
/// default. `None` when the pair has no coercion.
fn coercion_steps(from: Primitive, to: Primitive) -> Option<(Vec<Step>, bool)> {
    use Primitive as P;

    if from == to {
        return None;
    }
    let steps = match (from, to) {
        (_, P::String) => vec![Step::Method("toString")],
        (P::String, P::Boolean) => vec![Step::Method("toBoolean")],
        (P::String, P::Char) => vec![Step::Method("first")],
        (P::String, _) => vec![Step::Method(to.to_method())],

        (P::Boolean, P::Char) | (P::Char, P::Boolean) => return None,
        // Boolean <-> numeric is lossy: opt-in only.
        (P::Boolean, _) => {
            let (zero, one) = to.zero_and_one();
            let body = Expr::If {
                cond: Box::new(Expr::it()),
                then: Box::new(Expr::raw(one)),
                otherwise: Box::new(Expr::raw(zero)),
            };
            return Some((vec![Step::Let(body)], false));
        }
        (P::Number, P::Boolean) => {
            let body = Expr::it()
                .call("toInt", Vec::new(), false)
                .binary("!=", Expr::raw("0"));
            return Some((vec![Step::Let(body)], false));
        }
        (_, P::Boolean) => {
            let (zero, _) = from.zero_and_one();
            let body = Expr::it().binary("!=", Expr::raw(zero));
            return Some((vec![Step::Let(body)], false));
        }

        (P::Char, P::Int) | (P::Char, P::Number) => vec![Step::Property("code")],
        (P::Char, _) => vec![Step::Property("code"), Step::Method(to.to_method())],
        (P::Int, P::Char) | (P::UShort, P::Char) => vec![Step::Construct(names::CHAR)],
        (_, P::Char) if from.is_floating() => return None,
        (_, P::Char) => vec![Step::Method("toInt"), Step::Construct(names::CHAR)],

        (_, P::Number) if from.is_number_subtype() => return None,
        (_, P::Number) => vec![Step::Method("toLong")],
        (P::Number, _) if to.is_unsigned() => vec![Step::Method("toLong"), Step::Method(to.to_method())],
        (_, P::UByte | P::UShort) if from.is_floating() => {
            vec![Step::Method("toInt"), Step::Method(to.to_method())]
        }
        _ => vec![Step::Method(to.to_method())],
    };
    Some((steps, true))
}

/// All primitive coercions.
pub fn coercions() -> Vec<Coercion> {
    let mut out = Vec::new();
    for from in Primitive::ALL {
        for to in Primitive::ALL {
            let Some((steps, enabled)) = coercion_steps(from, to) else {
                continue;
            };
            let id = format!("{}To{}Converter", from.simple_name(), to.simple_name());
            let coercion = Coercion::new(id, from.name(), to.name(), steps);
            out.push(if enabled { coercion } else { coercion.disabled() });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapperOptions;
    use crate::context::ConversionContext;
    use crate::output::KotlinWriter;
    use crate::registry::ConverterRegistry;
    use crate::traits::TypeConverter;
    use morph_schema::{TypeCatalog, TypeRef};

    fn registry() -> ConverterRegistry {
        let mut builder = ConverterRegistry::builder();
        for coercion in coercions() {
            builder = builder.register(coercion);
        }
        builder.build()
    }

    fn convert(registry: &ConverterRegistry, options: &MapperOptions, source: &str, target: &str) -> Option<String> {
        let catalog = TypeCatalog::new();
        let cx = ConversionContext::new(registry, &catalog, options);
        let (s, t) = (TypeRef::parse(source).unwrap(), TypeRef::parse(target).unwrap());
        cx.convert(Expr::ident("x"), &s, &t)
            .ok()
            .map(|e| KotlinWriter::expr_to_string(&e))
    }

    #[test]
    fn test_common_coercions() {
        let registry = registry();
        let options = MapperOptions::default();
        let cases = [
            ("String", "Int", "x.toInt()"),
            ("Int", "String", "x.toString()"),
            ("String", "Char", "x.first()"),
            ("Char", "Int", "x.code"),
            ("Char", "ULong", "x.code.toULong()"),
            ("Long", "Char", "Char(x.toInt())"),
            ("UInt", "Number", "x.toLong()"),
            ("Number", "UInt", "x.toLong().toUInt()"),
            ("Double", "UByte", "x.toInt().toUByte()"),
            ("Int?", "Long?", "x?.toLong()"),
        ];
        for (source, target, expected) in cases {
            assert_eq!(
                convert(&registry, &options, source, target).as_deref(),
                Some(expected),
                "{source} -> {target}"
            );
        }
    }

    #[test]
    fn test_boolean_numeric_is_opt_in() {
        let registry = registry();
        assert_eq!(convert(&registry, &MapperOptions::default(), "Boolean", "Int"), None);

        let options = MapperOptions::default()
            .enabling("BooleanToIntConverter")
            .enabling("LongToBooleanConverter");
        assert_eq!(
            convert(&registry, &options, "Boolean", "Int").as_deref(),
            Some("x.let { if (it) 1 else 0 }")
        );
        assert_eq!(
            convert(&registry, &options, "Long", "Boolean").as_deref(),
            Some("x.let { it != 0L }")
        );
    }

    #[test]
    fn test_no_entry_for_assignable_pairs() {
        let all = coercions();
        assert!(all.iter().all(|c| c.id() != "IntToNumberConverter"));
        assert!(all.iter().all(|c| c.id() != "IntToIntConverter"));
        assert!(all.iter().any(|c| c.id() == "StringToIntConverter"));
        assert!(all.iter().all(|c| c.source_name() != c.target_name()));
    }
}
