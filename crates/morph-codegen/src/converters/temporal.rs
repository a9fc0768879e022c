//! Conversions between `java.time.Instant`, `java.util.Date`, epoch numbers
//! and ISO strings.

use super::coercion::{Coercion, Step};
use crate::priority::Priority;
use morph_schema::names;

pub fn coercions() -> Vec<Coercion> {
    vec![
        Coercion::new(
            "InstantToStringConverter",
            names::INSTANT,
            names::STRING,
            vec![Step::Method("toString")],
        ),
        Coercion::new(
            "StringToInstantConverter",
            names::STRING,
            names::INSTANT,
            vec![Step::Static {
                owner: names::INSTANT,
                method: "parse",
            }],
        ),
        Coercion::new(
            "InstantToLongConverter",
            names::INSTANT,
            names::LONG,
            vec![Step::Method("toEpochMilli")],
        ),
        Coercion::new(
            "LongToInstantConverter",
            names::LONG,
            names::INSTANT,
            vec![Step::Static {
                owner: names::INSTANT,
                method: "ofEpochMilli",
            }],
        ),
        // Outranks the millisecond variants once enabled.
        Coercion::new(
            "InstantToEpochSecondsConverter",
            names::INSTANT,
            names::LONG,
            vec![Step::Property("epochSecond")],
        )
        .disabled()
        .with_priority(Priority::DEFAULT.minus(1)),
        Coercion::new(
            "EpochSecondsToInstantConverter",
            names::LONG,
            names::INSTANT,
            vec![Step::Static {
                owner: names::INSTANT,
                method: "ofEpochSecond",
            }],
        )
        .disabled()
        .with_priority(Priority::DEFAULT.minus(1)),
        Coercion::new(
            "DateToLongConverter",
            names::DATE,
            names::LONG,
            vec![Step::Property("time")],
        ),
        Coercion::new(
            "LongToDateConverter",
            names::LONG,
            names::DATE,
            vec![Step::Construct(names::DATE)],
        ),
        Coercion::new(
            "DateToInstantConverter",
            names::DATE,
            names::INSTANT,
            vec![Step::Method("toInstant")],
        ),
        Coercion::new(
            "InstantToDateConverter",
            names::INSTANT,
            names::DATE,
            vec![Step::Static {
                owner: names::DATE,
                method: "from",
            }],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapperOptions;
    use crate::context::ConversionContext;
    use crate::ir::Expr;
    use crate::output::KotlinWriter;
    use crate::registry::ConverterRegistry;
    use morph_schema::{ConverterId, TypeCatalog, TypeRef};

    fn registry() -> ConverterRegistry {
        coercions()
            .into_iter()
            .fold(ConverterRegistry::builder(), |b, c| b.register(c))
            .build()
    }

    fn convert(cx: &ConversionContext<'_>, source: &str, target: &str) -> String {
        let (s, t) = (TypeRef::parse(source).unwrap(), TypeRef::parse(target).unwrap());
        let expr = cx.convert(Expr::ident("at"), &s, &t).unwrap();
        KotlinWriter::expr_to_string(&expr)
    }

    #[test]
    fn test_epoch_millis_by_default() {
        let registry = registry();
        let catalog = TypeCatalog::new();
        let options = MapperOptions::default();
        let cx = ConversionContext::new(&registry, &catalog, &options);
        assert_eq!(convert(&cx, "Instant", "Long"), "at.toEpochMilli()");
        assert_eq!(convert(&cx, "Long", "Instant"), "Instant.ofEpochMilli(at)");
    }

    #[test]
    fn test_epoch_seconds_outranks_millis_when_enabled() {
        let registry = registry();
        let catalog = TypeCatalog::new();
        let options = MapperOptions::default();
        let cx = ConversionContext::new(&registry, &catalog, &options);
        let _scope = cx.enable([
            ConverterId::from("InstantToEpochSecondsConverter"),
            ConverterId::from("EpochSecondsToInstantConverter"),
        ]);
        assert_eq!(convert(&cx, "Instant", "Long"), "at.epochSecond");
        assert_eq!(convert(&cx, "Long?", "Instant?"), "at?.let { Instant.ofEpochSecond(it) }");
    }

    #[test]
    fn test_date_conversions() {
        let registry = registry();
        let catalog = TypeCatalog::new();
        let options = MapperOptions::default();
        let cx = ConversionContext::new(&registry, &catalog, &options);
        assert_eq!(convert(&cx, "Date", "Instant"), "at.toInstant()");
        assert_eq!(convert(&cx, "Instant", "Date"), "Date.from(at)");
        assert_eq!(convert(&cx, "Long", "Date"), "Date(at)");
    }
}
