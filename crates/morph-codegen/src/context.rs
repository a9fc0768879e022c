//! Per-generation resolution state.
//!
//! A [`ConversionContext`] is created for one mapping function and threaded
//! through every converter call. It carries the read-only inputs (registry,
//! catalog, options) and the only mutable state of a resolution: the stack of
//! enabled-converter scopes and the lookup depth.

use crate::config::MapperOptions;
use crate::error::MappingError;
use crate::ir::Expr;
use crate::registry::ConverterRegistry;
use crate::traits::TypeConverter;
use morph_schema::{ConverterId, TypeCatalog, TypeRef};
use std::cell::{Cell, RefCell};
use tracing::trace;

/// Lookups nested deeper than this resolve to "no converter".
const MAX_LOOKUP_DEPTH: usize = 32;

pub struct ConversionContext<'a> {
    registry: &'a ConverterRegistry,
    catalog: &'a TypeCatalog,
    options: &'a MapperOptions,
    scopes: RefCell<Vec<Vec<ConverterId>>>,
    depth: Cell<usize>,
}

/// Guard returned by [`ConversionContext::enable`]; leaving it pops the scope.
#[must_use = "the scope ends when the guard is dropped"]
pub struct EnabledScope<'c> {
    scopes: &'c RefCell<Vec<Vec<ConverterId>>>,
    restore_to: usize,
}

impl Drop for EnabledScope<'_> {
    fn drop(&mut self) {
        let mut scopes = self.scopes.borrow_mut();
        scopes.truncate(self.restore_to);
        trace!(depth = self.restore_to, "left converter scope");
    }
}

impl<'a> ConversionContext<'a> {
    pub fn new(
        registry: &'a ConverterRegistry,
        catalog: &'a TypeCatalog,
        options: &'a MapperOptions,
    ) -> Self {
        Self {
            registry,
            catalog,
            options,
            scopes: RefCell::new(Vec::new()),
            depth: Cell::new(0),
        }
    }

    pub fn registry(&self) -> &'a ConverterRegistry {
        self.registry
    }

    pub fn catalog(&self) -> &'a TypeCatalog {
        self.catalog
    }

    pub fn options(&self) -> &'a MapperOptions {
        self.options
    }

    /// Additionally enable `ids` until the returned guard is dropped.
    ///
    /// Scopes nest; dropping a guard restores exactly the state that was active
    /// when it was created.
    pub fn enable<I>(&self, ids: I) -> EnabledScope<'_>
    where
        I: IntoIterator,
        I::Item: Into<ConverterId>,
    {
        let mut scopes = self.scopes.borrow_mut();
        let restore_to = scopes.len();
        scopes.push(ids.into_iter().map(Into::into).collect());
        trace!(depth = scopes.len(), "entered converter scope");
        EnabledScope {
            scopes: &self.scopes,
            restore_to,
        }
    }

    /// Number of currently entered scopes.
    pub fn scope_depth(&self) -> usize {
        self.scopes.borrow().len()
    }

    pub fn is_enabled(&self, converter: &dyn TypeConverter) -> bool {
        if converter.enabled_by_default() {
            return true;
        }
        let id = converter.id();
        if self
            .options
            .enabled_converters
            .iter()
            .any(|enabled| enabled.as_str() == id)
        {
            return true;
        }
        self.scopes
            .borrow()
            .iter()
            .flatten()
            .any(|enabled| enabled.as_str() == id)
    }

    /// First enabled converter, in priority order, that matches the pair.
    pub fn find_converter(&self, source: &TypeRef, target: &TypeRef) -> Option<&'a dyn TypeConverter> {
        let depth = self.depth.get();
        if depth >= MAX_LOOKUP_DEPTH {
            trace!(%source, %target, "lookup depth exceeded");
            return None;
        }
        self.depth.set(depth + 1);
        let found = self
            .registry
            .converters()
            .iter()
            .map(|converter| converter.as_ref())
            .find(|converter| self.is_enabled(*converter) && converter.matches(self, source, target));
        self.depth.set(depth);

        match found {
            Some(converter) => trace!(%source, %target, converter = converter.id(), "converter found"),
            None => trace!(%source, %target, "no converter"),
        }
        found
    }

    /// Like [`find_converter`](Self::find_converter), but explains a miss.
    ///
    /// A miss that would succeed if the target were nullable, or if `!!`
    /// assertions were allowed anywhere inside the pair (e.g. on the elements
    /// of `List<String?>` to `List<String>`), is reported as
    /// [`MappingError::NotNullAssertionNotEnabled`].
    pub fn require_converter(
        &self,
        source: &TypeRef,
        target: &TypeRef,
    ) -> Result<&'a dyn TypeConverter, MappingError> {
        if let Some(converter) = self.find_converter(source, target) {
            return Ok(converter);
        }
        if self.options.enforce_not_null {
            return Err(MappingError::no_converter(source, target));
        }
        let widened = source.nullable
            && !target.nullable
            && self.find_converter(source, &target.as_nullable()).is_some();
        if widened || self.resolves_with_assertions(source, target) {
            return Err(MappingError::NotNullAssertionNotEnabled {
                from: source.clone(),
                to: target.clone(),
            });
        }
        Err(MappingError::no_converter(source, target))
    }

    /// Whether the pair resolves under the current scopes once `!!` is allowed.
    fn resolves_with_assertions(&self, source: &TypeRef, target: &TypeRef) -> bool {
        let options = self.options.clone().with_enforce_not_null(true);
        let retry = ConversionContext {
            registry: self.registry,
            catalog: self.catalog,
            options: &options,
            scopes: RefCell::new(self.scopes.borrow().clone()),
            depth: Cell::new(self.depth.get()),
        };
        let found = retry.find_converter(source, target).is_some();
        trace!(%source, %target, found, "retried lookup with assertions");
        found
    }

    /// Resolve a converter for the pair and apply it to `value`.
    pub fn convert(&self, value: Expr, source: &TypeRef, target: &TypeRef) -> Result<Expr, MappingError> {
        let converter = self.require_converter(source, target)?;
        converter.convert(self, value, source, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priority::Priority;

    /// Matches a single pair of type names and renames the value.
    struct Stub {
        id: &'static str,
        from: &'static str,
        to: &'static str,
        enabled: bool,
    }

    impl TypeConverter for Stub {
        fn id(&self) -> &str {
            self.id
        }

        fn enabled_by_default(&self) -> bool {
            self.enabled
        }

        fn priority(&self) -> Priority {
            Priority::DEFAULT
        }

        fn matches(&self, _cx: &ConversionContext<'_>, source: &TypeRef, target: &TypeRef) -> bool {
            source.is(self.from) && target.is(self.to) && source.nullable == target.nullable
        }

        fn convert(
            &self,
            _cx: &ConversionContext<'_>,
            value: Expr,
            _source: &TypeRef,
            _target: &TypeRef,
        ) -> Result<Expr, MappingError> {
            Ok(value.call(self.id, Vec::new(), false))
        }
    }

    /// Matches everything by asking the registry again.
    struct Recursive;

    impl TypeConverter for Recursive {
        fn id(&self) -> &str {
            "Recursive"
        }

        fn matches(&self, cx: &ConversionContext<'_>, source: &TypeRef, target: &TypeRef) -> bool {
            cx.find_converter(source, target).is_some()
        }

        fn convert(
            &self,
            _cx: &ConversionContext<'_>,
            value: Expr,
            _source: &TypeRef,
            _target: &TypeRef,
        ) -> Result<Expr, MappingError> {
            Ok(value)
        }
    }

    fn registry() -> ConverterRegistry {
        ConverterRegistry::builder()
            .register(Stub {
                id: "AToB",
                from: "a.A",
                to: "b.B",
                enabled: false,
            })
            .register(Stub {
                id: "AToC",
                from: "a.A",
                to: "c.C",
                enabled: true,
            })
            .build()
    }

    #[test]
    fn test_disabled_converter_needs_scope() {
        let registry = registry();
        let catalog = TypeCatalog::new();
        let options = MapperOptions::default();
        let cx = ConversionContext::new(&registry, &catalog, &options);
        let (a, b) = (TypeRef::new("a.A"), TypeRef::new("b.B"));

        assert!(cx.find_converter(&a, &b).is_none());
        {
            let _scope = cx.enable(["AToB"]);
            assert_eq!(cx.find_converter(&a, &b).map(|c| c.id()), Some("AToB"));
        }
        assert!(cx.find_converter(&a, &b).is_none());
        assert_eq!(cx.scope_depth(), 0);
    }

    #[test]
    fn test_nested_scopes_restore_exactly() {
        let registry = registry();
        let catalog = TypeCatalog::new();
        let options = MapperOptions::default();
        let cx = ConversionContext::new(&registry, &catalog, &options);
        let (a, b) = (TypeRef::new("a.A"), TypeRef::new("b.B"));

        let outer = cx.enable(["AToB"]);
        {
            let _inner = cx.enable(Vec::<ConverterId>::new());
            assert_eq!(cx.scope_depth(), 2);
            assert!(cx.find_converter(&a, &b).is_some());
        }
        assert_eq!(cx.scope_depth(), 1);
        assert!(cx.find_converter(&a, &b).is_some());
        drop(outer);
        assert!(cx.find_converter(&a, &b).is_none());
    }

    #[test]
    fn test_options_enable_globally() {
        let registry = registry();
        let catalog = TypeCatalog::new();
        let options = MapperOptions::default().enabling("AToB");
        let cx = ConversionContext::new(&registry, &catalog, &options);
        assert!(cx.find_converter(&TypeRef::new("a.A"), &TypeRef::new("b.B")).is_some());
    }

    #[test]
    fn test_require_reports_missing_assertion() {
        let registry = ConverterRegistry::builder()
            .register(Stub {
                id: "AToCNullable",
                from: "a.A",
                to: "c.C",
                enabled: true,
            })
            .build();
        let catalog = TypeCatalog::new();
        let options = MapperOptions::default();
        let cx = ConversionContext::new(&registry, &catalog, &options);

        let err = cx
            .require_converter(&TypeRef::new("a.A").as_nullable(), &TypeRef::new("c.C"))
            .err();
        assert!(matches!(err, Some(MappingError::NotNullAssertionNotEnabled { .. })));

        let err = cx
            .require_converter(&TypeRef::new("a.A"), &TypeRef::new("z.Z"))
            .err();
        assert!(matches!(err, Some(MappingError::NoConverterFound { .. })));
    }

    #[test]
    fn test_nested_assertion_is_reported() {
        let registry = ConverterRegistry::builder().with_builtins().build();
        let catalog = TypeCatalog::new();
        let options = MapperOptions::default();
        let cx = ConversionContext::new(&registry, &catalog, &options);
        let parse = |s: &str| TypeRef::parse(s).unwrap();

        let err = cx
            .convert(Expr::ident("xs"), &parse("List<String?>"), &parse("List<String>"))
            .unwrap_err();
        assert_eq!(
            err,
            MappingError::NotNullAssertionNotEnabled {
                from: parse("List<String?>"),
                to: parse("List<String>"),
            }
        );

        let err = cx
            .convert(Expr::ident("m"), &parse("Map<String, Int?>"), &parse("Map<String, Long>"))
            .unwrap_err();
        assert!(matches!(err, MappingError::NotNullAssertionNotEnabled { .. }), "{err:?}");

        let err = cx
            .convert(Expr::ident("xs"), &parse("List<String>"), &parse("List<java.util.UUID>"))
            .unwrap_err();
        assert!(matches!(err, MappingError::NoConverterFound { .. }), "{err:?}");
        assert_eq!(cx.scope_depth(), 0);
    }

    #[test]
    fn test_self_referential_lookup_terminates() {
        let registry = ConverterRegistry::builder().register(Recursive).build();
        let catalog = TypeCatalog::new();
        let options = MapperOptions::default();
        let cx = ConversionContext::new(&registry, &catalog, &options);
        assert!(cx.find_converter(&TypeRef::new("a.A"), &TypeRef::new("b.B")).is_none());
    }
}
