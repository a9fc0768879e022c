//! Registry of type converters.
//!
//! A registry is built once, sorted by priority, and is immutable afterwards.
//! It can be shared read-only between workers; all per-resolution state lives
//! in [`ConversionContext`](crate::context::ConversionContext).

use crate::converters;
use crate::converters::mapping_fn::{MappingFunction, MappingFunctionConverter};
use crate::traits::TypeConverter;
use std::sync::{Arc, OnceLock};

/// Built-in converters, shared by every engine that does not bring its own registry.
static BUILTIN: OnceLock<Arc<ConverterRegistry>> = OnceLock::new();

/// Process-wide registry holding the built-in converters.
pub fn builtin_registry() -> Arc<ConverterRegistry> {
    BUILTIN
        .get_or_init(|| Arc::new(ConverterRegistry::builder().with_builtins().build()))
        .clone()
}

/// Converters in ascending priority order.
pub struct ConverterRegistry {
    converters: Vec<Arc<dyn TypeConverter>>,
}

impl ConverterRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// All converters, lowest priority value first. Equal priorities keep
    /// registration order.
    pub fn converters(&self) -> &[Arc<dyn TypeConverter>] {
        &self.converters
    }

    /// Get a converter by id.
    pub fn get(&self, id: &str) -> Option<&dyn TypeConverter> {
        self.converters
            .iter()
            .find(|c| c.id() == id)
            .map(|c| c.as_ref())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.converters.iter().map(|c| c.id())
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

#[derive(Default)]
pub struct RegistryBuilder {
    converters: Vec<Arc<dyn TypeConverter>>,
}

impl RegistryBuilder {
    /// Add every built-in converter.
    pub fn with_builtins(mut self) -> Self {
        for converter in converters::builtin() {
            self = self.register_arc(converter);
        }
        self
    }

    /// Add a converter. A converter with the same id replaces the earlier one
    /// in place.
    pub fn register(self, converter: impl TypeConverter + 'static) -> Self {
        self.register_arc(Arc::new(converter))
    }

    pub fn register_arc(mut self, converter: Arc<dyn TypeConverter>) -> Self {
        match self.converters.iter().position(|c| c.id() == converter.id()) {
            Some(idx) => self.converters[idx] = converter,
            None => self.converters.push(converter),
        }
        self
    }

    /// Make another generated mapping function available as a converter.
    pub fn mapping_function(self, function: MappingFunction) -> Self {
        self.register(MappingFunctionConverter::new(function))
    }

    pub fn build(mut self) -> ConverterRegistry {
        // Stable: equal priorities stay in registration order.
        self.converters.sort_by_key(|c| c.priority());
        ConverterRegistry {
            converters: self.converters,
        }
    }
}
