//! Entry point for collaborators.

use crate::config::MapperOptions;
use crate::context::ConversionContext;
use crate::error::MappingError;
use crate::mapping::{self, MappingOutput};
use crate::registry::{ConverterRegistry, builtin_registry};
use morph_schema::{MappingRequest, TypeCatalog};
use std::sync::Arc;
use tracing::debug;

/// Generates mapping function bodies against a shared converter registry.
///
/// The engine is `Send + Sync`. Every [`generate`](Self::generate) call owns
/// its resolution state, so one engine can serve several workers at once.
#[derive(Clone)]
pub struct MappingEngine {
    registry: Arc<ConverterRegistry>,
    options: MapperOptions,
}

impl MappingEngine {
    /// Engine over the built-in converters.
    pub fn new(options: MapperOptions) -> Self {
        Self::with_registry(builtin_registry(), options)
    }

    pub fn with_registry(registry: Arc<ConverterRegistry>, options: MapperOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    pub fn options(&self) -> &MapperOptions {
        &self.options
    }

    /// Generate the body of one mapping function.
    pub fn generate(&self, catalog: &TypeCatalog, request: &MappingRequest) -> Result<MappingOutput, MappingError> {
        debug!(source = %request.source, target = %request.target, "generating mapping");
        let cx = ConversionContext::new(&self.registry, catalog, &self.options);
        mapping::generate(&cx, request)
    }

    /// Generate every request in order. A failing request does not stop the others.
    pub fn generate_all(
        &self,
        catalog: &TypeCatalog,
        requests: &[MappingRequest],
    ) -> Vec<Result<MappingOutput, MappingError>> {
        requests.iter().map(|request| self.generate(catalog, request)).collect()
    }
}

impl Default for MappingEngine {
    fn default() -> Self {
        Self::new(MapperOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_schema::TypeRef;
    use serde_json::json;

    fn catalog() -> TypeCatalog {
        let doc = json!({
            "types": [
                {
                    "name": "com.example.A",
                    "kind": "class",
                    "properties": [{ "name": "id", "type": "Long" }]
                },
                {
                    "name": "com.example.B",
                    "kind": "class",
                    "properties": [{ "name": "id", "type": "String" }],
                    "constructors": [{ "primary": true, "params": [{ "name": "id", "type": "String" }] }]
                }
            ]
        });
        TypeCatalog::from_json(&doc.to_string()).unwrap()
    }

    #[test]
    fn test_generate_all_keeps_going() {
        let engine = MappingEngine::default();
        let requests = [
            MappingRequest::new(TypeRef::new("com.example.A"), TypeRef::new("com.example.B")).with_source_param("a"),
            MappingRequest::new(TypeRef::new("com.example.B"), TypeRef::new("com.example.A")),
        ];
        let results = engine.generate_all(&catalog(), &requests);
        assert_eq!(
            results[0].as_ref().unwrap().render().body,
            "return B(id = a.id.toString())\n"
        );
        assert!(matches!(
            results[1],
            Err(MappingError::NoMatchingConstructor { .. })
        ));
    }

    #[test]
    fn test_engine_is_shared_between_workers() {
        let engine = MappingEngine::default();
        let catalog = catalog();
        let request = MappingRequest::new(TypeRef::new("com.example.A"), TypeRef::new("com.example.B"));
        let bodies: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| engine.generate(&catalog, &request).unwrap().render().body))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(bodies.iter().all(|b| b == "return B(id = id.toString())\n"));
    }
}
