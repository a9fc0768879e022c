//! Declarations handed over by schema providers.
//!
//! A [`TypeCatalog`] holds every class and enum declaration the generator may
//! need: the source and target of a mapping, plus anything reachable through
//! their properties (nested classes, enums, value wrappers).
//!
//! Catalogs are usually read from JSON:
//!
//! ```json
//! {
//!   "types": [
//!     { "name": "com.example.Color", "kind": "enum", "constants": ["RED", "GREEN"] },
//!     {
//!       "name": "com.example.Person",
//!       "kind": "class",
//!       "properties": [{ "name": "name", "type": "String" }],
//!       "constructors": [{ "primary": true, "params": [{ "name": "name", "type": "String" }] }]
//!     }
//!   ]
//! }
//! ```

use crate::error::SchemaError;
use crate::ty::TypeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A readable (and possibly settable) property of a class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Whether the property can be assigned after construction.
    #[serde(default)]
    pub mutable: bool,
}

/// A constructor parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, rename = "default")]
    pub has_default: bool,
}

/// A constructor (initializer) of a class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constructor {
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub params: Vec<Parameter>,
}

impl Constructor {
    /// Parameter types in declaration order.
    pub fn signature(&self) -> Vec<TypeRef> {
        self.params.iter().map(|p| p.ty.clone()).collect()
    }

    /// Human readable form, e.g. `(name: kotlin.String, age: kotlin.Int)`.
    pub fn describe(&self) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| format!("{}: {}", p.name, p.ty))
            .collect();
        format!("({})", params.join(", "))
    }

    #[cfg(test)]
    fn param(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }
}

fn default_true() -> bool {
    true
}

/// A class declaration: properties, constructors and supertypes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDecl {
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub constructors: Vec<Constructor>,
    /// Non-generic supertypes the class can be assigned to.
    #[serde(default)]
    pub supertypes: Vec<TypeRef>,
    /// Single-field wrapper type (e.g. a Kotlin `value class`).
    #[serde(default)]
    pub value_wrapper: bool,
    /// Whether constructor parameter names are known, so calls may use named
    /// arguments. False for declarations read from foreign binaries.
    #[serde(default = "default_true")]
    pub named_arguments: bool,
}

impl Default for ClassDecl {
    fn default() -> Self {
        Self {
            properties: Vec::new(),
            constructors: Vec::new(),
            supertypes: Vec::new(),
            value_wrapper: false,
            named_arguments: true,
        }
    }
}

impl ClassDecl {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn primary_constructor(&self) -> Option<&Constructor> {
        self.constructors.iter().find(|c| c.primary)
    }
}

/// An enum declaration with its constants in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub constants: Vec<String>,
}

/// Kind-specific part of a declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DeclKind {
    Class(ClassDecl),
    Enum(EnumDecl),
}

/// A named declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Fully-qualified name.
    pub name: String,
    #[serde(flatten)]
    pub kind: DeclKind,
}

impl TypeDecl {
    pub fn class(name: impl Into<String>, decl: ClassDecl) -> Self {
        Self {
            name: name.into(),
            kind: DeclKind::Class(decl),
        }
    }

    pub fn enumeration<S: Into<String>>(
        name: impl Into<String>,
        constants: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: DeclKind::Enum(EnumDecl {
                constants: constants.into_iter().map(Into::into).collect(),
            }),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    types: Vec<TypeDecl>,
}

/// Declarations indexed by qualified name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "CatalogDocument", into = "CatalogDocument")]
pub struct TypeCatalog {
    decls: Vec<TypeDecl>,
    index: HashMap<String, usize>,
}

impl From<CatalogDocument> for TypeCatalog {
    fn from(doc: CatalogDocument) -> Self {
        let mut catalog = TypeCatalog::new();
        for decl in doc.types {
            catalog.add(decl);
        }
        catalog
    }
}

impl From<TypeCatalog> for CatalogDocument {
    fn from(catalog: TypeCatalog) -> Self {
        CatalogDocument {
            types: catalog.decls,
        }
    }
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a catalog from its JSON document form.
    pub fn from_json(input: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Add a declaration, replacing any previous one with the same name.
    pub fn add(&mut self, decl: TypeDecl) {
        match self.index.get(&decl.name) {
            Some(&idx) => self.decls[idx] = decl,
            None => {
                self.index.insert(decl.name.clone(), self.decls.len());
                self.decls.push(decl);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&TypeDecl> {
        self.index.get(name).map(|&idx| &self.decls[idx])
    }

    pub fn class(&self, name: &str) -> Option<&ClassDecl> {
        match self.get(name).map(|d| &d.kind) {
            Some(DeclKind::Class(class)) => Some(class),
            _ => None,
        }
    }

    pub fn enumeration(&self, name: &str) -> Option<&EnumDecl> {
        match self.get(name).map(|d| &d.kind) {
            Some(DeclKind::Enum(decl)) => Some(decl),
            _ => None,
        }
    }

    pub fn is_enum(&self, name: &str) -> bool {
        self.enumeration(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDecl> {
        self.decls.iter()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "types": [
            { "name": "com.example.Color", "kind": "enum", "constants": ["RED", "GREEN"] },
            {
                "name": "com.example.Person",
                "kind": "class",
                "properties": [
                    { "name": "name", "type": "String" },
                    { "name": "nickname", "type": "String?", "mutable": true }
                ],
                "constructors": [
                    { "primary": true, "params": [{ "name": "name", "type": "String" }] },
                    { "params": [{ "name": "name", "type": "String" }, { "name": "age", "type": "Int", "default": true }] }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_from_json() {
        let catalog = TypeCatalog::from_json(DOC).unwrap();
        assert_eq!(catalog.len(), 2);

        let color = catalog.enumeration("com.example.Color").unwrap();
        assert_eq!(color.constants, vec!["RED", "GREEN"]);

        let person = catalog.class("com.example.Person").unwrap();
        assert!(person.named_arguments);
        assert!(!person.value_wrapper);
        assert!(person.property("nickname").unwrap().mutable);
        assert!(person.property("nickname").unwrap().ty.nullable);
        let primary = person.primary_constructor().unwrap();
        assert_eq!(primary.describe(), "(name: kotlin.String)");
        assert!(person.constructors[1].param("age").unwrap().has_default);
    }

    #[test]
    fn test_add_replaces_by_name() {
        let mut catalog = TypeCatalog::new();
        catalog.add(TypeDecl::enumeration("com.example.E", ["A"]));
        catalog.add(TypeDecl::enumeration("com.example.E", ["A", "B"]));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.enumeration("com.example.E").unwrap().constants.len(), 2);
        assert!(catalog.class("com.example.E").is_none());
    }

    #[test]
    fn test_invalid_type_in_document() {
        let err = TypeCatalog::from_json(
            r#"{ "types": [{ "name": "X", "kind": "class", "properties": [{ "name": "a", "type": "List<" }] }] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::Json(_)));
    }
}
