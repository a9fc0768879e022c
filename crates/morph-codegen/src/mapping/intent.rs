//! Property mapping intents: how each target property gets its value.

use crate::error::MappingWarning;
use morph_schema::{ClassDecl, ConverterId, FixedValue, MappingDirective};
use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

/// Where an intent came from. Earlier variants take precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentOrigin {
    Directive,
    Fixed,
    /// One per source property, mapped to the same-named target property.
    Discovered,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyIntent {
    pub target: String,
    pub source: Option<String>,
    pub constant: Option<String>,
    pub expression: Option<String>,
    pub ignore: bool,
    pub enable: Vec<ConverterId>,
    pub origin: IntentOrigin,
}

/// The single effective value source of an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentValue<'a> {
    Ignore,
    Constant(&'a str),
    Expression(&'a str),
    /// Source property name.
    Source(&'a str),
}

impl PropertyIntent {
    fn from_directive(directive: &MappingDirective) -> Self {
        Self {
            target: directive.target.clone(),
            source: directive.source.clone(),
            constant: directive.constant.clone(),
            expression: directive.expression.clone(),
            ignore: directive.ignore,
            enable: directive.enable.clone(),
            origin: IntentOrigin::Directive,
        }
    }

    fn fixed(value: &FixedValue) -> Self {
        Self {
            target: value.target.clone(),
            source: None,
            constant: Some(value.value.clone()),
            expression: None,
            ignore: false,
            enable: Vec::new(),
            origin: IntentOrigin::Fixed,
        }
    }

    fn discovered(name: &str) -> Self {
        Self {
            target: name.to_string(),
            source: Some(name.to_string()),
            constant: None,
            expression: None,
            ignore: false,
            enable: Vec::new(),
            origin: IntentOrigin::Discovered,
        }
    }

    pub fn is_directive(&self) -> bool {
        self.origin == IntentOrigin::Directive
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self.value(), IntentValue::Ignore)
    }

    /// Ignore wins over a constant, a constant over an expression, an
    /// expression over a source property. Without any of these the source
    /// property named like the target is used.
    pub fn value(&self) -> IntentValue<'_> {
        if self.ignore {
            IntentValue::Ignore
        } else if let Some(constant) = &self.constant {
            IntentValue::Constant(constant)
        } else if let Some(expression) = &self.expression {
            IntentValue::Expression(expression)
        } else {
            IntentValue::Source(self.source.as_deref().unwrap_or(&self.target))
        }
    }
}

/// Every intent of one mapping, with the warnings raised collecting them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntentSet {
    intents: Vec<PropertyIntent>,
    pub warnings: Vec<MappingWarning>,
}

impl IntentSet {
    /// The effective intent for a target property: directive, then fixed value,
    /// then discovered.
    pub fn for_target(&self, target: &str) -> Option<&PropertyIntent> {
        self.intents
            .iter()
            .filter(|intent| intent.target == target)
            .min_by_key(|intent| intent.origin)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyIntent> {
        self.intents.iter()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

/// Collect directive intents, then fixed values, then one discovered intent
/// per property of `source`.
///
/// Only the first directive for a target is kept. A directive reading a source
/// property that does not exist is dropped, so the target falls back to its
/// next intent. Both cases are reported as warnings.
pub fn resolve_intents(directives: &[MappingDirective], fixed: &[FixedValue], source: &ClassDecl) -> IntentSet {
    let mut set = IntentSet::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for directive in directives {
        let intent = PropertyIntent::from_directive(directive);
        if let IntentValue::Source(name) = intent.value() {
            if source.property(name).is_none() {
                let warning = MappingWarning::UnknownSourceProperty {
                    target: directive.target.clone(),
                    source: name.to_string(),
                };
                warn!("{warning}");
                set.warnings.push(warning);
                continue;
            }
        }
        if !seen.insert(directive.target.as_str()) {
            let warning = MappingWarning::DuplicateDirective {
                target: directive.target.clone(),
            };
            warn!("{warning}");
            set.warnings.push(warning);
            continue;
        }
        set.intents.push(intent);
    }

    set.intents.extend(fixed.iter().map(PropertyIntent::fixed));
    set.intents
        .extend(source.properties.iter().map(|p| PropertyIntent::discovered(&p.name)));
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_schema::{Property, TypeRef};

    fn source() -> ClassDecl {
        ClassDecl {
            properties: ["name", "age"]
                .into_iter()
                .map(|name| Property {
                    name: name.into(),
                    ty: TypeRef::new("String"),
                    mutable: false,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_directive_wins_over_discovered() {
        let set = resolve_intents(
            &[MappingDirective::rename("age", "name")],
            &[],
            &source(),
        );
        assert_eq!(set.len(), 3);
        let age = set.for_target("age").unwrap();
        assert!(age.is_directive());
        assert_eq!(age.value(), IntentValue::Source("name"));
        assert_eq!(set.for_target("name").unwrap().origin, IntentOrigin::Discovered);
        assert!(set.warnings.is_empty());
    }

    #[test]
    fn test_value_precedence() {
        let mut directive = MappingDirective::constant("age", "42");
        directive.expression = Some("it.age * 2".into());
        let set = resolve_intents(&[directive], &[], &source());
        assert_eq!(set.for_target("age").unwrap().value(), IntentValue::Constant("42"));

        let mut directive = MappingDirective::ignore("age");
        directive.constant = Some("42".into());
        let set = resolve_intents(&[directive], &[], &source());
        assert!(set.for_target("age").unwrap().is_ignored());
    }

    #[test]
    fn test_fixed_values_rank_between() {
        let source = source();
        let fixed = [FixedValue {
            target: "name".into(),
            value: "prefix".into(),
        }];
        let set = resolve_intents(&[], &fixed, &source);
        assert_eq!(set.for_target("name").unwrap().value(), IntentValue::Constant("prefix"));

        let set = resolve_intents(&[MappingDirective::ignore("name")], &fixed, &source);
        assert_eq!(set.for_target("name").unwrap().origin, IntentOrigin::Directive);
    }

    #[test]
    fn test_duplicate_directive_is_reported() {
        let set = resolve_intents(
            &[MappingDirective::constant("age", "1"), MappingDirective::constant("age", "2")],
            &[],
            &source(),
        );
        assert_eq!(set.for_target("age").unwrap().value(), IntentValue::Constant("1"));
        assert_eq!(
            set.warnings,
            vec![MappingWarning::DuplicateDirective { target: "age".into() }]
        );
    }

    #[test]
    fn test_unknown_source_property_falls_back() {
        let set = resolve_intents(&[MappingDirective::rename("age", "years")], &[], &source());
        assert_eq!(set.for_target("age").unwrap().origin, IntentOrigin::Discovered);
        assert_eq!(
            set.warnings,
            vec![MappingWarning::UnknownSourceProperty {
                target: "age".into(),
                source: "years".into()
            }]
        );
    }

    #[test]
    fn test_enable_list_passes_through() {
        let directive = MappingDirective::enabling("age", [ConverterId::from("StringToIntConverter")]);
        let set = resolve_intents(&[directive], &[], &source());
        let age = set.for_target("age").unwrap();
        assert_eq!(age.value(), IntentValue::Source("age"));
        assert_eq!(age.enable, vec![ConverterId::from("StringToIntConverter")]);
    }
}
