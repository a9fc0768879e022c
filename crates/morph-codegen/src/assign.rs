//! Assignability between type signatures.

use crate::kinds::{IterableKind, MapKind};
use morph_schema::{TypeArg, TypeCatalog, TypeRef, Variance, names};

/// Supertype chains longer than this are treated as unrelated.
const MAX_SUPERTYPE_DEPTH: usize = 16;

const NUMBER_SUBTYPES: &[&str] = &[
    names::BYTE,
    names::SHORT,
    names::INT,
    names::LONG,
    names::FLOAT,
    names::DOUBLE,
];

/// Whether a value of `source` can be used where `target` is expected without
/// any conversion.
pub fn is_assignable(catalog: &TypeCatalog, source: &TypeRef, target: &TypeRef) -> bool {
    if source.nullable && !target.nullable {
        return false;
    }
    assignable_ignoring_null(catalog, source, target, 0)
}

fn assignable_ignoring_null(catalog: &TypeCatalog, source: &TypeRef, target: &TypeRef, depth: usize) -> bool {
    if target.is(names::ANY) && target.args.is_empty() {
        return true;
    }
    if source.name == target.name {
        return args_assignable(catalog, source, target, &declared_variances(target));
    }
    if let (Some(from), Some(to)) = (IterableKind::of(source), IterableKind::of(target)) {
        return from.is_a(to) && args_assignable(catalog, source, target, &declared_variances(target));
    }
    if let (Some(from), Some(to)) = (MapKind::of(source), MapKind::of(target)) {
        return from.is_a(to) && args_assignable(catalog, source, target, &declared_variances(target));
    }
    if target.is(names::NUMBER) && NUMBER_SUBTYPES.iter().any(|n| source.is(n)) {
        return true;
    }
    if depth >= MAX_SUPERTYPE_DEPTH {
        return false;
    }
    match catalog.class(&source.name) {
        Some(class) => class
            .supertypes
            .iter()
            .any(|sup| assignable_ignoring_null(catalog, &sup.as_non_null(), target, depth + 1)),
        None => false,
    }
}

/// Declaration-site variance of each type parameter of `ty`. Unknown
/// declarations are treated as invariant.
fn declared_variances(ty: &TypeRef) -> Vec<Variance> {
    if let Some(kind) = IterableKind::of(ty) {
        return vec![if kind.covariant() {
            Variance::Out
        } else {
            Variance::Invariant
        }];
    }
    if let Some(kind) = MapKind::of(ty) {
        let value = if kind.covariant_values() {
            Variance::Out
        } else {
            Variance::Invariant
        };
        return vec![Variance::Invariant, value];
    }
    vec![Variance::Invariant; ty.args.len()]
}

fn args_assignable(catalog: &TypeCatalog, source: &TypeRef, target: &TypeRef, declared: &[Variance]) -> bool {
    if source.args.len() != target.args.len() {
        return false;
    }
    source
        .args
        .iter()
        .zip(&target.args)
        .enumerate()
        .all(|(i, (s, t))| {
            let declared = declared.get(i).copied().unwrap_or(Variance::Invariant);
            arg_assignable(catalog, s, t, declared)
        })
}

fn arg_assignable(catalog: &TypeCatalog, source: &TypeArg, target: &TypeArg, declared: Variance) -> bool {
    let (s, t, use_site) = match (source, target) {
        (_, TypeArg::Star) => return true,
        (TypeArg::Star, TypeArg::Type { .. }) => return false,
        (TypeArg::Type { ty: s, .. }, TypeArg::Type { variance, ty: t }) => (s, t, *variance),
    };
    let variance = if use_site == Variance::Invariant {
        declared
    } else {
        use_site
    };
    match variance {
        Variance::Out => is_assignable(catalog, s, t),
        Variance::In => is_assignable(catalog, t, s),
        Variance::Invariant => s == t,
    }
}
