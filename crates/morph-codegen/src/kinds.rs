//! Container kinds known to the iterable and map converters.
//!
//! Each kind records its declaration, whether its element (or value) parameter
//! is declared `out`, its direct super-kinds and the call that copies any
//! iterable (or map) into it.

use crate::ir::{Arg, Expr};
use morph_schema::{TypeRef, names};

/// A recognized iterable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IterableKind {
    Iterable,
    MutableIterable,
    Collection,
    MutableCollection,
    List,
    MutableList,
    ArrayList,
    Set,
    MutableSet,
    HashSet,
    LinkedHashSet,
    ImmutableCollection,
    PersistentCollection,
    ImmutableList,
    PersistentList,
    ImmutableSet,
    PersistentSet,
}

impl IterableKind {
    pub const ALL: [IterableKind; 17] = [
        IterableKind::Iterable,
        IterableKind::MutableIterable,
        IterableKind::Collection,
        IterableKind::MutableCollection,
        IterableKind::List,
        IterableKind::MutableList,
        IterableKind::ArrayList,
        IterableKind::Set,
        IterableKind::MutableSet,
        IterableKind::HashSet,
        IterableKind::LinkedHashSet,
        IterableKind::ImmutableCollection,
        IterableKind::PersistentCollection,
        IterableKind::ImmutableList,
        IterableKind::PersistentList,
        IterableKind::ImmutableSet,
        IterableKind::PersistentSet,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IterableKind::Iterable => names::ITERABLE,
            IterableKind::MutableIterable => names::MUTABLE_ITERABLE,
            IterableKind::Collection => names::COLLECTION,
            IterableKind::MutableCollection => names::MUTABLE_COLLECTION,
            IterableKind::List => names::LIST,
            IterableKind::MutableList => names::MUTABLE_LIST,
            IterableKind::ArrayList => names::ARRAY_LIST,
            IterableKind::Set => names::SET,
            IterableKind::MutableSet => names::MUTABLE_SET,
            IterableKind::HashSet => names::HASH_SET,
            IterableKind::LinkedHashSet => names::LINKED_HASH_SET,
            IterableKind::ImmutableCollection => names::IMMUTABLE_COLLECTION,
            IterableKind::PersistentCollection => names::PERSISTENT_COLLECTION,
            IterableKind::ImmutableList => names::IMMUTABLE_LIST,
            IterableKind::PersistentList => names::PERSISTENT_LIST,
            IterableKind::ImmutableSet => names::IMMUTABLE_SET,
            IterableKind::PersistentSet => names::PERSISTENT_SET,
        }
    }

    /// Kind of a single-argument iterable type.
    pub fn of(ty: &TypeRef) -> Option<IterableKind> {
        if ty.args.len() != 1 {
            return None;
        }
        Self::ALL.into_iter().find(|kind| ty.is(kind.name()))
    }

    /// Whether the element parameter is declared `out`.
    pub fn covariant(self) -> bool {
        !matches!(
            self,
            IterableKind::MutableCollection
                | IterableKind::MutableList
                | IterableKind::ArrayList
                | IterableKind::MutableSet
                | IterableKind::HashSet
                | IterableKind::LinkedHashSet
        )
    }

    fn supers(self) -> &'static [IterableKind] {
        use IterableKind::*;
        match self {
            Iterable => &[],
            MutableIterable => &[Iterable],
            Collection => &[Iterable],
            MutableCollection => &[Collection, MutableIterable],
            List => &[Collection],
            MutableList => &[List, MutableCollection],
            ArrayList => &[MutableList],
            Set => &[Collection],
            MutableSet => &[Set, MutableCollection],
            HashSet => &[MutableSet],
            LinkedHashSet => &[HashSet],
            ImmutableCollection => &[Collection],
            PersistentCollection => &[ImmutableCollection],
            ImmutableList => &[List, ImmutableCollection],
            PersistentList => &[ImmutableList, PersistentCollection],
            ImmutableSet => &[Set, ImmutableCollection],
            PersistentSet => &[ImmutableSet, PersistentCollection],
        }
    }

    /// Whether every instance of `self` is an instance of `other`.
    pub fn is_a(self, other: IterableKind) -> bool {
        self == other || self.supers().iter().any(|s| s.is_a(other))
    }

    /// Copy `receiver` into a fresh instance of this kind.
    pub fn rebuild(self, receiver: Expr, safe: bool) -> Expr {
        use IterableKind::*;
        match self {
            Iterable | Collection | List => receiver.call("toList", Vec::new(), safe),
            MutableIterable | MutableCollection | MutableList => {
                receiver.call("toMutableList", Vec::new(), safe)
            }
            ArrayList => receiver.call("toCollection", vec![empty(names::ARRAY_LIST)], safe),
            Set => receiver.call("toSet", Vec::new(), safe),
            MutableSet => receiver.call("toMutableSet", Vec::new(), safe),
            HashSet => receiver.call("toHashSet", Vec::new(), safe),
            LinkedHashSet => receiver.call("toCollection", vec![empty(names::LINKED_HASH_SET)], safe),
            ImmutableCollection | ImmutableList => receiver.call(TO_IMMUTABLE_LIST, Vec::new(), safe),
            PersistentCollection | PersistentList => {
                receiver.call(TO_PERSISTENT_LIST, Vec::new(), safe)
            }
            ImmutableSet => receiver.call(TO_IMMUTABLE_SET, Vec::new(), safe),
            PersistentSet => receiver.call(TO_PERSISTENT_SET, Vec::new(), safe),
        }
    }
}

/// A recognized map declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapKind {
    Map,
    MutableMap,
    HashMap,
    LinkedHashMap,
    ImmutableMap,
    PersistentMap,
}

impl MapKind {
    pub const ALL: [MapKind; 6] = [
        MapKind::Map,
        MapKind::MutableMap,
        MapKind::HashMap,
        MapKind::LinkedHashMap,
        MapKind::ImmutableMap,
        MapKind::PersistentMap,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MapKind::Map => names::MAP,
            MapKind::MutableMap => names::MUTABLE_MAP,
            MapKind::HashMap => names::HASH_MAP,
            MapKind::LinkedHashMap => names::LINKED_HASH_MAP,
            MapKind::ImmutableMap => names::IMMUTABLE_MAP,
            MapKind::PersistentMap => names::PERSISTENT_MAP,
        }
    }

    pub fn of(ty: &TypeRef) -> Option<MapKind> {
        if ty.args.len() != 2 {
            return None;
        }
        Self::ALL.into_iter().find(|kind| ty.is(kind.name()))
    }

    /// Whether the value parameter is declared `out`. Keys are invariant in
    /// every map kind.
    pub fn covariant_values(self) -> bool {
        matches!(self, MapKind::Map | MapKind::ImmutableMap | MapKind::PersistentMap)
    }

    fn supers(self) -> &'static [MapKind] {
        match self {
            MapKind::Map => &[],
            MapKind::MutableMap => &[MapKind::Map],
            MapKind::HashMap => &[MapKind::MutableMap],
            MapKind::LinkedHashMap => &[MapKind::HashMap],
            MapKind::ImmutableMap => &[MapKind::Map],
            MapKind::PersistentMap => &[MapKind::ImmutableMap],
        }
    }

    pub fn is_a(self, other: MapKind) -> bool {
        self == other || self.supers().iter().any(|s| s.is_a(other))
    }

    pub fn rebuild(self, receiver: Expr, safe: bool) -> Expr {
        match self {
            MapKind::Map => receiver.call("toMap", Vec::new(), safe),
            MapKind::MutableMap => receiver.call("toMutableMap", Vec::new(), safe),
            MapKind::HashMap => receiver.call("toMap", vec![empty(names::HASH_MAP)], safe),
            MapKind::LinkedHashMap => receiver.call("toMap", vec![empty(names::LINKED_HASH_MAP)], safe),
            MapKind::ImmutableMap => receiver.call(TO_IMMUTABLE_MAP, Vec::new(), safe),
            MapKind::PersistentMap => receiver.call(TO_PERSISTENT_MAP, Vec::new(), safe),
        }
    }
}

/// Extension functions of `kotlinx.collections.immutable`; qualified so the
/// writer imports them.
const TO_IMMUTABLE_LIST: &str = "kotlinx.collections.immutable.toImmutableList";
const TO_PERSISTENT_LIST: &str = "kotlinx.collections.immutable.toPersistentList";
const TO_IMMUTABLE_SET: &str = "kotlinx.collections.immutable.toImmutableSet";
const TO_PERSISTENT_SET: &str = "kotlinx.collections.immutable.toPersistentSet";
const TO_IMMUTABLE_MAP: &str = "kotlinx.collections.immutable.toImmutableMap";
const TO_PERSISTENT_MAP: &str = "kotlinx.collections.immutable.toPersistentMap";

fn empty(constructor: &str) -> Arg {
    Arg::positional(Expr::function(constructor, Vec::new()))
}
