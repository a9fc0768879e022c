//! Qualified names of well-known declarations.
//!
//! Short names accepted in type notation (`String`, `List`, `Instant`) expand to
//! these qualified forms. Anything not listed here must be written qualified.

pub const ANY: &str = "kotlin.Any";
pub const STRING: &str = "kotlin.String";
pub const BOOLEAN: &str = "kotlin.Boolean";
pub const CHAR: &str = "kotlin.Char";
pub const BYTE: &str = "kotlin.Byte";
pub const SHORT: &str = "kotlin.Short";
pub const INT: &str = "kotlin.Int";
pub const LONG: &str = "kotlin.Long";
pub const FLOAT: &str = "kotlin.Float";
pub const DOUBLE: &str = "kotlin.Double";
pub const NUMBER: &str = "kotlin.Number";
pub const UBYTE: &str = "kotlin.UByte";
pub const USHORT: &str = "kotlin.UShort";
pub const UINT: &str = "kotlin.UInt";
pub const ULONG: &str = "kotlin.ULong";

pub const ITERABLE: &str = "kotlin.collections.Iterable";
pub const MUTABLE_ITERABLE: &str = "kotlin.collections.MutableIterable";
pub const COLLECTION: &str = "kotlin.collections.Collection";
pub const MUTABLE_COLLECTION: &str = "kotlin.collections.MutableCollection";
pub const LIST: &str = "kotlin.collections.List";
pub const MUTABLE_LIST: &str = "kotlin.collections.MutableList";
pub const ARRAY_LIST: &str = "kotlin.collections.ArrayList";
pub const SET: &str = "kotlin.collections.Set";
pub const MUTABLE_SET: &str = "kotlin.collections.MutableSet";
pub const HASH_SET: &str = "kotlin.collections.HashSet";
pub const LINKED_HASH_SET: &str = "kotlin.collections.LinkedHashSet";
pub const MAP: &str = "kotlin.collections.Map";
pub const MUTABLE_MAP: &str = "kotlin.collections.MutableMap";
pub const HASH_MAP: &str = "kotlin.collections.HashMap";
pub const LINKED_HASH_MAP: &str = "kotlin.collections.LinkedHashMap";

pub const IMMUTABLE_COLLECTION: &str = "kotlinx.collections.immutable.ImmutableCollection";
pub const PERSISTENT_COLLECTION: &str = "kotlinx.collections.immutable.PersistentCollection";
pub const IMMUTABLE_LIST: &str = "kotlinx.collections.immutable.ImmutableList";
pub const PERSISTENT_LIST: &str = "kotlinx.collections.immutable.PersistentList";
pub const IMMUTABLE_SET: &str = "kotlinx.collections.immutable.ImmutableSet";
pub const PERSISTENT_SET: &str = "kotlinx.collections.immutable.PersistentSet";
pub const IMMUTABLE_MAP: &str = "kotlinx.collections.immutable.ImmutableMap";
pub const PERSISTENT_MAP: &str = "kotlinx.collections.immutable.PersistentMap";

pub const INSTANT: &str = "java.time.Instant";
pub const DATE: &str = "java.util.Date";

/// Packages whose members are visible without an import in generated code.
pub const DEFAULT_IMPORTS: &[&str] = &["kotlin", "kotlin.collections"];

const SHORT_NAMES: &[&str] = &[
    ANY,
    STRING,
    BOOLEAN,
    CHAR,
    BYTE,
    SHORT,
    INT,
    LONG,
    FLOAT,
    DOUBLE,
    NUMBER,
    UBYTE,
    USHORT,
    UINT,
    ULONG,
    ITERABLE,
    MUTABLE_ITERABLE,
    COLLECTION,
    MUTABLE_COLLECTION,
    LIST,
    MUTABLE_LIST,
    ARRAY_LIST,
    SET,
    MUTABLE_SET,
    HASH_SET,
    LINKED_HASH_SET,
    MAP,
    MUTABLE_MAP,
    HASH_MAP,
    LINKED_HASH_MAP,
    IMMUTABLE_COLLECTION,
    PERSISTENT_COLLECTION,
    IMMUTABLE_LIST,
    PERSISTENT_LIST,
    IMMUTABLE_SET,
    PERSISTENT_SET,
    IMMUTABLE_MAP,
    PERSISTENT_MAP,
    INSTANT,
    DATE,
];

/// Expand a short well-known name (`String`, `MutableList`) to its qualified form.
///
/// Names containing a `.` are returned unchanged.
pub fn qualify(name: &str) -> &str {
    if name.contains('.') {
        return name;
    }
    SHORT_NAMES
        .iter()
        .find(|qualified| simple_name(qualified) == name)
        .copied()
        .unwrap_or(name)
}

/// Last segment of a qualified name.
pub fn simple_name(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// Package part of a qualified name (empty for unqualified names).
pub fn package_of(qualified: &str) -> &str {
    match qualified.rfind('.') {
        Some(idx) => &qualified[..idx],
        None => "",
    }
}
