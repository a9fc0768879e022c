//! Built-in converters.
//!
//! Leaf converters (same type, primitive and temporal coercions, the enum
//! scalar family) produce an expression directly. Composite converters
//! (iterables, maps, enum to enum, value wrappers) look up further converters
//! for their parts through the context.

pub mod coercion;
pub mod enums;
pub mod iterable;
pub mod map;
pub mod mapping_fn;
pub mod primitive;
pub mod same_type;
pub mod temporal;
pub mod value_wrapper;

pub use coercion::{Coercion, Step};
pub use enums::{EnumToEnumConverter, EnumToOrdinalConverter, EnumToStringConverter, OrdinalToEnumConverter, StringToEnumConverter};
pub use iterable::IterableToIterableConverter;
pub use map::MapToMapConverter;
pub use mapping_fn::{CallStyle, MappingFunction, MappingFunctionConverter};
pub use same_type::SameTypeConverter;
pub use value_wrapper::{ValueWrapperToXConverter, XToValueWrapperConverter};

use crate::traits::TypeConverter;
use std::sync::Arc;

/// Every built-in converter, in registration order.
pub fn builtin() -> Vec<Arc<dyn TypeConverter>> {
    let mut out: Vec<Arc<dyn TypeConverter>> = vec![Arc::new(SameTypeConverter)];
    for coercion in primitive::coercions().into_iter().chain(temporal::coercions()) {
        out.push(Arc::new(coercion));
    }
    out.push(Arc::new(EnumToEnumConverter));
    out.extend(enums::scalar_converters());
    out.push(Arc::new(IterableToIterableConverter));
    out.push(Arc::new(MapToMapConverter));
    out.push(Arc::new(ValueWrapperToXConverter));
    out.push(Arc::new(XToValueWrapperConverter));
    out
}
