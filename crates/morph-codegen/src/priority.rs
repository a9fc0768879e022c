//! Converter priorities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rank among converters matching the same pair of types. Lower wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(pub i32);

impl Priority {
    /// Identity conversions, preferred over everything else.
    pub const SAME_TYPE: Priority = Priority(100);
    pub const DEFAULT: Priority = Priority(3000);
    /// Calls to other generated mapping functions.
    pub const MAPPING_FUNCTION: Priority = Priority(4000);

    /// Rank `offset` steps behind this one.
    pub const fn plus(self, offset: i32) -> Priority {
        Priority(self.0 + offset)
    }

    /// Rank `offset` steps ahead of this one.
    pub const fn minus(self, offset: i32) -> Priority {
        Priority(self.0 - offset)
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::DEFAULT
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
