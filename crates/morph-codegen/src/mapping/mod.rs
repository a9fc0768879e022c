//! Structural mapping: intents, constructor selection and body generation.

pub mod constructor;
pub mod generate;
pub mod intent;

pub use constructor::{ConstructorChoice, Selection, select_constructor};
pub use generate::generate;
pub use intent::{IntentOrigin, IntentSet, IntentValue, PropertyIntent, resolve_intents};

use crate::error::MappingWarning;
use crate::ir::Fragment;
use crate::output::{KotlinWriter, RenderedCode};
use serde::Serialize;

/// A generated mapping function body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingOutput {
    pub fragment: Fragment,
    pub warnings: Vec<MappingWarning>,
}

impl MappingOutput {
    /// Render the body as Kotlin.
    pub fn render(&self) -> RenderedCode {
        KotlinWriter::emit(&self.fragment)
    }
}
