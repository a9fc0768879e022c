//! Output writers - emit mapping fragments as source code.

pub mod kotlin;

pub use kotlin::{KOTLIN_WRITER, KotlinWriter, KotlinWriterImpl};

use crate::traits::Writer;
use serde::Serialize;

/// Source text of a mapping function body plus the imports it relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedCode {
    pub body: String,
    /// Qualified names to import, sorted.
    pub imports: Vec<String>,
}

impl RenderedCode {
    /// `import` lines for the collected names.
    pub fn import_block(&self) -> String {
        let mut out = String::new();
        for import in &self.imports {
            out.push_str("import ");
            out.push_str(import);
            out.push('\n');
        }
        out
    }
}

/// Get a writer by language name.
pub fn writer_for_language(lang: &str) -> Option<&'static dyn Writer> {
    let writers: [&'static dyn Writer; 1] = [&KOTLIN_WRITER];
    writers.into_iter().find(|w| w.language() == lang)
}
