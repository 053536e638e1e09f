//! Compile options
//!
//!     One immutable value per compilation unit. Nested capture compilations receive the same
//!     value, so everything that influences output lives here rather than in compiler state.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CAPTURE_VARIABLE: &str = "capture";
pub const DEFAULT_BLOCK_MARKER: char = '!';
pub const DEFAULT_TRANSLATION_TAG: &str = "t";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Reported in errors raised by the front end; nodes carry their own filename.
    pub filename: Option<String>,
    /// Variable assigned by `:capture` filters without an `as` attribute.
    pub capture_variable: String,
    /// Leading character that turns `block name` into a layout slot.
    pub block_marker: char,
    /// Tag name handled as a translation.
    pub translation_tag: String,
    /// Pretty-print the JSON in [`Compiler::compile`](crate::Compiler::compile) output.
    pub pretty: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            filename: None,
            capture_variable: DEFAULT_CAPTURE_VARIABLE.to_string(),
            block_marker: DEFAULT_BLOCK_MARKER,
            translation_tag: DEFAULT_TRANSLATION_TAG.to_string(),
            pretty: false,
        }
    }
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_capture_variable(mut self, name: impl Into<String>) -> Self {
        self.capture_variable = name.into();
        self
    }

    pub fn with_block_marker(mut self, marker: char) -> Self {
        self.block_marker = marker;
        self
    }

    pub fn with_translation_tag(mut self, name: impl Into<String>) -> Self {
        self.translation_tag = name.into();
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}
