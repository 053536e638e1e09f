//! Shared configuration loading for directiv.
//!
//! `defaults/directiv.default.toml` is embedded into every binary so that the documented
//! defaults and the runtime behavior stay in sync. Applications layer user files and single
//! overrides on top with [`Loader`] before deserializing into [`DirectivConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use directiv::CompileOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/directiv.default.toml");

/// Top-level configuration consumed by directiv applications.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectivConfig {
    pub compiler: CompilerConfig,
    pub output: OutputConfig,
}

/// Mirrors the knobs of [`CompileOptions`].
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerConfig {
    pub capture_variable: String,
    pub block_marker: char,
    pub translation_tag: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub pretty: bool,
    pub emit: EmitFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmitFormat {
    /// `return <IR>;`
    Ir,
    /// The IR as JSON.
    Json,
    /// The parse tree as JSON.
    Ast,
}

impl DirectivConfig {
    /// Compile options for a unit named `filename`.
    pub fn compile_options(&self, filename: Option<&str>) -> CompileOptions {
        CompileOptions {
            filename: filename.map(str::to_string),
            capture_variable: self.compiler.capture_variable.clone(),
            block_marker: self.compiler.block_marker,
            translation_tag: self.compiler.translation_tag.clone(),
            pretty: self.output.pretty,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<DirectivConfig, ConfigError> {
        let config: DirectivConfig = self.builder.build()?.try_deserialize()?;
        tracing::debug!(?config, "loaded configuration");
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<DirectivConfig, ConfigError> {
    Loader::new().build()
}
