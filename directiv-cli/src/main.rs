//! Command-line interface for directiv
//! Compiles a template file and prints the result.
//!
//! Usage:
//!   directiv `<path>` [--config `<file>`] [--emit ir|json|ast] [--pretty] [-v]
//!
//! A `directiv.toml` next to the template is picked up when present; `--config` is layered
//! over it.
//!
//! Output formats:
//!   ir     the runtime artifact, `return [...];` (default)
//!   json   the IR as JSON
//!   ast    the parse tree as JSON, before compilation

use clap::{Arg, ArgAction, Command};
use directiv::{CompileError, Compiler};
use directiv_config::{DirectivConfig, EmitFormat, Loader};
use directiv_parser::{ParseError, Parser, TemplateFrontEnd};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

fn cli() -> Command {
    Command::new("directiv")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile directiv templates into their JSON intermediate representation")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the template file")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("emit")
                .long("emit")
                .short('e')
                .help("What to print (default from configuration: ir)")
                .value_parser(["ir", "json", "ast"]),
        )
        .arg(
            Arg::new("pretty")
                .long("pretty")
                .help("Pretty-print JSON output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log compiler activity to stderr")
                .action(ArgAction::SetTrue),
        )
}

fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let Some(path) = matches.get_one::<String>("path") else {
        eprintln!("error: a template path is required");
        std::process::exit(2);
    };

    let config = load_config(
        Path::new(path),
        matches.get_one::<String>("config").map(String::as_str),
        matches.get_one::<String>("emit").map(String::as_str),
        matches.get_flag("pretty"),
    );

    match config.and_then(|config| run(Path::new(path), &config)) {
        Ok(output) => println!("{}", output),
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Name of the per-directory configuration file looked up next to the template.
const LOCAL_CONFIG: &str = "directiv.toml";

fn load_config(
    template: &Path,
    file: Option<&str>,
    emit: Option<&str>,
    pretty: bool,
) -> Result<DirectivConfig, CliError> {
    let dir = template.parent().unwrap_or_else(|| Path::new("."));
    let mut loader = Loader::new().with_optional_file(dir.join(LOCAL_CONFIG));
    if let Some(file) = file {
        loader = loader.with_file(file);
    }
    if let Some(emit) = emit {
        loader = loader.set_override("output.emit", emit)?;
    }
    if pretty {
        loader = loader.set_override("output.pretty", true)?;
    }
    Ok(loader.build()?)
}

fn run(path: &Path, config: &DirectivConfig) -> Result<String, CliError> {
    let filename = path.display().to_string();
    let source = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: filename.clone(),
        source,
    })?;
    tracing::debug!(path = %filename, emit = ?config.output.emit, "compiling");

    let root = Parser.parse(&source, Some(filename.as_str()))?;
    if config.output.emit == EmitFormat::Ast {
        return to_json(&root, config.output.pretty);
    }

    let compiler = Compiler::new(root, config.compile_options(Some(filename.as_str())));
    match config.output.emit {
        EmitFormat::Json => to_json(&compiler.compile_ir()?, config.output.pretty),
        _ => Ok(compiler.compile()?),
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
