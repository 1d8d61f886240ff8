//! The TO2 checker CLI.
//!
//! - `to2c check --registry <file> <module.json>` validates a module AST
//!   produced by the parser and prints its diagnostics
//! - `to2c types --registry <file> [module]` lists registry modules, or the
//!   exports of one module with their realized types
//!
//! Options of `check`:
//! - `--source` - the module's source text, for labeled excerpts
//! - `--json` - diagnostics as JSON, one object per line
//! - `--no-color` - disable colorized output
//!
//! Logging goes to stderr and is controlled by `TO2_LOG`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use to2_typeck::ast::TO2Module;
use to2_typeck::context::ModuleContext;
use to2_typeck::diagnostics::DiagnosticOptions;
use to2_typeck::ty::GenericMap;
use to2_typeck::typeref::resolve_type_ref;
use to2_typeck::{validate_module, RealizedType, Registry, RegistryError};

#[derive(Parser)]
#[command(name = "to2c", version, about = "Static checker for TO2 modules")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a module AST against a registry
    Check {
        /// Registry descriptors (JSON)
        #[arg(long)]
        registry: PathBuf,

        /// Module AST (JSON)
        module: PathBuf,

        /// Source text the AST was parsed from
        #[arg(long)]
        source: Option<PathBuf>,

        /// Output diagnostics as JSON (one object per line)
        #[arg(long)]
        json: bool,

        /// Disable colorized output
        #[arg(long)]
        no_color: bool,
    },
    /// List registry modules or the exports of one module
    Types {
        /// Registry descriptors (JSON)
        #[arg(long)]
        registry: PathBuf,

        /// Module to describe
        module: Option<String>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed module AST `{path}`: {source}")]
    Ast {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode diagnostics: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("unknown module `{0}`")]
    UnknownModule(String),
}

fn main() -> ExitCode {
    if let Ok(filter) = EnvFilter::try_from_env("TO2_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Check {
            registry,
            module,
            source,
            json,
            no_color,
        } => {
            let options = DiagnosticOptions {
                color: !no_color && !json,
                json,
            };
            check(&registry, &module, source.as_deref(), &options)
        }
        Commands::Types { registry, module } => types(&registry, module.as_deref()),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(2)
        }
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Returns whether the module validated without errors.
fn check(
    registry: &Path,
    module: &Path,
    source: Option<&Path>,
    options: &DiagnosticOptions,
) -> Result<bool, CliError> {
    let registry = Arc::new(Registry::from_path(registry)?);
    let ast: TO2Module = serde_json::from_str(&read(module)?).map_err(|source| CliError::Ast {
        path: module.display().to_string(),
        source,
    })?;
    let text = source.map(read).transpose()?;

    let result = validate_module(&registry, &ast);
    let file_name = source.unwrap_or(module).display().to_string();

    match &text {
        Some(text) => {
            for rendered in result.render_diagnostics(text, &file_name, options) {
                if options.json {
                    eprintln!("{}", rendered);
                } else {
                    eprint!("{}", rendered);
                }
            }
        }
        None => {
            for diagnostic in &result.diagnostics {
                if options.json {
                    eprintln!("{}", serde_json::to_string(diagnostic)?);
                } else {
                    eprintln!("{}:{}", file_name, diagnostic);
                }
            }
        }
    }

    let errors = result.errors().count();
    let warnings = result.warnings().count();
    if !options.json {
        eprintln!(
            "{}: {} error(s), {} warning(s)",
            ast.name, errors, warnings
        );
    }
    Ok(errors == 0)
}

fn types(registry: &Path, module: Option<&str>) -> Result<bool, CliError> {
    let registry = Arc::new(Registry::from_path(registry)?);
    let Some(name) = module else {
        for name in registry.module_names() {
            let description = registry
                .module(name)
                .map(|m| m.description())
                .unwrap_or_default();
            if description.is_empty() {
                println!("{}", name);
            } else {
                println!("{}  {}", name, description);
            }
        }
        return Ok(true);
    };

    let module = registry
        .module(name)
        .ok_or_else(|| CliError::UnknownModule(name.to_string()))?;
    let ctx = ModuleContext::new(Arc::clone(&registry), name);
    let descriptor = &module.descriptor;

    println!("module {}", module.name());
    for constant in &descriptor.constants {
        let ty = resolve_type_ref(&registry, &constant.value_type, None);
        println!("  const {}: {}", constant.name, ty);
    }
    for function in &descriptor.functions {
        println!("  fn {}: {}", function.name, ctx.library_function_type(function));
    }
    for ty in &descriptor.types {
        let own = RealizedType::standard(name, &ty.name);
        let generics: GenericMap = ty
            .generic_parameters
            .iter()
            .map(|g| (g.clone(), RealizedType::Generic(g.clone())))
            .collect();
        if ty.generic_parameters.is_empty() {
            println!("  type {}", own);
        } else {
            println!("  type {}<{}>", own, ty.generic_parameters.join(", "));
        }
        for (field, desc) in &ty.fields {
            let field_type = resolve_type_ref(&registry, &desc.field_type, Some(&generics));
            let access = if desc.read_only { " (read-only)" } else { "" };
            println!("    .{}: {}{}", field, field_type, access);
        }
        for method in ty.methods.keys() {
            if let Some(info) = own.find_method(&ctx, method) {
                println!("    .{}: {}", method, RealizedType::Function(info.signature));
            }
        }
    }
    Ok(true)
}
