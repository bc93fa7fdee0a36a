//! qb CLI - Compile JSON query specs to SQL
//!
//! Usage:
//!   qb compile --definitions <defs.json> --spec <spec.json|-> [--dialect <dialect>]
//!   qb schema --definitions <defs.json>
//!   qb validate --definitions <defs.json>
//!
//! Examples:
//!   qb compile -D demos/blog.json -s demos/specs/posts_by_tag.json
//!   echo '{"select":"id","from":"users"}' | qb compile -D demos/blog.json -s - --dialect tsql
//!   qb schema -D demos/blog.json
//!
//! Settings come from qb.toml (see `qb::config`). Set RUST_LOG=debug to
//! trace the compile pipeline.

use clap::{Parser, Subcommand, ValueEnum};
use qb::config::Settings;
use qb::sql::Dialect;
use qb::QueryCompiler;
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "qb")]
#[command(about = "qb - Compile declarative JSON query specs to multi-dialect SQL")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a query spec to SQL
    Compile {
        /// Table definitions (JSON). Defaults to compiler.definitions in qb.toml
        #[arg(short = 'D', long)]
        definitions: Option<PathBuf>,

        /// Query spec (JSON), or - for stdin
        #[arg(short, long)]
        spec: PathBuf,

        /// SQL dialect to generate. Defaults to compiler.dialect in qb.toml
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        output: OutputFormat,
    },

    /// Print the public schema as JSON
    Schema {
        /// Table definitions (JSON)
        #[arg(short = 'D', long)]
        definitions: Option<PathBuf>,
    },

    /// Validate table definitions without compiling anything
    Validate {
        /// Table definitions (JSON)
        #[arg(short = 'D', long)]
        definitions: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Postgres,
    Mysql,
    Tsql,
    Duckdb,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Mysql => Dialect::MySql,
            DialectArg::Tsql => Dialect::TSql,
            DialectArg::Duckdb => Dialect::DuckDb,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Single-line SQL
    Sql,
    /// SQL broken at clause keywords
    Pretty,
    /// Text, formatted and parameterized forms as JSON
    Json,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Compile {
            definitions,
            spec,
            dialect,
            output,
        } => cmd_compile(&settings, definitions, spec, dialect, output),
        Commands::Schema { definitions } => cmd_schema(&settings, definitions),
        Commands::Validate { definitions } => cmd_validate(&settings, definitions),
    }
}

fn cmd_compile(
    settings: &Settings,
    definitions: Option<PathBuf>,
    spec_path: PathBuf,
    dialect: Option<DialectArg>,
    output: OutputFormat,
) -> ExitCode {
    let Some(compiler) = load_compiler(settings, definitions, dialect) else {
        return ExitCode::FAILURE;
    };

    let spec = match read_json(&spec_path) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match compiler.query(&spec) {
        Ok(compiled) => {
            match output {
                OutputFormat::Sql => println!("{}", compiled.text),
                OutputFormat::Pretty => println!("{}", compiled.formatted),
                OutputFormat::Json => match serde_json::to_string_pretty(&compiled) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error serializing output: {}", e);
                        return ExitCode::FAILURE;
                    }
                },
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Compilation error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_schema(settings: &Settings, definitions: Option<PathBuf>) -> ExitCode {
    let Some(compiler) = load_compiler(settings, definitions, None) else {
        return ExitCode::FAILURE;
    };

    match serde_json::to_string_pretty(compiler.schema()) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing schema: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_validate(settings: &Settings, definitions: Option<PathBuf>) -> ExitCode {
    let Some(compiler) = load_compiler(settings, definitions, None) else {
        return ExitCode::FAILURE;
    };

    let defs = compiler.definitions();
    let hidden = defs.iter().filter(|t| t.hidden).count();
    println!(
        "OK: {} tables ({} hidden), {} public",
        defs.len(),
        hidden,
        compiler.schema().len()
    );
    ExitCode::SUCCESS
}

/// Build a compiler from CLI arguments and settings, reporting errors to stderr.
fn load_compiler(
    settings: &Settings,
    definitions: Option<PathBuf>,
    dialect: Option<DialectArg>,
) -> Option<QueryCompiler> {
    let path = match definitions {
        Some(path) => path,
        None => match settings.definitions_path() {
            Ok(Some(path)) => path,
            Ok(None) => {
                eprintln!("No definitions given: pass --definitions or set compiler.definitions");
                return None;
            }
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return None;
            }
        },
    };

    let mut options = match settings.compile_options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return None;
        }
    };
    if let Some(dialect) = dialect {
        options = options.with_dialect(dialect.into());
    }

    let definitions = match read_json(&path) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("{}", e);
            return None;
        }
    };

    let compiler = match QueryCompiler::with_options(&definitions, options) {
        Ok(compiler) => compiler,
        Err(e) => {
            eprintln!("Definition error in '{}': {}", path.display(), e);
            return None;
        }
    };

    if let Err(e) = settings.register_functions(&compiler) {
        eprintln!("Configuration error: {}", e);
        return None;
    }

    Some(compiler)
}

fn read_json(path: &Path) -> Result<Value, String> {
    let source = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("Error reading stdin: {}", e))?;
        buf
    } else {
        fs::read_to_string(path)
            .map_err(|e| format!("Error reading file '{}': {}", path.display(), e))?
    };

    serde_json::from_str(&source).map_err(|e| format!("Invalid JSON in '{}': {}", path.display(), e))
}
