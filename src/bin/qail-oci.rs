//! qail-oci: compile QAIL queries and blueprints to Oracle SQL
//!
//! Reads JSON-serialized [`Query`] and [`Blueprint`] values and prints the
//! SQL and positional bindings an Oracle client would run.
//!
//! # Usage
//!
//! ```bash
//! # Compile a query
//! qail-oci query users.json
//!
//! # Count for pagination, with a table prefix
//! qail-oci --prefix app_ count users.json
//!
//! # Migration statements, identity included
//! qail-oci schema create_users.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use qail_oci::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qail-oci")]
#[command(version)]
#[command(about = "Oracle SQL grammar for QAIL queries and blueprints", long_about = None)]
#[command(after_help = "EXAMPLES:
    qail-oci query users.json
    qail-oci --dialect ansi query users.json --format json
    qail-oci schema create_users.json
    qail-oci schema drop_users.json --drop --key id
    qail-oci identity users id --drop")]
struct Cli {
    /// Grammar config file (TOML)
    #[arg(short, long, env = "QAIL_OCI_CONFIG")]
    config: Option<PathBuf>,

    /// Table prefix, overriding the config file
    #[arg(long, env = "QAIL_OCI_PREFIX")]
    prefix: Option<String>,

    /// SQL dialect
    #[arg(short, long, default_value = "oracle")]
    dialect: Dialect,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a query (select, insert, update, delete, truncate)
    Query {
        /// JSON file holding the query
        file: PathBuf,
        /// Insert returning this generated key
        #[arg(long)]
        returning: Option<String>,
    },
    /// Compile the pagination count of a select
    Count { file: PathBuf },
    /// Compile the exists check of a select
    Exists { file: PathBuf },
    /// Compile a blueprint into DDL, identity statements included
    Schema {
        /// JSON file holding the blueprint
        file: PathBuf,
        /// Drop the table (and its identity) instead
        #[arg(long)]
        drop: bool,
        /// Auto-increment key whose identity is dropped with the table
        #[arg(long, requires = "drop")]
        key: Option<String>,
    },
    /// Sequence and trigger for an auto-increment key
    Identity {
        table: String,
        key: String,
        /// Drop statements instead of create
        #[arg(long)]
        drop: bool,
    },
    /// Show the effective grammar configuration
    Config,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("QAIL_OCI_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let grammar = OracleGrammar::with_dialect(config, cli.dialect);

    match &cli.command {
        Commands::Query { file, returning } => {
            let query: Query = read_json(file).await?;
            let compiled = match returning {
                Some(key) => grammar.compile_insert_get_id(&query, key)?,
                None => query.to_sql_with(&grammar)?,
            };
            print_compiled(&compiled, &cli.format)
        }
        Commands::Count { file } => {
            let query: Query = read_json(file).await?;
            print_compiled(&grammar.compile_count_for_pagination(&query)?, &cli.format)
        }
        Commands::Exists { file } => {
            let query: Query = read_json(file).await?;
            print_compiled(&grammar.compile_exists(&query)?, &cli.format)
        }
        Commands::Schema { file, drop, key } => {
            let blueprint: Blueprint = read_json(file).await?;
            let statements = schema_statements(&grammar, &blueprint, *drop, key.as_deref())?;
            print_statements(&statements, &cli.format)
        }
        Commands::Identity { table, key, drop } => {
            let identity = grammar.identity(table, key);
            let statements = if *drop { identity.drop() } else { identity.create() };
            print_statements(&statements, &cli.format)
        }
        Commands::Config => {
            let text = toml::to_string_pretty(grammar.config()).context("serializing config")?;
            println!("{}", text);
            Ok(())
        }
    }
}

/// Explicit path, then the platform default if present, then defaults.
fn load_config(cli: &Cli) -> Result<GrammarConfig> {
    let mut config = match &cli.config {
        Some(path) => GrammarConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => match GrammarConfig::default_path().filter(|p| p.exists()) {
            Some(path) => GrammarConfig::load(&path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => GrammarConfig::default(),
        },
    };
    if let Some(prefix) = &cli.prefix {
        config = config.with_prefix(prefix.clone());
    }
    Ok(config)
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Same order a migration runner uses: table then identity, or identity
/// then table when dropping.
fn schema_statements(
    grammar: &OracleGrammar,
    blueprint: &Blueprint,
    drop: bool,
    key: Option<&str>,
) -> Result<Vec<String>> {
    let identity = match key {
        Some(key) => Some(grammar.blueprint_key_identity(blueprint, key)),
        None => grammar.blueprint_identity(blueprint),
    };

    let mut statements = Vec::new();
    if drop {
        if let Some(identity) = &identity {
            statements.extend(identity.drop());
        }
        statements.extend(grammar.compile_drop(blueprint)?);
    } else {
        statements.extend(grammar.compile_blueprint(blueprint)?);
        if let Some(identity) = identity.filter(|_| !blueprint.has_drop()) {
            statements.extend(identity.create());
        }
    }
    Ok(statements)
}

fn print_compiled(compiled: &Compiled, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "sql": compiled.sql,
                "parameters": compiled.parameters(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("{}", "Generated SQL:".green().bold());
            println!("{}", compiled.sql.white());

            let parameters = compiled.parameters();
            if !parameters.is_empty() {
                println!();
                println!("{}", "Bindings:".cyan());
                for (i, parameter) in parameters.iter().enumerate() {
                    match parameter {
                        Parameter::In(value) => {
                            println!("  {:>3} = {}", i + 1, value.to_string().yellow())
                        }
                        Parameter::Out(out) => {
                            println!("  {:>3} {} {:?}", i + 1, "out".magenta(), out)
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

fn print_statements(statements: &[String], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(statements)?),
        OutputFormat::Text => {
            if statements.is_empty() {
                println!("{}", "(no statements)".dimmed());
            }
            for sql in statements {
                println!("{};", sql.white());
            }
            println!();
            println!("{} statement(s)", statements.len().to_string().cyan());
        }
    }
    Ok(())
}
