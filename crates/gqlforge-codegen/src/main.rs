mod config;
mod fetch_schema;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use config::Config;
use gqlforge_codegen::GenerateOptions;
use gqlforge_core::SchemaTypeGraph;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// gqlforge-codegen: typed Rust clients from a GraphQL schema
#[derive(Debug, Parser)]
#[command(name = "gqlforge-codegen", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a client module from an SDL schema.
    Generate {
        /// SDL schema file.
        #[arg(long)]
        schema: Option<PathBuf>,
        /// Output directory for the generated module.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Name of the generated operations struct (default: Api).
        #[arg(long)]
        client_name: Option<String>,
        /// Exit with an error if any member could not be generated.
        #[arg(long)]
        strict: bool,
        /// Config file (default: ./gqlforge.toml when present).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Download a schema over introspection and print or save it as SDL.
    FetchSchema {
        /// GraphQL endpoint URL.
        #[arg(long)]
        endpoint: String,
        /// Token sent as `Authorization: Token <token>`.
        #[arg(long, env = "GQLFORGE_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// Write SDL here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Generate {
            schema,
            out,
            client_name,
            strict,
            config,
        } => {
            let flags = Config {
                schema,
                out,
                client_name,
                strict: strict.then_some(true),
            };
            Config::load(config.as_deref()).and_then(|file| run_generate(flags.or(file)))
        }
        Command::FetchSchema {
            endpoint,
            token,
            out,
        } => run_fetch_schema(&endpoint, token.as_deref(), out.as_deref()),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_generate(config: Config) -> Result<ExitCode> {
    let Some(schema_path) = config.schema else {
        bail!("no schema given (use --schema or set `schema` in gqlforge.toml)");
    };
    let Some(out_dir) = config.out else {
        bail!("no output directory given (use --out or set `out` in gqlforge.toml)");
    };
    let options = match config.client_name {
        Some(client_name) => GenerateOptions { client_name },
        None => GenerateOptions::default(),
    };

    let text = std::fs::read_to_string(&schema_path)
        .with_context(|| format!("reading schema {}", schema_path.display()))?;
    let graph = SchemaTypeGraph::parse(&text);
    tracing::info!(types = graph.types().count(), "schema loaded");

    let generated = gqlforge_codegen::generate(&graph, &options).context("formatting generated code")?;

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    for (name, source) in &generated.files {
        let path = out_dir.join(name);
        std::fs::write(&path, source).with_context(|| format!("writing {}", path.display()))?;
        println!("wrote {}", path.display());
    }

    if generated.report.is_empty() {
        return Ok(ExitCode::SUCCESS);
    }
    eprint!("{}", generated.report);
    if config.strict.unwrap_or(false) {
        eprintln!("Error: strict mode: generation incomplete");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_fetch_schema(endpoint: &str, token: Option<&str>, out: Option<&Path>) -> Result<ExitCode> {
    let sdl = fetch_schema::fetch_and_convert(endpoint, token)?;
    match out {
        Some(path) => {
            std::fs::write(path, &sdl).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{}", sdl),
    }
    Ok(ExitCode::SUCCESS)
}
