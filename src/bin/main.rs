//! dbsync CLI - Import database metadata into a data map
//!
//! Usage:
//!   dbsync import [--config <dbsync.toml>] [--merge <map.json>] [--json]
//!   dbsync filters [--config <dbsync.toml>] [--compiled]
//!   dbsync catalogs [--config <dbsync.toml>]
//!   dbsync schemas [--config <dbsync.toml>]
//!
//! Examples:
//!   dbsync import --config art.toml --json > art.json
//!   dbsync import --config art.toml --merge art.json
//!   dbsync filters --config art.toml

use clap::{Parser, Subcommand};
use dbsync::config::{Settings, SourceLocation};
use dbsync::filters::FiltersConfigBuilder;
use dbsync::loader::{DbLoader, LoadContext};
use dbsync::metadata::{MemoryMetadataSource, MetadataSource, SqliteMetadataSource};
use dbsync::model::DataMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dbsync")]
#[command(about = "dbsync - Reverse-engineer database metadata into a data map")]
#[command(version)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load metadata from the configured source and print the resulting map
    Import {
        /// Settings file (defaults to DBSYNC_CONFIG, ./dbsync.toml, then the user config dir)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Existing map (JSON) to merge into
        #[arg(short, long)]
        merge: Option<PathBuf>,

        /// Print the map as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Print the filter rules after compaction
    Filters {
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the compiled filters instead of the compacted tree
        #[arg(long)]
        compiled: bool,
    },

    /// List catalogs of the configured source
    Catalogs {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List schemas of the configured source
    Schemas {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Import {
            config,
            merge,
            json,
        } => cmd_import(config.as_deref(), merge.as_deref(), json),
        Commands::Filters { config, compiled } => cmd_filters(config.as_deref(), compiled),
        Commands::Catalogs { config } => cmd_list(config.as_deref(), |s| s.catalogs()),
        Commands::Schemas { config } => cmd_list(config.as_deref(), |s| s.schemas()),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "dbsync=debug" } else { "dbsync=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_settings(path: Option<&Path>) -> Result<Settings, String> {
    let result = match path {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    result.map_err(|e| format!("Error loading settings: {}", e))
}

fn open_source(settings: &Settings) -> Result<Box<dyn MetadataSource>, String> {
    let location = settings
        .source
        .location()
        .map_err(|e| format!("Error in settings: {}", e))?;
    let source: Box<dyn MetadataSource> = match &location {
        SourceLocation::Sqlite(path) => Box::new(
            SqliteMetadataSource::open(path)
                .map_err(|e| format!("Error opening '{}': {}", path.display(), e))?,
        ),
        SourceLocation::Snapshot(path) => Box::new(
            MemoryMetadataSource::from_json_file(path)
                .map_err(|e| format!("Error reading snapshot '{}': {}", path.display(), e))?,
        ),
    };
    tracing::debug!(?location, "Opened metadata source");
    Ok(source)
}

fn read_map(path: &Path) -> Result<DataMap, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Error reading file '{}': {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("Error parsing map '{}': {}", path.display(), e))
}

fn cmd_import(config: Option<&Path>, merge: Option<&Path>, json: bool) -> ExitCode {
    match run_import(config, merge, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn run_import(config: Option<&Path>, merge: Option<&Path>, json: bool) -> Result<(), String> {
    let settings = load_settings(config)?;
    let source = open_source(&settings)?;
    let map = match merge {
        Some(path) => read_map(path)?,
        None => DataMap::new(&settings.map.name),
    };

    let mut loader = DbLoader::from_config(source.as_ref(), &settings.reverse_engineering)
        .map_err(|e| format!("Error in filters: {}", e))?;
    let mut ctx = LoadContext::new(map);
    loader
        .run(&mut ctx)
        .map_err(|e| format!("Import failed: {}", e))?;

    for diagnostic in ctx.diagnostics() {
        eprintln!("warning: {}", diagnostic);
    }

    let map = ctx.into_data_map();
    if json {
        let out = serde_json::to_string_pretty(&map)
            .map_err(|e| format!("Error serializing map: {}", e))?;
        println!("{}", out);
    } else {
        print!("{}", map);
    }
    Ok(())
}

fn cmd_filters(config: Option<&Path>, compiled: bool) -> ExitCode {
    let settings = match load_settings(config) {
        Ok(s) => s,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    let builder = FiltersConfigBuilder::new(&settings.reverse_engineering);
    if !compiled {
        println!("{}", builder.compact());
        return ExitCode::SUCCESS;
    }
    match builder.build() {
        Ok(filters) => {
            println!("{}", filters);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error in filters: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_list<F>(config: Option<&Path>, list: F) -> ExitCode
where
    F: Fn(&dyn MetadataSource) -> dbsync::metadata::MetadataResult<Vec<String>>,
{
    let source = match load_settings(config).and_then(|s| open_source(&s)) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    match list(source.as_ref()) {
        Ok(names) if names.is_empty() => {
            println!("(none)");
            ExitCode::SUCCESS
        }
        Ok(names) => {
            for name in names {
                println!("{}", name);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Metadata error: {}", e);
            ExitCode::FAILURE
        }
    }
}
