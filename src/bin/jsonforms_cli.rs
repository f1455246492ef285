use clap::{Parser, Subcommand};
use jsonforms::config::JsonFormsConfig;
use jsonforms::editor::EditorBootstrap;
use jsonforms::import::{import_directory, ImportOptions};
use jsonforms::schema::{SafeJsonEncoder, SchemaRepository};
use jsonforms::wiki::{MemoryPageStore, NamespaceRegistry, PageStore, SledPageStore};
use log::{error, info, warn, LevelFilter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "jsonforms.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import every page source under the data directory
    Import {
        /// Accepted for compatibility with older scripts
        #[arg(long)]
        delete: bool,

        /// Directory to import instead of the configured one
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Write into an in-memory store and discard the result
        #[arg(long)]
        dry_run: bool,
    },
    /// Print a stored JSON schema
    GetSchema {
        /// Page title, e.g. JsonSchema:Person
        title: String,
    },
    /// List schema pages
    ListSchemas {
        /// Only list pages whose name starts with this prefix
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Print the editor payload for a form
    EditorConfig {
        /// Form name inside the form namespace
        form: String,
    },
}

fn open_store(config: &JsonFormsConfig) -> Result<Arc<dyn PageStore>, Box<dyn std::error::Error>> {
    info!("Opening page store at {}", config.storage_path.display());
    Ok(Arc::new(SledPageStore::open(&config.storage_path)?))
}

fn repository(
    config: &JsonFormsConfig,
    store: Arc<dyn PageStore>,
) -> SchemaRepository {
    SchemaRepository::new(store, NamespaceRegistry::from(config), config.query_limit)
}

fn handle_import(
    config: &JsonFormsConfig,
    delete: bool,
    data_dir: Option<PathBuf>,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = data_dir.unwrap_or_else(|| config.data_dir.clone());
    let store: Arc<dyn PageStore> = if dry_run {
        info!("Dry run: pages are written to memory only");
        Arc::new(MemoryPageStore::new())
    } else {
        open_store(config)?
    };

    let report = import_directory(config, store, Path::new(&root), ImportOptions { delete })?;
    report.log_summary();
    if report.has_failures() {
        warn!("Some pages were not written; see the list above");
    }
    info!("Imported {} pages", report.imported.len());
    Ok(())
}

fn handle_get_schema(
    config: &JsonFormsConfig,
    title: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let repo = repository(config, open_store(config)?);
    match repo.get_json_schema(&title)? {
        Some(schema) => {
            let encoded = SafeJsonEncoder::new().encode(&schema)?;
            info!("{}", encoded.text);
            Ok(())
        }
        None => Err(format!("Schema not found: {}", title).into()),
    }
}

fn handle_list_schemas(
    config: &JsonFormsConfig,
    prefix: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let repo = repository(config, open_store(config)?);
    let namespace = repo
        .namespaces()
        .lookup(&config.schema_namespace)
        .map(|(id, _)| id)
        .ok_or_else(|| format!("Unknown schema namespace: {}", config.schema_namespace))?;

    let titles = repo.pages_with_prefix(prefix.as_deref(), namespace)?;
    info!("Schemas:");
    for title in titles {
        info!("  - {}", title.text());
    }
    Ok(())
}

fn handle_editor_config(
    config: &JsonFormsConfig,
    form: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let repo = repository(config, open_store(config)?);
    let payload = EditorBootstrap::new(&repo, config).build(&form)?;
    info!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    jsonforms::logging::init(LevelFilter::Info).ok();
    let cli = Cli::parse();

    info!("Loading config from: {}", cli.config.display());
    let config = match JsonFormsConfig::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e.user_message());
            return Err(e.into());
        }
    };

    match cli.command {
        Commands::Import {
            delete,
            data_dir,
            dry_run,
        } => handle_import(&config, delete, data_dir, dry_run)?,
        Commands::GetSchema { title } => handle_get_schema(&config, title)?,
        Commands::ListSchemas { prefix } => handle_list_schemas(&config, prefix)?,
        Commands::EditorConfig { form } => handle_editor_config(&config, form)?,
    }

    Ok(())
}
