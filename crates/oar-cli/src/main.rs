use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::Serialize;

use oar_core::ResourceService;
use oar_core::config::{self, CONFIG_FILE_NAME, OarConfig};
use oar_core::model::{ResourceInfo, render_outline};
use oar_core::render::FormMode;
use oar_core::service::ServiceOptions;

#[derive(Parser)]
#[command(name = "oar", about = "Explore the resource model of an OpenAPI document", version)]
struct Cli {
    /// OpenAPI document: file path (YAML or JSON) or http(s) URL.
    /// Defaults to `input` from the config file.
    #[arg(short, long, global = true)]
    input: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a document parses and report what was found
    Validate,

    /// Print the resource forest
    Inspect {
        /// Output format
        #[arg(long, default_value = "tree")]
        format: InspectFormat,
    },

    /// Print aggregate counts
    Stats,

    /// Print the resolved instance schema of a resource
    Schema {
        resource: String,
    },

    /// Print the form schema of a resource
    Form {
        resource: String,

        #[arg(long, default_value = "create")]
        mode: ModeArg,
    },

    /// Print the table schema of a resource
    Table {
        resource: String,
    },

    /// Initialize a new oar configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Tree,
    Yaml,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Create,
    Edit,
}

impl From<ModeArg> for FormMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Create => FormMode::Create,
            ModeArg::Edit => FormMode::Edit,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oar", &mut std::io::stdout());
            Ok(())
        }

        command => {
            let cfg = try_load_config()?.unwrap_or_default();
            let service = load_service(cli.input, &cfg).await?;
            run_query(command, &service, &cfg)
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<OarConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).with_context(|| format!("failed to load {CONFIG_FILE_NAME}"))
}

async fn load_service(input: Option<String>, cfg: &OarConfig) -> Result<ResourceService> {
    let input = input.unwrap_or_else(|| cfg.input.clone());
    log::debug!("loading {input}");
    let mut service = ResourceService::new(ServiceOptions::from(cfg));
    service
        .load(&input)
        .await
        .with_context(|| format!("failed to load {input}"))?;
    Ok(service)
}

fn run_query(command: Commands, service: &ResourceService, cfg: &OarConfig) -> Result<()> {
    match command {
        Commands::Validate => cmd_validate(service),
        Commands::Inspect { format } => cmd_inspect(service, format),
        Commands::Stats => print_yaml(service.resource_statistics()?),
        Commands::Schema { resource } => {
            let schema = service
                .resource_schema(&resource)?
                .with_context(|| format!("resource `{resource}` has no readable instance schema"))?;
            print_json(&schema)
        }
        Commands::Form { resource, mode } => {
            let options = cfg.render.form_options(mode.into());
            print_json(&service.form_schema(&resource, &options)?)
        }
        Commands::Table { resource } => {
            let options = cfg.render.table_options();
            print_json(&service.table_schema(&resource, &options)?)
        }
        Commands::Init { .. } | Commands::Completions { .. } => Ok(()),
    }
}

fn cmd_validate(service: &ResourceService) -> Result<()> {
    let info = service.document_info()?;
    let doc = service.document()?;
    let stats = service.resource_statistics()?;

    eprintln!("Valid {} document: {}", info.dialect, info.title);
    eprintln!("  Version: {}", info.version);
    eprintln!("  Paths: {}", doc.paths.len());
    for server in &info.servers {
        eprintln!("  Server: {server}");
    }
    eprintln!("  Resources: {}", stats.total_resources);
    eprintln!("  Resource operations: {}", stats.total_operations);

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(service: &ResourceService, format: InspectFormat) -> Result<()> {
    let forest = service.all_resources()?;
    match format {
        InspectFormat::Tree => {
            println!("{}", render_outline(forest));
            Ok(())
        }
        InspectFormat::Yaml => print_yaml(&inspect_summary(forest)),
        InspectFormat::Json => print_json(&inspect_summary(forest)),
    }
}

fn inspect_summary(forest: &[ResourceInfo]) -> Vec<serde_json::Value> {
    forest
        .iter()
        .map(|r| {
            serde_json::json!({
                "name": r.name,
                "path_pattern": r.path_pattern,
                "base_path": r.base_path,
                "identifier_field": r.identifier_field,
                "tags": r.tags,
                "operations": r
                    .operations
                    .iter()
                    .map(|op| format!("{} {}", op.method, op.path))
                    .collect::<Vec<_>>(),
                "sub_resources": inspect_summary(&r.sub_resources),
            })
        })
        .collect()
}

fn print_yaml<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let yaml = serde_yaml_ng::to_string(value)?;
    print!("{}", yaml);
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
