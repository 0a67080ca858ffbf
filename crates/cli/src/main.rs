//! FortiOS Provider CLI
//!
//! Command-line interface for inspecting the resource catalog, running the
//! field mapping on JSON documents and generating documentation.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use fortios_provider_common::{AttributeDefinition, ProviderError, ResourceDefinition, ResourceKind};
use fortios_provider_generator::{DocsGenerator, SchemaExporter};
use fortios_provider_runtime::{
    expand_object, refresh_object, validate, MemoryClient, Payload, Provider, ProviderConfig,
    ResourceData,
};
use fortios_provider_schema::Catalog;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fortios-provider")]
#[command(version, about = "Inspect and exercise FortiOS configuration resources", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, value_enum, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Provider configuration file (YAML)
    #[arg(long, global = true)]
    provider_config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the supported resource types
    List,

    /// Show the attribute tree of a resource
    #[command(after_help = "EXAMPLES:\n  \
        fortios-provider show --resource fortios_system_interface")]
    Show {
        /// Resource type, with or without the fortios_ prefix
        #[arg(short, long)]
        resource: String,
    },

    /// Check a Terraform configuration against the resource schema
    #[command(after_help = "EXAMPLES:\n  \
        fortios-provider validate --resource wanopt_peer --config peer.json")]
    Validate {
        #[arg(short, long)]
        resource: String,

        /// Terraform attributes as a JSON object
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Print the REST payload built from a Terraform configuration
    #[command(after_help = "EXAMPLES:\n  \
        fortios-provider expand --resource system_virtualwirepair --config vwp.json")]
    Expand {
        #[arg(short, long)]
        resource: String,

        #[arg(short, long)]
        config: PathBuf,
    },

    /// Print the Terraform state built from a REST response
    #[command(after_help = "EXAMPLES:\n  \
        # Refresh existing state\n  \
        fortios-provider flatten --resource system_interface --payload port1.json --state state.json\n\n  \
        # Import: nested lists are always read\n  \
        fortios-provider flatten --resource system_interface --payload port1.json --import")]
    Flatten {
        #[arg(short, long)]
        resource: String,

        /// REST response object
        #[arg(short, long)]
        payload: PathBuf,

        /// Prior Terraform state
        #[arg(short, long)]
        state: Option<PathBuf>,

        /// Refresh as during `terraform import`
        #[arg(long)]
        import: bool,
    },

    /// Run create, read, delete and read against an in-memory device
    #[command(after_help = "EXAMPLES:\n  \
        fortios-provider simulate --resource wanopt_peer --config peer.json\n\n  \
        # Adopt a port that already exists on the device\n  \
        fortios-provider simulate --resource system_interface --config port1.json --existing port1-api.json")]
    Simulate {
        #[arg(short, long)]
        resource: String,

        #[arg(short, long)]
        config: PathBuf,

        /// REST object to seed before the run
        #[arg(long)]
        existing: Option<PathBuf>,
    },

    /// Generate Markdown documentation for every resource
    Docs {
        /// Output directory
        #[arg(short, long, default_value = "./docs")]
        output: PathBuf,
    },

    /// Print the provider schema as JSON
    Schema {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel, verbose: bool) {
    let level = match level {
        LogLevel::Error | LogLevel::Warn | LogLevel::Info if verbose => LogLevel::Debug,
        other => other,
    };
    let default = match level.to_tracing_level() {
        Some(level) => LevelFilter::from_level(level),
        None => LevelFilter::OFF,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_level, cli.verbose);

    let catalog = Catalog::builtin();

    match cli.command {
        Commands::List => list_command(catalog, cli.verbose),
        Commands::Show { resource } => show_command(catalog.require(&resource)?),
        Commands::Validate { resource, config } => {
            validate_command(catalog.require(&resource)?, &config)
        },
        Commands::Expand { resource, config } => {
            expand_command(catalog.require(&resource)?, &config)
        },
        Commands::Flatten {
            resource,
            payload,
            state,
            import,
        } => flatten_command(
            catalog.require(&resource)?,
            &payload,
            state.as_deref(),
            import,
        ),
        Commands::Simulate {
            resource,
            config,
            existing,
        } => {
            let provider_config = ProviderConfig::load(cli.provider_config.as_deref())
                .context("Failed to load provider configuration")?;
            simulate_command(
                catalog,
                catalog.require(&resource)?,
                &config,
                existing.as_deref(),
                provider_config,
                cli.verbose,
            )
        },
        Commands::Docs { output } => docs_command(catalog, &output),
        Commands::Schema { output } => schema_command(catalog, output.as_deref()),
    }
}

fn list_command(catalog: &Catalog, verbose: bool) -> Result<()> {
    println!("{}", "Resource types:".bold());
    for def in catalog.iter() {
        let kind = match def.kind {
            ResourceKind::Table => "table",
            ResourceKind::Singleton => "singleton",
        };
        println!(
            "  • {} [{}] {} ({} attributes)",
            def.terraform_type().cyan(),
            kind,
            def.api_path.yellow(),
            def.attribute_count()
        );
        if verbose && !def.description.is_empty() {
            println!("      {}", def.description);
        }
    }
    println!("\n{} {} resource types", "✓".green(), catalog.len());
    Ok(())
}

fn show_command(def: &ResourceDefinition) -> Result<()> {
    println!("{}", def.terraform_type().bold());
    if !def.description.is_empty() {
        println!("  {}", def.description);
    }
    println!("  CMDB path: {}", def.api_path.yellow());
    match &def.mkey {
        Some(mkey) => println!("  mkey: {}", mkey.cyan()),
        None => println!("  singleton, identifier {}", def.type_name.cyan()),
    }
    if let Some(rule) = &def.adopt_existing {
        println!("  adopts existing objects when {} = {}", rule.attribute, rule.equals);
    }
    println!();
    print_attributes(&def.attributes, 1);
    Ok(())
}

fn print_attributes(attributes: &[AttributeDefinition], depth: usize) {
    let indent = "  ".repeat(depth);
    for attr in attributes {
        let mut flags = Vec::new();
        if attr.required {
            flags.push("required".to_string());
        }
        if attr.computed {
            flags.push("computed".to_string());
        }
        if attr.force_new {
            flags.push("force_new".to_string());
        }
        if attr.sensitive {
            flags.push("sensitive".to_string());
        }
        if let Some(constraint) = &attr.constraint {
            flags.push(constraint.to_string());
        }

        println!(
            "{}{} → {} : {}{}",
            indent,
            attr.name.cyan(),
            attr.api_key(),
            attr.attr_type.to_string().yellow(),
            if flags.is_empty() {
                String::new()
            } else {
                format!(" ({})", flags.join(", "))
            }
        );
        print_attributes(&attr.attributes, depth + 1);
    }
}

fn validate_command(def: &ResourceDefinition, config: &Path) -> Result<()> {
    let data = read_state(config)?;
    match validate(def, data.attributes()) {
        Ok(()) => {
            println!("{} {} is valid", "✓".green(), config.display());
            Ok(())
        },
        Err(ProviderError::Validation(violations)) => {
            for violation in &violations {
                println!("  {} {}", "✗".red(), violation);
            }
            bail!("{} violation(s) in {}", violations.len(), config.display())
        },
        Err(e) => Err(e.into()),
    }
}

fn expand_command(def: &ResourceDefinition, config: &Path) -> Result<()> {
    let data = read_state(config)?;
    validate(def, data.attributes()).context("Configuration is not valid")?;

    let payload = expand_object(def, &data)
        .map_err(anyhow::Error::msg)
        .context("Failed to build payload")?;
    print_json(&Value::Object(payload))
}

fn flatten_command(
    def: &ResourceDefinition,
    payload: &Path,
    state: Option<&Path>,
    import: bool,
) -> Result<()> {
    let response = read_object(payload)?;
    let mut data = match state {
        Some(path) => read_state(path)?,
        None => ResourceData::default(),
    };
    data.set_importing(import);

    refresh_object(def, &mut data, &response)
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("Error reading {} resource from API", def.type_name))?;
    print_json(&Value::Object(data.into_attributes()))
}

fn simulate_command(
    catalog: &Catalog,
    def: &ResourceDefinition,
    config: &Path,
    existing: Option<&Path>,
    provider_config: ProviderConfig,
    verbose: bool,
) -> Result<()> {
    let mut data = read_state(config)?;
    validate(def, data.attributes()).context("Configuration is not valid")?;

    let mut provider = Provider::new(MemoryClient::from_catalog(catalog), provider_config);
    if let Some(path) = existing {
        let object = read_object(path)?;
        let api_path = provider.api_path(def);
        provider
            .client_mut()
            .seed(&api_path, object)
            .context("Failed to seed existing object")?;
    }

    eprintln!("{} create {}", "→".cyan(), def.terraform_type());
    provider.create(def, &mut data)?;
    eprintln!("{} id = {}", "✓".green(), data.id().yellow());
    if verbose {
        print_json(&Value::Object(data.attributes().clone()))?;
    }

    eprintln!("{} read {}", "→".cyan(), data.id());
    provider.read(def, &mut data)?;
    print_json(&Value::Object(data.attributes().clone()))?;

    let id = data.id().to_string();
    eprintln!("{} delete {}", "→".cyan(), id);
    provider.delete(def, &mut data)?;

    let mut after = ResourceData::default();
    after.set_id(id.clone());
    provider.read(def, &mut after)?;
    if after.is_new() {
        eprintln!("{} {} is gone", "✓".green(), id);
    } else {
        eprintln!("{} {} left in place on the device", "→".cyan(), id);
    }

    eprintln!(
        "\n{} {} object(s) remain on the simulated device",
        "✓".green(),
        provider.client().len()
    );
    Ok(())
}

fn docs_command(catalog: &Catalog, output: &Path) -> Result<()> {
    println!("{} Generating documentation...", "→".cyan());
    let generator = DocsGenerator::new(catalog).context("Failed to create generator")?;
    generator
        .generate_to_directory(output)
        .context("Failed to generate documentation")?;

    println!("\n{}", "✓ Generation complete!".green().bold());
    println!("  📄 {}/index.md", output.display());
    println!("  📄 {}/resources/ ({} pages)", output.display(), catalog.len());
    Ok(())
}

fn schema_command(catalog: &Catalog, output: Option<&Path>) -> Result<()> {
    let json = SchemaExporter::new(catalog)
        .to_json()
        .context("Failed to serialize schema")?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} Schema written to {}", "✓".green(), path.display());
        },
        None => println!("{}", json),
    }
    Ok(())
}

fn read_object(path: &Path) -> Result<Payload> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => bail!("{} must contain a JSON object", path.display()),
    }
}

fn read_state(path: &Path) -> Result<ResourceData> {
    Ok(ResourceData::new(read_object(path)?))
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
