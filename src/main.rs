use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mongotree::ConnectionManager;
use mongotree::helpers::{extract_host_from_uri, redact_uri_password};
use mongotree::inventory::{print_index_tree, print_tree};
use mongotree::prune::{MatcherConfig, prune_collections_with};
use mongotree::shell::Session;
use mongotree::state::{ConfigManager, Overrides, Settings};

#[derive(Parser)]
#[command(
    name = "mongotree",
    version,
    about = "Inspect MongoDB databases and prune cache collections"
)]
struct Cli {
    /// Connection string, overrides the settings file
    #[arg(long, env = "MONGOTREE_URI", global = true)]
    uri: Option<String>,

    /// Settings file [default: <config dir>/mongotree/settings.json]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Cursor batch size for collection listings
    #[arg(long, global = true)]
    batch_size: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print databases and collections with sizes and document counts
    Tree,
    /// Print databases and collections along with each collection's secondary indexes
    IndexTree,
    /// Drop every collection matching the cache matcher, in every database
    PruneCache(PruneArgs),
    /// Interactive session offering tree, itree and prune
    Shell(PruneArgs),
    /// Show where settings are read from
    Config {
        /// Write the default settings if the file doesn't exist yet
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args)]
struct PruneArgs {
    /// List matching collections without dropping them
    #[arg(long)]
    dry_run: bool,

    /// Match names containing this string
    #[arg(long, conflicts_with_all = ["prefix", "pattern"])]
    substring: Option<String>,

    /// Match names starting with this string
    #[arg(long, conflicts_with = "pattern")]
    prefix: Option<String>,

    /// Match names against this regular expression
    #[arg(long)]
    pattern: Option<String>,
}

impl PruneArgs {
    /// Matcher given on the command line, if any
    fn matcher(&self) -> Option<MatcherConfig> {
        match (&self.substring, &self.prefix, &self.pattern) {
            (Some(substring), _, _) => Some(MatcherConfig::Substring(substring.clone())),
            (_, Some(prefix), _) => Some(MatcherConfig::Prefix(prefix.clone())),
            (_, _, Some(pattern)) => Some(MatcherConfig::Pattern(pattern.clone())),
            _ => None,
        }
    }
}

impl Cli {
    /// Flags and environment values that take precedence over the settings file.
    fn overrides(&self) -> Overrides {
        let matcher = match &self.command {
            Command::PruneCache(args) | Command::Shell(args) => args.matcher(),
            Command::Tree | Command::IndexTree | Command::Config { .. } => None,
        };
        Overrides { uri: self.uri.clone(), batch_size: self.batch_size, matcher }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ConfigManager::at(path),
        None => ConfigManager::new()?,
    };
    let settings = config.load_settings()?.with_overrides(cli.overrides());

    match cli.command {
        Command::Config { init } => show_config(&config, &settings, init),
        Command::Tree => {
            let client = connect(&settings)?;
            emit(&print_tree(&client, settings.batch_size)?);
            Ok(())
        }
        Command::IndexTree => {
            let client = connect(&settings)?;
            emit(&print_index_tree(&client, settings.batch_size)?);
            Ok(())
        }
        Command::PruneCache(args) => {
            let options = settings.prune_options(args.dry_run)?;
            let client = connect(&settings)?;
            let mut stdout = io::stdout().lock();
            prune_collections_with(&client, &options, |dropped| {
                writeln!(stdout, "{}", dropped.line(options.dry_run))?;
                Ok(())
            })?;
            Ok(())
        }
        Command::Shell(args) => {
            let options = settings.prune_options(args.dry_run)?;
            let label = extract_host_from_uri(&settings.uri).unwrap_or_else(|| "mongodb".into());
            let client = connect(&settings)?;
            let mut session = Session::new(client, label).with_prune_options(options);
            session.run(io::stdin().lock(), io::stdout().lock())?;
            Ok(())
        }
    }
}

fn connect(settings: &Settings) -> Result<ConnectionManager> {
    settings.validate().context("Invalid settings")?;

    let uri = redact_uri_password(&settings.uri);
    log::info!("Connecting to {uri}");
    ConnectionManager::connect(&settings.uri)
        .with_context(|| format!("Failed to connect to {uri}"))
}

fn show_config(config: &ConfigManager, settings: &Settings, init: bool) -> Result<()> {
    let path = config.settings_path();
    if init && !path.exists() {
        config.save_settings(&Settings::default())?;
        println!("Wrote default settings to {}", path.display());
    } else {
        println!("Settings file: {}", path.display());
    }
    println!("uri: {}", redact_uri_password(&settings.uri));
    println!("batch_size: {}", settings.batch_size);
    println!("prune: {} '{}'", settings.prune.matcher.kind(), settings.prune.matcher.value());
    Ok(())
}

/// Print command output; empty output prints nothing.
fn emit(text: &str) {
    if !text.is_empty() {
        println!("{text}");
    }
}
