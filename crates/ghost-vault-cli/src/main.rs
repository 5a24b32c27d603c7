//! Ghost Vault CLI — `gvault` command.
//!
//! Stores, retrieves and deletes phrase-sealed memories in a Ghost Vault
//! directory. The wake phrase is read from stdin (or an environment
//! variable) on every call and never written anywhere.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};

use ghost_vault::config::DEFAULT_CONFIG_PATH;
use ghost_vault::storage::record_path;
use ghost_vault::{generate_memory_id, GhostConfig, GhostVault, Payload, VaultError};

/// Prefix for memory ids generated when `store` is called without one.
const GENERATED_ID_PREFIX: &str = "interaction";

// ── CLI structure ─────────────────────────────────────────────────────────────

/// Ghost Vault CLI — phrase-gated encrypted memory store.
#[derive(Parser, Debug)]
#[command(
    name = "gvault",
    about = "Ghost Vault CLI",
    version,
    long_about = "gvault — Ghost Vault CLI\n\nStore, retrieve and delete JSON memories sealed under a wake phrase.\nThe phrase is never stored; losing it means losing the record."
)]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Vault directory (overrides vault.location from the config)
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    /// Store and read records as plaintext JSON (no encryption)
    #[arg(long, global = true)]
    plaintext: bool,

    /// Read the wake phrase from this environment variable instead of stdin
    #[arg(long, global = true, value_name = "VAR")]
    phrase_env: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a JSON payload under a memory id
    Store {
        /// Memory id (generated when omitted)
        memory_id: Option<String>,

        /// JSON payload
        #[arg(long, conflicts_with = "file")]
        data: Option<String>,

        /// Read the JSON payload from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Retrieve and print the payload stored under a memory id
    Retrieve {
        memory_id: String,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Delete the record for a memory id (no phrase needed)
    Delete { memory_id: String },

    /// Print the record file path for a memory id
    Locate { memory_id: String },

    /// List record keys in the vault
    List,

    /// Show vault settings
    Status,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Store { .. } => "store",
            Commands::Retrieve { .. } => "retrieve",
            Commands::Delete { .. } => "delete",
            Commands::Locate { .. } => "locate",
            Commands::List => "list",
            Commands::Status => "status",
        }
    }
}

// ── Settings ──────────────────────────────────────────────────────────────────

/// Config file values with command-line overrides applied.
struct Settings {
    config: GhostConfig,
    verbose: bool,
    phrase_env: Option<String>,
}

impl Settings {
    fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = GhostConfig::load(&cli.config)
            .with_context(|| format!("failed to load config {}", cli.config.display()))?;

        if let Some(dir) = &cli.vault {
            log::debug!("vault location overridden: {}", dir.display());
            config.vault.location = dir.clone();
        }
        if cli.plaintext {
            log::debug!("encryption disabled by --plaintext");
            config.vault.encryption_enabled = false;
        }

        Ok(Self {
            verbose: cli.verbose || config.modes.debug_mode,
            phrase_env: cli.phrase_env.clone(),
            config,
        })
    }

    fn open_vault(&self) -> Result<GhostVault> {
        GhostVault::open(&self.config.vault).with_context(|| {
            format!(
                "failed to open vault at {}",
                self.config.vault.location.display()
            )
        })
    }

    fn wake_phrase(&self) -> Result<String> {
        match &self.phrase_env {
            Some(var) => std::env::var(var)
                .map_err(|_| anyhow!("environment variable {var} is not set")),
            None => read_phrase("Wake phrase: "),
        }
    }
}

// ── Phrase helper ─────────────────────────────────────────────────────────────

fn read_phrase(prompt: &str) -> Result<String> {
    eprint!("{prompt}");
    let mut phrase = String::new();
    std::io::stdin()
        .read_line(&mut phrase)
        .context("failed to read wake phrase")?;
    Ok(phrase.trim_end_matches(['\r', '\n']).to_string())
}

/// Turn vault errors into messages a person can act on.
fn describe(err: VaultError, memory_id: &str) -> anyhow::Error {
    match err {
        VaultError::NotFound(_) => anyhow!("no memory stored under '{memory_id}'"),
        VaultError::AccessDenied => {
            anyhow!("access denied for '{memory_id}' (wrong wake phrase or damaged record)")
        }
        VaultError::InvalidPhrase => anyhow!("wake phrase cannot be empty"),
        other => anyhow::Error::new(other).context(format!("memory '{memory_id}'")),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// `RUST_LOG` drives the level; `modes.debug_mode` raises it to debug.
fn init_logger(debug_mode: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
    if debug_mode {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn main() {
    let cli = Cli::parse();

    // Peek at debug_mode first. Settings::from_cli loads the config again
    // once the logger is up, so load warnings still reach stderr.
    let debug_mode = GhostConfig::load(&cli.config)
        .map(|config| config.modes.debug_mode)
        .unwrap_or(false);
    init_logger(debug_mode);

    log::debug!("running {} (config {})", cli.command.name(), cli.config.display());

    let result = Settings::from_cli(&cli).and_then(|settings| match cli.command {
        Commands::Store {
            memory_id,
            data,
            file,
        } => cmd_store(&settings, memory_id, data.as_deref(), file.as_deref()),
        Commands::Retrieve { memory_id, pretty } => cmd_retrieve(&settings, &memory_id, pretty),
        Commands::Delete { memory_id } => cmd_delete(&settings, &memory_id),
        Commands::Locate { memory_id } => cmd_locate(&settings, &memory_id),
        Commands::List => cmd_list(&settings),
        Commands::Status => cmd_status(&settings),
    });

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

// ── Command implementations ───────────────────────────────────────────────────

/// `gvault store [MEMORY_ID] (--data JSON | --file PATH)`
fn cmd_store(
    settings: &Settings,
    memory_id: Option<String>,
    data: Option<&str>,
    file: Option<&Path>,
) -> Result<()> {
    if !settings.config.modes.persistent_memory {
        bail!("persistent memory is disabled in the config; nothing stored");
    }

    let json = match (data, file) {
        (Some(data), _) => data.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => bail!("provide a payload with --data or --file"),
    };
    let payload: Payload = serde_json::from_str(&json).context("payload is not valid JSON")?;

    let memory_id = memory_id.unwrap_or_else(|| generate_memory_id(GENERATED_ID_PREFIX));
    let vault = settings.open_vault()?;
    let phrase = settings.wake_phrase()?;

    vault
        .store(&memory_id, &payload, &phrase)
        .map_err(|e| describe(e, &memory_id))?;

    println!("Stored memory '{memory_id}'");
    if settings.verbose {
        println!("  File:      {}", vault.locate(&memory_id).display());
        println!(
            "  Encrypted: {}",
            if vault.encryption_enabled() { "yes" } else { "NO (plaintext)" }
        );
    }

    Ok(())
}

/// `gvault retrieve MEMORY_ID [--pretty]`
fn cmd_retrieve(settings: &Settings, memory_id: &str, pretty: bool) -> Result<()> {
    let vault = settings.open_vault()?;

    // Skip the prompt when there is nothing to open.
    if !vault.contains(memory_id) {
        return Err(describe(
            VaultError::NotFound(memory_id.to_string()),
            memory_id,
        ));
    }

    let phrase = settings.wake_phrase()?;
    let payload = vault
        .retrieve(memory_id, &phrase)
        .map_err(|e| describe(e, memory_id))?;

    let out = if pretty {
        serde_json::to_string_pretty(&payload)?
    } else {
        serde_json::to_string(&payload)?
    };
    println!("{out}");

    Ok(())
}

/// `gvault delete MEMORY_ID`
fn cmd_delete(settings: &Settings, memory_id: &str) -> Result<()> {
    let vault = settings.open_vault()?;
    vault
        .delete(memory_id)
        .map_err(|e| describe(e, memory_id))?;
    println!("Deleted memory '{memory_id}'");
    Ok(())
}

/// `gvault locate MEMORY_ID`
fn cmd_locate(settings: &Settings, memory_id: &str) -> Result<()> {
    let vault = settings.open_vault()?;
    let path = vault.locate(memory_id);
    println!("{}", path.display());
    if settings.verbose {
        println!(
            "  Exists: {}",
            if path.is_file() { "yes" } else { "no" }
        );
    }
    Ok(())
}

/// `gvault list`
fn cmd_list(settings: &Settings) -> Result<()> {
    let vault = settings.open_vault()?;
    let mut keys = vault.record_keys().context("failed to list vault")?;

    if keys.is_empty() {
        println!("No records in {}", vault.location().display());
        return Ok(());
    }

    keys.sort();
    for key in &keys {
        if settings.verbose {
            let path = record_path(vault.location(), key);
            let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            println!("{key}  {size:>8} bytes");
        } else {
            println!("{key}");
        }
    }
    println!("{} record(s)", keys.len());

    Ok(())
}

/// `gvault status`
fn cmd_status(settings: &Settings) -> Result<()> {
    let vault = settings.open_vault()?;
    let count = vault.record_keys().context("failed to list vault")?.len();

    println!("Vault:             {}", vault.location().display());
    println!(
        "Encryption:        {}",
        if vault.encryption_enabled() {
            "enabled (ChaCha20-Poly1305, phrase-derived key)"
        } else {
            "DISABLED (plaintext, unauthenticated)"
        }
    );
    println!("Records:           {count}");
    println!(
        "Persistent memory: {}",
        if settings.config.modes.persistent_memory { "on" } else { "off" }
    );
    println!(
        "Purge malformed:   {}",
        if settings.config.vault.purge_malformed { "on" } else { "off" }
    );

    Ok(())
}
