//! git-whoami CLI — `gwho` command.
//!
//! Switches the git commit identity between saved authors, keeps the saved
//! author directory in sync with git configuration, and prints the current
//! identity the way a status bar would.

mod git_cli;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};

use git_whoami::codec::{self, DisplayMode};
use git_whoami::{
    AuthorDirectory, AuthorSwitcher, ConfigScope, FileStore, Settings, SwitchOutcome,
    LABEL_ADD_NEW,
};

use crate::git_cli::GitCli;

type Switcher = AuthorSwitcher<FileStore, GitCli>;

// ── Directory helpers ─────────────────────────────────────────────────────────

const HOME_ENV: &str = "GIT_WHOAMI_HOME";

fn whoami_home(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir);
    }
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var_os("HOME")
        .ok_or_else(|| anyhow!("HOME not set and {HOME_ENV} not given"))?;
    Ok(PathBuf::from(home).join(".git-whoami"))
}

fn state_dir(home: &Path) -> PathBuf {
    home.join("state")
}

// ── CLI structure ─────────────────────────────────────────────────────────────

/// git-whoami CLI — switch between saved git commit identities.
#[derive(Parser, Debug)]
#[command(
    name = "gwho",
    about = "git-whoami CLI",
    version,
    long_about = "gwho — git-whoami CLI\n\nSave several commit identities (name, email, signing key) and switch\nthe git configuration between them."
)]
struct Cli {
    /// Directory holding config.toml and saved authors (default: ~/.git-whoami)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    /// Repository to run git in (default: current directory)
    #[arg(long, global = true)]
    repo: Option<PathBuf>,

    /// Git config scope to write identities to (local, global, system)
    #[arg(long, global = true)]
    scope: Option<ConfigScope>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the current git identity
    Status {
        /// Display mode (full, name, email, domain)
        #[arg(long)]
        display: Option<DisplayMode>,
    },

    /// List saved authors
    List,

    /// Print the selection lines offered when switching
    Choices,

    /// Switch to a saved author, by "Name <email>" line or bare email
    Use {
        /// Selection line or email
        selection: String,
    },

    /// Save a new author and switch to it
    Add {
        /// Display name
        #[arg(long)]
        name: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// Path to the signing key
        #[arg(long)]
        key: Option<String>,
    },

    /// Forget a saved author
    Remove {
        /// Email of the author to forget
        email: String,
    },

    /// Forget all saved authors, keeping only the current git identity
    Clean,

    /// Merge every identity found in git configuration into the saved authors
    Sync,
}

// ── Main entry point ──────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")
        .and_then(|runtime| runtime.block_on(run(cli)));

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let home = whoami_home(cli.home)?;
    let settings = Settings::load(&home.join(Settings::filename()))
        .with_context(|| format!("failed to load settings from {}", home.display()))?;
    let scope = cli.scope.unwrap_or(settings.git.scope);
    let verbose = cli.verbose;

    let directory = AuthorDirectory::new(FileStore::new(state_dir(&home)));
    let switcher = AuthorSwitcher::new(directory, GitCli::new(cli.repo)).with_scope(scope);

    match cli.command {
        Commands::Status { display } => {
            cmd_status(&switcher, display.unwrap_or(settings.display.mode)).await
        }
        Commands::List => cmd_list(&switcher, verbose).await,
        Commands::Choices => cmd_choices(&switcher).await,
        Commands::Use { selection } => cmd_use(&switcher, &selection).await,
        Commands::Add { name, email, key } => {
            cmd_add(&switcher, &name, &email, key.as_deref()).await
        }
        Commands::Remove { email } => cmd_remove(&switcher, &email).await,
        Commands::Clean => cmd_clean(&switcher).await,
        Commands::Sync => cmd_sync(&switcher, verbose).await,
    }
}

// ── Command implementations ───────────────────────────────────────────────────

/// `gwho status [--display MODE]`
async fn cmd_status(switcher: &Switcher, mode: DisplayMode) -> Result<()> {
    let text = switcher
        .status(mode)
        .await
        .context("failed to read git identity")?;
    println!("{text}");
    Ok(())
}

/// `gwho list`
async fn cmd_list(switcher: &Switcher, verbose: bool) -> Result<()> {
    let authors = switcher.directory().get_all().await;
    if authors.is_empty() {
        println!("No saved authors");
        return Ok(());
    }

    println!("{:<32} {:<24} SIGNING KEY", "EMAIL", "NAME");
    println!("{}", "-".repeat(72));
    for record in authors.values() {
        println!(
            "{:<32} {:<24} {}",
            record.email,
            codec::encode(record, DisplayMode::Name),
            record.signing_key().unwrap_or("-")
        );
    }

    if verbose {
        println!();
        println!("{} saved author(s)", authors.len());
    }
    Ok(())
}

/// `gwho choices`
async fn cmd_choices(switcher: &Switcher) -> Result<()> {
    for line in switcher.choices().await {
        println!("{line}");
    }
    Ok(())
}

/// `gwho use <SELECTION>`
async fn cmd_use(switcher: &Switcher, selection: &str) -> Result<()> {
    if selection.trim() == LABEL_ADD_NEW {
        bail!("use `gwho add --name NAME --email EMAIL` to save a new author");
    }

    let outcome = if selection.contains('<') {
        switcher.select(selection).await
    } else {
        switcher.select_email(selection).await
    }
    .context("failed to switch author")?;

    report(outcome, selection)
}

/// `gwho add --name NAME --email EMAIL [--key PATH]`
async fn cmd_add(switcher: &Switcher, name: &str, email: &str, key: Option<&str>) -> Result<()> {
    let outcome = switcher
        .add(name, email, key)
        .await
        .context("failed to add author")?;
    if matches!(outcome, SwitchOutcome::Malformed) {
        bail!("author names and emails cannot contain '<' or '>': {name:?}, {email:?}");
    }
    report(outcome, email)
}

/// `gwho remove <EMAIL>`
async fn cmd_remove(switcher: &Switcher, email: &str) -> Result<()> {
    let directory = switcher.directory();
    if directory.get_by_email(email).await.is_none() {
        println!("No saved author with email {email}");
        return Ok(());
    }
    directory
        .delete(email)
        .await
        .context("failed to remove author")?;
    println!("Removed {email}");
    Ok(())
}

/// `gwho clean`
async fn cmd_clean(switcher: &Switcher) -> Result<()> {
    let kept = switcher
        .clean()
        .await
        .context("failed to clean saved authors")?;
    match kept {
        Some(record) => println!(
            "Saved authors cleared; kept {}",
            codec::encode(&record, DisplayMode::Full)
        ),
        None => println!("Saved authors cleared"),
    }
    Ok(())
}

/// `gwho sync`
async fn cmd_sync(switcher: &Switcher, verbose: bool) -> Result<()> {
    let current = switcher
        .sync_from_git()
        .await
        .context("failed to sync authors from git")?;

    if verbose {
        let total = switcher.directory().get_all().await.len();
        println!("{total} saved author(s)");
    }
    println!("Current: {}", codec::encode(&current, DisplayMode::Full));
    Ok(())
}

fn report(outcome: SwitchOutcome, input: &str) -> Result<()> {
    match outcome {
        SwitchOutcome::Switched(record) => {
            println!("Switched to {}", codec::encode(&record, DisplayMode::Full));
            if let Some(key) = record.signing_key() {
                println!("Signing with {key}");
            }
            Ok(())
        }
        SwitchOutcome::Malformed => Err(anyhow!("not a valid author selection: {input:?}")),
        SwitchOutcome::NotFound => Err(anyhow!("no saved author with email {input}")),
        SwitchOutcome::Incomplete => Err(anyhow!("an author needs both a name and an email")),
    }
}
