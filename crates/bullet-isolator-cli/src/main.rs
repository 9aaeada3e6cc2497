use anyhow::{Context, Result, bail};
use bullet_isolator_config::{Config, IndentSetting};
use bullet_isolator_engine::{
    BulletMarker, FsStore, IndentUnit, Isolator, ListSyntax, Provenance, WriteBack, io,
};
use clap::{Parser, Subcommand};
use relative_path::RelativePathBuf;
use std::{num::NonZeroUsize, path::Path, path::PathBuf, process};

/// Edit one bullet subtree of a note on its own, then put it back
#[derive(Debug, Parser)]
#[command(name = "bullet-isolator", version, about)]
struct Cli {
    /// Notes directory; overrides `notes_path` from the config file
    #[arg(long, global = true)]
    notes_dir: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write a config file pointing at --notes-dir
    Init {
        /// Replace an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Copy the subtree rooted at LINE of DOCUMENT into the side document.
    ///
    /// Any existing side document is replaced and its edits are lost.
    Isolate {
        /// Document path, relative to the notes directory
        document: PathBuf,
        /// Line of the root bullet, counting from 1
        line: NonZeroUsize,
    },
    /// Splice the side document back into its origin and delete it
    WriteBack,
    /// Delete the side document without writing it back
    Discard,
    /// Show what is currently isolated
    Status,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    log::debug!("Config path: {}", config_path.display());
    let notes_dir = cli.notes_dir.as_deref();

    match cli.command {
        Command::Init { force } => init(&config_path, notes_dir, force)?,
        Command::Isolate { document, line } => {
            let (isolator, notes_root) = open(&config_path, notes_dir)?;
            let origin = document_id(&document, &notes_root)?;
            let provenance = isolator
                .isolate(&origin, line.get() - 1)
                .with_context(|| format!("Cannot isolate line {line} of {origin}"))?;
            println!(
                "Isolated {} into {}",
                describe(&provenance),
                isolator.side_document().to_path(&notes_root).display()
            );
        }
        Command::WriteBack => {
            let (isolator, _) = open(&config_path, notes_dir)?;
            match isolator.write_back().context("Write-back failed")? {
                WriteBack::Written(report) => println!(
                    "Wrote back {} ({} -> {} lines)",
                    describe(&report.provenance),
                    report.lines_before,
                    report.lines_after
                ),
                WriteBack::Dropped => println!("A write-back is already running; nothing done"),
            }
        }
        Command::Discard => {
            let (isolator, _) = open(&config_path, notes_dir)?;
            if isolator.discard()? {
                println!("Discarded {}", isolator.side_document());
            } else {
                println!("Nothing isolated");
            }
        }
        Command::Status => {
            let (isolator, _) = open(&config_path, notes_dir)?;
            match isolator.pending()? {
                Some(provenance) => println!(
                    "{} is isolated in {}",
                    describe(&provenance),
                    isolator.side_document()
                ),
                None => println!("Nothing isolated"),
            }
        }
    }

    Ok(())
}

/// Save a fresh config for `notes_dir` at `config_path`
fn init(config_path: &Path, notes_dir: Option<&Path>, force: bool) -> Result<()> {
    let Some(notes_dir) = notes_dir else {
        bail!("init needs --notes-dir");
    };
    if config_path.exists() && !force {
        bail!(
            "Config already exists at {}; pass --force to replace it",
            config_path.display()
        );
    }

    let notes_path = std::path::absolute(notes_dir)
        .with_context(|| format!("Cannot resolve {}", notes_dir.display()))?;
    io::validate_notes_dir(&notes_path)
        .with_context(|| format!("Cannot use {}", notes_path.display()))?;

    Config::new(notes_path)
        .save_to_path(config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Wrote {}", config_path.display());
    Ok(())
}

/// Load the config and build an isolator over its notes directory
fn open(config_path: &Path, notes_dir: Option<&Path>) -> Result<(Isolator<FsStore>, PathBuf)> {
    let loaded = Config::load_from_path(config_path)?;
    let config = resolve_config(loaded, notes_dir).with_context(|| {
        format!(
            "No notes directory: pass --notes-dir or run init to create {}",
            config_path.display()
        )
    })?;
    io::validate_notes_dir(&config.notes_path)
        .with_context(|| format!("Cannot use {}", config.notes_path.display()))?;

    let isolator = build_isolator(&config)?;
    Ok((isolator, config.notes_path))
}

/// Apply the `--notes-dir` override; `None` when no notes directory is known
fn resolve_config(loaded: Option<Config>, notes_dir: Option<&Path>) -> Option<Config> {
    match (loaded, notes_dir) {
        (Some(config), Some(dir)) => Some(Config {
            notes_path: dir.to_path_buf(),
            ..config
        }),
        (Some(config), None) => Some(config),
        (None, Some(dir)) => Some(Config::new(dir.to_path_buf())),
        (None, None) => None,
    }
}

fn build_isolator(config: &Config) -> Result<Isolator<FsStore>> {
    let marker = match &config.bullet_pattern {
        Some(pattern) => BulletMarker::pattern(pattern)
            .with_context(|| format!("Invalid bullet_pattern '{pattern}'"))?,
        None => BulletMarker::default(),
    };

    let (indent, detect) = match config.indent {
        IndentSetting::Tabs => (IndentUnit::Tabs, false),
        IndentSetting::Spaces(0) => bail!("indent spaces must be at least 1"),
        IndentSetting::Spaces(n) => (IndentUnit::Spaces(n), false),
        IndentSetting::Auto => (IndentUnit::Tabs, true),
    };

    let side_document = RelativePathBuf::from_path(&config.side_document).with_context(|| {
        format!(
            "side_document must be relative to the notes directory: {}",
            config.side_document.display()
        )
    })?;

    let store = FsStore::new(&config.notes_path);
    Ok(Isolator::new(store, ListSyntax::new(marker, indent), side_document).detect_indent(detect))
}

/// Turn a user-supplied path into a document id under the notes root
fn document_id(document: &Path, notes_root: &Path) -> Result<RelativePathBuf> {
    let relative = if document.is_absolute() {
        document.strip_prefix(notes_root).with_context(|| {
            format!(
                "{} is outside the notes directory {}",
                document.display(),
                notes_root.display()
            )
        })?
    } else {
        document
    };

    RelativePathBuf::from_path(relative)
        .with_context(|| format!("Invalid document path {}", document.display()))
}

/// Human-facing description with 1-based line numbers
fn describe(provenance: &Provenance) -> String {
    format!(
        "{} lines {}-{}",
        provenance.origin,
        provenance.start_line + 1,
        provenance.end_line + 1
    )
}
