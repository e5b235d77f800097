//! WebChannel interface generator CLI.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use notify_debouncer_mini::DebounceEventResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use webchannel_compiler::codegen::support::write_support_files;
use webchannel_compiler::watch::{GeneratorWatcher, NotifyBackend};
use webchannel_compiler::{Generator, GeneratorConfig, WatchMapping};

mod ui;

#[derive(Parser)]
#[command(name = "webchannel")]
#[command(about = "Generates TypeScript interfaces for QWebChannel backend controllers")]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch source directories and regenerate on every change
    Watch {
        /// Configuration file (default: ./webchannel.json if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Additional SOURCE=TARGET directory mapping
        #[arg(short, long = "map", value_name = "SRC=DST")]
        mappings: Vec<String>,

        /// Quiet period before a burst of changes is handled
        #[arg(long)]
        debounce_ms: Option<u64>,
    },

    /// Generate every mapped source file once
    Generate {
        /// Configuration file (default: ./webchannel.json if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Additional SOURCE=TARGET directory mapping
        #[arg(short, long = "map", value_name = "SRC=DST")]
        mappings: Vec<String>,
    },

    /// Print the interfaces extracted from a source file as JSON
    Inspect {
        /// Backend source file
        file: PathBuf,

        /// Configuration file (default: ./webchannel.json if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write the Signal and Response declarations generated files import
    Init {
        /// Front-end models directory
        #[arg(default_value = ".")]
        dir: PathBuf,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Watch {
            config,
            mappings,
            debounce_ms,
        } => {
            let mut config = load_config(config.as_deref(), &mappings)?;
            if let Some(ms) = debounce_ms {
                config.debounce_ms = ms;
            }
            require_mappings(&config)?;
            run_watch(config).await?;
        }

        Commands::Generate { config, mappings } => {
            let config = load_config(config.as_deref(), &mappings)?;
            require_mappings(&config)?;
            run_generate(config)?;
        }

        Commands::Inspect { file, config } => {
            let config = load_config(config.as_deref(), &[])?;
            let mut generator = Generator::new(config)?;
            let interfaces = generator.analyze_file(&file)?;
            let json = serde_json::to_string_pretty(&interfaces)
                .map_err(|e| miette::miette!("Failed to serialize interfaces: {}", e))?;
            println!("{}", json);
        }

        Commands::Init { dir, force } => {
            let written = write_support_files(&dir, force)?;
            if written.is_empty() {
                ui::info("Support files already present (use --force to overwrite)");
            }
            for path in written {
                ui::success(&format!("Wrote {}", path.display()));
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "webchannel=debug" } else { "webchannel=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

/// Loads the configuration file and appends command-line mappings.
fn load_config(path: Option<&Path>, mappings: &[String]) -> miette::Result<GeneratorConfig> {
    let mut config = match path {
        Some(path) => GeneratorConfig::load(path)?,
        None => {
            let cwd = std::env::current_dir()
                .map_err(|e| miette::miette!("Failed to read current directory: {}", e))?;
            GeneratorConfig::load_or_default(&cwd)?
        }
    };

    for mapping in mappings {
        config.mappings.push(WatchMapping::parse(mapping)?);
    }

    Ok(config)
}

fn require_mappings(config: &GeneratorConfig) -> miette::Result<()> {
    if config.mappings.is_empty() {
        return Err(miette::miette!(
            "No directory mappings configured. Pass --map SOURCE=TARGET or add \"mappings\" to webchannel.json"
        ));
    }
    Ok(())
}

fn run_generate(config: GeneratorConfig) -> miette::Result<()> {
    ui::print_compact_header(env!("CARGO_PKG_VERSION"));

    let start = Instant::now();
    let mut generator = Generator::new(config.clone())?;
    let mut failures = 0usize;
    let mut generated = 0usize;

    for mapping in &config.mappings {
        ui::mapping_line(&mapping.source.display().to_string(), &mapping.target.display().to_string());

        let spinner = ui::spinner("Generating interfaces...");
        let results = generator.generate_mapping(mapping);
        spinner.finish_and_clear();

        match results {
            Ok(results) => {
                for result in &results {
                    ui::generated_line(
                        &file_name(&result.source),
                        &result.output.display().to_string(),
                        &result.interfaces,
                    );
                }
                generated += results.len();
            }
            Err(e) => {
                failures += 1;
                ui::error(&e.to_string());
            }
        }
    }

    println!();
    ui::timing("generated in", start.elapsed().as_millis());

    if failures > 0 {
        return Err(miette::miette!("{} of {} mappings failed", failures, config.mappings.len()));
    }
    ui::success(&format!("{} files generated", generated));
    Ok(())
}

async fn run_watch(config: GeneratorConfig) -> miette::Result<()> {
    ui::print_compact_header(env!("CARGO_PKG_VERSION"));

    let generator = Generator::new(config.clone())?;
    let (tx, mut rx) = tokio::sync::mpsc::channel(16);

    let backend = NotifyBackend::new(
        Duration::from_millis(config.debounce_ms),
        move |result: DebounceEventResult| match result {
            Ok(events) => {
                if !events.is_empty() {
                    // the receiver is gone once the loop has stopped
                    let _ = tx.blocking_send(events);
                }
            }
            Err(e) => tracing::warn!(error = ?e, "File watcher error"),
        },
    )?;

    let mut watcher = GeneratorWatcher::new(generator, backend);
    for mapping in &config.mappings {
        ui::mapping_line(&mapping.source.display().to_string(), &mapping.target.display().to_string());
        if let Err(e) = watcher.add_directory(&mapping.source, &mapping.target) {
            tracing::error!(error = %e, "Could not watch directory");
            ui::error(&e.to_string());
        }
    }

    if watcher.watched_directories().is_empty() {
        return Err(miette::miette!("No directory could be watched"));
    }

    println!();
    ui::info(&format!(
        "Watching {} files. Press Ctrl-C to stop.",
        watcher.watched_files().count()
    ));

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            batch = rx.recv() => match batch {
                Some(events) => watcher.handle_events(&events),
                None => break,
            },
            _ = &mut ctrl_c => {
                println!();
                ui::dim("Stopped watching.");
                break;
            }
        }
    }

    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
