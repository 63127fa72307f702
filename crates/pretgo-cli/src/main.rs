use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use pretgo_core::config::LoggingConfig;
use pretgo_core::{
    AppConfig, AutocompleteController, ControllerSettings, Effect, EntryView, Event, ExitCode,
    Lookup, Query, lookup, render_list_html, render_panel_html,
};
use pretgo_tui::PickerApp;

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "pretgo",
    about = "Person picker for the PRETGO loan desk",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output in JSON format (for scripts).
    /// Also enabled by setting PRETGO_JSON=1.
    #[arg(long, global = true)]
    json: bool,

    /// Config file to use instead of the default location.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick a person interactively and print their id.
    Pick {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Run one lookup and print the matching people.
    Lookup {
        query: String,
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the HTML result fragment for a query.
    Render {
        query: String,
        /// Commit the entry at this index and print the confirmation panel instead.
        #[arg(long, value_name = "INDEX")]
        select: Option<usize>,
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information.
    Version,
}

#[derive(Args, Default)]
struct SourceArgs {
    /// Lookup source: `http` or `sqlite`.
    #[arg(long)]
    source: Option<String>,

    /// Base URL of the loan application.
    #[arg(long)]
    url: Option<String>,

    /// Path to the loan application's database file.
    #[arg(long)]
    db: Option<PathBuf>,
}

impl SourceArgs {
    fn apply(&self, config: &mut AppConfig) -> Result<()> {
        if let Some(source) = &self.source {
            config.lookup.source = source.clone();
        }
        if let Some(url) = &self.url {
            config.lookup.base_url = url.clone();
        }
        if let Some(db) = &self.db {
            config.lookup.database_path = Some(db.to_string_lossy().to_string());
            if self.source.is_none() {
                config.lookup.source = "sqlite".to_string();
            }
        }
        config.validate()?;
        Ok(())
    }
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Print the config file location.
    Path,
    /// Write a config file with default values.
    Init {
        #[arg(long)]
        force: bool,
    },
}

// ─── Entry point ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();

    let json_output = cli.json || std::env::var("PRETGO_JSON").as_deref() == Ok("1");
    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let mut config = AppConfig::load_from(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let command = cli.command.unwrap_or(Commands::Pick {
        source: SourceArgs::default(),
    });
    let picking = matches!(command, Commands::Pick { .. });
    init_logging(&config.logging, picking)?;
    debug!(path = %config_path.display(), "config loaded");

    match command {
        // ── Pick ───────────────────────────────────────────────────────────
        Commands::Pick { source } => {
            source.apply(&mut config)?;
            let lookup = lookup::from_config(&config)?;
            info!(source = lookup.name(), "starting picker");

            let picked = tokio::task::block_in_place(|| {
                let mut app = PickerApp::new(&config, lookup)?;
                pretgo_tui::run_picker(&mut app)
            })?;
            let dur = start.elapsed().as_millis();

            match picked {
                Some(selection) => {
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":selection,"meta":{"duration_ms":dur}}))?;
                    } else {
                        println!("{}", selection.candidate_id);
                    }
                }
                None => {
                    if json_output {
                        print_json(&serde_json::json!({"status":"cancelled","meta":{"duration_ms":dur}}))?;
                    }
                    std::process::exit(ExitCode::Cancelled as i32);
                }
            }
        }

        // ── Lookup ─────────────────────────────────────────────────────────
        Commands::Lookup { query, source } => {
            source.apply(&mut config)?;
            let lookup = lookup::from_config(&config)?;
            let query = Query::parse(&query);

            let candidates = match lookup.search(&query).await {
                Ok(candidates) => candidates,
                Err(e) => fail_lookup(json_output, &e.to_string())?,
            };
            let entries: Vec<EntryView> = candidates.iter().map(EntryView::from).collect();
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "query": query.as_str(), "entries": entries },
                    "meta": { "duration_ms": dur, "source": lookup.name() }
                }))?;
            } else if entries.is_empty() {
                println!("Aucun résultat pour « {query} »");
                println!(
                    "Créer une nouvelle personne : {}{}",
                    config.lookup.base_url.trim_end_matches('/'),
                    config.autocomplete.create_href
                );
            } else {
                for entry in &entries {
                    println!("{:>6}  {:<30}  {}", entry.id, entry.label, entry.detail);
                }
            }
        }

        // ── Render ─────────────────────────────────────────────────────────
        Commands::Render {
            query,
            select,
            source,
        } => {
            source.apply(&mut config)?;
            let lookup = lookup::from_config(&config)?;
            let mut controller = match run_once(&config, lookup.as_ref(), &query).await {
                Ok(controller) => controller,
                Err(e) => fail_lookup(json_output, &e.to_string())?,
            };
            if let Some(index) = select {
                controller.handle(Event::Activate(index));
                if controller.selection().is_none() {
                    eprintln!("No entry at index {index}");
                    std::process::exit(ExitCode::InvalidArgs as i32);
                }
            }
            let view = controller.view();
            let html = match &view.panel {
                Some(panel) => render_panel_html(panel)?,
                None => render_list_html(&view.list)?,
            };
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":{"view":view,"html":html},"meta":{"duration_ms":dur}}))?;
            } else {
                println!("{html}");
            }
        }

        // ── Config ─────────────────────────────────────────────────────────
        Commands::Config { action } => {
            let dur = start.elapsed().as_millis();
            match action {
                ConfigAction::Show => {
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":config,"meta":{"duration_ms":dur}}))?;
                    } else {
                        print!("{}", toml::to_string_pretty(&config)?);
                    }
                }
                ConfigAction::Path => {
                    let exists = config_path.exists();
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":{"path":config_path,"exists":exists},"meta":{"duration_ms":dur}}))?;
                    } else {
                        println!("{}", config_path.display());
                    }
                }
                ConfigAction::Init { force } => {
                    if config_path.exists() && !force {
                        eprintln!(
                            "Config already exists at {} (use --force to overwrite)",
                            config_path.display()
                        );
                        std::process::exit(ExitCode::InvalidArgs as i32);
                    }
                    AppConfig::default().save_to(&config_path)?;
                    if json_output {
                        print_json(&serde_json::json!({"status":"ok","data":{"path":config_path},"meta":{"duration_ms":dur}}))?;
                    } else {
                        println!("✓ Config written to {}", config_path.display());
                    }
                }
            }
        }

        // ── Version ────────────────────────────────────────────────────────
        Commands::Version => {
            let version = env!("CARGO_PKG_VERSION");
            let dur = start.elapsed().as_millis();
            if json_output {
                print_json(&serde_json::json!({"status":"ok","data":{"version":version},"meta":{"duration_ms":dur}}))?;
            } else {
                println!("pretgo v{version}");
            }
        }
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

fn fail_lookup<T>(json_output: bool, message: &str) -> Result<T> {
    if json_output {
        print_json(&serde_json::json!({"status":"error","error":"lookup_failed","message":message}))?;
    } else {
        eprintln!("Lookup failed: {message}");
    }
    std::process::exit(ExitCode::NetworkError as i32);
}

/// Drives a fresh controller through one query without waiting out the
/// debounce window.
async fn run_once(
    config: &AppConfig,
    lookup: &dyn Lookup,
    text: &str,
) -> Result<AutocompleteController> {
    let mut controller = AutocompleteController::new(ControllerSettings::from(config));
    let mut queue: VecDeque<Effect> =
        controller.handle(Event::InputChanged(text.to_string())).into();

    while let Some(effect) = queue.pop_front() {
        let next = match effect {
            Effect::ScheduleTimer { token, .. } => Event::TimerFired(token),
            Effect::Lookup { request, query } => match lookup.search(&Query::parse(&query)).await {
                Ok(candidates) => Event::LookupSucceeded {
                    request,
                    candidates,
                },
                Err(e) => bail!(e),
            },
            _ => continue,
        };
        queue.extend(controller.handle(next));
    }
    Ok(controller)
}

/// `RUST_LOG` wins over the configured level. While the picker owns the
/// terminal, logs go to the configured file or nowhere.
fn init_logging(config: &LoggingConfig, picking: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if !picking {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(());
    }

    if let Some(path) = &config.file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {path}"))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}
