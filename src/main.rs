//! hierscope - Main Entry Point
//!
//! Loads a timing export, applies filters and a view configuration, and
//! writes the requested result as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Styled render document for the renderer
//! hierscope timing.csv --max-wns -0.1 --exclude-internal -o graph.json
//!
//! # Reuse a saved view
//! hierscope timing.csv --config views/violations.toml
//!
//! # Queries against the filtered graph
//! hierscope timing.csv search 'u_core_\d+' --regex
//! hierscope timing.csv inspect top/u_cpu
//! hierscope timing.csv isolate top/u_cpu
//! ```

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use hierscope::{
    analysis::SearchMode,
    config::{AppState, ViewConfig},
    types::ViewMode,
    Session,
};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "hierscope")]
#[command(version)]
#[command(about = "Build styled hierarchy graphs from timing connectivity exports")]
#[command(long_about = None)]
struct Cli {
    /// Timing export (defaults to the most recently opened file)
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,

    /// View configuration to apply (.json or .toml)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Save the effective view configuration here (.json or .toml)
    #[arg(long, global = true)]
    save_config: Option<PathBuf>,

    /// Minimum connection count
    #[arg(long, global = true)]
    min_connections: Option<String>,

    /// Maximum worst negative slack (ns)
    #[arg(long, global = true, allow_hyphen_values = true)]
    max_wns: Option<String>,

    /// Maximum total negative slack (ns)
    #[arg(long, global = true, allow_hyphen_values = true)]
    max_tns: Option<String>,

    /// Drop records between a module and one of its own descendants
    #[arg(long, global = true)]
    exclude_internal: bool,

    /// Metric driving edge color and width: wns, tns or connections
    #[arg(long, global = true)]
    view_mode: Option<ViewMode>,

    /// Write output here instead of stdout
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Do not read or update the recent files list
    #[arg(long, global = true)]
    no_state: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Styled elements, stylesheet, hierarchy and stats (default)
    Render,
    /// Global and filtered statistics
    Stats,
    /// Hierarchy forest only
    Tree,
    /// Search node labels
    Search {
        query: String,
        /// Treat the query as a regular expression
        #[arg(long)]
        regex: bool,
        /// Maximum number of results
        #[arg(long, default_value_t = hierscope::analysis::DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
    /// Details for a node or edge id
    Inspect { id: String },
    /// Ids kept visible when isolating a node
    Isolate { id: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.log_file.as_deref())?;

    tracing::info!("Starting hierscope");

    let mut app_state = if cli.no_state {
        AppState::default()
    } else {
        let mut state = AppState::load_or_default();
        state.cleanup_missing_files();
        state
    };

    let input = match cli.input.clone().or_else(|| app_state.last_file().map(Path::to_path_buf)) {
        Some(path) => path,
        None => bail!("No input file given and no recent file to reopen"),
    };

    let mut session =
        Session::open(&input).with_context(|| format!("Failed to load {}", input.display()))?;
    for warning in session.load_warnings() {
        tracing::debug!(
            "Line {}: {} {:?} replaced ({:?})",
            warning.line,
            warning.column,
            warning.value,
            warning.issue
        );
    }

    let mut view = match &cli.config {
        Some(path) => {
            app_state.set_last_view_config(path);
            ViewConfig::load(path)?
        }
        None => session.view_config("Untitled View"),
    };
    apply_overrides(&cli, &mut view);
    session.apply_view_config(&view);
    if let Some(mode) = cli.view_mode {
        session.set_view_mode(mode);
    }

    let snapshot = session.snapshot();
    tracing::info!(
        "{} of {} record(s) kept: {} node(s), {} edge(s)",
        snapshot.filtered_count,
        snapshot.record_count,
        snapshot.model.node_count(),
        snapshot.model.edge_count()
    );

    if let Some(path) = &cli.save_config {
        let name = view.name.clone();
        session.view_config(name).save(path)?;
        app_state.set_last_view_config(path);
        tracing::info!("Saved view config to {:?}", path);
    }

    match cli.command.as_ref().unwrap_or(&Command::Render) {
        Command::Render => write_json(&session.render(), cli.output.as_deref())?,
        Command::Stats => write_json(&StatsOutput::from(&session), cli.output.as_deref())?,
        Command::Tree => write_json(&snapshot.tree, cli.output.as_deref())?,
        Command::Search {
            query,
            regex,
            limit,
        } => {
            let mode = if *regex {
                SearchMode::Regex
            } else {
                SearchMode::Substring
            };
            let hits = hierscope::analysis::NodeSearch::new(query, mode)?
                .with_limit(*limit)
                .run(&snapshot.model);
            write_json(&hits, cli.output.as_deref())?
        }
        Command::Inspect { id } => write_json(&session.inspect(id)?, cli.output.as_deref())?,
        Command::Isolate { id } => write_json(&session.isolate(id)?, cli.output.as_deref())?,
    }

    if !cli.no_state {
        app_state.add_recent_file(&input, session.records().len());
        if let Err(e) = app_state.save() {
            tracing::warn!("Failed to save app state: {}", e);
        }
    }

    Ok(())
}

/// Console logging, plus a non-blocking file layer when requested.
///
/// The returned guard must live until exit so buffered lines are flushed.
fn init_logging(
    log_file: Option<&Path>,
) -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hierscope=debug"));
    let console = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .context("Log file path has no file name")?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::registry()
                .with(filter)
                .with(console)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry().with(filter).with(console).init();
            Ok(None)
        }
    }
}

/// Command line filter flags override the loaded view config.
fn apply_overrides(cli: &Cli, view: &mut ViewConfig) {
    let overrides = [
        ("min_connections", cli.min_connections.as_deref()),
        ("max_wns", cli.max_wns.as_deref()),
        ("max_tns", cli.max_tns.as_deref()),
    ];
    for (key, value) in overrides {
        if let Some(value) = value {
            view.filter.set(key, value);
        }
    }
    if cli.exclude_internal {
        view.filter.exclude_internal = true;
    }
    if let Some(mode) = cli.view_mode {
        view.mapping.view_mode = mode;
    }
}

#[derive(Serialize)]
struct StatsOutput {
    revision: u64,
    record_count: usize,
    filtered_count: usize,
    skipped_records: usize,
    load_warnings: usize,
    global: hierscope::Stats,
    filtered: hierscope::Stats,
}

impl From<&Session> for StatsOutput {
    fn from(session: &Session) -> Self {
        let snapshot = session.snapshot();
        Self {
            revision: snapshot.revision,
            record_count: snapshot.record_count,
            filtered_count: snapshot.filtered_count,
            skipped_records: snapshot.skipped_records(),
            load_warnings: session.load_warnings().len(),
            global: snapshot.global_stats,
            filtered: snapshot.filtered_stats,
        }
    }
}

fn write_json<T: Serialize + ?Sized>(value: &T, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {:?}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        }
    }
    Ok(())
}
