//! Squid URL Rewrite Helper
//!
//! # Architecture Overview
//!
//! ```text
//!                ┌──────────────────────────────────────────────────────┐
//!                │                  squid-urlrewrite                    │
//!                │                                                      │
//!   stdin ───────┼─▶ reader ──▶ stage (router) ──┬─ inline ─┐           │
//!                │                 │             └─ worker ─┤           │
//!                │                 ▼                        ▼           │
//!                │            Arc<RuleSet>              sink/writer ────┼──▶ stdout
//!                │                 ▲                                    │
//!                │   SIGHUP ──▶ supervisor ◀── rule watcher             │
//!                └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use tokio::io::BufReader;

use url_rewriter::config::{
    read_config, resolve_config, ConfigOverrides, FilterConfig, RuleWatcher,
};
use url_rewriter::lifecycle::{reload_channel, signals::spawn_hangup_listener};
use url_rewriter::observability::init_logging;
use url_rewriter::pipeline::{spawn_reader, ResponseSink};
use url_rewriter::{RuleCompiler, Supervisor};

#[derive(Parser)]
#[command(name = "squid-urlrewrite")]
#[command(about = "URL rewrite/redirect helper for Squid", long_about = None)]
struct Cli {
    /// Settings file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rule source, highest priority first. Replaces the default locations.
    #[arg(short, long = "rules")]
    rules: Vec<PathBuf>,

    /// Reload when a rule source changes on disk.
    #[arg(short, long)]
    watch: bool,

    /// Log filter directive (overridden by RUST_LOG).
    #[arg(long)]
    log_filter: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let base = match cli.config.as_deref() {
        Some(path) => match read_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("squid-urlrewrite: {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => FilterConfig::default(),
    };
    let overrides = ConfigOverrides {
        rules: cli.rules,
        watch: cli.watch,
        log_filter: cli.log_filter,
    };
    let config = match resolve_config(base, overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("squid-urlrewrite: {}", e);
            process::exit(1);
        }
    };

    init_logging(&config.logging);

    // The stdin reader blocks runtime shutdown, so leave via process::exit.
    let code = match run(config).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            1
        }
    };
    process::exit(code);
}

async fn run(config: FilterConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        sources = ?config.rules.paths,
        watch = config.rules.watch,
        "squid-urlrewrite v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let (trigger, reloads) = reload_channel();
    let _hangups = spawn_hangup_listener(trigger.clone())?;
    let _watcher = if config.rules.watch {
        let watcher = RuleWatcher::new(
            &config.rules.paths,
            Duration::from_secs(config.rules.watch_poll_secs),
            trigger,
        );
        Some(watcher.run()?)
    } else {
        None
    };

    let (sink, _writer) = ResponseSink::spawn(tokio::io::stdout(), config.pipeline.output_capacity);
    let supervisor = Supervisor::start(RuleCompiler::new(config.rules.paths), sink, reloads)?;

    let (input, _reader) = spawn_reader(
        BufReader::new(tokio::io::stdin()),
        config.pipeline.input_capacity,
    );

    supervisor.run(input).await?;
    Ok(())
}
