//! CLI entrypoint for consensus-quorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use quorum_application::{
    CachedConsensusUseCase, ConsensusCache, ConsensusParams, ConsensusQuery, NoProgress,
    ProgressNotifier, QuestionItem, RunConsensusUseCase, UsageFanout, UsageObserver, UsageTracker,
};
use quorum_domain::{EscalationPolicy, ProfileRef};
use quorum_infrastructure::{ConfigLoader, FileConfig, JsonlUsageLogger, build_registry};
use quorum_presentation::{
    Cli, ConsoleFormatter, OutputConfig, OutputFormatter, ProgressReporter, SimpleProgress,
};
use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };

    let _log_guard = init_logging(cli.verbose, config.logging.log_file.as_deref());
    info!("Starting consensus-quorum");

    config.validate().context("invalid configuration")?;

    if cli.show_config {
        return show_config(&cli, &config);
    }

    let output = OutputConfig::resolve(
        cli.output.map(Into::into),
        config.output.format,
        config.output.color,
        config.output.show_progress,
        cli.quiet,
    );
    if !output.color {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let registry = build_registry(&config.providers)?;
    let available = registry.available_families();
    if available.is_empty() {
        warn!("No provider credentials found; every dispatch will fail");
    } else {
        info!("Providers with credentials: {:?}", available);
    }

    let tracker = Arc::new(UsageTracker::new());
    let mut fanout = UsageFanout::new().with(tracker.clone());
    if let Some(path) = &config.logging.usage_log
        && let Some(logger) = JsonlUsageLogger::new(path)
    {
        fanout = fanout.with(Arc::new(logger));
    }
    let usage: Arc<dyn UsageObserver> = Arc::new(fanout);

    let progress: Arc<dyn ProgressNotifier> = if !output.show_progress {
        Arc::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Arc::new(ProgressReporter::new())
    } else {
        Arc::new(SimpleProgress)
    };

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let orchestrator = RunConsensusUseCase::new(Arc::new(registry))
        .with_progress(progress)
        .with_usage(usage.clone())
        .with_cancellation(cancel.clone());

    let cache_params = config.cache_params();
    let cache = Arc::new(ConsensusCache::new(cache_params.ttl));
    let sweeper = cache_params
        .sweep_interval
        .map(|interval| cache.spawn_sweeper(interval, cancel.child_token()));

    let use_case = CachedConsensusUseCase::new(Arc::new(orchestrator), cache, config.catalog())
        .with_selector(config.selector())
        .with_params(consensus_params(&cli, &config)?)
        .with_cache_params(cache_params)
        .with_usage(usage);

    let query = ConsensusQuery::new(cli.agent.clone())
        .with_complexity(cli.complexity)
        .with_task_type(cli.task_type.clone())
        .with_profile(cli.profile.clone().map(ProfileRef::from));

    // === Execution ===
    let formatter = ConsoleFormatter;
    let rendered = if let [question] = cli.questions.as_slice() {
        let answer = use_case.get_consensus(question, &query).await?;
        formatter.render(output.format, question, &answer)
    } else {
        let items: Vec<QuestionItem> = cli
            .questions
            .iter()
            .enumerate()
            .map(|(i, question)| QuestionItem::new(format!("q{}", i + 1), question.as_str()))
            .collect();
        let answers = use_case.get_consensus_for_multiple(&items, &query).await?;
        let questions: BTreeMap<String, String> = items
            .into_iter()
            .map(|item| (item.id, item.question))
            .collect();
        formatter.format_batch(&questions, &answers, output.format)
    };

    println!("{}", rendered);

    if cli.usage {
        eprintln!("{}", ConsoleFormatter::format_usage(&tracker.snapshot()));
    }

    cancel.cancel();
    if let Some(handle) = sweeper {
        let _ = handle.await;
    }

    Ok(())
}

/// Install the stderr subscriber and, when configured, a plain-text log file.
///
/// The returned guard must stay alive for the file writer to flush.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(level));

    let (file_layer, guard) = match log_file.and_then(|path| Some((path, path.file_name()?))) {
        Some((path, file_name)) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

/// Cancel outstanding provider calls on Ctrl-C.
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; cancelling outstanding provider calls");
            cancel.cancel();
        }
    });
}

/// File parameters with the CLI overrides applied.
fn consensus_params(cli: &Cli, config: &FileConfig) -> Result<ConsensusParams> {
    let mut params = config.consensus_params(cli.strategy)?;
    if let Some(system) = &cli.system {
        params = params.with_system_prompt(system.clone());
    }
    if cli.escalate && params.escalation.is_none() {
        params = params.with_escalation(Some(EscalationPolicy::default()));
    }
    Ok(params)
}

fn show_config(cli: &Cli, config: &FileConfig) -> Result<()> {
    println!("Configuration sources (lowest to highest priority):");
    if cli.no_config {
        println!("  built-in defaults (--no-config)");
    } else {
        for source in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("  {}", source);
        }
    }
    println!();
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
