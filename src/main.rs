//! Attendance Engine - monthly attendance rule evaluation for HR reporting.

use std::path::PathBuf;

use anyhow::{bail, Context};
use attendance_engine as app;
use clap::Parser;

use app::batch::BatchEvaluator;
use app::config::{AppConfig, ConfigLoadResult};
use app::rules::RuleConfig;
use app::{db, ingest};

/// Evaluate a month of attendance punches and approvals into statistics.
#[derive(Parser)]
#[command(name = "attendance-engine")]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Month input JSON document (punches, approvals, holidays)
    #[arg(long)]
    input: PathBuf,

    /// Rule configuration JSON snapshot; skips the database
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Write the resulting stats JSON here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Determine config path based on mode
    let config_path = if cli.dev {
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    };

    let config = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => config,
        ConfigLoadResult::Missing => AppConfig::default(),
        ConfigLoadResult::Invalid(e) => bail!("Invalid config at {config_path:?}: {e}"),
    };

    // Initialize logging (console always, file when configured)
    let _log_guard = init_logging(&config);

    tracing::info!("Attendance Engine starting...");
    tracing::info!("Config path: {:?}", config_path);

    let input_text = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read input file {:?}", cli.input))?;
    let batch_input = ingest::parse_batch_input(&input_text)?;
    tracing::info!(
        "Loaded {} employees for company {} ({})",
        batch_input.employees.len(),
        batch_input.company_id,
        batch_input.month.format("%Y-%m")
    );

    let rule_config = load_rules(&cli, &config, &batch_input.company_id).await?;
    tracing::info!(
        "Rules resolved for company {} (version {})",
        rule_config.company_id,
        rule_config.version
    );

    let evaluator = BatchEvaluator::new(rule_config, batch_input.calendar.clone())?;
    let result = evaluator.evaluate(batch_input.employees).await;
    tracing::info!("{}", result.summary());

    let rendered = serde_json::to_string_pretty(&result.stats)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write output file {path:?}"))?;
            tracing::info!("Stats written to {path:?}");
        }
        None => println!("{rendered}"),
    }

    if !result.failed.is_empty() {
        bail!("{} employees failed evaluation", result.failed.len());
    }
    Ok(())
}

/// Resolve the rule configuration from a snapshot file or the database.
async fn load_rules(cli: &Cli, config: &AppConfig, company_id: &str) -> anyhow::Result<RuleConfig> {
    if let Some(path) = &cli.rules {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rules file {path:?}"))?;
        let rules: RuleConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse rules file {path:?}"))?;
        rules.validate()?;
        return Ok(rules);
    }

    let conn = db::connect(&config.database.connection_string())
        .await
        .context("Failed to connect to database")?;
    Ok(db::rule_config::load_for_company(&conn, company_id).await?)
}

/// Set up the tracing subscriber; returns the file writer guard, if any.
fn init_logging(config: &AppConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = || {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into())
    };

    if config.logging.file_enabled {
        let directory = config.logging.resolved_directory();
        let appender = tracing_appender::rolling::daily(directory, "attendance-engine.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_writer(writer)
            .with_ansi(false)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter()).init();
        None
    }
}
