//! `pubhub`: публикует строки stdin в топик.
//!
//! Каждая строка разбирается как JSON (иначе становится строкой) и
//! публикуется в топик из `--topic`. Топики и подписчики берутся из
//! файла настроек.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pubhub::{
    config::Settings, init_logging, DispatchContext, Hub, Message, ScriptRegistry, StrategyKind,
    DEFAULT_TOPIC,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "pubhub")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Publish stdin lines to a named topic", long_about = None)]
struct Cli {
    /// Файл настроек (TOML, YAML или JSON)
    #[arg(short, long, env = "PUBHUB_CONFIG")]
    config: Option<PathBuf>,
    /// Топик для публикации
    #[arg(short, long, default_value = DEFAULT_TOPIC)]
    topic: String,
    /// Ограничить доставку видами стратегий, например `http,email`
    #[arg(short, long, value_delimiter = ',')]
    kinds: Vec<StrategyKind>,
    /// Уровень `debug` вместо уровня из настроек
    #[arg(short, long)]
    verbose: bool,
    /// Завершиться с ошибкой, если хотя бы одна доставка не удалась
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    if cli.verbose {
        settings.logging.level = "debug".to_string();
    }
    let logging = init_logging(settings.logging.clone()).context("failed to initialize logging")?;

    let hub = Hub::from_settings(&settings, ScriptRegistry::builtin())
        .context("invalid topic configuration")?;
    let registry = hub.registry();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let (mut published, mut failed) = (0usize, 0usize);

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let message = Message::parse_line(line);
        let report = if cli.kinds.is_empty() {
            registry
                .publish(&cli.topic, message, DispatchContext::new())
                .await
        } else {
            registry
                .publish_selected(&cli.topic, message, &cli.kinds, DispatchContext::new())
                .await
        };

        published += 1;
        failed += report.failure_count();
        for failure in report.failures() {
            warn!(error = %failure, "delivery failed");
        }
        info!(
            topic = %report.topic,
            subscribers = report.subscribers,
            delivered = report.delivered(),
            failed = report.failure_count(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "message published"
        );
    }

    info!(published, failed, "stdin closed");
    logging.shutdown();

    if cli.strict && failed > 0 {
        anyhow::bail!("{failed} deliveries failed");
    }
    Ok(())
}
