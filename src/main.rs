use anyhow::{Context, Result};
use indexada::commands::CommandRouter;
use indexada::config::{CONFIG_PATH_ENV, Config};
use indexada::feed::HttpFeedFetcher;
use indexada::logging::{get_logger, init_logging};
use indexada::poller::CommandPoller;
use indexada::scheduler::ScheduleCoordinator;
use indexada::telegram::TelegramClient;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // A missing .env is fine; the process environment may already be set
    let _ = dotenvy::dotenv();

    let explicit_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let mut config =
        Config::load(explicit_path.as_deref()).context("Failed to load configuration")?;
    let ignored = config.apply_env_overrides();

    init_logging(&config.logging).context("Failed to initialize logging")?;
    let logger = get_logger("main");
    logger.info(&format!(
        "Indexada v{} starting up",
        env!("APP_VERSION")
    ));
    for var in &ignored {
        logger.warn(&format!("Ignoring unparsable environment variable {}", var));
    }

    config.validate().context("Invalid configuration")?;
    let config = Arc::new(config);

    let telegram = Arc::new(TelegramClient::new(
        &config.telegram,
        config.poller.timeout_seconds,
    )?);
    if !telegram.is_configured() {
        logger.warn("TELEGRAM_TOKEN is not set; messages will not be delivered");
    }
    let fetcher = Arc::new(HttpFeedFetcher::new(Duration::from_secs(
        config.feed.fetch_timeout_seconds,
    ))?);

    let coordinator = Arc::new(ScheduleCoordinator::new(
        config.clone(),
        fetcher,
        telegram.clone(),
    )?);

    let router = Arc::new(CommandRouter::new(
        coordinator.clone(),
        config.commands.clone(),
    ));
    let polling = CommandPoller::new(telegram, router, &config.poller).spawn();

    coordinator.startup().await;

    let daily = tokio::spawn(coordinator.clone().run_daily());
    let hourly = tokio::spawn(coordinator.clone().run_hourly());

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    logger.info("Shutdown requested");

    if let Some(polling) = polling {
        polling.abort();
    }
    daily.abort();
    hourly.abort();
    Ok(())
}
