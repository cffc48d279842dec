use anyhow::Context;
use email_notifications::app::EmailNotificationsApp;
use shared::{
    config::Config,
    utils::{Telemetry, init_logger},
};
use tracing::{error, info};

const SERVICE_NAME: &str = "email-notifications";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::init().context("failed to load config")?;

    let telemetry = config
        .otel_endpoint
        .as_deref()
        .map(|endpoint| Telemetry::init(SERVICE_NAME, endpoint))
        .transpose()
        .context("failed to initialize telemetry")?;

    let _guard = init_logger(
        telemetry.as_ref().map(Telemetry::logger_provider),
        SERVICE_NAME,
        config.dev_mode,
        config.enable_file_log,
    );

    info!(smtp = ?config.smtp, port = config.port, "Configuration loaded");

    let result = EmailNotificationsApp::new(config).run().await;

    if let Some(Err(e)) = telemetry.map(Telemetry::shutdown) {
        error!("{e}");
    }

    result?;

    info!("Email notifications service shutdown gracefully.");

    Ok(())
}
