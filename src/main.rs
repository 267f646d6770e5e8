use std::process::ExitCode;
use std::sync::Arc;

use tracing::{error, info};

use contact_relay::{Config, SmtpMailer, WebServer};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = contact_relay::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        contact_relay::logging::init_console_only(&config.logging.level);
    }

    let mailer = match SmtpMailer::from_config(&config.smtp) {
        Ok(mailer) => mailer,
        Err(e) => {
            error!("Failed to configure SMTP transport: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Relaying contact submissions via {}:{}",
        config.smtp.host, config.smtp.port
    );

    if let Err(e) = WebServer::new(&config, Arc::new(mailer)).run().await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
