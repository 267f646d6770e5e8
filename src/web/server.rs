//! Web server for the contact relay.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::mail::MailTransport;
use crate::rate_limit::RateLimitConfig;
use crate::Result;

use super::handlers::AppState;
use super::middleware::RateLimitState;
use super::router::create_router;

/// Web server for the API.
pub struct WebServer {
    /// Host to bind.
    host: String,
    /// Port to bind.
    port: u16,
    /// Application state.
    app_state: Arc<AppState>,
    /// Rate limit state for the contact endpoint.
    rate_limit: RateLimitState,
    /// Configuration the router is built from.
    config: Config,
}

impl WebServer {
    /// Create a new web server relaying through `mailer`.
    pub fn new(config: &Config, mailer: Arc<dyn MailTransport>) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            app_state: Arc::new(AppState::new(mailer, config.mail.clone())),
            rate_limit: RateLimitState::new(RateLimitConfig::default(), config.server.trust_proxy),
            config: config.clone(),
        }
    }

    /// Build the router and bind the listener.
    async fn bind(self) -> Result<(TcpListener, Router)> {
        self.rate_limit.start_cleanup_task();

        let router = create_router(self.app_state, self.rate_limit, &self.config.server);
        let listener = TcpListener::bind((self.host.as_str(), self.port)).await?;
        Ok((listener, router))
    }

    /// Run the web server until Ctrl+C or SIGTERM.
    pub async fn run(self) -> Result<()> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Contact relay listening on http://{}", local_addr);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        tracing::info!("Contact relay stopped");
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Contact relay listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

/// Wait for Ctrl+C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
