//! Configuration module for the contact relay.
//!
//! All settings come from the process environment (a `.env` file is loaded
//! by the binary before this runs). The resulting [`Config`] is immutable and
//! is handed to the router and the mail transport explicitly.

use lettre::message::Mailbox;

use crate::{RelayError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
    /// Browser origin allowed to call the contact endpoint.
    pub cors_origin: String,
    /// Use `X-Forwarded-For` / `X-Real-IP` to identify callers.
    pub trust_proxy: bool,
    /// Maximum accepted request body size in bytes.
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cors_origin() -> String {
    "http://localhost:8080".to_string()
}

fn default_body_limit() -> usize {
    100 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            trust_proxy: false,
            body_limit_bytes: default_body_limit(),
        }
    }
}

/// SMTP transport configuration.
#[derive(Clone)]
pub struct SmtpConfig {
    /// SMTP server hostname.
    pub host: String,
    /// SMTP server port.
    pub port: u16,
    /// Implicit TLS when true, opportunistic STARTTLS otherwise.
    pub secure: bool,
    /// Username for authentication.
    pub username: String,
    /// Password for authentication.
    pub password: String,
    /// Connection and command timeout in seconds.
    pub timeout_secs: u64,
}

fn default_smtp_timeout() -> u64 {
    30
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Envelope addresses used for every relayed message.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Sender mailbox (`MAIL_FROM`).
    pub from: String,
    /// Recipient mailbox (`MAIL_TO`).
    pub to: String,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
    /// Optional path to a log file written alongside stdout.
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// SMTP configuration.
    pub smtp: SmtpConfig,
    /// Sender and recipient.
    pub mail: MailConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Reads variables through a lookup function so tests need not touch the
/// process environment.
struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Value of `key`, treating an empty string as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.optional(key)
            .ok_or_else(|| RelayError::Config(format!("{key} is not set")))
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr,
    {
        match self.optional(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| RelayError::Config(format!("{key} has an invalid value: {raw}"))),
            None => Ok(default),
        }
    }

    /// Only the literal `"true"` enables a flag.
    fn flag(&self, key: &str) -> bool {
        self.optional(key).as_deref() == Some("true")
    }
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };

        let server = ServerConfig {
            host: env.optional("HOST").unwrap_or_else(default_host),
            port: env.parse_or("PORT", default_port())?,
            cors_origin: env.optional("CORS_ORIGIN").unwrap_or_else(default_cors_origin),
            trust_proxy: env.flag("TRUST_PROXY"),
            body_limit_bytes: env.parse_or("BODY_LIMIT_BYTES", default_body_limit())?,
        };

        let smtp_port = env.required("SMTP_PORT")?;
        // SMTP_SECURE must be present; only "true" turns implicit TLS on.
        env.required("SMTP_SECURE")?;
        let smtp = SmtpConfig {
            host: env.required("SMTP_HOST")?,
            port: smtp_port
                .trim()
                .parse()
                .map_err(|_| RelayError::Config(format!("SMTP_PORT is not a port: {smtp_port}")))?,
            secure: env.flag("SMTP_SECURE"),
            username: env.required("SMTP_USER")?,
            password: env.required("SMTP_PASS")?,
            timeout_secs: env.parse_or("SMTP_TIMEOUT_SECS", default_smtp_timeout())?,
        };

        let mail = MailConfig {
            from: env.required("MAIL_FROM")?,
            to: env.required("MAIL_TO")?,
        };

        let logging = LoggingConfig {
            level: env.optional("LOG_LEVEL").unwrap_or_else(default_log_level),
            file: env.optional("LOG_FILE"),
        };

        let config = Self {
            server,
            smtp,
            mail,
            logging,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - `MAIL_FROM` or `MAIL_TO` is not a valid mailbox
    /// - `CORS_ORIGIN` is not a valid header value
    /// - the body limit is zero
    /// - `LOG_LEVEL` is not a tracing level
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [("MAIL_FROM", &self.mail.from), ("MAIL_TO", &self.mail.to)] {
            value
                .parse::<Mailbox>()
                .map_err(|e| RelayError::Config(format!("{key} is not a valid mailbox: {e}")))?;
        }

        if self
            .server
            .cors_origin
            .parse::<axum::http::HeaderValue>()
            .is_err()
        {
            return Err(RelayError::Config(format!(
                "CORS_ORIGIN is not a valid origin: {}",
                self.server.cors_origin
            )));
        }

        if self.logging.level.parse::<tracing::Level>().is_err() {
            return Err(RelayError::Config(format!(
                "LOG_LEVEL is not a log level: {}",
                self.logging.level
            )));
        }

        if self.server.body_limit_bytes == 0 {
            return Err(RelayError::Config(
                "BODY_LIMIT_BYTES must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
