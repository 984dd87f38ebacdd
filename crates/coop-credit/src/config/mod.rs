use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use url::Url;

const DEFAULT_RISK_CENTRAL_BASE_URL: &str = "http://localhost:8081";
const DEFAULT_RISK_CENTRAL_TIMEOUT_MS: u64 = 5_000;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the credit service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub risk_central: RiskCentralConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::parse(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            risk_central: RiskCentralConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Location of the external risk-scoring service and how long one call may take.
#[derive(Debug, Clone)]
pub struct RiskCentralConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

impl RiskCentralConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_url = env::var("RISK_CENTRAL_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_RISK_CENTRAL_BASE_URL.to_string());
        let base_url = Url::parse(raw_url.trim())
            .map_err(|source| ConfigError::InvalidRiskCentralUrl { source })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedRiskCentralScheme {
                scheme: base_url.scheme().to_string(),
            });
        }

        let timeout_ms = match env::var("RISK_CENTRAL_TIMEOUT_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or(ConfigError::InvalidRiskCentralTimeout)?,
            Err(_) => DEFAULT_RISK_CENTRAL_TIMEOUT_MS,
        };

        Ok(Self {
            base_url,
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRiskCentralUrl { source: url::ParseError },
    UnsupportedRiskCentralScheme { scheme: String },
    InvalidRiskCentralTimeout,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRiskCentralUrl { .. } => {
                write!(f, "RISK_CENTRAL_BASE_URL must be an absolute URL")
            }
            ConfigError::UnsupportedRiskCentralScheme { scheme } => write!(
                f,
                "RISK_CENTRAL_BASE_URL must use http or https, got '{scheme}'"
            ),
            ConfigError::InvalidRiskCentralTimeout => write!(
                f,
                "RISK_CENTRAL_TIMEOUT_MS must be a positive number of milliseconds"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidRiskCentralUrl { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::UnsupportedRiskCentralScheme { .. }
            | ConfigError::InvalidRiskCentralTimeout => None,
        }
    }
}
