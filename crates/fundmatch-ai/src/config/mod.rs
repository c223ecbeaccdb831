use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

const DEFAULT_MODULE_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONFIDENCE_THRESHOLD: u8 = 80;

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let ansi = environment == AppEnvironment::Development;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            analysis: AnalysisConfig::from_env()?,
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
    pub ansi: bool,
}

/// Knobs for the module orchestrator and its remote analysis functions.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Per-module budget before the remote call is abandoned for its fallback.
    pub module_timeout: Duration,
    /// Aggregated confidence below this value produces caller warnings.
    pub confidence_threshold: u8,
    /// Base URL of the hosted analysis functions; `None` runs every module on fallbacks.
    pub functions_url: Option<String>,
    pub functions_key: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            module_timeout: Duration::from_secs(DEFAULT_MODULE_TIMEOUT_SECS),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            functions_url: None,
            functions_key: None,
        }
    }
}

impl AnalysisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let module_timeout = match env::var("ANALYSIS_MODULE_TIMEOUT_SECS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidModuleTimeout(raw)),
            },
            Err(_) => Duration::from_secs(DEFAULT_MODULE_TIMEOUT_SECS),
        };

        let confidence_threshold = match env::var("ANALYSIS_CONFIDENCE_THRESHOLD") {
            Ok(raw) => match raw.trim().parse::<u8>() {
                Ok(value) if value <= 100 => value,
                _ => return Err(ConfigError::InvalidConfidenceThreshold(raw)),
            },
            Err(_) => DEFAULT_CONFIDENCE_THRESHOLD,
        };

        let functions_url = env::var("ANALYSIS_FUNCTIONS_URL")
            .ok()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        let functions_key = env::var("ANALYSIS_FUNCTIONS_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(Self {
            module_timeout,
            confidence_threshold,
            functions_url,
            functions_key,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidModuleTimeout(String),
    InvalidConfidenceThreshold(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidModuleTimeout(raw) => write!(
                f,
                "ANALYSIS_MODULE_TIMEOUT_SECS must be a positive number of seconds (got '{raw}')"
            ),
            ConfigError::InvalidConfidenceThreshold(raw) => write!(
                f,
                "ANALYSIS_CONFIDENCE_THRESHOLD must be between 0 and 100 (got '{raw}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidModuleTimeout(_)
            | ConfigError::InvalidConfidenceThreshold(_) => None,
        }
    }
}
