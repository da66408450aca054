use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const DEFAULT_PAGE_SIZE: usize = 24;
const DEFAULT_FEATURED_LIMIT: usize = 6;

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub supabase: SupabaseConfig,
    pub weather: WeatherConfig,
    pub discovery: DiscoveryConfig,
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

        let supabase = SupabaseConfig {
            url: non_empty_var("SUPABASE_URL"),
            anon_key: non_empty_var("SUPABASE_ANON_KEY"),
        };

        let weather = WeatherConfig {
            api_key: non_empty_var("WEATHER_API_KEY"),
            base_url: non_empty_var("WEATHER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_WEATHER_BASE_URL.to_string()),
        };

        let discovery = DiscoveryConfig {
            page_size: positive_var("DISCOVERY_PAGE_SIZE", DEFAULT_PAGE_SIZE)?,
            featured_limit: positive_var("FEATURED_LIMIT", DEFAULT_FEATURED_LIMIT)?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            supabase,
            weather,
            discovery,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn positive_var(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    match non_empty_var(name) {
        None => Ok(default),
        Some(raw) => match raw.parse::<usize>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(ConfigError::InvalidNumber { name, value: raw }),
        },
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

/// Hosted database endpoint. Both values are optional until a store is built.
#[derive(Debug, Clone, Default)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
}

/// Resolved database credentials.
#[derive(Debug, Clone)]
pub struct SupabaseCredentials {
    pub url: String,
    pub anon_key: String,
}

impl SupabaseConfig {
    pub fn require(&self) -> Result<SupabaseCredentials, ConfigError> {
        let url = self
            .url
            .clone()
            .ok_or(ConfigError::MissingCredential {
                name: "SUPABASE_URL",
            })?;
        let anon_key = self
            .anon_key
            .clone()
            .ok_or(ConfigError::MissingCredential {
                name: "SUPABASE_ANON_KEY",
            })?;

        Ok(SupabaseCredentials {
            url: url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }
}

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_WEATHER_BASE_URL.to_string(),
        }
    }
}

impl WeatherConfig {
    pub fn require_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or(ConfigError::MissingCredential {
                name: "WEATHER_API_KEY",
            })
    }
}

/// Page size and featured cap used by the listing surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryConfig {
    pub page_size: usize,
    pub featured_limit: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            featured_limit: DEFAULT_FEATURED_LIMIT,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { name: &'static str, value: String },
    MissingCredential { name: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{name} must be a positive integer (got '{value}')")
            }
            ConfigError::MissingCredential { name } => {
                write!(f, "{name} is not configured")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidNumber { .. }
            | ConfigError::MissingCredential { .. } => None,
        }
    }
}
