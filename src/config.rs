//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults. Environment variables are read once, in
//! [`Config::from_env`]; everything downstream receives explicit values.

use std::env;
use std::fmt;
use std::str::FromStr;

/// Default Gemini model name
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini API base URL
pub const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment environment
    pub environment: Environment,
    /// Server configuration
    pub server: ServerConfig,
    /// Cross-origin policy
    pub cors: CorsConfig,
    /// Grocery agent configuration
    pub agent: AgentConfig,
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Deployed service
    Production,
    /// Automated tests
    Test,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(format!("Unknown environment: {}", other)),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        };
        f.write_str(name)
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
}

/// Which origins may call the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// Wildcard: `Access-Control-Allow-Origin: *`
    Any,
    /// Explicit list of origins, e.g. `http://localhost:5173`
    List(Vec<String>),
}

/// Cross-origin configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// Origins allowed to call the API
    pub allowed_origins: AllowedOrigins,
    /// Allowed request methods
    pub allowed_methods: Vec<String>,
    /// Allowed request headers
    pub allowed_headers: Vec<String>,
}

impl CorsConfig {
    /// CORS policy for an environment
    ///
    /// Every environment allows all origins. Use [`CorsConfig::with_origins`]
    /// to narrow the policy to an explicit list.
    pub fn for_environment(environment: Environment) -> Self {
        let allowed_origins = match environment {
            Environment::Development | Environment::Production | Environment::Test => {
                AllowedOrigins::Any
            }
        };

        Self {
            allowed_origins,
            allowed_methods: vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()],
            allowed_headers: vec!["Content-Type".to_string()],
        }
    }

    /// Restrict the policy to the given origins
    ///
    /// An empty list, or one containing `*`, keeps the current policy.
    pub fn with_origins(mut self, origins: Vec<String>) -> Self {
        if !origins.is_empty() && !origins.iter().any(|o| o == "*") {
            self.allowed_origins = AllowedOrigins::List(origins);
        }
        self
    }
}

/// Grocery agent configuration
#[derive(Clone)]
pub struct AgentConfig {
    /// Gemini API key; `None` selects the offline catalog agent
    pub gemini_api_key: Option<String>,
    /// Gemini model name
    pub gemini_model: String,
    /// Gemini API base URL
    pub gemini_api_base_url: String,
    /// Timeout for a single Gemini call (in seconds)
    pub gemini_timeout_secs: u64,
}

impl fmt::Debug for AgentConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentConfig")
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("gemini_api_base_url", &self.gemini_api_base_url)
            .field("gemini_timeout_secs", &self.gemini_timeout_secs)
            .finish()
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_base_url: DEFAULT_GEMINI_API_BASE_URL.to_string(),
            gemini_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Used by [`Config::from_env`] and by tests, which pass a map instead of
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("APP_ENV")
            .and_then(|e| e.parse().ok())
            .unwrap_or_default();

        let origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| parse_origin_list(&raw))
            .unwrap_or_default();

        let defaults = AgentConfig::default();

        Self {
            environment,
            server: ServerConfig {
                port: lookup("PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(5000),
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            },
            cors: CorsConfig::for_environment(environment).with_origins(origins),
            agent: AgentConfig {
                gemini_api_key: lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()),
                gemini_model: lookup("GEMINI_MODEL")
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or(defaults.gemini_model),
                gemini_api_base_url: lookup("GEMINI_API_BASE_URL")
                    .filter(|u| !u.trim().is_empty())
                    .unwrap_or(defaults.gemini_api_base_url),
                gemini_timeout_secs: lookup("GEMINI_TIMEOUT_SECS")
                    .and_then(|t| t.parse().ok())
                    .filter(|t| *t > 0)
                    .unwrap_or(defaults.gemini_timeout_secs),
            },
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Split a comma-separated origin list, dropping blanks
fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
