use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Placeholder secret used when none is configured. Fine for local runs and
/// tests; any production-facing deployment must set JWT__SECRET explicitly.
pub const DEFAULT_JWT_SECRET: &str = "your-secret-key-here";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_TOKEN_VALIDITY_HOURS: i64 = 24;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    #[serde(default = "default_secret")]
    pub secret: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: default_secret(),
            expiration_hours: default_expiration_hours(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_secret() -> String {
    DEFAULT_JWT_SECRET.to_string()
}

fn default_expiration_hours() -> i64 {
    DEFAULT_TOKEN_VALIDITY_HOURS
}

// An unprefixed source; Environment::with_prefix("") would look for keys
// starting with a literal "__" and match nothing
fn environment_source() -> Environment {
    Environment::default().separator("__")
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (SERVER__PORT, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults (port 3000, placeholder secret)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(environment_source())
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }

    /// Whether the signing secret is still the insecure placeholder.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt.secret == DEFAULT_JWT_SECRET
    }
}
