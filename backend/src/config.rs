//! Configuration for the session service.

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Main configuration structure for the session service.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database URL (`sqlite:<path>`, a bare path, or `:memory:`)
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

/// Token signing configuration.
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret shared by every token this process issues and verifies.
    pub signing_secret: String,
    #[serde(default = "default_access_ttl")]
    pub access_ttl_secs: i64,
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_secs: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_secret", &"<redacted>")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish()
    }
}

/// How sign-in persists a new refresh token for an existing identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPolicy {
    /// Check for an active session, then overwrite unconditionally.
    /// Two concurrent sign-ins may both succeed; the later write is kept.
    #[default]
    LastWriteWins,
    /// Only write when no session is stored; a lost race reports a conflict.
    FirstWriteWins,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub policy: SessionPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated allowed origins, or `*`
    #[serde(default = "default_cors_origins")]
    pub origins: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: default_cors_origins(),
        }
    }
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_database_url() -> String {
    "sqlite:./data/mongli.db".to_string()
}
pub(crate) fn default_access_ttl() -> i64 {
    3600
}
pub(crate) fn default_refresh_ttl() -> i64 {
    1_209_600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_cors_origins() -> String {
    "*".to_string()
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Configuration sources (in order of precedence):
    /// 1. Environment variables (MONGLI__SECTION__KEY format)
    /// 2. config.toml file (if present)
    /// 3. Built-in defaults
    ///
    /// `auth.signing_secret` has no default; loading fails without it.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_builder(
            ConfigLoader::builder()
                .add_source(File::with_name("config").required(false))
                .add_source(
                    Environment::with_prefix("MONGLI")
                        .separator("__")
                        .try_parsing(true),
                ),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let config = builder
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port() as i64)?
            .set_default("auth.access_ttl_secs", default_access_ttl())?
            .set_default("auth.refresh_ttl_secs", default_refresh_ttl())?
            .set_default("session.policy", "last_write_wins")?
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn load_toml(toml: &str) -> Result<Config, ConfigError> {
        Config::from_builder(
            ConfigLoader::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    #[test]
    fn test_default_server_config() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = load_toml("[auth]\nsigning_secret = \"s3cret\"\n").unwrap();
        assert_eq!(config.auth.signing_secret, "s3cret");
        assert_eq!(config.auth.access_ttl_secs, 3600);
        assert_eq!(config.auth.refresh_ttl_secs, 1_209_600);
        assert_eq!(config.session.policy, SessionPolicy::LastWriteWins);
        assert_eq!(config.database.url, "sqlite:./data/mongli.db");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.cors.origins, "*");
    }

    #[test]
    fn test_missing_signing_secret_fails() {
        assert!(load_toml("[server]\nport = 9000\n").is_err());
    }

    #[test]
    fn test_first_write_wins_policy() {
        let toml = "[auth]\nsigning_secret = \"k\"\n[session]\npolicy = \"first_write_wins\"\n";
        let config = load_toml(toml).unwrap();
        assert_eq!(config.session.policy, SessionPolicy::FirstWriteWins);
    }

    #[test]
    fn test_auth_config_debug_redacts_secret() {
        let config = load_toml("[auth]\nsigning_secret = \"do-not-print\"\n").unwrap();
        let debug = format!("{:?}", config.auth);
        assert!(!debug.contains("do-not-print"));
        assert!(debug.contains("<redacted>"));
    }
}
