use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub access_token_hours: i64,
    pub refresh_token_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_hours: 24,
            refresh_token_days: 90,
        }
    }
}

/// Account seeded when `sys_users` is empty
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BootstrapConfig {
    pub admin_email: String,
    pub admin_password: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            admin_email: "admin@localhost".to_string(),
            admin_password: "admin1234".to_string(),
        }
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/inventory.db"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                return parse_config(&std::fs::read_to_string(&config_path)?);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

/// One year
pub const MAX_ACCESS_TOKEN_HOURS: i64 = 24 * 365;
/// Ten years
pub const MAX_REFRESH_TOKEN_DAYS: i64 = 3650;

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    let auth = &config.auth;
    if !(1..=MAX_ACCESS_TOKEN_HOURS).contains(&auth.access_token_hours) {
        anyhow::bail!(
            "auth.access_token_hours must be between 1 and {}",
            MAX_ACCESS_TOKEN_HOURS
        );
    }
    if !(1..=MAX_REFRESH_TOKEN_DAYS).contains(&auth.refresh_token_days) {
        anyhow::bail!(
            "auth.refresh_token_days must be between 1 and {}",
            MAX_REFRESH_TOKEN_DAYS
        );
    }
    Ok(config)
}

/// Get the database file path from configuration
/// Resolves relative paths relative to the executable directory
pub fn get_database_path(config: &Config) -> PathBuf {
    let db_path = Path::new(&config.database.path);

    if db_path.is_absolute() {
        return db_path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(db_path);
        }
    }

    PathBuf::from(&config.database.path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/inventory.db");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.access_token_hours, 24);
        assert_eq!(config.auth.refresh_token_days, 90);
        assert_eq!(config.bootstrap.admin_email, "admin@localhost");
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config = parse_config(
            r#"
            [database]
            path = "/var/lib/inventory.db"

            [server]
            port = 8080

            [bootstrap]
            admin_email = "root@co"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.bootstrap.admin_email, "root@co");
        assert_eq!(config.bootstrap.admin_password, "admin1234");
        assert_eq!(
            get_database_path(&config),
            PathBuf::from("/var/lib/inventory.db")
        );
    }

    #[test]
    fn test_non_positive_lifetime_rejected() {
        let result = parse_config(
            r#"
            [database]
            path = "x.db"

            [auth]
            access_token_hours = 0
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_token_lifetime_bounds() {
        let with_auth = |hours: i64, days: i64| {
            parse_config(&format!(
                "[database]\npath = \"x.db\"\n\n[auth]\naccess_token_hours = {}\nrefresh_token_days = {}\n",
                hours, days
            ))
        };

        assert!(with_auth(1, 1).is_ok());
        assert!(with_auth(MAX_ACCESS_TOKEN_HOURS, MAX_REFRESH_TOKEN_DAYS).is_ok());
        assert!(with_auth(0, 90).is_err());
        assert!(with_auth(24, -1).is_err());
        assert!(with_auth(MAX_ACCESS_TOKEN_HOURS + 1, 90).is_err());
        assert!(with_auth(24, MAX_REFRESH_TOKEN_DAYS + 1).is_err());
        assert!(with_auth(i64::MAX, 90).is_err());
    }
}
