use contracts::shared::display_config::DisplayConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub display: DisplaySection,
    #[serde(default)]
    pub seed: Option<SeedConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Built frontend (`trunk build` output), served for non-API paths
    #[serde(default)]
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: None,
        }
    }
}

fn default_port() -> u16 {
    3000
}

/// Настройки отображения, отдаются клиенту через `/api/v2/config`
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DisplaySection {
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub default_topic_type: Option<String>,
}

impl DisplaySection {
    pub fn to_contract(&self) -> DisplayConfig {
        let clean = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        DisplayConfig {
            display_timezone: clean(&self.timezone),
            default_topic_type: clean(&self.default_topic_type),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedConfig {
    pub path: String,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[database]
path = "target/db/registry.db"

[server]
port = 3000

[display]
default_topic_type = "registration"
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

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    Ok(toml::from_str(contents)?)
}

/// Resolves relative paths relative to the executable directory
pub fn resolve_path(path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        return candidate.to_path_buf();
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(candidate);
        }
    }
    PathBuf::from(path)
}

/// Get the database file path from configuration
pub fn get_database_path(config: &Config) -> PathBuf {
    resolve_path(&config.database.path)
}

/// Frontend directory, if one is configured
pub fn get_static_dir(config: &Config) -> Option<PathBuf> {
    config
        .server
        .static_dir
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(resolve_path)
}

/// Seed file path, if one is configured
pub fn get_seed_path(config: &Config) -> Option<PathBuf> {
    config
        .seed
        .as_ref()
        .map(|s| s.path.trim())
        .filter(|p| !p.is_empty())
        .map(resolve_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.database.path, "target/db/registry.db");
        assert_eq!(config.server.port, 3000);
        assert!(config.seed.is_none());
        assert!(get_static_dir(&config).is_none());
        let display = config.display.to_contract();
        assert_eq!(display.display_timezone, None);
        assert_eq!(display.default_topic_type.as_deref(), Some("registration"));
    }

    #[test]
    fn test_optional_sections() {
        let config = parse_config(
            r#"
            [database]
            path = "/var/lib/registry.db"

            [display]
            timezone = "  "
            default_topic_type = "registration"

            [seed]
            path = "/srv/seed.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(get_database_path(&config), PathBuf::from("/var/lib/registry.db"));
        assert_eq!(get_seed_path(&config), Some(PathBuf::from("/srv/seed.json")));
        // blank values are not forwarded to the client
        assert_eq!(config.display.to_contract().display_timezone, None);
    }

    #[test]
    fn test_missing_database_section_is_an_error() {
        assert!(parse_config("[server]\nport = 8080\n").is_err());
    }
}
