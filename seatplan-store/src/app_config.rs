use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 { 1 }

#[derive(Debug, Deserialize, Clone)]
pub struct LayoutConfig {
    pub project_id: i64,
    #[serde(default)]
    pub read_only: bool,
    /// Document imported on startup when the project has no seats yet.
    pub seed_document: Option<String>,
    /// Document written on shutdown.
    pub export_document: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local, never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `SEATPLAN_DATABASE__URL=sqlite::memory:` sets `database.url`
            .add_source(config::Environment::with_prefix("SEATPLAN").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_section_defaults() {
        let s = config::Config::builder()
            .add_source(config::File::from_str(
                r#"
                [server]
                port = 8080

                [database]
                url = "sqlite::memory:"

                [layout]
                project_id = 7
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let config: Config = s.try_deserialize().unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.max_connections, 1);
        assert_eq!(config.layout.project_id, 7);
        assert!(!config.layout.read_only);
        assert!(config.layout.seed_document.is_none());
    }
}
