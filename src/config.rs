use anyhow::{Context, Result};
use std::{env, path::PathBuf};

use crate::storage::WriteMode;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub todos_path: PathBuf,
    pub log_path: PathBuf,
    pub write_mode: WriteMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            todos_path: PathBuf::from("todos.json"),
            log_path: PathBuf::from("logs.txt"),
            write_mode: WriteMode::Overwrite,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let host = lookup("APP_HOST").unwrap_or(defaults.host);

        let port = match lookup("APP_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .context("APP_PORT must be a valid u16")?,
            None => defaults.port,
        };

        let todos_path = lookup("TODOS_FILE").map_or(defaults.todos_path, PathBuf::from);
        let log_path = lookup("TODOS_LOG_FILE").map_or(defaults.log_path, PathBuf::from);

        let write_mode = match lookup("TODOS_ATOMIC_WRITES") {
            Some(raw) => parse_write_mode(&raw)?,
            None => defaults.write_mode,
        };

        Ok(Self {
            host,
            port,
            todos_path,
            log_path,
            write_mode,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_write_mode(raw: &str) -> Result<WriteMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(WriteMode::AtomicRename),
        "0" | "false" | "no" | "" => Ok(WriteMode::Overwrite),
        other => Err(anyhow::anyhow!(
            "TODOS_ATOMIC_WRITES must be true or false, got '{other}'"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_the_documented_surface() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.address(), "0.0.0.0:3000");
        assert_eq!(config.todos_path, PathBuf::from("todos.json"));
        assert_eq!(config.log_path, PathBuf::from("logs.txt"));
        assert_eq!(config.write_mode, WriteMode::Overwrite);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("APP_HOST", "127.0.0.1"),
            ("APP_PORT", "8081"),
            ("TODOS_FILE", "/tmp/t.json"),
            ("TODOS_LOG_FILE", "/tmp/l.txt"),
            ("TODOS_ATOMIC_WRITES", "true"),
        ])
        .unwrap();
        assert_eq!(config.address(), "127.0.0.1:8081");
        assert_eq!(config.todos_path, PathBuf::from("/tmp/t.json"));
        assert_eq!(config.log_path, PathBuf::from("/tmp/l.txt"));
        assert_eq!(config.write_mode, WriteMode::AtomicRename);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(config_from(&[("APP_PORT", "70000")]).is_err());
        assert!(config_from(&[("TODOS_ATOMIC_WRITES", "maybe")]).is_err());
    }
}
