//! Run configuration.
//!
//! The Notion credentials come from the environment (injected by CI); run
//! options come from the command line.

use std::path::PathBuf;

use log::debug;
use thiserror::Error;

pub const TOKEN_VAR: &str = "NOTION_TOKEN";
pub const DATABASE_ID_VAR: &str = "NOTION_DATABASE_ID";
pub const DEFAULT_OUTPUT_DIR: &str = "content/posts";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub database_id: String,
    pub output_dir: PathBuf,
    pub dry_run: bool,
}

impl Config {
    /// Build config from the process environment.
    pub fn from_env(output_dir: Option<PathBuf>, dry_run: bool) -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok(), output_dir, dry_run)
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// A variable that is set but empty counts as missing.
    pub fn from_lookup<F>(
        lookup: F,
        output_dir: Option<PathBuf>,
        dry_run: bool,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };

        let token = required(TOKEN_VAR)?;
        let database_id = required(DATABASE_ID_VAR)?;
        let output_dir = output_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        debug!(
            "Loaded config: token ({} chars), database {}, output {}",
            token.len(),
            database_id,
            output_dir.display()
        );

        Ok(Self {
            token,
            database_id,
            output_dir,
            dry_run,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_loads_both_values() {
        let env = env_of(&[(TOKEN_VAR, "secret_abc"), (DATABASE_ID_VAR, "db-123")]);
        let config = Config::from_lookup(env, None, false).unwrap();
        assert_eq!(config.token, "secret_abc");
        assert_eq!(config.database_id, "db-123");
        assert_eq!(config.output_dir, PathBuf::from("content/posts"));
        assert!(!config.dry_run);
    }

    #[test]
    fn test_missing_token() {
        let env = env_of(&[(DATABASE_ID_VAR, "db-123")]);
        let err = Config::from_lookup(env, None, false).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(TOKEN_VAR));
        assert_eq!(
            err.to_string(),
            "Missing required environment variable NOTION_TOKEN"
        );
    }

    #[test]
    fn test_missing_database_id() {
        let env = env_of(&[(TOKEN_VAR, "secret_abc")]);
        let err = Config::from_lookup(env, None, false).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(DATABASE_ID_VAR));
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let env = env_of(&[(TOKEN_VAR, ""), (DATABASE_ID_VAR, "db-123")]);
        let err = Config::from_lookup(env, None, false).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(TOKEN_VAR));
    }

    #[test]
    fn test_whitespace_value_is_kept() {
        let env = env_of(&[(TOKEN_VAR, " "), (DATABASE_ID_VAR, "db-123")]);
        let config = Config::from_lookup(env, None, false).unwrap();
        assert_eq!(config.token, " ");
    }

    #[test]
    fn test_output_dir_override() {
        let env = env_of(&[(TOKEN_VAR, "t"), (DATABASE_ID_VAR, "d")]);
        let config = Config::from_lookup(env, Some(PathBuf::from("/tmp/out")), true).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert!(config.dry_run);
    }
}
