//! Application settings read from the environment.

use std::env;
use std::path::PathBuf;

use crate::error::{Result, RouteError};
use crate::menu::InvalidChoicePolicy;
use crate::sqlite::SqliteConfig;

pub const DB_PATH_VAR: &str = "ROUTE_FINDER_DB";
pub const INVALID_CHOICE_VAR: &str = "ROUTE_FINDER_INVALID_CHOICE";
pub const DEFAULT_DB_PATH: &str = "internal/db/database.db";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub invalid_choice: InvalidChoicePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            invalid_choice: InvalidChoicePolicy::default(),
        }
    }
}

impl AppConfig {
    /// Reads settings from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let db_path = match lookup(DB_PATH_VAR) {
            Some(path) if path.trim().is_empty() => {
                return Err(RouteError::Config(format!("{DB_PATH_VAR} must not be empty")))
            }
            Some(path) => PathBuf::from(path),
            None => defaults.db_path,
        };
        let invalid_choice = match lookup(INVALID_CHOICE_VAR) {
            Some(policy) => policy.parse()?,
            None => defaults.invalid_choice,
        };
        Ok(Self {
            db_path,
            invalid_choice,
        })
    }

    pub fn sqlite(&self) -> SqliteConfig {
        SqliteConfig::new(self.db_path.clone())
    }
}
