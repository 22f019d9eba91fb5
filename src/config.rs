//! Configuration loading from `.env` files.

use std::{env, path::Path, path::PathBuf};

use anyhow::{Context, Result};

use crate::feed::DEFAULT_LIMIT;

/// Runtime settings derived from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory holding the forum dumps.
    pub archive_root: PathBuf,
    /// Class to select when the command line names none.
    pub network: Option<String>,
    /// Result count for searches without `--limit`.
    pub search_limit: usize,
}

impl Settings {
    /// Load settings from the specified `.env` file, if it exists, and the
    /// process environment. `archive_root` overrides `FORUM_ARCHIVE_ROOT`.
    pub fn from_env(path: &str, archive_root: Option<&Path>) -> Result<Self> {
        if Path::new(path).exists() {
            dotenvy::from_filename(path).context("reading env file")?;
        }
        let archive_root = archive_root.map(|p| p.to_string_lossy().into_owned());
        Self::from_vars(|key| match key {
            "FORUM_ARCHIVE_ROOT" if archive_root.is_some() => archive_root.clone(),
            _ => env::var(key).ok(),
        })
    }

    /// Build settings from a variable lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let archive_root = var("FORUM_ARCHIVE_ROOT")
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .context("FORUM_ARCHIVE_ROOT is not set")?;
        let network = var("FORUM_NETWORK").filter(|s| !s.is_empty());
        let search_limit = match var("FORUM_SEARCH_LIMIT").filter(|s| !s.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("FORUM_SEARCH_LIMIT is not a number: {raw}"))?,
            None => DEFAULT_LIMIT,
        };
        Ok(Self {
            archive_root,
            network,
            search_limit,
        })
    }
}
