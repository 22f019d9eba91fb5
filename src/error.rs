//! Error types

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A post or search operation was attempted before any class was selected.
    #[error("No class selected. Pass --network <id> or set FORUM_NETWORK.")]
    NoClassSelected,

    #[error("network_id '{0}' not found in enrolled classes")]
    UnknownNetwork(String),

    #[error("post @{0} not found")]
    PostNotFound(u64),

    #[error("malformed record in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Pattern(#[from] glob::PatternError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the caller has to select a class before retrying.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Error::NoClassSelected)
    }
}
