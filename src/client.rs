//! Interface to the forum service

use crate::error::Result;
use crate::models::{FeedResponse, Post, UserStatus};

/// Source of raw forum records.
///
/// Implementations own authentication, paging and transport. Every call
/// that touches class content is scoped to a `network` id.
pub trait ForumClient {
    /// The user's enrolled classes.
    fn user_status(&self) -> Result<UserStatus>;

    /// Keyword search. Every whitespace-separated token of `query` must match.
    fn search_feed(&self, network: &str, query: &str) -> Result<FeedResponse>;

    /// Feed restricted to one folder.
    fn filtered_feed(&self, network: &str, folder: &str) -> Result<FeedResponse>;

    /// Chronological feed, newest first.
    fn feed(&self, network: &str, limit: usize, offset: usize) -> Result<FeedResponse>;

    fn post(&self, network: &str, nr: u64) -> Result<Post>;
}
