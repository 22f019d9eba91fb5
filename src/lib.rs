//! Library for rendering discussion-forum posts and feeds as readable text

pub mod archive;
pub mod classes;
pub mod client;
pub mod config;
pub mod dom;
pub mod error;
pub mod feed;
pub mod markdown;
pub mod models;
pub mod session;
pub mod utils;

// Re-export main types and functions for convenient access
pub use archive::ArchiveClient;
pub use client::ForumClient;
pub use error::{Error, Result};
pub use feed::{reconcile, render_results, render_summary, FeedQuery};
pub use markdown::render_post;
pub use models::{Post, SummaryRecord};
pub use session::Session;
pub use utils::{html_to_markdown, snippet};
