//! Feed and search result summaries

use tracing::debug;

use crate::client::ForumClient;
use crate::error::Result;
use crate::models::SummaryRecord;
use crate::utils::{snippet, DEFAULT_SNIPPET_LENGTH};

pub const DEFAULT_LIMIT: usize = 20;
pub const NO_POSTS: &str = "No posts found.";

/// Which posts to list. Empty strings count as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedQuery {
    pub query: Option<String>,
    pub folder: Option<String>,
    pub limit: usize,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            query: None,
            folder: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl FeedQuery {
    pub fn keywords(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }

    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref().filter(|f| !f.is_empty())
    }
}

/// Pick the client call(s) matching the query and return at most `limit`
/// entries, in the order the client produced them.
///
/// The service cannot search within a folder, so a keyword search with a
/// folder filters the search results locally.
pub fn reconcile<C: ForumClient>(
    client: &C,
    network: &str,
    query: &FeedQuery,
) -> Result<Vec<SummaryRecord>> {
    let records = match (query.keywords(), query.folder()) {
        (Some(keywords), Some(folder)) => {
            debug!(keywords, folder, "searching within folder");
            client
                .search_feed(network, keywords)?
                .into_records()
                .into_iter()
                .filter(|record| record.in_folder(folder))
                .collect()
        }
        (Some(keywords), None) => {
            debug!(keywords, "searching");
            client.search_feed(network, keywords)?.into_records()
        }
        (None, Some(folder)) => {
            debug!(folder, "listing folder");
            client.filtered_feed(network, folder)?.into_records()
        }
        (None, None) => {
            debug!(limit = query.limit, "listing recent posts");
            client.feed(network, query.limit, 0)?.into_records()
        }
    };

    Ok(records.into_iter().take(query.limit).collect())
}

/// Format one feed entry: heading, optional snippet, optional metadata line
pub fn render_summary(record: &SummaryRecord) -> String {
    let mut summary = format!("### @{}: {}", record.display_id(), record.subject());

    let preview = snippet(&record.content_snipet, DEFAULT_SNIPPET_LENGTH);
    if !preview.is_empty() {
        summary.push('\n');
        summary.push_str(&preview);
    }

    let mut meta = Vec::new();
    if !record.folders.is_empty() {
        meta.push(format!("Folders: {}", record.folders.join(", ")));
    }
    if record.has_i {
        meta.push(String::from("Has instructor answer"));
    }
    if record.has_s {
        meta.push(String::from("Has student answer"));
    }
    if record.no_answer {
        meta.push(String::from("Unanswered"));
    }
    if !record.kind.is_empty() {
        meta.push(format!("Type: {}", record.kind));
    }
    let timestamp = record.timestamp();
    if !timestamp.is_empty() {
        meta.push(format!("Date: {}", timestamp));
    }
    if !meta.is_empty() {
        summary.push('\n');
        summary.push_str(&meta.join(" | "));
    }

    summary
}

/// Format a result list, or the "no posts" notice when it is empty
pub fn render_results(records: &[SummaryRecord]) -> String {
    if records.is_empty() {
        return NO_POSTS.to_string();
    }

    let mut blocks = vec![format!("Found {} post(s):", records.len())];
    blocks.extend(records.iter().map(render_summary));
    blocks.join("\n\n")
}

/// Reconcile and render in one step
pub fn search_posts<C: ForumClient>(client: &C, network: &str, query: &FeedQuery) -> Result<String> {
    let records = reconcile(client, network, query)?;
    Ok(render_results(&records))
}
