//! File-backed forum client reading JSON dumps from disk
//!
//! Layout under the archive root:
//!
//! ```text
//! status.json                  {"networks": [...]}
//! <network_id>/feed.json       feed entries, newest first
//! <network_id>/posts/<nr>.json full post records
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glob::glob;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::ForumClient;
use crate::error::{Error, Result};
use crate::models::{FeedResponse, Post, SummaryRecord, UserStatus};
use crate::utils::clean_text;

#[derive(Debug, Clone)]
pub struct ArchiveClient {
    root: PathBuf,
}

impl ArchiveClient {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn network_dir(&self, network: &str) -> Result<PathBuf> {
        let dir = self.root.join(network);
        if network.is_empty() || !dir.is_dir() {
            return Err(Error::UnknownNetwork(network.to_string()));
        }
        Ok(dir)
    }

    /// All feed entries of a class. A class without a feed dump has none.
    fn feed_records(&self, network: &str) -> Result<Vec<SummaryRecord>> {
        let path = self.network_dir(network)?.join("feed.json");
        if !path.exists() {
            warn!(path = %path.display(), "no feed dump");
            return Ok(Vec::new());
        }
        let feed: FeedResponse = read_json(&path)?;
        Ok(feed.into_records())
    }

    /// Numbers of every post dumped for a class, ascending
    pub fn post_numbers(&self, network: &str) -> Result<Vec<u64>> {
        let posts_dir = self.network_dir(network)?.join("posts");
        let pattern = format!("{}/*.json", glob::Pattern::escape(&posts_dir.to_string_lossy()));

        let mut numbers = Vec::new();
        for entry in glob(&pattern)? {
            match entry {
                Ok(path) => {
                    let nr = path
                        .file_stem()
                        .and_then(|stem| stem.to_str())
                        .and_then(|stem| stem.parse::<u64>().ok());
                    match nr {
                        Some(nr) => numbers.push(nr),
                        None => debug!(path = %path.display(), "skipping non-post file"),
                    }
                }
                Err(e) => warn!("{:?}", e),
            }
        }
        numbers.sort_unstable();
        Ok(numbers)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// True when every keyword occurs in the entry's subject or snippet,
/// ignoring case. One missing keyword rejects the entry.
fn matches_keywords(record: &SummaryRecord, keywords: &[String]) -> bool {
    let haystack = format!("{} {}", record.subject(), clean_text(&record.content_snipet))
        .to_lowercase();
    keywords.iter().all(|keyword| haystack.contains(keyword.as_str()))
}

impl ForumClient for ArchiveClient {
    fn user_status(&self) -> Result<UserStatus> {
        let path = self.root.join("status.json");
        if !path.exists() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )));
        }
        read_json(&path)
    }

    fn search_feed(&self, network: &str, query: &str) -> Result<FeedResponse> {
        let keywords: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        let hits = self
            .feed_records(network)?
            .into_iter()
            .filter(|record| matches_keywords(record, &keywords))
            .collect();
        Ok(FeedResponse::Bare(hits))
    }

    fn filtered_feed(&self, network: &str, folder: &str) -> Result<FeedResponse> {
        let feed = self
            .feed_records(network)?
            .into_iter()
            .filter(|record| record.in_folder(folder))
            .collect();
        Ok(FeedResponse::Wrapped { feed })
    }

    fn feed(&self, network: &str, limit: usize, offset: usize) -> Result<FeedResponse> {
        let feed = self
            .feed_records(network)?
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect();
        Ok(FeedResponse::Wrapped { feed })
    }

    fn post(&self, network: &str, nr: u64) -> Result<Post> {
        let path = self.network_dir(network)?.join("posts").join(format!("{nr}.json"));
        if !path.exists() {
            return Err(Error::PostNotFound(nr));
        }
        read_json(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(path: &Path, value: serde_json::Value) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
    }

    fn archive() -> (TempDir, ArchiveClient) {
        let dir = TempDir::new().unwrap();
        write(
            &dir.path().join("status.json"),
            json!({"networks": [{"id": "cs101", "name": "Intro", "status": "active"}]}),
        );
        write(
            &dir.path().join("cs101/feed.json"),
            json!({"feed": [
                {"nr": 4, "subject": "HW1 deadline", "content_snipet": "When is <b>hw1</b> due?", "folders": ["hw1"]},
                {"nr": 3, "subject": "Exam room", "content_snipet": "Where is the midterm?", "folders": ["exam"]},
                {"nr": 2, "subject": "hw1 Q3 hint", "content_snipet": "stuck on recursion", "folders": ["hw1"]},
                {"nr": 1, "subject": "Welcome", "content_snipet": "", "folders": ["logistics"]},
            ]}),
        );
        write(
            &dir.path().join("cs101/posts/4.json"),
            json!({"nr": 4, "history": [{"subject": "HW1 deadline", "content": "<p>?</p>"}]}),
        );
        write(&dir.path().join("cs101/posts/12.json"), json!({"nr": 12}));
        fs::write(dir.path().join("cs101/posts/notes.json"), "{}").unwrap();
        let client = ArchiveClient::new(dir.path());
        (dir, client)
    }

    fn ids(response: FeedResponse) -> Vec<String> {
        response
            .into_records()
            .iter()
            .map(SummaryRecord::display_id)
            .collect()
    }

    #[test]
    fn test_user_status() {
        let (_dir, client) = archive();
        let status = client.user_status().unwrap();
        assert_eq!(status.networks.len(), 1);
        assert_eq!(status.networks[0].id, "cs101");
    }

    #[test]
    fn test_user_status_missing() {
        let dir = TempDir::new().unwrap();
        let client = ArchiveClient::new(dir.path());
        assert!(matches!(client.user_status(), Err(Error::Io(_))));
    }

    #[test]
    fn test_search_requires_every_keyword() {
        let (_dir, client) = archive();
        assert_eq!(ids(client.search_feed("cs101", "hw1").unwrap()), vec!["4", "2"]);
        assert_eq!(ids(client.search_feed("cs101", "HW1 due").unwrap()), vec!["4"]);
        assert!(ids(client.search_feed("cs101", "hw1 midterm").unwrap()).is_empty());
    }

    #[test]
    fn test_search_returns_bare_list() {
        let (_dir, client) = archive();
        assert!(matches!(
            client.search_feed("cs101", "exam").unwrap(),
            FeedResponse::Bare(_)
        ));
    }

    #[test]
    fn test_filtered_feed() {
        let (_dir, client) = archive();
        let response = client.filtered_feed("cs101", "hw1").unwrap();
        assert!(matches!(response, FeedResponse::Wrapped { .. }));
        assert_eq!(ids(response), vec!["4", "2"]);
    }

    #[test]
    fn test_feed_paging() {
        let (_dir, client) = archive();
        assert_eq!(ids(client.feed("cs101", 2, 0).unwrap()), vec!["4", "3"]);
        assert_eq!(ids(client.feed("cs101", 2, 3).unwrap()), vec!["1"]);
    }

    #[test]
    fn test_unknown_network() {
        let (_dir, client) = archive();
        assert!(matches!(
            client.feed("nope", 10, 0),
            Err(Error::UnknownNetwork(ref id)) if id == "nope"
        ));
    }

    #[test]
    fn test_post_lookup() {
        let (_dir, client) = archive();
        let post = client.post("cs101", 4).unwrap();
        assert_eq!(post.subject(), "HW1 deadline");
        assert!(matches!(client.post("cs101", 99), Err(Error::PostNotFound(99))));
    }

    #[test]
    fn test_malformed_post() {
        let (dir, client) = archive();
        fs::write(dir.path().join("cs101/posts/7.json"), "not json").unwrap();
        assert!(matches!(client.post("cs101", 7), Err(Error::Json { .. })));
    }

    #[test]
    fn test_post_numbers_sorted_and_filtered() {
        let (_dir, client) = archive();
        assert_eq!(client.post_numbers("cs101").unwrap(), vec![4, 12]);
    }

    #[test]
    fn test_network_without_feed_dump() {
        let (dir, client) = archive();
        fs::create_dir_all(dir.path().join("empty")).unwrap();
        assert!(client.feed("empty", 10, 0).unwrap().into_records().is_empty());
    }
}
