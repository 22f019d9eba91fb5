//! Data models for forum posts, feed entries and enrolled classes
//!
//! Records arrive from the forum client as loosely shaped JSON: fields go
//! missing, come back as `null`, or carry flags as `0`/`1` instead of booleans.
//! Everything is defaulted here, once, so the renderers can work on plain types.

use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::utils::decode_entities;

pub const NO_SUBJECT: &str = "(no subject)";

/// Treat an explicit `null` the same as an absent field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Loose truthiness for flag fields: `true`, non-zero numbers and non-empty
/// strings are set, everything else is unset.
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Null => false,
    })
}

fn default_post_type() -> String {
    String::from("note")
}

/// Post identifier as shown to users (`@142`). The forum hands these out as
/// numbers on full posts but as opaque strings on some feed entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Number(u64),
    Text(String),
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Number(n) => write!(f, "{n}"),
            PostId::Text(s) => f.write_str(s),
        }
    }
}

/// One edit of a post or answer. Index 0 of a history is the current version.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Revision {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Post {
    #[serde(default)]
    pub nr: Option<PostId>,
    #[serde(default, deserialize_with = "nullable")]
    pub history: Vec<Revision>,
    #[serde(rename = "type", default = "default_post_type", deserialize_with = "nullable")]
    pub kind: String,
    #[serde(default, deserialize_with = "nullable")]
    pub folders: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub created: String,
    #[serde(default, deserialize_with = "nullable")]
    pub children: Vec<Child>,
}

impl Post {
    pub fn current(&self) -> Option<&Revision> {
        self.history.first()
    }

    /// Entity-decoded subject of the current revision.
    pub fn subject(&self) -> String {
        match self.current().and_then(|rev| rev.subject.as_deref()) {
            Some(subject) => decode_entities(subject),
            None => NO_SUBJECT.to_string(),
        }
    }

    pub fn display_id(&self) -> String {
        self.nr
            .as_ref()
            .map_or_else(|| String::from("?"), ToString::to_string)
    }

    /// First instructor answer. Later `i_answer` children are ignored.
    pub fn instructor_answer(&self) -> Option<&Child> {
        self.first_child(ChildKind::InstructorAnswer)
    }

    /// First student answer. Later `s_answer` children are ignored.
    pub fn student_answer(&self) -> Option<&Child> {
        self.first_child(ChildKind::StudentAnswer)
    }

    pub fn followups(&self) -> impl Iterator<Item = &Child> {
        self.children
            .iter()
            .filter(|child| child.kind == ChildKind::Followup)
    }

    fn first_child(&self, kind: ChildKind) -> Option<&Child> {
        self.children.iter().find(|child| child.kind == kind)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ChildKind {
    #[serde(rename = "i_answer")]
    InstructorAnswer,
    #[serde(rename = "s_answer")]
    StudentAnswer,
    #[serde(rename = "followup")]
    Followup,
    #[default]
    #[serde(other)]
    Other,
}

/// A node under a post: an answer (revisioned content) or a follow-up
/// (flat `subject` plus replies).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Child {
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub kind: ChildKind,
    #[serde(default, deserialize_with = "nullable")]
    pub history: Vec<Revision>,
    #[serde(default, deserialize_with = "nullable")]
    pub subject: String,
    /// Endorser identifiers; only the count is ever shown.
    #[serde(default, deserialize_with = "nullable")]
    pub tag_endorse: Vec<Value>,
    #[serde(default, deserialize_with = "nullable")]
    pub children: Vec<Reply>,
}

impl Child {
    pub fn current(&self) -> Option<&Revision> {
        self.history.first()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Reply {
    #[serde(default, deserialize_with = "nullable")]
    pub subject: String,
}

/// One entry of a feed listing or a keyword search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryRecord {
    #[serde(default)]
    pub nr: Option<PostId>,
    #[serde(default)]
    pub id: Option<PostId>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default, alias = "content_snippet", deserialize_with = "nullable")]
    pub content_snipet: String,
    #[serde(default, deserialize_with = "nullable")]
    pub folders: Vec<String>,
    #[serde(default, deserialize_with = "truthy")]
    pub has_i: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub has_s: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub no_answer: bool,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub kind: String,
    #[serde(default, deserialize_with = "nullable")]
    pub modified: String,
    #[serde(default, deserialize_with = "nullable")]
    pub created: String,
}

impl SummaryRecord {
    /// `nr`, falling back to the internal `id`.
    pub fn display_id(&self) -> String {
        self.nr
            .as_ref()
            .or(self.id.as_ref())
            .map_or_else(|| String::from("?"), ToString::to_string)
    }

    pub fn subject(&self) -> String {
        decode_entities(self.subject.as_deref().unwrap_or(NO_SUBJECT))
    }

    /// Last-modified time, or creation time when the entry was never edited.
    pub fn timestamp(&self) -> &str {
        if self.modified.is_empty() {
            &self.created
        } else {
            &self.modified
        }
    }

    pub fn in_folder(&self, folder: &str) -> bool {
        self.folders.iter().any(|f| f == folder)
    }
}

/// Feed endpoints disagree on shape: search returns a bare list, the
/// chronological and folder feeds wrap it under `feed`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FeedResponse {
    Bare(Vec<SummaryRecord>),
    Wrapped {
        #[serde(default, deserialize_with = "nullable")]
        feed: Vec<SummaryRecord>,
    },
}

impl FeedResponse {
    pub fn into_records(self) -> Vec<SummaryRecord> {
        match self {
            FeedResponse::Bare(records) => records,
            FeedResponse::Wrapped { feed } => feed,
        }
    }
}

/// An enrolled class ("network").
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassInfo {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub term: String,
    #[serde(default, deserialize_with = "nullable")]
    pub course_number: String,
    #[serde(default, deserialize_with = "nullable")]
    pub status: String,
    #[serde(default, deserialize_with = "nullable")]
    pub folders: Vec<String>,
}

impl ClassInfo {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserStatus {
    #[serde(default, deserialize_with = "nullable")]
    pub networks: Vec<ClassInfo>,
}
