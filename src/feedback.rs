//! Feature-request log.
//!
//! Append-and-list only; entries are never edited. The legacy
//! `sync-session-ideas` collection from earlier revisions is deprecated and
//! neither read nor written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::identity::UserIdentity;
use crate::store::{from_document, to_document, DocumentStore, OrderBy};

pub const FEEDBACK_COLLECTION: &str = "feature-requests";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Improvement,
    Bug,
    Feature,
    Design,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackPriority {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub id: String,
    pub kind: FeedbackKind,
    pub title: String,
    pub description: String,
    pub priority: FeedbackPriority,
    pub author_id: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFeedbackInput {
    pub kind: FeedbackKind,
    pub title: String,
    pub description: String,
    pub priority: FeedbackPriority,
}

pub struct FeedbackRepo<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> FeedbackRepo<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    pub fn add(&self, viewer: &UserIdentity, input: NewFeedbackInput) -> Result<FeedbackEntry> {
        let title = input.title.trim();
        let description = input.description.trim();
        if title.is_empty() || description.is_empty() {
            return Err(Error::InvalidArgument(
                "title and description are required".to_string(),
            ));
        }

        let mut entry = FeedbackEntry {
            id: String::new(),
            kind: input.kind,
            title: title.to_string(),
            description: description.to_string(),
            priority: input.priority,
            author_id: viewer.uid.clone(),
            author_name: viewer.display_name.clone(),
            created_at: Utc::now(),
        };

        let id = self.store.insert(FEEDBACK_COLLECTION, to_document(&entry)?)?;
        entry.id = id;
        Ok(entry)
    }

    pub fn list(&self) -> Result<Vec<FeedbackEntry>> {
        let documents =
            self.store
                .get_all(FEEDBACK_COLLECTION, None, Some(&OrderBy::desc("createdAt")))?;
        documents.into_iter().map(from_document).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonStore;
    use tempfile::TempDir;

    #[test]
    fn add_and_list_feedback() {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::new(temp.path().join(".hearth"));
        let repo = FeedbackRepo::new(&store);
        let alice = UserIdentity::from_name("Alice", None, None).unwrap();

        repo.add(
            &alice,
            NewFeedbackInput {
                kind: FeedbackKind::Feature,
                title: "Emoji reactions".to_string(),
                description: "React to messages with emoji".to_string(),
                priority: FeedbackPriority::Medium,
            },
        )
        .unwrap();

        let entries = repo.list().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, FeedbackKind::Feature);
        assert_eq!(entries[0].author_name, "Alice");
    }

    #[test]
    fn blank_title_is_rejected_locally() {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::new(temp.path().join(".hearth"));
        let repo = FeedbackRepo::new(&store);
        let alice = UserIdentity::from_name("Alice", None, None).unwrap();

        let result = repo.add(
            &alice,
            NewFeedbackInput {
                kind: FeedbackKind::Bug,
                title: "  ".to_string(),
                description: "something broke".to_string(),
                priority: FeedbackPriority::High,
            },
        );
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert!(repo.list().unwrap().is_empty());
    }
}
