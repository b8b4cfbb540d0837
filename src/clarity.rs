//! Clarity hub: blame-free messages and their resolved agreements.
//!
//! A clarity message is a structured observation/question pair raised by one
//! member. It stays in the `clarity-hub` collection until the household
//! agrees on a resolution; resolving copies it into the append-only
//! `resolved-agreements` collection and deletes it from the active set.
//! Agreements are immutable after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::identity::UserIdentity;
use crate::store::{from_document, to_document, DocumentStore, OrderBy};

pub const CLARITY_COLLECTION: &str = "clarity-hub";
pub const AGREEMENTS_COLLECTION: &str = "resolved-agreements";

/// Status of an active clarity message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Active,
    NeedsDiscussion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClarityMessage {
    pub id: String,
    pub title: String,
    pub observation: String,
    pub question: String,
    #[serde(default)]
    pub suggested_resolution: Option<String>,
    pub author_id: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    pub status: MessageStatus,
}

/// Immutable archival record of a resolved clarity message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAgreement {
    pub id: String,
    pub title: String,
    pub resolution: String,
    pub original_author_id: String,
    pub original_author_name: String,
    pub resolved_by_id: String,
    pub resolved_by_name: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMessageInput {
    pub title: String,
    pub observation: String,
    pub question: String,
    pub suggested_resolution: Option<String>,
}

pub struct ClarityRepo<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ClarityRepo<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Post a new message. Title, observation, and question are required;
    /// nothing is written if any is missing.
    pub fn post(&self, viewer: &UserIdentity, input: NewMessageInput) -> Result<ClarityMessage> {
        let title = required(&input.title, "title")?;
        let observation = required(&input.observation, "observation")?;
        let question = required(&input.question, "question")?;
        let suggested_resolution = input
            .suggested_resolution
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let mut message = ClarityMessage {
            id: String::new(),
            title,
            observation,
            question,
            suggested_resolution,
            author_id: viewer.uid.clone(),
            author_name: viewer.display_name.clone(),
            created_at: Utc::now(),
            status: MessageStatus::Active,
        };

        let id = self
            .store
            .insert(CLARITY_COLLECTION, to_document(&message)?)?;
        message.id = id;
        Ok(message)
    }

    /// Active messages, newest first.
    pub fn list_active(&self) -> Result<Vec<ClarityMessage>> {
        let documents =
            self.store
                .get_all(CLARITY_COLLECTION, None, Some(&OrderBy::desc("createdAt")))?;
        documents.into_iter().map(from_document).collect()
    }

    /// Resolve a message: archive the agreement, then delete the original.
    ///
    /// Any signed-in member may resolve after the household discussion; the
    /// original author and the resolver are both recorded. The archive write
    /// happens first, so a failure between the two steps leaves the message
    /// active rather than losing it.
    pub fn resolve(
        &self,
        viewer: &UserIdentity,
        message_id: &str,
        resolution: &str,
    ) -> Result<ResolvedAgreement> {
        let resolution = required(resolution, "resolution")?;

        let document = self
            .store
            .get_one(CLARITY_COLLECTION, message_id)?
            .ok_or_else(|| Error::MessageNotFound(message_id.to_string()))?;
        let message: ClarityMessage = from_document(document)?;

        let mut agreement = ResolvedAgreement {
            id: String::new(),
            title: message.title,
            resolution,
            original_author_id: message.author_id,
            original_author_name: message.author_name,
            resolved_by_id: viewer.uid.clone(),
            resolved_by_name: viewer.display_name.clone(),
            created_at: message.created_at,
            resolved_at: Utc::now(),
        };

        let id = self
            .store
            .insert(AGREEMENTS_COLLECTION, to_document(&agreement)?)?;
        agreement.id = id;

        self.store.remove(CLARITY_COLLECTION, message_id)?;
        Ok(agreement)
    }

    /// Resolved agreements, newest resolution first.
    pub fn list_resolved(&self) -> Result<Vec<ResolvedAgreement>> {
        let documents = self.store.get_all(
            AGREEMENTS_COLLECTION,
            None,
            Some(&OrderBy::desc("resolvedAt")),
        )?;
        documents.into_iter().map(from_document).collect()
    }
}

fn required(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
