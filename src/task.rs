//! Task management for hearth.
//!
//! Tasks live in the `tasks` collection. A task is visible to a viewer iff
//! the viewer owns it or it is not private. Only the owner may mutate or
//! delete a task; assignment is the one exception: any viewer may claim an
//! unassigned, non-private task, and only the current assignee may clear an
//! assignment. Ownership itself never transfers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Error, Result};
use crate::identity::UserIdentity;
use crate::merge::merge_visible;
use crate::store::{to_document, DocumentStore, FieldUpdate, OrderBy, Predicate};

pub const TASKS_COLLECTION: &str = "tasks";

/// A household task as stored in the `tasks` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub owner_id: String,
    pub owner_name: String,
    pub is_private: bool,
    #[serde(default)]
    pub assigned_to_id: Option<String>,
    #[serde(default)]
    pub assigned_to_name: Option<String>,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Visibility invariant: owner sees everything of theirs, everyone sees
    /// non-private tasks.
    pub fn visible_to(&self, viewer_uid: &str) -> bool {
        self.owner_id == viewer_uid || !self.is_private
    }
}

#[derive(Debug, Clone)]
pub struct NewTaskInput {
    pub text: String,
    pub is_private: bool,
    pub category: String,
}

#[derive(Debug, Clone, Default)]
pub struct EditTaskInput {
    pub text: Option<String>,
    pub category: Option<String>,
    pub is_private: Option<bool>,
}

/// Repository for task operations against the collaborator store.
pub struct TaskRepo<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> TaskRepo<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Create a task owned by the viewer.
    pub fn create(&self, viewer: &UserIdentity, input: NewTaskInput) -> Result<Task> {
        let text = input.text.trim();
        if text.is_empty() {
            return Err(Error::InvalidArgument(
                "task text cannot be empty".to_string(),
            ));
        }

        let mut task = Task {
            id: String::new(),
            text: text.to_string(),
            completed: false,
            owner_id: viewer.uid.clone(),
            owner_name: viewer.display_name.clone(),
            is_private: input.is_private,
            assigned_to_id: None,
            assigned_to_name: None,
            category: input.category,
            created_at: Utc::now(),
        };

        let id = self.store.insert(TASKS_COLLECTION, to_document(&task)?)?;
        task.id = id;
        Ok(task)
    }

    /// The viewer's task board: owned batch + shared batch, merged.
    ///
    /// Both fetches must succeed before the merge runs; a failed fetch
    /// surfaces the error and leaves whatever the caller displayed last
    /// untouched (stale-but-consistent, never half-updated).
    pub fn list_visible(&self, viewer: &UserIdentity) -> Result<Vec<Task>> {
        let order = OrderBy::desc("createdAt");

        let owned = self.fetch(
            Predicate::new().field("ownerId", viewer.uid.as_str()),
            &order,
        )?;
        let mut shared = self.fetch(Predicate::new().field("isPrivate", false), &order)?;
        // The store only speaks equality filters, so "ownerId != viewer"
        // is applied here; the merge stays defensive about overlap anyway.
        shared.retain(|task| task.owner_id != viewer.uid);

        Ok(merge_visible(owned, shared))
    }

    pub fn get(&self, id: &str) -> Result<Task> {
        let document = self
            .store
            .get_one(TASKS_COLLECTION, id)?
            .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
        crate::store::from_document(document)
    }

    /// Mark a task completed or not. Owner only.
    pub fn set_completed(&self, viewer: &UserIdentity, id: &str, completed: bool) -> Result<Task> {
        let task = self.get(id)?;
        self.ensure_owner(&task, viewer)?;

        self.store.update(
            TASKS_COLLECTION,
            id,
            &[("completed".to_string(), FieldUpdate::Set(json!(completed)))],
        )?;
        self.get(id)
    }

    /// Edit text, category, or privacy. Owner only.
    pub fn edit(&self, viewer: &UserIdentity, id: &str, input: EditTaskInput) -> Result<Task> {
        let task = self.get(id)?;
        self.ensure_owner(&task, viewer)?;

        let mut updates: Vec<(String, FieldUpdate)> = Vec::new();
        if let Some(text) = input.text {
            let text = text.trim().to_string();
            if text.is_empty() {
                return Err(Error::InvalidArgument(
                    "task text cannot be empty".to_string(),
                ));
            }
            updates.push(("text".to_string(), FieldUpdate::Set(json!(text))));
        }
        if let Some(category) = input.category {
            updates.push(("category".to_string(), FieldUpdate::Set(json!(category))));
        }
        if let Some(is_private) = input.is_private {
            updates.push(("isPrivate".to_string(), FieldUpdate::Set(json!(is_private))));
        }
        if updates.is_empty() {
            return Err(Error::InvalidArgument("nothing to edit".to_string()));
        }

        self.store.update(TASKS_COLLECTION, id, &updates)?;
        self.get(id)
    }

    /// Delete a task. Owner only; an already-absent task is a no-op.
    pub fn delete(&self, viewer: &UserIdentity, id: &str) -> Result<()> {
        match self.store.get_one(TASKS_COLLECTION, id)? {
            None => Ok(()),
            Some(document) => {
                let task: Task = crate::store::from_document(document)?;
                self.ensure_owner(&task, viewer)?;
                self.store.remove(TASKS_COLLECTION, id)
            }
        }
    }

    /// Remove all of the viewer's completed tasks in one all-or-nothing
    /// batch. Returns how many were removed.
    pub fn clear_completed(&self, viewer: &UserIdentity) -> Result<usize> {
        let done = self.fetch(
            Predicate::new()
                .field("ownerId", viewer.uid.as_str())
                .field("completed", true),
            &OrderBy::desc("createdAt"),
        )?;
        if done.is_empty() {
            return Ok(0);
        }

        let ids: Vec<String> = done.into_iter().map(|task| task.id).collect();
        self.store.batch_remove(TASKS_COLLECTION, &ids)?;
        Ok(ids.len())
    }

    /// Claim an unassigned task for the viewer.
    ///
    /// Anyone may claim an unassigned, non-private task; a private task can
    /// only be claimed by its owner.
    pub fn claim(&self, viewer: &UserIdentity, id: &str) -> Result<Task> {
        let task = self.get(id)?;

        if task.is_private && task.owner_id != viewer.uid {
            return Err(Error::PrivateTask(id.to_string()));
        }
        if let Some(assignee) = &task.assigned_to_id {
            return Err(Error::AlreadyAssigned {
                task_id: id.to_string(),
                assignee: assignee.clone(),
            });
        }

        self.store.update(
            TASKS_COLLECTION,
            id,
            &[
                (
                    "assignedToId".to_string(),
                    FieldUpdate::Set(json!(viewer.uid)),
                ),
                (
                    "assignedToName".to_string(),
                    FieldUpdate::Set(json!(viewer.display_name)),
                ),
            ],
        )?;
        self.get(id)
    }

    /// Clear an assignment. Only the current assignee may do this.
    pub fn unassign(&self, viewer: &UserIdentity, id: &str) -> Result<Task> {
        let task = self.get(id)?;

        match &task.assigned_to_id {
            None => Err(Error::InvalidArgument(format!(
                "task {id} is not assigned"
            ))),
            Some(assignee) if assignee != &viewer.uid => Err(Error::NotAssignee {
                task_id: id.to_string(),
                assignee: assignee.clone(),
            }),
            Some(_) => {
                self.store.update(
                    TASKS_COLLECTION,
                    id,
                    &[
                        ("assignedToId".to_string(), FieldUpdate::Set(Value::Null)),
                        ("assignedToName".to_string(), FieldUpdate::Set(Value::Null)),
                    ],
                )?;
                self.get(id)
            }
        }
    }

    fn fetch(&self, predicate: Predicate, order: &OrderBy) -> Result<Vec<Task>> {
        let documents = self
            .store
            .get_all(TASKS_COLLECTION, Some(&predicate), Some(order))?;
        documents
            .into_iter()
            .map(crate::store::from_document)
            .collect()
    }

    fn ensure_owner(&self, task: &Task, viewer: &UserIdentity) -> Result<()> {
        if task.owner_id != viewer.uid {
            return Err(Error::NotTaskOwner {
                task_id: task.id.clone(),
                owner: task.owner_name.clone(),
            });
        }
        Ok(())
    }
}
