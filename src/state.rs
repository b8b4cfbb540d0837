//! Client-local application state.
//!
//! One explicit struct with named sub-states per feature area, mutated only
//! through the action methods below. Every action validates, writes through
//! the store, then re-fetches the affected area from current store state;
//! nothing is cached across reads. If a fetch fails, the previously held
//! sub-state is left untouched (stale-but-consistent, never half-updated).
//!
//! Actions return an [`ActionOutcome`] for the presentation layer instead of
//! surfacing ad-hoc alerts; failures travel as [`crate::error::Error`].

use serde::Serialize;

use crate::category::{CategoryList, CategoryRepo};
use crate::clarity::{ClarityMessage, ClarityRepo, NewMessageInput, ResolvedAgreement};
use crate::creative::{CreativePost, CreativeRepo};
use crate::error::Result;
use crate::feedback::{FeedbackEntry, FeedbackRepo, NewFeedbackInput};
use crate::identity::UserIdentity;
use crate::profile::{ProfileDetailsInput, ProfileRepo, UserProfile};
use crate::store::DocumentStore;
use crate::task::{EditTaskInput, NewTaskInput, Task, TaskRepo};

/// Structured result of one user action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionOutcome {
    pub changed: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ActionOutcome {
    fn changed(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            changed: true,
            message: message.into(),
            id,
        }
    }

    fn unchanged(message: impl Into<String>) -> Self {
        Self {
            changed: false,
            message: message.into(),
            id: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskBoardState {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default)]
pub struct ClarityState {
    pub active: Vec<ClarityMessage>,
    pub resolved: Vec<ResolvedAgreement>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryState {
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Clone, Default)]
pub struct FeedbackState {
    pub entries: Vec<FeedbackEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct CreativeState {
    pub posts: Vec<CreativePost>,
}

/// Per-session application state, gated on the current viewer.
#[derive(Default)]
pub struct AppState {
    pub viewer: Option<UserIdentity>,
    pub board: TaskBoardState,
    pub clarity: ClarityState,
    pub categories: CategoryState,
    pub profile: ProfileState,
    pub feedback: FeedbackState,
    pub creative: CreativeState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(viewer: UserIdentity) -> Self {
        Self {
            viewer: Some(viewer),
            ..Self::default()
        }
    }

    /// React to an identity change: a new viewer starts from empty
    /// sub-states, a sign-out drops everything.
    pub fn set_viewer(&mut self, viewer: Option<UserIdentity>) {
        *self = match viewer {
            Some(viewer) => Self::signed_in(viewer),
            None => Self::new(),
        };
    }

    fn viewer(&self) -> Result<&UserIdentity> {
        self.viewer.as_ref().ok_or(crate::error::Error::NotSignedIn)
    }

    // =========================================================================
    // Task board
    // =========================================================================

    /// Re-run fetch + merge for the viewer's board.
    pub fn refresh_board(&mut self, store: &dyn DocumentStore) -> Result<()> {
        let viewer = self.viewer()?;
        // Fetch fully before assigning so a failure leaves the old board
        let tasks = TaskRepo::new(store).list_visible(viewer)?;
        self.board.tasks = tasks;
        Ok(())
    }

    pub fn add_task(
        &mut self,
        store: &dyn DocumentStore,
        input: NewTaskInput,
    ) -> Result<ActionOutcome> {
        let task = TaskRepo::new(store).create(self.viewer()?, input)?;
        self.refresh_board(store)?;
        Ok(ActionOutcome::changed(
            format!("added task {}", task.id),
            Some(task.id),
        ))
    }

    pub fn set_task_completed(
        &mut self,
        store: &dyn DocumentStore,
        id: &str,
        completed: bool,
    ) -> Result<ActionOutcome> {
        let task = TaskRepo::new(store).set_completed(self.viewer()?, id, completed)?;
        self.refresh_board(store)?;
        let verb = if completed { "completed" } else { "reopened" };
        Ok(ActionOutcome::changed(
            format!("{verb} task {}", task.id),
            Some(task.id),
        ))
    }

    pub fn edit_task(
        &mut self,
        store: &dyn DocumentStore,
        id: &str,
        input: EditTaskInput,
    ) -> Result<ActionOutcome> {
        let task = TaskRepo::new(store).edit(self.viewer()?, id, input)?;
        self.refresh_board(store)?;
        Ok(ActionOutcome::changed(
            format!("edited task {}", task.id),
            Some(task.id),
        ))
    }

    pub fn delete_task(&mut self, store: &dyn DocumentStore, id: &str) -> Result<ActionOutcome> {
        TaskRepo::new(store).delete(self.viewer()?, id)?;
        self.refresh_board(store)?;
        Ok(ActionOutcome::changed(
            format!("removed task {id}"),
            Some(id.to_string()),
        ))
    }

    pub fn clear_completed_tasks(&mut self, store: &dyn DocumentStore) -> Result<ActionOutcome> {
        let removed = TaskRepo::new(store).clear_completed(self.viewer()?)?;
        self.refresh_board(store)?;
        if removed == 0 {
            return Ok(ActionOutcome::unchanged("no completed tasks to clear"));
        }
        Ok(ActionOutcome::changed(
            format!("cleared {removed} completed task(s)"),
            None,
        ))
    }

    pub fn claim_task(&mut self, store: &dyn DocumentStore, id: &str) -> Result<ActionOutcome> {
        let task = TaskRepo::new(store).claim(self.viewer()?, id)?;
        self.refresh_board(store)?;
        Ok(ActionOutcome::changed(
            format!(
                "task {} assigned to {}",
                task.id,
                task.assigned_to_name.as_deref().unwrap_or("?")
            ),
            Some(task.id),
        ))
    }

    pub fn unassign_task(&mut self, store: &dyn DocumentStore, id: &str) -> Result<ActionOutcome> {
        let task = TaskRepo::new(store).unassign(self.viewer()?, id)?;
        self.refresh_board(store)?;
        Ok(ActionOutcome::changed(
            format!("cleared assignment on task {}", task.id),
            Some(task.id),
        ))
    }

    // =========================================================================
    // Clarity hub
    // =========================================================================

    pub fn refresh_clarity(&mut self, store: &dyn DocumentStore) -> Result<()> {
        self.viewer()?;
        let repo = ClarityRepo::new(store);
        let active = repo.list_active()?;
        let resolved = repo.list_resolved()?;
        self.clarity.active = active;
        self.clarity.resolved = resolved;
        Ok(())
    }

    pub fn post_message(
        &mut self,
        store: &dyn DocumentStore,
        input: NewMessageInput,
    ) -> Result<ActionOutcome> {
        let message = ClarityRepo::new(store).post(self.viewer()?, input)?;
        self.refresh_clarity(store)?;
        Ok(ActionOutcome::changed(
            format!("posted message {}", message.id),
            Some(message.id),
        ))
    }

    pub fn resolve_message(
        &mut self,
        store: &dyn DocumentStore,
        id: &str,
        resolution: &str,
    ) -> Result<ActionOutcome> {
        let agreement = ClarityRepo::new(store).resolve(self.viewer()?, id, resolution)?;
        self.refresh_clarity(store)?;
        Ok(ActionOutcome::changed(
            format!("resolved into agreement {}", agreement.id),
            Some(agreement.id),
        ))
    }

    // =========================================================================
    // Categories
    // =========================================================================

    pub fn refresh_categories(&mut self, store: &dyn DocumentStore) -> Result<()> {
        self.viewer()?;
        let list: CategoryList = CategoryRepo::new(store).list()?;
        self.categories.names = list.names;
        Ok(())
    }

    pub fn add_category(&mut self, store: &dyn DocumentStore, raw: &str) -> Result<ActionOutcome> {
        self.viewer()?;
        let label = CategoryRepo::new(store).add(raw)?;
        self.refresh_categories(store)?;
        Ok(ActionOutcome::changed(format!("added category {label}"), None))
    }

    pub fn remove_category(
        &mut self,
        store: &dyn DocumentStore,
        raw: &str,
    ) -> Result<ActionOutcome> {
        self.viewer()?;
        let label = CategoryRepo::new(store).remove(raw)?;
        self.refresh_categories(store)?;
        Ok(ActionOutcome::changed(
            format!("removed category {label}"),
            None,
        ))
    }

    // =========================================================================
    // Profile and skills
    // =========================================================================

    pub fn refresh_profile(&mut self, store: &dyn DocumentStore) -> Result<()> {
        let viewer = self.viewer()?;
        let profile = ProfileRepo::new(store).ensure_profile(viewer)?;
        self.profile.profile = Some(profile);
        Ok(())
    }

    pub fn update_profile(
        &mut self,
        store: &dyn DocumentStore,
        input: ProfileDetailsInput,
    ) -> Result<ActionOutcome> {
        let profile = ProfileRepo::new(store).update_details(self.viewer()?, input)?;
        self.profile.profile = Some(profile);
        Ok(ActionOutcome::changed("updated profile", None))
    }

    pub fn add_skill(
        &mut self,
        store: &dyn DocumentStore,
        name: &str,
        level: &str,
    ) -> Result<ActionOutcome> {
        ProfileRepo::new(store).add_skill(self.viewer()?, name, level)?;
        self.refresh_profile(store)?;
        Ok(ActionOutcome::changed(format!("added skill {name}"), None))
    }

    pub fn set_skill_level(
        &mut self,
        store: &dyn DocumentStore,
        name: &str,
        level: &str,
    ) -> Result<ActionOutcome> {
        ProfileRepo::new(store).set_skill_level(self.viewer()?, name, level)?;
        self.refresh_profile(store)?;
        Ok(ActionOutcome::changed(
            format!("set skill {name} to {level}"),
            None,
        ))
    }

    pub fn remove_skill(
        &mut self,
        store: &dyn DocumentStore,
        name: &str,
    ) -> Result<ActionOutcome> {
        ProfileRepo::new(store).remove_skill(self.viewer()?, name)?;
        self.refresh_profile(store)?;
        Ok(ActionOutcome::changed(format!("removed skill {name}"), None))
    }

    // =========================================================================
    // Feedback and creative corner
    // =========================================================================

    pub fn refresh_feedback(&mut self, store: &dyn DocumentStore) -> Result<()> {
        self.viewer()?;
        let entries = FeedbackRepo::new(store).list()?;
        self.feedback.entries = entries;
        Ok(())
    }

    pub fn log_feedback(
        &mut self,
        store: &dyn DocumentStore,
        input: NewFeedbackInput,
    ) -> Result<ActionOutcome> {
        let entry = FeedbackRepo::new(store).add(self.viewer()?, input)?;
        self.refresh_feedback(store)?;
        Ok(ActionOutcome::changed(
            format!("logged feedback {}", entry.id),
            Some(entry.id),
        ))
    }

    pub fn refresh_creative(&mut self, store: &dyn DocumentStore) -> Result<()> {
        self.viewer()?;
        let posts = CreativeRepo::new(store).list()?;
        self.creative.posts = posts;
        Ok(())
    }

    pub fn share_post(
        &mut self,
        store: &dyn DocumentStore,
        title: &str,
        content: &str,
        kind: &str,
    ) -> Result<ActionOutcome> {
        let post = CreativeRepo::new(store).post(self.viewer()?, title, content, kind)?;
        self.refresh_creative(store)?;
        Ok(ActionOutcome::changed(
            format!("shared post {}", post.id),
            Some(post.id),
        ))
    }

    pub fn delete_post(&mut self, store: &dyn DocumentStore, id: &str) -> Result<ActionOutcome> {
        CreativeRepo::new(store).delete(self.viewer()?, id)?;
        self.refresh_creative(store)?;
        Ok(ActionOutcome::changed(
            format!("removed post {id}"),
            Some(id.to_string()),
        ))
    }
}
