//! Feedback log commands.

use crate::error::Result;
use crate::events::EventKind;
use crate::feedback::{FeedbackKind, FeedbackPriority, NewFeedbackInput};
use crate::output::{emit_success, HumanOutput};
use crate::state::AppState;

use super::{CommandContext, GlobalOptions};

pub struct AddOptions {
    pub kind: FeedbackKind,
    pub title: String,
    pub description: String,
    pub priority: FeedbackPriority,
    pub globals: GlobalOptions,
}

pub fn run_add(opts: AddOptions) -> Result<()> {
    let mut ctx = CommandContext::open(&opts.globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer.clone());
    let outcome = state.log_feedback(
        &store,
        NewFeedbackInput {
            kind: opts.kind,
            title: opts.title.clone(),
            description: opts.description,
            priority: opts.priority,
        },
    )?;

    ctx.emit_event(
        EventKind::FeedbackLogged,
        Some(viewer.uid),
        serde_json::json!({ "id": outcome.id, "title": opts.title }),
    )?;

    let human = HumanOutput::new(outcome.message.clone());
    emit_success(ctx.output, "feedback add", &outcome, Some(&human))
}

pub fn run_list(globals: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer);
    state.refresh_feedback(&store)?;

    let mut human = HumanOutput::new(format!("{} entr(ies)", state.feedback.entries.len()));
    for entry in &state.feedback.entries {
        human.push_detail(format!(
            "{} | {:?}/{:?} | {} | by {}",
            entry.id, entry.kind, entry.priority, entry.title, entry.author_name
        ));
    }

    emit_success(
        ctx.output,
        "feedback list",
        &state.feedback.entries,
        Some(&human),
    )
}
