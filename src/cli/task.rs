//! Task board commands.
//!
//! All mutations go through [`crate::state::AppState`] so the board shown
//! afterwards always reflects current store state.

use crate::category::CategoryRepo;
use crate::error::Result;
use crate::events::EventKind;
use crate::output::{emit_success, HumanOutput};
use crate::state::AppState;
use crate::task::{EditTaskInput, NewTaskInput, Task};

use super::{CommandContext, GlobalOptions};

pub struct AddOptions {
    pub text: String,
    pub category: Option<String>,
    pub private: bool,
    pub globals: GlobalOptions,
}

pub struct EditOptions {
    pub id: String,
    pub text: Option<String>,
    pub category: Option<String>,
    pub private: bool,
    pub shared: bool,
    pub globals: GlobalOptions,
}

pub fn run_add(opts: AddOptions) -> Result<()> {
    let mut ctx = CommandContext::open(&opts.globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let category = match opts.category {
        Some(raw) => crate::category::normalize_label(&raw)?,
        None => ctx.hub.config.tasks.default_category.clone(),
    };
    let known = CategoryRepo::new(&store).contains(&category)?;
    let is_private = opts.private || ctx.hub.config.tasks.private_by_default;

    let mut state = AppState::signed_in(viewer.clone());
    let outcome = state.add_task(
        &store,
        NewTaskInput {
            text: opts.text,
            is_private,
            category: category.clone(),
        },
    )?;

    ctx.emit_event(
        EventKind::TaskCreated,
        Some(viewer.uid.clone()),
        serde_json::json!({ "id": outcome.id, "category": category, "private": is_private }),
    )?;

    let mut human = HumanOutput::new(outcome.message.clone());
    human.push_summary("category", category.clone());
    human.push_summary("visibility", if is_private { "private" } else { "shared" });
    if !known {
        human.push_warning(format!("category {category} is not in the household set"));
        human.push_next_step(format!("hearth category add {category}"));
    }

    emit_success(ctx.output, "task add", &outcome, Some(&human))
}

pub fn run_list(globals: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer);
    state.refresh_board(&store)?;

    let mut human = HumanOutput::new(format!("{} task(s)", state.board.tasks.len()));
    for task in &state.board.tasks {
        human.push_detail(format_task_line(task));
    }
    if state.board.tasks.is_empty() {
        human.push_next_step("hearth task add \"<text>\"");
    }

    emit_success(ctx.output, "task list", &state.board.tasks, Some(&human))
}

pub fn run_set_completed(globals: &GlobalOptions, id: &str, completed: bool) -> Result<()> {
    let mut ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer.clone());
    let outcome = state.set_task_completed(&store, id, completed)?;

    let kind = if completed {
        EventKind::TaskCompleted
    } else {
        EventKind::TaskReopened
    };
    ctx.emit_event(
        kind,
        Some(viewer.uid),
        serde_json::json!({ "id": id }),
    )?;

    let command = if completed { "task done" } else { "task reopen" };
    let human = HumanOutput::new(outcome.message.clone());
    emit_success(ctx.output, command, &outcome, Some(&human))
}

pub fn run_edit(opts: EditOptions) -> Result<()> {
    let mut ctx = CommandContext::open(&opts.globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let category = opts
        .category
        .as_deref()
        .map(crate::category::normalize_label)
        .transpose()?;
    let unknown_category = match category.as_deref() {
        Some(label) => (!CategoryRepo::new(&store).contains(label)?).then(|| label.to_string()),
        None => None,
    };
    let is_private = match (opts.private, opts.shared) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };

    let mut state = AppState::signed_in(viewer.clone());
    let outcome = state.edit_task(
        &store,
        &opts.id,
        EditTaskInput {
            text: opts.text,
            category,
            is_private,
        },
    )?;

    ctx.emit_event(
        EventKind::TaskEdited,
        Some(viewer.uid),
        serde_json::json!({ "id": opts.id }),
    )?;

    let mut human = HumanOutput::new(outcome.message.clone());
    if let Some(label) = unknown_category {
        human.push_warning(format!("category {label} is not in the household set"));
        human.push_next_step(format!("hearth category add {label}"));
    }
    emit_success(ctx.output, "task edit", &outcome, Some(&human))
}

pub fn run_rm(globals: &GlobalOptions, id: &str) -> Result<()> {
    let mut ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer.clone());
    let outcome = state.delete_task(&store, id)?;

    ctx.emit_event(
        EventKind::TaskDeleted,
        Some(viewer.uid),
        serde_json::json!({ "id": id }),
    )?;

    let human = HumanOutput::new(outcome.message.clone());
    emit_success(ctx.output, "task rm", &outcome, Some(&human))
}

pub fn run_clear(globals: &GlobalOptions) -> Result<()> {
    let mut ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer.clone());
    let outcome = state.clear_completed_tasks(&store)?;

    if outcome.changed {
        ctx.emit_event(
            EventKind::TasksCleared,
            Some(viewer.uid),
            serde_json::json!({ "remaining": state.board.tasks.len() }),
        )?;
    }

    let human = HumanOutput::new(outcome.message.clone());
    emit_success(ctx.output, "task clear", &outcome, Some(&human))
}

pub fn run_claim(globals: &GlobalOptions, id: &str) -> Result<()> {
    let mut ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer.clone());
    let outcome = state.claim_task(&store, id)?;

    ctx.emit_event(
        EventKind::TaskClaimed,
        Some(viewer.uid),
        serde_json::json!({ "id": id }),
    )?;

    let human = HumanOutput::new(outcome.message.clone());
    emit_success(ctx.output, "task claim", &outcome, Some(&human))
}

pub fn run_unassign(globals: &GlobalOptions, id: &str) -> Result<()> {
    let mut ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer.clone());
    let outcome = state.unassign_task(&store, id)?;

    ctx.emit_event(
        EventKind::TaskUnassigned,
        Some(viewer.uid),
        serde_json::json!({ "id": id }),
    )?;

    let human = HumanOutput::new(outcome.message.clone());
    emit_success(ctx.output, "task unassign", &outcome, Some(&human))
}

fn format_task_line(task: &Task) -> String {
    let check = if task.completed { "x" } else { " " };
    let mut line = format!(
        "[{check}] {} | {} | {} | owner: {}",
        task.id, task.text, task.category, task.owner_name
    );
    if task.is_private {
        line.push_str(" | private");
    }
    if let Some(assignee) = &task.assigned_to_name {
        line.push_str(&format!(" | assigned: {assignee}"));
    }
    line
}
