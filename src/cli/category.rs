//! Category set commands.

use crate::error::Result;
use crate::events::EventKind;
use crate::output::{emit_success, HumanOutput};
use crate::state::AppState;

use super::{CommandContext, GlobalOptions};

pub fn run_list(globals: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer);
    state.refresh_categories(&store)?;

    let mut human = HumanOutput::new(format!("{} categories", state.categories.names.len()));
    for name in &state.categories.names {
        human.push_detail(name.clone());
    }

    emit_success(
        ctx.output,
        "category list",
        &state.categories.names,
        Some(&human),
    )
}

pub fn run_add(globals: &GlobalOptions, name: &str) -> Result<()> {
    let mut ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer.clone());
    let outcome = state.add_category(&store, name)?;

    ctx.emit_event(
        EventKind::CategoryAdded,
        Some(viewer.uid),
        serde_json::json!({ "categories": state.categories.names }),
    )?;

    let human = HumanOutput::new(outcome.message.clone());
    emit_success(ctx.output, "category add", &outcome, Some(&human))
}

pub fn run_rm(globals: &GlobalOptions, name: &str) -> Result<()> {
    let mut ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer.clone());
    let outcome = state.remove_category(&store, name)?;

    ctx.emit_event(
        EventKind::CategoryRemoved,
        Some(viewer.uid),
        serde_json::json!({ "categories": state.categories.names }),
    )?;

    let mut human = HumanOutput::new(outcome.message.clone());
    human.push_warning("tasks already using this label keep it".to_string());
    emit_success(ctx.output, "category rm", &outcome, Some(&human))
}
