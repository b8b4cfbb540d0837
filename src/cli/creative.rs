//! Creative corner commands.

use crate::error::Result;
use crate::events::EventKind;
use crate::output::{emit_success, HumanOutput};
use crate::state::AppState;

use super::{CommandContext, GlobalOptions};

pub struct PostOptions {
    pub title: String,
    pub content: String,
    pub kind: String,
    pub globals: GlobalOptions,
}

pub fn run_post(opts: PostOptions) -> Result<()> {
    let mut ctx = CommandContext::open(&opts.globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer.clone());
    let outcome = state.share_post(&store, &opts.title, &opts.content, &opts.kind)?;

    ctx.emit_event(
        EventKind::PostShared,
        Some(viewer.uid),
        serde_json::json!({ "id": outcome.id, "kind": opts.kind }),
    )?;

    let human = HumanOutput::new(outcome.message.clone());
    emit_success(ctx.output, "share post", &outcome, Some(&human))
}

pub fn run_list(globals: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer);
    state.refresh_creative(&store)?;

    let mut human = HumanOutput::new(format!("{} post(s)", state.creative.posts.len()));
    for post in &state.creative.posts {
        human.push_detail(format!(
            "{} | {} | {} | by {}",
            post.id, post.kind, post.title, post.author_name
        ));
    }

    emit_success(ctx.output, "share list", &state.creative.posts, Some(&human))
}

pub fn run_rm(globals: &GlobalOptions, id: &str) -> Result<()> {
    let mut ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer.clone());
    let outcome = state.delete_post(&store, id)?;

    ctx.emit_event(
        EventKind::PostDeleted,
        Some(viewer.uid),
        serde_json::json!({ "id": id }),
    )?;

    let human = HumanOutput::new(outcome.message.clone());
    emit_success(ctx.output, "share rm", &outcome, Some(&human))
}
