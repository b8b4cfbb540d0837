//! Clarity hub commands.

use crate::clarity::NewMessageInput;
use crate::error::Result;
use crate::events::EventKind;
use crate::output::{emit_success, HumanOutput};
use crate::state::AppState;

use super::{CommandContext, GlobalOptions};

pub struct PostOptions {
    pub title: String,
    pub observation: String,
    pub question: String,
    pub suggest: Option<String>,
    pub globals: GlobalOptions,
}

pub fn run_post(opts: PostOptions) -> Result<()> {
    let mut ctx = CommandContext::open(&opts.globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer.clone());
    let outcome = state.post_message(
        &store,
        NewMessageInput {
            title: opts.title.clone(),
            observation: opts.observation,
            question: opts.question,
            suggested_resolution: opts.suggest,
        },
    )?;

    ctx.emit_event(
        EventKind::MessagePosted,
        Some(viewer.uid),
        serde_json::json!({ "id": outcome.id, "title": opts.title }),
    )?;

    let mut human = HumanOutput::new(outcome.message.clone());
    human.push_summary("title", opts.title);
    human.push_next_step("hearth clarity list");

    emit_success(ctx.output, "clarity post", &outcome, Some(&human))
}

pub fn run_list(globals: &GlobalOptions, resolved: bool) -> Result<()> {
    let ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer);
    state.refresh_clarity(&store)?;

    if resolved {
        let mut human = HumanOutput::new(format!(
            "{} resolved agreement(s)",
            state.clarity.resolved.len()
        ));
        for agreement in &state.clarity.resolved {
            human.push_detail(format!(
                "{} | {} | resolved by {} | {}",
                agreement.id, agreement.title, agreement.resolved_by_name, agreement.resolution
            ));
        }
        return emit_success(
            ctx.output,
            "clarity list",
            &state.clarity.resolved,
            Some(&human),
        );
    }

    let mut human = HumanOutput::new(format!("{} active message(s)", state.clarity.active.len()));
    for message in &state.clarity.active {
        human.push_detail(format!(
            "{} | {} | by {} | {}",
            message.id, message.title, message.author_name, message.question
        ));
    }
    if state.clarity.active.is_empty() {
        human.push_next_step("hearth clarity post --title ... --observation ... --question ...");
    }

    emit_success(
        ctx.output,
        "clarity list",
        &state.clarity.active,
        Some(&human),
    )
}

pub fn run_resolve(globals: &GlobalOptions, id: &str, resolution: &str) -> Result<()> {
    let mut ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer.clone());
    let outcome = state.resolve_message(&store, id, resolution)?;

    ctx.emit_event(
        EventKind::MessageResolved,
        Some(viewer.uid),
        serde_json::json!({ "message_id": id, "agreement_id": outcome.id }),
    )?;

    let mut human = HumanOutput::new(outcome.message.clone());
    human.push_next_step("hearth clarity list --resolved");

    emit_success(ctx.output, "clarity resolve", &outcome, Some(&human))
}
