//! Profile and skill commands.
//!
//! Profile mutations always target the viewer's own profile; `profile show`
//! may read any member's.

use crate::error::Result;
use crate::events::EventKind;
use crate::output::{emit_success, HumanOutput};
use crate::profile::{ProfileDetailsInput, ProfileRepo, UserProfile};
use crate::state::AppState;

use super::{CommandContext, GlobalOptions};

pub struct SetOptions {
    pub status: Option<String>,
    pub notes: Option<String>,
    pub vibe: Option<String>,
    pub globals: GlobalOptions,
}

pub fn run_show(globals: &GlobalOptions, uid: Option<&str>) -> Result<()> {
    let ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();
    let repo = ProfileRepo::new(&store);

    let profile = match uid {
        Some(uid) => repo.get(uid)?,
        None => repo.ensure_profile(&viewer)?,
    };

    let human = describe_profile(&profile);
    emit_success(ctx.output, "profile show", &profile, Some(&human))
}

pub fn run_set(opts: SetOptions) -> Result<()> {
    let mut ctx = CommandContext::open(&opts.globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer.clone());
    let outcome = state.update_profile(
        &store,
        ProfileDetailsInput {
            availability_status: opts.status,
            notes: opts.notes,
            current_vibe: opts.vibe,
        },
    )?;

    ctx.emit_event(
        EventKind::ProfileUpdated,
        Some(viewer.uid),
        serde_json::json!({ "uid": state.profile.profile.as_ref().map(|p| p.uid.clone()) }),
    )?;

    let human = HumanOutput::new(outcome.message.clone());
    emit_success(ctx.output, "profile set", &outcome, Some(&human))
}

pub fn run_skill_list(globals: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let profile = ProfileRepo::new(&store).ensure_profile(&viewer)?;

    let mut human = HumanOutput::new(format!("{} skill(s)", profile.skills.len()));
    for skill in &profile.skills {
        human.push_detail(format!("{} | {}", skill.name, skill.level));
    }
    if profile.skills.is_empty() {
        human.push_next_step("hearth skill add <name> <level>");
    }

    emit_success(ctx.output, "skill list", &profile.skills, Some(&human))
}

pub fn run_skill_add(globals: &GlobalOptions, name: &str, level: &str) -> Result<()> {
    let mut ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer.clone());
    let outcome = state.add_skill(&store, name, level)?;

    ctx.emit_event(
        EventKind::SkillAdded,
        Some(viewer.uid),
        serde_json::json!({ "name": name, "level": level }),
    )?;

    let human = HumanOutput::new(outcome.message.clone());
    emit_success(ctx.output, "skill add", &outcome, Some(&human))
}

pub fn run_skill_set(globals: &GlobalOptions, name: &str, level: &str) -> Result<()> {
    let mut ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer.clone());
    let outcome = state.set_skill_level(&store, name, level)?;

    ctx.emit_event(
        EventKind::SkillUpdated,
        Some(viewer.uid),
        serde_json::json!({ "name": name, "level": level }),
    )?;

    let human = HumanOutput::new(outcome.message.clone());
    emit_success(ctx.output, "skill set", &outcome, Some(&human))
}

pub fn run_skill_rm(globals: &GlobalOptions, name: &str) -> Result<()> {
    let mut ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;
    let store = ctx.hub.store();

    let mut state = AppState::signed_in(viewer.clone());
    let outcome = state.remove_skill(&store, name)?;

    ctx.emit_event(
        EventKind::SkillRemoved,
        Some(viewer.uid),
        serde_json::json!({ "name": name }),
    )?;

    let human = HumanOutput::new(outcome.message.clone());
    emit_success(ctx.output, "skill rm", &outcome, Some(&human))
}

fn describe_profile(profile: &UserProfile) -> HumanOutput {
    let mut human = HumanOutput::new(format!("{} ({})", profile.display_name, profile.uid));
    if let Some(email) = &profile.email {
        human.push_summary("email", email.clone());
    }
    if let Some(status) = &profile.availability_status {
        human.push_summary("status", status.clone());
    }
    if let Some(vibe) = &profile.current_vibe {
        human.push_summary("vibe", vibe.clone());
    }
    if let Some(notes) = &profile.notes {
        human.push_summary("notes", notes.clone());
    }
    for skill in &profile.skills {
        human.push_detail(format!("{} | {}", skill.name, skill.level));
    }
    human
}
