//! Sign-in, sign-out, and whoami commands.
//!
//! Signing in persists the identity in the hub's session file and lazily
//! creates the member's profile.

use crate::error::Result;
use crate::events::EventKind;
use crate::identity::{Session, UserIdentity};
use crate::output::{emit_success, HumanOutput};
use crate::profile::ProfileRepo;

use super::{CommandContext, GlobalOptions};

pub struct SigninOptions {
    pub name: String,
    pub email: Option<String>,
    pub photo_url: Option<String>,
    pub globals: GlobalOptions,
}

pub fn run_signin(opts: SigninOptions) -> Result<()> {
    let mut ctx = CommandContext::open(&opts.globals)?;

    let identity = UserIdentity::from_name(&opts.name, opts.email, opts.photo_url)?;
    let session = Session::open(ctx.hub.data_dir());
    session.sign_in(&identity)?;

    let store = ctx.hub.store();
    let profile = ProfileRepo::new(&store).ensure_profile(&identity)?;

    ctx.emit_event(
        EventKind::SignedIn,
        Some(identity.uid.clone()),
        serde_json::json!({ "uid": identity.uid }),
    )?;

    let mut human = HumanOutput::new(format!("signed in as {}", identity.display_name));
    human.push_summary("uid", identity.uid.clone());
    if let Some(email) = &identity.email {
        human.push_summary("email", email.clone());
    }
    if profile.skills.is_empty() {
        human.push_next_step("hearth skill add <name> <level>");
    }
    human.push_next_step("hearth task list");

    emit_success(ctx.output, "signin", &identity, Some(&human))
}

pub fn run_signout(globals: &GlobalOptions) -> Result<()> {
    let mut ctx = CommandContext::open(globals)?;

    let session = Session::open(ctx.hub.data_dir());
    let previous = session.current()?;
    session.sign_out()?;

    if let Some(identity) = &previous {
        ctx.emit_event(
            EventKind::SignedOut,
            Some(identity.uid.clone()),
            serde_json::json!({ "uid": identity.uid }),
        )?;
    }

    let header = match &previous {
        Some(identity) => format!("signed out {}", identity.display_name),
        None => "not signed in; nothing to do".to_string(),
    };
    let human = HumanOutput::new(header);

    #[derive(serde::Serialize)]
    struct SignoutReport {
        was_signed_in: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        uid: Option<String>,
    }

    let report = SignoutReport {
        was_signed_in: previous.is_some(),
        uid: previous.map(|identity| identity.uid),
    };
    emit_success(ctx.output, "signout", &report, Some(&human))
}

pub fn run_whoami(globals: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::open(globals)?;
    let viewer = ctx.require_viewer()?;

    let mut human = HumanOutput::new(format!("{} ({})", viewer.display_name, viewer.uid));
    if let Some(email) = &viewer.email {
        human.push_summary("email", email.clone());
    }

    emit_success(ctx.output, "whoami", &viewer, Some(&human))
}
