//! Viewer identity management.
//!
//! The authentication collaborator is external; hearth only consumes its
//! outcome. Viewer resolution order:
//! 1) CLI --user (explicit)
//! 2) HEARTH_USER environment variable
//! 3) Persisted session in `<data-dir>/session.json`
//!
//! Sign-in/sign-out changes are fanned out to identity-changed subscribers
//! so the rest of the app can gate store access on the current viewer.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock;

const SESSION_FILENAME: &str = "session.json";

/// The authenticated user as delivered by the auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub uid: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl UserIdentity {
    /// Build an identity from a display name, deriving a stable uid.
    pub fn from_name(name: &str, email: Option<String>, photo_url: Option<String>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidArgument(
                "display name cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            uid: uid_from_name(name),
            display_name: name.to_string(),
            email,
            photo_url,
        })
    }
}

/// Household member names are unique within a hub, so the uid is a slug of
/// the display name. Keeps `--user alice` readable in scripts and tests.
pub fn uid_from_name(name: &str) -> String {
    let mut uid = String::new();
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            uid.push(ch.to_ascii_lowercase());
        } else if !uid.ends_with('-') && !uid.is_empty() {
            uid.push('-');
        }
    }
    while uid.ends_with('-') {
        uid.pop();
    }
    uid
}

type IdentityCallback = Box<dyn Fn(Option<&UserIdentity>) + Send>;

/// Subscribable "current identity changed" notification.
///
/// Delivers `Some(identity)` on sign-in and `None` on sign-out, once per
/// change, to every registered subscriber.
#[derive(Default)]
pub struct IdentityWatcher {
    subscribers: Vec<IdentityCallback>,
}

impl IdentityWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl Fn(Option<&UserIdentity>) + Send + 'static) {
        self.subscribers.push(Box::new(callback));
    }

    fn notify(&self, identity: Option<&UserIdentity>) {
        for subscriber in &self.subscribers {
            subscriber(identity);
        }
    }
}

/// Session state for one hub: the persisted identity plus change listeners.
pub struct Session {
    data_dir: PathBuf,
    watcher: IdentityWatcher,
}

impl Session {
    pub fn open(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            watcher: IdentityWatcher::new(),
        }
    }

    pub fn subscribe(&mut self, callback: impl Fn(Option<&UserIdentity>) + Send + 'static) {
        self.watcher.subscribe(callback);
    }

    /// Persist the identity delivered by the auth collaborator and notify
    /// subscribers.
    pub fn sign_in(&self, identity: &UserIdentity) -> Result<()> {
        persist_session(&self.data_dir, identity)?;
        self.watcher.notify(Some(identity));
        tracing::info!(uid = %identity.uid, "signed in");
        Ok(())
    }

    /// Clear the persisted identity and notify subscribers.
    ///
    /// Signing out while already signed out is a no-op.
    pub fn sign_out(&self) -> Result<()> {
        let was_signed_in = clear_session(&self.data_dir)?;
        if was_signed_in {
            self.watcher.notify(None);
            tracing::info!("signed out");
        }
        Ok(())
    }

    pub fn current(&self) -> Result<Option<UserIdentity>> {
        load_session(&self.data_dir)
    }
}

/// Resolve the current viewer using CLI flag, environment, then session.
pub fn resolve_viewer(data_dir: &Path, cli_user: Option<&str>) -> Result<Option<UserIdentity>> {
    if let Some(name) = non_empty(cli_user) {
        return Ok(Some(UserIdentity::from_name(name, None, None)?));
    }

    if let Ok(env_user) = std::env::var("HEARTH_USER") {
        if let Some(name) = non_empty(Some(env_user.as_str())) {
            return Ok(Some(UserIdentity::from_name(name, None, None)?));
        }
    }

    load_session(data_dir)
}

/// Like [`resolve_viewer`], but requires a signed-in viewer.
pub fn require_viewer(data_dir: &Path, cli_user: Option<&str>) -> Result<UserIdentity> {
    resolve_viewer(data_dir, cli_user)?.ok_or(Error::NotSignedIn)
}

fn persist_session(data_dir: &Path, identity: &UserIdentity) -> Result<()> {
    let json = serde_json::to_string_pretty(identity)?;
    lock::write_atomic_str(session_path(data_dir), &json)
}

fn load_session(data_dir: &Path) -> Result<Option<UserIdentity>> {
    let path = session_path(data_dir);
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)?;
    let identity: UserIdentity = serde_json::from_str(&raw)?;
    Ok(Some(identity))
}

fn clear_session(data_dir: &Path) -> Result<bool> {
    let path = session_path(data_dir);
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(path)?;
    Ok(true)
}

fn session_path(data_dir: &Path) -> PathBuf {
    data_dir.join(SESSION_FILENAME)
}

fn non_empty(input: Option<&str>) -> Option<&str> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}
