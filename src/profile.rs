//! Member profiles and skill tracking.
//!
//! Profiles live in the `profiles` collection keyed by uid and are created
//! lazily on first sign-in. Each profile is mutated only through the owning
//! viewer. The skills list is an embedded array with no partial-entry store
//! support, so every skill operation reads, rewrites, and stores the whole
//! list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Error, Result};
use crate::identity::UserIdentity;
use crate::store::{from_document, to_document, DocumentStore, FieldUpdate};

pub const PROFILES_COLLECTION: &str = "profiles";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
    pub level: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub availability_status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub current_vibe: Option<String>,
    #[serde(default)]
    pub skills: Vec<Skill>,
}

impl UserProfile {
    fn for_identity(identity: &UserIdentity) -> Self {
        Self {
            uid: identity.uid.clone(),
            display_name: identity.display_name.clone(),
            email: identity.email.clone(),
            photo_url: identity.photo_url.clone(),
            availability_status: None,
            notes: None,
            current_vibe: None,
            skills: Vec::new(),
        }
    }
}

/// Free-form profile fields a member can set on themselves.
#[derive(Debug, Clone, Default)]
pub struct ProfileDetailsInput {
    pub availability_status: Option<String>,
    pub notes: Option<String>,
    pub current_vibe: Option<String>,
}

pub struct ProfileRepo<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ProfileRepo<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Fetch the viewer's profile, creating it from the identity on first
    /// sign-in. Idempotent.
    pub fn ensure_profile(&self, identity: &UserIdentity) -> Result<UserProfile> {
        if let Some(document) = self.store.get_one(PROFILES_COLLECTION, &identity.uid)? {
            return from_document(document);
        }

        let profile = UserProfile::for_identity(identity);
        self.store
            .insert_with_id(PROFILES_COLLECTION, &identity.uid, to_document(&profile)?)?;
        tracing::debug!(uid = %identity.uid, "created profile");
        Ok(profile)
    }

    pub fn get(&self, uid: &str) -> Result<UserProfile> {
        let document = self
            .store
            .get_one(PROFILES_COLLECTION, uid)?
            .ok_or_else(|| Error::ProfileNotFound(uid.to_string()))?;
        from_document(document)
    }

    /// Update the viewer's own free-form fields. Unset inputs are left
    /// untouched.
    pub fn update_details(
        &self,
        viewer: &UserIdentity,
        input: ProfileDetailsInput,
    ) -> Result<UserProfile> {
        self.ensure_profile(viewer)?;

        let mut updates: Vec<(String, FieldUpdate)> = Vec::new();
        if let Some(status) = input.availability_status {
            updates.push((
                "availabilityStatus".to_string(),
                FieldUpdate::Set(json!(status)),
            ));
        }
        if let Some(notes) = input.notes {
            updates.push(("notes".to_string(), FieldUpdate::Set(json!(notes))));
        }
        if let Some(vibe) = input.current_vibe {
            updates.push(("currentVibe".to_string(), FieldUpdate::Set(json!(vibe))));
        }
        if updates.is_empty() {
            return Err(Error::InvalidArgument("nothing to update".to_string()));
        }

        self.store
            .update(PROFILES_COLLECTION, &viewer.uid, &updates)?;
        self.get(&viewer.uid)
    }

    /// Add a skill. Rejected if a case-insensitive name match exists.
    pub fn add_skill(&self, viewer: &UserIdentity, name: &str, level: &str) -> Result<UserProfile> {
        let name = required(name, "skill name")?;
        let level = required(level, "skill level")?;

        let mut profile = self.ensure_profile(viewer)?;
        if find_skill(&profile.skills, &name).is_some() {
            return Err(Error::InvalidArgument(format!(
                "skill already exists: {name}"
            )));
        }

        profile.skills.push(Skill {
            name,
            level,
            last_updated: Utc::now(),
        });
        self.write_skills(viewer, &profile.skills)?;
        Ok(profile)
    }

    /// Replace the level of the matching-by-name skill; others untouched.
    pub fn set_skill_level(
        &self,
        viewer: &UserIdentity,
        name: &str,
        level: &str,
    ) -> Result<UserProfile> {
        let name = required(name, "skill name")?;
        let level = required(level, "skill level")?;

        let mut profile = self.ensure_profile(viewer)?;
        let Some(index) = find_skill(&profile.skills, &name) else {
            return Err(Error::InvalidArgument(format!("no such skill: {name}")));
        };

        profile.skills[index].level = level;
        profile.skills[index].last_updated = Utc::now();
        self.write_skills(viewer, &profile.skills)?;
        Ok(profile)
    }

    /// Remove the matching-by-name skill.
    pub fn remove_skill(&self, viewer: &UserIdentity, name: &str) -> Result<UserProfile> {
        let name = required(name, "skill name")?;

        let mut profile = self.ensure_profile(viewer)?;
        let before = profile.skills.len();
        profile
            .skills
            .retain(|skill| !skill.name.eq_ignore_ascii_case(&name));
        if profile.skills.len() == before {
            return Err(Error::InvalidArgument(format!("no such skill: {name}")));
        }

        self.write_skills(viewer, &profile.skills)?;
        Ok(profile)
    }

    /// Whole-list replacement: the store has no partial-field support for
    /// embedded list entries.
    fn write_skills(&self, viewer: &UserIdentity, skills: &[Skill]) -> Result<()> {
        self.store.update(
            PROFILES_COLLECTION,
            &viewer.uid,
            &[(
                "skills".to_string(),
                FieldUpdate::Set(serde_json::to_value(skills)?),
            )],
        )
    }
}

fn find_skill(skills: &[Skill], name: &str) -> Option<usize> {
    skills
        .iter()
        .position(|skill| skill.name.eq_ignore_ascii_case(name))
}

fn required(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
