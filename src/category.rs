//! Shared task category set.
//!
//! One configuration document (`config/categories`) holds the household's
//! category labels. Labels have no identity beyond the normalized string;
//! removing a label never retags tasks already carrying it, they keep the
//! orphaned label. The document is seeded with defaults on first read.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Error, Result};
use crate::store::{from_document, to_document, DocumentStore, FieldUpdate};

pub const CONFIG_COLLECTION: &str = "config";
pub const CATEGORIES_DOC_ID: &str = "categories";

pub const DEFAULT_CATEGORIES: [&str; 5] = ["General", "Cleaning", "Meals", "Garden", "Errands"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryList {
    pub names: Vec<String>,
}

impl Default for CategoryList {
    fn default() -> Self {
        Self {
            names: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Normalize a category label: trim, single leading capital, rest lowercase.
pub fn normalize_label(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument(
            "category name cannot be empty".to_string(),
        ));
    }

    let mut chars = trimmed.chars();
    let mut label = String::with_capacity(trimmed.len());
    if let Some(first) = chars.next() {
        label.extend(first.to_uppercase());
    }
    label.extend(chars.flat_map(char::to_lowercase));
    Ok(label)
}

pub struct CategoryRepo<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> CategoryRepo<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Current category set, lazily seeding the defaults if the document
    /// does not exist yet. Idempotent.
    pub fn list(&self) -> Result<CategoryList> {
        if let Some(document) = self.store.get_one(CONFIG_COLLECTION, CATEGORIES_DOC_ID)? {
            return from_document(document);
        }

        let defaults = CategoryList::default();
        self.store.insert_with_id(
            CONFIG_COLLECTION,
            CATEGORIES_DOC_ID,
            to_document(&defaults)?,
        )?;
        tracing::debug!("seeded default categories");
        Ok(defaults)
    }

    /// Add a category. Case-insensitive duplicates are rejected; the stored
    /// update is a set-union, so a concurrent identical add stays harmless.
    pub fn add(&self, raw: &str) -> Result<String> {
        let label = normalize_label(raw)?;

        let current = self.list()?;
        if current
            .names
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&label))
        {
            return Err(Error::InvalidArgument(format!(
                "category already exists: {label}"
            )));
        }

        self.store.update(
            CONFIG_COLLECTION,
            CATEGORIES_DOC_ID,
            &[(
                "names".to_string(),
                FieldUpdate::ArrayUnion(vec![json!(label)]),
            )],
        )?;
        Ok(label)
    }

    /// Remove a category by normalized name. Tasks keep the orphaned label.
    pub fn remove(&self, raw: &str) -> Result<String> {
        let label = normalize_label(raw)?;

        let current = self.list()?;
        if !current.names.contains(&label) {
            return Err(Error::InvalidArgument(format!("no such category: {label}")));
        }

        self.store.update(
            CONFIG_COLLECTION,
            CATEGORIES_DOC_ID,
            &[(
                "names".to_string(),
                FieldUpdate::ArrayRemove(vec![json!(label)]),
            )],
        )?;
        Ok(label)
    }

    /// True if the label is one of the current categories (exact match
    /// after normalization).
    pub fn contains(&self, raw: &str) -> Result<bool> {
        let label = normalize_label(raw)?;
        Ok(self.list()?.names.contains(&label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonStore;
    use tempfile::TempDir;

    fn setup() -> (TempDir, JsonStore) {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::new(temp.path().join(".hearth"));
        (temp, store)
    }

    #[test]
    fn normalization_trims_and_capitalizes() {
        assert_eq!(normalize_label("  cleaning  ").unwrap(), "Cleaning");
        assert_eq!(normalize_label("YARD WORK").unwrap(), "Yard work");
        assert_eq!(normalize_label("pets").unwrap(), "Pets");
        assert!(normalize_label("   ").is_err());
    }

    #[test]
    fn first_read_seeds_the_defaults_once() {
        let (_temp, store) = setup();
        let repo = CategoryRepo::new(&store);

        let first = repo.list().unwrap();
        assert_eq!(first.names.len(), DEFAULT_CATEGORIES.len());
        assert!(first.names.contains(&"Cleaning".to_string()));

        // Seeding is idempotent even after a mutation
        repo.add("Pets").unwrap();
        let again = repo.list().unwrap();
        assert_eq!(again.names.len(), DEFAULT_CATEGORIES.len() + 1);
    }

    #[test]
    fn add_rejects_case_insensitive_collision() {
        let (_temp, store) = setup();
        let repo = CategoryRepo::new(&store);

        // "Cleaning" is part of the default set
        let result = repo.add("cleaning");
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert_eq!(repo.list().unwrap().names.len(), DEFAULT_CATEGORIES.len());
    }

    #[test]
    fn add_then_remove_restores_the_original_set() {
        let (_temp, store) = setup();
        let repo = CategoryRepo::new(&store);

        let original = repo.list().unwrap();
        repo.add("pets").unwrap();
        assert!(repo.contains("Pets").unwrap());

        repo.remove("PETS").unwrap();
        assert_eq!(repo.list().unwrap(), original);
    }

    #[test]
    fn removing_an_unknown_category_fails() {
        let (_temp, store) = setup();
        let repo = CategoryRepo::new(&store);

        let result = repo.remove("Spelunking");
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }
}
