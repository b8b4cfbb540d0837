//! Creative corner: shared posts (recipes, drawings, poems, links).
//!
//! Posts are shared with the whole household; only the author may remove
//! one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::identity::UserIdentity;
use crate::store::{from_document, to_document, DocumentStore, OrderBy};

pub const CREATIVE_COLLECTION: &str = "creative-posts";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativePost {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Free-form kind label: "recipe", "poem", "photo", ...
    pub kind: String,
    pub author_id: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

pub struct CreativeRepo<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> CreativeRepo<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    pub fn post(
        &self,
        viewer: &UserIdentity,
        title: &str,
        content: &str,
        kind: &str,
    ) -> Result<CreativePost> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(Error::InvalidArgument(
                "title and content are required".to_string(),
            ));
        }

        let mut post = CreativePost {
            id: String::new(),
            title: title.to_string(),
            content: content.to_string(),
            kind: kind.trim().to_lowercase(),
            author_id: viewer.uid.clone(),
            author_name: viewer.display_name.clone(),
            created_at: Utc::now(),
        };

        let id = self.store.insert(CREATIVE_COLLECTION, to_document(&post)?)?;
        post.id = id;
        Ok(post)
    }

    pub fn list(&self) -> Result<Vec<CreativePost>> {
        let documents =
            self.store
                .get_all(CREATIVE_COLLECTION, None, Some(&OrderBy::desc("createdAt")))?;
        documents.into_iter().map(from_document).collect()
    }

    /// Remove a post. Author only; an already-absent post is a no-op.
    pub fn delete(&self, viewer: &UserIdentity, id: &str) -> Result<()> {
        match self.store.get_one(CREATIVE_COLLECTION, id)? {
            None => Ok(()),
            Some(document) => {
                let post: CreativePost = from_document(document)?;
                if post.author_id != viewer.uid {
                    return Err(Error::NotPostAuthor {
                        post_id: id.to_string(),
                        author: post.author_name,
                    });
                }
                self.store.remove(CREATIVE_COLLECTION, id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::JsonStore;
    use tempfile::TempDir;

    #[test]
    fn only_the_author_deletes_a_post() {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::new(temp.path().join(".hearth"));
        let repo = CreativeRepo::new(&store);
        let alice = UserIdentity::from_name("Alice", None, None).unwrap();
        let bob = UserIdentity::from_name("Bob", None, None).unwrap();

        let post = repo
            .post(&alice, "Soup recipe", "Carrots, thyme, patience", "recipe")
            .unwrap();

        let result = repo.delete(&bob, &post.id);
        assert!(matches!(result, Err(Error::NotPostAuthor { .. })));
        assert_eq!(repo.list().unwrap().len(), 1);

        repo.delete(&alice, &post.id).unwrap();
        assert!(repo.list().unwrap().is_empty());

        // Absent post: no-op
        repo.delete(&alice, &post.id).unwrap();
    }
}
