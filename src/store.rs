//! Document store boundary for hearth
//!
//! All entity data lives in named collections behind the [`DocumentStore`]
//! trait: the hosted backend is an external collaborator, and the rest of the
//! crate only ever talks CRUD + filtered/ordered queries. The bundled
//! [`JsonStore`] keeps one JSON file per collection under the hub data
//! directory:
//!
//! ```text
//! .hearth/                      # Hub data directory
//!   session.json                # Current signed-in identity
//!   tasks.json                  # One file per collection
//!   clarity-hub.json
//!   resolved-agreements.json
//!   profiles.json
//!   config.json
//!   feature-requests.json
//!   creative-posts.json
//! ```
//!
//! Every mutation is a locked read-modify-write of the whole collection file
//! followed by an atomic rename, which is what gives hearth its only
//! concurrency guarantee: a single update to one document is atomic,
//! multi-document sequences are not.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ulid::Ulid;

use crate::error::{Error, Result};
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};

const STORE_SCHEMA_VERSION: &str = "hearth.store.v1";

/// A document is a plain JSON object; typed entities (de)serialize at the
/// repository boundary rather than trusting ad-hoc field access downstream.
pub type Document = Map<String, Value>;

/// Equality filters on named fields, ANDed together.
#[derive(Debug, Clone, Default)]
pub struct Predicate {
    filters: Vec<(String, Value)>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality filter on a named field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((name.into(), value.into()));
        self
    }

    /// True if the document satisfies every filter.
    pub fn matches(&self, document: &Document) -> bool {
        self.filters
            .iter()
            .all(|(name, expected)| document.get(name) == Some(expected))
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Sort direction for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Single-field ordering for a query.
#[derive(Debug, Clone)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Descending,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Ascending,
        }
    }
}

/// A partial-field mutation applied by [`DocumentStore::update`].
///
/// `ArrayUnion` and `ArrayRemove` are the special-cased embedded-set
/// operations: union skips values already present, remove drops every
/// matching element. A missing target field is treated as an empty array.
#[derive(Debug, Clone)]
pub enum FieldUpdate {
    Set(Value),
    ArrayUnion(Vec<Value>),
    ArrayRemove(Vec<Value>),
}

/// CRUD/query interface of the external document store.
pub trait DocumentStore {
    /// Insert a new document, returning its generated id.
    ///
    /// The generated id is also written into the document's `id` field.
    fn insert(&self, collection: &str, document: Document) -> Result<String>;

    /// Insert (or replace) a document under a caller-chosen id.
    ///
    /// Used for documents with natural keys: profiles keyed by uid and the
    /// shared configuration document. Last write wins.
    fn insert_with_id(&self, collection: &str, id: &str, document: Document) -> Result<()>;

    /// Fetch all documents matching `predicate`, ordered by `order_by`.
    fn get_all(
        &self,
        collection: &str,
        predicate: Option<&Predicate>,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Document>>;

    /// Fetch a single document by id.
    fn get_one(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Apply partial-field updates to one document.
    ///
    /// Updating an absent document is a no-op success (already-absent).
    fn update(&self, collection: &str, id: &str, updates: &[(String, FieldUpdate)]) -> Result<()>;

    /// Remove one document. Removing an absent document is a no-op success.
    fn remove(&self, collection: &str, id: &str) -> Result<()>;

    /// All-or-nothing removal of many documents.
    fn batch_remove(&self, collection: &str, ids: &[String]) -> Result<()>;
}

/// On-disk shape of one collection file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CollectionFile {
    schema_version: String,
    /// Keyed by document id; BTreeMap keeps file contents and unordered
    /// query results deterministic across runs.
    documents: BTreeMap<String, Document>,
}

impl Default for CollectionFile {
    fn default() -> Self {
        Self {
            schema_version: STORE_SCHEMA_VERSION.to_string(),
            documents: BTreeMap::new(),
        }
    }
}

/// File-backed document store, one JSON file per collection.
#[derive(Debug, Clone)]
pub struct JsonStore {
    data_dir: PathBuf,
}

impl JsonStore {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{collection}.json"))
    }

    fn read_collection(&self, path: &Path) -> Result<CollectionFile> {
        if !path.exists() {
            return Ok(CollectionFile::default());
        }
        let content = fs::read_to_string(path)?;
        let file: CollectionFile = serde_json::from_str(&content)?;
        Ok(file)
    }

    fn write_collection(&self, path: &Path, file: &CollectionFile) -> Result<()> {
        let json = serde_json::to_string_pretty(file)?;
        lock::write_atomic(path, json.as_bytes())
    }

    /// Run `f` against the collection under its file lock, persisting the
    /// result atomically when `f` reports a change.
    fn with_collection<T, F>(&self, collection: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut CollectionFile) -> Result<(T, bool)>,
    {
        let path = self.collection_path(collection);
        let _lock = FileLock::acquire(lock::lock_path_for(&path), DEFAULT_LOCK_TIMEOUT_MS)?;

        let mut file = self.read_collection(&path)?;
        let (result, changed) = f(&mut file)?;
        if changed {
            self.write_collection(&path, &file)?;
        }
        Ok(result)
    }
}

impl DocumentStore for JsonStore {
    fn insert(&self, collection: &str, mut document: Document) -> Result<String> {
        let id = Ulid::new().to_string();
        document.insert("id".to_string(), Value::String(id.clone()));

        self.with_collection(collection, |file| {
            file.documents.insert(id.clone(), document);
            Ok(((), true))
        })?;
        tracing::debug!(collection, id = %id, "inserted document");
        Ok(id)
    }

    fn insert_with_id(&self, collection: &str, id: &str, document: Document) -> Result<()> {
        self.with_collection(collection, |file| {
            file.documents.insert(id.to_string(), document);
            Ok(((), true))
        })
    }

    fn get_all(
        &self,
        collection: &str,
        predicate: Option<&Predicate>,
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<Document>> {
        let documents = self.with_collection(collection, |file| {
            let matching: Vec<Document> = file
                .documents
                .values()
                .filter(|doc| predicate.map(|p| p.matches(doc)).unwrap_or(true))
                .cloned()
                .collect();
            Ok((matching, false))
        })?;

        let mut documents = documents;
        if let Some(order) = order_by {
            sort_documents(&mut documents, order);
        }
        Ok(documents)
    }

    fn get_one(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        self.with_collection(collection, |file| {
            Ok((file.documents.get(id).cloned(), false))
        })
    }

    fn update(&self, collection: &str, id: &str, updates: &[(String, FieldUpdate)]) -> Result<()> {
        self.with_collection(collection, |file| {
            let Some(document) = file.documents.get_mut(id) else {
                // Already absent: no-op success
                return Ok(((), false));
            };
            for (field, update) in updates {
                apply_field_update(collection, document, field, update)?;
            }
            Ok(((), true))
        })
    }

    fn remove(&self, collection: &str, id: &str) -> Result<()> {
        self.with_collection(collection, |file| {
            let removed = file.documents.remove(id).is_some();
            Ok(((), removed))
        })
    }

    fn batch_remove(&self, collection: &str, ids: &[String]) -> Result<()> {
        // Single locked cycle + one atomic write keeps this all-or-nothing.
        self.with_collection(collection, |file| {
            let mut removed_any = false;
            for id in ids {
                removed_any |= file.documents.remove(id).is_some();
            }
            Ok(((), removed_any))
        })
    }
}

fn apply_field_update(
    collection: &str,
    document: &mut Document,
    field: &str,
    update: &FieldUpdate,
) -> Result<()> {
    match update {
        FieldUpdate::Set(value) => {
            document.insert(field.to_string(), value.clone());
        }
        FieldUpdate::ArrayUnion(values) => {
            let array = array_field_mut(collection, document, field)?;
            for value in values {
                if !array.contains(value) {
                    array.push(value.clone());
                }
            }
        }
        FieldUpdate::ArrayRemove(values) => {
            let array = array_field_mut(collection, document, field)?;
            array.retain(|existing| !values.contains(existing));
        }
    }
    Ok(())
}

fn array_field_mut<'a>(
    collection: &str,
    document: &'a mut Document,
    field: &str,
) -> Result<&'a mut Vec<Value>> {
    let entry = document
        .entry(field.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    entry.as_array_mut().ok_or_else(|| Error::Store {
        collection: collection.to_string(),
        message: format!("field {field} is not an array"),
    })
}

fn sort_documents(documents: &mut [Document], order: &OrderBy) {
    documents.sort_by(|left, right| {
        let ordering = compare_field(left.get(&order.field), right.get(&order.field));
        match order.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    });
}

/// Compare two field values for ordering. Timestamps serialized as RFC 3339
/// strings are compared as instants: sub-second precision varies, so plain
/// string order would misplace them. Missing fields sort last either way.
fn compare_field(left: Option<&Value>, right: Option<&Value>) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    match (left, right) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(l), Some(r)) => match (l, r) {
            (Value::String(ls), Value::String(rs)) => {
                match (parse_timestamp(ls), parse_timestamp(rs)) {
                    (Some(lt), Some(rt)) => lt.cmp(&rt),
                    _ => ls.cmp(rs),
                }
            }
            (Value::Number(ln), Value::Number(rn)) => ln
                .as_f64()
                .partial_cmp(&rn.as_f64())
                .unwrap_or(Ordering::Equal),
            (Value::Bool(lb), Value::Bool(rb)) => lb.cmp(rb),
            _ => Ordering::Equal,
        },
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>().ok()
}

/// Serialize a typed entity into a store document.
pub fn to_document<T: Serialize>(entity: &T) -> Result<Document> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        _ => Err(Error::OperationFailed(
            "entity did not serialize to an object".to_string(),
        )),
    }
}

/// Deserialize a store document into a typed entity.
pub fn from_document<T: for<'de> Deserialize<'de>>(document: Document) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store() -> (TempDir, JsonStore) {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::new(temp.path().join(".hearth"));
        (temp, store)
    }

    fn doc(value: Value) -> Document {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn insert_assigns_id_and_get_one_round_trips() {
        let (_temp, store) = store();

        let id = store
            .insert("tasks", doc(json!({"text": "water plants"})))
            .unwrap();

        let fetched = store.get_one("tasks", &id).unwrap().unwrap();
        assert_eq!(fetched["id"], Value::String(id.clone()));
        assert_eq!(fetched["text"], "water plants");

        assert!(store.get_one("tasks", "missing").unwrap().is_none());
    }

    #[test]
    fn get_all_applies_equality_predicate() {
        let (_temp, store) = store();

        store
            .insert("tasks", doc(json!({"ownerId": "u1", "isPrivate": false})))
            .unwrap();
        store
            .insert("tasks", doc(json!({"ownerId": "u1", "isPrivate": true})))
            .unwrap();
        store
            .insert("tasks", doc(json!({"ownerId": "u2", "isPrivate": false})))
            .unwrap();

        let mine = store
            .get_all(
                "tasks",
                Some(&Predicate::new().field("ownerId", "u1")),
                None,
            )
            .unwrap();
        assert_eq!(mine.len(), 2);

        let shared = store
            .get_all(
                "tasks",
                Some(&Predicate::new().field("isPrivate", false)),
                None,
            )
            .unwrap();
        assert_eq!(shared.len(), 2);

        let both = store
            .get_all(
                "tasks",
                Some(
                    &Predicate::new()
                        .field("ownerId", "u1")
                        .field("isPrivate", false),
                ),
                None,
            )
            .unwrap();
        assert_eq!(both.len(), 1);
    }

    #[test]
    fn order_by_compares_timestamps_as_instants() {
        let (_temp, store) = store();

        // Variable sub-second precision: plain string order would put the
        // fractional timestamp before the whole-second one.
        store
            .insert(
                "posts",
                doc(json!({"n": 1, "createdAt": "2025-03-01T10:00:11.500Z"})),
            )
            .unwrap();
        store
            .insert(
                "posts",
                doc(json!({"n": 2, "createdAt": "2025-03-01T10:00:11Z"})),
            )
            .unwrap();
        store
            .insert(
                "posts",
                doc(json!({"n": 3, "createdAt": "2025-03-01T10:00:12Z"})),
            )
            .unwrap();

        let ordered = store
            .get_all("posts", None, Some(&OrderBy::desc("createdAt")))
            .unwrap();
        let ns: Vec<i64> = ordered.iter().map(|d| d["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![3, 1, 2]);
    }

    #[test]
    fn array_union_skips_duplicates_and_remove_drops_matches() {
        let (_temp, store) = store();

        store
            .insert_with_id(
                "config",
                "categories",
                doc(json!({"names": ["Cleaning", "Garden"]})),
            )
            .unwrap();

        store
            .update(
                "config",
                "categories",
                &[(
                    "names".to_string(),
                    FieldUpdate::ArrayUnion(vec![json!("Cleaning"), json!("Meals")]),
                )],
            )
            .unwrap();

        let fetched = store.get_one("config", "categories").unwrap().unwrap();
        assert_eq!(fetched["names"], json!(["Cleaning", "Garden", "Meals"]));

        store
            .update(
                "config",
                "categories",
                &[(
                    "names".to_string(),
                    FieldUpdate::ArrayRemove(vec![json!("Garden")]),
                )],
            )
            .unwrap();

        let fetched = store.get_one("config", "categories").unwrap().unwrap();
        assert_eq!(fetched["names"], json!(["Cleaning", "Meals"]));
    }

    #[test]
    fn update_and_remove_of_absent_document_are_noop_success() {
        let (_temp, store) = store();

        store
            .update(
                "tasks",
                "missing",
                &[("completed".to_string(), FieldUpdate::Set(json!(true)))],
            )
            .unwrap();
        store.remove("tasks", "missing").unwrap();

        assert!(store.get_all("tasks", None, None).unwrap().is_empty());
    }

    #[test]
    fn batch_remove_deletes_all_listed_documents() {
        let (_temp, store) = store();

        let a = store.insert("tasks", doc(json!({"text": "a"}))).unwrap();
        let b = store.insert("tasks", doc(json!({"text": "b"}))).unwrap();
        let c = store.insert("tasks", doc(json!({"text": "c"}))).unwrap();

        store
            .batch_remove("tasks", &[a.clone(), c.clone(), "missing".to_string()])
            .unwrap();

        let remaining = store.get_all("tasks", None, None).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0]["id"], Value::String(b));
        assert!(store.get_one("tasks", &a).unwrap().is_none());
    }

    #[test]
    fn array_update_on_non_array_field_is_rejected() {
        let (_temp, store) = store();

        store
            .insert_with_id("config", "categories", doc(json!({"names": "oops"})))
            .unwrap();

        let result = store.update(
            "config",
            "categories",
            &[(
                "names".to_string(),
                FieldUpdate::ArrayUnion(vec![json!("Cleaning")]),
            )],
        );
        assert!(matches!(result, Err(Error::Store { .. })));
    }
}
