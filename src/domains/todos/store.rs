//! In-memory todo store.
//!
//! Records live in a single `Vec` guarded by one mutex that also covers id
//! allocation, so concurrent tool invocations cannot interleave id
//! assignment with list mutation. Nothing is persisted; a restart starts
//! over at id 1.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use super::error::TodoError;

/// Priority assigned when the caller provides none (or an empty string).
pub const DEFAULT_PRIORITY: &str = "medium";

/// A single todo record.
///
/// `id`, `created_date`, and `created_by` are write-once: set at creation
/// and never touched by updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique, strictly increasing id, never reused within a process.
    pub id: u64,

    /// What needs doing.
    pub description: String,

    /// Priority level, free-form text.
    pub priority: String,

    /// UTC timestamp stamped at creation.
    pub created_date: DateTime<Utc>,

    /// Completion flag.
    pub is_completed: bool,

    /// Resolved identity of the creator.
    pub created_by: String,
}

#[derive(Debug)]
struct StoreInner {
    todos: Vec<Todo>,
    next_id: u64,
}

/// Process-wide todo store.
///
/// Owned (usually behind an `Arc`) by the server and injected into the tool
/// layer; tests get an isolated store by constructing their own.
#[derive(Debug)]
pub struct TodoStore {
    inner: Mutex<StoreInner>,
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoStore {
    /// Create an empty store. Ids start at 1.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                todos: Vec::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        // A poisoned lock only means another invocation panicked; the data
        // is still structurally valid, so keep serving.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Create a new record. Always succeeds; allocates the next id and
    /// stamps the current UTC time and the creator identity.
    pub fn create(&self, description: &str, priority: &str, created_by: &str) -> Todo {
        let priority = if priority.is_empty() {
            DEFAULT_PRIORITY
        } else {
            priority
        };

        let mut inner = self.lock();
        let todo = Todo {
            id: inner.next_id,
            description: description.to_string(),
            priority: priority.to_string(),
            created_date: Utc::now(),
            is_completed: false,
            created_by: created_by.to_string(),
        };
        inner.next_id += 1;
        inner.todos.push(todo.clone());
        todo
    }

    /// Look up a single record by id.
    pub fn get(&self, id: u64) -> Result<Todo, TodoError> {
        self.lock()
            .todos
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(TodoError::NotFound(id))
    }

    /// All records, ordered by ascending id.
    pub fn get_all(&self) -> Vec<Todo> {
        let mut todos = self.lock().todos.clone();
        todos.sort_unstable_by_key(|t| t.id);
        todos
    }

    /// Apply the provided fields to a record, in place.
    ///
    /// Empty-string `description`/`priority` mean "no change", not "clear";
    /// `is_completed` is set only when explicitly provided. Returns the
    /// updated record so callers can report the original creator.
    pub fn update(
        &self,
        id: u64,
        description: Option<&str>,
        priority: Option<&str>,
        is_completed: Option<bool>,
    ) -> Result<Todo, TodoError> {
        let mut inner = self.lock();
        let todo = inner
            .todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TodoError::NotFound(id))?;

        if let Some(description) = description.filter(|d| !d.is_empty()) {
            todo.description = description.to_string();
        }
        if let Some(priority) = priority.filter(|p| !p.is_empty()) {
            todo.priority = priority.to_string();
        }
        if let Some(is_completed) = is_completed {
            todo.is_completed = is_completed;
        }

        Ok(todo.clone())
    }

    /// Remove a record, returning it.
    pub fn delete(&self, id: u64) -> Result<Todo, TodoError> {
        let mut inner = self.lock();
        let index = inner
            .todos
            .iter()
            .position(|t| t.id == id)
            .ok_or(TodoError::NotFound(id))?;
        Ok(inner.todos.remove(index))
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.lock().todos.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_increasing_ids_from_one() {
        let store = TodoStore::new();
        let a = store.create("first", "medium", "alice");
        let b = store.create("second", "high", "bob");
        let c = store.create("third", "low", "alice");

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(c.id, 3);
        assert!(!a.is_completed);
        assert_eq!(a.created_by, "alice");
    }

    #[test]
    fn test_ids_are_never_reused() {
        let store = TodoStore::new();
        store.create("one", "medium", "u");
        store.create("two", "medium", "u");
        store.delete(2).unwrap();

        let next = store.create("three", "medium", "u");
        assert_eq!(next.id, 3);
    }

    #[test]
    fn test_empty_priority_defaults_to_medium() {
        let store = TodoStore::new();
        let todo = store.create("task", "", "u");
        assert_eq!(todo.priority, DEFAULT_PRIORITY);
    }

    #[test]
    fn test_get_all_sorted_after_deletes() {
        let store = TodoStore::new();
        for i in 0..5 {
            store.create(&format!("task {}", i), "medium", "u");
        }
        store.delete(3).unwrap();
        store.update(5, Some("renamed"), None, None).unwrap();

        let all = store.get_all();
        let ids: Vec<u64> = all.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 5]);
    }

    #[test]
    fn test_update_only_completion_flag() {
        let store = TodoStore::new();
        let created = store.create("Buy milk", "high", "alice");

        let updated = store.update(created.id, None, None, Some(true)).unwrap();
        assert!(updated.is_completed);
        assert_eq!(updated.description, "Buy milk");
        assert_eq!(updated.priority, "high");
        assert_eq!(updated.created_by, "alice");
        assert_eq!(updated.created_date, created.created_date);
    }

    #[test]
    fn test_update_empty_strings_are_no_change() {
        let store = TodoStore::new();
        store.create("Buy milk", "high", "alice");

        let updated = store.update(1, Some(""), Some(""), None).unwrap();
        assert_eq!(updated.description, "Buy milk");
        assert_eq!(updated.priority, "high");
    }

    #[test]
    fn test_update_changes_provided_fields() {
        let store = TodoStore::new();
        store.create("Buy milk", "high", "alice");

        let updated = store
            .update(1, Some("Buy oat milk"), Some("low"), Some(true))
            .unwrap();
        assert_eq!(updated.description, "Buy oat milk");
        assert_eq!(updated.priority, "low");
        assert!(updated.is_completed);
    }

    #[test]
    fn test_delete_then_get_is_not_found() {
        let store = TodoStore::new();
        store.create("temp", "medium", "u");

        let removed = store.delete(1).unwrap();
        assert_eq!(removed.id, 1);
        assert_eq!(store.get(1), Err(TodoError::NotFound(1)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_missing_ids_report_not_found() {
        let store = TodoStore::new();
        assert_eq!(store.get(42), Err(TodoError::NotFound(42)));
        assert_eq!(
            store.update(42, Some("x"), None, None),
            Err(TodoError::NotFound(42))
        );
        assert_eq!(store.delete(42), Err(TodoError::NotFound(42)));
    }

    #[test]
    fn test_camel_case_serialization() {
        let store = TodoStore::new();
        let todo = store.create("Buy milk", "medium", "alice");

        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["description"], "Buy milk");
        assert_eq!(json["isCompleted"], false);
        assert_eq!(json["createdBy"], "alice");
        assert!(json.get("createdDate").is_some());
        assert!(json.get("created_date").is_none());
    }

    #[test]
    fn test_concurrent_creates_stay_unique() {
        use std::sync::Arc;

        let store = Arc::new(TodoStore::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    store.create("task", "medium", "u");
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let all = store.get_all();
        assert_eq!(all.len(), 400);
        let mut ids: Vec<u64> = all.iter().map(|t| t.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 400);
        assert_eq!(ids.first(), Some(&1));
        assert_eq!(ids.last(), Some(&400));
    }
}
