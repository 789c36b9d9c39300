//! Per-user task lists, persisted as one JSON document each.
//!
//! A turn's task generation *replaces* the user's entire list rather
//! than merging into it, so the store exposes upsert-only semantics.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use mitra_domain::chat::Lang;
use mitra_domain::error::Result;
use mitra_domain::wellness::TaskItem;

use crate::journal::file_stem_for;

/// One user's current task list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskList {
    pub user_id: String,
    pub tasks: Vec<TaskItem>,
    pub language: Lang,
    pub updated_at: DateTime<Utc>,
}

/// Replace-all task list store, one JSON file per user under
/// `<state>/todos/`.
pub struct TaskStore {
    dir: PathBuf,
    cache: RwLock<HashMap<String, TaskList>>,
}

impl TaskStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            cache: RwLock::new(HashMap::new()),
        })
    }

    fn path_for(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem_for(user_id)))
    }

    /// Replace the user's whole task list.
    pub fn upsert(&self, user_id: &str, tasks: Vec<TaskItem>, language: Lang) -> Result<TaskList> {
        let list = TaskList {
            user_id: user_id.to_owned(),
            tasks,
            language,
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string_pretty(&list)?;
        std::fs::write(self.path_for(user_id), json)?;

        self.cache.write().insert(user_id.to_owned(), list.clone());
        Ok(list)
    }

    /// Fetch the user's task list, or `None` if they have none yet.
    pub fn get(&self, user_id: &str) -> Result<Option<TaskList>> {
        {
            let cache = self.cache.read();
            if let Some(list) = cache.get(user_id) {
                return Ok(Some(list.clone()));
            }
        }

        let path = self.path_for(user_id);
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)?;
        match serde_json::from_str::<TaskList>(&raw) {
            Ok(list) => {
                self.cache.write().insert(user_id.to_owned(), list.clone());
                Ok(Some(list))
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "discarding unreadable task list"
                );
                Ok(None)
            }
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use mitra_domain::wellness::{TaskCategory, TaskPriority};

    fn task(title: &str) -> TaskItem {
        TaskItem::new(title, TaskPriority::Medium, TaskCategory::SelfCare)
    }

    #[test]
    fn upsert_replaces_not_merges() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::new(dir.path()).unwrap();

        store
            .upsert("u1", vec![task("a"), task("b")], Lang::En)
            .unwrap();
        store.upsert("u1", vec![task("c")], Lang::En).unwrap();

        let list = store.get("u1").unwrap().unwrap();
        assert_eq!(list.tasks.len(), 1);
        assert_eq!(list.tasks[0].title, "c");
    }

    #[test]
    fn get_missing_user_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::new(dir.path()).unwrap();
        assert!(store.get("nobody").unwrap().is_none());
    }

    #[test]
    fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = TaskStore::new(dir.path()).unwrap();
            store.upsert("u1", vec![task("persisted")], Lang::Hi).unwrap();
        }
        let store = TaskStore::new(dir.path()).unwrap();
        let list = store.get("u1").unwrap().unwrap();
        assert_eq!(list.tasks[0].title, "persisted");
        assert_eq!(list.language, Lang::Hi);
    }

    #[test]
    fn empty_list_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let store = TaskStore::new(dir.path()).unwrap();
        store.upsert("u1", vec![], Lang::En).unwrap();
        assert!(store.get("u1").unwrap().unwrap().tasks.is_empty());
    }
}
