//! In-memory storage.
//!
//! Tasks live in a sequence-keyed arena so iteration yields insertion order
//! without a separate ordering column. An index maps IDs to sequence keys.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, TaskError};
use crate::model::{Task, TaskId};
use crate::storage::TaskRepository;

/// Process-lifetime task store. Data is lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tasks: BTreeMap<u64, Task>,
    index: HashMap<TaskId, u64>,
    next_seq: u64,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing tasks, preserving the given order.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate IDs.
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Result<Self> {
        let mut storage = Self::new();
        for task in tasks {
            storage.insert(task)?;
        }
        Ok(storage)
    }
}

impl TaskRepository for MemoryStorage {
    fn all(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.values().cloned().collect())
    }

    fn get(&self, id: &TaskId) -> Result<Option<Task>> {
        Ok(self
            .index
            .get(id)
            .and_then(|seq| self.tasks.get(seq))
            .cloned())
    }

    fn insert(&mut self, task: Task) -> Result<()> {
        if self.index.contains_key(&task.id) {
            return Err(TaskError::Other(anyhow::anyhow!(
                "duplicate task id {}",
                task.id
            )));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.insert(task.id, seq);
        self.tasks.insert(seq, task);
        Ok(())
    }

    fn replace(&mut self, task: Task) -> Result<bool> {
        let Some(seq) = self.index.get(&task.id) else {
            return Ok(false);
        };
        self.tasks.insert(*seq, task);
        Ok(true)
    }

    fn remove(&mut self, id: &TaskId) -> Result<bool> {
        let Some(seq) = self.index.remove(id) else {
            return Ok(false);
        };
        self.tasks.remove(&seq);
        Ok(true)
    }

    fn count(&self) -> Result<usize> {
        Ok(self.tasks.len())
    }

    fn remove_completed(&mut self) -> Result<usize> {
        let before = self.tasks.len();
        self.tasks.retain(|_, task| !task.is_completed);
        let tasks = &self.tasks;
        self.index.retain(|_, seq| tasks.contains_key(seq));
        Ok(before - self.tasks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn task(title: &str) -> Task {
        Task::new(title, "", Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn preserves_insertion_order_across_removal() {
        let a = task("a");
        let b = task("b");
        let c = task("c");
        let mut storage =
            MemoryStorage::with_tasks([a.clone(), b.clone(), c.clone()]).unwrap();

        assert!(storage.remove(&b.id).unwrap());
        let d = task("d");
        storage.insert(d.clone()).unwrap();

        let titles: Vec<_> = storage.all().unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, ["a", "c", "d"]);
    }

    #[test]
    fn replace_keeps_position() {
        let a = task("a");
        let b = task("b");
        let mut storage = MemoryStorage::with_tasks([a.clone(), b]).unwrap();

        let mut edited = a.clone();
        edited.title = "a2".to_string();
        assert!(storage.replace(edited).unwrap());
        assert_eq!(storage.all().unwrap()[0].title, "a2");

        assert!(!storage.replace(task("ghost")).unwrap());
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let a = task("a");
        let mut storage = MemoryStorage::with_tasks([a.clone()]).unwrap();
        assert!(storage.insert(a).is_err());
    }

    #[test]
    fn remove_completed_keeps_index_consistent() {
        let now = Utc::now();
        let mut done = task("done");
        done.apply_completion(true, now);
        let open = task("open");
        let mut storage = MemoryStorage::with_tasks([done.clone(), open.clone()]).unwrap();

        assert_eq!(storage.remove_completed().unwrap(), 1);
        assert_eq!(storage.get(&done.id).unwrap(), None);
        assert_eq!(storage.get(&open.id).unwrap(), Some(open));
        assert!(!storage.remove(&done.id).unwrap());
    }
}
