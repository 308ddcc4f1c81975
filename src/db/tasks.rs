use super::codec::{Fields, RecordCodec};
use super::store::{id_after, LoadReport, Record, RecordStore};
use crate::libs::error::{CodecError, StoreError};
use crate::libs::formatter;
use crate::libs::task::{Task, TaskPriority, TaskStatus};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const TASKS_FILE_NAME: &str = "tasks.csv";

impl RecordCodec for Task {
    const HEADER: &'static [&'static str] = &[
        "ID",
        "Title",
        "Description",
        "AssignedTo",
        "Status",
        "Priority",
        "DueDate",
        "CreatedBy",
        "CreatedAt",
    ];
    const MIN_FIELDS: usize = 9;

    fn encode(&self) -> Result<Vec<String>, CodecError> {
        Ok(vec![
            self.id.to_string(),
            self.title.clone(),
            self.description.clone(),
            self.assigned_to.clone(),
            self.status.to_string(),
            self.priority.to_string(),
            formatter::format_timestamp(&self.due_date),
            self.created_by.clone(),
            formatter::format_timestamp(&self.created_at()),
        ])
    }

    fn decode(fields: &Fields<'_>) -> Result<Self, CodecError> {
        let mut task = Task::with_created_at(
            fields.text(1),
            fields.text(2),
            fields.text(3),
            fields.parse::<TaskPriority>(5, "priority")?,
            fields.timestamp(6, "due date")?,
            fields.text(7),
            fields.timestamp(8, "creation time")?,
        );
        task.id = fields.parse(0, "id")?;
        task.status = fields.parse::<TaskStatus>(4, "status")?;
        Ok(task)
    }
}

impl Record for Task {
    type Key = u32;

    fn key(&self) -> u32 {
        self.id
    }
}

/// Task collection keyed by id.
pub struct TaskStore {
    store: RecordStore<Task>,
    next_id: Option<u32>,
}

impl TaskStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let (store, _) = RecordStore::open(path);
        let mut tasks = TaskStore { store, next_id: Some(1) };
        tasks.sync_next_id();
        tasks
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn reload(&mut self) -> LoadReport {
        let report = self.store.load();
        self.sync_next_id();
        report
    }

    /// Assigns the next id to `task` and stores it, returning the id.
    pub fn create(&mut self, mut task: Task) -> Result<u32, StoreError> {
        let id = self.next_id.ok_or(StoreError::IdsExhausted)?;
        task.id = id;
        self.store.add(task)?;
        self.next_id = id.checked_add(1);
        Ok(id)
    }

    pub fn all(&self) -> Vec<Task> {
        self.store.all()
    }

    pub fn get(&self, id: u32) -> Option<Task> {
        self.store.get(&id)
    }

    /// Replaces a stored task. The stored creation timestamp is kept
    /// whatever `task` carries.
    pub fn update(&mut self, mut task: Task) -> Result<(), StoreError> {
        let stored = self.store.get(&task.id).ok_or_else(|| StoreError::NotFound(task.id.to_string()))?;
        task.set_created_at(stored.created_at());
        self.store.update(task)
    }

    pub fn set_status(&mut self, id: u32, status: TaskStatus) -> Result<(), StoreError> {
        let mut task = self.store.get(&id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        task.status = status;
        self.store.update(task)
    }

    pub fn delete(&mut self, id: u32) -> Result<Task, StoreError> {
        self.store.delete(&id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn by_assignee(&self, username: &str) -> Vec<Task> {
        self.store.iter().filter(|t| t.assigned_to == username).cloned().collect()
    }

    pub fn by_status(&self, status: TaskStatus) -> Vec<Task> {
        self.store.iter().filter(|t| t.status == status).cloned().collect()
    }

    pub fn count_by_status(&self) -> BTreeMap<TaskStatus, usize> {
        count(self.store.iter().map(|t| t.status))
    }

    pub fn count_by_priority(&self) -> BTreeMap<TaskPriority, usize> {
        count(self.store.iter().map(|t| t.priority))
    }

    pub fn count_by_assignee(&self) -> BTreeMap<String, usize> {
        count(self.store.iter().map(|t| t.assigned_to.clone()))
    }

    /// Percentage of tasks that are completed, 0 when there are none.
    pub fn completion_rate(&self) -> f64 {
        completion_rate(self.store.iter())
    }

    pub fn completion_rates_by_assignee(&self) -> BTreeMap<String, f64> {
        let mut grouped: BTreeMap<String, Vec<&Task>> = BTreeMap::new();
        for task in self.store.iter() {
            grouped.entry(task.assigned_to.clone()).or_default().push(task);
        }
        grouped
            .into_iter()
            .map(|(assignee, tasks)| (assignee, completion_rate(tasks.into_iter())))
            .collect()
    }

    fn sync_next_id(&mut self) {
        self.next_id = self.store.iter().fold(self.next_id, |next, t| id_after(next, t.id));
    }
}

fn count<K: Ord>(keys: impl Iterator<Item = K>) -> BTreeMap<K, usize> {
    let mut counts = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

fn completion_rate<'a>(tasks: impl Iterator<Item = &'a Task>) -> f64 {
    let (total, completed) = tasks.fold((0usize, 0usize), |(total, completed), task| {
        (total + 1, completed + usize::from(task.is_completed()))
    });
    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    }
}
