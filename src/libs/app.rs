//! The application context: one owner for every collection.
//!
//! Each store is opened once per process and handed out by reference, so a
//! mutation always goes through `&mut App` and no two writers can interleave
//! on the same file.

use crate::db::attendance::{AttendanceStore, ATTENDANCE_FILE_NAME};
use crate::db::login_history::{LoginHistory, LOGIN_HISTORY_FILE_NAME};
use crate::db::products::{ProductStore, PRODUCTS_FILE_NAME};
use crate::db::tasks::{TaskStore, TASKS_FILE_NAME};
use crate::db::users::{UserStore, USERS_FILE_NAME};
use crate::libs::auth::{AuthManager, LockoutPolicy};
use crate::libs::config::Config;
use crate::libs::task::{TaskPriority, TaskStatus};
use anyhow::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct App {
    data_dir: PathBuf,
    pub users: UserStore,
    pub products: ProductStore,
    pub tasks: TaskStore,
    pub attendance: AttendanceStore,
    pub history: LoginHistory,
    policy: LockoutPolicy,
}

/// Headline numbers across all collections.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub users: usize,
    pub admins: usize,
    pub locked_users: usize,
    pub products: usize,
    pub low_stock: usize,
    pub inventory_value: f64,
    pub value_by_category: BTreeMap<String, f64>,
    pub tasks: usize,
    pub tasks_by_status: BTreeMap<TaskStatus, usize>,
    pub tasks_by_priority: BTreeMap<TaskPriority, usize>,
    pub task_completion_rate: f64,
    pub attendance_rates: BTreeMap<String, f64>,
}

impl App {
    /// Opens every collection under `data_dir` with the default lockout policy.
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_policy(data_dir, LockoutPolicy::default())
    }

    pub fn with_policy(data_dir: impl Into<PathBuf>, policy: LockoutPolicy) -> Self {
        let data_dir = data_dir.into();
        debug!(data_dir = %data_dir.display(), "opening collections");
        App {
            users: UserStore::open(data_dir.join(USERS_FILE_NAME)),
            products: ProductStore::open(data_dir.join(PRODUCTS_FILE_NAME)),
            tasks: TaskStore::open(data_dir.join(TASKS_FILE_NAME)),
            attendance: AttendanceStore::open(data_dir.join(ATTENDANCE_FILE_NAME)),
            history: LoginHistory::new(data_dir.join(LOGIN_HISTORY_FILE_NAME)),
            data_dir,
            policy,
        }
    }

    /// Opens the collections in the directory and with the lockout policy
    /// named by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let storage = config.data_storage();
        // Resolving any file creates the directory.
        storage.get_path(USERS_FILE_NAME)?;
        let policy = LockoutPolicy::from(&config.auth_or_default());
        Ok(Self::with_policy(storage.base_path(), policy))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn policy(&self) -> LockoutPolicy {
        self.policy
    }

    pub fn auth(&mut self) -> AuthManager<'_> {
        AuthManager::new(&mut self.users, &self.history, self.policy)
    }

    pub fn summary(&self) -> Summary {
        let users = self.users.all();
        Summary {
            users: users.len(),
            admins: users.iter().filter(|u| u.is_admin).count(),
            locked_users: users.iter().filter(|u| u.is_locked()).count(),
            products: self.products.len(),
            low_stock: self.products.low_stock().len(),
            inventory_value: self.products.total_value(),
            value_by_category: self.products.value_by_category(),
            tasks: self.tasks.len(),
            tasks_by_status: self.tasks.count_by_status(),
            tasks_by_priority: self.tasks.count_by_priority(),
            task_completion_rate: self.tasks.completion_rate(),
            attendance_rates: self.attendance.attendance_rates(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::product::Product;

    #[test]
    fn opening_an_empty_directory_seeds_only_the_admin() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::open(dir.path());

        assert_eq!(app.users.usernames(), vec!["admin".to_string()]);
        assert!(app.products.is_empty());
        assert!(dir.path().join(USERS_FILE_NAME).exists());
        assert!(!dir.path().join(PRODUCTS_FILE_NAME).exists());
    }

    #[test]
    fn summary_reflects_the_collections() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::open(dir.path());
        app.products.add(Product::new(1, "Pen", "", "Office", 1.5, 10, 5)).unwrap();
        app.products.add(Product::new(2, "Desk", "", "Furniture", 100.0, 1, 2)).unwrap();

        let summary = app.summary();
        assert_eq!(summary.users, 1);
        assert_eq!(summary.admins, 1);
        assert_eq!(summary.products, 2);
        assert_eq!(summary.low_stock, 1);
        assert_eq!(summary.inventory_value, 115.0);
        assert_eq!(summary.value_by_category["Office"], 15.0);
        assert_eq!(summary.task_completion_rate, 0.0);
    }
}
