//! Generic in-memory record collection mirrored to a CSV file.
//!
//! A [`RecordStore`] keeps every record of one type in memory, in insertion
//! order, and rewrites the whole backing file after each successful mutation.
//! Keys are unique within a store.
//!
//! ## Save protocol
//!
//! ```text
//! data.csv ──rename──▶ data.csv.bak
//!                        │
//! write header + records │ ok ──▶ remove data.csv.bak
//!                        │ err ─▶ rename data.csv.bak back to data.csv
//! ```
//!
//! The canonical path therefore always holds either the previous complete file
//! or the new complete file. A failed save also rolls back the in-memory change
//! that triggered it.
//!
//! Mutations take `&mut self`, so a store has exactly one writer at a time.

use super::codec::{self, RecordCodec};
use crate::libs::error::{CodecError, PersistenceFailure, StoreError};
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use std::fmt::Debug;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// A record type that can be kept in a [`RecordStore`].
pub trait Record: RecordCodec + Clone {
    type Key: PartialEq + Clone + Debug;

    fn key(&self) -> Self::Key;
}

/// Outcome of reading a backing file.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
    /// `false` when there was no backing file to read.
    pub found: bool,
    /// The backing file exists but could not be read. The store stays empty
    /// and refuses to save until a later load succeeds.
    pub unreadable: bool,
}

pub struct RecordStore<T: Record> {
    path: PathBuf,
    records: Vec<T>,
    unreadable: bool,
}

impl<T: Record> RecordStore<T> {
    /// Opens a store on `path` and loads whatever the file holds.
    pub fn open(path: impl Into<PathBuf>) -> (Self, LoadReport) {
        let mut store = Self::empty(path);
        let report = store.load();
        (store, report)
    }

    /// A store bound to `path` without reading it.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
            unreadable: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        backup_path(&self.path)
    }

    /// Replaces the in-memory records with the contents of the backing file.
    ///
    /// The first line is the header and is skipped. Lines that fail to decode
    /// are logged and skipped. A missing file leaves the store empty. A file
    /// that exists but cannot be read also leaves it empty, and marks the store
    /// unreadable so no save can replace the file.
    pub fn load(&mut self) -> LoadReport {
        self.records.clear();
        self.unreadable = false;
        let mut report = LoadReport::default();

        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no backing file, starting empty");
                return report;
            }
            Err(e) => return self.mark_unreadable(&e),
        };
        report.found = true;

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(codec::DELIMITER)
            .from_reader(file);

        for (index, result) in reader.records().enumerate() {
            // Header is line 1.
            let line = index + 2;
            let decoded = match result {
                Ok(record) => codec::decode_record::<T>(&record),
                Err(e) if e.is_io_error() => return self.mark_unreadable(&e),
                Err(e) => Err(CodecError::from(e)),
            };
            match decoded {
                Ok(record) => {
                    if self.position(&record.key()).is_some() {
                        warn!(path = %self.path.display(), line, key = ?record.key(), "skipping duplicate key");
                        report.skipped += 1;
                        continue;
                    }
                    self.records.push(record);
                    report.loaded += 1;
                }
                Err(e) => {
                    warn!(path = %self.path.display(), line, error = %e, "skipping malformed record");
                    report.skipped += 1;
                }
            }
        }

        debug!(path = %self.path.display(), loaded = report.loaded, skipped = report.skipped, "loaded records");
        report
    }

    fn mark_unreadable(&mut self, e: &dyn std::error::Error) -> LoadReport {
        error!(path = %self.path.display(), error = %e, "failed to read backing file, starting empty");
        self.records.clear();
        self.unreadable = true;
        LoadReport {
            found: true,
            unreadable: true,
            ..LoadReport::default()
        }
    }

    /// Snapshot of every record in store order.
    pub fn all(&self) -> Vec<T> {
        self.records.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }

    pub fn get(&self, key: &T::Key) -> Option<T> {
        self.records.iter().find(|record| &record.key() == key).cloned()
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.position(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn add(&mut self, record: T) -> Result<(), StoreError> {
        let key = record.key();
        if self.contains(&key) {
            return Err(StoreError::DuplicateKey(format!("{:?}", key)));
        }
        self.records.push(record);
        if let Err(e) = self.save() {
            self.records.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Replaces the record that shares `record`'s key, keeping its position.
    pub fn update(&mut self, record: T) -> Result<(), StoreError> {
        let key = record.key();
        let index = self.position(&key).ok_or_else(|| StoreError::NotFound(format!("{:?}", key)))?;
        let previous = std::mem::replace(&mut self.records[index], record);
        if let Err(e) = self.save() {
            self.records[index] = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Replaces the record with the same key or appends it when absent.
    pub fn upsert(&mut self, record: T) -> Result<(), StoreError> {
        match self.position(&record.key()) {
            Some(_) => self.update(record),
            None => self.add(record),
        }
    }

    pub fn delete(&mut self, key: &T::Key) -> Result<T, StoreError> {
        let index = self.position(key).ok_or_else(|| StoreError::NotFound(format!("{:?}", key)))?;
        let removed = self.records.remove(index);
        if let Err(e) = self.save() {
            self.records.insert(index, removed);
            return Err(e);
        }
        Ok(removed)
    }

    /// Writes every record to the backing file using the backup protocol.
    pub fn save(&self) -> Result<(), StoreError> {
        if self.unreadable {
            return Err(StoreError::Unreadable(self.path.clone()));
        }
        let backup = self.backup_path();
        let had_file = self.path.exists();

        if had_file {
            if let Err(e) = replace_file(&self.path, &backup) {
                return Err(self.persistence(e.into()));
            }
        } else if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.persistence(e.into()))?;
            }
        }

        match self.write_file() {
            Ok(()) => {
                if had_file {
                    if let Err(e) = fs::remove_file(&backup) {
                        warn!(path = %backup.display(), error = %e, "saved, but could not remove backup");
                    }
                }
                debug!(path = %self.path.display(), records = self.records.len(), "saved records");
                Ok(())
            }
            Err(failure) => {
                self.restore(had_file, &backup);
                Err(self.persistence(failure))
            }
        }
    }

    fn write_file(&self) -> Result<(), PersistenceFailure> {
        let file = File::create(&self.path)?;
        let mut writer = WriterBuilder::new()
            .delimiter(codec::DELIMITER)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(BufWriter::new(file));

        writer.write_record(T::HEADER)?;
        for record in &self.records {
            writer.write_record(record.encode()?)?;
        }

        let mut inner = writer.into_inner().map_err(|e| e.into_error())?;
        inner.flush()?;
        inner.get_ref().sync_all()?;
        Ok(())
    }

    fn restore(&self, had_file: bool, backup: &Path) {
        let restored = if had_file {
            replace_file(backup, &self.path)
        } else {
            match fs::remove_file(&self.path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
                _ => Ok(()),
            }
        };
        match restored {
            Ok(()) => warn!(path = %self.path.display(), "save failed, previous file restored"),
            Err(e) => error!(path = %self.path.display(), error = %e, "save failed and the previous file could not be restored"),
        }
    }

    fn persistence(&self, source: PersistenceFailure) -> StoreError {
        StoreError::Persistence {
            path: self.path.clone(),
            source,
        }
    }

    fn position(&self, key: &T::Key) -> Option<usize> {
        self.records.iter().position(|record| &record.key() == key)
    }
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

/// The id that follows `used` when `next` is the lowest free one, or `None`
/// once `u32::MAX` has been taken.
pub fn id_after(next: Option<u32>, used: u32) -> Option<u32> {
    let following = used.checked_add(1)?;
    next.map(|next| next.max(following))
}

/// Renames `from` to `to`, replacing `to` if it exists.
fn replace_file(from: &Path, to: &Path) -> io::Result<()> {
    if to.exists() {
        fs::remove_file(to)?;
    }
    fs::rename(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::codec::Fields;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        label: String,
    }

    impl Item {
        fn new(id: u32, label: &str) -> Self {
            Item { id, label: label.to_string() }
        }
    }

    impl RecordCodec for Item {
        const HEADER: &'static [&'static str] = &["ID", "Label"];
        const MIN_FIELDS: usize = 2;

        fn encode(&self) -> Result<Vec<String>, CodecError> {
            if self.label == "poison" {
                return Err(CodecError::Unencodable {
                    field: "label",
                    reason: "reserved".to_string(),
                });
            }
            Ok(vec![self.id.to_string(), self.label.clone()])
        }

        fn decode(fields: &Fields<'_>) -> Result<Self, CodecError> {
            Ok(Item {
                id: fields.parse(0, "id")?,
                label: fields.string(1),
            })
        }
    }

    impl Record for Item {
        type Key = u32;

        fn key(&self) -> u32 {
            self.id
        }
    }

    fn store(dir: &TempDir) -> RecordStore<Item> {
        RecordStore::empty(dir.path().join("items.csv"))
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (store, report) = RecordStore::<Item>::open(dir.path().join("items.csv"));
        assert!(store.is_empty());
        assert!(!report.found);
    }

    #[test]
    fn unreadable_file_loads_empty_and_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.csv");
        fs::create_dir(&path).unwrap();

        let (mut store, report) = RecordStore::<Item>::open(&path);
        assert!(store.is_empty());
        assert!(report.found);
        assert!(report.unreadable);

        let err = store.add(Item::new(1, "a")).unwrap_err();
        assert!(matches!(err, StoreError::Unreadable(_)));
        assert!(store.is_empty());
        assert!(path.is_dir());
        assert!(!store.backup_path().exists());
    }

    #[test]
    fn successful_reload_clears_unreadable_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.csv");
        fs::create_dir(&path).unwrap();
        let (mut store, _) = RecordStore::<Item>::open(&path);

        fs::remove_dir(&path).unwrap();
        fs::write(&path, "ID,Label\n1,a\n").unwrap();
        let report = store.load();
        assert!(!report.unreadable);
        assert_eq!(report.loaded, 1);
        store.add(Item::new(2, "b")).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "ID,Label\n1,a\n2,b\n");
    }

    #[test]
    fn id_after_stops_at_the_last_id() {
        assert_eq!(id_after(Some(1), 0), Some(1));
        assert_eq!(id_after(Some(5), 9), Some(10));
        assert_eq!(id_after(Some(12), 9), Some(12));
        assert_eq!(id_after(Some(3), u32::MAX), None);
        assert_eq!(id_after(None, 2), None);
    }

    #[test]
    fn add_rejects_duplicate_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(&dir);
        store.add(Item::new(1, "one")).unwrap();

        let err = store.add(Item::new(1, "uno")).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&1).unwrap().label, "one");
    }

    #[test]
    fn update_and_delete_require_existing_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(&dir);
        assert!(store.update(Item::new(9, "nine")).unwrap_err().is_not_found());
        assert!(store.delete(&9).unwrap_err().is_not_found());
        assert!(!store.path().exists());
    }

    #[test]
    fn update_keeps_position() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(&dir);
        store.add(Item::new(1, "a")).unwrap();
        store.add(Item::new(2, "b")).unwrap();
        store.update(Item::new(1, "A")).unwrap();

        let labels: Vec<_> = store.iter().map(|item| item.label.as_str()).collect();
        assert_eq!(labels, ["A", "b"]);
    }

    #[test]
    fn snapshots_are_detached() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(&dir);
        store.add(Item::new(1, "a")).unwrap();

        let mut snapshot = store.all();
        snapshot[0].label = "changed".to_string();
        snapshot.clear();
        assert_eq!(store.get(&1).unwrap().label, "a");
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(&dir);
        store.add(Item::new(3, "three, with comma")).unwrap();
        store.add(Item::new(1, "line\nbreak")).unwrap();

        let (reloaded, report) = RecordStore::<Item>::open(store.path());
        assert_eq!(report.loaded, 2);
        assert_eq!(reloaded.all(), store.all());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("items.csv");
        fs::write(&path, "ID,Label\n1,ok\nnot-a-number,bad\n2\n3,fine\n").unwrap();

        let (store, report) = RecordStore::<Item>::open(&path);
        assert_eq!(report.loaded, 2);
        assert_eq!(report.skipped, 2);
        assert_eq!(store.all(), vec![Item::new(1, "ok"), Item::new(3, "fine")]);
    }

    #[test]
    fn successful_save_removes_backup() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(&dir);
        store.add(Item::new(1, "a")).unwrap();
        store.add(Item::new(2, "b")).unwrap();

        assert!(!store.backup_path().exists());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "ID,Label\n1,a\n2,b\n");
    }

    #[test]
    fn failed_save_restores_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(&dir);
        store.add(Item::new(1, "a")).unwrap();
        store.add(Item::new(2, "b")).unwrap();
        let before = fs::read(store.path()).unwrap();

        let err = store.add(Item::new(3, "poison")).unwrap_err();
        assert!(matches!(err, StoreError::Persistence { .. }));

        assert_eq!(fs::read(store.path()).unwrap(), before);
        assert!(!store.backup_path().exists());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn failed_first_save_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(&dir);

        assert!(store.add(Item::new(1, "poison")).is_err());
        assert!(!store.path().exists());
        assert!(store.is_empty());
    }

    #[test]
    fn failed_update_and_delete_roll_back_memory() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(&dir);
        store.add(Item::new(1, "a")).unwrap();
        store.add(Item::new(2, "poison-later")).unwrap();

        assert!(store.update(Item::new(1, "poison")).is_err());
        assert_eq!(store.get(&1).unwrap().label, "a");

        store.records[1].label = "poison".to_string();
        assert!(store.delete(&1).is_err());
        assert_eq!(store.len(), 2);
        assert_eq!(store.iter().next().unwrap().id, 1);
    }

    #[test]
    fn stale_backup_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store(&dir);
        fs::write(store.backup_path(), "stale").unwrap();
        store.add(Item::new(1, "a")).unwrap();
        store.add(Item::new(2, "b")).unwrap();

        assert!(!store.backup_path().exists());
    }
}
