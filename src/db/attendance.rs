use super::codec::{Fields, RecordCodec};
use super::store::{LoadReport, Record, RecordStore};
use crate::libs::attendance::Attendance;
use crate::libs::error::{CodecError, StoreError};
use crate::libs::formatter;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const ATTENDANCE_FILE_NAME: &str = "attendance.csv";

impl RecordCodec for Attendance {
    const HEADER: &'static [&'static str] = &["Employee", "Date", "Status", "Notes"];
    const MIN_FIELDS: usize = 3;

    fn encode(&self) -> Result<Vec<String>, CodecError> {
        Ok(vec![
            self.employee.clone(),
            formatter::format_date(&self.date),
            self.present.to_string(),
            self.notes.clone(),
        ])
    }

    fn decode(fields: &Fields<'_>) -> Result<Self, CodecError> {
        Ok(Attendance {
            employee: fields.string(0),
            date: fields.date(1, "date")?,
            present: fields.boolean(2, "status")?,
            notes: fields.string(3),
        })
    }
}

impl Record for Attendance {
    type Key = (String, NaiveDate);

    fn key(&self) -> (String, NaiveDate) {
        (self.employee.clone(), self.date)
    }
}

/// Attendance collection keyed by (employee, date).
pub struct AttendanceStore {
    store: RecordStore<Attendance>,
}

impl AttendanceStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let (store, _) = RecordStore::open(path);
        AttendanceStore { store }
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn reload(&mut self) -> LoadReport {
        self.store.load()
    }

    /// Records attendance, replacing any earlier record for the same
    /// employee and day.
    pub fn mark(&mut self, attendance: Attendance) -> Result<(), StoreError> {
        self.store.upsert(attendance)
    }

    pub fn unmark(&mut self, employee: &str, date: NaiveDate) -> Result<Attendance, StoreError> {
        self.store.delete(&(employee.to_string(), date))
    }

    pub fn is_marked(&self, employee: &str, date: NaiveDate) -> bool {
        self.store.contains(&(employee.to_string(), date))
    }

    pub fn get(&self, employee: &str, date: NaiveDate) -> Option<Attendance> {
        self.store.get(&(employee.to_string(), date))
    }

    pub fn all(&self) -> Vec<Attendance> {
        self.store.all()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn by_employee(&self, employee: &str) -> Vec<Attendance> {
        self.store.iter().filter(|a| a.employee == employee).cloned().collect()
    }

    pub fn by_date(&self, date: NaiveDate) -> Vec<Attendance> {
        self.store.iter().filter(|a| a.date == date).cloned().collect()
    }

    /// Percentage of an employee's recorded days marked present.
    pub fn attendance_rate(&self, employee: &str) -> f64 {
        let records = self.by_employee(employee);
        if records.is_empty() {
            return 0.0;
        }
        let present = records.iter().filter(|a| a.present).count();
        present as f64 / records.len() as f64 * 100.0
    }

    pub fn attendance_rates(&self) -> BTreeMap<String, f64> {
        let mut employees: Vec<&str> = self.store.iter().map(|a| a.employee.as_str()).collect();
        employees.sort_unstable();
        employees.dedup();
        employees
            .into_iter()
            .map(|employee| (employee.to_string(), self.attendance_rate(employee)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::codec::decode_line;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    #[test]
    fn notes_column_is_optional() {
        let record = decode_line::<Attendance>("jdoe,2025-04-01,true").unwrap();
        assert!(record.present);
        assert_eq!(record.notes, "");
        assert!(decode_line::<Attendance>("jdoe,2025-04-01").is_err());
        assert!(decode_line::<Attendance>("jdoe,04/01/2025,true").is_err());
    }

    #[test]
    fn marking_twice_keeps_the_latest() {
        let dir = tempfile::tempdir().unwrap();
        let mut attendance = AttendanceStore::open(dir.path().join(ATTENDANCE_FILE_NAME));
        attendance.mark(Attendance::new("jdoe", day(1), true, "")).unwrap();
        attendance.mark(Attendance::new("jdoe", day(1), false, "sick")).unwrap();

        assert_eq!(attendance.len(), 1);
        let record = attendance.get("jdoe", day(1)).unwrap();
        assert!(!record.present);
        assert_eq!(record.notes, "sick");

        let reopened = AttendanceStore::open(attendance.path());
        assert_eq!(reopened.all(), vec![record]);
    }

    #[test]
    fn queries_by_employee_and_date() {
        let dir = tempfile::tempdir().unwrap();
        let mut attendance = AttendanceStore::open(dir.path().join(ATTENDANCE_FILE_NAME));
        attendance.mark(Attendance::new("jdoe", day(1), true, "")).unwrap();
        attendance.mark(Attendance::new("jdoe", day(2), false, "")).unwrap();
        attendance.mark(Attendance::new("amy", day(1), true, "")).unwrap();
        attendance.mark(Attendance::new("jdoe", day(3), true, "")).unwrap();
        attendance.mark(Attendance::new("jdoe", day(4), true, "")).unwrap();

        assert_eq!(attendance.by_date(day(1)).len(), 2);
        assert_eq!(attendance.by_employee("jdoe").len(), 4);
        assert_eq!(attendance.attendance_rate("jdoe"), 75.0);
        assert_eq!(attendance.attendance_rate("nobody"), 0.0);
        assert_eq!(attendance.attendance_rates()["amy"], 100.0);

        attendance.unmark("jdoe", day(2)).unwrap();
        assert!(!attendance.is_marked("jdoe", day(2)));
        assert!(attendance.unmark("jdoe", day(2)).unwrap_err().is_not_found());
    }
}
