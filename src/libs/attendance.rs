use chrono::NaiveDate;

/// One employee's attendance on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendance {
    pub employee: String,
    pub date: NaiveDate,
    pub present: bool,
    pub notes: String,
}

impl Attendance {
    pub fn new(employee: &str, date: NaiveDate, present: bool, notes: &str) -> Self {
        Attendance {
            employee: employee.to_string(),
            date,
            present,
            notes: notes.to_string(),
        }
    }
}
