use super::codec::{Fields, RecordCodec};
use super::store::{LoadReport, Record, RecordStore};
use crate::libs::error::{CodecError, StoreError};
use crate::libs::formatter;
use crate::libs::user::{User, UserProfile};
use std::path::{Path, PathBuf};
use tracing::{error, info};

pub const USERS_FILE_NAME: &str = "users.csv";

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

impl RecordCodec for User {
    const HEADER: &'static [&'static str] = &[
        "Username",
        "Password",
        "FullName",
        "Email",
        "Department",
        "Position",
        "PhoneNumber",
        "IsAdmin",
        "LastLogin",
        "LoginAttempts",
        "IsLocked",
        "LockExpiry",
    ];
    const MIN_FIELDS: usize = 8;

    fn encode(&self) -> Result<Vec<String>, CodecError> {
        Ok(vec![
            self.username().to_string(),
            self.password_hash().to_string(),
            self.profile.full_name.clone(),
            self.profile.email.clone(),
            self.profile.department.clone(),
            self.profile.position.clone(),
            self.profile.phone_number.clone(),
            self.is_admin.to_string(),
            formatter::format_optional_timestamp(self.last_login.as_ref()),
            self.login_attempts.to_string(),
            self.is_locked.to_string(),
            formatter::format_optional_timestamp(self.lock_expiry.as_ref()),
        ])
    }

    fn decode(fields: &Fields<'_>) -> Result<Self, CodecError> {
        let username = fields.text(0);
        if username.trim().is_empty() {
            return Err(CodecError::invalid("username", username, "must not be empty"));
        }
        let profile = UserProfile {
            full_name: fields.string(2),
            email: fields.string(3),
            department: fields.string(4),
            position: fields.string(5),
            phone_number: fields.string(6),
        };
        let mut user = User::with_password_hash(username, fields.text(1), profile, fields.boolean(7, "admin flag")?);
        user.last_login = fields.optional_timestamp(8, "last login")?;
        user.login_attempts = fields.parse_or(9, "login attempts", 0)?;
        user.is_locked = fields.boolean_or(10, "locked flag", false)?;
        user.lock_expiry = fields.optional_timestamp(11, "lock expiry")?;
        Ok(user)
    }
}

impl Record for User {
    type Key = String;

    fn key(&self) -> String {
        self.username().to_string()
    }
}

/// The built-in administrator created when no users file exists.
pub fn default_admin() -> User {
    User::new(
        DEFAULT_ADMIN_USERNAME,
        DEFAULT_ADMIN_PASSWORD,
        UserProfile {
            full_name: "System Administrator".to_string(),
            email: "admin@system.com".to_string(),
            department: "IT".to_string(),
            position: "System Administrator".to_string(),
            phone_number: "1234567890".to_string(),
        },
        true,
    )
}

/// Account collection keyed by username.
pub struct UserStore {
    store: RecordStore<User>,
}

impl UserStore {
    /// Loads the users file, seeding [`default_admin`] when the file is absent.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let (mut store, report) = RecordStore::open(path);
        if !report.found {
            match store.add(default_admin()) {
                Ok(()) => info!(path = %store.path().display(), "created default administrator account"),
                Err(e) => error!(error = %e, "failed to create default administrator account"),
            }
        }
        UserStore { store }
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn reload(&mut self) -> LoadReport {
        self.store.load()
    }

    pub fn all(&self) -> Vec<User> {
        self.store.all()
    }

    pub fn get(&self, username: &str) -> Option<User> {
        self.store.iter().find(|user| user.username() == username).cloned()
    }

    pub fn exists(&self, username: &str) -> bool {
        self.store.iter().any(|user| user.username() == username)
    }

    pub fn add(&mut self, user: User) -> Result<(), StoreError> {
        self.store.add(user)
    }

    pub fn update(&mut self, user: User) -> Result<(), StoreError> {
        self.store.update(user)
    }

    pub fn delete(&mut self, username: &str) -> Result<User, StoreError> {
        self.store.delete(&username.to_string())
    }

    pub fn usernames(&self) -> Vec<String> {
        self.store.iter().map(|user| user.username().to_string()).collect()
    }

    pub fn admins(&self) -> Vec<User> {
        self.store.iter().filter(|user| user.is_admin).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::codec::{decode_line, encode_line};
    use chrono::NaiveDate;
    use std::fs;

    #[test]
    fn seeds_admin_when_file_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let users = UserStore::open(dir.path().join(USERS_FILE_NAME));

        let admin = users.get(DEFAULT_ADMIN_USERNAME).unwrap();
        assert!(admin.is_admin);
        assert!(admin.verify_password(DEFAULT_ADMIN_PASSWORD));
        assert!(users.path().exists());
    }

    #[test]
    fn does_not_seed_over_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(USERS_FILE_NAME);
        fs::write(&path, format!("{}\n", crate::db::codec::header_line::<User>())).unwrap();

        let users = UserStore::open(&path);
        assert!(users.is_empty());
    }

    #[test]
    fn unreadable_path_is_not_seeded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(USERS_FILE_NAME);
        fs::create_dir(&path).unwrap();

        let mut users = UserStore::open(&path);
        assert!(users.is_empty());
        assert!(users.get(DEFAULT_ADMIN_USERNAME).is_none());
        assert!(path.is_dir());
        assert!(!crate::db::store::backup_path(&path).exists());

        let err = users.add(User::new("amy", "pw", UserProfile::default(), false)).unwrap_err();
        assert!(matches!(err, StoreError::Unreadable(_)));
        assert!(path.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_is_left_byte_identical() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(USERS_FILE_NAME);
        let jdoe = User::with_password_hash("jdoe", "abc", UserProfile::default(), false);
        let contents = format!(
            "{}\n{}\n",
            crate::db::codec::header_line::<User>(),
            encode_line(&jdoe).unwrap()
        );
        fs::write(&path, &contents).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop a privileged user from reading.
        if fs::read(&path).is_ok() {
            fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
            return;
        }

        let mut users = UserStore::open(&path);
        assert!(users.is_empty());
        assert!(users.get(DEFAULT_ADMIN_USERNAME).is_none());
        assert!(users.add(User::new("amy", "pw", UserProfile::default(), false)).is_err());

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), contents);
        assert!(!crate::db::store::backup_path(&path).exists());
    }

    #[test]
    fn decodes_short_legacy_lines() {
        let user: User = decode_line("jdoe,abc123,John Doe,j@x.com,Sales,Rep,555,false").unwrap();
        assert_eq!(user.username(), "jdoe");
        assert_eq!(user.password_hash(), "abc123");
        assert_eq!(user.login_attempts(), 0);
        assert!(!user.is_locked());
        assert!(user.last_login().is_none());
    }

    #[test]
    fn encodes_every_column() {
        let mut user = User::with_password_hash("jdoe", "abc", UserProfile::default(), false);
        let expiry = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap().and_hms_opt(9, 30, 0).unwrap();
        user.login_attempts = 3;
        user.is_locked = true;
        user.lock_expiry = Some(expiry);

        assert_eq!(encode_line(&user).unwrap(), "jdoe,abc,,,,,,false,,3,true,2025-02-01T09:30:00");
        assert_eq!(decode_line::<User>(&encode_line(&user).unwrap()).unwrap(), user);
    }

    #[test]
    fn rejects_lines_missing_required_columns() {
        assert!(decode_line::<User>("jdoe,abc,John").is_err());
        assert!(decode_line::<User>(",abc,,,,,,false").is_err());
    }
}
