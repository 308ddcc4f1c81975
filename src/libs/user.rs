use chrono::NaiveDateTime;
use sha2::{Digest, Sha256};

/// Contact and organisational details of an account.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserProfile {
    pub full_name: String,
    pub email: String,
    pub department: String,
    pub position: String,
    pub phone_number: String,
}

/// A user account.
///
/// The username is the record key and cannot change after creation. The
/// password is only ever held as a hex SHA-256 digest. Lockout bookkeeping is
/// mutated exclusively by [`crate::libs::auth::AuthManager`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    username: String,
    password_hash: String,
    pub profile: UserProfile,
    pub is_admin: bool,
    pub(crate) last_login: Option<NaiveDateTime>,
    pub(crate) login_attempts: u32,
    pub(crate) is_locked: bool,
    pub(crate) lock_expiry: Option<NaiveDateTime>,
}

impl User {
    pub fn new(username: &str, password: &str, profile: UserProfile, is_admin: bool) -> Self {
        Self::with_password_hash(username, &hash_password(password), profile, is_admin)
    }

    /// Builds an account from an already hashed password.
    pub fn with_password_hash(username: &str, password_hash: &str, profile: UserProfile, is_admin: bool) -> Self {
        User {
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            profile,
            is_admin,
            last_login: None,
            login_attempts: 0,
            is_locked: false,
            lock_expiry: None,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn verify_password(&self, password: &str) -> bool {
        self.password_hash == hash_password(password)
    }

    pub fn set_password(&mut self, password: &str) {
        self.password_hash = hash_password(password);
    }

    pub fn last_login(&self) -> Option<NaiveDateTime> {
        self.last_login
    }

    pub fn login_attempts(&self) -> u32 {
        self.login_attempts
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn lock_expiry(&self) -> Option<NaiveDateTime> {
        self.lock_expiry
    }
}

/// Hex-encoded SHA-256 digest of a plaintext password.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_hex_sha256() {
        assert_eq!(
            hash_password("admin123"),
            "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
        );
        assert_eq!(hash_password("").len(), 64);
    }

    #[test]
    fn verifies_by_rehashing() {
        let mut user = User::new("jdoe", "secret", UserProfile::default(), false);
        assert_ne!(user.password_hash(), "secret");
        assert!(user.verify_password("secret"));
        assert!(!user.verify_password("Secret"));

        user.set_password("other");
        assert!(user.verify_password("other"));
        assert!(!user.verify_password("secret"));
    }

    #[test]
    fn new_accounts_start_active() {
        let user = User::new("jdoe", "secret", UserProfile::default(), false);
        assert_eq!(user.login_attempts(), 0);
        assert!(!user.is_locked());
        assert!(user.lock_expiry().is_none());
        assert!(user.last_login().is_none());
    }
}
