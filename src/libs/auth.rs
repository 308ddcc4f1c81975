//! Login decisions and the account lockout state machine.
//!
//! ```text
//!            failure (n + 1 < max)
//!           ┌──────────────┐
//!           ▼              │
//!   ┌──────────────┐  failure (n + 1 == max)  ┌──────────────────┐
//!   │  Active(n)   │ ────────────────────────▶│  Locked(expiry)  │
//!   └──────────────┘                          └──────────────────┘
//!           ▲      success / unlock                   │
//!           └─────────────────────────────────────────┘
//! ```
//!
//! A locked account rejects every login without looking at the password and
//! without touching its counters. The expiry is recorded but never evaluated:
//! an account leaves `Locked` only through [`AuthManager::unlock`] (or any other
//! path that applies [`LockoutPolicy::record_success`]).
//!
//! Every transition is written through [`UserStore::update`] before the login
//! result is returned, and every attempt is appended to the login history.

use crate::db::login_history::{LoginHistory, LoginStatus};
use crate::db::users::UserStore;
use crate::libs::config::AuthConfig;
use crate::libs::error::AuthError;
use crate::libs::formatter;
use crate::libs::user::{User, UserProfile};
use chrono::{Duration, NaiveDateTime};
use tracing::{debug, info, warn};

pub const MAX_LOGIN_ATTEMPTS: u32 = 3;
pub const LOCKOUT_MINUTES: u32 = 30;

/// Where an account stands in the lockout state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountState {
    Active { attempts: u32 },
    Locked { until: Option<NaiveDateTime> },
}

impl AccountState {
    pub fn of(user: &User) -> Self {
        if user.is_locked() {
            AccountState::Locked { until: user.lock_expiry() }
        } else {
            AccountState::Active {
                attempts: user.login_attempts(),
            }
        }
    }
}

/// How many consecutive failures lock an account and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    pub max_attempts: u32,
    pub lockout: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        LockoutPolicy {
            max_attempts: MAX_LOGIN_ATTEMPTS,
            lockout: Duration::minutes(i64::from(LOCKOUT_MINUTES)),
        }
    }
}

impl From<&AuthConfig> for LockoutPolicy {
    fn from(config: &AuthConfig) -> Self {
        LockoutPolicy {
            max_attempts: config.max_attempts.max(1),
            lockout: Duration::minutes(i64::from(config.lockout_minutes)),
        }
    }
}

impl LockoutPolicy {
    /// Counts one failed attempt, locking the account on the attempt that
    /// reaches `max_attempts`.
    pub fn record_failure(&self, user: &mut User, now: NaiveDateTime) -> AccountState {
        user.login_attempts = user.login_attempts.saturating_add(1);
        if user.login_attempts >= self.max_attempts && !user.is_locked {
            user.is_locked = true;
            user.lock_expiry = Some(now + self.lockout);
        }
        AccountState::of(user)
    }

    /// Returns the account to `Active(0)` and stamps the login time.
    pub fn record_success(&self, user: &mut User, now: NaiveDateTime) {
        self.clear(user);
        user.last_login = Some(now);
    }

    fn clear(&self, user: &mut User) {
        user.login_attempts = 0;
        user.is_locked = false;
        user.lock_expiry = None;
    }
}

/// Authentication operations over the user collection.
///
/// Holds no state of its own: it borrows the store and history for the
/// duration of the calls made through it.
pub struct AuthManager<'a> {
    users: &'a mut UserStore,
    history: &'a LoginHistory,
    policy: LockoutPolicy,
}

impl<'a> AuthManager<'a> {
    pub fn new(users: &'a mut UserStore, history: &'a LoginHistory, policy: LockoutPolicy) -> Self {
        AuthManager { users, history, policy }
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<User, AuthError> {
        self.login_at(username, password, formatter::now())
    }

    /// Login decision evaluated at `now`.
    pub fn login_at(&mut self, username: &str, password: &str, now: NaiveDateTime) -> Result<User, AuthError> {
        let Some(mut user) = self.users.get(username) else {
            debug!(username, "login for unknown user");
            self.history.record(username, now, LoginStatus::FailedUnknownUser);
            return Err(AuthError::InvalidCredentials);
        };

        if let AccountState::Locked { until } = AccountState::of(&user) {
            warn!(username, "login rejected, account is locked");
            self.history.record(username, now, LoginStatus::FailedLocked);
            return Err(AuthError::Locked { until });
        }

        if user.verify_password(password) {
            self.policy.record_success(&mut user, now);
            self.users.update(user.clone())?;
            self.history.record(username, now, LoginStatus::Success);
            info!(username, "login succeeded");
            return Ok(user);
        }

        let state = self.policy.record_failure(&mut user, now);
        self.users.update(user)?;
        self.history.record(username, now, LoginStatus::FailedInvalidPassword);
        match state {
            AccountState::Locked { until } => info!(username, until = ?until, "account locked after repeated failures"),
            AccountState::Active { attempts } => debug!(username, attempts, "login failed"),
        }
        Err(AuthError::InvalidCredentials)
    }

    /// Clears failed attempts and any lock without recording a login.
    pub fn unlock(&mut self, username: &str) -> Result<User, AuthError> {
        let mut user = self.users.get(username).ok_or(AuthError::InvalidCredentials)?;
        self.policy.clear(&mut user);
        self.users.update(user.clone())?;
        info!(username, "account unlocked");
        Ok(user)
    }

    /// Creates a regular (non-admin) account.
    pub fn register(&mut self, username: &str, password: &str, profile: UserProfile) -> Result<User, AuthError> {
        let user = User::new(username, password, profile, false);
        self.users.add(user.clone())?;
        info!(username, "account registered");
        Ok(user)
    }

    /// Sets a new password for the account whose username and email both
    /// match. Lockout state is left as it is.
    pub fn reset_password(&mut self, username: &str, email: &str, new_password: &str) -> Result<(), AuthError> {
        let mut user = self
            .users
            .get(username)
            .filter(|user| user.profile.email == email)
            .ok_or(AuthError::InvalidCredentials)?;
        user.set_password(new_password);
        self.users.update(user)?;
        info!(username, "password reset");
        Ok(())
    }

    pub fn state(&self, username: &str) -> Option<AccountState> {
        self.users.get(username).map(|user| AccountState::of(&user))
    }
}
