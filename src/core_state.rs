//! Application session context.
//!
//! `CoreState` owns the logged-in user with a defined lifecycle: set on
//! login or registration, cleared on logout, rehydrated once at startup
//! from the persisted `session` record. Components receive the context
//! explicitly instead of reaching for global state.

use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard};

use crate::config;
use crate::db::{self, DatabaseError};
use crate::models::User;
use crate::portal::Portal;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,

    #[error("No user is logged in")]
    NotLoggedIn,

    #[error("No account found for {0}")]
    UnknownEmail(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub struct CoreState {
    /// Logged-in user. `None` between logout and the next login.
    session: RwLock<Option<User>>,
    db_path: PathBuf,
}

impl CoreState {
    /// Context over the default database location.
    pub fn new() -> Self {
        Self::with_db_path(config::db_path())
    }

    /// Context over an explicit database file (tests, alternate stores).
    pub fn with_db_path(db_path: PathBuf) -> Self {
        Self {
            session: RwLock::new(None),
            db_path,
        }
    }

    /// Open a store connection. Every operation round-trips through the
    /// storage medium, so connections are opened per use.
    pub fn open_db(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_database(&self.db_path).map_err(CoreError::Database)
    }

    // ── Lifecycle ───────────────────────────────────────────

    /// Restore a persisted session, once at startup.
    pub fn rehydrate(&self) -> Result<Option<User>, CoreError> {
        let conn = self.open_db()?;
        let user = db::load_session(&conn)?;
        let mut guard = self.session.write().map_err(|_| CoreError::LockPoisoned)?;
        *guard = user.clone();
        if let Some(u) = &user {
            tracing::info!(user_id = %u.id, "Session rehydrated");
        }
        Ok(user)
    }

    /// Plaintext email lookup standing in for real authentication.
    /// Persists the session record so it survives restarts.
    pub fn login(&self, email: &str) -> Result<User, CoreError> {
        let conn = self.open_db()?;
        let user = db::find_user_by_email(&conn, email)?
            .ok_or_else(|| CoreError::UnknownEmail(email.to_string()))?;
        db::save_session(&conn, &user)?;
        let mut guard = self.session.write().map_err(|_| CoreError::LockPoisoned)?;
        *guard = Some(user.clone());
        tracing::info!(user_id = %user.id, role = user.role.as_str(), "Logged in");
        Ok(user)
    }

    /// Self-registration creates the patient record and logs it in.
    pub fn register(&self, name: &str, email: &str) -> Result<User, CoreError> {
        let conn = self.open_db()?;
        let user = db::register_patient(&conn, name, email)?.user();
        db::save_session(&conn, &user)?;
        let mut guard = self.session.write().map_err(|_| CoreError::LockPoisoned)?;
        *guard = Some(user.clone());
        Ok(user)
    }

    /// Clear both the in-memory session and the persisted record.
    pub fn logout(&self) -> Result<(), CoreError> {
        let conn = self.open_db()?;
        db::clear_session(&conn)?;
        let mut guard = self.session.write().map_err(|_| CoreError::LockPoisoned)?;
        *guard = None;
        tracing::info!("Logged out");
        Ok(())
    }

    // ── Access ──────────────────────────────────────────────

    pub fn read_session(&self) -> Result<RwLockReadGuard<'_, Option<User>>, CoreError> {
        self.session.read().map_err(|_| CoreError::LockPoisoned)
    }

    pub fn current_user(&self) -> Result<Option<User>, CoreError> {
        Ok(self.read_session()?.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.session
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    /// Resolve the logged-in user into their role portal, once at the
    /// routing boundary. Role dispatch happens here and nowhere else.
    pub fn portal(&self) -> Result<Portal, CoreError> {
        let guard = self.read_session()?;
        let user = guard.as_ref().ok_or(CoreError::NotLoggedIn)?;
        Ok(Portal::for_user(user))
    }
}

impl Default for CoreState {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════
