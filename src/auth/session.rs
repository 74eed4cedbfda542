//! Session Store
//!
//! Persists the auth token and user profile next to the cart, and answers
//! whether checkout may proceed.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{LedgerError, Result};
use crate::store::KeyValueStore;

/// Key of the persisted bearer token.
pub const TOKEN_KEY: &str = "token";

/// Key of the persisted user profile.
pub const USER_KEY: &str = "user";

// == Role ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Regular customer
    #[default]
    User,
    /// Store administrator
    Admin,
}

// == User ==
/// The profile kept for the signed-in user. Never contains the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

// == Session ==
/// An authenticated session: a token plus its user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

// == Auth Response ==
/// Body returned by the auth service on register and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(rename = "type", default)]
    pub token_type: Option<String>,
    pub user_id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthResponse {
    /// The user profile carried by this response.
    pub fn user(&self) -> User {
        User {
            id: self.user_id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

// == Session Store ==
/// Reads and writes the session entries of a key-value store.
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // == Save ==
    /// Stores the token and user of a successful auth response.
    ///
    /// A response without a token leaves the stored session unchanged and
    /// returns None.
    pub fn save(&self, response: &AuthResponse) -> Result<Option<Session>> {
        let Some(token) = response.token.clone() else {
            return Ok(None);
        };
        let user = response.user();
        let encoded =
            serde_json::to_string(&user).map_err(|e| LedgerError::Internal(e.to_string()))?;

        self.store.set(TOKEN_KEY, token.clone());
        self.store.set(USER_KEY, encoded);
        info!(user = %user.email, role = ?user.role, "session stored");

        Ok(Some(Session { token, user }))
    }

    // == Current User ==
    /// The stored user, or None when missing or unreadable.
    pub fn current_user(&self) -> Option<User> {
        let raw = self.store.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(error = %err, "discarding unreadable user entry");
                None
            }
        }
    }

    // == Is Authenticated ==
    /// True when a token is stored.
    pub fn is_authenticated(&self) -> bool {
        self.store.get(TOKEN_KEY).is_some_and(|token| !token.is_empty())
    }

    // == Session ==
    /// The full session, present only when both token and user are stored.
    pub fn session(&self) -> Option<Session> {
        let token = self.store.get(TOKEN_KEY).filter(|token| !token.is_empty())?;
        let user = self.current_user()?;
        Some(Session { token, user })
    }

    // == Logout ==
    /// Clears the token and user.
    pub fn logout(&self) {
        self.store.remove(TOKEN_KEY);
        self.store.remove(USER_KEY);
        info!("session cleared");
    }
}
