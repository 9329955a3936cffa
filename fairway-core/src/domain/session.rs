//! Session and auth-change domain types
//!
//! A session is owned by the external identity provider; the core only holds
//! a reference and reacts to the provider's pushed change notifications.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reference to the provider's active session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub access_token: String,
}

/// Kind of authentication state change pushed by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

/// Payload of a provider change notification
#[derive(Debug, Clone, PartialEq)]
pub struct AuthChange {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

impl AuthChange {
    pub fn signed_in(session: Session) -> Self {
        Self {
            event: AuthEvent::SignedIn,
            session: Some(session),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            event: AuthEvent::SignedOut,
            session: None,
        }
    }
}
