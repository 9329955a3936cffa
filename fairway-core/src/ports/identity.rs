//! Identity provider port
//!
//! The contract consumed from the hosted identity service. The provider owns
//! sessions and credentials; the core only reacts to its state.

use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::{AuthChange, Session};

/// A freshly created identity, before any profile row exists for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewIdentity {
    pub user_id: Uuid,
}

/// Hosted identity service abstraction
///
/// Implementations delegate credential checks and session management to an
/// external provider and push state changes over the subscription channel.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Look up the currently active session, if any
    ///
    /// Absence of a session is not an error.
    async fn current_session(&self) -> Result<Option<Session>>;

    /// Check credentials and open a session
    ///
    /// Provider rejections come back as [`crate::domain::result::Error::Provider`]
    /// with the provider's message.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session>;

    /// Create a new identity for the given credentials
    async fn sign_up(&self, email: &str, password: &str) -> Result<NewIdentity>;

    /// Close the active session
    async fn sign_out(&self) -> Result<()>;

    /// Subscribe to authentication state changes
    ///
    /// Dropping the receiver deregisters the subscription.
    fn subscribe(&self) -> broadcast::Receiver<AuthChange>;
}
