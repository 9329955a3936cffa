//! Session manager - the authoritative in-process view of who is signed in
//!
//! Synchronizes with the identity provider's change notifications and keeps
//! the derived profile row alongside the session. Consumers observe state
//! through a watch channel.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::domain::result::{Error, Result};
use crate::domain::{AuthChange, ProfileUpdate, Role, Session, User};
use crate::ports::{IdentityProvider, ProfileStore};
use crate::scoring::is_valid_handicap;

/// Observable session state
///
/// `Authenticated` with `profile: None` means the provider session exists but
/// no profile row was found yet - a legitimate state during signup, not an
/// error.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// The initial session lookup is still in flight
    Initializing,
    /// No active provider session
    Unauthenticated,
    /// Provider session present, profile loaded if one exists
    Authenticated {
        session: Session,
        profile: Option<User>,
    },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    pub fn profile(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated { profile, .. } => profile.as_ref(),
            _ => None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Authenticated { session, .. } => Some(session),
            _ => None,
        }
    }
}

/// Session lifecycle controller
///
/// All state mutation happens here, driven by the manager's own async
/// completions and the provider's pushed notifications. Completions from a
/// superseded resolution cycle are discarded via the epoch guard.
pub struct SessionManager {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileStore>,
    state: watch::Sender<SessionState>,
    /// Monotonic cycle counter; a completion only commits if the epoch has
    /// not moved since the cycle began.
    epoch: AtomicU64,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SessionManager {
    /// Start the manager: spawn the provider-notification listener and the
    /// initial session resolution
    pub fn start(
        identity: Arc<dyn IdentityProvider>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Arc<Self> {
        let (state, _) = watch::channel(SessionState::Initializing);
        let manager = Arc::new(Self {
            identity: Arc::clone(&identity),
            profiles,
            state,
            epoch: AtomicU64::new(0),
            listener: Mutex::new(None),
        });

        let mut events = identity.subscribe();
        let weak = Arc::downgrade(&manager);
        let listener = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(change) => {
                        let Some(manager) = weak.upgrade() else { break };
                        manager.apply_change(change).await;
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "dropped auth notifications, resyncing");
                        if let Some(manager) = weak.upgrade() {
                            manager.resolve_from_lookup().await;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        if let Ok(mut slot) = manager.listener.lock() {
            *slot = Some(listener);
        }

        let weak = Arc::downgrade(&manager);
        tokio::spawn(async move {
            if let Some(manager) = weak.upgrade() {
                manager.resolve_from_lookup().await;
            }
        });

        manager
    }

    /// Stop listening for provider notifications
    pub fn shutdown(&self) {
        if let Ok(mut slot) = self.listener.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }

    /// Current state snapshot
    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Watch for state changes
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Check credentials with the provider
    ///
    /// Does not mutate state on success: the provider's own sign-in
    /// notification advances the state machine, which avoids racing the
    /// call's return against the async notification.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<()> {
        self.identity.sign_in_with_password(email, password).await?;
        Ok(())
    }

    /// Create an identity and its profile row
    ///
    /// Fails fast if a profile already exists for the email. A profile
    /// insert failure after the identity was created is logged but not
    /// unwound; the account later surfaces as authenticated without a
    /// profile.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
        handicap: f64,
    ) -> Result<()> {
        if !is_valid_handicap(handicap) {
            return Err(Error::validation("handicap must be between 0 and 54"));
        }
        if self.profiles.fetch_by_email(email).await?.is_some() {
            return Err(Error::AlreadyRegistered);
        }

        let identity = self.identity.sign_up(email, password).await?;

        let profile = User::new(
            identity.user_id,
            email,
            first_name,
            last_name,
            handicap,
            Role::Player,
        );
        if let Err(e) = self.profiles.insert(&profile).await {
            error!(user_id = %identity.user_id, error = %e, "profile creation failed after signup");
        }
        Ok(())
    }

    /// Request provider sign-out; state clears via the notification path
    pub async fn sign_out(&self) -> Result<()> {
        self.identity.sign_out().await
    }

    /// Write a partial profile update and merge it into the loaded profile
    ///
    /// The profile store has no change-notification channel, so this is the
    /// one operation that updates local state optimistically on success.
    pub async fn update_profile(&self, patch: &ProfileUpdate) -> Result<User> {
        if let Some(handicap) = patch.handicap {
            if !is_valid_handicap(handicap) {
                return Err(Error::validation("handicap must be between 0 and 54"));
            }
        }

        let mut profile = {
            let state = self.state.borrow();
            match state.profile() {
                Some(profile) => profile.clone(),
                None => return Err(Error::NotAuthenticated),
            }
        };
        let cycle = self.epoch.load(Ordering::SeqCst);

        self.profiles.update(profile.id, patch).await?;
        patch.apply(&mut profile);

        // A sign-out that landed during the store call wins; do not
        // resurrect the profile into a superseded state.
        if self.epoch.load(Ordering::SeqCst) == cycle {
            let merged = profile.clone();
            self.state.send_modify(|state| {
                if let SessionState::Authenticated { profile: slot, .. } = state {
                    *slot = Some(merged);
                }
            });
        }
        Ok(profile)
    }

    /// Begin a resolution cycle, superseding any in-flight one
    fn begin_cycle(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Commit a state transition unless the cycle has been superseded
    fn commit(&self, cycle: u64, next: SessionState) {
        if self.epoch.load(Ordering::SeqCst) == cycle {
            self.state.send_replace(next);
        }
    }

    /// Session lookup followed by profile resolution
    ///
    /// A failed lookup degrades to `Unauthenticated` so consumers are never
    /// stuck observing `Initializing`.
    async fn resolve_from_lookup(&self) {
        let cycle = self.begin_cycle();
        match self.identity.current_session().await {
            Ok(Some(session)) => self.resolve_profile(cycle, session).await,
            Ok(None) => self.commit(cycle, SessionState::Unauthenticated),
            Err(e) => {
                warn!(error = %e, "session lookup failed, treating as signed out");
                self.commit(cycle, SessionState::Unauthenticated);
            }
        }
    }

    /// React to a provider notification
    async fn apply_change(&self, change: AuthChange) {
        let cycle = self.begin_cycle();
        match change.session {
            Some(session) => self.resolve_profile(cycle, session).await,
            None => self.commit(cycle, SessionState::Unauthenticated),
        }
    }

    /// Fetch the profile row for a session and commit the result
    ///
    /// Fetch errors degrade to "no profile" rather than propagating.
    async fn resolve_profile(&self, cycle: u64, session: Session) {
        let profile = match self.profiles.fetch_by_id(session.user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(user_id = %session.user_id, error = %e, "profile fetch failed");
                None
            }
        };
        self.commit(cycle, SessionState::Authenticated { session, profile });
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
