//! In-memory backend for demo mode and tests
//!
//! Implements every port against process-local state and simulates the
//! hosted client's behavior, including the locally emitted auth-change
//! notifications. Failure knobs in [`MemoryConfig`] let tests exercise the
//! degraded paths without a real backend.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, Duration as ChronoDuration, Utc};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{
    AuthChange, Course, ProfileUpdate, Role, Score, Session, Team, Tour, User,
};
use crate::ports::{IdentityProvider, NewIdentity, ProfileStore, ScoreStore, TourStore};

/// Credentials of the seeded demo account
pub const DEMO_EMAIL: &str = "demo@fairway.golf";
pub const DEMO_PASSWORD: &str = "fairway-demo";

/// Failure and latency knobs for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryConfig {
    /// Delay before every profile fetch completes
    pub profile_delay_ms: u64,
    /// Fail the session lookup (initial resolution path)
    pub fail_session_lookup: bool,
    /// Fail profile fetches
    pub fail_profile_fetch: bool,
    /// Fail profile inserts (signup inconsistency window)
    pub fail_profile_insert: bool,
}

struct Account {
    user_id: Uuid,
    password: String,
}

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<String, Account>,
    profiles: HashMap<Uuid, User>,
    session: Option<Session>,
    active_tour: Option<Tour>,
    courses: Vec<Course>,
    teams: Vec<Team>,
    scores: Vec<Score>,
}

/// Process-local backend implementing all ports
pub struct MemoryBackend {
    config: MemoryConfig,
    state: Mutex<MemoryState>,
    events: broadcast::Sender<AuthChange>,
}

impl MemoryBackend {
    pub fn new(config: MemoryConfig) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            config,
            state: Mutex::new(MemoryState::default()),
            events,
        }
    }

    /// A backend pre-seeded with a demo account, tour, teams and scores
    pub fn with_demo_data() -> Self {
        let backend = Self::new(MemoryConfig::default());
        backend.seed_demo_data();
        backend
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| Error::Other("memory state lock poisoned".to_string()))
    }

    /// Register an account without signing it in; returns the new user id
    pub fn add_account(&self, email: &str, password: &str) -> Uuid {
        let user_id = Uuid::new_v4();
        if let Ok(mut state) = self.state.lock() {
            state.accounts.insert(
                email.to_lowercase(),
                Account {
                    user_id,
                    password: password.to_string(),
                },
            );
        }
        user_id
    }

    pub fn add_profile(&self, profile: User) {
        if let Ok(mut state) = self.state.lock() {
            state.profiles.insert(profile.id, profile);
        }
    }

    /// Direct profile access for test assertions
    pub fn profile(&self, id: Uuid) -> Option<User> {
        self.state.lock().ok()?.profiles.get(&id).cloned()
    }

    pub fn set_active_tour(&self, tour: Tour) {
        if let Ok(mut state) = self.state.lock() {
            state.active_tour = Some(tour);
        }
    }

    pub fn add_team(&self, team: Team) {
        if let Ok(mut state) = self.state.lock() {
            state.teams.push(team);
        }
    }

    pub fn add_score(&self, score: Score) {
        if let Ok(mut state) = self.state.lock() {
            state.scores.push(score);
        }
    }

    fn seed_demo_data(&self) {
        let demo_id = self.add_account(DEMO_EMAIL, DEMO_PASSWORD);
        self.add_profile(User::new(
            demo_id,
            DEMO_EMAIL,
            "Demo",
            "Player",
            12.4,
            Role::Admin,
        ));

        let today = Utc::now().date_naive();
        let tour = Tour::new(
            Uuid::new_v4(),
            "Fairway Tour",
            today.year(),
            today + ChronoDuration::days(30),
        );
        let tour_id = tour.id;
        self.set_active_tour(tour);

        let course = Course::new(Uuid::new_v4(), "Pine Valley", 72, 73.5, 130);
        let course_id = course.id;
        if let Ok(mut state) = self.state.lock() {
            state.courses.push(course);
        }

        let eagles = Team::new(Uuid::new_v4(), tour_id, "The Eagles", demo_id);
        let hackers = Team::new(Uuid::new_v4(), tour_id, "The Hackers", Uuid::new_v4());

        let now = Utc::now();
        let seed_score = |team: &Team, gross: u32, net: u32, birdies: u32| Score {
            id: Uuid::new_v4(),
            tour_id,
            team_id: team.id,
            player_id: team.captain_id,
            course_id,
            date_played: today - ChronoDuration::days(365),
            holes: [4; 18],
            gross,
            net,
            eagles: 0,
            birdies,
            three_putts: 2,
            rings: 1,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        let scores = vec![
            seed_score(&eagles, 84, 71, 3),
            seed_score(&eagles, 88, 75, 1),
            seed_score(&hackers, 95, 82, 0),
            seed_score(&hackers, 99, 86, 1),
        ];

        if let Ok(mut state) = self.state.lock() {
            state.teams = vec![eagles, hackers];
            state.scores = scores;
        }
    }

    fn emit(&self, change: AuthChange) {
        // No receivers is fine; the manager may not be listening yet.
        let _ = self.events.send(change);
    }
}

#[async_trait]
impl IdentityProvider for MemoryBackend {
    async fn current_session(&self) -> Result<Option<Session>> {
        if self.config.fail_session_lookup {
            return Err(Error::provider("session lookup failed"));
        }
        Ok(self.lock()?.session.clone())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let session = {
            let mut state = self.lock()?;
            let account = state
                .accounts
                .get(&email.to_lowercase())
                .filter(|a| a.password == password)
                .ok_or_else(|| Error::provider("Invalid login credentials"))?;
            let session = Session {
                user_id: account.user_id,
                email: email.to_lowercase(),
                access_token: Uuid::new_v4().to_string(),
            };
            state.session = Some(session.clone());
            session
        };
        self.emit(AuthChange::signed_in(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<NewIdentity> {
        let mut state = self.lock()?;
        let key = email.to_lowercase();
        if state.accounts.contains_key(&key) {
            return Err(Error::provider("User already registered"));
        }
        let user_id = Uuid::new_v4();
        state.accounts.insert(
            key,
            Account {
                user_id,
                password: password.to_string(),
            },
        );
        // No session is opened: like a provider with confirmations on, the
        // account signs in explicitly afterwards.
        Ok(NewIdentity { user_id })
    }

    async fn sign_out(&self) -> Result<()> {
        self.lock()?.session = None;
        self.emit(AuthChange::signed_out());
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }
}

#[async_trait]
impl ProfileStore for MemoryBackend {
    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<User>> {
        if self.config.profile_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.profile_delay_ms)).await;
        }
        if self.config.fail_profile_fetch {
            return Err(Error::provider("profile fetch failed"));
        }
        Ok(self.lock()?.profiles.get(&id).cloned())
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Option<User>> {
        let needle = email.to_lowercase();
        Ok(self
            .lock()?
            .profiles
            .values()
            .find(|p| p.email.to_lowercase() == needle)
            .cloned())
    }

    async fn insert(&self, profile: &User) -> Result<()> {
        if self.config.fail_profile_insert {
            return Err(Error::provider("profile insert failed"));
        }
        self.lock()?.profiles.insert(profile.id, profile.clone());
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &ProfileUpdate) -> Result<()> {
        let mut state = self.lock()?;
        let profile = state
            .profiles
            .get_mut(&id)
            .ok_or_else(|| Error::not_found(format!("profile {}", id)))?;
        patch.apply(profile);
        Ok(())
    }
}

#[async_trait]
impl TourStore for MemoryBackend {
    async fn fetch_active(&self) -> Result<Option<Tour>> {
        Ok(self.lock()?.active_tour.clone().filter(|t| t.is_active))
    }
}

#[async_trait]
impl ScoreStore for MemoryBackend {
    async fn fetch_for_tour(&self, tour_id: Uuid) -> Result<Vec<Score>> {
        Ok(self
            .lock()?
            .scores
            .iter()
            .filter(|s| s.tour_id == tour_id)
            .cloned()
            .collect())
    }

    async fn fetch_teams(&self, tour_id: Uuid) -> Result<Vec<Team>> {
        Ok(self
            .lock()?
            .teams
            .iter()
            .filter(|t| t.tour_id == tour_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_in_rejects_bad_credentials() {
        let backend = MemoryBackend::new(MemoryConfig::default());
        backend.add_account("sam@example.com", "secret");

        let err = backend
            .sign_in_with_password("sam@example.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Provider(_)));

        let session = backend
            .sign_in_with_password("sam@example.com", "secret")
            .await
            .unwrap();
        assert_eq!(session.email, "sam@example.com");
        assert_eq!(backend.current_session().await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn test_sign_in_emits_notification() {
        let backend = MemoryBackend::new(MemoryConfig::default());
        backend.add_account("sam@example.com", "secret");
        let mut events = backend.subscribe();

        backend
            .sign_in_with_password("sam@example.com", "secret")
            .await
            .unwrap();
        let change = events.recv().await.unwrap();
        assert!(change.session.is_some());

        backend.sign_out().await.unwrap();
        let change = events.recv().await.unwrap();
        assert!(change.session.is_none());
    }

    #[tokio::test]
    async fn test_profile_update_missing_row() {
        let backend = MemoryBackend::new(MemoryConfig::default());
        let err = backend
            .update(Uuid::new_v4(), &ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_demo_seed_is_consistent() {
        let backend = MemoryBackend::with_demo_data();
        let tour = backend.fetch_active().await.unwrap().expect("active tour");
        let teams = backend.fetch_teams(tour.id).await.unwrap();
        let scores = backend.fetch_for_tour(tour.id).await.unwrap();

        assert_eq!(teams.len(), 2);
        assert!(!scores.is_empty());
        assert!(scores.iter().all(|s| s.tour_id == tour.id));

        let demo = backend
            .fetch_by_email(DEMO_EMAIL)
            .await
            .unwrap()
            .expect("demo profile");
        assert_eq!(demo.role, Role::Admin);
    }
}
