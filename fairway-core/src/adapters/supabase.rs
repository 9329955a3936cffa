//! Supabase REST client
//!
//! Talks to the hosted backend over its GoTrue auth endpoints and PostgREST
//! tables. The adapter keeps the session client-side (persisted to
//! `session.json` when a storage directory is given) and emits its own
//! auth-change notifications after successful auth calls, the way the hosted
//! client library does.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast;
use tracing::warn;
use url::Url;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{
    AuthChange, ProfileUpdate, Score, Session, Team, Tour, User,
};
use crate::ports::{IdentityProvider, NewIdentity, ProfileStore, ScoreStore, TourStore};

const SESSION_FILE: &str = "session.json";

/// REST client for a Supabase-style hosted backend
pub struct SupabaseClient {
    http: Client,
    base_url: String,
    anon_key: String,
    session: Mutex<Option<Session>>,
    session_path: Option<PathBuf>,
    events: broadcast::Sender<AuthChange>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: GoTrueUser,
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: Uuid,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScoreRow {
    id: Uuid,
    tour_id: Uuid,
    team_id: Uuid,
    player_id: Uuid,
    course_id: Uuid,
    date_played: NaiveDate,
    hole1: u32,
    hole2: u32,
    hole3: u32,
    hole4: u32,
    hole5: u32,
    hole6: u32,
    hole7: u32,
    hole8: u32,
    hole9: u32,
    hole10: u32,
    hole11: u32,
    hole12: u32,
    hole13: u32,
    hole14: u32,
    hole15: u32,
    hole16: u32,
    hole17: u32,
    hole18: u32,
    gross: u32,
    net: u32,
    eagles: u32,
    birdies: u32,
    three_putts: u32,
    rings: u32,
    #[serde(default)]
    deleted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ScoreRow> for Score {
    fn from(row: ScoreRow) -> Self {
        Score {
            id: row.id,
            tour_id: row.tour_id,
            team_id: row.team_id,
            player_id: row.player_id,
            course_id: row.course_id,
            date_played: row.date_played,
            holes: [
                row.hole1, row.hole2, row.hole3, row.hole4, row.hole5, row.hole6, row.hole7,
                row.hole8, row.hole9, row.hole10, row.hole11, row.hole12, row.hole13, row.hole14,
                row.hole15, row.hole16, row.hole17, row.hole18,
            ],
            gross: row.gross,
            net: row.net,
            eagles: row.eagles,
            birdies: row.birdies,
            three_putts: row.three_putts,
            rings: row.rings,
            deleted_at: row.deleted_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl SupabaseClient {
    /// Create a client for the given project URL and anon key
    ///
    /// HTTPS is required except for localhost development stacks. When a
    /// storage directory is given, the session persists across processes.
    pub fn new(base_url: &str, anon_key: &str, storage_dir: Option<&Path>) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| Error::config(format!("invalid backend URL: {}", e)))?;
        let is_local = matches!(parsed.host_str(), Some("localhost" | "127.0.0.1"));
        if parsed.scheme() != "https" && !(parsed.scheme() == "http" && is_local) {
            return Err(Error::config("backend URL must use HTTPS"));
        }
        if anon_key.trim().is_empty() {
            return Err(Error::config("backend anon key must not be empty"));
        }

        let session_path = storage_dir.map(|dir| dir.join(SESSION_FILE));
        let session = session_path
            .as_deref()
            .and_then(Self::load_persisted_session);

        let (events, _) = broadcast::channel(16);
        Ok(Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            session: Mutex::new(session),
            session_path,
            events,
        })
    }

    fn load_persisted_session(path: &Path) -> Option<Session> {
        let content = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable persisted session");
                None
            }
        }
    }

    fn store_session(&self, session: Option<Session>) {
        if let Ok(mut slot) = self.session.lock() {
            *slot = session.clone();
        }
        let Some(path) = &self.session_path else {
            return;
        };
        let outcome = match &session {
            Some(session) => {
                serde_json::to_string_pretty(session).map_err(Error::from).and_then(|content| {
                    std::fs::write(path, content).map_err(Error::from)
                })
            }
            None => {
                if path.exists() {
                    std::fs::remove_file(path).map_err(Error::from)
                } else {
                    Ok(())
                }
            }
        };
        if let Err(e) = outcome {
            warn!(error = %e, "failed to persist session");
        }
    }

    fn cached_session(&self) -> Option<Session> {
        self.session.lock().ok().and_then(|slot| slot.clone())
    }

    fn emit(&self, change: AuthChange) {
        let _ = self.events.send(change);
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Attach the apikey and bearer headers PostgREST expects
    fn with_rest_headers(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header("apikey", &self.anon_key);
        match self.cached_session() {
            Some(session) => builder.bearer_auth(session.access_token),
            None => builder.bearer_auth(&self.anon_key),
        }
    }

    /// Turn a non-success response into a provider error with the backend's
    /// own message when one is present
    async fn provider_error(response: Response) -> Error {
        let status = response.status();
        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let message = body
            .get("error_description")
            .or_else(|| body.get("msg"))
            .or_else(|| body.get("message"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("request failed with status {}", status));
        Error::Provider(message)
    }

    async fn expect_success(response: Response) -> Result<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::provider_error(response).await)
        }
    }
}

#[async_trait]
impl IdentityProvider for SupabaseClient {
    async fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.cached_session())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .http
            .post(format!("{}?grant_type=password", self.auth_url("token")))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        let token: TokenResponse = response.json().await?;

        let session = Session {
            user_id: token.user.id,
            email: token.user.email.unwrap_or_else(|| email.to_string()),
            access_token: token.access_token,
        };
        self.store_session(Some(session.clone()));
        self.emit(AuthChange::signed_in(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<NewIdentity> {
        let response = self
            .http
            .post(self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let response = Self::expect_success(response).await?;

        // The user object arrives at the top level or nested depending on
        // whether confirmations are enabled.
        let body: serde_json::Value = response.json().await?;
        let user_id = body
            .get("user")
            .and_then(|u| u.get("id"))
            .or_else(|| body.get("id"))
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
            .ok_or_else(|| Error::provider("signup response missing user id"))?;

        Ok(NewIdentity { user_id })
    }

    async fn sign_out(&self) -> Result<()> {
        let Some(session) = self.cached_session() else {
            return Ok(());
        };

        let response = self
            .http
            .post(self.auth_url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;
        let status = response.status();
        // An already-expired token still counts as signed out locally.
        if !status.is_success() && status != StatusCode::UNAUTHORIZED {
            return Err(Self::provider_error(response).await);
        }

        self.store_session(None);
        self.emit(AuthChange::signed_out());
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }
}

#[async_trait]
impl ProfileStore for SupabaseClient {
    async fn fetch_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let response = self
            .with_rest_headers(self.http.get(self.rest_url("users")))
            .query(&[("id", format!("eq.{}", id)), ("select", "*".to_string())])
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        let rows: Vec<User> = response.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Option<User>> {
        let response = self
            .with_rest_headers(self.http.get(self.rest_url("users")))
            .query(&[
                ("email", format!("eq.{}", email.to_lowercase())),
                ("select", "*".to_string()),
            ])
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        let rows: Vec<User> = response.json().await?;
        Ok(rows.into_iter().next())
    }

    async fn insert(&self, profile: &User) -> Result<()> {
        let response = self
            .with_rest_headers(self.http.post(self.rest_url("users")))
            .header("Prefer", "return=minimal")
            .json(profile)
            .send()
            .await?;
        Self::expect_success(response).await?;
        Ok(())
    }

    async fn update(&self, id: Uuid, patch: &ProfileUpdate) -> Result<()> {
        let response = self
            .with_rest_headers(self.http.patch(self.rest_url("users")))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;
        Self::expect_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl TourStore for SupabaseClient {
    async fn fetch_active(&self) -> Result<Option<Tour>> {
        let response = self
            .with_rest_headers(self.http.get(self.rest_url("tours")))
            .query(&[
                ("is_active", "eq.true".to_string()),
                ("select", "*".to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        let rows: Vec<Tour> = response.json().await?;
        Ok(rows.into_iter().next())
    }
}

#[async_trait]
impl ScoreStore for SupabaseClient {
    async fn fetch_for_tour(&self, tour_id: Uuid) -> Result<Vec<Score>> {
        let response = self
            .with_rest_headers(self.http.get(self.rest_url("scores")))
            .query(&[
                ("tour_id", format!("eq.{}", tour_id)),
                ("select", "*".to_string()),
            ])
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        let rows: Vec<ScoreRow> = response.json().await?;
        Ok(rows.into_iter().map(Score::from).collect())
    }

    async fn fetch_teams(&self, tour_id: Uuid) -> Result<Vec<Team>> {
        let response = self
            .with_rest_headers(self.http.get(self.rest_url("teams")))
            .query(&[
                ("tour_id", format!("eq.{}", tour_id)),
                ("select", "*".to_string()),
            ])
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        Ok(response.json().await?)
    }
}
