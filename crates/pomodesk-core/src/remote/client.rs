//! HTTP client for the hosted session table (PostgREST-style API).

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::RemoteError;
use crate::stats::Session;
use crate::storage::RemoteConfig;
use crate::timer::TimerMode;

/// Wire shape of one session row.
#[derive(Debug, Serialize, Deserialize)]
struct SessionRow {
    user_id: String,
    duration_minutes: f64,
    mode: String,
    occurred_at: DateTime<Utc>,
}

impl SessionRow {
    fn from_session(session: &Session, user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            duration_minutes: session.duration_minutes,
            mode: session.mode.as_str().to_string(),
            occurred_at: session.occurred_at,
        }
    }

    fn into_session(self) -> Session {
        Session {
            duration_minutes: self.duration_minutes,
            mode: TimerMode::from_str_lossy(&self.mode),
            occurred_at: self.occurred_at,
        }
    }
}

/// Client for a remote CRUD session table keyed by user identity.
#[derive(Debug)]
pub struct RemoteStore {
    base: Url,
    api_key: String,
    user_id: String,
    client: Client,
}

impl RemoteStore {
    /// Build a store from config values.
    ///
    /// # Errors
    /// Returns `InvalidBaseUrl` if the configured base URL does not parse.
    pub fn new(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let base = Url::parse(&config.base_url)
            .map_err(|_| RemoteError::InvalidBaseUrl(config.base_url.clone()))?;
        Ok(Self {
            base,
            api_key: config.api_key.clone(),
            user_id: config.user_id.clone(),
            client: Client::new(),
        })
    }

    fn sessions_url(&self) -> Result<Url, RemoteError> {
        self.base
            .join("rest/v1/sessions")
            .map_err(|_| RemoteError::InvalidBaseUrl(self.base.to_string()))
    }

    /// Insert one completed session for the configured user.
    pub async fn insert_session(&self, session: &Session) -> Result<(), RemoteError> {
        let url = self.sessions_url()?;
        let row = SessionRow::from_session(session, &self.user_id);
        tracing::debug!(mode = session.mode.as_str(), "pushing session to remote store");

        let resp = self
            .client
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(RemoteError::Status { status, body })
        }
    }

    /// Sessions for the configured user with `from <= occurred_at < to`,
    /// oldest first.
    pub async fn sessions_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Session>, RemoteError> {
        let mut url = self.sessions_url()?;
        url.query_pairs_mut()
            .append_pair("user_id", &format!("eq.{}", self.user_id))
            .append_pair("occurred_at", &format!("gte.{}", from.to_rfc3339()))
            .append_pair("occurred_at", &format!("lt.{}", to.to_rfc3339()))
            .append_pair("order", "occurred_at.asc");
        self.fetch_rows(url).await
    }

    /// The user's most recent sessions, newest first.
    pub async fn recent_sessions(&self, limit: usize) -> Result<Vec<Session>, RemoteError> {
        let mut url = self.sessions_url()?;
        url.query_pairs_mut()
            .append_pair("user_id", &format!("eq.{}", self.user_id))
            .append_pair("order", "occurred_at.desc")
            .append_pair("limit", &limit.to_string());
        self.fetch_rows(url).await
    }

    async fn fetch_rows(&self, url: Url) -> Result<Vec<Session>, RemoteError> {
        tracing::debug!(%url, "querying remote session store");
        let resp = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(RemoteError::Status { status, body });
        }

        let rows: Vec<SessionRow> = resp
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(rows.into_iter().map(SessionRow::into_session).collect())
    }
}
