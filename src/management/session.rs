use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    types::{Credential, Token},
    utils,
};

pub const SESSION_COOKIE: &str = "vibecheck_session";

/// Sessions that never completed the login are dropped after this long.
/// Logged-in sessions are dropped once their credential expires.
const PENDING_LOGIN_TTL_SECS: i64 = 600;

#[derive(Debug, Clone, Default)]
struct Session {
    code_verifier: Option<String>,
    oauth_state: Option<String>,
    credential: Option<Credential>,
    created_at: i64,
}

impl Session {
    /// Logged in with a credential that has not expired yet, or still waiting
    /// for a recent login to complete.
    fn is_live(&self, now: i64) -> bool {
        match &self.credential {
            Some(credential) => !credential.is_expired(),
            None => now - self.created_at < PENDING_LOGIN_TTL_SECS,
        }
    }
}

/// In-memory map of browser sessions to pending logins and credentials.
///
/// Nothing is persisted; restarting the server logs everybody out.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new session holding the PKCE verifier and OAuth state of a
    /// login that is about to start. Returns the session ID.
    pub async fn begin_login(&self, code_verifier: String, oauth_state: String) -> String {
        let id = utils::generate_session_id();
        let now = Utc::now().timestamp();

        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, s| s.is_live(now));
        sessions.insert(
            id.clone(),
            Session {
                code_verifier: Some(code_verifier),
                oauth_state: Some(oauth_state),
                credential: None,
                created_at: now,
            },
        );
        id
    }

    /// Hands out the PKCE verifier of a pending login if `oauth_state`
    /// matches. The pending state is consumed either way.
    pub async fn take_verifier(&self, session_id: &str, oauth_state: &str) -> Option<String> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions.get_mut(session_id)?;
        let expected = session.oauth_state.take();
        let verifier = session.code_verifier.take();

        (expected.as_deref() == Some(oauth_state))
            .then_some(verifier)
            .flatten()
    }

    pub async fn complete_login(&self, session_id: &str, token: &Token) -> bool {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(session_id) {
            Some(session) => {
                session.credential = Some(Credential::from_token(token));
                true
            }
            None => false,
        }
    }

    /// Returns the credential of a session, expired or not; the pipeline
    /// decides what an expired one means.
    pub async fn credential(&self, session_id: &str) -> Option<Credential> {
        let sessions = self.sessions.lock().await;
        sessions.get(session_id)?.credential.clone()
    }

    pub async fn logout(&self, session_id: &str) {
        self.sessions.lock().await.remove(session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_in: u64, obtained_at: u64) -> Token {
        Token {
            access_token: "token".to_string(),
            refresh_token: None,
            scope: String::new(),
            expires_in,
            obtained_at,
        }
    }

    async fn session_count(store: &SessionStore) -> usize {
        store.sessions.lock().await.len()
    }

    async fn logged_in(store: &SessionStore, token: &Token) -> String {
        let id = store
            .begin_login("verifier".to_string(), "state".to_string())
            .await;
        assert!(store.complete_login(&id, token).await);
        id
    }

    #[tokio::test]
    async fn expired_logins_are_pruned() {
        let store = SessionStore::new();
        let stale = token(60, 1_000);
        for _ in 0..100 {
            logged_in(&store, &stale).await;
        }

        store
            .begin_login("verifier".to_string(), "state".to_string())
            .await;

        assert_eq!(session_count(&store).await, 1);
    }

    #[tokio::test]
    async fn live_and_pending_sessions_are_kept() {
        let store = SessionStore::new();
        let fresh = token(3600, Utc::now().timestamp() as u64);
        let active = logged_in(&store, &fresh).await;
        let pending = store
            .begin_login("verifier".to_string(), "state".to_string())
            .await;

        store
            .begin_login("verifier".to_string(), "state".to_string())
            .await;

        assert_eq!(session_count(&store).await, 3);
        assert!(store.credential(&active).await.is_some());
        assert_eq!(
            store.take_verifier(&pending, "state").await.as_deref(),
            Some("verifier")
        );
    }

    #[tokio::test]
    async fn verifier_requires_matching_state() {
        let store = SessionStore::new();
        let id = store
            .begin_login("verifier".to_string(), "state".to_string())
            .await;

        assert_eq!(store.take_verifier(&id, "forged").await, None);
        // consumed by the failed attempt
        assert_eq!(store.take_verifier(&id, "state").await, None);
    }
}
