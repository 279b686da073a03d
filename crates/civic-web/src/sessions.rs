//! In-process session token store.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use engine::SessionContext;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct StoredSession {
    context: SessionContext,
    expires_at: DateTime<Utc>,
}

/// Opaque bearer tokens mapped to session contexts.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, StoredSession>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Store a session and return its token.
    pub async fn issue(&self, context: SessionContext) -> String {
        self.issue_at(context, Utc::now()).await
    }

    /// Expired sessions are swept while the write lock is held.
    pub async fn issue_at(&self, context: SessionContext, now: DateTime<Utc>) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        let session = StoredSession {
            context,
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| now <= s.expires_at);
        let swept = before - sessions.len();
        if swept > 0 {
            debug!(swept, "Swept expired sessions");
        }
        sessions.insert(token.clone(), session);
        token
    }

    /// Look up a live session. Expired entries are dropped.
    pub async fn get(&self, token: &str) -> Option<SessionContext> {
        self.get_at(token, Utc::now()).await
    }

    pub async fn get_at(&self, token: &str, now: DateTime<Utc>) -> Option<SessionContext> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return None,
                Some(session) if now <= session.expires_at => {
                    return Some(session.context.clone())
                }
                Some(_) => {}
            }
        }

        debug!("Dropping expired session");
        self.sessions.write().await.remove(token);
        None
    }

    /// Remove a session. Returns whether it existed.
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::Role;
    use engine::Jurisdiction;

    fn context() -> SessionContext {
        SessionContext {
            user_id: 1,
            role: Role::Citizen,
            name: "Rajesh Kumar".to_string(),
            phone: Some("9876543210".to_string()),
            jurisdiction: Jurisdiction::Unscoped,
            department: None,
        }
    }

    #[tokio::test]
    async fn test_issue_get_revoke() {
        let store = SessionStore::new(Duration::hours(1));
        let token = store.issue(context()).await;

        assert_eq!(store.get(&token).await, Some(context()));
        assert!(store.get("not-a-token").await.is_none());

        assert!(store.revoke(&token).await);
        assert!(!store.revoke(&token).await);
        assert!(store.get(&token).await.is_none());
    }

    #[tokio::test]
    async fn test_expired_sessions_are_dropped() {
        let store = SessionStore::new(Duration::hours(1));
        let now = Utc::now();
        let token = store.issue_at(context(), now).await;

        assert!(store.get_at(&token, now + Duration::minutes(59)).await.is_some());
        assert!(store.get_at(&token, now + Duration::minutes(61)).await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_tokens_are_distinct() {
        let store = SessionStore::new(Duration::hours(1));
        let a = store.issue(context()).await;
        let b = store.issue(context()).await;
        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_new_login_sweeps_abandoned_sessions() {
        let store = SessionStore::new(Duration::hours(1));
        let month_ago = Utc::now() - Duration::days(30);
        for _ in 0..100 {
            store.issue_at(context(), month_ago).await;
        }
        let recent = store.issue_at(context(), Utc::now() - Duration::minutes(5)).await;
        assert_eq!(store.len().await, 1);

        let fresh = store.issue(context()).await;
        assert_eq!(store.len().await, 2);
        assert!(store.get(&recent).await.is_some());
        assert!(store.get(&fresh).await.is_some());
    }
}
