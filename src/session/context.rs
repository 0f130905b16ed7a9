use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use super::gate::{self, GateDecision};
use super::store::{MemorySessionStore, SessionCookie, SessionError, SessionStore, StoredSession};
use crate::config::SessionConfig;

/// User record the identity service attaches to a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some("admin")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// `load` has not run yet
    Unloaded,
    Anonymous,
    Authenticated,
}

#[derive(Debug)]
struct SessionState {
    phase: SessionPhase,
    cookie: Option<SessionCookie>,
    user: Option<SessionUser>,
}

/// Shared session provider.
///
/// One instance is created at boot and handed to every client and view that
/// needs it. Lifecycle: `load` on boot, `establish` after sign-in,
/// `invalidate` on sign-out.
#[derive(Clone)]
pub struct SessionContext {
    state: Arc<RwLock<SessionState>>,
    store: Arc<dyn SessionStore>,
    cookie_name: Arc<str>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("phase", &self.phase())
            .field("cookie_name", &self.cookie_name)
            .finish()
    }
}

impl SessionContext {
    pub fn new(store: Arc<dyn SessionStore>, config: &SessionConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState {
                phase: SessionPhase::Unloaded,
                cookie: None,
                user: None,
            })),
            store,
            cookie_name: Arc::from(config.cookie_name.as_str()),
        }
    }

    /// Context backed by a memory store, already loaded and anonymous
    pub fn in_memory(config: &SessionConfig) -> Self {
        let context = Self::new(Arc::new(MemorySessionStore::new()), config);
        context.write().phase = SessionPhase::Anonymous;
        context
    }

    /// Boot step: pull whatever the store holds. Returns whether a session was found.
    pub fn load(&self) -> Result<bool, SessionError> {
        let stored = self.store.load()?;
        let mut state = self.write();

        match stored {
            Some(stored) if self.is_session_cookie(&stored.cookie.name) => {
                tracing::debug!(cookie = %stored.cookie.name, "loaded stored session");
                state.cookie = Some(stored.cookie);
                state.user = stored.user;
                state.phase = SessionPhase::Authenticated;
                Ok(true)
            }
            Some(stored) => {
                tracing::warn!(cookie = %stored.cookie.name, "ignoring stored cookie with unexpected name");
                state.cookie = None;
                state.user = None;
                state.phase = SessionPhase::Anonymous;
                Ok(false)
            }
            None => {
                state.cookie = None;
                state.user = None;
                state.phase = SessionPhase::Anonymous;
                Ok(false)
            }
        }
    }

    /// Record a session handed out by the identity service and persist it
    pub fn establish(&self, cookie: SessionCookie, user: Option<SessionUser>) -> Result<(), SessionError> {
        self.store.save(&StoredSession {
            cookie: cookie.clone(),
            user: user.clone(),
        })?;

        let mut state = self.write();
        state.cookie = Some(cookie);
        state.user = user;
        state.phase = SessionPhase::Authenticated;
        Ok(())
    }

    /// Refresh the cached user without touching the cookie
    pub fn set_user(&self, user: SessionUser) -> Result<(), SessionError> {
        let cookie = {
            let mut state = self.write();
            state.user = Some(user.clone());
            state.cookie.clone()
        };

        if let Some(cookie) = cookie {
            self.store.save(&StoredSession {
                cookie,
                user: Some(user),
            })?;
        }
        Ok(())
    }

    /// Sign-out step: forget the cookie locally and in the store
    pub fn invalidate(&self) -> Result<(), SessionError> {
        {
            let mut state = self.write();
            state.cookie = None;
            state.user = None;
            state.phase = SessionPhase::Anonymous;
        }
        self.store.clear()
    }

    pub fn phase(&self) -> SessionPhase {
        self.read().phase
    }

    /// Presence of the cookie is all that is checked here
    pub fn is_authenticated(&self) -> bool {
        self.read().cookie.is_some()
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.read().user.clone()
    }

    pub fn cookie(&self) -> Option<SessionCookie> {
        self.read().cookie.clone()
    }

    pub fn cookie_header(&self) -> Option<String> {
        self.read().cookie.as_ref().map(SessionCookie::header_value)
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Accepts the configured name and its `__Secure-` variant
    pub fn is_session_cookie(&self, name: &str) -> bool {
        gate::is_session_cookie_name(name, &self.cookie_name)
    }

    /// Run the navigation gate for `path` against this session
    pub fn gate(&self, path: &str) -> GateDecision {
        gate::classify(self.is_authenticated(), path)
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
