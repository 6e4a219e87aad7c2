//! Session context and the auth gate in front of every data screen.
//!
//! A single [`Session`] is created at startup and handed to each screen as an
//! `Arc<Session>`. Screens read it; only login/logout write it. Changes are
//! published on a `watch` channel so interested parties can react without
//! polling.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretBox};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::Result;
use crate::types::{OPSDESK_DIR, User};

/// Observable session shape
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub authenticated: bool,
    pub user: Option<User>,
    pub loading: bool,
}

/// What a screen should do when it is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// Session is still being restored; show a spinner
    Loading,
    /// Signed in; fetch data
    Proceed(User),
    /// No user; send to the login route, remembering where we came from
    RedirectToLogin { from: String },
}

pub struct Session {
    state: watch::Sender<SessionState>,
    token: RwLock<Option<SecretBox<String>>>,
}

impl Session {
    /// New session in the loading state, before anything is restored
    pub fn new() -> Self {
        let (state, _) = watch::channel(SessionState {
            loading: true,
            ..Default::default()
        });
        Self {
            state,
            token: RwLock::new(None),
        }
    }

    /// Session already signed in as `user`
    pub fn signed_in(user: User, token: Option<String>) -> Self {
        let session = Self::new();
        session.sign_in(user, token);
        session
    }

    /// Restore a previously saved session, ending the loading state either way.
    pub fn restore(&self, store: &SessionStore) -> Result<()> {
        match store.load() {
            Ok(Some(saved)) => {
                self.sign_in(saved.user, saved.token);
                Ok(())
            }
            Ok(None) => {
                self.sign_out();
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to restore session: {e}");
                self.sign_out();
                Err(e)
            }
        }
    }

    pub fn sign_in(&self, user: User, token: Option<String>) {
        *self.token.write() = token.map(|t| SecretBox::new(Box::new(t)));
        self.state.send_replace(SessionState {
            authenticated: true,
            user: Some(user),
            loading: false,
        });
    }

    pub fn sign_out(&self) {
        *self.token.write() = None;
        self.state.send_replace(SessionState::default());
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// `Authorization` header value, if a token is held
    pub fn authorization(&self) -> Option<String> {
        self.token
            .read()
            .as_ref()
            .map(|t| format!("Bearer {}", t.expose_secret()))
    }

    /// Decide whether a screen at `route` may load data.
    pub fn gate(&self, route: &str) -> Gate {
        let state = self.state.borrow();
        if state.loading {
            return Gate::Loading;
        }
        match &state.user {
            Some(user) if state.authenticated => Gate::Proceed(user.clone()),
            _ => Gate::RedirectToLogin {
                from: route.to_string(),
            },
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &*self.state.borrow())
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// On-disk form of a signed-in session
#[derive(Clone, Serialize, Deserialize)]
pub struct SavedSession {
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl fmt::Debug for SavedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SavedSession")
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Persists the signed-in user between runs
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `.opsdesk/session.yaml` in the working directory
    pub fn default_location() -> Self {
        Self::new(PathBuf::from(OPSDESK_DIR).join("session.yaml"))
    }

    pub fn load(&self) -> Result<Option<SavedSession>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_yaml_ng::from_str(&content)?))
    }

    pub fn save(&self, session: &SavedSession) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_yaml_ng::to_string(session)?)?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
