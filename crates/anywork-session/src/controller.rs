//! Session lifecycle and auth state machine.
//!
//! The controller owns the `{Unknown, Anonymous, Authenticated}` state,
//! persists tokens through the session store, and broadcasts transitions
//! over a watch channel so background controllers can react to login and
//! logout without polling.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::info;

use anywork_client::SessionStore;
use anywork_models::{validate_password, LoginPayload, RegisterPayload, Role, User};
use anywork_services::AuthService;

use crate::navigator::Navigator;

/// Authentication lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// The stored session has not been read yet.
    Unknown,
    /// No session is present.
    Anonymous,
    /// A token and user are loaded.
    Authenticated,
}

/// Outcome of a login or registration attempt.
///
/// Auth calls on the controller never error out; failures land here as
/// display-ready messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthAttempt {
    pub success: bool,
    pub error: Option<String>,
}

impl AuthAttempt {
    fn succeeded() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

struct SessionState {
    auth: AuthState,
    user: Option<User>,
}

/// Owns authentication state for one client instance.
pub struct SessionController {
    store: Arc<dyn SessionStore>,
    auth: AuthService,
    navigator: Arc<dyn Navigator>,
    state: Mutex<SessionState>,
    watch_tx: watch::Sender<AuthState>,
}

impl SessionController {
    /// Create a controller in the `Unknown` state. Call
    /// [`SessionController::initialize`] to read the stored session.
    pub fn new(
        store: Arc<dyn SessionStore>,
        auth: AuthService,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (watch_tx, _) = watch::channel(AuthState::Unknown);

        Self {
            store,
            auth,
            navigator,
            state: Mutex::new(SessionState {
                auth: AuthState::Unknown,
                user: None,
            }),
            watch_tx,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, auth: AuthState, user: Option<User>) {
        {
            let mut state = self.lock();
            state.auth = auth;
            state.user = user;
        }
        self.watch_tx.send_replace(auth);
    }

    /// Read the persisted session and leave the `Unknown` state.
    ///
    /// Authenticated requires both a token and a parseable user record;
    /// anything less degrades to `Anonymous`.
    pub fn initialize(&self) {
        let token = self.store.access_token();
        let user = self.store.current_user();

        match (token, user) {
            (Some(_), Some(user)) => {
                info!("Restored session for user {}", user.user_id);
                self.transition(AuthState::Authenticated, Some(user));
            }
            _ => self.transition(AuthState::Anonymous, None),
        }
    }

    /// Exchange credentials for a session.
    ///
    /// On success the tokens and user are persisted and the state moves to
    /// `Authenticated`. On failure the state is left untouched.
    pub async fn login(&self, email: &str, password: &str) -> AuthAttempt {
        let payload = LoginPayload {
            email: email.to_string(),
            password: password.to_string(),
        };

        match self.auth.login(&payload).await {
            Ok(data) => {
                self.store.set_tokens(&data.access_token, &data.refresh_token);
                self.store.set_current_user(&data.user);
                info!("Session authenticated for user {}", data.user.user_id);
                self.transition(AuthState::Authenticated, Some(data.user));
                AuthAttempt::succeeded()
            }
            Err(e) => AuthAttempt::failed(e.to_string()),
        }
    }

    /// Exchange a Google OAuth authorization code for a session.
    pub async fn login_with_google(&self, code: &str) -> AuthAttempt {
        match self.auth.google_auth(code).await {
            Ok(data) => {
                self.store.set_tokens(&data.access_token, &data.refresh_token);
                self.store.set_current_user(&data.user);
                info!("Session authenticated for user {}", data.user.user_id);
                self.transition(AuthState::Authenticated, Some(data.user));
                AuthAttempt::succeeded()
            }
            Err(e) => AuthAttempt::failed(e.to_string()),
        }
    }

    /// Create an account. Registration issues no tokens, so a successful
    /// attempt leaves the state unchanged and the caller logs in
    /// separately.
    pub async fn register(&self, email: &str, password: &str, role: Role) -> AuthAttempt {
        if let Err(e) = validate_password(password) {
            return AuthAttempt::failed(e.to_string());
        }

        let payload = RegisterPayload {
            email: email.to_string(),
            password: password.to_string(),
            role,
        };

        match self.auth.register(&payload).await {
            Ok(user) => {
                info!("Registered user {}", user.user_id);
                AuthAttempt::succeeded()
            }
            Err(e) => AuthAttempt::failed(e.to_string()),
        }
    }

    /// Drop the session and redirect home. Safe to call when already
    /// anonymous.
    pub fn logout(&self) {
        self.store.clear_tokens();
        self.transition(AuthState::Anonymous, None);
        self.navigator.navigate("/");
    }

    /// Guard for views that need a session.
    ///
    /// Returns `false` and redirects to `redirect_to` only once the stored
    /// session has been read and found absent; while still `Unknown` no
    /// redirect fires, so a slow initialization cannot bounce a
    /// soon-to-be-authenticated user.
    pub fn require_auth(&self, redirect_to: &str) -> bool {
        match self.auth_state() {
            AuthState::Unknown | AuthState::Authenticated => true,
            AuthState::Anonymous => {
                self.navigator.navigate(redirect_to);
                false
            }
        }
    }

    pub fn auth_state(&self) -> AuthState {
        self.lock().auth
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_state() == AuthState::Authenticated
    }

    pub fn current_user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    /// Watch auth transitions. The receiver always reflects the latest
    /// state, including transitions sent before subscribing.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.watch_tx.subscribe()
    }
}
