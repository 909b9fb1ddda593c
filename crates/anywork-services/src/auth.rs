//! Authentication endpoints.
//!
//! Auth responses arrive wrapped in the `{status, message, data}` envelope;
//! this service unwraps them and maps envelope-level rejections onto
//! [`ApiError::Rejected`]. Token persistence is the session controller's
//! job, not this service's.

use serde::Deserialize;

use anywork_client::{ApiClient, ApiError, ApiResult};
use anywork_models::{ApiEnvelope, AuthData, LoginPayload, RegisterPayload, User};

/// Registration responses nest the created user one level down.
#[derive(Debug, Deserialize)]
struct RegisteredUser {
    user: User,
}

/// Unwrap an auth envelope, surfacing the server's message on rejection.
fn unwrap_envelope<T>(envelope: ApiEnvelope<T>) -> ApiResult<T> {
    if !envelope.is_success() {
        let message = Some(envelope.message).filter(|m| !m.is_empty());
        return Err(ApiError::rejected(message));
    }
    envelope
        .data
        .ok_or_else(|| ApiError::invalid_response("success envelope carried no payload"))
}

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Register a new account. Registration issues no tokens; the caller
    /// must log in separately.
    pub async fn register(&self, payload: &RegisterPayload) -> ApiResult<User> {
        let result: ApiResult<ApiEnvelope<RegisteredUser>> =
            self.client.post("/auth/register/", payload).await;
        result
            .and_then(unwrap_envelope)
            .map(|data| data.user)
            .map_err(|e| e.with_fallback("Registration failed"))
    }

    /// Exchange credentials for tokens and the user record.
    pub async fn login(&self, payload: &LoginPayload) -> ApiResult<AuthData> {
        let result: ApiResult<ApiEnvelope<AuthData>> =
            self.client.post("/auth/login/", payload).await;
        result
            .and_then(unwrap_envelope)
            .map_err(|e| e.with_fallback("Login failed"))
    }

    /// Exchange a Google OAuth authorization code for tokens.
    pub async fn google_auth(&self, code: &str) -> ApiResult<AuthData> {
        let result: ApiResult<ApiEnvelope<AuthData>> = self
            .client
            .post("/auth/google/", &serde_json::json!({ "code": code }))
            .await;
        result
            .and_then(unwrap_envelope)
            .map_err(|e| e.with_fallback("Google authentication failed"))
    }
}
