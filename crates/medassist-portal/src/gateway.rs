use thiserror::Error;
use tracing::warn;

use medassist_api::{ApiClient, ApiError, RequestContext};
use medassist_types::api::{AuthResponse, LoginRequest, RegisterRequest};
use medassist_types::models::User;

const LOGIN_FAILED: &str = "Login failed";
const REGISTRATION_FAILED: &str = "Registration failed";

/// Failed login or registration, carrying the message to show in the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthFailure {
    pub message: String,
}

impl AuthFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Prefer the server's `detail`; fall back to a generic message.
    fn from_api(err: &ApiError, fallback: &str) -> Self {
        Self::new(err.detail().unwrap_or(fallback))
    }
}

/// Auth endpoints with failures already turned into form messages.
#[derive(Clone, Debug)]
pub struct AuthGateway {
    api: ApiClient,
}

impl AuthGateway {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthFailure> {
        let req = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        self.api.login(&req).await.map_err(|e| {
            warn!("Login for {} rejected: {}", req.email, e);
            AuthFailure::from_api(&e, LOGIN_FAILED)
        })
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, AuthFailure> {
        let req = req.normalized();
        self.api.register(&req).await.map_err(|e| {
            warn!("Registration for {} rejected: {}", req.email, e);
            AuthFailure::from_api(&e, REGISTRATION_FAILED)
        })
    }

    pub async fn profile(&self, ctx: &RequestContext) -> Result<User, ApiError> {
        self.api.current_user(ctx).await
    }
}
