use std::fmt;

use reqwest::{RequestBuilder, header};

use crate::error::ApiError;

/// Credentials for one API call.
///
/// Cloned out of the session when a call is issued; clearing the session
/// afterwards does not touch contexts already handed out.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    token: Option<String>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self { token: None }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// `Authorization` header value, if a token is present.
    pub fn authorization(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {}", t))
    }

    /// Attach the bearer header, failing locally when there is no token.
    pub(crate) fn authorize(&self, req: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let value = self.authorization().ok_or(ApiError::MissingToken)?;
        Ok(req.header(header::AUTHORIZATION, value))
    }
}

// Tokens must not end up in logs.
impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
