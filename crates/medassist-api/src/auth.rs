use tracing::debug;

use medassist_types::api::{AuthResponse, LoginRequest, RegisterRequest};
use medassist_types::models::User;

use crate::client::ApiClient;
use crate::context::RequestContext;
use crate::error::ApiError;

impl ApiClient {
    /// `POST /auth/login`
    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError> {
        debug!("Logging in as {}", req.email);
        let builder = self.http().post(self.url("/auth/login")).json(req);
        self.send_json(builder).await
    }

    /// `POST /auth/register`
    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        debug!("Registering {} as {}", req.email, req.role);
        let builder = self.http().post(self.url("/auth/register")).json(req);
        self.send_json(builder).await
    }

    /// `GET /users/me`: resolve the profile behind the context's token.
    pub async fn current_user(&self, ctx: &RequestContext) -> Result<User, ApiError> {
        let builder = ctx.authorize(self.http().get(self.url("/users/me")))?;
        self.send_json(builder).await
    }
}
