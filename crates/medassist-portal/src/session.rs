use tracing::{info, warn};

use medassist_api::{ApiClient, RequestContext};
use medassist_store::TokenStore;
use medassist_types::api::{AuthResponse, RegisterRequest};
use medassist_types::models::User;

use crate::gateway::{AuthFailure, AuthGateway};

/// Client-held authentication state.
///
/// `user` is only ever set together with the token it was resolved with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Credentials for the next API call.
    pub fn context(&self) -> RequestContext {
        match &self.token {
            Some(token) => RequestContext::bearer(token.clone()),
            None => RequestContext::anonymous(),
        }
    }

    fn establish(&mut self, token: String, user: User) {
        self.token = Some(token);
        self.user = Some(user);
    }

    fn clear(&mut self) {
        self.token = None;
        self.user = None;
    }
}

/// Owns the session, its persisted token and the auth gateway.
pub struct SessionStore<S> {
    gateway: AuthGateway,
    storage: S,
    session: Session,
}

impl<S: TokenStore> SessionStore<S> {
    pub fn new(gateway: AuthGateway, storage: S) -> Self {
        Self {
            gateway,
            storage,
            session: Session::default(),
        }
    }

    pub fn api(&self) -> &ApiClient {
        self.gateway.api()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn context(&self) -> RequestContext {
        self.session.context()
    }

    /// Restore a session from the persisted token, if any.
    ///
    /// A token the server no longer accepts ends the session: the token is
    /// dropped from storage as well.
    pub async fn initialize(&mut self) -> Option<&User> {
        let token = match self.storage.load_token() {
            Ok(token) => token,
            Err(e) => {
                warn!("Could not read persisted token: {}", e);
                None
            }
        };

        let token = token?;
        self.session.token = Some(token);
        self.resolve_profile().await
    }

    /// Re-fetch the profile for the current token. Any failure logs out.
    pub async fn resolve_profile(&mut self) -> Option<&User> {
        let ctx = self.session.context();
        if !ctx.is_authenticated() {
            return None;
        }

        match self.gateway.profile(&ctx).await {
            Ok(user) => {
                info!("Session restored for {} ({})", user.email, user.role);
                self.session.user = Some(user);
                self.session.user()
            }
            Err(e) => {
                if e.is_unauthorized() {
                    warn!("Token rejected by the server, signing out: {}", e);
                } else {
                    warn!("Failed to fetch user profile, signing out: {}", e);
                }
                self.logout();
                None
            }
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<User, AuthFailure> {
        let response = self.gateway.login(email, password).await?;
        Ok(self.accept(response))
    }

    pub async fn register(&mut self, req: RegisterRequest) -> Result<User, AuthFailure> {
        let response = self.gateway.register(req).await?;
        Ok(self.accept(response))
    }

    /// Clear the in-memory session and the persisted token. Always succeeds.
    pub fn logout(&mut self) {
        if let Some(user) = self.session.user() {
            info!("Signing out {}", user.email);
        }
        self.session.clear();
        if let Err(e) = self.storage.clear_token() {
            warn!("Could not remove persisted token: {}", e);
        }
    }

    fn accept(&mut self, response: AuthResponse) -> User {
        let AuthResponse { access_token, user, .. } = response;

        // The in-memory session stays valid even if persisting fails; the
        // user just has to sign in again next start.
        if let Err(e) = self.storage.save_token(&access_token) {
            warn!("Could not persist session token: {}", e);
        }

        info!("Signed in as {} ({})", user.email, user.role);
        self.session.establish(access_token, user.clone());
        user
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medassist_types::models::Role;

    fn user() -> User {
        User {
            id: "u1".into(),
            email: "pat@example.com".into(),
            full_name: "Pat".into(),
            role: Role::Patient,
            phone: None,
            specialization: None,
            license_number: None,
        }
    }

    #[test]
    fn empty_session_is_anonymous() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert!(!session.context().is_authenticated());
    }

    #[test]
    fn establish_then_clear() {
        let mut session = Session::default();
        session.establish("tok".into(), user());
        assert!(session.is_authenticated());
        assert_eq!(session.context().token(), Some("tok"));

        session.clear();
        assert_eq!(session, Session::default());
    }
}
