use medassist_store::TokenStore;
use medassist_types::api::RegisterRequest;
use medassist_types::models::{Role, User};

use crate::gateway::AuthFailure;
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    #[default]
    Login,
    Register,
}

/// Login/register form on the landing page.
#[derive(Debug, Clone)]
pub struct LandingForm {
    mode: FormMode,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    pub phone: String,
    pub specialization: String,
    pub license_number: String,
    error: Option<String>,
    submitting: bool,
}

impl Default for LandingForm {
    fn default() -> Self {
        Self {
            mode: FormMode::Login,
            email: String::new(),
            password: String::new(),
            full_name: String::new(),
            role: Role::Patient,
            phone: String::new(),
            specialization: String::new(),
            license_number: String::new(),
            error: None,
            submitting: false,
        }
    }
}

impl LandingForm {
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: FormMode) {
        self.mode = mode;
        self.error = None;
    }

    pub fn toggle_mode(&mut self) {
        let next = match self.mode {
            FormMode::Login => FormMode::Register,
            FormMode::Register => FormMode::Login,
        };
        self.set_mode(next);
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Required-field check, mirroring the form's `required` inputs.
    pub fn validate(&self) -> Result<(), String> {
        if self.mode == FormMode::Register && self.full_name.trim().is_empty() {
            return Err("Full name is required".into());
        }
        if self.email.trim().is_empty() {
            return Err("Email is required".into());
        }
        if self.password.is_empty() {
            return Err("Password is required".into());
        }
        Ok(())
    }

    pub fn to_register_request(&self) -> RegisterRequest {
        RegisterRequest {
            full_name: self.full_name.trim().to_string(),
            role: self.role,
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            phone: Some(self.phone.clone()),
            specialization: Some(self.specialization.clone()),
            license_number: Some(self.license_number.clone()),
        }
        .normalized()
    }

    /// Validate and mark the form as submitting. On a validation failure
    /// the message is kept inline and false returned.
    pub fn begin_submit(&mut self) -> bool {
        self.error = None;
        if let Err(message) = self.validate() {
            self.error = Some(message);
            return false;
        }
        self.submitting = true;
        true
    }

    /// Send the form to the session in the current mode.
    pub async fn perform<S: TokenStore>(&self, session: &mut SessionStore<S>) -> Result<User, AuthFailure> {
        match self.mode {
            FormMode::Login => session.login(&self.email, &self.password).await,
            FormMode::Register => session.register(self.to_register_request()).await,
        }
    }

    /// Settle a submission: reset the form on success, keep the failure
    /// message inline otherwise.
    pub fn finish_submit(&mut self, result: Result<User, AuthFailure>) -> bool {
        self.submitting = false;
        match result {
            Ok(_) => {
                *self = Self::default();
                true
            }
            Err(failure) => {
                self.error = Some(failure.message);
                false
            }
        }
    }

    /// `begin_submit`, `perform` and `finish_submit` in one go.
    pub async fn submit<S: TokenStore>(&mut self, session: &mut SessionStore<S>) -> bool {
        if !self.begin_submit() {
            return false;
        }
        let result = self.perform(session).await;
        self.finish_submit(result)
    }
}
