use serde::{Deserialize, Serialize};

use crate::models::{Medication, Role, User};

// -- Auth --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub role: Role,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
}

impl RegisterRequest {
    /// Drop fields that do not apply to the chosen role, and blank optionals.
    ///
    /// Specialization is kept only for doctors, license numbers only for
    /// doctors and pharmacies.
    pub fn normalized(mut self) -> Self {
        fn non_blank(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }

        let role = self.role;
        self.phone = non_blank(self.phone);
        self.specialization = non_blank(self.specialization).filter(|_| role.has_specialization());
        self.license_number = non_blank(self.license_number).filter(|_| role.has_license());
        self
    }
}

/// Returned by both login and register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".into()
}

// -- Prescriptions --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePrescriptionRequest {
    pub patient_id: String,
    pub medications: Vec<Medication>,
    pub diagnosis: String,
    pub instructions: String,
}

// -- Errors --

/// Error body returned by the backend: `{"detail": ...}`.
///
/// `detail` is usually a string but validation failures send a list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn with_detail(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(serde_json::Value::String(detail.into())),
        }
    }

    /// Human-readable detail, if the server sent one.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::String(_) | serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
