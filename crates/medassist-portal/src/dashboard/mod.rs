//! Role dashboards. Each one fetches its own lists when mounted and only
//! re-fetches after a mutation it issued; nothing is updated optimistically.

pub mod chat;
pub mod doctor;
pub mod draft;
pub mod patient;
pub mod pharmacy;

use tracing::error;

use medassist_api::ApiError;

pub use chat::{ChatPane, MessagesTicket};
pub use doctor::{DoctorDashboard, DoctorStats, DoctorTab};
pub use draft::{MedicationField, PrescriptionDraft};
pub use patient::{PatientDashboard, PatientStats, PatientTab};
pub use pharmacy::{PharmacyDashboard, PharmacyStats, PharmacyTab};

/// Blocking notification raised by a mutating action. The UI shows it and
/// then takes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Failure(String),
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success(message.into())
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Failure(m) => m,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

/// Replace `slot` with a fetched list. On failure the previous list stays.
pub(crate) fn apply_list<T>(slot: &mut Vec<T>, result: Result<Vec<T>, ApiError>, what: &str) -> bool {
    match result {
        Ok(items) => {
            *slot = items;
            true
        }
        Err(e) => {
            error!("Failed to fetch {}: {}", what, e);
            false
        }
    }
}
