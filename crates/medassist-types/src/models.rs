use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// -- Users --

/// Portal role. Decides which dashboard a user lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Pharmacy,
    /// Any role string this client does not know about.
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
            Self::Pharmacy => "pharmacy",
            Self::Unknown => "unknown",
        }
    }

    /// Doctors carry a specialization.
    pub fn has_specialization(&self) -> bool {
        matches!(self, Self::Doctor)
    }

    /// Doctors and pharmacies carry a license number.
    pub fn has_license(&self) -> bool {
        matches!(self, Self::Doctor | Self::Pharmacy)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patient" => Ok(Self::Patient),
            "doctor" => Ok(Self::Doctor),
            "pharmacy" => Ok(Self::Pharmacy),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
}

/// Entry of the public doctor directory (`GET /users/doctors`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub specialization: Option<String>,
    #[serde(default)]
    pub license_number: Option<String>,
}

// -- Chats --

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    #[default]
    Active,
    Closed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub patient_name: String,
    pub doctor_name: String,
    #[serde(default)]
    pub status: ChatStatus,
    #[serde(default, with = "crate::time::optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default, with = "crate::time::optional")]
    pub last_message_time: Option<DateTime<Utc>>,
}

impl Chat {
    /// Name of the other participant, as seen by `viewer`.
    pub fn counterpart_name(&self, viewer: Role) -> &str {
        match viewer {
            Role::Doctor => &self.patient_name,
            _ => &self.doctor_name,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Prescription,
    Appointment,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub chat_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub sender_role: Role,
    pub content: String,
    #[serde(default, with = "crate::time::optional")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub message_type: MessageKind,
}

// -- Prescriptions --

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Medication {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrescriptionStatus {
    Pending,
    Dispensed,
    /// Anything past dispensing (e.g. `collected`) or unknown to this client.
    #[serde(other)]
    Other,
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Dispensed => "dispensed",
            Self::Other => "other",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    #[serde(default)]
    pub pharmacy_id: Option<String>,
    pub patient_name: String,
    pub doctor_name: String,
    pub medications: Vec<Medication>,
    pub diagnosis: String,
    pub instructions: String,
    pub status: PrescriptionStatus,
    #[serde(default, with = "crate::time::optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::time::optional")]
    pub dispensed_at: Option<DateTime<Utc>>,
}

impl Prescription {
    pub fn is_pending(&self) -> bool {
        self.status == PrescriptionStatus::Pending
    }

    pub fn is_dispensed(&self) -> bool {
        self.status == PrescriptionStatus::Dispensed
    }
}
