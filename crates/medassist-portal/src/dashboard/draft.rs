use std::str::FromStr;

use medassist_types::api::CreatePrescriptionRequest;
use medassist_types::models::{Chat, Medication};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedicationField {
    Name,
    Dosage,
    Frequency,
}

impl FromStr for MedicationField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "dosage" => Ok(Self::Dosage),
            "frequency" => Ok(Self::Frequency),
            other => Err(format!("unknown medication field '{}'", other)),
        }
    }
}

/// Unsaved prescription form, bound to the patient of the chat it was
/// opened from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrescriptionDraft {
    patient_id: String,
    patient_name: String,
    pub diagnosis: String,
    pub instructions: String,
    medications: Vec<Medication>,
}

impl PrescriptionDraft {
    /// New draft with a single blank medication row.
    pub fn for_chat(chat: &Chat) -> Self {
        Self {
            patient_id: chat.patient_id.clone(),
            patient_name: chat.patient_name.clone(),
            diagnosis: String::new(),
            instructions: String::new(),
            medications: vec![Medication::default()],
        }
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn patient_name(&self) -> &str {
        &self.patient_name
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    /// Append a blank row and return its index.
    pub fn add_medication(&mut self) -> usize {
        self.medications.push(Medication::default());
        self.medications.len() - 1
    }

    /// Edit one field of one row. Returns false for an out-of-range index.
    pub fn update_medication(&mut self, index: usize, field: MedicationField, value: impl Into<String>) -> bool {
        let Some(med) = self.medications.get_mut(index) else {
            return false;
        };
        let value = value.into();
        match field {
            MedicationField::Name => med.name = value,
            MedicationField::Dosage => med.dosage = value,
            MedicationField::Frequency => med.frequency = value,
        }
        true
    }

    /// True once at least one row has a non-blank name.
    pub fn has_named_medication(&self) -> bool {
        self.medications.iter().any(|m| !m.name.trim().is_empty())
    }

    /// Request body for the draft. Rows without a name are left out.
    pub fn to_request(&self) -> CreatePrescriptionRequest {
        CreatePrescriptionRequest {
            patient_id: self.patient_id.clone(),
            medications: self
                .medications
                .iter()
                .filter(|m| !m.name.trim().is_empty())
                .cloned()
                .collect(),
            diagnosis: self.diagnosis.clone(),
            instructions: self.instructions.clone(),
        }
    }
}
