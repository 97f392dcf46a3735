use tracing::{error, info, warn};

use medassist_api::{ApiClient, RequestContext};
use medassist_types::models::Prescription;

use super::{Notice, apply_list};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PharmacyTab {
    #[default]
    Overview,
    Pending,
    Dispensed,
}

impl PharmacyTab {
    pub const ALL: [Self; 3] = [Self::Overview, Self::Pending, Self::Dispensed];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Overview => "dashboard",
            Self::Pending => "pending",
            Self::Dispensed => "dispensed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PharmacyStats {
    pub pending: usize,
    pub dispensed: usize,
    pub total: usize,
}

/// Prescription queue, split by status on the client.
#[derive(Debug, Default)]
pub struct PharmacyDashboard {
    tab: PharmacyTab,
    prescriptions: Vec<Prescription>,
    notice: Option<Notice>,
}

impl PharmacyDashboard {
    pub async fn mount(api: &ApiClient, ctx: &RequestContext) -> Self {
        let mut dashboard = Self::default();
        dashboard.refresh(api, ctx).await;
        dashboard
    }

    pub async fn refresh(&mut self, api: &ApiClient, ctx: &RequestContext) -> bool {
        apply_list(&mut self.prescriptions, api.list_prescriptions(ctx).await, "prescriptions")
    }

    pub fn tab(&self) -> PharmacyTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: PharmacyTab) {
        self.tab = tab;
    }

    pub fn prescriptions(&self) -> &[Prescription] {
        &self.prescriptions
    }

    pub fn pending(&self) -> impl Iterator<Item = &Prescription> {
        self.prescriptions.iter().filter(|p| p.is_pending())
    }

    pub fn dispensed(&self) -> impl Iterator<Item = &Prescription> {
        self.prescriptions.iter().filter(|p| p.is_dispensed())
    }

    pub fn stats(&self) -> PharmacyStats {
        PharmacyStats {
            pending: self.pending().count(),
            dispensed: self.dispensed().count(),
            total: self.prescriptions.len(),
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Mark a pending prescription dispensed, then re-fetch the queue.
    pub async fn dispense(&mut self, api: &ApiClient, ctx: &RequestContext, prescription_id: &str) -> bool {
        if !self.pending().any(|p| p.id == prescription_id) {
            warn!("Prescription {} is not pending, not dispensing", prescription_id);
            self.notice = Some(Notice::failure("Prescription is not pending"));
            return false;
        }

        match api.dispense_prescription(ctx, prescription_id).await {
            Ok(()) => {
                info!("Prescription {} dispensed", prescription_id);
                self.refresh(api, ctx).await;
                self.notice = Some(Notice::success("Prescription dispensed successfully!"));
                true
            }
            Err(e) => {
                error!("Failed to dispense prescription {}: {}", prescription_id, e);
                self.notice = Some(Notice::failure("Failed to dispense prescription"));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medassist_types::models::PrescriptionStatus;

    fn prescription(id: &str, status: PrescriptionStatus) -> Prescription {
        Prescription {
            id: id.into(),
            patient_id: "pa".into(),
            doctor_id: "do".into(),
            pharmacy_id: None,
            patient_name: "Pat".into(),
            doctor_name: "Doc".into(),
            medications: vec![],
            diagnosis: "Cold".into(),
            instructions: "Rest".into(),
            status,
            created_at: None,
            dispensed_at: None,
        }
    }

    fn dashboard() -> PharmacyDashboard {
        PharmacyDashboard {
            prescriptions: vec![
                prescription("a", PrescriptionStatus::Pending),
                prescription("b", PrescriptionStatus::Dispensed),
                prescription("c", PrescriptionStatus::Pending),
                prescription("d", PrescriptionStatus::Other),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn partitions_are_disjoint_and_skip_other_statuses() {
        let dashboard = dashboard();
        let pending: Vec<_> = dashboard.pending().map(|p| p.id.as_str()).collect();
        let dispensed: Vec<_> = dashboard.dispensed().map(|p| p.id.as_str()).collect();
        assert_eq!(pending, ["a", "c"]);
        assert_eq!(dispensed, ["b"]);
        assert_eq!(
            dashboard.stats(),
            PharmacyStats {
                pending: 2,
                dispensed: 1,
                total: 4,
            }
        );
    }
}
