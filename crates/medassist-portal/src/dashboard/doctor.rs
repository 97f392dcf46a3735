use tracing::{error, info};

use medassist_api::{ApiClient, RequestContext};
use medassist_types::models::{Chat, Prescription};

use super::chat::ChatPane;
use super::draft::PrescriptionDraft;
use super::{Notice, apply_list};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DoctorTab {
    #[default]
    Overview,
    Patients,
    Prescriptions,
}

impl DoctorTab {
    pub const ALL: [Self; 3] = [Self::Overview, Self::Patients, Self::Prescriptions];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Overview => "dashboard",
            Self::Patients => "patients",
            Self::Prescriptions => "prescriptions",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoctorStats {
    pub active_patients: usize,
    pub prescriptions_written: usize,
}

/// Patient chats, written prescriptions and the prescription form.
#[derive(Debug, Default)]
pub struct DoctorDashboard {
    tab: DoctorTab,
    chats: Vec<Chat>,
    prescriptions: Vec<Prescription>,
    chat: ChatPane,
    draft: Option<PrescriptionDraft>,
    notice: Option<Notice>,
}

impl DoctorDashboard {
    pub async fn mount(api: &ApiClient, ctx: &RequestContext) -> Self {
        let mut dashboard = Self::default();
        dashboard.refresh(api, ctx).await;
        dashboard
    }

    pub async fn refresh(&mut self, api: &ApiClient, ctx: &RequestContext) {
        let (chats, prescriptions) = tokio::join!(api.list_chats(ctx), api.list_prescriptions(ctx));
        apply_list(&mut self.chats, chats, "chats");
        apply_list(&mut self.prescriptions, prescriptions, "prescriptions");
    }

    pub async fn refresh_prescriptions(&mut self, api: &ApiClient, ctx: &RequestContext) -> bool {
        apply_list(&mut self.prescriptions, api.list_prescriptions(ctx).await, "prescriptions")
    }

    pub fn tab(&self) -> DoctorTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: DoctorTab) {
        self.tab = tab;
    }

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn prescriptions(&self) -> &[Prescription] {
        &self.prescriptions
    }

    pub fn chat(&self) -> &ChatPane {
        &self.chat
    }

    pub fn chat_mut(&mut self) -> &mut ChatPane {
        &mut self.chat
    }

    pub fn stats(&self) -> DoctorStats {
        DoctorStats {
            active_patients: self.chats.len(),
            prescriptions_written: self.prescriptions.len(),
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub async fn open_chat(&mut self, api: &ApiClient, ctx: &RequestContext, chat: Chat) {
        self.tab = DoctorTab::Patients;
        let ticket = self.chat.select(chat);
        self.chat.load(api, ctx, ticket).await;
    }

    pub async fn send_message(&mut self, api: &ApiClient, ctx: &RequestContext) {
        if let Some(notice) = self.chat.send(api, ctx).await {
            self.notice = Some(notice);
        }
    }

    // -- Prescription form --

    /// Open the form for the selected chat's patient. An open draft is kept
    /// as is. Returns false when no chat is selected.
    pub fn open_prescription_form(&mut self) -> bool {
        if self.draft.is_some() {
            return true;
        }
        match self.chat.selected() {
            Some(chat) => {
                self.draft = Some(PrescriptionDraft::for_chat(chat));
                true
            }
            None => false,
        }
    }

    pub fn close_prescription_form(&mut self) {
        self.draft = None;
    }

    pub fn draft(&self) -> Option<&PrescriptionDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut PrescriptionDraft> {
        self.draft.as_mut()
    }

    /// Submit the draft as one create call. On success the form closes and
    /// the prescription list is re-fetched; on failure the draft is kept.
    pub async fn submit_prescription(&mut self, api: &ApiClient, ctx: &RequestContext) -> bool {
        let Some(draft) = self.draft.as_ref() else {
            return false;
        };
        if !draft.has_named_medication() {
            self.notice = Some(Notice::failure("Add at least one medication"));
            return false;
        }
        let req = draft.to_request();

        match api.create_prescription(ctx, &req).await {
            Ok(created) => {
                info!(
                    "Prescription {} created for patient {} with {} medication(s)",
                    created.id,
                    created.patient_id,
                    created.medications.len()
                );
                self.draft = None;
                self.refresh_prescriptions(api, ctx).await;
                self.notice = Some(Notice::success("Prescription created successfully!"));
                true
            }
            Err(e) => {
                error!("Failed to create prescription for patient {}: {}", req.patient_id, e);
                self.notice = Some(Notice::failure("Failed to create prescription"));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medassist_types::models::ChatStatus;

    fn chat(id: &str, patient_id: &str) -> Chat {
        Chat {
            id: id.into(),
            patient_id: patient_id.into(),
            doctor_id: "doc".into(),
            patient_name: format!("Patient {}", patient_id),
            doctor_name: "Doc".into(),
            status: ChatStatus::Active,
            created_at: None,
            last_message: None,
            last_message_time: None,
        }
    }

    #[test]
    fn form_needs_a_selected_chat() {
        let mut dashboard = DoctorDashboard::default();
        assert!(!dashboard.open_prescription_form());
        assert!(dashboard.draft().is_none());

        dashboard.chat_mut().select(chat("c1", "p1"));
        assert!(dashboard.open_prescription_form());
        assert_eq!(dashboard.draft().unwrap().patient_id(), "p1");
    }

    #[test]
    fn reopening_keeps_the_open_draft() {
        let mut dashboard = DoctorDashboard::default();
        dashboard.chat_mut().select(chat("c1", "p1"));
        dashboard.open_prescription_form();
        dashboard.draft_mut().unwrap().diagnosis = "Flu".into();

        dashboard.chat_mut().select(chat("c2", "p2"));
        dashboard.open_prescription_form();
        let draft = dashboard.draft().unwrap();
        assert_eq!(draft.diagnosis, "Flu");
        assert_eq!(draft.patient_id(), "p1");

        dashboard.close_prescription_form();
        assert!(dashboard.draft().is_none());
    }

    #[tokio::test]
    async fn submit_refuses_a_draft_without_medications() {
        // Nothing listens on the discard port; the refusal must happen before any request.
        let api = ApiClient::new("http://127.0.0.1:9").unwrap();
        let ctx = RequestContext::bearer("t");

        let mut dashboard = DoctorDashboard::default();
        dashboard.chat_mut().select(chat("c1", "p1"));
        dashboard.open_prescription_form();
        dashboard.draft_mut().unwrap().diagnosis = "Flu".into();

        assert!(!dashboard.submit_prescription(&api, &ctx).await);
        let notice = dashboard.notice().unwrap();
        assert!(notice.is_failure());
        assert_eq!(notice.message(), "Add at least one medication");
        assert_eq!(dashboard.draft().unwrap().diagnosis, "Flu");
    }
}
