use tracing::{error, info};

use medassist_api::{ApiClient, RequestContext};
use medassist_types::models::{Chat, DoctorProfile, Prescription};

use super::chat::ChatPane;
use super::{Notice, apply_list};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatientTab {
    #[default]
    Overview,
    Doctors,
    Chat,
    Prescriptions,
}

impl PatientTab {
    pub const ALL: [Self; 4] = [Self::Overview, Self::Doctors, Self::Chat, Self::Prescriptions];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Overview => "dashboard",
            Self::Doctors => "doctors",
            Self::Chat => "chat",
            Self::Prescriptions => "prescriptions",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatientStats {
    pub active_chats: usize,
    pub prescriptions: usize,
    pub available_doctors: usize,
}

/// Doctor directory, the patient's chats and their (read-only) prescriptions.
#[derive(Debug, Default)]
pub struct PatientDashboard {
    tab: PatientTab,
    doctors: Vec<DoctorProfile>,
    chats: Vec<Chat>,
    prescriptions: Vec<Prescription>,
    chat: ChatPane,
    notice: Option<Notice>,
}

impl PatientDashboard {
    /// Fresh dashboard with all three lists fetched.
    pub async fn mount(api: &ApiClient, ctx: &RequestContext) -> Self {
        let mut dashboard = Self::default();
        dashboard.refresh(api, ctx).await;
        dashboard
    }

    pub async fn refresh(&mut self, api: &ApiClient, ctx: &RequestContext) {
        let (doctors, chats, prescriptions) = tokio::join!(
            api.list_doctors(ctx),
            api.list_chats(ctx),
            api.list_prescriptions(ctx)
        );
        apply_list(&mut self.doctors, doctors, "doctors");
        apply_list(&mut self.chats, chats, "chats");
        apply_list(&mut self.prescriptions, prescriptions, "prescriptions");
    }

    pub async fn refresh_chats(&mut self, api: &ApiClient, ctx: &RequestContext) -> bool {
        apply_list(&mut self.chats, api.list_chats(ctx).await, "chats")
    }

    pub async fn refresh_prescriptions(&mut self, api: &ApiClient, ctx: &RequestContext) -> bool {
        apply_list(&mut self.prescriptions, api.list_prescriptions(ctx).await, "prescriptions")
    }

    pub fn tab(&self) -> PatientTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: PatientTab) {
        self.tab = tab;
    }

    pub fn doctors(&self) -> &[DoctorProfile] {
        &self.doctors
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

    pub fn stats(&self) -> PatientStats {
        PatientStats {
            active_chats: self.chats.len(),
            prescriptions: self.prescriptions.len(),
            available_doctors: self.doctors.len(),
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Open (or create) the chat with a doctor, select it and switch to the
    /// chat tab.
    pub async fn start_chat(&mut self, api: &ApiClient, ctx: &RequestContext, doctor_id: &str) -> bool {
        match api.start_chat(ctx, doctor_id).await {
            Ok(chat) => {
                info!("Chat {} with doctor {} ready", chat.id, doctor_id);
                self.open_chat(api, ctx, chat).await;
                self.refresh_chats(api, ctx).await;
                true
            }
            Err(e) => {
                error!("Failed to start chat with doctor {}: {}", doctor_id, e);
                self.notice = Some(Notice::failure("Failed to start chat"));
                false
            }
        }
    }

    pub async fn open_chat(&mut self, api: &ApiClient, ctx: &RequestContext, chat: Chat) {
        self.tab = PatientTab::Chat;
        let ticket = self.chat.select(chat);
        self.chat.load(api, ctx, ticket).await;
    }

    pub async fn send_message(&mut self, api: &ApiClient, ctx: &RequestContext) {
        if let Some(notice) = self.chat.send(api, ctx).await {
            self.notice = Some(notice);
        }
    }
}
