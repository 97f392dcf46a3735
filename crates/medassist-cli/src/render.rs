//! Plain-text rendering of the portal screens.

use chrono::{DateTime, Utc};

use medassist_portal::dashboard::{
    ChatPane, DoctorDashboard, DoctorTab, Notice, PatientDashboard, PatientTab, PharmacyDashboard, PharmacyTab,
};
use medassist_portal::{DashboardKind, FormMode, LandingForm, Screen};
use medassist_types::models::{Chat, Prescription, Role, User};

pub fn screen(screen: &Screen, user: Option<&User>) -> String {
    let mut lines = Vec::new();
    match screen {
        Screen::Landing(form) => landing(form, user, &mut lines),
        Screen::Patient(dashboard) => {
            header(DashboardKind::Patient, user, &mut lines);
            patient(dashboard, &mut lines);
        }
        Screen::Doctor(dashboard) => {
            header(DashboardKind::Doctor, user, &mut lines);
            doctor(dashboard, &mut lines);
        }
        Screen::Pharmacy(dashboard) => {
            header(DashboardKind::Pharmacy, user, &mut lines);
            pharmacy(dashboard, &mut lines);
        }
    }
    lines.join("\n")
}

pub fn notice(notice: &Notice) -> String {
    match notice {
        Notice::Success(message) => format!("[ok] {}", message),
        Notice::Failure(message) => format!("[!] {}", message),
    }
}

/// Tab strip with the current tab in brackets.
pub fn tabs<T: Copy + PartialEq>(all: &[T], current: T, label: impl Fn(&T) -> &'static str) -> String {
    all.iter()
        .map(|tab| {
            if *tab == current {
                format!("[{}]", label(tab))
            } else {
                label(tab).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn header(kind: DashboardKind, user: Option<&User>, lines: &mut Vec<String>) {
    match user {
        Some(user) => lines.push(format!("== {} == Welcome, {}", kind.title(), user.full_name)),
        None => lines.push(format!("== {} ==", kind.title())),
    }
}

fn landing(form: &LandingForm, user: Option<&User>, lines: &mut Vec<String>) {
    lines.push("== MedAssist ==".into());
    if let Some(user) = user {
        lines.push(format!(
            "Signed in as {} with role '{}', which has no portal. Use 'logout'.",
            user.email, user.role
        ));
        return;
    }
    if form.is_submitting() {
        match form.mode() {
            FormMode::Login => lines.push("Signing in...".into()),
            FormMode::Register => lines.push("Creating account...".into()),
        }
        return;
    }
    match form.mode() {
        FormMode::Login => lines.push("Sign in with 'login', or create an account with 'register'.".into()),
        FormMode::Register => lines.push("Create an account with 'register', or sign in with 'login'.".into()),
    }
    if let Some(error) = form.error() {
        lines.push(format!("[!] {}", error));
    }
}

fn patient(dashboard: &PatientDashboard, lines: &mut Vec<String>) {
    lines.push(tabs(&PatientTab::ALL, dashboard.tab(), PatientTab::label));
    match dashboard.tab() {
        PatientTab::Overview => {
            let stats = dashboard.stats();
            lines.push(format!("Active chats:      {}", stats.active_chats));
            lines.push(format!("Prescriptions:     {}", stats.prescriptions));
            lines.push(format!("Available doctors: {}", stats.available_doctors));
        }
        PatientTab::Doctors => {
            if dashboard.doctors().is_empty() {
                lines.push("No doctors available".into());
            }
            for (i, doctor) in dashboard.doctors().iter().enumerate() {
                lines.push(format!(
                    "{:>3}. Dr. {} - {} (license {})",
                    i + 1,
                    doctor.full_name,
                    doctor.specialization.as_deref().unwrap_or("General Practice"),
                    doctor.license_number.as_deref().unwrap_or("n/a")
                ));
            }
        }
        PatientTab::Chat => conversation(dashboard.chats(), dashboard.chat(), Role::Patient, lines),
        PatientTab::Prescriptions => prescriptions(dashboard.prescriptions().iter(), lines),
    }
}

fn doctor(dashboard: &DoctorDashboard, lines: &mut Vec<String>) {
    lines.push(tabs(&DoctorTab::ALL, dashboard.tab(), DoctorTab::label));
    match dashboard.tab() {
        DoctorTab::Overview => {
            let stats = dashboard.stats();
            lines.push(format!("Active patients:       {}", stats.active_patients));
            lines.push(format!("Prescriptions written: {}", stats.prescriptions_written));
        }
        DoctorTab::Patients => {
            conversation(dashboard.chats(), dashboard.chat(), Role::Doctor, lines);
            if let Some(draft) = dashboard.draft() {
                lines.push(format!(
                    "Unsent prescription for {} ({} medication(s)); 'rx' to retry",
                    draft.patient_name(),
                    draft.medications().len()
                ));
            }
        }
        DoctorTab::Prescriptions => prescriptions(dashboard.prescriptions().iter(), lines),
    }
}

fn pharmacy(dashboard: &PharmacyDashboard, lines: &mut Vec<String>) {
    lines.push(tabs(&PharmacyTab::ALL, dashboard.tab(), PharmacyTab::label));
    match dashboard.tab() {
        PharmacyTab::Overview => {
            let stats = dashboard.stats();
            lines.push(format!("Pending:   {}", stats.pending));
            lines.push(format!("Dispensed: {}", stats.dispensed));
            lines.push(format!("Total:     {}", stats.total));
        }
        PharmacyTab::Pending => prescriptions(dashboard.pending(), lines),
        PharmacyTab::Dispensed => prescriptions(dashboard.dispensed(), lines),
    }
}

fn conversation(chats: &[Chat], pane: &ChatPane, viewer: Role, lines: &mut Vec<String>) {
    if chats.is_empty() {
        lines.push("No conversations yet".into());
    }
    let selected = pane.selected().map(|chat| chat.id.as_str());
    for (i, chat) in chats.iter().enumerate() {
        let marker = if Some(chat.id.as_str()) == selected { '>' } else { ' ' };
        lines.push(format!(
            "{}{:>2}. {}  {}",
            marker,
            i + 1,
            chat.counterpart_name(viewer),
            chat.last_message.as_deref().unwrap_or("")
        ));
    }

    let Some(chat) = pane.selected() else {
        return;
    };
    lines.push(format!("-- {} --", chat.counterpart_name(viewer)));
    if pane.messages().is_empty() {
        lines.push("(no messages)".into());
    }
    for message in pane.messages() {
        lines.push(format!(
            "[{}] {}: {}",
            stamp(message.timestamp.as_ref()),
            message.sender_name,
            message.content
        ));
    }
}

fn prescriptions<'a>(list: impl Iterator<Item = &'a Prescription>, lines: &mut Vec<String>) {
    let mut any = false;
    for (i, rx) in list.enumerate() {
        any = true;
        lines.push(format!(
            "{:>3}. {} [{}] {} -> {}  ({})",
            i + 1,
            rx.id,
            rx.status,
            rx.doctor_name,
            rx.patient_name,
            stamp(rx.created_at.as_ref())
        ));
        lines.push(format!("     Diagnosis: {}", rx.diagnosis));
        for med in &rx.medications {
            lines.push(format!("     - {} {}, {}", med.name, med.dosage, med.frequency));
        }
        if !rx.instructions.is_empty() {
            lines.push(format!("     Instructions: {}", rx.instructions));
        }
        if let Some(dispensed_at) = rx.dispensed_at.as_ref() {
            lines.push(format!("     Dispensed {}", stamp(Some(dispensed_at))));
        }
    }
    if !any {
        lines.push("No prescriptions".into());
    }
}

fn stamp(ts: Option<&DateTime<Utc>>) -> String {
    match ts {
        Some(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".into(),
    }
}
