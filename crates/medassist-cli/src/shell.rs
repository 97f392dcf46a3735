use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

use medassist_portal::dashboard::{DoctorTab, MedicationField, PatientTab, PharmacyTab};
use medassist_portal::{FormMode, Portal, Screen};
use medassist_store::TokenStore;
use medassist_types::models::Role;

use crate::commands::{Command, HELP};
use crate::render;

/// Line-oriented driver for the portal.
pub struct Shell<S> {
    portal: Portal<S>,
    input: Lines<BufReader<Stdin>>,
}

/// One medication row as typed in.
struct MedicationInput {
    name: String,
    dosage: String,
    frequency: String,
}

impl<S: TokenStore> Shell<S> {
    pub fn new(portal: Portal<S>) -> Self {
        Self {
            portal,
            input: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        self.show();
        println!("Type 'help' for commands.");

        loop {
            let Some(raw) = self.prompt("> ").await? else {
                break;
            };
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(message) => {
                    println!("{}", message);
                    continue;
                }
            };
            debug!("Command: {:?}", command);
            if command == Command::Quit {
                break;
            }

            self.execute(command).await?;
            self.flush_notice();
        }

        println!("Goodbye!");
        Ok(())
    }

    async fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Help => println!("{}", HELP),
            Command::Login { email, password } => self.login(email, password).await?,
            Command::Register => self.register().await?,
            Command::Logout => {
                self.portal.logout().await;
                self.show();
            }
            Command::WhoAmI => match self.portal.session().user() {
                Some(user) => println!("{} <{}> ({})", user.full_name, user.email, user.role),
                None => println!("Not signed in"),
            },
            Command::Tab(name) => self.select_tab(&name),
            Command::Refresh => self.refresh().await,
            Command::Doctors => match self.portal.screen_mut() {
                Screen::Patient(dashboard) => {
                    dashboard.select_tab(PatientTab::Doctors);
                    self.show();
                }
                _ => println!("Only patients can browse doctors"),
            },
            Command::Chats => match self.portal.screen_mut() {
                Screen::Patient(dashboard) => {
                    dashboard.select_tab(PatientTab::Chat);
                    self.show();
                }
                Screen::Doctor(dashboard) => {
                    dashboard.select_tab(DoctorTab::Patients);
                    self.show();
                }
                _ => println!("No chats on this screen"),
            },
            Command::Start(key) => self.start_chat(&key).await,
            Command::Open(key) => self.open_chat(&key).await,
            Command::Say(text) => self.say(text).await,
            Command::Rx => self.prescribe().await?,
            Command::Dispense(key) => self.dispense(&key).await,
            Command::Quit => {}
        }
        Ok(())
    }

    // -- Input --

    async fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        print!("{}", label);
        std::io::stdout().flush()?;
        Ok(self.input.next_line().await?)
    }

    /// Prompt for one field. End of input reads as blank.
    async fn ask(&mut self, label: &str) -> Result<String> {
        let line = self.prompt(&format!("{}: ", label)).await?;
        Ok(line.unwrap_or_default().trim().to_string())
    }

    fn show(&self) {
        println!("{}", render::screen(self.portal.screen(), self.portal.session().user()));
    }

    fn flush_notice(&mut self) {
        let notice = match self.portal.screen_mut() {
            Screen::Patient(dashboard) => dashboard.take_notice(),
            Screen::Doctor(dashboard) => dashboard.take_notice(),
            Screen::Pharmacy(dashboard) => dashboard.take_notice(),
            Screen::Landing(_) => None,
        };
        if let Some(notice) = notice {
            println!("{}", render::notice(&notice));
        }
    }

    fn on_landing(&self) -> bool {
        matches!(self.portal.screen(), Screen::Landing(_))
    }

    // -- Landing --

    async fn login(&mut self, email: Option<String>, password: Option<String>) -> Result<()> {
        if !self.on_landing() {
            println!("Already signed in, 'logout' first");
            return Ok(());
        }
        let email = match email {
            Some(email) => email,
            None => self.ask("Email").await?,
        };
        let password = match password {
            Some(password) => password,
            None => self.ask("Password").await?,
        };

        if let Screen::Landing(form) = self.portal.screen_mut() {
            form.set_mode(FormMode::Login);
            form.email = email;
            form.password = password;
        }
        self.submit_landing().await;
        Ok(())
    }

    async fn register(&mut self) -> Result<()> {
        if !self.on_landing() {
            println!("Already signed in, 'logout' first");
            return Ok(());
        }

        let full_name = self.ask("Full name").await?;
        let role = loop {
            let raw = self.ask("Role [patient/doctor/pharmacy] (patient)").await?;
            if raw.is_empty() {
                break Role::Patient;
            }
            match raw.parse::<Role>() {
                Ok(role) => break role,
                Err(message) => println!("{}", message),
            }
        };
        let email = self.ask("Email").await?;
        let password = self.ask("Password").await?;
        let phone = self.ask("Phone (optional)").await?;
        let specialization = if role.has_specialization() {
            self.ask("Specialization").await?
        } else {
            String::new()
        };
        let license_number = if role.has_license() {
            self.ask("License number").await?
        } else {
            String::new()
        };

        if let Screen::Landing(form) = self.portal.screen_mut() {
            form.set_mode(FormMode::Register);
            form.full_name = full_name;
            form.role = role;
            form.email = email;
            form.password = password;
            form.phone = phone;
            form.specialization = specialization;
            form.license_number = license_number;
        }
        self.submit_landing().await;
        Ok(())
    }

    /// Show the in-flight state, then complete the submission.
    async fn submit_landing(&mut self) {
        if self.portal.begin_landing() {
            self.show();
        }
        self.portal.submit_landing().await;
        self.show();
    }

    // -- Dashboards --

    fn select_tab(&mut self, name: &str) {
        let found = match self.portal.screen_mut() {
            Screen::Patient(dashboard) => parse_tab(&PatientTab::ALL, PatientTab::label, name)
                .map(|tab| dashboard.select_tab(tab))
                .is_some(),
            Screen::Doctor(dashboard) => parse_tab(&DoctorTab::ALL, DoctorTab::label, name)
                .map(|tab| dashboard.select_tab(tab))
                .is_some(),
            Screen::Pharmacy(dashboard) => parse_tab(&PharmacyTab::ALL, PharmacyTab::label, name)
                .map(|tab| dashboard.select_tab(tab))
                .is_some(),
            Screen::Landing(_) => {
                println!("Sign in first");
                return;
            }
        };

        if found {
            self.show();
        } else {
            println!("Unknown tab '{}'", name);
        }
    }

    async fn refresh(&mut self) {
        let (api, ctx, screen) = self.portal.workspace();
        match screen {
            Screen::Patient(dashboard) => {
                dashboard.refresh(api, &ctx).await;
                if let Some(ticket) = dashboard.chat_mut().reload() {
                    dashboard.chat_mut().load(api, &ctx, ticket).await;
                }
            }
            Screen::Doctor(dashboard) => {
                dashboard.refresh(api, &ctx).await;
                if let Some(ticket) = dashboard.chat_mut().reload() {
                    dashboard.chat_mut().load(api, &ctx, ticket).await;
                }
            }
            Screen::Pharmacy(dashboard) => {
                dashboard.refresh(api, &ctx).await;
            }
            Screen::Landing(_) => {
                println!("Nothing to refresh");
                return;
            }
        }
        self.show();
    }

    async fn start_chat(&mut self, key: &str) {
        let (api, ctx, screen) = self.portal.workspace();
        let Screen::Patient(dashboard) = screen else {
            println!("Only patients can start chats");
            return;
        };
        let Some(doctor_id) = pick(dashboard.doctors(), key, |doctor| doctor.id.as_str()).map(|d| d.id.clone()) else {
            println!("No doctor '{}'", key);
            return;
        };

        if dashboard.start_chat(api, &ctx, &doctor_id).await {
            self.show();
        }
    }

    async fn open_chat(&mut self, key: &str) {
        let (api, ctx, screen) = self.portal.workspace();
        match screen {
            Screen::Patient(dashboard) => {
                let Some(chat) = pick(dashboard.chats(), key, |chat| chat.id.as_str()).cloned() else {
                    println!("No chat '{}'", key);
                    return;
                };
                dashboard.open_chat(api, &ctx, chat).await;
            }
            Screen::Doctor(dashboard) => {
                let Some(chat) = pick(dashboard.chats(), key, |chat| chat.id.as_str()).cloned() else {
                    println!("No chat '{}'", key);
                    return;
                };
                dashboard.open_chat(api, &ctx, chat).await;
            }
            _ => {
                println!("No chats on this screen");
                return;
            }
        }
        self.show();
    }

    async fn say(&mut self, text: String) {
        let (api, ctx, screen) = self.portal.workspace();
        match screen {
            Screen::Patient(dashboard) if dashboard.chat().selected().is_some() => {
                dashboard.chat_mut().compose = text;
                dashboard.send_message(api, &ctx).await;
            }
            Screen::Doctor(dashboard) if dashboard.chat().selected().is_some() => {
                dashboard.chat_mut().compose = text;
                dashboard.send_message(api, &ctx).await;
            }
            Screen::Patient(_) | Screen::Doctor(_) => {
                println!("Open a chat first");
                return;
            }
            _ => {
                println!("No chats on this screen");
                return;
            }
        }
        self.show();
    }

    /// Author (or retry) a prescription for the open chat's patient.
    async fn prescribe(&mut self) -> Result<()> {
        let (pending_draft, has_chat) = match self.portal.screen() {
            Screen::Doctor(dashboard) => (
                dashboard.draft().map(|d| d.patient_name().to_string()),
                dashboard.chat().selected().is_some(),
            ),
            _ => {
                println!("Only doctors can write prescriptions");
                return Ok(());
            }
        };

        let mut fresh = None;
        match pending_draft {
            Some(patient) => {
                let answer = self.ask(&format!("Retry the unsent prescription for {}? [Y/n]", patient)).await?;
                if answer.eq_ignore_ascii_case("n") || answer.eq_ignore_ascii_case("no") {
                    if let Screen::Doctor(dashboard) = self.portal.screen_mut() {
                        dashboard.close_prescription_form();
                    }
                    println!("Discarded");
                    return Ok(());
                }
            }
            None if !has_chat => {
                println!("Open a patient chat first");
                return Ok(());
            }
            None => {
                let answers = self.ask_prescription().await?;
                if answers.2.is_empty() {
                    println!("A prescription needs at least one medication");
                    return Ok(());
                }
                fresh = Some(answers);
            }
        }

        let (api, ctx, screen) = self.portal.workspace();
        let Screen::Doctor(dashboard) = screen else {
            return Ok(());
        };
        if let Some((diagnosis, instructions, medications)) = fresh {
            if !dashboard.open_prescription_form() {
                return Ok(());
            }
            let Some(draft) = dashboard.draft_mut() else {
                return Ok(());
            };
            draft.diagnosis = diagnosis;
            draft.instructions = instructions;
            for (i, med) in medications.into_iter().enumerate() {
                let index = if i == 0 { 0 } else { draft.add_medication() };
                draft.update_medication(index, MedicationField::Name, med.name);
                draft.update_medication(index, MedicationField::Dosage, med.dosage);
                draft.update_medication(index, MedicationField::Frequency, med.frequency);
            }
        }

        dashboard.submit_prescription(api, &ctx).await;
        self.show();
        Ok(())
    }

    async fn ask_prescription(&mut self) -> Result<(String, String, Vec<MedicationInput>)> {
        let diagnosis = self.ask("Diagnosis").await?;
        let instructions = self.ask("Instructions").await?;

        let mut medications = Vec::new();
        loop {
            let name = self.ask(&format!("Medication {} name (blank to finish)", medications.len() + 1)).await?;
            if name.is_empty() {
                break;
            }
            let dosage = self.ask("  Dosage").await?;
            let frequency = self.ask("  Frequency").await?;
            medications.push(MedicationInput {
                name,
                dosage,
                frequency,
            });
        }
        Ok((diagnosis, instructions, medications))
    }

    async fn dispense(&mut self, key: &str) {
        let (api, ctx, screen) = self.portal.workspace();
        let Screen::Pharmacy(dashboard) = screen else {
            println!("Only pharmacies can dispense");
            return;
        };

        // A number picks from the pending list; anything else is an id.
        let pending: Vec<_> = dashboard.pending().cloned().collect();
        let id = pick(&pending, key, |rx| rx.id.as_str())
            .map(|rx| rx.id.clone())
            .unwrap_or_else(|| key.to_string());

        dashboard.dispense(api, &ctx, &id).await;
        self.show();
    }
}

fn parse_tab<T: Copy>(all: &[T], label: impl Fn(&T) -> &'static str, name: &str) -> Option<T> {
    all.iter().copied().find(|tab| label(tab).eq_ignore_ascii_case(name))
}

/// Look an item up by 1-based position, falling back to its id.
fn pick<'a, T>(items: &'a [T], key: &str, id: impl Fn(&T) -> &str) -> Option<&'a T> {
    if let Some(item) = key.parse::<usize>().ok().and_then(|n| n.checked_sub(1)).and_then(|i| items.get(i)) {
        return Some(item);
    }
    items.iter().find(|item| id(item) == key)
}
