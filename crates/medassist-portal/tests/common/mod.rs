//! In-process MedAssist backend for integration tests.
//!
//! Speaks the same JSON contract as the real API under `/api`, keeps
//! everything in memory, and has a few switches for failure scenarios.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    routing::{get, patch, post},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use medassist_api::ApiClient;
use medassist_portal::{AuthGateway, SessionStore};
use medassist_store::{MemoryTokenStore, TokenStore};
use medassist_types::api::{AuthResponse, CreatePrescriptionRequest, ErrorBody, LoginRequest, RegisterRequest};
use medassist_types::models::{
    Chat, ChatStatus, DoctorProfile, Message, MessageKind, Prescription, PrescriptionStatus, Role, User,
};

const JWT_SECRET: &str = "medassist-test-secret";

type Failure = (StatusCode, Json<ErrorBody>);
type Reply<T> = Result<Json<T>, Failure>;

fn fail(status: StatusCode, detail: &str) -> Failure {
    (status, Json(ErrorBody::with_detail(detail)))
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    exp: usize,
}

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
struct Db {
    accounts: Vec<Account>,
    chats: Vec<Chat>,
    messages: Vec<Message>,
    prescriptions: Vec<Prescription>,
}

#[derive(Default)]
struct Inner {
    db: Mutex<Db>,
    /// Every resource endpoint answers 503 (auth keeps working).
    outage: AtomicBool,
    /// `GET /users/me` answers 401 regardless of the token.
    reject_profiles: AtomicBool,
    message_delays: Mutex<HashMap<String, Duration>>,
}

/// Token store whose every operation fails, like an unreadable disk.
pub struct BrokenTokenStore;

impl TokenStore for BrokenTokenStore {
    fn load_token(&self) -> anyhow::Result<Option<String>> {
        Err(anyhow::anyhow!("storage unavailable"))
    }

    fn save_token(&self, _token: &str) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("storage unavailable"))
    }

    fn clear_token(&self) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("storage unavailable"))
    }
}

#[derive(Clone)]
pub struct TestBackend {
    pub base_url: String,
    inner: Arc<Inner>,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

impl TestBackend {
    pub async fn spawn() -> Self {
        init_tracing();
        let inner = Arc::new(Inner::default());

        let api = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/register", post(register))
            .route("/users/me", get(current_user))
            .route("/users/doctors", get(list_doctors))
            .route("/chats", get(list_chats).post(create_chat))
            .route("/chats/{chat_id}/messages", get(list_messages).post(send_message))
            .route("/prescriptions", get(list_prescriptions).post(create_prescription))
            .route("/prescriptions/{prescription_id}/dispense", patch(dispense))
            .with_state(inner.clone());

        let app = Router::new().nest("/api", api).layer(TraceLayer::new_for_http());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            inner,
        }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url).unwrap()
    }

    pub fn session(&self, storage: Arc<MemoryTokenStore>) -> SessionStore<Arc<MemoryTokenStore>> {
        self.session_with(storage)
    }

    pub fn session_with<S: TokenStore>(&self, storage: S) -> SessionStore<S> {
        SessionStore::new(AuthGateway::new(self.client()), storage)
    }

    /// Insert an account directly, bypassing registration.
    pub fn seed_user(&self, id: &str, role: Role, email: &str, password: &str, full_name: &str) -> User {
        let user = User {
            id: id.into(),
            email: email.into(),
            full_name: full_name.into(),
            role,
            phone: None,
            specialization: role.has_specialization().then(|| "General Practice".to_string()),
            license_number: role.has_license().then(|| format!("LIC-{}", id)),
        };
        self.inner.db.lock().unwrap().accounts.push(Account {
            user: user.clone(),
            password: password.into(),
        });
        user
    }

    pub fn token_for(&self, user: &User) -> String {
        create_token(user)
    }

    pub fn set_outage(&self, on: bool) {
        self.inner.outage.store(on, Ordering::SeqCst);
    }

    pub fn reject_profiles(&self, on: bool) {
        self.inner.reject_profiles.store(on, Ordering::SeqCst);
    }

    /// Hold `GET /chats/{chat_id}/messages` replies for `delay`.
    pub fn delay_messages(&self, chat_id: &str, delay: Duration) {
        self.inner.message_delays.lock().unwrap().insert(chat_id.into(), delay);
    }

    pub fn stored_prescription(&self, id: &str) -> Option<Prescription> {
        let db = self.inner.db.lock().unwrap();
        db.prescriptions.iter().find(|p| p.id == id).cloned()
    }

    pub fn chat_count(&self) -> usize {
        self.inner.db.lock().unwrap().chats.len()
    }
}

fn create_token(user: &User) -> String {
    let claims = Claims {
        sub: user.id.clone(),
        role: user.role.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::hours(24)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

fn authenticate(inner: &Inner, headers: &HeaderMap) -> Result<User, Failure> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| fail(StatusCode::FORBIDDEN, "Not authenticated"))?;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(JWT_SECRET.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| fail(StatusCode::UNAUTHORIZED, "Invalid authentication credentials"))?;

    let db = inner.db.lock().unwrap();
    db.accounts
        .iter()
        .find(|a| a.user.id == data.claims.sub)
        .map(|a| a.user.clone())
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "User not found"))
}

fn check_outage(inner: &Inner) -> Result<(), Failure> {
    if inner.outage.load(Ordering::SeqCst) {
        return Err(fail(StatusCode::SERVICE_UNAVAILABLE, "Service unavailable"));
    }
    Ok(())
}

// -- Auth --

async fn login(State(inner): State<Arc<Inner>>, Json(req): Json<LoginRequest>) -> Reply<AuthResponse> {
    let db = inner.db.lock().unwrap();
    let account = db
        .accounts
        .iter()
        .find(|a| a.user.email == req.email && a.password == req.password)
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Incorrect email or password"))?;

    Ok(Json(AuthResponse {
        access_token: create_token(&account.user),
        token_type: "bearer".into(),
        user: account.user.clone(),
    }))
}

async fn register(State(inner): State<Arc<Inner>>, Json(req): Json<RegisterRequest>) -> Reply<AuthResponse> {
    let mut db = inner.db.lock().unwrap();
    if db.accounts.iter().any(|a| a.user.email == req.email) {
        return Err(fail(StatusCode::BAD_REQUEST, "Email already registered"));
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        email: req.email,
        full_name: req.full_name,
        role: req.role,
        phone: req.phone,
        specialization: req.specialization,
        license_number: req.license_number,
    };
    db.accounts.push(Account {
        user: user.clone(),
        password: req.password,
    });

    Ok(Json(AuthResponse {
        access_token: create_token(&user),
        token_type: "bearer".into(),
        user,
    }))
}

async fn current_user(State(inner): State<Arc<Inner>>, headers: HeaderMap) -> Reply<User> {
    check_outage(&inner)?;
    if inner.reject_profiles.load(Ordering::SeqCst) {
        return Err(fail(StatusCode::UNAUTHORIZED, "Invalid authentication credentials"));
    }
    authenticate(&inner, &headers).map(Json)
}

async fn list_doctors(State(inner): State<Arc<Inner>>) -> Reply<Vec<DoctorProfile>> {
    check_outage(&inner)?;
    let db = inner.db.lock().unwrap();
    let doctors = db
        .accounts
        .iter()
        .filter(|a| a.user.role == Role::Doctor)
        .map(|a| DoctorProfile {
            id: a.user.id.clone(),
            full_name: a.user.full_name.clone(),
            specialization: a.user.specialization.clone(),
            license_number: a.user.license_number.clone(),
        })
        .collect();
    Ok(Json(doctors))
}

// -- Chats --

#[derive(Deserialize)]
struct ChatQuery {
    doctor_id: String,
}

#[derive(Deserialize)]
struct ContentQuery {
    content: String,
}

async fn list_chats(State(inner): State<Arc<Inner>>, headers: HeaderMap) -> Reply<Vec<Chat>> {
    check_outage(&inner)?;
    let user = authenticate(&inner, &headers)?;
    let db = inner.db.lock().unwrap();
    let chats = match user.role {
        Role::Patient => db.chats.iter().filter(|c| c.patient_id == user.id).cloned().collect(),
        Role::Doctor => db.chats.iter().filter(|c| c.doctor_id == user.id).cloned().collect(),
        _ => return Err(fail(StatusCode::FORBIDDEN, "Not authorized")),
    };
    Ok(Json(chats))
}

async fn create_chat(
    State(inner): State<Arc<Inner>>,
    headers: HeaderMap,
    Query(query): Query<ChatQuery>,
) -> Reply<Chat> {
    check_outage(&inner)?;
    let user = authenticate(&inner, &headers)?;
    if user.role != Role::Patient {
        return Err(fail(StatusCode::FORBIDDEN, "Only patients can start chats"));
    }

    let mut db = inner.db.lock().unwrap();
    let doctor = db
        .accounts
        .iter()
        .find(|a| a.user.id == query.doctor_id && a.user.role == Role::Doctor)
        .map(|a| a.user.clone())
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Doctor not found"))?;

    if let Some(existing) = db
        .chats
        .iter()
        .find(|c| c.patient_id == user.id && c.doctor_id == doctor.id && c.status == ChatStatus::Active)
    {
        return Ok(Json(existing.clone()));
    }

    let chat = Chat {
        id: Uuid::new_v4().to_string(),
        patient_id: user.id,
        doctor_id: doctor.id,
        patient_name: user.full_name,
        doctor_name: doctor.full_name,
        status: ChatStatus::Active,
        created_at: Some(chrono::Utc::now()),
        last_message: None,
        last_message_time: None,
    };
    db.chats.push(chat.clone());
    Ok(Json(chat))
}

fn member_chat(db: &Db, chat_id: &str, user: &User) -> Result<Chat, Failure> {
    let chat = db
        .chats
        .iter()
        .find(|c| c.id == chat_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Chat not found"))?;
    if user.id != chat.patient_id && user.id != chat.doctor_id {
        return Err(fail(StatusCode::FORBIDDEN, "Not authorized"));
    }
    Ok(chat.clone())
}

async fn list_messages(
    State(inner): State<Arc<Inner>>,
    headers: HeaderMap,
    Path(chat_id): Path<String>,
) -> Reply<Vec<Message>> {
    check_outage(&inner)?;
    let user = authenticate(&inner, &headers)?;

    let messages: Vec<Message> = {
        let db = inner.db.lock().unwrap();
        member_chat(&db, &chat_id, &user)?;
        db.messages.iter().filter(|m| m.chat_id == chat_id).cloned().collect()
    };

    let delay = inner.message_delays.lock().unwrap().get(&chat_id).copied();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    Ok(Json(messages))
}

async fn send_message(
    State(inner): State<Arc<Inner>>,
    headers: HeaderMap,
    Path(chat_id): Path<String>,
    Query(query): Query<ContentQuery>,
) -> Reply<Message> {
    check_outage(&inner)?;
    let user = authenticate(&inner, &headers)?;

    let mut db = inner.db.lock().unwrap();
    member_chat(&db, &chat_id, &user)?;

    let now = chrono::Utc::now();
    let message = Message {
        id: Uuid::new_v4().to_string(),
        chat_id: chat_id.clone(),
        sender_id: user.id,
        sender_name: user.full_name,
        sender_role: user.role,
        content: query.content.clone(),
        timestamp: Some(now),
        message_type: MessageKind::Text,
    };
    db.messages.push(message.clone());
    if let Some(chat) = db.chats.iter_mut().find(|c| c.id == chat_id) {
        chat.last_message = Some(query.content);
        chat.last_message_time = Some(now);
    }
    Ok(Json(message))
}

// -- Prescriptions --

async fn list_prescriptions(State(inner): State<Arc<Inner>>, headers: HeaderMap) -> Reply<Vec<Prescription>> {
    check_outage(&inner)?;
    let user = authenticate(&inner, &headers)?;
    let db = inner.db.lock().unwrap();
    let list = db.prescriptions.iter();
    let prescriptions = match user.role {
        Role::Patient => list.filter(|p| p.patient_id == user.id).cloned().collect(),
        Role::Doctor => list.filter(|p| p.doctor_id == user.id).cloned().collect(),
        Role::Pharmacy => list
            .filter(|p| matches!(p.status, PrescriptionStatus::Pending | PrescriptionStatus::Dispensed))
            .cloned()
            .collect(),
        Role::Unknown => return Err(fail(StatusCode::FORBIDDEN, "Not authorized")),
    };
    Ok(Json(prescriptions))
}

async fn create_prescription(
    State(inner): State<Arc<Inner>>,
    headers: HeaderMap,
    Json(req): Json<CreatePrescriptionRequest>,
) -> Reply<Prescription> {
    check_outage(&inner)?;
    let user = authenticate(&inner, &headers)?;
    if user.role != Role::Doctor {
        return Err(fail(StatusCode::FORBIDDEN, "Only doctors can create prescriptions"));
    }

    let mut db = inner.db.lock().unwrap();
    let patient = db
        .accounts
        .iter()
        .find(|a| a.user.id == req.patient_id && a.user.role == Role::Patient)
        .map(|a| a.user.clone())
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Patient not found"))?;

    let prescription = Prescription {
        id: Uuid::new_v4().to_string(),
        patient_id: patient.id,
        doctor_id: user.id,
        pharmacy_id: None,
        patient_name: patient.full_name,
        doctor_name: user.full_name,
        medications: req.medications,
        diagnosis: req.diagnosis,
        instructions: req.instructions,
        status: PrescriptionStatus::Pending,
        created_at: Some(chrono::Utc::now()),
        dispensed_at: None,
    };
    db.prescriptions.push(prescription.clone());
    Ok(Json(prescription))
}

async fn dispense(
    State(inner): State<Arc<Inner>>,
    headers: HeaderMap,
    Path(prescription_id): Path<String>,
) -> Reply<serde_json::Value> {
    check_outage(&inner)?;
    let user = authenticate(&inner, &headers)?;
    if user.role != Role::Pharmacy {
        return Err(fail(StatusCode::FORBIDDEN, "Only pharmacy can dispense prescriptions"));
    }

    let mut db = inner.db.lock().unwrap();
    let prescription = db
        .prescriptions
        .iter_mut()
        .find(|p| p.id == prescription_id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Prescription not found"))?;
    prescription.status = PrescriptionStatus::Dispensed;
    prescription.pharmacy_id = Some(user.id);
    prescription.dispensed_at = Some(chrono::Utc::now());

    Ok(Json(serde_json::json!({ "message": "Prescription dispensed successfully" })))
}
