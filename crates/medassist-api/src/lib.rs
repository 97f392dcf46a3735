//! Typed client for the MedAssist HTTP API.
//!
//! Every call takes a [`RequestContext`] carrying the bearer token, so no
//! credential state is shared between calls.

pub mod auth;
pub mod chats;
pub mod client;
pub mod context;
pub mod error;
pub mod prescriptions;
pub mod users;

pub use client::ApiClient;
pub use context::RequestContext;
pub use error::ApiError;
pub use reqwest::StatusCode;
