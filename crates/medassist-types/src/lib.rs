//! Wire models shared by the MedAssist client crates and the test backend.

pub mod api;
pub mod models;
pub mod time;
