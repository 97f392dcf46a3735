//! MedAssist portal: session lifecycle, role routing and the per-role
//! dashboards, independent of how they are drawn.

pub mod dashboard;
pub mod gateway;
pub mod landing;
pub mod portal;
pub mod router;
pub mod session;

pub use gateway::{AuthFailure, AuthGateway};
pub use landing::{FormMode, LandingForm};
pub use portal::{Portal, Screen};
pub use router::{DashboardKind, Route};
pub use session::{Session, SessionStore};
