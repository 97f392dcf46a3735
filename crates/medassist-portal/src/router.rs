use medassist_types::models::{Role, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardKind {
    Patient,
    Doctor,
    Pharmacy,
}

impl DashboardKind {
    pub fn for_role(role: Role) -> Option<Self> {
        match role {
            Role::Patient => Some(Self::Patient),
            Role::Doctor => Some(Self::Doctor),
            Role::Pharmacy => Some(Self::Pharmacy),
            Role::Unknown => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Patient => "Patient Portal",
            Self::Doctor => "Doctor Portal",
            Self::Pharmacy => "Pharmacy Portal",
        }
    }
}

/// Top-level view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Landing page with the login/register form.
    Unauthenticated,
    Authenticated(DashboardKind),
}

impl Route {
    /// A user whose role this client does not know gets the landing page.
    pub fn resolve(user: Option<&User>) -> Self {
        user.and_then(|u| DashboardKind::for_role(u.role))
            .map(Self::Authenticated)
            .unwrap_or(Self::Unauthenticated)
    }
}
