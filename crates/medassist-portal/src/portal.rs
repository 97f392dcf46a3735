use tracing::info;

use medassist_api::{ApiClient, RequestContext};
use medassist_store::TokenStore;

use crate::dashboard::{DoctorDashboard, PatientDashboard, PharmacyDashboard};
use crate::landing::LandingForm;
use crate::router::{DashboardKind, Route};
use crate::session::SessionStore;

/// What is currently on screen.
#[derive(Debug)]
pub enum Screen {
    Landing(LandingForm),
    Patient(PatientDashboard),
    Doctor(DoctorDashboard),
    Pharmacy(PharmacyDashboard),
}

impl Screen {
    pub fn route(&self) -> Route {
        match self {
            Self::Landing(_) => Route::Unauthenticated,
            Self::Patient(_) => Route::Authenticated(DashboardKind::Patient),
            Self::Doctor(_) => Route::Authenticated(DashboardKind::Doctor),
            Self::Pharmacy(_) => Route::Authenticated(DashboardKind::Pharmacy),
        }
    }
}

/// Application shell: the session plus the screen routed from it.
pub struct Portal<S> {
    session: SessionStore<S>,
    screen: Screen,
}

impl<S: TokenStore> Portal<S> {
    pub fn new(session: SessionStore<S>) -> Self {
        Self {
            session,
            screen: Screen::Landing(LandingForm::default()),
        }
    }

    /// Restore any persisted session and mount the matching screen.
    pub async fn start(&mut self) -> Route {
        self.session.initialize().await;
        self.sync().await
    }

    pub fn route(&self) -> Route {
        Route::resolve(self.session.user())
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    /// API client, a context snapshot and the screen, borrowed together so
    /// dashboard actions can be driven without cloning the client.
    pub fn workspace(&mut self) -> (&ApiClient, RequestContext, &mut Screen) {
        let ctx = self.session.context();
        (self.session.api(), ctx, &mut self.screen)
    }

    /// Validate the landing form and mark it submitting, so the front end
    /// can show progress before `submit_landing` completes it.
    pub fn begin_landing(&mut self) -> bool {
        match &mut self.screen {
            Screen::Landing(form) => form.is_submitting() || form.begin_submit(),
            _ => false,
        }
    }

    /// Complete the landing form submission (beginning it first if needed)
    /// and re-route.
    pub async fn submit_landing(&mut self) -> Route {
        if let Screen::Landing(form) = &mut self.screen {
            if form.is_submitting() || form.begin_submit() {
                let result = form.perform(&mut self.session).await;
                form.finish_submit(result);
            }
        }
        self.sync().await
    }

    pub async fn logout(&mut self) -> Route {
        self.session.logout();
        self.sync().await
    }

    /// Bring the screen in line with the session. A dashboard is mounted
    /// (and fetches its lists) only when the route actually changed.
    pub async fn sync(&mut self) -> Route {
        let route = self.route();
        if self.screen.route() == route {
            return route;
        }

        let api = self.session.api();
        let ctx = self.session.context();
        self.screen = match route {
            Route::Unauthenticated => Screen::Landing(LandingForm::default()),
            Route::Authenticated(DashboardKind::Patient) => Screen::Patient(PatientDashboard::mount(api, &ctx).await),
            Route::Authenticated(DashboardKind::Doctor) => Screen::Doctor(DoctorDashboard::mount(api, &ctx).await),
            Route::Authenticated(DashboardKind::Pharmacy) => {
                Screen::Pharmacy(PharmacyDashboard::mount(api, &ctx).await)
            }
        };
        info!("Routed to {:?}", route);
        route
    }
}
