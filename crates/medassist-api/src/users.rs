use medassist_types::models::DoctorProfile;

use crate::client::ApiClient;
use crate::context::RequestContext;
use crate::error::ApiError;

impl ApiClient {
    /// `GET /users/doctors`
    ///
    /// The directory is public on the server side, but the bearer header is
    /// still sent when the context has one.
    pub async fn list_doctors(&self, ctx: &RequestContext) -> Result<Vec<DoctorProfile>, ApiError> {
        let mut builder = self.http().get(self.url("/users/doctors"));
        if ctx.is_authenticated() {
            builder = ctx.authorize(builder)?;
        }
        self.send_json(builder).await
    }
}
