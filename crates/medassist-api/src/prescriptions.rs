use medassist_types::api::CreatePrescriptionRequest;
use medassist_types::models::Prescription;

use crate::client::ApiClient;
use crate::context::RequestContext;
use crate::error::ApiError;

impl ApiClient {
    /// `GET /prescriptions`. The server scopes the list by role: patients and
    /// doctors see their own, pharmacies see pending and dispensed ones.
    pub async fn list_prescriptions(&self, ctx: &RequestContext) -> Result<Vec<Prescription>, ApiError> {
        let builder = ctx.authorize(self.http().get(self.url("/prescriptions")))?;
        self.send_json(builder).await
    }

    /// `POST /prescriptions` (doctors only).
    pub async fn create_prescription(
        &self,
        ctx: &RequestContext,
        req: &CreatePrescriptionRequest,
    ) -> Result<Prescription, ApiError> {
        let builder = ctx.authorize(self.http().post(self.url("/prescriptions")).json(req))?;
        self.send_json(builder).await
    }

    /// `PATCH /prescriptions/{id}/dispense` (pharmacies only).
    ///
    /// The reply body is only an acknowledgement; callers re-fetch the list.
    pub async fn dispense_prescription(&self, ctx: &RequestContext, prescription_id: &str) -> Result<(), ApiError> {
        let builder = ctx.authorize(
            self.http()
                .patch(self.url(&format!("/prescriptions/{}/dispense", prescription_id))),
        )?;
        self.send_unit(builder).await
    }
}
