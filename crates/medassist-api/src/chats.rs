use medassist_types::models::{Chat, Message};

use crate::client::ApiClient;
use crate::context::RequestContext;
use crate::error::ApiError;

impl ApiClient {
    /// `GET /chats`: chats of the current user, from their perspective.
    pub async fn list_chats(&self, ctx: &RequestContext) -> Result<Vec<Chat>, ApiError> {
        let builder = ctx.authorize(self.http().get(self.url("/chats")))?;
        self.send_json(builder).await
    }

    /// `POST /chats?doctor_id=`: creates the chat, or returns the active one
    /// that already exists for this patient/doctor pair.
    pub async fn start_chat(&self, ctx: &RequestContext, doctor_id: &str) -> Result<Chat, ApiError> {
        let builder = self
            .http()
            .post(self.url("/chats"))
            .query(&[("doctor_id", doctor_id)]);
        let builder = ctx.authorize(builder)?;
        self.send_json(builder).await
    }

    /// `GET /chats/{id}/messages`, oldest first.
    pub async fn list_messages(&self, ctx: &RequestContext, chat_id: &str) -> Result<Vec<Message>, ApiError> {
        let builder = ctx.authorize(self.http().get(self.url(&format!("/chats/{}/messages", chat_id))))?;
        self.send_json(builder).await
    }

    /// `POST /chats/{id}/messages?content=`
    pub async fn send_message(
        &self,
        ctx: &RequestContext,
        chat_id: &str,
        content: &str,
    ) -> Result<Message, ApiError> {
        let builder = self
            .http()
            .post(self.url(&format!("/chats/{}/messages", chat_id)))
            .query(&[("content", content)]);
        let builder = ctx.authorize(builder)?;
        self.send_json(builder).await
    }
}
