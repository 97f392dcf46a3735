use tracing::{debug, error};

use medassist_api::{ApiClient, ApiError, RequestContext};
use medassist_types::models::{Chat, Message};

use super::Notice;

/// Identifies one message fetch. Only the most recently issued ticket may
/// update the pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagesTicket {
    chat_id: String,
    generation: u64,
}

impl MessagesTicket {
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }
}

/// Selected chat, its transcript and the compose buffer.
#[derive(Debug, Default)]
pub struct ChatPane {
    selected: Option<Chat>,
    messages: Vec<Message>,
    generation: u64,
    pub compose: String,
}

impl ChatPane {
    pub fn selected(&self) -> Option<&Chat> {
        self.selected.as_ref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Switch to `chat`. The previous transcript is dropped right away and
    /// any fetch still in flight for it becomes stale.
    pub fn select(&mut self, chat: Chat) -> MessagesTicket {
        self.messages.clear();
        self.generation += 1;
        let ticket = MessagesTicket {
            chat_id: chat.id.clone(),
            generation: self.generation,
        };
        self.selected = Some(chat);
        ticket
    }

    /// Ticket to re-fetch the current chat, keeping the shown transcript
    /// until the new one arrives.
    pub fn reload(&mut self) -> Option<MessagesTicket> {
        let chat = self.selected.as_ref()?;
        self.generation += 1;
        Some(MessagesTicket {
            chat_id: chat.id.clone(),
            generation: self.generation,
        })
    }

    /// Apply a fetch result. Returns false (and changes nothing) for a stale
    /// ticket.
    pub fn apply(&mut self, ticket: &MessagesTicket, messages: Vec<Message>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "Dropping stale messages for chat {} (generation {} < {})",
                ticket.chat_id, ticket.generation, self.generation
            );
            return false;
        }
        self.messages = messages;
        true
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.messages.clear();
        self.generation += 1;
        self.compose.clear();
    }

    /// Fetch the transcript a ticket points at without touching the pane,
    /// so several fetches can be in flight and applied as they resolve.
    pub async fn fetch(
        api: &ApiClient,
        ctx: &RequestContext,
        ticket: &MessagesTicket,
    ) -> Result<Vec<Message>, ApiError> {
        api.list_messages(ctx, &ticket.chat_id).await
    }

    /// Fetch and apply in one go. Failures are logged and leave the pane
    /// as it was.
    pub async fn load(&mut self, api: &ApiClient, ctx: &RequestContext, ticket: MessagesTicket) -> bool {
        match Self::fetch(api, ctx, &ticket).await {
            Ok(messages) => self.apply(&ticket, messages),
            Err(e) => {
                error!("Failed to fetch messages for chat {}: {}", ticket.chat_id, e);
                false
            }
        }
    }

    /// Send the compose buffer to the selected chat and re-fetch the
    /// transcript.
    ///
    /// Blank text or no selected chat is a no-op. On failure the buffer is
    /// kept and a notice returned.
    pub async fn send(&mut self, api: &ApiClient, ctx: &RequestContext) -> Option<Notice> {
        if self.compose.trim().is_empty() {
            return None;
        }
        let chat_id = self.selected.as_ref()?.id.clone();

        match api.send_message(ctx, &chat_id, &self.compose).await {
            Ok(_) => {
                self.compose.clear();
                if let Some(ticket) = self.reload() {
                    self.load(api, ctx, ticket).await;
                }
                None
            }
            Err(e) => {
                error!("Failed to send message to chat {}: {}", chat_id, e);
                Some(Notice::failure("Failed to send message"))
            }
        }
    }
}
