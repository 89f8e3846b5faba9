use async_trait::async_trait;
use serde_json::Value;

use crate::{
    domain::{Chat, ChatRef, GetUpdatesParams, Message, MessageId, SendPollParams, Update, User},
    Result,
};

/// Escape hatch for operation parameters this crate does not model. Keys
/// collide with required wire fields at the caller's risk: required fields
/// always win the merge.
pub type ExtraParams = serde_json::Map<String, Value>;

/// Capability port over the Telegram Bot API.
///
/// One method per supported remote operation. The HTTP adapter is the real
/// implementation; tools depend on this trait so they can be tested against
/// a recording mock.
#[async_trait]
pub trait BotApi: Send + Sync {
    /// `getMe`: bot identity; the standard token sanity check.
    async fn get_me(&self) -> Result<User>;

    /// `sendMessage`. `text` must be non-empty.
    async fn send_message(
        &self,
        chat: ChatRef,
        text: &str,
        extra: Option<ExtraParams>,
    ) -> Result<Message>;

    /// `forwardMessage`.
    async fn forward_message(
        &self,
        chat: ChatRef,
        from_chat: ChatRef,
        message_id: i64,
        extra: Option<ExtraParams>,
    ) -> Result<Message>;

    /// `editMessageText`.
    async fn edit_message_text(
        &self,
        chat: ChatRef,
        message_id: i64,
        text: &str,
        extra: Option<ExtraParams>,
    ) -> Result<Message>;

    /// `deleteMessage`.
    async fn delete_message(&self, chat: ChatRef, message_id: i64) -> Result<bool>;

    /// `copyMessage`: returns only the new message id.
    async fn copy_message(
        &self,
        chat: ChatRef,
        from_chat: ChatRef,
        message_id: i64,
        extra: Option<ExtraParams>,
    ) -> Result<MessageId>;

    /// `pinChatMessage`.
    async fn pin_chat_message(
        &self,
        chat: ChatRef,
        message_id: i64,
        extra: Option<ExtraParams>,
    ) -> Result<bool>;

    /// `unpinChatMessage`. Omitting `message_id` unpins the most recent
    /// pinned message (a remote-side default, not resolved here).
    async fn unpin_chat_message(
        &self,
        chat: ChatRef,
        message_id: Option<i64>,
        extra: Option<ExtraParams>,
    ) -> Result<bool>;

    /// `unpinAllChatMessages`.
    async fn unpin_all_chat_messages(&self, chat: ChatRef) -> Result<bool>;

    /// `getChat`: full chat info.
    async fn get_chat(&self, chat: ChatRef) -> Result<Chat>;

    /// `sendPoll`. Parameters are validated locally first.
    async fn send_poll(&self, params: SendPollParams) -> Result<Message>;

    /// `sendContact`.
    async fn send_contact(
        &self,
        chat: ChatRef,
        phone_number: &str,
        first_name: &str,
        extra: Option<ExtraParams>,
    ) -> Result<Message>;

    /// `getUpdates` long polling. The offset cursor is the caller's to keep.
    async fn get_updates(&self, params: Option<GetUpdatesParams>) -> Result<Vec<Update>>;
}
