use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use tgmcp_core::{
    config::Config,
    domain::{Chat, ChatRef, GetUpdatesParams, Message, MessageId, SendPollParams, Update, User},
    ports::{BotApi, ExtraParams},
    Result,
};

use crate::{
    auth::AuthOps, chat::ChatOps, client::ApiClient, messaging::MessageOps, updates::UpdateOps,
};

/// The capability façade: every supported Bot API operation as a typed
/// method, grouped into per-area modules that share one request client.
///
/// No method classifies errors on its own; whatever the client produced
/// propagates unchanged.
#[derive(Clone, Debug)]
pub struct TelegramBot {
    auth: AuthOps,
    messages: MessageOps,
    chats: ChatOps,
    updates: UpdateOps,
}

impl TelegramBot {
    pub fn new(client: ApiClient, long_poll_grace: std::time::Duration) -> Self {
        let client = Arc::new(client);
        Self {
            auth: AuthOps::new(client.clone()),
            messages: MessageOps::new(client.clone()),
            chats: ChatOps::new(client.clone()),
            updates: UpdateOps::new(client, long_poll_grace),
        }
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Ok(Self::new(ApiClient::from_config(cfg)?, cfg.long_poll_grace))
    }
}

#[async_trait]
impl BotApi for TelegramBot {
    async fn get_me(&self) -> Result<User> {
        self.auth.get_me().await
    }

    async fn send_message(
        &self,
        chat: ChatRef,
        text: &str,
        extra: Option<ExtraParams>,
    ) -> Result<Message> {
        self.messages.send_message(chat, text, extra).await
    }

    async fn forward_message(
        &self,
        chat: ChatRef,
        from_chat: ChatRef,
        message_id: i64,
        extra: Option<ExtraParams>,
    ) -> Result<Message> {
        self.messages
            .forward_message(chat, from_chat, message_id, extra)
            .await
    }

    async fn edit_message_text(
        &self,
        chat: ChatRef,
        message_id: i64,
        text: &str,
        extra: Option<ExtraParams>,
    ) -> Result<Message> {
        self.messages
            .edit_message_text(chat, message_id, text, extra)
            .await
    }

    async fn delete_message(&self, chat: ChatRef, message_id: i64) -> Result<bool> {
        self.messages.delete_message(chat, message_id).await
    }

    async fn copy_message(
        &self,
        chat: ChatRef,
        from_chat: ChatRef,
        message_id: i64,
        extra: Option<ExtraParams>,
    ) -> Result<MessageId> {
        self.messages
            .copy_message(chat, from_chat, message_id, extra)
            .await
    }

    async fn pin_chat_message(
        &self,
        chat: ChatRef,
        message_id: i64,
        extra: Option<ExtraParams>,
    ) -> Result<bool> {
        self.messages.pin_chat_message(chat, message_id, extra).await
    }

    async fn unpin_chat_message(
        &self,
        chat: ChatRef,
        message_id: Option<i64>,
        extra: Option<ExtraParams>,
    ) -> Result<bool> {
        self.messages
            .unpin_chat_message(chat, message_id, extra)
            .await
    }

    async fn unpin_all_chat_messages(&self, chat: ChatRef) -> Result<bool> {
        self.messages.unpin_all_chat_messages(chat).await
    }

    async fn get_chat(&self, chat: ChatRef) -> Result<Chat> {
        self.chats.get_chat(chat).await
    }

    async fn send_poll(&self, params: SendPollParams) -> Result<Message> {
        self.messages.send_poll(params).await
    }

    async fn send_contact(
        &self,
        chat: ChatRef,
        phone_number: &str,
        first_name: &str,
        extra: Option<ExtraParams>,
    ) -> Result<Message> {
        self.messages
            .send_contact(chat, phone_number, first_name, extra)
            .await
    }

    async fn get_updates(&self, params: Option<GetUpdatesParams>) -> Result<Vec<Update>> {
        self.updates.get_updates(params).await
    }
}

/// Start a request body from the caller's extra-parameter map. Required wire
/// fields are inserted afterwards, so on a key collision the required field
/// wins; extras can never shadow `chat_id`, `text` and friends.
pub(crate) fn body_from_extra(extra: Option<ExtraParams>) -> serde_json::Map<String, Value> {
    extra.unwrap_or_default()
}
