use std::sync::Arc;

use serde_json::{json, Value};

use tgmcp_core::{
    domain::{ChatRef, Message, MessageId, SendPollParams},
    errors::Error,
    ports::ExtraParams,
    Result,
};

use crate::{
    client::{ApiClient, CallOptions},
    facade::body_from_extra,
};

/// Message-area operations: sending, forwarding, editing, pinning.
#[derive(Clone, Debug)]
pub(crate) struct MessageOps {
    client: Arc<ApiClient>,
}

impl MessageOps {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub(crate) async fn send_message(
        &self,
        chat: ChatRef,
        text: &str,
        extra: Option<ExtraParams>,
    ) -> Result<Message> {
        self.client
            .call(
                "sendMessage",
                send_message_body(chat, text, extra)?,
                CallOptions::default(),
            )
            .await
    }

    pub(crate) async fn forward_message(
        &self,
        chat: ChatRef,
        from_chat: ChatRef,
        message_id: i64,
        extra: Option<ExtraParams>,
    ) -> Result<Message> {
        self.client
            .call(
                "forwardMessage",
                forward_message_body(chat, from_chat, message_id, extra),
                CallOptions::default(),
            )
            .await
    }

    pub(crate) async fn edit_message_text(
        &self,
        chat: ChatRef,
        message_id: i64,
        text: &str,
        extra: Option<ExtraParams>,
    ) -> Result<Message> {
        if text.is_empty() {
            return Err(Error::Validation("message text must not be empty".to_string()));
        }

        let mut body = body_from_extra(extra);
        body.insert("chat_id".to_string(), chat_value(chat));
        body.insert("message_id".to_string(), json!(message_id));
        body.insert("text".to_string(), json!(text));

        self.client
            .call("editMessageText", Value::Object(body), CallOptions::default())
            .await
    }

    pub(crate) async fn delete_message(&self, chat: ChatRef, message_id: i64) -> Result<bool> {
        self.client
            .call(
                "deleteMessage",
                json!({"chat_id": chat_value(chat), "message_id": message_id}),
                CallOptions::default(),
            )
            .await
    }

    pub(crate) async fn copy_message(
        &self,
        chat: ChatRef,
        from_chat: ChatRef,
        message_id: i64,
        extra: Option<ExtraParams>,
    ) -> Result<MessageId> {
        let mut body = body_from_extra(extra);
        body.insert("chat_id".to_string(), chat_value(chat));
        body.insert("from_chat_id".to_string(), chat_value(from_chat));
        body.insert("message_id".to_string(), json!(message_id));

        self.client
            .call("copyMessage", Value::Object(body), CallOptions::default())
            .await
    }

    pub(crate) async fn pin_chat_message(
        &self,
        chat: ChatRef,
        message_id: i64,
        extra: Option<ExtraParams>,
    ) -> Result<bool> {
        let mut body = body_from_extra(extra);
        body.insert("chat_id".to_string(), chat_value(chat));
        body.insert("message_id".to_string(), json!(message_id));

        self.client
            .call("pinChatMessage", Value::Object(body), CallOptions::default())
            .await
    }

    pub(crate) async fn unpin_chat_message(
        &self,
        chat: ChatRef,
        message_id: Option<i64>,
        extra: Option<ExtraParams>,
    ) -> Result<bool> {
        self.client
            .call(
                "unpinChatMessage",
                unpin_chat_message_body(chat, message_id, extra),
                CallOptions::default(),
            )
            .await
    }

    pub(crate) async fn unpin_all_chat_messages(&self, chat: ChatRef) -> Result<bool> {
        self.client
            .call(
                "unpinAllChatMessages",
                json!({"chat_id": chat_value(chat)}),
                CallOptions::default(),
            )
            .await
    }

    pub(crate) async fn send_poll(&self, params: SendPollParams) -> Result<Message> {
        params.validate()?;
        self.client
            .call("sendPoll", serde_json::to_value(&params)?, CallOptions::default())
            .await
    }

    pub(crate) async fn send_contact(
        &self,
        chat: ChatRef,
        phone_number: &str,
        first_name: &str,
        extra: Option<ExtraParams>,
    ) -> Result<Message> {
        let mut body = body_from_extra(extra);
        body.insert("chat_id".to_string(), chat_value(chat));
        body.insert("phone_number".to_string(), json!(phone_number));
        body.insert("first_name".to_string(), json!(first_name));

        self.client
            .call("sendContact", Value::Object(body), CallOptions::default())
            .await
    }
}

pub(crate) fn chat_value(chat: ChatRef) -> Value {
    // ChatRef is untagged; this cannot fail.
    serde_json::to_value(chat).unwrap_or(Value::Null)
}

fn send_message_body(chat: ChatRef, text: &str, extra: Option<ExtraParams>) -> Result<Value> {
    if text.is_empty() {
        return Err(Error::Validation("message text must not be empty".to_string()));
    }

    let mut body = body_from_extra(extra);
    body.insert("chat_id".to_string(), chat_value(chat));
    body.insert("text".to_string(), json!(text));
    Ok(Value::Object(body))
}

fn forward_message_body(
    chat: ChatRef,
    from_chat: ChatRef,
    message_id: i64,
    extra: Option<ExtraParams>,
) -> Value {
    let mut body = body_from_extra(extra);
    body.insert("chat_id".to_string(), chat_value(chat));
    body.insert("from_chat_id".to_string(), chat_value(from_chat));
    body.insert("message_id".to_string(), json!(message_id));
    Value::Object(body)
}

fn unpin_chat_message_body(
    chat: ChatRef,
    message_id: Option<i64>,
    extra: Option<ExtraParams>,
) -> Value {
    let mut body = body_from_extra(extra);
    body.insert("chat_id".to_string(), chat_value(chat));
    // Absent message_id means "most recent pinned message"; the key must be
    // entirely absent from the body, never null.
    if let Some(id) = message_id {
        body.insert("message_id".to_string(), json!(id));
    }
    Value::Object(body)
}
