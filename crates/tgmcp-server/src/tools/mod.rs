//! Tool definitions: one unit per exposed capability.
//!
//! A tool never lets an error escape `execute`; every failure becomes a
//! normal `ToolResult` carrying `{error, timestamp}`, so the transport
//! always has a well-formed response to deliver.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use tgmcp_core::{ports::BotApi, utils::iso_timestamp_utc};

use crate::schema::ParamSchema;

mod bot;
mod chat;
mod messages;
mod polls;
mod updates;

pub use bot::GetBotInfoTool;
pub use chat::GetChatTool;
pub use messages::{
    ForwardMessageTool, PinChatMessageTool, SendContactTool, SendMessageTool,
    UnpinAllChatMessagesTool, UnpinChatMessageTool,
};
pub use polls::SendPollTool;
pub use updates::GetUpdatesTool;

/// One content block of a tool result. Only text blocks are produced.
#[derive(Clone, Debug, Serialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text",
            text: text.into(),
        }
    }
}

/// Transport-neutral tool response envelope.
#[derive(Clone, Debug, Serialize)]
pub struct ToolResult {
    pub content: Vec<ContentBlock>,
}

impl ToolResult {
    /// Success: one text block with the pretty-printed payload.
    pub fn json(data: &impl Serialize) -> Self {
        let text = serde_json::to_string_pretty(data)
            .unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"));
        Self {
            content: vec![ContentBlock::text(text)],
        }
    }

    /// Failure: one text block with `{error, timestamp}`.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self::json(&serde_json::json!({
            "error": message.to_string(),
            "timestamp": iso_timestamp_utc(),
        }))
    }
}

/// A named, schema-validated operation exposed to MCP callers. Stateless;
/// constructed once at startup and held by the registry for the process
/// lifetime.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn schema(&self) -> &ParamSchema;

    /// Run with arguments the registry has already validated against
    /// `schema()`. Must not panic or error out; failures come back as
    /// error-shaped `ToolResult`s.
    async fn execute(&self, args: Value) -> ToolResult;
}

/// Every tool this server exposes, in registration order.
pub fn all_tools(api: Arc<dyn BotApi>) -> Vec<Box<dyn Tool>> {
    vec![
        Box::new(GetBotInfoTool::new(api.clone())),
        Box::new(SendMessageTool::new(api.clone())),
        Box::new(GetUpdatesTool::new(api.clone())),
        Box::new(ForwardMessageTool::new(api.clone())),
        Box::new(PinChatMessageTool::new(api.clone())),
        Box::new(UnpinChatMessageTool::new(api.clone())),
        Box::new(UnpinAllChatMessagesTool::new(api.clone())),
        Box::new(GetChatTool::new(api.clone())),
        Box::new(SendPollTool::new(api.clone())),
        Box::new(SendContactTool::new(api)),
    ]
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use tgmcp_core::{
        domain::{
            Chat, ChatRef, GetUpdatesParams, Message, MessageId, SendPollParams, Update, User,
        },
        errors::Error,
        ports::{BotApi, ExtraParams},
        Result,
    };

    use super::ToolResult;

    /// Port double: records every call (operation name + observed
    /// parameters) and answers with canned domain objects, or with a fixed
    /// error when `failing` is set.
    pub(crate) struct RecordingApi {
        pub calls: Mutex<Vec<(&'static str, Value)>>,
        pub failing: Option<String>,
    }

    impl RecordingApi {
        pub fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                failing: None,
            }
        }

        pub fn failing(description: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                failing: Some(description.to_string()),
            }
        }

        pub fn recorded(&self) -> Vec<(&'static str, Value)> {
            self.calls.lock().unwrap().clone()
        }

        fn record<T>(&self, op: &'static str, args: Value, ok: T) -> Result<T> {
            self.calls.lock().unwrap().push((op, args));
            match &self.failing {
                Some(description) => Err(Error::Api {
                    code: Some(400),
                    description: format!("Telegram API request failed: {description}"),
                }),
                None => Ok(ok),
            }
        }
    }

    pub(crate) fn sample_user() -> User {
        serde_json::from_value(json!({
            "id": 42, "is_bot": true, "first_name": "testbot", "username": "test_bot"
        }))
        .unwrap()
    }

    pub(crate) fn sample_chat() -> Chat {
        serde_json::from_value(json!({"id": 7, "type": "private", "first_name": "u"})).unwrap()
    }

    pub(crate) fn sample_message() -> Message {
        serde_json::from_value(json!({
            "message_id": 100,
            "date": 1_700_000_000,
            "chat": {"id": 7, "type": "private"},
            "text": "hello"
        }))
        .unwrap()
    }

    pub(crate) fn sample_update() -> Update {
        serde_json::from_value(json!({
            "update_id": 9000,
            "message": {
                "message_id": 100,
                "date": 1_700_000_000,
                "chat": {"id": 7, "type": "private"},
                "text": "hello"
            }
        }))
        .unwrap()
    }

    fn extra_value(extra: &Option<ExtraParams>) -> Value {
        match extra {
            Some(map) => Value::Object(map.clone()),
            None => Value::Null,
        }
    }

    #[async_trait]
    impl BotApi for RecordingApi {
        async fn get_me(&self) -> Result<User> {
            self.record("getMe", Value::Null, sample_user())
        }

        async fn send_message(
            &self,
            chat: ChatRef,
            text: &str,
            extra: Option<ExtraParams>,
        ) -> Result<Message> {
            self.record(
                "sendMessage",
                json!({"chat": chat, "text": text, "extra": extra_value(&extra)}),
                sample_message(),
            )
        }

        async fn forward_message(
            &self,
            chat: ChatRef,
            from_chat: ChatRef,
            message_id: i64,
            extra: Option<ExtraParams>,
        ) -> Result<Message> {
            self.record(
                "forwardMessage",
                json!({
                    "chat": chat, "from_chat": from_chat,
                    "message_id": message_id, "extra": extra_value(&extra)
                }),
                sample_message(),
            )
        }

        async fn edit_message_text(
            &self,
            chat: ChatRef,
            message_id: i64,
            text: &str,
            extra: Option<ExtraParams>,
        ) -> Result<Message> {
            self.record(
                "editMessageText",
                json!({
                    "chat": chat, "message_id": message_id,
                    "text": text, "extra": extra_value(&extra)
                }),
                sample_message(),
            )
        }

        async fn delete_message(&self, chat: ChatRef, message_id: i64) -> Result<bool> {
            self.record(
                "deleteMessage",
                json!({"chat": chat, "message_id": message_id}),
                true,
            )
        }

        async fn copy_message(
            &self,
            chat: ChatRef,
            from_chat: ChatRef,
            message_id: i64,
            extra: Option<ExtraParams>,
        ) -> Result<MessageId> {
            self.record(
                "copyMessage",
                json!({
                    "chat": chat, "from_chat": from_chat,
                    "message_id": message_id, "extra": extra_value(&extra)
                }),
                MessageId { message_id: 101 },
            )
        }

        async fn pin_chat_message(
            &self,
            chat: ChatRef,
            message_id: i64,
            extra: Option<ExtraParams>,
        ) -> Result<bool> {
            self.record(
                "pinChatMessage",
                json!({"chat": chat, "message_id": message_id, "extra": extra_value(&extra)}),
                true,
            )
        }

        async fn unpin_chat_message(
            &self,
            chat: ChatRef,
            message_id: Option<i64>,
            extra: Option<ExtraParams>,
        ) -> Result<bool> {
            self.record(
                "unpinChatMessage",
                json!({"chat": chat, "message_id": message_id, "extra": extra_value(&extra)}),
                true,
            )
        }

        async fn unpin_all_chat_messages(&self, chat: ChatRef) -> Result<bool> {
            self.record("unpinAllChatMessages", json!({"chat": chat}), true)
        }

        async fn get_chat(&self, chat: ChatRef) -> Result<Chat> {
            self.record("getChat", json!({"chat": chat}), sample_chat())
        }

        async fn send_poll(&self, params: SendPollParams) -> Result<Message> {
            params.validate()?;
            let args = serde_json::to_value(&params)?;
            self.record("sendPoll", args, sample_message())
        }

        async fn send_contact(
            &self,
            chat: ChatRef,
            phone_number: &str,
            first_name: &str,
            extra: Option<ExtraParams>,
        ) -> Result<Message> {
            self.record(
                "sendContact",
                json!({
                    "chat": chat, "phone_number": phone_number,
                    "first_name": first_name, "extra": extra_value(&extra)
                }),
                sample_message(),
            )
        }

        async fn get_updates(&self, params: Option<GetUpdatesParams>) -> Result<Vec<Update>> {
            let args = match &params {
                Some(p) => serde_json::to_value(p).unwrap(),
                None => Value::Null,
            };
            self.record("getUpdates", args, vec![sample_update()])
        }
    }

    /// The single text block of a result, parsed back to JSON.
    pub(crate) fn result_payload(result: &ToolResult) -> Value {
        assert_eq!(result.content.len(), 1, "expected one content block");
        assert_eq!(result.content[0].kind, "text");
        serde_json::from_str(&result.content[0].text).expect("payload must be valid JSON")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use testing::result_payload;

    #[test]
    fn json_result_is_one_pretty_text_block() {
        let result = ToolResult::json(&serde_json::json!({"a": 1}));
        assert_eq!(result.content.len(), 1);
        assert_eq!(result.content[0].kind, "text");
        // pretty-printed, so multi-line
        assert!(result.content[0].text.contains('\n'));
        assert_eq!(result_payload(&result), serde_json::json!({"a": 1}));
    }

    #[test]
    fn error_result_carries_message_and_rfc3339_timestamp() {
        let result = ToolResult::error("something broke");
        let payload = result_payload(&result);
        assert_eq!(payload["error"], serde_json::json!("something broke"));
        let ts = payload["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn all_tools_have_unique_names() {
        let api = Arc::new(testing::RecordingApi::new());
        let tools = all_tools(api);
        let mut names: Vec<_> = tools.iter().map(|t| t.name()).collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(total, 10);
    }
}
