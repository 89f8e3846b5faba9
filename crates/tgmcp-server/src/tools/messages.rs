use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use tgmcp_core::{
    domain::ChatRef,
    ports::{BotApi, ExtraParams},
    utils::iso_timestamp_utc,
};

use crate::schema::{ParamKind, ParamSchema};

use super::{Tool, ToolResult};

fn object_as_extra(value: &impl Serialize) -> Option<ExtraParams> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) if !map.is_empty() => Some(map),
        _ => None,
    }
}

// ---------------- send_message ----------------

/// `send_message`: text message to a chat, with a pass-through bag for any
/// `sendMessage` parameter this server does not model.
pub struct SendMessageTool {
    api: Arc<dyn BotApi>,
    schema: ParamSchema,
}

impl SendMessageTool {
    pub fn new(api: Arc<dyn BotApi>) -> Self {
        Self {
            api,
            schema: ParamSchema::new()
                .required(
                    "chatId",
                    ParamKind::ChatId,
                    "Unique identifier for the target chat",
                )
                .required("text", ParamKind::string(), "Text of the message to be sent")
                .optional(
                    "params",
                    ParamKind::FreeForm,
                    "Additional parameters for the message",
                ),
        }
    }
}

#[derive(Deserialize)]
struct SendMessageArgs {
    #[serde(rename = "chatId")]
    chat_id: ChatRef,
    text: String,
    #[serde(default)]
    params: Option<ExtraParams>,
}

#[async_trait]
impl Tool for SendMessageTool {
    fn name(&self) -> &'static str {
        "send_message"
    }

    fn description(&self) -> &'static str {
        "Send a message to a chat"
    }

    fn schema(&self) -> &ParamSchema {
        &self.schema
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let args: SendMessageArgs = match serde_json::from_value(args) {
            Ok(v) => v,
            Err(e) => return ToolResult::error(e),
        };

        match self
            .api
            .send_message(args.chat_id, &args.text, args.params)
            .await
        {
            Ok(message) => ToolResult::json(&message),
            Err(e) => ToolResult::error(e),
        }
    }
}

// ---------------- forward_message ----------------

/// `forward_message`: forward an existing message between chats.
pub struct ForwardMessageTool {
    api: Arc<dyn BotApi>,
    schema: ParamSchema,
}

impl ForwardMessageTool {
    pub fn new(api: Arc<dyn BotApi>) -> Self {
        let params_schema = ParamSchema::new()
            .optional(
                "message_thread_id",
                ParamKind::integer(),
                "Unique identifier for the target message thread (topic) of the forum",
            )
            .optional(
                "video_start_timestamp",
                ParamKind::Number,
                "New start timestamp for the forwarded video in the message",
            )
            .optional(
                "disable_notification",
                ParamKind::Boolean,
                "Sends the message silently",
            )
            .optional(
                "protect_content",
                ParamKind::Boolean,
                "Protects the contents of the forwarded message from forwarding and saving",
            );

        Self {
            api,
            schema: ParamSchema::new()
                .required(
                    "chatId",
                    ParamKind::ChatId,
                    "Unique identifier for the target chat or username of the target channel",
                )
                .required(
                    "fromChatId",
                    ParamKind::ChatId,
                    "Unique identifier for the chat where the original message was sent",
                )
                .required(
                    "messageId",
                    ParamKind::integer(),
                    "Message identifier in the chat specified in from_chat_id",
                )
                .optional(
                    "params",
                    ParamKind::Object(params_schema),
                    "Additional parameters for the forward",
                ),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ForwardParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    message_thread_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    video_start_timestamp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disable_notification: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    protect_content: Option<bool>,
}

#[derive(Deserialize)]
struct ForwardMessageArgs {
    #[serde(rename = "chatId")]
    chat_id: ChatRef,
    #[serde(rename = "fromChatId")]
    from_chat_id: ChatRef,
    #[serde(rename = "messageId")]
    message_id: i64,
    #[serde(default)]
    params: Option<ForwardParams>,
}

#[async_trait]
impl Tool for ForwardMessageTool {
    fn name(&self) -> &'static str {
        "forward_message"
    }

    fn description(&self) -> &'static str {
        "Forward messages of any kind"
    }

    fn schema(&self) -> &ParamSchema {
        &self.schema
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let args: ForwardMessageArgs = match serde_json::from_value(args) {
            Ok(v) => v,
            Err(e) => return ToolResult::error(e),
        };

        let extra = args.params.as_ref().and_then(object_as_extra);
        match self
            .api
            .forward_message(args.chat_id, args.from_chat_id, args.message_id, extra)
            .await
        {
            Ok(message) => ToolResult::json(&message),
            Err(e) => ToolResult::error(e),
        }
    }
}

// ---------------- pin_chat_message ----------------

/// `pin_chat_message`: add a message to the chat's pinned list.
pub struct PinChatMessageTool {
    api: Arc<dyn BotApi>,
    schema: ParamSchema,
}

impl PinChatMessageTool {
    pub fn new(api: Arc<dyn BotApi>) -> Self {
        Self {
            api,
            schema: ParamSchema::new()
                .required(
                    "chatId",
                    ParamKind::ChatId,
                    "Unique identifier for the target chat or username of the target channel",
                )
                .required(
                    "messageId",
                    ParamKind::integer(),
                    "Identifier of a message to pin",
                )
                .optional(
                    "businessConnectionId",
                    ParamKind::string(),
                    "Unique identifier of the business connection on behalf of which the message will be pinned",
                )
                .optional(
                    "disableNotification",
                    ParamKind::Boolean,
                    "Pass True if it is not necessary to send a notification to all chat members about the new pinned message",
                ),
        }
    }
}

#[derive(Deserialize)]
struct PinChatMessageArgs {
    #[serde(rename = "chatId")]
    chat_id: ChatRef,
    #[serde(rename = "messageId")]
    message_id: i64,
    #[serde(rename = "businessConnectionId", default)]
    business_connection_id: Option<String>,
    #[serde(rename = "disableNotification", default)]
    disable_notification: Option<bool>,
}

#[async_trait]
impl Tool for PinChatMessageTool {
    fn name(&self) -> &'static str {
        "pin_chat_message"
    }

    fn description(&self) -> &'static str {
        "Pin a message in a chat. Returns True on success."
    }

    fn schema(&self) -> &ParamSchema {
        &self.schema
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let args: PinChatMessageArgs = match serde_json::from_value(args) {
            Ok(v) => v,
            Err(e) => return ToolResult::error(e),
        };

        let mut extra = ExtraParams::new();
        if let Some(id) = &args.business_connection_id {
            extra.insert("business_connection_id".to_string(), json!(id));
        }
        if let Some(flag) = args.disable_notification {
            extra.insert("disable_notification".to_string(), json!(flag));
        }
        let extra = if extra.is_empty() { None } else { Some(extra) };

        match self
            .api
            .pin_chat_message(args.chat_id.clone(), args.message_id, extra)
            .await
        {
            Ok(success) => ToolResult::json(&json!({
                "success": success,
                "chatId": args.chat_id,
                "messageId": args.message_id,
                "timestamp": iso_timestamp_utc(),
            })),
            Err(e) => ToolResult::error(e),
        }
    }
}

// ---------------- unpin_chat_message ----------------

/// `unpin_chat_message`: remove one pinned message; without a message id
/// the remote unpins the most recent one.
pub struct UnpinChatMessageTool {
    api: Arc<dyn BotApi>,
    schema: ParamSchema,
}

impl UnpinChatMessageTool {
    pub fn new(api: Arc<dyn BotApi>) -> Self {
        Self {
            api,
            schema: ParamSchema::new()
                .required(
                    "chatId",
                    ParamKind::ChatId,
                    "Unique identifier for the target chat or username of the target channel",
                )
                .optional(
                    "messageId",
                    ParamKind::integer(),
                    "Identifier of the message to unpin. If not specified, the most recent pinned message will be unpinned",
                )
                .optional(
                    "businessConnectionId",
                    ParamKind::string(),
                    "Unique identifier of the business connection on behalf of which the message will be unpinned",
                ),
        }
    }
}

#[derive(Deserialize)]
struct UnpinChatMessageArgs {
    #[serde(rename = "chatId")]
    chat_id: ChatRef,
    #[serde(rename = "messageId", default)]
    message_id: Option<i64>,
    #[serde(rename = "businessConnectionId", default)]
    business_connection_id: Option<String>,
}

#[async_trait]
impl Tool for UnpinChatMessageTool {
    fn name(&self) -> &'static str {
        "unpin_chat_message"
    }

    fn description(&self) -> &'static str {
        "Unpin a message in a chat. If no message ID is specified, unpins the most recent pinned message. Returns True on success."
    }

    fn schema(&self) -> &ParamSchema {
        &self.schema
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let args: UnpinChatMessageArgs = match serde_json::from_value(args) {
            Ok(v) => v,
            Err(e) => return ToolResult::error(e),
        };

        let mut extra = ExtraParams::new();
        if let Some(id) = &args.business_connection_id {
            extra.insert("business_connection_id".to_string(), json!(id));
        }
        let extra = if extra.is_empty() { None } else { Some(extra) };

        match self
            .api
            .unpin_chat_message(args.chat_id.clone(), args.message_id, extra)
            .await
        {
            Ok(success) => {
                let message_id = match args.message_id {
                    Some(id) => json!(id),
                    None => json!("most recent pinned message"),
                };
                ToolResult::json(&json!({
                    "success": success,
                    "chatId": args.chat_id,
                    "messageId": message_id,
                    "timestamp": iso_timestamp_utc(),
                }))
            }
            Err(e) => ToolResult::error(e),
        }
    }
}

// ---------------- unpin_all_chat_messages ----------------

/// `unpin_all_chat_messages`: clear the whole pinned list.
pub struct UnpinAllChatMessagesTool {
    api: Arc<dyn BotApi>,
    schema: ParamSchema,
}

impl UnpinAllChatMessagesTool {
    pub fn new(api: Arc<dyn BotApi>) -> Self {
        Self {
            api,
            schema: ParamSchema::new().required(
                "chatId",
                ParamKind::ChatId,
                "Unique identifier for the target chat or username of the target channel",
            ),
        }
    }
}

#[derive(Deserialize)]
struct UnpinAllChatMessagesArgs {
    #[serde(rename = "chatId")]
    chat_id: ChatRef,
}

#[async_trait]
impl Tool for UnpinAllChatMessagesTool {
    fn name(&self) -> &'static str {
        "unpin_all_chat_messages"
    }

    fn description(&self) -> &'static str {
        "Clear the list of pinned messages in a chat. Returns True on success."
    }

    fn schema(&self) -> &ParamSchema {
        &self.schema
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let args: UnpinAllChatMessagesArgs = match serde_json::from_value(args) {
            Ok(v) => v,
            Err(e) => return ToolResult::error(e),
        };

        match self.api.unpin_all_chat_messages(args.chat_id.clone()).await {
            Ok(success) => ToolResult::json(&json!({
                "success": success,
                "chatId": args.chat_id,
                "action": "unpinned all messages",
                "timestamp": iso_timestamp_utc(),
            })),
            Err(e) => ToolResult::error(e),
        }
    }
}

// ---------------- send_contact ----------------

/// `send_contact`: share a phone contact.
pub struct SendContactTool {
    api: Arc<dyn BotApi>,
    schema: ParamSchema,
}

impl SendContactTool {
    pub fn new(api: Arc<dyn BotApi>) -> Self {
        Self {
            api,
            schema: ParamSchema::new()
                .required(
                    "chatId",
                    ParamKind::ChatId,
                    "Unique identifier for the target chat or username of the target channel",
                )
                .required(
                    "phoneNumber",
                    ParamKind::string(),
                    "Contact's phone number",
                )
                .required("firstName", ParamKind::string(), "Contact's first name")
                .optional("lastName", ParamKind::string(), "Contact's last name")
                .optional(
                    "vcard",
                    ParamKind::string_max(2048),
                    "Additional data about the contact in the form of a vCard, 0-2048 bytes",
                )
                .optional(
                    "businessConnectionId",
                    ParamKind::string(),
                    "Unique identifier of the business connection on behalf of which the message will be sent",
                )
                .optional(
                    "messageThreadId",
                    ParamKind::integer(),
                    "Unique identifier for the target message thread (topic) of the forum; for forum supergroups only",
                )
                .optional(
                    "disableNotification",
                    ParamKind::Boolean,
                    "Sends the message silently. Users will receive a notification with no sound",
                )
                .optional(
                    "protectContent",
                    ParamKind::Boolean,
                    "Protects the contents of the sent message from forwarding and saving",
                )
                .optional(
                    "messageEffectId",
                    ParamKind::string(),
                    "Unique identifier of the message effect to be added to the message; for private chats only",
                )
                .optional(
                    "replyParameters",
                    ParamKind::FreeForm,
                    "Description of the message to reply to",
                )
                .optional(
                    "replyMarkup",
                    ParamKind::FreeForm,
                    "Additional interface options: inline keyboard, custom reply keyboard, or reply removal instructions",
                ),
        }
    }
}

#[derive(Deserialize)]
struct SendContactArgs {
    #[serde(rename = "chatId")]
    chat_id: ChatRef,
    #[serde(rename = "phoneNumber")]
    phone_number: String,
    #[serde(rename = "firstName")]
    first_name: String,
    #[serde(rename = "lastName", default)]
    last_name: Option<String>,
    #[serde(default)]
    vcard: Option<String>,
    #[serde(rename = "businessConnectionId", default)]
    business_connection_id: Option<String>,
    #[serde(rename = "messageThreadId", default)]
    message_thread_id: Option<i64>,
    #[serde(rename = "disableNotification", default)]
    disable_notification: Option<bool>,
    #[serde(rename = "protectContent", default)]
    protect_content: Option<bool>,
    #[serde(rename = "messageEffectId", default)]
    message_effect_id: Option<String>,
    #[serde(rename = "replyParameters", default)]
    reply_parameters: Option<Value>,
    #[serde(rename = "replyMarkup", default)]
    reply_markup: Option<Value>,
}

impl SendContactArgs {
    /// Camel-case tool arguments become wire-named extras; absent fields
    /// stay absent.
    fn extra(&self) -> Option<ExtraParams> {
        let mut extra = ExtraParams::new();
        if let Some(v) = &self.last_name {
            extra.insert("last_name".to_string(), json!(v));
        }
        if let Some(v) = &self.vcard {
            extra.insert("vcard".to_string(), json!(v));
        }
        if let Some(v) = &self.business_connection_id {
            extra.insert("business_connection_id".to_string(), json!(v));
        }
        if let Some(v) = self.message_thread_id {
            extra.insert("message_thread_id".to_string(), json!(v));
        }
        if let Some(v) = self.disable_notification {
            extra.insert("disable_notification".to_string(), json!(v));
        }
        if let Some(v) = self.protect_content {
            extra.insert("protect_content".to_string(), json!(v));
        }
        if let Some(v) = &self.message_effect_id {
            extra.insert("message_effect_id".to_string(), json!(v));
        }
        if let Some(v) = &self.reply_parameters {
            extra.insert("reply_parameters".to_string(), v.clone());
        }
        if let Some(v) = &self.reply_markup {
            extra.insert("reply_markup".to_string(), v.clone());
        }
        if extra.is_empty() {
            None
        } else {
            Some(extra)
        }
    }
}

#[async_trait]
impl Tool for SendContactTool {
    fn name(&self) -> &'static str {
        "send_contact"
    }

    fn description(&self) -> &'static str {
        "Send phone contacts to a chat"
    }

    fn schema(&self) -> &ParamSchema {
        &self.schema
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let args: SendContactArgs = match serde_json::from_value(args) {
            Ok(v) => v,
            Err(e) => return ToolResult::error(e),
        };

        let extra = args.extra();
        match self
            .api
            .send_contact(args.chat_id, &args.phone_number, &args.first_name, extra)
            .await
        {
            Ok(message) => ToolResult::json(&message),
            Err(e) => ToolResult::error(e),
        }
    }
}
