use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use tgmcp_core::{
    domain::{
        SendPollParams, POLL_MAX_OPTIONS, POLL_MIN_OPTIONS, POLL_OPEN_PERIOD_MAX,
        POLL_OPEN_PERIOD_MIN, POLL_OPTION_TEXT_MAX, POLL_QUESTION_MAX,
    },
    ports::BotApi,
};

use crate::schema::{ParamKind, ParamSchema};

use super::{Tool, ToolResult};

/// `sendPoll`: native poll in a chat. Arguments use the wire's snake_case
/// names and deserialize straight into [`SendPollParams`], so everything the
/// remote method accepts is expressible here.
pub struct SendPollTool {
    api: Arc<dyn BotApi>,
    schema: ParamSchema,
}

impl SendPollTool {
    pub fn new(api: Arc<dyn BotApi>) -> Self {
        let option_schema = ParamSchema::new()
            .required(
                "text",
                ParamKind::string_bounded(1, POLL_OPTION_TEXT_MAX),
                "Option text, 1-100 characters",
            )
            .optional(
                "text_parse_mode",
                ParamKind::string(),
                "Mode for parsing entities in the option text",
            )
            .optional(
                "text_entities",
                ParamKind::array(ParamKind::Any),
                "Special entities that appear in the option text",
            );

        let reply_parameters_schema = ParamSchema::new()
            .required(
                "message_id",
                ParamKind::integer(),
                "Identifier of the message to reply to",
            )
            .optional(
                "chat_id",
                ParamKind::ChatId,
                "Chat the message to reply to belongs to, if different from the target chat",
            )
            .optional(
                "allow_sending_without_reply",
                ParamKind::Boolean,
                "Pass True if the message should be sent even if the replied-to message is not found",
            )
            .optional("quote", ParamKind::string(), "Quoted part of the message to be replied to")
            .optional(
                "quote_parse_mode",
                ParamKind::string(),
                "Mode for parsing entities in the quote",
            )
            .optional(
                "quote_entities",
                ParamKind::array(ParamKind::Any),
                "Special entities that appear in the quote",
            )
            .optional(
                "quote_position",
                ParamKind::integer(),
                "Position of the quote in the original message",
            );

        Self {
            api,
            schema: ParamSchema::new()
                .required(
                    "chat_id",
                    ParamKind::ChatId,
                    "Unique identifier for the target chat or username of the target channel",
                )
                .required(
                    "question",
                    ParamKind::string_bounded(1, POLL_QUESTION_MAX),
                    "Poll question, 1-300 characters",
                )
                .required(
                    "options",
                    ParamKind::array_bounded(
                        ParamKind::Object(option_schema),
                        POLL_MIN_OPTIONS,
                        POLL_MAX_OPTIONS,
                    ),
                    "List of 2-10 answer options",
                )
                .optional(
                    "business_connection_id",
                    ParamKind::string(),
                    "Unique identifier of the business connection on behalf of which the message will be sent",
                )
                .optional(
                    "message_thread_id",
                    ParamKind::integer(),
                    "Unique identifier for the target message thread (topic) of the forum",
                )
                .optional(
                    "question_parse_mode",
                    ParamKind::string(),
                    "Mode for parsing entities in the question",
                )
                .optional(
                    "question_entities",
                    ParamKind::array(ParamKind::Any),
                    "Special entities that appear in the poll question",
                )
                .optional(
                    "is_anonymous",
                    ParamKind::Boolean,
                    "True if the poll needs to be anonymous, defaults to True",
                )
                .optional(
                    "type",
                    ParamKind::string_enum(&["quiz", "regular"]),
                    "Poll type, defaults to \"regular\"",
                )
                .optional(
                    "allows_multiple_answers",
                    ParamKind::Boolean,
                    "True if the poll allows multiple answers, ignored for quiz polls",
                )
                .optional(
                    "correct_option_id",
                    ParamKind::integer_bounded(0, (POLL_MAX_OPTIONS - 1) as i64),
                    "0-based identifier of the correct answer option, required for quiz polls",
                )
                .optional(
                    "explanation",
                    ParamKind::string_max(200),
                    "Text shown when a user chooses an incorrect answer, 0-200 characters",
                )
                .optional(
                    "explanation_parse_mode",
                    ParamKind::string(),
                    "Mode for parsing entities in the explanation",
                )
                .optional(
                    "explanation_entities",
                    ParamKind::array(ParamKind::Any),
                    "Special entities that appear in the explanation",
                )
                .optional(
                    "open_period",
                    ParamKind::integer_bounded(
                        POLL_OPEN_PERIOD_MIN as i64,
                        POLL_OPEN_PERIOD_MAX as i64,
                    ),
                    "Time in seconds the poll will be active, 5-600. Cannot be used with close_date",
                )
                .optional(
                    "close_date",
                    ParamKind::integer(),
                    "Unix timestamp when the poll will be closed. Cannot be used with open_period",
                )
                .optional(
                    "is_closed",
                    ParamKind::Boolean,
                    "Pass True if the poll needs to be immediately closed",
                )
                .optional(
                    "disable_notification",
                    ParamKind::Boolean,
                    "Sends the message silently",
                )
                .optional(
                    "protect_content",
                    ParamKind::Boolean,
                    "Protects the contents of the sent message from forwarding and saving",
                )
                .optional(
                    "allow_paid_broadcast",
                    ParamKind::Boolean,
                    "Pass True to allow up to 1000 messages per second for a fee",
                )
                .optional(
                    "message_effect_id",
                    ParamKind::string(),
                    "Unique identifier of the message effect to be added to the message",
                )
                .optional(
                    "reply_parameters",
                    ParamKind::Object(reply_parameters_schema),
                    "Description of the message to reply to",
                )
                .optional(
                    "reply_markup",
                    ParamKind::FreeForm,
                    "Additional interface options for the message",
                ),
        }
    }
}

#[async_trait]
impl Tool for SendPollTool {
    fn name(&self) -> &'static str {
        "sendPoll"
    }

    fn description(&self) -> &'static str {
        "Send a native poll to a chat"
    }

    fn schema(&self) -> &ParamSchema {
        &self.schema
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let params: SendPollParams = match serde_json::from_value(args) {
            Ok(p) => p,
            Err(e) => return ToolResult::error(e),
        };

        let question = params.question.clone();
        let chat = params.chat_id.clone();
        match self.api.send_poll(params).await {
            Ok(message) => ToolResult::json(&serde_json::json!({
                "success": true,
                "message": message,
                "info": format!("Poll \"{question}\" sent successfully to chat {chat}"),
            })),
            Err(e) => ToolResult::error(e),
        }
    }
}
