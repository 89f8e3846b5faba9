//! Value shapes for the Bot API subset this server speaks.
//!
//! Every optional field carries `skip_serializing_if` so absent values are
//! omitted from request bodies entirely, never sent as `null`. Response
//! shapes keep undocumented remote fields in a flattened `extra` map so
//! nothing Telegram returns is dropped when a tool re-serializes it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{errors::Error, Result};

/// Chat addressing: numeric id or `@channelusername`. Untagged so the
/// caller's original type survives serialization (a number stays a number).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatRef {
    Id(i64),
    Username(String),
}

impl From<i64> for ChatRef {
    fn from(id: i64) -> Self {
        ChatRef::Id(id)
    }
}

impl From<&str> for ChatRef {
    fn from(username: &str) -> Self {
        ChatRef::Username(username.to_string())
    }
}

impl std::fmt::Display for ChatRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatRef::Id(id) => write!(f, "{id}"),
            ChatRef::Username(u) => write!(f, "{u}"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    /// Bot-info flags (`can_join_groups`, …) and anything newer than this
    /// struct ride along here.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// `getChat` returns the full chat-info object; everything beyond the
    /// common fields is preserved here.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub date: i64,
    pub chat: Chat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll: Option<Poll>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Bare message-id result (`copyMessage`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageId {
    pub message_id: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Contact {
    pub phone_number: String,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vcard: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Poll {
    pub id: String,
    pub question: String,
    pub options: Vec<PollOption>,
    pub total_voter_count: i64,
    pub is_closed: bool,
    pub is_anonymous: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub allows_multiple_answers: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PollOption {
    pub text: String,
    pub voter_count: i64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One answer option when creating a poll.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputPollOption {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_parse_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_entities: Option<Vec<Value>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplyParameters {
    pub message_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<ChatRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_sending_without_reply: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_parse_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_entities: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_position: Option<i64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_message: Option<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_post: Option<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_channel_post: Option<Message>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Long-polling parameters for `getUpdates`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GetUpdatesParams {
    /// Identifier of the first update to be returned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// 1-100, remote default 100.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Long-poll window in seconds; 0 means short polling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_updates: Option<Vec<String>>,
}

pub const POLL_QUESTION_MAX: usize = 300;
pub const POLL_EXPLANATION_MAX: usize = 200;
pub const POLL_OPTION_TEXT_MAX: usize = 100;
pub const POLL_MIN_OPTIONS: usize = 2;
pub const POLL_MAX_OPTIONS: usize = 10;
pub const POLL_OPEN_PERIOD_MIN: u64 = 5;
pub const POLL_OPEN_PERIOD_MAX: u64 = 600;

/// `sendPoll` parameters. Serialized as-is; `validate()` runs before any
/// network call so invalid polls are rejected locally.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SendPollParams {
    pub chat_id: ChatRef,
    pub question: String,
    pub options: Vec<InputPollOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_connection_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_thread_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_parse_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_entities: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_anonymous: Option<bool>,
    /// "quiz" or "regular"; remote default "regular".
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allows_multiple_answers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_option_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation_parse_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation_entities: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_period: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_date: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_closed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_notification: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protect_content: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_paid_broadcast: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_effect_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_parameters: Option<ReplyParameters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<Value>,
}

impl SendPollParams {
    pub fn new(chat_id: impl Into<ChatRef>, question: impl Into<String>, options: Vec<InputPollOption>) -> Self {
        Self {
            chat_id: chat_id.into(),
            question: question.into(),
            options,
            business_connection_id: None,
            message_thread_id: None,
            question_parse_mode: None,
            question_entities: None,
            is_anonymous: None,
            kind: None,
            allows_multiple_answers: None,
            correct_option_id: None,
            explanation: None,
            explanation_parse_mode: None,
            explanation_entities: None,
            open_period: None,
            close_date: None,
            is_closed: None,
            disable_notification: None,
            protect_content: None,
            allow_paid_broadcast: None,
            message_effect_id: None,
            reply_parameters: None,
            reply_markup: None,
        }
    }

    /// Local enforcement of the documented poll invariants. Telegram would
    /// reject these too, but failing here avoids spending a round trip on a
    /// request that cannot succeed.
    pub fn validate(&self) -> Result<()> {
        let question_len = self.question.chars().count();
        if question_len == 0 || question_len > POLL_QUESTION_MAX {
            return Err(Error::Validation(format!(
                "poll question must be 1-{POLL_QUESTION_MAX} characters, got {question_len}"
            )));
        }

        if self.options.len() < POLL_MIN_OPTIONS || self.options.len() > POLL_MAX_OPTIONS {
            return Err(Error::Validation(format!(
                "poll must have {POLL_MIN_OPTIONS}-{POLL_MAX_OPTIONS} options, got {}",
                self.options.len()
            )));
        }

        for (i, opt) in self.options.iter().enumerate() {
            let len = opt.text.chars().count();
            if len == 0 || len > POLL_OPTION_TEXT_MAX {
                return Err(Error::Validation(format!(
                    "poll option {i} text must be 1-{POLL_OPTION_TEXT_MAX} characters, got {len}"
                )));
            }
        }

        if let Some(explanation) = &self.explanation {
            let len = explanation.chars().count();
            if len > POLL_EXPLANATION_MAX {
                return Err(Error::Validation(format!(
                    "poll explanation must be at most {POLL_EXPLANATION_MAX} characters, got {len}"
                )));
            }
        }

        if let Some(period) = self.open_period {
            if !(POLL_OPEN_PERIOD_MIN..=POLL_OPEN_PERIOD_MAX).contains(&period) {
                return Err(Error::Validation(format!(
                    "open_period must be {POLL_OPEN_PERIOD_MIN}-{POLL_OPEN_PERIOD_MAX} seconds, got {period}"
                )));
            }
            if self.close_date.is_some() {
                return Err(Error::Validation(
                    "open_period and close_date cannot be used together".to_string(),
                ));
            }
        }

        if self.kind.as_deref() == Some("quiz") && self.correct_option_id.is_none() {
            return Err(Error::Validation(
                "quiz polls require correct_option_id".to_string(),
            ));
        }

        Ok(())
    }
}
