use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use tgmcp_core::{domain::ChatRef, ports::BotApi};

use crate::schema::{ParamKind, ParamSchema};

use super::{Tool, ToolResult};

/// `getChat`: full chat information wrapped in `{success, data}`.
pub struct GetChatTool {
    api: Arc<dyn BotApi>,
    schema: ParamSchema,
}

impl GetChatTool {
    pub fn new(api: Arc<dyn BotApi>) -> Self {
        Self {
            api,
            schema: ParamSchema::new().required(
                "chat_id",
                ParamKind::ChatId,
                "Unique identifier for the target chat or username of the target supergroup or channel (in the format @channelusername)",
            ),
        }
    }
}

#[derive(Deserialize)]
struct GetChatArgs {
    chat_id: ChatRef,
}

#[async_trait]
impl Tool for GetChatTool {
    fn name(&self) -> &'static str {
        "getChat"
    }

    fn description(&self) -> &'static str {
        "Get up-to-date information about the chat. Returns detailed chat information including settings, permissions, and metadata."
    }

    fn schema(&self) -> &ParamSchema {
        &self.schema
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let args: GetChatArgs = match serde_json::from_value(args) {
            Ok(v) => v,
            Err(e) => return ToolResult::error(e),
        };

        match self.api.get_chat(args.chat_id).await {
            Ok(chat) => ToolResult::json(&json!({"success": true, "data": chat})),
            Err(e) => ToolResult::error(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{result_payload, RecordingApi};

    #[tokio::test]
    async fn numeric_and_username_chat_ids_keep_their_type() {
        let api = Arc::new(RecordingApi::new());
        let tool = GetChatTool::new(api.clone());

        tool.execute(json!({"chat_id": 123456789})).await;
        tool.execute(json!({"chat_id": "@testchat"})).await;

        let calls = api.recorded();
        assert_eq!(calls[0].1["chat"], json!(123456789));
        assert_eq!(calls[1].1["chat"], json!("@testchat"));
    }

    #[tokio::test]
    async fn wraps_chat_in_success_envelope() {
        let api = Arc::new(RecordingApi::new());
        let tool = GetChatTool::new(api);

        let result = tool.execute(json!({"chat_id": 7})).await;
        let payload = result_payload(&result);
        assert_eq!(payload["success"], json!(true));
        assert_eq!(payload["data"]["id"], json!(7));
    }

    #[tokio::test]
    async fn remote_failure_surfaces_description() {
        let api = Arc::new(RecordingApi::failing("Chat not found"));
        let tool = GetChatTool::new(api);

        let result = tool.execute(json!({"chat_id": 1})).await;
        let payload = result_payload(&result);
        assert!(payload["error"]
            .as_str()
            .unwrap()
            .contains("Chat not found"));
    }
}
