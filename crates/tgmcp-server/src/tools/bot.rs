use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use tgmcp_core::ports::BotApi;

use crate::schema::ParamSchema;

use super::{Tool, ToolResult};

/// `get_bot_info`: bot identity via `getMe`. Takes no arguments.
pub struct GetBotInfoTool {
    api: Arc<dyn BotApi>,
    schema: ParamSchema,
}

impl GetBotInfoTool {
    pub fn new(api: Arc<dyn BotApi>) -> Self {
        Self {
            api,
            schema: ParamSchema::new(),
        }
    }
}

#[async_trait]
impl Tool for GetBotInfoTool {
    fn name(&self) -> &'static str {
        "get_bot_info"
    }

    fn description(&self) -> &'static str {
        "Get information about the bot"
    }

    fn schema(&self) -> &ParamSchema {
        &self.schema
    }

    async fn execute(&self, _args: Value) -> ToolResult {
        match self.api.get_me().await {
            Ok(user) => ToolResult::json(&user),
            Err(e) => ToolResult::error(e),
        }
    }
}
