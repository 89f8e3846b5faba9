use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use tgmcp_core::{domain::GetUpdatesParams, ports::BotApi};

use crate::schema::{ParamKind, ParamSchema};

use super::{Tool, ToolResult};

/// `get_updates`: long-poll for pending updates. The offset cursor stays
/// with the caller.
pub struct GetUpdatesTool {
    api: Arc<dyn BotApi>,
    schema: ParamSchema,
}

impl GetUpdatesTool {
    pub fn new(api: Arc<dyn BotApi>) -> Self {
        let params_schema = ParamSchema::new()
            .optional(
                "offset",
                ParamKind::integer(),
                "Identifier of the first update to be returned",
            )
            .optional(
                "limit",
                ParamKind::integer_bounded(1, 100),
                "Limits the number of updates to be retrieved (1-100)",
            )
            .optional(
                "timeout",
                ParamKind::integer(),
                "Timeout in seconds for long polling",
            )
            .optional(
                "allowed_updates",
                ParamKind::array(ParamKind::string()),
                "Array of update types to receive",
            );

        Self {
            api,
            schema: ParamSchema::new().optional(
                "params",
                ParamKind::Object(params_schema),
                "Optional parameters for the getUpdates method",
            ),
        }
    }
}

#[derive(Default, Deserialize)]
struct GetUpdatesArgs {
    #[serde(default)]
    params: Option<GetUpdatesParams>,
}

#[async_trait]
impl Tool for GetUpdatesTool {
    fn name(&self) -> &'static str {
        "get_updates"
    }

    fn description(&self) -> &'static str {
        "Get updates from the bot"
    }

    fn schema(&self) -> &ParamSchema {
        &self.schema
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let args: GetUpdatesArgs = match args {
            Value::Null => GetUpdatesArgs::default(),
            other => match serde_json::from_value(other) {
                Ok(v) => v,
                Err(e) => return ToolResult::error(e),
            },
        };

        match self.api.get_updates(args.params).await {
            Ok(updates) => ToolResult::json(&updates),
            Err(e) => ToolResult::error(e),
        }
    }
}
