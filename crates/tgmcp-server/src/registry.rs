//! Tool registry: the lookup table between MCP method calls and tool
//! implementations. Arguments are validated against the tool's schema
//! before execution; a validation failure never reaches the tool.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, warn};

use tgmcp_core::{ports::BotApi, Error, Result};

use crate::tools::{all_tools, Tool, ToolResult};

pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    by_name: HashMap<&'static str, usize>,
}

impl ToolRegistry {
    /// Registry with the full built-in tool set.
    pub fn new(api: Arc<dyn BotApi>) -> Result<Self> {
        Self::with_tools(all_tools(api))
    }

    /// Registry over an explicit tool list. Fails on duplicate names, which
    /// would make dispatch ambiguous.
    pub fn with_tools(tools: Vec<Box<dyn Tool>>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(tools.len());
        for (i, tool) in tools.iter().enumerate() {
            if by_name.insert(tool.name(), i).is_some() {
                return Err(Error::Config(format!(
                    "duplicate tool name: {}",
                    tool.name()
                )));
            }
        }
        Ok(Self { tools, by_name })
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool descriptors for `tools/list`, in registration order.
    pub fn specs(&self) -> Vec<Value> {
        self.tools
            .iter()
            .map(|tool| {
                json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "inputSchema": tool.schema().to_json_schema(),
                })
            })
            .collect()
    }

    /// Validate and run a tool. `None` means no tool by that name; the
    /// caller turns that into a protocol-level error.
    pub async fn dispatch(&self, name: &str, args: Value) -> Option<ToolResult> {
        let tool = self.by_name.get(name).map(|&i| &self.tools[i])?;

        if let Err(reason) = tool.schema().validate(&args) {
            warn!(tool = name, %reason, "rejecting invalid tool arguments");
            return Some(ToolResult::error(format!(
                "invalid arguments for {name}: {reason}"
            )));
        }

        debug!(tool = name, "executing tool");
        Some(tool.execute(args).await)
    }
}
