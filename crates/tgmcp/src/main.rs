use std::sync::Arc;

use tracing::info;

use tgmcp_core::config::Config;
use tgmcp_server::{McpServer, ToolRegistry};
use tgmcp_telegram::TelegramBot;

#[tokio::main]
async fn main() -> Result<(), tgmcp_core::Error> {
    tgmcp_core::logging::init("tgmcp");

    let cfg = Config::load()?;
    let bot = Arc::new(TelegramBot::from_config(&cfg)?);

    let registry = ToolRegistry::new(bot)?;
    info!(tools = registry.len(), "starting Telegram MCP server");

    McpServer::new(registry).run_stdio().await
}
