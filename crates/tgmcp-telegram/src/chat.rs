use std::sync::Arc;

use serde_json::json;

use tgmcp_core::{
    domain::{Chat, ChatRef},
    Result,
};

use crate::{
    client::{ApiClient, CallOptions},
    messaging::chat_value,
};

/// Chat-area operations.
#[derive(Clone, Debug)]
pub(crate) struct ChatOps {
    client: Arc<ApiClient>,
}

impl ChatOps {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub(crate) async fn get_chat(&self, chat: ChatRef) -> Result<Chat> {
        self.client
            .call(
                "getChat",
                json!({"chat_id": chat_value(chat)}),
                CallOptions::default(),
            )
            .await
    }
}
