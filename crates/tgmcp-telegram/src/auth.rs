use std::sync::Arc;

use serde_json::json;

use tgmcp_core::{domain::User, Result};

use crate::client::{ApiClient, CallOptions};

/// Identity operations.
#[derive(Clone, Debug)]
pub(crate) struct AuthOps {
    client: Arc<ApiClient>,
}

impl AuthOps {
    pub(crate) fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub(crate) async fn get_me(&self) -> Result<User> {
        self.client
            .call("getMe", json!({}), CallOptions::default())
            .await
    }
}
