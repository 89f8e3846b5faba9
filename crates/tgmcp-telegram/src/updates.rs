use std::{sync::Arc, time::Duration};

use serde_json::json;

use tgmcp_core::{
    domain::{GetUpdatesParams, Update},
    Result,
};

use crate::client::{ApiClient, CallOptions};

/// Update-area operations (long polling). The offset cursor is owned by the
/// external loop driving these calls, not by this adapter.
#[derive(Clone, Debug)]
pub(crate) struct UpdateOps {
    client: Arc<ApiClient>,
    long_poll_grace: Duration,
}

impl UpdateOps {
    pub(crate) fn new(client: Arc<ApiClient>, long_poll_grace: Duration) -> Self {
        Self {
            client,
            long_poll_grace,
        }
    }

    pub(crate) async fn get_updates(
        &self,
        params: Option<GetUpdatesParams>,
    ) -> Result<Vec<Update>> {
        let opts = poll_call_options(params.as_ref(), self.long_poll_grace);
        let body = match &params {
            Some(p) => serde_json::to_value(p)?,
            None => json!({}),
        };
        self.client.call("getUpdates", body, opts).await
    }
}

/// A long poll must not be cut short by our own HTTP deadline: when the
/// caller sets a poll `timeout`, the request timeout becomes poll + grace.
fn poll_call_options(params: Option<&GetUpdatesParams>, grace: Duration) -> CallOptions {
    let poll_secs = params.and_then(|p| p.timeout);
    CallOptions {
        timeout: poll_secs.map(|secs| Duration::from_secs(secs) + grace),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_poll_uses_client_default_timeout() {
        let opts = poll_call_options(None, Duration::from_secs(10));
        assert!(opts.timeout.is_none());

        let params = GetUpdatesParams::default();
        let opts = poll_call_options(Some(&params), Duration::from_secs(10));
        assert!(opts.timeout.is_none());
    }

    #[test]
    fn long_poll_timeout_gets_the_grace_window() {
        let params = GetUpdatesParams {
            timeout: Some(30),
            ..Default::default()
        };
        let opts = poll_call_options(Some(&params), Duration::from_secs(10));
        assert_eq!(opts.timeout, Some(Duration::from_secs(40)));
    }
}
