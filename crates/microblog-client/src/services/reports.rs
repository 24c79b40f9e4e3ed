//! Moderation reports.

use super::MessageResponse;
use crate::error::Result;
use crate::http::ApiClient;

#[derive(Clone)]
pub struct ReportsService {
    api: ApiClient,
}

impl ReportsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Report a post. The server allows one report per user and post; no client-side dedup.
    pub async fn report_post(&self, post_id: i64) -> Result<String> {
        let resp: Option<MessageResponse> =
            self.api.post_empty(&format!("/posts/{post_id}/report")).await?;
        Ok(resp.unwrap_or_default().message)
    }
}
