use crate::services::ReportsService;

const REPORT_FAILED: &str = "Failed to report post. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReportState {
    #[default]
    Idle,
    Submitting,
    /// Server acknowledged; carries its message.
    Submitted(String),
    Failed(String),
}

/// Confirm-then-send dialog for reporting one post.
#[derive(Debug)]
pub struct ReportDialog {
    post_id: i64,
    state: ReportState,
}

impl ReportDialog {
    pub fn new(post_id: i64) -> Self {
        Self { post_id, state: ReportState::Idle }
    }

    pub fn post_id(&self) -> i64 {
        self.post_id
    }

    pub fn state(&self) -> &ReportState {
        &self.state
    }

    pub fn prompt(&self) -> &'static str {
        "Report this post as inappropriate? Moderators will review it."
    }

    /// Send the report. A dialog reports at most once; repeated calls are ignored.
    pub async fn submit(&mut self, reports: &ReportsService) -> bool {
        if matches!(self.state, ReportState::Submitting | ReportState::Submitted(_)) {
            return false;
        }
        self.state = ReportState::Submitting;
        self.state = match reports.report_post(self.post_id).await {
            Ok(message) => {
                tracing::info!(post_id = self.post_id, "post reported");
                ReportState::Submitted(message)
            }
            Err(e) => {
                tracing::warn!(post_id = self.post_id, "report failed: {e}");
                ReportState::Failed(e.user_message(REPORT_FAILED))
            }
        };
        matches!(self.state, ReportState::Submitted(_))
    }
}
