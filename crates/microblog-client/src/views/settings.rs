use microblog_common::models::UserUpdate;
use microblog_common::validation::MAX_DESCRIPTION_LENGTH;

use crate::navigation::{Navigator, Route};
use crate::services::UsersService;
use crate::session::SessionStore;

const SAVE_FAILED: &str = "Failed to update settings. Please try again.";
const DELETE_FAILED: &str = "Failed to delete account. Please try again.";
const SAVED: &str = "Settings updated successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteStep {
    /// First press: the confirmation is now showing.
    Armed,
    /// Account gone, session cleared, back on the feed.
    Deleted,
    Failed,
}

/// Profile description, password change and account deletion.
pub struct SettingsView {
    users: UsersService,
    pub description: String,
    pub password: String,
    pub password_confirmation: String,
    saving: bool,
    delete_armed: bool,
    error: Option<String>,
    success: Option<String>,
}

impl SettingsView {
    /// Start from the signed-in user's current description.
    pub fn new(users: UsersService, session: &SessionStore) -> Self {
        let description = session
            .current_user()
            .and_then(|u| u.description)
            .unwrap_or_default();
        Self {
            users,
            description,
            password: String::new(),
            password_confirmation: String::new(),
            saving: false,
            delete_armed: false,
            error: None,
            success: None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn is_delete_armed(&self) -> bool {
        self.delete_armed
    }

    pub fn description_counter(&self) -> String {
        format!("{}/{MAX_DESCRIPTION_LENGTH} characters", self.description.chars().count())
    }

    fn update(&self) -> UserUpdate {
        let mut update = UserUpdate { description: Some(self.description.trim().to_owned()), ..Default::default() };
        if !self.password.is_empty() {
            update.password = Some(self.password.clone());
            update.password_confirmation = Some(self.password_confirmation.clone());
        }
        update
    }

    /// Save the form. The session's user is replaced with the server's copy on success.
    pub async fn save(&mut self, session: &SessionStore) -> bool {
        self.error = None;
        self.success = None;
        let Some(user) = session.current_user() else {
            self.error = Some("You must be logged in".to_owned());
            return false;
        };

        self.saving = true;
        let result = self.users.update(user.id, &self.update()).await;
        self.saving = false;

        match result {
            Ok(updated) => {
                tracing::info!(user_id = updated.id, "settings saved");
                self.description = updated.description.clone().unwrap_or_default();
                session.set_user(updated);
                self.password.clear();
                self.password_confirmation.clear();
                self.success = Some(SAVED.to_owned());
                true
            }
            Err(e) => {
                tracing::warn!("settings save failed: {e}");
                self.error = Some(e.user_message(SAVE_FAILED));
                false
            }
        }
    }

    /// Two-step delete: the first call arms, the second deletes.
    pub async fn delete_account(&mut self, session: &SessionStore, navigator: &dyn Navigator) -> DeleteStep {
        if !self.delete_armed {
            self.delete_armed = true;
            return DeleteStep::Armed;
        }
        self.error = None;
        let Some(user) = session.current_user() else {
            self.delete_armed = false;
            self.error = Some("You must be logged in".to_owned());
            return DeleteStep::Failed;
        };

        match self.users.delete(user.id).await {
            Ok(_) => {
                tracing::info!(user_id = user.id, "account deleted");
                session.clear_local();
                navigator.navigate(Route::Feed);
                DeleteStep::Deleted
            }
            Err(e) => {
                tracing::warn!(user_id = user.id, "account delete failed: {e}");
                self.delete_armed = false;
                self.error = Some(e.user_message(DELETE_FAILED));
                DeleteStep::Failed
            }
        }
    }

    pub fn cancel_delete(&mut self) {
        self.delete_armed = false;
    }
}
