use std::sync::Arc;

use chrono::FixedOffset;
use tracing::{error, info, instrument, warn};

use crate::{
    app_error::AppResult,
    application::{
        notifier::WaitlistNotifier,
        templates::{self, AdminDashboardContext},
        use_cases::signup::WaitlistRepo,
    },
    domain::entities::waitlist_entry::{LaunchReport, WaitlistEntry},
};

#[derive(Clone)]
pub struct AdminUseCases {
    repo: Arc<dyn WaitlistRepo>,
    notifier: WaitlistNotifier,
    display_zone: FixedOffset,
}

impl AdminUseCases {
    pub fn new(
        repo: Arc<dyn WaitlistRepo>,
        notifier: WaitlistNotifier,
        display_zone: FixedOffset,
    ) -> Self {
        Self {
            repo,
            notifier,
            display_zone,
        }
    }

    #[instrument(skip(self))]
    pub async fn count(&self) -> AppResult<i64> {
        self.repo.count().await
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> AppResult<Vec<WaitlistEntry>> {
        self.repo.list_newest_first().await
    }

    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> AppResult<String> {
        let entries = self.repo.list_newest_first().await?;
        let ctx = AdminDashboardContext::from_entries(&entries, self.display_zone);
        templates::admin_dashboard(&ctx)
    }

    /// Sends the launch email to everyone not notified yet.
    ///
    /// Each entry is handled on its own: a failed send is counted and the
    /// entry stays pending for the next run, the loop carries on.
    #[instrument(skip(self))]
    pub async fn notify_launch(&self) -> AppResult<LaunchReport> {
        let pending = self.repo.list_unnotified().await?;
        let mut report = LaunchReport {
            total: pending.len() as u64,
            ..Default::default()
        };

        for entry in &pending {
            match self.notifier.send_launch(&entry.email).await {
                Ok(()) => {
                    report.success += 1;
                    // The email went out; a failed flag update only risks a
                    // second launch email on the next run.
                    match self.repo.mark_notified(entry.id).await {
                        Ok(true) => {}
                        Ok(false) => warn!(id = entry.id, "Entry was already marked notified"),
                        Err(err) => {
                            error!(id = entry.id, error = %err, "Failed to mark entry notified")
                        }
                    }
                }
                Err(err) => {
                    report.errors += 1;
                    error!(id = entry.id, email = %entry.email, error = %err, "Failed to send launch email");
                }
            }
        }

        info!(
            success = report.success,
            errors = report.errors,
            total = report.total,
            "Launch notification run finished"
        );
        Ok(report)
    }

    /// Purges every entry. Returns how many rows were removed.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> AppResult<u64> {
        let removed = self.repo.delete_all().await?;
        warn!(removed, "Waitlist cleared");
        Ok(removed)
    }
}
