use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{instrument, warn};

use crate::{
    app_error::{AppError, AppResult},
    application::validators::{SignupInput, validate_signup},
    domain::entities::{
        role::Role,
        waitlist_entry::{NewWaitlistEntry, WaitlistEntry},
    },
};

#[async_trait]
pub trait WaitlistRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<WaitlistEntry>>;
    /// Fails with `DuplicateEmail` when the unique index rejects the row.
    async fn insert(&self, entry: &NewWaitlistEntry) -> AppResult<i64>;
    async fn count(&self) -> AppResult<i64>;
    async fn list_newest_first(&self) -> AppResult<Vec<WaitlistEntry>>;
    async fn list_unnotified(&self) -> AppResult<Vec<WaitlistEntry>>;
    /// Returns false when the row was already notified or no longer exists.
    async fn mark_notified(&self, id: i64) -> AppResult<bool>;
    async fn delete_all(&self) -> AppResult<u64>;
}

/// A welcome email waiting to be sent after a signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeEmailJob {
    pub entry_id: i64,
    pub email: String,
    pub role: Role,
}

/// Hands welcome emails to a background worker. Never blocks on delivery.
pub trait WelcomeMailQueue: Send + Sync {
    fn enqueue(&self, job: WelcomeEmailJob) -> AppResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SignupReceipt {
    pub id: i64,
}

#[derive(Clone)]
pub struct SignupUseCases {
    repo: Arc<dyn WaitlistRepo>,
    welcome_queue: Arc<dyn WelcomeMailQueue>,
}

impl SignupUseCases {
    pub fn new(repo: Arc<dyn WaitlistRepo>, welcome_queue: Arc<dyn WelcomeMailQueue>) -> Self {
        Self {
            repo,
            welcome_queue,
        }
    }

    /// Validates, stores and queues a welcome email for a new signup.
    ///
    /// The lookup before the insert only gives an early answer; concurrent
    /// submissions of the same address are settled by the unique index, which
    /// the repo reports as `DuplicateEmail` as well.
    #[instrument(skip(self, input), fields(email = ?input.email))]
    pub async fn submit(&self, input: &SignupInput) -> AppResult<SignupReceipt> {
        let entry = validate_signup(input)?;

        if self.repo.find_by_email(&entry.email).await?.is_some() {
            return Err(AppError::DuplicateEmail);
        }

        let id = self.repo.insert(&entry).await?;
        tracing::info!(id, role = %entry.role, "Waitlist signup stored");

        let job = WelcomeEmailJob {
            entry_id: id,
            email: entry.email,
            role: entry.role,
        };
        if let Err(err) = self.welcome_queue.enqueue(job) {
            warn!(id, error = %err, "Could not queue welcome email");
        }

        Ok(SignupReceipt { id })
    }
}
