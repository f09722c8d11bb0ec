use std::sync::Arc;

use tokio::sync::{
    Semaphore,
    mpsc::{self, error::TrySendError},
};
use tracing::{error, info, warn};

use crate::{
    app_error::{AppError, AppResult},
    application::notifier::WaitlistNotifier,
    use_cases::signup::{WelcomeEmailJob, WelcomeMailQueue},
};

const MAX_CONCURRENT_SENDS: usize = 4;
/// Jobs waiting for a send slot. Beyond this, new welcome emails are dropped.
const OUTBOX_CAPACITY: usize = 1024;

/// Sending half of the welcome email queue.
#[derive(Clone)]
pub struct MailOutbox {
    tx: mpsc::Sender<WelcomeEmailJob>,
}

pub fn mail_outbox() -> (MailOutbox, mpsc::Receiver<WelcomeEmailJob>) {
    mail_outbox_with_capacity(OUTBOX_CAPACITY)
}

pub fn mail_outbox_with_capacity(
    capacity: usize,
) -> (MailOutbox, mpsc::Receiver<WelcomeEmailJob>) {
    let (tx, rx) = mpsc::channel(capacity);
    (MailOutbox { tx }, rx)
}

impl WelcomeMailQueue for MailOutbox {
    fn enqueue(&self, job: WelcomeEmailJob) -> AppResult<()> {
        self.tx.try_send(job).map_err(|e| match e {
            TrySendError::Full(job) => {
                warn!(id = job.entry_id, "Mail outbox full, dropping welcome email");
                AppError::Internal("mail outbox is full".into())
            }
            TrySendError::Closed(_) => AppError::Internal("mail outbox is closed".into()),
        })
    }
}

/// Drains the outbox until every sender is dropped, then waits for the
/// sends still in flight.
pub async fn run_mail_outbox_loop(
    mut rx: mpsc::Receiver<WelcomeEmailJob>,
    notifier: WaitlistNotifier,
) {
    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_SENDS));
    info!(
        "Mail outbox worker started (max {} concurrent)",
        MAX_CONCURRENT_SENDS
    );

    while let Some(job) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let notifier = notifier.clone();
        tokio::spawn(async move {
            let _permit = permit;
            deliver_welcome(&notifier, &job).await;
        });
    }

    // Every permit back means every spawned send has finished.
    let _ = semaphore.acquire_many(MAX_CONCURRENT_SENDS as u32).await;
    info!("Mail outbox worker stopped");
}

async fn deliver_welcome(notifier: &WaitlistNotifier, job: &WelcomeEmailJob) {
    match notifier.send_welcome(&job.email, job.role).await {
        Ok(()) => info!(id = job.entry_id, "Welcome email sent"),
        Err(e) => error!(id = job.entry_id, error = %e, "Welcome email failed"),
    }
}
