use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::{
    app_error::AppResult,
    application::templates::{self, RenderedEmail},
    domain::entities::role::Role,
};

/// Outbound mail transport. One call is one delivery attempt.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()>;
}

/// Renders waitlist emails and hands them to the configured transport.
///
/// No retries here: callers decide what a failed send means.
#[derive(Clone)]
pub struct WaitlistNotifier {
    sender: Arc<dyn EmailSender>,
    app_url: String,
}

impl WaitlistNotifier {
    pub fn new(sender: Arc<dyn EmailSender>, app_url: String) -> Self {
        Self { sender, app_url }
    }

    #[instrument(skip(self))]
    pub async fn send_welcome(&self, email: &str, role: Role) -> AppResult<()> {
        let rendered = templates::welcome_email(role)?;
        self.deliver(email, &rendered).await
    }

    #[instrument(skip(self))]
    pub async fn send_launch(&self, email: &str) -> AppResult<()> {
        let rendered = templates::launch_email(&self.app_url)?;
        self.deliver(email, &rendered).await
    }

    async fn deliver(&self, to: &str, email: &RenderedEmail) -> AppResult<()> {
        self.sender.send(to, &email.subject, &email.html).await
    }
}
