use std::time::Duration;

use async_trait::async_trait;
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use secrecy::ExposeSecret;

use crate::{
    app_error::{AppError, AppResult},
    application::{notifier::EmailSender, templates::BRAND_NAME},
    infra::{InfraError, config::SmtpSettings},
};

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends through an authenticated SMTP relay.
#[derive(Clone)]
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailSender {
    /// Builds the transport without connecting; the first send opens the
    /// connection.
    pub fn new(settings: &SmtpSettings, from_email: &str) -> Result<Self, InfraError> {
        let address: Address = from_email
            .parse()
            .map_err(|source| InfraError::InvalidAddress {
                address: from_email.to_string(),
                source,
            })?;

        let tls_parameters = TlsParameters::new(settings.host.clone()).map_err(|source| {
            InfraError::SmtpTransport {
                host: settings.host.clone(),
                source,
            }
        })?;
        let tls = if settings.secure {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            .port(settings.port)
            .tls(tls)
            .credentials(Credentials::new(
                settings.user.clone(),
                settings.pass.expose_secret().to_string(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        Ok(Self {
            transport,
            from: Mailbox::new(Some(BRAND_NAME.to_string()), address),
        })
    }

    fn build_message(&self, to: &str, subject: &str, html: &str) -> AppResult<Message> {
        let to: Mailbox = to
            .parse()
            .map_err(|e| AppError::Notifier(format!("Invalid recipient {to}: {e}")))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())
            .map_err(|e| AppError::Notifier(format!("Failed to build email: {e}")))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()> {
        let message = self.build_message(to, subject, html)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Notifier(format!("SMTP delivery failed: {e}")))?;
        Ok(())
    }
}
