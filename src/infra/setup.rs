use std::{fs::File, path::Path, sync::Arc};

use sqlx::SqlitePool;
use tokio::sync::mpsc::Receiver;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{
        email::{resend::ResendEmailSender, smtp::SmtpEmailSender},
        http::app_state::AppState,
    },
    application::notifier::{EmailSender, WaitlistNotifier},
    infra::{
        InfraError, RateLimiterTrait,
        config::{AppConfig, EmailProvider},
        mail_outbox::mail_outbox,
        rate_limit::{FixedWindowRateLimiter, RedisRateLimiter},
        sqlite_persistence,
    },
    use_cases::{
        admin::AdminUseCases,
        signup::{SignupUseCases, WaitlistRepo, WelcomeEmailJob},
    },
};

/// Handles `main` needs beyond the router state.
pub struct AppBootstrap {
    pub app_state: AppState,
    pub pool: SqlitePool,
    pub notifier: WaitlistNotifier,
    pub outbox_rx: Receiver<WelcomeEmailJob>,
}

pub async fn init_app_state(config: AppConfig) -> Result<AppBootstrap, InfraError> {
    let sqlite_arc = Arc::new(sqlite_persistence(&config.database_url).await?);
    let pool = sqlite_arc.pool().clone();
    let waitlist_repo = sqlite_arc as Arc<dyn WaitlistRepo>;

    let rate_limiter = build_rate_limiter(&config).await?;
    let email = build_email_sender(&config)?;
    let notifier = WaitlistNotifier::new(email, config.app_url.to_string());

    let (outbox, outbox_rx) = mail_outbox();

    let signup_use_cases = SignupUseCases::new(waitlist_repo.clone(), Arc::new(outbox));
    let admin_use_cases = AdminUseCases::new(
        waitlist_repo,
        notifier.clone(),
        config.admin_display_zone,
    );

    Ok(AppBootstrap {
        app_state: AppState {
            config: Arc::new(config),
            signup_use_cases: Arc::new(signup_use_cases),
            admin_use_cases: Arc::new(admin_use_cases),
            rate_limiter,
        },
        pool,
        notifier,
        outbox_rx,
    })
}

async fn build_rate_limiter(config: &AppConfig) -> Result<Arc<dyn RateLimiterTrait>, InfraError> {
    match &config.redis_url {
        Some(url) => {
            let limiter = RedisRateLimiter::new(
                url,
                config.rate_limit_window_secs,
                config.rate_limit_max,
            )
            .await?;
            tracing::info!("Rate limiting backed by Redis");
            Ok(Arc::new(limiter))
        }
        None => Ok(Arc::new(FixedWindowRateLimiter::new(
            config.rate_limit_window_secs,
            config.rate_limit_max,
        ))),
    }
}

fn build_email_sender(config: &AppConfig) -> Result<Arc<dyn EmailSender>, InfraError> {
    match config.email_provider {
        EmailProvider::Smtp => {
            tracing::info!(host = %config.smtp.host, port = config.smtp.port, "Using SMTP transport");
            Ok(Arc::new(SmtpEmailSender::new(
                &config.smtp,
                &config.from_email,
            )?))
        }
        EmailProvider::Resend => {
            let api_key = config
                .resend_api_key
                .clone()
                .ok_or(InfraError::ConfigMissing {
                    var: "RESEND_API_KEY",
                })?;
            tracing::info!("Using Resend transport");
            Ok(Arc::new(ResendEmailSender::new(
                api_key,
                config.from_email.clone(),
            )?))
        }
    }
}

pub fn init_tracing(log_file: &Path) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hanti_waitlist=debug,tower_http=debug".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false) // don’t show target (module path)
        .with_level(true) // show log level
        .pretty(); // human-friendly, with colors

    // File (structured JSON logs). Console only if the file can't be opened.
    let json_layer = match File::create(log_file) {
        Ok(file) => Some(
            fmt::layer()
                .json()
                .with_writer(Arc::new(file))
                .with_current_span(true)
                .with_span_list(true),
        ),
        Err(e) => {
            eprintln!("cannot create log file {}: {e}", log_file.display());
            None
        }
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
