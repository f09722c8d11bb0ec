//! Test app state builder for HTTP-level integration testing.
//!
//! `TestAppStateBuilder` creates an `AppState` backed by in-memory mocks so
//! routes can be exercised with `axum_test::TestServer`.

use std::{
    net::{Ipv4Addr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};

use secrecy::SecretString;

use crate::{
    adapters::http::app_state::AppState,
    application::notifier::WaitlistNotifier,
    domain::entities::waitlist_entry::WaitlistEntry,
    infra::{
        config::{AppConfig, EmailProvider, SmtpSettings},
        rate_limit::FixedWindowRateLimiter,
    },
    test_utils::{
        InMemoryEmailSender, InMemoryWaitlistRepo, RecordingWelcomeQueue, test_display_zone,
    },
    use_cases::{admin::AdminUseCases, signup::SignupUseCases},
};

pub const TEST_APP_URL: &str = "https://hanti.test/app";

/// Config with every external service pointed at nothing.
pub fn test_config() -> AppConfig {
    AppConfig {
        bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 0)),
        database_url: "sqlite::memory:".to_string(),
        static_dir: PathBuf::from("."),
        email_provider: EmailProvider::Smtp,
        smtp: SmtpSettings {
            host: "smtp.example.test".to_string(),
            port: 587,
            secure: false,
            user: "mailer@example.test".to_string(),
            pass: SecretString::from("test-password".to_string()),
        },
        resend_api_key: None,
        from_email: "noreply@hanti.test".to_string(),
        app_url: TEST_APP_URL.parse().unwrap(),
        rate_limit_window_secs: 900,
        rate_limit_max: 10,
        redis_url: None,
        trust_proxy: false,
        cors_origin: None,
        admin_display_zone: test_display_zone(),
        log_file: PathBuf::from("test.log"),
    }
}

/// Everything a test may want to inspect after driving the app.
pub struct TestAppMocks {
    pub state: AppState,
    pub repo: Arc<InMemoryWaitlistRepo>,
    pub sender: Arc<InMemoryEmailSender>,
    pub queue: Arc<RecordingWelcomeQueue>,
}

/// Builder for creating `AppState` with in-memory mocks for testing.
///
/// # Example
///
/// ```ignore
/// let app_state = TestAppStateBuilder::new()
///     .with_entries(vec![create_test_entry(|e| e.email = "a@example.com".into())])
///     .with_rate_limit(2)
///     .build();
/// ```
pub struct TestAppStateBuilder {
    entries: Vec<WaitlistEntry>,
    failing_recipients: Vec<String>,
    closed_mail_queue: bool,
    rate_limit_max: u64,
    trust_proxy: bool,
    static_dir: Option<PathBuf>,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            failing_recipients: Vec::new(),
            closed_mail_queue: false,
            rate_limit_max: u64::MAX,
            trust_proxy: false,
            static_dir: None,
        }
    }

    pub fn with_entries(mut self, entries: Vec<WaitlistEntry>) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_failing_recipients(mut self, recipients: &[&str]) -> Self {
        self.failing_recipients = recipients.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn with_closed_mail_queue(mut self) -> Self {
        self.closed_mail_queue = true;
        self
    }

    /// Requests allowed per client in one window. Unlimited by default.
    pub fn with_rate_limit(mut self, max: u64) -> Self {
        self.rate_limit_max = max;
        self
    }

    pub fn with_trust_proxy(mut self) -> Self {
        self.trust_proxy = true;
        self
    }

    pub fn with_static_dir(mut self, dir: PathBuf) -> Self {
        self.static_dir = Some(dir);
        self
    }

    pub fn build(self) -> AppState {
        self.build_with_mocks().state
    }

    pub fn build_with_mocks(self) -> TestAppMocks {
        let mut config = test_config();
        config.rate_limit_max = self.rate_limit_max;
        config.trust_proxy = self.trust_proxy;
        if let Some(dir) = self.static_dir {
            config.static_dir = dir;
        }

        let repo = Arc::new(InMemoryWaitlistRepo::with_entries(self.entries));
        let failing: Vec<&str> = self.failing_recipients.iter().map(String::as_str).collect();
        let sender = Arc::new(InMemoryEmailSender::failing_for(&failing));
        let queue = Arc::new(if self.closed_mail_queue {
            RecordingWelcomeQueue::closed()
        } else {
            RecordingWelcomeQueue::new()
        });

        let notifier = WaitlistNotifier::new(sender.clone(), config.app_url.to_string());
        let signup_use_cases = SignupUseCases::new(repo.clone(), queue.clone());
        let admin_use_cases =
            AdminUseCases::new(repo.clone(), notifier, config.admin_display_zone);
        let rate_limiter = Arc::new(FixedWindowRateLimiter::new(
            config.rate_limit_window_secs,
            config.rate_limit_max,
        ));

        let state = AppState {
            config: Arc::new(config),
            signup_use_cases: Arc::new(signup_use_cases),
            admin_use_cases: Arc::new(admin_use_cases),
            rate_limiter,
        };

        TestAppMocks {
            state,
            repo,
            sender,
            queue,
        }
    }
}
