use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    str::FromStr,
};

use axum::http::HeaderValue;
use chrono::FixedOffset;
use env_helpers::get_env_default;
use secrecy::SecretString;
use url::Url;

use super::InfraError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailProvider {
    Smtp,
    Resend,
}

impl FromStr for EmailProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smtp" => Ok(EmailProvider::Smtp),
            "resend" => Ok(EmailProvider::Resend),
            other => Err(format!("unknown email provider: {other}")),
        }
    }
}

pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Implicit TLS from the first byte. Otherwise STARTTLS is attempted.
    pub secure: bool,
    pub user: String,
    pub pass: SecretString,
}

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub static_dir: PathBuf,
    pub email_provider: EmailProvider,
    pub smtp: SmtpSettings,
    pub resend_api_key: Option<SecretString>,
    pub from_email: String,
    pub app_url: Url,
    pub rate_limit_window_secs: u64,
    pub rate_limit_max: u64,
    /// Shared limiter state when set, process-local counters otherwise.
    pub redis_url: Option<String>,
    /// Whether to trust X-Forwarded-For / X-Real-IP. Only enable behind a reverse proxy.
    pub trust_proxy: bool,
    /// `None` allows any origin.
    pub cors_origin: Option<HeaderValue>,
    /// Zone used for the admin dashboard timestamps.
    pub admin_display_zone: FixedOffset,
    pub log_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, InfraError> {
        let host: IpAddr = get_env_default("HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        let port: u16 = get_env_default("PORT", 3000);
        let database_url: String =
            get_env_default("DATABASE_URL", "sqlite://waitlist.db?mode=rwc".to_string());
        let static_dir: String = get_env_default("STATIC_DIR", ".".to_string());

        let email_provider: EmailProvider = get_env_default("EMAIL_PROVIDER", "smtp".to_string())
            .parse()
            .map_err(|_| InfraError::ConfigInvalid {
                var: "EMAIL_PROVIDER",
            })?;

        let smtp = SmtpSettings {
            host: get_env_default("SMTP_HOST", "smtp.gmail.com".to_string()),
            port: get_env_default("SMTP_PORT", 587),
            secure: get_env_default("SMTP_SECURE", false),
            user: get_env_default("SMTP_USER", "your-email@gmail.com".to_string()),
            pass: SecretString::from(get_env_default(
                "SMTP_PASS",
                "your-app-password".to_string(),
            )),
        };

        let resend_api_key = non_empty_var("RESEND_API_KEY").map(SecretString::from);
        if email_provider == EmailProvider::Resend && resend_api_key.is_none() {
            return Err(InfraError::ConfigMissing {
                var: "RESEND_API_KEY",
            });
        }

        let from_email: String = get_env_default("FROM_EMAIL", "noreply@hanti.com".to_string());
        let app_url: Url = get_env_default("APP_URL", "https://hanti.com/app".to_string())
            .parse()
            .map_err(|_| InfraError::ConfigInvalid { var: "APP_URL" })?;

        let rate_limit_window_secs: u64 = get_env_default("RATE_LIMIT_WINDOW_SECS", 900);
        let rate_limit_max: u64 = get_env_default("RATE_LIMIT_MAX", 10);
        let redis_url = non_empty_var("REDIS_URL");
        // Default to false: forwarded headers are client-controlled without a proxy
        let trust_proxy: bool = get_env_default("TRUST_PROXY", false);

        let cors_origin = non_empty_var("CORS_ORIGIN")
            .map(|origin| origin.parse::<HeaderValue>())
            .transpose()
            .map_err(|_| InfraError::ConfigInvalid { var: "CORS_ORIGIN" })?;

        let offset_minutes: i32 = get_env_default("ADMIN_UTC_OFFSET_MINUTES", -240);
        let admin_display_zone =
            display_zone(offset_minutes).ok_or(InfraError::ConfigInvalid {
                var: "ADMIN_UTC_OFFSET_MINUTES",
            })?;

        let log_file: String = get_env_default("LOG_FILE", "app.log".to_string());

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            database_url,
            static_dir: PathBuf::from(static_dir),
            email_provider,
            smtp,
            resend_api_key,
            from_email,
            app_url,
            rate_limit_window_secs,
            rate_limit_max,
            redis_url,
            trust_proxy,
            cors_origin,
            admin_display_zone,
            log_file: PathBuf::from(log_file),
        })
    }
}

/// Offset east of UTC in minutes, e.g. -240 for UTC-4.
pub fn display_zone(offset_minutes: i32) -> Option<FixedOffset> {
    offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
