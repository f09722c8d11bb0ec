//! HTML rendering for outgoing emails and the admin dashboard.
//!
//! Templates are compiled into the binary and rendered with Tera, which
//! escapes every interpolated value in `.html` templates. Each template has
//! its own context struct so callers never assemble markup by hand.

use chrono::{DateTime, FixedOffset, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;
use tera::{Context, Tera};

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::{role::Role, waitlist_entry::WaitlistEntry},
};

pub const BRAND_NAME: &str = "Hanti";
const SITE_HOST: &str = "hanti.com";

pub const WELCOME_SUBJECT: &str = "Welcome to Hanti Waitlist! 🏠";
pub const LAUNCH_SUBJECT: &str = "🎉 Hanti is Now Live - Your Early Access is Ready!";

const WELCOME_TEMPLATE: &str = "welcome.html";
const LAUNCH_TEMPLATE: &str = "launch.html";
const ADMIN_TEMPLATE: &str = "admin.html";

static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        (
            WELCOME_TEMPLATE,
            include_str!("../../templates/welcome.html"),
        ),
        (LAUNCH_TEMPLATE, include_str!("../../templates/launch.html")),
        (ADMIN_TEMPLATE, include_str!("../../templates/admin.html")),
    ])
    .expect("failed to compile built-in templates");
    tera
});

/// Subject and body of an email ready to hand to a sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Serialize)]
pub struct WelcomeEmailContext {
    pub brand: &'static str,
    pub site_host: &'static str,
    pub role_label: &'static str,
    pub role_blurb: &'static str,
}

impl WelcomeEmailContext {
    pub fn for_role(role: Role) -> Self {
        Self {
            brand: BRAND_NAME,
            site_host: SITE_HOST,
            role_label: role.label(),
            role_blurb: role_blurb(role),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LaunchEmailContext {
    pub brand: &'static str,
    pub app_url: String,
}

#[derive(Debug, Serialize)]
pub struct AdminDashboardContext {
    pub brand: &'static str,
    pub total: usize,
    pub rows: Vec<AdminRow>,
}

#[derive(Debug, Serialize)]
pub struct AdminRow {
    pub full_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub role: &'static str,
    pub role_label: &'static str,
    pub date: String,
    pub time: String,
}

impl AdminDashboardContext {
    /// Builds dashboard rows with timestamps shifted into `display_zone`.
    pub fn from_entries(entries: &[WaitlistEntry], display_zone: FixedOffset) -> Self {
        let rows = entries
            .iter()
            .map(|entry| AdminRow::from_entry(entry, display_zone))
            .collect();
        Self {
            brand: BRAND_NAME,
            total: entries.len(),
            rows,
        }
    }
}

impl AdminRow {
    fn from_entry(entry: &WaitlistEntry, display_zone: FixedOffset) -> Self {
        let (date, time) = display_timestamp(entry.created_at, display_zone);
        Self {
            full_name: entry.full_name(),
            email: entry.email.clone(),
            phone: entry.phone.clone(),
            role: entry.role.as_str(),
            role_label: entry.role.label(),
            date,
            time,
        }
    }
}

pub fn role_blurb(role: Role) -> &'static str {
    match role {
        Role::Buyer => {
            "As a property buyer, you'll get early access to verified listings and smart search features to find your perfect home."
        }
        Role::Seller => {
            "As a property seller, you'll be first to list on our platform with our verified listing system and market intelligence tools."
        }
        Role::Investor => {
            "As a property investor, you'll get access to market analytics and investment opportunities across African real estate markets."
        }
    }
}

/// "Jun 1, 2025" and "8:05:09 AM" in the given zone.
pub fn display_timestamp(at: DateTime<Utc>, zone: FixedOffset) -> (String, String) {
    let local = at.with_timezone(&zone);
    (
        local.format("%b %-d, %Y").to_string(),
        local.format("%-I:%M:%S %p").to_string(),
    )
}

pub fn welcome_email(role: Role) -> AppResult<RenderedEmail> {
    let html = render(WELCOME_TEMPLATE, &WelcomeEmailContext::for_role(role))?;
    Ok(RenderedEmail {
        subject: WELCOME_SUBJECT.to_string(),
        html,
    })
}

pub fn launch_email(app_url: &str) -> AppResult<RenderedEmail> {
    let ctx = LaunchEmailContext {
        brand: BRAND_NAME,
        app_url: app_url.to_string(),
    };
    let html = render(LAUNCH_TEMPLATE, &ctx)?;
    Ok(RenderedEmail {
        subject: LAUNCH_SUBJECT.to_string(),
        html,
    })
}

pub fn admin_dashboard(ctx: &AdminDashboardContext) -> AppResult<String> {
    render(ADMIN_TEMPLATE, ctx)
}

fn render<T: Serialize>(template: &str, data: &T) -> AppResult<String> {
    let ctx = Context::from_serialize(data)
        .map_err(|e| AppError::Internal(format!("template context for {template}: {e}")))?;
    TEMPLATES
        .render(template, &ctx)
        .map_err(|e| AppError::Internal(format!("failed to render {template}: {e}")))
}
