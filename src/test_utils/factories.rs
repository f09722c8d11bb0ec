//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};

use crate::{
    application::validators::SignupInput,
    domain::entities::{role::Role, waitlist_entry::WaitlistEntry},
};

/// Create a test waitlist entry with sensible defaults.
pub fn create_test_entry(overrides: impl FnOnce(&mut WaitlistEntry)) -> WaitlistEntry {
    let mut entry = WaitlistEntry {
        id: 1,
        email: "user@example.com".to_string(),
        role: Role::Buyer,
        first_name: None,
        last_name: None,
        phone: None,
        created_at: test_datetime(),
        notified: false,
    };
    overrides(&mut entry);
    entry
}

/// Minimal form submission with only the required fields.
pub fn signup_input(email: &str, role: &str) -> SignupInput {
    SignupInput {
        email: Some(email.to_string()),
        role: Some(role.to_string()),
        ..Default::default()
    }
}

/// 2025-06-01 12:05:09 UTC.
pub fn test_datetime() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 5, 9)
        .single()
        .unwrap_or_default()
}

/// UTC-4, the default dashboard zone.
pub fn test_display_zone() -> FixedOffset {
    FixedOffset::west_opt(4 * 3600).unwrap()
}
