use validator::ValidateEmail;

use crate::{
    app_error::{AppError, AppResult, Field},
    domain::entities::{role::Role, waitlist_entry::NewWaitlistEntry},
};

/// Raw signup fields as submitted by the form.
#[derive(Debug, Clone, Default)]
pub struct SignupInput {
    pub email: Option<String>,
    pub role: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

/// Parses a role name, ignoring case and surrounding whitespace.
pub fn parse_role(raw: Option<&str>) -> AppResult<Role> {
    raw.and_then(|r| r.parse().ok()).ok_or(AppError::InvalidRole)
}

/// Absent stays absent; present must have content after trimming.
pub fn optional_text(raw: Option<&str>, field: Field) -> AppResult<Option<String>> {
    match raw {
        None => Ok(None),
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                Err(AppError::EmptyField(field))
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
    }
}

/// Checks every field in form order and returns the normalized entry,
/// or the error for the first field that fails.
pub fn validate_signup(input: &SignupInput) -> AppResult<NewWaitlistEntry> {
    let email = input.email.as_deref().unwrap_or_default();
    if !is_valid_email(email) {
        return Err(AppError::InvalidEmail);
    }
    let role = parse_role(input.role.as_deref())?;
    let first_name = optional_text(input.first_name.as_deref(), Field::FirstName)?;
    let last_name = optional_text(input.last_name.as_deref(), Field::LastName)?;
    let phone = optional_text(input.phone.as_deref(), Field::Phone)?;
    let email = normalize_email(email).ok_or(AppError::InvalidEmail)?;

    Ok(NewWaitlistEntry {
        email,
        role,
        first_name,
        last_name,
        phone,
    })
}

const GMAIL_DOMAINS: &[&str] = &["gmail.com", "googlemail.com"];
const ICLOUD_DOMAINS: &[&str] = &["icloud.com", "me.com"];
const OUTLOOK_DOMAINS: &[&str] = &[
    "hotmail.at",
    "hotmail.be",
    "hotmail.ca",
    "hotmail.cl",
    "hotmail.co.il",
    "hotmail.co.nz",
    "hotmail.co.th",
    "hotmail.co.uk",
    "hotmail.com",
    "hotmail.com.ar",
    "hotmail.com.au",
    "hotmail.com.br",
    "hotmail.com.gr",
    "hotmail.com.mx",
    "hotmail.com.pe",
    "hotmail.com.tr",
    "hotmail.com.vn",
    "hotmail.cz",
    "hotmail.de",
    "hotmail.dk",
    "hotmail.es",
    "hotmail.fr",
    "hotmail.hu",
    "hotmail.id",
    "hotmail.ie",
    "hotmail.in",
    "hotmail.it",
    "hotmail.jp",
    "hotmail.kr",
    "hotmail.lv",
    "hotmail.my",
    "hotmail.ph",
    "hotmail.pt",
    "hotmail.sa",
    "hotmail.sg",
    "hotmail.sk",
    "live.be",
    "live.co.uk",
    "live.com",
    "live.com.ar",
    "live.com.mx",
    "live.de",
    "live.es",
    "live.eu",
    "live.fr",
    "live.it",
    "live.nl",
    "msn.com",
    "outlook.at",
    "outlook.be",
    "outlook.cl",
    "outlook.co.il",
    "outlook.co.nz",
    "outlook.co.th",
    "outlook.com",
    "outlook.com.ar",
    "outlook.com.au",
    "outlook.com.br",
    "outlook.com.gr",
    "outlook.com.pe",
    "outlook.com.tr",
    "outlook.com.vn",
    "outlook.cz",
    "outlook.de",
    "outlook.dk",
    "outlook.es",
    "outlook.fr",
    "outlook.hu",
    "outlook.id",
    "outlook.ie",
    "outlook.in",
    "outlook.it",
    "outlook.jp",
    "outlook.kr",
    "outlook.lv",
    "outlook.my",
    "outlook.ph",
    "outlook.pt",
    "outlook.sa",
    "outlook.sg",
    "outlook.sk",
    "passport.com",
];
const YAHOO_DOMAINS: &[&str] = &[
    "rocketmail.com",
    "yahoo.ca",
    "yahoo.co.uk",
    "yahoo.com",
    "yahoo.de",
    "yahoo.fr",
    "yahoo.in",
    "yahoo.it",
    "ycorp.com",
    "ymail.com",
];
const YANDEX_DOMAINS: &[&str] = &[
    "yandex.ru",
    "yandex.ua",
    "yandex.kz",
    "yandex.com",
    "yandex.by",
    "ya.ru",
];

/// Canonical form used as the uniqueness key.
///
/// Lowercases the whole address and folds provider-specific aliases:
/// Gmail drops dots and `+tags` and maps googlemail.com to gmail.com,
/// Outlook and iCloud drop `+tags`, Yahoo drops the last `-segment`, Yandex maps
/// every regional domain to yandex.ru.
///
/// Returns `None` when nothing usable is left of the local part.
pub fn normalize_email(email: &str) -> Option<String> {
    let email = email.trim();
    let (local, domain) = email.rsplit_once('@')?;
    let local = local.to_lowercase();
    let mut domain = domain.to_lowercase();

    let local = if GMAIL_DOMAINS.contains(&domain.as_str()) {
        domain = "gmail.com".to_string();
        strip_tag(&local, '+').replace('.', "")
    } else if ICLOUD_DOMAINS.contains(&domain.as_str())
        || OUTLOOK_DOMAINS.contains(&domain.as_str())
    {
        strip_tag(&local, '+').to_string()
    } else if YAHOO_DOMAINS.contains(&domain.as_str()) {
        drop_last_segment(&local, '-').to_string()
    } else if YANDEX_DOMAINS.contains(&domain.as_str()) {
        domain = "yandex.ru".to_string();
        local
    } else {
        local
    };

    if local.is_empty() || domain.is_empty() {
        return None;
    }
    Some(format!("{local}@{domain}"))
}

fn strip_tag(local: &str, separator: char) -> &str {
    local.split(separator).next().unwrap_or(local)
}

/// `a-b-c` becomes `a-b`; a local part without the separator is kept.
fn drop_last_segment(local: &str, separator: char) -> &str {
    local
        .rsplit_once(separator)
        .map_or(local, |(head, _)| head)
}
