use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Please provide a valid email address")]
    InvalidEmail,

    #[error("Please select a valid role (Buyer, Seller, or Investor)")]
    InvalidRole,

    #[error("{} cannot be empty", .0.label())]
    EmptyField(Field),

    #[error("Email already registered in waitlist")]
    DuplicateEmail,

    #[error("Too many requests from this IP, please try again later.")]
    RateLimited,

    #[error("Endpoint not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Email delivery failed: {0}")]
    Notifier(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Optional signup fields that must not be blank when supplied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    Phone,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::FirstName => "First name",
            Field::LastName => "Last name",
            Field::Phone => "Phone number",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum ErrorCode {
    InvalidEmail,
    InvalidRole,
    EmptyField,
    DuplicateEmail,
    RateLimited,
    NotFound,
    DatabaseError,
    NotifierError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidEmail => "INVALID_EMAIL",
            ErrorCode::InvalidRole => "INVALID_ROLE",
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::DuplicateEmail => "DUPLICATE_EMAIL",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::NotifierError => "NOTIFIER_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl AppError {
    /// Client-correctable errors, detected before any mutation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::InvalidEmail
                | AppError::InvalidRole
                | AppError::EmptyField(_)
                | AppError::DuplicateEmail
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
