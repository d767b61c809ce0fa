use crate::models::EmailError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid price: {price} (must be a finite number greater than zero)")]
    InvalidPrice { price: f64 },

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Cannot place an order with an empty cart")]
    EmptyCart,

    #[error("Unable to start payment: {message}")]
    PaymentSession { message: String },

    #[error("Authentication required: {reason}")]
    AuthRequired { reason: String },

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Failed to hash password")]
    PasswordHash,

    #[error("Menu item not found: {id}")]
    ItemNotFound { id: i64 },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the caller should send the user to the login entry point.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::AuthRequired { .. })
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
