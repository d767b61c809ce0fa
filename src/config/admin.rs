//! Administrator account configuration from environment variables.
//!
//! The reserved administrator account is seeded on demand. Its email and initial
//! password come from `LAURENT_ADMIN_EMAIL` and `LAURENT_ADMIN_PASSWORD`, falling
//! back to the built-in defaults when they are not set.

use crate::errors::Result;
use crate::models::Email;

/// Default reserved administrator email.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@laurent.com";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_ADMIN_NAME: &str = "Admin";

/// Credentials used to seed the administrator account.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    /// Display name of the admin account
    pub name: String,
    /// Reserved administrator email
    pub email: Email,
    /// Initial plaintext password, hashed before storage
    pub password: String,
}

impl AdminCredentials {
    /// Builds credentials from explicit values.
    ///
    /// # Errors
    /// Returns an error if `email` is not a valid address.
    pub fn new(email: &str, password: &str) -> Result<Self> {
        Ok(Self {
            name: DEFAULT_ADMIN_NAME.to_string(),
            email: Email::parse(email)?,
            password: password.to_string(),
        })
    }

    /// Reads the admin credentials from the environment, falling back to defaults.
    ///
    /// # Errors
    /// Returns an error if `LAURENT_ADMIN_EMAIL` is set to an invalid address.
    pub fn from_env() -> Result<Self> {
        let email =
            std::env::var("LAURENT_ADMIN_EMAIL").unwrap_or_else(|_| DEFAULT_ADMIN_EMAIL.to_string());
        let password = std::env::var("LAURENT_ADMIN_PASSWORD")
            .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());
        Self::new(&email, &password)
    }
}
