//! Shared test utilities for `laurent-orders`.
//!
//! This module provides common helper functions for setting up test databases
//! and building sessions and menu items with sensible defaults.

use crate::{
    checkout::{CheckoutGateway, CheckoutRequest, CheckoutSession},
    config::admin::DEFAULT_ADMIN_EMAIL,
    core::{namespace::Identity, session::Session},
    errors::{Error, Result},
    models::{Category, Email, MenuItem, Role, User},
};
use sea_orm::DatabaseConnection;
use std::sync::Mutex;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

fn session_for(name: &str, email: &str, role: Role) -> Session {
    let user = User {
        name: name.to_string(),
        email: Email::parse(email).unwrap_or_else(|e| panic!("bad test email {email}: {e}")),
        password_hash: String::new(),
        role,
    };
    Session::for_user(&user)
}

/// A signed-in administrator session for the default admin email.
pub fn admin_session() -> Session {
    session_for("Admin", DEFAULT_ADMIN_EMAIL, Role::Admin)
}

/// A signed-in customer session.
pub fn customer_session(email: &str) -> Session {
    session_for("Test Customer", email, Role::Customer)
}

/// The authenticated identity for `email`.
pub fn customer_identity(email: &str) -> Identity {
    customer_session(email).identity()
}

/// Creates an available main-course menu item.
///
/// # Defaults
/// * `category`: Main Course
/// * `image`: None
/// * `available`: true
pub fn test_menu_item(id: i64, name: &str, price: f64) -> MenuItem {
    MenuItem {
        id,
        name: name.to_string(),
        price,
        category: Category::MainCourse,
        image: None,
        available: true,
    }
}

/// Checkout gateway that answers from memory and records every request.
#[derive(Debug, Default)]
pub struct FakeGateway {
    url: Option<String>,
    requests: Mutex<Vec<CheckoutRequest>>,
}

impl FakeGateway {
    /// Answers every request with `url`.
    pub fn redirecting(url: &str) -> Self {
        Self {
            url: Some(url.to_string()),
            ..Self::default()
        }
    }

    /// Fails every request as if the backend were unreachable.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CheckoutRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl CheckoutGateway for FakeGateway {
    async fn create_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        match &self.url {
            Some(url) => Ok(CheckoutSession { url: url.clone() }),
            None => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "checkout backend unreachable",
            ))),
        }
    }
}
