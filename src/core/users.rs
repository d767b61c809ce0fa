//! Account registration and login.
//!
//! Users live in the global `laurent-users` collection. The reserved administrator
//! account is created on demand from [`AdminCredentials`]; everyone else registers as
//! a customer. Passwords are stored as Argon2id hashes.

use crate::{
    config::admin::AdminCredentials,
    core::{namespace::users_key, session::Session, store},
    errors::{Error, Result},
    models::{Email, Role, User},
};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::DatabaseConnection;
use tracing::{debug, info, warn};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Registration form input.
#[derive(Debug, Clone)]
pub struct Registration {
    /// Display name
    pub name: String,
    /// Raw email as typed; normalized on registration
    pub email: String,
    /// Plaintext password, hashed before storage
    pub password: String,
}

/// Adds the administrator account unless a user already holds the reserved email.
///
/// Returns whether the account was created.
pub async fn ensure_admin_user(
    db: &DatabaseConnection,
    credentials: &AdminCredentials,
) -> Result<bool> {
    let users: Vec<User> = store::load_or_default(db, &users_key()).await?;
    if users.iter().any(|user| user.email == credentials.email) {
        return Ok(false);
    }

    let admin = User {
        name: credentials.name.clone(),
        email: credentials.email.clone(),
        password_hash: hash_password(&credentials.password)?,
        role: Role::Admin,
    };

    let mut created = false;
    store::mutate(db, &users_key(), |users: &mut Vec<User>| {
        if !users.iter().any(|user| user.email == admin.email) {
            users.push(admin);
            created = true;
        }
        Ok(())
    })
    .await?;

    if created {
        info!("Created administrator account {}", credentials.email);
    }
    Ok(created)
}

/// Registers a new customer and signs them in.
///
/// # Errors
/// Returns an error if:
/// - A field is empty
/// - The email is malformed
/// - The password is shorter than [`MIN_PASSWORD_LENGTH`]
/// - The email is the reserved administrator email or already registered
pub async fn register(
    db: &DatabaseConnection,
    admin_email: &Email,
    registration: Registration,
) -> Result<Session> {
    let name = registration.name.trim();
    if name.is_empty() || registration.email.trim().is_empty() || registration.password.is_empty()
    {
        return Err(Error::Validation {
            message: "Please fill all fields.".to_string(),
        });
    }

    let email = Email::parse(&registration.email)?;
    if registration.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::Validation {
            message: format!("Password must be at least {MIN_PASSWORD_LENGTH} characters."),
        });
    }
    if &email == admin_email {
        return Err(Error::Validation {
            message: "Admin account already exists. Please use Login instead.".to_string(),
        });
    }

    let user = User {
        name: name.to_string(),
        email,
        password_hash: hash_password(&registration.password)?,
        role: Role::Customer,
    };
    let session = Session::for_user(&user);

    store::mutate(db, &users_key(), |users: &mut Vec<User>| {
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(Error::Validation {
                message: "This email is already registered. Try logging in.".to_string(),
            });
        }
        users.push(user);
        Ok(())
    })
    .await?;

    info!("Registered customer {}", registration.email.trim());
    Ok(session)
}

/// Signs in with email and password.
///
/// The administrator account is created first if it is missing, so the admin can
/// always log in with the configured credentials.
///
/// # Errors
/// Returns [`Error::Validation`] when a field is empty and [`Error::InvalidCredentials`]
/// when the email is unknown or the password does not match.
pub async fn login(
    db: &DatabaseConnection,
    admin: &AdminCredentials,
    email: &str,
    password: &str,
) -> Result<Session> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(Error::Validation {
            message: "Please enter both email and password.".to_string(),
        });
    }

    ensure_admin_user(db, admin).await?;

    let email = Email::parse(email).map_err(|_| Error::InvalidCredentials)?;
    let users: Vec<User> = store::load_or_default(db, &users_key()).await?;
    let Some(user) = users.into_iter().find(|user| user.email == email) else {
        debug!("Login attempt for unknown account {email}");
        return Err(Error::InvalidCredentials);
    };

    if let Err(e) = verify_password(password, &user.password_hash) {
        warn!("Failed login for {email}");
        return Err(e);
    }

    info!("{email} signed in as {:?}", user.role);
    Ok(Session::for_user(&user))
}

/// All non-admin accounts, in registration order.
pub async fn list_customers(db: &DatabaseConnection, session: &Session) -> Result<Vec<User>> {
    session.require_admin()?;
    let mut users: Vec<User> = store::load_or_default(db, &users_key()).await?;
    users.retain(|user| user.role == Role::Customer);
    Ok(users)
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| Error::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<()> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| Error::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| Error::InvalidCredentials)
}
