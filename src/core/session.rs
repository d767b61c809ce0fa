//! Explicit session context.
//!
//! A `Session` is created by login or registration and handed to every operation that
//! needs to know who is acting. Guards return [`Error::AuthRequired`], which callers
//! turn into a redirect to the login entry point.

use crate::{
    core::namespace::Identity,
    errors::{Error, Result},
    models::{Email, Role, User},
};

/// The signed-in user of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    /// Display name
    pub name: String,
    /// Lower-cased email
    pub email: Email,
    /// Admin or customer
    pub role: Role,
}

/// Who is acting: a guest or a signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<SessionUser>,
}

impl Session {
    /// An unauthenticated session.
    #[must_use]
    pub const fn guest() -> Self {
        Self { user: None }
    }

    /// A session signed in as `user`.
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        Self {
            user: Some(SessionUser {
                name: user.name.clone(),
                email: user.email.clone(),
                role: user.role,
            }),
        }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// Partition owner for carts and order histories.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::from_email(self.user.as_ref().map(|user| &user.email))
    }

    /// Whether the session belongs to the administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.role == Role::Admin)
    }

    /// Returns the signed-in user or fails with `AuthRequired`.
    pub fn require_user(&self) -> Result<&SessionUser> {
        self.user.as_ref().ok_or_else(|| Error::AuthRequired {
            reason: "sign in to continue".to_string(),
        })
    }

    /// Returns the signed-in administrator or fails with `AuthRequired`.
    pub fn require_admin(&self) -> Result<&SessionUser> {
        let user = self.require_user()?;
        if user.role == Role::Admin {
            Ok(user)
        } else {
            Err(Error::AuthRequired {
                reason: "administrator access required".to_string(),
            })
        }
    }
}
