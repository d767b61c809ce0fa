//! Key namespace resolver.
//!
//! Derives the storage key for every collection. Global collections have fixed keys;
//! carts and order histories are scoped by the lower-cased email of the identity,
//! or by a guest sentinel. Customer keys use `:` after the prefix and the guest key
//! uses `#`, so no email can ever resolve to the guest partition.

use crate::errors::Result;
use crate::models::Email;
use std::fmt;

const USERS_KEY: &str = "laurent-users";
const MENU_KEY: &str = "laurent-menu";
const ADMIN_ORDERS_KEY: &str = "laurent-orders-all";
const CART_PREFIX: &str = "laurent-cart";
const ORDERS_PREFIX: &str = "laurent-orders";
const GUEST: &str = "guest";

/// Who a cart or order history belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// Unauthenticated visitor
    Guest,
    /// Signed-in user, keyed by lower-cased email
    Authenticated(Email),
}

impl Identity {
    /// Builds an identity from an optional email.
    #[must_use]
    pub fn from_email(email: Option<&Email>) -> Self {
        email.map_or(Self::Guest, |email| Self::Authenticated(email.clone()))
    }

    /// Parses a raw, possibly absent, email. Blank input is the guest.
    ///
    /// # Errors
    /// Returns an error if a non-blank value is not a valid email.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::Guest),
            Some(raw) => Ok(Self::Authenticated(Email::parse(raw)?)),
        }
    }

    /// The email, unless this is the guest.
    #[must_use]
    pub const fn email(&self) -> Option<&Email> {
        match self {
            Self::Guest => None,
            Self::Authenticated(email) => Some(email),
        }
    }
}

/// A derived storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceKey(String);

impl NamespaceKey {
    /// The key as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn scoped(prefix: &str, identity: &Identity) -> Self {
        match identity {
            Identity::Guest => Self(format!("{prefix}#{GUEST}")),
            Identity::Authenticated(email) => Self(format!("{prefix}:{email}")),
        }
    }
}

impl fmt::Display for NamespaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of the registered users collection.
#[must_use]
pub fn users_key() -> NamespaceKey {
    NamespaceKey(USERS_KEY.to_string())
}

/// Key of the menu catalog.
#[must_use]
pub fn menu_key() -> NamespaceKey {
    NamespaceKey(MENU_KEY.to_string())
}

/// Key of the admin-wide order ledger.
#[must_use]
pub fn admin_orders_key() -> NamespaceKey {
    NamespaceKey(ADMIN_ORDERS_KEY.to_string())
}

/// Key of the cart owned by `identity`.
#[must_use]
pub fn cart_key(identity: &Identity) -> NamespaceKey {
    NamespaceKey::scoped(CART_PREFIX, identity)
}

/// Key of the order history owned by `identity`.
#[must_use]
pub fn orders_key(identity: &Identity) -> NamespaceKey {
    NamespaceKey::scoped(ORDERS_PREFIX, identity)
}
