//! Domain records persisted inside the namespaced collections.
//!
//! These are plain serde types: every collection is stored as a JSON array of one
//! of them, so field names and enum spellings here are the persisted format.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace.
    #[error("email cannot contain whitespace")]
    Whitespace,
    /// The input does not contain exactly one @ symbol.
    #[error("email must contain exactly one @ symbol")]
    MissingAtSymbol,
    /// The local part (before @) is empty.
    #[error("email local part cannot be empty")]
    EmptyLocalPart,
    /// The domain part (after @) is not a dotted name.
    #[error("email domain must look like example.com")]
    InvalidDomain,
}

/// A lower-cased email address, the unit of identity.
///
/// Parsing trims and lower-cases the input, so two spellings that differ only
/// in case are the same value.
///
/// ```
/// use laurent_orders::models::Email;
///
/// let a = Email::parse("Laiba@Gmail.com").unwrap();
/// let b = Email::parse("laiba@gmail.com").unwrap();
/// assert_eq!(a, b);
/// assert!(Email::parse("no-at-symbol").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, too long, contains
    /// whitespace, does not have exactly one @, has an empty local part, or
    /// has a domain without a dot-separated name.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::MissingAtSymbol)?;
        if domain.contains('@') {
            return Err(EmailError::MissingAtSymbol);
        }
        if local.is_empty() {
            return Err(EmailError::EmptyLocalPart);
        }
        match domain.rsplit_once('.') {
            Some((name, tld)) if !name.is_empty() && !tld.is_empty() => {}
            _ => return Err(EmailError::InvalidDomain),
        }

        Ok(Self(s.to_lowercase()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The single restaurant administrator.
    Admin,
    /// A registered customer.
    Customer,
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name
    pub name: String,
    /// Unique, case-insensitive login key
    pub email: Email,
    /// Argon2id PHC string
    pub password_hash: String,
    /// Admin or customer
    pub role: Role,
}

/// Fixed menu sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Main dishes
    #[serde(rename = "Main Course")]
    MainCourse,
    /// Starters
    Starters,
    /// Desserts
    Desserts,
    /// Drinks
    Drinks,
}

impl Category {
    /// Every category, in menu order.
    pub const ALL: [Self; 4] = [Self::MainCourse, Self::Starters, Self::Desserts, Self::Drinks];

    /// Display label, identical to the persisted spelling.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MainCourse => "Main Course",
            Self::Starters => "Starters",
            Self::Desserts => "Desserts",
            Self::Drinks => "Drinks",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const fn default_available() -> bool {
    true
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique identifier
    pub id: i64,
    /// Non-empty display name
    pub name: String,
    /// Unit price, always greater than zero
    pub price: f64,
    /// Menu section
    pub category: Category,
    /// Optional image URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Hidden from customer listings when false
    #[serde(default = "default_available")]
    pub available: bool,
}

/// Admin form input for creating or editing a [`MenuItem`].
///
/// `id: None` creates a new item, `Some(id)` edits an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItemInput {
    /// Item to edit, or `None` to create one
    pub id: Option<i64>,
    /// Display name; trimmed before validation
    pub name: String,
    /// Unit price, must be greater than zero
    pub price: f64,
    /// Menu section
    pub category: Category,
    /// Optional image URI
    pub image: Option<String>,
    /// Whether customers can see the item
    pub available: bool,
}

/// One line of a cart, keyed by the menu item id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Id of the menu item this line was added from
    pub id: i64,
    /// Item name at the time it was added
    pub name: String,
    /// Unit price at the time it was added
    pub price: f64,
    /// Quantity, never below one
    pub qty: u32,
}

impl CartLine {
    /// Starts a line with quantity one from a menu item.
    #[must_use]
    pub fn from_item(item: &MenuItem) -> Self {
        Self {
            id: item.id,
            name: item.name.clone(),
            price: item.price,
            qty: 1,
        }
    }

    /// `price × qty`
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.qty)
    }
}

/// Lifecycle of an order.
///
/// The serde spellings are the human-readable labels shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Awaiting confirmation
    Pending,
    /// Cash-on-Delivery order awaiting confirmation
    #[serde(rename = "COD - Pending")]
    CodPending,
    /// Accepted by the restaurant
    Confirmed,
    /// Handed to the customer
    Delivered,
    /// Cancelled by the customer or the restaurant
    Cancelled,
}

impl OrderStatus {
    /// Display label, identical to the persisted spelling.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::CodPending => "COD - Pending",
            Self::Confirmed => "Confirmed",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
        }
    }

    /// True for both pending variants.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending | Self::CodPending)
    }

    /// Delivered and cancelled orders never change again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Transition table for the order lifecycle.
    ///
    /// Pending orders can be confirmed, delivered directly or cancelled;
    /// confirmed orders can be delivered or cancelled; terminal states are final.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Pending | Self::CodPending, Self::Confirmed | Self::Delivered | Self::Cancelled)
            | (Self::Confirmed, Self::Delivered | Self::Cancelled) => true,
            _ => false,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Order is recorded immediately and paid on delivery
    CashOnDelivery,
    /// Hosted card checkout; the order is recorded after the redirect back
    Card,
}

impl PaymentMethod {
    /// Status a freshly placed order starts in.
    #[must_use]
    pub const fn initial_status(self) -> OrderStatus {
        match self {
            Self::CashOnDelivery => OrderStatus::CodPending,
            Self::Card => OrderStatus::Pending,
        }
    }
}

/// A placed order. `items` is a snapshot taken at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Creation timestamp in milliseconds, unique within its partition
    pub id: i64,
    /// Email (or display identity) of the customer
    pub customer: String,
    /// Copy of the cart lines at order time
    pub items: Vec<CartLine>,
    /// Sum of `price × qty` over `items`
    pub total: f64,
    /// Current lifecycle state
    pub status: OrderStatus,
    /// Human-readable creation time
    pub date: String,
}
