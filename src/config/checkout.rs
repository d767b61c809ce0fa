//! Checkout backend configuration.

/// Default base URL of the checkout backend.
pub const DEFAULT_CHECKOUT_API_URL: &str = "http://localhost:4000";

/// Gets the checkout backend base URL from `CHECKOUT_API_URL`, or the default.
#[must_use]
pub fn get_checkout_api_url() -> String {
    std::env::var("CHECKOUT_API_URL").unwrap_or_else(|_| DEFAULT_CHECKOUT_API_URL.to_string())
}
