//! Hosted checkout collaborator.
//!
//! The order flow only needs two calls from the payment backend: creating a checkout
//! session (which yields a redirect URL) and a liveness probe. [`CheckoutGateway`] is
//! the seam the order ledger depends on; [`HttpCheckoutClient`] is the reqwest-backed
//! implementation used by the binary.

use crate::{
    config::checkout::get_checkout_api_url,
    errors::{Error, Result},
    models::CartLine,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Customer details sent with a checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutUser {
    /// Customer email
    pub email: String,
    /// Customer display name
    pub name: String,
}

/// Body of a checkout-session request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Cart lines to charge for
    pub cart: Vec<CartLine>,
    /// Who is paying
    pub user: CheckoutUser,
}

/// A created checkout session; the customer is redirected to `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Hosted checkout page
    pub url: String,
}

/// Creates hosted checkout sessions.
pub trait CheckoutGateway {
    /// Requests a checkout session for `request`.
    ///
    /// # Errors
    /// Returns [`Error::PaymentSession`] when no session could be created.
    fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> impl Future<Output = Result<CheckoutSession>> + Send;
}

#[derive(Debug, Deserialize)]
struct CheckoutResponse {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    ok: bool,
}

/// HTTP client for the checkout backend.
#[derive(Debug, Clone)]
pub struct HttpCheckoutClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCheckoutClient {
    /// Client for the backend at `base_url` (e.g. `http://localhost:4000`).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Client reusing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Client for the backend named by `CHECKOUT_API_URL`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(get_checkout_api_url())
    }

    /// The backend base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        let response = self
            .client
            .post(format!("{}/api/checkout", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::PaymentSession {
                message: format!("checkout backend returned {status}: {body}"),
            });
        }

        let response: CheckoutResponse = response.json().await?;
        match response.url {
            Some(url) if !url.trim().is_empty() => Ok(CheckoutSession { url }),
            _ => Err(Error::PaymentSession {
                message: "checkout backend returned no redirect URL".to_string(),
            }),
        }
    }

    /// Calls the liveness endpoint and returns its availability flag.
    ///
    /// # Errors
    /// Returns an error if the backend is unreachable or the body is malformed.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn health(&self) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?
            .error_for_status()?;

        let health: HealthResponse = response.json().await?;
        debug!("Checkout backend health: {}", health.ok);
        Ok(health.ok)
    }
}

impl CheckoutGateway for HttpCheckoutClient {
    #[instrument(skip_all, fields(lines = request.cart.len()))]
    async fn create_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        self.request_session(request).await.map_err(|e| match e {
            Error::PaymentSession { .. } => e,
            other => Error::PaymentSession {
                message: other.to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves exactly one HTTP response and returns the raw request it received.
    async fn one_shot_server(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0_u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&received);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if received.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&received).into_owned()
        });

        (base_url, handle)
    }

    fn client(base_url: &str) -> HttpCheckoutClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpCheckoutClient::with_client(http, base_url)
    }

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            cart: vec![CartLine {
                id: 2,
                name: "Pizza".to_string(),
                price: 12.0,
                qty: 1,
            }],
            user: CheckoutUser {
                email: "laiba@gmail.com".to_string(),
                name: "Laiba".to_string(),
            },
        }
    }

    #[test]
    fn test_request_wire_format() {
        let json = serde_json::to_value(request()).unwrap();
        assert_eq!(json["cart"][0]["qty"], 1);
        assert_eq!(json["cart"][0]["price"], 12.0);
        assert_eq!(json["user"]["email"], "laiba@gmail.com");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = HttpCheckoutClient::new("http://localhost:4000/");
        assert_eq!(client.base_url(), "http://localhost:4000");
    }

    #[tokio::test]
    async fn test_create_session_returns_url() {
        let (base_url, server) =
            one_shot_server("200 OK", r#"{"url":"https://pay.example.com/s/1"}"#).await;

        let session = client(&base_url).create_session(&request()).await.unwrap();
        assert_eq!(session.url, "https://pay.example.com/s/1");

        let received = server.await.unwrap();
        assert!(received.starts_with("POST /api/checkout"));
        assert!(received.contains("laiba@gmail.com"));
    }

    #[tokio::test]
    async fn test_missing_url_is_payment_error() {
        let (base_url, _server) = one_shot_server("200 OK", r#"{"id":"cs_1"}"#).await;

        let result = client(&base_url).create_session(&request()).await;
        assert!(matches!(result, Err(Error::PaymentSession { .. })));
    }

    #[tokio::test]
    async fn test_non_success_status_is_payment_error() {
        let (base_url, _server) =
            one_shot_server("500 Internal Server Error", r#"{"error":"boom"}"#).await;

        let result = client(&base_url).create_session(&request()).await;
        match result {
            Err(Error::PaymentSession { message }) => assert!(message.contains("500")),
            other => panic!("expected payment error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_health_reads_flag() {
        let (base_url, server) = one_shot_server("200 OK", r#"{"ok":true}"#).await;

        assert!(client(&base_url).health().await.unwrap());
        assert!(server.await.unwrap().starts_with("GET /health"));
    }
}
