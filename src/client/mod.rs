//! Client layer: signs requests, dispatches them, and maps responses.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::{
    ApiResponse, Credentials, SendSms, TransactionId, UnixTimestamp, ValidationError,
};
use crate::transport::{
    Endpoint, HttpMethod, SignatureFormat, SignedRequestBuilder, SigningError,
};

const DEFAULT_BASE_URL: &str = "https://rest.spirius.com/v1";
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpRequest {
    method: HttpMethod,
    url: String,
    headers: Vec<(&'static str, String)>,
    body: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
                HttpMethod::Delete => reqwest::Method::DELETE,
            };
            let mut builder = self.client.request(method, &request.url);
            for (name, value) in request.headers {
                builder = builder.header(name, value);
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SpiriusClient`].
///
/// A non-2xx status is not an error by itself: the gateway's body is returned as
/// [`ApiResponse`]. Use [`ApiResponse::error_for_status`] to opt into
/// [`SpiriusError::HttpStatus`].
pub enum SpiriusError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code, produced by [`ApiResponse::error_for_status`].
    #[error("unexpected HTTP status: {status}")]
    HttpStatus {
        status: u16,
        body: Option<serde_json::Value>,
    },

    /// Response body is not JSON, produced by [`ApiResponse::error_for_malformed_body`].
    #[error("parse error (HTTP {status}): {source}")]
    Parse {
        status: u16,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The request could not be encoded or signed.
    #[error("signing error: {0}")]
    Signing(#[from] SigningError),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// Builder for [`SpiriusClient`].
///
/// Use this when you need to customize the base URL, timeouts, user-agent, or
/// signature rendering.
pub struct SpiriusClientBuilder {
    credentials: Credentials,
    base_url: String,
    timeout: Option<Duration>,
    connect_timeout: Duration,
    user_agent: Option<String>,
    signature_format: SignatureFormat,
}

impl SpiriusClientBuilder {
    /// Create a builder with the default base URL and a 5 second connect timeout.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: None,
            signature_format: SignatureFormat::default(),
        }
    }

    /// Override the API base URL (default `https://rest.spirius.com/v1`).
    ///
    /// Endpoint paths are appended to it; only the endpoint path is signed.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the connect timeout (default 5 seconds).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Select how the string to sign is rendered.
    pub fn signature_format(mut self, format: SignatureFormat) -> Self {
        self.signature_format = format;
        self
    }

    /// Build a [`SpiriusClient`].
    ///
    /// Fails with [`ValidationError::InvalidBaseUrl`] unless the base URL is an
    /// `http`/`https` URL without query or fragment.
    pub fn build(self) -> Result<SpiriusClient, SpiriusError> {
        let base_url = normalize_base_url(&self.base_url)?;

        let mut builder = reqwest::Client::builder().connect_timeout(self.connect_timeout);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| SpiriusError::Transport(Box::new(err)))?;

        Ok(SpiriusClient {
            credentials: self.credentials,
            base_url,
            signature_format: self.signature_format,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

fn normalize_base_url(input: &str) -> Result<String, ValidationError> {
    let invalid = || ValidationError::InvalidBaseUrl {
        input: input.to_owned(),
    };
    let parsed = url::Url::parse(input.trim()).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https")
        || parsed.query().is_some()
        || parsed.fragment().is_some()
    {
        return Err(invalid());
    }
    Ok(parsed.as_str().trim_end_matches('/').to_owned())
}

#[derive(Clone)]
/// High-level Spirius SMS gateway client.
///
/// Every call is stamped with the current time, signed with `SpiriusSmsV1`
/// HMAC authentication and sent to `https://rest.spirius.com/v1` (by default).
/// The client holds no per-call state and can be shared across tasks.
pub struct SpiriusClient {
    credentials: Credentials,
    base_url: String,
    signature_format: SignatureFormat,
    http: Arc<dyn HttpTransport>,
}

impl SpiriusClient {
    /// Create a client with default settings.
    ///
    /// For more customization, use [`SpiriusClient::builder`].
    pub fn new(credentials: Credentials) -> Result<Self, SpiriusError> {
        SpiriusClientBuilder::new(credentials).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> SpiriusClientBuilder {
        SpiriusClientBuilder::new(credentials)
    }

    /// Send an SMS (`POST /sms/mt/send`).
    ///
    /// The gateway's body is returned whatever the HTTP status, even when it is not JSON.
    ///
    /// Errors:
    /// - [`SpiriusError::Signing`] if the body or headers cannot be encoded,
    /// - [`SpiriusError::Transport`] for network failures.
    pub async fn send_sms(&self, request: SendSms) -> Result<ApiResponse, SpiriusError> {
        let body = crate::transport::encode_send_sms_body(&request).map_err(SigningError::from)?;
        self.execute(Endpoint::send_sms(), Some(body)).await
    }

    /// Look up a message status (`GET /sms/mo/status/{id}`).
    pub async fn get_message_status(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<ApiResponse, SpiriusError> {
        self.execute(Endpoint::message_status(transaction_id), None)
            .await
    }

    /// List inbound messages (`GET /sms/mo`).
    pub async fn get_mo_message_list(&self) -> Result<ApiResponse, SpiriusError> {
        self.execute(Endpoint::mo_message_list(), None).await
    }

    /// Fetch one inbound message (`GET /sms/mo/{id}`).
    pub async fn get_mo_message(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<ApiResponse, SpiriusError> {
        self.execute(Endpoint::mo_message(transaction_id), None)
            .await
    }

    /// Fetch and remove one inbound message (`DELETE /sms/mo/{id}`).
    pub async fn pop_mo_message(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<ApiResponse, SpiriusError> {
        self.execute(Endpoint::pop_mo_message(transaction_id), None)
            .await
    }

    /// Fetch and remove the oldest inbound message (`DELETE /sms/mo/next`).
    pub async fn pop_next_message(&self) -> Result<ApiResponse, SpiriusError> {
        self.execute(Endpoint::pop_next_message(), None).await
    }

    async fn execute(
        &self,
        endpoint: Endpoint,
        body: Option<Vec<u8>>,
    ) -> Result<ApiResponse, SpiriusError> {
        let timestamp = UnixTimestamp::now();
        let signed = SignedRequestBuilder::new(&self.credentials)
            .format(self.signature_format)
            .build(&endpoint, timestamp, body)?;

        let url = format!("{}{}", self.base_url, signed.path);
        debug!(
            method = signed.method.as_str(),
            %url,
            timestamp = timestamp.value(),
            "sending Spirius request"
        );

        let response = self
            .http
            .send(HttpRequest {
                method: signed.method,
                url,
                headers: signed.headers.to_pairs(),
                body: signed.body,
            })
            .await
            .map_err(SpiriusError::Transport)?;

        let status = response.status;
        if (200..=299).contains(&status) {
            debug!(status, "Spirius request succeeded");
        } else {
            warn!(status, path = %endpoint.path(), "Spirius returned non-success status");
        }

        let response = crate::transport::decode_json_response(status, response.body);
        if !response.is_json() {
            warn!(status, path = %endpoint.path(), "Spirius returned a non-JSON body");
        }
        Ok(response)
    }
}
