//! Backend exchange client.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net` with a 30-second
//! timeout. Off-browser: stubs returning errors, since the backend is only
//! reachable from the running site.
//!
//! ERROR HANDLING
//! ==============
//! Status codes map onto a small taxonomy so callers can tell an
//! authentication rejection (give up) from a transient failure (retryable).

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;

use super::types::{
    ExchangeRequest, ExchangeResponse, TrainerProfileRequest, TrainerProfileResponse,
};

/// Network timeout for exchange calls.
pub const REQUEST_TIMEOUT_MS: u32 = 30_000;

/// Failures surfaced by the backend exchange.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("the server rejected the credentials")]
    Unauthorized,
    #[error("the server rejected the request: {0}")]
    BadRequest(String),
    #[error("server error, please try again")]
    Server,
    /// Transient: the request did not complete. Retryable, unlike a
    /// credential rejection.
    #[error("the request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
}

/// Capability surface of the backend exchange service.
#[async_trait(?Send)]
pub trait ExchangeApi {
    /// Trade a provider credential for an application session.
    async fn exchange(&self, request: &ExchangeRequest) -> Result<ExchangeResponse, ApiError>;

    /// Register extended trainer profile data under an application session.
    async fn register_trainer(
        &self,
        bearer: &str,
        request: &TrainerProfileRequest,
    ) -> Result<TrainerProfileResponse, ApiError>;
}

/// HTTP implementation over the site's backend.
pub struct HttpExchangeApi {
    #[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
    base_url: String,
}

impl HttpExchangeApi {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into() }
    }
}

#[async_trait(?Send)]
impl ExchangeApi for HttpExchangeApi {
    async fn exchange(&self, request: &ExchangeRequest) -> Result<ExchangeResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = format!("{}/api/auth/login", self.base_url);
            let req = gloo_net::http::Request::post(&url)
                .json(request)
                .map_err(|e| ApiError::Network(e.to_string()))?;
            let resp = send_with_timeout(req).await?;
            if !resp.ok() {
                return Err(error_from_status(&resp).await);
            }
            resp.json().await.map_err(|e| ApiError::Network(e.to_string()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(ApiError::Network("backend unavailable off-browser".to_owned()))
        }
    }

    async fn register_trainer(
        &self,
        bearer: &str,
        request: &TrainerProfileRequest,
    ) -> Result<TrainerProfileResponse, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = format!("{}/api/trainers/register", self.base_url);
            let req = gloo_net::http::Request::post(&url)
                .header("Authorization", &format!("Bearer {bearer}"))
                .json(request)
                .map_err(|e| ApiError::Network(e.to_string()))?;
            let resp = send_with_timeout(req).await?;
            if !resp.ok() {
                return Err(error_from_status(&resp).await);
            }
            resp.json().await.map_err(|e| ApiError::Network(e.to_string()))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (bearer, request);
            Err(ApiError::Network("backend unavailable off-browser".to_owned()))
        }
    }
}

/// Send a request, surfacing `Timeout` if the backend does not answer
/// within [`REQUEST_TIMEOUT_MS`].
#[cfg(feature = "hydrate")]
async fn send_with_timeout(
    request: gloo_net::http::Request,
) -> Result<gloo_net::http::Response, ApiError> {
    use futures::FutureExt;

    let send = request.send().fuse();
    let timeout = gloo_timers::future::TimeoutFuture::new(REQUEST_TIMEOUT_MS).fuse();
    futures::pin_mut!(send, timeout);

    futures::select! {
        result = send => result.map_err(|e| ApiError::Network(e.to_string())),
        () = timeout => Err(ApiError::Timeout),
    }
}

#[cfg(feature = "hydrate")]
async fn error_from_status(resp: &gloo_net::http::Response) -> ApiError {
    match resp.status() {
        401 | 403 => ApiError::Unauthorized,
        400 => {
            let detail = resp.text().await.unwrap_or_default();
            ApiError::BadRequest(detail)
        }
        status if status >= 500 => ApiError::Server,
        status => ApiError::Network(format!("unexpected status {status}")),
    }
}
