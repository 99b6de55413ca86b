//! Async REST transport for the Arcadia services.

use reqwest::{multipart::Form, Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ArcadiaError, Result};

const DEFAULT_PROFILES: &str = "https://profiles.api.arcadia.gg/v1";
const DEFAULT_COMMUNITIES: &str = "https://communities.api.arcadia.gg/v1";
const DEFAULT_SESSIONS: &str = "https://sessions.api.arcadia.gg/v1";
const DEFAULT_MESSAGING: &str = "https://messaging.api.arcadia.gg/v1";
const DEFAULT_FEED: &str = "https://feed.api.arcadia.gg/v1";
const DEFAULT_MEDIA: &str = "https://media.arcadia.gg/v1";

/// Base URLs of the Arcadia services.
///
/// `Default` points at production; override individual fields (or use
/// [`Endpoints::single_host`]) to target a staging stack or a local mock
/// server in tests.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub profiles: String,
    pub communities: String,
    pub sessions: String,
    pub messaging: String,
    pub feed: String,
    pub media: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            profiles: DEFAULT_PROFILES.to_owned(),
            communities: DEFAULT_COMMUNITIES.to_owned(),
            sessions: DEFAULT_SESSIONS.to_owned(),
            messaging: DEFAULT_MESSAGING.to_owned(),
            feed: DEFAULT_FEED.to_owned(),
            media: DEFAULT_MEDIA.to_owned(),
        }
    }
}

impl Endpoints {
    /// Every service on one host. Intended for tests against a mock server.
    pub fn single_host(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_owned();
        Self {
            profiles: base.clone(),
            communities: base.clone(),
            sessions: base.clone(),
            messaging: base.clone(),
            feed: base.clone(),
            media: base,
        }
    }
}

/// Which service a request is addressed to.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Service {
    Profiles,
    Communities,
    Sessions,
    Messaging,
    Feed,
    Media,
}

/// Async Arcadia REST client.
///
/// Holds the bearer token (installed as a default header) and the
/// service base URLs. Cheap to clone; every entity wrapper carries one.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    endpoints: Endpoints,
}

impl RestClient {
    pub fn new(token: impl Into<String>, endpoints: Endpoints) -> Result<Self> {
        let token = token.into();
        let client = Client::builder()
            .default_headers({
                let mut h = reqwest::header::HeaderMap::new();
                h.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!("Bearer {token}"))
                        .map_err(|_| {
                            ArcadiaError::validation("token contains invalid header characters")
                        })?,
                );
                h
            })
            .build()?;

        let mut endpoints = endpoints;
        for base in [
            &mut endpoints.profiles,
            &mut endpoints.communities,
            &mut endpoints.sessions,
            &mut endpoints.messaging,
            &mut endpoints.feed,
            &mut endpoints.media,
        ] {
            while base.ends_with('/') {
                base.pop();
            }
        }

        Ok(Self { client, endpoints })
    }

    fn base(&self, service: Service) -> &str {
        match service {
            Service::Profiles => &self.endpoints.profiles,
            Service::Communities => &self.endpoints.communities,
            Service::Sessions => &self.endpoints.sessions,
            Service::Messaging => &self.endpoints.messaging,
            Service::Feed => &self.endpoints.feed,
            Service::Media => &self.endpoints.media,
        }
    }

    // ── Internal ──────────────────────────────────────────────────────────────

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        service: Service,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base(service), path);
        debug!(method = %method, url = %url, "arcadia request");
        let mut req = self.client.request(method, &url);
        if let Some(b) = body {
            req = req.json(b);
        }
        let resp = req.send().await?;
        self.decode(url, resp).await
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        url: String,
        resp: reqwest::Response,
    ) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            warn!(status = %status, url = %url, "arcadia request failed");
            return Err(match status {
                StatusCode::NOT_FOUND => ArcadiaError::NotFound,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ArcadiaError::Auth { status: status.as_u16() }
                }
                _ => {
                    let message = resp
                        .json::<Value>()
                        .await
                        .ok()
                        .and_then(|v| {
                            v.pointer("/error/message")
                                .and_then(|m| m.as_str())
                                .map(str::to_owned)
                        })
                        .unwrap_or_else(|| status.to_string());
                    ArcadiaError::Remote { status: status.as_u16(), message }
                }
            });
        }
        if status == StatusCode::NO_CONTENT {
            return serde_json::from_value(Value::Null).map_err(ArcadiaError::Json);
        }
        Ok(resp.json::<T>().await?)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, service: Service, path: &str) -> Result<T> {
        self.request(Method::GET, service, path, None).await
    }

    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
        body: &Value,
    ) -> Result<T> {
        self.request(Method::POST, service, path, Some(body)).await
    }

    pub(crate) async fn put<T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
        body: &Value,
    ) -> Result<T> {
        self.request(Method::PUT, service, path, Some(body)).await
    }

    pub(crate) async fn delete(&self, service: Service, path: &str) -> Result<()> {
        let url = format!("{}{}", self.base(service), path);
        debug!(method = "DELETE", url = %url, "arcadia request");
        let resp = self.client.delete(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(status = %status, url = %url, "arcadia request failed");
            return Err(match status {
                StatusCode::NOT_FOUND => ArcadiaError::NotFound,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    ArcadiaError::Auth { status: status.as_u16() }
                }
                _ => ArcadiaError::Remote {
                    status: status.as_u16(),
                    message: resp.text().await.unwrap_or_default(),
                },
            });
        }
        Ok(())
    }

    /// Multipart POST: an event/metadata part plus an optional binary part.
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        service: Service,
        path: &str,
        form: Form,
    ) -> Result<T> {
        let url = format!("{}{}", self.base(service), path);
        debug!(method = "POST", url = %url, "arcadia multipart request");
        let resp = self.client.post(&url).multipart(form).send().await?;
        self.decode(url, resp).await
    }
}
