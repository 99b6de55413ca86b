//! High-level `ArcadiaClient`: entry point constructing entity wrappers.

use serde_json::json;

use crate::error::{ArcadiaError, Result};
use crate::models::{Community, User};
use crate::rest::{Endpoints, RestClient, Service};
use crate::types::CommunityDocument;

/// The main Arcadia client.
///
/// Holds the shared [`RestClient`] and hands out entity wrappers. The
/// bearer token comes from whatever auth flow you run elsewhere; the SDK
/// never acquires or refreshes it.
///
/// ```rust,no_run
/// use arcadia_sdk::{ArcadiaClient, Endpoints};
///
/// #[tokio::main]
/// async fn main() -> arcadia_sdk::Result<()> {
///     let client = ArcadiaClient::new("my-bearer-token", Endpoints::default())?;
///     let ren = client.user("ren");
///     println!("{} followers", ren.follower_count().await?);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct ArcadiaClient {
    pub rest: RestClient,
}

impl ArcadiaClient {
    pub fn new(token: impl Into<String>, endpoints: Endpoints) -> Result<Self> {
        Ok(Self { rest: RestClient::new(token, endpoints)? })
    }

    /// Build a client from the environment: `ARCADIA_TOKEN` (required)
    /// plus optional `ARCADIA_PROFILES_URL`, `ARCADIA_COMMUNITIES_URL`,
    /// `ARCADIA_SESSIONS_URL`, `ARCADIA_MESSAGING_URL`,
    /// `ARCADIA_FEED_URL`, and `ARCADIA_MEDIA_URL` overrides.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("ARCADIA_TOKEN")
            .map_err(|_| ArcadiaError::validation("ARCADIA_TOKEN is not set"))?;
        let defaults = Endpoints::default();
        let endpoints = Endpoints {
            profiles: env_or("ARCADIA_PROFILES_URL", defaults.profiles),
            communities: env_or("ARCADIA_COMMUNITIES_URL", defaults.communities),
            sessions: env_or("ARCADIA_SESSIONS_URL", defaults.sessions),
            messaging: env_or("ARCADIA_MESSAGING_URL", defaults.messaging),
            feed: env_or("ARCADIA_FEED_URL", defaults.feed),
            media: env_or("ARCADIA_MEDIA_URL", defaults.media),
        };
        Self::new(token, endpoints)
    }

    /// The authenticated account.
    pub fn me(&self) -> User {
        User::me(self.rest.clone())
    }

    /// A user by online id.
    pub fn user(&self, online_id: impl Into<String>) -> User {
        User::with_online_id(self.rest.clone(), online_id)
    }

    /// A community by id.
    pub fn community(&self, id: impl Into<String>) -> Community {
        Community::new(self.rest.clone(), id)
    }

    /// Create a community, optionally tied to a game title. The returned
    /// wrapper is primed with the creation response.
    pub async fn create_community(
        &self,
        name: &str,
        title_id: Option<&str>,
    ) -> Result<Community> {
        if name.trim().is_empty() {
            return Err(ArcadiaError::validation("community name must not be empty"));
        }
        let mut body = json!({ "name": name });
        if let Some(t) = title_id {
            body["titleId"] = json!(t);
        }
        let doc: CommunityDocument =
            self.rest.post(Service::Communities, "/communities", &body).await?;
        Ok(Community::from_document(self.rest.clone(), doc))
    }
}

fn env_or(var: &str, default: String) -> String {
    std::env::var(var).unwrap_or(default)
}
