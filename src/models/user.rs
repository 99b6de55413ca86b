//! The user wrapper: profile, friends, games, sessions, feed, messaging.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::cache::Cached;
use crate::error::{ArcadiaError, Result};
use crate::models::{check_page_size, Community, Game, MessageThread, Session, Story};
use crate::page::Page;
use crate::rest::{RestClient, Service};
use crate::types::{
    CommunitiesDocument, FeedDocument, FriendsDocument, GamesDocument,
    MessageThreadsDocument, Profile, ProfileEnvelope, SessionsDocument,
};

const PROFILE_FIELDS: &str = "onlineId,npId,aboutMe,avatarUrls,languagesUsed,followerCount,following,verified,plus,trophySummary,presence";
const THREAD_FIELDS: &str = "threadId,name,members,modifiedDate";

#[derive(Debug, Clone)]
enum Target {
    /// The authenticated account (`/users/me/...`).
    Me,
    OnlineId(String),
}

/// A user account on the network.
///
/// The profile document is fetched at most once per instance; every
/// accessor reads the cached copy. Pass `force = true` to [`User::profile`]
/// to refetch. The sessions list is memoized the same way, separately.
#[derive(Debug)]
pub struct User {
    rest: RestClient,
    target: Target,
    profile: Cached<Profile>,
    sessions: Cached<Vec<crate::types::SessionDocument>>,
}

impl User {
    pub(crate) fn me(rest: RestClient) -> Self {
        Self {
            rest,
            target: Target::Me,
            profile: Cached::new(),
            sessions: Cached::new(),
        }
    }

    pub(crate) fn with_online_id(rest: RestClient, online_id: impl Into<String>) -> Self {
        Self {
            rest,
            target: Target::OnlineId(online_id.into()),
            profile: Cached::new(),
            sessions: Cached::new(),
        }
    }

    /// Built from a profile fragment a parent call already fetched, so the
    /// first accessor costs no request.
    pub(crate) fn from_profile(rest: RestClient, profile: Profile) -> Self {
        Self {
            rest,
            target: Target::OnlineId(profile.online_id.clone()),
            profile: Cached::prefilled(profile),
            sessions: Cached::new(),
        }
    }

    fn path_id(&self) -> &str {
        match &self.target {
            Target::Me => "me",
            Target::OnlineId(id) => id,
        }
    }

    /// Mutations address `/users/me/...{id}`, so they need a concrete target.
    fn require_online_id(&self) -> Result<&str> {
        match &self.target {
            Target::Me => Err(ArcadiaError::validation(
                "operation requires a target online id, not the authenticated account",
            )),
            Target::OnlineId(id) => Ok(id),
        }
    }

    // ── Profile ───────────────────────────────────────────────────────────────

    /// The profile document. One request populates it; `force` refetches.
    pub async fn profile(&self, force: bool) -> Result<Arc<Profile>> {
        self.profile
            .get_or_refresh(force, || async {
                let envelope: ProfileEnvelope = self
                    .rest
                    .get(
                        Service::Profiles,
                        &format!("/users/{}/profile?fields={PROFILE_FIELDS}", self.path_id()),
                    )
                    .await?;
                envelope
                    .profile
                    .ok_or(ArcadiaError::MissingField { field: "profile" })
            })
            .await
    }

    pub async fn online_id(&self) -> Result<String> {
        Ok(self.profile(false).await?.online_id.clone())
    }

    pub async fn about_me(&self) -> Result<Option<String>> {
        Ok(self.profile(false).await?.about_me.clone())
    }

    /// URL of the largest avatar variant.
    pub async fn avatar_url(&self) -> Result<String> {
        let profile = self.profile(false).await?;
        profile
            .avatar_urls
            .last()
            .map(|a| a.avatar_url.clone())
            .ok_or(ArcadiaError::MissingField { field: "avatarUrls" })
    }

    pub async fn follower_count(&self) -> Result<u64> {
        Ok(self.profile(false).await?.follower_count)
    }

    /// Whether the authenticated account follows this user.
    pub async fn is_following(&self) -> Result<bool> {
        Ok(self.profile(false).await?.following)
    }

    pub async fn is_verified(&self) -> Result<bool> {
        Ok(self.profile(false).await?.verified)
    }

    pub async fn has_plus(&self) -> Result<bool> {
        Ok(self.profile(false).await?.plus)
    }

    pub async fn languages(&self) -> Result<Vec<String>> {
        Ok(self.profile(false).await?.languages_used.clone())
    }

    pub async fn trophy_level(&self) -> Result<Option<u32>> {
        Ok(self.profile(false).await?.trophy_summary.as_ref().map(|t| t.level))
    }

    // ── Listings ──────────────────────────────────────────────────────────────

    /// One page of friends. `after` advances the cursor returned on the
    /// previous page; `None` restarts from the first page.
    pub async fn friends(&self, limit: u32, after: Option<&str>) -> Result<Page<User>> {
        check_page_size(limit)?;
        let mut path = format!(
            "/users/{}/friends?fields={PROFILE_FIELDS}&limit={limit}",
            self.path_id()
        );
        if let Some(cursor) = after {
            path.push_str(&format!("&after={cursor}"));
        }
        let doc: FriendsDocument = self.rest.get(Service::Profiles, &path).await?;
        Ok(Page {
            total: Some(doc.total_results),
            next: doc.next,
            items: doc
                .profiles
                .into_iter()
                .map(|p| User::from_profile(self.rest.clone(), p))
                .collect(),
        })
    }

    /// One page of played titles.
    pub async fn games(&self, limit: u32, after: Option<&str>) -> Result<Page<Game>> {
        check_page_size(limit)?;
        let mut path = format!("/users/{}/games?limit={limit}", self.path_id());
        if let Some(cursor) = after {
            path.push_str(&format!("&after={cursor}"));
        }
        let doc: GamesDocument = self.rest.get(Service::Profiles, &path).await?;
        Ok(Page {
            total: None,
            next: doc.next,
            items: doc.titles.into_iter().map(Game::from_title).collect(),
        })
    }

    /// Communities the user belongs to. Single-page endpoint.
    pub async fn communities(&self) -> Result<Vec<Community>> {
        let doc: CommunitiesDocument = self
            .rest
            .get(
                Service::Communities,
                &format!("/users/{}/communities", self.path_id()),
            )
            .await?;
        Ok(doc
            .communities
            .into_iter()
            .map(|c| Community::from_document(self.rest.clone(), c))
            .collect())
    }

    /// Live sessions the user is part of. Memoized; `force` refetches.
    pub async fn sessions(&self, force: bool) -> Result<Vec<Session>> {
        let docs = self
            .sessions
            .get_or_refresh(force, || async {
                let doc: SessionsDocument = self
                    .rest
                    .get(
                        Service::Sessions,
                        &format!("/users/{}/sessions", self.path_id()),
                    )
                    .await?;
                Ok(doc.sessions)
            })
            .await?;
        Ok(docs.iter().cloned().map(Session::new).collect())
    }

    /// One page of the user's activity feed.
    pub async fn feed(&self, limit: u32, after: Option<&str>) -> Result<Page<Story>> {
        check_page_size(limit)?;
        let mut path = format!("/users/{}/feed?limit={limit}", self.path_id());
        if let Some(cursor) = after {
            path.push_str(&format!("&after={cursor}"));
        }
        let doc: FeedDocument = self.rest.get(Service::Feed, &path).await?;
        Ok(Page {
            total: None,
            next: doc.next,
            items: doc.feed.into_iter().map(Story::new).collect(),
        })
    }

    // ── Messaging ─────────────────────────────────────────────────────────────

    /// The authenticated account's message threads. For a wrapper with a
    /// concrete online id, only threads that user is a member of.
    pub async fn message_threads(&self) -> Result<Vec<MessageThread>> {
        let doc: MessageThreadsDocument = self
            .rest
            .get(Service::Messaging, &format!("/threads?fields={THREAD_FIELDS}"))
            .await?;
        let threads = doc
            .threads
            .into_iter()
            .filter(|t| match &self.target {
                Target::Me => true,
                Target::OnlineId(id) => t.members.iter().any(|m| &m.online_id == id),
            })
            .map(|t| MessageThread::new(self.rest.clone(), t))
            .collect();
        Ok(threads)
    }

    /// The first thread with exactly two members, i.e. the 1:1 conversation.
    pub async fn private_message_thread(&self) -> Result<Option<MessageThread>> {
        let threads = self.message_threads().await?;
        Ok(threads.into_iter().find(|t| t.member_count() == 2))
    }

    // ── Mutations ─────────────────────────────────────────────────────────────

    pub async fn add_friend(&self, request_message: Option<&str>) -> Result<()> {
        let id = self.require_online_id()?;
        let mut body = json!({});
        if let Some(m) = request_message {
            body["requestMessage"] = json!(m);
        }
        self.rest
            .post::<Value>(Service::Profiles, &format!("/users/me/friends/{id}/request"), &body)
            .await?;
        Ok(())
    }

    pub async fn remove_friend(&self) -> Result<()> {
        let id = self.require_online_id()?;
        self.rest
            .delete(Service::Profiles, &format!("/users/me/friends/{id}"))
            .await
    }

    pub async fn block(&self) -> Result<()> {
        let id = self.require_online_id()?;
        self.rest
            .post::<Value>(Service::Profiles, &format!("/users/me/blocklist/{id}"), &json!({}))
            .await?;
        Ok(())
    }

    pub async fn unblock(&self) -> Result<()> {
        let id = self.require_online_id()?;
        self.rest
            .delete(Service::Profiles, &format!("/users/me/blocklist/{id}"))
            .await
    }

    pub async fn follow(&self) -> Result<()> {
        let id = self.require_online_id()?;
        self.rest
            .post::<Value>(Service::Profiles, &format!("/users/me/following/{id}"), &json!({}))
            .await?;
        Ok(())
    }

    pub async fn unfollow(&self) -> Result<()> {
        let id = self.require_online_id()?;
        self.rest
            .delete(Service::Profiles, &format!("/users/me/following/{id}"))
            .await
    }
}
