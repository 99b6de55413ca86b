//! The community wrapper: info document, membership, boards, write ops.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};

use crate::cache::Cached;
use crate::error::{ArcadiaError, Result};
use crate::models::{check_page_size, CommunityThread, Game, User};
use crate::rest::{RestClient, Service};
use crate::types::{CommunityDocument, MembersDocument, ThreadsDocument, UploadReceipt};

const MAX_NAME_LEN: usize = 64;

/// A persistent group with membership, discussion boards, and an optional
/// associated game title.
///
/// The info document is fetched at most once per instance; pass
/// `force = true` to [`Community::info`] to refetch.
#[derive(Debug)]
pub struct Community {
    rest: RestClient,
    id: String,
    info: Cached<CommunityDocument>,
}

impl Community {
    pub(crate) fn new(rest: RestClient, id: impl Into<String>) -> Self {
        Self { rest, id: id.into(), info: Cached::new() }
    }

    /// Built from a document a parent call already fetched, so the first
    /// accessor costs no request.
    pub(crate) fn from_document(rest: RestClient, doc: CommunityDocument) -> Self {
        Self { rest, id: doc.id.clone(), info: Cached::prefilled(doc) }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The info document. One request populates it; `force` refetches.
    pub async fn info(&self, force: bool) -> Result<Arc<CommunityDocument>> {
        self.info
            .get_or_refresh(force, || async {
                self.rest
                    .get(Service::Communities, &format!("/communities/{}", self.id))
                    .await
            })
            .await
    }

    pub async fn name(&self) -> Result<String> {
        Ok(self.info(false).await?.name.clone())
    }

    pub async fn description(&self) -> Result<Option<String>> {
        Ok(self.info(false).await?.description.clone())
    }

    pub async fn member_count(&self) -> Result<u64> {
        Ok(self.info(false).await?.member_count)
    }

    pub async fn language(&self) -> Result<String> {
        Ok(self.info(false).await?.language.clone())
    }

    pub async fn background_color(&self) -> Result<Option<String>> {
        Ok(self.info(false).await?.background_color.clone())
    }

    pub async fn background_image_url(&self) -> Result<Option<String>> {
        Ok(self.info(false).await?.background_image_url.clone())
    }

    /// The associated game title, or `None` when the info document carries
    /// no title id.
    pub async fn game(&self) -> Result<Option<Game>> {
        Ok(self.info(false).await?.title_id.clone().map(Game::from_id))
    }

    // ── Listings ──────────────────────────────────────────────────────────────

    /// One page of members, one wrapper per member element.
    pub async fn members(&self, limit: u32) -> Result<Vec<User>> {
        check_page_size(limit)?;
        let doc: MembersDocument = self
            .rest
            .get(
                Service::Communities,
                &format!("/communities/{}/members?limit={limit}", self.id),
            )
            .await?;
        Ok(doc
            .members
            .into_iter()
            .map(|m| User::with_online_id(self.rest.clone(), m.online_id))
            .collect())
    }

    /// The community's discussion boards. Single-page endpoint.
    pub async fn threads(&self) -> Result<Vec<CommunityThread>> {
        let doc: ThreadsDocument = self
            .rest
            .get(
                Service::Communities,
                &format!("/communities/{}/threads", self.id),
            )
            .await?;
        Ok(doc.threads.into_iter().map(CommunityThread::new).collect())
    }

    // ── Write operations ──────────────────────────────────────────────────────

    pub async fn set_name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() || name.chars().count() > MAX_NAME_LEN {
            return Err(ArcadiaError::validation(format!(
                "community name must be 1..={MAX_NAME_LEN} characters"
            )));
        }
        self.put_info(json!({ "name": name })).await
    }

    pub async fn set_description(&self, text: &str) -> Result<()> {
        self.put_info(json!({ "description": text })).await
    }

    /// Set the board color from a 24-bit RGB value. The wire format is a
    /// 6-digit uppercase hex string without `#`.
    pub async fn set_background_color(&self, rgb: u32) -> Result<()> {
        if rgb > 0xFF_FF_FF {
            return Err(ArcadiaError::validation(format!(
                "background color must fit 24 bits, got {rgb:#x}"
            )));
        }
        self.put_info(json!({ "backgroundColor": format!("{rgb:06X}") })).await
    }

    /// Upload a JPEG to the media CDN, then point the community at it.
    /// Anything but a JPEG is rejected before a request is made.
    pub async fn set_background_image(&self, bytes: Vec<u8>, filename: &str) -> Result<()> {
        let mime = mime_guess::from_path(filename).first_or_octet_stream();
        if mime != mime_guess::mime::IMAGE_JPEG {
            return Err(ArcadiaError::validation(format!(
                "background image must be a JPEG, got {mime}"
            )));
        }
        let form = Form::new()
            .text("purpose", "communityBackground")
            .part(
                "file",
                Part::bytes(bytes).file_name(filename.to_owned()).mime_str("image/jpeg")?,
            );
        let receipt: UploadReceipt =
            self.rest.post_multipart(Service::Media, "/uploads", form).await?;
        self.put_info(json!({ "backgroundImageUrl": receipt.source_url })).await
    }

    /// Invite users by online id. One write, no confirmation read-back.
    pub async fn invite(&self, online_ids: &[&str]) -> Result<()> {
        if online_ids.is_empty() {
            return Err(ArcadiaError::validation("invite needs at least one online id"));
        }
        self.rest
            .post::<Value>(
                Service::Communities,
                &format!("/communities/{}/invitations", self.id),
                &json!({ "onlineIds": online_ids }),
            )
            .await?;
        Ok(())
    }

    /// Remove the authenticated account from the community.
    pub async fn leave(&self) -> Result<()> {
        self.rest
            .delete(
                Service::Communities,
                &format!("/communities/{}/members/me", self.id),
            )
            .await
    }

    async fn put_info(&self, body: Value) -> Result<()> {
        self.rest
            .put::<Value>(
                Service::Communities,
                &format!("/communities/{}", self.id),
                &body,
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::Endpoints;

    fn community(base: &str) -> Community {
        let rest = RestClient::new("test-token", Endpoints::single_host(base)).unwrap();
        Community::new(rest, "c1")
    }

    const INFO_BODY: &str = r#"{
        "id": "c1",
        "name": "Starfall Drift Racers",
        "description": "time trials every friday",
        "memberCount": 412,
        "language": "en",
        "backgroundColor": "30475E",
        "titleId": "ARC00412",
        "role": "member"
    }"#;

    #[tokio::test]
    async fn info_fetched_once_until_forced() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/communities/c1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(INFO_BODY)
            .expect(2)
            .create_async()
            .await;

        let community = community(&server.url());
        assert_eq!(community.name().await.unwrap(), "Starfall Drift Racers");
        assert_eq!(community.member_count().await.unwrap(), 412);
        assert_eq!(community.background_color().await.unwrap().as_deref(), Some("30475E"));

        community.info(true).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn game_wraps_the_associated_title_id() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/communities/c1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(INFO_BODY)
            .create_async()
            .await;

        let game = community(&server.url()).game().await.unwrap().unwrap();
        assert_eq!(game.title_id(), "ARC00412");
    }

    #[tokio::test]
    async fn game_is_none_without_a_title_id() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/communities/c1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "c1", "name": "Offtopic Lounge"}"#)
            .create_async()
            .await;

        assert!(community(&server.url()).game().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn members_rejects_oversized_limits_before_any_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/communities/c1/members")
            .match_query(mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = community(&server.url()).members(101).await.unwrap_err();
        assert!(matches!(err, ArcadiaError::Validation { .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn members_returns_one_wrapper_per_element() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/communities/c1/members")
            .match_query(mockito::Matcher::UrlEncoded("limit".into(), "50".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"total": 2, "members": [
                    {"onlineId": "ren", "role": "owner"},
                    {"onlineId": "mika"}
                ]}"#,
            )
            .create_async()
            .await;

        let members = community(&server.url()).members(50).await.unwrap();
        assert_eq!(members.len(), 2);
    }

    #[tokio::test]
    async fn members_zero_results_is_an_empty_list() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/communities/c1/members")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"total": 0, "members": []}"#)
            .create_async()
            .await;

        assert!(community(&server.url()).members(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_background_color_writes_the_hex_string() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/communities/c1")
            .match_body(mockito::Matcher::PartialJson(json!({
                "backgroundColor": "1A2B3C"
            })))
            .with_status(204)
            .create_async()
            .await;

        community(&server.url()).set_background_color(0x1A2B3C).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn set_background_color_pads_small_values() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/communities/c1")
            .match_body(mockito::Matcher::PartialJson(json!({
                "backgroundColor": "0000FF"
            })))
            .with_status(204)
            .create_async()
            .await;

        community(&server.url()).set_background_color(0xFF).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn set_background_color_rejects_more_than_24_bits() {
        let server = mockito::Server::new_async().await;
        let err = community(&server.url())
            .set_background_color(0x01_00_00_00)
            .await
            .unwrap_err();
        assert!(matches!(err, ArcadiaError::Validation { .. }));
    }

    #[tokio::test]
    async fn set_background_image_rejects_non_jpeg_before_any_request() {
        let mut server = mockito::Server::new_async().await;
        let upload = server.mock("POST", "/uploads").expect(0).create_async().await;
        let write = server.mock("PUT", "/communities/c1").expect(0).create_async().await;

        let err = community(&server.url())
            .set_background_image(vec![0x89, 0x50, 0x4E, 0x47], "banner.png")
            .await
            .unwrap_err();
        assert!(matches!(err, ArcadiaError::Validation { .. }));
        upload.assert_async().await;
        write.assert_async().await;
    }

    #[tokio::test]
    async fn set_background_image_uploads_then_points_at_the_receipt() {
        let mut server = mockito::Server::new_async().await;
        let upload = server
            .mock("POST", "/uploads")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"sourceUrl": "https://media.arcadia.gg/u/bg-77.jpg"}"#)
            .create_async()
            .await;
        let write = server
            .mock("PUT", "/communities/c1")
            .match_body(mockito::Matcher::PartialJson(json!({
                "backgroundImageUrl": "https://media.arcadia.gg/u/bg-77.jpg"
            })))
            .with_status(204)
            .create_async()
            .await;

        community(&server.url())
            .set_background_image(vec![0xFF, 0xD8, 0xFF, 0xE0], "banner.jpg")
            .await
            .unwrap();
        upload.assert_async().await;
        write.assert_async().await;
    }

    #[tokio::test]
    async fn invite_needs_at_least_one_online_id() {
        let server = mockito::Server::new_async().await;
        let err = community(&server.url()).invite(&[]).await.unwrap_err();
        assert!(matches!(err, ArcadiaError::Validation { .. }));
    }

    #[tokio::test]
    async fn invite_posts_the_online_ids() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/communities/c1/invitations")
            .match_body(mockito::Matcher::PartialJson(json!({
                "onlineIds": ["ren", "mika"]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        community(&server.url()).invite(&["ren", "mika"]).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn set_name_validates_length() {
        let server = mockito::Server::new_async().await;
        let community = community(&server.url());
        assert!(matches!(
            community.set_name("").await.unwrap_err(),
            ArcadiaError::Validation { .. }
        ));
        assert!(matches!(
            community.set_name(&"x".repeat(65)).await.unwrap_err(),
            ArcadiaError::Validation { .. }
        ));
    }
}
