//! Messaging-thread wrapper: membership, history, and message push.

use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};

use crate::error::{ArcadiaError, Result};
use crate::rest::{RestClient, Service};
use crate::types::{MessageDocument, MessageKind, MessagesDocument, MessageThreadDocument};

/// Largest message batch the history endpoint accepts.
const MAX_MESSAGE_BATCH: u32 = 200;

/// A messaging conversation, built from a fragment fetched by
/// [`User::message_threads`](crate::User::message_threads).
///
/// Sends go out as multipart posts: a JSON event part
/// (`messageEventDetail`) declaring the purpose, plus the binary payload
/// for image and audio messages.
pub struct MessageThread {
    rest: RestClient,
    doc: MessageThreadDocument,
}

impl MessageThread {
    pub(crate) fn new(rest: RestClient, doc: MessageThreadDocument) -> Self {
        Self { rest, doc }
    }

    pub fn thread_id(&self) -> &str {
        &self.doc.thread_id
    }

    pub fn name(&self) -> Option<&str> {
        self.doc.name.as_deref()
    }

    pub fn members(&self) -> Vec<&str> {
        self.doc.members.iter().map(|m| m.online_id.as_str()).collect()
    }

    pub fn member_count(&self) -> usize {
        self.doc.members.len()
    }

    pub fn modified_date(&self) -> Option<&str> {
        self.doc.modified_date.as_deref()
    }

    // ── History ───────────────────────────────────────────────────────────────

    /// The most recent `count` messages, newest first.
    pub async fn messages(&self, count: u32) -> Result<Vec<Message>> {
        if count == 0 || count > MAX_MESSAGE_BATCH {
            return Err(ArcadiaError::validation(format!(
                "count must be between 1 and {MAX_MESSAGE_BATCH}, got {count}"
            )));
        }
        let doc: MessagesDocument = self
            .rest
            .get(
                Service::Messaging,
                &format!("/threads/{}/messages?count={count}", self.doc.thread_id),
            )
            .await?;
        Ok(doc.messages.into_iter().map(Message::new).collect())
    }

    // ── Message push ──────────────────────────────────────────────────────────

    pub async fn send_text(&self, body: &str) -> Result<()> {
        let event = json!({ "eventCategory": "textMessage", "body": body });
        let form = Form::new().part(
            "messageEventDetail",
            Part::text(event.to_string()).mime_str("application/json")?,
        );
        self.post_message(form).await
    }

    /// Push a JPEG image into the thread. Anything but a JPEG is rejected
    /// before a request is made.
    pub async fn send_image(&self, bytes: Vec<u8>, filename: &str) -> Result<()> {
        let mime = mime_guess::from_path(filename).first_or_octet_stream();
        if mime != mime_guess::mime::IMAGE_JPEG {
            return Err(ArcadiaError::validation(format!(
                "image messages must be JPEG, got {mime}"
            )));
        }
        let event = json!({ "eventCategory": "imageData" });
        let form = Form::new()
            .part(
                "messageEventDetail",
                Part::text(event.to_string()).mime_str("application/json")?,
            )
            .part(
                "imageData",
                Part::bytes(bytes).file_name(filename.to_owned()).mime_str("image/jpeg")?,
            );
        self.post_message(form).await
    }

    /// Push a voice clip. The network only takes 3GPP audio.
    pub async fn send_audio(&self, bytes: Vec<u8>, filename: &str) -> Result<()> {
        let ext = std::path::Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if !matches!(ext.as_deref(), Some("3gp" | "3gpp")) {
            return Err(ArcadiaError::validation(
                "audio messages must be 3GPP (.3gp) clips",
            ));
        }
        let event = json!({ "eventCategory": "audioData" });
        let form = Form::new()
            .part(
                "messageEventDetail",
                Part::text(event.to_string()).mime_str("application/json")?,
            )
            .part(
                "audioData",
                Part::bytes(bytes).file_name(filename.to_owned()).mime_str("audio/3gpp")?,
            );
        self.post_message(form).await
    }

    async fn post_message(&self, form: Form) -> Result<()> {
        self.rest
            .post_multipart::<Value>(
                Service::Messaging,
                &format!("/threads/{}/messages", self.doc.thread_id),
                form,
            )
            .await?;
        Ok(())
    }

    // ── Thread management ─────────────────────────────────────────────────────

    pub async fn set_name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(ArcadiaError::validation("thread name must not be empty"));
        }
        self.rest
            .put::<Value>(
                Service::Messaging,
                &format!("/threads/{}/name", self.doc.thread_id),
                &json!({ "name": name }),
            )
            .await?;
        Ok(())
    }

    pub async fn favorite(&self, flag: bool) -> Result<()> {
        self.rest
            .put::<Value>(
                Service::Messaging,
                &format!("/threads/{}/favorite", self.doc.thread_id),
                &json!({ "favorite": flag }),
            )
            .await?;
        Ok(())
    }

    /// Remove the authenticated account from the thread.
    pub async fn leave(&self) -> Result<()> {
        self.rest
            .delete(
                Service::Messaging,
                &format!("/threads/{}/users/me", self.doc.thread_id),
            )
            .await
    }
}

/// One message in a thread's history.
#[derive(Debug, Clone)]
pub struct Message {
    doc: MessageDocument,
}

impl Message {
    pub(crate) fn new(doc: MessageDocument) -> Self {
        Self { doc }
    }

    pub fn id(&self) -> &str {
        &self.doc.message_id
    }

    pub fn sender(&self) -> &str {
        &self.doc.sender_online_id
    }

    pub fn body(&self) -> Option<&str> {
        self.doc.body.as_deref()
    }

    pub fn kind(&self) -> MessageKind {
        self.doc.kind
    }

    pub fn date(&self) -> &str {
        &self.doc.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::Endpoints;
    use crate::types::ThreadMember;

    fn thread(base: &str) -> MessageThread {
        let rest = RestClient::new("test-token", Endpoints::single_host(base)).unwrap();
        MessageThread::new(
            rest,
            MessageThreadDocument {
                thread_id: "t1".into(),
                name: Some("raid night".into()),
                members: vec![
                    ThreadMember { online_id: "me".into() },
                    ThreadMember { online_id: "ren".into() },
                ],
                modified_date: None,
            },
        )
    }

    #[tokio::test]
    async fn send_text_posts_a_multipart_event() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/threads/t1/messages")
            .match_body(mockito::Matcher::Regex(r#""body":"on my way""#.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        thread(&server.url()).send_text("on my way").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn send_image_rejects_non_jpeg_before_any_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/threads/t1/messages")
            .expect(0)
            .create_async()
            .await;

        let err = thread(&server.url())
            .send_image(vec![0x89, 0x50, 0x4E, 0x47], "screenshot.png")
            .await
            .unwrap_err();
        assert!(matches!(err, ArcadiaError::Validation { .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn send_image_accepts_jpeg() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/threads/t1/messages")
            .match_body(mockito::Matcher::Regex(r#""eventCategory":"imageData""#.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        thread(&server.url())
            .send_image(vec![0xFF, 0xD8, 0xFF, 0xE0], "screenshot.jpg")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn send_audio_only_takes_3gpp_clips() {
        let server = mockito::Server::new_async().await;
        let err = thread(&server.url())
            .send_audio(vec![1, 2, 3], "clip.mp3")
            .await
            .unwrap_err();
        assert!(matches!(err, ArcadiaError::Validation { .. }));
    }

    #[tokio::test]
    async fn messages_validates_the_batch_size() {
        let server = mockito::Server::new_async().await;
        let t = thread(&server.url());
        assert!(matches!(t.messages(0).await.unwrap_err(), ArcadiaError::Validation { .. }));
        assert!(matches!(t.messages(201).await.unwrap_err(), ArcadiaError::Validation { .. }));
    }

    #[tokio::test]
    async fn messages_parse_the_history() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/threads/t1/messages")
            .match_query(mockito::Matcher::UrlEncoded("count".into(), "5".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"messages": [
                    {"messageId": "m2", "senderOnlineId": "ren", "body": "gg",
                     "kind": "text", "date": "2025-11-02T18:05:00Z"},
                    {"messageId": "m1", "senderOnlineId": "me",
                     "kind": "image", "date": "2025-11-02T18:00:00Z"}
                ]}"#,
            )
            .create_async()
            .await;

        let messages = thread(&server.url()).messages(5).await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].body(), Some("gg"));
        assert_eq!(messages[1].kind(), MessageKind::Image);
        assert!(messages[1].body().is_none());
    }

    #[tokio::test]
    async fn favorite_puts_the_flag() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/threads/t1/favorite")
            .match_body(mockito::Matcher::PartialJson(json!({ "favorite": true })))
            .with_status(204)
            .create_async()
            .await;

        thread(&server.url()).favorite(true).await.unwrap();
        mock.assert_async().await;
    }
}
