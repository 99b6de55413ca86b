//! Live-session view object.

use crate::types::{SessionDocument, SessionKind};

/// An ephemeral live-activity record (a game or party the user is in),
/// built from a fragment fetched by [`User::sessions`](crate::User::sessions).
#[derive(Debug, Clone)]
pub struct Session {
    doc: SessionDocument,
}

impl Session {
    pub(crate) fn new(doc: SessionDocument) -> Self {
        Self { doc }
    }

    pub fn kind(&self) -> SessionKind {
        self.doc.kind
    }

    pub fn title_id(&self) -> Option<&str> {
        self.doc.title_id.as_deref()
    }

    pub fn title_name(&self) -> Option<&str> {
        self.doc.title_name.as_deref()
    }

    pub fn platform(&self) -> &str {
        &self.doc.platform
    }

    pub fn member_count(&self) -> u32 {
        self.doc.member_count
    }

    pub fn max_members(&self) -> u32 {
        self.doc.max_members
    }

    pub fn is_joinable(&self) -> bool {
        self.doc.joinable
    }

    pub fn is_full(&self) -> bool {
        self.doc.member_count >= self.doc.max_members
    }
}
