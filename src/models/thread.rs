//! Community discussion-board view object.

use crate::types::{LatestPost, ThreadDocument};

/// A discussion board inside a community, built from a fragment fetched
/// by [`Community::threads`](crate::Community::threads).
#[derive(Debug, Clone)]
pub struct CommunityThread {
    doc: ThreadDocument,
}

impl CommunityThread {
    pub(crate) fn new(doc: ThreadDocument) -> Self {
        Self { doc }
    }

    pub fn id(&self) -> &str {
        &self.doc.id
    }

    pub fn title(&self) -> &str {
        &self.doc.title
    }

    pub fn post_count(&self) -> u64 {
        self.doc.post_count
    }

    pub fn latest_post(&self) -> Option<&LatestPost> {
        self.doc.latest_post.as_ref()
    }
}
