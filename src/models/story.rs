//! Activity-feed story view object.

use crate::models::Game;
use crate::types::StoryDocument;

/// One activity-feed entry, possibly a roll-up of several similar events.
#[derive(Debug, Clone)]
pub struct Story {
    doc: StoryDocument,
}

impl Story {
    pub(crate) fn new(doc: StoryDocument) -> Self {
        Self { doc }
    }

    pub fn id(&self) -> &str {
        &self.doc.story_id
    }

    pub fn story_type(&self) -> &str {
        &self.doc.story_type
    }

    pub fn caption(&self) -> Option<&str> {
        self.doc.caption.as_deref()
    }

    pub fn date(&self) -> &str {
        &self.doc.date
    }

    pub fn like_count(&self) -> u64 {
        self.doc.like_count
    }

    pub fn comment_count(&self) -> u64 {
        self.doc.comment_count
    }

    pub fn liked_by_me(&self) -> bool {
        self.doc.liked
    }

    /// The game title the event happened in, when there is one.
    pub fn game(&self) -> Option<Game> {
        self.doc.title_id.clone().map(Game::from_id)
    }

    /// The individual events rolled up into this entry; empty when the
    /// entry is a single event.
    pub fn condensed(&self) -> Vec<Story> {
        self.doc.condensed_stories.iter().cloned().map(Story::new).collect()
    }
}
