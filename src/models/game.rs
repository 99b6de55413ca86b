//! Game-title view object.

use crate::types::GameTitle;

/// A game title, built from a title id or a title fragment a parent call
/// fetched. Detail accessors return `None` when only the id is known.
#[derive(Debug, Clone)]
pub struct Game {
    title_id: String,
    detail: Option<GameTitle>,
}

impl Game {
    pub(crate) fn from_id(title_id: String) -> Self {
        Self { title_id, detail: None }
    }

    pub(crate) fn from_title(title: GameTitle) -> Self {
        Self { title_id: title.title_id.clone(), detail: Some(title) }
    }

    pub fn title_id(&self) -> &str {
        &self.title_id
    }

    pub fn name(&self) -> Option<&str> {
        self.detail.as_ref().and_then(|t| t.name.as_deref())
    }

    pub fn image_url(&self) -> Option<&str> {
        self.detail.as_ref().and_then(|t| t.image_url.as_deref())
    }

    pub fn play_duration(&self) -> Option<&str> {
        self.detail.as_ref().and_then(|t| t.play_duration.as_deref())
    }

    pub fn last_played(&self) -> Option<&str> {
        self.detail.as_ref().and_then(|t| t.last_played.as_deref())
    }
}
