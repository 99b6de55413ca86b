//! Entity wrappers over the Arcadia services.
//!
//! Each wrapper holds a [`RestClient`](crate::rest::RestClient) and an
//! identifier, fetches its backing document lazily (at most once per
//! instance unless forced), and constructs sibling wrappers from
//! response fragments. Wrappers are created on demand and carry no
//! shared registry; two wrappers for the same remote id do not share a
//! cache.

mod community;
mod game;
mod message_thread;
mod session;
mod story;
mod thread;
mod user;

pub use community::Community;
pub use game::Game;
pub use message_thread::{Message, MessageThread};
pub use session::Session;
pub use story::Story;
pub use thread::CommunityThread;
pub use user::User;

use crate::error::{ArcadiaError, Result};

/// Largest page the list endpoints accept.
pub(crate) const MAX_PAGE_SIZE: u32 = 100;

pub(crate) fn check_page_size(limit: u32) -> Result<()> {
    if limit == 0 || limit > MAX_PAGE_SIZE {
        return Err(ArcadiaError::validation(format!(
            "limit must be between 1 and {MAX_PAGE_SIZE}, got {limit}"
        )));
    }
    Ok(())
}
