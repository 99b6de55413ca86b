//! Arcadia SDK for Rust.
//!
//! Thin async wrappers over the Arcadia network's REST services:
//! profiles, communities, live sessions, messaging, and the activity
//! feed. Each entity wrapper fetches its backing document at most once
//! per instance; pass `force = true` to refetch.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use arcadia_sdk::{ArcadiaClient, Endpoints};
//!
//! #[tokio::main]
//! async fn main() -> arcadia_sdk::Result<()> {
//!     let client = ArcadiaClient::new("my-bearer-token", Endpoints::default())?;
//!
//!     let me = client.me();
//!     println!("signed in as {}", me.online_id().await?);
//!
//!     let friends = me.friends(32, None).await?;
//!     for friend in &friends.items {
//!         println!("  {}", friend.online_id().await?);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod page;
pub mod rest;
pub mod types;

mod cache;

pub use client::ArcadiaClient;
pub use error::{ArcadiaError, Result};
pub use models::{Community, CommunityThread, Game, Message, MessageThread, Session, Story, User};
pub use page::Page;
pub use rest::{Endpoints, RestClient};
pub use types::*;
