//! # Critter Board
//!
//! Kanban board controller for the bot and cat resources of a REST backend.
//!
//! The crate fetches both collections, spreads them over three lanes, lets
//! the user drag cards between lanes, and submits create/update/delete
//! requests, reporting every outcome through transient notifications.
//! Rendering and confirmation prompts go through the [`BoardView`] trait,
//! and the backend sits behind [`RemoteApi`], so neither a UI toolkit nor
//! an HTTP stack is required to drive the board.

pub mod api;
pub mod config;
pub mod controller;
pub mod domain;
pub mod error;
pub mod notify;
pub mod view;

// Re-export commonly used types
#[cfg(feature = "http-client")]
pub use api::HttpApi;
pub use api::RemoteApi;
pub use config::{ClientConfig, NotificationTiming};
pub use controller::{BoardController, DeleteOutcome, ItemForm, LoadOutcome};
pub use domain::{
    board::{ColumnId, Columns, MoveOutcome},
    item::{Bot, Cat, Item, ItemDraft, ItemId, ItemKind},
};
pub use error::{BoardError, Result};
pub use notify::{Level, Notification, Notifier, Phase};
pub use view::{BoardView, Card, TextView};
