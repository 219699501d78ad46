use crate::{
    domain::{Bot, Cat, Item, ItemId, ItemKind, ItemPatch, NewItem},
    error::Result,
};
use async_trait::async_trait;

#[cfg(feature = "http-client")]
pub mod http;

#[cfg(feature = "http-client")]
pub use http::HttpApi;

/// The bot/cat REST backend the board reads from and mutates
///
/// Any non-success status must surface as `BoardError::Api`; a request that
/// never completes or cannot be decoded surfaces as a transport error.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Lists every bot (`GET /bot/`)
    async fn list_bots(&self) -> Result<Vec<Bot>>;

    /// Lists every cat (`GET /cat/`)
    async fn list_cats(&self) -> Result<Vec<Cat>>;

    /// Fetches one item (`GET /{kind}/{id}`)
    async fn get_item(&self, kind: ItemKind, id: &ItemId) -> Result<Item>;

    /// Creates an item (`POST /{kind}/`)
    async fn create_item(&self, item: &NewItem) -> Result<Item>;

    /// Applies a partial update (`PUT /{kind}/{id}`)
    async fn update_item(&self, kind: ItemKind, id: &ItemId, patch: &ItemPatch) -> Result<Item>;

    /// Deletes an item (`DELETE /{kind}/{id}`)
    async fn delete_item(&self, kind: ItemKind, id: &ItemId) -> Result<()>;
}
