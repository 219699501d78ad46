use crate::{
    api::RemoteApi,
    config::ClientConfig,
    domain::{Bot, Cat, Item, ItemId, ItemKind, ItemPatch, NewItem},
    error::{BoardError, Result},
};
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// `RemoteApi` over HTTP with JSON bodies
#[derive(Debug, Clone)]
pub struct HttpApi {
    http: Client,
    base: Url,
}

impl HttpApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Self::with_client(http, &config.api_base)
    }

    pub fn with_client(http: Client, api_base: &str) -> Result<Self> {
        let base = Url::parse(api_base.trim_end_matches('/')).map_err(|err| {
            BoardError::ConfigError(format!("invalid api_base '{}': {}", api_base, err))
        })?;
        if base.cannot_be_a_base() {
            return Err(BoardError::ConfigError(format!(
                "api_base '{}' cannot hold resource paths",
                api_base
            )));
        }
        Ok(Self { http, base })
    }

    pub fn base(&self) -> &str {
        self.base.as_str()
    }

    /// Appends path segments to the base, percent-encoding each one whole
    fn url_with(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn collection_url(&self, kind: ItemKind) -> Url {
        self.url_with(&[kind.path_segment(), ""])
    }

    fn item_url(&self, kind: ItemKind, id: &ItemId) -> Url {
        self.url_with(&[kind.path_segment(), id.as_str()])
    }

    async fn list<T: DeserializeOwned>(&self, kind: ItemKind) -> Result<Vec<T>> {
        let url = self.collection_url(kind);
        debug!(%url, "GET");
        let response = ensure_success(self.http.get(url.clone()).send().await?).await?;

        let mut body: Value = response.json().await?;
        match body.get_mut(kind.collection_key()).map(Value::take) {
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(items) => Ok(serde_json::from_value(items)?),
        }
    }

    async fn decode_item(kind: ItemKind, response: Response) -> Result<Item> {
        Ok(match kind {
            ItemKind::Bot => Item::Bot(response.json::<Bot>().await?),
            ItemKind::Cat => Item::Cat(response.json::<Cat>().await?),
        })
    }
}

/// Turns any non-2xx response into `BoardError::Api`, keeping the backend's
/// `detail` message when it sent one
async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().to_string();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("detail").cloned())
        .map(|detail| match detail {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    warn!(%url, status = status.as_u16(), %message, "request rejected");
    Err(BoardError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RemoteApi for HttpApi {
    async fn list_bots(&self) -> Result<Vec<Bot>> {
        self.list(ItemKind::Bot).await
    }

    async fn list_cats(&self) -> Result<Vec<Cat>> {
        self.list(ItemKind::Cat).await
    }

    async fn get_item(&self, kind: ItemKind, id: &ItemId) -> Result<Item> {
        let url = self.item_url(kind, id);
        debug!(%url, "GET");
        let response = ensure_success(self.http.get(url.clone()).send().await?).await?;
        Self::decode_item(kind, response).await
    }

    async fn create_item(&self, item: &NewItem) -> Result<Item> {
        let kind = item.kind();
        let url = self.collection_url(kind);
        debug!(%url, name = item.name(), "POST");
        let response = ensure_success(self.http.post(url.clone()).json(item).send().await?).await?;
        Self::decode_item(kind, response).await
    }

    async fn update_item(&self, kind: ItemKind, id: &ItemId, patch: &ItemPatch) -> Result<Item> {
        let url = self.item_url(kind, id);
        debug!(%url, "PUT");
        let response = ensure_success(self.http.put(url.clone()).json(patch).send().await?).await?;
        Self::decode_item(kind, response).await
    }

    async fn delete_item(&self, kind: ItemKind, id: &ItemId) -> Result<()> {
        let url = self.item_url(kind, id);
        debug!(%url, "DELETE");
        ensure_success(self.http.delete(url.clone()).send().await?).await?;
        Ok(())
    }
}
