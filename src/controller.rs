//! The board controller
//!
//! `BoardController` is a cloneable handle: construct it once at startup,
//! hand clones to UI callbacks, and call `start` to run the first load.
//! Column placement lives only in memory and is rebuilt on every load.

use crate::{
    api::RemoteApi,
    config::ClientConfig,
    domain::{Bot, Cat, ColumnId, Columns, Item, ItemDraft, ItemId, ItemKind, MoveOutcome},
    error::{BoardError, Result},
    notify::{Notification, Notifier},
    view::BoardView,
};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};
use tracing::{debug, error, info, warn};

pub const LOAD_FAILED: &str = "Failed to load data";
pub const CREATE_FAILED: &str = "Failed to create item";
pub const UPDATE_FAILED: &str = "Failed to update item";
pub const DELETE_FAILED: &str = "Failed to delete item";
pub const DELETED: &str = "Item deleted";
pub const DELETE_PROMPT: &str = "Delete this item?";

/// The create form currently open on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemForm {
    pub kind: ItemKind,
    pub draft: ItemDraft,
}

/// How a call to `load_data` ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Fresh collections were placed on the board
    Applied { bots: usize, cats: usize },
    /// A newer load started before this one finished; results were dropped
    Stale,
    /// Collections were placed on the board, but at least one request
    /// failed outright and its kind was left empty
    Partial { bots: usize, cats: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

#[derive(Debug, Default)]
struct BoardState {
    bots: Vec<Bot>,
    cats: Vec<Cat>,
    columns: Columns,
    form: Option<ItemForm>,
}

struct Inner {
    api: Arc<dyn RemoteApi>,
    view: Mutex<Box<dyn BoardView>>,
    state: Mutex<BoardState>,
    notifier: Notifier,
    generation: AtomicU64,
}

#[derive(Clone)]
pub struct BoardController {
    inner: Arc<Inner>,
}

impl BoardController {
    pub fn new(
        api: Arc<dyn RemoteApi>,
        view: impl BoardView + 'static,
        config: &ClientConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                api,
                view: Mutex::new(Box::new(view)),
                state: Mutex::new(BoardState::default()),
                notifier: Notifier::new(config.notifications.clone()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Builds a controller talking HTTP to `config.api_base`
    #[cfg(feature = "http-client")]
    pub fn connect(config: &ClientConfig, view: impl BoardView + 'static) -> Result<Self> {
        let api = crate::api::HttpApi::new(config)?;
        Ok(Self::new(Arc::new(api), view, config))
    }

    /// Runs the initial load
    pub async fn start(&self) -> LoadOutcome {
        self.load_data().await
    }

    /// Fetches both collections and rebuilds the board
    ///
    /// Each kind is applied on its own: a successful list replaces that
    /// collection and a failed one empties it. A transport failure on either
    /// request raises a single error banner after the board is rebuilt.
    pub async fn load_data(&self) -> LoadOutcome {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.view().show_loading();

        let (bots, cats) = tokio::join!(self.inner.api.list_bots(), self.inner.api.list_cats());

        let mut state = self.state();
        if self.inner.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding results of superseded load");
            return LoadOutcome::Stale;
        }

        let transport_failed = [bots.as_ref().err(), cats.as_ref().err()]
            .into_iter()
            .flatten()
            .any(|err| !err.is_api());

        state.bots = settle(ItemKind::Bot, bots);
        state.cats = settle(ItemKind::Cat, cats);
        state.columns = Columns::distribute(&state.bots, &state.cats);
        self.render_locked(&state);

        let (bot_count, cat_count) = (state.bots.len(), state.cats.len());
        drop(state);

        if transport_failed {
            error!(
                generation,
                bots = bot_count,
                cats = cat_count,
                "board loaded with failed requests"
            );
            self.inner.notifier.error(LOAD_FAILED);
            return LoadOutcome::Partial {
                bots: bot_count,
                cats: cat_count,
            };
        }

        info!(generation, bots = bot_count, cats = cat_count, "board loaded");
        LoadOutcome::Applied {
            bots: bot_count,
            cats: cat_count,
        }
    }

    /// Handles a card dropped on `to`
    ///
    /// Placement is local only; the next load discards it.
    pub fn move_card(&self, id: &ItemId, kind: ItemKind, to: ColumnId) -> Result<MoveOutcome> {
        let mut state = self.state();
        let outcome = state.columns.move_item(id, kind, to).map_err(|err| {
            warn!(error = %err, "dropped card is not on the board");
            err
        })?;

        if let MoveOutcome::Moved { item, from, to } = &outcome {
            debug!(id = %id, %from, %to, "card moved");
            self.render_locked(&state);
            drop(state);
            self.inner
                .notifier
                .success(format!("Moved {} to {}", item.name(), to.label()));
        }
        Ok(outcome)
    }

    /// Opens an empty create form for `kind`, discarding any previous input
    pub fn open_create_form(&self, kind: ItemKind) {
        self.state().form = Some(ItemForm {
            kind,
            draft: ItemDraft::default(),
        });
    }

    pub fn form(&self) -> Option<ItemForm> {
        self.state().form.clone()
    }

    /// Edits the draft of the open form
    pub fn update_form<F>(&self, edit: F) -> Result<()>
    where
        F: FnOnce(&mut ItemDraft),
    {
        let mut state = self.state();
        let form = state.form.as_mut().ok_or(BoardError::NoOpenForm)?;
        edit(&mut form.draft);
        Ok(())
    }

    pub fn close_form(&self) {
        self.state().form = None;
    }

    /// Submits the open form through `create_item`
    pub async fn submit_form(&self) -> Result<Item> {
        let form = self.form().ok_or(BoardError::NoOpenForm)?;
        self.create_item(form.kind, &form.draft).await
    }

    /// Creates an item and reloads the board
    ///
    /// On failure the form is left open and untouched, and nothing reloads.
    pub async fn create_item(&self, kind: ItemKind, draft: &ItemDraft) -> Result<Item> {
        let result = match draft.to_new_item(kind) {
            Ok(new_item) => self.inner.api.create_item(&new_item).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(item) => {
                info!(%kind, id = %item.id(), "item created");
                self.close_form();
                self.inner.notifier.success(format!("{} added", kind.label()));
                self.load_data().await;
                Ok(item)
            }
            Err(err) => {
                error!(%kind, error = %err, "failed to create item");
                self.inner.notifier.error(CREATE_FAILED);
                Err(err)
            }
        }
    }

    /// Applies the filled-in fields of `draft` to an existing item
    pub async fn update_item(
        &self,
        id: &ItemId,
        kind: ItemKind,
        draft: &ItemDraft,
    ) -> Result<Item> {
        let result = match draft.to_patch(kind) {
            Ok(patch) => self.inner.api.update_item(kind, id, &patch).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(item) => {
                info!(%kind, %id, "item updated");
                self.inner
                    .notifier
                    .success(format!("Updated {}", item.name()));
                self.load_data().await;
                Ok(item)
            }
            Err(err) => {
                error!(%kind, %id, error = %err, "failed to update item");
                self.inner.notifier.error(UPDATE_FAILED);
                Err(err)
            }
        }
    }

    /// Deletes an item after the user confirms
    pub async fn delete_item(&self, id: &ItemId, kind: ItemKind) -> Result<DeleteOutcome> {
        let confirmed = self.view().confirm(DELETE_PROMPT);
        if !confirmed {
            debug!(%kind, %id, "delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        match self.inner.api.delete_item(kind, id).await {
            Ok(()) => {
                info!(%kind, %id, "item deleted");
                self.inner.notifier.success(DELETED);
                self.load_data().await;
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => {
                error!(%kind, %id, error = %err, "failed to delete item");
                self.inner.notifier.error(DELETE_FAILED);
                Err(err)
            }
        }
    }

    /// Snapshot of the current placement
    pub fn columns(&self) -> Columns {
        self.state().columns.clone()
    }

    /// The last fetched collection of `kind`
    pub fn items(&self, kind: ItemKind) -> Vec<Item> {
        let state = self.state();
        match kind {
            ItemKind::Bot => state.bots.iter().cloned().map(Item::from).collect(),
            ItemKind::Cat => state.cats.iter().cloned().map(Item::from).collect(),
        }
    }

    /// Card count per column, for the column headers
    pub fn counts(&self) -> [(ColumnId, usize); 3] {
        self.state().columns.counts()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.inner.notifier.snapshot()
    }

    fn render_locked(&self, state: &BoardState) {
        self.view().render(&state.columns);
    }

    // Lock order is state, then view.
    fn state(&self) -> MutexGuard<'_, BoardState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn view(&self) -> MutexGuard<'_, Box<dyn BoardView>> {
        self.inner
            .view
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// A failed list request leaves that kind empty for this load
fn settle<T>(kind: ItemKind, result: Result<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|err| {
        warn!(%kind, error = %err, "list request failed, showing no items of this kind");
        Vec::new()
    })
}
