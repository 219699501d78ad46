pub mod board;
pub mod item;

pub use board::{ColumnId, Columns, MoveOutcome};
pub use item::{
    Bot, Cat, Item, ItemDraft, ItemId, ItemKind, ItemPatch, NewBot, NewCat, NewItem,
    DEFAULT_BOT_COLOR,
};
