use crate::domain::{ColumnId, Columns, Item, ItemId, ItemKind};
use serde::Serialize;
use std::fmt::Write;

/// Rendering and prompting seam between the controller and the UI
///
/// The controller calls `render` after every state change that should be
/// visible. Implementations must not call back into the controller.
pub trait BoardView: Send {
    /// Called when a load starts
    fn show_loading(&mut self) {}

    /// Redraws every column from scratch
    fn render(&mut self, columns: &Columns);

    /// Asks the user a yes/no question
    fn confirm(&mut self, message: &str) -> bool;
}

/// Display model of a single card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: ItemId,
    pub kind: ItemKind,
    pub title: String,
    pub badge: &'static str,
    pub details: Vec<String>,
}

impl From<&Item> for Card {
    fn from(item: &Item) -> Self {
        let details = match item {
            Item::Bot(bot) => vec![format!("#{}", bot.color)],
            Item::Cat(cat) => {
                let mut details = Vec::new();
                if let Some(breed) = cat.breed.as_deref().filter(|b| !b.is_empty()) {
                    details.push(format!("Breed: {}", breed));
                }
                if let Some(age) = cat.age {
                    let unit = if age == 1 { "year" } else { "years" };
                    details.push(format!("Age: {} {}", age, unit));
                }
                if let Some(weight) = cat.weight {
                    details.push(format!("Weight: {} kg", weight));
                }
                details
            }
        };

        Self {
            id: item.id().clone(),
            kind: item.kind(),
            title: item.name().to_string(),
            badge: item.kind().label(),
            details,
        }
    }
}

/// Shown in place of cards when a column is empty
pub const EMPTY_COLUMN_TEXT: &str = "No items";

/// Renders the board as plain text, one section per column
pub fn render_text(columns: &Columns) -> String {
    let mut out = String::new();
    for (column, items) in columns.iter() {
        let _ = writeln!(out, "{} ({})", column.label(), items.len());
        if items.is_empty() {
            let _ = writeln!(out, "  {}", EMPTY_COLUMN_TEXT);
            continue;
        }
        for card in items.iter().map(Card::from) {
            let _ = writeln!(out, "  [{}] {}", card.badge, card.title);
            for detail in &card.details {
                let _ = writeln!(out, "    {}", detail);
            }
        }
    }
    out
}

/// Text-mode view, useful for terminals and logs
#[derive(Debug, Clone)]
pub struct TextView {
    output: String,
    loading: bool,
    confirm_answer: bool,
    renders: usize,
}

impl TextView {
    /// A view that answers every confirmation with `confirm_answer`
    pub fn new(confirm_answer: bool) -> Self {
        Self {
            output: String::new(),
            loading: false,
            confirm_answer,
            renders: 0,
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn render_count(&self) -> usize {
        self.renders
    }
}

impl Default for TextView {
    fn default() -> Self {
        Self::new(true)
    }
}

impl BoardView for TextView {
    fn show_loading(&mut self) {
        self.loading = true;
        self.output = ColumnId::ALL
            .iter()
            .map(|column| format!("{}\n  Loading...\n", column.label()))
            .collect();
    }

    fn render(&mut self, columns: &Columns) {
        self.loading = false;
        self.renders += 1;
        self.output = render_text(columns);
    }

    fn confirm(&mut self, _message: &str) -> bool {
        self.confirm_answer
    }
}
