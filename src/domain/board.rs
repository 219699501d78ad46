use crate::domain::item::{Bot, Cat, Item, ItemId, ItemKind};
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A lane on the kanban board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnId {
    Todo,
    Progress,
    Done,
}

impl ColumnId {
    /// Board order, left to right
    pub const ALL: [ColumnId; 3] = [ColumnId::Todo, ColumnId::Progress, ColumnId::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Progress => "progress",
            Self::Done => "done",
        }
    }

    /// Header text shown above the column
    pub fn label(&self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::Progress => "In Progress",
            Self::Done => "Done",
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Todo => 0,
            Self::Progress => 1,
            Self::Done => 2,
        }
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for ColumnId {
    type Err = BoardError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "progress" => Ok(Self::Progress),
            "done" => Ok(Self::Done),
            _ => Err(BoardError::InvalidColumn(s.to_string())),
        }
    }
}

/// Result of dropping a card on a column
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    Moved {
        item: Item,
        from: ColumnId,
        to: ColumnId,
    },
    /// Dropped on the column it already sits in
    Unchanged,
}

/// Placement of every fetched item into the three lanes
///
/// Each item lives in exactly one column. Placement is client-side only
/// and is rebuilt from scratch on every load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Columns {
    lanes: [Vec<Item>; 3],
}

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spreads bots then cats round-robin over todo, progress, done
    ///
    /// Item `i` of the concatenation lands in `ColumnId::ALL[i % 3]`. The
    /// placement ignores item content entirely.
    ///
    /// # Examples
    /// ```
    /// use critter_board::domain::{Bot, Cat, ColumnId, Columns};
    ///
    /// let bots = vec![Bot::new("b1", "Robo"), Bot::new("b2", "Droid")];
    /// let cats = vec![Cat::new("c1", "Tama"), Cat::new("c2", "Mike")];
    ///
    /// let columns = Columns::distribute(&bots, &cats);
    /// assert_eq!(columns.get(ColumnId::Todo).len(), 2);
    /// assert_eq!(columns.get(ColumnId::Done)[0].name(), "Tama");
    /// ```
    pub fn distribute(bots: &[Bot], cats: &[Cat]) -> Self {
        let mut columns = Self::new();
        let all = bots
            .iter()
            .cloned()
            .map(Item::from)
            .chain(cats.iter().cloned().map(Item::from));

        for (index, item) in all.enumerate() {
            columns.lanes[index % 3].push(item);
        }
        columns
    }

    pub fn get(&self, column: ColumnId) -> &[Item] {
        &self.lanes[column.index()]
    }

    /// Iterates the columns in board order
    pub fn iter(&self) -> impl Iterator<Item = (ColumnId, &[Item])> {
        ColumnId::ALL
            .into_iter()
            .map(move |column| (column, self.get(column)))
    }

    /// Total number of cards on the board
    pub fn len(&self) -> usize {
        self.lanes.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-column card counts in board order
    pub fn counts(&self) -> [(ColumnId, usize); 3] {
        ColumnId::ALL.map(|column| (column, self.get(column).len()))
    }

    /// Finds the column and position holding an item
    pub fn locate(&self, id: &ItemId, kind: ItemKind) -> Option<(ColumnId, usize)> {
        self.iter().find_map(|(column, items)| {
            items
                .iter()
                .position(|item| item.is(id, kind))
                .map(|pos| (column, pos))
        })
    }

    /// Moves a card to the end of `to`
    pub fn move_item(
        &mut self,
        id: &ItemId,
        kind: ItemKind,
        to: ColumnId,
    ) -> Result<MoveOutcome> {
        let (from, pos) = self
            .locate(id, kind)
            .ok_or_else(|| BoardError::ItemNotFound(format!("{} {}", kind, id)))?;

        if from == to {
            return Ok(MoveOutcome::Unchanged);
        }

        let item = self.lanes[from.index()].remove(pos);
        self.lanes[to.index()].push(item.clone());
        Ok(MoveOutcome::Moved { item, from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bots(n: usize) -> Vec<Bot> {
        (0..n)
            .map(|i| Bot::new(format!("b{}", i), format!("Bot {}", i)))
            .collect()
    }

    fn cats(n: usize) -> Vec<Cat> {
        (0..n)
            .map(|i| Cat::new(format!("c{}", i), format!("Cat {}", i)))
            .collect()
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(|item| item.id().as_str()).collect()
    }

    #[test]
    fn test_column_parsing() {
        assert_eq!(ColumnId::from_str("todo").unwrap(), ColumnId::Todo);
        assert_eq!(ColumnId::from_str("Progress").unwrap(), ColumnId::Progress);
        assert!(ColumnId::from_str("review").is_err());
        assert_eq!(ColumnId::Progress.label(), "In Progress");
        assert_eq!(ColumnId::Done.as_str(), "done");
    }

    #[test]
    fn test_distribute_four_bots_two_cats() {
        let columns = Columns::distribute(&bots(4), &cats(2));

        assert_eq!(ids(columns.get(ColumnId::Todo)), vec!["b0", "b3"]);
        assert_eq!(ids(columns.get(ColumnId::Progress)), vec!["b1", "c0"]);
        assert_eq!(ids(columns.get(ColumnId::Done)), vec!["b2", "c1"]);
    }

    #[test]
    fn test_distribute_places_every_item_once() {
        let bots = bots(7);
        let cats = cats(5);
        let columns = Columns::distribute(&bots, &cats);

        assert_eq!(columns.len(), 12);
        for bot in &bots {
            let hits = columns
                .iter()
                .flat_map(|(_, items)| items)
                .filter(|item| item.is(&bot.id, ItemKind::Bot))
                .count();
            assert_eq!(hits, 1);
        }
        for (_, items) in columns.iter() {
            for item in items {
                let fetched = match item {
                    Item::Bot(b) => bots.contains(b),
                    Item::Cat(c) => cats.contains(c),
                };
                assert!(fetched);
            }
        }
    }

    #[test]
    fn test_distribute_empty() {
        let columns = Columns::distribute(&[], &[]);
        assert!(columns.is_empty());
        assert_eq!(
            columns.counts(),
            [(ColumnId::Todo, 0), (ColumnId::Progress, 0), (ColumnId::Done, 0)]
        );
    }

    #[test]
    fn test_move_to_other_column() {
        let mut columns = Columns::distribute(&bots(4), &cats(2));
        let before = columns.len();

        let outcome = columns
            .move_item(&ItemId::from("b0"), ItemKind::Bot, ColumnId::Done)
            .unwrap();

        match outcome {
            MoveOutcome::Moved { item, from, to } => {
                assert_eq!(item.name(), "Bot 0");
                assert_eq!(from, ColumnId::Todo);
                assert_eq!(to, ColumnId::Done);
            }
            MoveOutcome::Unchanged => panic!("expected a move"),
        }

        assert_eq!(columns.len(), before);
        assert_eq!(ids(columns.get(ColumnId::Todo)), vec!["b3"]);
        assert_eq!(ids(columns.get(ColumnId::Done)), vec!["b2", "c1", "b0"]);
    }

    #[test]
    fn test_move_to_same_column_is_noop() {
        let mut columns = Columns::distribute(&bots(4), &cats(2));
        let snapshot = columns.clone();

        let outcome = columns
            .move_item(&ItemId::from("b3"), ItemKind::Bot, ColumnId::Todo)
            .unwrap();

        assert_eq!(outcome, MoveOutcome::Unchanged);
        assert_eq!(columns, snapshot);
    }

    #[test]
    fn test_move_unknown_item() {
        let mut columns = Columns::distribute(&bots(2), &[]);
        let snapshot = columns.clone();

        // Right id, wrong kind
        let result = columns.move_item(&ItemId::from("b0"), ItemKind::Cat, ColumnId::Done);

        assert!(matches!(result, Err(BoardError::ItemNotFound(_))));
        assert_eq!(columns, snapshot);
    }

    #[test]
    fn test_locate() {
        let columns = Columns::distribute(&bots(1), &cats(2));
        assert_eq!(
            columns.locate(&ItemId::from("c1"), ItemKind::Cat),
            Some((ColumnId::Done, 0))
        );
        assert_eq!(columns.locate(&ItemId::from("c9"), ItemKind::Cat), None);
    }
}
