use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

use crate::error::{BoardError, Result};

/// Color given to a bot when the form leaves it blank
pub const DEFAULT_BOT_COLOR: &str = "C5E24A";

/// Server-assigned identifier of a bot or cat
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two resource types shown on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Bot,
    Cat,
}

impl ItemKind {
    pub const ALL: [ItemKind; 2] = [ItemKind::Bot, ItemKind::Cat];

    /// Path segment under the API base, e.g. `/bot/`
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Bot => "bot",
            Self::Cat => "cat",
        }
    }

    /// Key holding the collection in a list response
    pub fn collection_key(&self) -> &'static str {
        match self {
            Self::Bot => "bots",
            Self::Cat => "cats",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Bot => "Bot",
            Self::Cat => "Cat",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

impl FromStr for ItemKind {
    type Err = BoardError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bot" => Ok(Self::Bot),
            "cat" => Ok(Self::Cat),
            _ => Err(BoardError::InvalidItemKind(s.to_string())),
        }
    }
}

/// A bot as returned by `GET /bot/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bot {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_bot_color")]
    pub color: String,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Bot {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: default_bot_color(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// A cat as returned by `GET /cat/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cat {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Cat {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            breed: None,
            age: None,
            weight: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = Some(breed.into());
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }
}

/// A card on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Item {
    Bot(Bot),
    Cat(Cat),
}

impl Item {
    pub fn id(&self) -> &ItemId {
        match self {
            Self::Bot(bot) => &bot.id,
            Self::Cat(cat) => &cat.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Bot(bot) => &bot.name,
            Self::Cat(cat) => &cat.name,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Bot(_) => ItemKind::Bot,
            Self::Cat(_) => ItemKind::Cat,
        }
    }

    /// Bot and cat ids come from separate tables, so both must match
    pub fn is(&self, id: &ItemId, kind: ItemKind) -> bool {
        self.kind() == kind && self.id() == id
    }
}

impl From<Bot> for Item {
    fn from(bot: Bot) -> Self {
        Self::Bot(bot)
    }
}

impl From<Cat> for Item {
    fn from(cat: Cat) -> Self {
        Self::Cat(cat)
    }
}

/// Body of `POST /bot/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBot {
    pub name: String,
    pub color: String,
}

/// Body of `POST /cat/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCat {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Creatable fields of either kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NewItem {
    Bot(NewBot),
    Cat(NewCat),
}

impl NewItem {
    pub fn kind(&self) -> ItemKind {
        match self {
            Self::Bot(_) => ItemKind::Bot,
            Self::Cat(_) => ItemKind::Cat,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Bot(bot) => &bot.name,
            Self::Cat(cat) => &cat.name,
        }
    }
}

/// Body of `PUT /{kind}/{id}`; absent fields are left untouched server-side
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Raw text of the create/edit form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub color: String,
    pub breed: String,
    pub age: String,
    pub weight: String,
}

impl ItemDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Validates the draft into the payload for creating an item of `kind`
    pub fn to_new_item(&self, kind: ItemKind) -> Result<NewItem> {
        let name = non_empty(&self.name)
            .ok_or_else(|| BoardError::InvalidField {
                field: "name",
                reason: "name is required".to_string(),
            })?
            .to_string();

        match kind {
            ItemKind::Bot => Ok(NewItem::Bot(NewBot {
                name,
                color: normalize_color(&self.color)
                    .unwrap_or_else(|| DEFAULT_BOT_COLOR.to_string()),
            })),
            ItemKind::Cat => Ok(NewItem::Cat(NewCat {
                name,
                breed: non_empty(&self.breed).map(str::to_string),
                age: parse_age(&self.age)?,
                weight: parse_weight(&self.weight)?,
            })),
        }
    }

    /// Builds a partial update from the fields the user filled in
    pub fn to_patch(&self, kind: ItemKind) -> Result<ItemPatch> {
        let mut patch = ItemPatch {
            name: non_empty(&self.name).map(str::to_string),
            ..ItemPatch::default()
        };

        match kind {
            ItemKind::Bot => {
                patch.color = normalize_color(&self.color);
            }
            ItemKind::Cat => {
                patch.breed = non_empty(&self.breed).map(str::to_string);
                patch.age = parse_age(&self.age)?;
                patch.weight = parse_weight(&self.weight)?;
            }
        }

        if patch.is_empty() {
            return Err(BoardError::InvalidField {
                field: "draft",
                reason: "nothing to update".to_string(),
            });
        }
        Ok(patch)
    }
}

fn default_bot_color() -> String {
    DEFAULT_BOT_COLOR.to_string()
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn normalize_color(value: &str) -> Option<String> {
    non_empty(value)
        .map(|c| c.trim_start_matches('#'))
        .filter(|c| !c.is_empty())
        .map(str::to_uppercase)
}

fn parse_age(value: &str) -> Result<Option<u32>> {
    non_empty(value)
        .map(|raw| {
            raw.parse::<u32>().map_err(|_| BoardError::InvalidField {
                field: "age",
                reason: format!("'{}' is not a whole number of years", raw),
            })
        })
        .transpose()
}

fn parse_weight(value: &str) -> Result<Option<f64>> {
    non_empty(value)
        .map(|raw| match raw.parse::<f64>() {
            Ok(w) if w.is_finite() && w >= 0.0 => Ok(w),
            _ => Err(BoardError::InvalidField {
                field: "weight",
                reason: format!("'{}' is not a weight in kilograms", raw),
            }),
        })
        .transpose()
}

/// Accepts RFC 3339 as well as the zone-less timestamps the backend emits
fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_kind_parsing() {
        assert_eq!(ItemKind::from_str("bot").unwrap(), ItemKind::Bot);
        assert_eq!(ItemKind::from_str("CAT").unwrap(), ItemKind::Cat);
        assert_eq!(ItemKind::from_str(" Cat ").unwrap(), ItemKind::Cat);
        assert!(ItemKind::from_str("dog").is_err());
    }

    #[test]
    fn test_item_kind_paths() {
        assert_eq!(ItemKind::Bot.path_segment(), "bot");
        assert_eq!(ItemKind::Cat.collection_key(), "cats");
        assert_eq!(ItemKind::Cat.to_string(), "cat");
        assert_eq!(ItemKind::Bot.label(), "Bot");
    }

    #[test]
    fn test_item_matching_requires_kind() {
        let bot: Item = Bot::new("1", "Robo").into();
        assert!(bot.is(&ItemId::from("1"), ItemKind::Bot));
        assert!(!bot.is(&ItemId::from("1"), ItemKind::Cat));
        assert!(!bot.is(&ItemId::from("2"), ItemKind::Bot));
    }

    #[test]
    fn test_bot_draft_defaults_color() {
        let draft = ItemDraft::named("Robo");
        let new_item = draft.to_new_item(ItemKind::Bot).unwrap();

        assert_eq!(
            new_item,
            NewItem::Bot(NewBot {
                name: "Robo".to_string(),
                color: DEFAULT_BOT_COLOR.to_string(),
            })
        );
    }

    #[test]
    fn test_bot_draft_strips_hash_from_color() {
        let draft = ItemDraft {
            color: "#ff8800".to_string(),
            ..ItemDraft::named("Robo")
        };

        match draft.to_new_item(ItemKind::Bot).unwrap() {
            NewItem::Bot(bot) => assert_eq!(bot.color, "FF8800"),
            other => panic!("expected bot, got {:?}", other),
        }
    }

    #[test]
    fn test_draft_requires_name() {
        let draft = ItemDraft::named("   ");
        let err = draft.to_new_item(ItemKind::Cat).unwrap_err();
        assert!(matches!(err, BoardError::InvalidField { field: "name", .. }));
    }

    #[test]
    fn test_cat_draft_omits_blank_fields() {
        let draft = ItemDraft {
            breed: "".to_string(),
            age: "3".to_string(),
            weight: " ".to_string(),
            ..ItemDraft::named("Tama")
        };

        let new_item = draft.to_new_item(ItemKind::Cat).unwrap();
        let json = serde_json::to_value(&new_item).unwrap();

        assert_eq!(json, serde_json::json!({ "name": "Tama", "age": 3 }));
    }

    #[test]
    fn test_cat_draft_rejects_bad_numbers() {
        let bad_age = ItemDraft {
            age: "three".to_string(),
            ..ItemDraft::named("Tama")
        };
        assert!(matches!(
            bad_age.to_new_item(ItemKind::Cat),
            Err(BoardError::InvalidField { field: "age", .. })
        ));

        let negative_weight = ItemDraft {
            weight: "-1.5".to_string(),
            ..ItemDraft::named("Tama")
        };
        assert!(matches!(
            negative_weight.to_new_item(ItemKind::Cat),
            Err(BoardError::InvalidField { field: "weight", .. })
        ));
    }

    #[test]
    fn test_patch_only_carries_filled_fields() {
        let draft = ItemDraft {
            weight: "4.2".to_string(),
            ..ItemDraft::default()
        };

        let patch = draft.to_patch(ItemKind::Cat).unwrap();
        assert_eq!(patch.weight, Some(4.2));
        assert!(patch.name.is_none());
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            serde_json::json!({ "weight": 4.2 })
        );
    }

    #[test]
    fn test_empty_patch_is_rejected() {
        // Cat fields are ignored for bots
        let draft = ItemDraft {
            breed: "Siamese".to_string(),
            ..ItemDraft::default()
        };
        assert!(draft.to_patch(ItemKind::Bot).is_err());
    }

    #[test]
    fn test_bot_deserializes_backend_payload() {
        let json = r#"{
            "id": "b1",
            "name": "Robo",
            "color": "00FF00",
            "created_at": "2024-05-01T10:00:00.123456",
            "updated_at": "2024-05-02T10:00:00Z"
        }"#;

        let bot: Bot = serde_json::from_str(json).unwrap();
        assert_eq!(bot.id.as_str(), "b1");
        assert_eq!(bot.color, "00FF00");
        assert!(bot.created_at.is_some());
        assert!(bot.updated_at.is_some());
    }

    #[test]
    fn test_cat_deserializes_with_missing_optionals() {
        let json = r#"{ "id": "c1", "name": "Tama", "breed": null, "updated_at": null }"#;

        let cat: Cat = serde_json::from_str(json).unwrap();
        assert_eq!(cat.name, "Tama");
        assert!(cat.breed.is_none());
        assert!(cat.age.is_none());
        assert!(cat.updated_at.is_none());
    }

    #[test]
    fn test_item_serialization_is_tagged() {
        let item: Item = Cat::new("c1", "Tama").with_age(2).into();
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["type"], "cat");
        assert_eq!(json["age"], 2);

        let back: Item = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }
}
