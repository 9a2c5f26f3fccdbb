use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shopfront_core::{Entity, ItemId};

use crate::price::Price;
use crate::rating::{Rateable, Rating};

/// Discount applied to every item, in percent of its price.
pub const DISCOUNT_RATE_PERCENT: u64 = 10;

/// Catalog identity of an item: id and name together.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemKey {
    pub id: ItemId,
    pub name: String,
}

impl ItemKey {
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl core::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{} {}", self.id, self.name)
    }
}

/// What sort of item this is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemKind {
    Food { best_before: NaiveDate },
    Drink,
}

/// A sellable item.
///
/// Equality and hashing only look at the [`ItemKey`]; price, rating and the
/// stock counter may change without changing which catalog entry this is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    key: ItemKey,
    price: Price,
    rating: Rating,
    counter: i64,
    kind: ItemKind,
}

impl Item {
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        price: Price,
        rating: Rating,
        kind: ItemKind,
    ) -> Self {
        Self {
            key: ItemKey::new(id, name),
            price,
            rating,
            counter: 0,
            kind,
        }
    }

    pub fn food(
        id: ItemId,
        name: impl Into<String>,
        price: Price,
        rating: Rating,
        best_before: NaiveDate,
    ) -> Self {
        Self::new(id, name, price, rating, ItemKind::Food { best_before })
    }

    /// An unrated drink.
    pub fn drink(id: ItemId, name: impl Into<String>, price: Price) -> Self {
        Self::new(id, name, price, Rating::Null, ItemKind::Drink)
    }

    pub fn key(&self) -> &ItemKey {
        &self.key
    }

    pub fn item_id(&self) -> ItemId {
        self.key.id
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn set_price(&mut self, price: Price) {
        self.price = price;
    }

    pub fn counter(&self) -> i64 {
        self.counter
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    /// Best-before date; drinks do not carry one and report `today`.
    pub fn best_before(&self, today: NaiveDate) -> NaiveDate {
        match self.kind {
            ItemKind::Food { best_before } => best_before,
            ItemKind::Drink => today,
        }
    }

    pub fn discount(&self) -> Price {
        self.price.percent(DISCOUNT_RATE_PERCENT)
    }

    /// Record one unit sold.
    pub fn sell(&mut self) -> bool {
        self.counter -= 1;
        tracing::debug!(item = %self.key, counter = self.counter, "item sold");
        true
    }

    /// Record one unit produced.
    pub fn produce(&mut self) -> bool {
        self.counter += 1;
        tracing::debug!(item = %self.key, counter = self.counter, "item produced");
        true
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Item {}

impl core::hash::Hash for Item {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl Entity for Item {
    type Id = ItemKey;

    fn id(&self) -> &Self::Id {
        &self.key
    }
}

impl Rateable for Item {
    fn rating(&self) -> Rating {
        self.rating
    }

    fn apply_rating(&mut self, rating: Rating) {
        self.rating = rating;
    }
}
