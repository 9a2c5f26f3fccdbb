//! Reusable comparators and filters for catalog listings.
//!
//! Comparators compose with [`Ordering::then_with`]:
//!
//! ```
//! use shopfront_products::ordering::{by_price_desc, by_rating_desc};
//! # use shopfront_products::Item;
//! let cmp = |a: &Item, b: &Item| by_rating_desc(a, b).then_with(|| by_price_desc(a, b));
//! # let _ = cmp;
//! ```

use core::cmp::Ordering;

use crate::item::Item;
use crate::rating::Rateable;

/// Highest rating first.
pub fn by_rating_desc(a: &Item, b: &Item) -> Ordering {
    b.rating().cmp(&a.rating())
}

/// Most expensive first.
pub fn by_price_desc(a: &Item, b: &Item) -> Ordering {
    b.price().cmp(&a.price())
}

/// Ascending by id, then name; a total order over catalog keys.
pub fn by_key(a: &Item, b: &Item) -> Ordering {
    a.key().cmp(b.key())
}

/// Filter accepting items whose name does not contain `needle`.
pub fn name_excludes(needle: impl Into<String>) -> impl Fn(&Item) -> bool {
    let needle = needle.into();
    move |item| !item.name().contains(needle.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Price, Rating};
    use shopfront_core::ItemId;

    fn item(id: u32, name: &str, rating: Rating, price: u64) -> Item {
        Item::new(
            ItemId::new(id),
            name,
            Price::from_minor(price),
            rating,
            crate::ItemKind::Drink,
        )
    }

    #[test]
    fn rating_then_price_descending() {
        let mut items = vec![
            item(1, "A", Rating::ThreeStar, 500),
            item(2, "B", Rating::FiveStar, 100),
            item(3, "C", Rating::ThreeStar, 900),
        ];
        items.sort_by(|a, b| by_rating_desc(a, b).then_with(|| by_price_desc(a, b)));

        let names: Vec<_> = items.iter().map(Item::name).collect();
        assert_eq!(names, ["B", "C", "A"]);
    }

    #[test]
    fn name_filter_excludes_matches() {
        let keep = name_excludes("hey");
        assert!(keep(&item(1, "Cola", Rating::Null, 120)));
        assert!(!keep(&item(2, "heyday", Rating::Null, 120)));
    }
}
