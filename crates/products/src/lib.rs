//! Products domain module.
//!
//! Items, reviews and the star-rating scale, implemented purely as
//! deterministic domain logic (no IO, no locking, no storage).

pub mod item;
pub mod ordering;
pub mod price;
pub mod rating;
pub mod review;

pub use item::{Item, ItemKey, ItemKind, DISCOUNT_RATE_PERCENT};
pub use price::Price;
pub use rating::{Rateable, Rating};
pub use review::Review;
