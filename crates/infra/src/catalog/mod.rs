//! The shared catalog: items, their reviews, and the derived ratings.
//!
//! Locking discipline:
//! - `entries` is one reader/writer lock over the whole mapping. Lookups and
//!   listings take it shared; inserts and reviews take it exclusively, and a
//!   review's append + rating recomputation + commit is a single critical
//!   section.
//! - Snapshots run on their own thread inside the [`SnapshotFile`] critical
//!   section, taking `entries` shared only long enough to copy it.
//! - File IO (reports, snapshots) never happens while `entries` is held.

pub mod report;
pub mod snapshot;

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use shopfront_core::{DomainError, DomainResult, ItemId};
use shopfront_products::{Item, ItemKey, Price, Rateable, Rating, Review};

use crate::config::CatalogConfig;
use crate::i18n::{Formatters, Message, ReportFormatter};

pub use report::ReportWriter;
pub use snapshot::{SnapshotError, SnapshotFile};

type EntryMap = HashMap<ItemKey, CatalogEntry>;

/// Process-wide catalog.
///
/// Created from [`CatalogConfig::from_env`] on first access and alive until
/// the process exits. There is deliberately no way to reset or replace it.
static GLOBAL: Lazy<Catalog> = Lazy::new(|| {
    let config = CatalogConfig::from_env();
    info!(snapshot = %config.snapshot_path.display(), locale = %config.locale, "initializing catalog");
    Catalog::new(config)
});

/// One item together with its reviews, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    item: Item,
    reviews: Vec<Review>,
}

impl CatalogEntry {
    fn new(item: Item) -> Self {
        Self {
            item,
            reviews: Vec::new(),
        }
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }
}

/// Thread-safe catalog of items and their reviews.
#[derive(Debug)]
pub struct Catalog {
    entries: Arc<RwLock<EntryMap>>,
    snapshots: Arc<SnapshotFile>,
    reports: ReportWriter,
    formatter: Arc<ReportFormatter>,
}

impl Catalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self::with_entries(config, HashMap::new())
    }

    /// A catalog seeded from the configured snapshot file (empty if the
    /// snapshot cannot be read).
    pub fn with_restored(config: CatalogConfig) -> Self {
        let entries = SnapshotFile::new(config.snapshot_path.clone()).restore();
        Self::with_entries(config, entries)
    }

    fn with_entries(config: CatalogConfig, entries: EntryMap) -> Self {
        Self {
            entries: Arc::new(RwLock::new(entries)),
            snapshots: Arc::new(SnapshotFile::new(config.snapshot_path.clone())),
            reports: ReportWriter::from_config(&config),
            formatter: ReportFormatter::for_locale(&config.locale),
        }
    }

    /// The process-wide instance.
    pub fn global() -> &'static Catalog {
        &GLOBAL
    }

    pub fn formatter(&self) -> &ReportFormatter {
        &self.formatter
    }

    pub fn supported_locales() -> Vec<&'static str> {
        Formatters::global().supported()
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, EntryMap>> {
        self.entries.read().map_err(|_| {
            error!("catalog lock poisoned");
            DomainError::unavailable("catalog lock poisoned")
        })
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, EntryMap>> {
        self.entries.write().map_err(|_| {
            error!("catalog lock poisoned");
            DomainError::unavailable("catalog lock poisoned")
        })
    }

    /// Insert `item` with no reviews unless an item with the same identity is
    /// already present.
    ///
    /// Returns whether the item was inserted; an existing identity is left
    /// untouched and still counts as success.
    pub fn add_item(&self, item: Item) -> DomainResult<bool> {
        let mut map = self.write()?;
        if map.contains_key(item.key()) {
            debug!(item = %item.key(), "item already in catalog");
            return Ok(false);
        }
        let key = item.key().clone();
        info!(item = %key, "item added");
        map.insert(key, CatalogEntry::new(item));
        Ok(true)
    }

    /// Build a food item and add it.
    pub fn create_food_item(
        &self,
        id: ItemId,
        name: impl Into<String>,
        price: Price,
        rating: Rating,
        best_before: NaiveDate,
    ) -> DomainResult<Item> {
        let item = Item::food(id, name, price, rating, best_before);
        self.add_item(item.clone())?;
        Ok(item)
    }

    /// First item with numeric id `id`.
    ///
    /// When several names share an id, which one is returned is unspecified.
    pub fn find_item(&self, id: ItemId) -> Option<Item> {
        let map = self.read().ok()?;
        let found = map.values().find(|e| e.item.item_id() == id).map(|e| e.item.clone());
        if found.is_none() {
            debug!(item_id = %id, "item not found");
        }
        found
    }

    /// Append a review to `item` and recompute its rating.
    ///
    /// The lookup, append, recomputation and commit happen under one write
    /// guard, so concurrent reviews of the same item are never lost and
    /// readers never see a review without its updated rating.
    pub fn add_review(
        &self,
        item: &Item,
        rating: Rating,
        comment: impl Into<String>,
    ) -> DomainResult<Item> {
        let review = Review::new(rating, comment);
        let mut map = self.write()?;

        let entry = map.get_mut(item.key()).ok_or_else(|| {
            warn!(item = %item.key(), "review for item not in catalog");
            DomainError::not_found(item.key().to_string())
        })?;

        entry.reviews.push(review);
        let mut updated = entry.item.clone();
        if let Err(e) = updated.apply_mean(entry.reviews.iter().map(Review::rating)) {
            entry.reviews.pop();
            error!(item = %item.key(), error = %e, "rating recomputation failed");
            return Err(e);
        }
        entry.item = updated;

        debug!(
            item = %item.key(),
            reviews = entry.reviews.len(),
            rating = ?entry.item.rating(),
            "review added"
        );
        Ok(entry.item.clone())
    }

    /// Like [`Catalog::add_review`], with the rating given as a star count.
    pub fn add_review_stars(
        &self,
        item: &Item,
        stars: i32,
        comment: impl Into<String>,
    ) -> DomainResult<Item> {
        let rating = Rating::from_star_count(stars).inspect_err(|e| {
            warn!(item = %item.key(), error = %e, "rejected review");
        })?;
        self.add_review(item, rating, comment)
    }

    /// Current entry for `key`.
    pub fn entry(&self, key: &ItemKey) -> Option<CatalogEntry> {
        self.read().ok()?.get(key).cloned()
    }

    pub fn reviews(&self, key: &ItemKey) -> Option<Vec<Review>> {
        self.read().ok()?.get(key).map(|e| e.reviews.clone())
    }

    pub fn len(&self) -> usize {
        self.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items ordered by `cmp` (stable) and then filtered by `filter`.
    ///
    /// Sorting and filtering run under one shared guard.
    pub fn list_items<F, C>(&self, filter: F, cmp: C) -> Vec<Item>
    where
        F: Fn(&Item) -> bool,
        C: FnMut(&Item, &Item) -> Ordering,
    {
        match self.read() {
            Ok(map) => sorted_filtered(&map, filter, cmp),
            Err(_) => Vec::new(),
        }
    }

    /// Rendered listing lines, or the single "no products" notice when the
    /// catalog is empty.
    ///
    /// The shared guard is held until every line has been rendered.
    pub fn print_items<F, C>(&self, filter: F, cmp: C) -> Vec<String>
    where
        F: Fn(&Item) -> bool,
        C: FnMut(&Item, &Item) -> Ordering,
    {
        let map = match self.read() {
            Ok(map) => map,
            Err(_) => return Vec::new(),
        };
        if map.is_empty() {
            return vec![self.formatter.text(Message::NoProduct).to_string()];
        }
        let today = Local::now().date_naive();
        sorted_filtered(&map, filter, cmp)
            .iter()
            .map(|item| self.formatter.render_item_on(item, today))
            .collect()
    }

    /// Report text for `items`, in the given order.
    ///
    /// Each item is read separately, so the text is not one consistent view
    /// across items. Items absent from the catalog render with the "no
    /// reviews" notice.
    pub fn render_report(&self, items: &[Item]) -> String {
        let mut out = String::new();
        for requested in items {
            let current = self.entry(requested.key());
            let item = current.as_ref().map(CatalogEntry::item).unwrap_or(requested);
            out.push_str(&self.formatter.render_report_item(item));
            out.push('\n');

            match current.as_ref().map(CatalogEntry::reviews) {
                Some(reviews) if !reviews.is_empty() => {
                    for review in reviews {
                        out.push_str(&self.formatter.render_review(review));
                        out.push('\n');
                    }
                }
                _ => {
                    out.push_str(self.formatter.text(Message::NoReview));
                    out.push('\n');
                }
            }
        }
        out
    }

    /// Render a report for `items` and write it to a fresh file.
    ///
    /// Returns the file path, or `None` (with the cause logged) when the file
    /// could not be written.
    pub fn build_report(&self, items: &[Item]) -> Option<PathBuf> {
        let text = self.render_report(items);
        let stamp = self.formatter.file_stamp(&Local::now());
        match self.reports.write(&text, &stamp) {
            Ok(path) => {
                info!(path = %path.display(), items = items.len(), "report saved");
                Some(path)
            }
            Err(e) => {
                error!(error = %e, "unable to write report");
                None
            }
        }
    }

    /// Persist a point-in-time copy of the catalog on a background thread.
    ///
    /// Returns immediately. Success or failure is logged; the returned handle
    /// may be dropped, or waited on to observe the outcome.
    pub fn snapshot(&self) -> SnapshotHandle {
        let entries = Arc::clone(&self.entries);
        let snapshots = Arc::clone(&self.snapshots);

        let spawned = thread::Builder::new()
            .name("catalog-snapshot".to_string())
            .spawn(move || match snapshots.save(&entries) {
                Ok(count) => {
                    info!(path = %snapshots.path().display(), items = count, "catalog snapshot saved");
                    Ok(count)
                }
                Err(e) => {
                    error!(path = %snapshots.path().display(), error = %e, "failed to save catalog snapshot");
                    Err(DomainError::from(e))
                }
            });

        match spawned {
            Ok(join) => SnapshotHandle { join: Some(join) },
            Err(e) => {
                error!(error = %e, "unable to start snapshot thread");
                SnapshotHandle { join: None }
            }
        }
    }

    /// Read the most recent snapshot; empty (with the cause logged) when it
    /// is missing or unreadable.
    pub fn restore(&self) -> HashMap<ItemKey, CatalogEntry> {
        self.snapshots.restore()
    }

    /// Total discount per rating, rendered in `locale`'s currency.
    pub fn discounts(&self, locale: &str) -> BTreeMap<Rating, String> {
        let formatter = self.formatter.with_locale(locale);
        let totals: BTreeMap<Rating, Price> = match self.read() {
            Ok(map) => map.values().fold(BTreeMap::new(), |mut acc, e| {
                let total = acc.entry(e.item.rating()).or_insert(Price::ZERO);
                *total = total.saturating_add(e.item.discount());
                acc
            }),
            Err(_) => BTreeMap::new(),
        };
        totals
            .into_iter()
            .map(|(rating, total)| (rating, formatter.format_price(total)))
            .collect()
    }
}

fn sorted_filtered<F, C>(map: &EntryMap, filter: F, mut cmp: C) -> Vec<Item>
where
    F: Fn(&Item) -> bool,
    C: FnMut(&Item, &Item) -> Ordering,
{
    let mut items: Vec<&Item> = map.values().map(|e| &e.item).collect();
    items.sort_by(|a, b| cmp(*a, *b));
    items.into_iter().filter(|i| filter(*i)).cloned().collect()
}

/// Outcome of a background snapshot.
#[derive(Debug)]
pub struct SnapshotHandle {
    join: Option<thread::JoinHandle<DomainResult<usize>>>,
}

impl SnapshotHandle {
    /// Block until the snapshot finishes; returns the number of items saved.
    pub fn wait(mut self) -> DomainResult<usize> {
        match self.join.take() {
            Some(join) => join
                .join()
                .unwrap_or_else(|_| Err(DomainError::unavailable("snapshot thread panicked"))),
            None => Err(DomainError::io("snapshot thread could not be started")),
        }
    }
}
