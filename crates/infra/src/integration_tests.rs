//! Concurrency tests for the shared catalog.
//!
//! Verifies:
//! - Concurrent reviews of one item are never lost
//! - Readers never observe a partially constructed entry
//! - Snapshots taken under write load are internally consistent

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    use shopfront_core::ItemId;
    use shopfront_products::ordering::by_key;
    use shopfront_products::{Item, Price, Rateable, Rating, Review};
    use tempfile::{tempdir, TempDir};

    use crate::catalog::Catalog;
    use crate::config::CatalogConfig;

    fn setup() -> (TempDir, Arc<Catalog>) {
        shopfront_observability::init();
        let dir = tempdir().unwrap();
        let catalog = Catalog::new(
            CatalogConfig::default()
                .with_user_name("Load Test")
                .with_snapshot_path(dir.path().join("snapshot.json"))
                .with_report_file_template(format!("{}/report_{{0}}_{{1}}.txt", dir.path().display())),
        );
        (dir, Arc::new(catalog))
    }

    fn drink(id: u32, name: &str) -> Item {
        Item::drink(ItemId::new(id), name, Price::from_minor(100 + u64::from(id)))
    }

    #[test]
    fn concurrent_reviews_of_one_item_are_all_kept() {
        const WRITERS: usize = 8;
        const PER_WRITER: usize = 50;

        let (_dir, catalog) = setup();
        let tea = drink(1, "Tea");
        catalog.add_item(tea.clone()).unwrap();

        let barrier = Arc::new(Barrier::new(WRITERS));
        let handles: Vec<_> = (0..WRITERS)
            .map(|w| {
                let catalog = catalog.clone();
                let barrier = barrier.clone();
                let tea = tea.clone();
                thread::spawn(move || {
                    barrier.wait();
                    for i in 0..PER_WRITER {
                        let stars = ((w + i) % 5 + 1) as i32;
                        catalog
                            .add_review_stars(&tea, stars, format!("writer {w} review {i}"))
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let entry = catalog.entry(tea.key()).unwrap();
        assert_eq!(entry.reviews().len(), WRITERS * PER_WRITER);

        // The committed rating agrees with the committed reviews.
        let expected = Rating::rounded_mean_ordinal(entry.reviews().iter().map(Review::rating));
        assert_eq!(i32::from(entry.item().rating().ordinal()), expected);
    }

    #[test]
    fn each_writers_reviews_keep_their_order() {
        let (_dir, catalog) = setup();
        let tea = drink(1, "Tea");
        catalog.add_item(tea.clone()).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|w| {
                let catalog = catalog.clone();
                let tea = tea.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        catalog.add_review(&tea, Rating::ThreeStar, format!("{w}:{i}")).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let reviews = catalog.reviews(tea.key()).unwrap();
        for w in 0..4 {
            let seen: Vec<usize> = reviews
                .iter()
                .filter_map(|r| r.comment().split_once(':'))
                .filter(|(writer, _)| *writer == w.to_string())
                .map(|(_, i)| i.parse().unwrap())
                .collect();
            assert_eq!(seen, (0..25).collect::<Vec<_>>());
        }
    }

    #[test]
    fn readers_never_see_partial_entries_while_items_are_added() {
        const READERS: usize = 4;
        const ITEMS: u32 = 200;

        let (_dir, catalog) = setup();
        catalog.add_item(drink(0, "Seed")).unwrap();
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..READERS)
            .map(|_| {
                let catalog = catalog.clone();
                let done = done.clone();
                thread::spawn(move || {
                    let mut observations = 0usize;
                    while !done.load(Ordering::Acquire) {
                        for item in catalog.list_items(|_| true, by_key) {
                            let entry = catalog
                                .entry(item.key())
                                .expect("listed item must have an entry");
                            if entry.reviews().is_empty() {
                                assert_eq!(entry.item().rating(), Rating::Null);
                            }
                            observations += 1;
                        }
                    }
                    observations
                })
            })
            .collect();

        let writer = {
            let catalog = catalog.clone();
            thread::spawn(move || {
                for id in 1..=ITEMS {
                    let item = drink(id, "Cola");
                    catalog.add_item(item.clone()).unwrap();
                    if id % 3 == 0 {
                        catalog.add_review(&item, Rating::FourStar, "fizzy").unwrap();
                    }
                }
            })
        };

        writer.join().unwrap();
        done.store(true, Ordering::Release);
        for r in readers {
            assert!(r.join().unwrap() > 0);
        }
        assert_eq!(catalog.len(), ITEMS as usize + 1);
    }

    #[test]
    fn snapshot_under_write_load_is_consistent() {
        let (_dir, catalog) = setup();
        for id in 0..20 {
            catalog.add_item(drink(id, "Juice")).unwrap();
        }

        let writer = {
            let catalog = catalog.clone();
            thread::spawn(move || {
                for round in 0..50 {
                    for id in 0..20 {
                        let rating = if (round + id) % 2 == 0 { Rating::FiveStar } else { Rating::TwoStar };
                        catalog.add_review(&drink(id, "Juice"), rating, "r").unwrap();
                    }
                }
            })
        };

        let handles: Vec<_> = (0..5).map(|_| catalog.snapshot()).collect();
        for h in handles {
            assert_eq!(h.wait().unwrap(), 20);
        }
        writer.join().unwrap();

        // Whatever point in time was captured, every entry satisfies the
        // rating invariant on its own.
        let restored = catalog.restore();
        assert_eq!(restored.len(), 20);
        for entry in restored.values() {
            let mut current = entry.item().clone();
            let expected = current
                .apply_mean(entry.reviews().iter().map(Review::rating))
                .unwrap();
            assert_eq!(entry.item().rating(), expected);
        }
    }

    #[test]
    fn concurrent_reports_never_share_a_file() {
        let (_dir, catalog) = setup();
        let tea = drink(1, "Tea");
        catalog.add_item(tea.clone()).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let catalog = catalog.clone();
                let tea = tea.clone();
                thread::spawn(move || catalog.build_report(&[tea]).unwrap())
            })
            .collect();
        let mut paths: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 8);
    }
}
