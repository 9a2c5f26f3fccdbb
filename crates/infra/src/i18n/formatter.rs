use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use once_cell::sync::Lazy;

use shopfront_products::{Item, Price, Rateable, Review};

use super::profile::{LocaleProfile, Message, BASELINE_LOCALE};
use super::template::fill;

/// Formatters for every supported locale, built once on first use.
static FORMATTERS: Lazy<Formatters> = Lazy::new(Formatters::builtin);

/// Renders items, reviews and notices for one locale.
///
/// Immutable: switching locale means picking another formatter, so a
/// formatter can be shared across threads freely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFormatter {
    profile: LocaleProfile,
}

impl ReportFormatter {
    pub fn new(profile: LocaleProfile) -> Self {
        Self { profile }
    }

    /// Shared formatter for `tag`, or the baseline one if `tag` is unsupported.
    pub fn for_locale(tag: &str) -> Arc<ReportFormatter> {
        FORMATTERS.get(tag)
    }

    /// Formatter for another locale; `self` is left untouched.
    pub fn with_locale(&self, tag: &str) -> Arc<ReportFormatter> {
        Self::for_locale(tag)
    }

    pub fn locale(&self) -> &'static str {
        self.profile.tag
    }

    /// Listing line for `item`, dated against the local calendar.
    pub fn render_item(&self, item: &Item) -> String {
        self.render_item_on(item, Local::now().date_naive())
    }

    pub fn render_item_on(&self, item: &Item, today: NaiveDate) -> String {
        let price = self.format_price(item.price());
        let best_before = item
            .best_before(today)
            .format(self.profile.date_style.date)
            .to_string();
        fill(
            self.text(Message::Product),
            &[item.name(), &price, item.rating().stars(), &best_before],
        )
    }

    pub fn render_review(&self, review: &Review) -> String {
        fill(
            self.text(Message::Review),
            &[review.rating().stars(), review.comment()],
        )
    }

    /// Report header block for `item` (name, price, stars).
    pub fn render_report_item(&self, item: &Item) -> String {
        let price = self.format_price(item.price());
        fill(
            self.text(Message::ReportItem),
            &[item.name(), &price, item.rating().stars()],
        )
    }

    pub fn text(&self, message: Message) -> &'static str {
        self.profile.messages.get(message)
    }

    pub fn format_price(&self, price: Price) -> String {
        self.profile.currency_style.format(price)
    }

    /// Timestamp for report file names.
    pub fn file_stamp<Tz>(&self, at: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: core::fmt::Display,
    {
        at.format(self.profile.date_style.file_stamp).to_string()
    }
}

/// Registry of precomputed formatters keyed by locale tag.
#[derive(Debug)]
pub struct Formatters {
    by_tag: HashMap<&'static str, Arc<ReportFormatter>>,
    baseline: Arc<ReportFormatter>,
}

impl Formatters {
    pub fn new(profiles: impl IntoIterator<Item = LocaleProfile>, baseline: LocaleProfile) -> Self {
        let baseline = Arc::new(ReportFormatter::new(baseline));
        let mut by_tag: HashMap<&'static str, Arc<ReportFormatter>> = profiles
            .into_iter()
            .map(|p| (p.tag, Arc::new(ReportFormatter::new(p))))
            .collect();
        by_tag
            .entry(baseline.locale())
            .or_insert_with(|| baseline.clone());
        Self { by_tag, baseline }
    }

    fn builtin() -> Self {
        Self::new(LocaleProfile::builtin(), LocaleProfile::en_us())
    }

    /// The process-wide registry.
    pub fn global() -> &'static Formatters {
        &FORMATTERS
    }

    pub fn get(&self, tag: &str) -> Arc<ReportFormatter> {
        match self.by_tag.get(tag) {
            Some(f) => f.clone(),
            None => {
                tracing::debug!(locale = tag, fallback = BASELINE_LOCALE, "unsupported locale");
                self.baseline.clone()
            }
        }
    }

    /// Supported tags, sorted.
    pub fn supported(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.by_tag.keys().copied().collect();
        tags.sort_unstable();
        tags
    }
}
