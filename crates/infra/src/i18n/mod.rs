//! Locale-bound rendering of items, reviews and fixed notices.

pub mod formatter;
pub mod profile;
pub mod template;

pub use formatter::{Formatters, ReportFormatter};
pub use profile::{CurrencyStyle, DateStyle, LocaleProfile, Message, BASELINE_LOCALE};
pub use template::fill;
