//! Per-locale formatting profiles: message bundle, date style, currency style.

use shopfront_products::Price;

/// Locale used when a requested tag is not supported.
pub const BASELINE_LOCALE: &str = "en_US";

/// Keys of the fixed message templates every bundle provides.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Message {
    /// `{0}` name, `{1}` price, `{2}` stars, `{3}` best-before date.
    Product,
    /// `{0}` stars, `{1}` comment.
    Review,
    /// `{0}` name, `{1}` price, `{2}` stars.
    ReportItem,
    NoProduct,
    NoReview,
}

impl Message {
    pub fn key(self) -> &'static str {
        match self {
            Message::Product => "product",
            Message::Review => "review",
            Message::ReportItem => "report.item",
            Message::NoProduct => "no.product",
            Message::NoReview => "no.review",
        }
    }
}

/// Message templates of one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBundle {
    pub product: &'static str,
    pub review: &'static str,
    pub report_item: &'static str,
    pub no_product: &'static str,
    pub no_review: &'static str,
}

impl MessageBundle {
    pub fn get(&self, message: Message) -> &'static str {
        match message {
            Message::Product => self.product,
            Message::Review => self.review,
            Message::ReportItem => self.report_item,
            Message::NoProduct => self.no_product,
            Message::NoReview => self.no_review,
        }
    }
}

/// `chrono` format patterns of one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateStyle {
    pub date: &'static str,
    /// Used in report file names: no path separators, sub-second precision.
    pub file_stamp: &'static str,
}

/// Currency rendering of one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyStyle {
    pub symbol: &'static str,
    pub grouping: char,
    pub decimal: char,
}

impl CurrencyStyle {
    /// Render `price` as e.g. `$1,234.50`.
    pub fn format(&self, price: Price) -> String {
        let digits = price.units().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(self.grouping);
            }
            grouped.push(ch);
        }
        format!("{}{}{}{:02}", self.symbol, grouped, self.decimal, price.cents())
    }
}

/// Everything a formatter needs for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleProfile {
    pub tag: &'static str,
    pub messages: MessageBundle,
    pub date_style: DateStyle,
    pub currency_style: CurrencyStyle,
}

impl LocaleProfile {
    pub fn en_us() -> Self {
        Self {
            tag: "en_US",
            messages: MessageBundle {
                product: "{0}, Price: {1}, Rating: {2}, Best Before: {3}",
                review: "Review: {0}\t{1}",
                report_item: "Product Name: {0}\n Price: {1}\n Stars: {2}\n Reviews:",
                no_product: "No products found",
                no_review: "Not reviewed",
            },
            date_style: DateStyle {
                date: "%-m/%-d/%y",
                file_stamp: "%m-%d-%Y %I.%M.%S%.6f %p",
            },
            currency_style: CurrencyStyle {
                symbol: "$",
                grouping: ',',
                decimal: '.',
            },
        }
    }

    pub fn zh_us() -> Self {
        Self {
            tag: "zh_US",
            messages: MessageBundle {
                product: "{0}，价格：{1}，评分：{2}，保质期：{3}",
                review: "评论：{0}\t{1}",
                report_item: "产品名称：{0}\n 价格：{1}\n 星级：{2}\n 评论：",
                no_product: "没有找到产品",
                no_review: "暂无评论",
            },
            date_style: DateStyle {
                date: "%Y/%-m/%-d",
                file_stamp: "%Y-%m-%d %H.%M.%S%.6f",
            },
            currency_style: CurrencyStyle {
                symbol: "\u{00a5}",
                grouping: ',',
                decimal: '.',
            },
        }
    }

    /// All built-in profiles.
    pub fn builtin() -> Vec<Self> {
        vec![Self::en_us(), Self::zh_us()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands() {
        let style = LocaleProfile::en_us().currency_style;
        assert_eq!(style.format(Price::from_minor(120)), "$1.20");
        assert_eq!(style.format(Price::from_minor(123_456_789)), "$1,234,567.89");
        assert_eq!(style.format(Price::from_minor(100_000)), "$1,000.00");
        assert_eq!(style.format(Price::ZERO), "$0.00");
    }

    #[test]
    fn every_profile_defines_every_message() {
        let all = [
            Message::Product,
            Message::Review,
            Message::ReportItem,
            Message::NoProduct,
            Message::NoReview,
        ];
        for profile in LocaleProfile::builtin() {
            for message in all {
                assert!(!profile.messages.get(message).is_empty(), "{} {}", profile.tag, message.key());
            }
        }
    }

    #[test]
    fn file_stamps_are_path_safe() {
        for profile in LocaleProfile::builtin() {
            assert!(!profile.date_style.file_stamp.contains('/'));
            assert!(!profile.date_style.file_stamp.contains(':'));
        }
    }
}
