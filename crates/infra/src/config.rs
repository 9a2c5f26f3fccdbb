//! Configuration loading and representation.

use std::path::PathBuf;

use crate::i18n::BASELINE_LOCALE;

pub const ENV_USER_NAME: &str = "SHOPFRONT_USER_NAME";
pub const ENV_REPORT_FILE: &str = "SHOPFRONT_REPORT_FILE";
pub const ENV_SNAPSHOT_PATH: &str = "SHOPFRONT_SNAPSHOT_PATH";
pub const ENV_LOCALE: &str = "SHOPFRONT_LOCALE";

const DEFAULT_USER_NAME: &str = "shop user";
const DEFAULT_REPORT_FILE: &str = "report_{0}_{1}.txt";
const DEFAULT_SNAPSHOT_PATH: &str = "progress_products.json";

/// Catalog settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Name substituted into report file names.
    pub user_name: String,
    /// Report path template: `{0}` is the user name, `{1}` the timestamp.
    pub report_file_template: String,
    /// Where snapshots are written and restored from.
    pub snapshot_path: PathBuf,
    /// Locale tag for listings and reports.
    pub locale: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            user_name: DEFAULT_USER_NAME.to_string(),
            report_file_template: DEFAULT_REPORT_FILE.to_string(),
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            locale: BASELINE_LOCALE.to_string(),
        }
    }
}

impl CatalogConfig {
    /// Read settings from the environment, defaulting (with a warning) any
    /// variable that is unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`CatalogConfig::from_env`] but reading through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let read = |key: &str, default: String| {
            lookup(key).filter(|v| !v.trim().is_empty()).unwrap_or_else(|| {
                tracing::warn!(variable = key, default = %default, "not set; using default");
                default
            })
        };

        Self {
            user_name: read(ENV_USER_NAME, defaults.user_name),
            report_file_template: read(ENV_REPORT_FILE, defaults.report_file_template),
            snapshot_path: PathBuf::from(read(
                ENV_SNAPSHOT_PATH,
                defaults.snapshot_path.to_string_lossy().into_owned(),
            )),
            locale: read(ENV_LOCALE, defaults.locale),
        }
    }

    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = user_name.into();
        self
    }

    pub fn with_report_file_template(mut self, template: impl Into<String>) -> Self {
        self.report_file_template = template.into();
        self
    }

    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn unset_variables_fall_back_to_defaults() {
        let config = CatalogConfig::from_lookup(|_| None);
        assert_eq!(config, CatalogConfig::default());
        assert_eq!(config.report_file_template, "report_{0}_{1}.txt");
    }

    #[test]
    fn reads_every_variable() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_USER_NAME, "Ada Lovelace"),
            (ENV_REPORT_FILE, "/tmp/r_{0}_{1}.txt"),
            (ENV_SNAPSHOT_PATH, "/tmp/snap.json"),
            (ENV_LOCALE, "zh_US"),
        ]);
        let config = CatalogConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.user_name, "Ada Lovelace");
        assert_eq!(config.report_file_template, "/tmp/r_{0}_{1}.txt");
        assert_eq!(config.snapshot_path, PathBuf::from("/tmp/snap.json"));
        assert_eq!(config.locale, "zh_US");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = CatalogConfig::from_lookup(|k| (k == ENV_USER_NAME).then(|| "  ".to_string()));
        assert_eq!(config.user_name, "shop user");
    }
}
