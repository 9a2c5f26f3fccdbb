//! Report files: one new file per report, named from a configured template.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use shopfront_core::{DomainError, DomainResult};

use crate::config::CatalogConfig;
use crate::i18n::fill;

/// Name suffixes tried before giving up on a colliding report path.
const MAX_ATTEMPTS: u32 = 100;

/// Makes a value safe to splice into a file name.
pub fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| match c {
            ' ' => '_',
            '/' | '\\' | ':' => '-',
            other => other,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportWriter {
    template: String,
    user_name: String,
}

impl ReportWriter {
    pub fn new(template: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            user_name: user_name.into(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.report_file_template.clone(), config.user_name.clone())
    }

    /// Report path for a timestamp already rendered by the formatter.
    pub fn path_for(&self, stamp: &str) -> PathBuf {
        PathBuf::from(fill(
            &self.template,
            &[&sanitize_segment(&self.user_name), &sanitize_segment(stamp)],
        ))
    }

    /// Write `text` to a file that did not exist before.
    ///
    /// If the stamped path is taken (two reports in the same instant), a
    /// `-N` suffix is appended to the stamp.
    pub fn write(&self, text: &str, stamp: &str) -> DomainResult<PathBuf> {
        for attempt in 0..MAX_ATTEMPTS {
            let path = match attempt {
                0 => self.path_for(stamp),
                n => self.path_for(&format!("{stamp}-{n}")),
            };

            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(DomainError::io(format!(
                        "cannot create report {}: {e}",
                        path.display()
                    )));
                }
            };
            file.write_all(text.as_bytes())
                .and_then(|_| file.flush())
                .map_err(|e| DomainError::io(format!("cannot write report {}: {e}", path.display())))?;
            return Ok(path);
        }
        Err(DomainError::io(format!(
            "no free report path for stamp {stamp:?} after {MAX_ATTEMPTS} attempts"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn writer_in(dir: &std::path::Path) -> ReportWriter {
        ReportWriter::new(
            format!("{}/report_{{0}}_{{1}}.txt", dir.display()),
            "Ada Lovelace",
        )
    }

    #[test]
    fn sanitizes_spaces_and_separators() {
        assert_eq!(sanitize_segment("10/19/26, 3:04 PM"), "10-19-26,_3-04_PM");
        assert_eq!(sanitize_segment("Ada Lovelace"), "Ada_Lovelace");
    }

    #[test]
    fn path_uses_both_slots() {
        let writer = ReportWriter::new("r_{0}_{1}.txt", "Ada Lovelace");
        assert_eq!(
            writer.path_for("2026-10-19 15.04.05"),
            PathBuf::from("r_Ada_Lovelace_2026-10-19_15.04.05.txt")
        );
    }

    #[test]
    fn writes_text_to_the_stamped_path() {
        let dir = tempdir().unwrap();
        let writer = writer_in(dir.path());

        let path = writer.write("hello", "stamp one").unwrap();
        assert_eq!(path, dir.path().join("report_Ada_Lovelace_stamp_one.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), "hello");
    }

    #[test]
    fn colliding_stamps_get_distinct_files() {
        let dir = tempdir().unwrap();
        let writer = writer_in(dir.path());

        let first = writer.write("one", "same").unwrap();
        let second = writer.write("two", "same").unwrap();

        assert_ne!(first, second);
        assert_eq!(fs::read_to_string(first).unwrap(), "one");
        assert_eq!(fs::read_to_string(second).unwrap(), "two");
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempdir().unwrap();
        let writer = writer_in(&dir.path().join("absent"));

        let err = writer.write("x", "s").unwrap_err();
        assert!(matches!(err, DomainError::Io(_)));
    }
}
