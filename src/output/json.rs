//! JSON file output
//!
//! Writes the record set as a pretty-printed JSON array.

use crate::model::ArticleRecord;
use crate::output::traits::{OutputResult, ResultStore};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Stores results in a JSON file, overwriting it on every run
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Serializes records exactly as they are written to disk
pub fn format_records(records: &[ArticleRecord]) -> OutputResult<String> {
    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');
    Ok(json)
}

impl ResultStore for JsonFileStore {
    fn write(&self, records: &[ArticleRecord]) -> OutputResult<()> {
        let json = format_records(records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IdentifierRecord;
    use chrono::DateTime;
    use tempfile::tempdir;

    fn record(url: &str) -> ArticleRecord {
        ArticleRecord {
            url: url.to_string(),
            author: "Jane Doe".to_string(),
            title: "Patch Day".to_string(),
            published_at: DateTime::parse_from_rfc3339("2024-05-02T10:30:00+02:00").unwrap(),
            identifiers: vec![IdentifierRecord::unenriched("CVE-2024-1234")],
            comments: vec![],
            has_update_marker: true,
        }
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("results.json");
        let store = JsonFileStore::new(&path);

        store.write(&[record("https://example.com/a")]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["url"], "https://example.com/a");
        assert_eq!(value[0]["updated"], true);
    }

    #[test]
    fn test_write_overwrites_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        let store = JsonFileStore::new(&path);

        store
            .write(&[record("https://example.com/a"), record("https://example.com/b")])
            .unwrap();
        store.write(&[]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "[]");
    }

    #[test]
    fn test_format_is_stable() {
        let records = vec![record("https://example.com/a")];
        assert_eq!(
            format_records(&records).unwrap(),
            format_records(&records).unwrap()
        );
    }

    #[test]
    fn test_destination() {
        let store = JsonFileStore::new("out/results.json");
        assert_eq!(store.destination(), "out/results.json");
    }
}
