//! Story inventory types.
//!
//! The inventory is produced elsewhere (Storybook's indexer, live or as a
//! static `index.json`). This module only reads it, tolerating empty and
//! partial documents.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the story inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryIndexEntry {
    /// Unique story identifier, e.g. `example-button--primary`
    #[serde(default)]
    pub id: String,

    /// Display name of the story
    #[serde(default)]
    pub name: String,

    /// Grouping path, e.g. `Example/Button`
    #[serde(default, alias = "kind")]
    pub title: String,

    /// Story file path relative to the project root
    pub import_path: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(rename = "type", default)]
    pub entry_type: EntryType,
}

impl StoryIndexEntry {
    /// Whether this entry is a story (as opposed to a docs page).
    pub fn is_story(&self) -> bool {
        self.entry_type == EntryType::Story
    }
}

/// Classification of an inventory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    #[default]
    Story,
    Docs,
    #[serde(other)]
    Other,
}

/// A snapshot of the story inventory, keyed by story id in document order.
#[derive(Debug, Clone, Default)]
pub struct StoryIndex {
    entries: IndexMap<String, StoryIndexEntry>,

    /// Number of entries dropped because they could not be read
    pub skipped: usize,
}

impl StoryIndex {
    /// Create an index from already-built entries.
    pub fn from_entries(entries: impl IntoIterator<Item = StoryIndexEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|e| (e.id.clone(), e)).collect(),
            skipped: 0,
        }
    }

    /// Parse an `index.json` document.
    ///
    /// Accepts the `entries` layout (v4 and later) and the legacy `stories`
    /// layout. A document with neither key is an empty index.
    pub fn from_json(json: &str) -> Result<Self, IndexError> {
        let doc: Value =
            serde_json::from_str(json).map_err(|e| IndexError::InvalidJson(e.to_string()))?;

        let Some(raw_entries) = doc
            .get("entries")
            .or_else(|| doc.get("stories"))
            .and_then(Value::as_object)
        else {
            return Ok(Self::default());
        };

        let mut index = Self::default();
        for (key, raw) in raw_entries {
            match serde_json::from_value::<StoryIndexEntry>(raw.clone()) {
                Ok(mut entry) => {
                    if entry.id.is_empty() {
                        entry.id = key.clone();
                    }
                    index.entries.insert(entry.id.clone(), entry);
                }
                Err(e) => {
                    tracing::warn!("Dropping story index entry {}: {}", key, e);
                    index.skipped += 1;
                }
            }
        }

        Ok(index)
    }

    /// Load a static `index.json` file.
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let json = fs::read_to_string(path)
            .map_err(|e| IndexError::Read(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Look up an entry by story id.
    pub fn get(&self, id: &str) -> Option<&StoryIndexEntry> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = &StoryIndexEntry> {
        self.entries.values()
    }

    /// Story entries (docs pages excluded), sorted by id.
    pub fn stories_sorted(&self) -> Vec<&StoryIndexEntry> {
        let mut stories: Vec<_> = self.iter().filter(|e| e.is_story()).collect();
        stories.sort_by(|a, b| a.id.cmp(&b.id));
        stories
    }
}

/// Errors that can occur when reading the inventory.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("Failed to read story index: {0}")]
    Read(String),

    #[error("Invalid story index JSON: {0}")]
    InvalidJson(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_entries_layout() {
        let json = r#"{
          "v": 5,
          "entries": {
            "example-button--primary": {
              "id": "example-button--primary",
              "title": "Example/Button",
              "name": "Primary",
              "importPath": "./src/stories/Button.stories.ts",
              "tags": ["dev", "autodocs"],
              "type": "story"
            },
            "example-button--docs": {
              "id": "example-button--docs",
              "title": "Example/Button",
              "name": "Docs",
              "importPath": "./src/stories/Button.stories.ts",
              "type": "docs"
            }
          }
        }"#;

        let index = StoryIndex::from_json(json).unwrap();

        assert_eq!(index.len(), 2);
        let entry = index.get("example-button--primary").unwrap();
        assert_eq!(entry.title, "Example/Button");
        assert_eq!(entry.import_path, "./src/stories/Button.stories.ts");
        assert_eq!(entry.tags, vec!["dev", "autodocs"]);
        assert!(entry.is_story());
        assert_eq!(index.stories_sorted().len(), 1);
    }

    #[test]
    fn parses_legacy_stories_layout() {
        let json = r#"{
          "v": 3,
          "stories": {
            "button--large": { "kind": "Button", "name": "Large", "importPath": "./Button.stories.js" }
          }
        }"#;

        let index = StoryIndex::from_json(json).unwrap();
        let entry = index.get("button--large").unwrap();

        assert_eq!(entry.id, "button--large");
        assert_eq!(entry.title, "Button");
        assert_eq!(entry.entry_type, EntryType::Story);
    }

    #[test]
    fn tolerates_empty_and_partial_snapshots() {
        assert!(StoryIndex::from_json("{}").unwrap().is_empty());

        let partial = r#"{ "entries": { "a--b": { "name": "B" }, "c--d": { "importPath": "./c.stories.js" } } }"#;
        let index = StoryIndex::from_json(partial).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.skipped, 1);
        assert!(index.get("a--b").is_none());
        assert!(index.get("c--d").is_some());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            StoryIndex::from_json("{ not json"),
            Err(IndexError::InvalidJson(_))
        ));
    }
}
