//! Component Story Format parsing for storydoc.
//!
//! This crate reads story files with lightweight, string- and comment-aware
//! pattern matching: it extracts imports, the shared meta and every named
//! story with its args, and it reads the story inventory (`index.json`) that
//! maps story ids to story files.

pub mod index;
pub mod literal;
pub mod scan;
pub mod story;

pub use index::{EntryType, IndexError, StoryIndex, StoryIndexEntry};
pub use literal::{decode_literal, decode_object, string_literal};
pub use story::{
    extract_story_examples, parse_story_source, sanitize, story_name_from_export, MetaDefaults,
    StoryFileDoc, StoryVariant,
};
