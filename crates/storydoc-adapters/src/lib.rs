//! Framework adapters for component documentation.
//!
//! This crate decides which UI framework a project uses, finds the component
//! file a story imports, extracts a [`ComponentDoc`] from it with one
//! extractor per framework, and renders usage snippets for story args.

pub mod angular;
pub mod doc;
pub mod framework;
pub mod react;
pub mod resolve;
pub mod traits;
pub mod usage;
pub mod vue;
pub mod web_components;

use std::fs;
use std::path::Path;

pub use angular::AngularExtractor;
pub use doc::{ComponentDoc, PropertyDoc};
pub use framework::{detect, detect_cached, Framework};
pub use react::ReactExtractor;
pub use resolve::{resolve_component_path, resolve_with_aliases, ImportAliases};
pub use traits::ComponentExtractor;
pub use usage::{generate_usage_example, to_js_literal};
pub use vue::VueExtractor;
pub use web_components::WebComponentExtractor;

/// Extract documentation from a component file using the framework's extractor.
///
/// Returns `None` when the framework is unknown, the file cannot be read, or
/// nothing recognizable was found in it.
pub fn extract_component_docs(path: &Path, framework: Framework) -> Option<ComponentDoc> {
    let extractor = framework.extractor()?;
    let source = fs::read_to_string(path).ok()?;

    extractor
        .extract(&source, path)
        .filter(|doc| !doc.is_empty())
}
