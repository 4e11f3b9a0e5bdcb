//! Trait definitions for component extractors.

use std::path::Path;

use crate::doc::ComponentDoc;
use crate::framework::Framework;

/// Trait for framework-specific component documentation extractors.
pub trait ComponentExtractor: Send + Sync {
    /// Framework this extractor understands
    fn framework(&self) -> Framework;

    /// File extensions this extractor handles
    fn extensions(&self) -> &[&'static str];

    /// Extract documentation from a component's source.
    ///
    /// # Arguments
    /// * `source` - The source code of the component file
    /// * `path` - Where the source was read from, for sibling files such as
    ///   external templates
    fn extract(&self, source: &str, path: &Path) -> Option<ComponentDoc>;
}
