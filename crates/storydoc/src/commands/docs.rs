//! Single story documentation command.

use anyhow::{Context, Result};
use storydoc_csf::StoryIndex;
use storydoc_static::{document_story, DocumentOptions};

use crate::config::ConfigFile;

/// Run the docs command.
pub fn run(config: &ConfigFile, story_id: &str) -> Result<()> {
    let index_path = config.index_path();
    let index = StoryIndex::load(&index_path)
        .with_context(|| format!("Failed to load story index {}", index_path.display()))?;

    let options = DocumentOptions {
        framework: config.framework()?,
        aliases: config.resolve.aliases.clone(),
    };

    let doc = document_story(&config.project_root(), &index, story_id, &options)?;
    println!("{}", serde_json::to_string_pretty(&doc)?);

    Ok(())
}
