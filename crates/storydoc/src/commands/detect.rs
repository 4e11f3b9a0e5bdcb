//! Framework detection command.

use anyhow::Result;
use storydoc_adapters::detect;

use crate::config::ConfigFile;

/// Run the detect command.
pub fn run(config: &ConfigFile) -> Result<()> {
    let root = config.project_root();

    if let Some(pinned) = config.framework()? {
        tracing::info!("Framework pinned by config");
        println!("{}", pinned);
        return Ok(());
    }

    let framework = detect(&root);
    tracing::debug!("Detected {} in {}", framework, root.display());
    println!("{}", framework);

    Ok(())
}
