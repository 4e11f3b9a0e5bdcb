//! Static JSON build command.

use std::path::PathBuf;

use anyhow::Result;
use storydoc_static::{BuildConfig, StaticBuilder};

use crate::config::ConfigFile;

/// Run the build command.
pub async fn run(
    file_config: &ConfigFile,
    output: Option<PathBuf>,
    threads: Option<usize>,
) -> Result<()> {
    tracing::info!("Building story documentation...");

    let config = BuildConfig {
        project_root: file_config.project_root(),
        index_path: PathBuf::from(&file_config.project.index),
        output_dir: output.unwrap_or_else(|| PathBuf::from(&file_config.build.output)),
        framework: file_config.framework()?,
        aliases: file_config.resolve.aliases.clone(),
        threads: threads.or(file_config.build.threads),
    };

    let result = StaticBuilder::new(config).build().await?;

    if result.skipped > 0 {
        tracing::warn!("{} stories skipped", result.skipped);
    }
    tracing::info!(
        "Documented {} of {} stories in {}ms",
        result.documented,
        result.stories,
        result.duration_ms
    );

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
