//! Static JSON generator.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;

use storydoc_adapters::{detect_cached, Framework, ImportAliases};
use storydoc_csf::{StoryIndex, StoryIndexEntry};

use crate::pipeline::{document_story, DocumentOptions, PipelineError};

/// Configuration for a static build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Storybook project root
    pub project_root: PathBuf,

    /// Static story index, relative to the project root
    pub index_path: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Use this framework instead of detecting it
    pub framework: Option<Framework>,

    pub aliases: ImportAliases,

    /// Worker threads (defaults to available parallelism)
    pub threads: Option<usize>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            index_path: PathBuf::from("storybook-static/index.json"),
            output_dir: PathBuf::from("storydoc-api"),
            framework: None,
            aliases: ImportAliases::default(),
            threads: None,
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Story entries in the index
    pub stories: usize,

    /// Stories written to the output directory
    pub documented: usize,

    /// Stories skipped because their files were missing
    pub skipped: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to load story index: {0}")]
    Index(String),

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(String),

    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Build task failed: {0}")]
    Join(String),
}

/// Outcome for one story.
enum StoryOutcome {
    Documented,
    Skipped,
}

/// Index document written next to the story files.
#[derive(Serialize)]
struct OutputIndex<'a> {
    v: u8,
    entries: IndexMap<&'a str, &'a StoryIndexEntry>,
}

/// Static JSON builder.
pub struct StaticBuilder {
    config: BuildConfig,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    /// Document every story in the index and write the JSON output.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        let index_path = self.config.project_root.join(&self.config.index_path);
        let index =
            StoryIndex::load(&index_path).map_err(|e| BuildError::Index(e.to_string()))?;

        let framework = self
            .config
            .framework
            .unwrap_or_else(|| detect_cached(&self.config.project_root));
        tracing::info!("Loaded {} index entries ({})", index.len(), framework);

        let config = self.config.clone();
        let options = DocumentOptions {
            framework: Some(framework),
            aliases: self.config.aliases.clone(),
        };

        let (stories, documented, skipped) =
            tokio::task::spawn_blocking(move || write_all(&config, &index, &options))
                .await
                .map_err(|e| BuildError::Join(e.to_string()))??;

        let duration = start.elapsed();

        Ok(BuildResult {
            stories,
            documented,
            skipped,
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }
}

/// Document and write every story on a bounded pool.
fn write_all(
    config: &BuildConfig,
    index: &StoryIndex,
    options: &DocumentOptions,
) -> Result<(usize, usize, usize), BuildError> {
    let stories_dir = config.output_dir.join("stories");
    fs::create_dir_all(&stories_dir).map_err(|e| BuildError::Write(e.to_string()))?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads.unwrap_or(0))
        .build()
        .map_err(|e| BuildError::ThreadPool(e.to_string()))?;

    let stories = index.stories_sorted();
    let results: Vec<Result<StoryOutcome, BuildError>> = pool.install(|| {
        stories
            .par_iter()
            .map(|entry| write_story(config, index, options, entry, &stories_dir))
            .collect()
    });

    let mut documented = 0;
    let mut skipped = 0;
    for result in results {
        match result? {
            StoryOutcome::Documented => documented += 1,
            StoryOutcome::Skipped => skipped += 1,
        }
    }

    write_index(index, &config.output_dir)?;

    Ok((stories.len(), documented, skipped))
}

fn write_story(
    config: &BuildConfig,
    index: &StoryIndex,
    options: &DocumentOptions,
    entry: &StoryIndexEntry,
    stories_dir: &Path,
) -> Result<StoryOutcome, BuildError> {
    let doc = match document_story(&config.project_root, index, &entry.id, options) {
        Ok(doc) => doc,
        Err(PipelineError::StoryFileNotFound(path)) => {
            tracing::warn!("Skipping {}: story file not found: {}", entry.id, path);
            return Ok(StoryOutcome::Skipped);
        }
        Err(e) => {
            tracing::warn!("Skipping {}: {}", entry.id, e);
            return Ok(StoryOutcome::Skipped);
        }
    };

    let path = stories_dir.join(format!("{}.json", file_stem(&entry.id)));
    write_json(&path, &doc)?;
    tracing::debug!("Wrote {}", path.display());

    Ok(StoryOutcome::Documented)
}

/// Write the index entries, sorted by id, in the Storybook index layout.
fn write_index(index: &StoryIndex, output_dir: &Path) -> Result<(), BuildError> {
    let mut entries: Vec<_> = index.iter().collect();
    entries.sort_by(|a, b| a.id.cmp(&b.id));

    let output = OutputIndex {
        v: 5,
        entries: entries.into_iter().map(|e| (e.id.as_str(), e)).collect(),
    };
    write_json(&output_dir.join("index.json"), &output)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), BuildError> {
    let mut json =
        serde_json::to_string_pretty(value).map_err(|e| BuildError::Write(e.to_string()))?;
    json.push('\n');
    fs::write(path, json).map_err(|e| BuildError::Write(format!("{}: {}", path.display(), e)))
}

/// Story id as a file name.
fn file_stem(id: &str) -> String {
    id.replace(['/', '\\'], "-")
}
