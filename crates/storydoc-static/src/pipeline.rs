//! Documentation of a single story.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use storydoc_adapters::{
    detect_cached, extract_component_docs, generate_usage_example, resolve_with_aliases,
    ComponentDoc, ComponentExtractor, Framework, ImportAliases, PropertyDoc,
};
use storydoc_csf::{extract_story_examples, StoryFileDoc, StoryIndex, StoryIndexEntry};

/// Options for documenting stories.
#[derive(Debug, Clone, Default)]
pub struct DocumentOptions {
    /// Use this framework instead of detecting it
    pub framework: Option<Framework>,

    /// Import aliases for component specifiers that are not relative
    pub aliases: ImportAliases,
}

/// The component and args one story renders.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedStory {
    /// Component identifier bound by the meta (e.g., "ButtonComponent")
    pub component: Option<String>,

    /// Meta args overridden by the story's own args
    pub args: IndexMap<String, Value>,

    pub arg_types: IndexMap<String, Value>,
}

/// Everything known about one story.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryDocumentation {
    pub id: String,
    pub title: String,
    pub name: String,
    pub import_path: String,
    pub framework: Framework,

    /// Component file, relative to the project root
    pub component_path: Option<String>,

    pub selector: Option<String>,
    pub template: Option<String>,
    pub component_code: Option<String>,
    pub properties: Vec<PropertyDoc>,
    pub component_description: Option<String>,

    /// Raw import statements of the story file
    pub imports: Vec<String>,

    /// Raw meta declaration of the story file
    pub meta_code: Option<String>,

    pub story_examples: Option<StoryFileDoc>,

    /// Usage snippet per story export
    pub usage_examples: IndexMap<String, String>,
}

/// Errors that can occur while documenting a story.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Project root is not a directory: {0}")]
    InvalidProjectRoot(String),

    #[error("Story not found in index: {0}")]
    StoryNotFound(String),

    #[error("Story file not found: {0}")]
    StoryFileNotFound(String),
}

/// Path of the story file an entry points to.
fn story_path(project_root: &Path, entry: &StoryIndexEntry) -> PathBuf {
    let relative = entry.import_path.trim_start_matches("./");
    project_root.join(relative)
}

fn existing_story_file(
    project_root: &Path,
    entry: &StoryIndexEntry,
) -> Result<PathBuf, PipelineError> {
    let path = story_path(project_root, entry);
    if path.is_file() {
        Ok(path)
    } else {
        Err(PipelineError::StoryFileNotFound(path.display().to_string()))
    }
}

/// Read the component identifier and effective args of one story.
///
/// A story file that exists but holds nothing recognizable yields an empty
/// [`ParsedStory`].
pub fn parse_story_file(
    project_root: &Path,
    entry: &StoryIndexEntry,
) -> Result<ParsedStory, PipelineError> {
    let path = existing_story_file(project_root, entry)?;
    let Some(story_doc) = extract_story_examples(&path) else {
        return Ok(ParsedStory::default());
    };

    let args = match story_doc.find_variant(entry) {
        Some(variant) => story_doc.merged_args(variant),
        None => story_doc.defaults.args.clone(),
    };

    Ok(ParsedStory {
        component: story_doc.defaults.component.clone(),
        args,
        arg_types: story_doc.defaults.arg_types.clone(),
    })
}

/// Document one story: its file's examples, its component and usage snippets.
pub fn document_story(
    project_root: &Path,
    index: &StoryIndex,
    story_id: &str,
    options: &DocumentOptions,
) -> Result<StoryDocumentation, PipelineError> {
    if !project_root.is_dir() {
        return Err(PipelineError::InvalidProjectRoot(
            project_root.display().to_string(),
        ));
    }
    let entry = index
        .get(story_id)
        .ok_or_else(|| PipelineError::StoryNotFound(story_id.to_string()))?;

    let framework = options
        .framework
        .unwrap_or_else(|| detect_cached(project_root));
    let path = existing_story_file(project_root, entry)?;

    let mut story_doc = extract_story_examples(&path);
    if story_doc.is_none() {
        tracing::debug!("No stories recognized in {}", path.display());
    }

    let component_path = story_doc
        .as_ref()
        .and_then(StoryFileDoc::component_import)
        .and_then(|specifier| {
            let resolved = resolve_with_aliases(project_root, &path, specifier, &options.aliases);
            if resolved.is_none() {
                tracing::debug!("Could not resolve component import '{}'", specifier);
            }
            resolved
        });

    let component_doc = component_path.as_deref().and_then(|p| {
        let doc = extract_component_docs(p, framework);
        if doc.is_none() {
            let expected = framework.extractor().map(|e| e.extensions()).unwrap_or_default();
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or_default();
            if expected.iter().any(|e| *e == ext) {
                tracing::debug!("No {} component found in {}", framework, p.display());
            } else {
                tracing::debug!("{} is not a {} component file", p.display(), framework);
            }
        }
        doc
    });

    let mut usage_examples = IndexMap::new();
    if let (Some(story_doc), Some(component_doc)) = (story_doc.as_mut(), component_doc.as_ref()) {
        usage_examples = attach_usage_examples(story_doc, component_doc, framework);
    }

    let component_doc = component_doc.unwrap_or_default();

    Ok(StoryDocumentation {
        id: entry.id.clone(),
        title: entry.title.clone(),
        name: entry.name.clone(),
        import_path: entry.import_path.clone(),
        framework,
        component_path: component_path.map(|p| display_relative(project_root, &p)),
        selector: component_doc.selector,
        template: component_doc.template,
        component_code: component_doc.component_code,
        properties: component_doc.properties,
        component_description: component_doc.description,
        imports: story_doc
            .as_ref()
            .map(|d| d.imports.clone())
            .unwrap_or_default(),
        meta_code: story_doc.as_ref().and_then(|d| d.meta.clone()),
        story_examples: story_doc,
        usage_examples,
    })
}

/// Generate a snippet for every variant, storing it on the variant as well.
fn attach_usage_examples(
    story_doc: &mut StoryFileDoc,
    component_doc: &ComponentDoc,
    framework: Framework,
) -> IndexMap<String, String> {
    let Some(identity) = component_doc
        .identity()
        .map(str::to_string)
        .or_else(|| story_doc.defaults.component.clone())
    else {
        return IndexMap::new();
    };

    let snippets: Vec<(String, String)> = story_doc
        .stories
        .values()
        .map(|variant| {
            let args = story_doc.merged_args(variant);
            let usage =
                generate_usage_example(&identity, &args, &variant.display_name(), framework);
            (variant.name.clone(), usage)
        })
        .collect();

    for (name, usage) in &snippets {
        if let Some(variant) = story_doc.stories.get_mut(name) {
            variant.usage_example = Some(usage.clone());
        }
    }

    snippets.into_iter().collect()
}

/// Project-relative path with `/` separators, for stable output.
fn display_relative(project_root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(project_root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
