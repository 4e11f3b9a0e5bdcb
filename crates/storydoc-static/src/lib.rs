//! Story documentation pipeline and static JSON generator.
//!
//! [`document_story`] composes the framework detector, the story parser, the
//! import resolver and the component extractor into one record per story.
//! [`StaticBuilder`] runs it over a whole story index and writes JSON files.

pub mod builder;
pub mod pipeline;

pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use pipeline::{
    document_story, parse_story_file, DocumentOptions, ParsedStory, PipelineError,
    StoryDocumentation,
};
