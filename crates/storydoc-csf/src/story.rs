//! Story file extraction.
//!
//! Reads a Component Story Format file and pulls out its imports, the shared
//! meta (default export) and every named story together with its args. Both
//! object stories (`export const Primary: Story = { args: {...} }`) and
//! template stories (`export const Primary = Template.bind({}); Primary.args =
//! {...}`) are recognized.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::index::StoryIndexEntry;
use crate::literal::{decode_literal, decode_object, string_literal};
use crate::scan::{self, Entry};

/// Everything extracted from one story file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryFileDoc {
    /// Raw import statements, in source order
    pub imports: Vec<String>,

    /// Raw meta declaration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,

    /// Named stories by export name, in declaration order
    pub stories: IndexMap<String, StoryVariant>,

    /// Values decoded from the meta declaration
    #[serde(skip)]
    pub defaults: MetaDefaults,
}

/// Values decoded from a story file's meta.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetaDefaults {
    pub title: Option<String>,

    /// Identifier of the component the stories render, e.g. `Button`
    pub component: Option<String>,

    /// Args shared by every story in the file
    pub args: IndexMap<String, Value>,

    pub arg_types: IndexMap<String, Value>,
}

/// One named story.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryVariant {
    /// Export name, e.g. `PrimaryLarge`
    pub name: String,

    /// Explicit display name (`name:` or `storyName`), if declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub story_name: Option<String>,

    /// Decoded args (plain data only)
    pub args: IndexMap<String, Value>,

    /// Raw args expression as written in the source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args_code: Option<String>,

    /// Generated usage example, filled in by the pipeline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_example: Option<String>,
}

impl StoryVariant {
    /// Name shown in the story inventory.
    pub fn display_name(&self) -> String {
        self.story_name
            .clone()
            .unwrap_or_else(|| story_name_from_export(&self.name))
    }
}

impl StoryFileDoc {
    /// Args for a story: the meta's args overridden by the story's own.
    pub fn merged_args(&self, variant: &StoryVariant) -> IndexMap<String, Value> {
        let mut args = self.defaults.args.clone();
        for (key, value) in &variant.args {
            args.insert(key.clone(), value.clone());
        }
        args
    }

    /// Specifier of the import that binds the meta's component.
    pub fn component_import(&self) -> Option<&str> {
        let component = self.defaults.component.as_deref()?;
        let local = component.split('.').next()?;
        self.imports
            .iter()
            .find_map(|statement| import_specifier_for(statement, local))
    }

    /// Find the story an inventory entry refers to.
    ///
    /// Matches the id suffix against the export name first, then falls back to
    /// the display name.
    pub fn find_variant(&self, entry: &StoryIndexEntry) -> Option<&StoryVariant> {
        let suffix = entry.id.rsplit_once("--").map(|(_, s)| s);

        suffix
            .and_then(|suffix| {
                self.stories
                    .values()
                    .find(|v| sanitize(&story_name_from_export(&v.name)) == suffix)
            })
            .or_else(|| {
                self.stories
                    .values()
                    .find(|v| v.display_name() == entry.name)
            })
    }
}

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*import\s+(?:[^;'"]*?\s+from\s+)?['"][^'"\n]+['"][ \t]*;?"#)
        .expect("Invalid import regex")
});

static IMPORT_CLAUSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)^\s*import\s+(?:type\s+)?(.+?)\s+from\s+['"]([^'"]+)['"]"#)
        .expect("Invalid import clause regex")
});

static EXPORT_DEFAULT_OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^export\s+default\s*\{").expect("Invalid default export regex")
});

static EXPORT_DEFAULT_IDENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^export\s+default\s+([A-Za-z_$][\w$]*)\s*;?[ \t]*$")
        .expect("Invalid default export identifier regex")
});

static TYPE_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:(?:satisfies|as)\s+[^;\n]+)?;?").expect("Invalid type suffix regex")
});

static NAMED_EXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^export\s+const\s+([A-Za-z_$][\w$]*)\s*(?::\s*[^=\n]+?)?\s*=\s*")
        .expect("Invalid named export regex")
});

static BIND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][\w$.]*\.bind\s*\(").expect("Invalid bind regex")
});

static FUNCTION_STORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:async\s+)?(?:function\b|\(|[A-Za-z_$][\w$]*\s*=>)")
        .expect("Invalid function story regex")
});

const NAMED_EXPORTS_ORDER: &str = "__namedExportsOrder";

/// Read and extract a story file.
///
/// Returns `None` if the file cannot be read or holds neither a meta nor any
/// named story.
pub fn extract_story_examples(path: &Path) -> Option<StoryFileDoc> {
    let source = fs::read_to_string(path).ok()?;
    parse_story_source(&source)
}

/// Extract story examples from story source text.
pub fn parse_story_source(source: &str) -> Option<StoryFileDoc> {
    let imports = IMPORT_RE
        .find_iter(source)
        .map(|m| m.as_str().trim().to_string())
        .collect();

    let (meta, defaults) = match find_meta(source) {
        Some((code, object)) => (Some(code.to_string()), decode_meta(object)),
        None => (None, MetaDefaults::default()),
    };

    let stories = extract_stories(source);

    if meta.is_none() && stories.is_empty() {
        return None;
    }

    Some(StoryFileDoc {
        imports,
        meta,
        stories,
        defaults,
    })
}

/// Locate the meta declaration, returning its raw text and its object literal.
fn find_meta(source: &str) -> Option<(&str, &str)> {
    if let Some(m) = EXPORT_DEFAULT_OBJECT_RE.find(source) {
        let open = m.end() - 1;
        let close = scan::find_matching(source, open)?;
        let end = declaration_end(source, close);
        return Some((&source[m.start()..end], &source[open..=close]));
    }

    let caps = EXPORT_DEFAULT_IDENT_RE.captures(source)?;
    let ident = caps.get(1)?.as_str();
    let decl_re = Regex::new(&format!(
        r"(?m)^(?:export\s+)?(?:const|let|var)\s+{}\b\s*(?::[^=\n]+)?=\s*\{{",
        regex::escape(ident)
    ))
    .ok()?;

    let m = decl_re.find(source)?;
    let open = m.end() - 1;
    let close = scan::find_matching(source, open)?;
    let end = declaration_end(source, close);
    Some((&source[m.start()..end], &source[open..=close]))
}

/// Extend a declaration past its closing brace over `satisfies T` / `as T` and `;`.
fn declaration_end(source: &str, close: usize) -> usize {
    let after = close + 1;
    TYPE_SUFFIX_RE
        .find(&source[after..])
        .map_or(after, |m| after + m.end())
}

fn decode_meta(object: &str) -> MetaDefaults {
    let mut defaults = MetaDefaults::default();
    let Some(entries) = scan::object_entries(object) else {
        return defaults;
    };

    for entry in entries {
        match entry {
            Entry::Pair { key: "title", value } => defaults.title = string_literal(value),
            Entry::Pair {
                key: "component",
                value,
            } => {
                let value = value.trim();
                if value.split('.').all(scan::is_identifier) {
                    defaults.component = Some(value.to_string());
                }
            }
            Entry::Shorthand("component") => defaults.component = Some("component".to_string()),
            Entry::Pair { key: "args", value } => {
                defaults.args = decode_args(value, &IndexMap::new())
            }
            Entry::Pair {
                key: "argTypes",
                value,
            } => {
                defaults.arg_types = decode_object(value)
                    .map(|map| map.into_iter().collect())
                    .unwrap_or_default()
            }
            _ => {}
        }
    }

    defaults
}

fn extract_stories(source: &str) -> IndexMap<String, StoryVariant> {
    let mut stories: IndexMap<String, StoryVariant> = IndexMap::new();
    let meta_ident = EXPORT_DEFAULT_IDENT_RE
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str());

    for caps in NAMED_EXPORT_RE.captures_iter(source) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let name = name.as_str();
        if name == NAMED_EXPORTS_ORDER || Some(name) == meta_ident {
            continue;
        }

        let rest = &source[whole.end()..];
        let mut variant = if rest.starts_with('{') {
            let Some(close) = scan::find_matching(rest, 0) else {
                continue;
            };
            object_story(name, &rest[..=close], &stories)
        } else if BIND_RE.is_match(rest) || FUNCTION_STORY_RE.is_match(rest) {
            StoryVariant {
                name: name.to_string(),
                ..Default::default()
            }
        } else {
            continue;
        };

        apply_assignments(source, &mut variant, &stories);
        stories.insert(name.to_string(), variant);
    }

    stories
}

fn object_story(
    name: &str,
    object: &str,
    known: &IndexMap<String, StoryVariant>,
) -> StoryVariant {
    let mut variant = StoryVariant {
        name: name.to_string(),
        ..Default::default()
    };

    for entry in scan::object_entries(object).unwrap_or_default() {
        match entry {
            Entry::Spread(base) => {
                if let Some(base) = known.get(base) {
                    variant.args.extend(base.args.clone());
                }
            }
            Entry::Pair { key: "args", value } => {
                variant.args.extend(decode_args(value, known));
                variant.args_code = Some(value.to_string());
            }
            Entry::Pair {
                key: "name" | "storyName",
                value,
            } => variant.story_name = string_literal(value),
            _ => {}
        }
    }

    variant
}

/// Apply `Name.args = {...}` and `Name.storyName = '...'` assignments.
fn apply_assignments(
    source: &str,
    variant: &mut StoryVariant,
    known: &IndexMap<String, StoryVariant>,
) {
    let name = regex::escape(&variant.name);

    if let Ok(re) = Regex::new(&format!(r"(?m)^\s*{name}\.args\s*=\s*\{{")) {
        if let Some(m) = re.find(source) {
            let open = m.end() - 1;
            if let Some(close) = scan::find_matching(source, open) {
                let value = &source[open..=close];
                variant.args.extend(decode_args(value, known));
                variant.args_code = Some(value.to_string());
            }
        }
    }

    if let Ok(re) = Regex::new(&format!(
        r#"(?m)^\s*{name}\.(?:storyName|story\.name)\s*=\s*(['"`][^'"`\n]*['"`])"#
    )) {
        if let Some(caps) = re.captures(source) {
            variant.story_name = caps.get(1).and_then(|m| string_literal(m.as_str()));
        }
    }
}

/// Decode an args object, resolving `...Other.args` spreads against stories
/// extracted so far.
fn decode_args(value: &str, known: &IndexMap<String, StoryVariant>) -> IndexMap<String, Value> {
    let mut args = IndexMap::new();
    let Some(entries) = scan::object_entries(value) else {
        return args;
    };

    for entry in entries {
        match entry {
            Entry::Pair { key, value } => {
                if let Some(decoded) = decode_literal(value) {
                    args.insert(key.to_string(), decoded);
                }
            }
            Entry::Spread(spread) => {
                let base = spread.strip_suffix(".args").unwrap_or(spread);
                if let Some(base) = known.get(base) {
                    args.extend(base.args.clone());
                }
            }
            _ => {}
        }
    }

    args
}

/// Return the module specifier if `statement` binds `local`.
fn import_specifier_for<'a>(statement: &'a str, local: &str) -> Option<&'a str> {
    let caps = IMPORT_CLAUSE_RE.captures(statement)?;
    let clause = caps.get(1)?.as_str();
    let specifier = caps.get(2)?.as_str();

    let (default_part, named_part) = match clause.find('{') {
        Some(open) => (
            &clause[..open],
            clause[open + 1..].split('}').next().unwrap_or(""),
        ),
        None => (clause, ""),
    };

    let default_bindings = default_part
        .split(',')
        .map(|part| part.trim().trim_start_matches("* as").trim());
    let named_bindings = named_part.split(',').map(|part| {
        let part = part.trim().trim_start_matches("type ").trim();
        part.rsplit_once(" as ").map_or(part, |(_, alias)| alias.trim())
    });

    default_bindings
        .chain(named_bindings)
        .any(|binding| binding == local)
        .then_some(specifier)
}

/// Convert an export name into a display name, e.g. `PrimaryLarge` ->
/// `Primary Large`.
pub fn story_name_from_export(export: &str) -> String {
    let chars: Vec<char> = export.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c == ' ' || c == '$' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        let prev = i.checked_sub(1).map(|p| chars[p]);
        let next = chars.get(i + 1).copied();
        let boundary = match prev {
            Some(p) if !current.is_empty() => {
                (p.is_lowercase() && c.is_uppercase())
                    || (p.is_ascii_digit() != c.is_ascii_digit())
                    || (p.is_uppercase()
                        && c.is_uppercase()
                        && next.is_some_and(char::is_lowercase))
            }
            _ => false,
        };
        if boundary {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lowercase and dash-separate a name the way story ids are built.
pub fn sanitize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
