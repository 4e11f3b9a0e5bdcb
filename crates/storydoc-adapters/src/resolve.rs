//! Resolution of component import specifiers to files.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

/// Suffixes tried, in order, when probing for a component file.
pub const PROBE_EXTENSIONS: [&str; 6] = ["", ".js", ".ts", ".jsx", ".tsx", ".vue"];

/// Resolve a relative import specifier from a story file to a component file.
///
/// Bare package specifiers are not resolved.
pub fn resolve_component_path(story_file: &Path, specifier: &str) -> Option<PathBuf> {
    if !is_relative(specifier) {
        return None;
    }
    let base = story_file.parent()?.join(specifier);
    probe(&normalize(&base))
}

/// Import alias prefixes mapped to project-relative directories.
///
/// Mappings may be written with or without a trailing `/*`:
/// `"@components/*" -> "./src/components/*"` and
/// `"@components" -> "src/components"` are equivalent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ImportAliases {
    map: BTreeMap<String, String>,
}

impl ImportAliases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an alias mapping.
    pub fn insert(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.map.insert(alias.into(), target.into());
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Rewrite an aliased specifier to a project-relative path.
    ///
    /// The longest matching alias wins.
    pub fn rewrite(&self, specifier: &str) -> Option<String> {
        self.map
            .iter()
            .filter_map(|(alias, target)| {
                let alias = alias.trim_end_matches("/*").trim_end_matches('/');
                let rest = specifier.strip_prefix(alias)?;
                if !(rest.is_empty() || rest.starts_with('/')) {
                    return None;
                }
                let target = target.trim_end_matches("/*").trim_end_matches('/');
                Some((alias.len(), format!("{target}{rest}")))
            })
            .max_by_key(|(len, _)| *len)
            .map(|(_, rewritten)| rewritten)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ImportAliases {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            map: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Resolve a specifier that is either relative or starts with a known alias.
pub fn resolve_with_aliases(
    project_root: &Path,
    story_file: &Path,
    specifier: &str,
    aliases: &ImportAliases,
) -> Option<PathBuf> {
    if is_relative(specifier) {
        return resolve_component_path(story_file, specifier);
    }
    let rewritten = aliases.rewrite(specifier)?;
    probe(&normalize(&project_root.join(rewritten)))
}

fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

fn probe(base: &Path) -> Option<PathBuf> {
    PROBE_EXTENSIONS
        .iter()
        .map(|ext| with_suffix(base, ext))
        .find(|candidate| candidate.is_file())
}

/// Append a suffix without replacing an existing extension
/// (`button.component` + `.ts`).
fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(suffix);
    PathBuf::from(path)
}

/// Lexically drop `.` and fold `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, path: &str) -> PathBuf {
        let path = root.join(path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn resolves_relative_specifier_with_extension_probe() {
        let temp = TempDir::new().unwrap();
        let story = touch(temp.path(), "src/stories/button.stories.ts");
        let component = touch(temp.path(), "src/stories/button.component.ts");

        assert_eq!(
            resolve_component_path(&story, "./button.component"),
            Some(component)
        );
    }

    #[test]
    fn probes_in_fixed_order() {
        let temp = TempDir::new().unwrap();
        let story = touch(temp.path(), "src/Button.stories.tsx");
        touch(temp.path(), "src/Button.tsx");
        let js = touch(temp.path(), "src/Button.js");

        assert_eq!(resolve_component_path(&story, "./Button"), Some(js));
    }

    #[test]
    fn exact_file_wins_and_directories_are_skipped() {
        let temp = TempDir::new().unwrap();
        let story = touch(temp.path(), "src/stories/Card.stories.js");
        fs::create_dir_all(temp.path().join("src/Card")).unwrap();
        let vue = touch(temp.path(), "src/Card.vue");
        let exact = touch(temp.path(), "src/Card.vue.js");

        assert_eq!(resolve_component_path(&story, "../Card"), Some(vue));
        assert_eq!(resolve_component_path(&story, "../Card.vue.js"), Some(exact));
    }

    #[test]
    fn bare_and_missing_specifiers_do_not_resolve() {
        let temp = TempDir::new().unwrap();
        let story = touch(temp.path(), "src/button.stories.ts");

        assert_eq!(resolve_component_path(&story, "@angular/core"), None);
        assert_eq!(resolve_component_path(&story, "./missing"), None);
    }

    #[test]
    fn resolves_aliases() {
        let temp = TempDir::new().unwrap();
        let story = touch(temp.path(), "src/stories/button.stories.ts");
        let component = touch(temp.path(), "src/components/button/button.component.ts");

        let aliases: ImportAliases = [("@components/*", "./src/components/*")]
            .into_iter()
            .collect();

        assert_eq!(
            resolve_with_aliases(
                temp.path(),
                &story,
                "@components/button/button.component",
                &aliases
            ),
            Some(component)
        );
        assert_eq!(
            resolve_with_aliases(temp.path(), &story, "@componentsx/button", &aliases),
            None
        );
    }

    #[test]
    fn longest_alias_wins() {
        let mut aliases = ImportAliases::new();
        aliases.insert("@", "src");
        aliases.insert("@ui", "packages/ui");

        assert_eq!(aliases.rewrite("@ui/button"), Some("packages/ui/button".into()));
        assert_eq!(aliases.rewrite("@/button"), Some("src/button".into()));
        assert_eq!(aliases.rewrite("lodash"), None);
    }
}
