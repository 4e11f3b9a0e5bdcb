//! React extractor: function, const and class components with typed props.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use storydoc_csf::scan::{self, Entry};

use crate::doc::{non_empty, type_members, ComponentDoc, PropertyDoc};
use crate::framework::Framework;
use crate::traits::ComponentExtractor;

/// Extracts docs from JSX component modules.
#[derive(Debug, Default)]
pub struct ReactExtractor;

impl ComponentExtractor for ReactExtractor {
    fn framework(&self) -> Framework {
        Framework::JsxComponent
    }

    fn extensions(&self) -> &[&'static str] {
        &["tsx", "jsx", "ts", "js"]
    }

    fn extract(&self, source: &str, _path: &Path) -> Option<ComponentDoc> {
        let component = find_component(&EXPORTED_COMPONENT_RE, source)
            .or_else(|| find_component(&COMPONENT_NAME_RE, source))?;
        let declaration = component.get(0)?;
        let name = component_name(&component)?;

        let mut properties = props_type(source, &name)
            .map(type_members)
            .unwrap_or_default();

        let is_class = component.get(3).is_some();
        let destructured = if is_class {
            Vec::new()
        } else {
            destructured_defaults(source, declaration.end())
        };
        let defaults = destructured
            .into_iter()
            .chain(default_props(source, &name));
        for (prop, default) in defaults {
            match properties.iter_mut().find(|p| p.name == prop) {
                Some(existing) => {
                    if existing.default_value.is_none() {
                        existing.default_value = default;
                    }
                }
                None => properties.push(PropertyDoc {
                    name: prop,
                    default_value: default,
                    ..PropertyDoc::default()
                }),
            }
        }

        let description = scan::comment_before(source, declaration.start());

        Some(ComponentDoc {
            name: Some(name),
            selector: None,
            template: None,
            component_code: non_empty(source),
            properties,
            description,
        })
    }
}

// Regex patterns for extraction
static EXPORTED_COMPONENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^export\s+(?:default\s+)?(?:(?:async\s+)?function\s+([A-Z][\w$]*)|(?:const|let)\s+([A-Z][\w$]*)\b|class\s+([A-Z][\w$]*))",
    )
    .expect("Invalid exported component regex")
});

static COMPONENT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:function\s+([A-Z][\w$]*)|const\s+([A-Z][\w$]*)\b|class\s+([A-Z][\w$]*))")
        .expect("Invalid component name regex")
});

static PROPS_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:interface\s+([A-Z][\w$]*Props)\b[^{]*\{|type\s+([A-Z][\w$]*Props)\s*=\s*\{)")
        .expect("Invalid props type regex")
});

static DEFAULT_PROPS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z][\w$]*)\.defaultProps\s*=\s*\{").expect("Invalid default props regex")
});

/// First declaration that looks like a component rather than a constant.
fn find_component<'a>(re: &Regex, source: &'a str) -> Option<Captures<'a>> {
    re.captures_iter(source).find(|cap| {
        let Some(name) = component_name(cap) else {
            return false;
        };
        if !name.chars().any(|c| c.is_ascii_lowercase()) {
            return false;
        }
        match (cap.get(2), cap.get(0)) {
            (Some(_), Some(whole)) => is_component_initializer(&source[whole.end()..]),
            _ => true,
        }
    })
}

/// Whether `= ...` after a `const` name builds a component.
fn is_component_initializer(rest: &str) -> bool {
    let Some(eq) = scan::find_assignment(rest) else {
        return false;
    };
    let init = rest[eq + 1..].trim_start();
    let line = init.lines().next().unwrap_or_default();

    init.starts_with('(')
        || init.starts_with("function")
        || init.starts_with("async")
        || line.contains("=>")
        || line.contains("forwardRef")
        || line.contains("memo(")
}

fn component_name(cap: &Captures<'_>) -> Option<String> {
    (1..=3)
        .find_map(|i| cap.get(i))
        .map(|m| m.as_str().to_string())
}

/// Body of the props interface or type, preferring `{Name}Props`.
fn props_type<'a>(source: &'a str, component: &str) -> Option<&'a str> {
    let preferred = format!("{component}Props");

    let mut first = None;
    for cap in PROPS_TYPE_RE.captures_iter(source) {
        let (Some(whole), Some(name)) = (cap.get(0), cap.get(1).or_else(|| cap.get(2))) else {
            continue;
        };
        let open = whole.end() - 1;
        let Some(close) = scan::find_matching(source, open) else {
            continue;
        };
        let body = &source[open + 1..close];
        if name.as_str() == preferred {
            return Some(body);
        }
        first.get_or_insert(body);
    }
    first
}

/// Defaults from a destructured first parameter: `({ size = 'medium', label })`.
fn destructured_defaults(source: &str, from: usize) -> Vec<(String, Option<String>)> {
    let rest = &source[from..];
    let Some(paren) = rest.find('(') else {
        return Vec::new();
    };
    // The parameter list must belong to this declaration, not a later statement.
    if rest[..paren].contains(';') {
        return Vec::new();
    }

    let open = from + paren;
    let Some(close) = scan::find_matching(source, open) else {
        return Vec::new();
    };
    let params = source[open + 1..close].trim_start();
    if !params.starts_with('{') {
        return Vec::new();
    }
    let Some(end) = scan::find_matching(params, 0) else {
        return Vec::new();
    };

    scan::split_top_level(&params[1..end], b',')
        .into_iter()
        .filter_map(|binding| {
            let (_, binding) = scan::split_leading_comments(binding);
            if binding.starts_with("...") {
                return None;
            }
            let (name, default) = match scan::find_assignment(binding) {
                Some(eq) => (&binding[..eq], non_empty(&binding[eq + 1..])),
                None => (binding, None),
            };
            // `label: text` renames the binding; the prop is still `label`.
            let name = name.split(':').next().unwrap_or(name).trim();
            scan::is_identifier(name).then(|| (name.to_string(), default))
        })
        .collect()
}

/// Defaults from `Name.defaultProps = { ... }`.
fn default_props(source: &str, component: &str) -> Vec<(String, Option<String>)> {
    let Some(cap) = DEFAULT_PROPS_RE
        .captures_iter(source)
        .find(|c| &c[1] == component)
    else {
        return Vec::new();
    };
    let Some(whole) = cap.get(0) else {
        return Vec::new();
    };
    let open = whole.end() - 1;
    let Some(close) = scan::find_matching(source, open) else {
        return Vec::new();
    };

    scan::object_entries(&source[open..=close])
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| match entry {
            Entry::Pair { key, value } => Some((key.to_string(), non_empty(value))),
            _ => None,
        })
        .collect()
}
