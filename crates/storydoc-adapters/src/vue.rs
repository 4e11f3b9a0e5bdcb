//! Vue extractor: `.vue` single-file components.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use storydoc_csf::scan::{self, Entry};
use storydoc_csf::string_literal;

use crate::doc::{non_empty, type_members, ComponentDoc, PropertyDoc};
use crate::framework::Framework;
use crate::traits::ComponentExtractor;

/// Extracts docs from single-file components.
#[derive(Debug, Default)]
pub struct VueExtractor;

impl ComponentExtractor for VueExtractor {
    fn framework(&self) -> Framework {
        Framework::SingleFileComponent
    }

    fn extensions(&self) -> &[&'static str] {
        &["vue"]
    }

    fn extract(&self, source: &str, _path: &Path) -> Option<ComponentDoc> {
        let scripts = script_blocks(source);
        let main_script = scripts
            .iter()
            .find(|block| block.setup)
            .or_else(|| scripts.first())
            .map(|block| block.content);

        let options = scripts.iter().find_map(|block| options_object(block.content));
        let name = options
            .and_then(|o| scan::object_value(o, "name"))
            .and_then(string_literal);

        let mut properties = Vec::new();
        let mut defaults = Vec::new();
        for block in &scripts {
            properties.extend(define_props(block.content));
            defaults.extend(with_defaults(block.content));
        }
        if let Some(props) = options.and_then(|o| scan::object_value(o, "props")) {
            properties.extend(runtime_props(props));
        }
        for (prop, default) in defaults {
            if let Some(existing) = properties.iter_mut().find(|p| p.name == prop) {
                existing.default_value = Some(default);
            }
        }

        let description = leading_html_comment(source).or_else(|| {
            let script = main_script?;
            scan::split_leading_comments(script).0.or_else(|| {
                let export = EXPORT_DEFAULT_RE.find(script)?;
                scan::comment_before(script, export.start())
            })
        });

        let doc = ComponentDoc {
            selector: name.clone(),
            name,
            template: template(source),
            component_code: main_script.and_then(non_empty),
            properties,
            description,
        };
        (!doc.is_empty()).then_some(doc)
    }
}

struct ScriptBlock<'a> {
    setup: bool,
    content: &'a str,
}

static TEMPLATE_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<template(?:\s[^>]*)?>").expect("Invalid template regex")
});

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<script\b([^>]*)>(.*?)</script>").expect("Invalid script regex")
});

static EXPORT_DEFAULT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"export\s+default\b").expect("Invalid export default regex")
});

static OPTIONS_RE: LazyLock<Regex> = LazyLock::new(|| {
    // export default { ... }
    // export default defineComponent({ ... })
    // defineOptions({ ... })
    Regex::new(r"(?:export\s+default\s+(?:defineComponent\s*\(\s*)?|defineOptions\s*\(\s*)\{")
        .expect("Invalid options regex")
});

static DEFINE_PROPS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"defineProps\s*(?:<\s*(?:([A-Za-z_$][\w$]*)\s*>\s*\(|(\{))|\()")
        .expect("Invalid defineProps regex")
});

static WITH_DEFAULTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"withDefaults\s*\(").expect("Invalid withDefaults regex")
});

/// Content between the first `<template>` and the last `</template>`.
fn template(source: &str) -> Option<String> {
    let open = TEMPLATE_OPEN_RE.find(source)?;
    let close = source.rfind("</template>")?;
    (close > open.end())
        .then(|| non_empty(&source[open.end()..close]))
        .flatten()
}

fn script_blocks(source: &str) -> Vec<ScriptBlock<'_>> {
    SCRIPT_RE
        .captures_iter(source)
        .filter_map(|cap| {
            Some(ScriptBlock {
                setup: cap.get(1)?.as_str().split_whitespace().any(|a| a == "setup"),
                content: cap.get(2)?.as_str(),
            })
        })
        .collect()
}

fn options_object(script: &str) -> Option<&str> {
    let m = OPTIONS_RE.find(script)?;
    let open = m.end() - 1;
    let close = scan::find_matching(script, open)?;
    Some(&script[open..=close])
}

/// Properties declared with `defineProps`, either form.
fn define_props(script: &str) -> Vec<PropertyDoc> {
    let Some(cap) = DEFINE_PROPS_RE.captures(script) else {
        return Vec::new();
    };

    if let Some(brace) = cap.get(2) {
        // defineProps<{ ... }>()
        return scan::find_matching(script, brace.start())
            .map(|close| type_members(&script[brace.start() + 1..close]))
            .unwrap_or_default();
    }
    if let Some(ident) = cap.get(1) {
        // defineProps<Props>()
        return named_type_body(script, ident.as_str())
            .map(type_members)
            .unwrap_or_default();
    }

    // defineProps({ ... }) or defineProps([...])
    let Some(whole) = cap.get(0) else {
        return Vec::new();
    };
    let open = whole.end() - 1;
    scan::find_matching(script, open)
        .map(|close| runtime_props(&script[open + 1..close]))
        .unwrap_or_default()
}

/// Body of `interface Name {}` or `type Name = {}` declared in the script.
fn named_type_body<'a>(script: &'a str, name: &str) -> Option<&'a str> {
    let pattern = format!(
        r"(?:interface\s+{0}\b[^{{]*\{{|type\s+{0}\s*=\s*\{{)",
        regex::escape(name)
    );
    let m = Regex::new(&pattern).ok()?.find(script)?;
    let open = m.end() - 1;
    let close = scan::find_matching(script, open)?;
    Some(&script[open + 1..close])
}

/// Runtime prop declarations: `{ label: String, size: { type: String, default: 'md' } }`
/// or `['label', 'size']`.
fn runtime_props(text: &str) -> Vec<PropertyDoc> {
    let text = text.trim();

    if text.starts_with('[') {
        return scan::inner(text)
            .map(|body| {
                scan::split_top_level(body, b',')
                    .into_iter()
                    .filter_map(string_literal)
                    .map(PropertyDoc::new)
                    .collect()
            })
            .unwrap_or_default();
    }

    scan::object_entries(text)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| match entry {
            Entry::Pair { key, value } if value.starts_with('{') => Some(PropertyDoc {
                name: key.to_string(),
                ty: scan::object_value(value, "type").and_then(non_empty),
                default_value: scan::object_value(value, "default").and_then(non_empty),
                description: None,
            }),
            Entry::Pair { key, value } => Some(PropertyDoc {
                name: key.to_string(),
                ty: non_empty(value),
                ..PropertyDoc::default()
            }),
            Entry::Shorthand(key) => Some(PropertyDoc::new(key)),
            _ => None,
        })
        .collect()
}

/// Defaults from `withDefaults(defineProps<...>(), { ... })`.
fn with_defaults(script: &str) -> Vec<(String, String)> {
    let Some(m) = WITH_DEFAULTS_RE.find(script) else {
        return Vec::new();
    };
    let open = m.end() - 1;
    let Some(close) = scan::find_matching(script, open) else {
        return Vec::new();
    };

    let args = scan::split_top_level(&script[open + 1..close], b',');
    let Some(defaults) = args.get(1) else {
        return Vec::new();
    };

    scan::object_entries(defaults)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| match entry {
            Entry::Pair { key, value } => Some((key.to_string(), non_empty(value)?)),
            _ => None,
        })
        .collect()
}

/// A `<!-- ... -->` comment opening the file.
fn leading_html_comment(source: &str) -> Option<String> {
    let body = source.trim_start().strip_prefix("<!--")?;
    let end = body.find("-->")?;
    non_empty(&body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(source: &str) -> Option<ComponentDoc> {
        VueExtractor.extract(source, Path::new("Button.vue"))
    }

    #[test]
    fn extracts_script_setup_component() {
        let source = r#"<!-- Primary UI component for user interaction -->
<template>
  <button type="button" :class="classes" @click="onClick">{{ label }}</button>
  <template v-if="icon"><i :class="icon" /></template>
</template>

<script setup lang="ts">
import { computed } from 'vue';

const props = withDefaults(
  defineProps<{
    /** The label of the button */
    label: string;
    /** primary or secondary button */
    primary?: boolean;
    size?: 'small' | 'medium' | 'large';
  }>(),
  { primary: false, size: 'medium' },
);

const emit = defineEmits<{ (e: 'click', id: number): void }>();
</script>
"#;
        let doc = extract(source).unwrap();

        assert_eq!(
            doc.description.as_deref(),
            Some("Primary UI component for user interaction")
        );
        let template = doc.template.as_deref().unwrap();
        assert!(template.starts_with("<button"));
        assert!(template.ends_with("</template>"));
        assert!(doc.component_code.as_deref().unwrap().starts_with("import { computed }"));
        assert_eq!(doc.name, None);

        assert_eq!(
            doc.properties,
            vec![
                PropertyDoc {
                    name: "label".into(),
                    ty: Some("string".into()),
                    default_value: None,
                    description: Some("The label of the button".into()),
                },
                PropertyDoc {
                    name: "primary".into(),
                    ty: Some("boolean".into()),
                    default_value: Some("false".into()),
                    description: Some("primary or secondary button".into()),
                },
                PropertyDoc {
                    name: "size".into(),
                    ty: Some("'small' | 'medium' | 'large'".into()),
                    default_value: Some("'medium'".into()),
                    description: None,
                },
            ]
        );
    }

    #[test]
    fn extracts_options_api_component() {
        let source = r#"<template>
  <div class="card"><slot /></div>
</template>

<script>
/** A bordered container */
export default {
  name: 'my-card',
  props: {
    title: String,
    elevation: { type: Number, default: 1 },
    tags: [Array, String],
  },
};
</script>
"#;
        let doc = extract(source).unwrap();

        assert_eq!(doc.name.as_deref(), Some("my-card"));
        assert_eq!(doc.selector.as_deref(), Some("my-card"));
        assert_eq!(doc.description.as_deref(), Some("A bordered container"));
        assert_eq!(doc.template.as_deref(), Some("<div class=\"card\"><slot /></div>"));

        let elevation = doc.property("elevation").unwrap();
        assert_eq!(elevation.ty.as_deref(), Some("Number"));
        assert_eq!(elevation.default_value.as_deref(), Some("1"));
        assert_eq!(doc.property("title").unwrap().ty.as_deref(), Some("String"));
        assert_eq!(doc.property("tags").unwrap().ty.as_deref(), Some("[Array, String]"));
    }

    #[test]
    fn reads_named_props_type_and_array_props() {
        let named = r#"<script setup lang="ts">
interface Props { msg: string; count?: number }
defineProps<Props>();
defineOptions({ name: 'Hello' });
</script>"#;
        let doc = extract(named).unwrap();
        assert_eq!(doc.name.as_deref(), Some("Hello"));
        assert_eq!(doc.properties.len(), 2);
        assert_eq!(doc.properties[1].ty.as_deref(), Some("number"));
        assert_eq!(doc.template, None);

        let array = "<script setup>\ndefineProps(['title', 'likes'])\n</script>";
        let names: Vec<_> = extract(array)
            .unwrap()
            .properties
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["title", "likes"]);
    }

    #[test]
    fn nothing_recognizable() {
        assert_eq!(extract("just some text"), None);
    }
}
