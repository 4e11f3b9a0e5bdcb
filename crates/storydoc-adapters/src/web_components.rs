//! Web Components extractor: custom elements described by tagged templates.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use storydoc_csf::scan::{self, Entry};

use crate::doc::{non_empty, ComponentDoc, PropertyDoc};
use crate::framework::Framework;
use crate::traits::ComponentExtractor;

/// Extracts docs from custom element classes (Lit and plain `HTMLElement`).
#[derive(Debug, Default)]
pub struct WebComponentExtractor;

impl ComponentExtractor for WebComponentExtractor {
    fn framework(&self) -> Framework {
        Framework::TemplateDescription
    }

    fn extensions(&self) -> &[&'static str] {
        &["ts", "js"]
    }

    fn extract(&self, source: &str, _path: &Path) -> Option<ComponentDoc> {
        let decorator = CUSTOM_ELEMENT_RE.captures(source);
        let class = CLASS_RE.captures(source);

        let selector = decorator
            .as_ref()
            .map(|c| c[1].to_string())
            .or_else(|| DEFINE_RE.captures(source).map(|c| c[1].to_string()));

        let start = [
            decorator.as_ref().and_then(|c| c.get(0)),
            class.as_ref().and_then(|c| c.get(0)),
        ]
        .into_iter()
        .flatten()
        .map(|m| m.start())
        .min();

        if selector.is_none() && start.is_none() {
            return None;
        }

        let mut properties = decorated_properties(source);
        properties.extend(static_properties(source));

        Some(ComponentDoc {
            name: class.as_ref().map(|c| c[1].to_string()),
            selector,
            template: render_template(source),
            component_code: start.and_then(|s| non_empty(&source[s..])),
            properties,
            description: start.and_then(|s| scan::comment_before(source, s)),
        })
    }
}

static CUSTOM_ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"@customElement\(\s*['"]([^'"]+)['"]\s*\)"#)
        .expect("Invalid customElement regex")
});

static DEFINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"customElements\.define\(\s*['"]([^'"]+)['"]"#)
        .expect("Invalid customElements.define regex")
});

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:export\s+)?(?:default\s+)?class\s+([A-Za-z_$][\w$]*)\s+extends\b")
        .expect("Invalid class regex")
});

static RENDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\brender\s*\(\s*\)").expect("Invalid render regex")
});

static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bhtml\s*`").expect("Invalid html tag regex")
});

static PROPERTY_DECORATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    // @property({ type: Boolean }) primary = false;
    // @property() declare label: string;
    Regex::new(
        r"@property\s*\(([^)]*)\)\s*(?:(?:declare|public|protected|readonly|accessor)\s+)*([A-Za-z_$][\w$]*)\s*[?!]?\s*(?::\s*([^=;\n]+?))?\s*(?:=\s*([^;\n]+?))?\s*;",
    )
    .expect("Invalid property decorator regex")
});

static STATIC_PROPERTIES_RE: LazyLock<Regex> = LazyLock::new(|| {
    // static properties = { ... }
    // static get properties() { return { ... }; }
    Regex::new(r"static\s+(?:properties\s*=|get\s+properties\s*\(\s*\)\s*\{\s*return)\s*\{")
        .expect("Invalid static properties regex")
});

/// The `html` tagged template returned by `render()`, else the first one.
fn render_template(source: &str) -> Option<String> {
    let from = RENDER_RE.find(source).map_or(0, |m| m.end());
    let tag = HTML_TAG_RE.find_at(source, from)?;
    let open = tag.end() - 1;
    let end = scan::skip_string(source, open);
    let body = source.get(open + 1..end.checked_sub(1)?)?;
    non_empty(body)
}

fn decorated_properties(source: &str) -> Vec<PropertyDoc> {
    PROPERTY_DECORATOR_RE
        .captures_iter(source)
        .filter_map(|cap| {
            let whole = cap.get(0)?;
            Some(PropertyDoc {
                name: cap[2].to_string(),
                ty: cap
                    .get(3)
                    .and_then(|m| non_empty(m.as_str()))
                    .or_else(|| scan::object_value(cap[1].trim(), "type").and_then(non_empty)),
                default_value: cap.get(4).and_then(|m| non_empty(m.as_str())),
                description: scan::comment_before(source, whole.start()),
            })
        })
        .collect()
}

/// Properties declared in a `static properties` map, skipping internal state.
fn static_properties(source: &str) -> Vec<PropertyDoc> {
    let Some(m) = STATIC_PROPERTIES_RE.find(source) else {
        return Vec::new();
    };
    let open = m.end() - 1;
    let Some(close) = scan::find_matching(source, open) else {
        return Vec::new();
    };

    scan::object_entries(&source[open..=close])
        .unwrap_or_default()
        .into_iter()
        .filter_map(|entry| {
            let Entry::Pair { key, value } = entry else {
                return None;
            };
            if scan::object_value(value, "state").is_some_and(|v| v.trim() == "true") {
                return None;
            }
            Some(PropertyDoc {
                name: key.to_string(),
                ty: scan::object_value(value, "type").and_then(non_empty),
                default_value: constructor_default(source, key),
                description: None,
            })
        })
        .collect()
}

/// `this.name = value;` as assigned in the class body.
fn constructor_default(source: &str, name: &str) -> Option<String> {
    let pattern = format!(r"this\.{}\s*=\s*([^;\n=][^;\n]*?)\s*;", regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    re.captures(source).and_then(|c| non_empty(&c[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(source: &str) -> Option<ComponentDoc> {
        WebComponentExtractor.extract(source, Path::new("my-button.ts"))
    }

    #[test]
    fn extracts_lit_element() {
        let source = r#"import { LitElement, html, css } from 'lit';
import { customElement, property } from 'lit/decorators.js';

/**
 * Primary UI component for user interaction
 */
@customElement('my-button')
export class MyButton extends LitElement {
  static styles = css`:host { display: inline-block; }`;

  /** Is this the principal call to action on the page? */
  @property({ type: Boolean }) primary = false;

  @property() label: string = 'Button';

  @property({ type: Array }) items: string[] = [];

  @state() private pressed = false;

  render() {
    return html`<button class=${this.primary ? 'primary' : ''}>${this.label}</button>`;
  }
}
"#;
        let doc = extract(source).unwrap();

        assert_eq!(doc.selector.as_deref(), Some("my-button"));
        assert_eq!(doc.name.as_deref(), Some("MyButton"));
        assert_eq!(
            doc.template.as_deref(),
            Some("<button class=${this.primary ? 'primary' : ''}>${this.label}</button>")
        );
        assert_eq!(
            doc.description.as_deref(),
            Some("Primary UI component for user interaction")
        );
        assert!(doc.component_code.as_deref().unwrap().starts_with("@customElement('my-button')"));

        assert_eq!(
            doc.properties,
            vec![
                PropertyDoc {
                    name: "primary".into(),
                    ty: Some("Boolean".into()),
                    default_value: Some("false".into()),
                    description: Some("Is this the principal call to action on the page?".into()),
                },
                PropertyDoc {
                    name: "label".into(),
                    ty: Some("string".into()),
                    default_value: Some("'Button'".into()),
                    description: None,
                },
                PropertyDoc {
                    name: "items".into(),
                    ty: Some("string[]".into()),
                    default_value: Some("[]".into()),
                    description: None,
                },
            ]
        );
    }

    #[test]
    fn extracts_static_properties_and_define() {
        let source = r#"
export class FancyTag extends LitElement {
  static properties = {
    text: { type: String },
    count: { type: Number, reflect: true },
    _open: { state: true },
  };

  constructor() {
    super();
    this.text = 'Tag';
    this.count = 0;
  }

  render() {
    return html`<span>${this.text}</span>`;
  }
}

customElements.define('fancy-tag', FancyTag);
"#;
        let doc = extract(source).unwrap();

        assert_eq!(doc.selector.as_deref(), Some("fancy-tag"));
        assert_eq!(doc.name.as_deref(), Some("FancyTag"));
        assert_eq!(doc.template.as_deref(), Some("<span>${this.text}</span>"));
        assert_eq!(doc.properties.len(), 2);
        assert_eq!(doc.properties[0].default_value.as_deref(), Some("'Tag'"));
        assert_eq!(doc.properties[1].ty.as_deref(), Some("Number"));
        assert_eq!(doc.properties[1].default_value.as_deref(), Some("0"));
    }

    #[test]
    fn no_custom_element() {
        assert_eq!(extract("export const x = 1;"), None);
    }
}
