//! Usage snippets for story variants.
//!
//! A snippet shows how to invoke a component with one variant's args in the
//! framework's own template syntax. Output depends only on the inputs and the
//! args' insertion order.

use indexmap::IndexMap;
use serde_json::Value;

use crate::framework::Framework;

/// Render a usage snippet for one story variant.
///
/// # Arguments
/// * `identity` - Selector, tag or component name to invoke
/// * `args` - The variant's args, in declaration order
/// * `variant_name` - Story name, written as a leading comment
/// * `framework` - Selects the template syntax
pub fn generate_usage_example(
    identity: &str,
    args: &IndexMap<String, Value>,
    variant_name: &str,
    framework: Framework,
) -> String {
    match framework {
        Framework::MarkupTemplate => angular_usage(identity, args, variant_name),
        Framework::JsxComponent => jsx_usage(identity, args, variant_name),
        Framework::SingleFileComponent => vue_usage(identity, args, variant_name),
        Framework::TemplateDescription => lit_usage(identity, args, variant_name),
        Framework::Unknown => generic_usage(identity, args, variant_name),
    }
}

fn angular_usage(selector: &str, args: &IndexMap<String, Value>, variant: &str) -> String {
    let (tag, mut attrs) = selector_element(selector);
    attrs.extend(args.iter().map(|(key, value)| match value {
        Value::String(s) => format!(r#"{key}="{}""#, attr_escape(s)),
        other => format!(r#"[{key}]="{}""#, attr_escape(&to_js_literal(other))),
    }));

    format!(
        "{}\n<{tag}{}></{tag}>",
        html_comment(variant),
        join_attrs(&attrs)
    )
}

/// Element and host attributes matching the first simple selector of a
/// selector list: `button[app-button]` is `<button app-button>`, a bare
/// `[appButton]` lands on a `div`.
fn selector_element(selector: &str) -> (String, Vec<String>) {
    let first = selector.split(',').next().unwrap_or_default().trim();
    let end = first
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(first.len());
    let (tag, mut rest) = first.split_at(end);

    let mut attrs = Vec::new();
    let mut classes = Vec::new();
    while let Some(c) = rest.chars().next() {
        match c {
            '[' => {
                let close = rest.find(']').unwrap_or(rest.len());
                let attr = rest[1..close].trim();
                match attr.split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim().trim_matches(['\'', '"']);
                        attrs.push(format!(r#"{}="{}""#, name.trim(), attr_escape(value)));
                    }
                    None if !attr.is_empty() => attrs.push(attr.to_string()),
                    None => {}
                }
                rest = rest.get(close + 1..).unwrap_or_default();
            }
            '.' | '#' | ':' => {
                let body = &rest[1..];
                let len = body
                    .find(|c: char| matches!(c, '[' | '.' | '#' | ':' | '('))
                    .unwrap_or(body.len());
                match c {
                    '.' => classes.push(&body[..len]),
                    '#' => attrs.push(format!(r#"id="{}""#, &body[..len])),
                    // `:not(...)` and friends do not describe the host.
                    _ => {}
                }
                rest = &body[len..];
                if rest.starts_with('(') {
                    let close = rest.find(')').unwrap_or(rest.len() - 1);
                    rest = &rest[close + 1..];
                }
            }
            _ => rest = &rest[c.len_utf8()..],
        }
    }
    if !classes.is_empty() {
        attrs.insert(0, format!(r#"class="{}""#, classes.join(" ")));
    }

    let tag = if tag.is_empty() { "div" } else { tag };
    (tag.to_string(), attrs)
}

fn jsx_usage(name: &str, args: &IndexMap<String, Value>, variant: &str) -> String {
    let mut children = None;
    let mut attrs = Vec::new();

    for (key, value) in args {
        match value {
            Value::String(s) if key == "children" => children = Some(s.as_str()),
            Value::String(s) if s.contains('"') => {
                attrs.push(format!("{key}={{{}}}", Value::String(s.clone())));
            }
            Value::String(s) => attrs.push(format!(r#"{key}="{s}""#)),
            other => attrs.push(format!("{key}={{{}}}", to_js_literal(other))),
        }
    }

    let element = match children {
        Some(children) => format!("<{name}{}>{}</{name}>", join_attrs(&attrs), jsx_text(children)),
        None => format!("<{name}{} />", join_attrs(&attrs)),
    };
    format!("// {variant}\n{element}")
}

/// JSX text, wrapped as an expression when it holds markup characters.
fn jsx_text(text: &str) -> String {
    if text.contains(['{', '}', '<', '>']) {
        format!("{{{}}}", Value::String(text.to_string()))
    } else {
        text.to_string()
    }
}

fn vue_usage(name: &str, args: &IndexMap<String, Value>, variant: &str) -> String {
    let attrs: Vec<String> = args
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!(r#"{key}="{}""#, attr_escape(s)),
            other => format!(r#":{key}="{}""#, attr_escape(&to_js_literal(other))),
        })
        .collect();

    format!("{}\n<{name}{} />", html_comment(variant), join_attrs(&attrs))
}

fn lit_usage(tag: &str, args: &IndexMap<String, Value>, variant: &str) -> String {
    let attrs: Vec<String> = args
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!(r#"{key}="{}""#, template_escape(&attr_escape(s))),
            Value::Bool(_) => format!("?{key}=${{{value}}}"),
            other => format!(".{key}=${{{}}}", template_escape(&to_js_literal(other))),
        })
        .collect();

    format!("// {variant}\nhtml`<{tag}{}></{tag}>`", join_attrs(&attrs))
}

fn generic_usage(name: &str, args: &IndexMap<String, Value>, variant: &str) -> String {
    let attrs: Vec<String> = args
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!(r#"{key}="{}""#, attr_escape(s)),
            other => format!("{key}='{}'", other.to_string().replace('\'', "&#39;")),
        })
        .collect();

    format!(
        "{}\n<{name}{}></{name}>",
        html_comment(variant),
        join_attrs(&attrs)
    )
}

/// Render a JSON value as a JavaScript literal with single-quoted strings.
pub fn to_js_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("'{}'", escape_string(s)),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(to_js_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{}: {}", js_key(key), to_js_literal(value)))
                .collect();
            format!("{{ {} }}", entries.join(", "))
        }
    }
}

fn js_key(key: &str) -> String {
    if storydoc_csf::scan::is_identifier(key) {
        key.to_string()
    } else {
        format!("'{}'", escape_string(key))
    }
}

fn join_attrs(attrs: &[String]) -> String {
    if attrs.is_empty() {
        String::new()
    } else {
        format!(" {}", attrs.join(" "))
    }
}

fn html_comment(text: &str) -> String {
    format!("<!-- {} -->", text.replace("--", "- -"))
}

/// Escape a string for a single-quoted JavaScript literal.
fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
}

/// Escape for a double-quoted attribute value.
fn attr_escape(s: &str) -> String {
    s.replace('"', "&quot;")
}

/// Keep text inert inside a template literal.
fn template_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn args(value: Value) -> IndexMap<String, Value> {
        value
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    #[test]
    fn angular_snippet() {
        let usage = generate_usage_example(
            "app-button",
            &args(json!({ "label": "Click me", "primary": true })),
            "Primary",
            Framework::MarkupTemplate,
        );

        assert_eq!(
            usage,
            "<!-- Primary -->\n<app-button label=\"Click me\" [primary]=\"true\"></app-button>"
        );
    }

    #[test]
    fn angular_snippet_without_args() {
        let usage =
            generate_usage_example("app-button", &IndexMap::new(), "Default", Framework::MarkupTemplate);

        assert_eq!(usage, "<!-- Default -->\n<app-button></app-button>");
    }

    #[test]
    fn angular_attribute_selectors() {
        let args = args(json!({ "label": "Go" }));
        let usage = |selector: &str| generate_usage_example(selector, &args, "Go", Framework::MarkupTemplate);

        assert_eq!(
            usage("button[app-button]"),
            "<!-- Go -->\n<button app-button label=\"Go\"></button>"
        );
        assert_eq!(
            usage("app-button, [appButton]"),
            "<!-- Go -->\n<app-button label=\"Go\"></app-button>"
        );
        assert_eq!(
            usage("[appButton]"),
            "<!-- Go -->\n<div appButton label=\"Go\"></div>"
        );
        assert_eq!(
            usage("a.btn[appLink][kind=\"primary\"]:not(.off)"),
            "<!-- Go -->\n<a class=\"btn\" appLink kind=\"primary\" label=\"Go\"></a>"
        );
    }

    #[test]
    fn jsx_snippet() {
        let usage = generate_usage_example(
            "Button",
            &args(json!({
                "label": "Say \"hi\"",
                "size": "large",
                "count": 2,
                "style": { "color": "red" },
                "children": "Go"
            })),
            "Large",
            Framework::JsxComponent,
        );

        assert_eq!(
            usage,
            "// Large\n<Button label={\"Say \\\"hi\\\"\"} size=\"large\" count={2} style={{ color: 'red' }}>Go</Button>"
        );
        assert_eq!(
            generate_usage_example("Button", &IndexMap::new(), "Empty", Framework::JsxComponent),
            "// Empty\n<Button />"
        );
    }

    #[test]
    fn jsx_children_with_markup_are_quoted() {
        let usage = generate_usage_example(
            "Code",
            &args(json!({ "children": "Use {x} <b>here</b>" })),
            "Inline",
            Framework::JsxComponent,
        );

        assert_eq!(usage, "// Inline\n<Code>{\"Use {x} <b>here</b>\"}</Code>");
    }

    #[test]
    fn vue_snippet() {
        let usage = generate_usage_example(
            "MyButton",
            &args(json!({ "label": "It's", "tags": ["a", "b"] })),
            "Tagged",
            Framework::SingleFileComponent,
        );

        assert_eq!(
            usage,
            "<!-- Tagged -->\n<MyButton label=\"It's\" :tags=\"['a', 'b']\" />"
        );
    }

    #[test]
    fn lit_snippet() {
        let usage = generate_usage_example(
            "my-button",
            &args(json!({ "label": "Click", "primary": false, "items": [1, 2] })),
            "Secondary",
            Framework::TemplateDescription,
        );

        assert_eq!(
            usage,
            "// Secondary\nhtml`<my-button label=\"Click\" ?primary=${false} .items=${[1, 2]}></my-button>`"
        );
    }

    #[test]
    fn generic_snippet() {
        let usage = generate_usage_example(
            "Widget",
            &args(json!({ "title": "Hello", "options": { "dense": true } })),
            "Basic",
            Framework::Unknown,
        );

        assert_eq!(
            usage,
            "<!-- Basic -->\n<Widget title=\"Hello\" options='{\"dense\":true}'></Widget>"
        );
    }

    #[test]
    fn generation_is_deterministic_and_ordered() {
        let args = args(json!({ "zeta": 1, "alpha": "a", "mid": null }));

        let first = generate_usage_example("x-el", &args, "Order", Framework::MarkupTemplate);
        let second = generate_usage_example("x-el", &args, "Order", Framework::MarkupTemplate);

        assert_eq!(first, second);
        assert_eq!(
            first,
            "<!-- Order -->\n<x-el [zeta]=\"1\" alpha=\"a\" [mid]=\"null\"></x-el>"
        );
    }

    #[test]
    fn js_literals() {
        assert_eq!(
            to_js_literal(&json!({ "a-b": "it's", "n": [1.5, null], "e": {} })),
            "{ 'a-b': 'it\\'s', n: [1.5, null], e: {} }"
        );
        assert_eq!(
            to_js_literal(&json!("say \"x\"")),
            "'say \"x\"'"
        );
    }
}
