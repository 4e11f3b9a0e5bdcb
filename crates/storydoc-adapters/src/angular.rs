//! Angular extractor: decorated component classes with markup templates.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use storydoc_csf::{scan, string_literal};

use crate::doc::{non_empty, ComponentDoc, PropertyDoc};
use crate::framework::Framework;
use crate::traits::ComponentExtractor;

/// Extracts docs from `@Component` classes.
#[derive(Debug, Default)]
pub struct AngularExtractor;

impl ComponentExtractor for AngularExtractor {
    fn framework(&self) -> Framework {
        Framework::MarkupTemplate
    }

    fn extensions(&self) -> &[&'static str] {
        &["ts"]
    }

    fn extract(&self, source: &str, path: &Path) -> Option<ComponentDoc> {
        let decorator = COMPONENT_DECORATOR_RE.find(source)?;
        let open = decorator.end() - 1;
        let close = scan::find_matching(source, open)?;
        let config = &source[open..=close];

        let selector = scan::object_value(config, "selector").and_then(string_literal);
        let template = scan::object_value(config, "template")
            .and_then(template_text)
            .or_else(|| {
                let url = scan::object_value(config, "templateUrl").and_then(string_literal)?;
                let html = fs::read_to_string(path.parent()?.join(url)).ok()?;
                non_empty(&html)
            });

        let class_body = &source[close..];
        let name = CLASS_RE.captures(class_body).map(|c| c[1].to_string());

        Some(ComponentDoc {
            name,
            selector,
            template,
            component_code: non_empty(&source[decorator.start()..]),
            properties: extract_inputs(source),
            description: scan::comment_before(source, decorator.start()),
        })
    }
}

static COMPONENT_DECORATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@Component\s*\(\s*\{").expect("Invalid component decorator regex")
});

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"class\s+([A-Za-z_$][\w$]*)").expect("Invalid class regex")
});

static INPUT_DECORATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    // @Input() label: string = 'Button';
    // @Input('aria-label') @HostBinding() ariaLabel?: string;
    Regex::new(
        r"@Input\s*\(([^)]*)\)\s*(?:@\w+\([^)]*\)\s*)*(?:(?:public|protected|readonly|override|declare)\s+)*([A-Za-z_$][\w$]*)\s*[?!]?\s*(?::\s*([^=;\n]+?))?\s*(?:=\s*([^;\n]+?))?\s*;",
    )
    .expect("Invalid input decorator regex")
});

static SIGNAL_INPUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    // label = input<string>('Button');
    // size = input.required<'small' | 'large'>();
    Regex::new(
        r"(?m)^[ \t]*(?:(?:public|protected|readonly|override)\s+)*([A-Za-z_$][\w$]*)\s*=\s*(?:input|model)(\.required)?\s*(?:<(.+?)>)?\s*\(",
    )
    .expect("Invalid signal input regex")
});

static ALIAS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"alias\s*:\s*['"]([^'"]+)['"]"#).expect("Invalid alias regex")
});

/// Inline templates keep their text even with `${}` interpolation.
fn template_text(value: &str) -> Option<String> {
    string_literal(value).or_else(|| {
        let value = value.trim();
        let inner = value.strip_prefix('`')?.strip_suffix('`')?;
        non_empty(inner)
    })
}

/// Collect `@Input()` fields and signal inputs in source order.
fn extract_inputs(source: &str) -> Vec<PropertyDoc> {
    let mut found: Vec<(usize, PropertyDoc)> = Vec::new();

    for cap in INPUT_DECORATOR_RE.captures_iter(source) {
        let Some(whole) = cap.get(0) else { continue };
        let args = cap[1].trim();
        let alias = string_literal(args)
            .or_else(|| ALIAS_RE.captures(args).map(|c| c[1].to_string()));

        found.push((
            whole.start(),
            PropertyDoc {
                name: alias.unwrap_or_else(|| cap[2].to_string()),
                ty: cap.get(3).and_then(|m| non_empty(m.as_str())),
                default_value: cap.get(4).and_then(|m| non_empty(m.as_str())),
                description: scan::comment_before(source, whole.start()),
            },
        ));
    }

    for cap in SIGNAL_INPUT_RE.captures_iter(source) {
        let Some(whole) = cap.get(0) else { continue };
        let open = whole.end() - 1;
        let required = cap.get(2).is_some();

        let args = scan::find_matching(source, open)
            .map(|close| scan::split_top_level(&source[open + 1..close], b','))
            .unwrap_or_default();
        let default_value = (!required)
            .then(|| args.first().and_then(|first| non_empty(first)))
            .flatten();
        let alias = args
            .iter()
            .find_map(|arg| ALIAS_RE.captures(arg).map(|c| c[1].to_string()));

        // Skip to the first non-blank character for the doc comment lookup.
        let start = whole.start() + (whole.len() - whole.as_str().trim_start().len());
        found.push((
            start,
            PropertyDoc {
                name: alias.unwrap_or_else(|| cap[1].to_string()),
                ty: cap.get(3).and_then(|m| non_empty(m.as_str())),
                default_value,
                description: scan::comment_before(source, start),
            },
        ));
    }

    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, prop)| prop).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const BUTTON: &str = r#"import { Component, EventEmitter, Input, Output } from '@angular/core';
import { CommonModule } from '@angular/common';

/**
 * Primary UI component for user interaction
 */
@Component({
  selector: 'app-button',
  standalone: true,
  imports: [CommonModule],
  template: `<button type="button" (click)="onClick.emit($event)" [ngClass]="classes">
  {{ label }}
</button>`,
  styleUrls: ['./button.css'],
})
export class ButtonComponent {
  /** Is this the principal call to action on the page? */
  @Input()
  primary = false;

  /** How large should the button be? */
  @Input()
  size: 'small' | 'medium' | 'large' = 'medium';

  /**
   * Button contents
   *
   * @required
   */
  @Input()
  label = 'Button';

  @Input('aria-label') ariaLabel?: string;

  @Input({ required: true }) variant!: string;

  /** Optional click handler */
  @Output()
  onClick = new EventEmitter<Event>();
}
"#;

    fn extract(source: &str) -> Option<ComponentDoc> {
        AngularExtractor.extract(source, Path::new("button.component.ts"))
    }

    #[test]
    fn extracts_selector_template_and_name() {
        let doc = extract(BUTTON).unwrap();

        assert_eq!(doc.selector.as_deref(), Some("app-button"));
        assert_eq!(doc.name.as_deref(), Some("ButtonComponent"));
        assert!(doc.template.as_deref().unwrap().starts_with("<button type=\"button\""));
        assert_eq!(
            doc.description.as_deref(),
            Some("Primary UI component for user interaction")
        );
        assert!(doc.component_code.as_deref().unwrap().starts_with("@Component({"));
        assert!(doc.component_code.as_deref().unwrap().ends_with('}'));
    }

    #[test]
    fn extracts_decorated_inputs() {
        let doc = extract(BUTTON).unwrap();
        let names: Vec<_> = doc.properties.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["primary", "size", "label", "aria-label", "variant"]);

        let size = doc.property("size").unwrap();
        assert_eq!(size.ty.as_deref(), Some("'small' | 'medium' | 'large'"));
        assert_eq!(size.default_value.as_deref(), Some("'medium'"));
        assert_eq!(size.description.as_deref(), Some("How large should the button be?"));

        let primary = doc.property("primary").unwrap();
        assert_eq!(primary.ty, None);
        assert_eq!(primary.default_value.as_deref(), Some("false"));

        assert_eq!(doc.property("label").unwrap().description.as_deref(), Some("Button contents"));
        assert_eq!(doc.property("variant").unwrap().ty.as_deref(), Some("string"));
        assert!(doc.property("onClick").is_none());
    }

    #[test]
    fn extracts_signal_inputs() {
        let source = r#"
@Component({ selector: 'app-badge', template: '<span>{{ text() }}</span>' })
export class BadgeComponent {
  /** Badge text */
  text = input<string>('New');
  tone = input.required<'info' | 'warn'>();
  count = input(0, { alias: 'badgeCount' });
}
"#;
        let doc = extract(source).unwrap();

        assert_eq!(doc.template.as_deref(), Some("<span>{{ text() }}</span>"));
        assert_eq!(
            doc.properties,
            vec![
                PropertyDoc {
                    name: "text".into(),
                    ty: Some("string".into()),
                    default_value: Some("'New'".into()),
                    description: Some("Badge text".into()),
                },
                PropertyDoc {
                    name: "tone".into(),
                    ty: Some("'info' | 'warn'".into()),
                    default_value: None,
                    description: None,
                },
                PropertyDoc {
                    name: "badgeCount".into(),
                    ty: None,
                    default_value: Some("0".into()),
                    description: None,
                },
            ]
        );
    }

    #[test]
    fn reads_external_template() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("card.component.ts");
        fs::write(temp.path().join("card.component.html"), "<div class=\"card\"></div>\n").unwrap();
        let source = r#"@Component({
  selector: 'app-card',
  templateUrl: './card.component.html',
})
export class CardComponent {}"#;

        let doc = AngularExtractor.extract(source, &path).unwrap();

        assert_eq!(doc.template.as_deref(), Some("<div class=\"card\"></div>"));
        assert!(doc.properties.is_empty());
    }

    #[test]
    fn missing_template_file_leaves_template_empty() {
        let source = "@Component({ selector: 'app-x', templateUrl: './nope.html' })\nexport class X {}";
        let doc = extract(source).unwrap();

        assert_eq!(doc.selector.as_deref(), Some("app-x"));
        assert_eq!(doc.template, None);
    }

    #[test]
    fn no_component_decorator() {
        assert_eq!(extract("export class Plain {}"), None);
        assert_eq!(extract("@Component({ selector: 'broken'"), None);
    }
}
