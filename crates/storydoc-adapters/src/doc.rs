//! Component documentation types.

use serde::Serialize;
use storydoc_csf::scan;

/// Documentation extracted from one component file.
///
/// Every field is optional. Present values are slices of the component's
/// source text, trimmed, never synthesized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDoc {
    /// Class or function name (e.g., "ButtonComponent", "Button")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Markup selector or custom element tag (e.g., "app-button")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,

    /// Template markup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,

    /// Component source from the declaration on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_code: Option<String>,

    /// Declared inputs / props, in source order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyDoc>,

    /// Doc comment attached to the component
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ComponentDoc {
    /// Whether nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.selector.is_none()
            && self.template.is_none()
            && self.component_code.is_none()
            && self.properties.is_empty()
            && self.description.is_none()
    }

    /// The name a usage snippet invokes the component by.
    pub fn identity(&self) -> Option<&str> {
        self.selector.as_deref().or(self.name.as_deref())
    }
}

#[cfg(test)]
impl ComponentDoc {
    pub(crate) fn property(&self, name: &str) -> Option<&PropertyDoc> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// One declared input of a component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropertyDoc {
    pub name: String,

    /// Type annotation as written
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,

    /// Default value expression as written
    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PropertyDoc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Read the members of an interface or type literal body as properties.
///
/// Index signatures and spreads are skipped. A doc comment on its own line
/// attaches to the member that follows it.
pub(crate) fn type_members(body: &str) -> Vec<PropertyDoc> {
    let mut properties = Vec::new();
    let mut pending_doc = None;

    for chunk in scan::split_members(body) {
        let (doc, rest) = scan::split_leading_comments(chunk);
        if rest.is_empty() {
            pending_doc = doc.or(pending_doc);
            continue;
        }
        let doc = doc.or(pending_doc.take());
        if rest.starts_with(['[', '(', '.']) {
            continue;
        }

        let (name, ty) = match scan::find_top_level(rest, b':') {
            Some(colon) if !rest[..colon].contains('(') => {
                (&rest[..colon], non_empty(&rest[colon + 1..]))
            }
            _ => match rest.find('(') {
                Some(paren) => (&rest[..paren], non_empty(&rest[paren..])),
                None => (rest, None),
            },
        };

        let name = name.trim();
        let name = name.strip_prefix("readonly ").unwrap_or(name).trim();
        let name = name.trim_end_matches('?').trim_matches(['\'', '"']);
        if !scan::is_identifier(name) && !name.contains('-') {
            continue;
        }

        properties.push(PropertyDoc {
            name: name.to_string(),
            ty,
            default_value: None,
            description: doc,
        });
    }

    properties
}

/// Trimmed text, or `None` when only whitespace remains.
pub(crate) fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_interface_members() {
        let body = r#"
  /** Is this the principal call to action? */
  primary?: boolean;
  /** Button contents */
  label: string;
  size?: 'small' | 'medium' | 'large';
  readonly tags: Array<string>;
  onClick?: () => void;
  [key: string]: unknown;
"#;

        let props = type_members(body);
        let names: Vec<_> = props.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["primary", "label", "size", "tags", "onClick"]);
        assert_eq!(
            props[0].description.as_deref(),
            Some("Is this the principal call to action?")
        );
        assert_eq!(props[2].ty.as_deref(), Some("'small' | 'medium' | 'large'"));
        assert_eq!(props[3].ty.as_deref(), Some("Array<string>"));
        assert_eq!(props[4].ty.as_deref(), Some("() => void"));
        assert_eq!(props[2].description, None);
    }

    #[test]
    fn reads_method_members() {
        let props = type_members("focus(): void; label: string");

        assert_eq!(props[0].name, "focus");
        assert_eq!(props[0].ty.as_deref(), Some("(): void"));
        assert_eq!(props[1].name, "label");
    }

    #[test]
    fn empty_doc_is_empty() {
        assert!(ComponentDoc::default().is_empty());
        let doc = ComponentDoc {
            name: Some("Button".into()),
            ..Default::default()
        };
        assert!(!doc.is_empty());
        assert_eq!(doc.identity(), Some("Button"));
    }

    #[test]
    fn serializes_camel_case_and_skips_absent_fields() {
        let doc = ComponentDoc {
            selector: Some("app-button".into()),
            component_code: Some("export class ButtonComponent {}".into()),
            properties: vec![PropertyDoc {
                name: "label".into(),
                ty: Some("string".into()),
                default_value: Some("'Button'".into()),
                description: None,
            }],
            ..Default::default()
        };

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "selector": "app-button",
                "componentCode": "export class ButtonComponent {}",
                "properties": [{ "name": "label", "type": "string", "default": "'Button'" }]
            })
        );
    }
}
