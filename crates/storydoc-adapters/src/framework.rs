//! Framework detection.
//!
//! Detection looks at the Storybook configuration first, then the package
//! manifest, then workspace markers. It never fails: a project that matches
//! nothing is [`Framework::Unknown`].

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::angular::AngularExtractor;
use crate::react::ReactExtractor;
use crate::traits::ComponentExtractor;
use crate::vue::VueExtractor;
use crate::web_components::WebComponentExtractor;

/// The component conventions storydoc understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framework {
    /// Decorated classes with markup templates (Angular)
    MarkupTemplate,
    /// Function or class components returning JSX (React)
    JsxComponent,
    /// `.vue` single-file components (Vue 3)
    SingleFileComponent,
    /// Custom elements with tagged template literals (Lit / Web Components)
    TemplateDescription,
    #[default]
    Unknown,
}

static ANGULAR: AngularExtractor = AngularExtractor;
static REACT: ReactExtractor = ReactExtractor;
static VUE: VueExtractor = VueExtractor;
static WEB_COMPONENTS: WebComponentExtractor = WebComponentExtractor;

impl Framework {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MarkupTemplate => "markup-template",
            Self::JsxComponent => "jsx-component",
            Self::SingleFileComponent => "single-file-component",
            Self::TemplateDescription => "template-description",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a framework name as written in configuration.
    ///
    /// Accepts the canonical names and the ecosystem names (`angular`,
    /// `react`, `vue`, `lit`, `web-components`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "markup-template" | "angular" => Some(Self::MarkupTemplate),
            "jsx-component" | "react" | "jsx" => Some(Self::JsxComponent),
            "single-file-component" | "vue" | "vue3" => Some(Self::SingleFileComponent),
            "template-description" | "web-components" | "lit" => {
                Some(Self::TemplateDescription)
            }
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// The component extractor for this framework.
    pub fn extractor(&self) -> Option<&'static dyn ComponentExtractor> {
        match self {
            Self::MarkupTemplate => Some(&ANGULAR),
            Self::JsxComponent => Some(&REACT),
            Self::SingleFileComponent => Some(&VUE),
            Self::TemplateDescription => Some(&WEB_COMPONENTS),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const STORYBOOK_CONFIGS: [&str; 4] = [
    ".storybook/main.ts",
    ".storybook/main.js",
    ".storybook/main.mjs",
    ".storybook/main.cjs",
];

/// Storybook framework packages by prefix.
const FRAMEWORK_PACKAGES: [(&str, Framework); 6] = [
    ("@storybook/angular", Framework::MarkupTemplate),
    ("@storybook/vue", Framework::SingleFileComponent),
    ("@storybook/web-components", Framework::TemplateDescription),
    ("@storybook/react", Framework::JsxComponent),
    ("@storybook/nextjs", Framework::JsxComponent),
    ("@storybook/preact", Framework::JsxComponent),
];

/// Manifest dependencies, in precedence order.
const DEPENDENCY_SIGNATURES: [(&str, Framework); 5] = [
    ("@angular/core", Framework::MarkupTemplate),
    ("vue", Framework::SingleFileComponent),
    ("lit", Framework::TemplateDescription),
    ("@storybook/web-components", Framework::TemplateDescription),
    ("react", Framework::JsxComponent),
];

const MANIFEST_SECTIONS: [&str; 3] = ["dependencies", "devDependencies", "peerDependencies"];

static FRAMEWORK_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    // framework: '@storybook/angular'
    // framework: { name: '@storybook/react-vite', options: {} }
    // framework: { name: getAbsolutePath('@storybook/vue3-vite') }
    Regex::new(r#"framework\s*:\s*(?:\{\s*name\s*:\s*)?(?:[\w.]+\(\s*)?['"]([^'"\n]+)['"]"#)
        .expect("Invalid framework field regex")
});

static PACKAGE_STRING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"['"](@storybook/[\w-]+)['"]"#).expect("Invalid package string regex")
});

/// Detect the framework used by the project at `project_root`.
pub fn detect(project_root: &Path) -> Framework {
    detect_from_storybook_config(project_root)
        .or_else(|| detect_from_manifest(project_root))
        .or_else(|| {
            project_root
                .join("angular.json")
                .is_file()
                .then_some(Framework::MarkupTemplate)
        })
        .unwrap_or(Framework::Unknown)
}

static DETECTED: LazyLock<RwLock<HashMap<PathBuf, Framework>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// [`detect`], memoized per project root for the life of the process.
pub fn detect_cached(project_root: &Path) -> Framework {
    let cached = DETECTED
        .read()
        .ok()
        .and_then(|cache| cache.get(project_root).copied());
    if let Some(framework) = cached {
        return framework;
    }

    let framework = detect(project_root);
    if let Ok(mut cache) = DETECTED.write() {
        cache.insert(project_root.to_path_buf(), framework);
    }
    framework
}

fn detect_from_storybook_config(project_root: &Path) -> Option<Framework> {
    STORYBOOK_CONFIGS.iter().find_map(|config| {
        let source = fs::read_to_string(project_root.join(config)).ok()?;

        // The framework field decides; any other framework package string
        // (e.g. a type import) is a fallback.
        FRAMEWORK_FIELD_RE
            .captures(&source)
            .and_then(|c| framework_for_package(&c[1]))
            .or_else(|| {
                PACKAGE_STRING_RE
                    .captures_iter(&source)
                    .find_map(|c| framework_for_package(&c[1]))
            })
    })
}

fn framework_for_package(package: &str) -> Option<Framework> {
    FRAMEWORK_PACKAGES
        .iter()
        .find(|(prefix, _)| package.starts_with(prefix))
        .map(|(_, framework)| *framework)
}

fn detect_from_manifest(project_root: &Path) -> Option<Framework> {
    let json = fs::read_to_string(project_root.join("package.json")).ok()?;
    let manifest: Value = serde_json::from_str(&json).ok()?;

    let has_dependency = |name: &str| {
        MANIFEST_SECTIONS.iter().any(|section| {
            manifest
                .get(section)
                .and_then(Value::as_object)
                .is_some_and(|deps| deps.contains_key(name))
        })
    };

    DEPENDENCY_SIGNATURES
        .iter()
        .find(|(name, _)| has_dependency(name))
        .map(|(_, framework)| *framework)
}
