//! Component records as they travel between disk and the JSON API

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StoreError;

/// Component category. Each one owns a top-level directory under the contents root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Blocks,
    Templates,
}

impl ComponentType {
    /// Every category, in listing order
    pub const ALL: [ComponentType; 2] = [ComponentType::Blocks, ComponentType::Templates];

    /// Directory name under the contents root (also the wire name)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blocks => "blocks",
            Self::Templates => "templates",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "blocks" => Some(Self::Blocks),
            "templates" => Some(Self::Templates),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which categories a listing covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(ComponentType),
}

impl TypeFilter {
    /// Parse the `type` query value: "all", "blocks" or "templates"
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" | "" => Some(Self::All),
            other => ComponentType::parse(other).map(Self::Only),
        }
    }

    pub fn kinds(&self) -> &'static [ComponentType] {
        match self {
            Self::All => &ComponentType::ALL,
            Self::Only(ComponentType::Blocks) => &[ComponentType::Blocks],
            Self::Only(ComponentType::Templates) => &[ComponentType::Templates],
        }
    }
}

/// Contents of `metadata.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentMetadata {
    /// Slug derived from the name; unique within its category
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Older records store these under `categories`
    #[serde(default, alias = "categories")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub author: String,
}

/// A stored HTML snippet plus its metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub metadata: ComponentMetadata,
    pub html: String,
    #[serde(rename = "type")]
    pub kind: ComponentType,
    /// Storage directory name, normally equal to `metadata.id`
    #[serde(default)]
    pub folder: String,
}

impl Component {
    /// Fill in a missing id (from the name) and a missing folder (from the id),
    /// then check the folder is a single safe path component.
    pub fn normalized(mut self) -> Result<Self, StoreError> {
        if self.metadata.id.trim().is_empty() {
            self.metadata.id = slugify(&self.metadata.name);
        }
        if self.folder.trim().is_empty() {
            self.folder = self.metadata.id.clone();
        }
        if !is_valid_folder(&self.folder) {
            return Err(StoreError::InvalidFolder(self.folder));
        }
        Ok(self)
    }
}

/// Lower-case the name and join its whitespace-separated words with `-`.
///
/// "Hero Section" becomes "hero-section". Surrounding whitespace is dropped.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// A folder must stay inside its category directory.
pub fn is_valid_folder(folder: &str) -> bool {
    !folder.is_empty()
        && folder != "."
        && folder != ".."
        && !folder.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str) -> Component {
        Component {
            metadata: ComponentMetadata {
                id: String::new(),
                name: name.to_string(),
                tags: vec!["hero".to_string()],
                author: "A".to_string(),
            },
            html: "<section>hi</section>".to_string(),
            kind: ComponentType::Blocks,
            folder: String::new(),
        }
    }

    #[test]
    fn test_slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Hero Section"), "hero-section");
        assert_eq!(slugify("Pricing   Table\tDark"), "pricing-table-dark");
        assert_eq!(slugify("  Footer "), "footer");
    }

    #[test]
    fn test_normalized_derives_id_and_folder() {
        let component = sample("Hero Section").normalized().unwrap();
        assert_eq!(component.metadata.id, "hero-section");
        assert_eq!(component.folder, "hero-section");
    }

    #[test]
    fn test_normalized_keeps_explicit_folder() {
        let mut component = sample("Hero Section");
        component.folder = "legacy-hero".to_string();
        let component = component.normalized().unwrap();
        assert_eq!(component.metadata.id, "hero-section");
        assert_eq!(component.folder, "legacy-hero");
    }

    #[test]
    fn test_normalized_rejects_traversal() {
        let mut component = sample("x");
        component.folder = "../etc".to_string();
        assert!(matches!(
            component.normalized(),
            Err(StoreError::InvalidFolder(_))
        ));
        assert!(sample("..").normalized().is_err());
        assert!(sample("   ").normalized().is_err());
    }

    #[test]
    fn test_type_filter_parse() {
        assert_eq!(TypeFilter::parse("all"), Some(TypeFilter::All));
        assert_eq!(
            TypeFilter::parse("templates"),
            Some(TypeFilter::Only(ComponentType::Templates))
        );
        assert_eq!(TypeFilter::parse("widgets"), None);
        assert_eq!(TypeFilter::All.kinds().len(), 2);
    }

    #[test]
    fn test_component_wire_format() {
        let json = r#"{
            "metadata": {"id": "cta", "name": "CTA", "categories": ["marketing"], "author": "B"},
            "html": "<a>go</a>",
            "type": "templates",
            "folder": "cta"
        }"#;
        let component: Component = serde_json::from_str(json).unwrap();
        assert_eq!(component.kind, ComponentType::Templates);
        assert_eq!(component.metadata.tags, vec!["marketing"]);

        let value = serde_json::to_value(&component).unwrap();
        assert_eq!(value["type"], "templates");
        assert_eq!(value["metadata"]["tags"][0], "marketing");
    }
}
