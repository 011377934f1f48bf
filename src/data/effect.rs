//! Effect catalog: the raw collection the search widget and the roller consume.
//! Loaded from JSON or YAML, either a bare list of effects or a wrapped document
//! carrying a data version and the sentinel rule.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SeedError;
use crate::search::catalog::SentinelRule;

fn default_weight() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Effect {
    pub id: String,
    pub name: String,
    /// Relative chance of being drawn by the seeded roller. Zero never triggers.
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Lowest power at which the effect can trigger.
    #[serde(default)]
    pub min_power: u32,
}

impl Effect {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            weight: default_weight(),
            min_power: 0,
        }
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_min_power(mut self, min_power: u32) -> Self {
        self.min_power = min_power;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectCatalog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_version: Option<String>,
    #[serde(default)]
    pub sentinel: SentinelRule,
    pub effects: Vec<Effect>,
}

impl EffectCatalog {
    pub fn new(effects: Vec<Effect>) -> Self {
        Self {
            data_version: None,
            sentinel: SentinelRule::default(),
            effects,
        }
    }

    pub fn with_sentinel(mut self, sentinel: SentinelRule) -> Self {
        self.sentinel = sentinel;
        self
    }

    pub fn find(&self, id: &str) -> Option<&Effect> {
        self.effects.iter().find(|effect| effect.id == id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Bare(Vec<Effect>),
    Wrapped(EffectCatalog),
}

impl From<CatalogDocument> for EffectCatalog {
    fn from(document: CatalogDocument) -> Self {
        match document {
            CatalogDocument::Bare(effects) => EffectCatalog::new(effects),
            CatalogDocument::Wrapped(catalog) => catalog,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Yaml,
}

impl CatalogFormat {
    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(SeedError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

pub fn parse_effect_catalog(raw: &str, format: CatalogFormat) -> Result<EffectCatalog, SeedError> {
    let document: CatalogDocument = match format {
        CatalogFormat::Json => serde_json::from_str(raw)?,
        CatalogFormat::Yaml => serde_yaml::from_str(raw)?,
    };
    Ok(document.into())
}

/// Load an effect catalog, choosing the parser from the file extension.
pub fn load_effect_catalog(path: impl AsRef<Path>) -> Result<EffectCatalog, SeedError> {
    let path = path.as_ref();
    let format = CatalogFormat::from_path(path)?;
    let raw = fs::read_to_string(path).map_err(|err| SeedError::io(path.display().to_string(), err))?;
    let catalog = parse_effect_catalog(&raw, format)?;
    tracing::debug!(
        path = %path.display(),
        effects = catalog.effects.len(),
        "loaded effect catalog"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_json_array_uses_trailing_sentinel() {
        let raw = r#"[{"id":"a","name":"Alpha"},{"id":"none","name":"None","weight":3}]"#;
        let catalog = parse_effect_catalog(raw, CatalogFormat::Json).expect("catalog should parse");
        assert_eq!(catalog.effects.len(), 2);
        assert_eq!(catalog.sentinel, SentinelRule::Trailing);
        assert_eq!(catalog.effects[0].weight, 1);
        assert_eq!(catalog.effects[1].weight, 3);
    }

    #[test]
    fn wrapped_json_reads_sentinel_and_version() {
        let raw = r#"{
            "data_version": "2024-06",
            "sentinel": {"id": "none"},
            "effects": [{"id":"none","name":"None"},{"id":"a","name":"Alpha","min_power":40}]
        }"#;
        let catalog = parse_effect_catalog(raw, CatalogFormat::Json).expect("catalog should parse");
        assert_eq!(catalog.data_version.as_deref(), Some("2024-06"));
        assert_eq!(catalog.sentinel, SentinelRule::Id("none".to_string()));
        assert_eq!(catalog.find("a").map(|e| e.min_power), Some(40));
    }

    #[test]
    fn yaml_catalog_parses() {
        let raw = "sentinel: none\neffects:\n  - id: a\n    name: Alpha\n  - id: b\n    name: Beta\n";
        let catalog = parse_effect_catalog(raw, CatalogFormat::Yaml).expect("catalog should parse");
        assert_eq!(catalog.sentinel, SentinelRule::Disabled);
        assert_eq!(catalog.effects.len(), 2);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = CatalogFormat::from_path(Path::new("effects.toml")).unwrap_err();
        assert!(matches!(err, SeedError::UnsupportedFormat(_)));
        assert_eq!(
            CatalogFormat::from_path(Path::new("effects.YML")).ok(),
            Some(CatalogFormat::Yaml)
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_effect_catalog("does/not/exist.json").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
