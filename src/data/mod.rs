pub mod effect;
pub mod validate;

pub use effect::{load_effect_catalog, parse_effect_catalog, CatalogFormat, Effect, EffectCatalog};
pub use validate::{validate_catalog, ValidationDiagnostic, ValidationReport, ValidationSeverity};
