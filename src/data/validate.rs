use std::collections::HashMap;
use std::fmt;

use crate::data::effect::EffectCatalog;
use crate::search::catalog::SentinelRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == ValidationSeverity::Error)
            .count()
    }
}

/// Check a catalog for problems that would make the search view misleading.
pub fn validate_catalog(catalog: &EffectCatalog) -> ValidationReport {
    let mut report = ValidationReport::default();

    if catalog.effects.is_empty() {
        report.push(ValidationSeverity::Warning, "effects", "catalog is empty");
        return report;
    }

    let mut first_seen: HashMap<&str, usize> = HashMap::new();
    for (index, effect) in catalog.effects.iter().enumerate() {
        let context = format!("effects[{index}]");
        if effect.id.trim().is_empty() {
            report.push(ValidationSeverity::Error, &context, "id is empty");
        }
        if effect.name.trim().is_empty() {
            report.push(ValidationSeverity::Error, &context, "name is empty");
        }
        if let Some(previous) = first_seen.insert(effect.id.as_str(), index) {
            report.push(
                ValidationSeverity::Error,
                &context,
                format!("duplicate id '{}' (first seen at effects[{previous}])", effect.id),
            );
            first_seen.insert(effect.id.as_str(), previous);
        }
    }

    if catalog.effects.iter().all(|effect| effect.weight == 0) {
        report.push(
            ValidationSeverity::Warning,
            "effects",
            "every effect has weight 0; rolls never trigger anything",
        );
    }

    match &catalog.sentinel {
        SentinelRule::Id(id) if !first_seen.contains_key(id.as_str()) => {
            report.push(
                ValidationSeverity::Error,
                "sentinel",
                format!("sentinel id '{id}' is not in the catalog"),
            );
        }
        SentinelRule::Trailing => {
            if let Some(last) = catalog.effects.last() {
                report.push(
                    ValidationSeverity::Info,
                    "sentinel",
                    format!("trailing entry '{}' ({}) is hidden from the catalog view", last.id, last.name),
                );
            }
        }
        _ => {}
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::effect::Effect;

    #[test]
    fn clean_catalog_has_only_info() {
        let catalog = EffectCatalog::new(vec![Effect::new("a", "Alpha"), Effect::new("none", "None")]);
        let report = validate_catalog(&catalog);
        assert!(!report.has_errors());
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].severity, ValidationSeverity::Info);
    }

    #[test]
    fn reports_empty_fields_and_duplicates() {
        let catalog = EffectCatalog::new(vec![
            Effect::new("a", "Alpha"),
            Effect::new("", "Nameless id"),
            Effect::new("a", " "),
        ]);
        let report = validate_catalog(&catalog);
        assert_eq!(report.error_count(), 3);
        assert!(report
            .diagnostics
            .iter()
            .any(|d| d.message.contains("duplicate id 'a' (first seen at effects[0])")));
    }

    #[test]
    fn missing_sentinel_id_is_an_error() {
        let catalog = EffectCatalog::new(vec![Effect::new("a", "Alpha")])
            .with_sentinel(SentinelRule::Id("none".to_string()));
        let report = validate_catalog(&catalog);
        assert!(report.has_errors());
        assert_eq!(report.diagnostics[0].context, "sentinel");
    }

    #[test]
    fn zero_weights_warn() {
        let catalog = EffectCatalog::new(vec![Effect::new("a", "Alpha").with_weight(0)])
            .with_sentinel(SentinelRule::Disabled);
        let report = validate_catalog(&catalog);
        assert!(!report.has_errors());
        assert_eq!(report.diagnostics[0].severity, ValidationSeverity::Warning);
    }

    #[test]
    fn empty_catalog_warns() {
        let report = validate_catalog(&EffectCatalog::default());
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].message, "catalog is empty");
    }
}
