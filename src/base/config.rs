//! Analysis configuration.

use smol_str::SmolStr;

/// Default extension of Tao source files.
pub const SOURCE_EXTENSION: &str = "tao";

/// How far `diagnostics()` goes when reporting problems for a document.
///
/// Each stage includes every earlier one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValidationStage {
    /// Only lexer errors.
    Lexing,
    /// Lexer and parser errors.
    Parsing,
    /// Plus unresolved references.
    Linking,
    /// Plus import validation and declaration checks.
    #[default]
    All,
}

/// Options shared by every analysis of a workspace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub validate_up_to: ValidationStage,
    /// Extension (without the dot) used for exact-file module paths and workspace loading.
    pub source_extension: SmolStr,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            validate_up_to: ValidationStage::default(),
            source_extension: SmolStr::new_static(SOURCE_EXTENSION),
        }
    }
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_validation(mut self, stage: ValidationStage) -> Self {
        self.validate_up_to = stage;
        self
    }

    pub fn with_source_extension(mut self, extension: impl Into<SmolStr>) -> Self {
        self.source_extension = extension.into();
        self
    }

    /// Whether diagnostics of `stage` should be reported.
    pub fn reports(&self, stage: ValidationStage) -> bool {
        stage <= self.validate_up_to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reports_everything() {
        let config = AnalysisConfig::default();
        assert!(config.reports(ValidationStage::Lexing));
        assert!(config.reports(ValidationStage::All));
        assert_eq!(config.source_extension, "tao");
    }

    #[test]
    fn test_stages_are_cumulative() {
        let config = AnalysisConfig::new().with_validation(ValidationStage::Parsing);
        assert!(config.reports(ValidationStage::Lexing));
        assert!(config.reports(ValidationStage::Parsing));
        assert!(!config.reports(ValidationStage::Linking));
        assert!(!config.reports(ValidationStage::All));
    }
}
