//! Generation configuration resolved once before any rule runs.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::GenError;

/// Annotation style applied to generated classes and fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationStyle {
    /// No annotations are emitted.
    None,
    /// Jackson 2.x annotations (`@JsonProperty`, `@JsonInclude`, `@JsonTypeInfo`).
    #[default]
    Jackson2,
}

impl AnnotationStyle {
    pub fn parse(raw: &str) -> Result<Self, GenError> {
        match raw {
            "none" => Ok(AnnotationStyle::None),
            "jackson2" => Ok(AnnotationStyle::Jackson2),
            other => Err(GenError::ConfigError(format!(
                "unknown annotation style '{other}'; supported: none, jackson2"
            ))),
        }
    }
}

/// Process-wide, read-only configuration bundle.
///
/// Every field has a default so a partial JSON config file works; unknown
/// keys are rejected to catch typos early.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Package generated classes are declared in (unless `javaType` overrides it).
    pub target_package: String,
    /// Synthesize a `toString` method on each class.
    pub include_to_string: bool,
    /// Synthesize `hashCode` and `equals` on each class.
    pub include_hashcode_and_equals: bool,
    /// Synthesize a no-args constructor plus a fully-parameterized constructor.
    pub include_constructors: bool,
    /// Restrict constructor parameters to schema-required properties.
    pub constructors_required_properties_only: bool,
    /// Emit getter/setter accessors for each field.
    pub include_getters_setters: bool,
    /// Add a `Map<String, Object>` catch-all field when the schema permits
    /// additional properties.
    pub include_additional_properties: bool,
    /// Mark generated classes `java.io.Serializable`.
    pub serializable: bool,
    /// Synthesize `android.os.Parcelable` support.
    pub parcelable: bool,
    pub annotation_style: AnnotationStyle,
    /// Prepended to every generated class name.
    pub class_name_prefix: Option<String>,
    /// Appended to every generated class name.
    pub class_name_suffix: Option<String>,
    /// Field names left out of synthesized `toString` bodies.
    pub to_string_excludes: Vec<String>,
    /// Characters treated as path separators when walking `$ref` fragments.
    pub ref_fragment_path_delimiters: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            target_package: "com.example".to_string(),
            include_to_string: true,
            include_hashcode_and_equals: true,
            include_constructors: false,
            constructors_required_properties_only: false,
            include_getters_setters: true,
            include_additional_properties: true,
            serializable: false,
            parcelable: false,
            annotation_style: AnnotationStyle::Jackson2,
            class_name_prefix: None,
            class_name_suffix: None,
            to_string_excludes: Vec::new(),
            ref_fragment_path_delimiters: "#/.".to_string(),
        }
    }
}

impl GenerationConfig {
    /// Loads a configuration file, layering it over the defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GenError> {
        let path = path.as_ref();
        let input = fs::read_to_string(path).map_err(|e| {
            GenError::ConfigError(format!(
                "failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_json(&input)
    }

    /// Parses a configuration from JSON text, layering it over the defaults.
    pub fn from_json(input: &str) -> Result<Self, GenError> {
        serde_json::from_str(input)
            .map_err(|e| GenError::ConfigError(format!("invalid config: {e}")))
    }

    /// Class name prefix, empty when unset.
    pub fn prefix(&self) -> &str {
        self.class_name_prefix.as_deref().unwrap_or("")
    }

    /// Class name suffix, empty when unset.
    pub fn suffix(&self) -> &str {
        self.class_name_suffix.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_stable() {
        let config = GenerationConfig::default();
        assert!(config.include_to_string);
        assert!(config.include_hashcode_and_equals);
        assert!(!config.include_constructors);
        assert_eq!(config.annotation_style, AnnotationStyle::Jackson2);
        assert_eq!(config.ref_fragment_path_delimiters, "#/.");
    }

    #[test]
    fn partial_config_layers_over_defaults() {
        let config = GenerationConfig::from_json(
            r#"{"includeConstructors": true, "classNameSuffix": "Dto"}"#,
        )
        .unwrap();
        assert!(config.include_constructors);
        assert_eq!(config.suffix(), "Dto");
        assert!(config.include_to_string);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = GenerationConfig::from_json(r#"{"includeToStrings": true}"#).unwrap_err();
        assert!(err.to_string().contains("config error"));
    }

    #[test]
    fn annotation_style_parses() {
        assert_eq!(
            AnnotationStyle::parse("jackson2").unwrap(),
            AnnotationStyle::Jackson2
        );
        assert!(AnnotationStyle::parse("lombok").is_err());
    }
}
