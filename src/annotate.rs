//! Annotation-style collaborator. Only the Jackson 2.x style emits anything.

use serde_json::Value as JsonValue;

use crate::config::{AnnotationStyle, GenerationConfig};
use crate::model::{ClassDef, FieldDef};

/// True when the node requires polymorphic deserialization under the active
/// annotation style.
pub fn uses_polymorphic_deserialization(config: &GenerationConfig, node: &JsonValue) -> bool {
    config.annotation_style == AnnotationStyle::Jackson2
        && node.get("deserializationClassProperty").is_some()
}

/// Attaches the serialization-inclusion policy to a freshly created class.
pub fn property_inclusion(class: &mut ClassDef, config: &GenerationConfig) {
    if config.annotation_style == AnnotationStyle::Jackson2 {
        class
            .annotations
            .push("@JsonInclude(JsonInclude.Include.NON_NULL)".to_string());
    }
}

/// Attaches the runtime-type discriminator annotation declared via
/// `deserializationClassProperty`.
pub fn type_info(class: &mut ClassDef, config: &GenerationConfig, node: &JsonValue) {
    if config.annotation_style != AnnotationStyle::Jackson2 {
        return;
    }
    let Some(property) = node
        .get("deserializationClassProperty")
        .and_then(JsonValue::as_str)
    else {
        return;
    };
    class.discriminator = Some(property.to_string());
    class.annotations.push(format!(
        "@JsonTypeInfo(use = JsonTypeInfo.Id.CLASS, include = JsonTypeInfo.As.PROPERTY, property = \"{}\")",
        escape_string(property)
    ));
}

/// Attaches the wire-name annotation to a field.
pub fn property_annotations(field: &mut FieldDef, config: &GenerationConfig, raw_key: &str) {
    if config.annotation_style == AnnotationStyle::Jackson2 {
        field
            .annotations
            .push(format!("@JsonProperty(\"{}\")", escape_string(raw_key)));
    }
}

fn escape_string(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn none_style_emits_nothing() {
        let config = GenerationConfig {
            annotation_style: AnnotationStyle::None,
            ..GenerationConfig::default()
        };
        let mut class = ClassDef::new("com.example", "Order");
        property_inclusion(&mut class, &config);
        type_info(&mut class, &config, &json!({"deserializationClassProperty": "kind"}));
        assert!(class.annotations.is_empty());
        assert!(class.discriminator.is_none());
    }

    #[test]
    fn discriminator_sets_type_info_annotation() {
        let config = GenerationConfig::default();
        let mut class = ClassDef::new("com.example", "Order");
        type_info(&mut class, &config, &json!({"deserializationClassProperty": "kind"}));
        assert_eq!(class.discriminator.as_deref(), Some("kind"));
        assert!(class.annotations[0].contains("@JsonTypeInfo"));
        assert!(class.annotations[0].contains("property = \"kind\""));
    }
}
