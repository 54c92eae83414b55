//! Synthesis of toString, hashCode, and equals bodies.
//!
//! All three share super-delegation (append-super when the parent is not the
//! universal base) and iterate fields in declaration order. Static fields are
//! always excluded; equals/hashCode additionally honor the node-level
//! `excludedFromEqualsAndHashCode` array and the per-property flag.

use std::collections::HashSet;

use serde_json::Value as JsonValue;

use crate::config::GenerationConfig;
use crate::model::{ClassDef, Method};
use crate::naming::NameHelper;

pub fn add_to_string(class: &mut ClassDef, config: &GenerationConfig) {
    let excludes: HashSet<&str> = config
        .to_string_excludes
        .iter()
        .map(String::as_str)
        .collect();

    let fields: Vec<String> = class
        .fields
        .iter()
        .filter(|f| !f.is_static && !excludes.contains(f.name.as_str()))
        .map(|f| f.name.clone())
        .collect();

    class.methods.push(Method::ToString {
        append_super: class.has_concrete_parent(),
        fields,
    });
}

pub fn add_hash_code(class: &mut ClassDef, node: &JsonValue, naming: &NameHelper) {
    let fields = equality_fields(class, node, naming);
    class.methods.push(Method::HashCode {
        append_super: class.has_concrete_parent(),
        fields,
    });
}

pub fn add_equals(class: &mut ClassDef, node: &JsonValue, naming: &NameHelper) {
    let fields = equality_fields(class, node, naming);
    class.methods.push(Method::Equals {
        append_super: class.has_concrete_parent(),
        fields,
    });
}

/// Field names eligible for equals/hashCode, in declaration order.
fn equality_fields(class: &ClassDef, node: &JsonValue, naming: &NameHelper) -> Vec<String> {
    let mut excluded: HashSet<String> = HashSet::new();

    if let Some(properties) = node.get("properties").and_then(JsonValue::as_object) {
        if let Some(listed) = node
            .get("excludedFromEqualsAndHashCode")
            .and_then(JsonValue::as_array)
        {
            for raw_key in listed.iter().filter_map(JsonValue::as_str) {
                excluded.insert(naming.property_name(raw_key, properties.get(raw_key)));
            }
        }

        for (raw_key, prop_node) in properties {
            let flagged = prop_node
                .get("excludedFromEqualsAndHashCode")
                .and_then(JsonValue::as_bool)
                .unwrap_or(false);
            if flagged {
                excluded.insert(naming.property_name(raw_key, Some(prop_node)));
            }
        }
    }

    class
        .fields
        .iter()
        .filter(|f| !f.is_static && !excluded.contains(&f.name))
        .map(|f| f.name.clone())
        .collect()
}
