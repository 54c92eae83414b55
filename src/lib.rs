//! Generates Java class sources from JSON Schema object definitions.

pub mod annotate;
pub mod build;
pub mod config;
pub mod construct;
pub mod emit;
pub mod error;
pub mod fetch;
pub mod methods;
pub mod model;
pub mod naming;
pub mod props;
pub mod resolve;
pub mod store;
pub mod support;

use std::path::{Path, PathBuf};

use serde_json::Value as JsonValue;

use build::Generator;
pub use config::{AnnotationStyle, GenerationConfig};
pub use emit::GeneratedUnit;
pub use error::GenError;
use fetch::{flush_lockfile, resolve_ref_source, FetchContext};
use naming::NameHelper;
use store::SchemaStore;

/// Result of a generation run: compilation units plus non-fatal warnings.
#[derive(Debug)]
pub struct GenerationOutput {
    pub units: Vec<GeneratedUnit>,
    pub warnings: Vec<String>,
}

/// Generates classes from an in-memory schema document.
///
/// `name` seeds the root class name unless the schema declares a `javaType`.
pub fn generate(
    name: &str,
    input: &str,
    config: &GenerationConfig,
) -> Result<GenerationOutput, GenError> {
    let node: JsonValue = serde_json::from_str(input)
        .map_err(|e| GenError::SchemaError(format!("invalid JSON schema: {e}")))?;
    ensure_object_root(name, &node)?;

    let mut store = SchemaStore::new(FetchContext::disabled());
    let root = store.register_root(&format!("inline:{name}"), node.clone());
    run(name, &node, root, store, config)
}

/// Generates classes from a schema file path.
///
/// Relative and remote references resolve against the file's directory.
pub fn generate_from_path(
    path: impl AsRef<Path>,
    config: &GenerationConfig,
) -> Result<GenerationOutput, GenError> {
    generate_from_path_with_fetch(path, config, None, false)
}

/// Generates classes from a schema file path or URL with explicit fetch
/// settings.
///
/// `cache_dir` overrides the remote-ref cache location; `update_refs` forces
/// refetching of lockfile-pinned documents. The lockfile lives next to a
/// local root schema, or in the working directory for a remote one.
pub fn generate_from_path_with_fetch(
    path: impl AsRef<Path>,
    config: &GenerationConfig,
    cache_dir: Option<PathBuf>,
    update_refs: bool,
) -> Result<GenerationOutput, GenError> {
    let raw = path.as_ref().to_string_lossy().to_string();
    let base_dir = std::env::current_dir()?;

    let probe = FetchContext::new(&base_dir, cache_dir.clone(), update_refs);
    let source = resolve_ref_source(&base_dir, &raw, &probe)?;
    let fetch = match &source {
        fetch::RefSource::Local(p) => {
            FetchContext::new(p.parent().unwrap_or(Path::new(".")), cache_dir, update_refs)
        }
        fetch::RefSource::Remote { .. } => probe,
    };

    let stem = source_stem(&source);
    let name = NameHelper::new().capitalized_field_name(&stem, None);

    let mut store = SchemaStore::new(fetch);
    let root = store.load_source(source)?;
    let node = store.content(root).clone();
    ensure_object_root(&name, &node)?;

    run(&name, &node, root, store, config)
}

fn source_stem(source: &fetch::RefSource) -> String {
    let id = source.display_id();
    let last = id.rsplit(['/', '\\']).next().unwrap_or(&id);
    let stem = last.split('.').next().unwrap_or(last);
    if stem.is_empty() {
        "Schema".to_string()
    } else {
        stem.to_string()
    }
}

/// Generates classes and concatenates every unit into one source string.
pub fn generate_source(
    name: &str,
    input: &str,
    config: &GenerationConfig,
) -> Result<String, GenError> {
    let output = generate(name, input, config)?;
    Ok(join_units(&output.units))
}

/// Concatenates rendered units, separated by a blank line.
pub fn join_units(units: &[GeneratedUnit]) -> String {
    units
        .iter()
        .map(|u| u.source.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn run(
    name: &str,
    node: &JsonValue,
    root: store::SchemaId,
    store: SchemaStore,
    config: &GenerationConfig,
) -> Result<GenerationOutput, GenError> {
    let mut gen = Generator::new(config, store);
    gen.apply(name, node, root)?;
    flush_lockfile(&gen.store.fetch)?;
    Ok(GenerationOutput {
        units: emit::render_units(&gen.namespace),
        warnings: gen.warnings,
    })
}

fn ensure_object_root(name: &str, node: &JsonValue) -> Result<(), GenError> {
    let describes_object = node.get("type").and_then(JsonValue::as_str) == Some("object")
        || node.get("properties").is_some()
        || node.get("extends").is_some()
        || node.get("extendsJavaClass").is_some()
        || node.get("javaType").is_some();
    if node.is_object() && describes_object {
        Ok(())
    } else {
        Err(GenError::SchemaError(format!(
            "root schema '{name}' must describe an object type"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_class_for_simple_object() {
        let schema = r#"
        {
            "type": "object",
            "properties": {
                "id": {"type": "integer"},
                "name": {"type": "string"}
            }
        }
        "#;
        let source = generate_source("order", schema, &GenerationConfig::default()).unwrap();
        assert!(source.contains("package com.example;"));
        assert!(source.contains("public class Order {"));
        assert!(source.contains("private Integer id;"));
        assert!(source.contains("private String name;"));
        assert!(source.contains("public Integer getId()"));
        assert!(source.contains("public void setName(String name)"));
    }

    #[test]
    fn invalid_json_is_a_schema_error() {
        let err = generate("broken", "{not json", &GenerationConfig::default()).unwrap_err();
        assert!(err.to_string().contains("schema error"));
    }

    #[test]
    fn non_object_root_is_rejected() {
        let err = generate("scalar", r#"{"type": "string"}"#, &GenerationConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("must describe an object type"));
    }

    #[test]
    fn unknown_property_type_produces_warning() {
        let schema = r#"
        {
            "type": "object",
            "properties": {"blob": {"type": "mystery"}}
        }
        "#;
        let output = generate("thing", schema, &GenerationConfig::default()).unwrap();
        assert!(output
            .warnings
            .iter()
            .any(|w| w.contains("unknown schema type 'mystery'")));
        assert!(output.units[0].source.contains("private Object blob;"));
    }

    #[test]
    fn nested_object_property_becomes_its_own_class() {
        let schema = r#"
        {
            "type": "object",
            "properties": {
                "shipping_address": {
                    "type": "object",
                    "properties": {"street": {"type": "string"}}
                }
            }
        }
        "#;
        let output = generate("order", schema, &GenerationConfig::default()).unwrap();
        let names: Vec<&str> = output.units.iter().map(|u| u.class_name.as_str()).collect();
        assert!(names.contains(&"Order"));
        assert!(names.contains(&"ShippingAddress"));
        let order = &output
            .units
            .iter()
            .find(|u| u.class_name == "Order")
            .unwrap()
            .source;
        assert!(order.contains("private ShippingAddress shippingAddress;"));
    }
}
