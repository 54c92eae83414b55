use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use schema2class::{generate, generate_from_path, generate_source, GenerationConfig};

struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = std::env::temp_dir().join(format!(
            "schema2class_generate_{}_{}_{}",
            prefix,
            std::process::id(),
            stamp
        ));
        fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    fn write(&self, file: &str, content: &str) {
        fs::write(self.path.join(file), content).expect("write temp file");
    }

    fn file_path(&self, file: &str) -> PathBuf {
        self.path.join(file)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

#[test]
fn full_featured_object_generates_expected_members() {
    let schema = r#"
    {
        "type": "object",
        "title": "An order",
        "description": "One customer order.",
        "properties": {
            "id": {"type": "integer", "description": "Order identifier.", "required": true},
            "placed_at": {"type": "string", "format": "date-time"},
            "tags": {"type": "array", "items": {"type": "string"}}
        }
    }
    "#;

    let source = generate_source("order", schema, &GenerationConfig::default()).unwrap();

    assert!(source.contains("package com.example;"));
    assert!(source.contains(" * An order"));
    assert!(source.contains(" * One customer order."));
    assert!(source.contains("@JsonInclude(JsonInclude.Include.NON_NULL)"));
    assert!(source.contains("@JsonProperty(\"id\")"));
    assert!(source.contains("     * (Required)"));
    assert!(source.contains("private Integer id;"));
    assert!(source.contains("private Date placedAt;"));
    assert!(source.contains("import java.util.Date;"));
    assert!(source.contains("private List<String> tags;"));
    assert!(source.contains("import java.util.List;"));
    assert!(source.contains("private Map<String, Object> additionalProperties = new HashMap<>();"));
    assert!(source.contains("public Integer getId()"));
    assert!(source.contains("public void setTags(List<String> tags)"));
    assert!(source.contains("public String toString()"));
    assert!(source.contains("public int hashCode()"));
    assert!(source.contains("public boolean equals(Object other)"));
}

#[test]
fn annotations_none_style_emits_plain_fields() {
    let schema = r#"
    {
        "type": "object",
        "properties": {"id": {"type": "integer"}}
    }
    "#;
    let config = GenerationConfig::from_json(r#"{"annotationStyle": "none"}"#).unwrap();
    let source = generate_source("order", schema, &config).unwrap();
    assert!(!source.contains("@Json"));
    assert!(!source.contains("com.fasterxml.jackson"));
}

#[test]
fn accessors_and_additional_properties_can_be_disabled() {
    let schema = r#"
    {
        "type": "object",
        "properties": {"id": {"type": "integer"}}
    }
    "#;
    let config = GenerationConfig::from_json(
        r#"{"includeGettersSetters": false, "includeAdditionalProperties": false}"#,
    )
    .unwrap();
    let source = generate_source("order", schema, &config).unwrap();
    assert!(!source.contains("getId"));
    assert!(!source.contains("additionalProperties"));
}

#[test]
fn class_name_prefix_and_suffix_apply() {
    let schema = r#"{"type": "object", "properties": {}}"#;
    let config =
        GenerationConfig::from_json(r#"{"classNamePrefix": "Api", "classNameSuffix": "Dto"}"#)
            .unwrap();
    let output = generate("order", schema, &config).unwrap();
    assert_eq!(output.units[0].class_name, "ApiOrderDto");
}

#[test]
fn java_type_controls_package_and_name() {
    let schema = r#"{"type": "object", "javaType": "net.acme.billing.Invoice", "properties": {}}"#;
    let output = generate("order", schema, &GenerationConfig::default()).unwrap();
    assert_eq!(output.units[0].package, "net.acme.billing");
    assert_eq!(output.units[0].class_name, "Invoice");
    assert!(output.units[0].source.contains("package net.acme.billing;"));
    assert_eq!(output.units[0].relative_path(), "net/acme/billing/Invoice.java");
}

#[test]
fn discriminator_emits_type_info_annotation() {
    let schema = r#"
    {
        "type": "object",
        "deserializationClassProperty": "kind",
        "properties": {}
    }
    "#;
    let source = generate_source("event", schema, &GenerationConfig::default()).unwrap();
    assert!(source.contains("import com.fasterxml.jackson.annotation.JsonTypeInfo;"));
    assert!(source.contains("property = \"kind\""));
}

#[test]
fn java_interfaces_are_implemented() {
    let schema = r#"
    {
        "type": "object",
        "javaInterfaces": ["java.lang.Cloneable", "com.acme.Auditable"],
        "properties": {}
    }
    "#;
    let source = generate_source("order", schema, &GenerationConfig::default()).unwrap();
    assert!(source.contains("implements Cloneable, Auditable"));
    assert!(source.contains("import com.acme.Auditable;"));
}

#[test]
fn cross_document_ref_generates_both_classes() {
    let dir = TempDir::new("refs");
    dir.write(
        "address.json",
        r#"
        {
            "type": "object",
            "properties": {"street": {"type": "string"}}
        }
        "#,
    );
    dir.write(
        "order.json",
        r#"
        {
            "type": "object",
            "properties": {
                "address": {"$ref": "address.json"}
            }
        }
        "#,
    );

    let output =
        generate_from_path(dir.file_path("order.json"), &GenerationConfig::default()).unwrap();
    let names: Vec<&str> = output.units.iter().map(|u| u.class_name.as_str()).collect();
    assert!(names.contains(&"Order"));
    assert!(names.contains(&"Address"));

    let order = &output
        .units
        .iter()
        .find(|u| u.class_name == "Order")
        .unwrap()
        .source;
    assert!(order.contains("private Address address;"));
}

#[test]
fn fragment_ref_into_sibling_document_resolves() {
    let dir = TempDir::new("fragments");
    dir.write(
        "common.json",
        r#"
        {
            "definitions": {
                "money": {
                    "type": "object",
                    "properties": {"amount": {"type": "number"}}
                }
            }
        }
        "#,
    );
    dir.write(
        "invoice.json",
        r#"
        {
            "type": "object",
            "properties": {
                "total": {"$ref": "common.json#/definitions/money"}
            }
        }
        "#,
    );

    let output =
        generate_from_path(dir.file_path("invoice.json"), &GenerationConfig::default()).unwrap();
    let names: Vec<&str> = output.units.iter().map(|u| u.class_name.as_str()).collect();
    assert!(names.contains(&"Invoice"));
    assert!(names.contains(&"Total"));
    let total = &output
        .units
        .iter()
        .find(|u| u.class_name == "Total")
        .unwrap()
        .source;
    assert!(total.contains("private Double amount;"));
}

#[test]
fn repeated_refs_to_one_schema_share_a_class() {
    let dir = TempDir::new("shared");
    dir.write(
        "address.json",
        r#"
        {
            "type": "object",
            "properties": {"street": {"type": "string"}}
        }
        "#,
    );
    dir.write(
        "order.json",
        r#"
        {
            "type": "object",
            "properties": {
                "billing": {"$ref": "address.json"},
                "shipping": {"$ref": "address.json"}
            }
        }
        "#,
    );

    let output =
        generate_from_path(dir.file_path("order.json"), &GenerationConfig::default()).unwrap();
    let address_units = output
        .units
        .iter()
        .filter(|u| u.class_name.starts_with("Billing") || u.class_name.starts_with("Shipping"))
        .count();
    assert_eq!(address_units, 1, "both refs must reuse one generated class");

    let order = &output
        .units
        .iter()
        .find(|u| u.class_name == "Order")
        .unwrap()
        .source;
    assert!(order.contains("private Billing billing;"));
    assert!(order.contains("private Billing shipping;"));
}
