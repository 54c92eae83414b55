use schema2class::{generate_source, GenerationConfig};

#[test]
fn trivial_parent_omits_super_delegation() {
    let schema = r#"
    {
        "type": "object",
        "properties": {"id": {"type": "integer"}}
    }
    "#;

    let source = generate_source("widget", schema, &GenerationConfig::default()).unwrap();
    assert!(!source.contains("super.toString()"));
    assert!(!source.contains("super.hashCode()"));
    assert!(!source.contains("super.equals(other)"));
}

#[test]
fn concrete_parent_requires_super_delegation() {
    let schema = r#"
    {
        "type": "object",
        "properties": {"name": {"type": "string"}},
        "extends": {
            "type": "object",
            "properties": {"id": {"type": "integer"}}
        }
    }
    "#;

    let output = schema2class::generate("widget", schema, &GenerationConfig::default()).unwrap();
    let widget = &output
        .units
        .iter()
        .find(|u| u.class_name == "Widget")
        .unwrap()
        .source;
    assert!(widget.contains("sb.append(\"super=\").append(super.toString())"));
    assert!(widget.contains("result = ((result * 31) + super.hashCode());"));
    assert!(widget.contains("super.equals(other) && "));

    // The parent itself sits on the universal base and must not delegate.
    let parent = &output
        .units
        .iter()
        .find(|u| u.class_name == "WidgetParent")
        .unwrap()
        .source;
    assert!(!parent.contains("super.hashCode()"));
}

#[test]
fn excluded_property_leaves_equals_and_hashcode_but_not_tostring() {
    let schema = r#"
    {
        "type": "object",
        "properties": {
            "id": {"type": "integer"},
            "secret": {"type": "string", "excludedFromEqualsAndHashCode": true}
        }
    }
    "#;

    let source = generate_source("widget", schema, &GenerationConfig::default()).unwrap();
    assert!(!source.contains("Objects.equals(this.secret, rhs.secret)"));
    assert!(!source.contains("Objects.hashCode(this.secret)"));
    assert!(source.contains("sb.append(\"secret=\").append(this.secret)"));
}

#[test]
fn node_level_exclusion_array_applies_to_equality_methods() {
    let schema = r#"
    {
        "type": "object",
        "properties": {
            "id": {"type": "integer"},
            "etag": {"type": "string"}
        },
        "excludedFromEqualsAndHashCode": ["etag"]
    }
    "#;

    let source = generate_source("widget", schema, &GenerationConfig::default()).unwrap();
    assert!(source.contains("Objects.equals(this.id, rhs.id)"));
    assert!(!source.contains("Objects.equals(this.etag, rhs.etag)"));
    assert!(!source.contains("Objects.hashCode(this.etag)"));
}

#[test]
fn to_string_excludes_config_is_independent_of_equality_exclusions() {
    let schema = r#"
    {
        "type": "object",
        "properties": {
            "id": {"type": "integer"},
            "blob": {"type": "string"}
        }
    }
    "#;

    let config = GenerationConfig::from_json(r#"{"toStringExcludes": ["blob"]}"#).unwrap();
    let source = generate_source("widget", schema, &config).unwrap();
    assert!(!source.contains("sb.append(\"blob=\")"));
    assert!(source.contains("Objects.equals(this.blob, rhs.blob)"));
}

#[test]
fn serializable_marker_adds_interface_and_static_uid() {
    let schema = r#"
    {
        "type": "object",
        "properties": {"id": {"type": "integer"}}
    }
    "#;

    let config = GenerationConfig::from_json(r#"{"serializable": true}"#).unwrap();
    let source = generate_source("widget", schema, &config).unwrap();
    assert!(source.contains("implements Serializable"));
    assert!(source.contains("import java.io.Serializable;"));
    assert!(source.contains("private final static long serialVersionUID ="));
    // Static fields never join the structural methods.
    assert!(!source.contains("Objects.hashCode(this.serialVersionUID)"));
    assert!(!source.contains("sb.append(\"serialVersionUID=\")"));
}

#[test]
fn parcelable_support_is_synthesized_when_enabled() {
    let schema = r#"
    {
        "type": "object",
        "properties": {"id": {"type": "integer"}}
    }
    "#;

    let config = GenerationConfig::from_json(r#"{"parcelable": true}"#).unwrap();
    let source = generate_source("widget", schema, &config).unwrap();
    assert!(source.contains("implements Parcelable"));
    assert!(source.contains("import android.os.Parcel;"));
    assert!(source.contains("public void writeToParcel(Parcel dest, int flags)"));
    assert!(source.contains("public int describeContents()"));
    assert!(source.contains("Parcelable.Creator<Widget> CREATOR"));
    assert!(source.contains("protected Widget(Parcel in)"));
    assert!(source.contains("dest.writeValue(this.id);"));
    // Constructors are disabled, so parcel support supplies the no-args one.
    assert!(source.contains("public Widget() {"));
}

#[test]
fn methods_can_be_toggled_off() {
    let schema = r#"
    {
        "type": "object",
        "properties": {"id": {"type": "integer"}}
    }
    "#;

    let config = GenerationConfig::from_json(
        r#"{"includeToString": false, "includeHashcodeAndEquals": false}"#,
    )
    .unwrap();
    let source = generate_source("widget", schema, &config).unwrap();
    assert!(!source.contains("public String toString()"));
    assert!(!source.contains("public int hashCode()"));
    assert!(!source.contains("public boolean equals(Object other)"));
}
