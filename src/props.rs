//! Field population: properties, additionalProperties, required-array,
//! title, and description rules.

use serde_json::Value as JsonValue;

use crate::annotate;
use crate::build::Generator;
use crate::error::GenError;
use crate::model::{ClassDef, ClassId, FieldDef, Method, TypeRef};
use crate::resolve::{self, resolve_external_type};
use crate::store::SchemaId;

pub fn apply_title(class: &mut ClassDef, node: &JsonValue) {
    class.title = node.get("title").and_then(JsonValue::as_str).map(str::to_string);
}

pub fn apply_description(class: &mut ClassDef, node: &JsonValue) {
    class.description = node
        .get("description")
        .and_then(JsonValue::as_str)
        .map(str::to_string);
}

/// Turns each declared property into a field (plus accessors when
/// configured), in declaration order.
pub fn apply_properties(
    gen: &mut Generator,
    _node_name: &str,
    node: &JsonValue,
    class_id: ClassId,
    schema: SchemaId,
) -> Result<(), GenError> {
    let Some(properties) = node.get("properties").and_then(JsonValue::as_object) else {
        return Ok(());
    };

    for (raw_key, prop_node) in properties {
        let field_name = gen.naming.property_name(raw_key, Some(prop_node));
        if gen.namespace.get(class_id).has_field(&field_name) {
            let class_name = gen.namespace.get(class_id).name.clone();
            gen.warn(format!(
                "property '{raw_key}' collides with existing field '{field_name}' on {class_name}; skipped"
            ));
            continue;
        }

        let child = gen.child_schema(schema, &["properties", raw_key.as_str()])?;
        let ty = property_type(gen, raw_key, child)?;

        let mut field = FieldDef::new(field_name.clone(), ty);
        field.raw_key = Some(raw_key.clone());
        field.required = prop_node
            .get("required")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false);
        field.description = prop_node
            .get("description")
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        annotate::property_annotations(&mut field, gen.config, raw_key);

        let include_accessors = gen.config.include_getters_setters;
        let class = gen.namespace.get_mut(class_id);
        class.fields.push(field);
        if include_accessors {
            class.methods.push(Method::Getter {
                field: field_name.clone(),
            });
            class.methods.push(Method::Setter { field: field_name });
        }
    }

    Ok(())
}

/// Adds a catch-all `Map<String, T>` field unless the schema forbids
/// additional properties or the config disables them.
pub fn apply_additional_properties(
    gen: &mut Generator,
    node: &JsonValue,
    class_id: ClassId,
    schema: SchemaId,
) -> Result<(), GenError> {
    if !gen.config.include_additional_properties {
        return Ok(());
    }

    let value_ty = match node.get("additionalProperties") {
        Some(JsonValue::Bool(false)) => return Ok(()),
        Some(extra) if extra.as_object().is_some_and(|map| !map.is_empty()) => {
            let child = gen.child_schema(schema, &["additionalProperties"])?;
            property_type(gen, "additionalProperty", child)?
        }
        _ => TypeRef::Object,
    };

    if gen.namespace.get(class_id).has_field("additionalProperties") {
        return Ok(());
    }

    let mut field = FieldDef::new("additionalProperties", TypeRef::Map(Box::new(value_ty)));
    field.initializer = Some("new HashMap<>()".to_string());

    let include_accessors = gen.config.include_getters_setters;
    let class = gen.namespace.get_mut(class_id);
    class.fields.push(field);
    if include_accessors {
        class.methods.push(Method::Getter {
            field: "additionalProperties".to_string(),
        });
        class.methods.push(Method::Setter {
            field: "additionalProperties".to_string(),
        });
    }

    Ok(())
}

/// Marks fields listed in a draft-04 top-level `required` array.
pub fn apply_required_array(gen: &mut Generator, node: &JsonValue, class_id: ClassId) {
    let Some(required) = node.get("required").and_then(JsonValue::as_array) else {
        return;
    };

    for raw_key in required.iter().filter_map(JsonValue::as_str) {
        let prop_node = node.get("properties").and_then(|p| p.get(raw_key));
        let field_name = gen.naming.property_name(raw_key, prop_node);

        let marked = {
            let class = gen.namespace.get_mut(class_id);
            match class.fields.iter_mut().find(|f| f.name == field_name) {
                Some(field) => {
                    field.required = true;
                    true
                }
                None => false,
            }
        };
        if !marked {
            let class_name = gen.namespace.get(class_id).name.clone();
            gen.warn(format!(
                "required property '{raw_key}' has no generated field on {class_name}"
            ));
        }
    }
}

/// Maps a property schema to a target type, recursing into `$ref` targets,
/// nested objects, and array items.
fn property_type(gen: &mut Generator, name: &str, schema: SchemaId) -> Result<TypeRef, GenError> {
    let node = gen.store.content(schema).clone();

    if let Some(target) = node.get("$ref").and_then(JsonValue::as_str) {
        let target = target.to_string();
        let delimiters = gen.config.ref_fragment_path_delimiters.clone();
        let resolved = gen.store.resolve(schema, &target, &delimiters)?;
        let terminal = resolve::follow_refs(&mut gen.store, resolved, &delimiters)?;
        return property_type(gen, name, terminal);
    }

    if let Some(declared) = node.get("javaType").and_then(JsonValue::as_str) {
        if !describes_object(&node) {
            return Ok(resolve_external_type(declared));
        }
    }

    match node.get("type").and_then(JsonValue::as_str) {
        Some("string") => Ok(string_type(&node)),
        Some("integer") => Ok(TypeRef::external("java.lang.Integer")),
        Some("number") => Ok(TypeRef::external("java.lang.Double")),
        Some("boolean") => Ok(TypeRef::external("java.lang.Boolean")),
        Some("null") => Ok(TypeRef::Object),
        Some("array") => array_type(gen, name, &node, schema),
        Some("object") => gen.apply(name, &node, schema),
        Some(other) => {
            let other = other.to_string();
            gen.warn(format!(
                "unknown schema type '{other}' for property '{name}'; using Object"
            ));
            Ok(TypeRef::Object)
        }
        None if describes_object(&node) => gen.apply(name, &node, schema),
        None => Ok(TypeRef::Object),
    }
}

fn string_type(node: &JsonValue) -> TypeRef {
    match node.get("format").and_then(JsonValue::as_str) {
        Some("date-time") => TypeRef::external("java.util.Date"),
        Some("uri") => TypeRef::external("java.net.URI"),
        _ => TypeRef::external("java.lang.String"),
    }
}

fn array_type(
    gen: &mut Generator,
    name: &str,
    node: &JsonValue,
    schema: SchemaId,
) -> Result<TypeRef, GenError> {
    match node.get("items") {
        Some(items) if items.is_object() => {
            let child = gen.child_schema(schema, &["items"])?;
            let item_ty = property_type(gen, name, child)?;
            Ok(TypeRef::List(Box::new(item_ty)))
        }
        Some(items) if items.is_array() => {
            gen.warn(format!(
                "tuple-style 'items' for property '{name}' is not supported; using List<Object>"
            ));
            Ok(TypeRef::List(Box::new(TypeRef::Object)))
        }
        _ => Ok(TypeRef::List(Box::new(TypeRef::Object))),
    }
}

fn describes_object(node: &JsonValue) -> bool {
    node.get("type").and_then(JsonValue::as_str) == Some("object")
        || node.get("properties").is_some()
        || node.get("extends").is_some()
        || node.get("extendsJavaClass").is_some()
}
