//! `$ref` chasing and super-type composition.

use std::collections::HashSet;

use serde_json::Value as JsonValue;

use crate::build::Generator;
use crate::error::GenError;
use crate::model::{known_external, Primitive, TypeRef};
use crate::store::{SchemaId, SchemaStore};

/// Longest `$ref` alias chain followed before giving up.
pub const MAX_REF_DEPTH: usize = 32;
/// Deepest `extends` chain walked during super-type resolution.
pub const MAX_INHERITANCE_DEPTH: usize = 32;

/// Follows `$ref` aliases until the content node carries no further alias.
///
/// Self-referential or unbounded chains are rejected instead of recursing.
pub fn follow_refs(
    store: &mut SchemaStore,
    start: SchemaId,
    delimiters: &str,
) -> Result<SchemaId, GenError> {
    let mut current = start;
    let mut seen = HashSet::new();
    for _ in 0..MAX_REF_DEPTH {
        if !seen.insert(current) {
            return Err(GenError::CycleError(format!(
                "`$ref` chain cycles back to '{}'",
                store.schema(current).location()
            )));
        }
        let alias = store
            .content(current)
            .get("$ref")
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        match alias {
            Some(target) => current = store.resolve(current, &target, delimiters)?,
            None => return Ok(current),
        }
    }
    Err(GenError::CycleError(format!(
        "`$ref` chain from '{}' exceeds {MAX_REF_DEPTH} aliases",
        store.schema(start).location()
    )))
}

/// Resolves the parent schema declared via `extends`, following `$ref`
/// aliases to the terminal schema.
///
/// Returns `None` when the node declares no schema-based parent.
pub fn super_schema(
    store: &mut SchemaStore,
    node: &JsonValue,
    schema: SchemaId,
    delimiters: &str,
) -> Result<Option<SchemaId>, GenError> {
    if node.get("extends").is_none() {
        return Ok(None);
    }

    let id = store.child(schema, &["extends"])?;
    follow_refs(store, id, delimiters).map(Some)
}

/// Computes the effective parent type of the class a node describes.
///
/// Declaring both `extends` and `extendsJavaClass` is fatal. A schema-based
/// parent is generated recursively; an external parent resolves by name; with
/// neither the parent is the universal base.
pub fn super_type(
    gen: &mut Generator,
    node_name: &str,
    node: &JsonValue,
    schema: SchemaId,
) -> Result<TypeRef, GenError> {
    if node.get("extends").is_some() && node.get("extendsJavaClass").is_some() {
        return Err(GenError::ConflictingInheritance(format!(
            "'extends' and 'extendsJavaClass' defined simultaneously at '{}'",
            gen.store.schema(schema).location()
        )));
    }

    let delimiters = gen.config.ref_fragment_path_delimiters.clone();
    if let Some(super_id) = super_schema(&mut gen.store, node, schema, &delimiters)? {
        let super_node = gen.store.content(super_id).clone();
        gen.push_inheritance(super_id)?;
        let result = gen.apply(&format!("{node_name}Parent"), &super_node, super_id);
        gen.pop_inheritance();
        return result;
    }

    if let Some(parent_name) = node.get("extendsJavaClass").and_then(JsonValue::as_str) {
        return Ok(resolve_external_type(parent_name));
    }

    Ok(TypeRef::Object)
}

/// Resolves a declared type name to a primitive, a well-known external type,
/// or an opaque external reference. A `<...>` suffix is carried verbatim.
pub fn resolve_external_type(declared: &str) -> TypeRef {
    let (name, generic_args) = match declared.split_once('<') {
        Some((base, rest)) => (
            base.trim(),
            Some(rest.trim_end_matches('>').trim().to_string()),
        ),
        None => (declared.trim(), None),
    };

    if let Some(primitive) = Primitive::parse(name) {
        return TypeRef::Primitive(primitive);
    }
    if name == "java.lang.Object" || name == "Object" {
        return TypeRef::Object;
    }
    let resolved = known_external(name)
        .map(|k| k.fqn.to_string())
        .unwrap_or_else(|| name.to_string());
    TypeRef::External {
        name: resolved,
        generic_args,
    }
}
