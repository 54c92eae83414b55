//! Constructor property planning across the inheritance chain, and
//! constructor synthesis.

use std::collections::HashSet;

use indexmap::IndexSet;
use serde_json::Value as JsonValue;

use crate::build::Generator;
use crate::error::GenError;
use crate::model::{ClassId, Method, Param};
use crate::naming::NameHelper;
use crate::resolve::{self, MAX_INHERITANCE_DEPTH};
use crate::store::SchemaId;

/// Ordered set of property names declared on `node` that must appear as
/// constructor parameters.
///
/// With `only_required`, a property qualifies when its own node carries a
/// boolean `required` flag (draft-03) or the owning node's `required` array
/// lists its raw key (draft-04). Names are field-name form so later lookup
/// against generated fields succeeds.
pub fn constructor_properties(
    node: &JsonValue,
    naming: &NameHelper,
    only_required: bool,
) -> IndexSet<String> {
    let mut out = IndexSet::new();
    let Some(properties) = node.get("properties").and_then(JsonValue::as_object) else {
        return out;
    };

    let mut required_keys: HashSet<&str> = HashSet::new();
    if only_required {
        if let Some(required) = node.get("required").and_then(JsonValue::as_array) {
            required_keys.extend(required.iter().filter_map(JsonValue::as_str));
        }
    }

    for (raw_key, prop_node) in properties {
        if only_required {
            let draft3 = prop_node
                .get("required")
                .and_then(JsonValue::as_bool)
                .unwrap_or(false);
            if draft3 || required_keys.contains(raw_key.as_str()) {
                out.insert(naming.property_name(raw_key, Some(prop_node)));
            }
        } else {
            out.insert(naming.property_name(raw_key, Some(prop_node)));
        }
    }

    out
}

/// Walks the ancestor chain of `node` and accumulates every constructor
/// property declared by a super schema, nearest ancestor first.
///
/// Duplicates are dropped: a name already contributed by a nearer ancestor is
/// not re-added. `$ref` aliases are always followed to the terminal schema.
pub fn ancestor_properties(
    gen: &mut Generator,
    node: &JsonValue,
    schema: SchemaId,
    only_required: bool,
) -> Result<IndexSet<String>, GenError> {
    let mut visited = HashSet::new();
    ancestor_properties_inner(gen, node, schema, only_required, &mut visited)
}

fn ancestor_properties_inner(
    gen: &mut Generator,
    node: &JsonValue,
    schema: SchemaId,
    only_required: bool,
    visited: &mut HashSet<SchemaId>,
) -> Result<IndexSet<String>, GenError> {
    let delimiters = gen.config.ref_fragment_path_delimiters.clone();
    let Some(super_id) = resolve::super_schema(&mut gen.store, node, schema, &delimiters)? else {
        return Ok(IndexSet::new());
    };

    if !visited.insert(super_id) || visited.len() > MAX_INHERITANCE_DEPTH {
        return Err(GenError::CycleError(format!(
            "`extends` chain cycles or exceeds {MAX_INHERITANCE_DEPTH} levels at '{}'",
            gen.store.schema(super_id).location()
        )));
    }

    let super_node = gen.store.content(super_id).clone();
    let mut out = constructor_properties(&super_node, &gen.naming, only_required);
    out.extend(ancestor_properties_inner(
        gen,
        &super_node,
        super_id,
        only_required,
        visited,
    )?);

    Ok(out)
}

/// Synthesizes a no-args constructor plus a fully-parameterized constructor.
///
/// Parameter order: own properties (declaration order) first, then
/// ancestor-only properties; ancestor parameters are forwarded to the super
/// constructor call in the order they were appended. A planned property with
/// no backing field is a programming-invariant violation.
pub fn add_constructors(
    gen: &mut Generator,
    class_id: ClassId,
    node: &JsonValue,
    schema: SchemaId,
) -> Result<(), GenError> {
    let only_required = gen.config.constructors_required_properties_only;
    let class_properties = constructor_properties(node, &gen.naming, only_required);
    let super_properties = ancestor_properties(gen, node, schema, only_required)?;

    // No properties to pass means the default constructor is good enough.
    if class_properties.is_empty() && super_properties.is_empty() {
        return Ok(());
    }

    let mut params = Vec::new();
    let mut assigns = Vec::new();
    let mut super_args = Vec::new();

    {
        let class = gen.namespace.get(class_id);
        for name in &class_properties {
            let field = class.field(name).ok_or_else(|| {
                GenError::MissingField(format!(
                    "property '{name}' has no field on {}; field population must run before constructor synthesis",
                    class.name
                ))
            })?;
            params.push(Param {
                name: name.clone(),
                ty: field.ty.clone(),
            });
            assigns.push(name.clone());
        }

        let parent = class.parent.clone();
        for name in &super_properties {
            if !class_properties.contains(name) {
                let field = gen
                    .namespace
                    .find_field_in_ancestors(&parent, name)
                    .ok_or_else(|| {
                        GenError::MissingField(format!(
                            "inherited property '{name}' has no field on any ancestor of {}",
                            gen.namespace.get(class_id).name
                        ))
                    })?;
                params.push(Param {
                    name: name.clone(),
                    ty: field.ty.clone(),
                });
            }
            super_args.push(name.clone());
        }
    }

    let class = gen.namespace.get_mut(class_id);
    class.methods.push(Method::NoArgsConstructor);
    class.methods.push(Method::FieldsConstructor {
        params,
        assigns,
        super_args,
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(set: &IndexSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    #[test]
    fn all_properties_in_declaration_order() {
        let node = json!({
            "properties": {
                "zeta": {"type": "string"},
                "alpha": {"type": "integer"},
                "mid": {"type": "boolean"}
            }
        });
        let set = constructor_properties(&node, &NameHelper::new(), false);
        assert_eq!(names(&set), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn required_only_accepts_both_dialects() {
        let node = json!({
            "properties": {
                "a": {"type": "string", "required": true},
                "b": {"type": "string"},
                "c": {"type": "string"}
            },
            "required": ["c"]
        });
        let set = constructor_properties(&node, &NameHelper::new(), true);
        assert_eq!(names(&set), vec!["a", "c"]);
    }

    #[test]
    fn no_properties_yields_empty_set() {
        let node = json!({"type": "object"});
        let set = constructor_properties(&node, &NameHelper::new(), false);
        assert!(set.is_empty());
    }

    #[test]
    fn property_names_are_field_name_form() {
        let node = json!({
            "properties": {
                "first-name": {"type": "string"}
            }
        });
        let set = constructor_properties(&node, &NameHelper::new(), false);
        assert_eq!(names(&set), vec!["firstName"]);
    }
}
