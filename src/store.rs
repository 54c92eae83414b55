//! Schema arena and memoized reference resolution.
//!
//! Every distinct document + fragment pair resolves to exactly one
//! [`SchemaId`]; repeated references yield the same entry, and each entry
//! carries a generated-type handle that can be set at most once.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::error::GenError;
use crate::fetch::{
    read_ref_source, resolve_ref_source_from_parent, FetchContext, RefSource,
};
use crate::model::TypeRef;

/// Index of a schema inside the [`SchemaStore`] arena.
pub type SchemaId = usize;

/// A resolved schema node plus its originating location.
#[derive(Debug)]
pub struct Schema {
    /// Key of the document this node belongs to (path, URL, or inline name).
    pub doc_key: String,
    /// Slash-joined fragment path from the document root; empty at the root.
    pub fragment: String,
    /// The node this schema points at.
    pub content: JsonValue,
    source: Option<RefSource>,
    generated: Option<TypeRef>,
}

impl Schema {
    /// Human-readable location for diagnostics.
    pub fn location(&self) -> String {
        if self.fragment.is_empty() {
            self.doc_key.clone()
        } else {
            format!("{}#{}", self.doc_key, self.fragment)
        }
    }
}

/// Registry of every schema seen during a generation run.
pub struct SchemaStore {
    schemas: Vec<Schema>,
    by_key: HashMap<String, SchemaId>,
    documents: HashMap<String, JsonValue>,
    pub fetch: FetchContext,
}

impl SchemaStore {
    pub fn new(fetch: FetchContext) -> Self {
        Self {
            schemas: Vec::new(),
            by_key: HashMap::new(),
            documents: HashMap::new(),
            fetch,
        }
    }

    /// Registers an in-memory document root under `doc_key`.
    pub fn register_root(&mut self, doc_key: &str, content: JsonValue) -> SchemaId {
        self.documents.insert(doc_key.to_string(), content.clone());
        self.intern(doc_key.to_string(), String::new(), content, None)
    }

    /// Loads a document from a local path or URL and registers its root.
    pub fn load_source(&mut self, source: RefSource) -> Result<SchemaId, GenError> {
        let doc_key = source.display_id();
        if let Some(&id) = self.by_key.get(&schema_key(&doc_key, "")) {
            return Ok(id);
        }
        let text = read_ref_source(&source, &mut self.fetch)?;
        let content: JsonValue = serde_json::from_str(&text).map_err(|e| {
            GenError::SchemaError(format!("invalid JSON in schema '{doc_key}': {e}"))
        })?;
        self.documents.insert(doc_key.clone(), content.clone());
        Ok(self.intern(doc_key, String::new(), content, Some(source)))
    }

    /// Resolves a `$ref`-style reference from an existing schema.
    ///
    /// `ref_or_path` is `document`, `#fragment`, or `document#fragment`; the
    /// fragment is split on `delimiters` and walked from the target document's
    /// root. Document parts resolve relative to the referring schema's source.
    pub fn resolve(
        &mut self,
        from: SchemaId,
        ref_or_path: &str,
        delimiters: &str,
    ) -> Result<SchemaId, GenError> {
        let trimmed = ref_or_path.trim();
        let (doc_part, fragment_part) = match trimmed.split_once('#') {
            Some((doc, frag)) => (doc, frag),
            None => (trimmed, ""),
        };

        let (doc_key, root_id) = if doc_part.is_empty() {
            let doc_key = self.schema(from).doc_key.clone();
            let root_id = self
                .by_key
                .get(&schema_key(&doc_key, ""))
                .copied()
                .ok_or_else(|| {
                    GenError::RefError(format!("document '{doc_key}' has no registered root"))
                })?;
            (doc_key, root_id)
        } else {
            let parent_source = self.schema(from).source.clone().ok_or_else(|| {
                GenError::RefError(format!(
                    "cannot resolve document reference '{trimmed}' from an in-memory schema"
                ))
            })?;
            let source = resolve_ref_source_from_parent(&parent_source, doc_part, &self.fetch)?;
            let root_id = self.load_source(source)?;
            (self.schema(root_id).doc_key.clone(), root_id)
        };

        let segments: Vec<String> = fragment_part
            .split(|c| delimiters.contains(c))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if segments.is_empty() {
            return Ok(root_id);
        }
        let fragment = segments.join("/");

        if let Some(&id) = self.by_key.get(&schema_key(&doc_key, &fragment)) {
            return Ok(id);
        }

        let root = self.documents.get(&doc_key).ok_or_else(|| {
            GenError::RefError(format!("document '{doc_key}' is not loaded"))
        })?;
        let node = walk_fragment(root, &segments).ok_or_else(|| {
            GenError::RefError(format!(
                "fragment '#{fragment_part}' not found in '{doc_key}'"
            ))
        })?;

        let source = self.schema(root_id).source.clone();
        Ok(self.intern(doc_key, fragment, node, source))
    }

    /// Interns the schema entry for a child node reached by walking pointer
    /// `segments` from an existing schema's content node.
    ///
    /// Unlike [`SchemaStore::resolve`], segments are taken verbatim, so
    /// property keys containing delimiter characters stay intact.
    pub fn child(&mut self, from: SchemaId, segments: &[&str]) -> Result<SchemaId, GenError> {
        let parent = self.schema(from);
        let doc_key = parent.doc_key.clone();
        let source = parent.source.clone();
        let mut fragment = parent.fragment.clone();
        for segment in segments {
            if !fragment.is_empty() {
                fragment.push('/');
            }
            fragment.push_str(segment);
        }

        if let Some(&id) = self.by_key.get(&schema_key(&doc_key, &fragment)) {
            return Ok(id);
        }

        let owned: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
        let node = walk_fragment(&self.schemas[from].content, &owned).ok_or_else(|| {
            GenError::RefError(format!(
                "node '{}' not found under '{}'",
                segments.join("/"),
                self.schema(from).location()
            ))
        })?;

        Ok(self.intern(doc_key, fragment, node, source))
    }

    pub fn content(&self, id: SchemaId) -> &JsonValue {
        &self.schemas[id].content
    }

    pub fn schema(&self, id: SchemaId) -> &Schema {
        &self.schemas[id]
    }

    /// Associates the generated target type with this schema, once.
    ///
    /// Later calls are ignored so the first generated class for a schema path
    /// stays canonical.
    pub fn set_generated_type_if_empty(&mut self, id: SchemaId, ty: TypeRef) {
        let entry = &mut self.schemas[id];
        if entry.generated.is_none() {
            entry.generated = Some(ty);
        }
    }

    pub fn generated_type(&self, id: SchemaId) -> Option<&TypeRef> {
        self.schemas[id].generated.as_ref()
    }

    fn intern(
        &mut self,
        doc_key: String,
        fragment: String,
        content: JsonValue,
        source: Option<RefSource>,
    ) -> SchemaId {
        let key = schema_key(&doc_key, &fragment);
        if let Some(&id) = self.by_key.get(&key) {
            return id;
        }
        let id = self.schemas.len();
        self.schemas.push(Schema {
            doc_key,
            fragment,
            content,
            source,
            generated: None,
        });
        self.by_key.insert(key, id);
        id
    }
}

fn schema_key(doc_key: &str, fragment: &str) -> String {
    format!("{doc_key}#{fragment}")
}

fn walk_fragment(root: &JsonValue, segments: &[String]) -> Option<JsonValue> {
    let mut current = root;
    for segment in segments {
        current = match current {
            JsonValue::Object(map) => map.get(segment)?,
            JsonValue::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_with(doc: JsonValue) -> (SchemaStore, SchemaId) {
        let mut store = SchemaStore::new(FetchContext::disabled());
        let root = store.register_root("test", doc);
        (store, root)
    }

    #[test]
    fn repeated_resolution_is_memoized() {
        let (mut store, root) = store_with(json!({
            "definitions": {"address": {"type": "object"}}
        }));
        let first = store.resolve(root, "#/definitions/address", "#/.").unwrap();
        let second = store.resolve(root, "#/definitions/address", "#/.").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn fragment_walk_supports_array_indices() {
        let (mut store, root) = store_with(json!({"items": [{"type": "string"}]}));
        let id = store.resolve(root, "#/items/0", "#/.").unwrap();
        assert_eq!(store.content(id)["type"], json!("string"));
    }

    #[test]
    fn missing_fragment_is_a_ref_error() {
        let (mut store, root) = store_with(json!({}));
        let err = store.resolve(root, "#/definitions/missing", "#/.").unwrap_err();
        assert!(err.to_string().contains("ref error"));
    }

    #[test]
    fn generated_type_is_set_at_most_once() {
        let (mut store, root) = store_with(json!({}));
        store.set_generated_type_if_empty(root, TypeRef::external("com.example.First"));
        store.set_generated_type_if_empty(root, TypeRef::external("com.example.Second"));
        assert_eq!(
            store.generated_type(root),
            Some(&TypeRef::external("com.example.First"))
        );
    }

    #[test]
    fn document_reference_from_memory_schema_is_rejected() {
        let (mut store, root) = store_with(json!({}));
        let err = store.resolve(root, "other.json#/foo", "#/.").unwrap_err();
        assert!(err.to_string().contains("in-memory"));
    }
}
