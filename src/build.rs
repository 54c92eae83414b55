//! Class-builder orchestrator: resolves the super type, creates or reuses the
//! class, populates it, and runs the configured synthesizer passes.

use serde_json::Value as JsonValue;

use crate::annotate;
use crate::config::GenerationConfig;
use crate::construct;
use crate::error::GenError;
use crate::methods;
use crate::model::{known_external, ClassDef, ClassId, Namespace, Primitive, Registered, TypeRef};
use crate::naming::NameHelper;
use crate::props;
use crate::resolve::{self, MAX_INHERITANCE_DEPTH};
use crate::store::{SchemaId, SchemaStore};
use crate::support;

/// Outcome of type identity resolution: a class to fill in, or a canonical
/// type that already exists.
pub enum Resolution {
    New(ClassId),
    Existing(TypeRef),
}

/// Drives generation for one run: shared registry, schema store, and
/// configuration.
pub struct Generator<'a> {
    pub config: &'a GenerationConfig,
    pub naming: NameHelper,
    pub store: SchemaStore,
    pub namespace: Namespace,
    pub warnings: Vec<String>,
    inheritance_stack: Vec<SchemaId>,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a GenerationConfig, store: SchemaStore) -> Self {
        Self {
            config,
            naming: NameHelper::new(),
            store,
            namespace: Namespace::new(),
            warnings: Vec::new(),
            inheritance_stack: Vec::new(),
        }
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Applies the object-generation rule to a schema node.
    ///
    /// Invoked recursively for parent schemas and nested property schemas.
    /// Returns the target type for the node: a freshly built class, a
    /// previously generated one, or (for primitive or sealed super types) the
    /// super type itself.
    pub fn apply(
        &mut self,
        node_name: &str,
        node: &JsonValue,
        schema: SchemaId,
    ) -> Result<TypeRef, GenError> {
        if let Some(existing) = self.store.generated_type(schema) {
            return Ok(existing.clone());
        }

        let super_type = resolve::super_type(self, node_name, node, schema)?;
        if super_type.is_primitive() || !self.namespace.is_extensible(&super_type) {
            return Ok(super_type);
        }

        let class_id = match self.create_class(node_name, node)? {
            Resolution::Existing(ty) => return Ok(ty),
            Resolution::New(id) => id,
        };

        self.namespace.get_mut(class_id).parent = super_type;
        self.store
            .set_generated_type_if_empty(schema, TypeRef::Class(class_id));

        if annotate::uses_polymorphic_deserialization(self.config, node) {
            annotate::type_info(self.namespace.get_mut(class_id), self.config, node);
        }

        props::apply_title(self.namespace.get_mut(class_id), node);
        props::apply_description(self.namespace.get_mut(class_id), node);
        props::apply_properties(self, node_name, node, class_id, schema)?;
        self.apply_interfaces(class_id, node);
        props::apply_additional_properties(self, node, class_id, schema)?;
        props::apply_required_array(self, node, class_id);

        if self.config.include_to_string {
            methods::add_to_string(self.namespace.get_mut(class_id), self.config);
        }
        if self.config.include_hashcode_and_equals {
            methods::add_hash_code(self.namespace.get_mut(class_id), node, &self.naming);
            methods::add_equals(self.namespace.get_mut(class_id), node, &self.naming);
        }
        if self.config.parcelable {
            support::add_parcel_support(
                self.namespace.get_mut(class_id),
                self.config.include_constructors,
            );
        }
        if self.config.include_constructors {
            construct::add_constructors(self, class_id, node, schema)?;
        }
        if self.config.serializable {
            support::add_serializable_support(self.namespace.get_mut(class_id));
        }

        Ok(TypeRef::Class(class_id))
    }

    /// Decides the class to use for a node: an already-known type, or a brand
    /// new definition registered in the namespace.
    ///
    /// Registration is the atomic check-and-register step; a collision is the
    /// dedup signal, returned as `Resolution::Existing`.
    fn create_class(&mut self, node_name: &str, node: &JsonValue) -> Result<Resolution, GenError> {
        let def = if let Some(declared) = node.get("javaType").and_then(JsonValue::as_str) {
            let (fqn, generic_args) = split_generic(declared);

            if let Some(primitive) = Primitive::parse(fqn) {
                return Ok(Resolution::Existing(TypeRef::Primitive(primitive)));
            }
            if let Some(existing) = self.lookup_known(fqn, generic_args.as_deref()) {
                return Ok(Resolution::Existing(existing));
            }

            let adjusted = self.adjust_fqn(fqn);
            if let Some(existing) = self.lookup_known(&adjusted, generic_args.as_deref()) {
                return Ok(Resolution::Existing(existing));
            }

            let (package, simple) = split_fqn(&adjusted, &self.config.target_package);
            if self.naming.requires_rename(&simple) {
                self.warn(format!(
                    "declared javaType '{declared}' is not a legal class name"
                ));
            }
            ClassDef::new(package, simple)
        } else {
            let name = self.class_name(node_name, node);
            ClassDef::new(self.config.target_package.clone(), name)
        };

        match self.namespace.insert_if_absent(def) {
            Registered::New(id) => {
                annotate::property_inclusion(self.namespace.get_mut(id), self.config);
                Ok(Resolution::New(id))
            }
            Registered::Existing(id) => Ok(Resolution::Existing(TypeRef::Class(id))),
        }
    }

    fn lookup_known(&self, fqn: &str, generic_args: Option<&str>) -> Option<TypeRef> {
        if fqn == "java.lang.Object" {
            return Some(TypeRef::Object);
        }
        if let Some(known) = known_external(fqn) {
            return Some(TypeRef::External {
                name: known.fqn.to_string(),
                generic_args: generic_args.map(str::to_string),
            });
        }
        self.namespace.lookup(fqn).map(TypeRef::Class)
    }

    /// Applies the configured class-name prefix and suffix to the simple-name
    /// segment of a declared fully-qualified name.
    fn adjust_fqn(&self, fqn: &str) -> String {
        match fqn.rsplit_once('.') {
            Some((package, simple)) => format!(
                "{package}.{}{simple}{}",
                self.config.prefix(),
                self.config.suffix()
            ),
            None => format!("{}{fqn}{}", self.config.prefix(), self.config.suffix()),
        }
    }

    /// Derives a class name for a node and makes it unique within the target
    /// package by appending a marker character until no collision remains.
    fn class_name(&self, node_name: &str, node: &JsonValue) -> String {
        let capitalized = self.naming.capitalized_field_name(node_name, Some(node));
        let full = format!("{}{capitalized}{}", self.config.prefix(), self.config.suffix());
        let cleaned = self.naming.replace_illegal_characters(&full);
        let mut candidate = self.naming.normalize_name(&cleaned);
        if candidate.is_empty() {
            candidate = "Type".to_string();
        }
        while self
            .namespace
            .contains(&format!("{}.{candidate}", self.config.target_package))
        {
            candidate.push('_');
        }
        candidate
    }

    fn apply_interfaces(&mut self, class_id: ClassId, node: &JsonValue) {
        let Some(interfaces) = node.get("javaInterfaces").and_then(JsonValue::as_array) else {
            return;
        };
        for interface in interfaces.iter().filter_map(JsonValue::as_str) {
            self.namespace
                .get_mut(class_id)
                .interfaces
                .push(interface.to_string());
        }
    }

    /// Interns the schema entry for a child node reachable by pointer
    /// segments from `schema`.
    pub fn child_schema(
        &mut self,
        schema: SchemaId,
        segments: &[&str],
    ) -> Result<SchemaId, GenError> {
        self.store.child(schema, segments)
    }

    pub fn push_inheritance(&mut self, schema: SchemaId) -> Result<(), GenError> {
        if self.inheritance_stack.contains(&schema) {
            return Err(GenError::CycleError(format!(
                "`extends` chain cycles back to '{}'",
                self.store.schema(schema).location()
            )));
        }
        if self.inheritance_stack.len() >= MAX_INHERITANCE_DEPTH {
            return Err(GenError::CycleError(format!(
                "`extends` chain exceeds {MAX_INHERITANCE_DEPTH} levels at '{}'",
                self.store.schema(schema).location()
            )));
        }
        self.inheritance_stack.push(schema);
        Ok(())
    }

    pub fn pop_inheritance(&mut self) {
        self.inheritance_stack.pop();
    }
}

fn split_generic(declared: &str) -> (&str, Option<String>) {
    match declared.split_once('<') {
        Some((base, rest)) => (
            base.trim(),
            Some(rest.trim_end_matches('>').trim().to_string()),
        ),
        None => (declared.trim(), None),
    }
}

fn split_fqn(fqn: &str, default_package: &str) -> (String, String) {
    match fqn.rsplit_once('.') {
        Some((package, simple)) => (package.to_string(), simple.to_string()),
        None => (default_package.to_string(), fqn.to_string()),
    }
}
