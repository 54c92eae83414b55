//! In-memory code model: type references, class definitions, and the
//! namespace arena that generated classes are registered in.

use std::collections::BTreeMap;

/// Java primitive types recognized as `javaType` aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "boolean" => Some(Primitive::Boolean),
            "byte" => Some(Primitive::Byte),
            "char" => Some(Primitive::Char),
            "short" => Some(Primitive::Short),
            "int" => Some(Primitive::Int),
            "long" => Some(Primitive::Long),
            "float" => Some(Primitive::Float),
            "double" => Some(Primitive::Double),
            _ => None,
        }
    }

    pub fn java_name(&self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }
}

/// Index of a class inside the [`Namespace`] arena.
pub type ClassId = usize;

/// Reference to a target type: generated, external, or built-in.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    /// The universal base type, `java.lang.Object`.
    Object,
    Primitive(Primitive),
    /// A named type outside the generated namespace. `generic_args` carries a
    /// verbatim `<...>` suffix when the declaration included one.
    External {
        name: String,
        generic_args: Option<String>,
    },
    /// A class defined in the namespace arena.
    Class(ClassId),
    List(Box<TypeRef>),
    /// `Map<String, V>`.
    Map(Box<TypeRef>),
}

impl TypeRef {
    pub fn external(name: impl Into<String>) -> Self {
        TypeRef::External {
            name: name.into(),
            generic_args: None,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Primitive(_))
    }
}

/// A field on a generated class, in declaration order.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    /// Original schema property key; `None` for synthetic fields.
    pub raw_key: Option<String>,
    pub ty: TypeRef,
    pub required: bool,
    pub is_static: bool,
    /// Rendered annotation lines, e.g. `@JsonProperty("id")`.
    pub annotations: Vec<String>,
    pub description: Option<String>,
    /// Verbatim initializer expression.
    pub initializer: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            raw_key: None,
            ty,
            required: false,
            is_static: false,
            annotations: Vec::new(),
            description: None,
            initializer: None,
        }
    }
}

/// Constructor or method parameter.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
}

/// Synthesized method, stored structurally and rendered by the emitter.
#[derive(Debug, Clone)]
pub enum Method {
    NoArgsConstructor,
    FieldsConstructor {
        params: Vec<Param>,
        /// Own field names assigned in the body, in parameter order.
        assigns: Vec<String>,
        /// Parameter names forwarded to `super(...)`, in append order.
        super_args: Vec<String>,
    },
    Getter {
        field: String,
    },
    Setter {
        field: String,
    },
    ToString {
        append_super: bool,
        fields: Vec<String>,
    },
    HashCode {
        append_super: bool,
        fields: Vec<String>,
    },
    Equals {
        append_super: bool,
        fields: Vec<String>,
    },
    DescribeContents,
    WriteToParcel {
        fields: Vec<String>,
    },
    /// The static `CREATOR` instance required by the parcel runtime.
    ParcelCreator,
    ParcelConstructor {
        fields: Vec<String>,
    },
}

/// A class under construction in the target namespace.
#[derive(Debug, Clone)]
pub struct ClassDef {
    pub package: String,
    pub name: String,
    pub parent: TypeRef,
    /// Fully-qualified interface names.
    pub interfaces: Vec<String>,
    pub annotations: Vec<String>,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<Method>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Property name used to tag runtime type for polymorphic deserialization.
    pub discriminator: Option<String>,
}

impl ClassDef {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            parent: TypeRef::Object,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            title: None,
            description: None,
            discriminator: None,
        }
    }

    pub fn fqn(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// True when the class has a parent other than the universal base.
    pub fn has_concrete_parent(&self) -> bool {
        self.parent != TypeRef::Object
    }
}

/// Well-known external type, stand-in for a classloader probe.
#[derive(Debug, Clone, Copy)]
pub struct KnownType {
    pub fqn: &'static str,
    pub is_final: bool,
}

const KNOWN_TYPES: &[KnownType] = &[
    KnownType { fqn: "java.lang.Object", is_final: false },
    KnownType { fqn: "java.lang.String", is_final: true },
    KnownType { fqn: "java.lang.Boolean", is_final: true },
    KnownType { fqn: "java.lang.Byte", is_final: true },
    KnownType { fqn: "java.lang.Character", is_final: true },
    KnownType { fqn: "java.lang.Short", is_final: true },
    KnownType { fqn: "java.lang.Integer", is_final: true },
    KnownType { fqn: "java.lang.Long", is_final: true },
    KnownType { fqn: "java.lang.Float", is_final: true },
    KnownType { fqn: "java.lang.Double", is_final: true },
    KnownType { fqn: "java.lang.Number", is_final: false },
    KnownType { fqn: "java.math.BigDecimal", is_final: false },
    KnownType { fqn: "java.math.BigInteger", is_final: false },
    KnownType { fqn: "java.util.Date", is_final: false },
    KnownType { fqn: "java.util.List", is_final: false },
    KnownType { fqn: "java.util.Map", is_final: false },
    KnownType { fqn: "java.util.Set", is_final: false },
    KnownType { fqn: "java.util.Collection", is_final: false },
    KnownType { fqn: "java.net.URI", is_final: true },
];

/// Looks up a well-known external type by fully-qualified or `java.lang`
/// simple name.
pub fn known_external(name: &str) -> Option<KnownType> {
    KNOWN_TYPES
        .iter()
        .find(|k| k.fqn == name || (!name.contains('.') && k.fqn == format!("java.lang.{name}")))
        .copied()
}

/// Outcome of the atomic check-and-register step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registered {
    New(ClassId),
    Existing(ClassId),
}

/// Shared registry of generated classes, keyed by fully-qualified name.
///
/// Registration is a single insert-if-absent step: a collision returns the
/// pre-existing entry instead of raising an error.
#[derive(Debug, Default)]
pub struct Namespace {
    classes: Vec<ClassDef>,
    by_name: BTreeMap<String, ClassId>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `def` under its fully-qualified name, returning the existing
    /// entry when one is already present.
    pub fn insert_if_absent(&mut self, def: ClassDef) -> Registered {
        let fqn = def.fqn();
        if let Some(&id) = self.by_name.get(&fqn) {
            return Registered::Existing(id);
        }
        let id = self.classes.len();
        self.classes.push(def);
        self.by_name.insert(fqn, id);
        Registered::New(id)
    }

    pub fn lookup(&self, fqn: &str) -> Option<ClassId> {
        self.by_name.get(fqn).copied()
    }

    pub fn contains(&self, fqn: &str) -> bool {
        self.by_name.contains_key(fqn)
    }

    pub fn get(&self, id: ClassId) -> &ClassDef {
        &self.classes[id]
    }

    pub fn get_mut(&mut self, id: ClassId) -> &mut ClassDef {
        &mut self.classes[id]
    }

    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &ClassDef)> {
        self.classes.iter().enumerate()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Capability query replacing runtime final-modifier reflection.
    pub fn is_extensible(&self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Object => true,
            TypeRef::Primitive(_) => false,
            TypeRef::External { name, .. } => {
                // Unknown externals are assumed extensible, matching the
                // legacy fallback when a class cannot be loaded.
                known_external(name).map_or(true, |k| !k.is_final)
            }
            TypeRef::Class(_) => true,
            TypeRef::List(_) | TypeRef::Map(_) => true,
        }
    }

    /// Searches the defined ancestor chain of `parent` for a field.
    ///
    /// Stops at the first non-generated ancestor; external parents cannot be
    /// searched.
    pub fn find_field_in_ancestors(&self, parent: &TypeRef, name: &str) -> Option<&FieldDef> {
        let mut current = parent.clone();
        while let TypeRef::Class(id) = current {
            let class = self.get(id);
            if let Some(field) = class.field(name) {
                return Some(field);
            }
            current = class.parent.clone();
        }
        None
    }
}
