//! Java source rendering from the class model.

use std::collections::BTreeSet;

use crate::model::{ClassDef, FieldDef, Method, Namespace, Primitive, TypeRef};
use crate::naming::capitalize;

/// One generated compilation unit.
#[derive(Debug, Clone)]
pub struct GeneratedUnit {
    pub package: String,
    pub class_name: String,
    pub source: String,
}

impl GeneratedUnit {
    /// Relative output path, package segments as directories.
    pub fn relative_path(&self) -> String {
        if self.package.is_empty() {
            format!("{}.java", self.class_name)
        } else {
            format!("{}/{}.java", self.package.replace('.', "/"), self.class_name)
        }
    }
}

/// Renders every class in the namespace to a compilation unit.
pub fn render_units(namespace: &Namespace) -> Vec<GeneratedUnit> {
    namespace
        .classes()
        .map(|(_, class)| GeneratedUnit {
            package: class.package.clone(),
            class_name: class.name.clone(),
            source: render_class(namespace, class),
        })
        .collect()
}

#[derive(Default)]
struct Imports {
    set: BTreeSet<String>,
}

impl Imports {
    fn add(&mut self, fqn: &str) {
        if fqn.contains('.') && !fqn.starts_with("java.lang.") {
            self.set.insert(fqn.to_string());
        }
    }

    fn note_annotation(&mut self, line: &str) {
        const JACKSON: &[(&str, &str)] = &[
            ("@JsonProperty", "com.fasterxml.jackson.annotation.JsonProperty"),
            ("@JsonInclude", "com.fasterxml.jackson.annotation.JsonInclude"),
            ("@JsonTypeInfo", "com.fasterxml.jackson.annotation.JsonTypeInfo"),
        ];
        for (prefix, fqn) in JACKSON {
            if line.starts_with(prefix) {
                self.set.insert((*fqn).to_string());
            }
        }
    }
}

/// Renders one class to Java source.
pub fn render_class(namespace: &Namespace, class: &ClassDef) -> String {
    let mut imports = Imports::default();
    let mut content = String::new();

    render_class_javadoc(class, &mut content);
    for annotation in &class.annotations {
        imports.note_annotation(annotation);
        content.push_str(annotation);
        content.push('\n');
    }

    let mut declaration = format!("public class {}", class.name);
    if class.has_concrete_parent() {
        let parent = java_type(&class.parent, namespace, &mut imports, &class.package);
        declaration.push_str(&format!(" extends {parent}"));
    }
    if !class.interfaces.is_empty() {
        let names: Vec<String> = class
            .interfaces
            .iter()
            .map(|fqn| {
                imports.add(fqn);
                simple_name(fqn).to_string()
            })
            .collect();
        declaration.push_str(&format!(" implements {}", names.join(", ")));
    }
    content.push_str(&declaration);
    content.push_str(" {\n\n");

    for field in &class.fields {
        render_field(field, namespace, &mut imports, &class.package, &mut content);
    }
    for method in &class.methods {
        render_method(method, class, namespace, &mut imports, &mut content);
    }

    content.push_str("}\n");

    let mut out = String::new();
    if !class.package.is_empty() {
        out.push_str(&format!("package {};\n\n", class.package));
    }
    if !imports.set.is_empty() {
        for import in &imports.set {
            out.push_str(&format!("import {import};\n"));
        }
        out.push('\n');
    }
    out.push_str(&content);
    out
}

fn render_class_javadoc(class: &ClassDef, out: &mut String) {
    if class.title.is_none() && class.description.is_none() {
        return;
    }
    out.push_str("/**\n");
    if let Some(title) = &class.title {
        out.push_str(&format!(" * {title}\n"));
    }
    if class.title.is_some() && class.description.is_some() {
        out.push_str(" * <p>\n");
    }
    if let Some(description) = &class.description {
        out.push_str(&format!(" * {description}\n"));
    }
    out.push_str(" */\n");
}

fn render_field(
    field: &FieldDef,
    namespace: &Namespace,
    imports: &mut Imports,
    package: &str,
    out: &mut String,
) {
    if field.description.is_some() || field.required {
        out.push_str("    /**\n");
        if let Some(description) = &field.description {
            out.push_str(&format!("     * {description}\n"));
        }
        if field.required {
            out.push_str("     * (Required)\n");
        }
        out.push_str("     */\n");
    }
    for annotation in &field.annotations {
        imports.note_annotation(annotation);
        out.push_str(&format!("    {annotation}\n"));
    }

    let ty = java_type(&field.ty, namespace, imports, package);
    let modifiers = if field.is_static {
        "private final static"
    } else {
        "private"
    };
    match &field.initializer {
        Some(init) => {
            if init.contains("HashMap") {
                imports.add("java.util.HashMap");
            }
            out.push_str(&format!("    {modifiers} {ty} {} = {init};\n\n", field.name));
        }
        None => out.push_str(&format!("    {modifiers} {ty} {};\n\n", field.name)),
    }
}

fn render_method(
    method: &Method,
    class: &ClassDef,
    namespace: &Namespace,
    imports: &mut Imports,
    out: &mut String,
) {
    match method {
        Method::NoArgsConstructor => {
            out.push_str("    /**\n     * No args constructor for use in serialization\n     */\n");
            out.push_str(&format!("    public {}() {{\n    }}\n\n", class.name));
        }
        Method::FieldsConstructor {
            params,
            assigns,
            super_args,
        } => {
            out.push_str("    /**\n");
            for param in params {
                out.push_str(&format!("     * @param {}\n", param.name));
            }
            out.push_str("     */\n");
            let rendered: Vec<String> = params
                .iter()
                .map(|p| {
                    format!(
                        "{} {}",
                        java_type(&p.ty, namespace, imports, &class.package),
                        p.name
                    )
                })
                .collect();
            out.push_str(&format!(
                "    public {}({}) {{\n",
                class.name,
                rendered.join(", ")
            ));
            if !super_args.is_empty() {
                out.push_str(&format!("        super({});\n", super_args.join(", ")));
            }
            for name in assigns {
                out.push_str(&format!("        this.{name} = {name};\n"));
            }
            out.push_str("    }\n\n");
        }
        Method::Getter { field } => {
            let Some(field_def) = class.field(field) else {
                return;
            };
            let ty = java_type(&field_def.ty, namespace, imports, &class.package);
            out.push_str(&format!(
                "    public {ty} get{}() {{\n        return {field};\n    }}\n\n",
                capitalize(field)
            ));
        }
        Method::Setter { field } => {
            let Some(field_def) = class.field(field) else {
                return;
            };
            let ty = java_type(&field_def.ty, namespace, imports, &class.package);
            out.push_str(&format!(
                "    public void set{}({ty} {field}) {{\n        this.{field} = {field};\n    }}\n\n",
                capitalize(field)
            ));
        }
        Method::ToString {
            append_super,
            fields,
        } => {
            out.push_str("    @Override\n    public String toString() {\n");
            out.push_str("        StringBuilder sb = new StringBuilder();\n");
            out.push_str(&format!(
                "        sb.append({}.class.getSimpleName()).append('[');\n",
                class.name
            ));
            if *append_super {
                out.push_str("        sb.append(\"super=\").append(super.toString()).append(',');\n");
            }
            for field in fields {
                out.push_str(&format!(
                    "        sb.append(\"{field}=\").append(this.{field}).append(',');\n"
                ));
            }
            out.push_str("        if (sb.charAt(sb.length() - 1) == ',') {\n");
            out.push_str("            sb.setCharAt(sb.length() - 1, ']');\n");
            out.push_str("        } else {\n");
            out.push_str("            sb.append(']');\n");
            out.push_str("        }\n");
            out.push_str("        return sb.toString();\n    }\n\n");
        }
        Method::HashCode {
            append_super,
            fields,
        } => {
            if !fields.is_empty() {
                imports.add("java.util.Objects");
            }
            out.push_str("    @Override\n    public int hashCode() {\n");
            out.push_str("        int result = 1;\n");
            if *append_super {
                out.push_str("        result = ((result * 31) + super.hashCode());\n");
            }
            for field in fields {
                out.push_str(&format!(
                    "        result = ((result * 31) + Objects.hashCode(this.{field}));\n"
                ));
            }
            out.push_str("        return result;\n    }\n\n");
        }
        Method::Equals {
            append_super,
            fields,
        } => {
            if !fields.is_empty() {
                imports.add("java.util.Objects");
            }
            out.push_str("    @Override\n    public boolean equals(Object other) {\n");
            out.push_str("        if (other == this) {\n            return true;\n        }\n");
            out.push_str(&format!(
                "        if ((other instanceof {}) == false) {{\n            return false;\n        }}\n",
                class.name
            ));
            out.push_str(&format!(
                "        {} rhs = (({}) other);\n",
                class.name, class.name
            ));
            let mut parts = Vec::new();
            if *append_super {
                parts.push("super.equals(other)".to_string());
            }
            for field in fields {
                parts.push(format!("Objects.equals(this.{field}, rhs.{field})"));
            }
            if parts.is_empty() {
                out.push_str("        return true;\n");
            } else {
                out.push_str(&format!("        return {};\n", parts.join(" && ")));
            }
            out.push_str("    }\n\n");
        }
        Method::DescribeContents => {
            out.push_str("    @Override\n    public int describeContents() {\n");
            out.push_str("        return 0;\n    }\n\n");
        }
        Method::WriteToParcel { fields } => {
            imports.add("android.os.Parcel");
            out.push_str("    @Override\n    public void writeToParcel(Parcel dest, int flags) {\n");
            for field in fields {
                out.push_str(&format!("        dest.writeValue(this.{field});\n"));
            }
            out.push_str("    }\n\n");
        }
        Method::ParcelCreator => {
            imports.add("android.os.Parcel");
            imports.add("android.os.Parcelable");
            let name = &class.name;
            out.push_str(&format!(
                "    public final static Parcelable.Creator<{name}> CREATOR = new Parcelable.Creator<{name}>() {{\n\n"
            ));
            out.push_str(&format!(
                "        public {name} createFromParcel(Parcel in) {{\n            return new {name}(in);\n        }}\n\n"
            ));
            out.push_str(&format!(
                "        public {name}[] newArray(int size) {{\n            return (new {name}[size]);\n        }}\n\n"
            ));
            out.push_str("    };\n\n");
        }
        Method::ParcelConstructor { fields } => {
            imports.add("android.os.Parcel");
            out.push_str(&format!("    protected {}(Parcel in) {{\n", class.name));
            for field in fields {
                let Some(field_def) = class.field(field) else {
                    continue;
                };
                let cast = java_type(&field_def.ty, namespace, imports, &class.package);
                let erased = erased_simple(&field_def.ty, namespace);
                out.push_str(&format!(
                    "        this.{field} = (({cast}) in.readValue(({erased}.class.getClassLoader())));\n"
                ));
            }
            out.push_str("    }\n\n");
        }
    }
}

/// Renders a type reference, importing what it needs along the way.
fn java_type(
    ty: &TypeRef,
    namespace: &Namespace,
    imports: &mut Imports,
    current_package: &str,
) -> String {
    match ty {
        TypeRef::Object => "Object".to_string(),
        TypeRef::Primitive(p) => p.java_name().to_string(),
        TypeRef::External { name, generic_args } => {
            imports.add(name);
            let simple = simple_name(name);
            match generic_args {
                Some(args) => format!("{simple}<{args}>"),
                None => simple.to_string(),
            }
        }
        TypeRef::Class(id) => {
            let class = namespace.get(*id);
            if class.package != current_package {
                imports.add(&class.fqn());
            }
            class.name.clone()
        }
        TypeRef::List(item) => {
            imports.add("java.util.List");
            format!("List<{}>", java_type(item, namespace, imports, current_package))
        }
        TypeRef::Map(value) => {
            imports.add("java.util.Map");
            format!(
                "Map<String, {}>",
                java_type(value, namespace, imports, current_package)
            )
        }
    }
}

/// Erased name used for classloader lookups in parcel deserialization.
fn erased_simple(ty: &TypeRef, namespace: &Namespace) -> String {
    match ty {
        TypeRef::Object => "Object".to_string(),
        TypeRef::Primitive(p) => boxed_name(*p).to_string(),
        TypeRef::External { name, .. } => simple_name(name).to_string(),
        TypeRef::Class(id) => namespace.get(*id).name.clone(),
        TypeRef::List(_) => "List".to_string(),
        TypeRef::Map(_) => "Map".to_string(),
    }
}

fn boxed_name(p: Primitive) -> &'static str {
    match p {
        Primitive::Boolean => "Boolean",
        Primitive::Byte => "Byte",
        Primitive::Char => "Character",
        Primitive::Short => "Short",
        Primitive::Int => "Integer",
        Primitive::Long => "Long",
        Primitive::Float => "Float",
        Primitive::Double => "Double",
    }
}

fn simple_name(fqn: &str) -> &str {
    fqn.rsplit('.').next().unwrap_or(fqn)
}
