//! Identifier derivation for generated classes and fields.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value as JsonValue;

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null",
];

/// Derives Java identifiers from raw schema keys and node names.
#[derive(Debug, Default)]
pub struct NameHelper;

impl NameHelper {
    pub fn new() -> Self {
        Self
    }

    /// Field name for a schema property.
    ///
    /// A `javaName` declared on the property node overrides derivation.
    pub fn property_name(&self, raw_key: &str, property_node: Option<&JsonValue>) -> String {
        if let Some(java_name) = property_node
            .and_then(|node| node.get("javaName"))
            .and_then(JsonValue::as_str)
        {
            if !java_name.is_empty() {
                return java_name.to_string();
            }
        }
        self.field_name(raw_key, property_node)
    }

    /// Field name derived from a node name: illegal characters replaced,
    /// lower-camel-cased, Java keywords escaped.
    pub fn field_name(&self, node_name: &str, _node: Option<&JsonValue>) -> String {
        let cleaned = self.replace_illegal_characters(node_name);
        let name = self.normalize_name(&to_lower_camel(&cleaned));
        escape_keyword(name)
    }

    /// Removes characters that cannot appear in a Java identifier (underscores
    /// included), joining the remaining chunks at camel-case boundaries.
    pub fn replace_illegal_characters(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len());
        let mut boundary = false;
        for ch in name.chars() {
            if ch.is_ascii_alphanumeric() || ch == '$' {
                if boundary && !out.is_empty() {
                    out.push(ch.to_ascii_uppercase());
                } else {
                    out.push(ch);
                }
                boundary = false;
            } else {
                boundary = true;
            }
        }
        out
    }

    /// Forces the name to start with a legal identifier character.
    pub fn normalize_name(&self, name: &str) -> String {
        if starts_with_digit(name) {
            format!("_{name}")
        } else {
            name.to_string()
        }
    }

    /// Capitalized class name for a node, before prefix/suffix application.
    ///
    /// Capitalization happens before keyword escaping: `class` becomes the
    /// legal class name `Class`, not `_class`.
    pub fn capitalized_field_name(&self, node_name: &str, _node: Option<&JsonValue>) -> String {
        let cleaned = self.replace_illegal_characters(node_name);
        capitalize(&self.normalize_name(&to_lower_camel(&cleaned)))
    }

    /// True if `name` is not a legal Java identifier.
    pub fn requires_rename(&self, name: &str) -> bool {
        !identifier_regex().is_match(name)
    }
}

/// Uppercases the first character, leaving the rest untouched.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn escape_keyword(name: String) -> String {
    if name.is_empty() {
        return "__".to_string();
    }
    if JAVA_KEYWORDS.contains(&name.as_str()) {
        format!("_{name}")
    } else {
        name
    }
}

fn starts_with_digit(name: &str) -> bool {
    name.chars().next().map_or(false, |c| c.is_ascii_digit())
}

fn to_lower_camel(cleaned: &str) -> String {
    let mut chars = cleaned.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() => {
            // Leave SCREAMING or PascalCase runs alone past the first char.
            first.to_ascii_lowercase().to_string() + chars.as_str()
        }
        Some(_) => cleaned.to_string(),
        None => String::new(),
    }
}

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid regex"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn property_name_honors_java_name_override() {
        let helper = NameHelper::new();
        let node = json!({"javaName": "renamed"});
        assert_eq!(helper.property_name("original", Some(&node)), "renamed");
    }

    #[test]
    fn illegal_characters_create_camel_boundaries() {
        let helper = NameHelper::new();
        assert_eq!(helper.field_name("first-name", None), "firstName");
        assert_eq!(helper.field_name("shipping address", None), "shippingAddress");
        assert_eq!(helper.field_name("user_profile", None), "userProfile");
        assert_eq!(helper.field_name("a.b.c", None), "aBC");
    }

    #[test]
    fn leading_digit_is_prefixed() {
        let helper = NameHelper::new();
        assert_eq!(helper.field_name("1st", None), "_1st");
    }

    #[test]
    fn keywords_are_escaped() {
        let helper = NameHelper::new();
        assert_eq!(helper.field_name("class", None), "_class");
        assert_eq!(helper.field_name("default", None), "_default");
    }

    #[test]
    fn capitalized_field_name_pascal_cases() {
        let helper = NameHelper::new();
        assert_eq!(helper.capitalized_field_name("user_profile", None), "UserProfile");
        assert_eq!(helper.capitalized_field_name("order", None), "Order");
        assert_eq!(helper.capitalized_field_name("class", None), "Class");
    }

    #[test]
    fn requires_rename_flags_illegal_identifiers() {
        let helper = NameHelper::new();
        assert!(helper.requires_rename("my-type"));
        assert!(!helper.requires_rename("MyType"));
    }
}
