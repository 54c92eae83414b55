//! Serialization-marker and parcel support synthesis.

use sha2::{Digest, Sha256};

use crate::model::{ClassDef, FieldDef, Method, Primitive, TypeRef};

/// Marks the class `java.io.Serializable` and pins a digest-derived
/// `serialVersionUID`.
pub fn add_serializable_support(class: &mut ClassDef) {
    class.interfaces.push("java.io.Serializable".to_string());

    let uid = serial_version_uid(class);
    let mut field = FieldDef::new("serialVersionUID", TypeRef::Primitive(Primitive::Long));
    field.is_static = true;
    field.initializer = Some(format!("{uid}L"));
    class.fields.push(field);
}

/// Derives a stable serialVersionUID from the class signature: name plus each
/// field's name and required flag, hashed and truncated to 64 bits.
fn serial_version_uid(class: &ClassDef) -> i64 {
    let mut hasher = Sha256::new();
    hasher.update(class.fqn().as_bytes());
    for field in &class.fields {
        hasher.update(field.name.as_bytes());
        hasher.update([field.required as u8]);
    }
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    i64::from_be_bytes(bytes)
}

/// Synthesizes `android.os.Parcelable` support: writeToParcel,
/// describeContents, the CREATOR instance, and a Parcel constructor.
///
/// When the constructors pass is disabled a no-args constructor is still
/// added, since parcel deserialization frameworks require default
/// construction.
pub fn add_parcel_support(class: &mut ClassDef, include_constructors: bool) {
    class.interfaces.push("android.os.Parcelable".to_string());

    let fields: Vec<String> = class
        .fields
        .iter()
        .filter(|f| !f.is_static)
        .map(|f| f.name.clone())
        .collect();

    class.methods.push(Method::WriteToParcel {
        fields: fields.clone(),
    });
    class.methods.push(Method::DescribeContents);
    class.methods.push(Method::ParcelCreator);
    class.methods.push(Method::ParcelConstructor { fields });

    if !include_constructors {
        class.methods.push(Method::NoArgsConstructor);
    }
}
