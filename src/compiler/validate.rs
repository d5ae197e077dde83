//! Per-record contract validation.

use std::path::Path;

use serde_json::Value;

use crate::error::{Result, SkcError};
use crate::variant::Variant;

/// Confirm one parsed record satisfies its variant's contract.
///
/// The record must be a JSON object carrying the variant's primary
/// identifier and a type tag equal to the variant sentinel. For record
/// families that declare membership, a present `isMemberOf` must equal
/// the collection identity exactly; a mismatch usually means the record
/// was copy-pasted from a different collection.
pub fn validate_record(
    variant: &Variant,
    path: &Path,
    record: &Value,
    collection_id: &str,
) -> Result<()> {
    let Some(object) = record.as_object() else {
        return Err(SkcError::MalformedRecord {
            path: path.to_path_buf(),
            reason: format!("expected a JSON object, found {}", shape_of(record)),
        });
    };

    let mut missing = Vec::new();
    if !object.contains_key(variant.id_field) {
        missing.push(variant.id_field.to_string());
    }
    let tag = variant
        .type_fields
        .iter()
        .find_map(|field| object.get(*field).map(|value| (*field, value)));
    if tag.is_none() {
        missing.push(variant.type_field_label());
    }
    if !missing.is_empty() {
        return Err(SkcError::MissingField {
            path: path.to_path_buf(),
            fields: missing.join(", "),
        });
    }

    string_field(path, variant.id_field, &object[variant.id_field])?;

    if let Some((field, value)) = tag {
        let actual = string_field(path, field, value)?;
        if actual != variant.record_sentinel {
            return Err(SkcError::TypeMismatch {
                path: path.to_path_buf(),
                field: field.to_string(),
                actual: actual.to_string(),
                expected: variant.record_sentinel.to_string(),
            });
        }
    }

    if variant.applies_defaults {
        if let Some(member) = object.get("isMemberOf") {
            let actual = member.as_str().ok_or_else(|| SkcError::MalformedRecord {
                path: path.to_path_buf(),
                reason: format!("isMemberOf must be a string, found {}", shape_of(member)),
            })?;
            if actual != collection_id {
                return Err(SkcError::MembershipMismatch {
                    path: path.to_path_buf(),
                    actual: actual.to_string(),
                    expected: collection_id.to_string(),
                });
            }
        }
    }

    Ok(())
}

fn string_field<'a>(path: &Path, field: &str, value: &'a Value) -> Result<&'a str> {
    value.as_str().ok_or_else(|| SkcError::MalformedRecord {
        path: path.to_path_buf(),
        reason: format!("{field} must be a string, found {}", shape_of(value)),
    })
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
