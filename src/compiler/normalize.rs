//! Variant-specific default application.

use serde_json::Value;

use crate::variant::Variant;

/// Collection-derived context applied during normalization.
#[derive(Debug, Clone)]
pub struct NormalizeContext {
    /// The collection's own identity, backlinked into each record.
    pub collection_id: String,
    /// Collection-level author inherited by records that name none.
    pub default_author: Option<Value>,
}

/// Produce a normalized copy of a validated record.
///
/// The source value is never mutated; defaults are only inserted where
/// the corresponding field is absent. Record families that are complete
/// on disk pass through unchanged.
#[must_use]
pub fn normalize_record(variant: &Variant, record: &Value, ctx: &NormalizeContext) -> Value {
    if !variant.applies_defaults {
        return record.clone();
    }

    let Some(object) = record.as_object() else {
        return record.clone();
    };
    let mut object = object.clone();

    if !object.contains_key("isMemberOf") {
        object.insert(
            "isMemberOf".to_string(),
            Value::String(ctx.collection_id.clone()),
        );
    }
    if !object.contains_key("author") {
        if let Some(author) = &ctx.default_author {
            object.insert("author".to_string(), author.clone());
        }
    }

    Value::Object(object)
}
