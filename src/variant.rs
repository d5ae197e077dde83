//! Variant descriptors for the two record families.
//!
//! Skill records and competency records follow two different schema
//! conventions (plain `id`/`type` versus `@id`/`@type` with a strict
//! single spelling). The asymmetry is intentional and lives here as
//! data, so the compiler itself stays a single engine.

/// Describes one record family: field naming, type-tag contract,
/// normalization behavior, sort-key whitelist, and default paths.
#[derive(Debug, Clone, Copy)]
pub struct Variant {
    /// Record family name, also the subcommand name.
    pub name: &'static str,
    /// Primary identifier field on each record and on the metadata.
    pub id_field: &'static str,
    /// Accepted spellings of the type-tag field, in lookup order.
    pub type_fields: &'static [&'static str],
    /// Required type-tag value on every record.
    pub record_sentinel: &'static str,
    /// Required type-tag value on the collection metadata.
    pub collection_sentinel: &'static str,
    /// Field under which the record array lands in the compiled output.
    pub records_field: &'static str,
    /// Sort-key whitelist: CLI name paired with the JSON field it projects.
    pub sort_keys: &'static [(&'static str, &'static str)],
    /// Whether membership/author defaults are filled in during compilation.
    pub applies_defaults: bool,
    pub default_meta: &'static str,
    pub default_dir: &'static str,
    pub default_out: &'static str,
    pub default_sort: &'static str,
}

impl Variant {
    /// Resolve a CLI sort-key name to the JSON field it sorts on.
    #[must_use]
    pub fn sort_field(&self, key: &str) -> Option<&'static str> {
        self.sort_keys
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, field)| *field)
    }

    /// Comma-separated whitelist for error messages.
    #[must_use]
    pub fn sort_key_list(&self) -> String {
        self.sort_keys
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Human-readable name of the type-tag field(s) for error messages.
    #[must_use]
    pub fn type_field_label(&self) -> String {
        self.type_fields.join(" or ")
    }
}

pub const SKILLS: Variant = Variant {
    name: "skills",
    id_field: "id",
    type_fields: &["type", "@type"],
    record_sentinel: "RichSkillDescriptor",
    collection_sentinel: "RichSkillCollection",
    records_field: "skills",
    sort_keys: &[("id", "id"), ("skillName", "skillName")],
    applies_defaults: true,
    default_meta: "collection.json",
    default_dir: "skills",
    default_out: "collection-compiled.json",
    default_sort: "skillName",
};

pub const COMPETENCIES: Variant = Variant {
    name: "competencies",
    id_field: "@id",
    type_fields: &["@type"],
    record_sentinel: "ceterms:Competency",
    collection_sentinel: "ceterms:Collection",
    records_field: "competencies",
    sort_keys: &[("id", "@id"), ("name", "name")],
    applies_defaults: false,
    default_meta: "collection-meta.json",
    default_dir: "competencies",
    default_out: "competencies-compiled.json",
    default_sort: "name",
};
