//! Meta catalogue: documentation for every registered tag and mechanism.

use serde::Serialize;

use super::{PropertyRegistry, TagHandler};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaKind {
    Tag,
    Mechanism,
    Fallback,
}

/// One documented entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaEntry {
    pub kind: MetaKind,
    /// Object type name, or `Any` for base tags
    pub object: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<&'static str>,
    /// Returned type for tags, input type for mechanisms
    pub value_type: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated_for: Option<&'static str>,
}

impl MetaEntry {
    fn from_tag(handler: &TagHandler) -> Self {
        Self {
            kind: MetaKind::Tag,
            object: handler
                .owner
                .map(|owner| owner.to_string())
                .unwrap_or_else(|| "Any".to_string()),
            name: handler.name.to_string(),
            property: handler.property,
            value_type: handler.doc.returns,
            description: handler.doc.description,
            deprecated_for: handler.doc.deprecated_for,
        }
    }
}

impl PropertyRegistry {
    /// Every tag, fallback and mechanism, grouped by object type in
    /// registration order; base tags last.
    pub fn meta_catalogue(&self) -> Vec<MetaEntry> {
        let mut entries = Vec::new();
        for (owner, table) in &self.types {
            entries.extend(table.core_tags.values().map(MetaEntry::from_tag));
            entries.extend(table.property_tags.values().flatten().map(MetaEntry::from_tag));
            if let Some(fallback) = &table.fallback {
                entries.push(MetaEntry {
                    kind: MetaKind::Fallback,
                    object: owner.to_string(),
                    name: "<key>".to_string(),
                    property: None,
                    value_type: fallback.doc.returns,
                    description: fallback.doc.description,
                    deprecated_for: fallback.doc.deprecated_for,
                });
            }
            for property in self.properties_for(*owner) {
                entries.extend(property.mechanisms.iter().map(|doc| MetaEntry {
                    kind: MetaKind::Mechanism,
                    object: owner.to_string(),
                    name: doc.name.to_string(),
                    property: Some(property.id),
                    value_type: doc.input,
                    description: doc.description,
                    deprecated_for: None,
                }));
            }
        }
        entries.extend(self.base_tags.values().map(MetaEntry::from_tag));
        entries
    }
}
