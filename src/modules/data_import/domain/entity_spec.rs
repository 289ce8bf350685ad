//! Entity specifications for bulk import
//!
//! An `EntitySpec` describes one importable entity kind: where it is created
//! on the backend, which listing view must be refreshed afterwards, and which
//! fields a row may carry (required, optional, or defaulted).
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::row::{FieldValue, NormalizedRow};

/// How a raw value is coerced before it is sent to the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    Required,
    Optional,
    /// Substituted when the row omits the field or leaves it blank
    Defaulted(FieldValue),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub key: String,
    /// Human label used in validation messages ("Property ID is required")
    pub label: String,
    pub kind: FieldKind,
    pub presence: Presence,
}

impl FieldSpec {
    pub fn is_required(&self) -> bool {
        matches!(self.presence, Presence::Required)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpec {
    entity: String,
    endpoint_path: String,
    listing_path: String,
    fields: Vec<FieldSpec>,
}

impl EntitySpec {
    /// New spec whose listing view lives at the same path as its endpoint
    pub fn new(entity: &str, endpoint_path: &str) -> Self {
        Self {
            entity: entity.to_string(),
            endpoint_path: endpoint_path.to_string(),
            listing_path: endpoint_path.to_string(),
            fields: Vec::new(),
        }
    }

    pub fn with_listing_path(mut self, listing_path: &str) -> Self {
        self.listing_path = listing_path.to_string();
        self
    }

    pub fn required(self, key: &str, label: &str, kind: FieldKind) -> Self {
        self.field(key, label, kind, Presence::Required)
    }

    pub fn optional(self, key: &str, label: &str, kind: FieldKind) -> Self {
        self.field(key, label, kind, Presence::Optional)
    }

    pub fn defaulted(
        self,
        key: &str,
        label: &str,
        kind: FieldKind,
        default: impl Into<FieldValue>,
    ) -> Self {
        self.field(key, label, kind, Presence::Defaulted(default.into()))
    }

    fn field(mut self, key: &str, label: &str, kind: FieldKind, presence: Presence) -> Self {
        self.fields.push(FieldSpec {
            key: key.to_string(),
            label: label.to_string(),
            kind,
            presence,
        });
        self
    }

    /// `POST /properties` with `{organization_id, name, code?, address_line1?, city?}`
    pub fn properties() -> Self {
        Self::new("property", "/properties")
            .required("name", "Name", FieldKind::Text)
            .optional("code", "Code", FieldKind::Text)
            .optional("address_line1", "Address", FieldKind::Text)
            .optional("city", "City", FieldKind::Text)
    }

    /// `POST /units` with `{organization_id, property_id, code, name, max_guests, bedrooms, bathrooms}`
    pub fn units() -> Self {
        Self::new("unit", "/units")
            .required("property_id", "Property ID", FieldKind::Text)
            .required("code", "Code", FieldKind::Text)
            .required("name", "Name", FieldKind::Text)
            .defaulted("max_guests", "Max guests", FieldKind::Integer, 2)
            .defaulted("bedrooms", "Bedrooms", FieldKind::Integer, 1)
            .defaulted("bathrooms", "Bathrooms", FieldKind::Integer, 1)
    }

    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn endpoint_path(&self) -> &str {
        &self.endpoint_path
    }

    pub fn listing_path(&self) -> &str {
        &self.listing_path
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Required fields in declaration order
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.is_required())
    }

    pub fn defaults(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().filter_map(|f| match &f.presence {
            Presence::Defaulted(value) => Some((f.key.as_str(), value)),
            _ => None,
        })
    }

    /// Build the creation payload. `organization_id` is always injected and
    /// cannot be overridden by row data.
    pub fn build_payload(&self, row: &NormalizedRow, organization_id: &str) -> Value {
        let mut body = Map::new();
        for field in &self.fields {
            if let Some(value) = row.get(&field.key) {
                body.insert(field.key.clone(), value.to_json());
            }
        }
        body.insert(
            "organization_id".to_string(),
            Value::String(organization_id.to_string()),
        );
        Value::Object(body)
    }
}

/// Entity kinds exposed through the batch import command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Properties,
    Units,
}

impl EntityKind {
    pub fn spec(&self) -> EntitySpec {
        match self {
            EntityKind::Properties => EntitySpec::properties(),
            EntityKind::Units => EntitySpec::units(),
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Properties => write!(f, "properties"),
            EntityKind::Units => write!(f, "units"),
        }
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "properties" | "property" => Ok(EntityKind::Properties),
            "units" | "unit" => Ok(EntityKind::Units),
            _ => Err(format!("Invalid entity kind: {}", s)),
        }
    }
}
