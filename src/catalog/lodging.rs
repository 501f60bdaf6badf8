//! Lodging records and the ordered catalog that holds them.
//!
//! A record keeps its JSON object exactly as it appeared in the catalog file, field order
//! included, so that it can be embedded verbatim in a system prompt. Only `id` and `nom`
//! are interpreted.

use crate::error::{LogisError, Result};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Top-level field of the catalog document holding the records.
pub const LODGINGS_FIELD: &str = "logements";

/// One rentable unit from the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Lodging {
    id: String,
    name: String,
    fields: Map<String, Value>,
}

impl Lodging {
    /// Build a record from its raw JSON object.
    ///
    /// `id` may be a string or a number; `nom` must be a string.
    pub fn from_fields(fields: Map<String, Value>) -> Result<Self> {
        let id = match fields.get("id") {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            Some(other) => {
                return Err(LogisError::ParseError(format!(
                    "lodging `id` must be a string or a number, got {}",
                    other
                )))
            }
            None => {
                return Err(LogisError::ParseError("lodging record is missing `id`".to_string()))
            }
        };

        let name = fields
            .get("nom")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                LogisError::ParseError(format!("lodging `{}` is missing a string `nom`", id))
            })?
            .to_string();

        Ok(Self { id, name, fields })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label shown in the selection control: `"{id} - {nom}"`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.id, self.name)
    }

    /// The full record as read from the catalog.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Pretty-printed JSON of the whole record, two-space indented, field order kept.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.fields)?)
    }
}

impl Serialize for Lodging {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

#[derive(Deserialize)]
struct CatalogDocument {
    logements: Vec<Value>,
}

/// Ordered, read-only sequence of lodging records with unique identifiers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    lodgings: Vec<Lodging>,
}

impl Catalog {
    /// Create a catalog, rejecting duplicate identifiers.
    pub fn new(lodgings: Vec<Lodging>) -> Result<Self> {
        let mut seen = HashSet::new();
        for lodging in &lodgings {
            if !seen.insert(lodging.id()) {
                return Err(LogisError::ParseError(format!(
                    "duplicate lodging id `{}`",
                    lodging.id()
                )));
            }
        }
        Ok(Self { lodgings })
    }

    /// Parse a catalog document (`{"logements": [...]}`).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(json)
            .map_err(|e| LogisError::ParseError(format!("invalid catalog document: {}", e)))?;

        let lodgings = document
            .logements
            .into_iter()
            .enumerate()
            .map(|(index, value)| match value {
                Value::Object(fields) => Lodging::from_fields(fields),
                _ => Err(LogisError::ParseError(format!(
                    "`{}[{}]` is not an object",
                    LODGINGS_FIELD, index
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(lodgings)
    }

    pub fn len(&self) -> usize {
        self.lodgings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lodgings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lodging> {
        self.lodgings.iter()
    }

    pub fn first(&self) -> Option<&Lodging> {
        self.lodgings.first()
    }

    /// Selection labels, one per record, in catalog order.
    pub fn labels(&self) -> Vec<String> {
        self.lodgings.iter().map(Lodging::label).collect()
    }

    /// Exact match of a selection label back to its record.
    pub fn find_by_label(&self, label: &str) -> Option<&Lodging> {
        self.lodgings.iter().find(|l| l.label() == label)
    }
}
