//! Graph mutation operations
//!
//! The protocol mutates a space through *edits*: ordered batches of
//! operations submitted as one unit. Two operation kinds exist.
//! [`Triple`] sets an attribute value on an entity, [`Relation`] creates a
//! typed directed edge between two entities. Operations are built in
//! memory, never updated or deleted; later writes supersede earlier ones
//! in consumers.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::ids;

/// Kind tag of a primitive value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueKind {
    /// Plain text
    Text,
    /// Decimal number, stored as text
    Number,
    /// Boolean flag
    Checkbox,
    /// Web URL
    Url,
    /// Timestamp, RFC 3339 with milliseconds
    Time,
    /// Geographic point, "lat,lon" pair
    Point,
}

/// A tagged primitive value as stored on a triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    #[serde(rename = "type")]
    pub kind: ValueKind,
    pub value: String,
}

impl Value {
    /// Plain text value
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            kind: ValueKind::Text,
            value: value.into(),
        }
    }

    /// Numeric value, rendered as text
    pub fn number(value: f64) -> Self {
        Self {
            kind: ValueKind::Number,
            value: value.to_string(),
        }
    }

    /// Boolean value, rendered `"true"` / `"false"`
    pub fn checkbox(value: bool) -> Self {
        Self {
            kind: ValueKind::Checkbox,
            value: value.to_string(),
        }
    }

    /// Web URL value
    pub fn url(value: impl Into<String>) -> Self {
        Self {
            kind: ValueKind::Url,
            value: value.into(),
        }
    }

    /// Timestamp value, rendered RFC 3339 with milliseconds in UTC
    /// (`2025-03-08T00:00:00.000Z`)
    pub fn time(value: DateTime<Utc>) -> Self {
        Self {
            kind: ValueKind::Time,
            value: value.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Geographic point value, "lat,lon"
    pub fn point(lat: f64, lon: f64) -> Self {
        Self {
            kind: ValueKind::Point,
            value: format!("{},{}", lat, lon),
        }
    }
}

/// An attribute-value assignment on an entity.
///
/// At most one *current* value per `(entity, attribute)` pair is meaningful
/// to readers; the storage layer does not enforce this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triple {
    pub entity: String,
    pub attribute: String,
    pub value: Value,
}

/// A typed directed edge between two entities.
///
/// The edge is an entity in its own right: `id` is generated when the
/// relation is built. The `(from_entity, relation_type, to_entity)` tuple
/// should be unique within a space, but only the optional existence check
/// enforces that; the storage layer accepts duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub id: String,
    #[serde(rename = "type")]
    pub relation_type: String,
    pub from_entity: String,
    pub to_entity: String,
    /// Ordering index among sibling edges; empty when unordered
    #[serde(default)]
    pub index: String,
}

/// The `(from, type, to)` key of a relation before its op is materialized.
///
/// This is what the existence checker matches against the graph index;
/// the relation's own id only comes into being when the op is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationSpec {
    pub from_id: String,
    pub relation_type_id: String,
    pub to_id: String,
    pub index: Option<String>,
}

impl RelationSpec {
    pub fn new(
        from_id: impl Into<String>,
        relation_type_id: impl Into<String>,
        to_id: impl Into<String>,
    ) -> Self {
        Self {
            from_id: from_id.into(),
            relation_type_id: relation_type_id.into(),
            to_id: to_id.into(),
            index: None,
        }
    }

    /// Same edge with an ordering index among its siblings
    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    /// True when any of the three ids is empty
    pub fn has_empty_component(&self) -> bool {
        self.from_id.is_empty() || self.relation_type_id.is_empty() || self.to_id.is_empty()
    }
}

/// A single graph mutation operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Op {
    #[serde(rename = "SET_TRIPLE")]
    SetTriple { triple: Triple },
    #[serde(rename = "CREATE_RELATION")]
    CreateRelation { relation: Relation },
}

impl Op {
    /// Build a SET_TRIPLE op
    pub fn set_triple(
        entity: impl Into<String>,
        attribute: impl Into<String>,
        value: Value,
    ) -> Self {
        Op::SetTriple {
            triple: Triple {
                entity: entity.into(),
                attribute: attribute.into(),
                value,
            },
        }
    }

    /// Build a CREATE_RELATION op, minting the edge's own entity id
    pub fn create_relation(spec: &RelationSpec) -> Self {
        Op::CreateRelation {
            relation: Relation {
                id: ids::generate(),
                relation_type: spec.relation_type_id.clone(),
                from_entity: spec.from_id.clone(),
                to_entity: spec.to_id.clone(),
                index: spec.index.clone().unwrap_or_default(),
            },
        }
    }

    /// True for relation ops (the only kind the existence checker filters)
    pub fn is_relation(&self) -> bool {
        matches!(self, Op::CreateRelation { .. })
    }
}

/// A named, authored batch of operations submitted as one unit.
///
/// Immutable once built. Partial application is neither supported nor
/// guarded against downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub name: String,
    pub author: String,
    pub ops: Vec<Op>,
}

impl Edit {
    pub fn new(name: impl Into<String>, author: impl Into<String>, ops: Vec<Op>) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            ops,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_triple_wire_shape() {
        let op = Op::set_triple("ent-1", "attr-1", Value::text("hello"));
        let json = serde_json::to_value(&op).unwrap();

        assert_eq!(json["type"], "SET_TRIPLE");
        assert_eq!(json["triple"]["entity"], "ent-1");
        assert_eq!(json["triple"]["attribute"], "attr-1");
        assert_eq!(json["triple"]["value"]["type"], "TEXT");
        assert_eq!(json["triple"]["value"]["value"], "hello");
    }

    #[test]
    fn test_relation_wire_shape() {
        let spec = RelationSpec::new("from-1", "rel-1", "to-1").with_index("1");
        let op = Op::create_relation(&spec);
        let json = serde_json::to_value(&op).unwrap();

        assert_eq!(json["type"], "CREATE_RELATION");
        assert_eq!(json["relation"]["type"], "rel-1");
        assert_eq!(json["relation"]["fromEntity"], "from-1");
        assert_eq!(json["relation"]["toEntity"], "to-1");
        assert_eq!(json["relation"]["index"], "1");
        // the edge minted its own id
        let id = json["relation"]["id"].as_str().unwrap();
        assert!(crate::ids::is_well_formed(id));
    }

    #[test]
    fn test_relation_index_defaults_to_empty() {
        let op = Op::create_relation(&RelationSpec::new("a", "b", "c"));
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["relation"]["index"], "");
    }

    #[test]
    fn test_relation_ops_mint_distinct_ids() {
        let spec = RelationSpec::new("a", "b", "c");
        let first = Op::create_relation(&spec);
        let second = Op::create_relation(&spec);
        assert_ne!(first, second);
    }

    #[test]
    fn test_value_constructors() {
        assert_eq!(Value::checkbox(true).value, "true");
        assert_eq!(Value::number(42.0).value, "42");
        assert_eq!(Value::point(48.85, 2.35).value, "48.85,2.35");

        let ts = Utc.with_ymd_and_hms(2025, 3, 8, 0, 0, 0).unwrap();
        let value = Value::time(ts);
        assert_eq!(value.kind, ValueKind::Time);
        assert_eq!(value.value, "2025-03-08T00:00:00.000Z");
    }

    #[test]
    fn test_value_kind_tags() {
        let json = serde_json::to_value(Value::url("https://example.com")).unwrap();
        assert_eq!(json["type"], "URL");
        let json = serde_json::to_value(Value::point(1.0, 2.0)).unwrap();
        assert_eq!(json["type"], "POINT");
    }

    #[test]
    fn test_edit_serialization() {
        let ops = vec![Op::set_triple("e", "a", Value::text("v"))];
        let edit = Edit::new("Test edit", "0xabc", ops);
        let json = serde_json::to_value(&edit).unwrap();

        assert_eq!(json["name"], "Test edit");
        assert_eq!(json["author"], "0xabc");
        assert_eq!(json["ops"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_op_roundtrip() {
        let op = Op::create_relation(&RelationSpec::new("x", "y", "z"));
        let json = serde_json::to_string(&op).unwrap();
        let back: Op = serde_json::from_str(&json).unwrap();
        assert_eq!(op, back);
    }

    #[test]
    fn test_relation_spec_empty_components() {
        assert!(RelationSpec::new("", "b", "c").has_empty_component());
        assert!(RelationSpec::new("a", "", "c").has_empty_component());
        assert!(RelationSpec::new("a", "b", "").has_empty_component());
        assert!(!RelationSpec::new("a", "b", "c").has_empty_component());
    }
}
