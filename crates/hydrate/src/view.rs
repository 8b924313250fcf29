//! View models: records joined with their resolved relations

use cg_core::Record;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A resolved relation
#[derive(Debug, Clone, PartialEq)]
pub enum Relation {
    /// Scalar foreign key
    One(Arc<Record>),
    /// Array of foreign keys, or a join through a `Many` relation
    Many(Vec<Arc<Record>>),
}

impl Relation {
    /// The single related entity, if this is a `One`
    pub fn as_one(&self) -> Option<&Record> {
        match self {
            Relation::One(entity) => Some(&**entity),
            Relation::Many(_) => None,
        }
    }

    pub fn is_many(&self) -> bool {
        matches!(self, Relation::Many(_))
    }

    /// Iterate over every related entity
    pub fn entities(&self) -> impl Iterator<Item = &Record> {
        let entities: &[Arc<Record>] = match self {
            Relation::One(entity) => std::slice::from_ref(entity),
            Relation::Many(entities) => entities,
        };
        entities.iter().map(|entity| &**entity)
    }

    pub fn len(&self) -> usize {
        match self {
            Relation::One(_) => 1,
            Relation::Many(entities) => entities.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_value(&self) -> Value {
        match self {
            Relation::One(entity) => Value::Object(Record::clone(entity)),
            Relation::Many(entities) => Value::Array(
                entities
                    .iter()
                    .map(|entity| Value::Object(Record::clone(entity)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Relation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Relation::One(entity) => entity.serialize(serializer),
            Relation::Many(entities) => entities.serialize(serializer),
        }
    }
}

/// A record plus the relation fields resolved for it
///
/// Derived per page load and never persisted. Serializes as one flat object
/// in which relation fields shadow record fields of the same name.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel {
    record: Record,
    relations: BTreeMap<String, Relation>,
}

impl ViewModel {
    pub fn new(record: Record) -> Self {
        Self {
            record,
            relations: BTreeMap::new(),
        }
    }

    /// The primary record as fetched
    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn relation(&self, field: &str) -> Option<&Relation> {
        self.relations.get(field)
    }

    /// Shorthand for a resolved single-entity relation
    pub fn related(&self, field: &str) -> Option<&Record> {
        self.relation(field).and_then(Relation::as_one)
    }

    pub fn relations(&self) -> impl Iterator<Item = (&str, &Relation)> {
        self.relations.iter().map(|(field, relation)| (field.as_str(), relation))
    }

    pub(crate) fn set_relation(&mut self, field: &str, relation: Relation) {
        self.relations.insert(field.to_string(), relation);
    }

    /// Flatten into a single record with relation fields inlined
    pub fn into_record(self) -> Record {
        let mut joined = self.record;
        for (field, relation) in &self.relations {
            joined.insert(field.clone(), relation.to_value());
        }
        joined
    }
}

impl Serialize for ViewModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let shadowed = self
            .record
            .keys()
            .filter(|key| self.relations.contains_key(key.as_str()))
            .count();
        let mut map = serializer.serialize_map(Some(
            self.record.len() - shadowed + self.relations.len(),
        ))?;
        for (key, value) in &self.record {
            if !self.relations.contains_key(key.as_str()) {
                map.serialize_entry(key, value)?;
            }
        }
        for (field, relation) in &self.relations {
            map.serialize_entry(field, relation)?;
        }
        map.end()
    }
}
