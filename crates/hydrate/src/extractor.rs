//! Relation extractors and their execution plan

use crate::error::HydrateError;
use crate::fetch::EntityFetcher;
use ahash::AHashMap;
use cg_core::EntityKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Declarative part of a relation: where the id comes from and where the
/// resolved entity goes
///
/// Loaded from configuration; pair it with a fetcher via
/// [`RelationExtractor::from_spec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationSpec {
    /// View-model field that receives the resolved entity
    pub field: String,
    /// Entity kind, which selects the cache
    pub kind: EntityKind,
    /// Field holding the foreign key
    pub foreign_key: String,
    /// Read `foreign_key` from the entity resolved for this earlier field
    /// instead of from the primary record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub through: Option<String>,
}

impl RelationSpec {
    pub fn new(
        field: impl Into<String>,
        kind: impl Into<EntityKind>,
        foreign_key: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            kind: kind.into(),
            foreign_key: foreign_key.into(),
            through: None,
        }
    }

    pub fn through(mut self, source_field: impl Into<String>) -> Self {
        self.through = Some(source_field.into());
        self
    }
}

/// A relation spec bound to the fetcher used for cache misses
#[derive(Clone)]
pub struct RelationExtractor {
    spec: RelationSpec,
    fetcher: Arc<dyn EntityFetcher>,
}

impl RelationExtractor {
    pub fn new(
        field: impl Into<String>,
        kind: impl Into<EntityKind>,
        foreign_key: impl Into<String>,
        fetcher: Arc<dyn EntityFetcher>,
    ) -> Self {
        Self::from_spec(RelationSpec::new(field, kind, foreign_key), fetcher)
    }

    pub fn from_spec(spec: RelationSpec, fetcher: Arc<dyn EntityFetcher>) -> Self {
        Self { spec, fetcher }
    }

    /// Resolve this relation through an earlier one (transitive join)
    pub fn through(mut self, source_field: impl Into<String>) -> Self {
        self.spec.through = Some(source_field.into());
        self
    }

    pub fn spec(&self) -> &RelationSpec {
        &self.spec
    }

    pub fn field(&self) -> &str {
        &self.spec.field
    }

    pub fn kind(&self) -> &EntityKind {
        &self.spec.kind
    }

    pub fn fetcher(&self) -> &Arc<dyn EntityFetcher> {
        &self.fetcher
    }
}

impl fmt::Debug for RelationExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelationExtractor")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Validated relations grouped into sequential stages
///
/// Relations reading from the primary record form stage 0. A relation
/// reading through another one runs one stage after its source. All fetches
/// in a stage settle before the next stage starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationPlan {
    stages: Vec<Vec<usize>>,
}

impl RelationPlan {
    /// Validate specs in declaration order and assign stages
    ///
    /// Stage entries are indexes into the given sequence.
    pub fn build<'a, I>(specs: I) -> Result<Self, HydrateError>
    where
        I: IntoIterator<Item = &'a RelationSpec>,
    {
        let mut stage_of: AHashMap<&'a str, usize> = AHashMap::new();
        let mut stages: Vec<Vec<usize>> = Vec::new();

        for (index, spec) in specs.into_iter().enumerate() {
            for (attribute, value) in [
                ("field", spec.field.as_str()),
                ("kind", spec.kind.as_str()),
                ("foreign_key", spec.foreign_key.as_str()),
            ] {
                if value.is_empty() {
                    return Err(HydrateError::EmptyAttribute { index, attribute });
                }
            }
            if spec.through.as_deref() == Some("") {
                return Err(HydrateError::EmptyAttribute {
                    index,
                    attribute: "through",
                });
            }

            if stage_of.contains_key(spec.field.as_str()) {
                return Err(HydrateError::DuplicateField {
                    field: spec.field.clone(),
                });
            }

            let stage = match spec.through.as_deref() {
                None => 0,
                Some(source) => match stage_of.get(source) {
                    Some(&source_stage) => source_stage + 1,
                    None => {
                        return Err(HydrateError::UnknownSource {
                            field: spec.field.clone(),
                            through: source.to_string(),
                        })
                    }
                },
            };

            stage_of.insert(spec.field.as_str(), stage);
            if stages.len() <= stage {
                stages.resize_with(stage + 1, Vec::new);
            }
            stages[stage].push(index);
        }

        Ok(Self { stages })
    }

    pub fn stages(&self) -> &[Vec<usize>] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
