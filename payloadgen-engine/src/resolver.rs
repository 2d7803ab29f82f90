//! Entity resolution: which registered type does a payload target?

use payloadgen_model::TypeDescriptor;
use payloadgen_types::{Payload, Value};
use tracing::{debug, warn};

use crate::{EngineConfig, EngineError, EngineResult, EntityRegistry, RegistryEntry};

/// Outcome of resolving a payload.
#[derive(Debug)]
pub struct Resolved<'r> {
    pub entry: &'r RegistryEntry,
    /// The record data: the payload's data key if non-null, otherwise the
    /// payload itself minus the entity and data keys.
    pub data: Value,
}

/// How well a set of payload keys fits one descriptor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    /// Payload keys naming a field of the descriptor, ignoring case.
    pub match_count: usize,
    /// `match_count` over the descriptor's field count.
    pub score: f64,
}

impl MatchScore {
    pub fn compute<'a>(descriptor: &TypeDescriptor, keys: impl IntoIterator<Item = &'a str>) -> Self {
        let fields = descriptor.field_names_lowercase();
        let match_count = keys
            .into_iter()
            .filter(|k| fields.contains(&k.to_lowercase()))
            .count();
        let score = if descriptor.fields.is_empty() {
            0.0
        } else {
            match_count as f64 / descriptor.fields.len() as f64
        };
        Self { match_count, score }
    }

    /// At least two matching keys, or more than half the fields covered.
    pub fn is_eligible(&self) -> bool {
        self.match_count >= 2 || self.score > 0.5
    }
}

pub struct EntityResolver<'r> {
    registry: &'r EntityRegistry,
    config: &'r EngineConfig,
}

impl<'r> EntityResolver<'r> {
    pub const fn new(registry: &'r EntityRegistry, config: &'r EngineConfig) -> Self {
        Self { registry, config }
    }

    /// Resolves the target entity of `payload` and extracts its data.
    ///
    /// An explicit entity name is looked up directly and never guessed
    /// around. Without one, the data's keys are scored against every
    /// registered type; for a list of records the first element is scored.
    pub fn resolve(&self, payload: &Payload) -> EngineResult<Resolved<'r>> {
        let data = self.extract_data(payload);
        let entry = match payload.get(&self.config.entity_key) {
            None | Some(Value::Null) => self.guess(&data)?,
            Some(Value::String(name)) => self.registry.lookup_by_name(name)?,
            Some(other) => {
                return Err(EngineError::InvalidPayload(format!(
                    "'{}' must be a string, found {}",
                    self.config.entity_key,
                    other.kind_name()
                )));
            }
        };
        debug!("Resolved payload to entity {}", entry.name());
        Ok(Resolved { entry, data })
    }

    /// Picks the best-scoring registered type for a set of keys.
    ///
    /// Only eligible candidates count, and a later candidate must score
    /// strictly higher to win, so ties go to the earliest registration.
    pub fn best_match<'a>(&self, keys: impl IntoIterator<Item = &'a str> + Clone) -> Option<&'r RegistryEntry> {
        let mut best: Option<(&'r RegistryEntry, f64)> = None;
        for entry in self.registry.entries() {
            let m = MatchScore::compute(entry.descriptor(), keys.clone());
            if m.is_eligible() && best.is_none_or(|(_, s)| m.score > s) {
                best = Some((entry, m.score));
            }
        }
        best.map(|(entry, _)| entry)
    }

    fn extract_data(&self, payload: &Payload) -> Value {
        match payload.get(&self.config.data_key) {
            Some(data) if !data.is_null() => data.clone(),
            _ => {
                let mut rest = payload.clone();
                rest.remove(&self.config.entity_key);
                rest.remove(&self.config.data_key);
                Value::Object(rest)
            }
        }
    }

    fn guess(&self, data: &Value) -> EngineResult<&'r RegistryEntry> {
        let sample = match data {
            Value::Object(map) => map,
            Value::List(items) => match items.first() {
                Some(Value::Object(map)) => map,
                _ => {
                    return Err(EngineError::InvalidPayload(
                        "cannot guess the entity of an empty list or a list of non-objects"
                            .to_string(),
                    ));
                }
            },
            other => {
                return Err(EngineError::InvalidPayload(format!(
                    "cannot guess the entity of a {}",
                    other.kind_name()
                )));
            }
        };

        let keys = sample.keys().map(String::as_str);
        self.best_match(keys).ok_or_else(|| {
            let keys: Vec<String> = sample.keys().cloned().collect();
            warn!("No registered entity matches payload fields {:?}", keys);
            EngineError::AmbiguousOrUnknownEntity(keys)
        })
    }
}
