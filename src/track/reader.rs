//! Track reader: raw specification tree to validated [`Track`].
//!
//! Input shape (field names are fixed by existing track files):
//! {
//!   "meta": {
//!     "short-description": "...",     // mandatory
//!     "description": "...",           // mandatory
//!     "data-url": "https://..."       // optional
//!   },
//!   "indices": [
//!     {
//!       "name": "geonames",
//!       "types": [
//!         {
//!           "name": "type",
//!           "documents": "documents.json.bz2",
//!           "mapping": "mappings.json",
//!           "document-count": 8647880,      // optional, default 0
//!           "compressed-bytes": 197857614,  // optional, default 0
//!           "uncompressed-bytes": 2790927196 // optional, default 0
//!         }
//!       ]
//!     }
//!   ],
//!   "operations": [
//!     { "name": "index-append", "type": "index", "bulk-size": 5000, ... }
//!   ],
//!   "challenges": [
//!     { "name": "append-only", "description": "...", "default": true,
//!       "schedule": ["index-append"] }
//!   ]
//! }
//!
//! Validation stops at the first problem. Elements are visited in document
//! order: meta, indices, operations, challenges, and only then are schedule
//! references checked against the declared operations.

use crate::error::TrackSyntaxError;
use crate::track::model::{Challenge, Index, Operation, OperationType, Track, Type};
use crate::track::paths;

use log::debug;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

type ReadResult<T> = std::result::Result<T, TrackSyntaxError>;

/// Builds [`Track`]s from parsed specifications. Holds no state, so one
/// reader can serve any number of calls, from any thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackReader;

impl TrackReader {
    pub fn new() -> Self {
        Self
    }

    /// Validate `spec` and build the track named `track_name`.
    ///
    /// Mapping files are resolved against `mappings_root`, document files
    /// against `data_root`.
    pub fn read(
        &self,
        track_name: &str,
        spec: &Value,
        mappings_root: &str,
        data_root: &str,
    ) -> ReadResult<Track> {
        debug!("Reading track specification [{}]", track_name);

        let cx = Cx {
            track: track_name,
            mappings_root,
            data_root,
        };
        let track = cx.build_track(spec)?;

        debug!(
            "Track [{}] has {} indices, {} operations and {} challenges",
            track.name,
            track.indices.len(),
            track.operations.len(),
            track.challenges.len()
        );
        Ok(track)
    }
}

/// Challenge whose schedule still holds operation names.
struct PendingChallenge {
    name: String,
    description: Option<String>,
    default: bool,
    schedule: Vec<String>,
}

struct Cx<'a> {
    track: &'a str,
    mappings_root: &'a str,
    data_root: &'a str,
}

impl Cx<'_> {
    fn build_track(&self, spec: &Value) -> ReadResult<Track> {
        let root = self.object(spec, "<root>")?;

        // A missing meta block surfaces as its first missing field.
        let empty = Map::new();
        let meta = match root.get("meta") {
            None | Some(Value::Null) => &empty,
            Some(meta) => self.object(meta, "meta")?,
        };
        let short_description = self.mandatory_str(meta, "meta", "short-description")?;
        let description = self.mandatory_str(meta, "meta", "description")?;
        let source_root_url = self.optional_str(meta, "meta", "data-url")?;

        let mut indices = Vec::new();
        let mut index_names = HashSet::new();
        for (i, raw) in self.optional_list(root, "", "indices")?.iter().enumerate() {
            let index = self.index(raw, &format!("indices.{i}"))?;
            self.unique(&mut index_names, "index", &index.name)?;
            indices.push(index);
        }

        let mut operations = Vec::new();
        let mut operation_names = HashSet::new();
        for (i, raw) in self.optional_list(root, "", "operations")?.iter().enumerate() {
            let operation = self.operation(raw, &format!("operations.{i}"))?;
            self.unique(&mut operation_names, "operation", &operation.name)?;
            operations.push(operation);
        }

        let mut pending = Vec::new();
        let mut challenge_names = HashSet::new();
        let mut default_challenge: Option<String> = None;
        for (i, raw) in self.optional_list(root, "", "challenges")?.iter().enumerate() {
            let challenge = self.challenge(raw, &format!("challenges.{i}"))?;
            self.unique(&mut challenge_names, "challenge", &challenge.name)?;
            if challenge.default {
                if let Some(first) = &default_challenge {
                    return Err(TrackSyntaxError::MultipleDefaultChallenges {
                        track: self.track.to_string(),
                        first: first.clone(),
                        second: challenge.name.clone(),
                    });
                }
                default_challenge = Some(challenge.name.clone());
            }
            pending.push(challenge);
        }

        let challenges = self.resolve_schedules(pending, &operations)?;

        Ok(Track {
            name: self.track.to_string(),
            short_description,
            description,
            source_root_url,
            indices,
            operations,
            challenges,
        })
    }

    fn index(&self, raw: &Value, path: &str) -> ReadResult<Index> {
        let obj = self.object(raw, path)?;
        let name = self.mandatory_str(obj, path, "name")?;

        let mut types = Vec::new();
        for (i, raw_type) in self.optional_list(obj, path, "types")?.iter().enumerate() {
            types.push(self.doc_type(raw_type, &format!("{path}.types.{i}"))?);
        }

        Ok(Index { name, types })
    }

    fn doc_type(&self, raw: &Value, path: &str) -> ReadResult<Type> {
        let obj = self.object(raw, path)?;
        let name = self.mandatory_str(obj, path, "name")?;
        let documents = self.mandatory_str(obj, path, "documents")?;
        let mapping = self.mandatory_str(obj, path, "mapping")?;

        Ok(Type {
            name,
            mapping_file: paths::join(self.mappings_root, &mapping),
            document_file: paths::join(
                self.data_root,
                paths::strip_compression_suffix(&documents),
            ),
            document_archive: paths::join(self.data_root, &documents),
            number_of_documents: self.optional_u64(obj, path, "document-count")?,
            compressed_size_in_bytes: self.optional_u64(obj, path, "compressed-bytes")?,
            uncompressed_size_in_bytes: self.optional_u64(obj, path, "uncompressed-bytes")?,
        })
    }

    fn operation(&self, raw: &Value, path: &str) -> ReadResult<Operation> {
        let obj = self.object(raw, path)?;
        let name = self.mandatory_str(obj, path, "name")?;
        let kind = self.mandatory_str(obj, path, "type")?;
        let operation_type = OperationType::from_name(&kind).ok_or_else(|| {
            TrackSyntaxError::UnknownOperationType {
                track: self.track.to_string(),
                operation: name.clone(),
                kind,
            }
        })?;

        let params = obj
            .iter()
            .filter(|(k, _)| k.as_str() != "name" && k.as_str() != "type")
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Ok(Operation {
            name,
            operation_type,
            params,
        })
    }

    fn challenge(&self, raw: &Value, path: &str) -> ReadResult<PendingChallenge> {
        let obj = self.object(raw, path)?;
        let name = self.mandatory_str(obj, path, "name")?;
        let description = self.optional_str(obj, path, "description")?;
        let default = self.optional_bool(obj, path, "default")?;

        let schedule_path = format!("{path}.schedule");
        let entries = match obj.get("schedule") {
            None | Some(Value::Null) => return Err(self.missing(&schedule_path)),
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(self.invalid(&schedule_path, "a list")),
        };
        let mut schedule = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            match entry.as_str() {
                Some(op) => schedule.push(op.to_string()),
                None => return Err(self.invalid(&format!("{schedule_path}.{i}"), "a string")),
            }
        }

        Ok(PendingChallenge {
            name,
            description,
            default,
            schedule,
        })
    }

    /// Swap schedule names for the operations they reference.
    fn resolve_schedules(
        &self,
        pending: Vec<PendingChallenge>,
        operations: &[Operation],
    ) -> ReadResult<Vec<Challenge>> {
        let by_name: HashMap<&str, &Operation> =
            operations.iter().map(|o| (o.name.as_str(), o)).collect();

        pending
            .into_iter()
            .map(|c| -> ReadResult<Challenge> {
                let schedule = c
                    .schedule
                    .iter()
                    .map(|op| {
                        by_name.get(op.as_str()).map(|o| (*o).clone()).ok_or_else(|| {
                            TrackSyntaxError::UnknownOperation {
                                track: self.track.to_string(),
                                challenge: c.name.clone(),
                                operation: op.clone(),
                            }
                        })
                    })
                    .collect::<ReadResult<Vec<_>>>()?;
                Ok(Challenge {
                    name: c.name,
                    description: c.description,
                    default: c.default,
                    schedule,
                })
            })
            .collect()
    }

    fn unique(&self, seen: &mut HashSet<String>, kind: &'static str, name: &str) -> ReadResult<()> {
        if seen.insert(name.to_string()) {
            Ok(())
        } else {
            Err(TrackSyntaxError::DuplicateName {
                track: self.track.to_string(),
                kind,
                name: name.to_string(),
            })
        }
    }

    fn missing(&self, path: &str) -> TrackSyntaxError {
        TrackSyntaxError::MissingElement {
            track: self.track.to_string(),
            path: path.to_string(),
        }
    }

    fn invalid(&self, path: &str, expected: &'static str) -> TrackSyntaxError {
        TrackSyntaxError::InvalidElement {
            track: self.track.to_string(),
            path: path.to_string(),
            expected,
        }
    }

    fn object<'v>(&self, value: &'v Value, path: &str) -> ReadResult<&'v Map<String, Value>> {
        value.as_object().ok_or_else(|| self.invalid(path, "an object"))
    }

    /// Present, non-null value at `key`, or `None`.
    fn field<'v>(obj: &'v Map<String, Value>, key: &str) -> Option<&'v Value> {
        obj.get(key).filter(|v| !v.is_null())
    }

    fn mandatory_str(&self, obj: &Map<String, Value>, prefix: &str, key: &str) -> ReadResult<String> {
        let path = dotted(prefix, key);
        match Self::field(obj, key) {
            None => Err(self.missing(&path)),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(self.invalid(&path, "a string")),
        }
    }

    fn optional_str(
        &self,
        obj: &Map<String, Value>,
        prefix: &str,
        key: &str,
    ) -> ReadResult<Option<String>> {
        match Self::field(obj, key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.invalid(&dotted(prefix, key), "a string")),
        }
    }

    fn optional_u64(&self, obj: &Map<String, Value>, prefix: &str, key: &str) -> ReadResult<u64> {
        match Self::field(obj, key) {
            None => Ok(0),
            Some(v) => v
                .as_u64()
                .ok_or_else(|| self.invalid(&dotted(prefix, key), "a non-negative integer")),
        }
    }

    fn optional_bool(&self, obj: &Map<String, Value>, prefix: &str, key: &str) -> ReadResult<bool> {
        match Self::field(obj, key) {
            None => Ok(false),
            Some(v) => v
                .as_bool()
                .ok_or_else(|| self.invalid(&dotted(prefix, key), "a boolean")),
        }
    }

    fn optional_list<'v>(
        &self,
        obj: &'v Map<String, Value>,
        prefix: &str,
        key: &str,
    ) -> ReadResult<&'v [Value]> {
        match Self::field(obj, key) {
            None => Ok(&[][..]),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(self.invalid(&dotted(prefix, key), "a list")),
        }
    }
}

fn dotted(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
