//! Validated track model handed to the benchmark engine.
//!
//! Everything here is built in one go by [`crate::track::TrackReader`] and is
//! read-only afterwards.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// A complete benchmark definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub name: String,
    pub short_description: String,
    pub description: String,
    /// Base URL for downloading document archives, from `meta.data-url`.
    pub source_root_url: Option<String>,
    pub indices: Vec<Index>,
    pub operations: Vec<Operation>,
    pub challenges: Vec<Challenge>,
}

impl Track {
    pub fn find_index(&self, name: &str) -> Option<&Index> {
        self.indices.iter().find(|i| i.name == name)
    }

    pub fn find_operation(&self, name: &str) -> Option<&Operation> {
        self.operations.iter().find(|o| o.name == name)
    }

    pub fn find_challenge(&self, name: &str) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.name == name)
    }

    /// The challenge flagged `default`, otherwise the first declared one.
    pub fn default_challenge(&self) -> Option<&Challenge> {
        self.challenges
            .iter()
            .find(|c| c.default)
            .or_else(|| self.challenges.first())
    }

    /// Look up `name` if given, else fall back to [`Track::default_challenge`].
    pub fn find_challenge_or_default(&self, name: Option<&str>) -> Option<&Challenge> {
        match name {
            Some(name) => self.find_challenge(name),
            None => self.default_challenge(),
        }
    }

    /// Sum of `document-count` over all types of all indices.
    pub fn number_of_documents(&self) -> u64 {
        self.indices
            .iter()
            .flat_map(|i| &i.types)
            .map(|t| t.number_of_documents)
            .sum()
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Index {
    pub name: String,
    pub types: Vec<Type>,
}

/// One document type of an index together with its data and mapping files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Type {
    pub name: String,
    pub mapping_file: String,
    /// Uncompressed documents; `document_archive` minus its compression suffix.
    pub document_file: String,
    pub document_archive: String,
    pub number_of_documents: u64,
    pub compressed_size_in_bytes: u64,
    pub uncompressed_size_in_bytes: u64,
}

impl Type {
    /// Whether the documents ship compressed and need unpacking first.
    pub fn is_compressed(&self) -> bool {
        self.document_file != self.document_archive
    }
}

/// Kinds of work an [`Operation`] can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationType {
    Index,
    ForceMerge,
    Search,
    Flush,
}

impl OperationType {
    pub const ALL: [OperationType; 4] = [
        OperationType::Index,
        OperationType::ForceMerge,
        OperationType::Search,
        OperationType::Flush,
    ];

    /// Spelling used in track files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::ForceMerge => "force-merge",
            Self::Search => "search",
            Self::Flush => "flush",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, reusable unit of benchmark work.
///
/// `params` holds every key of the operation object besides `name` and `type`,
/// untouched. The accessors below read the well-known ones lazily and fall
/// back to defaults when a key is absent or has an unexpected shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    pub name: String,
    pub operation_type: OperationType,
    pub params: Map<String, Value>,
}

impl Operation {
    /// `clients.count`, default 1.
    pub fn clients(&self) -> u64 {
        self.params
            .get("clients")
            .and_then(|c| c.get("count"))
            .and_then(Value::as_u64)
            .unwrap_or(1)
    }

    pub fn bulk_size(&self) -> Option<u64> {
        self.params.get("bulk-size").and_then(Value::as_u64)
    }

    /// `index-settings`, empty when absent.
    pub fn index_settings(&self) -> Map<String, Value> {
        self.params
            .get("index-settings")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    pub fn force_merge(&self) -> bool {
        self.params
            .get("force-merge")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}

/// A named benchmark scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Challenge {
    pub name: String,
    pub description: Option<String>,
    pub default: bool,
    /// Resolved operations in execution order.
    pub schedule: Vec<Operation>,
}

impl Challenge {
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.schedule.iter().map(|o| o.name.as_str())
    }
}
