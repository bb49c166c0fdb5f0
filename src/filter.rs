//! Loading a JSON document and pruning its definitions object.
//!
//! Loading and filtering are separate steps: [`load_document`] owns every
//! filesystem and parse failure, while [`filter_document`] is a pure
//! transformation over an owned [`Value`]. [`filter_definitions`] chains the
//! two for callers that start from a path.

use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::FilterError;

/// Property filtered when no other key is configured.
pub const DEFAULT_DEFINITIONS_KEY: &str = "definitions";

/// Names of the definitions to keep.
///
/// Duplicates collapse and names that match nothing are tolerated; membership
/// is exact string equality with no trimming or case folding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    names: Vec<String>,
    lookup: BTreeSet<String>,
}

impl AllowList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = AllowList::default();
        list.extend(names);
        list
    }

    pub fn push(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.lookup.insert(name.clone()) {
            self.names.push(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains(name)
    }

    /// Distinct names in first-seen order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> Extend<S> for AllowList {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for name in iter {
            self.push(name);
        }
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        AllowList::new(iter)
    }
}

/// Knobs for [`filter_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    /// Top-level property whose entries are filtered.
    pub definitions_key: String,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            definitions_key: DEFAULT_DEFINITIONS_KEY.to_string(),
        }
    }
}

/// What a filtering pass kept and discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub retained: usize,
    pub dropped: usize,
    /// Allow-list names with no matching definition, in allow-list order.
    pub unmatched: Vec<String>,
}

/// Compute the outcome of filtering `definitions` without touching it.
pub fn summarize(definitions: &Map<String, Value>, allow: &AllowList) -> FilterSummary {
    let retained = definitions
        .keys()
        .filter(|name| allow.contains(name))
        .count();
    let unmatched = allow
        .names()
        .iter()
        .filter(|name| !definitions.contains_key(name.as_str()))
        .cloned()
        .collect();
    FilterSummary {
        retained,
        dropped: definitions.len() - retained,
        unmatched,
    }
}

/// Read and parse the JSON document at `path`.
///
/// Existence is checked before the file is opened so a missing input is
/// always reported as [`FilterError::NotFound`], never as a parse failure.
pub fn load_document(path: &Path) -> Result<Value, FilterError> {
    if !path.is_file() {
        return Err(FilterError::NotFound {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), "loading JSON document");
    let bytes = fs::read(path).map_err(|source| FilterError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| FilterError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Restrict the definitions object of `document` to the names in `allow`.
///
/// Every other top-level entry passes through untouched. A document that is
/// not an object, or has no definitions entry, yields
/// [`FilterError::MissingKey`]; a definitions entry that is not an object
/// yields [`FilterError::TypeMismatch`].
pub fn filter_document(
    mut document: Value,
    allow: &AllowList,
    options: &FilterOptions,
) -> Result<Value, FilterError> {
    let key = options.definitions_key.as_str();
    let missing = || FilterError::MissingKey {
        key: key.to_string(),
    };

    let entry = document
        .as_object_mut()
        .ok_or_else(missing)?
        .get_mut(key)
        .ok_or_else(missing)?;
    let definitions = match entry {
        Value::Object(map) => map,
        other => {
            return Err(FilterError::TypeMismatch {
                key: key.to_string(),
                found: json_type_name(other),
            });
        }
    };

    let summary = summarize(definitions, allow);
    definitions.retain(|name, _| allow.contains(name));

    debug!(
        key,
        retained = summary.retained,
        dropped = summary.dropped,
        "filtered definitions"
    );
    if !summary.unmatched.is_empty() {
        info!(
            key,
            unmatched = ?summary.unmatched,
            "allow-list names with no matching definition"
        );
    }

    Ok(document)
}

/// Load `path` and filter its `"definitions"` object down to `allow`.
pub fn filter_definitions(path: &Path, allow: &AllowList) -> Result<Value, FilterError> {
    filter_definitions_with(path, allow, &FilterOptions::default())
}

pub fn filter_definitions_with(
    path: &Path,
    allow: &AllowList,
    options: &FilterOptions,
) -> Result<Value, FilterError> {
    let document = load_document(path)?;
    filter_document(document, allow, options)
}

/// JSON type label used in error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
