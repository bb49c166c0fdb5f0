//! Shared library for the definitions filter.
//!
//! A document is loaded, its top-level `"definitions"` object is pruned down
//! to an allow-list, and the result is written back out as indented JSON.
//! The `filter-definitions` binary is a thin shell over the functions
//! re-exported here; every failure surfaces as a [`FilterError`].

use anyhow::{Context, Result, bail};
use serde_json::Value;

pub mod error;
pub mod filter;
pub mod writer;

pub use error::{FilterError, FilterErrorKind};
pub use filter::{
    AllowList, DEFAULT_DEFINITIONS_KEY, FilterOptions, FilterSummary, filter_definitions,
    filter_definitions_with, filter_document, json_type_name, load_document, summarize,
};
pub use writer::{to_pretty_string, write_document};

/// Split comma- or whitespace-delimited name lists into tokens.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse an allow-list file, accepting either a JSON array of strings or a
/// plain text list.
///
/// Plain text lists may put several names on one line separated by commas or
/// whitespace; lines starting with `#` are comments. Empty input is an empty
/// list rather than an error so a file can deliberately keep nothing.
pub fn parse_allow_list(input: &str) -> Result<AllowList> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(AllowList::default());
    }

    if trimmed.starts_with('[') {
        let value: Value =
            serde_json::from_str(trimmed).context("Unable to parse allow-list JSON array")?;
        let Value::Array(items) = value else {
            bail!("Unsupported allow-list JSON; expected an array of strings");
        };
        let mut names = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            match item {
                Value::String(name) => names.push(name),
                other => bail!(
                    "allow-list entry {} is {}, expected string",
                    idx,
                    json_type_name(&other)
                ),
            }
        }
        return Ok(AllowList::new(names));
    }

    Ok(trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .flat_map(split_list)
        .collect())
}
