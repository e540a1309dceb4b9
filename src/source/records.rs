//! JSON record source
//!
//! Pages through JSON records (loaded from JSON, JSON lines or YAML) keyed by
//! a field inside each record. The field is extracted once at load time, so
//! `parameter_of` stays total.

use super::memory::{MemorySource, SortDirection};
use super::types::{AsyncSource, Source};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::path::Path;

// ============================================================================
// Record Keys
// ============================================================================

/// Parameter value extracted from a record
#[derive(Debug, Clone)]
pub enum RecordKey {
    /// Numeric field, ordered with `f64::total_cmp`
    Number(f64),
    /// String field, ordered lexicographically
    Text(String),
    /// RFC 3339 string or unix seconds
    Timestamp(DateTime<Utc>),
}

impl RecordKey {
    fn rank(&self) -> u8 {
        match self {
            Self::Number(_) => 0,
            Self::Text(_) => 1,
            Self::Timestamp(_) => 2,
        }
    }
}

impl PartialEq for RecordKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RecordKey {}

impl PartialOrd for RecordKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RecordKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}

/// How to read the parameter field of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// JSON number
    #[default]
    Number,
    /// JSON string
    Text,
    /// RFC 3339 string or integer unix seconds
    Timestamp,
}

impl ParamKind {
    /// Convert a JSON value to a key of this kind
    pub fn extract(self, value: &Value) -> Option<RecordKey> {
        match self {
            Self::Number => value.as_f64().map(RecordKey::Number),
            Self::Text => value.as_str().map(|s| RecordKey::Text(s.to_string())),
            Self::Timestamp => match value {
                Value::String(s) => DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|ts| RecordKey::Timestamp(ts.with_timezone(&Utc))),
                Value::Number(n) => n
                    .as_i64()
                    .and_then(|secs| DateTime::from_timestamp(secs, 0))
                    .map(RecordKey::Timestamp),
                _ => None,
            },
        }
    }
}

/// Look up a dotted path (`$.a.b` or `a.b`) inside a JSON value
pub fn extract_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        match current {
            Value::Object(map) => current = map.get(part)?,
            _ => return None,
        }
    }
    Some(current)
}

// ============================================================================
// Records
// ============================================================================

/// A JSON record together with its extracted parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Extracted parameter
    pub key: RecordKey,
    /// The record itself
    pub value: Value,
}

impl Record {
    /// Extract the parameter at `path` from `value`
    pub fn new(value: Value, path: &str, kind: ParamKind) -> Result<Self> {
        let field = extract_path(&value, path)
            .ok_or_else(|| Error::record_extraction(path, "field is missing"))?;
        let key = kind.extract(field).ok_or_else(|| {
            Error::record_extraction(path, format!("{field} is not a valid {kind:?} value"))
        })?;
        Ok(Self { key, value })
    }
}

fn record_key(record: &Record) -> RecordKey {
    record.key.clone()
}

/// Input layout of a record file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// A JSON array of records
    Json,
    /// One JSON record per line
    JsonLines,
    /// A YAML sequence of records
    Yaml,
}

impl RecordFormat {
    /// Guess the layout from a file extension (defaults to JSON)
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("jsonl" | "ndjson") => Self::JsonLines,
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    /// Parse raw records
    pub fn parse(self, contents: &str) -> Result<Vec<Value>> {
        match self {
            Self::Json => Ok(serde_json::from_str(contents)?),
            Self::JsonLines => contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| serde_json::from_str(line).map_err(Error::from))
                .collect(),
            Self::Yaml => Ok(serde_yaml::from_str(contents)?),
        }
    }
}

// ============================================================================
// Record Source
// ============================================================================

/// Sorted in-memory source over JSON records
#[derive(Debug)]
pub struct RecordSource {
    inner: MemorySource<Record, fn(&Record) -> RecordKey>,
    path: String,
    kind: ParamKind,
}

impl RecordSource {
    /// Build a source from raw JSON values, keyed by the field at `path`
    ///
    /// Fails on the first record whose field is missing or of the wrong kind.
    pub fn from_values(
        values: Vec<Value>,
        path: impl Into<String>,
        kind: ParamKind,
        direction: SortDirection,
    ) -> Result<Self> {
        let path = path.into();
        let records = values
            .into_iter()
            .map(|value| Record::new(value, &path, kind))
            .collect::<Result<Vec<_>>>()?;

        let key: fn(&Record) -> RecordKey = record_key;
        let mut inner = MemorySource::with_direction(key, direction);
        inner.extend(records);

        Ok(Self { inner, path, kind })
    }

    /// Parse `contents` in `format` and build a source from it
    pub fn parse(
        contents: &str,
        format: RecordFormat,
        path: impl Into<String>,
        kind: ParamKind,
        direction: SortDirection,
    ) -> Result<Self> {
        Self::from_values(format.parse(contents)?, path, kind, direction)
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the source holds no records
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Field path the records are keyed by
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Kind of the key field
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Walk direction
    pub fn direction(&self) -> SortDirection {
        self.inner.direction()
    }
}

impl Source for RecordSource {
    type Item = Record;
    type Param = RecordKey;
    type Error = Infallible;

    fn fetch(
        &self,
        parameter: Option<&RecordKey>,
        limit: usize,
    ) -> std::result::Result<Vec<Record>, Infallible> {
        Source::fetch(&self.inner, parameter, limit)
    }

    fn parameter_of(&self, item: &Record) -> RecordKey {
        item.key.clone()
    }

    fn fetch_skipping(
        &self,
        parameter: Option<&RecordKey>,
        skip: usize,
        limit: usize,
    ) -> std::result::Result<Vec<Record>, Infallible> {
        Source::fetch_skipping(&self.inner, parameter, skip, limit)
    }
}

#[async_trait]
impl AsyncSource for RecordSource {
    type Item = Record;
    type Param = RecordKey;
    type Error = Infallible;

    async fn fetch(
        &self,
        parameter: Option<&RecordKey>,
        limit: usize,
    ) -> std::result::Result<Vec<Record>, Infallible> {
        Source::fetch(&self.inner, parameter, limit)
    }

    fn parameter_of(&self, item: &Record) -> RecordKey {
        item.key.clone()
    }

    async fn fetch_skipping(
        &self,
        parameter: Option<&RecordKey>,
        skip: usize,
        limit: usize,
    ) -> std::result::Result<Vec<Record>, Infallible> {
        Source::fetch_skipping(&self.inner, parameter, skip, limit)
    }
}
