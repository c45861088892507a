//! Path-scoped request input.
//!
//! A key such as `?route.id` names three things at once: whether the caller
//! only wants to know if the value is present (the leading `?`), which input
//! source to consult (`route`) and the key within that source (`id`).
//! [`resolve`] takes the key apart, [`input`] forwards the result to an
//! [`InputProvider`] which owns the actual data.
//!
//! Only the first dot separates the source from the key, `session.user.id`
//! looks up `user.id` in the session source. How nested keys are interpreted
//! is up to the provider; [`MemoryInput`] descends into nested objects.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{HelperError, Result};

/// Marks a key as an existence query rather than a fetch.
pub const EXISTENCE_MARK: char = '?';

// ------------- Source -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Route,
    /// Auto-detected input, the source used when a key names none.
    #[default]
    Param,
    Request,
    Session,
    Cookie,
    Server,
    Env,
    Path,
    File,
}

impl Source {
    pub const ALL: [Source; 14] = [
        Source::Get,
        Source::Post,
        Source::Put,
        Source::Patch,
        Source::Delete,
        Source::Route,
        Source::Param,
        Source::Request,
        Source::Session,
        Source::Cookie,
        Source::Server,
        Source::Env,
        Source::Path,
        Source::File,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Source::Get => "get",
            Source::Post => "post",
            Source::Put => "put",
            Source::Patch => "patch",
            Source::Delete => "delete",
            Source::Route => "route",
            Source::Param => "param",
            Source::Request => "request",
            Source::Session => "session",
            Source::Cookie => "cookie",
            Source::Server => "server",
            Source::Env => "env",
            Source::Path => "path",
            Source::File => "file",
        }
    }

    /// Exact, case-sensitive match against the registered names.
    pub fn from_name(name: &str) -> Option<Source> {
        Source::ALL.into_iter().find(|source| source.name() == name)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Source {
    type Err = HelperError;
    fn from_str(s: &str) -> Result<Self> {
        Source::from_name(s).ok_or_else(|| HelperError::UnknownSource(s.to_owned()))
    }
}

/// Splits a leading [`EXISTENCE_MARK`] off `name`.
pub fn split_existence(name: &str) -> (&str, bool) {
    match name.strip_prefix(EXISTENCE_MARK) {
        Some(rest) => (rest, true),
        None => (name, false),
    }
}

// ------------- Resolution -------------
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    source: Source,
    key: String,
    existence: bool,
}

impl Resolution {
    pub fn new(source: Source, key: impl Into<String>, existence: bool) -> Self {
        Self {
            source,
            key: key.into(),
            existence,
        }
    }
    pub fn source(&self) -> Source {
        self.source
    }
    pub fn key(&self) -> &str {
        &self.key
    }
    pub fn is_existence(&self) -> bool {
        self.existence
    }
}

/// Determines source, lookup key and query kind for a dotted key. Never fails:
/// a prefix that is not a registered source leaves the whole key in place and
/// falls back to [`Source::Param`].
pub fn resolve(key: &str) -> Resolution {
    let (key, existence) = split_existence(key);
    // a dot in first position does not name a source
    if let Some(pos) = key.find('.').filter(|&pos| pos > 0) {
        if let Some(source) = Source::from_name(&key[..pos]) {
            return Resolution::new(source, &key[pos + 1..], existence);
        }
    }
    Resolution::new(Source::default(), key, existence)
}

// ------------- Filter -------------
/// Ordered list of filter names, applied by the provider to fetched values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Filter(Vec<String>);

impl Filter {
    pub fn none() -> Self {
        Self(Vec::new())
    }
    /// Comma separated names, blanks are ignored: `"trim, lower"`.
    pub fn parse(names: &str) -> Self {
        Self(
            names
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }
    pub fn names(&self) -> &[String] {
        &self.0
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Filter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// ------------- Provider -------------
/// The request object of the surrounding framework, seen from the helpers.
pub trait InputProvider {
    /// Whether `key` is set in `source`.
    fn has(&self, source: Source, key: &str) -> bool;
    /// The value of `key` in `source`, or `default` when it is not set. An
    /// empty key asks for every value of the source.
    fn fetch(&self, source: Source, key: &str, default: Option<Value>, filter: &Filter) -> Value;
}

/// What [`input`] produced: an answer to an existence query or a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Exists(bool),
    Value(Value),
}

impl Input {
    pub fn exists(&self) -> Option<bool> {
        match self {
            Input::Exists(exists) => Some(*exists),
            Input::Value(_) => None,
        }
    }
    pub fn into_value(self) -> Option<Value> {
        match self {
            Input::Exists(_) => None,
            Input::Value(value) => Some(value),
        }
    }
}

pub fn input<P: InputProvider + ?Sized>(
    provider: &P,
    key: &str,
    default: Option<Value>,
    filter: &Filter,
) -> Input {
    let resolution = resolve(key);
    debug!(source = %resolution.source(), key = resolution.key(), existence = resolution.is_existence(), "input resolved");
    if resolution.is_existence() {
        Input::Exists(provider.has(resolution.source(), resolution.key()))
    } else {
        Input::Value(provider.fetch(resolution.source(), resolution.key(), default, filter))
    }
}

/// Descends into nested objects one dot separated segment at a time. The
/// empty path is the value itself.
pub fn dig<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

// ------------- MemoryInput -------------
pub type FilterFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// In-memory [`InputProvider`] with one JSON object per source.
///
/// When no bag was given for [`Source::Param`] it is the merge of `get`,
/// `post` and `route` (later sources win); [`Source::Request`] likewise falls
/// back to `get` merged with `post`. `null` values count as not set.
#[derive(Default, Clone)]
pub struct MemoryInput {
    bags: HashMap<Source, Map<String, Value>>,
    filters: HashMap<String, FilterFn>,
    default_filter: Filter,
}

impl fmt::Debug for MemoryInput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MemoryInput")
            .field("bags", &self.bags)
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .field("default_filter", &self.default_filter)
            .finish()
    }
}

impl MemoryInput {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with(mut self, source: Source, key: &str, value: Value) -> Self {
        self.insert(source, key, value);
        self
    }
    pub fn insert(&mut self, source: Source, key: &str, value: Value) {
        self.bags.entry(source).or_default().insert(key.to_owned(), value);
    }
    /// Replaces the whole bag of `source`.
    pub fn set_bag(&mut self, source: Source, bag: Map<String, Value>) {
        self.bags.insert(source, bag);
    }
    pub fn register_filter<F>(&mut self, name: &str, filter: F)
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.filters.insert(name.to_owned(), Arc::new(filter));
    }
    /// Applied whenever a fetch is made with an empty filter.
    pub fn set_default_filter(&mut self, filter: Filter) {
        self.default_filter = filter;
    }

    fn bag(&self, source: Source) -> Map<String, Value> {
        if let Some(bag) = self.bags.get(&source) {
            return bag.clone();
        }
        let merged_from: &[Source] = match source {
            Source::Param => &[Source::Get, Source::Post, Source::Route],
            Source::Request => &[Source::Get, Source::Post],
            _ => &[],
        };
        let mut merged = Map::new();
        for other in merged_from {
            if let Some(bag) = self.bags.get(other) {
                merged.extend(bag.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        merged
    }

    fn apply(&self, value: Value, filter: &Filter) -> Value {
        let filter = if filter.is_empty() { &self.default_filter } else { filter };
        filter.names().iter().fold(value, |value, name| match self.filters.get(name) {
            Some(f) => map_leaves(value, f.as_ref()),
            None => {
                warn!(filter = %name, "unknown input filter skipped");
                value
            }
        })
    }
}

fn map_leaves(value: Value, f: &(dyn Fn(&Value) -> Value + Send + Sync)) -> Value {
    match value {
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, map_leaves(v, f))).collect()),
        Value::Array(items) => Value::Array(items.into_iter().map(|v| map_leaves(v, f)).collect()),
        leaf => f(&leaf),
    }
}

impl InputProvider for MemoryInput {
    fn has(&self, source: Source, key: &str) -> bool {
        let bag = self.bag(source);
        // the empty key names an entry, not the whole bag
        if key.is_empty() {
            return bag.get("").is_some_and(|value| !value.is_null());
        }
        matches!(dig(&Value::Object(bag), key), Some(value) if !value.is_null())
    }

    fn fetch(&self, source: Source, key: &str, default: Option<Value>, filter: &Filter) -> Value {
        let bag = Value::Object(self.bag(source));
        match dig(&bag, key) {
            Some(value) if !value.is_null() => self.apply(value.clone(), filter),
            _ => default.unwrap_or(Value::Null),
        }
    }
}
