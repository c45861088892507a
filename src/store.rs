//! Keyed stores behind the cache, config, cookie and session helpers.
//!
//! Those helpers share one calling convention: a name and an optional value.
//! No value reads (or, with a `?` prefix on the name, checks existence), a
//! `null` value deletes, any other value writes, and no name at all clears
//! the store. [`dispatch`] turns that convention into a call on a
//! [`KeyedStore`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{HelperError, Result};
use crate::input::{dig, split_existence};

pub trait KeyedStore {
    fn has(&self, name: &str) -> bool;
    fn get(&self, name: &str) -> Option<Value>;
    fn set(&mut self, name: &str, value: Value, options: &SetOptions) -> Result<()>;
    /// Whether something was removed.
    fn delete(&mut self, name: &str) -> Result<bool>;
    fn clear(&mut self) -> Result<()>;
}

/// Write options. An expiry of `None` or `Some(0)` never expires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetOptions {
    pub expire: Option<u64>,
    pub tag: Option<String>,
}

impl SetOptions {
    /// A number is the expiry in seconds, an object contributes its `expire`
    /// field and anything else sets no expiry.
    pub fn from_value(options: &Value, tag: Option<&str>) -> Self {
        let expire = match options {
            Value::Number(n) => n.as_u64(),
            Value::Object(map) => map.get("expire").and_then(Value::as_u64),
            _ => None,
        };
        Self {
            expire,
            tag: tag.map(str::to_owned),
        }
    }
    pub fn expiring(seconds: u64) -> Self {
        Self {
            expire: Some(seconds),
            tag: None,
        }
    }
    pub fn tagged(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_owned());
        self
    }
}

/// The value argument of a store helper.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Operand {
    /// Read (or check existence of) the name.
    #[default]
    Absent,
    /// Delete the name.
    Null,
    /// Write the value.
    Value(Value),
}

/// `None` reads, `Some(null)` deletes and any other value writes.
impl From<Option<Value>> for Operand {
    fn from(value: Option<Value>) -> Self {
        match value {
            None => Operand::Absent,
            Some(Value::Null) => Operand::Null,
            Some(value) => Operand::Value(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Exists(bool),
    Value(Option<Value>),
    Deleted(bool),
    Stored,
    Cleared,
}

pub fn dispatch<S: KeyedStore + ?Sized>(
    store: &mut S,
    name: Option<&str>,
    operand: Operand,
    options: &SetOptions,
) -> Result<Outcome> {
    let Some(name) = name else {
        debug!("store cleared");
        store.clear()?;
        return Ok(Outcome::Cleared);
    };
    match operand {
        Operand::Null => Ok(Outcome::Deleted(store.delete(name)?)),
        Operand::Absent => {
            let (name, existence) = split_existence(name);
            if existence {
                Ok(Outcome::Exists(store.has(name)))
            } else {
                Ok(Outcome::Value(store.get(name)))
            }
        }
        Operand::Value(value) => {
            debug!(name = %name, expire = ?options.expire, tag = ?options.tag, "store write");
            store.set(name, value, options)?;
            Ok(Outcome::Stored)
        }
    }
}

/// Config style read: `?name` checks existence, any other name yields the
/// stored value or `default`.
pub fn lookup<S: KeyedStore + ?Sized>(store: &S, name: &str, default: Value) -> Outcome {
    let (name, existence) = split_existence(name);
    if existence {
        Outcome::Exists(store.has(name))
    } else {
        Outcome::Value(Some(store.get(name).unwrap_or(default)))
    }
}

/// Config style batch write. Without `under` every entry of `values` is
/// written under its own name; with it, `values` is merged into the object
/// stored as `under` (a non-object value there is replaced).
pub fn assign<S: KeyedStore + ?Sized>(
    store: &mut S,
    values: Map<String, Value>,
    under: Option<&str>,
    options: &SetOptions,
) -> Result<Outcome> {
    match under {
        Some(name) => {
            let mut merged = match store.get(name) {
                Some(Value::Object(existing)) => existing,
                _ => Map::new(),
            };
            merged.extend(values);
            debug!(name = %name, "store batch merge");
            store.set(name, Value::Object(merged), options)?;
        }
        None => {
            debug!(count = values.len(), "store batch write");
            for (name, value) in values {
                store.set(&name, value, options)?;
            }
        }
    }
    Ok(Outcome::Stored)
}

// ------------- MemoryStore -------------
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    value: Value,
    expires_at: Option<DateTime<Utc>>,
    tag: Option<String>,
}

/// In-memory [`KeyedStore`]. A dotted name that is not stored as such
/// addresses a nested value inside the object stored under its first
/// segment: `app.name` reads, writes and deletes `name` inside `app`. Nested
/// writes keep the expiry and tag of the enclosing entry and only use their
/// own options when that entry has to be created.
#[derive(Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Entry>,
    clock: Clock,
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("MemoryStore").field("entries", &self.entries).finish()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(Utc::now))
    }
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            entries: HashMap::new(),
            clock,
        }
    }
    /// Names written with `tag`, sorted.
    pub fn tagged(&self, tag: &str) -> Vec<&str> {
        let now = (self.clock)();
        let mut names: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.tag.as_deref() == Some(tag) && entry.is_live(now))
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }
    pub fn len(&self) -> usize {
        let now = (self.clock)();
        self.entries.values().filter(|entry| entry.is_live(now)).count()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn live(&self, name: &str) -> Option<&Value> {
        let now = (self.clock)();
        if let Some(entry) = self.entries.get(name) {
            return entry.is_live(now).then_some(&entry.value);
        }
        let (head, rest) = name.split_once('.')?;
        let entry = self.entries.get(head).filter(|entry| entry.is_live(now))?;
        dig(&entry.value, rest)
    }
}

impl Entry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

impl KeyedStore for MemoryStore {
    fn has(&self, name: &str) -> bool {
        self.live(name).is_some_and(|value| !value.is_null())
    }
    fn get(&self, name: &str) -> Option<Value> {
        self.live(name).cloned()
    }
    fn set(&mut self, name: &str, value: Value, options: &SetOptions) -> Result<()> {
        if name.is_empty() {
            return Err(HelperError::Store("empty name".to_owned()));
        }
        let expires_at = match options.expire {
            None | Some(0) => None,
            Some(seconds) => {
                let seconds = i64::try_from(seconds)
                    .map_err(|_| HelperError::Store(format!("expiry out of range: {seconds}")))?;
                let ttl = Duration::try_seconds(seconds)
                    .ok_or_else(|| HelperError::Store(format!("expiry out of range: {seconds}")))?;
                Some((self.clock)() + ttl)
            }
        };
        if !self.entries.contains_key(name) {
            if let Some((head, rest)) = name.split_once('.') {
                let now = (self.clock)();
                let fresh = || Entry {
                    value: Value::Object(Map::new()),
                    expires_at,
                    tag: options.tag.clone(),
                };
                let entry = self.entries.entry(head.to_owned()).or_insert_with(&fresh);
                if !entry.is_live(now) {
                    *entry = fresh();
                }
                return insert_path(&mut entry.value, rest, value)
                    .ok_or_else(|| HelperError::Store(format!("cannot write nested name: {name}")));
            }
        }
        self.entries.insert(
            name.to_owned(),
            Entry {
                value,
                expires_at,
                tag: options.tag.clone(),
            },
        );
        Ok(())
    }
    fn delete(&mut self, name: &str) -> Result<bool> {
        let now = (self.clock)();
        if let Some(entry) = self.entries.remove(name) {
            return Ok(entry.is_live(now));
        }
        let Some((head, rest)) = name.split_once('.') else {
            return Ok(false);
        };
        let Some(entry) = self.entries.get_mut(head).filter(|entry| entry.is_live(now)) else {
            return Ok(false);
        };
        Ok(remove_path(&mut entry.value, rest))
    }
    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }
}

/// Writes `value` at the dot separated `path` below `target`, turning
/// anything in the way into an object.
fn insert_path(target: &mut Value, path: &str, value: Value) -> Option<()> {
    let mut current = target;
    for segment in path.split('.') {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        current = current.as_object_mut()?.entry(segment).or_insert(Value::Null);
    }
    *current = value;
    Some(())
}

fn remove_path(target: &mut Value, path: &str) -> bool {
    let (parent, last) = match path.rsplit_once('.') {
        Some((parent, last)) => (dig_mut(target, parent), last),
        None => (Some(target), path),
    };
    parent
        .and_then(Value::as_object_mut)
        .is_some_and(|map| map.remove(last).is_some())
}

fn dig_mut<'a>(value: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    path.split('.')
        .try_fold(value, |current, segment| current.as_object_mut()?.get_mut(segment))
}
