//! Configuration store seam and an in-memory implementation.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CmdlineError, Result};

/// Receives coerced values, keyed by option name.
///
/// Range checks and persistence are the store's business.
pub trait ConfigStore {
    fn put_string(&mut self, name: &str, value: &str);
    fn put_int(&mut self, name: &str, value: i64);
    fn put_float(&mut self, name: &str, value: f32);
}

// ============================================================================
// StoredValue — typed value as kept by MemoryStore
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Str(String),
    Int(i64),
    Float(f32),
}

impl fmt::Display for StoredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoredValue::Str(s) => write!(f, "{}", s),
            StoredValue::Int(n) => write!(f, "{}", n),
            StoredValue::Float(x) => write!(f, "{}", x),
        }
    }
}

/// Typed retrieval from a [`StoredValue`].
pub trait FromStoredValue: Sized {
    const EXPECTED: &'static str;

    fn from_stored_value(v: &StoredValue) -> Option<Self>;
}

impl FromStoredValue for i64 {
    const EXPECTED: &'static str = "i64";

    fn from_stored_value(v: &StoredValue) -> Option<Self> {
        match v {
            StoredValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl FromStoredValue for i32 {
    const EXPECTED: &'static str = "i32";

    fn from_stored_value(v: &StoredValue) -> Option<Self> {
        match v {
            StoredValue::Int(n) => i32::try_from(*n).ok(),
            _ => None,
        }
    }
}

impl FromStoredValue for bool {
    const EXPECTED: &'static str = "bool";

    fn from_stored_value(v: &StoredValue) -> Option<Self> {
        match v {
            StoredValue::Int(n) => Some(*n != 0),
            _ => None,
        }
    }
}

impl FromStoredValue for f32 {
    const EXPECTED: &'static str = "f32";

    fn from_stored_value(v: &StoredValue) -> Option<Self> {
        match v {
            StoredValue::Float(x) => Some(*x),
            _ => None,
        }
    }
}

impl FromStoredValue for String {
    const EXPECTED: &'static str = "String";

    fn from_stored_value(v: &StoredValue) -> Option<Self> {
        match v {
            StoredValue::Str(s) => Some(s.clone()),
            _ => None,
        }
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// Keeps the latest value per name and the order writes arrived in.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, StoredValue>,
    writes: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&mut self, name: &str, value: StoredValue) {
        self.writes.push(name.to_string());
        self.values.insert(name.to_string(), value);
    }

    /// Get a typed value by option name.
    pub fn get<T: FromStoredValue>(&self, name: &str) -> Result<T> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| CmdlineError::NotFound(name.to_string()))?;
        T::from_stored_value(value).ok_or_else(|| CmdlineError::TypeMismatch {
            name: name.to_string(),
            expected: T::EXPECTED,
        })
    }

    pub fn value(&self, name: &str) -> Option<&StoredValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Names in the order they were written, repeats included.
    pub fn writes(&self) -> &[String] {
        &self.writes
    }

    /// Current values, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StoredValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigStore for MemoryStore {
    fn put_string(&mut self, name: &str, value: &str) {
        self.put(name, StoredValue::Str(value.to_string()));
    }

    fn put_int(&mut self, name: &str, value: i64) {
        self.put(name, StoredValue::Int(value));
    }

    fn put_float(&mut self, name: &str, value: f32) {
        self.put(name, StoredValue::Float(value));
    }
}
