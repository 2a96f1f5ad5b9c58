//! Records: insertion-ordered mappings with attribute-style field access.
//!
//! `record.field` and `record[key]` read the same storage and fail the same
//! way. Formatting is cycle-safe: the set of records on the active
//! formatting path travels down the recursion, each child receiving its own
//! copy, so a record shared by two sibling branches renders in full both
//! times while a record nested inside itself renders as `{...}`.

use std::any::Any;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::runtime::error::RuntimeError;
use crate::runtime::object::{
    IterFactory, ObjectRef, ReprPath, RuntimeObject, ValueIter, new_object_ref, with_object,
    with_object_mut,
};
use crate::runtime::value::{Value, ValueKey};

/// Words that cannot appear as bare field names in record literals.
const RESERVED_KEYWORDS: [&str; 18] = [
    "if", "else", "while", "for", "def", "class", "return", "import", "from", "as", "with", "try",
    "except", "finally", "raise", "assert", "async", "await",
];

#[derive(Debug, Clone, Default)]
pub(crate) struct RecordObject {
    entries: IndexMap<ValueKey, Value>,
}

impl RecordObject {
    fn lookup(&self, key: &ValueKey) -> Result<Value, RuntimeError> {
        self.entries
            .get(key)
            .cloned()
            .ok_or_else(|| missing_entry(key))
    }

    fn insert(&mut self, key: ValueKey, value: Value) {
        self.entries.insert(key, value);
    }
}

fn missing_entry(key: &ValueKey) -> RuntimeError {
    RuntimeError::MissingAttribute {
        type_name: "Record".to_string(),
        attribute: key.value().to_output(),
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !RESERVED_KEYWORDS.contains(&text)
}

/// Keys are rendered on the same path as their values, so a hashable key
/// that leads back to the record stops at `{...}`.
fn format_key(key: &Value, visited: &mut ReprPath) -> String {
    match key {
        Value::Str(text) if is_identifier(text) => text.to_string(),
        Value::None | Value::Bool(_) | Value::Int(_) | Value::Float(_) => key.repr(),
        _ => format!("({})", key.repr_in(visited)),
    }
}

impl RuntimeObject for RecordObject {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        "Record"
    }

    fn get_attribute(&self, _receiver: &ObjectRef, attribute: &str) -> Result<Value, RuntimeError> {
        self.lookup(&ValueKey::from(attribute))
    }

    fn set_attribute(&mut self, attribute: &str, value: Value) -> Result<(), RuntimeError> {
        self.insert(ValueKey::from(attribute), value);
        Ok(())
    }

    fn get_item(&self, key: &Value) -> Result<Value, RuntimeError> {
        self.lookup(&ValueKey::new(key.clone())?)
    }

    fn set_item(&mut self, key: Value, value: Value) -> Result<(), RuntimeError> {
        self.insert(ValueKey::new(key)?, value);
        Ok(())
    }

    fn repr(&self, identity: usize, visited: &mut ReprPath) -> String {
        if visited.contains(&identity) {
            return "{...}".to_string();
        }
        visited.insert(identity);
        let rendered = if self.entries.is_empty() {
            "{}".to_string()
        } else {
            let items = self
                .entries
                .iter()
                .map(|(key, value)| {
                    let mut branch = visited.clone();
                    let key = format_key(key.value(), &mut branch);
                    format!("{key}: {}", value.repr_in(&mut branch))
                })
                .collect::<Vec<_>>();
            format!("{{{}}}", items.join(", "))
        };
        visited.remove(&identity);
        rendered
    }

    fn is_hashable(&self) -> bool {
        false
    }

    fn paired_entries(&self, receiver: &ObjectRef) -> Option<IterFactory> {
        let receiver = receiver.clone();
        Some(Rc::new(move || -> ValueIter {
            Box::new(RecordValues {
                record: receiver.clone(),
                index: 0,
                pairs: true,
            })
        }))
    }

    fn native_iter(&self, receiver: &ObjectRef) -> Option<IterFactory> {
        let receiver = receiver.clone();
        Some(Rc::new(move || -> ValueIter {
            Box::new(RecordValues {
                record: receiver.clone(),
                index: 0,
                pairs: false,
            })
        }))
    }
}

/// Positional cursor over a record's entries, yielding `(key, value)`
/// tuples or bare keys.
struct RecordValues {
    record: ObjectRef,
    index: usize,
    pairs: bool,
}

impl Iterator for RecordValues {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let (key, value) = with_object(&self.record, |record: &RecordObject| {
            record
                .entries
                .get_index(self.index)
                .map(|(key, value)| (key.value().clone(), value.clone()))
        })
        .flatten()?;
        self.index += 1;
        if self.pairs {
            Some(Value::pair(key, value))
        } else {
            Some(key)
        }
    }
}

/// Shared handle to a record value.
#[derive(Clone)]
pub struct Record(ObjectRef);

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

impl Record {
    pub fn new() -> Self {
        Self(new_object_ref(RecordObject::default()))
    }

    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (Value, Value)>,
    ) -> Result<Self, RuntimeError> {
        let mut object = RecordObject::default();
        for (key, value) in pairs {
            object.insert(ValueKey::new(key)?, value);
        }
        Ok(Self(new_object_ref(object)))
    }

    /// Views `value` as a record when it is one.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        if !object.borrow().as_any().is::<RecordObject>() {
            return None;
        }
        Some(Self(object.clone()))
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    fn with_record<R>(&self, f: impl FnOnce(&RecordObject) -> R) -> R {
        with_object(&self.0, f).expect("record handle must wrap RecordObject")
    }

    fn with_record_mut<R>(&self, f: impl FnOnce(&mut RecordObject) -> R) -> R {
        with_object_mut(&self.0, f).expect("record handle must wrap RecordObject")
    }

    pub fn len(&self) -> usize {
        self.with_record(|record| record.entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_attribute(&self, attribute: &str) -> Result<Value, RuntimeError> {
        self.with_record(|record| record.lookup(&ValueKey::from(attribute)))
    }

    pub fn set_attribute(&self, attribute: &str, value: Value) {
        self.with_record_mut(|record| record.insert(ValueKey::from(attribute), value));
    }

    pub fn get_item(&self, key: &Value) -> Result<Value, RuntimeError> {
        let key = ValueKey::new(key.clone())?;
        self.with_record(|record| record.lookup(&key))
    }

    /// Like `get_item`, but falls back to `default` when the key is absent.
    pub fn get_or(&self, key: &Value, default: Value) -> Result<Value, RuntimeError> {
        let key = ValueKey::new(key.clone())?;
        Ok(self
            .with_record(|record| record.entries.get(&key).cloned())
            .unwrap_or(default))
    }

    pub fn set_item(&self, key: Value, value: Value) -> Result<(), RuntimeError> {
        let key = ValueKey::new(key)?;
        self.with_record_mut(|record| record.insert(key, value));
        Ok(())
    }

    pub fn contains_key(&self, key: &Value) -> Result<bool, RuntimeError> {
        let key = ValueKey::new(key.clone())?;
        Ok(self.with_record(|record| record.entries.contains_key(&key)))
    }

    /// Removes an entry, keeping the order of the remaining ones.
    pub fn remove(&self, key: &Value) -> Result<Option<Value>, RuntimeError> {
        let key = ValueKey::new(key.clone())?;
        Ok(self.with_record_mut(|record| record.entries.shift_remove(&key)))
    }

    pub fn keys(&self) -> Vec<Value> {
        self.with_record(|record| {
            record
                .entries
                .keys()
                .map(|key| key.value().clone())
                .collect()
        })
    }

    pub fn values(&self) -> Vec<Value> {
        self.with_record(|record| record.entries.values().cloned().collect())
    }

    pub fn items(&self) -> Vec<(Value, Value)> {
        self.with_record(|record| {
            record
                .entries
                .iter()
                .map(|(key, value)| (key.value().clone(), value.clone()))
                .collect()
        })
    }

    /// Copies every entry of `other` into this record.
    pub fn update(&self, other: &Record) {
        if Rc::ptr_eq(&self.0, &other.0) {
            return;
        }
        let entries = other.with_record(|record| record.entries.clone());
        self.with_record_mut(|record| record.entries.extend(entries));
    }

    pub fn repr(&self) -> String {
        self.to_value().repr()
    }
}

/// Views any mapping-like value as a record for destructuring.
///
/// Records are returned as-is; other values exposing paired entries are
/// copied into a fresh record.
pub fn unpack_record(value: &Value) -> Result<Record, RuntimeError> {
    if let Some(record) = Record::from_value(value) {
        return Ok(record);
    }
    let not_a_mapping = || RuntimeError::InvalidArgumentType {
        operation: "unpack_record".to_string(),
        argument: "value".to_string(),
        expected: "mapping".to_string(),
        got: value.type_name().to_string(),
    };
    let factory = value
        .as_object()
        .and_then(|object| object.borrow().paired_entries(object))
        .ok_or_else(not_a_mapping)?;
    let mut pairs = Vec::new();
    for entry in factory() {
        match entry.as_tuple() {
            Some([key, value]) => pairs.push((key.clone(), value.clone())),
            _ => return Err(not_a_mapping()),
        }
    }
    Record::from_pairs(pairs)
}
