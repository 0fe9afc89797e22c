use std::fmt;

use indexmap::IndexMap;

/// A single cell value. Star widgets produce counts, everything else text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Count(u32),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Count(count) => write!(f, "{count}"),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Count(value)
    }
}

/// One review as an ordered, open-ended set of fields.
///
/// A field can be missing entirely or present without a value; both read as
/// absent through [`ReviewRecord::get`]. The difference only shows in which
/// columns the export ends up with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewRecord {
    fields: IndexMap<String, Option<FieldValue>>,
}

impl ReviewRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, keeping its original position if it was already set.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<FieldValue>) {
        self.fields.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).and_then(Option::as_ref)
    }

    pub fn contains_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
