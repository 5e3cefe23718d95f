use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A single cell value as the parsing service sends it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// JSON null, or a nested array/object no field rule understands.
    Null,
}

impl From<&Value> for RawValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => RawValue::Text(s.clone()),
            Value::Bool(b) => RawValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => RawValue::Integer(i),
                None => n.as_f64().map(RawValue::Float).unwrap_or(RawValue::Null),
            },
            Value::Null | Value::Array(_) | Value::Object(_) => RawValue::Null,
        }
    }
}

/// One transaction line from the service. No fixed schema; key order is the
/// order the service emitted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    fields: Vec<(String, RawValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and fixtures.
    pub fn with(mut self, key: impl Into<String>, value: RawValue) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a field, keeping its original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: RawValue) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn from_object(object: &Map<String, Value>) -> Self {
        let fields = object
            .iter()
            .map(|(k, v)| (k.clone(), RawValue::from(v)))
            .collect();
        Self { fields }
    }

    /// `None` unless `value` is a JSON object.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().map(Self::from_object)
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'de> Deserialize<'de> for RawRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_object(&object))
    }
}
