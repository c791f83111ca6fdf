use std::{
    collections::BTreeMap,
    convert::Infallible,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::coerce::{coerce_flag, decimal_from_value, uint_from_value};

/// Server-assigned identifier. Backends disagree on whether ids are numbers or
/// strings, so both are accepted and echoed back in their original shape.
///
/// Two ids are equal when they print the same, so a route's `1` matches a
/// server's `"1"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LaptopId {
    Number(i64),
    Text(String),
}

impl LaptopId {
    /// Id carried by an arbitrary JSON value; `null` and `""` carry none.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Number(number) => Some(match number.as_i64() {
                Some(id) => Self::Number(id),
                None => Self::Text(number.to_string()),
            }),
            Value::String(text) if text.is_empty() => None,
            Value::String(text) => Some(Self::Text(text.clone())),
            other => Some(Self::Text(other.to_string())),
        }
    }
}

impl PartialEq for LaptopId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(n), Self::Text(t)) | (Self::Text(t), Self::Number(n)) => {
                *t == n.to_string()
            }
        }
    }
}

impl Eq for LaptopId {}

impl Hash for LaptopId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Number(id) => id.to_string().hash(state),
            Self::Text(id) => id.hash(state),
        }
    }
}

impl fmt::Display for LaptopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// Only canonical integers (`7`, `-3`) become numbers; `007` or `+7` keep
/// their spelling so they address the same path they were typed as.
impl FromStr for LaptopId {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(match raw.parse::<i64>() {
            Ok(id) if id.to_string() == raw => Self::Number(id),
            _ => Self::Text(raw.to_string()),
        })
    }
}

impl From<i64> for LaptopId {
    fn from(id: i64) -> Self {
        Self::Number(id)
    }
}

impl From<&str> for LaptopId {
    fn from(raw: &str) -> Self {
        match raw.parse() {
            Ok(id) => id,
            Err(never) => match never {},
        }
    }
}

/// One inventory item as exchanged with the laptops collection.
///
/// Fields the client does not know about are kept in [`LaptopRecord::extra`]
/// and written back verbatim, so an edit never drops server-side data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaptopRecord {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_id"
    )]
    pub id: Option<LaptopId>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub brand: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub model: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub processor: String,
    #[serde(default, deserialize_with = "lenient_uint")]
    pub ram: u64,
    #[serde(default, deserialize_with = "lenient_uint")]
    pub storage: u64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub gpu: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub operating_system: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub screen_size: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default = "available_by_default", deserialize_with = "lenient_flag")]
    pub is_available: bool,
    #[serde(default, deserialize_with = "lenient_uint")]
    pub stock_quantity: u64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for LaptopRecord {
    fn default() -> Self {
        Self {
            id: None,
            brand: String::new(),
            model: String::new(),
            price: 0.0,
            processor: String::new(),
            ram: 0,
            storage: 0,
            gpu: String::new(),
            operating_system: String::new(),
            screen_size: 0.0,
            description: String::new(),
            is_available: true,
            stock_quantity: 0,
            extra: BTreeMap::new(),
        }
    }
}

impl LaptopRecord {
    /// Identifier to show and route with: `id`, falling back to a
    /// document-store style `_id` carried in the extra fields.
    pub fn display_id(&self) -> Option<LaptopId> {
        if let Some(id) = &self.id {
            return Some(id.clone());
        }
        self.extra.get("_id").and_then(LaptopId::from_value)
    }

    /// Name used in delete confirmations.
    pub fn confirmation_name(&self) -> &str {
        if self.model.is_empty() {
            "this laptop"
        } else {
            &self.model
        }
    }

    /// Copy of the record without its server-assigned id, as sent in request
    /// bodies where the id already lives in the path.
    pub fn without_id(&self) -> Self {
        Self {
            id: None,
            ..self.clone()
        }
    }
}

fn available_by_default() -> bool {
    true
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<LaptopId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(LaptopId::from_value(&Value::deserialize(deserializer)?))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        other => other.to_string(),
    })
}

fn lenient_decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(decimal_from_value(&Value::deserialize(deserializer)?))
}

fn lenient_uint<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(uint_from_value(&Value::deserialize(deserializer)?))
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_flag(&Value::deserialize(deserializer)?))
}
