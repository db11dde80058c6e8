use compact_str::{CompactString, ToCompactString};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Characters that would split or end a path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Canonical string form of a Canvas identifier.
///
/// Canvas ids arrive as numbers, as strings, or embedded in a previously
/// fetched object; all of them end up as the same path segment. `Display`
/// renders the percent-encoded segment, [`ItemId::as_str`] the raw value.
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemId {
    value: CompactString,
}

impl ItemId {
    pub fn new<S: Into<CompactString>>(id: S) -> Self {
        Self { value: id.into() }
    }

    /// The id of the current user in user-scoped endpoints
    pub fn current_user() -> Self {
        Self::new("self")
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// Coerce a JSON value to its id: objects yield their `id` field, scalars
/// their own textual form.
pub fn get_item_id(item: &Value) -> CompactString {
    match item {
        Value::Object(map) => match map.get("id") {
            Some(id) => get_item_id(id),
            None => item.to_compact_string(),
        },
        Value::String(s) => s.as_str().into(),
        other => other.to_compact_string(),
    }
}

impl From<&Value> for ItemId {
    fn from(value: &Value) -> Self {
        Self::new(get_item_id(value))
    }
}

impl From<Value> for ItemId {
    fn from(value: Value) -> Self {
        Self::from(&value)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<CompactString> for ItemId {
    fn from(value: CompactString) -> Self {
        Self::new(value)
    }
}

impl From<&ItemId> for ItemId {
    fn from(value: &ItemId) -> Self {
        value.clone()
    }
}

impl From<u64> for ItemId {
    fn from(value: u64) -> Self {
        Self::new(value.to_compact_string())
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self::new(value.to_compact_string())
    }
}

impl From<u32> for ItemId {
    fn from(value: u32) -> Self {
        Self::new(value.to_compact_string())
    }
}

impl From<i32> for ItemId {
    fn from(value: i32) -> Self {
        Self::new(value.to_compact_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<ItemId, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};
        use std::fmt;

        struct ItemIdVisitor;

        impl<'de> Visitor<'de> for ItemIdVisitor {
            type Value = ItemId;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a string or integer representing a Canvas ID")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ItemId::new(value))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ItemId::new(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ItemId::from(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(ItemId::from(value))
            }
        }

        deserializer.deserialize_any(ItemIdVisitor)
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", utf8_percent_encode(&self.value, PATH_SEGMENT))
    }
}
