use std::fmt::Display;

use bazaar_engine::db_types::ContactUpdate;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopQuery {
    pub name: Option<String>,
    pub is_work: Option<String>,
}

/// A comma-separated list of ids, e.g. `{"items": "1,2,3"}`. A bare number such as `{"items": 7}` is a list of one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemsParam {
    #[serde(default, deserialize_with = "lenient_list")]
    pub items: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceOrderParams {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusUpdateParams {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactUpdateParams {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,
    #[serde(flatten)]
    pub fields: ContactUpdate,
}

/// Accepts an id given as a JSON number or as a numeric string. Blank strings and nulls count as absent.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where D: Deserializer<'de> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(|| de::Error::custom(format!("{n} is not an id"))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => {
            s.trim().parse::<i64>().map(Some).map_err(|_| de::Error::custom(format!("'{s}' is not an id")))
        },
        Some(v) => Err(de::Error::custom(format!("{v} is not an id"))),
    }
}

/// Reads any JSON value as the text of an id list. Non-string values are rendered as JSON, so only numbers yield
/// usable ids.
fn lenient_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where D: Deserializer<'de> {
    let list = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(v) => v.to_string(),
    };
    Ok(list)
}
