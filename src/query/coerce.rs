//! Coercion of native JSON values into tagged `DbValue`s.
//!
//! Native records arrive as `serde_json::Value` (either parsed from input or
//! produced by serializing a caller's struct). The inference policy is fixed
//! except for how bare integers are tagged, which is configurable through
//! [`IntegerPolicy`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use tracing::trace;

use crate::error::{ClientError, Result};

use super::ast::QueryId;
use super::value::{DbF64, DbId, DbKeyValue, DbValue};

/// Reserved record field holding the element id.
pub const DB_ID_FIELD: &str = "db_id";

/// Tag chosen for bare integers that fit both `I64` and `U64`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegerPolicy {
    /// Integers become `I64`; only values above `i64::MAX` become `U64`.
    #[default]
    Signed,
    /// Non-negative integers become `U64`.
    Unsigned,
}

impl IntegerPolicy {
    /// Parses `signed`/`unsigned`, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "signed" => Some(IntegerPolicy::Signed),
            "unsigned" => Some(IntegerPolicy::Unsigned),
            _ => None,
        }
    }
}

/// Stateless converter carrying the integer policy.
#[derive(Copy, Clone, Debug, Default)]
pub struct Coercer {
    policy: IntegerPolicy,
}

impl Coercer {
    /// Creates a coercer with the given integer policy.
    pub fn new(policy: IntegerPolicy) -> Self {
        Self { policy }
    }

    /// Integer policy in effect.
    pub fn policy(&self) -> IntegerPolicy {
        self.policy
    }

    /// Coerces a native value. `null` yields `Ok(None)` and must be skipped by the caller.
    pub fn to_db_value(&self, value: &Value) -> Result<Option<DbValue>> {
        match value {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(DbValue::from(*b))),
            Value::Number(n) => self.number(n).map(Some),
            Value::String(s) => Ok(Some(DbValue::String(s.clone()))),
            Value::Array(items) => self.array(items).map(Some),
            Value::Object(map) => tagged(map).map(Some),
        }
    }

    /// Coerces a `{key, value}` object into a `DbKeyValue`.
    pub fn to_db_key_value(&self, value: &Value) -> Result<DbKeyValue> {
        let Value::Object(map) = value else {
            return Err(ClientError::invalid_key_value(format!(
                "expected an object with key and value, got {}",
                json_type_name(value)
            )));
        };
        let key = self.key_value_side(map, "key")?;
        let value = self.key_value_side(map, "value")?;
        Ok(DbKeyValue { key, value })
    }

    /// Splits a native record into its id (from `db_id`) and the remaining fields.
    pub fn element_to_id_and_values(&self, record: &Value) -> Result<(QueryId, Vec<DbKeyValue>)> {
        let Value::Object(map) = record else {
            return Err(ClientError::unsupported(json_type_name(record)));
        };
        let id = match map.get(DB_ID_FIELD) {
            Some(Value::Number(n)) => match n.as_i64() {
                Some(id) => QueryId::Id(DbId(id)),
                None => return Err(ClientError::invalid_db_id(format!("number {n}"))),
            },
            Some(Value::String(alias)) => QueryId::Alias(alias.clone()),
            Some(other) => return Err(ClientError::invalid_db_id(json_type_name(other))),
            None => return Err(ClientError::invalid_db_id("missing")),
        };
        let mut values = Vec::with_capacity(map.len().saturating_sub(1));
        for (key, field) in map {
            if key == DB_ID_FIELD {
                continue;
            }
            if let Some(value) = self.to_db_value(field)? {
                values.push(DbKeyValue {
                    key: DbValue::String(key.clone()),
                    value,
                });
            }
        }
        trace!(id = ?id, fields = values.len(), "coerce.element");
        Ok((id, values))
    }

    fn key_value_side(&self, map: &Map<String, Value>, side: &str) -> Result<DbValue> {
        let raw = map
            .get(side)
            .ok_or_else(|| ClientError::invalid_key_value(format!("missing {side}")))?;
        match self.to_db_value(raw) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(ClientError::invalid_key_value(format!("{side} is null"))),
            Err(err) => Err(ClientError::invalid_key_value(format!("{side}: {err}"))),
        }
    }

    fn number(&self, n: &Number) -> Result<DbValue> {
        if n.is_f64() {
            return n
                .as_f64()
                .map(|f| DbValue::F64(DbF64(f)))
                .ok_or_else(|| ClientError::unsupported("number"));
        }
        if let Some(u) = n.as_u64() {
            if self.policy == IntegerPolicy::Unsigned || u > i64::MAX as u64 {
                return Ok(DbValue::U64(u));
            }
        }
        n.as_i64()
            .map(DbValue::I64)
            .ok_or_else(|| ClientError::unsupported("number"))
    }

    fn array(&self, items: &[Value]) -> Result<DbValue> {
        if items.is_empty() {
            return Ok(DbValue::VecI64(Vec::new()));
        }
        if items.iter().all(Value::is_string) {
            let strings = items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_owned))
                .collect();
            return Ok(DbValue::VecString(strings));
        }
        let mut numbers = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Value::Number(n) => numbers.push(n),
                other => {
                    return Err(ClientError::unsupported(format!(
                        "array of {}",
                        json_type_name(other)
                    )))
                }
            }
        }
        if numbers.iter().any(|n| n.is_f64()) {
            let floats = numbers
                .iter()
                .map(|n| n.as_f64().map(DbF64))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| ClientError::unsupported("array of number"))?;
            return Ok(DbValue::VecF64(floats));
        }
        let all_unsigned = numbers.iter().all(|n| n.as_u64().is_some());
        let any_beyond_i64 = numbers.iter().any(|n| n.as_i64().is_none());
        if all_unsigned && (self.policy == IntegerPolicy::Unsigned || any_beyond_i64) {
            let unsigned = numbers.iter().filter_map(|n| n.as_u64()).collect();
            return Ok(DbValue::VecU64(unsigned));
        }
        numbers
            .iter()
            .map(|n| n.as_i64())
            .collect::<Option<Vec<_>>>()
            .map(DbValue::VecI64)
            .ok_or_else(|| {
                ClientError::unsupported("array mixing negative integers and integers above i64::MAX")
            })
    }
}

/// Coerces with the default (signed) integer policy.
pub fn to_db_value(value: &Value) -> Result<Option<DbValue>> {
    Coercer::default().to_db_value(value)
}

/// Coerces a `{key, value}` object with the default integer policy.
pub fn to_db_key_value(value: &Value) -> Result<DbKeyValue> {
    Coercer::default().to_db_key_value(value)
}

/// Splits a record with the default integer policy.
pub fn element_to_id_and_values(record: &Value) -> Result<(QueryId, Vec<DbKeyValue>)> {
    Coercer::default().element_to_id_and_values(record)
}

fn tagged(map: &Map<String, Value>) -> Result<DbValue> {
    if map.len() == 1 {
        if let Ok(value) = serde_json::from_value::<DbValue>(Value::Object(map.clone())) {
            return Ok(value);
        }
    }
    Err(ClientError::unsupported("object"))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
