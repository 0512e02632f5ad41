//! Tagged value representation shared by every query payload.
//!
//! The serde representation is the server's wire format: each variant is an
//! externally tagged object such as `{"I64": 1}` or `{"VecString": ["a"]}`.
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Database element identifier. Nodes are positive, edges negative, `0` is invalid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DbId(pub i64);

impl DbId {
    /// True for positive ids.
    pub fn is_node(&self) -> bool {
        self.0 > 0
    }

    /// True for negative ids.
    pub fn is_edge(&self) -> bool {
        self.0 < 0
    }
}

impl From<i64> for DbId {
    fn from(value: i64) -> Self {
        DbId(value)
    }
}

impl fmt::Display for DbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `f64` wrapper with a total order so values can be compared, hashed and sorted.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DbF64(pub f64);

impl DbF64 {
    /// Returns the wrapped float.
    pub fn to_f64(self) -> f64 {
        self.0
    }
}

impl PartialEq for DbF64 {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for DbF64 {}

impl PartialOrd for DbF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DbF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for DbF64 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl From<f64> for DbF64 {
    fn from(value: f64) -> Self {
        DbF64(value)
    }
}

impl From<f32> for DbF64 {
    fn from(value: f32) -> Self {
        DbF64(f64::from(value))
    }
}

/// Typed value tagged with explicit type information so the wire format
/// remains unambiguous across language bindings.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DbValue {
    /// Arbitrary binary payload.
    Bytes(Vec<u8>),
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit float with total ordering.
    F64(DbF64),
    /// UTF-8 string.
    String(String),
    /// Vector of signed integers.
    VecI64(Vec<i64>),
    /// Vector of unsigned integers.
    VecU64(Vec<u64>),
    /// Vector of floats.
    VecF64(Vec<DbF64>),
    /// Vector of strings.
    VecString(Vec<String>),
}

impl DbValue {
    /// Wire tag of the populated variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            DbValue::Bytes(_) => "Bytes",
            DbValue::I64(_) => "I64",
            DbValue::U64(_) => "U64",
            DbValue::F64(_) => "F64",
            DbValue::String(_) => "String",
            DbValue::VecI64(_) => "VecI64",
            DbValue::VecU64(_) => "VecU64",
            DbValue::VecF64(_) => "VecF64",
            DbValue::VecString(_) => "VecString",
        }
    }

    /// Borrows the string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DbValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for DbValue {
    fn from(value: i64) -> Self {
        DbValue::I64(value)
    }
}

impl From<i32> for DbValue {
    fn from(value: i32) -> Self {
        DbValue::I64(i64::from(value))
    }
}

impl From<u64> for DbValue {
    fn from(value: u64) -> Self {
        DbValue::U64(value)
    }
}

impl From<u32> for DbValue {
    fn from(value: u32) -> Self {
        DbValue::U64(u64::from(value))
    }
}

impl From<f64> for DbValue {
    fn from(value: f64) -> Self {
        DbValue::F64(DbF64(value))
    }
}

impl From<f32> for DbValue {
    fn from(value: f32) -> Self {
        DbValue::F64(value.into())
    }
}

impl From<DbF64> for DbValue {
    fn from(value: DbF64) -> Self {
        DbValue::F64(value)
    }
}

impl From<&str> for DbValue {
    fn from(value: &str) -> Self {
        DbValue::String(value.to_owned())
    }
}

impl From<String> for DbValue {
    fn from(value: String) -> Self {
        DbValue::String(value)
    }
}

/// Booleans are not a wire type; they travel as the literal strings `"true"`/`"false"`.
impl From<bool> for DbValue {
    fn from(value: bool) -> Self {
        DbValue::String(value.to_string())
    }
}

impl From<Vec<u8>> for DbValue {
    fn from(value: Vec<u8>) -> Self {
        DbValue::Bytes(value)
    }
}

impl From<&[u8]> for DbValue {
    fn from(value: &[u8]) -> Self {
        DbValue::Bytes(value.to_vec())
    }
}

impl From<Vec<i64>> for DbValue {
    fn from(value: Vec<i64>) -> Self {
        DbValue::VecI64(value)
    }
}

impl From<Vec<u64>> for DbValue {
    fn from(value: Vec<u64>) -> Self {
        DbValue::VecU64(value)
    }
}

impl From<Vec<f64>> for DbValue {
    fn from(value: Vec<f64>) -> Self {
        DbValue::VecF64(value.into_iter().map(DbF64).collect())
    }
}

impl From<Vec<String>> for DbValue {
    fn from(value: Vec<String>) -> Self {
        DbValue::VecString(value)
    }
}

impl From<Vec<&str>> for DbValue {
    fn from(value: Vec<&str>) -> Self {
        DbValue::VecString(value.into_iter().map(str::to_owned).collect())
    }
}

impl fmt::Display for DbValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbValue::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
            DbValue::I64(v) => write!(f, "{v}"),
            DbValue::U64(v) => write!(f, "{v}"),
            DbValue::F64(v) => write!(f, "{}", v.0),
            DbValue::String(v) => write!(f, "{v}"),
            DbValue::VecI64(v) => write!(f, "{v:?}"),
            DbValue::VecU64(v) => write!(f, "{v:?}"),
            DbValue::VecF64(v) => {
                let floats: Vec<f64> = v.iter().map(|x| x.0).collect();
                write!(f, "{floats:?}")
            }
            DbValue::VecString(v) => write!(f, "{v:?}"),
        }
    }
}

/// Key/value property pair. Position within a list is significant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DbKeyValue {
    /// Property key.
    pub key: DbValue,
    /// Property value.
    pub value: DbValue,
}

impl<K, V> From<(K, V)> for DbKeyValue
where
    K: Into<DbValue>,
    V: Into<DbValue>,
{
    fn from((key, value): (K, V)) -> Self {
        DbKeyValue {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordering directive applied to search results.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DbKeyOrder {
    /// Ascending by the given key.
    Asc(DbValue),
    /// Descending by the given key.
    Desc(DbValue),
}
