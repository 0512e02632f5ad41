//! Rejects non-finite floats before a record is converted to JSON.
//!
//! `serde_json` writes NaN and infinities as `null`, and null fields are
//! skipped during coercion, so they would vanish silently. This walker
//! visits every float a record serializes and stops at the first bad one.

use std::fmt::Display;

use serde::ser::{self, Impossible, Serialize};
use thiserror::Error;

use crate::error::{ClientError, Result};

/// Fails with `UnsupportedType` if `value` serializes a NaN or infinite float.
pub(crate) fn ensure_finite<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut walker = FiniteWalker { field: None };
    match value.serialize(&mut walker) {
        Ok(()) => Ok(()),
        Err(WalkError::NonFinite(Some(field))) => Err(ClientError::unsupported(format!(
            "non-finite float in field '{field}'"
        ))),
        Err(WalkError::NonFinite(None)) => Err(ClientError::unsupported("non-finite float")),
        // The real serialization reports its own failures.
        Err(WalkError::Custom(_)) => Ok(()),
    }
}

#[derive(Debug, Error)]
enum WalkError {
    #[error("non-finite float")]
    NonFinite(Option<String>),
    #[error("{0}")]
    Custom(String),
}

impl ser::Error for WalkError {
    fn custom<T: Display>(msg: T) -> Self {
        WalkError::Custom(msg.to_string())
    }
}

struct FiniteWalker {
    field: Option<String>,
}

impl FiniteWalker {
    fn float(&self, value: f64) -> std::result::Result<(), WalkError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(WalkError::NonFinite(self.field.clone()))
        }
    }

    fn field<T: Serialize + ?Sized>(
        &mut self,
        name: &str,
        value: &T,
    ) -> std::result::Result<(), WalkError> {
        let outer = self.field.replace(name.to_string());
        let result = value.serialize(&mut *self);
        self.field = outer;
        result
    }
}

type Walk = std::result::Result<(), WalkError>;

impl<'a> ser::Serializer for &'a mut FiniteWalker {
    type Ok = ();
    type Error = WalkError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _: bool) -> Walk {
        Ok(())
    }

    fn serialize_i8(self, _: i8) -> Walk {
        Ok(())
    }

    fn serialize_i16(self, _: i16) -> Walk {
        Ok(())
    }

    fn serialize_i32(self, _: i32) -> Walk {
        Ok(())
    }

    fn serialize_i64(self, _: i64) -> Walk {
        Ok(())
    }

    fn serialize_u8(self, _: u8) -> Walk {
        Ok(())
    }

    fn serialize_u16(self, _: u16) -> Walk {
        Ok(())
    }

    fn serialize_u32(self, _: u32) -> Walk {
        Ok(())
    }

    fn serialize_u64(self, _: u64) -> Walk {
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Walk {
        self.float(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Walk {
        self.float(v)
    }

    fn serialize_char(self, _: char) -> Walk {
        Ok(())
    }

    fn serialize_str(self, _: &str) -> Walk {
        Ok(())
    }

    fn serialize_bytes(self, _: &[u8]) -> Walk {
        Ok(())
    }

    fn serialize_none(self) -> Walk {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Walk {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Walk {
        Ok(())
    }

    fn serialize_unit_struct(self, _: &'static str) -> Walk {
        Ok(())
    }

    fn serialize_unit_variant(self, _: &'static str, _: u32, _: &'static str) -> Walk {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> Walk {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Walk {
        value.serialize(self)
    }

    fn serialize_seq(self, _: Option<usize>) -> std::result::Result<Self, WalkError> {
        Ok(self)
    }

    fn serialize_tuple(self, _: usize) -> std::result::Result<Self, WalkError> {
        Ok(self)
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Self, WalkError> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Self, WalkError> {
        Ok(self)
    }

    fn serialize_map(self, _: Option<usize>) -> std::result::Result<Self, WalkError> {
        Ok(self)
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> std::result::Result<Self, WalkError> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Self, WalkError> {
        Ok(self)
    }
}

impl<'a> ser::SerializeSeq for &'a mut FiniteWalker {
    type Ok = ();
    type Error = WalkError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Walk {
        value.serialize(&mut **self)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

impl<'a> ser::SerializeTuple for &'a mut FiniteWalker {
    type Ok = ();
    type Error = WalkError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Walk {
        value.serialize(&mut **self)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

impl<'a> ser::SerializeTupleStruct for &'a mut FiniteWalker {
    type Ok = ();
    type Error = WalkError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Walk {
        value.serialize(&mut **self)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

impl<'a> ser::SerializeTupleVariant for &'a mut FiniteWalker {
    type Ok = ();
    type Error = WalkError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Walk {
        value.serialize(&mut **self)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

impl<'a> ser::SerializeMap for &'a mut FiniteWalker {
    type Ok = ();
    type Error = WalkError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Walk {
        let mut name = KeyName(None);
        if key.serialize(&mut name).is_ok() {
            self.field = name.0;
        }
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Walk {
        let result = value.serialize(&mut **self);
        self.field = None;
        result
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

impl<'a> ser::SerializeStruct for &'a mut FiniteWalker {
    type Ok = ();
    type Error = WalkError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Walk {
        self.field(key, value)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

impl<'a> ser::SerializeStructVariant for &'a mut FiniteWalker {
    type Ok = ();
    type Error = WalkError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Walk {
        self.field(key, value)
    }

    fn end(self) -> Walk {
        Ok(())
    }
}

/// Captures a map key when it serializes as a string.
struct KeyName(Option<String>);

impl<'a> ser::Serializer for &'a mut KeyName {
    type Ok = ();
    type Error = WalkError;
    type SerializeSeq = Impossible<(), WalkError>;
    type SerializeTuple = Impossible<(), WalkError>;
    type SerializeTupleStruct = Impossible<(), WalkError>;
    type SerializeTupleVariant = Impossible<(), WalkError>;
    type SerializeMap = Impossible<(), WalkError>;
    type SerializeStruct = Impossible<(), WalkError>;
    type SerializeStructVariant = Impossible<(), WalkError>;

    fn serialize_str(self, v: &str) -> Walk {
        self.0 = Some(v.to_string());
        Ok(())
    }

    fn serialize_bool(self, _: bool) -> Walk {
        Err(not_a_name())
    }

    fn serialize_i8(self, _: i8) -> Walk {
        Err(not_a_name())
    }

    fn serialize_i16(self, _: i16) -> Walk {
        Err(not_a_name())
    }

    fn serialize_i32(self, _: i32) -> Walk {
        Err(not_a_name())
    }

    fn serialize_i64(self, _: i64) -> Walk {
        Err(not_a_name())
    }

    fn serialize_u8(self, _: u8) -> Walk {
        Err(not_a_name())
    }

    fn serialize_u16(self, _: u16) -> Walk {
        Err(not_a_name())
    }

    fn serialize_u32(self, _: u32) -> Walk {
        Err(not_a_name())
    }

    fn serialize_u64(self, _: u64) -> Walk {
        Err(not_a_name())
    }

    fn serialize_f32(self, _: f32) -> Walk {
        Err(not_a_name())
    }

    fn serialize_f64(self, _: f64) -> Walk {
        Err(not_a_name())
    }

    fn serialize_char(self, _: char) -> Walk {
        Err(not_a_name())
    }

    fn serialize_bytes(self, _: &[u8]) -> Walk {
        Err(not_a_name())
    }

    fn serialize_none(self) -> Walk {
        Err(not_a_name())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Walk {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Walk {
        Err(not_a_name())
    }

    fn serialize_unit_struct(self, _: &'static str) -> Walk {
        Err(not_a_name())
    }

    fn serialize_unit_variant(self, _: &'static str, _: u32, variant: &'static str) -> Walk {
        self.0 = Some(variant.to_string());
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> Walk {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: &T,
    ) -> Walk {
        Err(not_a_name())
    }

    fn serialize_seq(
        self,
        _: Option<usize>,
    ) -> std::result::Result<Self::SerializeSeq, WalkError> {
        Err(not_a_name())
    }

    fn serialize_tuple(self, _: usize) -> std::result::Result<Self::SerializeTuple, WalkError> {
        Err(not_a_name())
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Self::SerializeTupleStruct, WalkError> {
        Err(not_a_name())
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Self::SerializeTupleVariant, WalkError> {
        Err(not_a_name())
    }

    fn serialize_map(
        self,
        _: Option<usize>,
    ) -> std::result::Result<Self::SerializeMap, WalkError> {
        Err(not_a_name())
    }

    fn serialize_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Self::SerializeStruct, WalkError> {
        Err(not_a_name())
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> std::result::Result<Self::SerializeStructVariant, WalkError> {
        Err(not_a_name())
    }
}

fn not_a_name() -> WalkError {
    WalkError::Custom("map key is not a string".into())
}
